use crate::card::Rating;
use crate::parameters::Weights;

/// Working range of stability, in days.
pub(crate) const S_MIN: f64 = 0.001;
pub(crate) const S_MAX: f64 = 36500.0;
/// Working range of difficulty.
pub(crate) const D_MIN: f64 = 1.0;
pub(crate) const D_MAX: f64 = 10.0;

/// Probability of recalling a card `elapsed_days` after its last review,
/// given its stability. Power forgetting curve: retrievability is 0.9
/// when the elapsed time equals the stability. Returns 0.0 for a card
/// that has never been learned (stability still at zero).
pub fn retrievability(stability: f64, elapsed_days: u32) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    (1.0 + elapsed_days as f64 / (9.0 * stability)).powf(-1.0)
}

/// Interval, in days, after which retrievability decays to
/// `desired_retention`. At the default retention of 0.9 the interval
/// equals the stability. Never less than one day; the caller applies
/// its own upper cap.
pub fn next_interval(stability: f64, desired_retention: f64) -> u32 {
    (9.0 * stability * (1.0 / desired_retention - 1.0))
        .round()
        .max(1.0) as u32
}

/// Stability assigned on first exposure: one of the four base constants
/// w0-w3, picked by rating.
pub(crate) fn init_stability(w: &Weights, rating: Rating) -> f64 {
    w[rating as usize - 1].clamp(S_MIN, S_MAX)
}

/// Difficulty assigned on first exposure.
pub(crate) fn init_difficulty(w: &Weights, rating: Rating) -> f64 {
    (w[4] - f64::exp(w[5] * (rating as usize - 1) as f64) + 1.0).clamp(D_MIN, D_MAX)
}

/// Difficulty update for every later review: a linear nudge scaled by
/// how far the rating sits from Good, which leaves difficulty unchanged.
pub(crate) fn next_difficulty(w: &Weights, difficulty: f64, rating: Rating) -> f64 {
    (difficulty - w[6] * (rating as usize as f64 - 3.0)).clamp(D_MIN, D_MAX)
}

/// Stability growth after a successful recall. The growth term shrinks
/// as difficulty rises and as stability itself grows; a review close to
/// the forgetting point (low retrievability) earns more than a premature
/// one. Hard applies the penalty w15 < 1, Easy the bonus w16 > 1.
pub(crate) fn stability_after_success(
    w: &Weights,
    stability: f64,
    retrievability: f64,
    difficulty: f64,
    rating: Rating,
) -> f64 {
    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };
    (stability
        * (1.0
            + f64::exp(w[8])
                * (11.0 - difficulty)
                * stability.powf(-w[9])
                * (f64::exp((1.0 - retrievability) * w[10]) - 1.0)
                * hard_penalty
                * easy_bonus))
        .clamp(S_MIN, S_MAX)
}

/// Steep stability drop after a forgotten card.
pub(crate) fn stability_after_failure(
    w: &Weights,
    stability: f64,
    retrievability: f64,
    difficulty: f64,
) -> f64 {
    (w[11]
        * difficulty.powf(-w[12])
        * ((stability + 1.0).powf(w[13]) - 1.0)
        * f64::exp((1.0 - retrievability) * w[14]))
        .clamp(S_MIN, S_MAX)
}
