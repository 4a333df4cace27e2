//! Interval fuzzing: a small deterministic perturbation applied to
//! committed day intervals so cards reviewed together do not stay
//! locked to the same due date forever.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct FuzzRange {
    start: f64,
    end: f64,
    factor: f64,
}

/// Per-band widths: short intervals wobble proportionally more than
/// long ones, on top of a one-day baseline.
const FUZZ_RANGES: [FuzzRange; 3] = [
    FuzzRange {
        start: 2.5,
        end: 7.0,
        factor: 0.15,
    },
    FuzzRange {
        start: 7.0,
        end: 20.0,
        factor: 0.1,
    },
    FuzzRange {
        start: 20.0,
        end: f64::INFINITY,
        factor: 0.05,
    },
];

/// Intervals below this many days are left alone.
const FUZZ_FLOOR: f64 = 2.5;

/// Inclusive bounds the fuzzed interval may land in. Never below two
/// days, never above the cap, and never at or below the elapsed time
/// when the unfuzzed interval already cleared it.
pub(crate) fn fuzz_bounds(interval: u32, elapsed_days: u32, maximum_interval: u32) -> (u32, u32) {
    let interval = interval.min(maximum_interval) as f64;
    let mut delta = 1.0;
    for range in &FUZZ_RANGES {
        delta += range.factor * (interval.min(range.end) - range.start).max(0.0);
    }
    let mut min_ivl = (interval - delta).round().max(2.0) as u32;
    let max_ivl = ((interval + delta).round() as u32).min(maximum_interval);
    if interval > elapsed_days as f64 {
        min_ivl = min_ivl.max(elapsed_days + 1);
    }
    min_ivl = min_ivl.min(max_ivl);
    (min_ivl, max_ivl)
}

/// Draws an interval from the fuzz band, or returns the input untouched
/// when it is too short to fuzz. The draw is fully determined by the
/// seed, so replaying a review reproduces the same due date.
pub(crate) fn fuzzed_interval(
    interval: u32,
    elapsed_days: u32,
    maximum_interval: u32,
    seed: u64,
) -> u32 {
    if (interval as f64) < FUZZ_FLOOR {
        return interval;
    }
    let (min_ivl, max_ivl) = fuzz_bounds(interval, elapsed_days, maximum_interval);
    let mut rng = StdRng::seed_from_u64(seed);
    rng.random_range(min_ivl..=max_ivl)
}

/// Seed mixing the review instant with the card's review count: stable
/// while one review is being previewed and committed, different across
/// successive reviews of the same card.
pub(crate) fn seed_from(now: DateTime<Utc>, reps: u32) -> u64 {
    (now.timestamp_millis() as u64) ^ ((reps as u64) << 32)
}
