use chrono::{DateTime, Duration, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::card::{Card, Rating, State};
use crate::error::Result;
use crate::fuzz;
use crate::memory::{self, D_MAX, D_MIN, S_MAX, S_MIN};
use crate::parameters::Parameters;

/// One committed scheduling decision: the successor card fields, to be
/// persisted verbatim by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub state: State,
    pub due: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    pub elapsed_days: u32,
    pub scheduled_days: u32,
    pub reps: u32,
    pub lapses: u32,
}

/// Preview of a single rating choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewOption {
    pub due: DateTime<Utc>,
    pub interval_days: u32,
}

/// All four rating choices for a card, previewed without committing
/// anything. What a review screen renders on its answer buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOptions {
    pub again: ReviewOption,
    pub hard: ReviewOption,
    pub good: ReviewOption,
    pub easy: ReviewOption,
}

impl ReviewOptions {
    /// The previewed entry for one rating.
    pub fn get(&self, rating: Rating) -> ReviewOption {
        match rating {
            Rating::Again => self.again,
            Rating::Hard => self.hard,
            Rating::Good => self.good,
            Rating::Easy => self.easy,
        }
    }
}

/// The scheduling engine: an immutable parameter set plus the pure
/// review computation. Construct one per parameter set (per user, when
/// weights are personalized) and share it freely; every method is a
/// closed-form function of its arguments and never touches a clock,
/// storage, or any mutable state.
#[derive(Debug, Clone)]
pub struct Scheduler {
    parameters: Parameters,
}

impl Scheduler {
    /// Validates the parameter set once, so a malformed set can never
    /// reach the formulas.
    pub fn new(parameters: Parameters) -> Result<Self> {
        parameters.validate()?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Commits one review: given a card snapshot, the user's rating and
    /// the caller-supplied review instant, computes the successor card
    /// fields. The caller persists the result and appends its own
    /// review log entry; this function mutates nothing.
    pub fn schedule(&self, card: &Card, rating: Rating, now: DateTime<Utc>) -> ScheduleResult {
        self.evaluate(card, now)[rating as usize - 1]
    }

    /// Previews all four rating choices without committing. Choosing a
    /// rating afterwards and calling [`Scheduler::schedule`] reproduces
    /// the previewed entry exactly: both derive from the same internal
    /// evaluation.
    pub fn next_review_options(&self, card: &Card, now: DateTime<Utc>) -> ReviewOptions {
        let [again, hard, good, easy] = self.evaluate(card, now).map(|result| ReviewOption {
            due: result.due,
            interval_days: result.scheduled_days,
        });
        ReviewOptions {
            again,
            hard,
            good,
            easy,
        }
    }

    /// Recall probability of the card at `now`: 1.0 right after a
    /// review, decaying along the forgetting curve. 0.0 while the card
    /// is still New.
    pub fn current_retrievability(&self, card: &Card, now: DateTime<Utc>) -> f64 {
        match card.state {
            State::New => 0.0,
            _ => memory::retrievability(card.stability, days_since_review(card, now)),
        }
    }

    /// Evaluates the successor for every rating at once. Commit and
    /// preview both read from this, which is what makes them agree.
    fn evaluate(&self, card: &Card, now: DateTime<Utc>) -> [ScheduleResult; 4] {
        let elapsed_days = days_since_review(card, now);
        let retrievability = memory::retrievability(card.stability, elapsed_days);
        let seed = fuzz::seed_from(now, card.reps);

        let (again, mut hard, mut good, mut easy) = Rating::iter()
            .map(|rating| self.branch(card, rating, retrievability, elapsed_days, seed))
            .collect_tuple()
            .expect("one branch per rating");

        // Day intervals must rank strictly by rating wherever two
        // success branches graduate together, even after rounding and
        // fuzzing collapse them.
        if let (Interval::Days(h), Interval::Days(g)) = (hard.interval, good.interval) {
            let h = h.min(g);
            hard.interval = Interval::Days(h);
            good.interval = Interval::Days(g.max(h + 1));
        }
        if let (Interval::Days(g), Interval::Days(e)) = (good.interval, easy.interval) {
            easy.interval = Interval::Days(e.max(g + 1));
        }

        [again, hard, good, easy]
            .map(|branch| branch.commit(card, elapsed_days, now, self.parameters.maximum_interval))
    }

    /// The state machine: one transition per (state, rating) cell,
    /// carrying the memory update and the interval kind for that cell.
    fn branch(
        &self,
        card: &Card,
        rating: Rating,
        retrievability: f64,
        elapsed_days: u32,
        seed: u64,
    ) -> Branch {
        let p = &self.parameters;
        match card.state {
            State::New => {
                let stability = memory::init_stability(&p.weights, rating);
                let difficulty = memory::init_difficulty(&p.weights, rating);
                let (state, interval) = match rating {
                    Rating::Again => (
                        State::Learning,
                        Interval::Step(first_step(&p.learning_steps)),
                    ),
                    Rating::Hard => (
                        State::Learning,
                        Interval::Step(hold_step(&p.learning_steps)),
                    ),
                    Rating::Good if p.learning_steps.len() > 1 => (
                        State::Learning,
                        Interval::Step(Duration::minutes(p.learning_steps[1] as i64)),
                    ),
                    Rating::Good | Rating::Easy => (
                        State::Review,
                        self.graduated_interval(stability, elapsed_days, seed),
                    ),
                };
                Branch {
                    state,
                    stability,
                    difficulty,
                    interval,
                    lapse: false,
                }
            }
            State::Learning => {
                let (stability, difficulty) = self.reviewed_memory(card, rating, retrievability);
                let (state, interval) = match rating {
                    Rating::Again => (
                        State::Learning,
                        Interval::Step(first_step(&p.learning_steps)),
                    ),
                    Rating::Hard => (
                        State::Learning,
                        Interval::Step(hold_step(&p.learning_steps)),
                    ),
                    Rating::Good | Rating::Easy => (
                        State::Review,
                        self.graduated_interval(stability, elapsed_days, seed),
                    ),
                };
                Branch {
                    state,
                    stability,
                    difficulty,
                    interval,
                    lapse: false,
                }
            }
            State::Review => {
                let (stability, difficulty) = self.reviewed_memory(card, rating, retrievability);
                match rating {
                    Rating::Again => Branch {
                        state: State::Relearning,
                        stability,
                        difficulty,
                        interval: Interval::Step(first_step(&p.relearning_steps)),
                        lapse: true,
                    },
                    _ => Branch {
                        state: State::Review,
                        stability,
                        difficulty,
                        interval: self.graduated_interval(stability, elapsed_days, seed),
                        lapse: false,
                    },
                }
            }
            State::Relearning => {
                let (stability, difficulty) = self.reviewed_memory(card, rating, retrievability);
                let (state, interval, lapse) = match rating {
                    Rating::Again => (
                        State::Relearning,
                        Interval::Step(first_step(&p.relearning_steps)),
                        true,
                    ),
                    Rating::Hard => (
                        State::Relearning,
                        Interval::Step(hold_step(&p.relearning_steps)),
                        false,
                    ),
                    Rating::Good | Rating::Easy => (
                        State::Review,
                        self.graduated_interval(stability, elapsed_days, seed),
                        false,
                    ),
                };
                Branch {
                    state,
                    stability,
                    difficulty,
                    interval,
                    lapse,
                }
            }
        }
    }

    /// Memory update for a card that is already past first exposure.
    /// Incoming values are clamped to the working ranges so a corrupt
    /// row cannot poison the formulas; the stability update reads the
    /// pre-update difficulty.
    fn reviewed_memory(&self, card: &Card, rating: Rating, retrievability: f64) -> (f64, f64) {
        let w = &self.parameters.weights;
        let stability = card.stability.clamp(S_MIN, S_MAX);
        let difficulty = card.difficulty.clamp(D_MIN, D_MAX);
        let next_stability = if rating.is_success() {
            memory::stability_after_success(w, stability, retrievability, difficulty, rating)
        } else {
            memory::stability_after_failure(w, stability, retrievability, difficulty)
        };
        let next_difficulty = memory::next_difficulty(w, difficulty, rating);
        (next_stability, next_difficulty)
    }

    /// Whole-day interval for a branch that lands in Review, capped and
    /// optionally fuzzed.
    fn graduated_interval(&self, stability: f64, elapsed_days: u32, seed: u64) -> Interval {
        let p = &self.parameters;
        let days = memory::next_interval(stability, p.desired_retention).min(p.maximum_interval);
        let days = if p.enable_fuzz {
            fuzz::fuzzed_interval(days, elapsed_days, p.maximum_interval, seed)
        } else {
            days
        };
        Interval::Days(days)
    }
}

/// One evaluated transition before the final bookkeeping.
#[derive(Clone, Copy)]
struct Branch {
    state: State,
    stability: f64,
    difficulty: f64,
    interval: Interval,
    lapse: bool,
}

#[derive(Clone, Copy, PartialEq)]
enum Interval {
    /// Short-term step; the card stays inside a learning phase.
    Step(Duration),
    /// Whole-day interval from the forgetting-curve inversion.
    Days(u32),
}

impl Branch {
    fn commit(
        self,
        card: &Card,
        elapsed_days: u32,
        now: DateTime<Utc>,
        maximum_interval: u32,
    ) -> ScheduleResult {
        let (due, scheduled_days) = match self.interval {
            Interval::Step(step) => (now + step, step.num_days() as u32),
            Interval::Days(days) => {
                let days = days.min(maximum_interval);
                (now + Duration::days(days as i64), days)
            }
        };
        ScheduleResult {
            state: self.state,
            due,
            stability: self.stability,
            difficulty: self.difficulty,
            elapsed_days,
            scheduled_days,
            reps: card.reps + 1,
            lapses: card.lapses + u32::from(self.lapse),
        }
    }
}

/// Whole days since the last review, 0 for a never-reviewed card and
/// for a last-review timestamp sitting in the future (clock skew).
fn days_since_review(card: &Card, now: DateTime<Utc>) -> u32 {
    card.last_review
        .map(|last| (now - last).num_days().max(0) as u32)
        .unwrap_or(0)
}

fn first_step(steps: &[u32]) -> Duration {
    Duration::minutes(steps[0] as i64)
}

/// The Hard delay inside a learning phase: the mean of the first two
/// steps, or 1.5x the only step.
fn hold_step(steps: &[u32]) -> Duration {
    if steps.len() >= 2 {
        Duration::seconds((steps[0] + steps[1]) as i64 * 30)
    } else {
        Duration::seconds(steps[0] as i64 * 90)
    }
}
