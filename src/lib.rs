//! A pure spaced-repetition scheduling engine.
//!
//! The crate answers exactly one question: given a flashcard's memory
//! snapshot and the rating a user just gave it, when should the card
//! come back? Memory is modelled with the FSRS forgetting curve over
//! two variables per card, stability and difficulty, and cards move
//! through a four-state lifecycle (New, Learning, Review, Relearning)
//! with configurable short-term steps on either side of graduation.
//!
//! Everything is deterministic and storage-agnostic: the caller owns
//! the clock and the persistence, the [`Scheduler`] owns the math.
//!
//! ```
//! use chrono::Utc;
//! use srs_engine::{Card, Parameters, Rating, Scheduler};
//!
//! let scheduler = Scheduler::new(Parameters::default())?;
//! let mut card = Card::new(Utc::now());
//!
//! let now = Utc::now();
//! let options = scheduler.next_review_options(&card, now);
//! assert!(options.easy.due > options.again.due);
//!
//! let result = scheduler.schedule(&card, Rating::Good, now);
//! card.apply(&result, now);
//! # Ok::<(), srs_engine::SchedulerError>(())
//! ```

mod card;
mod error;
mod fuzz;
mod memory;
mod parameters;
mod scheduler;
#[cfg(test)]
mod test_helpers;

pub use card::{Card, Rating, ReviewLog, State};
pub use error::{Result, SchedulerError};
pub use memory::{next_interval, retrievability};
pub use parameters::{DEFAULT_WEIGHTS, NUM_WEIGHTS, Parameters, Weights};
pub use scheduler::{ReviewOption, ReviewOptions, ScheduleResult, Scheduler};
