use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snafu::OptionExt;
use strum::{EnumIter, FromRepr};

use crate::error::{InvalidCardStateSnafu, Result, SchedulerError};
use crate::scheduler::ScheduleResult;

/// Where a card sits in the learning cycle. Storage layers persist this
/// as the numeric codes 0-3; inside the engine it is always one of the
/// four closed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRepr, EnumIter)]
#[repr(u8)]
pub enum State {
    New = 0,
    Learning = 1,
    Review = 2,
    Relearning = 3,
}

impl State {
    /// Numeric code used by storage collaborators.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for State {
    type Error = SchedulerError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_repr(code).context(InvalidCardStateSnafu { code })
    }
}

/// Self-reported recall quality for one review event. `Again` is a
/// failure, the other three are grades of success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRepr, EnumIter)]
#[repr(u8)]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    /// Builds a rating from a raw client integer, clamping out-of-range
    /// values to the nearest bound instead of rejecting them. Degraded
    /// and legacy clients are known to send values outside 1-4.
    pub fn clamp_from(value: i64) -> Self {
        let clamped = value.clamp(Self::Again as i64, Self::Easy as i64);
        if clamped != value {
            log::debug!("out-of-range rating {value} clamped to {clamped}");
        }
        match clamped {
            1 => Self::Again,
            2 => Self::Hard,
            3 => Self::Good,
            _ => Self::Easy,
        }
    }

    /// Numeric code used by storage collaborators.
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn is_success(self) -> bool {
        !matches!(self, Self::Again)
    }
}

/// One flashcard's scheduling snapshot. The caller owns it; the engine
/// only reads a snapshot and derives the successor fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub state: State,
    /// When the card should next be shown.
    pub due: DateTime<Utc>,
    /// Estimated days until recall probability decays to ~90%. Zero
    /// until the card leaves `New`.
    pub stability: f64,
    /// Intrinsic hardness in [1, 10]. Zero until the card leaves `New`.
    pub difficulty: f64,
    /// Whole days between the two most recent reviews.
    pub elapsed_days: u32,
    /// Interval chosen at the most recent scheduling decision, in days.
    pub scheduled_days: u32,
    /// Completed reviews.
    pub reps: u32,
    /// Times the card was forgotten out of Review/Relearning.
    pub lapses: u32,
    pub last_review: Option<DateTime<Utc>>,
}

impl Card {
    /// A brand-new card, due the instant it is created.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            state: State::New,
            due: now,
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0,
            scheduled_days: 0,
            reps: 0,
            lapses: 0,
            last_review: None,
        }
    }

    /// Merges a committed result back into the card row, stamping the
    /// review instant. The counterpart of persisting the result verbatim.
    pub fn apply(&mut self, result: &ScheduleResult, now: DateTime<Utc>) {
        self.state = result.state;
        self.due = result.due;
        self.stability = result.stability;
        self.difficulty = result.difficulty;
        self.elapsed_days = result.elapsed_days;
        self.scheduled_days = result.scheduled_days;
        self.reps = result.reps;
        self.lapses = result.lapses;
        self.last_review = Some(now);
    }
}

/// Immutable audit record appended by the call site after each committed
/// review. Never read back by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
    pub card_id: i64,
    pub rating: Rating,
    pub state: State,
    pub due: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    pub elapsed_days: u32,
    pub scheduled_days: u32,
    /// How long the user spent on the card, in milliseconds.
    pub review_time_ms: u32,
    pub review_date: DateTime<Utc>,
}

impl ReviewLog {
    /// Builds the log entry for one committed result.
    pub fn record(
        card_id: i64,
        rating: Rating,
        result: &ScheduleResult,
        review_time_ms: u32,
        review_date: DateTime<Utc>,
    ) -> Self {
        Self {
            card_id,
            rating,
            state: result.state,
            due: result.due,
            stability: result.stability,
            difficulty: result.difficulty,
            elapsed_days: result.elapsed_days,
            scheduled_days: result.scheduled_days,
            review_time_ms,
            review_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_codes_round_trip() {
        for code in 0..=3u8 {
            let state = State::try_from(code).unwrap();
            assert_eq!(state.code(), code);
        }
    }

    #[test]
    fn state_rejects_unknown_codes() {
        for code in [4u8, 7, 255] {
            assert_eq!(
                State::try_from(code),
                Err(SchedulerError::InvalidCardState { code })
            );
        }
    }

    #[test]
    fn rating_clamps_instead_of_rejecting() {
        assert_eq!(Rating::clamp_from(-3), Rating::Again);
        assert_eq!(Rating::clamp_from(0), Rating::Again);
        assert_eq!(Rating::clamp_from(1), Rating::Again);
        assert_eq!(Rating::clamp_from(2), Rating::Hard);
        assert_eq!(Rating::clamp_from(3), Rating::Good);
        assert_eq!(Rating::clamp_from(4), Rating::Easy);
        assert_eq!(Rating::clamp_from(9), Rating::Easy);
    }

    #[test]
    fn new_card_starts_blank() {
        let now = Utc::now();
        let card = Card::new(now);
        assert_eq!(card.state, State::New);
        assert_eq!(card.due, now);
        assert_eq!(card.stability, 0.0);
        assert_eq!(card.difficulty, 0.0);
        assert_eq!(card.reps, 0);
        assert_eq!(card.lapses, 0);
        assert_eq!(card.last_review, None);
    }
}
