use snafu::Snafu;

#[derive(Snafu, Debug, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum SchedulerError {
    /// The parameter set is malformed: wrong weight count, non-finite
    /// values, or out-of-range configuration. Fatal, never retried.
    #[snafu(display("invalid parameter set: {reason}"))]
    InvalidParameters { reason: String },
    /// A persisted state code is outside the four defined card states.
    /// Indicates upstream data corruption, not a user-input edge case.
    #[snafu(display("card state code {code} is outside the defined range 0-3"))]
    InvalidCardState { code: u8 },
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
