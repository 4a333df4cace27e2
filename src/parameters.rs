use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::error::{InvalidParametersSnafu, Result};

/// Number of weights in the FSRS-4.5 parameter layout. Other layouts
/// (19- or 21-weight) belong to later model revisions and are rejected.
pub const NUM_WEIGHTS: usize = 17;

/// The memory model's weight vector, w0-w16.
pub type Weights = [f64; NUM_WEIGHTS];

/// Published FSRS-4.5 default weights, used when a caller supplies none.
pub const DEFAULT_WEIGHTS: Weights = [
    0.4072, 1.1829, 3.1262, 15.4722, 7.2102, 0.5316, 1.0651, 0.0234, 1.616, 0.1544, 1.0824,
    1.9813, 0.0953, 0.2975, 2.2042, 0.2407, 2.9466,
];

/// Immutable configuration of the memory model and the short-term review
/// steps. Several sets may coexist (one per user); the scheduler they are
/// handed to is the only thing that reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub weights: Weights,
    /// Recall probability the scheduler aims for at the moment a card
    /// comes due. Strictly inside (0, 1).
    pub desired_retention: f64,
    /// Hard cap on any scheduled interval, in days.
    pub maximum_interval: u32,
    /// Step delays in minutes while a card is in Learning.
    pub learning_steps: Vec<u32>,
    /// Step delays in minutes while a card is in Relearning.
    pub relearning_steps: Vec<u32>,
    /// Perturb committed Review intervals inside a small deterministic
    /// band so cards introduced together drift apart.
    pub enable_fuzz: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            desired_retention: 0.9,
            maximum_interval: 36500,
            learning_steps: vec![1, 10],
            relearning_steps: vec![10],
            enable_fuzz: false,
        }
    }
}

impl Parameters {
    /// Builds a set from a raw weight slice: empty means the defaults,
    /// otherwise exactly [`NUM_WEIGHTS`] values are required. Everything
    /// else is taken from [`Parameters::default`].
    pub fn with_weights(weights: &[f64]) -> Result<Self> {
        let weights: Weights = match weights.len() {
            0 => DEFAULT_WEIGHTS,
            NUM_WEIGHTS => {
                let mut exact = [0.0; NUM_WEIGHTS];
                exact.copy_from_slice(weights);
                exact
            }
            n => {
                return InvalidParametersSnafu {
                    reason: format!("expected {NUM_WEIGHTS} weights, got {n}"),
                }
                .fail();
            }
        };
        let parameters = Self {
            weights,
            ..Self::default()
        };
        parameters.validate()?;
        Ok(parameters)
    }

    /// Checks the set before it is allowed anywhere near the formulas.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.weights.iter().all(|w| w.is_finite()),
            InvalidParametersSnafu {
                reason: "weights must be finite"
            }
        );
        ensure!(
            self.desired_retention > 0.0 && self.desired_retention < 1.0,
            InvalidParametersSnafu {
                reason: format!(
                    "desired retention {} outside (0, 1)",
                    self.desired_retention
                )
            }
        );
        ensure!(
            self.maximum_interval >= 1,
            InvalidParametersSnafu {
                reason: "maximum interval must be at least one day"
            }
        );
        ensure!(
            !self.learning_steps.is_empty() && !self.relearning_steps.is_empty(),
            InvalidParametersSnafu {
                reason: "at least one learning and one relearning step is required"
            }
        );
        ensure!(
            self.learning_steps
                .iter()
                .chain(&self.relearning_steps)
                .all(|&minutes| minutes >= 1),
            InvalidParametersSnafu {
                reason: "step durations must be at least one minute"
            }
        );
        Ok(())
    }
}
