use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Half-width of the admissible Y band used when nothing else is configured.
pub const DEFAULT_MAX_DELTA_Y: f64 = 1.0;

/// 2^-32, compensates rounding in slope comparisons.
pub const DEFAULT_EPSILON: f64 = 1.0 / 4_294_967_296.0;

// Tolerance holds the numeric knobs of a filtering run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Maximum admissible deviation in Y of a dropped point from the kept line.
    pub max_delta_y: f64,
    /// Slack applied to every slope comparison.
    pub epsilon: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            max_delta_y: DEFAULT_MAX_DELTA_Y,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Tolerance {
    pub fn new(max_delta_y: f64, epsilon: f64) -> Self {
        Tolerance {
            max_delta_y,
            epsilon,
        }
    }

    /// Both values must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.max_delta_y.is_finite() || self.max_delta_y < 0.0 {
            return Err(Error::InvalidTolerance(format!(
                "max delta y must be a finite non-negative number, got {}",
                self.max_delta_y
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidTolerance(format!(
                "epsilon must be a finite non-negative number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Tolerance{{MaxDeltaY: {}, Epsilon: {:e}}}",
            self.max_delta_y, self.epsilon
        )
    }
}
