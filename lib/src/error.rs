use std::fmt;

/// Possible errors of a filtering call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A derived coordinate difference can not be used as a slope operand.
    ///
    /// Carries the anchor and probe indices the difference was taken between.
    /// The call is aborted without a partial result.
    #[error("invalid coordinate, check indices {alpha} and {omega}: {reason}")]
    InvalidCoordinate {
        alpha: usize,
        omega: usize,
        reason: Reason,
    },

    #[error("invalid tolerance: {0}")]
    InvalidTolerance(String),
}

/// Why a coordinate pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    NotANumber,
    Infinite,
    /// The probe's X is not strictly greater than the anchor's X.
    NonIncreasingX,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reason::NotANumber => write!(f, "value is NaN"),
            Reason::Infinite => write!(f, "value is infinite"),
            Reason::NonIncreasingX => write!(f, "x does not increase"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
