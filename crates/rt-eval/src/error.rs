//! Evaluation errors. These are caller mistakes, never domain violations.

use rt_core::RtError;
use thiserror::Error;

/// Result type for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A setting or measurement is NaN or infinite.
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// A setting or measurement is outside its admissible range.
    #[error("Invalid input {what}: {value}")]
    InvalidInput { what: &'static str, value: f64 },

    /// The element needs a quantity the caller did not provide.
    #[error("Missing input: {what}")]
    MissingInput { what: &'static str },
}

impl From<RtError> for EvalError {
    fn from(err: RtError) -> Self {
        match err {
            RtError::NonFinite { what, value } => EvalError::NonFinite { what, value },
            RtError::OutOfRange { what, value } => EvalError::InvalidInput { what, value },
            RtError::InvalidArg { what } => EvalError::InvalidInput {
                what,
                value: f64::NAN,
            },
            RtError::UnknownId { .. } => EvalError::InvalidInput {
                what: "identifier",
                value: f64::NAN,
            },
        }
    }
}

impl From<EvalError> for RtError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::NonFinite { what, value } => RtError::NonFinite { what, value },
            EvalError::InvalidInput { what, value } => RtError::OutOfRange { what, value },
            EvalError::MissingInput { what } => RtError::InvalidArg { what },
        }
    }
}
