//! Curve catalog errors.

use crate::catalog::CurveFamily;
use rt_core::RtError;
use thiserror::Error;

/// Result type for catalog operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors raised while resolving a curve identifier.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// No catalog entry matches the identifier.
    #[error("Unknown curve: {id}")]
    UnknownCurve { id: String },

    /// The identifier names a curve of a different family than the element expects.
    #[error("Curve {id} is a {found} curve, expected {expected}")]
    WrongFamily {
        id: String,
        expected: CurveFamily,
        found: CurveFamily,
    },
}

impl From<CurveError> for RtError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::UnknownCurve { id } => RtError::UnknownId { id },
            CurveError::WrongFamily { .. } => RtError::InvalidArg {
                what: "curve family does not match element",
            },
        }
    }
}
