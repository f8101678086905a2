//! Error types for element evaluation.

use rt_core::RtError;
use rt_curves::CurveError;
use rt_eval::EvalError;
use thiserror::Error;

/// Errors that stop an element evaluation. Domain violations are `Outcome`s, not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

pub type ElementResult<T> = Result<T, ElementError>;

impl From<ElementError> for RtError {
    fn from(e: ElementError) -> Self {
        match e {
            ElementError::Curve(err) => err.into(),
            ElementError::Eval(err) => err.into(),
        }
    }
}
