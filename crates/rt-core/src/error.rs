use thiserror::Error;

pub type RtResult<T> = Result<T, RtError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Unknown identifier: {id}")]
    UnknownId { id: String },
}
