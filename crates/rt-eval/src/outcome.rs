//! The result record of one element evaluation.

use rt_core::units::{Time, s};
use serde::Serialize;
use std::fmt;

/// What the element did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Tripped,
    NotOperated,
    Invalid,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tripped => write!(f, "tripped"),
            Self::NotOperated => write!(f, "not operated"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// Machine-checkable reason attached to every non-trip outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Reason {
    /// The measured quantity has not crossed the pickup setting.
    NotPickedUp,
    /// Voltage is at or below the restraint threshold; the overcurrent element
    /// is blocked and the voltage element is expected to operate instead.
    VoltageTooLow,
    /// The formula denominator is exactly zero (vertical asymptote of the curve).
    AtPickupBoundary,
    /// A fractional power of a negative quantity was requested.
    NegativeRadicand,
}

impl Reason {
    /// Status implied by this reason.
    pub fn status(self) -> Status {
        match self {
            Self::NotPickedUp => Status::NotOperated,
            Self::VoltageTooLow | Self::AtPickupBoundary | Self::NegativeRadicand => {
                Status::Invalid
            }
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPickedUp => write!(f, "measured quantity below pickup"),
            Self::VoltageTooLow => write!(f, "voltage at or below restraint threshold"),
            Self::AtPickupBoundary => write!(f, "at pickup boundary"),
            Self::NegativeRadicand => write!(f, "negative radicand"),
        }
    }
}

/// Result of one evaluation.
///
/// `Tripped` always carries a non-negative time and no reason; the other two
/// statuses never carry a time and always carry a reason.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outcome {
    status: Status,
    trip_time_s: Option<f64>,
    reason: Option<Reason>,
}

impl Outcome {
    /// `seconds` must already be finite, non-negative and rounded.
    pub(crate) fn tripped(seconds: f64) -> Self {
        debug_assert!(seconds.is_finite() && seconds >= 0.0);
        Self {
            status: Status::Tripped,
            trip_time_s: Some(seconds),
            reason: None,
        }
    }

    pub fn rejected(reason: Reason) -> Self {
        Self {
            status: reason.status(),
            trip_time_s: None,
            reason: Some(reason),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_tripped(&self) -> bool {
        self.status == Status::Tripped
    }

    /// Trip time in seconds, rounded to the millisecond.
    pub fn trip_time_s(&self) -> Option<f64> {
        self.trip_time_s
    }

    pub fn trip_time(&self) -> Option<Time> {
        self.trip_time_s.map(s)
    }

    pub fn reason(&self) -> Option<Reason> {
        self.reason
    }
}

impl From<Reason> for Outcome {
    fn from(reason: Reason) -> Self {
        Self::rejected(reason)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.trip_time_s, self.reason) {
            (Some(t), _) => write!(f, "{t:.3} seconds"),
            (None, Some(reason)) => write!(f, "{}: {}", self.status, reason),
            (None, None) => write!(f, "{}", self.status),
        }
    }
}
