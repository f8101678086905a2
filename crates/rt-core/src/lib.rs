//! rt-core: shared foundation for the relay trip-time workspace.
//!
//! Contains:
//! - units (uom SI electrical types + constructors)
//! - numeric (Real, range checks, clamp, millisecond rounding)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{RtError, RtResult};
pub use numeric::*;
pub use units::*;
