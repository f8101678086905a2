//! rt-curves: the static catalog of protection curve definitions.
//!
//! Provides:
//! - `CurveSpec` records for the BE3/IEEE IDMT family (A-1 through A-17)
//! - IEC standard inverse family (A, B, C, Short Inverse)
//! - Volts-per-hertz curve shapes (A, B, C)
//! - The inverse-time undervoltage characteristic
//!
//! The table is a `static` and is never mutated. Identifiers are resolved either
//! globally by canonical id, or inside a single family where the short aliases
//! printed on relay nameplates (`14`, `A`, `short`) are unambiguous.
//!
//! # Example
//!
//! ```
//! use rt_curves::{CurveFamily, CurveShape, lookup_in};
//!
//! let curve = lookup_in(CurveFamily::Idmt, "very inverse").unwrap();
//! assert_eq!(curve.id, "A-14");
//! assert!(matches!(curve.shape, CurveShape::Idmt(_)));
//! ```

pub mod catalog;
pub mod error;

pub use catalog::{
    CurveFamily, CurveShape, CurveSpec, IdmtConstants, IecConstants, VoltsPerHertzConstants,
    curve_catalog, curves_in, filter_curve_catalog, lookup, lookup_in,
};
pub use error::{CurveError, CurveResult};
