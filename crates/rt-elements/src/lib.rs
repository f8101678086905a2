//! rt-elements: protection element library.
//!
//! Provides one facade per relay element:
//! - `VoltageRestrainedOvercurrent` (51V, BE3/IEEE IDMT curves with voltage restraint)
//! - `IecOvercurrent` (51, IEC standard inverse curves)
//! - `UndervoltageElement` (27, inverse-time undervoltage)
//! - `VoltsPerHertzElement` (24, overfluxing curves A/B/C)
//!
//! All elements implement the `ProtectionElement` trait. Each one resolves curve
//! identifiers in its own family namespace, applies the domain checks that belong
//! to it and hands the formula work to `rt_eval`. Evaluations are pure, so a
//! characteristic `sweep` evaluates its points in parallel.
//!
//! # Example
//!
//! ```
//! use rt_core::units::{amps, kilovolts};
//! use rt_elements::{ProtectionElement, VoltageRestrainedOvercurrent};
//! use rt_eval::ElementInput;
//!
//! let input = ElementInput::builder()
//!     .multiplier(1.0)
//!     .measured_current(amps(9.4))
//!     .pickup_current(amps(4.7))
//!     .measured_voltage(kilovolts(5.5))
//!     .nominal_voltage(kilovolts(11.0))
//!     .build()
//!     .unwrap();
//!
//! let element = VoltageRestrainedOvercurrent::default();
//! let outcome = element.evaluate("A-14", &input).unwrap();
//! assert_eq!(outcome.trip_time_s(), Some(0.476));
//! ```

pub mod error;
pub mod iec_overcurrent;
pub mod idmt_restraint;
pub mod sweep;
pub mod traits;
pub mod undervoltage;
pub mod volts_per_hertz;

// Re-exports
pub use error::{ElementError, ElementResult};
pub use iec_overcurrent::IecOvercurrent;
pub use idmt_restraint::VoltageRestrainedOvercurrent;
pub use sweep::{SweepDefinition, SweepError, SweepPoint, SweepResult, SweepSpacing, run_sweep};
pub use traits::ProtectionElement;
pub use undervoltage::UndervoltageElement;
pub use volts_per_hertz::VoltsPerHertzElement;
