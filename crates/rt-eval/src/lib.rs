//! rt-eval: trip-time evaluation core.
//!
//! Provides:
//! - `ElementInput`, the validated per-evaluation record, and `InputDefaults`
//! - `Outcome`, the `Tripped | NotOperated | Invalid` result with reason codes
//! - `guard`, the domain checks that run before any formula
//! - `evaluator`, the closed-form trip-time formulas for every curve family
//!
//! # Architecture
//!
//! Every formula is a pure function of a quantity record and a set of curve
//! constants. Domain checks are performed first and short-circuit with a
//! `Reason`, so no formula ever divides by zero or takes the root of a negative
//! number. Caller mistakes (missing or non-finite settings) are `EvalError`s;
//! domain violations are never errors, they are `Outcome`s.
//!
//! # Example
//!
//! ```
//! use rt_core::units::amps;
//! use rt_eval::{ElementInput, Status, evaluate};
//!
//! let input = ElementInput::builder()
//!     .multiplier(1.0)
//!     .measured_current(amps(10.0))
//!     .pickup_current(amps(1.0))
//!     .build()
//!     .unwrap();
//!
//! let curve = rt_curves::lookup("IEC-A").unwrap();
//! let outcome = evaluate(curve, &input).unwrap();
//! assert_eq!(outcome.status(), Status::Tripped);
//! assert_eq!(outcome.trip_time_s(), Some(2.971));
//! ```

pub mod error;
pub mod evaluator;
pub mod guard;
pub mod input;
pub mod outcome;

pub use error::{EvalError, EvalResult};
pub use evaluator::{
    IdmtQuantities, IecQuantities, UndervoltageQuantities, VoltsPerHertzQuantities, evaluate,
    idmt_trip_time, iec_trip_time, per_unit_volts_per_hertz, undervoltage_trip_time,
    volts_per_hertz_trip_time,
};
pub use guard::GuardResult;
pub use input::{
    ElementInput, ElementInputBuilder, InputDefaults, Measured, refer_current_to_secondary,
    refer_voltage_to_secondary,
};
pub use outcome::{Outcome, Reason, Status};
