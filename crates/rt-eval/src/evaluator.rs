//! Closed-form trip-time formulas.
//!
//! Every curve family reduces to `time = f(dial, normalized multiple, constants) + offset`.
//! The per-family functions take plain quantity records so they can be driven
//! without an `ElementInput`; `evaluate` dispatches on the curve shape.

use crate::error::EvalResult;
use crate::guard::{self, GuardResult};
use crate::input::ElementInput;
use crate::outcome::Outcome;
use rt_core::numeric::{ensure_finite, round_millis};
use rt_curves::{CurveShape, CurveSpec, IdmtConstants, IecConstants, VoltsPerHertzConstants};
use tracing::trace;

/// Inputs of the voltage-restrained BE3/IEEE formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdmtQuantities {
    pub dial: f64,
    pub current: f64,
    pub pickup: f64,
    pub ct_secondary: f64,
    pub voltage: f64,
    pub nominal_voltage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IecQuantities {
    pub multiplier: f64,
    pub current: f64,
    pub pickup: f64,
    pub time_adder: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UndervoltageQuantities {
    pub delay: f64,
    pub voltage: f64,
    pub pickup: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltsPerHertzQuantities {
    pub time_multiplier: f64,
    pub voltage: f64,
    pub frequency: f64,
    pub nominal_voltage: f64,
    pub nominal_frequency: f64,
    /// Pickup in per-unit of nominal V/Hz
    pub pickup: f64,
}

/// Round a raw time and wrap it.
///
/// Settings large enough to overflow the time are a caller error, not a curve
/// boundary.
fn settle(raw: GuardResult<f64>) -> EvalResult<Outcome> {
    match raw {
        Ok(seconds) => {
            let seconds = ensure_finite(seconds, "trip time")?;
            Ok(Outcome::tripped(round_millis(seconds.max(0.0))))
        }
        Err(reason) => Ok(Outcome::rejected(reason)),
    }
}

/// `Tt = A*D / (M^N - C) + B*pickup + K` with `M = I / (pickup * ctsec * n)`.
///
/// `n` is the clamped restraint ratio. The restraint gate is not applied here;
/// elements that block on depressed voltage check it first.
pub fn idmt_trip_time(curve: &IdmtConstants, q: &IdmtQuantities) -> EvalResult<Outcome> {
    let n = guard::restraint_ratio(q.voltage, q.nominal_voltage);
    let multiple = q.current / (q.pickup * q.ct_secondary * n);
    trace!(restraint = n, multiple = multiple, "idmt multiple of pickup");

    settle(guard::idmt_margin(multiple, curve).map(|margin| {
        curve.a * q.dial / margin + curve.b * q.pickup + curve.k
    }))
}

/// `t = TMS * k / (x^E - 1) + adder` with `x = I / pickup`.
pub fn iec_trip_time(curve: &IecConstants, q: &IecQuantities) -> EvalResult<Outcome> {
    let multiple = q.current / q.pickup;
    trace!(multiple = multiple, "iec multiple of pickup");

    settle(
        guard::iec_margin(multiple, curve)
            .map(|margin| q.multiplier * curve.k / margin + q.time_adder),
    )
}

/// `t = delay / (1 - V / pickup)`, operating only below pickup.
///
/// The time is never shorter than `delay`; `ElementInputBuilder` rejects delays
/// below the millisecond resolution, so the rounded time is strictly positive.
pub fn undervoltage_trip_time(q: &UndervoltageQuantities) -> EvalResult<Outcome> {
    settle(guard::undervoltage_margin(q.voltage, q.pickup).map(|margin| q.delay / margin))
}

/// `t = TM / (ratio^exp - 1)` with `ratio = (V/f) / (Vnom/fnom * pickup)`.
pub fn volts_per_hertz_trip_time(
    curve: &VoltsPerHertzConstants,
    q: &VoltsPerHertzQuantities,
) -> EvalResult<Outcome> {
    let volts_per_hertz = q.voltage / q.frequency;
    let nominal_volts_per_hertz = q.nominal_voltage / q.nominal_frequency;
    let ratio = volts_per_hertz / (nominal_volts_per_hertz * q.pickup);
    trace!(ratio = ratio, "volts-per-hertz ratio to pickup");

    settle(guard::volts_per_hertz_margin(ratio, curve).map(|margin| q.time_multiplier / margin))
}

/// Per-unit volts/hertz `(V/Vnom) / (f/fnom)` for display and monitoring.
pub fn per_unit_volts_per_hertz(
    voltage: f64,
    frequency: f64,
    nominal_voltage: f64,
    nominal_frequency: f64,
) -> f64 {
    (voltage / nominal_voltage) / (frequency / nominal_frequency)
}

/// Evaluate `input` against `curve`, choosing the formula from the curve shape.
///
/// Only the formula-level checks run here. The low-voltage restraint gate is
/// not applied to IDMT curves, so `low_voltage_limit_percent` is ignored; go
/// through the 51V element (`rt_elements::VoltageRestrainedOvercurrent`) to
/// get it.
///
/// Fails when the input lacks a quantity the formula needs, or when the
/// settings overflow the trip time.
pub fn evaluate(curve: &CurveSpec, input: &ElementInput) -> EvalResult<Outcome> {
    let outcome = match &curve.shape {
        CurveShape::Idmt(constants) => idmt_trip_time(constants, &idmt_quantities(input)?)?,
        CurveShape::Iec(constants) => iec_trip_time(constants, &iec_quantities(input)?)?,
        CurveShape::InverseUndervoltage => undervoltage_trip_time(&undervoltage_quantities(input)?)?,
        CurveShape::VoltsPerHertz(constants) => {
            volts_per_hertz_trip_time(constants, &volts_per_hertz_quantities(input)?)?
        }
    };
    trace!(curve = curve.id, %outcome, "evaluated");
    Ok(outcome)
}

pub(crate) fn idmt_quantities(input: &ElementInput) -> EvalResult<IdmtQuantities> {
    Ok(IdmtQuantities {
        dial: ElementInput::require(input.multiplier(), "time dial")?,
        current: ElementInput::require(input.measured_current(), "measured current")?,
        pickup: ElementInput::require(input.pickup_current(), "pickup current")?,
        ct_secondary: input.ct_secondary(),
        voltage: ElementInput::require(input.measured_voltage(), "measured voltage")?,
        nominal_voltage: input.nominal_voltage(),
    })
}

pub(crate) fn iec_quantities(input: &ElementInput) -> EvalResult<IecQuantities> {
    Ok(IecQuantities {
        multiplier: ElementInput::require(input.multiplier(), "time multiplier")?,
        current: ElementInput::require(input.measured_current(), "measured current")?,
        pickup: ElementInput::require(input.pickup_current(), "pickup current")?,
        time_adder: input.time_adder(),
    })
}

pub(crate) fn undervoltage_quantities(input: &ElementInput) -> EvalResult<UndervoltageQuantities> {
    Ok(UndervoltageQuantities {
        delay: ElementInput::require(input.delay_setting(), "delay setting")?,
        voltage: ElementInput::require(input.measured_voltage(), "measured voltage")?,
        pickup: ElementInput::require(input.pickup_voltage(), "pickup voltage")?,
    })
}

pub(crate) fn volts_per_hertz_quantities(
    input: &ElementInput,
) -> EvalResult<VoltsPerHertzQuantities> {
    Ok(VoltsPerHertzQuantities {
        time_multiplier: ElementInput::require(input.multiplier(), "time multiplier")?,
        voltage: ElementInput::require(input.measured_voltage(), "measured voltage")?,
        frequency: ElementInput::require(input.measured_frequency(), "measured frequency")?,
        nominal_voltage: input.nominal_voltage(),
        nominal_frequency: input.nominal_frequency(),
        pickup: ElementInput::require(input.pickup_per_unit(), "volts-per-hertz pickup")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::outcome::{Reason, Status};
    use rt_core::units::{amps, volts};

    fn a14() -> IdmtConstants {
        match rt_curves::lookup("A-14").unwrap().shape {
            CurveShape::Idmt(c) => c,
            other => panic!("unexpected shape {other:?}"),
        }
    }

    fn be3(dial: f64, voltage: f64) -> IdmtQuantities {
        IdmtQuantities {
            dial,
            current: 9.4,
            pickup: 4.7,
            ct_secondary: 1.0,
            voltage,
            nominal_voltage: 11.0,
        }
    }

    #[test]
    fn idmt_a14_reference_cases() {
        let curve = a14();
        assert_eq!(idmt_trip_time(&curve, &be3(1.0, 11.0)).unwrap().trip_time_s(), Some(1.401));
        assert_eq!(idmt_trip_time(&curve, &be3(1.0, 5.5)).unwrap().trip_time_s(), Some(0.476));
        assert_eq!(idmt_trip_time(&curve, &be3(9.7, 11.0)).unwrap().trip_time_s(), Some(13.345));
    }

    #[test]
    fn idmt_fixed_time_adds_pickup_term() {
        let curve = match rt_curves::lookup("A-17").unwrap().shape {
            CurveShape::Idmt(c) => c,
            other => panic!("unexpected shape {other:?}"),
        };
        // Tt = 0 + 1.0 * 4.7 + 0.028
        assert_eq!(idmt_trip_time(&curve, &be3(1.0, 11.0)).unwrap().trip_time_s(), Some(4.728));
    }

    #[test]
    fn idmt_negative_current_with_fractional_exponent() {
        let q = IdmtQuantities {
            current: -9.4,
            ..be3(1.0, 11.0)
        };
        assert_eq!(
            idmt_trip_time(&a14(), &q).unwrap().reason(),
            Some(Reason::NegativeRadicand)
        );
    }

    #[test]
    fn iec_curve_a_reference_case() {
        let curve = IecConstants { k: 0.14, e: 0.02 };
        let q = IecQuantities {
            multiplier: 1.0,
            current: 10.0,
            pickup: 1.0,
            time_adder: 0.0,
        };
        assert_eq!(iec_trip_time(&curve, &q).unwrap().trip_time_s(), Some(2.971));
    }

    #[test]
    fn iec_time_adder_is_an_offset() {
        let curve = IecConstants { k: 13.5, e: 1.0 };
        let q = IecQuantities {
            multiplier: 0.1,
            current: 4.0,
            pickup: 1.0,
            time_adder: 0.25,
        };
        // 0.1 * 13.5 / 3 + 0.25
        assert_eq!(iec_trip_time(&curve, &q).unwrap().trip_time_s(), Some(0.7));
    }

    #[test]
    fn undervoltage_reference_case() {
        let q = UndervoltageQuantities {
            delay: 10.0,
            voltage: 5.5,
            pickup: 8.8,
        };
        assert_eq!(undervoltage_trip_time(&q).unwrap().trip_time_s(), Some(26.667));
    }

    #[test]
    fn undervoltage_at_zero_voltage_is_the_delay() {
        let q = UndervoltageQuantities {
            delay: 2.0,
            voltage: 0.0,
            pickup: 8.8,
        };
        assert_eq!(undervoltage_trip_time(&q).unwrap().trip_time_s(), Some(2.0));
    }

    #[test]
    fn volts_per_hertz_shapes() {
        let q = VoltsPerHertzQuantities {
            time_multiplier: 1.0,
            voltage: 12_100.0,
            frequency: 50.0,
            nominal_voltage: 11_000.0,
            nominal_frequency: 50.0,
            pickup: 1.05,
        };
        let expected = [(2.0, 10.256), (1.0, 21.0), (0.5, 42.494)];
        for (exponent, seconds) in expected {
            let outcome = volts_per_hertz_trip_time(&VoltsPerHertzConstants { exponent }, &q).unwrap();
            assert_eq!(outcome.trip_time_s(), Some(seconds), "exponent {exponent}");
        }
    }

    #[test]
    fn volts_per_hertz_below_pickup_does_not_operate() {
        // 11 kV at 52 Hz against a 2.0 pu pickup
        let q = VoltsPerHertzQuantities {
            time_multiplier: 1.0,
            voltage: 11_000.0,
            frequency: 52.0,
            nominal_voltage: 11_000.0,
            nominal_frequency: 50.0,
            pickup: 2.0,
        };
        let outcome =
            volts_per_hertz_trip_time(&VoltsPerHertzConstants { exponent: 0.5 }, &q).unwrap();
        assert_eq!(outcome.status(), Status::NotOperated);
        assert_eq!(outcome.trip_time_s(), None);
    }

    #[test]
    fn volts_per_hertz_negative_voltage_under_root() {
        let q = VoltsPerHertzQuantities {
            time_multiplier: 1.0,
            voltage: -12_100.0,
            frequency: 50.0,
            nominal_voltage: 11_000.0,
            nominal_frequency: 50.0,
            pickup: 1.05,
        };
        let outcome =
            volts_per_hertz_trip_time(&VoltsPerHertzConstants { exponent: 0.5 }, &q).unwrap();
        assert_eq!(outcome.reason(), Some(Reason::NegativeRadicand));
        assert_eq!(outcome.status(), Status::Invalid);
    }

    #[test]
    fn per_unit_reference_case() {
        let pu = per_unit_volts_per_hertz(11_000.0, 52.0, 11_000.0, 50.0);
        assert!((pu - 0.961_538_461_538_461_5).abs() < 1e-12);
    }

    #[test]
    fn evaluate_dispatches_on_shape() {
        let input = ElementInput::builder()
            .multiplier(1.0)
            .measured_current(amps(10.0))
            .pickup_current(amps(1.0))
            .build()
            .unwrap();
        let outcome = evaluate(rt_curves::lookup("IEC-A").unwrap(), &input).unwrap();
        assert_eq!(outcome.trip_time_s(), Some(2.971));
    }

    #[test]
    fn evaluate_leaves_the_restraint_gate_to_the_element() {
        let input = ElementInput::builder()
            .multiplier(1.0)
            .measured_current(amps(9.4))
            .pickup_current(amps(4.7))
            .measured_voltage(volts(0.0))
            .build()
            .unwrap();
        // Collapsed voltage only clamps the restraint ratio at 0.2 here
        let outcome = evaluate(rt_curves::lookup("A-14").unwrap(), &input).unwrap();
        assert_eq!(outcome.status(), Status::Tripped);
    }

    #[test]
    fn overflowing_settings_are_an_error_not_a_boundary() {
        let input = ElementInput::builder()
            .multiplier(1e307)
            .measured_current(amps(1.5))
            .pickup_current(amps(1.0))
            .build()
            .unwrap();
        let curve = rt_curves::lookup("IEC-C").unwrap();
        // TMS * k = 8e308 is already past f64::MAX
        assert!(matches!(
            evaluate(curve, &input),
            Err(EvalError::NonFinite {
                what: "trip time",
                ..
            })
        ));
    }

    #[test]
    fn evaluate_reports_missing_quantities() {
        let input = ElementInput::builder()
            .multiplier(1.0)
            .measured_voltage(volts(5_500.0))
            .build()
            .unwrap();
        let err = evaluate(rt_curves::lookup("UV").unwrap(), &input).unwrap_err();
        assert_eq!(
            err,
            EvalError::MissingInput {
                what: "delay setting"
            }
        );
    }
}
