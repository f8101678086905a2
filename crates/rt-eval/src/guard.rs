//! Domain checks applied before any trip-time formula is evaluated.
//!
//! Each check either hands back the quantity the formula needs next or stops the
//! evaluation with a `Reason`. A `Reason` converts directly into an `Outcome`,
//! so callers short-circuit with `?` inside a function returning
//! `GuardResult<f64>` and convert once at the end.

use crate::outcome::Reason;
use rt_core::numeric::clamp;
use rt_curves::{IdmtConstants, IecConstants, VoltsPerHertzConstants};

pub type GuardResult<T> = Result<T, Reason>;

/// Lower clamp of the voltage restraint ratio.
pub const RESTRAINT_FLOOR: f64 = 0.2;
/// Upper clamp of the voltage restraint ratio.
pub const RESTRAINT_CEILING: f64 = 1.0;

/// Restraint ratio `n = clamp(V / Vnom, 0.2, 1.0)` scaling the effective pickup.
pub fn restraint_ratio(measured_voltage: f64, nominal_voltage: f64) -> f64 {
    clamp(
        measured_voltage / nominal_voltage,
        RESTRAINT_FLOOR,
        RESTRAINT_CEILING,
    )
}

/// Voltage restraint gate.
///
/// Blocks the overcurrent element when `V <= (limit% / 100) * Vnom`, otherwise
/// returns the restraint ratio.
pub fn voltage_restraint(
    measured_voltage: f64,
    nominal_voltage: f64,
    low_voltage_limit_percent: f64,
) -> GuardResult<f64> {
    if measured_voltage <= low_voltage_limit_percent / 100.0 * nominal_voltage {
        return Err(Reason::VoltageTooLow);
    }
    Ok(restraint_ratio(measured_voltage, nominal_voltage))
}

/// `base^exponent`, refusing fractional powers of negative bases.
pub fn checked_power(base: f64, exponent: f64) -> GuardResult<f64> {
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(Reason::NegativeRadicand);
    }
    Ok(base.powf(exponent))
}

/// Operating margin of an inverse characteristic: `powered - threshold`.
///
/// Exactly zero is the curve's asymptote. Below the threshold, or with the raw
/// multiple below 1, the element has not picked up.
fn operating_margin(multiple: f64, powered: f64, threshold: f64) -> GuardResult<f64> {
    if powered == threshold {
        return Err(Reason::AtPickupBoundary);
    }
    if powered < threshold || multiple < 1.0 {
        return Err(Reason::NotPickedUp);
    }
    Ok(powered - threshold)
}

/// Denominator `M^N - C` of the BE3/IEEE formula.
pub fn idmt_margin(multiple: f64, curve: &IdmtConstants) -> GuardResult<f64> {
    let powered = checked_power(multiple, curve.n)?;
    operating_margin(multiple, powered, curve.c)
}

/// Denominator `x^E - 1` of the IEC formula.
pub fn iec_margin(multiple: f64, curve: &IecConstants) -> GuardResult<f64> {
    let powered = checked_power(multiple, curve.e)?;
    operating_margin(multiple, powered, 1.0)
}

/// Denominator `ratio^exp - 1` of the volts-per-hertz formula.
pub fn volts_per_hertz_margin(ratio: f64, curve: &VoltsPerHertzConstants) -> GuardResult<f64> {
    let powered = checked_power(ratio, curve.exponent)?;
    operating_margin(ratio, powered, 1.0)
}

/// Undervoltage direction: only `V < pickup` operates. Returns `1 - V/pickup`.
pub fn undervoltage_margin(measured_voltage: f64, pickup_voltage: f64) -> GuardResult<f64> {
    if measured_voltage >= pickup_voltage {
        return Err(Reason::NotPickedUp);
    }
    Ok(1.0 - measured_voltage / pickup_voltage)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A14: IdmtConstants = IdmtConstants {
        a: 1.4636,
        b: 0.0,
        c: 1.0,
        n: 1.0469,
        k: 0.028,
    };

    const FIXED_TIME: IdmtConstants = IdmtConstants {
        a: 0.0,
        b: 1.0,
        c: 0.0,
        n: 0.0,
        k: 0.028,
    };

    #[test]
    fn restraint_ratio_is_clamped() {
        assert_eq!(restraint_ratio(11_000.0, 11_000.0), 1.0);
        assert_eq!(restraint_ratio(13_000.0, 11_000.0), 1.0);
        assert_eq!(restraint_ratio(5_500.0, 11_000.0), 0.5);
        assert_eq!(restraint_ratio(1_000.0, 11_000.0), RESTRAINT_FLOOR);
    }

    #[test]
    fn gate_blocks_at_and_below_threshold() {
        assert_eq!(
            voltage_restraint(2_200.0, 11_000.0, 20.0),
            Err(Reason::VoltageTooLow)
        );
        assert_eq!(
            voltage_restraint(0.0, 11_000.0, 20.0),
            Err(Reason::VoltageTooLow)
        );
        assert_eq!(voltage_restraint(2_000.0, 11_000.0, 10.0), Ok(RESTRAINT_FLOOR));
        assert_eq!(voltage_restraint(5_500.0, 11_000.0, 20.0), Ok(0.5));
    }

    #[test]
    fn gate_with_zero_limit_only_blocks_dead_voltage() {
        assert_eq!(voltage_restraint(0.0, 11_000.0, 0.0), Err(Reason::VoltageTooLow));
        assert!(voltage_restraint(1.0, 11_000.0, 0.0).is_ok());
    }

    #[test]
    fn fractional_power_of_negative_is_rejected() {
        assert_eq!(checked_power(-0.25, 0.5), Err(Reason::NegativeRadicand));
        assert_eq!(checked_power(-2.0, 2.0), Ok(4.0));
        assert_eq!(checked_power(0.25, 0.5), Ok(0.5));
    }

    #[test]
    fn idmt_boundary_and_below_pickup() {
        assert_eq!(idmt_margin(1.0, &A14), Err(Reason::AtPickupBoundary));
        assert_eq!(idmt_margin(0.9, &A14), Err(Reason::NotPickedUp));
        let margin = idmt_margin(2.0, &A14).unwrap();
        assert!((margin - (2.0_f64.powf(1.0469) - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn fixed_time_curve_operates_from_pickup() {
        assert_eq!(idmt_margin(1.0, &FIXED_TIME), Ok(1.0));
        assert_eq!(idmt_margin(0.99, &FIXED_TIME), Err(Reason::NotPickedUp));
    }

    #[test]
    fn iec_boundary() {
        let curve_a = IecConstants { k: 0.14, e: 0.02 };
        assert_eq!(iec_margin(1.0, &curve_a), Err(Reason::AtPickupBoundary));
        assert_eq!(iec_margin(0.5, &curve_a), Err(Reason::NotPickedUp));
        assert!(iec_margin(10.0, &curve_a).unwrap() > 0.0);
    }

    #[test]
    fn volts_per_hertz_negative_ratio_under_root() {
        let curve_c = VoltsPerHertzConstants { exponent: 0.5 };
        let curve_a = VoltsPerHertzConstants { exponent: 2.0 };
        assert_eq!(
            volts_per_hertz_margin(-1.2, &curve_c),
            Err(Reason::NegativeRadicand)
        );
        // (-1.2)^2 > 1, but a negative ratio has not picked up
        assert_eq!(
            volts_per_hertz_margin(-1.2, &curve_a),
            Err(Reason::NotPickedUp)
        );
    }

    #[test]
    fn undervoltage_direction() {
        assert_eq!(undervoltage_margin(8.8, 8.8), Err(Reason::NotPickedUp));
        assert_eq!(undervoltage_margin(9.0, 8.8), Err(Reason::NotPickedUp));
        assert_eq!(undervoltage_margin(4.4, 8.8), Ok(0.5));
    }
}
