//! Voltage-restrained IDMT overcurrent element (51V).

use crate::error::ElementResult;
use crate::traits::ProtectionElement;
use rt_curves::{CurveFamily, CurveSpec};
use rt_eval::guard::voltage_restraint;
use rt_eval::{ElementInput, Outcome};

/// BE3/IEEE overcurrent element whose pickup drops with measured voltage.
///
/// When the voltage is at or below the low-voltage limit the element is
/// blocked and reports `VoltageTooLow`; the undervoltage element covers that
/// region.
#[derive(Debug, Clone)]
pub struct VoltageRestrainedOvercurrent {
    name: String,
}

impl VoltageRestrainedOvercurrent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for VoltageRestrainedOvercurrent {
    fn default() -> Self {
        Self::new("51V")
    }
}

impl ProtectionElement for VoltageRestrainedOvercurrent {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> CurveFamily {
        CurveFamily::Idmt
    }

    fn evaluate_curve(&self, curve: &CurveSpec, input: &ElementInput) -> ElementResult<Outcome> {
        self.ensure_family(curve)?;

        let voltage = ElementInput::require(input.measured_voltage(), "measured voltage")?;
        if let Err(reason) = voltage_restraint(
            voltage,
            input.nominal_voltage(),
            input.low_voltage_limit_percent(),
        ) {
            return Ok(Outcome::rejected(reason));
        }

        Ok(rt_eval::evaluate(curve, input)?)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rt_core::units::{amps, volts};

    fn input(voltage: f64) -> ElementInput {
        ElementInput::builder()
            .multiplier(1.0)
            .measured_current(amps(9.4))
            .pickup_current(amps(1.5))
            .measured_voltage(volts(voltage))
            .low_voltage_limit_percent(5.0)
            .build()
            .unwrap()
    }

    proptest! {
        #[test]
        fn voltage_above_nominal_does_not_change_trip_time(scale in 1.0_f64..2.0) {
            let element = VoltageRestrainedOvercurrent::default();
            let at_nominal = element.evaluate("A-14", &input(11_000.0)).unwrap();
            let above = element.evaluate("A-14", &input(11_000.0 * scale)).unwrap();
            prop_assert_eq!(at_nominal, above);
        }

        #[test]
        fn voltage_below_floor_does_not_change_trip_time(fraction in 0.06_f64..0.19) {
            let element = VoltageRestrainedOvercurrent::default();
            let reference = element.evaluate("A-8", &input(1_100.0)).unwrap();
            let below = element.evaluate("A-8", &input(11_000.0 * fraction)).unwrap();
            prop_assert_eq!(reference, below);
        }
    }
}
