//! Volts-per-hertz (overfluxing) element (24).

use crate::error::ElementResult;
use crate::traits::ProtectionElement;
use rt_curves::{CurveFamily, CurveSpec};
use rt_eval::{ElementInput, Outcome, per_unit_volts_per_hertz};

#[derive(Debug, Clone)]
pub struct VoltsPerHertzElement {
    name: String,
}

impl VoltsPerHertzElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Measured V/Hz in per-unit of nominal, for monitoring.
    pub fn per_unit(&self, input: &ElementInput) -> ElementResult<f64> {
        let voltage = ElementInput::require(input.measured_voltage(), "measured voltage")?;
        let frequency = ElementInput::require(input.measured_frequency(), "measured frequency")?;
        Ok(per_unit_volts_per_hertz(
            voltage,
            frequency,
            input.nominal_voltage(),
            input.nominal_frequency(),
        ))
    }
}

impl Default for VoltsPerHertzElement {
    fn default() -> Self {
        Self::new("24")
    }
}

impl ProtectionElement for VoltsPerHertzElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> CurveFamily {
        CurveFamily::VoltsPerHertz
    }

    fn evaluate_curve(&self, curve: &CurveSpec, input: &ElementInput) -> ElementResult<Outcome> {
        self.ensure_family(curve)?;
        Ok(rt_eval::evaluate(curve, input)?)
    }
}
