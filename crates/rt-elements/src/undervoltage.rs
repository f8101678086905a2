//! Inverse-time undervoltage element (27).

use crate::error::ElementResult;
use crate::traits::ProtectionElement;
use rt_curves::{CurveFamily, CurveSpec};
use rt_eval::{ElementInput, Outcome};

/// Identifier of the single undervoltage characteristic.
pub const DEFAULT_CURVE: &str = "UV";

/// Operates when the measured voltage falls below pickup, faster the deeper the dip.
#[derive(Debug, Clone)]
pub struct UndervoltageElement {
    name: String,
}

impl UndervoltageElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Evaluate against the inverse-time undervoltage curve.
    pub fn evaluate_default(&self, input: &ElementInput) -> ElementResult<Outcome> {
        self.evaluate(DEFAULT_CURVE, input)
    }
}

impl Default for UndervoltageElement {
    fn default() -> Self {
        Self::new("27")
    }
}

impl ProtectionElement for UndervoltageElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> CurveFamily {
        CurveFamily::Undervoltage
    }

    fn evaluate_curve(&self, curve: &CurveSpec, input: &ElementInput) -> ElementResult<Outcome> {
        self.ensure_family(curve)?;
        Ok(rt_eval::evaluate(curve, input)?)
    }
}
