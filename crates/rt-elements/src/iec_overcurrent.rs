//! IEC inverse-time overcurrent element (51).

use crate::error::ElementResult;
use crate::traits::ProtectionElement;
use rt_curves::{CurveFamily, CurveSpec};
use rt_eval::{ElementInput, Outcome};

#[derive(Debug, Clone)]
pub struct IecOvercurrent {
    name: String,
}

impl IecOvercurrent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for IecOvercurrent {
    fn default() -> Self {
        Self::new("51")
    }
}

impl ProtectionElement for IecOvercurrent {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> CurveFamily {
        CurveFamily::Iec
    }

    fn evaluate_curve(&self, curve: &CurveSpec, input: &ElementInput) -> ElementResult<Outcome> {
        self.ensure_family(curve)?;
        Ok(rt_eval::evaluate(curve, input)?)
    }
}
