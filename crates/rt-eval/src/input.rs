//! Per-evaluation settings and measurements.

use crate::error::{EvalError, EvalResult};
use rt_core::RtError;
use rt_core::numeric::{TIME_RESOLUTION_S, ensure_non_negative, ensure_positive};
use rt_core::units::constants::{NOMINAL_FREQUENCY_HZ, NOMINAL_VOLTAGE_V};
use rt_core::units::{Current, Frequency, Time, Voltage};
use serde::Serialize;
use std::fmt;

/// Values substituted for settings the caller leaves out.
///
/// Built once per call and passed to the builder; the engine never fills
/// defaults on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputDefaults {
    /// CT primary rating (A)
    pub ct_primary: f64,
    /// CT secondary rating (A)
    pub ct_secondary: f64,
    /// Nominal phase-to-phase voltage (V)
    pub nominal_voltage: f64,
    /// VT secondary rating (V)
    pub vt_secondary: f64,
    /// Nominal frequency (Hz)
    pub nominal_frequency: f64,
    /// Voltage restraint threshold, percent of nominal
    pub low_voltage_limit_percent: f64,
    /// Fixed offset added to IEC trip times (s)
    pub time_adder: f64,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            ct_primary: 1.0,
            ct_secondary: 1.0,
            nominal_voltage: NOMINAL_VOLTAGE_V,
            vt_secondary: 110.0,
            nominal_frequency: NOMINAL_FREQUENCY_HZ,
            low_voltage_limit_percent: 20.0,
            time_adder: 0.0,
        }
    }
}

/// Scale a primary-side current to the relay secondary through the CT ratio.
pub fn refer_current_to_secondary(primary: f64, ct_primary: f64, ct_secondary: f64) -> f64 {
    primary * ct_secondary / ct_primary
}

/// Scale a primary-side voltage to the relay secondary through the VT ratio.
pub fn refer_voltage_to_secondary(primary: f64, nominal_primary: f64, vt_secondary: f64) -> f64 {
    primary * vt_secondary / nominal_primary
}

/// Which measured quantity a derived input replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measured {
    Current,
    Voltage,
    Frequency,
}

impl fmt::Display for Measured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current (A)"),
            Self::Voltage => write!(f, "voltage (V)"),
            Self::Frequency => write!(f, "frequency (Hz)"),
        }
    }
}

/// Validated settings and measurements for one evaluation.
///
/// Quantities are stored in SI base units. Element-specific quantities are
/// optional; the element that needs one reports `MissingInput` when it is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementInput {
    multiplier: Option<f64>,
    measured_current: Option<f64>,
    measured_voltage: Option<f64>,
    measured_frequency: Option<f64>,
    pickup_current: Option<f64>,
    pickup_voltage: Option<f64>,
    pickup_per_unit: Option<f64>,
    delay_setting: Option<f64>,
    nominal_voltage: f64,
    nominal_frequency: f64,
    ct_secondary: f64,
    low_voltage_limit_percent: f64,
    time_adder: f64,
}

impl ElementInput {
    pub fn builder() -> ElementInputBuilder {
        ElementInputBuilder::new(InputDefaults::default())
    }

    pub fn builder_with(defaults: InputDefaults) -> ElementInputBuilder {
        ElementInputBuilder::new(defaults)
    }

    /// Time dial, time multiplier setting or volts-per-hertz time multiplier.
    pub fn multiplier(&self) -> Option<f64> {
        self.multiplier
    }

    pub fn measured_current(&self) -> Option<f64> {
        self.measured_current
    }

    pub fn measured_voltage(&self) -> Option<f64> {
        self.measured_voltage
    }

    pub fn measured_frequency(&self) -> Option<f64> {
        self.measured_frequency
    }

    pub fn pickup_current(&self) -> Option<f64> {
        self.pickup_current
    }

    pub fn pickup_voltage(&self) -> Option<f64> {
        self.pickup_voltage
    }

    /// Volts-per-hertz pickup in per-unit of nominal V/Hz.
    pub fn pickup_per_unit(&self) -> Option<f64> {
        self.pickup_per_unit
    }

    pub fn delay_setting(&self) -> Option<f64> {
        self.delay_setting
    }

    pub fn nominal_voltage(&self) -> f64 {
        self.nominal_voltage
    }

    pub fn nominal_frequency(&self) -> f64 {
        self.nominal_frequency
    }

    pub fn ct_secondary(&self) -> f64 {
        self.ct_secondary
    }

    pub fn low_voltage_limit_percent(&self) -> f64 {
        self.low_voltage_limit_percent
    }

    pub fn time_adder(&self) -> f64 {
        self.time_adder
    }

    /// Unwrap an element-specific quantity or report it missing.
    pub fn require(value: Option<f64>, what: &'static str) -> EvalResult<f64> {
        value.ok_or(EvalError::MissingInput { what })
    }

    /// A copy with one measured quantity replaced (SI units), validated like the builder input.
    pub fn with_measured(&self, which: Measured, value: f64) -> EvalResult<Self> {
        let mut next = *self;
        match which {
            Measured::Current => {
                next.measured_current = Some(ensure_non_negative(value, "measured current")?);
            }
            Measured::Voltage => {
                next.measured_voltage = Some(ensure_non_negative(value, "measured voltage")?);
            }
            Measured::Frequency => {
                next.measured_frequency = Some(ensure_positive(value, "measured frequency")?);
            }
        }
        Ok(next)
    }
}

/// Collects settings, fills the rest from `InputDefaults`, validates on `build`.
#[derive(Debug, Clone)]
pub struct ElementInputBuilder {
    defaults: InputDefaults,
    multiplier: Option<f64>,
    measured_current: Option<f64>,
    measured_voltage: Option<f64>,
    measured_frequency: Option<f64>,
    pickup_current: Option<f64>,
    pickup_voltage: Option<f64>,
    pickup_per_unit: Option<f64>,
    delay_setting: Option<f64>,
    nominal_voltage: Option<f64>,
    nominal_frequency: Option<f64>,
    ct_secondary: Option<f64>,
    low_voltage_limit_percent: Option<f64>,
    time_adder: Option<f64>,
}

impl ElementInputBuilder {
    pub fn new(defaults: InputDefaults) -> Self {
        Self {
            defaults,
            multiplier: None,
            measured_current: None,
            measured_voltage: None,
            measured_frequency: None,
            pickup_current: None,
            pickup_voltage: None,
            pickup_per_unit: None,
            delay_setting: None,
            nominal_voltage: None,
            nominal_frequency: None,
            ct_secondary: None,
            low_voltage_limit_percent: None,
            time_adder: None,
        }
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    pub fn measured_current(mut self, current: Current) -> Self {
        self.measured_current = Some(current.value);
        self
    }

    pub fn measured_voltage(mut self, voltage: Voltage) -> Self {
        self.measured_voltage = Some(voltage.value);
        self
    }

    pub fn measured_frequency(mut self, frequency: Frequency) -> Self {
        self.measured_frequency = Some(frequency.value);
        self
    }

    pub fn pickup_current(mut self, current: Current) -> Self {
        self.pickup_current = Some(current.value);
        self
    }

    pub fn pickup_voltage(mut self, voltage: Voltage) -> Self {
        self.pickup_voltage = Some(voltage.value);
        self
    }

    pub fn pickup_per_unit(mut self, pickup: f64) -> Self {
        self.pickup_per_unit = Some(pickup);
        self
    }

    pub fn delay_setting(mut self, delay: Time) -> Self {
        self.delay_setting = Some(delay.value);
        self
    }

    pub fn nominal_voltage(mut self, voltage: Voltage) -> Self {
        self.nominal_voltage = Some(voltage.value);
        self
    }

    pub fn nominal_frequency(mut self, frequency: Frequency) -> Self {
        self.nominal_frequency = Some(frequency.value);
        self
    }

    pub fn ct_secondary(mut self, ct_secondary: f64) -> Self {
        self.ct_secondary = Some(ct_secondary);
        self
    }

    pub fn low_voltage_limit_percent(mut self, percent: f64) -> Self {
        self.low_voltage_limit_percent = Some(percent);
        self
    }

    pub fn time_adder(mut self, adder: Time) -> Self {
        self.time_adder = Some(adder.value);
        self
    }

    pub fn build(self) -> EvalResult<ElementInput> {
        let d = self.defaults;

        let low_voltage_limit_percent = ensure_non_negative(
            self.low_voltage_limit_percent
                .unwrap_or(d.low_voltage_limit_percent),
            "low voltage limit percent",
        )?;
        if low_voltage_limit_percent > 100.0 {
            return Err(EvalError::InvalidInput {
                what: "low voltage limit percent",
                value: low_voltage_limit_percent,
            });
        }

        Ok(ElementInput {
            multiplier: optional(self.multiplier, "multiplier", ensure_positive)?,
            measured_current: optional(
                self.measured_current,
                "measured current",
                ensure_non_negative,
            )?,
            measured_voltage: optional(
                self.measured_voltage,
                "measured voltage",
                ensure_non_negative,
            )?,
            measured_frequency: optional(
                self.measured_frequency,
                "measured frequency",
                ensure_positive,
            )?,
            pickup_current: optional(self.pickup_current, "pickup current", ensure_positive)?,
            pickup_voltage: optional(self.pickup_voltage, "pickup voltage", ensure_positive)?,
            pickup_per_unit: optional(self.pickup_per_unit, "pickup per unit", ensure_positive)?,
            delay_setting: optional(self.delay_setting, "delay setting", ensure_delay)?,
            nominal_voltage: ensure_positive(
                self.nominal_voltage.unwrap_or(d.nominal_voltage),
                "nominal voltage",
            )?,
            nominal_frequency: ensure_positive(
                self.nominal_frequency.unwrap_or(d.nominal_frequency),
                "nominal frequency",
            )?,
            ct_secondary: ensure_positive(
                self.ct_secondary.unwrap_or(d.ct_secondary),
                "ct secondary",
            )?,
            low_voltage_limit_percent,
            time_adder: ensure_non_negative(self.time_adder.unwrap_or(d.time_adder), "time adder")?,
        })
    }
}

/// A delay below the reported time resolution would round a trip to 0 s.
fn ensure_delay(v: f64, what: &'static str) -> Result<f64, RtError> {
    let v = ensure_positive(v, what)?;
    if v < TIME_RESOLUTION_S {
        return Err(RtError::OutOfRange { what, value: v });
    }
    Ok(v)
}

fn optional(
    value: Option<f64>,
    what: &'static str,
    check: fn(f64, &'static str) -> Result<f64, RtError>,
) -> EvalResult<Option<f64>> {
    value.map(|v| check(v, what)).transpose().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rt_core::units::{amps, hertz, kilovolts, s, volts};

    #[test]
    fn defaults_fill_absent_settings() {
        let input = ElementInput::builder()
            .multiplier(1.0)
            .measured_current(amps(9.4))
            .pickup_current(amps(4.7))
            .build()
            .unwrap();

        assert_eq!(input.nominal_voltage(), 11_000.0);
        assert_eq!(input.nominal_frequency(), 50.0);
        assert_eq!(input.ct_secondary(), 1.0);
        assert_eq!(input.low_voltage_limit_percent(), 20.0);
        assert_eq!(input.time_adder(), 0.0);
        assert_eq!(input.measured_voltage(), None);
    }

    #[test]
    fn custom_defaults_record_is_used() {
        let defaults = InputDefaults {
            ct_secondary: 5.0,
            nominal_frequency: 60.0,
            ..InputDefaults::default()
        };
        let input = ElementInput::builder_with(defaults).build().unwrap();
        assert_eq!(input.ct_secondary(), 5.0);
        assert_eq!(input.nominal_frequency(), 60.0);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let input = ElementInput::builder()
            .nominal_voltage(kilovolts(33.0))
            .nominal_frequency(hertz(60.0))
            .time_adder(s(0.05))
            .build()
            .unwrap();
        assert_eq!(input.nominal_voltage(), 33_000.0);
        assert_eq!(input.nominal_frequency(), 60.0);
        assert_eq!(input.time_adder(), 0.05);
    }

    #[test]
    fn rejects_non_positive_settings() {
        let err = ElementInput::builder()
            .multiplier(0.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::InvalidInput {
                what: "multiplier",
                value: 0.0
            }
        );

        let err = ElementInput::builder()
            .pickup_current(amps(-4.7))
            .build()
            .unwrap_err();
        assert!(matches!(err, EvalError::InvalidInput { what: "pickup current", .. }));
    }

    #[test]
    fn rejects_delays_that_would_round_to_zero() {
        for delay in [0.0, 0.000_4] {
            let err = ElementInput::builder()
                .delay_setting(s(delay))
                .build()
                .unwrap_err();
            assert_eq!(
                err,
                EvalError::InvalidInput {
                    what: "delay setting",
                    value: delay
                }
            );
        }
        let input = ElementInput::builder()
            .delay_setting(s(0.001))
            .build()
            .unwrap();
        assert_eq!(input.delay_setting(), Some(0.001));
    }

    #[test]
    fn rejects_non_finite_measurements() {
        let err = ElementInput::builder()
            .measured_voltage(volts(f64::NAN))
            .build()
            .unwrap_err();
        assert!(matches!(err, EvalError::NonFinite { what: "measured voltage", .. }));
    }

    #[test]
    fn rejects_restraint_threshold_above_nominal() {
        let err = ElementInput::builder()
            .low_voltage_limit_percent(120.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, EvalError::InvalidInput { .. }));
    }

    #[test]
    fn zero_measurements_are_admissible() {
        let input = ElementInput::builder()
            .measured_current(amps(0.0))
            .measured_voltage(volts(0.0))
            .build()
            .unwrap();
        assert_eq!(input.measured_current(), Some(0.0));
    }

    #[test]
    fn require_reports_missing_quantity() {
        let input = ElementInput::builder().build().unwrap();
        assert_eq!(
            ElementInput::require(input.pickup_voltage(), "pickup voltage"),
            Err(EvalError::MissingInput {
                what: "pickup voltage"
            })
        );
    }

    #[test]
    fn with_measured_returns_a_validated_copy() {
        let base = ElementInput::builder()
            .measured_current(amps(2.0))
            .build()
            .unwrap();
        let next = base.with_measured(Measured::Current, 5.0).unwrap();
        assert_eq!(base.measured_current(), Some(2.0));
        assert_eq!(next.measured_current(), Some(5.0));
        assert!(base.with_measured(Measured::Frequency, 0.0).is_err());
    }

    #[test]
    fn referral_through_instrument_transformers() {
        // 800/5 CT: 1600 A primary is 10 A secondary
        assert!((refer_current_to_secondary(1600.0, 800.0, 5.0) - 10.0).abs() < 1e-12);
        // 11 kV / 110 V VT
        assert!((refer_voltage_to_secondary(5_500.0, 11_000.0, 110.0) - 55.0).abs() < 1e-12);
    }
}
