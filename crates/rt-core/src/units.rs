// rt-core/src/units.rs

use uom::si::f64::{
    ElectricCurrent as UomElectricCurrent, ElectricPotential as UomElectricPotential,
    Frequency as UomFrequency, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Current = UomElectricCurrent;
pub type Voltage = UomElectricPotential;
pub type Frequency = UomFrequency;
pub type Time = UomTime;

#[inline]
pub fn amps(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

#[inline]
pub fn volts(v: f64) -> Voltage {
    use uom::si::electric_potential::volt;
    Voltage::new::<volt>(v)
}

#[inline]
pub fn kilovolts(v: f64) -> Voltage {
    use uom::si::electric_potential::kilovolt;
    Voltage::new::<kilovolt>(v)
}

#[inline]
pub fn hertz(v: f64) -> Frequency {
    use uom::si::frequency::hertz;
    Frequency::new::<hertz>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

pub mod constants {
    /// Nominal system frequency assumed when none is configured (Hz).
    pub const NOMINAL_FREQUENCY_HZ: f64 = 50.0;

    /// Nominal phase-to-phase voltage assumed when none is configured (V).
    pub const NOMINAL_VOLTAGE_V: f64 = 11_000.0;
}
