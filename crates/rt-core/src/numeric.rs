use crate::RtError;

/// Floating point type used throughout the engine
pub type Real = f64;

/// Resolution of every reported trip time (seconds).
pub const TIME_RESOLUTION_S: Real = 1e-3;

const MILLIS_PER_SECOND: Real = 1000.0;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, RtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RtError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, RtError> {
    ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(RtError::OutOfRange { what, value: v })
    }
}

/// Finite and greater than or equal to zero.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, RtError> {
    ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(RtError::OutOfRange { what, value: v })
    }
}

/// Clamp a value between min and max.
pub fn clamp(value: Real, min: Real, max: Real) -> Real {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Round a time in seconds to the nearest millisecond.
///
/// `-0.0` is normalised to `0.0` so a rounded time never reports a negative sign.
pub fn round_millis(seconds: Real) -> Real {
    // Dividing the integral count gives the same double as the decimal literal.
    let rounded = (seconds * MILLIS_PER_SECOND).round() / MILLIS_PER_SECOND;
    if rounded == 0.0 { 0.0 } else { rounded }
}
