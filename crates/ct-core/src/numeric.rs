//! Guards and small helpers for plain `f64` inputs.

use crate::CtError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, CtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CtError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`.
pub fn ensure_non_negative(v: f64, what: &'static str) -> Result<f64, CtError> {
    match ensure_finite(v, what)? {
        v if v < 0.0 => Err(CtError::InvalidArg { what }),
        v => Ok(v),
    }
}

/// `a` at `t = 0`, `b` at `t = 1`; `t` is not clamped.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
