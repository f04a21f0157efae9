//! Float checks for values read from layout, option and state files.

use crate::RcError;

/// Reject NaN and infinities, naming the offending field.
pub fn require_finite(value: f64, what: &'static str) -> Result<f64, RcError> {
    match value.is_finite() {
        true => Ok(value),
        false => Err(RcError::NonFinite { what, value }),
    }
}

/// Check that a probability lies in [0, 1].
pub fn ensure_probability(p: f64, what: &'static str) -> Result<f64, RcError> {
    let p = require_finite(p, what)?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(RcError::InvalidArg { what })
    }
}

/// `Some(v)` only when `v` is present and finite.
pub fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}
