//! Differential coding of the per-tile DC terms.
//!
//! Neighboring tiles share similar average intensity, so storing each DC
//! term as a delta against its predecessor concentrates the values near
//! zero before entropy coding.

use crate::error::{Error, Result};

/// Replaces each value after the first with its difference from the
/// previous value. Errors on an empty sequence.
pub fn encode(values: &[i16]) -> Result<Vec<i32>> {
    if values.is_empty() {
        return Err(Error::EmptyInput("dc sequence"));
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(values[0] as i32);
    for pair in values.windows(2) {
        out.push(pair[1] as i32 - pair[0] as i32);
    }
    Ok(out)
}

/// Rebuilds the original values by running summation. Errors on an empty
/// sequence and when a reconstructed value falls outside the `i16` range.
pub fn decode(diffs: &[i32]) -> Result<Vec<i16>> {
    if diffs.is_empty() {
        return Err(Error::EmptyInput("dc difference sequence"));
    }
    let mut out = Vec::with_capacity(diffs.len());
    let mut acc = 0i64;
    for &diff in diffs {
        acc += diff as i64;
        let value = i16::try_from(acc).map_err(|_| {
            Error::InvalidDecode(format!("dc term {acc} overflows the coefficient range"))
        })?;
        out.push(value);
    }
    Ok(out)
}
