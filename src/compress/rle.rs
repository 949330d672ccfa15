//! Byte-oriented run-length coding.
//!
//! Each group starts with a control byte read as `i8`: a negative value `-n`
//! is followed by `n` literal bytes, a non-negative value `c` is followed by
//! one byte repeated `c + 1` times. The encoder only emits repeat groups for
//! runs of at least [`MIN_RUN`] bytes, so high-entropy input grows by at most
//! one control byte per [`MAX_LITERAL`] literals.

use crate::error::{Error, Result};

/// Shortest run worth a repeat group.
const MIN_RUN: usize = 3;
/// Longest run one repeat group can describe (stored as `len - 1`).
const MAX_RUN: usize = 128;
/// Longest literal segment one group can carry.
const MAX_LITERAL: usize = 127;

/// Compresses `data`; the empty input maps to the empty output.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 2 + 16);
    let mut start = 0;

    while start < data.len() {
        let mut end = start + 1;
        while end < data.len() && data[end] == data[start] && end - start < MAX_RUN {
            end += 1;
        }

        if end - start >= MIN_RUN {
            out.push((end - start - 1) as u8);
            out.push(data[start]);
        } else {
            // literal segment: extend until a run begins or the group is full
            end = start + 1;
            while end < data.len() && end - start < MAX_LITERAL && !run_begins_at(data, end) {
                end += 1;
            }
            out.push(-((end - start) as i8) as u8);
            out.extend_from_slice(&data[start..end]);
        }
        start = end;
    }

    out
}

fn run_begins_at(data: &[u8], index: usize) -> bool {
    index + MIN_RUN <= data.len()
        && data[index] == data[index + 1]
        && data[index] == data[index + 2]
}

/// Decompresses a stream produced by [`compress`].
///
/// Any group that overruns the buffer is reported as [`Error::InvalidDecode`];
/// truncated input never yields partial output.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut pos = 0;

    while pos < data.len() {
        let control = data[pos] as i8;
        pos += 1;

        if control < 0 {
            let count = -(control as isize) as usize;
            if pos + count > data.len() {
                return Err(Error::InvalidDecode(
                    "run-length literal group overruns the buffer".into(),
                ));
            }
            out.extend_from_slice(&data[pos..pos + count]);
            pos += count;
        } else {
            let Some(&value) = data.get(pos) else {
                return Err(Error::InvalidDecode(
                    "run-length repeat group is missing its value".into(),
                ));
            };
            pos += 1;
            out.resize(out.len() + control as usize + 1, value);
        }
    }

    Ok(out)
}
