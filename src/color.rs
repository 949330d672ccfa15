//! RGB ↔ YCbCr conversion (ITU-R BT.601).
//!
//! The luma/chroma split is what makes chroma subsampling possible: Y carries
//! the detail the eye is sensitive to, Cb/Cr carry color differences that can
//! survive a resolution cut. Conversion rounds to the nearest integer and
//! clamps to `[0, 255]`, so a round trip may drift by one code value per
//! channel.

use crate::error::{Error, Result};

#[inline]
fn clamp_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Converts one RGB pixel to YCbCr.
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.1687 * r - 0.3313 * g + 0.5 * b + 128.0;
    let cr = 0.5 * r - 0.4187 * g - 0.0813 * b + 128.0;
    (clamp_u8(y), clamp_u8(cb), clamp_u8(cr))
}

/// Converts one YCbCr pixel back to RGB.
#[inline]
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> (u8, u8, u8) {
    let y = y as f64;
    let cb = cb as f64 - 128.0;
    let cr = cr as f64 - 128.0;
    let r = y + 1.402 * cr;
    let g = y - 0.34414 * cb - 0.71414 * cr;
    let b = y + 1.772 * cb;
    (clamp_u8(r), clamp_u8(g), clamp_u8(b))
}

/// Converts an interleaved RGB buffer to an interleaved YCbCr buffer.
///
/// The length must be a multiple of 3 (packed `R G B` triplets).
pub fn rgb_to_ycbcr_buffer(data: &[u8]) -> Result<Vec<u8>> {
    check_triplet_length(data.len())?;
    let mut out = Vec::with_capacity(data.len());
    for pixel in data.chunks_exact(3) {
        let (y, cb, cr) = rgb_to_ycbcr(pixel[0], pixel[1], pixel[2]);
        out.extend_from_slice(&[y, cb, cr]);
    }
    Ok(out)
}

/// Converts an interleaved YCbCr buffer to an interleaved RGB buffer.
///
/// The length must be a multiple of 3 (packed `Y Cb Cr` triplets).
pub fn ycbcr_to_rgb_buffer(data: &[u8]) -> Result<Vec<u8>> {
    check_triplet_length(data.len())?;
    let mut out = Vec::with_capacity(data.len());
    for pixel in data.chunks_exact(3) {
        let (r, g, b) = ycbcr_to_rgb(pixel[0], pixel[1], pixel[2]);
        out.extend_from_slice(&[r, g, b]);
    }
    Ok(out)
}

fn check_triplet_length(len: usize) -> Result<()> {
    if len % 3 != 0 {
        return Err(Error::InvalidDataLength {
            expected: len - len % 3,
            actual: len,
        });
    }
    Ok(())
}
