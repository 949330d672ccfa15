//! Quality-scaled quantization tables and coefficient rounding.
//!
//! The two base tables are the ITU-T T.81 Annex K references. A quality in
//! `[0,100]` maps to a linear scale factor (the libjpeg curve), giving
//! coarse divisors at low quality and an all-ones table at 100. The base
//! tables are 8×8, which pins the codec block size.

use crate::error::{Error, Result};

/// Tile edge length the quantization tables are defined for.
pub const BLOCK_SIZE: usize = 8;

#[rustfmt::skip]
const BASE_LUMA: [u16; 64] = [
    16, 11, 10, 16,  24,  40,  51,  61,
    12, 12, 14, 19,  26,  58,  60,  55,
    14, 13, 16, 24,  40,  57,  69,  56,
    14, 17, 22, 29,  51,  87,  80,  62,
    18, 22, 37, 56,  68, 109, 103,  77,
    24, 35, 55, 64,  81, 104, 113,  92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103,  99,
];

#[rustfmt::skip]
const BASE_CHROMA: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// An 8×8 divisor table derived from a quality setting, entries in `[1,255]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTable {
    values: [u16; 64],
}

impl QuantTable {
    /// Luminance table scaled for `quality`.
    pub fn luma(quality: u8) -> Self {
        Self::scaled(&BASE_LUMA, quality)
    }

    /// Chrominance table scaled for `quality`.
    pub fn chroma(quality: u8) -> Self {
        Self::scaled(&BASE_CHROMA, quality)
    }

    fn scaled(base: &[u16; 64], quality: u8) -> Self {
        let scale = scale_factor(quality);
        let mut values = [0u16; 64];
        for (out, &entry) in values.iter_mut().zip(base) {
            *out = ((entry as u32 * scale + 50) / 100).clamp(1, 255) as u16;
        }
        Self { values }
    }

    pub fn values(&self) -> &[u16; 64] {
        &self.values
    }
}

/// Quality-to-scale mapping: hyperbolic below 50, linear above.
fn scale_factor(quality: u8) -> u32 {
    let quality = quality.clamp(1, 100) as u32;
    if quality < 50 {
        5000 / quality
    } else {
        200 - 2 * quality
    }
}

/// Divides each coefficient by its table entry and rounds to the nearest
/// integer.
pub fn quantize(coeffs: &[f64], table: &QuantTable) -> Result<Vec<i16>> {
    check_len(coeffs.len())?;
    Ok(coeffs
        .iter()
        .zip(&table.values)
        .map(|(&c, &t)| (c / t as f64).round() as i16)
        .collect())
}

/// Multiplies quantized values back by their table entries.
pub fn dequantize(quantized: &[i16], table: &QuantTable) -> Result<Vec<f64>> {
    check_len(quantized.len())?;
    Ok(quantized
        .iter()
        .zip(&table.values)
        .map(|(&q, &t)| q as f64 * t as f64)
        .collect())
}

fn check_len(actual: usize) -> Result<()> {
    let expected = BLOCK_SIZE * BLOCK_SIZE;
    if actual != expected {
        return Err(Error::ShapeMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_50_reproduces_the_base_tables() {
        assert_eq!(QuantTable::luma(50).values, BASE_LUMA);
        assert_eq!(QuantTable::chroma(50).values, BASE_CHROMA);
    }

    #[test]
    fn quality_100_is_the_identity_table() {
        assert!(QuantTable::luma(100).values.iter().all(|&v| v == 1));
        assert!(QuantTable::chroma(100).values.iter().all(|&v| v == 1));
    }

    #[test]
    fn quality_1_saturates_every_entry() {
        assert!(QuantTable::luma(1).values.iter().all(|&v| v == 255));
    }

    #[test]
    fn quality_0_is_clamped_to_1() {
        assert_eq!(QuantTable::luma(0), QuantTable::luma(1));
    }

    #[test]
    fn lower_quality_never_divides_more_finely() {
        let coarse = QuantTable::luma(25);
        let fine = QuantTable::luma(75);
        for (c, f) in coarse.values.iter().zip(&fine.values) {
            assert!(c >= f);
        }
    }

    #[test]
    fn chroma_base_has_the_flat_high_frequency_plateau() {
        let table = QuantTable::chroma(50);
        assert_eq!(table.values[0], 17);
        assert!(table.values[32..].iter().all(|&v| v == 99));
    }

    #[test]
    fn dequantized_error_is_bounded_by_half_a_step() {
        let table = QuantTable::luma(75);
        let coeffs: Vec<f64> = (0..64).map(|i| (i as f64 - 32.0) * 17.3).collect();
        let quantized = quantize(&coeffs, &table).unwrap();
        let restored = dequantize(&quantized, &table).unwrap();
        for ((c, r), &t) in coeffs.iter().zip(&restored).zip(&table.values) {
            assert!((c - r).abs() <= t as f64 / 2.0 + 1e-9);
        }
    }

    #[test]
    fn constant_tile_ac_quantizes_to_zero() {
        let table = QuantTable::luma(50);
        let mut coeffs = vec![0.0; 64];
        coeffs[0] = 256.0;
        let quantized = quantize(&coeffs, &table).unwrap();
        assert_eq!(quantized[0], 16);
        assert!(quantized[1..].iter().all(|&q| q == 0));
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        let table = QuantTable::luma(50);
        assert!(matches!(
            quantize(&[0.0; 63], &table),
            Err(Error::ShapeMismatch {
                expected: 64,
                actual: 63
            })
        ));
        assert!(dequantize(&[0i16; 65], &table).is_err());
    }
}
