//! Orthonormal 2-D DCT-II over square sample tiles.
//!
//! The basis matrix is built once per block size and shared by every tile.
//! With orthonormal scaling the inverse is just the transposed product, so
//! a forward/inverse round trip without quantization reproduces the input
//! to within floating-point rounding.

use crate::error::{Error, Result};

/// Sample midpoint subtracted before the forward transform and added back
/// after the inverse, centering tiles around zero.
const LEVEL_SHIFT: f64 = 128.0;

/// Precomputed DCT-II basis for `n × n` tiles.
#[derive(Debug, Clone)]
pub struct Dct2d {
    n: usize,
    basis: Vec<f64>,
    basis_t: Vec<f64>,
}

impl Dct2d {
    pub fn new(n: usize) -> Self {
        debug_assert!(n > 0);
        let mut basis = vec![0.0; n * n];
        let norm0 = (1.0 / n as f64).sqrt();
        let norm = (2.0 / n as f64).sqrt();
        for k in 0..n {
            let alpha = if k == 0 { norm0 } else { norm };
            for m in 0..n {
                let angle = std::f64::consts::PI * (2 * m + 1) as f64 * k as f64
                    / (2 * n) as f64;
                basis[k * n + m] = alpha * angle.cos();
            }
        }

        let mut basis_t = vec![0.0; n * n];
        for k in 0..n {
            for m in 0..n {
                basis_t[m * n + k] = basis[k * n + m];
            }
        }

        Self { n, basis, basis_t }
    }

    pub fn block_size(&self) -> usize {
        self.n
    }

    /// Forward transform of a zero-centered tile: `D · f · Dᵀ`.
    pub fn forward(&self, tile: &[f64]) -> Result<Vec<f64>> {
        self.check_len(tile.len())?;
        let df = matmul(&self.basis, tile, self.n);
        Ok(matmul(&df, &self.basis_t, self.n))
    }

    /// Inverse transform back to a zero-centered tile: `Dᵀ · C · D`.
    pub fn inverse(&self, coeffs: &[f64]) -> Result<Vec<f64>> {
        self.check_len(coeffs.len())?;
        let dc = matmul(&self.basis_t, coeffs, self.n);
        Ok(matmul(&dc, &self.basis, self.n))
    }

    /// Level-shifts a sample tile and runs the forward transform.
    pub fn forward_block(&self, samples: &[u8]) -> Result<Vec<f64>> {
        self.check_len(samples.len())?;
        let shifted: Vec<f64> = samples.iter().map(|&s| s as f64 - LEVEL_SHIFT).collect();
        self.forward(&shifted)
    }

    /// Runs the inverse transform and restores rounded, clamped samples.
    pub fn inverse_block(&self, coeffs: &[f64]) -> Result<Vec<u8>> {
        let tile = self.inverse(coeffs)?;
        Ok(tile
            .iter()
            .map(|&v| (v + LEVEL_SHIFT).round().clamp(0.0, 255.0) as u8)
            .collect())
    }

    fn check_len(&self, actual: usize) -> Result<()> {
        let expected = self.n * self.n;
        if actual != expected {
            return Err(Error::ShapeMismatch { expected, actual });
        }
        Ok(())
    }
}

fn matmul(a: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for k in 0..n {
            let aik = a[i * n + k];
            for j in 0..n {
                out[i * n + j] += aik * b[k * n + j];
            }
        }
    }
    out
}
