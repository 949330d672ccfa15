//! Single-channel sample planes and packed-buffer (de)interleaving.
//!
//! A [`Plane`] is one channel of an image as a row-major grid of 8-bit
//! samples. Every pipeline stage consumes planes and returns new ones; the
//! packed RGB/YCbCr buffers at the codec boundary are split apart and
//! reassembled here.

use crate::error::{Error, Result};

/// A `width × height` grid of 8-bit samples, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Plane {
    /// Wraps an existing sample buffer; its length must be `width × height`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width.checked_mul(height).unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(Error::InvalidDataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a plane with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Internal constructor for buffers whose length is correct by
    /// construction.
    pub(crate) fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Sample at `(x, y)`; both coordinates must be in bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    /// One full row of samples.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
}

/// Splits a packed three-channel buffer into its per-channel planes.
pub fn deinterleave3(data: &[u8], width: usize, height: usize) -> Result<[Plane; 3]> {
    let pixels = width.checked_mul(height).unwrap_or(usize::MAX);
    let expected = pixels.checked_mul(3).unwrap_or(usize::MAX);
    if data.len() != expected {
        return Err(Error::InvalidDataLength {
            expected,
            actual: data.len(),
        });
    }

    let mut a = Vec::with_capacity(pixels);
    let mut b = Vec::with_capacity(pixels);
    let mut c = Vec::with_capacity(pixels);
    for pixel in data.chunks_exact(3) {
        a.push(pixel[0]);
        b.push(pixel[1]);
        c.push(pixel[2]);
    }

    Ok([
        Plane {
            width,
            height,
            data: a,
        },
        Plane {
            width,
            height,
            data: b,
        },
        Plane {
            width,
            height,
            data: c,
        },
    ])
}

/// Packs three equally-sized planes back into one interleaved buffer.
pub fn interleave3(a: &Plane, b: &Plane, c: &Plane) -> Result<Vec<u8>> {
    for plane in [b, c] {
        if plane.data.len() != a.data.len() {
            return Err(Error::ShapeMismatch {
                expected: a.data.len(),
                actual: plane.data.len(),
            });
        }
    }

    let mut out = Vec::with_capacity(a.data.len() * 3);
    for i in 0..a.data.len() {
        out.push(a.data[i]);
        out.push(b.data[i]);
        out.push(c.data[i]);
    }
    Ok(out)
}
