//! Chroma plane downsampling and reconstruction.
//!
//! Downsampling replaces each `vertical × horizontal` window with its
//! arithmetic mean, padding the bottom and right edges with the fill value
//! so every window is complete. Reconstruction resizes back with bilinear
//! interpolation; the pair is deliberately lossy, only the plane shape
//! round-trips.

use crate::plane::Plane;

/// Shrinks a plane by averaging `vertical × horizontal` sample windows.
pub fn downsample(plane: &Plane, vertical: usize, horizontal: usize, fill: u8) -> Plane {
    debug_assert!(vertical > 0 && horizontal > 0);
    let out_width = (plane.width() + horizontal - 1) / horizontal;
    let out_height = (plane.height() + vertical - 1) / vertical;

    let mut data = Vec::with_capacity(out_width * out_height);
    for wy in 0..out_height {
        for wx in 0..out_width {
            let mut sum = 0u32;
            for dy in 0..vertical {
                let y = wy * vertical + dy;
                for dx in 0..horizontal {
                    let x = wx * horizontal + dx;
                    let sample = if x < plane.width() && y < plane.height() {
                        plane.get(x, y)
                    } else {
                        fill
                    };
                    sum += sample as u32;
                }
            }
            let mean = sum as f64 / (vertical * horizontal) as f64;
            data.push(mean.round() as u8);
        }
    }

    Plane::from_raw(out_width, out_height, data)
}

/// Resizes a plane to `width × height` with bilinear interpolation.
pub fn upsample(plane: &Plane, width: usize, height: usize) -> Plane {
    debug_assert!(width > 0 && height > 0);
    debug_assert!(plane.width() > 0 && plane.height() > 0);

    let x_ratio = if width > 1 {
        (plane.width() - 1) as f64 / (width - 1) as f64
    } else {
        0.0
    };
    let y_ratio = if height > 1 {
        (plane.height() - 1) as f64 / (height - 1) as f64
    } else {
        0.0
    };

    let mut data = Vec::with_capacity(width * height);
    for dst_y in 0..height {
        let src_y = dst_y as f64 * y_ratio;
        let y0 = src_y.floor() as usize;
        let y1 = (y0 + 1).min(plane.height() - 1);
        let y_frac = src_y - y0 as f64;

        for dst_x in 0..width {
            let src_x = dst_x as f64 * x_ratio;
            let x0 = src_x.floor() as usize;
            let x1 = (x0 + 1).min(plane.width() - 1);
            let x_frac = src_x - x0 as f64;

            let p00 = plane.get(x0, y0) as f64;
            let p01 = plane.get(x1, y0) as f64;
            let p10 = plane.get(x0, y1) as f64;
            let p11 = plane.get(x1, y1) as f64;

            let top = p00 * (1.0 - x_frac) + p01 * x_frac;
            let bottom = p10 * (1.0 - x_frac) + p11 * x_frac;
            let value = top * (1.0 - y_frac) + bottom * y_frac;
            data.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    Plane::from_raw(width, height, data)
}
