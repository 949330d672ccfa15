//! Partitioning planes into fixed-size tiles and back.
//!
//! Tiles are emitted in row-major grid order. Positions past the right and
//! bottom edges read as the fill value, so every tile is complete; merge
//! writes tiles back and crops the same region away, making the round trip
//! exact for any plane size.

use crate::error::{Error, Result};
use crate::plane::Plane;

/// Number of tiles a `width × height` plane yields per axis pair.
pub fn grid_dims(width: usize, height: usize, block_size: usize) -> (usize, usize) {
    (
        (width + block_size - 1) / block_size,
        (height + block_size - 1) / block_size,
    )
}

/// Slices a plane into `block_size × block_size` tiles, padding the right
/// and bottom edges with `fill`.
pub fn split(plane: &Plane, block_size: usize, fill: u8) -> Vec<Vec<u8>> {
    debug_assert!(block_size > 0);
    let (tiles_x, tiles_y) = grid_dims(plane.width(), plane.height(), block_size);
    let mut tiles = Vec::with_capacity(tiles_x * tiles_y);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut tile = Vec::with_capacity(block_size * block_size);
            for dy in 0..block_size {
                let y = ty * block_size + dy;
                for dx in 0..block_size {
                    let x = tx * block_size + dx;
                    if x < plane.width() && y < plane.height() {
                        tile.push(plane.get(x, y));
                    } else {
                        tile.push(fill);
                    }
                }
            }
            tiles.push(tile);
        }
    }
    tiles
}

/// Reassembles tiles into a `width × height` plane, cropping the padding.
///
/// The tile count must match the grid implied by the dimensions, and every
/// tile must be `block_size × block_size`.
pub fn merge(
    tiles: &[Vec<u8>],
    block_size: usize,
    width: usize,
    height: usize,
) -> Result<Plane> {
    debug_assert!(block_size > 0);
    let (tiles_x, tiles_y) = grid_dims(width, height, block_size);
    let expected = tiles_x * tiles_y;
    if tiles.len() != expected {
        return Err(Error::BlockCountMismatch {
            expected,
            actual: tiles.len(),
        });
    }

    let mut data = vec![0u8; width * height];
    for (index, tile) in tiles.iter().enumerate() {
        if tile.len() != block_size * block_size {
            return Err(Error::ShapeMismatch {
                expected: block_size * block_size,
                actual: tile.len(),
            });
        }
        let tx = index % tiles_x;
        let ty = index / tiles_x;
        for dy in 0..block_size {
            let y = ty * block_size + dy;
            if y >= height {
                break;
            }
            for dx in 0..block_size {
                let x = tx * block_size + dx;
                if x >= width {
                    break;
                }
                data[y * width + x] = tile[dy * block_size + dx];
            }
        }
    }
    Plane::new(width, height, data)
}
