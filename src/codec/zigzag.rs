//! Zigzag scan order over square coefficient tiles.
//!
//! Reading a transformed tile along anti-diagonals sorts coefficients from
//! low to high spatial frequency, which groups the post-quantization zeros
//! into long tail runs for the byte compressors downstream.

use crate::error::{Error, Result};

/// Precomputed zigzag traversal for `n × n` tiles.
///
/// Anti-diagonals are walked in alternating directions: bottom-to-top on
/// even diagonals, top-to-bottom on odd ones. The order depends only on
/// `n`, so one instance serves every tile of a configuration.
#[derive(Debug, Clone)]
pub struct ZigzagScan {
    n: usize,
    order: Vec<usize>,
}

impl ZigzagScan {
    pub fn new(n: usize) -> Self {
        debug_assert!(n > 0);
        let mut order = Vec::with_capacity(n * n);
        for s in 0..2 * n - 1 {
            if s % 2 == 0 {
                let mut i = s.min(n - 1);
                let mut j = s - i;
                loop {
                    order.push(i * n + j);
                    if i == 0 || j == n - 1 {
                        break;
                    }
                    i -= 1;
                    j += 1;
                }
            } else {
                let mut j = s.min(n - 1);
                let mut i = s - j;
                loop {
                    order.push(i * n + j);
                    if j == 0 || i == n - 1 {
                        break;
                    }
                    i += 1;
                    j -= 1;
                }
            }
        }
        debug_assert_eq!(order.len(), n * n);
        Self { n, order }
    }

    /// Reads a row-major tile in zigzag order.
    pub fn encode(&self, tile: &[i16]) -> Result<Vec<i16>> {
        self.check_len(tile.len())?;
        Ok(self.order.iter().map(|&idx| tile[idx]).collect())
    }

    /// Writes a zigzag sequence back to row-major tile positions.
    pub fn decode(&self, sequence: &[i16]) -> Result<Vec<i16>> {
        self.check_len(sequence.len())?;
        let mut tile = vec![0i16; self.n * self.n];
        for (k, &idx) in self.order.iter().enumerate() {
            tile[idx] = sequence[k];
        }
        Ok(tile)
    }

    fn check_len(&self, actual: usize) -> Result<()> {
        let expected = self.n * self.n;
        if actual != expected {
            return Err(Error::ShapeMismatch { expected, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_by_four_reads_out_in_sorted_order() {
        // Tile laid out so the zigzag walk produces 1..=16.
        let tile = [
            1i16, 2, 6, 7, //
            3, 5, 8, 13, //
            4, 9, 12, 14, //
            10, 11, 15, 16,
        ];
        let scan = ZigzagScan::new(4);
        let sequence = scan.encode(&tile).unwrap();
        assert_eq!(sequence, (1..=16).collect::<Vec<i16>>());
        assert_eq!(scan.decode(&sequence).unwrap(), tile);
    }

    #[test]
    fn eight_by_eight_starts_like_the_classic_jpeg_order() {
        let scan = ZigzagScan::new(8);
        assert_eq!(
            &scan.order[..10],
            &[0, 1, 8, 16, 9, 2, 3, 10, 17, 24]
        );
        assert_eq!(scan.order[63], 63);
    }

    #[test]
    fn order_is_a_permutation_for_small_sizes() {
        for n in 1..=6 {
            let scan = ZigzagScan::new(n);
            let mut seen = vec![false; n * n];
            for &idx in &scan.order {
                assert!(!seen[idx]);
                seen[idx] = true;
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn encode_then_decode_is_identity() {
        let scan = ZigzagScan::new(8);
        let tile: Vec<i16> = (0..64).map(|i| (i * 7 - 200) as i16).collect();
        let round_tripped = scan.decode(&scan.encode(&tile).unwrap()).unwrap();
        assert_eq!(round_tripped, tile);
    }

    #[test]
    fn wrong_tile_size_is_rejected() {
        let scan = ZigzagScan::new(8);
        assert!(matches!(
            scan.encode(&[0i16; 63]),
            Err(Error::ShapeMismatch {
                expected: 64,
                actual: 63
            })
        ));
        assert!(scan.decode(&[0i16; 65]).is_err());
    }
}
