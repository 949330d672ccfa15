//! Universal round-trip properties of the generic byte coders.
//!
//! Both coders promise `decompress(compress(x)) == x` for every byte string;
//! these suites exercise the degenerate inputs alongside random ones, plus
//! the stacked RLE-then-Huffman composition the codec actually uses.

use jpgl::compress::{huffman, rle};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn rle_round_trip(data: &[u8]) {
    let compressed = rle::compress(data);
    assert_eq!(rle::decompress(&compressed).unwrap(), data);
}

fn huffman_round_trip(data: &[u8]) {
    let compressed = huffman::compress(data);
    assert_eq!(huffman::decompress(&compressed).unwrap(), data);
}

#[test]
fn empty_input_round_trips_through_both_coders() {
    rle_round_trip(b"");
    huffman_round_trip(b"");
    assert!(rle::compress(b"").is_empty());
    assert!(huffman::compress(b"").is_empty());
}

#[test]
fn ten_thousand_repeated_bytes_round_trip() {
    let data = vec![0xABu8; 10_000];
    rle_round_trip(&data);
    huffman_round_trip(&data);
}

#[test]
fn ten_thousand_repeated_bytes_actually_compress() {
    let data = vec![0xABu8; 10_000];
    assert!(rle::compress(&data).len() < 200);
    // 8-byte count + 256-length table + 10,000 one-bit codes
    assert!(huffman::compress(&data).len() < 1600);
}

#[test]
fn single_and_double_bytes_round_trip() {
    for value in [0u8, 1, 127, 128, 255] {
        rle_round_trip(&[value]);
        huffman_round_trip(&[value]);
        rle_round_trip(&[value, value]);
        huffman_round_trip(&[value, value.wrapping_add(1)]);
    }
}

#[test]
fn every_byte_value_round_trips() {
    let data: Vec<u8> = (0..=255u8).collect();
    rle_round_trip(&data);
    huffman_round_trip(&data);
}

#[test]
fn high_entropy_buffers_round_trip_even_when_they_expand() {
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    for len in [1usize, 3, 255, 256, 257, 8191] {
        let mut data = vec![0u8; len];
        rng.fill(data.as_mut_slice());
        rle_round_trip(&data);
        huffman_round_trip(&data);
    }
}

#[test]
fn zero_heavy_coefficient_like_data_compresses_well() {
    // Shaped like a real AC region: long zero tails between small values.
    let mut rng = StdRng::seed_from_u64(0xAC);
    let mut data = Vec::with_capacity(8192);
    while data.len() < 8192 {
        data.push(rng.gen_range(0..8) as u8);
        data.extend(std::iter::repeat(0u8).take(rng.gen_range(4..40)));
    }

    let staged = huffman::compress(&rle::compress(&data));
    assert!(staged.len() < data.len() / 4);

    let restored = rle::decompress(&huffman::decompress(&staged).unwrap()).unwrap();
    assert_eq!(restored, data);
}

#[test]
fn truncated_streams_error_instead_of_returning_partial_output() {
    let data: Vec<u8> = (0..200u8).flat_map(|v| [v, v, v, v]).collect();

    let compressed = rle::compress(&data);
    assert!(rle::decompress(&compressed[..compressed.len() - 1]).is_err());

    let compressed = huffman::compress(&data);
    assert!(huffman::decompress(&compressed[..compressed.len() - 1]).is_err());
    assert!(huffman::decompress(&compressed[..100]).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn prop_rle_round_trips_any_bytes(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let compressed = rle::compress(&data);
        prop_assert_eq!(rle::decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn prop_huffman_round_trips_any_bytes(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let compressed = huffman::compress(&data);
        prop_assert_eq!(huffman::decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn prop_stacked_coders_round_trip_any_bytes(
        data in proptest::collection::vec(0u8..16, 0..2048)
    ) {
        let staged = huffman::compress(&rle::compress(&data));
        let restored = rle::decompress(&huffman::decompress(&staged).unwrap()).unwrap();
        prop_assert_eq!(restored, data);
    }
}
