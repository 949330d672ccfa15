//! Static canonical Huffman coding over bytes.
//!
//! The stream is self-describing: an 8-byte big-endian count of the original
//! bytes, 256 canonical code lengths (one per symbol, zero meaning absent),
//! then the MSB-first bit-packed codes. Lengths are derived from a Huffman
//! tree over the symbol frequencies and depth-limited to
//! [`MAX_CODE_LENGTH`]; codes are assigned canonically in (length, symbol)
//! order, so the table alone reconstructs the exact code book.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::bits::{BitReaderMsb, BitWriterMsb};
use crate::error::{Error, Result};

/// Longest code the stream format permits.
pub const MAX_CODE_LENGTH: usize = 15;

const SYMBOLS: usize = 256;
const COUNT_BYTES: usize = 8;
const STREAM_HEADER: usize = COUNT_BYTES + SYMBOLS;

/// A tree over at most 256 leaves never places one deeper than this.
const MAX_TREE_DEPTH: usize = SYMBOLS - 1;

/// Compresses `data`; the empty input maps to the empty output.
pub fn compress(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let mut freqs = [0u64; SYMBOLS];
    for &byte in data {
        freqs[byte as usize] += 1;
    }

    let lengths = code_lengths(&freqs);
    let codes = canonical_codes(&lengths);

    let mut out = Vec::with_capacity(STREAM_HEADER + data.len() / 2);
    out.extend_from_slice(&(data.len() as u64).to_be_bytes());
    out.extend_from_slice(&lengths);

    let mut writer = BitWriterMsb::with_capacity(data.len() / 2);
    for &byte in data {
        let symbol = byte as usize;
        writer.write_bits(codes[symbol] as u32, lengths[symbol] as u32);
    }
    out.extend_from_slice(&writer.finish());
    out
}

/// Decompresses a stream produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    if data.len() < STREAM_HEADER {
        return Err(Error::InvalidDecode(format!(
            "huffman stream header needs {STREAM_HEADER} bytes, got {}",
            data.len()
        )));
    }

    let mut count_bytes = [0u8; COUNT_BYTES];
    count_bytes.copy_from_slice(&data[..COUNT_BYTES]);
    let count = u64::from_be_bytes(count_bytes) as usize;

    let mut lengths = [0u8; SYMBOLS];
    lengths.copy_from_slice(&data[COUNT_BYTES..STREAM_HEADER]);

    let decoder = CanonicalDecoder::from_lengths(&lengths)?;
    let mut reader = BitReaderMsb::new(&data[STREAM_HEADER..]);

    let mut out = Vec::with_capacity(count.min(1 << 20));
    for _ in 0..count {
        out.push(decoder.decode(&mut reader)?);
    }
    Ok(out)
}

/// Optimal code lengths for the given frequencies, depth-limited to
/// [`MAX_CODE_LENGTH`]. Absent symbols get length zero; a lone symbol gets
/// length one.
fn code_lengths(freqs: &[u64; SYMBOLS]) -> [u8; SYMBOLS] {
    let mut lengths = [0u8; SYMBOLS];
    let active: Vec<usize> = (0..SYMBOLS).filter(|&s| freqs[s] > 0).collect();

    match active.len() {
        0 => return lengths,
        1 => {
            lengths[active[0]] = 1;
            return lengths;
        }
        _ => {}
    }

    // Huffman merge: repeatedly join the two lightest subtrees. Leaves are
    // the active symbols, internal nodes are appended behind them; ties
    // break on node index, keeping the result deterministic.
    let mut parent: Vec<usize> = vec![usize::MAX; active.len()];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = active
        .iter()
        .enumerate()
        .map(|(node, &symbol)| Reverse((freqs[symbol], node)))
        .collect();

    while let Some(Reverse((weight_a, node_a))) = heap.pop() {
        let Some(Reverse((weight_b, node_b))) = heap.pop() else {
            break; // node_a is the root
        };
        let joined = parent.len();
        parent[node_a] = joined;
        parent[node_b] = joined;
        parent.push(usize::MAX);
        heap.push(Reverse((weight_a + weight_b, joined)));
    }

    let mut depths = vec![0usize; active.len()];
    let mut depth_counts = [0u32; MAX_TREE_DEPTH + 1];
    for (leaf, depth) in depths.iter_mut().enumerate() {
        let mut node = leaf;
        while parent[node] != usize::MAX {
            node = parent[node];
            *depth += 1;
        }
        depth_counts[*depth] += 1;
    }

    // Fold overlong lengths back under the limit: take two codes off the
    // longest length, move one up a level, and split a shorter code into a
    // prefix for the other two. A shorter nonzero level always exists while
    // an overlong one does, so the inner search stays above zero.
    for level in ((MAX_CODE_LENGTH + 1)..=MAX_TREE_DEPTH).rev() {
        while depth_counts[level] > 0 {
            let mut shorter = level - 2;
            while shorter > 0 && depth_counts[shorter] == 0 {
                shorter -= 1;
            }
            debug_assert!(shorter > 0);
            depth_counts[level] -= 2;
            depth_counts[level - 1] += 1;
            depth_counts[shorter + 1] += 2;
            depth_counts[shorter] -= 1;
        }
    }

    // Reassign lengths from the adjusted histogram, shortest lengths to the
    // symbols that had the shallowest original depths.
    let mut by_depth: Vec<(usize, usize)> = depths
        .iter()
        .enumerate()
        .map(|(leaf, &depth)| (depth, active[leaf]))
        .collect();
    by_depth.sort_unstable();

    let mut assigned = by_depth.into_iter();
    for length in 1..=MAX_CODE_LENGTH {
        for _ in 0..depth_counts[length] {
            if let Some((_, symbol)) = assigned.next() {
                lengths[symbol] = length as u8;
            }
        }
    }
    lengths
}

/// Canonical code for every symbol with a nonzero length, assigned in
/// (length, symbol) order.
fn canonical_codes(lengths: &[u8; SYMBOLS]) -> [u16; SYMBOLS] {
    let mut length_counts = [0u16; MAX_CODE_LENGTH + 1];
    for &length in lengths {
        length_counts[length as usize] += 1;
    }
    length_counts[0] = 0;

    let mut next_code = [0u16; MAX_CODE_LENGTH + 1];
    let mut code = 0u16;
    for length in 1..=MAX_CODE_LENGTH {
        code = (code + length_counts[length - 1]) << 1;
        next_code[length] = code;
    }

    let mut codes = [0u16; SYMBOLS];
    for (symbol, &length) in lengths.iter().enumerate() {
        if length > 0 {
            codes[symbol] = next_code[length as usize];
            next_code[length as usize] += 1;
        }
    }
    codes
}

/// Canonical prefix decoder over per-length symbol counts.
struct CanonicalDecoder {
    counts: [u16; MAX_CODE_LENGTH + 1],
    symbols: Vec<u8>,
}

impl CanonicalDecoder {
    fn from_lengths(lengths: &[u8; SYMBOLS]) -> Result<Self> {
        let mut counts = [0u16; MAX_CODE_LENGTH + 1];
        for (symbol, &length) in lengths.iter().enumerate() {
            let length = length as usize;
            if length > MAX_CODE_LENGTH {
                return Err(Error::InvalidDecode(format!(
                    "symbol {symbol} declares code length {length}, limit is {MAX_CODE_LENGTH}"
                )));
            }
            if length > 0 {
                counts[length] += 1;
            }
        }

        // reject over-subscribed code space (an ambiguous table)
        let mut remaining = 1i32;
        for &count in &counts[1..] {
            remaining = (remaining << 1) - count as i32;
            if remaining < 0 {
                return Err(Error::InvalidDecode(
                    "huffman code lengths over-subscribe the code space".into(),
                ));
            }
        }

        let mut symbols = Vec::with_capacity(SYMBOLS);
        for length in 1..=MAX_CODE_LENGTH as u8 {
            for (symbol, &symbol_length) in lengths.iter().enumerate() {
                if symbol_length == length {
                    symbols.push(symbol as u8);
                }
            }
        }

        Ok(Self { counts, symbols })
    }

    /// Reads one symbol, walking the canonical code ranges level by level.
    fn decode(&self, reader: &mut BitReaderMsb<'_>) -> Result<u8> {
        let mut code = 0u32;
        let mut first = 0u32;
        let mut index = 0u32;
        for length in 1..=MAX_CODE_LENGTH {
            code |= reader.read_bit().ok_or_else(|| {
                Error::InvalidDecode("huffman stream ran out of bits".into())
            })?;
            let count = self.counts[length] as u32;
            if code < first + count {
                return Ok(self.symbols[(index + code - first) as usize]);
            }
            index += count;
            first = (first + count) << 1;
            code <<= 1;
        }
        Err(Error::InvalidDecode("invalid huffman code".into()))
    }
}
