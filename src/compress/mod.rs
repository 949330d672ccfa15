//! Generic lossless byte-stream coders.
//!
//! Nothing in this module knows about images. The codec hands the run-length
//! coder the raw AC-coefficient region and the Huffman coder the concatenated
//! DC+AC bytes; both would work just as well on any other byte stream, and
//! both guarantee `decompress(compress(x)) == x` for every input including
//! the empty one.

pub mod crc32;
pub mod huffman;
pub mod rle;
