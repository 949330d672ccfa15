//! # jpgl
//!
//! A lossy image codec with a compact self-describing container, written
//! entirely in Rust.
//!
//! - **Pipeline**: BT.601 color conversion, configurable chroma
//!   subsampling, 8×8 DCT with ITU-T reference quantization tables, zigzag
//!   scan, then DC differencing, run-length and Huffman coding.
//! - **Container**: magic/version framing, a fixed big-endian header, and a
//!   trailing CRC-32, so corrupt or foreign input fails cleanly instead of
//!   decoding into garbage.
//! - **Self-sufficient decode**: every table is re-derived from the header;
//!   decoding needs no knowledge of the encoder's configuration.
//! - **Performance**: per-tile transform work runs in parallel via rayon
//!   (default feature), and `encode_into` reuses output buffers.
//!
//! ## Quickstart
//!
//! ```rust
//! use jpgl::{decode, encode, EncodeOptions};
//!
//! # fn main() -> jpgl::Result<()> {
//! // 2x2 RGB pixels (red, green, blue, white)
//! let pixels = vec![
//!     255, 0, 0, 0, 255, 0, //
//!     0, 0, 255, 255, 255, 255,
//! ];
//! let container = encode(&pixels, 2, 2, &EncodeOptions::default())?;
//! let image = decode(&container)?;
//! assert_eq!((image.width, image.height), (2, 2));
//! assert_eq!(image.data.len(), pixels.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom options
//!
//! ```rust
//! use jpgl::{EncodeOptions, Encoder};
//!
//! # fn main() -> jpgl::Result<()> {
//! let options = EncodeOptions::builder()
//!     .quality(90)
//!     .subsampling(1, 1) // keep chroma at full resolution
//!     .build();
//! let encoder = Encoder::new(options)?;
//! let container = encoder.encode(&vec![64u8; 8 * 8 * 3], 8, 8)?;
//! assert!(jpgl::decode(&container).is_ok());
//! # Ok(())
//! # }
//! ```
//!
//! ## Buffer reuse
//!
//! ```rust
//! use jpgl::{EncodeOptions, Encoder};
//!
//! # fn main() -> jpgl::Result<()> {
//! let encoder = Encoder::new(EncodeOptions::fast())?;
//! let mut buf = Vec::new();
//! for value in [0u8, 128, 255] {
//!     let pixels = vec![value; 4 * 4 * 3];
//!     encoder.encode_into(&mut buf, &pixels, 4, 4)?;
//!     assert!(!buf.is_empty());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//! - `parallel` (default): Parallel per-tile transforms via rayon.
//! - `cli`: The `jpgl` command-line tool (PPM/PGM in, container out, and back).
//!
//! ## Notes
//! - The codec is lossy by design: quality and subsampling trade size for
//!   fidelity. A quality-100, 1:1-subsampled round trip is close to, but
//!   not bit-exact with, the input.
//! - Prefer `encode_into` and a long-lived [`Encoder`] when encoding many
//!   images with one configuration.

#![forbid(unsafe_code)]

pub mod bits;
pub mod codec;
pub mod color;
pub mod compress;
pub mod error;
pub mod plane;

pub use codec::{
    decode, encode, encode_into, DecodedImage, EncodeOptions, EncodeOptionsBuilder, Encoder,
    Preset,
};
pub use error::{Error, Result};
