//! Error types shared across the codec.

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of encoding, decoding, and configuration.
///
/// Configuration problems (`InvalidQuality`, `InvalidBlockSize`,
/// `InvalidSubsampling`) are reported when an [`Encoder`](crate::Encoder) is
/// constructed and make that configuration unusable. Everything else aborts
/// the call that raised it; no partial output is ever produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Quality is outside the accepted `0..=100` range.
    InvalidQuality(u8),
    /// Block size is zero or not supported by the quantization tables.
    InvalidBlockSize(u8),
    /// A subsampling factor is zero.
    InvalidSubsampling { vertical: u8, horizontal: u8 },
    /// Image width or height is zero.
    InvalidDimensions { width: u32, height: u32 },
    /// Image dimensions exceed what the container header can describe.
    ImageTooLarge { width: u32, height: u32, max: u32 },
    /// A buffer's length does not match the declared geometry or element size.
    InvalidDataLength { expected: usize, actual: usize },
    /// A tile or coefficient sequence has the wrong number of elements.
    ShapeMismatch { expected: usize, actual: usize },
    /// The number of tiles handed to `merge` does not cover the plane.
    BlockCountMismatch { expected: usize, actual: usize },
    /// An operation that needs at least one element received none.
    EmptyInput(&'static str),
    /// The input does not start with the container magic.
    BadMagic,
    /// The container declares a format version this build does not read.
    UnsupportedVersion(u8),
    /// The container checksum does not match its contents.
    ChecksumMismatch { expected: u32, actual: u32 },
    /// The payload or an embedded stream is malformed.
    InvalidDecode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidQuality(quality) => {
                write!(f, "quality must be in 0..=100, got {quality}")
            }
            Error::InvalidBlockSize(size) => {
                write!(f, "unsupported block size {size}")
            }
            Error::InvalidSubsampling { vertical, horizontal } => {
                write!(f, "subsampling factors must be nonzero, got {vertical}x{horizontal}")
            }
            Error::InvalidDimensions { width, height } => {
                write!(f, "invalid image dimensions {width}x{height}")
            }
            Error::ImageTooLarge { width, height, max } => {
                write!(f, "image {width}x{height} exceeds the maximum dimension {max}")
            }
            Error::InvalidDataLength { expected, actual } => {
                write!(f, "invalid data length: expected {expected} bytes, got {actual}")
            }
            Error::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected} elements, got {actual}")
            }
            Error::BlockCountMismatch { expected, actual } => {
                write!(f, "block count mismatch: expected {expected} tiles, got {actual}")
            }
            Error::EmptyInput(what) => write!(f, "empty input: {what}"),
            Error::BadMagic => write!(f, "not a JPGL container (bad magic)"),
            Error::UnsupportedVersion(version) => {
                write!(f, "unsupported container version {version}")
            }
            Error::ChecksumMismatch { expected, actual } => {
                write!(
                    f,
                    "checksum mismatch: container says {expected:#010x}, contents hash to {actual:#010x}"
                )
            }
            Error::InvalidDecode(reason) => write!(f, "invalid encoded data: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
