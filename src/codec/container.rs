//! Container framing: magic, version, header fields, trailing checksum.
//!
//! Layout (all integers big-endian):
//!
//! | offset | field               | width |
//! |--------|---------------------|-------|
//! | 0      | magic `"JPGL"`      | 4     |
//! | 4      | format version      | 1     |
//! | 5      | image width         | 2     |
//! | 7      | image height        | 2     |
//! | 9      | block size          | 1     |
//! | 10     | quality             | 1     |
//! | 11     | chroma plane width  | 2     |
//! | 13     | chroma plane height | 2     |
//! | 15..   | entropy-coded payload | variable |
//! | end−4  | CRC-32 of all preceding bytes | 4 |

use crate::compress::crc32::crc32;
use crate::error::{Error, Result};

pub const MAGIC: [u8; 4] = *b"JPGL";
pub const VERSION: u8 = 1;

/// Bytes before the payload begins.
pub const HEADER_LEN: usize = 15;
/// Trailing checksum width.
pub const CHECKSUM_LEN: usize = 4;
/// Smallest container: full header, empty payload, checksum.
pub const MIN_CONTAINER_LEN: usize = HEADER_LEN + CHECKSUM_LEN;

/// Decoded header fields of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u16,
    pub height: u16,
    pub block_size: u8,
    pub quality: u8,
    pub chroma_width: u16,
    pub chroma_height: u16,
}

impl Header {
    /// Appends the magic, version, and header fields.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&self.width.to_be_bytes());
        out.extend_from_slice(&self.height.to_be_bytes());
        out.push(self.block_size);
        out.push(self.quality);
        out.extend_from_slice(&self.chroma_width.to_be_bytes());
        out.extend_from_slice(&self.chroma_height.to_be_bytes());
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDecode(format!(
                "container declares a {}x{} image",
                self.width, self.height
            )));
        }
        if self.block_size == 0 {
            return Err(Error::InvalidDecode("container declares block size 0".into()));
        }
        if self.quality > 100 {
            return Err(Error::InvalidDecode(format!(
                "container declares quality {}",
                self.quality
            )));
        }
        let chroma_ok = (1..=self.width).contains(&self.chroma_width)
            && (1..=self.height).contains(&self.chroma_height);
        if !chroma_ok {
            return Err(Error::InvalidDecode(format!(
                "chroma plane {}x{} does not fit a {}x{} image",
                self.chroma_width, self.chroma_height, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Appends the CRC-32 of everything currently in `out`.
pub fn seal(out: &mut Vec<u8>) {
    let checksum = crc32(out);
    out.extend_from_slice(&checksum.to_be_bytes());
}

/// Validates framing and checksum, returning the header and payload slice.
pub fn parse(data: &[u8]) -> Result<(Header, &[u8])> {
    if data.len() < MIN_CONTAINER_LEN {
        return Err(Error::InvalidDecode(format!(
            "container needs at least {MIN_CONTAINER_LEN} bytes, got {}",
            data.len()
        )));
    }
    if data[..4] != MAGIC {
        return Err(Error::BadMagic);
    }
    if data[4] != VERSION {
        return Err(Error::UnsupportedVersion(data[4]));
    }

    let body_len = data.len() - CHECKSUM_LEN;
    let mut stored = [0u8; 4];
    stored.copy_from_slice(&data[body_len..]);
    let expected = u32::from_be_bytes(stored);
    let actual = crc32(&data[..body_len]);
    if expected != actual {
        return Err(Error::ChecksumMismatch { expected, actual });
    }

    let header = Header {
        width: u16::from_be_bytes([data[5], data[6]]),
        height: u16::from_be_bytes([data[7], data[8]]),
        block_size: data[9],
        quality: data[10],
        chroma_width: u16::from_be_bytes([data[11], data[12]]),
        chroma_height: u16::from_be_bytes([data[13], data[14]]),
    };
    header.validate()?;

    Ok((header, &data[HEADER_LEN..body_len]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Header {
        Header {
            width: 640,
            height: 480,
            block_size: 8,
            quality: 75,
            chroma_width: 320,
            chroma_height: 240,
        }
    }

    fn sealed_container(header: Header, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        header.write_to(&mut out);
        out.extend_from_slice(payload);
        seal(&mut out);
        out
    }

    fn reseal(data: &mut [u8]) {
        let body_len = data.len() - CHECKSUM_LEN;
        let checksum = crc32(&data[..body_len]);
        data[body_len..].copy_from_slice(&checksum.to_be_bytes());
    }

    #[test]
    fn write_then_parse_recovers_header_and_payload() {
        let container = sealed_container(sample_header(), b"payload bytes");
        let (header, payload) = parse(&container).unwrap();
        assert_eq!(header, sample_header());
        assert_eq!(payload, b"payload bytes");
    }

    #[test]
    fn empty_payload_is_valid() {
        let container = sealed_container(sample_header(), b"");
        assert_eq!(container.len(), MIN_CONTAINER_LEN);
        let (_, payload) = parse(&container).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut container = sealed_container(sample_header(), b"x");
        container[0] = b'X';
        assert_eq!(parse(&container), Err(Error::BadMagic));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut container = sealed_container(sample_header(), b"x");
        container[4] = 2;
        assert_eq!(parse(&container), Err(Error::UnsupportedVersion(2)));
    }

    #[test]
    fn a_flipped_payload_bit_fails_the_checksum() {
        let mut container = sealed_container(sample_header(), b"payload bytes");
        container[HEADER_LEN + 3] ^= 0x20;
        assert!(matches!(
            parse(&container),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn truncation_is_rejected() {
        let container = sealed_container(sample_header(), b"payload bytes");
        assert!(matches!(
            parse(&container[..MIN_CONTAINER_LEN - 1]),
            Err(Error::InvalidDecode(_))
        ));
        // cutting into the payload invalidates the checksum
        assert!(matches!(
            parse(&container[..container.len() - 2]),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn out_of_range_quality_is_rejected_even_with_a_valid_checksum() {
        let mut container = sealed_container(sample_header(), b"x");
        container[10] = 200;
        reseal(&mut container);
        assert!(matches!(parse(&container), Err(Error::InvalidDecode(_))));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let mut container = sealed_container(sample_header(), b"x");
        container[5] = 0;
        container[6] = 0;
        reseal(&mut container);
        assert!(matches!(parse(&container), Err(Error::InvalidDecode(_))));
    }

    #[test]
    fn oversized_chroma_plane_is_rejected() {
        let mut header = sample_header();
        header.chroma_width = 641;
        let container = sealed_container(header, b"x");
        assert!(matches!(parse(&container), Err(Error::InvalidDecode(_))));
    }
}
