//! The lossy image codec pipeline.
//!
//! Encoding runs a fixed sequence of stages: RGB → YCbCr conversion, chroma
//! downsampling, tile partitioning, per-tile DCT / quantization / zigzag
//! scan, then DC differencing, run-length coding of the AC region, Huffman
//! coding, and container framing. Decoding mirrors every stage in reverse,
//! re-deriving tables and tile counts from the container header alone.
//!
//! # Example
//!
//! ```rust
//! let pixels = vec![128u8; 4 * 4 * 3];
//! let container = jpgl::encode(&pixels, 4, 4, &jpgl::EncodeOptions::default()).unwrap();
//! let image = jpgl::decode(&container).unwrap();
//! assert_eq!((image.width, image.height), (4, 4));
//! assert_eq!(image.data, pixels);
//! ```

pub mod blocks;
pub mod container;
pub mod dc;
pub mod dct;
pub mod quant;
pub mod subsample;
pub mod zigzag;

use crate::color;
use crate::compress::{huffman, rle};
use crate::error::{Error, Result};
use crate::plane::{self, Plane};

use container::Header;
use dct::Dct2d;
use quant::QuantTable;
use zigzag::ZigzagScan;

/// Maximum supported image dimension (the header stores 16-bit sizes).
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Bytes of serialized AC coefficients per tile.
const AC_BYTES_PER_TILE: usize = (quant::BLOCK_SIZE * quant::BLOCK_SIZE - 1) * 2;

/// Encoder configuration.
///
/// Use [`EncodeOptions::builder()`] for a fluent API, or one of the presets.
///
/// # Example
///
/// ```rust
/// use jpgl::EncodeOptions;
///
/// let options = EncodeOptions::builder()
///     .quality(85)
///     .subsampling(2, 2)
///     .build();
/// assert_eq!(options.quality, 85);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Quality level 0-100; 0 is treated as 1 by the table scaling.
    pub quality: u8,
    /// Tile edge length. Must equal 8, the size the quantization tables
    /// are defined for.
    pub block_size: u8,
    /// Vertical chroma subsampling factor.
    pub subsample_vertical: u8,
    /// Horizontal chroma subsampling factor.
    pub subsample_horizontal: u8,
    /// Sample value used to pad planes out to whole subsampling windows
    /// and tiles.
    pub fill_value: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            quality: 75,
            block_size: quant::BLOCK_SIZE as u8,
            subsample_vertical: 2,
            subsample_horizontal: 2,
            fill_value: 128,
        }
    }
}

impl EncodeOptions {
    pub fn builder() -> EncodeOptionsBuilder {
        EncodeOptionsBuilder::new()
    }

    /// Preset: small output, visibly lossy.
    pub fn fast() -> Self {
        Self {
            quality: 50,
            ..Self::default()
        }
    }

    /// Preset: the default quality/size trade-off.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset: fine quantization and full-resolution chroma.
    pub fn max_quality() -> Self {
        Self {
            quality: 95,
            subsample_vertical: 1,
            subsample_horizontal: 1,
            ..Self::default()
        }
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self::fast(),
            Preset::Balanced => Self::balanced(),
            Preset::MaxQuality => Self::max_quality(),
        }
    }
}

/// Named encoder configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Fast,
    Balanced,
    MaxQuality,
}

/// Fluent builder for [`EncodeOptions`].
#[derive(Debug, Clone)]
pub struct EncodeOptionsBuilder {
    options: EncodeOptions,
}

impl EncodeOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: EncodeOptions::default(),
        }
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.options.quality = quality;
        self
    }

    pub fn block_size(mut self, block_size: u8) -> Self {
        self.options.block_size = block_size;
        self
    }

    pub fn subsampling(mut self, vertical: u8, horizontal: u8) -> Self {
        self.options.subsample_vertical = vertical;
        self.options.subsample_horizontal = horizontal;
        self
    }

    pub fn fill_value(mut self, fill_value: u8) -> Self {
        self.options.fill_value = fill_value;
        self
    }

    pub fn build(self) -> EncodeOptions {
        self.options
    }
}

impl Default for EncodeOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded image: interleaved RGB samples plus dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Packed `R G B` triplets, row-major.
    pub data: Vec<u8>,
}

/// A validated encoder configuration with its precomputed tables.
///
/// Construction derives the DCT basis, zigzag order, and both quantization
/// tables once; they are immutable afterwards, so one encoder can be shared
/// across threads and reused for any number of images.
#[derive(Debug, Clone)]
pub struct Encoder {
    options: EncodeOptions,
    dct: Dct2d,
    zigzag: ZigzagScan,
    luma_table: QuantTable,
    chroma_table: QuantTable,
}

impl Encoder {
    /// Validates `options` and precomputes the per-configuration state.
    ///
    /// # Errors
    ///
    /// Returns an error when quality exceeds 100, the block size is not 8,
    /// or either subsampling factor is zero.
    pub fn new(options: EncodeOptions) -> Result<Self> {
        if options.quality > 100 {
            return Err(Error::InvalidQuality(options.quality));
        }
        if options.block_size as usize != quant::BLOCK_SIZE {
            return Err(Error::InvalidBlockSize(options.block_size));
        }
        if options.subsample_vertical == 0 || options.subsample_horizontal == 0 {
            return Err(Error::InvalidSubsampling {
                vertical: options.subsample_vertical,
                horizontal: options.subsample_horizontal,
            });
        }

        let block_size = options.block_size as usize;
        Ok(Self {
            options,
            dct: Dct2d::new(block_size),
            zigzag: ZigzagScan::new(block_size),
            luma_table: QuantTable::luma(options.quality),
            chroma_table: QuantTable::chroma(options.quality),
        })
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes an interleaved RGB image into a container.
    ///
    /// # Arguments
    ///
    /// * `data` - Packed `R G B` triplets, row-major
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn encode(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.encode_into(&mut output, data, width, height)?;
        Ok(output)
    }

    /// Encodes into a caller-provided buffer, which is cleared first.
    pub fn encode_into(
        &self,
        output: &mut Vec<u8>,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Error::ImageTooLarge {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }
        let expected_len = (width as usize) * (height as usize) * 3;
        if data.len() != expected_len {
            return Err(Error::InvalidDataLength {
                expected: expected_len,
                actual: data.len(),
            });
        }

        let width = width as usize;
        let height = height as usize;
        let block_size = self.options.block_size as usize;
        let fill = self.options.fill_value;

        let ycbcr = color::rgb_to_ycbcr_buffer(data)?;
        let [y_plane, cb_plane, cr_plane] = plane::deinterleave3(&ycbcr, width, height)?;

        let cb_small = subsample::downsample(
            &cb_plane,
            self.options.subsample_vertical as usize,
            self.options.subsample_horizontal as usize,
            fill,
        );
        let cr_small = subsample::downsample(
            &cr_plane,
            self.options.subsample_vertical as usize,
            self.options.subsample_horizontal as usize,
            fill,
        );
        let chroma_width = cb_small.width();
        let chroma_height = cb_small.height();

        let y_tiles = blocks::split(&y_plane, block_size, fill);
        let cb_tiles = blocks::split(&cb_small, block_size, fill);
        let cr_tiles = blocks::split(&cr_small, block_size, fill);

        let mut sequences = self.forward_tiles(&y_tiles, &self.luma_table)?;
        sequences.extend(self.forward_tiles(&cb_tiles, &self.chroma_table)?);
        sequences.extend(self.forward_tiles(&cr_tiles, &self.chroma_table)?);

        // DC terms first as differences, then every tile's AC tail, all as
        // big-endian i16.
        let dc_terms: Vec<i16> = sequences.iter().map(|seq| seq[0]).collect();
        let dc_diffs = dc::encode(&dc_terms)?;
        let mut combined = Vec::with_capacity(dc_diffs.len() * 2);
        for &diff in &dc_diffs {
            debug_assert!(i16::try_from(diff).is_ok());
            combined.extend_from_slice(&(diff as i16).to_be_bytes());
        }

        let mut ac_bytes = Vec::with_capacity(sequences.len() * AC_BYTES_PER_TILE);
        for sequence in &sequences {
            for &value in &sequence[1..] {
                ac_bytes.extend_from_slice(&value.to_be_bytes());
            }
        }
        combined.extend_from_slice(&rle::compress(&ac_bytes));

        let payload = huffman::compress(&combined);

        output.clear();
        let header = Header {
            width: width as u16,
            height: height as u16,
            block_size: self.options.block_size,
            quality: self.options.quality,
            chroma_width: chroma_width as u16,
            chroma_height: chroma_height as u16,
        };
        header.write_to(output);
        output.extend_from_slice(&payload);
        container::seal(output);
        Ok(())
    }

    /// DCT, quantization, and zigzag for one plane's tiles, preserving
    /// tile order.
    fn forward_tiles(&self, tiles: &[Vec<u8>], table: &QuantTable) -> Result<Vec<Vec<i16>>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            tiles
                .par_iter()
                .map(|tile| self.forward_tile(tile, table))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            tiles
                .iter()
                .map(|tile| self.forward_tile(tile, table))
                .collect()
        }
    }

    fn forward_tile(&self, tile: &[u8], table: &QuantTable) -> Result<Vec<i16>> {
        let coeffs = self.dct.forward_block(tile)?;
        let quantized = quant::quantize(&coeffs, table)?;
        self.zigzag.encode(&quantized)
    }
}

/// Encodes an interleaved RGB image with a one-off encoder.
///
/// # Example
///
/// ```rust
/// let pixels = vec![200u8; 2 * 2 * 3];
/// let container = jpgl::encode(&pixels, 2, 2, &jpgl::EncodeOptions::fast()).unwrap();
/// assert!(jpgl::decode(&container).is_ok());
/// ```
pub fn encode(data: &[u8], width: u32, height: u32, options: &EncodeOptions) -> Result<Vec<u8>> {
    Encoder::new(*options)?.encode(data, width, height)
}

/// Encodes into a caller-provided buffer with a one-off encoder.
pub fn encode_into(
    output: &mut Vec<u8>,
    data: &[u8],
    width: u32,
    height: u32,
    options: &EncodeOptions,
) -> Result<()> {
    Encoder::new(*options)?.encode_into(output, data, width, height)
}

/// Decodes a container back into an interleaved RGB image.
///
/// Everything needed is re-derived from the container header; no encoder
/// configuration is required.
///
/// # Errors
///
/// Returns an error on framing or checksum failures and on any payload
/// whose entropy-coded contents do not match the tile layout the header
/// declares.
pub fn decode(data: &[u8]) -> Result<DecodedImage> {
    let (header, payload) = container::parse(data)?;
    if header.block_size as usize != quant::BLOCK_SIZE {
        return Err(Error::InvalidDecode(format!(
            "unsupported block size {}",
            header.block_size
        )));
    }

    let width = header.width as usize;
    let height = header.height as usize;
    let chroma_width = header.chroma_width as usize;
    let chroma_height = header.chroma_height as usize;
    let block_size = header.block_size as usize;

    let dct = Dct2d::new(block_size);
    let zigzag = ZigzagScan::new(block_size);
    let luma_table = QuantTable::luma(header.quality);
    let chroma_table = QuantTable::chroma(header.quality);

    let (y_tiles_x, y_tiles_y) = blocks::grid_dims(width, height, block_size);
    let (c_tiles_x, c_tiles_y) = blocks::grid_dims(chroma_width, chroma_height, block_size);
    let luma_tiles = y_tiles_x * y_tiles_y;
    let chroma_tiles = c_tiles_x * c_tiles_y;
    let total_tiles = luma_tiles + 2 * chroma_tiles;

    let combined = huffman::decompress(payload)?;
    let dc_len = total_tiles * 2;
    if combined.len() < dc_len {
        return Err(Error::InvalidDecode(format!(
            "payload holds {} bytes, {dc_len} needed for the dc region",
            combined.len()
        )));
    }

    let dc_diffs: Vec<i32> = combined[..dc_len]
        .chunks_exact(2)
        .map(|pair| i16::from_be_bytes([pair[0], pair[1]]) as i32)
        .collect();
    let dc_terms = dc::decode(&dc_diffs)?;

    let ac_bytes = rle::decompress(&combined[dc_len..])?;
    let expected_ac = total_tiles * AC_BYTES_PER_TILE;
    if ac_bytes.len() != expected_ac {
        return Err(Error::InvalidDecode(format!(
            "ac region holds {} bytes, expected {expected_ac}",
            ac_bytes.len()
        )));
    }

    let mut sequences = Vec::with_capacity(total_tiles);
    for (tile_index, &dc_term) in dc_terms.iter().enumerate() {
        let start = tile_index * AC_BYTES_PER_TILE;
        let mut sequence = Vec::with_capacity(block_size * block_size);
        sequence.push(dc_term);
        for pair in ac_bytes[start..start + AC_BYTES_PER_TILE].chunks_exact(2) {
            sequence.push(i16::from_be_bytes([pair[0], pair[1]]));
        }
        sequences.push(sequence);
    }

    let y_plane = rebuild_plane(
        &sequences[..luma_tiles],
        width,
        height,
        &dct,
        &zigzag,
        &luma_table,
    )?;
    let cb_plane = rebuild_plane(
        &sequences[luma_tiles..luma_tiles + chroma_tiles],
        chroma_width,
        chroma_height,
        &dct,
        &zigzag,
        &chroma_table,
    )?;
    let cr_plane = rebuild_plane(
        &sequences[luma_tiles + chroma_tiles..],
        chroma_width,
        chroma_height,
        &dct,
        &zigzag,
        &chroma_table,
    )?;

    let cb_full = subsample::upsample(&cb_plane, width, height);
    let cr_full = subsample::upsample(&cr_plane, width, height);

    let ycbcr = plane::interleave3(&y_plane, &cb_full, &cr_full)?;
    let rgb = color::ycbcr_to_rgb_buffer(&ycbcr)?;

    Ok(DecodedImage {
        width: header.width as u32,
        height: header.height as u32,
        data: rgb,
    })
}

fn rebuild_plane(
    sequences: &[Vec<i16>],
    width: usize,
    height: usize,
    dct: &Dct2d,
    zigzag: &ZigzagScan,
    table: &QuantTable,
) -> Result<Plane> {
    let tiles = inverse_tiles(sequences, dct, zigzag, table)?;
    blocks::merge(&tiles, dct.block_size(), width, height)
}

/// Unscan, dequantize, and inverse-DCT one plane's tiles, preserving tile
/// order.
fn inverse_tiles(
    sequences: &[Vec<i16>],
    dct: &Dct2d,
    zigzag: &ZigzagScan,
    table: &QuantTable,
) -> Result<Vec<Vec<u8>>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        sequences
            .par_iter()
            .map(|sequence| inverse_tile(sequence, dct, zigzag, table))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        sequences
            .iter()
            .map(|sequence| inverse_tile(sequence, dct, zigzag, table))
            .collect()
    }
}

fn inverse_tile(
    sequence: &[i16],
    dct: &Dct2d,
    zigzag: &ZigzagScan,
    table: &QuantTable,
) -> Result<Vec<u8>> {
    let quantized = zigzag.decode(sequence)?;
    let coeffs = quant::dequantize(&quantized, table)?;
    dct.inverse_block(&coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_the_balanced_preset() {
        assert_eq!(EncodeOptions::default(), EncodeOptions::balanced());
        let options = EncodeOptions::default();
        assert_eq!(options.quality, 75);
        assert_eq!(options.block_size, 8);
        assert_eq!(options.subsample_vertical, 2);
        assert_eq!(options.fill_value, 128);
    }

    #[test]
    fn builder_overrides_individual_fields() {
        let options = EncodeOptions::builder()
            .quality(30)
            .subsampling(1, 2)
            .fill_value(0)
            .build();
        assert_eq!(options.quality, 30);
        assert_eq!(options.subsample_vertical, 1);
        assert_eq!(options.subsample_horizontal, 2);
        assert_eq!(options.fill_value, 0);
        assert_eq!(options.block_size, 8);
    }

    #[test]
    fn presets_cover_the_quality_range() {
        assert_eq!(EncodeOptions::fast().quality, 50);
        assert_eq!(EncodeOptions::max_quality().quality, 95);
        assert_eq!(EncodeOptions::max_quality().subsample_vertical, 1);
        assert_eq!(
            EncodeOptions::from_preset(Preset::Fast),
            EncodeOptions::fast()
        );
        assert_eq!(
            EncodeOptions::from_preset(Preset::Balanced),
            EncodeOptions::balanced()
        );
        assert_eq!(
            EncodeOptions::from_preset(Preset::MaxQuality),
            EncodeOptions::max_quality()
        );
    }

    #[test]
    fn construction_rejects_bad_configurations() {
        let over_quality = EncodeOptions {
            quality: 101,
            ..EncodeOptions::default()
        };
        assert!(matches!(
            Encoder::new(over_quality),
            Err(Error::InvalidQuality(101))
        ));

        let bad_block = EncodeOptions::builder().block_size(16).build();
        assert!(matches!(
            Encoder::new(bad_block),
            Err(Error::InvalidBlockSize(16))
        ));

        let bad_subsampling = EncodeOptions::builder().subsampling(0, 2).build();
        assert!(matches!(
            Encoder::new(bad_subsampling),
            Err(Error::InvalidSubsampling {
                vertical: 0,
                horizontal: 2
            })
        ));
    }

    #[test]
    fn encode_rejects_bad_arguments() {
        let encoder = Encoder::new(EncodeOptions::default()).unwrap();
        assert!(matches!(
            encoder.encode(&[], 0, 4),
            Err(Error::InvalidDimensions {
                width: 0,
                height: 4
            })
        ));
        assert!(matches!(
            encoder.encode(&[0; 12], 70_000, 1),
            Err(Error::ImageTooLarge { .. })
        ));
        assert!(matches!(
            encoder.encode(&[0; 11], 2, 2),
            Err(Error::InvalidDataLength {
                expected: 12,
                actual: 11
            })
        ));
    }

    #[test]
    fn one_pixel_image_round_trips() {
        let pixels = [90u8, 140, 200];
        let container = encode(&pixels, 1, 1, &EncodeOptions::default()).unwrap();
        let image = decode(&container).unwrap();
        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.data.len(), 3);
    }

    #[test]
    fn encode_into_clears_the_output_buffer() {
        let mut output = vec![1, 2, 3];
        let pixels = vec![128u8; 2 * 2 * 3];
        encode_into(&mut output, &pixels, 2, 2, &EncodeOptions::default()).unwrap();
        assert_eq!(&output[..4], &container::MAGIC);
    }

    #[test]
    fn quality_zero_is_accepted_and_decodable() {
        let pixels = vec![128u8; 8 * 8 * 3];
        let options = EncodeOptions::builder().quality(0).build();
        let container = encode(&pixels, 8, 8, &options).unwrap();
        assert!(decode(&container).is_ok());
    }
}
