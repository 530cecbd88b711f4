//! 24-bit BMP output in the layout the legacy conversion tools produced.
//!
//! 54-byte header, BGR pixels, rows stored bottom-up and padded to four
//! bytes. The file size field is `((w + 3) & !3) * h * 3 + 54` and the file
//! is zero-filled up to that size, which is somewhat larger than the pixel
//! data needs; readers ignore the excess.

use std::io::Write;

use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::types::{DemosaicedImage, RgbPixel};
use crate::image_pipeline::export::types::ConversionConfig;
use crate::image_pipeline::export::writer::ImageWriter;

pub const BMP_HEADER_SIZE: usize = 54;

const SIGNATURE: u16 = 0x4d42;
const INFO_HEADER_SIZE: u32 = 40;
const PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 24;
const LEGACY_GAMMA: f32 = 1.0 / 2.2;
const CLIPPED_BGR: [u8; 3] = [255, 255, 255];

/// How linear values become bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmpPixelEncoding {
    /// `255 * clamp(v)^(1/2.2)`, truncated.
    Gamma,
    /// Each channel divided by the channel sum first.
    ChromaOnly,
}

#[inline]
pub fn legacy_gamma_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0).powf(LEGACY_GAMMA) * 255.0) as u8
}

pub fn bmp_file_size(width: usize, height: usize) -> Result<usize> {
    width
        .checked_add(3)
        .map(|w| w & !3)
        .and_then(|v| v.checked_mul(height))
        .and_then(|v| v.checked_mul(3))
        .and_then(|v| v.checked_add(BMP_HEADER_SIZE))
        .filter(|&size| size <= u32::MAX as usize && width <= i32::MAX as usize && height <= i32::MAX as usize)
        .ok_or(PipelineError::InvalidDimensions(width, height))
}

/// Header for a bottom-up image.
pub fn bmp_header(width: usize, height: usize) -> Result<[u8; BMP_HEADER_SIZE]> {
    let file_size = bmp_file_size(width, height)? as u32;
    let mut header = [0u8; BMP_HEADER_SIZE];
    header[0..2].copy_from_slice(&SIGNATURE.to_le_bytes());
    header[2..6].copy_from_slice(&file_size.to_le_bytes());
    header[10..14].copy_from_slice(&(BMP_HEADER_SIZE as u32).to_le_bytes());
    header[14..18].copy_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    header[18..22].copy_from_slice(&(width as u32).to_le_bytes());
    header[22..26].copy_from_slice(&(height as u32).to_le_bytes());
    header[26..28].copy_from_slice(&PLANES.to_le_bytes());
    header[28..30].copy_from_slice(&BITS_PER_PIXEL.to_le_bytes());
    // compression, data size, resolution and palette fields stay zero
    Ok(header)
}

/// Builds the whole file; `pixel_bgr(x, y)` uses top-down coordinates.
pub fn encode_bmp<F: Fn(usize, usize) -> [u8; 3]>(width: usize, height: usize, pixel_bgr: F) -> Result<Vec<u8>> {
    let header = bmp_header(width, height)?;
    let mut bytes = vec![0u8; bmp_file_size(width, height)?];
    bytes[..BMP_HEADER_SIZE].copy_from_slice(&header);

    let row_size = (width * 3 + 3) & !3;
    for (stored, y) in (0..height).rev().enumerate() {
        let row_start = BMP_HEADER_SIZE + stored * row_size;
        for x in 0..width {
            let offset = row_start + x * 3;
            bytes[offset..offset + 3].copy_from_slice(&pixel_bgr(x, y));
        }
    }
    Ok(bytes)
}

pub struct LegacyBmpWriter {
    encoding: BmpPixelEncoding,
}

impl LegacyBmpWriter {
    pub fn new(encoding: BmpPixelEncoding) -> Self {
        Self { encoding }
    }

    fn pixel_bgr(&self, pixel: &RgbPixel, pixel_scale: f32) -> [u8; 3] {
        if pixel.clipped {
            return CLIPPED_BGR;
        }
        let [r, g, b] = pixel.rgb;
        let rgb = match self.encoding {
            BmpPixelEncoding::Gamma => [r, g, b],
            BmpPixelEncoding::ChromaOnly => {
                let sum = r + g + b;
                if sum == 0.0 {
                    [0.0; 3]
                } else {
                    [r / sum, g / sum, b / sum]
                }
            }
        };
        let [r, g, b] = rgb.map(|c| legacy_gamma_byte(c * pixel_scale));
        [b, g, r]
    }
}

impl ImageWriter for LegacyBmpWriter {
    fn write_image(
        &self,
        image: &DemosaicedImage,
        output: &mut dyn Write,
        _config: &ConversionConfig,
        pixel_scale: f32,
    ) -> Result<()> {
        debug!("Encoding {:?} BMP image: {}x{}", self.encoding, image.width, image.height);
        let bytes = encode_bmp(image.width, image.height, |x, y| {
            self.pixel_bgr(&image.pixels[y * image.width + x], pixel_scale)
        })?;
        output.write_all(&bytes)?;
        Ok(())
    }
}
