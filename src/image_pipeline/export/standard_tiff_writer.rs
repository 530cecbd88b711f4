use std::io::Write;

use tiff::encoder::colortype::RGB32Float;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::types::DemosaicedImage;
use crate::image_pipeline::export::types::{ConversionConfig, TiffCompression};
use crate::image_pipeline::export::writer::ImageWriter;

/// Writes linear sRGB as a floating-point RGB TIFF.
pub struct StandardTiffWriter;

impl StandardTiffWriter {
    fn compression(compression: TiffCompression) -> Compression {
        match compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        }
    }
}

impl ImageWriter for StandardTiffWriter {
    fn write_image(
        &self,
        image: &DemosaicedImage,
        output: &mut dyn Write,
        config: &ConversionConfig,
        pixel_scale: f32,
    ) -> Result<()> {
        debug!("Encoding float TIFF image: {}x{}", image.width, image.height);

        let (Ok(width), Ok(height)) = (u32::try_from(image.width), u32::try_from(image.height)) else {
            return Err(PipelineError::InvalidDimensions(image.width, image.height));
        };
        let data: Vec<f32> = image
            .pixels
            .iter()
            .flat_map(|pixel| pixel.rgb.map(|c| c * pixel_scale))
            .collect();

        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(Self::compression(config.compression));

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => Predictor::Horizontal,
                _ => Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        encoder
            .write_image::<RGB32Float>(width, height, &data)
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
