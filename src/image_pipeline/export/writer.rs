use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::types::DemosaicedImage;
use crate::image_pipeline::export::types::ConversionConfig;

pub trait ImageWriter {
    /// Encodes `image` with every linear value multiplied by `pixel_scale`.
    fn write_image(
        &self,
        image: &DemosaicedImage,
        output: &mut dyn Write,
        config: &ConversionConfig,
        pixel_scale: f32,
    ) -> Result<()>;
}
