use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::debayer::types::{DemosaicedImage, RgbPixel};
use crate::image_pipeline::display::srgb::{exposure_coefficient, srgb_transfer};
use crate::image_pipeline::display::types::DisplayImage;

/// Width in pixels of each band of the clipped-highlight overlay.
pub const CLIP_STRIPE_WIDTH: usize = 4;

const STRIPE_DARK: [u8; 3] = [0, 0, 0];
const STRIPE_LIGHT: [u8; 3] = [255, 255, 255];

/// Turns linear sRGB pixels into display bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayEncoder {
    coef: f32,
    mark_clipped: bool,
}

impl DisplayEncoder {
    pub fn new(exposure_compensation: f32, mark_clipped: bool) -> Self {
        Self {
            coef: exposure_coefficient(exposure_compensation),
            mark_clipped,
        }
    }

    pub fn coefficient(&self) -> f32 {
        self.coef
    }

    #[inline]
    pub fn encode(&self, pixel: &RgbPixel, x: usize, y: usize) -> [u8; 3] {
        if self.mark_clipped && pixel.clipped {
            return clip_stripe(x, y);
        }
        pixel.rgb.map(|c| (srgb_transfer(c * self.coef) * 255.0).round() as u8)
    }
}

/// Diagonal black and white bands running along `x + y`.
#[inline]
pub fn clip_stripe(x: usize, y: usize) -> [u8; 3] {
    if ((x + y) / CLIP_STRIPE_WIDTH) % 2 == 0 {
        STRIPE_DARK
    } else {
        STRIPE_LIGHT
    }
}

/// Encodes a whole demosaiced image for display, rows in parallel.
pub fn render(image: &DemosaicedImage, exposure_compensation: f32, mark_clipped: bool) -> DisplayImage {
    let encoder = DisplayEncoder::new(exposure_compensation, mark_clipped);
    debug!(
        "Rendering {}x{}, exposure coefficient {}, clip marking {}",
        image.width, image.height, encoder.coefficient(), mark_clipped
    );

    let mut data = vec![0u8; image.width * image.height * 3];
    if !data.is_empty() {
        data.par_chunks_mut(image.width * 3)
            .zip(image.pixels.par_chunks(image.width))
            .enumerate()
            .for_each(|(y, (out, pixels))| {
                for (x, (rgb, pixel)) in out.chunks_exact_mut(3).zip(pixels).enumerate() {
                    rgb.copy_from_slice(&encoder.encode(pixel, x, y));
                }
            });
    }

    DisplayImage {
        width: image.width,
        height: image.height,
        data,
    }
}
