//! Debayering module for converting Bayer mosaics to linear sRGB
//!
//! Both modes are pure functions of the frame and the colour transform and
//! run rows in parallel on the rayon pool.

mod block_debayer;
mod neighbor_debayer;
pub mod types;


use tracing::{debug, instrument};

use crate::image_pipeline::color::{ColorParams, ColorTransform};
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::SensorFrame;

pub use block_debayer::BlockDebayer;
pub use neighbor_debayer::NeighborDebayer;
pub use types::{DemosaicMode, DemosaicedImage, RgbPixel};

/// Output rows computed between two cancellation checks.
pub const BAND_ROWS: usize = 64;

pub trait Debayer {
    /// Output `(width, height)` for `frame`.
    fn output_size(&self, frame: &SensorFrame) -> (usize, usize);

    /// Fills `rows`, whole output rows starting at output row `first_row`.
    fn process_rows(&self, frame: &SensorFrame, transform: &ColorTransform, first_row: usize, rows: &mut [RgbPixel]);

    fn process(&self, frame: &SensorFrame, transform: &ColorTransform) -> DemosaicedImage {
        let (width, height) = self.output_size(frame);
        let mut pixels = vec![RgbPixel::default(); width * height];
        if !pixels.is_empty() {
            self.process_rows(frame, transform, 0, &mut pixels);
        }
        DemosaicedImage::new(width, height, pixels)
    }

    /// Like [`process`](Self::process), checking `is_cancelled` before each
    /// band of [`BAND_ROWS`] rows. `None` once it reports true.
    fn process_cancellable(
        &self,
        frame: &SensorFrame,
        transform: &ColorTransform,
        is_cancelled: &dyn Fn() -> bool,
    ) -> Option<DemosaicedImage> {
        let (width, height) = self.output_size(frame);
        let mut pixels = vec![RgbPixel::default(); width * height];
        if !pixels.is_empty() {
            for (band, rows) in pixels.chunks_mut(width * BAND_ROWS).enumerate() {
                if is_cancelled() {
                    debug!("Demosaic cancelled at row {}", band * BAND_ROWS);
                    return None;
                }
                self.process_rows(frame, transform, band * BAND_ROWS, rows);
            }
        }
        Some(DemosaicedImage::new(width, height, pixels))
    }
}

fn debayer_for(mode: DemosaicMode) -> &'static dyn Debayer {
    match mode {
        DemosaicMode::Block => &BlockDebayer,
        DemosaicMode::NeighborAveraged => &NeighborDebayer,
    }
}

/// Demosaics `frame` with colour settings resolved against its calibration.
#[instrument(skip(frame, params), fields(width = frame.width(), height = frame.height()))]
pub fn demosaic(frame: &SensorFrame, mode: DemosaicMode, params: &ColorParams) -> Result<DemosaicedImage> {
    let transform = ColorTransform::for_frame(frame, params)?;
    Ok(demosaic_with(frame, mode, &transform))
}

pub fn demosaic_with(frame: &SensorFrame, mode: DemosaicMode, transform: &ColorTransform) -> DemosaicedImage {
    debayer_for(mode).process(frame, transform)
}

/// [`demosaic_with`] that gives up between row bands once `is_cancelled`
/// returns true.
pub fn demosaic_cancellable(
    frame: &SensorFrame,
    mode: DemosaicMode,
    transform: &ColorTransform,
    is_cancelled: impl Fn() -> bool,
) -> Option<DemosaicedImage> {
    debayer_for(mode).process_cancellable(frame, transform, &is_cancelled)
}
