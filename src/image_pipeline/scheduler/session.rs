//! Per-viewer state

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::image_pipeline::color::{ColorParams, ColorTransform};
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::{DemosaicMode, demosaic_cancellable};
use crate::image_pipeline::display::{DisplayImage, render};
use crate::image_pipeline::raw::types::SensorFrame;
use crate::image_pipeline::scheduler::worker::ComputeScheduler;
use crate::image_pipeline::statistics::{
    ExposureStatistic, HistogramBins, Region, bin_count_for_width, compute_histogram_cancellable,
    compute_region_statistics_cancellable,
};

/// The frame a session is showing, tagged so results can be matched to it.
#[derive(Debug, Clone)]
pub struct LoadedFrame {
    pub id: u64,
    pub frame: Arc<SensorFrame>,
}

/// Everything one viewer needs: the current frame, display settings, and
/// background schedulers for the expensive recomputations.
///
/// Loading another frame drops the session's handle on the previous one and
/// cancels every outstanding request. Jobs still running keep their own
/// handle until they notice.
pub struct ViewerSession {
    current: Option<LoadedFrame>,
    next_frame_id: u64,
    color: ColorParams,
    exposure_compensation: f32,
    mark_clipped: bool,
    histogram: ComputeScheduler<HistogramBins>,
    statistics: ComputeScheduler<ExposureStatistic>,
    display: ComputeScheduler<DisplayImage>,
}

impl ViewerSession {
    pub fn new(color: ColorParams) -> Self {
        Self {
            current: None,
            next_frame_id: 1,
            color,
            exposure_compensation: 0.0,
            mark_clipped: false,
            histogram: ComputeScheduler::new("histogram"),
            statistics: ComputeScheduler::new("region-statistics"),
            display: ComputeScheduler::new("display"),
        }
    }

    /// Makes `frame` current and returns its id.
    pub fn load_frame(&mut self, frame: SensorFrame) -> u64 {
        self.cancel_all();
        let id = self.next_frame_id;
        self.next_frame_id += 1;
        info!(id, width = frame.width(), height = frame.height(), "Frame loaded");
        self.current = Some(LoadedFrame {
            id,
            frame: Arc::new(frame),
        });
        id
    }

    pub fn close_frame(&mut self) {
        self.cancel_all();
        self.current = None;
    }

    fn cancel_all(&self) {
        self.histogram.cancel();
        self.statistics.cancel();
        self.display.cancel();
    }

    pub fn frame(&self) -> Option<&LoadedFrame> {
        self.current.as_ref()
    }

    pub fn color_params(&self) -> &ColorParams {
        &self.color
    }

    pub fn set_color_params(&mut self, color: ColorParams) {
        self.color = color;
    }

    pub fn exposure_compensation(&self) -> f32 {
        self.exposure_compensation
    }

    pub fn set_exposure_compensation(&mut self, stops: f32) {
        self.exposure_compensation = stops;
    }

    pub fn mark_clipped(&self) -> bool {
        self.mark_clipped
    }

    pub fn set_mark_clipped(&mut self, enabled: bool) {
        self.mark_clipped = enabled;
    }

    /// Recomputes the raw histogram for a display `display_width` pixels
    /// wide. `Ok(None)` when no frame is loaded.
    pub fn request_histogram(&self, display_width: usize) -> Result<Option<u64>> {
        let Some(loaded) = &self.current else {
            return Ok(None);
        };
        let frame = Arc::clone(&loaded.frame);
        let bin_count = bin_count_for_width(display_width);
        self.histogram
            .submit(move |token| {
                compute_histogram_cancellable(&frame, frame.black_level(), bin_count, || token.is_cancelled())
            })
            .map(Some)
    }

    /// Recomputes exposure statistics for `region`, or the whole frame.
    pub fn request_region_statistics(&self, region: Option<Region>) -> Result<Option<u64>> {
        let Some(loaded) = &self.current else {
            return Ok(None);
        };
        let frame = Arc::clone(&loaded.frame);
        let (white_balance, matrix) = self.color.resolve(frame.calibration())?;
        self.statistics
            .submit(move |token| {
                compute_region_statistics_cancellable(&frame, region, &white_balance, &matrix, || {
                    token.is_cancelled()
                })
            })
            .map(Some)
    }

    /// Demosaics the frame at full resolution and encodes it for display
    /// with the current exposure and clip-marking settings.
    pub fn request_render(&self) -> Result<Option<u64>> {
        let Some(loaded) = &self.current else {
            return Ok(None);
        };
        let frame = Arc::clone(&loaded.frame);
        let transform = ColorTransform::for_frame(&frame, &self.color)?;
        let exposure_compensation = self.exposure_compensation;
        let mark_clipped = self.mark_clipped;
        self.display
            .submit(move |token| {
                let image = demosaic_cancellable(&frame, DemosaicMode::NeighborAveraged, &transform, || {
                    token.is_cancelled()
                })?;
                if token.is_cancelled() {
                    return None;
                }
                Some(render(&image, exposure_compensation, mark_clipped))
            })
            .map(Some)
    }

    pub fn poll_histogram(&self) -> Option<HistogramBins> {
        self.histogram.try_latest().map(|c| c.value)
    }

    pub fn poll_region_statistics(&self) -> Option<ExposureStatistic> {
        self.statistics.try_latest().map(|c| c.value)
    }

    pub fn poll_render(&self) -> Option<DisplayImage> {
        self.display.try_latest().map(|c| c.value)
    }

    pub fn wait_histogram(&self, timeout: Duration) -> Option<HistogramBins> {
        self.histogram.wait_latest(timeout).map(|c| c.value)
    }

    pub fn wait_region_statistics(&self, timeout: Duration) -> Option<ExposureStatistic> {
        self.statistics.wait_latest(timeout).map(|c| c.value)
    }

    pub fn wait_render(&self, timeout: Duration) -> Option<DisplayImage> {
        self.display.wait_latest(timeout).map(|c| c.value)
    }
}
