use tracing::{debug, instrument};

use crate::image_pipeline::cfa::CfaColor;
use crate::image_pipeline::raw::types::SensorFrame;
use crate::image_pipeline::statistics::types::HistogramBins;

/// Bins span `[0, HEADROOM * white_level]`.
pub const HEADROOM: f64 = 1.1;

/// Columns of a histogram display kept for the black and white markers.
const MARKER_COLUMNS: usize = 2;

/// Number of bins for a histogram drawn `display_width` pixels wide.
pub fn bin_count_for_width(display_width: usize) -> usize {
    display_width.saturating_sub(MARKER_COLUMNS)
}

#[inline]
fn bin_index(value: f32, white_level: f32, bin_count: usize) -> usize {
    let scaled = (value as f64 / (HEADROOM * white_level as f64) * (bin_count - 1) as f64).round();
    if scaled > 0.0 {
        (scaled as usize).min(bin_count - 1)
    } else {
        0
    }
}

pub fn compute_histogram(frame: &SensorFrame, black_level: f32, bin_count: usize) -> HistogramBins {
    compute_histogram_cancellable(frame, black_level, bin_count, || false).unwrap_or_default()
}

/// Histogram of raw values, one sample per photosite of every complete 2x2
/// tile. `is_cancelled` is polled once per tile row; `None` means the scan
/// was abandoned.
#[instrument(skip(frame, is_cancelled), fields(width = frame.width(), height = frame.height()))]
pub fn compute_histogram_cancellable<F: Fn() -> bool>(
    frame: &SensorFrame,
    black_level: f32,
    bin_count: usize,
    is_cancelled: F,
) -> Option<HistogramBins> {
    if bin_count == 0 {
        return Some(HistogramBins::default());
    }

    let white_level = frame.white_level();
    let mut bins = HistogramBins {
        red: vec![0; bin_count],
        green: vec![0; bin_count],
        blue: vec![0; bin_count],
        black_level_bin: bin_index(black_level, white_level, bin_count),
        white_level_bin: bin_index(white_level, white_level, bin_count),
        count_max: 0,
    };

    let layout = *frame.layout();
    for y in (0..frame.height().saturating_sub(1)).step_by(2) {
        if is_cancelled() {
            debug!("Histogram computation cancelled at row {}", y);
            return None;
        }
        for x in (0..frame.width().saturating_sub(1)).step_by(2) {
            for (dy, dx) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                let bin = bin_index(frame.sample(y + dy, x + dx), white_level, bin_count);
                let target = match layout.color_at(y + dy, x + dx) {
                    CfaColor::Red => &mut bins.red,
                    CfaColor::Green1 | CfaColor::Green2 => &mut bins.green,
                    CfaColor::Blue => &mut bins.blue,
                };
                target[bin] += 1;
            }
        }
    }

    let max_of = |values: &[u32]| values.iter().copied().max().unwrap_or(0);
    bins.count_max = max_of(&bins.red)
        .max(max_of(&bins.green).div_ceil(2))
        .max(max_of(&bins.blue));

    debug!("Raw histogram with {} bins computed", bin_count);
    Some(bins)
}
