use tracing::{debug, instrument, warn};

use crate::image_pipeline::cfa::CfaColor;
use crate::image_pipeline::color::{ColorMatrix, SRGB_TO_XYZ, WhiteBalanceCoefficients};
use crate::image_pipeline::raw::types::SensorFrame;
use crate::image_pipeline::statistics::types::{
    ChannelMeans, Chromaticity, ExposureCounts, ExposureStatistic, Region,
};

pub fn compute_region_statistics(
    frame: &SensorFrame,
    region: Option<Region>,
    white_balance: &WhiteBalanceCoefficients,
    matrix: &ColorMatrix,
) -> ExposureStatistic {
    compute_region_statistics_cancellable(frame, region, white_balance, matrix, || false).unwrap_or_default()
}

/// Mean colour and exposure classification of a region, the whole frame
/// when `region` is `None`.
///
/// Every sample is clamped into `[black, white]` before averaging; clamps
/// and samples sitting exactly on either level are counted.
/// `is_cancelled` is polled once per row.
#[instrument(skip(frame, white_balance, matrix, is_cancelled))]
pub fn compute_region_statistics_cancellable<F: Fn() -> bool>(
    frame: &SensorFrame,
    region: Option<Region>,
    white_balance: &WhiteBalanceCoefficients,
    matrix: &ColorMatrix,
    is_cancelled: F,
) -> Option<ExposureStatistic> {
    let region = region
        .unwrap_or(Region::new(0, 0, frame.width(), frame.height()))
        .clipped_to(frame.width(), frame.height());
    if region.is_empty() {
        return Some(ExposureStatistic {
            region,
            ..ExposureStatistic::default()
        });
    }

    let black = frame.black_level();
    let white = frame.white_level();
    let mut sums = [0.0f64; 4];
    let mut samples = [0u64; 4];
    let mut counts = ExposureCounts::default();

    for row in region.y..region.y + region.height {
        if is_cancelled() {
            debug!("Region statistics cancelled at row {}", row);
            return None;
        }
        for col in region.x..region.x + region.width {
            let mut value = frame.sample(row, col);
            if value < black {
                counts.clamped_low += 1;
                value = black;
            } else if value > white {
                counts.clamped_high += 1;
                value = white;
            } else if value == black {
                counts.at_black += 1;
            } else if value == white {
                counts.at_white += 1;
            }
            let role = frame.color_at(row, col).index();
            sums[role] += (value - black) as f64;
            samples[role] += 1;
        }
    }

    let mean = |color: CfaColor| {
        let i = color.index();
        if samples[i] == 0 { 0.0 } else { sums[i] / samples[i] as f64 }
    };
    let means = ChannelMeans {
        red: mean(CfaColor::Red),
        green1: mean(CfaColor::Green1),
        green2: mean(CfaColor::Green2),
        blue: mean(CfaColor::Blue),
    };

    let misexposed = counts.any();
    if misexposed {
        warn!(
            "Region {:?} misexposed: {} below black, {} above white, {} at black, {} at white",
            region, counts.clamped_low, counts.clamped_high, counts.at_black, counts.at_white
        );
    }

    let green_samples = [(CfaColor::Green1, means.green1), (CfaColor::Green2, means.green2)]
        .into_iter()
        .filter(|(color, _)| samples[color.index()] > 0)
        .map(|(color, value)| value * white_balance.get(color) as f64)
        .collect::<Vec<_>>();
    let green = if green_samples.is_empty() {
        0.0
    } else {
        green_samples.iter().sum::<f64>() / green_samples.len() as f64
    };
    let balanced = [
        means.red * white_balance.get(CfaColor::Red) as f64,
        green,
        means.blue * white_balance.get(CfaColor::Blue) as f64,
    ];

    Some(ExposureStatistic {
        region,
        means,
        counts,
        misexposed,
        chromaticity: chromaticity(matrix.apply_f64(balanced)),
    })
}

/// XYZ and xyY of a linear sRGB value.
pub fn chromaticity(linear_srgb: [f64; 3]) -> Chromaticity {
    let mut xyz = [0.0f64; 3];
    for (row, value) in xyz.iter_mut().enumerate() {
        *value = (0..3).map(|c| SRGB_TO_XYZ[row][c] * linear_srgb[c]).sum();
    }
    let sum: f64 = xyz.iter().sum();
    let xyy = if sum == 0.0 {
        [0.0, 0.0, xyz[1]]
    } else {
        [xyz[0] / sum, xyz[1] / sum, xyz[1]]
    };
    Chromaticity { linear_srgb, xyz, xyy }
}
