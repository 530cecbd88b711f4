use std::fmt::Write;

use tracing::{info, instrument, warn};

use crate::image_pipeline::cfa::CfaColor;
use crate::image_pipeline::color::WhiteBalanceCoefficients;
use crate::image_pipeline::raw::types::SensorFrame;
use crate::image_pipeline::statistics::types::ValueHistogram;

/// Upper bound on the number of bins, protects against absurd float data.
const MAX_VALUES: usize = 1 << 20;

/// Histogram of every photosite value, the bin being the value times its
/// white-balance coefficient, rounded.
///
/// With `clip` the value is first clamped into `[black, white]` and black is
/// subtracted; without it the raw value is used as is. The four arrays grow
/// as needed and end up the same length.
#[instrument(skip(frame, white_balance))]
pub fn compute_value_histogram(
    frame: &SensorFrame,
    white_balance: &WhiteBalanceCoefficients,
    clip: bool,
) -> ValueHistogram {
    let black = frame.black_level();
    let white = frame.white_level();
    let initial = if clip { white - black + 1.0 } else { white };
    let initial = (initial.max(0.0) as usize).min(MAX_VALUES);

    let mut histogram = ValueHistogram {
        red: vec![0; initial],
        green1: vec![0; initial],
        green2: vec![0; initial],
        blue: vec![0; initial],
        ..ValueHistogram::default()
    };

    for row in 0..frame.height() {
        for col in 0..frame.width() {
            let mut value = frame.sample(row, col);
            if value < black {
                histogram.below_black += 1;
                if clip {
                    value = black;
                }
            } else if value > white {
                histogram.above_white += 1;
                if clip {
                    value = white;
                }
            }
            if clip {
                value -= black;
            }

            let color = frame.color_at(row, col);
            let scaled = (value * white_balance.get(color)).round();
            let index = if scaled > 0.0 { (scaled as usize).min(MAX_VALUES - 1) } else { 0 };
            let bins = match color {
                CfaColor::Red => &mut histogram.red,
                CfaColor::Green1 => &mut histogram.green1,
                CfaColor::Green2 => &mut histogram.green2,
                CfaColor::Blue => &mut histogram.blue,
            };
            if index >= bins.len() {
                bins.resize(index + 1, 0);
            }
            bins[index] += 1;
        }
    }

    let len = histogram.len();
    for bins in [
        &mut histogram.red,
        &mut histogram.green1,
        &mut histogram.green2,
        &mut histogram.blue,
    ] {
        bins.resize(len, 0);
    }

    if histogram.below_black > 0 {
        warn!("{} pixels have values less than black level", histogram.below_black);
    }
    if histogram.above_white > 0 {
        warn!("{} pixels have values greater than white level", histogram.above_white);
    }
    info!("Value histogram computed with {} bins", len);
    histogram
}

impl ValueHistogram {
    pub fn len(&self) -> usize {
        self.red
            .len()
            .max(self.green1.len())
            .max(self.green2.len())
            .max(self.blue.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `value,red,green-1,green-2,blue` followed by one line per bin.
    pub fn to_csv(&self) -> String {
        let count = |bins: &[u64], i: usize| bins.get(i).copied().unwrap_or(0);
        let mut out = String::from("value,red,green-1,green-2,blue\n");
        for i in 0..self.len() {
            let _ = writeln!(
                out,
                "{},{},{},{},{}",
                i,
                count(&self.red, i),
                count(&self.green1, i),
                count(&self.green2, i),
                count(&self.blue, i)
            );
        }
        out
    }

    /// Mathematica assignment `histogram={{r..},{g1..},{b..},{g2..}};`, one
    /// list per line in red, green-1, blue, green-2 order.
    pub fn to_mathematica(&self) -> String {
        let len = self.len();
        let list = |bins: &[u64]| {
            (0..len)
                .map(|i| bins.get(i).copied().unwrap_or(0).to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        format!(
            "histogram={{\n{{{}}},\n{{{}}},\n{{{}}},\n{{{}}}\n}};\n",
            list(&self.red),
            list(&self.green1),
            list(&self.blue),
            list(&self.green2)
        )
    }
}
