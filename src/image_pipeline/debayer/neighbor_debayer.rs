use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::cfa::CfaLayout;
use crate::image_pipeline::color::ColorTransform;
use crate::image_pipeline::debayer::Debayer;
use crate::image_pipeline::debayer::types::RgbPixel;
use crate::image_pipeline::raw::types::SensorFrame;

const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

/// Full-resolution demosaic.
///
/// A photosite keeps its own channel. Each other channel is the mean of the
/// photosites of that channel among its eight neighbours. Neighbours outside
/// the active area are skipped, never mirrored or repeated, so edge and
/// corner pixels average fewer samples.
pub struct NeighborDebayer;

impl NeighborDebayer {
    fn pixel(
        frame: &SensorFrame,
        transform: &ColorTransform,
        layout: &CfaLayout,
        row: usize,
        col: usize,
    ) -> RgbPixel {
        let mut balanced = [0.0f32; 3];
        let mut normalized = [0.0f32; 3];
        let mut counts = [0u32; 3];

        let own = layout.color_at(row, col);
        let own_channel = own.channel();
        let own_sample = transform.normalize(frame.sample(row, col));
        balanced[own_channel] = transform.balance(own_sample, own);
        normalized[own_channel] = own_sample.value;
        counts[own_channel] = 1;

        for (dy, dx) in NEIGHBOR_OFFSETS {
            let (Some(r), Some(c)) = (row.checked_add_signed(dy), col.checked_add_signed(dx)) else {
                continue;
            };
            if r >= frame.height() || c >= frame.width() {
                continue;
            }
            let color = layout.color_at(r, c);
            let channel = color.channel();
            if channel == own_channel {
                continue;
            }
            let sample = transform.normalize(frame.sample(r, c));
            balanced[channel] += transform.balance(sample, color);
            normalized[channel] += sample.value;
            counts[channel] += 1;
        }

        let clipped = (0..3).any(|ch| counts[ch] > 0 && transform.is_clipped(normalized[ch] / counts[ch] as f32));
        RgbPixel {
            rgb: transform.merge(balanced, counts),
            clipped,
        }
    }
}

impl Debayer for NeighborDebayer {
    fn output_size(&self, frame: &SensorFrame) -> (usize, usize) {
        debug!("Neighbour-averaged demosaic {}x{}", frame.width(), frame.height());
        (frame.width(), frame.height())
    }

    fn process_rows(&self, frame: &SensorFrame, transform: &ColorTransform, first_row: usize, rows: &mut [RgbPixel]) {
        let layout = *frame.layout();
        rows.par_chunks_mut(frame.width()).enumerate().for_each(|(i, row)| {
            let y = first_row + i;
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = Self::pixel(frame, transform, &layout, y, x);
            }
        });
    }
}
