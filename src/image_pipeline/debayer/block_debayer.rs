use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::cfa::CfaLayout;
use crate::image_pipeline::color::ColorTransform;
use crate::image_pipeline::debayer::Debayer;
use crate::image_pipeline::debayer::types::RgbPixel;
use crate::image_pipeline::raw::types::SensorFrame;

const TILE_OFFSETS: [(usize, usize); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];

/// Half-resolution demosaic: every disjoint 2x2 tile becomes one pixel.
///
/// R and B come straight from their photosites and G is the mean of both
/// greens. A trailing odd row or column is dropped.
pub struct BlockDebayer;

impl BlockDebayer {
    fn tile_pixel(
        frame: &SensorFrame,
        transform: &ColorTransform,
        layout: &CfaLayout,
        row: usize,
        col: usize,
    ) -> RgbPixel {
        let mut sums = [0.0f32; 3];
        let mut counts = [0u32; 3];
        let mut clipped = false;
        for (dy, dx) in TILE_OFFSETS {
            let color = layout.color_at(row + dy, col + dx);
            let sample = transform.normalize(frame.sample(row + dy, col + dx));
            clipped |= transform.is_clipped(sample.value);
            sums[color.channel()] += transform.balance(sample, color);
            counts[color.channel()] += 1;
        }
        RgbPixel {
            rgb: transform.merge(sums, counts),
            clipped,
        }
    }
}

impl Debayer for BlockDebayer {
    fn output_size(&self, frame: &SensorFrame) -> (usize, usize) {
        let size = (frame.width() / 2, frame.height() / 2);
        debug!("Block demosaic {}x{} -> {}x{}", frame.width(), frame.height(), size.0, size.1);
        size
    }

    fn process_rows(&self, frame: &SensorFrame, transform: &ColorTransform, first_row: usize, rows: &mut [RgbPixel]) {
        let width = frame.width() / 2;
        let layout = *frame.layout();
        rows.par_chunks_mut(width).enumerate().for_each(|(i, row)| {
            let ty = first_row + i;
            for (tx, pixel) in row.iter_mut().enumerate() {
                *pixel = Self::tile_pixel(frame, transform, &layout, ty * 2, tx * 2);
            }
        });
    }
}
