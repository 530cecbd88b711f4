use std::fmt::Write;

use crate::image_pipeline::cfa::CfaColor;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raw::types::SensorFrame;
use crate::image_pipeline::statistics::types::ScanLineTile;

/// Raw values of the tile row containing `row`, one entry per complete
/// 2x2 tile.
pub fn extract_scan_line(frame: &SensorFrame, row: usize) -> Result<Vec<ScanLineTile>> {
    let top = row & !1;
    if top + 1 >= frame.height() {
        return Err(PipelineError::InvalidDimensions(frame.width(), row));
    }

    let tiles = (0..frame.width() / 2)
        .map(|tx| {
            let mut tile = ScanLineTile::default();
            for (dy, dx) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                let (y, x) = (top + dy, tx * 2 + dx);
                let value = frame.sample(y, x);
                match frame.color_at(y, x) {
                    CfaColor::Red => tile.red = value,
                    CfaColor::Green1 => tile.green1 = value,
                    CfaColor::Green2 => tile.green2 = value,
                    CfaColor::Blue => tile.blue = value,
                }
            }
            tile
        })
        .collect();
    Ok(tiles)
}

/// `index,red,green1,green2,blue` lines without a header.
pub fn format_scan_line_csv(tiles: &[ScanLineTile]) -> String {
    let mut out = String::new();
    for (i, tile) in tiles.iter().enumerate() {
        let _ = writeln!(out, "{},{},{},{},{}", i, tile.red, tile.green1, tile.green2, tile.blue);
    }
    out
}
