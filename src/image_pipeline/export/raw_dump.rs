use std::io::Write;

use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raw::types::SensorFrame;

/// Writes the active area as `u16` width, `u16` height (little endian)
/// followed by row-major little-endian `f32` samples with black subtracted.
/// Values below black stay negative.
pub fn write_raw_dump(frame: &SensorFrame, output: &mut dyn Write) -> Result<()> {
    let (Ok(width), Ok(height)) = (u16::try_from(frame.width()), u16::try_from(frame.height())) else {
        return Err(PipelineError::InvalidDimensions(frame.width(), frame.height()));
    };
    debug!("Writing float32 dump: {}x{}", width, height);

    let black = frame.black_level();
    let mut bytes = Vec::with_capacity(4 + frame.width() * frame.height() * 4);
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    for row in 0..frame.height() {
        for col in 0..frame.width() {
            bytes.extend_from_slice(&(frame.sample(row, col) - black).to_le_bytes());
        }
    }

    output.write_all(&bytes)?;
    Ok(())
}
