//! RAW sensor frame module
//!
//! The sensor frame data model and the seam to the external RAW decoder.

mod reader;
mod rawloader_reader;
pub mod types;

#[cfg(test)]
mod tests;

pub use reader::RawFrameReader;
pub use rawloader_reader::RawLoaderReader;
pub use types::{
    BlackLevel, Calibration, CfaPattern, FrameGeometry, SampleBuffer, SensorFrame,
    SensorFrameBuilder,
};
