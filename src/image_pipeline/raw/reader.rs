use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::SensorFrame;

/// Source of decoded sensor frames. The decoding itself is delegated to an
/// external library; implementors only map its output onto [`SensorFrame`].
pub trait RawFrameReader {
    fn read_frame(&self, data: &[u8]) -> Result<SensorFrame>;
}
