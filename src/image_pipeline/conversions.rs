//! Pipeline conversions module
//!
//! Orchestrates decode, demosaic and encoding for the batch tools.

mod raw_conversion;


pub use raw_conversion::{ConversionReport, ConvertedOutput, RawConversionPipeline};
