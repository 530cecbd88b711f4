//! Common utilities module
//!
//! Error type and calibration advisories shared across the image pipeline.

pub mod error;
pub mod warning;

pub use error::{PipelineError, Result};
pub use warning::CalibrationWarning;
