//! Image processing pipeline module
//!
//! RAW sensor frames to calibrated colour and exposure diagnostics: CFA
//! resolution, demosaicing, colour transform, display encoding, statistics,
//! background recomputation and the batch conversion outputs.

pub mod cfa;
pub mod color;
pub mod common;
pub mod conversions;
pub mod debayer;
pub mod display;
pub mod export;
pub mod raw;
pub mod scheduler;
pub mod statistics;

pub use common::{
    CalibrationWarning,
    PipelineError,
    Result,
};

pub use raw::{
    BlackLevel,
    Calibration,
    CfaPattern,
    RawFrameReader,
    RawLoaderReader,
    SensorFrame,
};

pub use cfa::{CfaColor, CfaLayout, resolve_cfa};

pub use color::{
    ColorMatrix,
    ColorParams,
    ColorTransform,
    WhiteBalanceCoefficients,
    WhiteBalanceMode,
};

pub use debayer::{DemosaicMode, DemosaicedImage, RgbPixel, demosaic, demosaic_cancellable, demosaic_with};

pub use display::{DisplayImage, render, srgb_transfer};

pub use statistics::{
    ExposureStatistic,
    HistogramBins,
    Region,
    compute_histogram,
    compute_region_statistics,
};

pub use scheduler::{ComputeScheduler, ViewerSession};

pub use export::{
    ConversionConfig,
    ConversionConfigBuilder,
    OutputKind,
    PixelScale,
    TiffCompression,
};

pub use conversions::{ConversionReport, RawConversionPipeline};
