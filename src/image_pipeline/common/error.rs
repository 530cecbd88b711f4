use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode RAW image: {0}")]
    DecodeError(String),

    #[error("Failed to encode output image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid sensor levels: black={black}, white={white}")]
    InvalidLevels { black: f32, white: f32 },

    #[error("Sample buffer too small: expected at least {expected} samples, got {actual}")]
    InvalidSampleBuffer { expected: usize, actual: usize },

    #[error("Invalid white balance coefficients: {0:?}")]
    InvalidWhiteBalance([f32; 4]),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
