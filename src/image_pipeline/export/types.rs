//! Batch conversion configuration types

use crate::image_pipeline::color::ColorParams;
use crate::image_pipeline::debayer::DemosaicMode;
use crate::image_pipeline::statistics::Region;

/// Raw samples above `white_level - DEFAULT_HIGHLIGHT_MARGIN` are treated
/// as clipped in batch outputs.
pub const DEFAULT_HIGHLIGHT_MARGIN: f32 = 10.0;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Files a conversion can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// White balance and camera matrix, 24-bit BMP.
    Srgb,
    /// White balance only, 24-bit BMP.
    FakeSrgb,
    /// Like `Srgb` with brightness removed.
    Chroma,
    /// Linear sRGB as 32-bit float RGB TIFF.
    Tiff,
    /// Black-subtracted raw samples as 32-bit floats.
    F32,
}

impl OutputKind {
    /// Appended to the configured path prefix.
    pub fn file_suffix(self) -> &'static str {
        match self {
            OutputKind::Srgb => "merged-srgb.bmp",
            OutputKind::FakeSrgb => "merged.bmp",
            OutputKind::Chroma => "merged-chroma-only.bmp",
            OutputKind::Tiff => "merged.tiff",
            OutputKind::F32 => ".f32",
        }
    }
}

/// Multiplier applied to linear values before encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelScale {
    Fixed(f32),
    /// Scale so the brightest unclipped channel inside this rectangle,
    /// given in demosaiced-image coordinates, becomes 1.
    ScaleToMax(Region),
}

/// Configuration for RAW conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    pub outputs: Vec<OutputKind>,
    /// Prepended to every output file name; may include a directory.
    pub prefix: String,
    pub pixel_scale: PixelScale,
    /// Overrides the decoder's white level.
    pub white_level: Option<f32>,
    pub color: ColorParams,
    pub demosaic: DemosaicMode,
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor value for compression (typically 2 for horizontal differencing)
    pub predictor: Option<u16>,
    /// Whether to validate image dimensions before conversion
    pub validate_dimensions: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            outputs: vec![OutputKind::Srgb],
            prefix: String::new(),
            pixel_scale: PixelScale::Fixed(1.0),
            white_level: None,
            color: ColorParams::builder()
                .highlight_margin(DEFAULT_HIGHLIGHT_MARGIN)
                .build(),
            demosaic: DemosaicMode::Block,
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    outputs: Option<Vec<OutputKind>>,
    prefix: Option<String>,
    pixel_scale: Option<PixelScale>,
    white_level: Option<f32>,
    color: Option<ColorParams>,
    demosaic: Option<DemosaicMode>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
}

impl ConversionConfigBuilder {
    pub fn outputs(mut self, outputs: impl IntoIterator<Item = OutputKind>) -> Self {
        self.outputs = Some(outputs.into_iter().collect());
        self
    }

    pub fn output(mut self, output: OutputKind) -> Self {
        self.outputs.get_or_insert_with(Vec::new).push(output);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn pixel_scale(mut self, scale: PixelScale) -> Self {
        self.pixel_scale = Some(scale);
        self
    }

    pub fn white_level(mut self, white_level: f32) -> Self {
        self.white_level = Some(white_level);
        self
    }

    pub fn color(mut self, color: ColorParams) -> Self {
        self.color = Some(color);
        self
    }

    pub fn demosaic(mut self, mode: DemosaicMode) -> Self {
        self.demosaic = Some(mode);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        let mut outputs = Vec::new();
        for kind in self.outputs.unwrap_or(default.outputs) {
            if !outputs.contains(&kind) {
                outputs.push(kind);
            }
        }
        ConversionConfig {
            outputs,
            prefix: self.prefix.unwrap_or(default.prefix),
            pixel_scale: self.pixel_scale.unwrap_or(default.pixel_scale),
            white_level: self.white_level.or(default.white_level),
            color: self.color.unwrap_or(default.color),
            demosaic: self.demosaic.unwrap_or(default.demosaic),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
        }
    }
}
