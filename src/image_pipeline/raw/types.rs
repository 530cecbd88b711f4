//! RAW sensor frame data types

use tracing::{debug, warn};

use crate::image_pipeline::cfa::{CfaColor, CfaLayout, resolve_cfa};
use crate::image_pipeline::color::ColorMatrix;
use crate::image_pipeline::common::{CalibrationWarning, PipelineError, Result};

/// Sample storage handed over by the decoder.
///
/// Integer sensors keep their native 16-bit values; decoders that only
/// produce floating point data (some DNGs) are stored as `f32`.
#[derive(Debug, Clone)]
pub enum SampleBuffer {
    U16(Vec<u16>),
    F32(Vec<f32>),
}

impl SampleBuffer {
    pub fn len(&self) -> usize {
        match self {
            SampleBuffer::U16(values) => values.len(),
            SampleBuffer::F32(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        match self {
            SampleBuffer::U16(values) => values[index] as f32,
            SampleBuffer::F32(values) => values[index],
        }
    }
}

/// Black level as reported by the decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlackLevel {
    Uniform(f32),
    /// One value per position of the 2x2 CFA tile, row-major.
    PerQuadrant([f32; 4]),
}

impl BlackLevel {
    /// Builds the level from values indexed by decoder colour (red, green,
    /// blue, second green), placing each at the tile positions of that
    /// colour. Unknown colour indices take the green value.
    pub fn from_color_levels(levels: [f32; 4], cfa: &CfaPattern) -> Self {
        let mut quadrants = [0.0f32; 4];
        for (position, quadrant) in quadrants.iter_mut().enumerate() {
            let color = cfa.color_at(position / 2, position % 2) as usize;
            *quadrant = levels.get(color).copied().unwrap_or(levels[1]);
        }
        if quadrants.iter().all(|&l| l == quadrants[0]) {
            BlackLevel::Uniform(quadrants[0])
        } else {
            BlackLevel::PerQuadrant(quadrants)
        }
    }

    /// Collapses the reported level into the single value used for
    /// normalization. Differing quadrant values are averaged.
    pub fn effective(&self) -> (f32, Option<CalibrationWarning>) {
        match *self {
            BlackLevel::Uniform(level) => (level, None),
            BlackLevel::PerQuadrant(levels) => {
                let averaged = levels.iter().sum::<f32>() / 4.0;
                if levels.iter().all(|&l| l == levels[0]) {
                    (levels[0], None)
                } else {
                    (
                        averaged,
                        Some(CalibrationWarning::InconsistentBlackLevels { levels, averaged }),
                    )
                }
            }
        }
    }
}

impl From<f32> for BlackLevel {
    fn from(level: f32) -> Self {
        BlackLevel::Uniform(level)
    }
}

/// The decoder's colour lookup for one 2x2 tile.
///
/// Indices follow the decoder convention: 0 = red, 1 = green, 2 = blue,
/// 3 = second green.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfaPattern {
    tile: [[u8; 2]; 2],
}

impl CfaPattern {
    pub const fn new(tile: [[u8; 2]; 2]) -> Self {
        Self { tile }
    }

    pub const fn rggb() -> Self {
        Self::new([[0, 1], [1, 2]])
    }

    pub const fn bggr() -> Self {
        Self::new([[2, 1], [1, 0]])
    }

    pub const fn grbg() -> Self {
        Self::new([[1, 0], [2, 1]])
    }

    pub const fn gbrg() -> Self {
        Self::new([[1, 2], [0, 1]])
    }

    /// Samples a decoder colour function on the first tile. The function is
    /// expected to be periodic with period 2 in both axes.
    pub fn from_fn<F: Fn(usize, usize) -> usize>(color_at: F) -> Self {
        let mut tile = [[0u8; 2]; 2];
        for (row, cells) in tile.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = u8::try_from(color_at(row, col)).unwrap_or(u8::MAX);
            }
        }
        Self { tile }
    }

    #[inline]
    pub fn color_at(&self, row: usize, col: usize) -> u8 {
        self.tile[row & 1][col & 1]
    }

    pub fn tile(&self) -> [[u8; 2]; 2] {
        self.tile
    }
}

impl Default for CfaPattern {
    fn default() -> Self {
        Self::rggb()
    }
}

/// Colour calibration supplied by the decoder.
///
/// White-balance arrays are ordered like [`CfaColor::index`]: red, first
/// green, second green, blue.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub as_shot_wb: [f32; 4],
    pub daylight_wb: [f32; 4],
    pub cam_to_srgb: ColorMatrix,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            as_shot_wb: [1.0; 4],
            daylight_wb: [1.0; 4],
            cam_to_srgb: ColorMatrix::IDENTITY,
        }
    }
}

/// Placement of the active area inside the decoder's raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub width: usize,
    pub height: usize,
    /// Samples per buffer row, at least `left_margin + width`.
    pub stride: usize,
    pub left_margin: usize,
    pub top_margin: usize,
}

impl FrameGeometry {
    /// Geometry of a buffer that holds exactly the active area.
    pub fn active(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            stride: width,
            left_margin: 0,
            top_margin: 0,
        }
    }
}

/// One decoded sensor readout together with its calibration.
///
/// Immutable once built. All coordinates taken by its methods are relative
/// to the active area.
#[derive(Debug, Clone)]
pub struct SensorFrame {
    geometry: FrameGeometry,
    samples: SampleBuffer,
    reported_black: BlackLevel,
    black_level: f32,
    white_level: f32,
    cfa: CfaPattern,
    layout: CfaLayout,
    calibration: Calibration,
    warnings: Vec<CalibrationWarning>,
}

impl SensorFrame {
    pub fn builder(width: usize, height: usize) -> SensorFrameBuilder {
        SensorFrameBuilder::new(width, height)
    }

    pub fn new(
        geometry: FrameGeometry,
        samples: SampleBuffer,
        black: BlackLevel,
        white_level: f32,
        cfa: CfaPattern,
        calibration: Calibration,
    ) -> Result<Self> {
        let FrameGeometry { width, height, stride, left_margin, top_margin } = geometry;
        if width == 0 || height == 0 || left_margin + width > stride {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        let expected = stride
            .checked_mul(top_margin + height)
            .ok_or(PipelineError::InvalidDimensions(width, height))?;
        if samples.len() < expected {
            return Err(PipelineError::InvalidSampleBuffer {
                expected,
                actual: samples.len(),
            });
        }

        let mut warnings = Vec::new();
        let (black_level, black_warning) = black.effective();
        if !black_level.is_finite() || !white_level.is_finite() || black_level < 0.0 || white_level <= black_level {
            return Err(PipelineError::InvalidLevels {
                black: black_level,
                white: white_level,
            });
        }
        if let Some(warning) = black_warning {
            warn!("{}", warning);
            warnings.push(warning);
        }
        if black_level == 0.0 {
            warn!("{}", CalibrationWarning::ZeroBlackLevel);
            warnings.push(CalibrationWarning::ZeroBlackLevel);
        }

        let resolution = resolve_cfa(&cfa);
        warnings.extend(resolution.warning);

        debug!(width, height, stride, black_level, white_level, "Sensor frame ready");

        Ok(Self {
            geometry,
            samples,
            reported_black: black,
            black_level,
            white_level,
            cfa,
            layout: resolution.layout,
            calibration,
            warnings,
        })
    }

    /// Replaces the decoder's saturation value, e.g. with a user-supplied one.
    pub fn with_white_level(mut self, white_level: f32) -> Result<Self> {
        if !white_level.is_finite() || white_level <= self.black_level {
            return Err(PipelineError::InvalidLevels {
                black: self.black_level,
                white: white_level,
            });
        }
        self.white_level = white_level;
        Ok(self)
    }

    pub fn width(&self) -> usize {
        self.geometry.width
    }

    pub fn height(&self) -> usize {
        self.geometry.height
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    /// Effective black level after quadrant averaging.
    pub fn black_level(&self) -> f32 {
        self.black_level
    }

    pub fn reported_black_level(&self) -> BlackLevel {
        self.reported_black
    }

    pub fn white_level(&self) -> f32 {
        self.white_level
    }

    /// `white_level - black_level`, always positive.
    pub fn range(&self) -> f32 {
        self.white_level - self.black_level
    }

    pub fn cfa(&self) -> &CfaPattern {
        &self.cfa
    }

    pub fn layout(&self) -> &CfaLayout {
        &self.layout
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn warnings(&self) -> &[CalibrationWarning] {
        &self.warnings
    }

    #[inline]
    pub fn sample(&self, row: usize, col: usize) -> f32 {
        let g = &self.geometry;
        self.samples.get((row + g.top_margin) * g.stride + col + g.left_margin)
    }

    #[inline]
    pub fn color_at(&self, row: usize, col: usize) -> CfaColor {
        self.layout.color_at(row, col)
    }
}

/// Builder for SensorFrame, mostly used by tests and synthetic inputs.
pub struct SensorFrameBuilder {
    geometry: FrameGeometry,
    samples: Option<SampleBuffer>,
    black: Option<BlackLevel>,
    white_level: Option<f32>,
    cfa: Option<CfaPattern>,
    calibration: Option<Calibration>,
}

impl SensorFrameBuilder {
    const DEFAULT_WHITE_LEVEL: f32 = u16::MAX as f32;

    fn new(width: usize, height: usize) -> Self {
        Self {
            geometry: FrameGeometry::active(width, height),
            samples: None,
            black: None,
            white_level: None,
            cfa: None,
            calibration: None,
        }
    }

    pub fn stride(mut self, stride: usize) -> Self {
        self.geometry.stride = stride;
        self
    }

    pub fn margins(mut self, left: usize, top: usize) -> Self {
        self.geometry.left_margin = left;
        self.geometry.top_margin = top;
        self
    }

    pub fn samples_u16(mut self, samples: Vec<u16>) -> Self {
        self.samples = Some(SampleBuffer::U16(samples));
        self
    }

    pub fn samples_f32(mut self, samples: Vec<f32>) -> Self {
        self.samples = Some(SampleBuffer::F32(samples));
        self
    }

    pub fn black_level(mut self, black: impl Into<BlackLevel>) -> Self {
        self.black = Some(black.into());
        self
    }

    pub fn white_level(mut self, white_level: f32) -> Self {
        self.white_level = Some(white_level);
        self
    }

    pub fn cfa(mut self, cfa: CfaPattern) -> Self {
        self.cfa = Some(cfa);
        self
    }

    pub fn calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = Some(calibration);
        self
    }

    pub fn build(self) -> Result<SensorFrame> {
        let samples = self.samples.unwrap_or(SampleBuffer::U16(Vec::new()));
        SensorFrame::new(
            self.geometry,
            samples,
            self.black.unwrap_or(BlackLevel::Uniform(0.0)),
            self.white_level.unwrap_or(Self::DEFAULT_WHITE_LEVEL),
            self.cfa.unwrap_or_default(),
            self.calibration.unwrap_or_default(),
        )
    }
}
