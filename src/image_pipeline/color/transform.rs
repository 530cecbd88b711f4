use crate::image_pipeline::cfa::CfaColor;
use crate::image_pipeline::color::matrix::ColorMatrix;
use crate::image_pipeline::color::params::ColorParams;
use crate::image_pipeline::color::white_balance::WhiteBalanceCoefficients;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raw::types::SensorFrame;

/// What happened to a sample while it was brought into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampEvent {
    InRange,
    BelowBlack,
    AboveWhite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedSample {
    /// In `[0, 1]`.
    pub value: f32,
    /// Black-subtracted and clamped, in raw units.
    pub level: f32,
    pub event: ClampEvent,
}

/// Raw sample to linear sRGB conversion for one frame.
///
/// Applied in this order: black subtraction, clamp to
/// `[0, white - black]` and divide by that range, white-balance multiply
/// per CFA role, then the 3x3 matrix on the merged (R, G, B) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTransform {
    black_level: f32,
    white_level: f32,
    range: f32,
    white_balance: WhiteBalanceCoefficients,
    matrix: ColorMatrix,
    clip_level: f32,
    strict_clip: bool,
    integer_subpixels: bool,
}

impl ColorTransform {
    pub fn new(
        black_level: f32,
        white_level: f32,
        white_balance: WhiteBalanceCoefficients,
        matrix: ColorMatrix,
    ) -> Result<Self> {
        if !black_level.is_finite() || !white_level.is_finite() || white_level <= black_level {
            return Err(PipelineError::InvalidLevels {
                black: black_level,
                white: white_level,
            });
        }
        Ok(Self {
            black_level,
            white_level,
            range: white_level - black_level,
            white_balance,
            matrix,
            clip_level: 1.0,
            strict_clip: false,
            integer_subpixels: false,
        })
    }

    pub fn for_frame(frame: &SensorFrame, params: &ColorParams) -> Result<Self> {
        let (white_balance, matrix) = params.resolve(frame.calibration())?;
        Ok(Self::new(frame.black_level(), frame.white_level(), white_balance, matrix)?
            .with_highlight_margin(params.highlight_margin))
    }

    /// With a positive margin, samples strictly above `white - margin` (raw
    /// units) count as clipped. A zero margin clips at white itself.
    pub fn with_highlight_margin(mut self, margin: f32) -> Self {
        let margin = margin.max(0.0);
        self.clip_level = ((self.range - margin) / self.range).clamp(0.0, 1.0);
        self.strict_clip = margin > 0.0;
        self
    }

    /// Truncates every white-balanced sample to whole raw units before the
    /// greens are averaged, matching the legacy batch outputs.
    pub fn with_integer_subpixels(mut self, enabled: bool) -> Self {
        self.integer_subpixels = enabled;
        self
    }

    pub fn black_level(&self) -> f32 {
        self.black_level
    }

    pub fn white_level(&self) -> f32 {
        self.white_level
    }

    pub fn white_balance(&self) -> &WhiteBalanceCoefficients {
        &self.white_balance
    }

    pub fn matrix(&self) -> &ColorMatrix {
        &self.matrix
    }

    #[inline]
    pub fn normalize(&self, raw: f32) -> NormalizedSample {
        let shifted = raw - self.black_level;
        let (clamped, event) = if shifted < 0.0 {
            (0.0, ClampEvent::BelowBlack)
        } else if shifted > self.range {
            (self.range, ClampEvent::AboveWhite)
        } else {
            (shifted, ClampEvent::InRange)
        };
        NormalizedSample {
            value: clamped / self.range,
            level: clamped,
            event,
        }
    }

    /// White-balanced value of a normalized sample, still scaled to `[0, 1]`
    /// of the range before the coefficient.
    #[inline]
    pub fn balance(&self, sample: NormalizedSample, color: CfaColor) -> f32 {
        let coefficient = self.white_balance.get(color);
        if self.integer_subpixels {
            (sample.level * coefficient).trunc() / self.range
        } else {
            sample.value * coefficient
        }
    }

    /// True when a normalized, not yet balanced value counts as clipped.
    #[inline]
    pub fn is_clipped(&self, normalized: f32) -> bool {
        if self.strict_clip {
            normalized > self.clip_level
        } else {
            normalized >= self.clip_level
        }
    }

    #[inline]
    pub fn to_linear_srgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        self.matrix.apply(rgb)
    }

    /// Averages balanced channel sums over their sample counts and applies
    /// the matrix. A channel without samples is 0.
    #[inline]
    pub fn merge(&self, sums: [f32; 3], counts: [u32; 3]) -> [f32; 3] {
        let mut rgb = [0.0f32; 3];
        for (channel, value) in rgb.iter_mut().enumerate() {
            if counts[channel] > 0 {
                *value = sums[channel] / counts[channel] as f32;
            }
        }
        self.to_linear_srgb(rgb)
    }
}
