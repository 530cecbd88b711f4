//! Colour processing parameters

use tracing::warn;

use crate::image_pipeline::color::matrix::ColorMatrix;
use crate::image_pipeline::color::white_balance::{WhiteBalanceCoefficients, WhiteBalanceMode};
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::CalibrationWarning;
use crate::image_pipeline::raw::types::Calibration;

/// User-facing colour settings shared by rendering, conversion and
/// statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorParams {
    pub white_balance: WhiteBalanceMode,
    /// Overrides the calibration matrix. White balance is disabled while set.
    pub custom_matrix: Option<ColorMatrix>,
    /// Apply the camera to sRGB matrix; identity when off.
    pub camera_to_srgb: bool,
    /// With a positive margin, samples above `white_level - highlight_margin`
    /// count as clipped. With zero, only samples at white do.
    pub highlight_margin: f32,
    /// Advisories raised while building these parameters.
    pub warnings: Vec<CalibrationWarning>,
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            white_balance: WhiteBalanceMode::default(),
            custom_matrix: None,
            camera_to_srgb: true,
            highlight_margin: 0.0,
            warnings: Vec::new(),
        }
    }
}

impl ColorParams {
    pub fn builder() -> ColorParamsBuilder {
        ColorParamsBuilder::default()
    }

    /// Resolves the white balance and matrix that apply to a frame with the
    /// given calibration.
    pub fn resolve(&self, calibration: &Calibration) -> Result<(WhiteBalanceCoefficients, ColorMatrix)> {
        if let Some(matrix) = self.custom_matrix {
            return Ok((WhiteBalanceCoefficients::UNITY, matrix));
        }
        let white_balance = WhiteBalanceCoefficients::for_mode(self.white_balance, calibration)?;
        let matrix = if self.camera_to_srgb {
            calibration.cam_to_srgb
        } else {
            ColorMatrix::IDENTITY
        };
        Ok((white_balance, matrix))
    }
}

/// Builder for ColorParams
#[derive(Default)]
pub struct ColorParamsBuilder {
    white_balance: Option<WhiteBalanceMode>,
    custom_matrix: Option<ColorMatrix>,
    camera_to_srgb: Option<bool>,
    highlight_margin: Option<f32>,
}

impl ColorParamsBuilder {
    pub fn white_balance(mut self, mode: WhiteBalanceMode) -> Self {
        self.white_balance = Some(mode);
        self
    }

    pub fn custom_matrix(mut self, matrix: ColorMatrix) -> Self {
        self.custom_matrix = Some(matrix);
        self
    }

    pub fn camera_to_srgb(mut self, enable: bool) -> Self {
        self.camera_to_srgb = Some(enable);
        self
    }

    pub fn highlight_margin(mut self, margin: f32) -> Self {
        self.highlight_margin = Some(margin);
        self
    }

    pub fn build(self) -> ColorParams {
        let default = ColorParams::default();
        let mut warnings = Vec::new();

        let white_balance = match (self.custom_matrix, self.white_balance) {
            (Some(_), Some(mode)) if mode != WhiteBalanceMode::None => {
                warn!("{}", CalibrationWarning::WhiteBalanceIgnored);
                warnings.push(CalibrationWarning::WhiteBalanceIgnored);
                WhiteBalanceMode::None
            }
            (Some(_), _) => WhiteBalanceMode::None,
            (None, mode) => mode.unwrap_or(default.white_balance),
        };

        ColorParams {
            white_balance,
            custom_matrix: self.custom_matrix,
            camera_to_srgb: self.camera_to_srgb.unwrap_or(default.camera_to_srgb),
            highlight_margin: self.highlight_margin.unwrap_or(default.highlight_margin).max(0.0),
            warnings,
        }
    }
}
