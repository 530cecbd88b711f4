use tracing::warn;

use crate::image_pipeline::cfa::CfaColor;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raw::types::Calibration;

/// Where white-balance coefficients come from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WhiteBalanceMode {
    /// Coefficients recorded by the camera for this shot.
    #[default]
    AsShot,
    /// The camera's daylight (neutral) coefficients.
    Daylight,
    /// All coefficients 1.
    None,
    /// User supplied, in `[R, G1, G2, B]` order.
    Custom([f32; 4]),
}

/// Per-role multipliers, normalized so the largest is 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhiteBalanceCoefficients {
    coefs: [f32; 4],
}

impl WhiteBalanceCoefficients {
    pub const UNITY: WhiteBalanceCoefficients = WhiteBalanceCoefficients { coefs: [1.0; 4] };

    /// Validates and normalizes `[R, G1, G2, B]` coefficients.
    pub fn new(coefs: [f32; 4]) -> Result<Self> {
        if coefs.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err(PipelineError::InvalidWhiteBalance(coefs));
        }
        let max = coefs.iter().copied().fold(0.0f32, f32::max);
        if max <= 0.0 {
            return Err(PipelineError::InvalidWhiteBalance(coefs));
        }
        Ok(Self { coefs: coefs.map(|c| c / max) })
    }

    /// Like [`new`](Self::new), but a missing second-green coefficient
    /// (zero or not finite) takes the first green's value first. Cameras
    /// commonly report only three coefficients.
    pub fn from_camera(mut coefs: [f32; 4]) -> Result<Self> {
        let g2 = CfaColor::Green2.index();
        if coefs[g2] == 0.0 || !coefs[g2].is_finite() {
            coefs[g2] = coefs[CfaColor::Green1.index()];
        }
        Self::new(coefs)
    }

    pub fn for_mode(mode: WhiteBalanceMode, calibration: &Calibration) -> Result<Self> {
        match mode {
            WhiteBalanceMode::AsShot => Self::from_camera(calibration.as_shot_wb).or_else(|e| {
                warn!("As-shot white balance rejected ({}), using daylight", e);
                Self::from_camera(calibration.daylight_wb)
            }),
            WhiteBalanceMode::Daylight => Self::from_camera(calibration.daylight_wb),
            WhiteBalanceMode::None => Ok(Self::UNITY),
            WhiteBalanceMode::Custom(coefs) => Self::new(coefs),
        }
    }

    #[inline]
    pub fn get(&self, color: CfaColor) -> f32 {
        self.coefs[color.index()]
    }

    pub fn as_array(&self) -> [f32; 4] {
        self.coefs
    }
}

impl Default for WhiteBalanceCoefficients {
    fn default() -> Self {
        Self::UNITY
    }
}
