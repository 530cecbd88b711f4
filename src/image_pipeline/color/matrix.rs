use std::str::FromStr;

use crate::image_pipeline::common::error::{PipelineError, Result};

/// XYZ to linear sRGB, D65 white point.
pub const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// Linear sRGB to XYZ using the sRGB primaries.
pub const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124, 0.3576, 0.1805],
    [0.2126, 0.7152, 0.0722],
    [0.0193, 0.1192, 0.9505],
];

/// 3x3 matrix from camera RGB to linear sRGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    rows: [[f32; 3]; 3],
}

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix::new([
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ]);

    pub const fn new(rows: [[f32; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Builds a camera to sRGB matrix from a camera to XYZ matrix, with rows
    /// scaled so that a neutral camera value maps to sRGB white.
    pub fn from_camera_to_xyz(cam_to_xyz: [[f32; 3]; 3]) -> Self {
        let mut rows = [[0.0f32; 3]; 3];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| XYZ_TO_SRGB[r][k] * cam_to_xyz[k][c]).sum();
            }
        }
        Self::new(rows).normalize_rows()
    }

    /// Scales each row to sum to one. Rows summing to (nearly) zero are
    /// left alone.
    pub fn normalize_rows(mut self) -> Self {
        for row in self.rows.iter_mut() {
            let sum: f32 = row.iter().sum();
            if sum.abs() > f32::EPSILON {
                row.iter_mut().for_each(|v| *v /= sum);
            }
        }
        self
    }

    pub fn rows(&self) -> [[f32; 3]; 3] {
        self.rows
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let m = &self.rows;
        [
            m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
            m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
            m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
        ]
    }

    /// Double precision variant for statistics accumulated over whole
    /// frames.
    pub fn apply_f64(&self, rgb: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0f64; 3];
        for (r, value) in out.iter_mut().enumerate() {
            *value = (0..3).map(|c| self.rows[r][c] as f64 * rgb[c]).sum();
        }
        out
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Parses nine numbers in row-major order, separated by commas and/or
/// whitespace.
impl FromStr for ColorMatrix {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f32>()
                    .map_err(|e| PipelineError::UnsupportedFormat(format!("colour matrix value '{}': {}", part, e)))
            })
            .collect::<Result<Vec<f32>>>()?;

        if values.len() != 9 || values.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::UnsupportedFormat(format!(
                "colour matrix needs 9 finite values, got {}",
                values.len()
            )));
        }

        let mut rows = [[0.0f32; 3]; 3];
        for (i, value) in values.into_iter().enumerate() {
            rows[i / 3][i % 3] = value;
        }
        Ok(Self::new(rows))
    }
}
