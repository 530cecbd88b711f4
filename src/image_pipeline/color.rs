//! Colour module
//!
//! Black/white normalization, white balance and the camera to sRGB matrix.

pub mod matrix;
pub mod params;
pub mod transform;
pub mod white_balance;

#[cfg(test)]
mod tests;

pub use matrix::{ColorMatrix, SRGB_TO_XYZ, XYZ_TO_SRGB};
pub use params::{ColorParams, ColorParamsBuilder};
pub use transform::{ClampEvent, ColorTransform, NormalizedSample};
pub use white_balance::{WhiteBalanceCoefficients, WhiteBalanceMode};
