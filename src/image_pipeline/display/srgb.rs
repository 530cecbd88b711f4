/// sRGB opto-electronic transfer function, output clamped to `[0, 1]`.
#[inline]
pub fn srgb_transfer(linear: f32) -> f32 {
    let encoded = if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    encoded.clamp(0.0, 1.0)
}

/// Multiplier for an exposure compensation given in stops.
pub fn exposure_coefficient(stops: f32) -> f32 {
    10f32.powf(stops)
}
