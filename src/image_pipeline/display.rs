//! Display encoding module
//!
//! Exposure compensation, the sRGB transfer function and clipped-highlight
//! marking.

mod renderer;
mod srgb;
pub mod types;


pub use renderer::{CLIP_STRIPE_WIDTH, DisplayEncoder, clip_stripe, render};
pub use srgb::{exposure_coefficient, srgb_transfer};
pub use types::DisplayImage;
