//! RAW frame reader implementation using the rawloader library.
//!
//! Maps rawloader's decoded image onto a [`SensorFrame`]: the raw buffer is
//! kept as-is and the crop rectangle becomes the active area, so no samples
//! are copied or rescaled here.

use std::io::Cursor;

use rawloader::RawImageData as RawloaderImageData;
use tracing::{debug, warn};

use crate::image_pipeline::color::ColorMatrix;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raw::reader::RawFrameReader;
use crate::image_pipeline::raw::types::{
    BlackLevel, Calibration, CfaPattern, FrameGeometry, SampleBuffer, SensorFrame,
};

/// RAW frame reader that uses the rawloader library for decoding.
///
/// Supports any mosaic format rawloader can decode (ARW, CR2, NEF, ORF,
/// RAF, DNG, ...). Linear DNGs and other images with more than one
/// component per pixel are rejected.
pub struct RawLoaderReader;

impl RawLoaderReader {
    /// Reorders rawloader's `[R, G, B, E]` coefficients into
    /// `[R, G1, G2, B]`.
    fn wb_to_cfa_order(coeffs: [f32; 4]) -> [f32; 4] {
        [coeffs[0], coeffs[1], coeffs[3], coeffs[2]]
    }

    fn cam_to_srgb(cam_to_xyz: [[f32; 4]; 3]) -> ColorMatrix {
        let mut rows = [[0.0f32; 3]; 3];
        for (row, values) in rows.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = cam_to_xyz[row][col];
            }
        }
        ColorMatrix::from_camera_to_xyz(rows)
    }
}

impl RawFrameReader for RawLoaderReader {
    /// Decodes a RAW file held in memory.
    ///
    /// # Errors
    ///
    /// * `DecodeError` when rawloader cannot parse the data
    /// * `UnsupportedFormat` for non-mosaic images
    /// * any validation error from [`SensorFrame::new`]
    fn read_frame(&self, data: &[u8]) -> Result<SensorFrame> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        debug!(
            "Decoded {} {}: {}x{}, cpp={}",
            decoded.clean_make, decoded.clean_model, decoded.width, decoded.height, decoded.cpp
        );

        if decoded.cpp != 1 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "{} components per pixel, expected a single-channel mosaic",
                decoded.cpp
            )));
        }

        // crops are (top, right, bottom, left)
        let [top, right, bottom, left] = decoded.crops;
        let geometry = FrameGeometry {
            width: decoded.width.saturating_sub(left + right),
            height: decoded.height.saturating_sub(top + bottom),
            stride: decoded.width,
            left_margin: left,
            top_margin: top,
        };

        let cfa = CfaPattern::from_fn(|row, col| decoded.cfa.color_at(row + top, col + left));

        // blacklevels are indexed by colour, not by tile position
        let black = BlackLevel::from_color_levels(decoded.blacklevels.map(f32::from), &cfa);
        let white_level = decoded.whitelevels.iter().copied().max().unwrap_or(u16::MAX) as f32;

        let daylight_wb = Self::wb_to_cfa_order(decoded.neutralwb());
        let as_shot_wb = if decoded.wb_coeffs[..3].iter().all(|c| c.is_finite() && *c > 0.0) {
            Self::wb_to_cfa_order(decoded.wb_coeffs)
        } else {
            warn!("As-shot white balance unavailable, falling back to daylight");
            daylight_wb
        };

        let calibration = Calibration {
            as_shot_wb,
            daylight_wb,
            cam_to_srgb: Self::cam_to_srgb(decoded.cam_to_xyz()),
        };

        let samples = match decoded.data {
            RawloaderImageData::Integer(values) => SampleBuffer::U16(values),
            RawloaderImageData::Float(values) => SampleBuffer::F32(values),
        };

        debug!(
            "Active area {}x{} at ({}, {}), white level {}",
            geometry.width, geometry.height, left, top, white_level
        );

        SensorFrame::new(geometry, samples, black, white_level, cfa, calibration)
    }
}
