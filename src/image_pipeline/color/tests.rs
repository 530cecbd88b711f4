#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::image_pipeline::cfa::CfaColor;
    use crate::image_pipeline::color::{
        ClampEvent, ColorMatrix, ColorParams, ColorTransform, SRGB_TO_XYZ, WhiteBalanceCoefficients,
        WhiteBalanceMode,
    };
    use crate::image_pipeline::common::{CalibrationWarning, PipelineError};
    use crate::image_pipeline::raw::Calibration;

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-5, "expected {}, got {}", expected, actual);
    }

    fn unity_transform(black: f32, white: f32) -> ColorTransform {
        ColorTransform::new(black, white, WhiteBalanceCoefficients::UNITY, ColorMatrix::IDENTITY).unwrap()
    }

    #[test]
    fn test_normalize_stays_in_unit_range() {
        let transform = unity_transform(64.0, 1023.0);

        for raw in (0..=1200).step_by(7) {
            let sample = transform.normalize(raw as f32);
            assert!((0.0..=1.0).contains(&sample.value), "raw {} gave {}", raw, sample.value);
        }
    }

    #[test]
    fn test_normalize_clamp_events() {
        let transform = unity_transform(64.0, 1023.0);

        let below = transform.normalize(10.0);
        assert_eq!(below.value, 0.0);
        assert_eq!(below.event, ClampEvent::BelowBlack);

        let above = transform.normalize(2000.0);
        assert_eq!(above.value, 1.0);
        assert_eq!(above.event, ClampEvent::AboveWhite);

        let inside = transform.normalize(64.0 + 959.0 / 2.0);
        assert_close(inside.value, 0.5);
        assert_eq!(inside.event, ClampEvent::InRange);
    }

    #[test]
    fn test_rejects_invalid_levels() {
        let result = ColorTransform::new(100.0, 100.0, WhiteBalanceCoefficients::UNITY, ColorMatrix::IDENTITY);

        assert!(matches!(result.unwrap_err(), PipelineError::InvalidLevels { .. }));
    }

    #[test]
    fn test_highlight_margin_lowers_clip_level() {
        let plain = unity_transform(0.0, 255.0);
        assert!(!plain.is_clipped(plain.normalize(254.0).value));
        assert!(plain.is_clipped(plain.normalize(255.0).value));

        let margin = unity_transform(0.0, 255.0).with_highlight_margin(10.0);
        assert!(!margin.is_clipped(margin.normalize(245.0).value));
        assert!(margin.is_clipped(margin.normalize(246.0).value));
    }

    #[test]
    fn test_integer_subpixels_truncate_balanced_samples() {
        let wb = WhiteBalanceCoefficients::new([0.5, 1.0, 1.0, 1.0]).unwrap();
        let exact = ColorTransform::new(0.0, 1000.0, wb, ColorMatrix::IDENTITY).unwrap();
        let truncated = exact.clone().with_integer_subpixels(true);

        let sample = exact.normalize(3.0);
        assert_eq!(sample.level, 3.0);

        assert_close(exact.balance(sample, CfaColor::Red), 1.5 / 1000.0);
        assert_close(truncated.balance(sample, CfaColor::Red), 1.0 / 1000.0);
        assert_close(truncated.balance(sample, CfaColor::Green1), 3.0 / 1000.0);
    }

    #[test]
    fn test_merge_averages_and_skips_empty_channels() {
        let transform = unity_transform(0.0, 1.0);

        let rgb = transform.merge([0.5, 0.75, 0.0], [1, 3, 0]);

        assert_close(rgb[0], 0.5);
        assert_close(rgb[1], 0.25);
        assert_eq!(rgb[2], 0.0);
    }

    #[test]
    fn test_white_balance_normalized_to_max() {
        let wb = WhiteBalanceCoefficients::new([2.0, 1.0, 1.0, 1.5]).unwrap();

        assert_eq!(wb.as_array(), [1.0, 0.5, 0.5, 0.75]);
        assert_eq!(wb.get(CfaColor::Blue), 0.75);
    }

    #[test]
    fn test_white_balance_rejects_invalid() {
        for coefs in [[1.0, -1.0, 1.0, 1.0], [f32::NAN, 1.0, 1.0, 1.0], [0.0; 4]] {
            assert!(matches!(
                WhiteBalanceCoefficients::new(coefs).unwrap_err(),
                PipelineError::InvalidWhiteBalance(_)
            ));
        }
    }

    #[test]
    fn test_camera_white_balance_fills_second_green() {
        let wb = WhiteBalanceCoefficients::from_camera([2.0, 1.0, 0.0, 1.6]).unwrap();

        assert_eq!(wb.get(CfaColor::Green2), wb.get(CfaColor::Green1));
        assert_eq!(wb.get(CfaColor::Green2), 0.5);
    }

    #[test]
    fn test_as_shot_falls_back_to_daylight() {
        let calibration = Calibration {
            as_shot_wb: [f32::NAN, 1.0, 1.0, 1.0],
            daylight_wb: [2.0, 1.0, 1.0, 2.0],
            cam_to_srgb: ColorMatrix::IDENTITY,
        };

        let wb = WhiteBalanceCoefficients::for_mode(WhiteBalanceMode::AsShot, &calibration).unwrap();

        assert_eq!(wb.as_array(), [1.0, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_matrix_from_str() {
        let matrix = ColorMatrix::from_str("1,0,0, 0 1 0,\n0,0,1").unwrap();
        assert!(matrix.is_identity());

        let matrix = ColorMatrix::from_str("1.5 -0.25 -0.25 0 1 0 0 0 1").unwrap();
        assert_eq!(matrix.rows()[0], [1.5, -0.25, -0.25]);
    }

    #[test]
    fn test_matrix_from_str_rejects_bad_input() {
        assert!(ColorMatrix::from_str("1 0 0 0 1 0 0 0").is_err());
        assert!(ColorMatrix::from_str("1 0 0 0 1 0 0 0 x").is_err());
        assert!(ColorMatrix::from_str("").is_err());
    }

    #[test]
    fn test_camera_matrix_rows_sum_to_one() {
        // a camera that already sees sRGB primaries
        let cam_to_xyz = SRGB_TO_XYZ.map(|row| row.map(|v| v as f32 * 0.8));

        let matrix = ColorMatrix::from_camera_to_xyz(cam_to_xyz);

        for row in matrix.rows() {
            assert_close(row.iter().sum(), 1.0);
        }
        let white = matrix.apply([1.0, 1.0, 1.0]);
        for channel in white {
            assert_close(channel, 1.0);
        }
    }

    #[test]
    fn test_custom_matrix_disables_white_balance() {
        let params = ColorParams::builder()
            .white_balance(WhiteBalanceMode::Daylight)
            .custom_matrix(ColorMatrix::IDENTITY)
            .build();

        assert_eq!(params.white_balance, WhiteBalanceMode::None);
        assert_eq!(params.warnings, vec![CalibrationWarning::WhiteBalanceIgnored]);

        let quiet = ColorParams::builder().custom_matrix(ColorMatrix::IDENTITY).build();
        assert!(quiet.warnings.is_empty());
    }

    #[test]
    fn test_params_resolve() {
        let calibration = Calibration {
            as_shot_wb: [2.0, 1.0, 1.0, 1.0],
            daylight_wb: [1.0; 4],
            cam_to_srgb: ColorMatrix::new([[2.0, -1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
        };

        let (wb, matrix) = ColorParams::default().resolve(&calibration).unwrap();
        assert_eq!(wb.as_array(), [1.0, 0.5, 0.5, 0.5]);
        assert_eq!(matrix, calibration.cam_to_srgb);

        let params = ColorParams::builder().camera_to_srgb(false).highlight_margin(-4.0).build();
        let (_, matrix) = params.resolve(&calibration).unwrap();
        assert!(matrix.is_identity());
        assert_eq!(params.highlight_margin, 0.0);
    }
}
