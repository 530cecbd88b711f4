#[cfg(test)]
mod tests {
    use crate::image_pipeline::cfa::CfaColor;
    use crate::image_pipeline::common::{CalibrationWarning, PipelineError};
    use crate::image_pipeline::raw::{
        BlackLevel, CfaPattern, RawFrameReader, RawLoaderReader, SampleBuffer, SensorFrame,
    };

    fn ramp(len: usize) -> Vec<u16> {
        (0..len).map(|i| 100 + i as u16).collect()
    }

    #[test]
    fn test_builder_defaults() {
        let frame = SensorFrame::builder(4, 2)
            .samples_u16(ramp(8))
            .black_level(64.0)
            .white_level(1023.0)
            .build()
            .unwrap();

        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.black_level(), 64.0);
        assert_eq!(frame.range(), 959.0);
        assert_eq!(frame.cfa(), &CfaPattern::rggb());
        assert_eq!(frame.color_at(0, 0), CfaColor::Red);
        assert_eq!(frame.color_at(1, 1), CfaColor::Blue);
        assert!(frame.warnings().is_empty());
    }

    #[test]
    fn test_sample_respects_margins_and_stride() {
        // 6x3 buffer, active 4x2 starting at (1, 1)
        let buffer: Vec<u16> = (0..18).collect();
        let frame = SensorFrame::builder(4, 2)
            .stride(6)
            .margins(1, 1)
            .samples_u16(buffer)
            .black_level(1.0)
            .white_level(100.0)
            .build()
            .unwrap();

        assert_eq!(frame.sample(0, 0), 7.0);
        assert_eq!(frame.sample(0, 3), 10.0);
        assert_eq!(frame.sample(1, 0), 13.0);
    }

    #[test]
    fn test_float_samples() {
        let frame = SensorFrame::builder(2, 2)
            .samples_f32(vec![0.25, 0.5, 0.75, 1.0])
            .black_level(0.125)
            .white_level(1.0)
            .build()
            .unwrap();

        assert!(matches!(frame.samples(), SampleBuffer::F32(_)));
        assert_eq!(frame.sample(1, 0), 0.75);
    }

    #[test]
    fn test_rejects_short_buffer() {
        let result = SensorFrame::builder(4, 4).samples_u16(ramp(15)).black_level(1.0).build();

        assert!(matches!(
            result.unwrap_err(),
            PipelineError::InvalidSampleBuffer { expected: 16, actual: 15 }
        ));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let result = SensorFrame::builder(0, 4).samples_u16(ramp(16)).build();

        assert!(matches!(result.unwrap_err(), PipelineError::InvalidDimensions(0, 4)));
    }

    #[test]
    fn test_rejects_margin_past_stride() {
        let result = SensorFrame::builder(4, 1).stride(4).margins(1, 0).samples_u16(ramp(8)).build();

        assert!(matches!(result.unwrap_err(), PipelineError::InvalidDimensions(4, 1)));
    }

    #[test]
    fn test_rejects_white_not_above_black() {
        let result = SensorFrame::builder(2, 2)
            .samples_u16(ramp(4))
            .black_level(512.0)
            .white_level(512.0)
            .build();

        assert!(matches!(result.unwrap_err(), PipelineError::InvalidLevels { .. }));
    }

    #[test]
    fn test_inconsistent_black_levels_are_averaged() {
        let frame = SensorFrame::builder(2, 2)
            .samples_u16(ramp(4))
            .black_level(BlackLevel::PerQuadrant([100.0, 102.0, 100.0, 102.0]))
            .white_level(4095.0)
            .build()
            .unwrap();

        assert_eq!(frame.black_level(), 101.0);
        assert_eq!(
            frame.warnings(),
            &[CalibrationWarning::InconsistentBlackLevels {
                levels: [100.0, 102.0, 100.0, 102.0],
                averaged: 101.0,
            }]
        );
    }

    #[test]
    fn test_equal_quadrants_do_not_warn() {
        let frame = SensorFrame::builder(2, 2)
            .samples_u16(ramp(4))
            .black_level(BlackLevel::PerQuadrant([64.0; 4]))
            .build()
            .unwrap();

        assert_eq!(frame.black_level(), 64.0);
        assert!(frame.warnings().is_empty());
    }

    #[test]
    fn test_color_indexed_black_ignores_unused_fourth_color() {
        let black = BlackLevel::from_color_levels([2048.0, 2048.0, 2048.0, 0.0], &CfaPattern::rggb());
        assert_eq!(black, BlackLevel::Uniform(2048.0));

        let frame = SensorFrame::builder(2, 2)
            .samples_u16(vec![2100; 4])
            .black_level(black)
            .white_level(16383.0)
            .build()
            .unwrap();

        assert_eq!(frame.black_level(), 2048.0);
        assert!(frame.warnings().is_empty());
    }

    #[test]
    fn test_color_indexed_black_follows_cfa_positions() {
        let black = BlackLevel::from_color_levels([10.0, 20.0, 30.0, 0.0], &CfaPattern::bggr());

        assert_eq!(black, BlackLevel::PerQuadrant([30.0, 20.0, 20.0, 10.0]));
    }

    #[test]
    fn test_color_indexed_black_uses_fourth_color_when_present() {
        let cfa = CfaPattern::new([[0, 1], [3, 2]]);

        let black = BlackLevel::from_color_levels([10.0, 20.0, 30.0, 40.0], &cfa);

        assert_eq!(black, BlackLevel::PerQuadrant([10.0, 20.0, 40.0, 30.0]));
    }

    #[test]
    fn test_zero_black_level_warns() {
        let frame = SensorFrame::builder(2, 2).samples_u16(ramp(4)).build().unwrap();

        assert_eq!(frame.warnings(), &[CalibrationWarning::ZeroBlackLevel]);
    }

    #[test]
    fn test_with_white_level() {
        let frame = SensorFrame::builder(2, 2)
            .samples_u16(ramp(4))
            .black_level(64.0)
            .white_level(4095.0)
            .build()
            .unwrap();

        let frame = frame.with_white_level(1000.0).unwrap();
        assert_eq!(frame.white_level(), 1000.0);

        assert!(matches!(
            frame.with_white_level(10.0).unwrap_err(),
            PipelineError::InvalidLevels { .. }
        ));
    }

    #[test]
    fn test_cfa_pattern_from_fn_is_periodic() {
        let pattern = CfaPattern::from_fn(|row, col| match (row % 2, col % 2) {
            (0, 0) => 2,
            (1, 1) => 0,
            _ => 1,
        });

        assert_eq!(pattern, CfaPattern::bggr());
        assert_eq!(pattern.color_at(4, 6), 2);
        assert_eq!(pattern.color_at(5, 7), 0);
    }

    #[test]
    fn test_rawloader_reader_rejects_garbage() {
        let result = RawLoaderReader.read_frame(b"definitely not a raw file");

        assert!(matches!(result.unwrap_err(), PipelineError::DecodeError(_)));
    }
}
