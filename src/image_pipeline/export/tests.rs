#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Seek, SeekFrom};

    use crate::image_pipeline::common::PipelineError;
    use crate::image_pipeline::debayer::{DemosaicMode, DemosaicedImage, RgbPixel};
    use crate::image_pipeline::export::{
        BMP_HEADER_SIZE, BmpPixelEncoding, ConversionConfig, DEFAULT_HIGHLIGHT_MARGIN, ImageWriter,
        LegacyBmpWriter, OutputKind, PixelScale, StandardTiffWriter, TiffCompression, bmp_file_size,
        bmp_header, encode_bmp, legacy_gamma_byte, write_raw_dump,
    };
    use crate::image_pipeline::raw::SensorFrame;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    fn image(width: usize, height: usize, pixels: Vec<RgbPixel>) -> DemosaicedImage {
        DemosaicedImage::new(width, height, pixels)
    }

    fn gray(value: f32) -> RgbPixel {
        RgbPixel { rgb: [value; 3], clipped: false }
    }

    #[test]
    fn test_bmp_header() {
        let header = bmp_header(3, 2).unwrap();

        assert_eq!(&header[0..2], b"BM");
        assert_eq!(u32_at(&header, 2), 78);
        assert_eq!(u32_at(&header, 10), 54);
        assert_eq!(u32_at(&header, 14), 40);
        assert_eq!(u32_at(&header, 18), 3);
        assert_eq!(u32_at(&header, 22), 2);
        assert_eq!(u16_at(&header, 26), 1);
        assert_eq!(u16_at(&header, 28), 24);
        assert_eq!(u32_at(&header, 30), 0);
    }

    #[test]
    fn test_bmp_file_size() {
        assert_eq!(bmp_file_size(3, 2).unwrap(), 78);
        assert_eq!(bmp_file_size(5, 1).unwrap(), 8 * 3 + 54);
        assert_eq!(bmp_file_size(0, 0).unwrap(), BMP_HEADER_SIZE);
        assert!(matches!(
            bmp_file_size(usize::MAX, 2).unwrap_err(),
            PipelineError::InvalidDimensions(_, 2)
        ));
    }

    #[test]
    fn test_bmp_rows_bottom_up_and_padded() {
        let bytes = encode_bmp(2, 2, |x, y| [x as u8, y as u8, 9]).unwrap();

        assert_eq!(bytes.len(), 78);
        // first stored row is the bottom one, rows padded from 6 to 8 bytes
        assert_eq!(&bytes[54..60], &[0, 1, 9, 1, 1, 9]);
        assert_eq!(&bytes[60..62], &[0, 0]);
        assert_eq!(&bytes[62..68], &[0, 0, 9, 1, 0, 9]);
        assert!(bytes[70..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_legacy_gamma_byte() {
        assert_eq!(legacy_gamma_byte(0.0), 0);
        assert_eq!(legacy_gamma_byte(1.0), 255);
        assert_eq!(legacy_gamma_byte(7.5), 255);
        assert_eq!(legacy_gamma_byte(-1.0), 0);
        assert_eq!(legacy_gamma_byte(0.5), (0.5f32.powf(1.0 / 2.2) * 255.0) as u8);
    }

    #[test]
    fn test_bmp_writer_clipped_and_scaled() {
        let pixels = vec![
            RgbPixel { rgb: [0.5, 0.0, 0.0], clipped: false },
            RgbPixel { rgb: [0.0; 3], clipped: true },
        ];
        let mut out = Vec::new();

        LegacyBmpWriter::new(BmpPixelEncoding::Gamma)
            .write_image(&image(2, 1, pixels), &mut out, &ConversionConfig::default(), 2.0)
            .unwrap();

        assert_eq!(out.len(), bmp_file_size(2, 1).unwrap());
        // BGR order, red doubled to 1.0
        assert_eq!(&out[54..57], &[0, 0, 255]);
        assert_eq!(&out[57..60], &[255, 255, 255]);
    }

    #[test]
    fn test_bmp_writer_chroma_only() {
        let pixels = vec![gray(0.8), gray(0.0)];
        let mut out = Vec::new();

        LegacyBmpWriter::new(BmpPixelEncoding::ChromaOnly)
            .write_image(&image(2, 1, pixels), &mut out, &ConversionConfig::default(), 1.0)
            .unwrap();

        let third = legacy_gamma_byte(1.0 / 3.0);
        assert_eq!(&out[54..57], &[third; 3]);
        assert_eq!(&out[57..60], &[0, 0, 0]);
    }

    #[test]
    fn test_bmp_writer_to_file() {
        let mut file = tempfile::tempfile().unwrap();

        LegacyBmpWriter::new(BmpPixelEncoding::Gamma)
            .write_image(&image(3, 3, vec![gray(0.25); 9]), &mut file, &ConversionConfig::default(), 1.0)
            .unwrap();

        let mut bytes = Vec::new();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes.len(), bmp_file_size(3, 3).unwrap());
        assert_eq!(&bytes[0..2], b"BM");
    }

    #[test]
    fn test_tiff_writer() {
        let config = ConversionConfig::builder()
            .compression(TiffCompression::DeflateFast)
            .predictor(Some(2))
            .build();
        let mut out = Vec::new();

        StandardTiffWriter
            .write_image(&image(2, 2, vec![gray(0.5); 4]), &mut out, &config, 1.0)
            .unwrap();

        assert!(!out.is_empty());
        let mut decoder = tiff::decoder::Decoder::new(Cursor::new(out)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (2, 2));
    }

    #[test]
    fn test_raw_dump() {
        let frame = SensorFrame::builder(2, 2)
            .samples_u16(vec![10, 20, 5, 30])
            .black_level(10.0)
            .white_level(100.0)
            .build()
            .unwrap();
        let mut out = Vec::new();

        write_raw_dump(&frame, &mut out).unwrap();

        assert_eq!(out.len(), 4 + 4 * 4);
        assert_eq!(&out[0..4], &[2, 0, 2, 0]);
        let values: Vec<f32> = out[4..]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(values, vec![0.0, 10.0, -5.0, 20.0]);
    }

    #[test]
    fn test_raw_dump_rejects_wide_frame() {
        let frame = SensorFrame::builder(70_000, 1)
            .samples_u16(vec![100; 70_000])
            .black_level(1.0)
            .build()
            .unwrap();

        let result = write_raw_dump(&frame, &mut Vec::new());

        assert!(matches!(result.unwrap_err(), PipelineError::InvalidDimensions(70_000, 1)));
    }

    #[test]
    fn test_config_defaults() {
        let config = ConversionConfig::default();

        assert_eq!(config.outputs, vec![OutputKind::Srgb]);
        assert_eq!(config.pixel_scale, PixelScale::Fixed(1.0));
        assert_eq!(config.color.highlight_margin, DEFAULT_HIGHLIGHT_MARGIN);
        assert_eq!(config.demosaic, DemosaicMode::Block);
        assert_eq!(config.compression, TiffCompression::None);
        assert!(config.validate_dimensions);
    }

    #[test]
    fn test_config_builder() {
        let config = ConversionConfig::builder()
            .outputs([OutputKind::Tiff, OutputKind::Srgb, OutputKind::Tiff])
            .output(OutputKind::F32)
            .prefix("out/shot-")
            .white_level(4000.0)
            .demosaic(DemosaicMode::NeighborAveraged)
            .validate_dimensions(false)
            .build();

        assert_eq!(config.outputs, vec![OutputKind::Tiff, OutputKind::Srgb, OutputKind::F32]);
        assert_eq!(config.prefix, "out/shot-");
        assert_eq!(config.white_level, Some(4000.0));
        assert_eq!(config.demosaic, DemosaicMode::NeighborAveraged);
        assert!(!config.validate_dimensions);
    }

    #[test]
    fn test_file_suffixes() {
        assert_eq!(OutputKind::Srgb.file_suffix(), "merged-srgb.bmp");
        assert_eq!(OutputKind::FakeSrgb.file_suffix(), "merged.bmp");
        assert_eq!(OutputKind::Chroma.file_suffix(), "merged-chroma-only.bmp");
        assert_eq!(OutputKind::Tiff.file_suffix(), "merged.tiff");
        assert_eq!(OutputKind::F32.file_suffix(), ".f32");
    }
}
