use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    color::{ColorMatrix, ColorTransform},
    common::{
        CalibrationWarning,
        error::{PipelineError, Result},
    },
    debayer::{DemosaicMode, DemosaicedImage, demosaic_with},
    export::{
        BmpPixelEncoding, ConversionConfig, ImageWriter, LegacyBmpWriter, OutputKind, PixelScale,
        StandardTiffWriter, write_raw_dump,
    },
    raw::{RawFrameReader, RawLoaderReader, SensorFrame},
    statistics::{ExposureStatistic, Region, compute_region_statistics},
};

/// One encoded output file.
#[derive(Debug, Clone)]
pub struct ConvertedOutput {
    pub kind: OutputKind,
    /// Prefix plus the kind's suffix.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub width: usize,
    pub height: usize,
    pub pixel_scale: f32,
    pub outputs: Vec<ConvertedOutput>,
    pub warnings: Vec<CalibrationWarning>,
}

pub struct RawConversionPipeline<R: RawFrameReader> {
    reader: R,
    config: ConversionConfig,
}

impl RawConversionPipeline<RawLoaderReader> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: RawLoaderReader,
            config,
        }
    }
}

impl<R: RawFrameReader> RawConversionPipeline<R> {
    pub fn with_custom(reader: R, config: ConversionConfig) -> Self {
        Self { reader, config }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        let minimum = match self.config.demosaic {
            DemosaicMode::Block => 2,
            DemosaicMode::NeighborAveraged => 1,
        };
        if width < minimum || height < minimum {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Decodes `input_data`, applying the configured white level.
    pub fn decode(&self, input_data: &[u8]) -> Result<SensorFrame> {
        let frame = self.reader.read_frame(input_data)?;
        match self.config.white_level {
            Some(white_level) => {
                info!(white_level, "Using custom white level");
                frame.with_white_level(white_level)
            }
            None => Ok(frame),
        }
    }

    fn pixel_scale(&self, image: Option<&DemosaicedImage>) -> f32 {
        match (self.config.pixel_scale, image) {
            (PixelScale::Fixed(scale), _) => scale,
            (PixelScale::ScaleToMax(region), Some(image)) => scale_to_max(image, region),
            (PixelScale::ScaleToMax(_), None) => 1.0,
        }
    }

    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8]) -> Result<ConversionReport> {
        info!("Starting RAW conversion");

        let frame = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.decode(input_data)?
        };

        self.convert_frame(&frame)
    }

    /// Produces every configured output for an already decoded frame.
    pub fn convert_frame(&self, frame: &SensorFrame) -> Result<ConversionReport> {
        {
            let _span = tracing::info_span!("validate_dimensions",
                width = frame.width(),
                height = frame.height()
            ).entered();
            self.validate_dimensions(frame.width(), frame.height())?;
        }

        let outputs = &self.config.outputs;
        let needs_calibrated = outputs
            .iter()
            .any(|kind| matches!(kind, OutputKind::Srgb | OutputKind::Chroma | OutputKind::Tiff))
            || matches!(self.config.pixel_scale, PixelScale::ScaleToMax(_));
        let needs_unconverted = outputs.contains(&OutputKind::FakeSrgb);

        let transform = ColorTransform::for_frame(frame, &self.config.color)?.with_integer_subpixels(true);

        let (calibrated, unconverted) = {
            let _span = tracing::info_span!("demosaic", mode = ?self.config.demosaic).entered();
            let calibrated = needs_calibrated.then(|| demosaic_with(frame, self.config.demosaic, &transform));
            let unconverted = if needs_unconverted {
                let without_matrix = ColorTransform::new(
                    frame.black_level(),
                    frame.white_level(),
                    *transform.white_balance(),
                    ColorMatrix::IDENTITY,
                )?
                .with_highlight_margin(self.config.color.highlight_margin)
                .with_integer_subpixels(true);
                Some(demosaic_with(frame, self.config.demosaic, &without_matrix))
            } else {
                None
            };
            (calibrated, unconverted)
        };

        let pixel_scale = self.pixel_scale(calibrated.as_ref());

        let mut converted = Vec::with_capacity(outputs.len());
        for &kind in outputs {
            let _span = tracing::info_span!("encode_output", ?kind).entered();
            let mut bytes = Vec::new();
            match kind {
                OutputKind::F32 => write_raw_dump(frame, &mut bytes)?,
                OutputKind::FakeSrgb => {
                    let image = unconverted.as_ref().ok_or_else(|| missing_image(kind))?;
                    LegacyBmpWriter::new(BmpPixelEncoding::Gamma).write_image(image, &mut bytes, &self.config, pixel_scale)?
                }
                OutputKind::Srgb | OutputKind::Chroma | OutputKind::Tiff => {
                    let image = calibrated.as_ref().ok_or_else(|| missing_image(kind))?;
                    let writer: Box<dyn ImageWriter> = match kind {
                        OutputKind::Srgb => Box::new(LegacyBmpWriter::new(BmpPixelEncoding::Gamma)),
                        OutputKind::Chroma => Box::new(LegacyBmpWriter::new(BmpPixelEncoding::ChromaOnly)),
                        _ => Box::new(StandardTiffWriter),
                    };
                    writer.write_image(image, &mut bytes, &self.config, pixel_scale)?
                }
            }
            converted.push(ConvertedOutput {
                kind,
                file_name: format!("{}{}", self.config.prefix, kind.file_suffix()),
                bytes,
            });
        }

        let mut warnings = frame.warnings().to_vec();
        warnings.extend(self.config.color.warnings.iter().cloned());

        info!(
            width = frame.width(),
            height = frame.height(),
            outputs = converted.len(),
            "Conversion complete"
        );
        Ok(ConversionReport {
            width: frame.width(),
            height: frame.height(),
            pixel_scale,
            outputs: converted,
            warnings,
        })
    }

    /// Converts a file and writes every output next to the configured prefix.
    #[instrument(skip(self, input_path))]
    pub fn convert_file<P: AsRef<Path>>(&self, input_path: P) -> Result<ConversionReport> {
        let input_path = input_path.as_ref();

        info!(input = %input_path.display(), "Converting file");

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                PipelineError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let report = self.convert(&input_data)?;
        self.write_outputs(&report)?;

        Ok(report)
    }

    /// Writes every encoded output of `report` to its file name.
    pub fn write_outputs(&self, report: &ConversionReport) -> Result<()> {
        let _span = tracing::info_span!("write_output_files").entered();
        for output in &report.outputs {
            std::fs::write(&output.file_name, &output.bytes).map_err(|e| {
                PipelineError::OutputWriteError(format!("{}: {}", output.file_name, e))
            })?;
            info!(output = %output.file_name, "Written");
        }
        Ok(())
    }

    /// Mean colour and misexposure of a region, using the configured colour
    /// settings.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn measure(&self, input_data: &[u8], region: Option<Region>) -> Result<ExposureStatistic> {
        let frame = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.decode(input_data)?
        };
        self.measure_frame(&frame, region)
    }

    /// Same as [`measure`](Self::measure) on an already decoded frame.
    pub fn measure_frame(&self, frame: &SensorFrame, region: Option<Region>) -> Result<ExposureStatistic> {
        let (white_balance, matrix) = self.config.color.resolve(frame.calibration())?;
        Ok(compute_region_statistics(frame, region, &white_balance, &matrix))
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}

fn missing_image(kind: OutputKind) -> PipelineError {
    PipelineError::EncodeError(format!("no demosaiced image prepared for {:?}", kind))
}

/// Reciprocal of the largest linear channel among unclipped pixels in
/// `region`; 1 when there is none.
fn scale_to_max(image: &DemosaicedImage, region: Region) -> f32 {
    let region = region.clipped_to(image.width, image.height);
    let max = (region.y..region.y + region.height)
        .flat_map(|y| (region.x..region.x + region.width).map(move |x| y * image.width + x))
        .map(|index| &image.pixels[index])
        .filter(|pixel| !pixel.clipped)
        .flat_map(|pixel| pixel.rgb)
        .fold(0.0f32, f32::max);

    if max > 0.0 {
        let scale = 1.0 / max;
        info!("Computed pixel scale: {}", scale);
        scale
    } else {
        warn!("No unclipped signal in scale reference rectangle {:?}, using scale 1", region);
        1.0
    }
}
