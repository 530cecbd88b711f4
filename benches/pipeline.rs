use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rawinspect_rs::image_pipeline::{
    ColorMatrix, ColorParams, ConversionConfig, DemosaicMode, OutputKind, RawConversionPipeline, RawFrameReader,
    Result, SensorFrame, WhiteBalanceCoefficients, compute_histogram, compute_region_statistics, demosaic, render,
};

fn synthetic_frame(width: usize, height: usize) -> SensorFrame {
    let samples = (0..height)
        .flat_map(|y| (0..width).map(move |x| 64 + ((x * 7 + y * 13) % 960) as u16))
        .collect();
    SensorFrame::builder(width, height)
        .samples_u16(samples)
        .black_level(64.0)
        .white_level(1023.0)
        .build()
        .expect("synthetic frame")
}

struct SyntheticReader(SensorFrame);

impl RawFrameReader for SyntheticReader {
    fn read_frame(&self, _data: &[u8]) -> Result<SensorFrame> {
        Ok(self.0.clone())
    }
}

fn benchmark_demosaic(c: &mut Criterion) {
    let mut group = c.benchmark_group("demosaic");
    let params = ColorParams::default();

    for (width, height, label) in [(256, 256, "256x256"), (1024, 1024, "1024x1024")] {
        let frame = synthetic_frame(width, height);
        for (mode, name) in [(DemosaicMode::Block, "block"), (DemosaicMode::NeighborAveraged, "neighbor")] {
            group.bench_with_input(BenchmarkId::new(name, label), &frame, |b, frame| {
                b.iter(|| demosaic(black_box(frame), mode, &params));
            });
        }
    }

    group.finish();
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let frame = synthetic_frame(1024, 1024);
    let image = demosaic(&frame, DemosaicMode::NeighborAveraged, &ColorParams::default()).expect("demosaic");

    for (mark_clipped, label) in [(false, "plain"), (true, "clip_marked")] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &image, |b, image| {
            b.iter(|| render(black_box(image), 0.0, mark_clipped));
        });
    }

    group.finish();
}

fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");
    let frame = synthetic_frame(1024, 1024);

    group.bench_function("histogram", |b| {
        b.iter(|| compute_histogram(black_box(&frame), frame.black_level(), 510));
    });
    group.bench_function("region_statistics", |b| {
        b.iter(|| {
            compute_region_statistics(
                black_box(&frame),
                None,
                &WhiteBalanceCoefficients::UNITY,
                &ColorMatrix::IDENTITY,
            )
        });
    });

    group.finish();
}

fn benchmark_conversion_outputs(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion_outputs");
    let frame = synthetic_frame(512, 512);
    let input: &[u8] = &[];

    for (kind, label) in [
        (OutputKind::Srgb, "srgb_bmp"),
        (OutputKind::Chroma, "chroma_bmp"),
        (OutputKind::Tiff, "tiff"),
        (OutputKind::F32, "f32"),
    ] {
        let config = ConversionConfig::builder().outputs([kind]).build();
        let pipeline = RawConversionPipeline::with_custom(SyntheticReader(frame.clone()), config);
        group.bench_function(BenchmarkId::from_parameter(label), |b| {
            b.iter(|| pipeline.convert(black_box(input)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_demosaic,
    benchmark_render,
    benchmark_statistics,
    benchmark_conversion_outputs
);
criterion_main!(benches);
