use anyhow::Context;
use rawinspect_rs::image_pipeline::{ConversionConfig, OutputKind, RawConversionPipeline};
use rawinspect_rs::logger;

use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .context("usage: rawinspect_rs <raw-file> [output-prefix]")?;
    let prefix = args.next().unwrap_or_default();

    info!("Starting rawinspect...");

    let config = ConversionConfig::builder()
        .outputs([OutputKind::Srgb, OutputKind::Tiff])
        .prefix(prefix)
        .build();
    let pipeline = RawConversionPipeline::new(config);

    info!("Outputs: {:?}", pipeline.config().outputs);
    info!("Compression: {:?}", pipeline.config().compression);

    let data = std::fs::read(&input).with_context(|| format!("reading {}", input))?;
    let frame = pipeline.decode(&data)?;

    let converted = pipeline
        .convert_frame(&frame)
        .and_then(|report| pipeline.write_outputs(&report).map(|()| report));
    match converted {
        Ok(report) => {
            for warning in &report.warnings {
                warn!("{}", warning);
            }
            info!("Conversion successful!");
        }
        Err(e) => {
            error!("Conversion failed: {}", e);
            return Err(e.into());
        }
    }

    let stats = pipeline.measure_frame(&frame, None)?;
    let [x, y, luminance] = stats.chromaticity.xyy;
    info!(
        "Means (black subtracted): R {:.2}, G1 {:.2}, G2 {:.2}, B {:.2}",
        stats.means.red, stats.means.green1, stats.means.green2, stats.means.blue
    );
    info!("Chromaticity x={:.4} y={:.4} Y={:.2}", x, y, luminance);
    if stats.misexposed {
        warn!("Frame is misexposed: {:?}", stats.counts);
    }

    Ok(())
}
