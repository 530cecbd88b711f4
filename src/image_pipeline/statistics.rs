//! Statistics module
//!
//! Histograms, region means with misexposure classification, and the raw
//! data dumps used for sensor diagnostics.

mod histogram;
mod region;
mod scan_line;
pub mod types;
mod value_histogram;


pub use histogram::{HEADROOM, bin_count_for_width, compute_histogram, compute_histogram_cancellable};
pub use region::{chromaticity, compute_region_statistics, compute_region_statistics_cancellable};
pub use scan_line::{extract_scan_line, format_scan_line_csv};
pub use types::{
    ChannelMeans, Chromaticity, ExposureCounts, ExposureStatistic, HistogramBins, Region, ScanLineTile,
    ValueHistogram,
};
pub use value_histogram::compute_value_histogram;
