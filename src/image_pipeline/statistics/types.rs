//! Statistics result types

use std::str::FromStr;

use crate::image_pipeline::common::error::PipelineError;

/// Rectangle in active-area photosite coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// Intersection with a `width` x `height` frame.
    pub fn clipped_to(&self, width: usize, height: usize) -> Region {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Region {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Parses X11-style geometry, `WIDTHxHEIGHT+X+Y`.
impl FromStr for Region {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PipelineError::UnsupportedFormat(format!("region '{}', expected WxH+X+Y", s));
        let (size, offset) = s.split_once('+').ok_or_else(invalid)?;
        let (width, height) = size.split_once('x').ok_or_else(invalid)?;
        let (x, y) = offset.split_once('+').ok_or_else(invalid)?;
        let parse = |v: &str| v.parse::<usize>().map_err(|_| invalid());
        Ok(Region::new(parse(x)?, parse(y)?, parse(width)?, parse(height)?))
    }
}

/// Per-channel display histogram.
///
/// The green array counts both greens of every tile, so its counts run
/// about twice as high as red and blue; `count_max` accounts for that.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistogramBins {
    pub red: Vec<u32>,
    pub green: Vec<u32>,
    pub blue: Vec<u32>,
    pub black_level_bin: usize,
    pub white_level_bin: usize,
    /// `max(red_max, ceil(green_max / 2), blue_max)`
    pub count_max: u32,
}

impl HistogramBins {
    pub fn bin_count(&self) -> usize {
        self.red.len()
    }

    pub fn is_empty(&self) -> bool {
        self.red.is_empty()
    }
}

/// Black-subtracted means per CFA role, in raw units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelMeans {
    pub red: f64,
    pub green1: f64,
    pub green2: f64,
    pub blue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExposureCounts {
    /// Samples below black, clamped up to it.
    pub clamped_low: u64,
    /// Samples above white, clamped down to it.
    pub clamped_high: u64,
    /// Samples exactly at black before any clamping.
    pub at_black: u64,
    /// Samples exactly at white before any clamping.
    pub at_white: u64,
}

impl ExposureCounts {
    pub fn any(&self) -> bool {
        self.clamped_low > 0 || self.clamped_high > 0 || self.at_black > 0 || self.at_white > 0
    }
}

/// Colour of a region mean in colorimetric terms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Chromaticity {
    /// White-balanced, matrix-transformed mean, in raw units.
    pub linear_srgb: [f64; 3],
    pub xyz: [f64; 3],
    /// `(x, y, Y)`; x and y are 0 for a black mean.
    pub xyy: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExposureStatistic {
    /// The region actually measured, after clipping to the frame.
    pub region: Region,
    pub means: ChannelMeans,
    pub counts: ExposureCounts,
    pub misexposed: bool,
    pub chromaticity: Chromaticity,
}

/// Full-resolution value histograms with the two greens kept apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueHistogram {
    pub red: Vec<u64>,
    pub green1: Vec<u64>,
    pub green2: Vec<u64>,
    pub blue: Vec<u64>,
    pub below_black: u64,
    pub above_white: u64,
}

/// Raw values of one 2x2 tile along a scan line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScanLineTile {
    pub red: f32,
    pub green1: f32,
    pub green2: f32,
    pub blue: f32,
}
