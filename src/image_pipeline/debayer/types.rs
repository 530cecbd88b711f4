//! Types for debayering operations

/// Interpolation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemosaicMode {
    /// One output pixel per 2x2 tile; half width and half height.
    #[default]
    Block,
    /// One output pixel per photosite, missing channels averaged from the
    /// 3x3 neighbourhood.
    NeighborAveraged,
}

/// Linear sRGB value of one output pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RgbPixel {
    pub rgb: [f32; 3],
    /// Some contributing raw sample was past the clip threshold.
    pub clipped: bool,
}

/// Demosaiced, colour-transformed image
#[derive(Debug, Clone, PartialEq)]
pub struct DemosaicedImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Row-major pixels
    pub pixels: Vec<RgbPixel>,
}

impl DemosaicedImage {
    pub fn new(width: usize, height: usize, pixels: Vec<RgbPixel>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self { width, height, pixels }
    }

    pub fn empty(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![RgbPixel::default(); width * height])
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<&RgbPixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x)
    }
}
