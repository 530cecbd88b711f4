/// 8-bit RGB image ready for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayImage {
    pub width: usize,
    pub height: usize,
    /// Interleaved `[R, G, B, R, G, B, ...]`, row-major
    pub data: Vec<u8>,
}

impl DisplayImage {
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 3;
        Some([self.data[offset], self.data[offset + 1], self.data[offset + 2]])
    }
}
