//! CFA colour roles

/// The four filter roles of a Bayer tile.
///
/// `Green1` is the first green met when scanning the tile row by row,
/// `Green2` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfaColor {
    Red,
    Green1,
    Green2,
    Blue,
}

impl CfaColor {
    pub const ALL: [CfaColor; 4] = [CfaColor::Red, CfaColor::Green1, CfaColor::Green2, CfaColor::Blue];

    /// Position in `[R, G1, G2, B]` ordered arrays such as white-balance
    /// coefficients.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            CfaColor::Red => 0,
            CfaColor::Green1 => 1,
            CfaColor::Green2 => 2,
            CfaColor::Blue => 3,
        }
    }

    /// Output RGB channel fed by this role.
    #[inline]
    pub const fn channel(self) -> usize {
        match self {
            CfaColor::Red => 0,
            CfaColor::Green1 | CfaColor::Green2 => 1,
            CfaColor::Blue => 2,
        }
    }

    pub const fn is_green(self) -> bool {
        matches!(self, CfaColor::Green1 | CfaColor::Green2)
    }
}

/// A resolved 2x2 tile: the role of each photosite position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfaLayout {
    tile: [[CfaColor; 2]; 2],
}

impl CfaLayout {
    pub const RGGB: CfaLayout = CfaLayout::new([
        [CfaColor::Red, CfaColor::Green1],
        [CfaColor::Green2, CfaColor::Blue],
    ]);

    pub const fn new(tile: [[CfaColor; 2]; 2]) -> Self {
        Self { tile }
    }

    #[inline]
    pub fn color_at(&self, row: usize, col: usize) -> CfaColor {
        self.tile[row & 1][col & 1]
    }

    /// First tile position (row, col) holding `color`.
    pub fn position_of(&self, color: CfaColor) -> Option<(usize, usize)> {
        (0..4)
            .map(|i| (i / 2, i % 2))
            .find(|&(row, col)| self.tile[row][col] == color)
    }

    pub fn tile(&self) -> [[CfaColor; 2]; 2] {
        self.tile
    }
}

impl Default for CfaLayout {
    fn default() -> Self {
        Self::RGGB
    }
}
