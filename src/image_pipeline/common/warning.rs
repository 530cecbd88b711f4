//! Non-fatal calibration advisories.
//!
//! These never abort processing. They are logged with `warn!` where they are
//! detected and also kept on the value that produced them so a caller can
//! show them next to the image.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationWarning {
    /// The decoder reported four black levels that are not all equal.
    /// Processing continues with their average.
    InconsistentBlackLevels { levels: [f32; 4], averaged: f32 },
    /// The decoder reported a black level of zero, which usually means the
    /// value is missing rather than measured.
    ZeroBlackLevel,
    /// The 2x2 CFA tile does not have green on both the top-right and the
    /// bottom-left positions. Holds the decoder colour indices in row order.
    UnexpectedCfaPattern { tile: [[u8; 2]; 2] },
    /// A white-balance mode was requested together with a custom colour
    /// matrix; the matrix wins and white balance is disabled.
    WhiteBalanceIgnored,
}

impl fmt::Display for CalibrationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationWarning::InconsistentBlackLevels { levels, averaged } => write!(
                f,
                "black levels differ between CFA positions ({:?}), using average {}",
                levels, averaged
            ),
            CalibrationWarning::ZeroBlackLevel => {
                write!(f, "black level is zero, it may be unknown to the decoder")
            }
            CalibrationWarning::UnexpectedCfaPattern { tile } => write!(
                f,
                "unexpected CFA tile {:?}, colour assignment is best-effort",
                tile
            ),
            CalibrationWarning::WhiteBalanceIgnored => write!(
                f,
                "white balance setting ignored because a custom colour matrix is set"
            ),
        }
    }
}
