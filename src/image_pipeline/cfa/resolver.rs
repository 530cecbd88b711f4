use tracing::{debug, warn};

use crate::image_pipeline::cfa::types::{CfaColor, CfaLayout};
use crate::image_pipeline::common::CalibrationWarning;
use crate::image_pipeline::raw::types::CfaPattern;

const RED: u8 = 0;
const GREEN: u8 = 1;
const BLUE: u8 = 2;
const SECOND_GREEN: u8 = 3;

/// Outcome of resolving a decoder CFA pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct CfaResolution {
    pub layout: CfaLayout,
    pub warning: Option<CalibrationWarning>,
}

/// Assigns R, G1, G2 and B roles to the four positions of the CFA tile.
///
/// Greens are numbered in row-major scan order unless the decoder already
/// tells the two greens apart (indices 1 and 3 both present). Indices the
/// decoder should never produce are treated as green. A tile without green
/// on both the top-right and bottom-left positions, or without exactly one
/// red and one blue, is still resolved but carries a warning.
pub fn resolve_cfa(pattern: &CfaPattern) -> CfaResolution {
    let tile = pattern.tile();
    let indices = tile.iter().flatten().copied();
    let distinct_greens = indices.clone().any(|c| c == GREEN) && indices.clone().any(|c| c == SECOND_GREEN);

    let mut greens_seen = 0;
    let mut roles = [[CfaColor::Green1; 2]; 2];
    for row in 0..2 {
        for col in 0..2 {
            roles[row][col] = match tile[row][col] {
                RED => CfaColor::Red,
                BLUE => CfaColor::Blue,
                GREEN if distinct_greens => CfaColor::Green1,
                SECOND_GREEN if distinct_greens => CfaColor::Green2,
                _ => {
                    greens_seen += 1;
                    if greens_seen == 1 { CfaColor::Green1 } else { CfaColor::Green2 }
                }
            };
        }
    }

    let is_green = |c: u8| c == GREEN || c == SECOND_GREEN;
    let reds = indices.clone().filter(|&c| c == RED).count();
    let blues = indices.filter(|&c| c == BLUE).count();
    let conventional = is_green(tile[0][1]) && is_green(tile[1][0]) && reds == 1 && blues == 1;

    let warning = if conventional {
        None
    } else {
        let warning = CalibrationWarning::UnexpectedCfaPattern { tile };
        warn!("{}", warning);
        Some(warning)
    };

    let layout = CfaLayout::new(roles);
    debug!(?layout, "Resolved CFA layout");
    CfaResolution { layout, warning }
}
