//! CFA resolution module
//!
//! Turns the decoder's per-coordinate colour index into the R, G1, G2, B
//! roles used by demosaicing and statistics. Resolved once per frame.

mod resolver;
pub mod types;


pub use resolver::{CfaResolution, resolve_cfa};
pub use types::{CfaColor, CfaLayout};
