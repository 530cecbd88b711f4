//! Background recomputation module
//!
//! Generation-counted cancellation, a thread-per-request scheduler that
//! delivers results over a channel, and the viewer session built on them.

mod generation;
mod session;
mod worker;


pub use generation::{CancelToken, GenerationCounter};
pub use session::{LoadedFrame, ViewerSession};
pub use worker::{ComputeScheduler, Computed};
