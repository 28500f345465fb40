//! Core simulation traits
//!
//! Defines the seam between the [`FrameScheduler`](super::scheduler::FrameScheduler)
//! and whatever executes a generation.

use super::grid::Grid;
use crate::error::Result;

/// One frame of work: advance the board and draw the result.
///
/// Implementations must fully synchronize before returning: the grid they hand
/// back is exactly the output of this frame's transition, ready to seed the
/// next call.
pub trait FramePipeline {
    /// Run the transition and render for `grid`, returning the next generation
    ///
    /// # Arguments
    /// * `grid` - Previous generation, read-only for the whole frame
    fn advance(&mut self, grid: &Grid) -> Result<Grid>;

    /// Name used in logs
    fn name(&self) -> &str;
}
