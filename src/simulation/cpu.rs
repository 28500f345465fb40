//! CPU frame pipeline
//!
//! Software executor that mirrors the GPU pipeline buffer for buffer: a
//! persistent next-state grid whose off-board slots are never written, and
//! position/color buffers regenerated from the new state each frame. Used as the
//! reference in tests and wherever no adapter is wanted.

use super::geometry::GeometryBuffers;
use super::grid::Grid;
use super::rules;
use super::traits::FramePipeline;
use crate::config::HexLifeConfig;
use crate::error::{HexLifeError, Result};

pub struct CpuPipeline {
    config: HexLifeConfig,
    next: Grid,
    geometry: GeometryBuffers,
    frames: u64,
}

impl CpuPipeline {
    pub fn new(config: &HexLifeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            next: Grid::new(config.grid_radius()),
            geometry: GeometryBuffers::new(config.cell_slots()),
            frames: 0,
        })
    }

    /// Geometry produced by the last frame
    pub fn geometry(&self) -> &GeometryBuffers {
        &self.geometry
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FramePipeline for CpuPipeline {
    fn advance(&mut self, grid: &Grid) -> Result<Grid> {
        if grid.len() != self.next.len() {
            return Err(HexLifeError::GridMismatch {
                expected: self.next.len(),
                actual: grid.len(),
            });
        }

        rules::step_into(grid, &mut self.next);
        self.geometry
            .generate(&self.next, self.config.tile_size(), self.config.viewport());
        self.frames += 1;

        Ok(self.next.clone())
    }

    fn name(&self) -> &str {
        "cpu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::geometry::ALIVE_COLOR;
    use crate::simulation::hex_grid::OffsetCoord;

    #[test]
    fn test_advance_matches_rule_engine() {
        let config = HexLifeConfig::default().with_grid_radius(2);
        let mut pipeline = CpuPipeline::new(&config).expect("valid config");

        let mut grid = Grid::new(2);
        grid.set_alive(OffsetCoord::new(1, 1), true);
        grid.set_alive(OffsetCoord::new(0, 1), true);

        let next = pipeline.advance(&grid).expect("advance");
        assert_eq!(next, rules::step(&grid));
        assert_eq!(pipeline.frames(), 1);

        // (0, 2) is slot 2 and is alive in the next generation
        let colors = &pipeline.geometry().colors[2 * 12..3 * 12];
        assert!(colors.iter().all(|&c| c == ALIVE_COLOR));
    }

    #[test]
    fn test_advance_rejects_foreign_grid() {
        let config = HexLifeConfig::default().with_grid_radius(3);
        let mut pipeline = CpuPipeline::new(&config).expect("valid config");
        match pipeline.advance(&Grid::new(2)) {
            Err(HexLifeError::GridMismatch { expected, actual }) => {
                assert_eq!(expected, 25);
                assert_eq!(actual, 9);
            }
            other => panic!("expected GridMismatch, got {:?}", other.map(|g| g.len())),
        }
    }
}
