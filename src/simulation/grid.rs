//! Flat cell-state buffer shared by the host and the compute kernel

use rand::Rng;

use super::hex_grid::{self, OffsetCoord};

pub const ALIVE: f32 = 1.0;
pub const DEAD: f32 = 0.0;

/// One generation of the board.
///
/// Holds `row_size^2` `f32` states in row-major offset order, bit-compatible
/// with the GPU grid buffer. Off-hexagon slots are kept at zero by every
/// producer in this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    grid_radius: u32,
    cells: Vec<f32>,
}

impl Grid {
    /// All-dead grid
    pub fn new(grid_radius: u32) -> Self {
        let row = hex_grid::row_size(grid_radius) as usize;
        Self {
            grid_radius,
            cells: vec![DEAD; row * row],
        }
    }

    /// Grid with each on-board cell alive with probability `alive_probability`
    pub fn randomized<R: Rng>(grid_radius: u32, alive_probability: f64, rng: &mut R) -> Self {
        let mut grid = Self::new(grid_radius);
        for (_, index) in hex_grid::valid_cells(grid_radius) {
            if rng.random_bool(alive_probability) {
                grid.cells[index] = ALIVE;
            }
        }
        grid
    }

    /// Wrap raw states, e.g. a GPU readback. `None` if the length is wrong.
    pub fn from_cells(grid_radius: u32, cells: Vec<f32>) -> Option<Self> {
        let row = hex_grid::row_size(grid_radius) as usize;
        (cells.len() == row * row).then_some(Self { grid_radius, cells })
    }

    pub fn grid_radius(&self) -> u32 {
        self.grid_radius
    }

    pub fn row_size(&self) -> u32 {
        hex_grid::row_size(self.grid_radius)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [f32] {
        &mut self.cells
    }

    pub fn into_cells(self) -> Vec<f32> {
        self.cells
    }

    /// State at a flat index; any value other than exactly `1.0` counts as dead
    pub fn is_alive_at(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|&state| state == ALIVE)
    }

    /// State at an offset coordinate, dead when off the board
    pub fn is_alive(&self, coord: OffsetCoord) -> bool {
        hex_grid::offset_to_index(coord.x, coord.y, self.grid_radius)
            .is_some_and(|index| self.is_alive_at(index))
    }

    /// Set a cell; returns `false` and changes nothing for off-board points
    pub fn set_alive(&mut self, coord: OffsetCoord, alive: bool) -> bool {
        match hex_grid::offset_to_index(coord.x, coord.y, self.grid_radius) {
            Some(index) => {
                self.cells[index] = if alive { ALIVE } else { DEAD };
                true
            }
            None => false,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&state| state == ALIVE).count()
    }
}
