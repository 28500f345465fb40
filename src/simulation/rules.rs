//! # Neighbor Rule Engine
//!
//! Host reference of the transition the compute kernel applies. A cell looks at
//! its six hex neighbors in the previous generation and is alive in the next one
//! iff exactly two of them are alive. There is no separate birth or
//! overcrowding threshold.
//!
//! Off-board cells are skipped entirely: [`step_into`] never writes their output
//! slot, matching the kernel, which returns before touching any buffer.

use super::grid::{Grid, ALIVE, DEAD};
use super::hex_grid::{self, OffsetCoord};

/// Offset deltas of the six hex neighbors, in the order the kernel visits them.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Alive-neighbor count that keeps or makes a cell alive
pub const SURVIVAL_COUNT: u32 = 2;

/// Flat indices of the on-board neighbors of `coord`
pub fn neighbor_indices(coord: OffsetCoord, grid_radius: u32) -> impl Iterator<Item = usize> {
    NEIGHBOR_OFFSETS.into_iter().filter_map(move |(dx, dy)| {
        let neighbor = coord.offset(dx, dy);
        hex_grid::offset_to_index(neighbor.x, neighbor.y, grid_radius)
    })
}

/// Number of neighbors alive in `grid`
pub fn alive_neighbors(grid: &Grid, coord: OffsetCoord) -> u32 {
    neighbor_indices(coord, grid.grid_radius())
        .filter(|&index| grid.is_alive_at(index))
        .count() as u32
}

pub fn next_state(alive_neighbors: u32) -> bool {
    alive_neighbors == SURVIVAL_COUNT
}

/// Advance `previous` one generation into `next`.
///
/// Only on-board slots of `next` are written; everything else keeps whatever it
/// held before.
///
/// # Panics
///
/// If the two grids have different radii.
pub fn step_into(previous: &Grid, next: &mut Grid) {
    assert_eq!(
        previous.grid_radius(),
        next.grid_radius(),
        "grids must share a radius"
    );
    let radius = previous.grid_radius();
    let cells = next.cells_mut();
    for (coord, index) in hex_grid::valid_cells(radius) {
        cells[index] = if next_state(alive_neighbors(previous, coord)) {
            ALIVE
        } else {
            DEAD
        };
    }
}

/// Advance one generation into a fresh, zeroed grid
pub fn step(previous: &Grid) -> Grid {
    let mut next = Grid::new(previous.grid_radius());
    step_into(previous, &mut next);
    next
}
