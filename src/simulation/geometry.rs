//! # Geometry Generator
//!
//! Turns a cell into a flat-colored hexagon of 4 triangles (12 vertices).
//!
//! Corners are numbered from `-30` degrees in `60` degree steps and are
//! triangulated with a fixed fan: `(0, 1, 2)`, `(0, 2, 3)`, `(0, 3, 5)` share
//! corner 0, the last triangle `(5, 3, 4)` does not. Positions are divided by
//! the viewport size, which maps pixel offsets from the screen center into clip
//! space.
//!
//! This is the host reference for the vertex data the compute kernel writes into
//! the position and color buffers.

use cgmath::{InnerSpace, Vector2};

use super::grid::Grid;
use super::hex_grid::{self, OffsetCoord};

pub const VERTICES_PER_CELL: u32 = 12;

/// Hexagon corner radius as a fraction of the cell size, leaves a gap between cells
pub const CORNER_SCALE: f32 = 0.85;

/// Corner indices of the 4 triangles, in emission order
pub const HEX_TRIANGLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [0, 3, 5], [5, 3, 4]];

/// Dark olive
pub const DEAD_COLOR: [f32; 4] = [0.192, 0.184, 0.09, 1.0];
/// Amber
pub const ALIVE_COLOR: [f32; 4] = [1.0, 0.794, 0.0, 1.0];

/// Corner `corner` of the hexagon around `center`, normalized by `screen_size`
pub fn pointy_hex_corner(
    center: Vector2<f32>,
    size: f32,
    corner: u32,
    screen_size: [f32; 2],
) -> Vector2<f32> {
    let angle = (60.0 * corner as f32 - 30.0).to_radians();
    let point = center + Vector2::new(angle.cos(), angle.sin()) * (size * CORNER_SCALE);
    Vector2::new(point.x / screen_size[0], point.y / screen_size[1])
}

pub fn hex_corners(center: Vector2<f32>, size: f32, screen_size: [f32; 2]) -> [Vector2<f32>; 6] {
    std::array::from_fn(|corner| pointy_hex_corner(center, size, corner as u32, screen_size))
}

pub fn cell_color(alive: bool) -> [f32; 4] {
    if alive {
        ALIVE_COLOR
    } else {
        DEAD_COLOR
    }
}

/// Vertex data of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub positions: [[f32; 2]; VERTICES_PER_CELL as usize],
    pub colors: [[f32; 4]; VERTICES_PER_CELL as usize],
}

impl CellGeometry {
    pub fn new(
        coord: OffsetCoord,
        grid_radius: u32,
        tile_size: f32,
        screen_size: [f32; 2],
        alive: bool,
    ) -> Self {
        let center = hex_grid::axial_to_cartesian(coord, grid_radius, tile_size);
        let corners = hex_corners(center, tile_size, screen_size);

        let mut positions = [[0.0; 2]; VERTICES_PER_CELL as usize];
        for (slot, corner) in HEX_TRIANGLES.iter().flatten().enumerate() {
            positions[slot] = corners[*corner].into();
        }

        Self {
            positions,
            colors: [cell_color(alive); VERTICES_PER_CELL as usize],
        }
    }

    /// Triangle `i` as three positions
    pub fn triangle(&self, i: usize) -> [[f32; 2]; 3] {
        let base = i * 3;
        [self.positions[base], self.positions[base + 1], self.positions[base + 2]]
    }

    /// Pixel-space distance of each vertex from `center`, for checks
    pub fn corner_distances(&self, center: Vector2<f32>, screen_size: [f32; 2]) -> Vec<f32> {
        self.positions
            .iter()
            .map(|p| {
                let pixel = Vector2::new(p[0] * screen_size[0], p[1] * screen_size[1]);
                (pixel - center).magnitude()
            })
            .collect()
    }
}

/// Host-side position and color buffers, laid out like the GPU ones.
///
/// Both start zeroed. Slots of off-board cells are never written afterwards, so
/// they stay as degenerate triangles at the origin.
#[derive(Debug, Clone)]
pub struct GeometryBuffers {
    pub positions: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
}

impl GeometryBuffers {
    pub fn new(cell_slots: usize) -> Self {
        let vertices = cell_slots * VERTICES_PER_CELL as usize;
        Self {
            positions: vec![[0.0; 2]; vertices],
            colors: vec![[0.0; 4]; vertices],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn write_cell(&mut self, index: usize, cell: &CellGeometry) {
        let base = index * VERTICES_PER_CELL as usize;
        let end = base + VERTICES_PER_CELL as usize;
        self.positions[base..end].copy_from_slice(&cell.positions);
        self.colors[base..end].copy_from_slice(&cell.colors);
    }

    /// Regenerate every on-board cell from `grid`
    pub fn generate(&mut self, grid: &Grid, tile_size: f32, screen_size: [f32; 2]) {
        let radius = grid.grid_radius();
        for (coord, index) in hex_grid::valid_cells(radius) {
            let cell = CellGeometry::new(coord, radius, tile_size, screen_size, grid.is_alive_at(index));
            self.write_cell(index, &cell);
        }
    }
}
