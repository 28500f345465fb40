//! # Hex Grid Model
//!
//! Cells are addressed with axial coordinates `(q, r)` on a pointy-top hexagon of
//! radius `grid_radius - 1`. For storage they are shifted into offset
//! coordinates `(x, y) = (q + radius - 1, r + radius - 1)`, which places every
//! cell inside a `row_size x row_size` bounding square, `row_size = 2 * radius - 1`.
//!
//! Two of the square's corners are not part of the hexagon. Those slots exist in
//! the flat buffer but are never indexable: [`offset_to_index`] is both the
//! bounds check and the "is this cell on the board" check.
//!
//! The same functions are implemented in `hex_life.wgsl`; the host versions here
//! are the reference the kernel is tested against.

use cgmath::Vector2;

/// A cell position in offset coordinates.
///
/// Signed so that neighbor arithmetic can step off the board without wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetCoord {
    pub x: i32,
    pub y: i32,
}

impl OffsetCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Axial `(q, r)` for this offset position
    pub fn to_axial(self, grid_radius: u32) -> (i32, i32) {
        let shift = grid_radius as i32 - 1;
        (self.x - shift, self.y - shift)
    }

    pub fn from_axial(q: i32, r: i32, grid_radius: u32) -> Self {
        let shift = grid_radius as i32 - 1;
        Self::new(q + shift, r + shift)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Side length of the bounding square
pub fn row_size(grid_radius: u32) -> u32 {
    grid_radius.saturating_mul(2).saturating_sub(1)
}

/// Whether `(x, y)` lies inside the hexagonal boundary.
///
/// Only meaningful for points inside the bounding square.
pub fn in_hexagon(x: i32, y: i32, grid_radius: u32) -> bool {
    let radius = grid_radius as i32;
    (x - radius + 1 + y - radius + 1).abs() < radius
}

/// Flat buffer index of an offset coordinate, `None` for points off the board.
///
/// Row-major over the bounding square: `index = x * row_size + y`.
pub fn offset_to_index(x: i32, y: i32, grid_radius: u32) -> Option<usize> {
    let row = row_size(grid_radius) as i32;
    if x < 0 || y < 0 || x >= row || y >= row {
        return None;
    }
    if !in_hexagon(x, y, grid_radius) {
        return None;
    }
    Some((x * row + y) as usize)
}

/// Offset coordinate stored at a flat index, whether or not it is on the board
pub fn index_to_offset(index: usize, grid_radius: u32) -> OffsetCoord {
    let row = row_size(grid_radius) as usize;
    OffsetCoord::new((index / row) as i32, (index % row) as i32)
}

/// Pixel-space center of a cell, pointy-top layout.
///
/// `x = tile * sqrt(3) * (q + r / 2)`, `y = tile * 1.5 * r`, with the board's
/// center cell at the origin.
pub fn axial_to_cartesian(coord: OffsetCoord, grid_radius: u32, tile_size: f32) -> Vector2<f32> {
    let (q, r) = coord.to_axial(grid_radius);
    let (q, r) = (q as f32, r as f32);
    Vector2::new(
        tile_size * 3f32.sqrt() * (q + r / 2.0),
        tile_size * 1.5 * r,
    )
}

/// Every on-board cell as `(offset, flat index)`, in index order
pub fn valid_cells(grid_radius: u32) -> impl Iterator<Item = (OffsetCoord, usize)> {
    let row = row_size(grid_radius) as i32;
    (0..row).flat_map(move |x| {
        (0..row).filter_map(move |y| {
            offset_to_index(x, y, grid_radius).map(|index| (OffsetCoord::new(x, y), index))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_index_is_none_exactly_outside_hexagon() {
        // Cube-distance form of the hexagon: |q|, |r| and |q + r| all below g
        for radius in 1..=8u32 {
            let g = radius as i32;
            let row = row_size(radius) as i32;
            let mut on_board = 0;
            for x in -1..=row {
                for y in -1..=row {
                    let (q, r) = (x - (g - 1), y - (g - 1));
                    let inside = q.abs() < g && r.abs() < g && (q + r).abs() < g;
                    let index = offset_to_index(x, y, radius);
                    assert_eq!(index.is_some(), inside, "radius {} at ({}, {})", radius, x, y);
                    if inside {
                        on_board += 1;
                    }
                }
            }
            assert_eq!(on_board, 1 + 3 * g * (g - 1));
        }
    }

    #[test]
    fn test_row_size_saturates() {
        assert_eq!(row_size(0), 0);
        assert_eq!(row_size(1), 1);
        assert_eq!(row_size(6), 11);
        assert_eq!(row_size(u32::MAX), u32::MAX - 1);
    }

    #[test]
    fn test_index_mapping_is_injective_and_in_range() {
        for radius in 1..=10u32 {
            let slots = (row_size(radius) * row_size(radius)) as usize;
            let mut seen = HashSet::new();
            for (coord, index) in valid_cells(radius) {
                assert!(index < slots);
                assert!(seen.insert(index), "index {} reused", index);
                assert_eq!(index_to_offset(index, radius), coord);
            }
            let g = radius as usize;
            assert_eq!(seen.len(), 1 + 3 * g * (g - 1));
        }
    }

    #[test]
    fn test_points_off_the_square_have_no_index() {
        let radius = 3;
        assert_eq!(offset_to_index(-1, 2, radius), None);
        assert_eq!(offset_to_index(2, -1, radius), None);
        // x == row_size is one past the last column
        assert_eq!(offset_to_index(5, 0, radius), None);
        assert_eq!(offset_to_index(0, 5, radius), None);
    }

    #[test]
    fn test_radius_two_layout() {
        // corners (0, 0) and (2, 2) fall outside the hexagon
        let indices: Vec<usize> = valid_cells(2).map(|(_, index)| index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(offset_to_index(0, 0, 2), None);
        assert_eq!(offset_to_index(2, 2, 2), None);
    }

    #[test]
    fn test_axial_round_trip_and_center() {
        let radius = 4;
        let center = OffsetCoord::from_axial(0, 0, radius);
        assert_eq!(center, OffsetCoord::new(3, 3));
        assert_eq!(center.to_axial(radius), (0, 0));
        assert_eq!(axial_to_cartesian(center, radius, 10.0), Vector2::new(0.0, 0.0));
    }

    #[test]
    fn test_axial_to_cartesian_pointy_top() {
        let radius = 3;
        let tile = 2.0;

        // q = 1, r = 0: one full column to the right
        let east = axial_to_cartesian(OffsetCoord::from_axial(1, 0, radius), radius, tile);
        assert!((east.x - 2.0 * 3f32.sqrt()).abs() < 1e-5);
        assert!(east.y.abs() < 1e-5);

        // q = 0, r = 1: half a column over, one and a half tiles down
        let south = axial_to_cartesian(OffsetCoord::from_axial(0, 1, radius), radius, tile);
        assert!((south.x - 3f32.sqrt()).abs() < 1e-5);
        assert!((south.y - 3.0).abs() < 1e-5);
    }
}
