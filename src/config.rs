//! # Visualizer Configuration
//!
//! All values here are fixed for the lifetime of a run. They are uploaded to the
//! compute kernel once as uniforms and never reloaded.
//!
//! The cell size is not set directly: it is derived from the viewport height so
//! that the whole hexagon (`2 * radius - 1` rows, each advancing by `1.5` cell
//! sizes) fits on screen with a fixed margin.
//!
//! ## Usage
//!
//! ```no_run
//! use hexlife::config::HexLifeConfig;
//!
//! let config = HexLifeConfig::for_viewport(1280, 720)
//!     .with_grid_radius(12)
//!     .with_seed(7);
//! config.validate().expect("valid configuration");
//! ```

use std::time::Duration;

use crate::simulation::geometry::VERTICES_PER_CELL;

/// Number of frame-loop iterations in a run.
pub const ITERATIONS: u32 = 100;

/// Wall-clock budget of one iteration.
pub const TARGET_TICK: Duration = Duration::from_millis(500);

/// Local workgroup size of the compute kernel. Must match `@workgroup_size` in
/// `hex_life.wgsl`.
pub const WORKGROUP_SIZE: (u32, u32, u32) = (8, 8, 1);

/// Vertical pixels left free around the board.
pub const VIEWPORT_MARGIN: f32 = 60.0;

pub const DEFAULT_GRID_RADIUS: u32 = 20;
pub const DEFAULT_ALIVE_PROBABILITY: f64 = 0.1;
pub const DEFAULT_VIEWPORT: (u32, u32) = (1200, 800);

/// Configuration validation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid radius must be at least 1")]
    ZeroGridRadius,

    #[error("grid radius {0} is too large to index")]
    GridRadiusTooLarge(u32),

    #[error("viewport {width}x{height} is empty")]
    EmptyViewport { width: f32, height: f32 },

    #[error("cell size {0} is not a positive finite number (viewport too small for the margin?)")]
    InvalidTileSize(f32),

    #[error("alive probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("{name} needs {size} bytes but the device allows at most {limit}")]
    BufferTooLarge {
        name: &'static str,
        size: u64,
        limit: u64,
    },

    #[error("dispatch of {count} workgroups per dimension exceeds the device limit of {limit}")]
    DispatchTooLarge { count: u32, limit: u32 },
}

/// Immutable run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HexLifeConfig {
    grid_radius: u32,
    tile_size: f32,
    viewport: [f32; 2],
    alive_probability: f64,
    seed: Option<u64>,
}

impl Default for HexLifeConfig {
    fn default() -> Self {
        Self::for_viewport(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1)
    }
}

impl HexLifeConfig {
    /// Configuration with default radius and probability for a viewport in pixels
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let viewport = [width as f32, height as f32];
        Self {
            grid_radius: DEFAULT_GRID_RADIUS,
            tile_size: cell_size_for(viewport[1], DEFAULT_GRID_RADIUS),
            viewport,
            alive_probability: DEFAULT_ALIVE_PROBABILITY,
            seed: None,
        }
    }

    pub fn with_grid_radius(mut self, grid_radius: u32) -> Self {
        self.grid_radius = grid_radius;
        self.tile_size = cell_size_for(self.viewport[1], grid_radius);
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = [width as f32, height as f32];
        self.tile_size = cell_size_for(self.viewport[1], self.grid_radius);
        self
    }

    pub fn with_alive_probability(mut self, probability: f64) -> Self {
        self.alive_probability = probability;
        self
    }

    /// Fix the seed used to randomize the initial grid
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn grid_radius(&self) -> u32 {
        self.grid_radius
    }

    /// Cell size in pixels
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Viewport `[width, height]` in pixels
    pub fn viewport(&self) -> [f32; 2] {
        self.viewport
    }

    pub fn alive_probability(&self) -> f64 {
        self.alive_probability
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Side of the bounding square, `2 * radius - 1`
    pub fn row_size(&self) -> u32 {
        self.grid_radius.saturating_mul(2).saturating_sub(1)
    }

    /// Slots in the flat grid, including the off-hex corners of the square
    pub fn cell_slots(&self) -> usize {
        let row = self.row_size() as usize;
        row * row
    }

    /// Cells that lie inside the hexagon, `1 + 3g(g - 1)`
    pub fn valid_cell_count(&self) -> usize {
        let g = self.grid_radius as usize;
        if g == 0 {
            return 0;
        }
        1 + 3 * g * (g - 1)
    }

    /// Vertices drawn by the raster pass, 12 per grid slot
    pub fn vertex_count(&self) -> u32 {
        self.cell_slots() as u32 * VERTICES_PER_CELL
    }

    /// Workgroups needed in each dimension to cover the bounding square
    pub fn dispatch_size(&self) -> (u32, u32, u32) {
        let row = self.row_size();
        (
            row.div_ceil(WORKGROUP_SIZE.0),
            row.div_ceil(WORKGROUP_SIZE.1),
            1,
        )
    }

    pub fn grid_bytes(&self) -> u64 {
        self.cell_slots() as u64 * std::mem::size_of::<f32>() as u64
    }

    pub fn position_bytes(&self) -> u64 {
        self.cell_slots() as u64 * VERTICES_PER_CELL as u64 * std::mem::size_of::<[f32; 2]>() as u64
    }

    pub fn color_bytes(&self) -> u64 {
        self.cell_slots() as u64 * VERTICES_PER_CELL as u64 * std::mem::size_of::<[f32; 4]>() as u64
    }

    /// Check the values that do not depend on the device
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_radius == 0 {
            return Err(ConfigError::ZeroGridRadius);
        }
        // vertex indices must fit a u32 draw range
        let row = 2 * self.grid_radius as u64 - 1;
        if row * row * VERTICES_PER_CELL as u64 > u32::MAX as u64 {
            return Err(ConfigError::GridRadiusTooLarge(self.grid_radius));
        }
        let [width, height] = self.viewport;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::EmptyViewport { width, height });
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        if !(0.0..=1.0).contains(&self.alive_probability) {
            return Err(ConfigError::InvalidProbability(self.alive_probability));
        }
        Ok(())
    }

    /// Check buffer sizes and dispatch counts against a device's limits
    pub fn validate_limits(&self, limits: &wgpu::Limits) -> Result<(), ConfigError> {
        self.validate()?;

        let binding_limit = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
        for (name, size) in [
            ("grid buffer", self.grid_bytes()),
            ("vertex position buffer", self.position_bytes()),
            ("vertex color buffer", self.color_bytes()),
        ] {
            if size > binding_limit {
                return Err(ConfigError::BufferTooLarge {
                    name,
                    size,
                    limit: binding_limit,
                });
            }
        }

        let (x, y, _) = self.dispatch_size();
        let count = x.max(y);
        if count > limits.max_compute_workgroups_per_dimension {
            return Err(ConfigError::DispatchTooLarge {
                count,
                limit: limits.max_compute_workgroups_per_dimension,
            });
        }
        Ok(())
    }
}

/// Cell size that fits `2 * radius - 1` rows into the viewport height
pub fn cell_size_for(viewport_height: f32, grid_radius: u32) -> f32 {
    let rows = (2 * grid_radius as i64 - 1) as f32;
    (viewport_height - VIEWPORT_MARGIN) / (1.5 * rows)
}
