// src/lib.rs
//! Hex Life
//!
//! Game of Life on a hexagonal board, advanced by a wgpu compute kernel and drawn
//! by a raster pass in the same command buffer, one paced iteration at a time.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod performance;
pub mod prelude;
pub mod simulation;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::HexLifeApp;
pub use config::HexLifeConfig;
pub use error::{HexLifeError, Result};

/// Creates a windowed app with the default configuration
pub fn default() -> Result<HexLifeApp> {
    HexLifeApp::new(HexLifeConfig::default())
}
