//! # Graphics Module
//!
//! Owns the wgpu device and the color target that frames are drawn into: a
//! window surface for the interactive app, or an offscreen texture when running
//! headless.
//!
//! ## Usage
//!
//! ```no_run
//! use hexlife::gfx::RenderEngine;
//!
//! let mut engine = pollster::block_on(RenderEngine::headless(800, 600))?;
//! let frame = engine.acquire_frame()?;
//! // ... encode a render pass targeting frame.view() ...
//! frame.present();
//! # Ok::<(), hexlife::error::HexLifeError>(())
//! ```

pub mod render_engine;

// Re-export commonly used types
pub use render_engine::{Frame, RenderEngine, OFFSCREEN_FORMAT};
