// src/simulation/mod.rs
//! Simulation system
//!
//! The hexagonal board, its survival rule and the per-cell geometry, plus the
//! two executors that run a frame ([`cpu::CpuPipeline`] on the host,
//! [`gpu::GpuPipeline`] as compute + raster passes) and the
//! [`scheduler::FrameScheduler`] that paces them.

pub mod cpu;
pub mod geometry;
pub mod gpu;
pub mod grid;
pub mod hex_grid;
pub mod rules;
pub mod scheduler;
pub mod shaders;
pub mod traits;

pub use cpu::CpuPipeline;
pub use gpu::GpuPipeline;
pub use grid::Grid;
pub use hex_grid::OffsetCoord;
pub use scheduler::{FrameScheduler, SchedulerState, TickReport};
pub use traits::FramePipeline;
