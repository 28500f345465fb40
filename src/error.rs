//! Error types
//!
//! Every failure the visualizer can hit is fatal for the current run: there is
//! no per-frame retry, so the frame loop simply propagates these to its caller.

use crate::config::ConfigError;

/// Errors raised while acquiring the GPU, building pipelines or running frames.
#[derive(Debug, thiserror::Error)]
pub enum HexLifeError {
    #[error("No suitable GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create presentation surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("Adapter is missing a required capability: {0}")]
    MissingCapability(&'static str),

    #[error("Buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("Device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("Buffer readback was dropped before the GPU finished mapping it")]
    ReadbackCancelled,

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Grid has {actual} cells but the pipeline expects {expected}")]
    GridMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, HexLifeError>;
