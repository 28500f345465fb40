//! # Hex Life Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use hexlife::prelude::*;
//!
//! let config = HexLifeConfig::default().with_grid_radius(10).with_seed(1);
//! let mut pipeline = CpuPipeline::new(&config)?;
//! let mut scheduler = FrameScheduler::new(&config)?;
//! scheduler.run(&mut pipeline)?;
//! assert_eq!(scheduler.state(), SchedulerState::Done);
//! # Ok::<(), HexLifeError>(())
//! ```

// Re-export core application types
pub use crate::app::HexLifeApp;
pub use crate::config::{HexLifeConfig, ITERATIONS, TARGET_TICK};
pub use crate::error::{HexLifeError, Result};

// Re-export graphics types
pub use crate::gfx::{Frame, RenderEngine};

// Re-export simulation framework
pub use crate::simulation::{
    CpuPipeline, FramePipeline, FrameScheduler, GpuPipeline, Grid, OffsetCoord, SchedulerState,
    TickReport,
};

// Re-export performance monitoring
pub use crate::performance::{PerformanceMetrics, PerformanceMonitor};
