//! # Hex Life - Headless
//!
//! The same paced 100-iteration loop, rendered into an offscreen texture. Falls
//! back to the CPU pipeline when no GPU adapter is available, and reports
//! population and timing as it goes.
//!
//! ## Usage
//!
//! Run with: `RUST_LOG=info cargo run --example hex_life_headless [grid_radius] [seed]`

use anyhow::Context;
use hexlife::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut config = HexLifeConfig::default();
    if let Some(arg) = args.next() {
        let radius: u32 = arg
            .parse()
            .with_context(|| format!("invalid grid radius '{}'", arg))?;
        config = config.with_grid_radius(radius);
    }
    if let Some(arg) = args.next() {
        let seed: u64 = arg
            .parse()
            .with_context(|| format!("invalid seed '{}'", arg))?;
        config = config.with_seed(seed);
    }

    let mut pipeline: Box<dyn FramePipeline> = match GpuPipeline::headless(&config) {
        Ok(pipeline) => Box::new(pipeline),
        Err(error @ (HexLifeError::NoAdapter(_) | HexLifeError::MissingCapability(_))) => {
            log::warn!("{}; falling back to the CPU pipeline", error);
            Box::new(CpuPipeline::new(&config)?)
        }
        Err(error) => return Err(error).context("failed to build the GPU pipeline"),
    };

    let mut scheduler = FrameScheduler::new(&config)?;
    scheduler
        .run(pipeline.as_mut())
        .with_context(|| format!("{} pipeline failed", pipeline.name()))?;

    let metrics = scheduler.metrics();
    println!(
        "{} iterations on the {} pipeline: {} of {} cells alive, recent ticks {:?} avg / {:?} max, {} over budget",
        scheduler.iteration(),
        pipeline.name(),
        scheduler.grid().alive_count(),
        config.valid_cell_count(),
        metrics.average_frame_time,
        metrics.max_frame_time,
        metrics.overruns
    );
    Ok(())
}
