//! # Hex Life - Windowed
//!
//! Opens a window, randomizes a radius-20 board and runs 100 generations, one
//! every 500ms. Each generation is computed and drawn on the GPU in a single
//! frame; the window closes when the run is over.
//!
//! ## Usage
//!
//! Run with: `cargo run --example hex_life [grid_radius]`
//!
//! Set `RUST_LOG=info` (or `debug` for per-iteration timings) to see progress.

use anyhow::Context;
use hexlife::{HexLifeApp, HexLifeConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut config = HexLifeConfig::default();
    if let Some(arg) = std::env::args().nth(1) {
        let radius: u32 = arg
            .parse()
            .with_context(|| format!("invalid grid radius '{}'", arg))?;
        config = config.with_grid_radius(radius);
    }

    let app = HexLifeApp::new(config).context("failed to set up the visualizer")?;
    app.run().context("visualizer stopped with an error")?;
    Ok(())
}
