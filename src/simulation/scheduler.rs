//! # Frame Scheduler
//!
//! Owns the board and drives it through a fixed number of paced iterations:
//!
//! ```text
//! INIT ──initialize──▶ RUNNING ──100th tick──▶ DONE
//! ```
//!
//! Each tick records its start time, runs one [`FramePipeline`] pass (which
//! blocks until the next generation has been read back), swaps the result in as
//! the current grid and reports how long to wait before the next tick:
//! `max(0, TARGET_TICK - elapsed)`. [`FrameScheduler::run`] sleeps for that long
//! itself; event-loop hosts schedule their next wake-up with it instead.

use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::grid::Grid;
use super::traits::FramePipeline;
use crate::config::{HexLifeConfig, ITERATIONS, TARGET_TICK};
use crate::error::{HexLifeError, Result};
use crate::performance::{PerformanceMetrics, PerformanceMonitor};

/// Iterations between timing summaries in the log
const SUMMARY_INTERVAL: u32 = 10;

/// Time left in the tick budget, never negative
pub fn pacing_delay(target: Duration, elapsed: Duration) -> Duration {
    target.saturating_sub(elapsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Init,
    Running,
    Done,
}

/// Outcome of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// 1-based iteration that just completed
    pub iteration: u32,
    pub elapsed: Duration,
    /// How long to wait before the next tick
    pub delay: Duration,
    pub alive_cells: usize,
}

pub struct FrameScheduler {
    config: HexLifeConfig,
    state: SchedulerState,
    grid: Grid,
    iteration: u32,
    monitor: PerformanceMonitor,
}

impl FrameScheduler {
    /// Scheduler in the INIT state. Fails if `config` does not validate.
    pub fn new(config: &HexLifeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            state: SchedulerState::Init,
            grid: Grid::new(config.grid_radius()),
            iteration: 0,
            monitor: PerformanceMonitor::with_config(SUMMARY_INTERVAL as usize, Some(TARGET_TICK)),
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Current generation
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Completed iterations
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.monitor.metrics()
    }

    /// Randomize the board from the configured seed, or from the thread RNG
    pub fn initialize(&mut self) {
        match self.config.seed() {
            Some(seed) => self.initialize_with(&mut StdRng::seed_from_u64(seed)),
            None => self.initialize_with(&mut rand::rng()),
        }
    }

    pub fn initialize_with<R: Rng>(&mut self, rng: &mut R) {
        let grid = Grid::randomized(
            self.config.grid_radius(),
            self.config.alive_probability(),
            rng,
        );
        self.begin(grid);
    }

    /// Start from a prepared board instead of a random one
    pub fn start_with(&mut self, grid: Grid) -> Result<()> {
        if grid.len() != self.grid.len() {
            return Err(HexLifeError::GridMismatch {
                expected: self.grid.len(),
                actual: grid.len(),
            });
        }
        self.begin(grid);
        Ok(())
    }

    fn begin(&mut self, grid: Grid) {
        self.grid = grid;
        self.iteration = 0;
        self.monitor.reset();
        self.state = SchedulerState::Running;
        log::info!(
            "Scheduler INIT -> RUNNING: radius {}, {} of {} cells alive",
            self.config.grid_radius(),
            self.grid.alive_count(),
            self.config.valid_cell_count()
        );
    }

    /// Run one iteration. Returns `None` once the run is over.
    ///
    /// An uninitialized scheduler randomizes its board first.
    pub fn tick<P: FramePipeline + ?Sized>(&mut self, pipeline: &mut P) -> Result<Option<TickReport>> {
        match self.state {
            SchedulerState::Done => return Ok(None),
            SchedulerState::Init => self.initialize(),
            SchedulerState::Running => {}
        }

        self.monitor.begin_frame();
        let next = pipeline.advance(&self.grid)?;
        if next.len() != self.grid.len() {
            return Err(HexLifeError::GridMismatch {
                expected: self.grid.len(),
                actual: next.len(),
            });
        }
        self.grid = next;
        let elapsed = self.monitor.end_frame();

        self.iteration += 1;
        let report = TickReport {
            iteration: self.iteration,
            elapsed,
            delay: pacing_delay(TARGET_TICK, elapsed),
            alive_cells: self.grid.alive_count(),
        };

        log::debug!(
            "[{}] iteration {}/{}: {} alive, {:?} elapsed, sleeping {:?}",
            pipeline.name(),
            report.iteration,
            ITERATIONS,
            report.alive_cells,
            report.elapsed,
            report.delay
        );
        if elapsed >= TARGET_TICK {
            log::warn!(
                "Iteration {} took {:?}, over the {:?} tick budget",
                report.iteration,
                elapsed,
                TARGET_TICK
            );
        }
        if report.iteration % SUMMARY_INTERVAL == 0 {
            let metrics = self.monitor.metrics();
            log::info!(
                "Iteration {}: {} alive, tick avg {:?} (min {:?}, max {:?})",
                report.iteration,
                report.alive_cells,
                metrics.average_frame_time,
                metrics.min_frame_time,
                metrics.max_frame_time
            );
        }

        if self.iteration >= ITERATIONS {
            self.state = SchedulerState::Done;
            log::info!("Scheduler RUNNING -> DONE after {} iterations", self.iteration);
        }

        Ok(Some(report))
    }

    /// Run every remaining iteration on this thread, sleeping out each tick budget
    pub fn run<P: FramePipeline + ?Sized>(&mut self, pipeline: &mut P) -> Result<()> {
        while let Some(report) = self.tick(pipeline)? {
            if !report.delay.is_zero() {
                std::thread::sleep(report.delay);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::simulation::cpu::CpuPipeline;
    use crate::simulation::rules;

    /// Pipeline that records what it was seeded with
    struct RecordingPipeline {
        seeds: Vec<Grid>,
    }

    impl FramePipeline for RecordingPipeline {
        fn advance(&mut self, grid: &Grid) -> Result<Grid> {
            self.seeds.push(grid.clone());
            Ok(rules::step(grid))
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[test]
    fn test_pacing_delay_is_remaining_budget() {
        let target = Duration::from_millis(500);
        assert_eq!(pacing_delay(target, Duration::from_millis(120)), Duration::from_millis(380));
        assert_eq!(pacing_delay(target, Duration::from_millis(500)), Duration::ZERO);
        assert_eq!(pacing_delay(target, Duration::from_millis(900)), Duration::ZERO);
        assert_eq!(pacing_delay(target, Duration::ZERO), target);
    }

    #[test]
    fn test_state_machine_runs_exactly_one_hundred_iterations() {
        let config = HexLifeConfig::default().with_grid_radius(4).with_seed(3);
        let mut scheduler = FrameScheduler::new(&config).expect("valid config");
        let mut pipeline = CpuPipeline::new(&config).expect("valid config");
        assert_eq!(scheduler.state(), SchedulerState::Init);

        let mut ticks = 0;
        while let Some(report) = scheduler.tick(&mut pipeline).expect("tick") {
            ticks += 1;
            assert_eq!(report.iteration, ticks);
            assert!(report.delay <= TARGET_TICK);
            if ticks < ITERATIONS {
                assert_eq!(scheduler.state(), SchedulerState::Running);
            }
        }

        assert_eq!(ticks, ITERATIONS);
        assert_eq!(scheduler.state(), SchedulerState::Done);
        assert_eq!(pipeline.frames(), ITERATIONS as u64);
        assert!(scheduler.tick(&mut pipeline).expect("tick").is_none());
        assert_eq!(pipeline.frames(), ITERATIONS as u64);
    }

    #[test]
    fn test_each_iteration_is_seeded_with_previous_result() {
        let config = HexLifeConfig::default().with_grid_radius(5);
        let mut scheduler = FrameScheduler::new(&config).expect("valid config");
        scheduler.initialize_with(&mut StdRng::seed_from_u64(99));
        let initial = scheduler.grid().clone();

        let mut pipeline = RecordingPipeline { seeds: Vec::new() };
        for _ in 0..5 {
            scheduler.tick(&mut pipeline).expect("tick");
        }

        assert_eq!(pipeline.seeds[0], initial);
        for window in pipeline.seeds.windows(2) {
            assert_eq!(window[1], rules::step(&window[0]));
        }
        assert_eq!(scheduler.grid(), &rules::step(&pipeline.seeds[4]));
    }

    #[test]
    fn test_seeded_initialization_is_deterministic() {
        let config = HexLifeConfig::default().with_grid_radius(6).with_seed(42);
        let mut a = FrameScheduler::new(&config).expect("valid config");
        let mut b = FrameScheduler::new(&config).expect("valid config");
        a.initialize();
        b.initialize();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.state(), SchedulerState::Running);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = HexLifeConfig::default()
            .with_grid_radius(3)
            .with_alive_probability(1.5);
        assert!(matches!(
            FrameScheduler::new(&config),
            Err(HexLifeError::Config(ConfigError::InvalidProbability(_)))
        ));

        let config = HexLifeConfig::default().with_grid_radius(0);
        assert!(matches!(
            FrameScheduler::new(&config),
            Err(HexLifeError::Config(ConfigError::ZeroGridRadius))
        ));
    }

    #[test]
    fn test_start_with_rejects_wrong_size() {
        let config = HexLifeConfig::default().with_grid_radius(3);
        let mut scheduler = FrameScheduler::new(&config).expect("valid config");
        assert!(scheduler.start_with(Grid::new(4)).is_err());
        assert_eq!(scheduler.state(), SchedulerState::Init);
        assert!(scheduler.start_with(Grid::new(3)).is_ok());
        assert_eq!(scheduler.state(), SchedulerState::Running);
    }
}
