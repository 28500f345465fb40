use std::time::Duration;

use hexlife::config::{HexLifeConfig, ITERATIONS, TARGET_TICK};
use hexlife::error::{HexLifeError, Result};
use hexlife::simulation::{rules, CpuPipeline, FramePipeline, FrameScheduler, Grid, SchedulerState};

/// Wraps a pipeline and stalls each frame
struct SlowPipeline {
    inner: CpuPipeline,
    stall: Duration,
}

impl FramePipeline for SlowPipeline {
    fn advance(&mut self, grid: &Grid) -> Result<Grid> {
        std::thread::sleep(self.stall);
        self.inner.advance(grid)
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Fails on its n-th frame
struct FailingPipeline {
    inner: CpuPipeline,
    fail_at: u32,
    calls: u32,
}

impl FramePipeline for FailingPipeline {
    fn advance(&mut self, grid: &Grid) -> Result<Grid> {
        self.calls += 1;
        if self.calls == self.fail_at {
            return Err(HexLifeError::ReadbackCancelled);
        }
        self.inner.advance(grid)
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[test]
fn test_full_run_follows_host_rules() {
    let config = HexLifeConfig::default().with_grid_radius(8).with_seed(5);
    let mut scheduler = FrameScheduler::new(&config).expect("valid config");
    let mut pipeline = CpuPipeline::new(&config).expect("valid config");

    scheduler.initialize();
    let mut expected = scheduler.grid().clone();
    assert!(expected.alive_count() > 0);

    while scheduler.tick(&mut pipeline).expect("tick").is_some() {
        expected = rules::step(&expected);
        assert_eq!(scheduler.grid(), &expected, "iteration {}", scheduler.iteration());
    }

    assert_eq!(scheduler.iteration(), ITERATIONS);
    assert_eq!(scheduler.state(), SchedulerState::Done);
}

#[test]
fn test_delay_shrinks_by_frame_time() {
    let config = HexLifeConfig::default().with_grid_radius(3).with_seed(1);
    let mut scheduler = FrameScheduler::new(&config).expect("valid config");
    let mut pipeline = SlowPipeline {
        inner: CpuPipeline::new(&config).expect("valid config"),
        stall: Duration::from_millis(50),
    };

    let report = scheduler
        .tick(&mut pipeline)
        .expect("tick")
        .expect("running");
    assert!(report.elapsed >= Duration::from_millis(50));
    assert_eq!(report.delay, TARGET_TICK - report.elapsed);
    assert!(report.delay <= Duration::from_millis(450));
}

#[test]
fn test_overrun_gets_no_delay() {
    let config = HexLifeConfig::default().with_grid_radius(3).with_seed(1);
    let mut scheduler = FrameScheduler::new(&config).expect("valid config");
    let mut pipeline = SlowPipeline {
        inner: CpuPipeline::new(&config).expect("valid config"),
        stall: TARGET_TICK + Duration::from_millis(10),
    };

    let report = scheduler
        .tick(&mut pipeline)
        .expect("tick")
        .expect("running");
    assert_eq!(report.delay, Duration::ZERO);
    assert_eq!(scheduler.metrics().overruns, 1);
}

#[test]
fn test_pipeline_error_stops_the_tick() {
    let config = HexLifeConfig::default().with_grid_radius(4).with_seed(9);
    let mut scheduler = FrameScheduler::new(&config).expect("valid config");
    let mut pipeline = FailingPipeline {
        inner: CpuPipeline::new(&config).expect("valid config"),
        fail_at: 3,
        calls: 0,
    };

    scheduler.tick(&mut pipeline).expect("first tick");
    scheduler.tick(&mut pipeline).expect("second tick");
    let before = scheduler.grid().clone();

    assert!(matches!(
        scheduler.tick(&mut pipeline),
        Err(HexLifeError::ReadbackCancelled)
    ));
    assert_eq!(scheduler.iteration(), 2);
    assert_eq!(scheduler.grid(), &before);
    assert_eq!(scheduler.state(), SchedulerState::Running);
}
