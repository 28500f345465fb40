use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::config::HexLifeConfig;
use crate::error::{HexLifeError, Result};
use crate::gfx::RenderEngine;
use crate::simulation::{FrameScheduler, GpuPipeline};

/// Windowed visualizer: one scheduler tick per redraw, paced by the event loop
pub struct HexLifeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: HexLifeConfig,
    window: Option<Arc<Window>>,
    pipeline: Option<GpuPipeline>,
    scheduler: FrameScheduler,
    next_tick: Option<Instant>,
    error: Option<HexLifeError>,
}

impl HexLifeApp {
    pub fn new(config: HexLifeConfig) -> Result<Self> {
        let app_state = AppState::new(config)?;
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state,
        })
    }

    /// Run until the scheduler is done, the window is closed or a frame fails
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut self.app_state)?;
        self.app_state.take_result()
    }
}

impl AppState {
    fn new(config: HexLifeConfig) -> Result<Self> {
        Ok(Self {
            scheduler: FrameScheduler::new(&config)?,
            config,
            window: None,
            pipeline: None,
            next_tick: None,
            error: None,
        })
    }

    /// Keep the first error; it is what `run` reports
    fn record(&mut self, error: HexLifeError) {
        log::error!("Stopping: {}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn take_result(&mut self) -> Result<()> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: HexLifeError) {
        self.record(error);
        event_loop.exit();
    }

    fn create_pipeline(&self, window: Arc<Window>) -> Result<GpuPipeline> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let engine = pollster::block_on(RenderEngine::new(window, width, height))?;
        let (width, height) = engine.size();
        GpuPipeline::new(engine, &self.config.clone().with_viewport(width, height))
    }

    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };
        match self.scheduler.tick(pipeline) {
            Ok(Some(report)) => {
                self.next_tick = Some(Instant::now() + report.delay);
            }
            Ok(None) => {
                let metrics = self.scheduler.metrics();
                log::info!(
                    "Run complete: {} iterations, {} cells alive, last ticks averaged {:?}",
                    self.scheduler.iteration(),
                    self.scheduler.grid().alive_count(),
                    metrics.average_frame_time
                );
                self.next_tick = None;
                event_loop.exit();
            }
            Err(error) => self.fail(event_loop, error),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let [width, height] = self.config.viewport();
        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title("Hex Life")
                .with_inner_size(PhysicalSize::new(width as u32, height as u32)),
        ) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                self.fail(event_loop, error.into());
                return;
            }
        };
        self.window = Some(window.clone());

        match self.create_pipeline(window.clone()) {
            Ok(pipeline) => {
                self.pipeline = Some(pipeline);
                self.next_tick = Some(Instant::now());
                window.request_redraw();
            }
            Err(error) => self.fail(event_loop, error),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(pipeline) = self.pipeline.as_mut() {
                    pipeline.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if self.next_tick.is_some_and(|deadline| Instant::now() >= deadline) {
                    self.tick(event_loop);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(deadline)) = (self.window.as_ref(), self.next_tick) else {
            return;
        };

        if Instant::now() >= deadline {
            window.request_redraw();
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_app_state_rejects_invalid_config() {
        let config = HexLifeConfig::default().with_alive_probability(-0.5);
        assert!(matches!(
            AppState::new(config),
            Err(HexLifeError::Config(ConfigError::InvalidProbability(_)))
        ));
    }

    #[test]
    fn test_recorded_error_is_returned_once() {
        let mut state = AppState::new(HexLifeConfig::default().with_grid_radius(3))
            .expect("valid config");
        assert!(state.take_result().is_ok());

        state.record(HexLifeError::MissingCapability("VERTEX_STORAGE"));
        state.record(HexLifeError::ReadbackCancelled);
        assert!(matches!(
            state.take_result(),
            Err(HexLifeError::MissingCapability("VERTEX_STORAGE"))
        ));
        assert!(state.take_result().is_ok());
    }
}
