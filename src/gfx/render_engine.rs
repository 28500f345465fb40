use std::sync::Arc;

use wgpu::{TextureFormat, TextureUsages};

use crate::error::{HexLifeError, Result};

/// Format of the offscreen target used when there is no window
pub const OFFSCREEN_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

enum RenderTarget {
    Surface {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        texture: wgpu::Texture,
    },
}

/// Texture the current frame is drawn into. Window frames must be presented.
pub struct Frame {
    surface_texture: Option<wgpu::SurfaceTexture>,
    view: wgpu::TextureView,
}

impl Frame {
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Show the frame on screen; a no-op for offscreen frames
    pub fn present(self) {
        if let Some(surface_texture) = self.surface_texture {
            surface_texture.present();
        }
    }
}

/// Device, queue and the color target frames are rendered to
pub struct RenderEngine {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    adapter_info: wgpu::AdapterInfo,
    target: RenderTarget,
    format: TextureFormat,
    width: u32,
    height: u32,
}

impl RenderEngine {
    /// Engine presenting to a window surface
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(HexLifeError::MissingCapability("surface formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: surface_capabilities
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(RenderEngine {
            device: device.into(),
            queue: queue.into(),
            adapter_info: adapter.get_info(),
            target: RenderTarget::Surface { surface, config },
            format,
            width: width.max(1),
            height: height.max(1),
        })
    }

    /// Engine rendering into an offscreen texture
    pub async fn headless(width: u32, height: u32) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let (width, height) = (width.max(1), height.max(1));
        let texture = Self::create_offscreen_texture(&device, width, height);

        Ok(RenderEngine {
            device: device.into(),
            queue: queue.into(),
            adapter_info: adapter.get_info(),
            target: RenderTarget::Offscreen { texture },
            format: OFFSCREEN_FORMAT,
            width,
            height,
        })
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        let info = adapter.get_info();
        log::info!(
            "Using adapter {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let downlevel = adapter.get_downlevel_capabilities();
        if !downlevel
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
        {
            return Err(HexLifeError::MissingCapability("compute shaders"));
        }
        if !downlevel.flags.contains(wgpu::DownlevelFlags::VERTEX_STORAGE) {
            return Err(HexLifeError::MissingCapability(
                "storage buffers in vertex shaders",
            ));
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("HexLife Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        Ok((device, queue))
    }

    fn create_offscreen_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    /// Get the texture for the next frame.
    ///
    /// A lost or outdated surface is reconfigured and acquired once more before
    /// giving up.
    pub fn acquire_frame(&mut self) -> Result<Frame> {
        let format = self.format;
        match &self.target {
            RenderTarget::Offscreen { texture } => Ok(Frame {
                surface_texture: None,
                view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            }),
            RenderTarget::Surface { surface, config } => {
                let surface_texture = match surface.get_current_texture() {
                    Ok(texture) => texture,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        log::warn!("Surface lost or outdated, reconfiguring");
                        surface.configure(&self.device, config);
                        surface.get_current_texture()?
                    }
                    Err(error) => return Err(error.into()),
                };
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor {
                        format: Some(format),
                        ..Default::default()
                    });
                Ok(Frame {
                    surface_texture: Some(surface_texture),
                    view,
                })
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        match &mut self.target {
            RenderTarget::Surface { surface, config } => {
                config.width = width;
                config.height = height;
                surface.configure(&self.device, config);
            }
            RenderTarget::Offscreen { texture } => {
                *texture = Self::create_offscreen_texture(&self.device, width, height);
            }
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Format of the color target
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Target size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_headless(&self) -> bool {
        matches!(self.target, RenderTarget::Offscreen { .. })
    }
}
