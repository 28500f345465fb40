//! GPU frame pipeline
//!
//! One frame is a single command buffer:
//!
//! 1. compute pass: every on-board cell applies the survival rule to the
//!    uploaded grid, writes its next state and rewrites its 12 vertices
//! 2. copy of the next-state buffer into a mappable staging buffer
//! 3. render pass: clear, then draw `12 * row_size^2` vertices straight out of
//!    the position and color storage buffers
//!
//! After submitting and presenting, the staging buffer is mapped and read back,
//! so [`FramePipeline::advance`] returns only once the GPU has finished the
//! whole frame.
//!
//! Position and color buffers are zero-initialized and off-board slots are
//! never written, so those vertices collapse into degenerate triangles at the
//! origin and draw nothing.

use wgpu::{BindGroup, BindGroupLayout, ComputePipeline, Device, RenderPipeline, ShaderStages};

use super::geometry::GeometryBuffers;
use super::grid::Grid;
use super::shaders::{HEX_LIFE_SHADER, RENDER_SHADER};
use super::traits::FramePipeline;
use crate::config::HexLifeConfig;
use crate::error::{HexLifeError, Result};
use crate::gfx::RenderEngine;
use crate::wgpu_utils::{
    layout_entry, storage_buffer_read_only, storage_buffer_read_write, uniform, ArrayBuffer,
    UniformBuffer,
};

/// Background behind the board
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.803,
    g: 0.364,
    b: 0.0,
    a: 1.0,
};

/// Single float uniform, 8 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScalarUniform {
    pub value: f32,
    _padding: f32,
}

impl ScalarUniform {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            _padding: 0.0,
        }
    }
}

/// Viewport size uniform, 16 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenUniform {
    pub size: [f32; 2],
    _padding: [f32; 2],
}

impl ScreenUniform {
    pub fn new(size: [f32; 2]) -> Self {
        Self {
            size,
            _padding: [0.0; 2],
        }
    }
}

/// Helper to create compute pipeline from shader source
pub fn create_compute_pipeline(
    device: &Device,
    shader_source: &str,
    entry_point: &str,
    bind_group_layout: &BindGroupLayout,
) -> ComputePipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Hex Life Kernel"),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Compute Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("Compute Pipeline"),
        layout: Some(&pipeline_layout),
        module: &shader,
        entry_point: Some(entry_point),
        compilation_options: Default::default(),
        cache: None,
    })
}

fn create_render_pipeline(
    device: &Device,
    format: wgpu::TextureFormat,
    bind_group_layout: &BindGroupLayout,
) -> RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Hex Render Shader"),
        source: wgpu::ShaderSource::Wgsl(RENDER_SHADER.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Render Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Render Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
            unclipped_depth: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        multiview: None,
        cache: None,
    })
}

/// Compute + raster executor on a [`RenderEngine`]
pub struct GpuPipeline {
    engine: RenderEngine,
    config: HexLifeConfig,

    compute_pipeline: ComputePipeline,
    render_pipeline: RenderPipeline,
    compute_bind_group: BindGroup,
    render_bind_group: BindGroup,

    positions: ArrayBuffer<[f32; 2]>,
    colors: ArrayBuffer<[f32; 4]>,
    grid: ArrayBuffer<f32>,
    next_grid: ArrayBuffer<f32>,
    staging: ArrayBuffer<f32>,

    // bound once, never rewritten
    _grid_radius: UniformBuffer<ScalarUniform>,
    _tile_size: UniformBuffer<ScalarUniform>,
    _screen_size: UniformBuffer<ScreenUniform>,

    dispatch_size: (u32, u32, u32),
    frames: u64,
}

impl GpuPipeline {
    /// Build buffers and pipelines for `config` on `engine`.
    ///
    /// Fails if the configuration does not fit the device limits.
    pub fn new(engine: RenderEngine, config: &HexLifeConfig) -> Result<Self> {
        config.validate_limits(&engine.limits())?;

        let device = engine.device();
        let slots = config.cell_slots();
        let vertices = config.vertex_count() as usize;

        let positions = ArrayBuffer::new_storage(
            device,
            "Vertex Positions",
            vertices,
            wgpu::BufferUsages::COPY_SRC,
        );
        let colors =
            ArrayBuffer::new_storage(device, "Vertex Colors", vertices, wgpu::BufferUsages::COPY_SRC);
        let grid = ArrayBuffer::new_storage(device, "Grid", slots, wgpu::BufferUsages::COPY_DST);
        let next_grid =
            ArrayBuffer::new_storage(device, "Next Grid", slots, wgpu::BufferUsages::COPY_SRC);
        let staging = ArrayBuffer::new_staging(device, "Grid Readback", slots);

        let grid_radius =
            UniformBuffer::new_with_data(device, &ScalarUniform::new(config.grid_radius() as f32));
        let tile_size = UniformBuffer::new_with_data(device, &ScalarUniform::new(config.tile_size()));
        let screen_size = UniformBuffer::new_with_data(device, &ScreenUniform::new(config.viewport()));

        let compute_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Hex Life Compute Layout"),
            entries: &[
                layout_entry(0, ShaderStages::COMPUTE, storage_buffer_read_write()),
                layout_entry(1, ShaderStages::COMPUTE, storage_buffer_read_only()),
                layout_entry(2, ShaderStages::COMPUTE, uniform()),
                layout_entry(3, ShaderStages::COMPUTE, storage_buffer_read_write()),
                layout_entry(4, ShaderStages::COMPUTE, uniform()),
                layout_entry(5, ShaderStages::COMPUTE, uniform()),
                layout_entry(6, ShaderStages::COMPUTE, storage_buffer_read_write()),
            ],
        });
        let compute_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Hex Life Compute Bind Group"),
            layout: &compute_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: positions.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: grid.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: grid_radius.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: next_grid.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: tile_size.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: screen_size.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: colors.binding_resource(),
                },
            ],
        });

        let render_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Hex Render Layout"),
            entries: &[
                layout_entry(0, ShaderStages::VERTEX, storage_buffer_read_only()),
                layout_entry(1, ShaderStages::VERTEX, storage_buffer_read_only()),
            ],
        });
        let render_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Hex Render Bind Group"),
            layout: &render_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: positions.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: colors.binding_resource(),
                },
            ],
        });

        let compute_pipeline =
            create_compute_pipeline(device, HEX_LIFE_SHADER, "main", &compute_layout);
        let render_pipeline = create_render_pipeline(device, engine.format(), &render_layout);

        log::info!(
            "GPU pipeline ready: radius {}, {} slots, {} vertices, dispatch {:?}",
            config.grid_radius(),
            slots,
            vertices,
            config.dispatch_size()
        );

        Ok(Self {
            dispatch_size: config.dispatch_size(),
            config: config.clone(),
            engine,
            compute_pipeline,
            render_pipeline,
            compute_bind_group,
            render_bind_group,
            positions,
            colors,
            grid,
            next_grid,
            staging,
            _grid_radius: grid_radius,
            _tile_size: tile_size,
            _screen_size: screen_size,
            frames: 0,
        })
    }

    /// Pipeline on an offscreen engine sized to the configured viewport
    pub fn headless(config: &HexLifeConfig) -> Result<Self> {
        let [width, height] = config.viewport();
        let engine = pollster::block_on(RenderEngine::headless(width as u32, height as u32))?;
        Self::new(engine, config)
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    pub fn config(&self) -> &HexLifeConfig {
        &self.config
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Reconfigure the color target. Uniforms keep the layout the run started
    /// with.
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Resizing render target to {}x{}", width, height);
        self.engine.resize(width, height);
    }

    /// Read back the vertex buffers written by the last frame
    pub fn read_geometry(&self) -> Result<GeometryBuffers> {
        let device = self.engine.device();
        let vertices = self.positions.len();
        let position_staging: ArrayBuffer<[f32; 2]> =
            ArrayBuffer::new_staging(device, "Position Readback", vertices);
        let color_staging: ArrayBuffer<[f32; 4]> =
            ArrayBuffer::new_staging(device, "Color Readback", vertices);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Geometry Readback Encoder"),
        });
        self.positions.copy_to(&mut encoder, &position_staging);
        self.colors.copy_to(&mut encoder, &color_staging);
        self.engine.queue().submit(std::iter::once(encoder.finish()));

        Ok(GeometryBuffers {
            positions: position_staging.read_mapped(device)?,
            colors: color_staging.read_mapped(device)?,
        })
    }

    fn encode_frame(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Hex Life Compute Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.compute_pipeline);
            compute_pass.set_bind_group(0, &self.compute_bind_group, &[]);
            compute_pass.dispatch_workgroups(
                self.dispatch_size.0,
                self.dispatch_size.1,
                self.dispatch_size.2,
            );
        }

        self.next_grid.copy_to(encoder, &self.staging);

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Hex Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.render_bind_group, &[]);
            render_pass.draw(0..self.config.vertex_count(), 0..1);
        }
    }
}

impl FramePipeline for GpuPipeline {
    fn advance(&mut self, grid: &Grid) -> Result<Grid> {
        if grid.len() != self.grid.len() {
            return Err(HexLifeError::GridMismatch {
                expected: self.grid.len(),
                actual: grid.len(),
            });
        }

        self.grid.update_data(self.engine.queue(), grid.cells());
        let frame = self.engine.acquire_frame()?;

        let mut encoder = self
            .engine
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Hex Life Frame Encoder"),
            });
        self.encode_frame(&mut encoder, frame.view());
        self.engine.queue().submit(std::iter::once(encoder.finish()));
        frame.present();

        let cells = self.staging.read_mapped(self.engine.device())?;
        self.frames += 1;

        let actual = cells.len();
        Grid::from_cells(self.config.grid_radius(), cells).ok_or(HexLifeError::GridMismatch {
            expected: self.grid.len(),
            actual,
        })
    }

    fn name(&self) -> &str {
        "gpu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layouts_match_buffer_contract() {
        assert_eq!(std::mem::size_of::<ScalarUniform>(), 8);
        assert_eq!(std::mem::size_of::<ScreenUniform>(), 16);
        assert_eq!(
            bytemuck::bytes_of(&ScalarUniform::new(20.0))[..4],
            20.0f32.to_ne_bytes()
        );
    }

    #[test]
    fn test_clear_color() {
        assert_eq!(CLEAR_COLOR.r, 0.803);
        assert_eq!(CLEAR_COLOR.g, 0.364);
        assert_eq!(CLEAR_COLOR.b, 0.0);
    }
}
