// src/wgpu_utils/uniform_buffer.rs
//! Typed wrappers around uniform, storage and staging buffers
use std::marker::PhantomData;

use crate::error::{HexLifeError, Result};

fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    match type_name.rfind(':') {
        Some(pos) => &type_name[(pos + 1)..],
        None => type_name,
    }
}

/// Uniform buffer holding a single `Content` value, written once at creation
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Create a uniform buffer with initial data
    pub fn new_with_data(device: &wgpu::Device, initial_content: &Content) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM,
            mapped_at_creation: true,
        });

        buffer
            .slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(bytemuck::bytes_of(initial_content));
        buffer.unmap();

        UniformBuffer {
            buffer,
            content_type: PhantomData,
        }
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Fixed-length array of `Content` on the device
pub struct ArrayBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    len: usize,
}

impl<Content: bytemuck::Pod> ArrayBuffer<Content> {
    fn byte_size(len: usize) -> u64 {
        (len * std::mem::size_of::<Content>()) as u64
    }

    /// Zero-initialized storage buffer with extra `usage` flags
    pub fn new_storage(
        device: &wgpu::Device,
        label: &str,
        len: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} <{}>", label, short_type_name::<Content>())),
            size: Self::byte_size(len),
            usage: wgpu::BufferUsages::STORAGE | usage,
            mapped_at_creation: false,
        });

        ArrayBuffer {
            buffer,
            content_type: PhantomData,
            len,
        }
    }

    /// Host-mappable buffer for reading back GPU data
    pub fn new_staging(device: &wgpu::Device, label: &str, len: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} <{}>", label, short_type_name::<Content>())),
            size: Self::byte_size(len),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        ArrayBuffer {
            buffer,
            content_type: PhantomData,
            len,
        }
    }

    /// Overwrite the whole array
    pub fn update_data(&self, queue: &wgpu::Queue, data: &[Content]) {
        assert_eq!(data.len(), self.len, "data does not match buffer length");
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
    }

    /// Record a full copy into `destination`
    pub fn copy_to(&self, encoder: &mut wgpu::CommandEncoder, destination: &ArrayBuffer<Content>) {
        let size = Self::byte_size(self.len.min(destination.len));
        encoder.copy_buffer_to_buffer(&self.buffer, 0, &destination.buffer, 0, size);
    }

    /// Map a staging buffer, block until the device is done with it and copy
    /// its contents out. The buffer is unmapped again before returning.
    ///
    /// A failed poll is returned before waiting on the map callback, which
    /// would otherwise never fire.
    pub fn read_mapped(&self, device: &wgpu::Device) -> Result<Vec<Content>> {
        let slice = self.buffer.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        device.poll(wgpu::PollType::Wait)?;

        match futures::executor::block_on(rx) {
            Ok(Ok(())) => {
                let data = {
                    let mapped = slice.get_mapped_range();
                    bytemuck::cast_slice::<u8, Content>(&mapped).to_vec()
                };
                self.buffer.unmap();
                Ok(data)
            }
            Ok(Err(error)) => Err(HexLifeError::BufferMap(error)),
            Err(_) => Err(HexLifeError::ReadbackCancelled),
        }
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name_strips_path() {
        assert_eq!(short_type_name::<crate::simulation::grid::Grid>(), "Grid");
        assert_eq!(short_type_name::<f32>(), "f32");
    }

    #[test]
    fn test_byte_size_uses_element_size() {
        assert_eq!(ArrayBuffer::<[f32; 4]>::byte_size(12), 192);
        assert_eq!(ArrayBuffer::<f32>::byte_size(9), 36);
    }
}
