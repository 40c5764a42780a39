use std::marker::PhantomData;
use std::{any, mem};

use bytemuck::Pod;

use crate::Bindable;

/// A typed storage buffer holding `len` elements of `T`.
pub struct StorageBuffer<T> {
    buffer: wgpu::Buffer,
    _marker: PhantomData<T>,
}

impl<T> StorageBuffer<T>
where
    T: Pod,
{
    pub fn new(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        len: usize,
    ) -> Self {
        let label = label.as_ref();

        // Zero-length buffers are not bindable; keep a one-element slot for
        // the empty arrays of sparse scenes.
        let size = mem::size_of::<T>() * len.max(1);

        log::debug!(
            "Allocating storage buffer `{label}`; ty={}, size={size}",
            any::type_name::<T>(),
        );

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::STORAGE,
            size: size as _,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            _marker: PhantomData,
        }
    }

    pub fn new_with(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: impl AsRef<str>,
        data: &[T],
    ) -> Self {
        let buffer = Self::new(device, label, data.len());

        buffer.write(queue, data);
        buffer
    }

    pub fn write(&self, queue: &wgpu::Queue, data: &[T]) {
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
    }

    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.clear_buffer(&self.buffer, 0, None);
    }
}

impl<T> Bindable for StorageBuffer<T> {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let layout = wgpu::BindGroupLayoutEntry {
            binding,
            // No VERTEX: writable storage is not bindable there.
            visibility: wgpu::ShaderStages::FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                // rust-gpu does not mark read-only slices as such, so the
                // layout has to say read-write even for the geometry.
                ty: wgpu::BufferBindingType::Storage { read_only: false },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let resource = self.buffer.as_entire_binding();

        vec![(layout, resource)]
    }
}
