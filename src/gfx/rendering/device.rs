//! GPU allocation seam used by [`Entity`](crate::gfx::entity::Entity).
//!
//! An entity only needs to create and release two kinds of per-object
//! handles, so that is all [`RenderDevice`] exposes. [`GpuDevice`] implements
//! it on top of wgpu.

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::gfx::resources::ObjectBindings;

/// Creates and releases the per-object GPU handles of an entity.
///
/// Handles are moved back into the release methods, so each one can be
/// released at most once.
pub trait RenderDevice {
    /// Raw vertex data for one object
    type Buffer;
    /// Per-object binding state used to draw the buffer
    type VertexArray;

    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Self::Buffer;

    /// Creates the binding state for `buffer`, interpreted with `layout`.
    fn create_vertex_array(
        &self,
        label: &str,
        buffer: &Self::Buffer,
        layout: &wgpu::VertexBufferLayout<'_>,
    ) -> Self::VertexArray;

    fn release_vertex_buffer(&self, buffer: Self::Buffer);

    fn release_vertex_array(&self, vertex_array: Self::VertexArray);
}

/// wgpu device and queue plus the layout every object bind group uses.
pub struct GpuDevice {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    object_layout: wgpu::BindGroupLayout,
}

impl GpuDevice {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let object_layout = ObjectBindings::create_layout(&device);
        Self {
            device,
            queue,
            object_layout,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn object_layout(&self) -> &wgpu::BindGroupLayout {
        &self.object_layout
    }
}

impl RenderDevice for GpuDevice {
    type Buffer = wgpu::Buffer;
    type VertexArray = ObjectBindings;

    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            })
    }

    fn create_vertex_array(
        &self,
        label: &str,
        buffer: &wgpu::Buffer,
        layout: &wgpu::VertexBufferLayout<'_>,
    ) -> ObjectBindings {
        let vertex_count = (buffer.size() / layout.array_stride.max(1)) as u32;
        ObjectBindings::new(&self.device, &self.object_layout, label, vertex_count)
    }

    fn release_vertex_buffer(&self, buffer: wgpu::Buffer) {
        buffer.destroy();
    }

    fn release_vertex_array(&self, vertex_array: ObjectBindings) {
        vertex_array.destroy();
    }
}
