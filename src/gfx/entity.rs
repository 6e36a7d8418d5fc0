//! A model placed in the world together with the GPU handles that draw it.

use std::sync::Arc;

use cgmath::{Deg, Matrix4, Vector3};

use crate::gfx::{
    rendering::device::{GpuDevice, RenderDevice},
    resources::ObjectUniform,
    scene::{Model3D, Vertex},
};

/// Fixed yaw applied to every entity of the demo scene.
pub const DEMO_ROTATION: Deg<f32> = Deg(-30.0);

/// State the lit pass binds around each entity draw.
pub struct LitPass<'a> {
    pub pipeline: &'a wgpu::RenderPipeline,
    pub globals: &'a wgpu::BindGroup,
    pub textures: &'a wgpu::BindGroup,
}

/// State the shadow depth pass binds around each entity draw.
pub struct DepthPass<'a> {
    pub pipeline: &'a wgpu::RenderPipeline,
    pub globals: &'a wgpu::BindGroup,
}

/// Owns a [`Model3D`] and one vertex buffer plus one vertex array per object.
///
/// `vertex_buffers[i]` and `vertex_arrays[i]` belong to `model.objects[i]`.
/// Every handle is handed back to the device exactly once when the entity is
/// dropped.
pub struct Entity<D: RenderDevice> {
    model: Model3D,
    vertex_buffers: Vec<D::Buffer>,
    vertex_arrays: Vec<D::VertexArray>,
    position: Vector3<f32>,
    device: Arc<D>,
}

impl<D: RenderDevice> Entity<D> {
    /// Uploads every object of `model` and places the result at `position`.
    pub fn new(device: Arc<D>, model: Model3D, position: Vector3<f32>) -> Self {
        let layout = Vertex::desc();
        let mut vertex_buffers = Vec::with_capacity(model.objects.len());
        let mut vertex_arrays = Vec::with_capacity(model.objects.len());

        for object in &model.objects {
            let buffer =
                device.create_vertex_buffer(&object.name, bytemuck::cast_slice(&object.vertices));
            let vertex_array = device.create_vertex_array(&object.name, &buffer, &layout);
            log::debug!(
                "Uploaded object '{}' ({} vertices)",
                object.name,
                object.vertices.len()
            );
            vertex_buffers.push(buffer);
            vertex_arrays.push(vertex_array);
        }

        Self {
            model,
            vertex_buffers,
            vertex_arrays,
            position,
            device,
        }
    }

    pub fn model(&self) -> &Model3D {
        &self.model
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn object_count(&self) -> usize {
        self.model.objects.len()
    }

    pub fn vertex_buffers(&self) -> &[D::Buffer] {
        &self.vertex_buffers
    }

    pub fn vertex_arrays(&self) -> &[D::VertexArray] {
        &self.vertex_arrays
    }

    /// World transform: translation to `position` after the demo rotation.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from_angle_y(DEMO_ROTATION)
    }
}

impl Entity<GpuDevice> {
    /// Writes each object's transform and material to its uniform buffer.
    pub fn prepare(&mut self) {
        let model_matrix = self.model_matrix();
        let queue = self.device.queue();

        for (object, bindings) in self.model.objects.iter().zip(&mut self.vertex_arrays) {
            bindings.update(queue, ObjectUniform::new(model_matrix, &object.material));
        }
    }

    /// Draws every non-empty object with the lit pipeline.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>, lit: &LitPass<'_>) {
        for (buffer, bindings) in self.vertex_buffers.iter().zip(&self.vertex_arrays) {
            if bindings.vertex_count() == 0 {
                continue;
            }
            pass.set_pipeline(lit.pipeline);
            pass.set_bind_group(0, lit.globals, &[]);
            pass.set_bind_group(1, bindings.bind_group(), &[]);
            pass.set_bind_group(2, lit.textures, &[]);
            pass.set_vertex_buffer(0, buffer.slice(..));
            pass.draw(0..bindings.vertex_count(), 0..1);
        }
    }

    /// Draws every non-empty object into the shadow map.
    pub fn render_depth_map(&self, pass: &mut wgpu::RenderPass<'_>, depth: &DepthPass<'_>) {
        for (buffer, bindings) in self.vertex_buffers.iter().zip(&self.vertex_arrays) {
            if bindings.vertex_count() == 0 {
                continue;
            }
            pass.set_pipeline(depth.pipeline);
            pass.set_bind_group(0, depth.globals, &[]);
            pass.set_bind_group(1, bindings.bind_group(), &[]);
            pass.set_vertex_buffer(0, buffer.slice(..));
            pass.draw(0..bindings.vertex_count(), 0..1);
        }
    }
}

impl<D: RenderDevice> Drop for Entity<D> {
    fn drop(&mut self) {
        for vertex_array in self.vertex_arrays.drain(..) {
            self.device.release_vertex_array(vertex_array);
        }
        for buffer in self.vertex_buffers.drain(..) {
            self.device.release_vertex_buffer(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Object3D;
    use cgmath::{SquareMatrix, Vector4};
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, PartialEq)]
    struct RecordedLayout {
        stride: u64,
        locations: Vec<u32>,
    }

    /// Hands out sequential ids and records every create/release call.
    #[derive(Default)]
    struct RecordingDevice {
        next_id: Cell<u32>,
        buffers: RefCell<Vec<(u32, usize)>>,
        arrays: RefCell<Vec<u32>>,
        layouts: RefCell<Vec<RecordedLayout>>,
        released_buffers: RefCell<Vec<u32>>,
        released_arrays: RefCell<Vec<u32>>,
    }

    impl RecordingDevice {
        fn next(&self) -> u32 {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            id
        }
    }

    impl RenderDevice for RecordingDevice {
        type Buffer = u32;
        type VertexArray = u32;

        fn create_vertex_buffer(&self, _label: &str, contents: &[u8]) -> u32 {
            let id = self.next();
            self.buffers.borrow_mut().push((id, contents.len()));
            id
        }

        fn create_vertex_array(
            &self,
            _label: &str,
            _buffer: &u32,
            layout: &wgpu::VertexBufferLayout<'_>,
        ) -> u32 {
            self.layouts.borrow_mut().push(RecordedLayout {
                stride: layout.array_stride,
                locations: layout.attributes.iter().map(|a| a.shader_location).collect(),
            });
            let id = self.next();
            self.arrays.borrow_mut().push(id);
            id
        }

        fn release_vertex_buffer(&self, buffer: u32) {
            self.released_buffers.borrow_mut().push(buffer);
        }

        fn release_vertex_array(&self, vertex_array: u32) {
            self.released_arrays.borrow_mut().push(vertex_array);
        }
    }

    fn object(name: &str, vertex_count: usize) -> Object3D {
        let mut object = Object3D::new(name);
        object.vertices = vec![Vertex::default(); vertex_count];
        object
    }

    fn two_object_model() -> Model3D {
        Model3D::new(vec![object("Crate", 36), object("Ground", 6)])
    }

    #[test]
    fn test_one_buffer_and_array_per_object() {
        let device = Arc::new(RecordingDevice::default());
        let entity = Entity::new(device.clone(), two_object_model(), Vector3::new(0.0, 0.0, 0.0));

        assert_eq!(entity.object_count(), 2);
        assert_eq!(entity.vertex_buffers().len(), 2);
        assert_eq!(entity.vertex_arrays().len(), 2);

        let buffers = device.buffers.borrow();
        assert_eq!(buffers[0].1, 36 * 44);
        assert_eq!(buffers[1].1, 6 * 44);
    }

    #[test]
    fn test_vertex_arrays_declare_four_attributes() {
        let device = Arc::new(RecordingDevice::default());
        let _entity = Entity::new(device.clone(), two_object_model(), Vector3::new(0.0, 0.0, 0.0));

        for layout in device.layouts.borrow().iter() {
            assert_eq!(layout.stride, 44);
            assert_eq!(layout.locations, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_drop_releases_every_handle_once() {
        let device = Arc::new(RecordingDevice::default());
        let entity = Entity::new(device.clone(), two_object_model(), Vector3::new(1.0, 0.0, 0.0));
        assert!(device.released_buffers.borrow().is_empty());
        drop(entity);

        let mut created: Vec<u32> = device.buffers.borrow().iter().map(|(id, _)| *id).collect();
        let mut released = device.released_buffers.borrow().clone();
        created.sort_unstable();
        released.sort_unstable();
        assert_eq!(created, released);

        let mut created = device.arrays.borrow().clone();
        let mut released = device.released_arrays.borrow().clone();
        created.sort_unstable();
        released.sort_unstable();
        assert_eq!(created, released);
    }

    #[test]
    fn test_empty_model_creates_nothing() {
        let device = Arc::new(RecordingDevice::default());
        let entity = Entity::new(device.clone(), Model3D::default(), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(entity.object_count(), 0);
        drop(entity);

        assert!(device.buffers.borrow().is_empty());
        assert!(device.released_buffers.borrow().is_empty());
        assert!(device.released_arrays.borrow().is_empty());
    }

    #[test]
    fn test_model_matrix_translates_after_rotation() {
        let device = Arc::new(RecordingDevice::default());
        let position = Vector3::new(2.0, 0.5, -1.0);
        let entity = Entity::new(device, Model3D::default(), position);

        let matrix = entity.model_matrix();
        let origin = matrix * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.x - 2.0).abs() < 1e-6);
        assert!((origin.y - 0.5).abs() < 1e-6);
        assert!((origin.z + 1.0).abs() < 1e-6);

        // Pure yaw keeps the up axis
        let up = matrix * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert!((up.y - 1.0).abs() < 1e-6);
        assert!(matrix.is_invertible());
    }
}
