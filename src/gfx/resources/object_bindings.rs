//! Per-object uniform data and bind groups.
//!
//! Each uploaded object gets its own uniform buffer (model matrix plus
//! material) and bind group at slot 1. Together with the vertex buffer this
//! is everything a draw call needs besides the global state.

use cgmath::Matrix4;

use crate::{
    gfx::scene::Material,
    wgpu_utils::{binding_types, UniformBuffer},
};

/// MUST match the `ObjectUniforms` struct in both shaders.
///
/// Transparency rides in `diffuse[3]` and shininess in `specular[3]`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Matrix4<f32>, material: &Material) -> Self {
        let [ar, ag, ab] = material.ambient_color;
        let [dr, dg, db] = material.diffuse_color;
        let [sr, sg, sb] = material.specular_color;
        Self {
            model: model.into(),
            ambient: [ar, ag, ab, 1.0],
            diffuse: [dr, dg, db, material.transparency],
            specular: [sr, sg, sb, material.shininess],
        }
    }
}

type ObjectUBO = UniformBuffer<ObjectUniform>;

/// GPU binding state for one object of an entity.
pub struct ObjectBindings {
    ubo: ObjectUBO,
    bind_group: wgpu::BindGroup,
    vertex_count: u32,
}

impl ObjectBindings {
    pub fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[binding_types::entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                binding_types::uniform(),
            )],
        })
    }

    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        vertex_count: u32,
    ) -> Self {
        let ubo = ObjectUBO::with_label(device, &format!("{label} Uniforms"));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            ubo,
            bind_group,
            vertex_count,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: ObjectUniform) {
        self.ubo.update_content(queue, content);
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn destroy(self) {
        self.ubo.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector3};

    #[test]
    fn test_uniform_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<ObjectUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 112);
    }

    #[test]
    fn test_material_packing() {
        let material = Material {
            ambient_color: [0.1, 0.2, 0.3],
            diffuse_color: [0.4, 0.5, 0.6],
            specular_color: [0.7, 0.8, 0.9],
            transparency: 0.25,
            shininess: 48.0,
        };
        let model = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let uniform = ObjectUniform::new(model, &material);

        assert_eq!(uniform.ambient, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(uniform.diffuse, [0.4, 0.5, 0.6, 0.25]);
        assert_eq!(uniform.specular, [0.7, 0.8, 0.9, 48.0]);
        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0]);

        let identity = ObjectUniform::new(Matrix4::identity(), &Material::default());
        assert_eq!(identity.model[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
