//! Global uniform bindings for camera and light data
//!
//! One uniform buffer at bind group 0 shared by the depth pass and the lit
//! pass. It carries the camera and light transforms computed from the
//! [`RenderContext`].

use crate::{
    gfx::context::RenderContext,
    wgpu_utils::{binding_types, UniformBuffer},
};

/// Global uniform buffer content.
///
/// MUST match the `Globals` struct in both shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub light_position: [f32; 4],
    pub light_view_proj: [[f32; 4]; 4],
}
// 16 + 64 + 16 + 64 = 160 bytes

impl GlobalUniform {
    /// Computes the per-frame globals for a surface of the given aspect ratio.
    pub fn new(context: &RenderContext, aspect: f32) -> Self {
        Self {
            view_position: context.camera.view_position(),
            view_proj: context.camera.build_view_projection_matrix(aspect).into(),
            light_position: context.light.position_homogeneous(),
            light_view_proj: context.light.build_view_projection_matrix().into(),
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Layout, buffer and bind group for the global uniforms.
pub struct GlobalBindings {
    ubo: GlobalUBO,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let ubo = GlobalUBO::new(device);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[binding_types::entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                binding_types::uniform(),
            )],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            ubo,
            bind_group_layout,
            bind_group,
        }
    }

    /// Writes camera and light transforms for this frame.
    pub fn update(&mut self, queue: &wgpu::Queue, context: &RenderContext, aspect: f32) {
        self.ubo
            .update_content(queue, GlobalUniform::new(context, aspect));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_matches_shader() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 160);
    }

    #[test]
    fn test_globals_follow_context() {
        let context = RenderContext::default();
        let globals = GlobalUniform::new(&context, 1.5);

        assert_eq!(globals.view_position, context.camera.view_position());
        assert_eq!(globals.light_position, context.light.position_homogeneous());

        let light: [[f32; 4]; 4] = context.light.build_view_projection_matrix().into();
        assert_eq!(globals.light_view_proj, light);
    }
}
