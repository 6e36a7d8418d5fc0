//! Texture bind group for the lit pass: albedo, normal map and shadow map.

use crate::wgpu_utils::binding_types;

use super::texture_resource::TextureResource;

/// Bind group 2 of the lit pipeline.
///
/// | binding | resource |
/// |---|---|
/// | 0, 1 | albedo texture and sampler |
/// | 2, 3 | normal map and sampler |
/// | 4, 5 | shadow map and comparison sampler |
pub struct MaterialTextures {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl MaterialTextures {
    pub fn new(
        device: &wgpu::Device,
        albedo: &TextureResource,
        normal_map: &TextureResource,
        shadow_map: &TextureResource,
    ) -> Self {
        let fragment = wgpu::ShaderStages::FRAGMENT;
        let filtering = wgpu::SamplerBindingType::Filtering;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Textures Layout"),
            entries: &[
                binding_types::entry(0, fragment, binding_types::texture_2d()),
                binding_types::entry(1, fragment, binding_types::sampler(filtering)),
                binding_types::entry(2, fragment, binding_types::texture_2d()),
                binding_types::entry(3, fragment, binding_types::sampler(filtering)),
                binding_types::entry(4, fragment, binding_types::texture_depth_2d()),
                binding_types::entry(
                    5,
                    fragment,
                    binding_types::sampler(wgpu::SamplerBindingType::Comparison),
                ),
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Textures Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&albedo.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&albedo.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&normal_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&normal_map.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
        });

        Self {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
