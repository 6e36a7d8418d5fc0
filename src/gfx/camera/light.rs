use cgmath::{perspective, Deg, Matrix4, Point3, Vector3};

use super::OPENGL_TO_WGPU_MATRIX;

/// The single shadow-casting light.
///
/// Shadows are rendered with a perspective frustum from `position` towards
/// `target`, so everything that should cast or receive shadows has to sit
/// inside `fovy` and `znear..zfar`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Point3::new(4.0, 8.0, 3.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            fovy: Deg(60.0),
            znear: 1.0,
            zfar: 30.0,
        }
    }
}

impl Light {
    /// World → light clip transform used by the depth pass and for shadow
    /// lookups in the lit pass. The shadow map is square, so aspect is 1.
    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(self.position, self.target, self.up);
        let proj = OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, 1.0, self.znear, self.zfar);
        proj * view
    }

    pub fn position_homogeneous(&self) -> [f32; 4] {
        self.position.to_homogeneous().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn test_target_lands_inside_shadow_map() {
        let light = Light::default();
        let clip = light.build_view_projection_matrix() * light.target.to_homogeneous();
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let light = Light::default();
        let matrix = light.build_view_projection_matrix();
        let depth = |p: Vector4<f32>| {
            let clip = matrix * p;
            clip.z / clip.w
        };

        let toward_light = (light.position - light.target) * 0.5;
        let near = light.target + toward_light;
        assert!(depth(near.to_homogeneous()) < depth(light.target.to_homogeneous()));
    }
}
