use cgmath::{perspective, Deg, Matrix4, Point3, Vector3};

use super::OPENGL_TO_WGPU_MATRIX;

/// Viewer camera described by an eye position and a view direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub up: Vector3<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at(Point3::new(3.5, 3.0, 4.5), Point3::new(0.0, 0.5, 0.0))
    }
}

impl Camera {
    /// Creates a camera at `position` aimed at `target`, with +Y up.
    pub fn looking_at(position: Point3<f32>, target: Point3<f32>) -> Self {
        Self {
            position,
            direction: target - position,
            up: Vector3::unit_y(),
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 100.0,
        }
    }

    pub fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.direction, self.up)
    }

    /// World → clip transform for a surface with the given aspect ratio.
    pub fn build_view_projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        let proj = OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, aspect, self.znear, self.zfar);
        proj * self.build_view_matrix()
    }

    /// Eye position in homogeneous coordinates, as the shaders expect it.
    pub fn view_position(&self) -> [f32; 4] {
        self.position.to_homogeneous().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera::looking_at(Point3::new(0.0, 2.0, 5.0), Point3::new(0.0, 0.0, 0.0));
        let clip =
            camera.build_view_projection_matrix(16.0 / 9.0) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_view_position_is_homogeneous() {
        let camera = Camera::looking_at(Point3::new(1.0, 2.0, 3.0), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(camera.view_position(), [1.0, 2.0, 3.0, 1.0]);
    }
}
