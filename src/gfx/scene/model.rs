//! Parsed model data: materials, objects and the model root.

use cgmath::{InnerSpace, Vector2, Vector3};

use super::vertex::Vertex;

/// Surface properties read from an MTL file.
///
/// The default is all zeros, which is also what an object keeps when its
/// `usemtl` names a material the library does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Material {
    pub ambient_color: [f32; 3],
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub transparency: f32,
    pub shininess: f32,
}

/// One named group (`o`) of an OBJ file.
///
/// Vertices are fully expanded, three per triangle, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object3D {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub material: Material,
}

impl Object3D {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            material: Material::default(),
        }
    }
}

/// Root result of parsing an OBJ file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model3D {
    pub objects: Vec<Object3D>,
}

impl Model3D {
    pub fn new(objects: Vec<Object3D>) -> Self {
        Self { objects }
    }

    /// Total number of vertices across all objects
    pub fn vertex_count(&self) -> usize {
        self.objects.iter().map(|o| o.vertices.len()).sum()
    }

    /// Number of complete triangles across all objects
    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.vertices.len() / 3).sum()
    }

    /// Derives a tangent for every triangle from its position and
    /// texture-coordinate deltas and writes it to all three vertices.
    ///
    /// Triangles whose texture coordinates are degenerate (zero UV area, as
    /// happens when the file supplies no `vt`) keep their existing tangent.
    /// Trailing vertices that do not form a full triangle are left alone.
    pub fn compute_tangents(&mut self) {
        for object in &mut self.objects {
            for triangle in object.vertices.chunks_exact_mut(3) {
                if let Some(tangent) = triangle_tangent(triangle) {
                    for vertex in triangle.iter_mut() {
                        vertex.tangent = tangent;
                    }
                }
            }
        }
    }
}

fn triangle_tangent(triangle: &[Vertex]) -> Option<[f32; 3]> {
    let p0 = Vector3::from(triangle[0].position);
    let p1 = Vector3::from(triangle[1].position);
    let p2 = Vector3::from(triangle[2].position);
    let uv0 = Vector2::from(triangle[0].texture_coordinate);
    let uv1 = Vector2::from(triangle[1].texture_coordinate);
    let uv2 = Vector2::from(triangle[2].texture_coordinate);

    let edge1 = p1 - p0;
    let edge2 = p2 - p0;
    let delta1 = uv1 - uv0;
    let delta2 = uv2 - uv0;

    let determinant = delta1.x * delta2.y - delta2.x * delta1.y;
    if determinant.abs() <= f32::EPSILON {
        return None;
    }

    let tangent = (edge1 * delta2.y - edge2 * delta1.y) / determinant;
    if tangent.magnitude2() <= f32::EPSILON {
        return None;
    }
    Some(tangent.normalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(position: [f32; 3], uv: [f32; 2]) -> Vertex {
        Vertex {
            position,
            normal: [0.0, 0.0, 1.0],
            tangent: [0.0; 3],
            texture_coordinate: uv,
        }
    }

    #[test]
    fn test_default_material_is_zeroed() {
        let material = Material::default();
        assert_eq!(material.ambient_color, [0.0; 3]);
        assert_eq!(material.diffuse_color, [0.0; 3]);
        assert_eq!(material.specular_color, [0.0; 3]);
        assert_eq!(material.transparency, 0.0);
        assert_eq!(material.shininess, 0.0);
    }

    #[test]
    fn test_compute_tangents_follows_u_axis() {
        let mut object = Object3D::new("quad");
        object.vertices = vec![
            vertex([0.0, 0.0, 0.0], [0.0, 0.0]),
            vertex([1.0, 0.0, 0.0], [1.0, 0.0]),
            vertex([0.0, 1.0, 0.0], [0.0, 1.0]),
        ];
        let mut model = Model3D::new(vec![object]);
        model.compute_tangents();

        for v in &model.objects[0].vertices {
            assert!((v.tangent[0] - 1.0).abs() < 1e-6);
            assert!(v.tangent[1].abs() < 1e-6);
            assert!(v.tangent[2].abs() < 1e-6);
        }
    }

    #[test]
    fn test_compute_tangents_skips_degenerate_uvs() {
        let mut object = Object3D::new("flat");
        object.vertices = vec![
            vertex([0.0, 0.0, 0.0], [0.0, 1.0]),
            vertex([1.0, 0.0, 0.0], [0.0, 1.0]),
            vertex([0.0, 1.0, 0.0], [0.0, 1.0]),
            vertex([5.0, 5.0, 5.0], [0.5, 0.5]),
        ];
        let mut model = Model3D::new(vec![object]);
        model.compute_tangents();

        assert!(model.objects[0].vertices.iter().all(|v| v.tangent == [0.0; 3]));
    }

    #[test]
    fn test_counts() {
        let mut a = Object3D::new("a");
        a.vertices = vec![Vertex::default(); 6];
        let mut b = Object3D::new("b");
        b.vertices = vec![Vertex::default(); 3];
        let model = Model3D::new(vec![a, b]);
        assert_eq!(model.vertex_count(), 9);
        assert_eq!(model.triangle_count(), 3);
    }
}
