//! Wavefront OBJ geometry parser.
//!
//! Positions, texture coordinates and normals accumulate across the whole
//! file; faces and `usemtl` bind to the most recent `o` object. Each
//! face-vertex token becomes one expanded [`Vertex`], so faces must already be
//! triangles for triangle-list rendering.

use std::path::Path;

use crate::{
    error::{AttributeKind, Error, Result},
    gfx::scene::{Model3D, Object3D, Vertex},
};

use super::{
    mtl::{parse_mtl, MaterialLibrary},
    next_token, parse_floats, rest_of_line, FsReader, SourceReader,
};

/// Position used when a face-vertex token has an empty position slot
pub const DEFAULT_POSITION: [f32; 3] = [0.0, 0.0, 0.0];
/// Texture coordinate used when a face-vertex token has no texcoord
pub const DEFAULT_TEXTURE_COORDINATE: [f32; 2] = [0.0, 1.0];
/// Normal used when a face-vertex token has no normal
pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Loads an OBJ file from disk.
///
/// `mtllib` paths are resolved relative to the OBJ file's directory.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Model3D> {
    let path = path.as_ref();
    let reader = FsReader;
    let text = reader.read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let model = parse_obj(&text, base_dir, &reader)?;
    log::info!(
        "Loaded {}: {} objects, {} triangles",
        path.display(),
        model.objects.len(),
        model.triangle_count()
    );
    Ok(model)
}

/// Parses OBJ text.
///
/// `base_dir` is joined with every `mtllib` argument before it is handed to
/// `reader`.
///
/// # Errors
/// - [`Error::Parse`] for a malformed number or index
/// - [`Error::Index`] for a face index outside the data parsed so far
/// - [`Error::State`] for `f` or `usemtl` before any `o`
/// - [`Error::Io`] if a material library cannot be read
pub fn parse_obj(text: &str, base_dir: &Path, reader: &impl SourceReader) -> Result<Model3D> {
    let mut parser = ObjParser::new(base_dir, reader);
    for (index, line) in text.lines().enumerate() {
        parser.parse_line(index + 1, line)?;
    }
    Ok(parser.model)
}

struct ObjParser<'a, R> {
    base_dir: &'a Path,
    reader: &'a R,
    positions: Vec<[f32; 3]>,
    texture_coordinates: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    materials: MaterialLibrary,
    model: Model3D,
}

impl<'a, R: SourceReader> ObjParser<'a, R> {
    fn new(base_dir: &'a Path, reader: &'a R) -> Self {
        Self {
            base_dir,
            reader,
            positions: Vec::new(),
            texture_coordinates: Vec::new(),
            normals: Vec::new(),
            materials: MaterialLibrary::new(),
            model: Model3D::default(),
        }
    }

    fn parse_line(&mut self, line: usize, text: &str) -> Result<()> {
        let mut tokens = text.split_whitespace();
        let Some(directive) = tokens.next() else {
            return Ok(());
        };

        match directive {
            "o" => {
                self.model.objects.push(Object3D::new(rest_of_line(tokens)));
            }
            "mtllib" => {
                // Every listed library feeds the same material table
                let first = next_token(&mut tokens, line, "material library path")?;
                for file in std::iter::once(first).chain(tokens) {
                    let path = self.base_dir.join(file);
                    let text = self.reader.read_to_string(&path)?;
                    parse_mtl(&text, &mut self.materials)?;
                    log::debug!(
                        "{}: {} materials available",
                        path.display(),
                        self.materials.len()
                    );
                }
            }
            "usemtl" => {
                let name = next_token(&mut tokens, line, "material name")?;
                let material = self.materials.get(name).copied();
                let object = self.current_object(line)?;
                match material {
                    Some(material) => object.material = material,
                    None => log::warn!(
                        "line {line}: unknown material '{name}', keeping the current one for '{}'",
                        object.name
                    ),
                }
            }
            "v" => {
                let position = parse_floats(&mut tokens, line, "position")?;
                self.positions.push(position);
            }
            "vt" => {
                let [u, v] = parse_floats(&mut tokens, line, "texture coordinate")?;
                self.texture_coordinates.push([u, 1.0 - v]);
            }
            "vn" => {
                let normal = parse_floats(&mut tokens, line, "normal")?;
                self.normals.push(normal);
            }
            "f" => {
                self.current_object(line)?;
                let vertices = tokens
                    .map(|token| self.face_vertex(line, token))
                    .collect::<Result<Vec<_>>>()?;
                self.current_object(line)?.vertices.extend(vertices);
            }
            _ => {}
        }

        Ok(())
    }

    fn current_object(&mut self, line: usize) -> Result<&mut Object3D> {
        self.model.objects.last_mut().ok_or(Error::State {
            line,
            message: "no current object (missing `o` directive)",
        })
    }

    /// Builds one vertex from a `position[/texcoord][/normal]` token.
    fn face_vertex(&self, line: usize, token: &str) -> Result<Vertex> {
        let mut vertex = Vertex {
            position: DEFAULT_POSITION,
            normal: DEFAULT_NORMAL,
            tangent: [0.0; 3],
            texture_coordinate: DEFAULT_TEXTURE_COORDINATE,
        };

        for (slot, component) in token.split('/').enumerate() {
            if component.is_empty() {
                continue;
            }
            match slot {
                0 => {
                    vertex.position =
                        resolve(&self.positions, component, AttributeKind::Position, line)?
                }
                1 => {
                    vertex.texture_coordinate = resolve(
                        &self.texture_coordinates,
                        component,
                        AttributeKind::TextureCoordinate,
                        line,
                    )?
                }
                2 => {
                    vertex.normal = resolve(&self.normals, component, AttributeKind::Normal, line)?
                }
                _ => {}
            }
        }

        Ok(vertex)
    }
}

/// Looks up a 1-based file index in a 0-based list.
fn resolve<T: Copy>(items: &[T], component: &str, kind: AttributeKind, line: usize) -> Result<T> {
    let index: i64 = component.parse().map_err(|_| Error::Parse {
        line,
        expected: "face index",
        found: component.to_owned(),
    })?;

    index
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| items.get(i))
        .copied()
        .ok_or(Error::Index {
            line,
            kind,
            index,
            len: items.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{loader::test_support::MemoryReader, scene::Material};

    fn parse(text: &str) -> Result<Model3D> {
        parse_obj(text, Path::new(""), &MemoryReader::default())
    }

    #[test]
    fn test_single_triangle_without_attributes() {
        let model = parse("o Box\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        assert_eq!(model.objects.len(), 1);
        let object = &model.objects[0];
        assert_eq!(object.name, "Box");
        assert_eq!(object.vertices.len(), 3);

        let positions: Vec<[f32; 3]> = object.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
        );
        for vertex in &object.vertices {
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
            assert_eq!(vertex.texture_coordinate, [0.0, 1.0]);
            assert_eq!(vertex.tangent, [0.0; 3]);
        }
        assert_eq!(object.material, Material::default());
    }

    #[test]
    fn test_usemtl_copies_library_material() {
        let reader = MemoryReader::default()
            .with_file("models/m.mtl", "newmtl M\nKd 0.5 0.5 0.5\nd 0.8\n");
        let text = "mtllib m.mtl\no Thing\nusemtl M\nv 0 0 0\nf 1 1 1\n";
        let model = parse_obj(text, Path::new("models"), &reader).unwrap();

        let material = model.objects[0].material;
        assert_eq!(material.diffuse_color, [0.5, 0.5, 0.5]);
        assert_eq!(material.transparency, 0.8);
        assert_eq!(material.ambient_color, [0.0; 3]);
        assert_eq!(material.specular_color, [0.0; 3]);
        assert_eq!(material.shininess, 0.0);
    }

    #[test]
    fn test_mtllib_loads_every_listed_library() {
        let reader = MemoryReader::default()
            .with_file("a.mtl", "newmtl A\nKd 1 0 0\n")
            .with_file("b.mtl", "newmtl B\nKd 0 0 1\n");
        let text = "mtllib a.mtl b.mtl\no X\nusemtl A\no Y\nusemtl B\n";
        let model = parse_obj(text, Path::new(""), &reader).unwrap();

        assert_eq!(model.objects[0].material.diffuse_color, [1.0, 0.0, 0.0]);
        assert_eq!(model.objects[1].material.diffuse_color, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_mtllib_without_path_is_parse_error() {
        let err = parse("mtllib\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_material_name_with_space_selects_first_token() {
        let reader =
            MemoryReader::default().with_file("m.mtl", "newmtl Red Paint\nKd 1 0 0\n");
        let text = "mtllib m.mtl\no A\nusemtl Red Paint\n";
        let model = parse_obj(text, Path::new(""), &reader).unwrap();
        assert_eq!(model.objects[0].material.diffuse_color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unknown_material_keeps_default() {
        let reader = MemoryReader::default().with_file("m.mtl", "newmtl M\nKd 1 1 1\n");
        let model =
            parse_obj("mtllib m.mtl\no A\nusemtl Missing\n", Path::new(""), &reader).unwrap();
        assert_eq!(model.objects[0].material, Material::default());
    }

    #[test]
    fn test_missing_material_library_is_io_error() {
        let err = parse("mtllib nowhere.mtl\n").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_attributes_accumulate_across_objects() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.25 0.75
vn 0 0 1
o First
f 1/1/1 2/1/1 3/1/1
o Second
v 0 0 5
f 4/1/1 2/1/1 1/1/1
";
        let model = parse(text).unwrap();
        assert_eq!(model.objects.len(), 2);
        assert_eq!(model.objects[0].vertices.len(), 3);
        assert_eq!(model.objects[1].vertices.len(), 3);
        assert_eq!(model.objects[1].vertices[0].position, [0.0, 0.0, 5.0]);
        assert_eq!(model.objects[1].vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(model.objects[1].vertices[0].texture_coordinate, [0.25, 0.25]);
    }

    #[test]
    fn test_texture_v_is_flipped() {
        let text = "o A\nv 0 0 0\nvt 0.1 0.3\nf 1/1 1/1 1/1\n";
        let model = parse(text).unwrap();
        let [u, v] = model.objects[0].vertices[0].texture_coordinate;
        assert_eq!(u, 0.1);
        assert_eq!(v, 1.0 - 0.3);
        assert!((1.0 - v - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_empty_slots_use_defaults() {
        let text = "o A\nv 1 2 3\nvt 0.5 0.5\nvn 1 0 0\nf 1//1 1/1/ /1/1\n";
        let vertices = &parse(text).unwrap().objects[0].vertices;

        assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[0].texture_coordinate, DEFAULT_TEXTURE_COORDINATE);
        assert_eq!(vertices[0].normal, [1.0, 0.0, 0.0]);

        assert_eq!(vertices[1].texture_coordinate, [0.5, 0.5]);
        assert_eq!(vertices[1].normal, DEFAULT_NORMAL);

        assert_eq!(vertices[2].position, DEFAULT_POSITION);
        assert_eq!(vertices[2].normal, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_vertex_count_is_three_per_triangle() {
        let mut text = String::from("o Strip\nv 0 0 0\nv 1 0 0\nv 0 1 0\n");
        for _ in 0..7 {
            text.push_str("f 1 2 3\n");
        }
        let model = parse(&text).unwrap();
        assert_eq!(model.objects[0].vertices.len(), 21);
    }

    #[test]
    fn test_object_count_matches_o_directives() {
        let model = parse("o A\no B\n# comment\ns 1\no C\n").unwrap();
        let names: Vec<&str> = model.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_face_before_object_is_state_error() {
        let err = parse("v 0 0 0\nf 1 1 1\n").unwrap_err();
        assert!(matches!(err, Error::State { line: 2, .. }));
    }

    #[test]
    fn test_usemtl_before_object_is_state_error() {
        let err = parse("usemtl M\n").unwrap_err();
        assert!(matches!(err, Error::State { line: 1, .. }));
    }

    #[test]
    fn test_out_of_range_index() {
        let err = parse("o A\nv 0 0 0\nf 1 2 1\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Index {
                line: 3,
                kind: AttributeKind::Position,
                index: 2,
                len: 1
            }
        ));

        let err = parse("o A\nv 0 0 0\nf 1/1 1 1\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Index {
                kind: AttributeKind::TextureCoordinate,
                len: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_and_negative_indices_are_rejected() {
        let err = parse("o A\nv 0 0 0\nf 0 1 1\n").unwrap_err();
        assert!(matches!(err, Error::Index { index: 0, .. }));

        let err = parse("o A\nv 0 0 0\nf -1 1 1\n").unwrap_err();
        assert!(matches!(err, Error::Index { index: -1, .. }));
    }

    #[test]
    fn test_malformed_numbers_are_parse_errors() {
        let err = parse("v 0 zero 0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, ref found, .. } if found == "zero"));

        let err = parse("o A\nv 0 0 0\nf 1 x 1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, ref found, .. } if found == "x"));

        let err = parse("vn 0 1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }
}
