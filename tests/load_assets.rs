use std::path::PathBuf;

use shadowbox::gfx::loader::load_obj;
use shadowbox::Error;

fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join(name)
}

fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-6)
}

#[test]
fn loads_demo_scene() {
    let model = load_obj(asset("scene.obj")).expect("demo scene should load");

    let names: Vec<&str> = model.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["Crate", "Ground"]);
    assert_eq!(model.objects[0].vertices.len(), 36);
    assert_eq!(model.objects[1].vertices.len(), 6);
    assert_eq!(model.triangle_count(), 14);
}

#[test]
fn demo_materials_come_from_mtllib() {
    let model = load_obj(asset("scene.obj")).expect("demo scene should load");

    let crate_material = model.objects[0].material;
    assert!(approx(crate_material.diffuse_color, [0.8, 0.55, 0.3]));
    assert_eq!(crate_material.shininess, 64.0);
    assert_eq!(crate_material.transparency, 1.0);

    let ground_material = model.objects[1].material;
    assert!(approx(ground_material.diffuse_color, [0.6, 0.62, 0.6]));
    assert_eq!(ground_material.transparency, 1.0);
}

#[test]
fn computed_tangents_are_unit_length() {
    let mut model = load_obj(asset("scene.obj")).expect("demo scene should load");
    model.compute_tangents();

    for object in &model.objects {
        for vertex in &object.vertices {
            let [x, y, z] = vertex.tangent;
            let length = (x * x + y * y + z * z).sqrt();
            assert!((length - 1.0).abs() < 1e-4, "{}: {:?}", object.name, vertex.tangent);
        }
    }
}

#[test]
fn missing_model_is_io_error() {
    let err = load_obj(asset("missing.obj")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "unexpected error: {err}");
}
