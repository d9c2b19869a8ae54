//! Tests for writing document models and reading them back

use colorbake::{
    BaseMaterial, BaseMaterialGroup, BuildItem, Mesh, MetadataEntry, Model, Object, Triangle,
    Vertex, VertexColorGroup,
};
use std::io::Cursor;

fn triangle_mesh() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.vertices.push(Vertex::new(0.0, 0.0, 0.0));
    mesh.vertices.push(Vertex::new(10.0, 0.0, 0.0));
    mesh.vertices.push(Vertex::new(5.0, 10.0, 0.0));
    mesh.triangles.push(Triangle::new(0, 1, 2));
    mesh
}

#[test]
fn test_write_minimal_model() {
    let mut model = Model::new();

    let mut object = Object::new(1);
    object.mesh = Some(triangle_mesh());
    model.resources.objects.push(object);
    model.build.items.push(BuildItem::new(1));

    let cursor = model.to_writer(Cursor::new(Vec::new())).unwrap();
    let buffer = cursor.into_inner();
    assert!(!buffer.is_empty(), "Written buffer should not be empty");

    let parsed = Model::from_reader(Cursor::new(buffer));
    assert!(parsed.is_ok(), "Failed to parse written model");
}

#[test]
fn test_roundtrip_basic() {
    let mut model = Model::new();
    model.unit = "millimeter".to_string();
    model.metadata.push(MetadataEntry::new(
        "Title".to_string(),
        "Test Model".to_string(),
    ));
    model.metadata.push(MetadataEntry::new(
        "Application".to_string(),
        "colorbake".to_string(),
    ));

    let mut object = Object::new(1);
    object.mesh = Some(triangle_mesh());
    model.resources.objects.push(object);
    model.build.items.push(BuildItem::new(1));

    let cursor = model.to_writer(Cursor::new(Vec::new())).unwrap();
    let parsed = Model::from_reader(Cursor::new(cursor.into_inner())).unwrap();

    assert_eq!(parsed.unit, "millimeter");
    assert_eq!(parsed.metadata.len(), 2);
    assert_eq!(parsed.get_metadata("Title"), Some("Test Model"));
    assert_eq!(parsed.resources.objects.len(), 1);
    assert_eq!(parsed.build.items.len(), 1);

    let mesh = parsed.resources.objects[0].mesh.as_ref().unwrap();
    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.triangles.len(), 1);
    assert_eq!(mesh.vertices[1].x, 10.0);
    assert_eq!(mesh.vertices[2].y, 10.0);
    assert_eq!(mesh.triangles[0].v3, 2);
}

#[test]
fn test_roundtrip_with_materials() {
    let mut model = Model::new();

    let mut palette = BaseMaterialGroup::new(1);
    palette
        .materials
        .push(BaseMaterial::new("#FF0000".to_string(), (255, 0, 0, 255)));
    palette
        .materials
        .push(BaseMaterial::new("#0000FF".to_string(), (0, 0, 255, 255)));
    model.resources.base_material_groups.push(palette);

    let mut mesh = triangle_mesh();
    mesh.triangles[0] = Triangle::with_property(0, 1, 2, 1, 1);

    let mut object = Object::new(2);
    object.mesh = Some(mesh);
    model.resources.objects.push(object);
    model.build.items.push(BuildItem::new(2));

    let cursor = model.to_writer(Cursor::new(Vec::new())).unwrap();
    let parsed = Model::from_reader(Cursor::new(cursor.into_inner())).unwrap();

    let palette = &parsed.resources.base_material_groups[0];
    assert_eq!(palette.id, 1);
    assert_eq!(palette.materials.len(), 2);
    assert_eq!(palette.materials[0].name, "#FF0000");
    assert_eq!(palette.materials[0].displaycolor, (255, 0, 0, 255));
    assert_eq!(palette.materials[1].displaycolor, (0, 0, 255, 255));

    let triangle = &parsed.resources.objects[0].mesh.as_ref().unwrap().triangles[0];
    assert_eq!(triangle.pid, Some(1));
    assert_eq!(triangle.p1, Some(1));
}

#[test]
fn test_roundtrip_with_vertex_colors() {
    let mut model = Model::new();

    let mut group = VertexColorGroup::new(1);
    group.colors.push([1.0, 0.0, 0.0]);
    group.colors.push([0.0, 1.0, 0.0]);
    group.colors.push([0.0, 0.0, 1.0]);
    model.resources.vertex_color_groups.push(group);

    let mut mesh = triangle_mesh();
    let t = &mut mesh.triangles[0];
    t.pid = Some(1);
    t.p1 = Some(0);
    t.p2 = Some(1);
    t.p3 = Some(2);

    let mut object = Object::new(2);
    object.mesh = Some(mesh);
    model.resources.objects.push(object);
    model.build.items.push(BuildItem::new(2));

    let cursor = model.to_writer(Cursor::new(Vec::new())).unwrap();
    let parsed = Model::from_reader(Cursor::new(cursor.into_inner())).unwrap();

    let group = &parsed.resources.vertex_color_groups[0];
    assert_eq!(group.id, 1);
    assert_eq!(group.colors.len(), 3);
    assert_eq!(group.colors[0], [1.0, 0.0, 0.0]);
    assert_eq!(group.colors[2], [0.0, 0.0, 1.0]);

    let triangle = &parsed.resources.objects[0].mesh.as_ref().unwrap().triangles[0];
    assert_eq!((triangle.p1, triangle.p2, triangle.p3), (Some(0), Some(1), Some(2)));
}

#[test]
fn test_roundtrip_multiple_objects() {
    let mut model = Model::new();

    for id in [1, 2] {
        let mut object = Object::new(id);
        object.name = Some(format!("Cluster {}", id));
        object.mesh = Some(triangle_mesh());
        model.resources.objects.push(object);
        model.build.items.push(BuildItem::new(id));
    }

    let cursor = model.to_writer(Cursor::new(Vec::new())).unwrap();
    let parsed = Model::from_reader(Cursor::new(cursor.into_inner())).unwrap();

    assert_eq!(parsed.resources.objects.len(), 2);
    assert_eq!(parsed.build.items.len(), 2);
    assert_eq!(parsed.resources.objects[0].name.as_deref(), Some("Cluster 1"));
    assert_eq!(parsed.total_vertex_count(), 6);
    assert_eq!(parsed.total_triangle_count(), 2);
}

#[test]
fn test_write_to_file() {
    let mut model = Model::new();
    let mut object = Object::new(1);
    object.mesh = Some(triangle_mesh());
    model.resources.objects.push(object);
    model.build.items.push(BuildItem::new(1));

    let temp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let temp_path = temp_file.path();

    model.write_to_file(temp_path).expect("Failed to write to file");

    let file = std::fs::File::open(temp_path).expect("Failed to open written file");
    let parsed = Model::from_reader(file).expect("Failed to parse written file");

    assert_eq!(parsed.unit, "millimeter");
    assert_eq!(parsed.resources.objects.len(), 1);
}
