//! The export pipeline
//!
//! `(stl bytes, image bytes, parameters) -> 3mf bytes`, as a pure function.
//! Every invocation owns its buffers; there is no shared state between
//! concurrent exports, no retry, and no partial output on failure.

use crate::bake;
use crate::cluster;
use crate::error::{Error, Result};
use crate::image::RasterImage;
use crate::model::{
    BaseMaterial, BaseMaterialGroup, BuildItem, Mesh, Model, Object, Triangle, Vertex,
    VertexColorGroup,
};
use crate::opc;
use crate::projection::{Axis, Bounds, Projection};
use crate::stl::{self, MeshData};
use crate::validator;
use crate::writer;
use std::io::Cursor;

/// ID of the single property group resource (basematerials or colorgroup)
const PROPERTY_GROUP_ID: usize = 1;

/// ID of the first mesh object; subsequent objects count up from here
const FIRST_OBJECT_ID: usize = 2;

/// Which 3MF encoding the export produces
///
/// The two encodings are mutually exclusive. Which one a deployment treats
/// as its production path is a caller decision; both are first-class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    /// One basematerials palette with one object per color cluster
    Grouped,
    /// One colorgroup with a color per vertex and a single object
    VertexColor,
}

/// Parameters for one export request
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Projection axis; `None` selects the dominant-plane policy
    pub axis: Option<Axis>,
    /// Zoom around the projected center
    pub scale: f64,
    /// Horizontal pan of the projected window
    pub offset_x: f64,
    /// Vertical pan of the projected window
    pub offset_y: f64,
    /// Euclidean RGB distance for face clustering (grouped encoding)
    pub color_tolerance: f64,
    /// Output encoding
    pub encoding: OutputEncoding,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            axis: Some(Axis::Z),
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            color_tolerance: 12.0,
            encoding: OutputEncoding::Grouped,
        }
    }
}

/// Run the full export pipeline
///
/// Parses the STL buffer, decodes the image, bakes colors, and serializes
/// a complete 3MF package into a byte buffer.
///
/// # Example
///
/// ```no_run
/// use colorbake::{export, ExportConfig};
///
/// # fn main() -> colorbake::Result<()> {
/// let stl_bytes = std::fs::read("model.stl")?;
/// let image_bytes = std::fs::read("photo.png")?;
///
/// let package = export(&stl_bytes, &image_bytes, &ExportConfig::default())?;
/// std::fs::write("out.3mf", package)?;
/// # Ok(())
/// # }
/// ```
pub fn export(stl_bytes: &[u8], image_bytes: &[u8], config: &ExportConfig) -> Result<Vec<u8>> {
    let mesh = stl::parse_stl(stl_bytes)?;
    let image = RasterImage::decode(image_bytes)?;

    let model = build_model(&mesh, &image, config)?;

    let mut xml_buffer = Vec::new();
    writer::write_model_xml(&model, &mut xml_buffer)?;
    let model_xml = String::from_utf8(xml_buffer)
        .map_err(|e| Error::serialization(format!("Failed to convert XML to UTF-8: {}", e)))?;

    let cursor = opc::create_package(Cursor::new(Vec::new()), &model_xml)?;
    Ok(cursor.into_inner())
}

/// Build the 3MF document model from decoded inputs
///
/// Exposed separately so callers and tests can work with meshes that share
/// vertices (loaded STL is always triangle soup) or inspect the document
/// model before packaging.
pub fn build_model(
    mesh: &MeshData,
    image: &RasterImage,
    config: &ExportConfig,
) -> Result<Model> {
    validator::validate_mesh(&mesh.positions, &mesh.indices)?;

    let bounds = Bounds::of(&mesh.positions);
    let projection = Projection {
        bounds,
        axis: config.axis.unwrap_or_else(|| bounds.dominant_axis()),
        scale: config.scale,
        offset_x: config.offset_x,
        offset_y: config.offset_y,
    };

    match config.encoding {
        OutputEncoding::Grouped => build_grouped(mesh, image, &projection, config.color_tolerance),
        OutputEncoding::VertexColor => build_vertex_color(mesh, image, &projection),
    }
}

/// Grouped encoding: cluster faces by color, one object per cluster
fn build_grouped(
    mesh: &MeshData,
    image: &RasterImage,
    projection: &Projection,
    tolerance: f64,
) -> Result<Model> {
    let faces = bake::bake_face_colors(mesh, image, projection);
    let clusters = cluster::cluster_by_color(&mesh.positions, &faces, tolerance);

    let mut model = Model::new();
    let mut palette = BaseMaterialGroup::new(PROPERTY_GROUP_ID);

    for (index, cluster) in clusters.iter().enumerate() {
        let hex = cluster.color.to_hex();
        palette.materials.push(BaseMaterial::new(
            hex,
            (cluster.color.r, cluster.color.g, cluster.color.b, 255),
        ));

        let mut object_mesh =
            Mesh::with_capacity(cluster.positions.len(), cluster.triangles.len());
        for p in &cluster.positions {
            object_mesh.vertices.push(Vertex::new(p[0], p[1], p[2]));
        }
        for t in &cluster.triangles {
            object_mesh.triangles.push(Triangle::with_property(
                t[0],
                t[1],
                t[2],
                PROPERTY_GROUP_ID,
                index,
            ));
        }

        let mut object = Object::new(FIRST_OBJECT_ID + index);
        object.mesh = Some(object_mesh);
        model.resources.objects.push(object);
        model.build.items.push(BuildItem::new(FIRST_OBJECT_ID + index));
    }

    model.resources.base_material_groups.push(palette);
    Ok(model)
}

/// Vertex-color encoding: one colorgroup entry per vertex, single object
fn build_vertex_color(
    mesh: &MeshData,
    image: &RasterImage,
    projection: &Projection,
) -> Result<Model> {
    let colors = bake::bake_vertex_colors(mesh, image, projection);
    validator::validate_vertex_colors(mesh.positions.len(), &colors)?;

    let mut model = Model::new();

    let mut group = VertexColorGroup::new(PROPERTY_GROUP_ID);
    group.colors = colors;
    model.resources.vertex_color_groups.push(group);

    let mut object_mesh = Mesh::with_capacity(mesh.positions.len(), mesh.triangle_count());
    for p in &mesh.positions {
        object_mesh.vertices.push(Vertex::new(p[0], p[1], p[2]));
    }
    for tri in mesh.indices.chunks_exact(3) {
        let mut triangle = Triangle::new(tri[0], tri[1], tri[2]);
        triangle.pid = Some(PROPERTY_GROUP_ID);
        triangle.p1 = Some(tri[0]);
        triangle.p2 = Some(tri[1]);
        triangle.p3 = Some(tri[2]);
        object_mesh.triangles.push(triangle);
    }

    let mut object = Object::new(FIRST_OBJECT_ID);
    object.mesh = Some(object_mesh);
    model.resources.objects.push(object);
    model.build.items.push(BuildItem::new(FIRST_OBJECT_ID));

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stl::compute_vertex_normals;

    fn quad() -> MeshData {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        let normals = compute_vertex_normals(&positions, &indices);
        MeshData {
            positions,
            indices,
            normals,
        }
    }

    fn half_and_half() -> RasterImage {
        let mut pixels = Vec::new();
        for _row in 0..4 {
            for col in 0..4 {
                let value = if col < 2 { 0 } else { 255 };
                pixels.extend_from_slice(&[value, value, value, 255]);
            }
        }
        RasterImage::from_rgba8(pixels, 4, 4)
    }

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.axis, Some(Axis::Z));
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.offset_x, 0.0);
        assert_eq!(config.offset_y, 0.0);
        assert_eq!(config.color_tolerance, 12.0);
        assert_eq!(config.encoding, OutputEncoding::Grouped);
    }

    #[test]
    fn test_build_grouped_two_clusters() {
        let model = build_model(&quad(), &half_and_half(), &ExportConfig::default()).unwrap();

        let palette = &model.resources.base_material_groups[0];
        assert_eq!(palette.id, 1);
        assert_eq!(palette.materials.len(), 2);
        assert_eq!(palette.materials[0].name, "#FFFFFF");
        assert_eq!(palette.materials[1].name, "#000000");

        assert_eq!(model.resources.objects.len(), 2);
        assert_eq!(model.build.items.len(), 2);

        // Cluster-local soup: each single-triangle object has 3 vertices
        for (i, object) in model.resources.objects.iter().enumerate() {
            assert_eq!(object.id, FIRST_OBJECT_ID + i);
            let mesh = object.mesh.as_ref().unwrap();
            assert_eq!(mesh.vertices.len(), 3);
            assert_eq!(mesh.triangles.len(), 1);
            assert_eq!(mesh.triangles[0].pid, Some(1));
            assert_eq!(mesh.triangles[0].p1, Some(i));
        }
    }

    #[test]
    fn test_build_vertex_color_single_object() {
        let config = ExportConfig {
            encoding: OutputEncoding::VertexColor,
            ..ExportConfig::default()
        };
        let model = build_model(&quad(), &half_and_half(), &config).unwrap();

        assert_eq!(model.resources.vertex_color_groups.len(), 1);
        let group = &model.resources.vertex_color_groups[0];
        assert_eq!(group.colors.len(), 4);
        // Last-writer-wins at the shared diagonal vertices 0 and 2
        assert_eq!(group.colors[0], [0.0, 0.0, 0.0]);
        assert_eq!(group.colors[1], [1.0, 1.0, 1.0]);
        assert_eq!(group.colors[2], [0.0, 0.0, 0.0]);
        assert_eq!(group.colors[3], [0.0, 0.0, 0.0]);

        assert_eq!(model.resources.objects.len(), 1);
        let mesh = model.resources.objects[0].mesh.as_ref().unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangles.len(), 2);
        let t = &mesh.triangles[1];
        assert_eq!((t.pid, t.p1, t.p2, t.p3), (Some(1), Some(0), Some(2), Some(3)));
    }

    #[test]
    fn test_build_model_rejects_bad_indices() {
        let mut mesh = quad();
        mesh.indices.push(99);
        mesh.indices.push(0);
        mesh.indices.push(1);

        let err = build_model(&mesh, &half_and_half(), &ExportConfig::default()).unwrap_err();
        assert!(err.to_string().contains("[E3003]"));
    }

    #[test]
    fn test_auto_axis_uses_dominant_plane() {
        // Wall in the XZ plane; dominant axis is Y, so the projection uses
        // (x, z) and the left/right color split still lands on x.
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        let normals = compute_vertex_normals(&positions, &indices);
        let mesh = MeshData {
            positions,
            indices,
            normals,
        };

        let config = ExportConfig {
            axis: None,
            ..ExportConfig::default()
        };
        let model = build_model(&mesh, &half_and_half(), &config).unwrap();
        assert_eq!(
            model.resources.base_material_groups[0].materials.len(),
            2
        );
    }
}
