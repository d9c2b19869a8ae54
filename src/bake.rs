//! Baking image colors onto mesh faces and vertices
//!
//! For every face: centroid, projected UV, sampled color. The grouped route
//! attaches the color to the face record; the vertex-color route writes the
//! color (as 0-1 floats) to all three vertices of the face.
//!
//! When a vertex is shared by faces with different sampled colors, the
//! vertex-color route applies last-writer-wins: later faces overwrite
//! earlier ones, with no blending. Consumers depend on this exact behavior.

use crate::color::Rgb;
use crate::image::RasterImage;
use crate::projection::Projection;
use crate::stl::{MeshData, Point3};

/// A face with its three vertex indices and sampled color
///
/// Derived once per export and never mutated after assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceColor {
    /// First vertex index
    pub a: usize,
    /// Second vertex index
    pub b: usize,
    /// Third vertex index
    pub c: usize,
    /// Color sampled at the face centroid
    pub color: Rgb,
}

/// Arithmetic mean of a triangle's three vertex positions
pub fn face_centroid(positions: &[Point3], a: usize, b: usize, c: usize) -> Point3 {
    let (va, vb, vc) = (positions[a], positions[b], positions[c]);
    [
        (va[0] + vb[0] + vc[0]) / 3.0,
        (va[1] + vb[1] + vc[1]) / 3.0,
        (va[2] + vb[2] + vc[2]) / 3.0,
    ]
}

/// Sample a color for every face, keeping it on the face record
///
/// Output order matches the mesh's triangle order; the clusterer depends
/// on that ordering.
pub fn bake_face_colors(
    mesh: &MeshData,
    image: &RasterImage,
    projection: &Projection,
) -> Vec<FaceColor> {
    mesh.indices
        .chunks_exact(3)
        .map(|tri| {
            let centroid = face_centroid(&mesh.positions, tri[0], tri[1], tri[2]);
            let (u, v) = projection.uv(centroid);
            FaceColor {
                a: tri[0],
                b: tri[1],
                c: tri[2],
                color: image.sample(u, v),
            }
        })
        .collect()
}

/// Sample a color for every face and write it to the face's three vertices
///
/// Returns one normalized RGB triple per mesh vertex. Vertices shared
/// between faces take the color of the last face processed
/// (last-writer-wins).
pub fn bake_vertex_colors(
    mesh: &MeshData,
    image: &RasterImage,
    projection: &Projection,
) -> Vec<[f32; 3]> {
    let mut colors = vec![[0.0f32; 3]; mesh.positions.len()];

    for tri in mesh.indices.chunks_exact(3) {
        let centroid = face_centroid(&mesh.positions, tri[0], tri[1], tri[2]);
        let (u, v) = projection.uv(centroid);
        let normalized = image.sample(u, v).to_normalized();

        for &vertex in tri {
            colors[vertex] = normalized;
        }
    }

    colors
}
