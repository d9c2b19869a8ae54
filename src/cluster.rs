//! First-fit clustering of colored faces
//!
//! Faces are partitioned by color distance against a fixed representative:
//! each face joins the first existing cluster whose representative is within
//! tolerance, otherwise it opens a new cluster with its own color as the
//! representative. Representatives are never re-centered as members join,
//! and matching is first-fit rather than nearest-fit, so cluster boundaries
//! depend on input face order. That order dependence is part of the
//! contract; tests pin input order when asserting membership.

use crate::bake::FaceColor;
use crate::color::Rgb;
use crate::stl::Point3;

/// A cluster of like-colored faces with its own local geometry
///
/// Vertices referenced by member faces are duplicated into the cluster's
/// private list; clusters never share vertices with each other or with the
/// source mesh.
#[derive(Debug, Clone)]
pub struct ColorCluster {
    /// Representative color, fixed at creation from the first member face
    pub color: Rgb,
    /// Cluster-local vertex positions
    pub positions: Vec<Point3>,
    /// Cluster-local triangles, indexing into `positions`
    pub triangles: Vec<[usize; 3]>,
}

/// Partition colored faces into clusters by color-distance tolerance
///
/// `tolerance` is Euclidean RGB distance; a face joins a cluster when its
/// distance to the representative is `<= tolerance`. With `tolerance = 0`
/// clusters exactly partition equal-colored faces; a very large tolerance
/// yields a single cluster.
pub fn cluster_by_color(
    positions: &[Point3],
    faces: &[FaceColor],
    tolerance: f64,
) -> Vec<ColorCluster> {
    let mut representatives: Vec<Rgb> = Vec::new();
    let mut members: Vec<Vec<FaceColor>> = Vec::new();

    for face in faces {
        let found = representatives
            .iter()
            .position(|rep| rep.distance(&face.color) <= tolerance);

        match found {
            Some(i) => members[i].push(*face),
            None => {
                representatives.push(face.color);
                members.push(vec![*face]);
            }
        }
    }

    representatives
        .into_iter()
        .zip(members)
        .map(|(color, faces)| {
            let mut local_positions = Vec::with_capacity(faces.len() * 3);
            let mut triangles = Vec::with_capacity(faces.len());

            for face in faces {
                let base = local_positions.len();
                local_positions.push(positions[face.a]);
                local_positions.push(positions[face.b]);
                local_positions.push(positions[face.c]);
                triangles.push([base, base + 1, base + 2]);
            }

            ColorCluster {
                color,
                positions: local_positions,
                triangles,
            }
        })
        .collect()
}
