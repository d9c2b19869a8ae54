//! Structural invariant checks run before serialization
//!
//! Failures are fatal for the export: the request aborts and no partial
//! package is written.

use crate::error::{Error, Result};
use crate::stl::Point3;

/// Validate raw mesh geometry
///
/// Checks that the index count is divisible by 3 and every index
/// references an existing position.
pub fn validate_mesh(positions: &[Point3], indices: &[usize]) -> Result<()> {
    if indices.len() % 3 != 0 {
        return Err(Error::Validation(format!(
            "Index count ({}) is not divisible by 3",
            indices.len()
        )));
    }

    let num_vertices = positions.len();
    for (i, &index) in indices.iter().enumerate() {
        if index >= num_vertices {
            return Err(Error::Validation(format!(
                "Index {} at position {} is out of bounds (mesh has {} vertices)",
                index, i, num_vertices
            )));
        }
    }

    Ok(())
}

/// Validate vertex colors against the mesh they belong to
///
/// Runs before vertex-color serialization only: every mesh vertex must
/// have exactly one color.
pub fn validate_vertex_colors(vertex_count: usize, colors: &[[f32; 3]]) -> Result<()> {
    if colors.len() != vertex_count {
        return Err(Error::Validation(format!(
            "Vertex color count ({}) does not match vertex count ({})",
            colors.len(),
            vertex_count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_mesh_ok() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert!(validate_mesh(&positions, &[0, 1, 2]).is_ok());
        assert!(validate_mesh(&positions, &[]).is_ok());
    }

    #[test]
    fn test_validate_mesh_non_triple_index_count() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let err = validate_mesh(&positions, &[0, 1]).unwrap_err();
        assert!(err.to_string().contains("not divisible by 3"));
        assert!(err.to_string().contains("[E3003]"));
    }

    #[test]
    fn test_validate_mesh_out_of_bounds_index() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let err = validate_mesh(&positions, &[0, 1, 3]).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_validate_vertex_colors_count_mismatch() {
        let colors = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        assert!(validate_vertex_colors(2, &colors).is_ok());

        let err = validate_vertex_colors(3, &colors).unwrap_err();
        assert!(err.to_string().contains("does not match vertex count"));
        assert!(err.to_string().contains("[E3003]"));
    }
}
