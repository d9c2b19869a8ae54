//! STL mesh loading
//!
//! Parses an STL byte buffer (binary or ASCII, auto-detected) into positions,
//! triangle indices, and per-vertex normals. STL is a triangle soup, so the
//! loader synthesizes the identity index array; meshes built in memory may
//! still share vertices through `MeshData.indices`.

use crate::error::{Error, Result};

/// A 3D point as (x, y, z)
pub type Point3 = [f64; 3];

/// A 3D vector as (x, y, z)
pub type Vector3 = [f64; 3];

/// Binary STL record size: 12 normal bytes + 36 vertex bytes + 2 attribute bytes
const BINARY_RECORD_SIZE: usize = 50;

/// Binary STL minimum size: 80-byte header + 4-byte triangle count
const BINARY_HEADER_SIZE: usize = 84;

/// Mesh geometry produced by the STL loader
///
/// Invariants: `indices.len()` is divisible by 3 and every index is less
/// than `positions.len()`. `normals` always has one entry per position.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<Point3>,
    /// Triangle vertex indices, three per triangle
    pub indices: Vec<usize>,
    /// Per-vertex normals
    pub normals: Vec<Vector3>,
}

impl MeshData {
    /// Number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Parse an STL buffer, auto-detecting binary vs ASCII format
///
/// A buffer whose leading bytes spell `solid` and which decodes as UTF-8
/// text is parsed as ASCII, and ASCII parse errors are reported as such.
/// Anything else (including binary exporters that write `solid` into the
/// 80-byte header, whose float payload is not valid UTF-8) is parsed as
/// binary.
pub fn parse_stl(data: &[u8]) -> Result<MeshData> {
    if looks_like_ascii(data) {
        if let Ok(text) = std::str::from_utf8(data) {
            return parse_ascii_stl(text);
        }
    }

    parse_binary_stl(data)
}

fn looks_like_ascii(data: &[u8]) -> bool {
    let trimmed = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|start| &data[start..])
        .unwrap_or(data);
    trimmed.starts_with(b"solid")
}

/// Parse a binary STL buffer
///
/// Layout: 80-byte header, `u32` little-endian triangle count, then one
/// 50-byte record per triangle (facet normal, three vertices, attribute
/// byte count).
pub fn parse_binary_stl(data: &[u8]) -> Result<MeshData> {
    if data.len() < BINARY_HEADER_SIZE {
        return Err(Error::load_context(
            "binary header",
            &format!(
                "buffer is {} bytes, need at least {} for header and triangle count",
                data.len(),
                BINARY_HEADER_SIZE
            ),
        ));
    }

    let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let body = &data[BINARY_HEADER_SIZE..];

    if body.len() < count * BINARY_RECORD_SIZE {
        return Err(Error::load_context(
            "triangle records",
            &format!(
                "header declares {} triangles ({} bytes) but only {} bytes follow",
                count,
                count * BINARY_RECORD_SIZE,
                body.len()
            ),
        ));
    }

    let mut positions = Vec::with_capacity(count * 3);
    let mut normals = Vec::with_capacity(count * 3);
    let mut offset = 0;

    for _ in 0..count {
        let normal = read_vector(body, offset);
        offset += 12;

        for _ in 0..3 {
            positions.push(read_vector(body, offset));
            normals.push(normal);
            offset += 12;
        }

        // Attribute byte count, unused
        offset += 2;
    }

    Ok(finish_soup(positions, normals))
}

fn read_vector(data: &[u8], offset: usize) -> [f64; 3] {
    let read_f32 = |at: usize| {
        f32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]) as f64
    };
    [read_f32(offset), read_f32(offset + 4), read_f32(offset + 8)]
}

/// Parse an ASCII STL buffer
///
/// Expects the `solid` / `facet normal` / `outer loop` / `vertex` structure.
/// A facet with other than three vertices is rejected.
pub fn parse_ascii_stl(text: &str) -> Result<MeshData> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    let mut facet_normal: Vector3 = [0.0, 0.0, 0.0];
    let mut facet_vertices: Vec<Point3> = Vec::with_capacity(3);
    let mut in_facet = false;
    let mut saw_solid = false;

    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "solid" => saw_solid = true,
            "facet" => {
                if tokens.next() != Some("normal") {
                    return Err(Error::load_context(
                        &format!("line {}", line_no + 1),
                        "expected 'facet normal'",
                    ));
                }
                facet_normal = parse_triple(&mut tokens, line_no)?;
                facet_vertices.clear();
                in_facet = true;
            }
            "vertex" => {
                if !in_facet {
                    return Err(Error::load_context(
                        &format!("line {}", line_no + 1),
                        "'vertex' outside a facet",
                    ));
                }
                facet_vertices.push(parse_triple(&mut tokens, line_no)?);
            }
            "endfacet" => {
                if facet_vertices.len() != 3 {
                    return Err(Error::load_context(
                        &format!("line {}", line_no + 1),
                        &format!(
                            "facet has {} vertices, expected exactly 3",
                            facet_vertices.len()
                        ),
                    ));
                }
                for v in facet_vertices.drain(..) {
                    positions.push(v);
                    normals.push(facet_normal);
                }
                in_facet = false;
            }
            // "outer", "endloop", "endsolid" carry no geometry
            _ => {}
        }
    }

    if !saw_solid {
        return Err(Error::Load("missing 'solid' keyword".to_string()));
    }
    if in_facet {
        return Err(Error::Load("unterminated facet at end of buffer".to_string()));
    }

    Ok(finish_soup(positions, normals))
}

fn parse_triple<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<[f64; 3]> {
    let mut out = [0.0; 3];
    for slot in &mut out {
        let token = tokens.next().ok_or_else(|| {
            Error::load_context(
                &format!("line {}", line_no + 1),
                "expected three coordinates",
            )
        })?;
        *slot = token.parse::<f64>().map_err(|_| {
            Error::load_context(
                &format!("line {}", line_no + 1),
                &format!("'{}' is not a number", token),
            )
        })?;
    }
    Ok(out)
}

/// Build a `MeshData` from triangle soup, synthesizing identity indices
/// and recomputing normals when the file declared only zero normals.
fn finish_soup(positions: Vec<Point3>, normals: Vec<Vector3>) -> MeshData {
    let indices: Vec<usize> = (0..positions.len()).collect();

    let all_zero = normals
        .iter()
        .all(|n| n[0] == 0.0 && n[1] == 0.0 && n[2] == 0.0);

    let normals = if all_zero && !positions.is_empty() {
        compute_vertex_normals(&positions, &indices)
    } else {
        normals
    };

    MeshData {
        positions,
        indices,
        normals,
    }
}

/// Compute per-vertex normals from face geometry
///
/// Each vertex accumulates the (area-weighted) cross-product normal of
/// every face it belongs to, then the sum is normalized: the average of
/// adjacent face normals.
pub fn compute_vertex_normals(positions: &[Point3], indices: &[usize]) -> Vec<Vector3> {
    let mut accum = vec![[0.0f64; 3]; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (positions[tri[0]], positions[tri[1]], positions[tri[2]]);
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        for &i in tri {
            accum[i][0] += n[0];
            accum[i][1] += n[1];
            accum[i][2] += n[2];
        }
    }

    for n in &mut accum {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len > 1e-12 {
            n[0] /= len;
            n[1] /= len;
            n[2] /= len;
        }
    }

    accum
}
