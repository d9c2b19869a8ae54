//! Core 3MF types and structures

/// 3MF core specification namespace
pub const CORE_XMLNS: &str = "http://schemas.microsoft.com/3dmanufacturing/core/2015/02";

/// Materials & Properties extension namespace
pub const MATERIAL_XMLNS: &str = "http://schemas.microsoft.com/3dmanufacturing/material/2015/02";

/// A 3D vertex with x, y, z coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A triangle defined by three vertex indices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Index of first vertex
    pub v1: usize,
    /// Index of second vertex
    pub v2: usize,
    /// Index of third vertex
    pub v3: usize,
    /// Optional property group ID (material or color group)
    pub pid: Option<usize>,
    /// Optional property index for vertex 1
    pub p1: Option<usize>,
    /// Optional property index for vertex 2
    pub p2: Option<usize>,
    /// Optional property index for vertex 3
    pub p3: Option<usize>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v1: usize, v2: usize, v3: usize) -> Self {
        Self {
            v1,
            v2,
            v3,
            pid: None,
            p1: None,
            p2: None,
            p3: None,
        }
    }

    /// Create a new triangle referencing a single property of a group
    ///
    /// Used by the grouped encoding, where `p1` selects the material for
    /// the whole triangle.
    pub fn with_property(v1: usize, v2: usize, v3: usize, pid: usize, p1: usize) -> Self {
        Self {
            v1,
            v2,
            v3,
            pid: Some(pid),
            p1: Some(p1),
            p2: None,
            p3: None,
        }
    }
}

/// A 3D mesh containing vertices and triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// List of vertices
    pub vertices: Vec<Vertex>,
    /// List of triangles
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mesh with pre-allocated capacity
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }
}

/// Type of 3D object
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectType {
    /// A standard model object
    Model,
    /// A support structure
    Support,
    /// A solid support structure
    SolidSupport,
    /// A surface object
    Surface,
    /// Other types
    Other,
}

/// A 3D object carrying a mesh
#[derive(Debug, Clone)]
pub struct Object {
    /// Object ID
    pub id: usize,
    /// Object name (optional)
    pub name: Option<String>,
    /// Type of object
    pub object_type: ObjectType,
    /// Optional mesh data
    pub mesh: Option<Mesh>,
}

impl Object {
    /// Create a new object
    pub fn new(id: usize) -> Self {
        Self {
            id,
            name: None,
            object_type: ObjectType::Model,
            mesh: None,
        }
    }
}

/// Resources section containing property groups and objects
#[derive(Debug, Clone, Default)]
pub struct Resources {
    /// Base material groups (grouped encoding)
    pub base_material_groups: Vec<super::BaseMaterialGroup>,
    /// Vertex color groups (vertex-color encoding)
    pub vertex_color_groups: Vec<super::VertexColorGroup>,
    /// List of objects
    pub objects: Vec<Object>,
}

impl Resources {
    /// Create a new empty resources section
    pub fn new() -> Self {
        Self::default()
    }
}

/// An item to be built, referencing an object
#[derive(Debug, Clone, PartialEq)]
pub struct BuildItem {
    /// Reference to object ID
    pub objectid: usize,
}

impl BuildItem {
    /// Create a new build item
    pub fn new(objectid: usize) -> Self {
        Self { objectid }
    }
}

/// Build section specifying which objects to manufacture
#[derive(Debug, Clone, Default)]
pub struct Build {
    /// List of items to build
    pub items: Vec<BuildItem>,
}

impl Build {
    /// Create a new empty build section
    pub fn new() -> Self {
        Self::default()
    }
}

/// Metadata entry for the 3MF package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    /// Name of the metadata entry
    pub name: String,
    /// Value of the metadata entry
    pub value: String,
}

impl MetadataEntry {
    /// Create a new metadata entry
    pub fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// Complete 3MF model
#[derive(Debug, Clone)]
pub struct Model {
    /// Unit of measurement (e.g., "millimeter", "inch")
    pub unit: String,
    /// Metadata entries
    pub metadata: Vec<MetadataEntry>,
    /// Resources (property groups, objects)
    pub resources: Resources,
    /// Build specification
    pub build: Build,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self {
            unit: "millimeter".to_string(),
            metadata: Vec::new(),
            resources: Resources::new(),
            build: Build::new(),
        }
    }

    /// Get metadata value by name
    pub fn get_metadata(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }

    /// Total vertex count summed across all objects
    pub fn total_vertex_count(&self) -> usize {
        self.resources
            .objects
            .iter()
            .filter_map(|o| o.mesh.as_ref())
            .map(|m| m.vertices.len())
            .sum()
    }

    /// Total triangle count summed across all objects
    pub fn total_triangle_count(&self) -> usize {
        self.resources
            .objects
            .iter()
            .filter_map(|o| o.mesh.as_ref())
            .map(|m| m.triangles.len())
            .sum()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_defaults() {
        let model = Model::new();
        assert_eq!(model.unit, "millimeter");
        assert!(model.resources.objects.is_empty());
        assert!(model.build.items.is_empty());
    }

    #[test]
    fn test_total_counts_sum_across_objects() {
        let mut model = Model::new();
        for id in [1, 2] {
            let mut mesh = Mesh::new();
            mesh.vertices.push(Vertex::new(0.0, 0.0, 0.0));
            mesh.vertices.push(Vertex::new(1.0, 0.0, 0.0));
            mesh.vertices.push(Vertex::new(0.0, 1.0, 0.0));
            mesh.triangles.push(Triangle::new(0, 1, 2));
            let mut object = Object::new(id);
            object.mesh = Some(mesh);
            model.resources.objects.push(object);
        }

        assert_eq!(model.total_vertex_count(), 6);
        assert_eq!(model.total_triangle_count(), 2);
    }

    #[test]
    fn test_get_metadata() {
        let mut model = Model::new();
        model
            .metadata
            .push(MetadataEntry::new("Title".to_string(), "Quad".to_string()));
        assert_eq!(model.get_metadata("Title"), Some("Quad"));
        assert_eq!(model.get_metadata("Designer"), None);
    }
}
