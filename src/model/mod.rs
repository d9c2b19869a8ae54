//! Data structures representing 3MF models

mod core;
mod material;

pub use core::{
    Build, BuildItem, CORE_XMLNS, MATERIAL_XMLNS, Mesh, MetadataEntry, Model, Object, ObjectType,
    Resources, Triangle, Vertex,
};

pub use material::{BaseMaterial, BaseMaterialGroup, VertexColorGroup};
