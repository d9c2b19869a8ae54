//! # colorbake
//!
//! A pure Rust export core that turns an STL triangle mesh and a reference
//! raster image into a colored, print-ready 3MF (3D Manufacturing Format)
//! package.
//!
//! The pipeline projects each face centroid onto the image through a planar
//! projection, samples the nearest pixel, and serializes the result as a
//! ZIP-based OPC container, either as a basematerials palette with one
//! object per color cluster or as a single object with per-vertex colors.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Binary and ASCII STL loading with format auto-detection
//! - PNG/JPEG reference images, nearest-neighbor sampling
//! - Planar projection with zoom/pan and automatic dominant-plane choice
//! - Two selectable output encodings (grouped materials, vertex colors)
//! - Re-opens its own packages for verification
//!
//! ## Example
//!
//! ```no_run
//! use colorbake::{export, ExportConfig, OutputEncoding};
//!
//! # fn main() -> colorbake::Result<()> {
//! let stl_bytes = std::fs::read("mosaic.stl")?;
//! let image_bytes = std::fs::read("photo.jpg")?;
//!
//! let config = ExportConfig {
//!     encoding: OutputEncoding::VertexColor,
//!     ..ExportConfig::default()
//! };
//!
//! let package = export(&stl_bytes, &image_bytes, &config)?;
//! std::fs::write("mosaic.3mf", package)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bake;
pub mod cluster;
pub mod color;
pub mod error;
pub mod export;
pub mod image;
pub mod model;
pub mod opc;
pub mod parser;
pub mod projection;
pub mod stl;
mod validator;
mod writer;

pub use bake::FaceColor;
pub use cluster::ColorCluster;
pub use color::Rgb;
pub use error::{Error, Result};
pub use export::{ExportConfig, OutputEncoding, build_model, export};
pub use image::RasterImage;
pub use model::{
    BaseMaterial, BaseMaterialGroup, Build, BuildItem, Mesh, MetadataEntry, Model, Object,
    ObjectType, Resources, Triangle, Vertex, VertexColorGroup,
};
pub use opc::MEDIA_TYPE;
pub use projection::{Axis, Bounds, Projection};
pub use stl::MeshData;

use std::io::Read;

impl Model {
    /// Parse a 3MF package from a reader
    ///
    /// Reads back a package produced by this crate: the core structure
    /// plus basematerials and colorgroup resources.
    ///
    /// # Arguments
    ///
    /// * `reader` - A reader containing the 3MF file data
    ///
    /// # Example
    ///
    /// ```no_run
    /// use colorbake::Model;
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let file = File::open("mosaic.3mf")?;
    /// let model = Model::from_reader(file)?;
    ///
    /// println!("Package contains {} objects", model.resources.objects.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_reader<R: Read + std::io::Seek>(reader: R) -> Result<Self> {
        parser::parse_3mf(reader)
    }

    /// Write a 3MF package to a writer
    ///
    /// Serializes the model to a complete 3MF file (ZIP archive) and
    /// writes it to the provided writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - A writer to write the 3MF file data to
    pub fn to_writer<W: std::io::Write + std::io::Seek>(self, writer: W) -> Result<W> {
        let mut xml_buffer = Vec::new();
        writer::write_model_xml(&self, &mut xml_buffer)?;
        let model_xml = String::from_utf8(xml_buffer)
            .map_err(|e| Error::serialization(format!("Failed to convert XML to UTF-8: {}", e)))?;

        opc::create_package(writer, &model_xml)
    }

    /// Write a 3MF package to a file path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the output file
    pub fn write_to_file<P: AsRef<std::path::Path>>(self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.to_writer(file)?;
        Ok(())
    }
}
