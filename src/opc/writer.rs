//! Package writing functionality for creating 3MF files

use super::{CONTENT_TYPES_PATH, MODEL_PATH, RELS_PATH};
use crate::error::{Error, Result};

/// Create a 3MF package (ZIP archive) from model XML
///
/// This function creates a complete 3MF file including:
/// - `[Content_Types].xml`
/// - `_rels/.rels`
/// - `3D/3dmodel.model`
///
/// The relationships part is written for every encoding; OPC requires it
/// and consumers that do not need it ignore it.
///
/// # Arguments
///
/// * `writer` - The writer to write the 3MF package to
/// * `model_xml` - The XML content of the 3D model
///
/// # Returns
///
/// Returns the writer after finishing the ZIP archive
pub fn create_package<W: std::io::Write + std::io::Seek>(writer: W, model_xml: &str) -> Result<W> {
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    let content_types = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="model" ContentType="application/vnd.ms-package.3dmanufacturing-3dmodel+xml"/>
</Types>"#;

    zip.start_file(CONTENT_TYPES_PATH, options)
        .map_err(|e| Error::serialization(format!("Failed to create Content_Types file: {}", e)))?;
    zip.write_all(content_types.as_bytes())
        .map_err(|e| Error::serialization(format!("Failed to write Content_Types: {}", e)))?;

    let rels = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Target="/3D/3dmodel.model" Id="rel0" Type="http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel"/>
</Relationships>"#;

    zip.start_file(RELS_PATH, options)
        .map_err(|e| Error::serialization(format!("Failed to create relationships file: {}", e)))?;
    zip.write_all(rels.as_bytes())
        .map_err(|e| Error::serialization(format!("Failed to write relationships: {}", e)))?;

    zip.start_file(MODEL_PATH, options)
        .map_err(|e| Error::serialization(format!("Failed to create model file: {}", e)))?;
    zip.write_all(model_xml.as_bytes())
        .map_err(|e| Error::serialization(format!("Failed to write model XML: {}", e)))?;

    let writer = zip
        .finish()
        .map_err(|e| Error::serialization(format!("Failed to finalize ZIP archive: {}", e)))?;

    Ok(writer)
}
