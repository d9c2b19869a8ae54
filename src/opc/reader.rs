//! Package reading and validation functionality

use super::{CONTENT_TYPES_PATH, MODEL_PATH, RELS_PATH};
use crate::error::{Error, Result};
use std::io::Read;
use zip::ZipArchive;

/// An opened 3MF package
///
/// Wraps the underlying ZIP archive and validates the required OPC parts
/// on open.
pub struct Package<R> {
    archive: ZipArchive<R>,
}

impl<R: Read + std::io::Seek> Package<R> {
    /// Open a 3MF package from a reader
    ///
    /// Fails when the archive is not a valid ZIP or when a required OPC
    /// part is missing.
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        let mut package = Package { archive };

        package.validate_opc_structure()?;

        Ok(package)
    }

    /// Validate required OPC package parts
    fn validate_opc_structure(&mut self) -> Result<()> {
        for required in [CONTENT_TYPES_PATH, RELS_PATH, MODEL_PATH] {
            if !self.has_file(required) {
                return Err(Error::invalid_format_context(
                    "OPC package structure",
                    &format!(
                        "Missing required file '{}'. The package may be corrupt or incomplete.",
                        required
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Get the main 3D model file content
    pub fn get_model(&mut self) -> Result<String> {
        self.get_file(MODEL_PATH)
    }

    /// Get a file from the package by name
    pub fn get_file(&mut self, name: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|_| Error::MissingFile(name.to_string()))?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Check if a file exists in the package
    pub fn has_file(&mut self, name: &str) -> bool {
        self.archive.by_name(name).is_ok()
    }

    /// Get a list of all file names in the package
    pub fn file_names(&mut self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| {
                self.archive
                    .by_index(i)
                    .ok()
                    .map(|f| f.name().to_string())
            })
            .collect()
    }
}
