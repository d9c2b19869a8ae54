//! Error types for the export pipeline
//!
//! All errors include error codes for categorization and enough context to
//! point at the failing input. Every error is terminal for the current
//! export request: nothing is retried and no partial package is written.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and archive errors
//! - **E2xxx**: XML and container structure errors
//! - **E3xxx**: Input parsing and validation errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error
//! - `E1002`: ZIP archive format error
//! - `E1003`: Missing required file in archive
//! - `E2001`: XML parsing error
//! - `E2002`: XML attribute error
//! - `E2003`: Invalid XML structure
//! - `E2004`: Invalid 3MF format
//! - `E2005`: Serialization error
//! - `E3001`: STL load error
//! - `E3002`: Image decode error
//! - `E3003`: Validation error
//! - `E3004`: Numeric parse error

use std::io;
use thiserror::Error;

/// Result type for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting or re-reading a package
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading or writing a buffer
    ///
    /// **Error Code**: E1001
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error
    ///
    /// **Error Code**: E1002
    ///
    /// **Common Causes**:
    /// - Corrupted ZIP file
    /// - Truncated archive
    #[error("[E1002] ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error
    ///
    /// **Error Code**: E2001
    #[error("[E2001] XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error
    ///
    /// **Error Code**: E2002
    #[error("[E2002] XML attribute error: {0}")]
    XmlAttr(String),

    /// Missing required file in the 3MF archive
    ///
    /// **Error Code**: E1003
    ///
    /// **Common Causes**:
    /// - Incomplete 3MF package
    /// - Missing 3D model file or content types file
    #[error("[E1003] Missing required file: {0}")]
    MissingFile(String),

    /// Invalid 3MF format
    ///
    /// **Error Code**: E2004
    ///
    /// **Common Causes**:
    /// - Non-compliant OPC structure
    /// - Missing required OPC relationships
    #[error("[E2004] Invalid 3MF format: {0}")]
    InvalidFormat(String),

    /// Invalid XML structure
    ///
    /// **Error Code**: E2003
    ///
    /// **Common Causes**:
    /// - Missing required XML elements or attributes
    /// - Invalid element nesting
    #[error("[E2003] Invalid XML structure: {0}")]
    InvalidXml(String),

    /// STL buffer could not be parsed
    ///
    /// **Error Code**: E3001
    ///
    /// **Common Causes**:
    /// - Corrupt or truncated binary header
    /// - Truncated triangle records
    /// - ASCII facet with other than three vertices
    #[error("[E3001] STL load error: {0}")]
    Load(String),

    /// Image bytes could not be decoded
    ///
    /// **Error Code**: E3002
    ///
    /// **Common Causes**:
    /// - Malformed PNG/JPEG data
    /// - Unsupported image format
    #[error("[E3002] Image decode error: {0}")]
    Decode(String),

    /// Structural invariant violated before serialization
    ///
    /// **Error Code**: E3003
    ///
    /// **Common Causes**:
    /// - Vertex color count differs from vertex count
    /// - Index count not divisible by 3
    /// - Out-of-bounds vertex indices
    #[error("[E3003] Validation error: {0}")]
    Validation(String),

    /// Parse error for numeric values
    ///
    /// **Error Code**: E3004
    #[error("[E3004] Parse error: {0}")]
    Parse(String),

    /// Container assembly error
    ///
    /// **Error Code**: E2005
    ///
    /// **Common Causes**:
    /// - Failed to serialize model XML
    /// - I/O error while writing the archive
    #[error("[E2005] Serialization error: {0}")]
    Serialization(String),
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::Parse(format!("Failed to parse floating-point number: {}", err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::Parse(format!("Failed to parse integer: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

impl Error {
    /// Create a Load error with context about what part of the STL failed
    ///
    /// # Arguments
    /// * `context` - The part being parsed (e.g., "binary header", "facet 12")
    /// * `message` - Description of the error
    pub fn load_context(context: &str, message: &str) -> Self {
        Error::Load(format!("{}: {}", context, message))
    }

    /// Create an InvalidXml error for a missing required attribute
    ///
    /// # Arguments
    /// * `element` - The XML element name
    /// * `attribute` - The missing attribute name
    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Error::InvalidXml(format!(
            "Element '<{}>' is missing required attribute '{}'",
            element, attribute
        ))
    }

    /// Create an InvalidFormat error with context about what structure is invalid
    pub fn invalid_format_context(context: &str, message: &str) -> Self {
        Error::InvalidFormat(format!("{}: {}", context, message))
    }

    /// Create a Serialization error
    pub fn serialization(message: String) -> Self {
        Error::Serialization(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_in_messages() {
        let io_err = Error::Io(io::Error::new(io::ErrorKind::NotFound, "test"));
        assert!(io_err.to_string().contains("[E1001]"));

        let missing_file = Error::MissingFile("3D/3dmodel.model".to_string());
        assert!(missing_file.to_string().contains("[E1003]"));

        let load = Error::Load("truncated record".to_string());
        assert!(load.to_string().contains("[E3001]"));

        let decode = Error::Decode("bad magic".to_string());
        assert!(decode.to_string().contains("[E3002]"));

        let validation = Error::Validation("count mismatch".to_string());
        assert!(validation.to_string().contains("[E3003]"));

        let serialization = Error::Serialization("zip finish failed".to_string());
        assert!(serialization.to_string().contains("[E2005]"));
    }

    #[test]
    fn test_load_context_helper() {
        let err = Error::load_context("facet 3", "expected 3 vertices, found 2");
        assert!(err.to_string().contains("facet 3"));
        assert!(err.to_string().contains("expected 3 vertices"));
        assert!(err.to_string().contains("[E3001]"));
    }

    #[test]
    fn test_missing_attribute_helper() {
        let err = Error::missing_attribute("object", "id");
        assert!(err.to_string().contains("Element '<object>'"));
        assert!(err.to_string().contains("missing required attribute 'id'"));
        assert!(err.to_string().contains("[E2003]"));
    }

    #[test]
    fn test_parse_float_error_conversion() {
        let parse_err: std::num::ParseFloatError = "not_a_number".parse::<f64>().unwrap_err();
        let err = Error::from(parse_err);
        assert!(err
            .to_string()
            .contains("Failed to parse floating-point number"));
        assert!(err.to_string().contains("[E3004]"));
    }
}
