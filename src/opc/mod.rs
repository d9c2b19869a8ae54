//! OPC (Open Packaging Conventions) handling
//!
//! 3MF files are ZIP archives following the OPC standard, containing the
//! main 3D model part, a content types declaration, and package
//! relationships.

mod reader;
mod writer;

pub use reader::Package;
pub use writer::create_package;

/// Main 3D model file path within the 3MF archive
pub const MODEL_PATH: &str = "3D/3dmodel.model";

/// Content types file path
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

/// Relationships file path
pub const RELS_PATH: &str = "_rels/.rels";

/// Media type of a produced package
///
/// The boundary contract for callers serving exports over HTTP.
pub const MEDIA_TYPE: &str = "application/vnd.ms-package.3dmanufacturing-3dmodel+xml";
