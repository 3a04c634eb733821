//! Document serialization.
//!
//! Scenes round-trip through a versioned JSON schema. Import is strictly
//! parse-then-commit: a malformed document is reported as a recoverable
//! error and the existing scene is never touched.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::Scene;
use crate::shapes::Shape;

/// Current document schema version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Errors surfaced by document export/import.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported document version {0}")]
    Version(u32),

    #[error("document I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Serializable scene snapshot.
///
/// Holds shapes only: the grid overlay is not a shape and is never part of
/// a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDocument {
    pub version: u32,
    pub shapes: Vec<Shape>,
}

impl SceneDocument {
    pub fn capture(scene: &dyn Scene) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            shapes: scene.export_shapes(),
        }
    }
}

/// Serialize the scene to a JSON string.
pub fn to_json(scene: &dyn Scene) -> DocumentResult<String> {
    Ok(serde_json::to_string(&SceneDocument::capture(scene))?)
}

/// Parse a JSON document into its shapes. Fails without side effects.
pub fn from_json(json: &str) -> DocumentResult<Vec<Shape>> {
    let document: SceneDocument = serde_json::from_str(json)?;
    if document.version != DOCUMENT_VERSION {
        return Err(DocumentError::Version(document.version));
    }
    Ok(document.shapes)
}

/// Write the scene to `path` as JSON.
pub fn save_document(scene: &dyn Scene, path: &Path) -> DocumentResult<()> {
    fs::write(path, to_json(scene)?)?;
    Ok(())
}

/// Read and parse a JSON document from `path`.
pub fn load_document(path: &Path) -> DocumentResult<Vec<Shape>> {
    from_json(&fs::read_to_string(path)?)
}
