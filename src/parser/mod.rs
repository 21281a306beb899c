//! Parsers for guiport input files.
//!
//! Design documents are node-tree dumps written by the design-tool plugin,
//! either as JSON (`*.design.json`) or YAML (`*.design.yaml`).
//!
//! # Usage
//!
//! ```ignore
//! use guiport::parser::{parse_design, SourceFormat};
//!
//! let source = std::fs::read_to_string("menus/main.design.json")?;
//! let document = parse_design(&source, SourceFormat::Json)?;
//!
//! for root in document.tree.roots() {
//!     println!("Found root: {}", root);
//! }
//! ```

mod design;

pub use design::{parse_design, ParsedDocument, SourceFormat};

use std::path::Path;

use crate::error::{GuiportError, Result};

/// Read and parse a design document from disk.
pub fn load_design_file(path: &Path) -> Result<ParsedDocument> {
    let format = SourceFormat::from_path(path).ok_or_else(|| GuiportError::Parse {
        message: format!("Unsupported design file: {}", path.display()),
        help: Some("Design files end in .design.json or .design.yaml".to_string()),
    })?;

    let source = std::fs::read_to_string(path).map_err(|e| GuiportError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })?;

    parse_design(&source, format)
}
