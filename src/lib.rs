//! guiport - Design-tool to game GUI scene exporter
//!
//! A library for turning the node tree of a design document into the
//! property-text `.gui` scenes a game engine loads, including component
//! variants, template references and slice-9 margins.

pub mod cli;
pub mod discovery;
pub mod document;
pub mod error;
pub mod export;
pub mod output;
pub mod parser;
pub mod render;
pub mod types;
pub mod validation;

pub use discovery::{discover, discover_paths, DiscoveryResult, Manifest, ScanResult};
pub use document::{DesignDocument, DesignTree};
pub use error::{GuiportError, Result};
pub use export::{BatchReport, ExportOptions, ExportedScene, Exporter, SceneGraph};
pub use parser::{load_design_file, parse_design, ParsedDocument, SourceFormat};
pub use render::{render_gui, GuiSettings, PropertyWriter, VectorMode};
pub use types::{Colour, DesignNode, NodeKind, Pivot, SceneKind, SceneNode, Vector4};
pub use validation::{validate_project, Diagnostic, Measure, Severity, Subject, ValidationResult};
