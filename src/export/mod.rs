//! Export pipeline: design root → scene nodes.
//!
//! Exporting a root runs four stages:
//!
//! 1. Slice-9 placeholders under the root write their measured margins back
//!    to the nodes they preview.
//! 2. The [`walker`] traverses the tree, switching component variants as it
//!    goes, and builds a [`SceneGraph`].
//! 3. [`postprocess`] collapses redundant containers and makes ids unique.
//! 4. The graph is flattened parents-first into an [`ExportedScene`].
//!
//! The exporter is async because variant switches wait for the host to
//! settle. It borrows the document mutably for the whole export, so exports
//! run one at a time.

pub mod geometry;
pub mod graph;
pub mod postprocess;
pub mod resolve;
pub mod settle;
pub mod slice9;
pub mod variant;
pub mod walker;

use std::collections::BTreeMap;

use crate::discovery::Manifest;
use crate::document::DesignDocument;
use crate::error::{GuiportError, Result};
use crate::types::{NodeId, SceneNode};
use crate::validation::ValidationResult;

pub use graph::{SceneGraph, SceneTree, SlotId};
pub use resolve::{AtlasTable, FontResolver, FontTable, TextureResolver};
pub use settle::{NoSettle, Settle, TimerSettle};
pub use walker::{WalkOutput, Walker};

/// Traversal settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub base_font_size: f64,
    pub skip_prefix: String,
    pub expand_templates: bool,
    pub templates_dir: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_manifest(&Manifest::default())
    }
}

impl ExportOptions {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            base_font_size: manifest.base_font_size,
            skip_prefix: manifest.skip_prefix.clone(),
            expand_templates: manifest.expand_templates,
            templates_dir: manifest.templates_dir.clone(),
        }
    }

    /// Project path of the scene a template root named `name` exports to.
    pub fn template_path(&self, name: &str) -> String {
        format!("{}/{}.gui", self.templates_dir.trim_end_matches('/'), name)
    }
}

/// One exported root, ready to serialize.
#[derive(Debug, Clone)]
pub struct ExportedScene {
    /// Scene name, used as the output file stem.
    pub name: String,
    /// Nodes, parents before children.
    pub nodes: Vec<SceneNode>,
    /// Atlas name → atlas resource path.
    pub textures: BTreeMap<String, String>,
    /// Font name → font resource path.
    pub fonts: BTreeMap<String, String>,
    pub layers: Vec<String>,
    pub diagnostics: ValidationResult,
}

/// A root that failed to export.
#[derive(Debug)]
pub struct RootFailure {
    pub root: NodeId,
    pub error: GuiportError,
}

/// Outcome of exporting several roots.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub scenes: Vec<ExportedScene>,
    pub failures: Vec<RootFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the export pipeline against a project's resource tables.
pub struct Exporter<'a> {
    options: ExportOptions,
    textures: &'a dyn TextureResolver,
    fonts: &'a dyn FontResolver,
    settle: &'a dyn Settle,
}

impl<'a> Exporter<'a> {
    pub fn new(
        options: ExportOptions,
        textures: &'a dyn TextureResolver,
        fonts: &'a dyn FontResolver,
        settle: &'a dyn Settle,
    ) -> Self {
        Self {
            options,
            textures,
            fonts,
            settle,
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export the subtree under `root` as one scene.
    pub async fn export_root<D: DesignDocument>(&self, doc: &mut D, root: &str) -> Result<ExportedScene> {
        let name = doc
            .node(root)
            .map(|node| scene_name(&node.name))
            .ok_or_else(|| GuiportError::Export {
                message: format!("Root node '{}' not found in design document", root),
                help: None,
            })?;

        let mut diagnostics = ValidationResult::new();
        slice9::resolve_placeholders(doc, root, &mut diagnostics);

        let walked = Walker::new(doc, self.settle, self.textures, self.fonts, &self.options)
            .walk(root, None)
            .await?;

        let mut graph = walked.graph;
        postprocess::collapse(&mut graph);
        postprocess::sanitize_ids(&mut graph);
        let nodes = postprocess::flatten(&graph)?;

        diagnostics.merge(walked.diagnostics);

        Ok(ExportedScene {
            name,
            nodes,
            textures: walked.textures,
            fonts: walked.fonts,
            layers: walked.layers,
            diagnostics,
        })
    }

    /// Export each root in order.
    ///
    /// A root that fails is recorded and the batch continues. A consistency
    /// error aborts the whole batch.
    pub async fn export_batch<D: DesignDocument>(&self, doc: &mut D, roots: &[NodeId]) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        for root in roots {
            match self.export_root(doc, root).await {
                Ok(scene) => report.scenes.push(scene),
                Err(e) if e.is_fatal() => return Err(e),
                Err(error) => report.failures.push(RootFailure {
                    root: root.clone(),
                    error,
                }),
            }
        }

        Ok(report)
    }
}

/// File-safe scene name for a root node.
pub fn scene_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "scene".to_string()
    } else {
        cleaned
    }
}
