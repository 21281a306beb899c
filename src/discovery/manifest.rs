//! Project manifest (guiport.yaml) parsing.
//!
//! The manifest defines where design documents live, where scenes are
//! written, and the project tables (atlases, fonts) the exporter resolves
//! textures and fonts against.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GuiportError, Result};

/// An atlas resource and the component sprites packed into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Project path of the atlas resource.
    pub path: String,

    /// Largest allowed packed width/height in pixels.
    pub max_size: u32,

    /// Pixels between packed sprites.
    pub padding: u32,

    /// Component name → sprite `[width, height]`.
    pub sprites: BTreeMap<String, [u32; 2]>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            max_size: 2048,
            padding: 2,
            sprites: BTreeMap::new(),
        }
    }
}

/// Project manifest loaded from guiport.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Source directories to scan for design documents.
    /// Defaults to current directory if empty.
    pub sources: Vec<String>,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,

    /// Output directory for exported scenes.
    pub output: PathBuf,

    /// Font size text nodes are authored against at scale 1.
    pub base_font_size: f64,

    /// Name prefix marking containers that are elided from the output.
    pub skip_prefix: String,

    /// Inline template children instead of emitting bare references.
    pub expand_templates: bool,

    /// Drop zero components from every vector block.
    pub compact_vectors: bool,

    pub max_nodes: u32,

    /// Scene material.
    pub material: String,

    pub adjust_reference: String,

    /// Project directory templates are exported to.
    pub templates_dir: String,

    /// Delay after a variant switch before reading the document.
    pub settle_ms: u64,

    /// Atlas name → atlas definition.
    pub atlases: BTreeMap<String, AtlasConfig>,

    /// Font family → font resource path.
    pub fonts: BTreeMap<String, String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            sources: vec![],
            excludes: vec![],
            output: PathBuf::from("gui"),
            base_font_size: 40.0,
            skip_prefix: "_".to_string(),
            expand_templates: false,
            compact_vectors: false,
            max_nodes: 512,
            material: "/builtins/materials/gui.material".to_string(),
            adjust_reference: "ADJUST_REFERENCE_PARENT".to_string(),
            templates_dir: "/gui/templates".to_string(),
            settle_ms: 0,
            atlases: BTreeMap::new(),
            fonts: BTreeMap::new(),
        }
    }
}

impl Manifest {
    /// Load manifest from a guiport.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GuiportError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| GuiportError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check guiport.yaml syntax".to_string()),
        })
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| Self::matches_pattern(&path_str, pattern))
    }

    /// Simple glob pattern matching.
    fn matches_pattern(path: &str, pattern: &str) -> bool {
        if let Some(suffix) = pattern.strip_prefix("**/") {
            // **/dir/* matches anything inside dir anywhere in the path
            if let Some(dir) = suffix.strip_suffix("/*") {
                return path.contains(&format!("/{}/", dir)) || path.starts_with(&format!("{}/", dir));
            }
            return path.contains(suffix);
        }

        if let Some(suffix) = pattern.strip_prefix('*') {
            if !pattern.contains('/') {
                return path.ends_with(suffix);
            }
        }

        if let Some(prefix) = pattern.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", prefix))
                || path.contains(&format!("/{}/", prefix));
        }

        path.contains(pattern)
    }

    /// Get effective source paths, defaulting to current directory.
    pub fn effective_sources(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![".".to_string()]
        } else {
            self.sources.clone()
        }
    }
}
