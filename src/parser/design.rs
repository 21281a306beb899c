//! Design document parser.
//!
//! Parses `.design.json` / `.design.yaml` files into a [`DesignTree`].
//! The file format is the nested node dump a design-tool plugin produces:
//!
//! ```yaml
//! name: main-menu
//! roots:
//!   - name: menu
//!     type: box
//!     width: 960
//!     height: 640
//!     children:
//!       - name: play
//!         type: instance
//!         component: button
//!         x: 380
//!         y: 300
//!         width: 200
//!         height: 80
//!         variant_properties: { State: idle }
//!         variant_layouts:
//!           State:
//!             pressed: [ { name: bg, type: box, width: 200, height: 72 } ]
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::document::DesignTree;
use crate::error::{GuiportError, Result};
use crate::types::{Colour, DesignNode, Metadata, NodeKind, TextAlign, TextPayload};

/// Input file flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Detect the format from a file name.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".design.json") {
            Some(SourceFormat::Json)
        } else if name.ends_with(".design.yaml") || name.ends_with(".design.yml") {
            Some(SourceFormat::Yaml)
        } else {
            None
        }
    }
}

/// A parsed design document.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Document name, used for output naming when roots are unnamed.
    pub name: Option<String>,
    pub tree: DesignTree,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    roots: Vec<RawNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    #[default]
    Box,
    Text,
    #[serde(alias = "slice9")]
    Placeholder,
    Instance,
}

#[derive(Debug, Deserialize)]
struct RawText {
    #[serde(default)]
    characters: String,
    #[serde(default)]
    font_family: String,
    #[serde(default)]
    font_size: f64,
    #[serde(default)]
    align: TextAlign,
    #[serde(default)]
    line_break: bool,
    #[serde(default = "default_one")]
    leading: f64,
    #[serde(default)]
    tracking: f64,
    #[serde(default)]
    outline: Option<Colour>,
    #[serde(default)]
    shadow: Option<Colour>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(rename = "type", default)]
    kind: RawKind,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    rotation: f64,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    fill: Option<Colour>,
    #[serde(default = "default_one")]
    opacity: f64,
    #[serde(default)]
    component: Option<String>,
    #[serde(default)]
    text: Option<RawText>,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    children: Vec<RawNode>,
    #[serde(default)]
    variant_properties: BTreeMap<String, String>,
    /// group → value → children shown for that value
    #[serde(default)]
    variant_layouts: BTreeMap<String, BTreeMap<String, Vec<RawNode>>>,
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

/// Parse a design document from source text.
pub fn parse_design(source: &str, format: SourceFormat) -> Result<ParsedDocument> {
    let raw: RawDocument = match format {
        SourceFormat::Json => serde_json::from_str(source).map_err(|e| GuiportError::Parse {
            message: format!("Invalid design document: {}", e),
            help: Some("Design documents are JSON objects with a 'roots' array".to_string()),
        })?,
        SourceFormat::Yaml => serde_yaml::from_str(source).map_err(|e| GuiportError::Parse {
            message: format!("Invalid design document: {}", e),
            help: Some("Design documents are YAML mappings with a 'roots' list".to_string()),
        })?,
    };

    let mut loader = Loader {
        tree: DesignTree::new(),
        next_id: 0,
    };
    for root in raw.roots {
        loader.load(root, Parent::Root)?;
    }

    Ok(ParsedDocument {
        name: raw.name,
        tree: loader.tree,
    })
}

enum Parent<'a> {
    Root,
    Node(&'a str),
    Detached,
}

struct Loader {
    tree: DesignTree,
    next_id: usize,
}

impl Loader {
    /// Insert `raw` and its subtree, returning the assigned node id.
    fn load(&mut self, raw: RawNode, parent: Parent<'_>) -> Result<String> {
        let id = match raw.id {
            Some(id) => id,
            None => {
                self.next_id += 1;
                format!("auto:{}", self.next_id)
            }
        };

        let kind = match raw.kind {
            RawKind::Box => NodeKind::Box,
            RawKind::Placeholder => NodeKind::SlicePlaceholder,
            RawKind::Instance => NodeKind::Instance,
            RawKind::Text => {
                let text = raw.text.ok_or_else(|| GuiportError::Parse {
                    message: format!("Text node '{}' has no 'text' block", raw.name),
                    help: Some("Add text: { characters, font_family, font_size }".to_string()),
                })?;
                NodeKind::Text(TextPayload {
                    characters: text.characters,
                    font_family: text.font_family,
                    font_size: text.font_size,
                    align: text.align,
                    line_break: text.line_break,
                    leading: text.leading,
                    tracking: text.tracking,
                    outline: text.outline,
                    shadow: text.shadow,
                })
            }
        };

        let node = DesignNode {
            id: id.clone(),
            name: raw.name,
            kind,
            x: raw.x,
            y: raw.y,
            width: raw.width,
            height: raw.height,
            rotation: raw.rotation,
            visible: raw.visible,
            children: Vec::new(),
            metadata: raw.metadata,
            fill: raw.fill,
            opacity: raw.opacity,
            component: raw.component,
            variant_properties: raw.variant_properties,
        };

        match parent {
            Parent::Root => self.tree.insert(node, None)?,
            Parent::Node(parent_id) => self.tree.insert(node, Some(parent_id))?,
            Parent::Detached => self.tree.insert_detached(node)?,
        }

        for child in raw.children {
            self.load(child, Parent::Node(&id))?;
        }

        for (group, values) in raw.variant_layouts {
            for (value, children) in values {
                let mut ids = Vec::with_capacity(children.len());
                for child in children {
                    ids.push(self.load_detached_subtree(child)?);
                }
                self.tree.add_variant_layout(&id, &group, &value, ids)?;
            }
        }

        Ok(id)
    }

    fn load_detached_subtree(&mut self, raw: RawNode) -> Result<String> {
        self.load(raw, Parent::Detached)
    }
}
