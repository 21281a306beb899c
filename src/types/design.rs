//! Design-tool input nodes.
//!
//! A design document is a tree of boxes, text layers, slice-9 preview
//! placeholders and component instances. Geometry is parent-local with a
//! top-left origin and Y growing downwards.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{Colour, Vector4};

/// Stable identifier of a design node.
pub type NodeId = String;

/// Free-form key/value store the author attaches to a node.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Text-specific payload of a design node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPayload {
    pub characters: String,
    pub font_family: String,
    pub font_size: f64,
    pub align: TextAlign,
    pub line_break: bool,
    pub leading: f64,
    pub tracking: f64,
    pub outline: Option<Colour>,
    pub shadow: Option<Colour>,
}

impl Default for TextPayload {
    fn default() -> Self {
        Self {
            characters: String::new(),
            font_family: String::new(),
            font_size: 0.0,
            align: TextAlign::default(),
            line_break: false,
            leading: 1.0,
            tracking: 0.0,
            outline: None,
            shadow: None,
        }
    }
}

/// The kind of a design node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A plain container box (frame, group, rectangle).
    Box,
    /// A text layer.
    Text(TextPayload),
    /// A generated nine-piece preview of a sliced image.
    SlicePlaceholder,
    /// An instance of a library component.
    Instance,
}

/// One element of the design tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    pub visible: bool,
    pub children: Vec<NodeId>,
    pub metadata: Metadata,
    pub fill: Option<Colour>,
    pub opacity: f64,
    /// Name of the main component for instances.
    pub component: Option<String>,
    /// Current value of each variant property (group → value).
    pub variant_properties: BTreeMap<String, String>,
}

impl DesignNode {
    /// Create a visible node with default geometry.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            visible: true,
            children: Vec::new(),
            metadata: Metadata::new(),
            fill: None,
            opacity: 1.0,
            component: None,
            variant_properties: BTreeMap::new(),
        }
    }

    /// Builder-style geometry setter.
    pub fn with_box(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Builder-style metadata setter.
    pub fn with_meta(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Design-space size as a vector (non-finite dimensions become zero).
    pub fn size(&self) -> Vector4 {
        Vector4::xy(finite_or_zero(self.width), finite_or_zero(self.height))
    }

    pub fn is_slice_placeholder(&self) -> bool {
        matches!(self.kind, NodeKind::SlicePlaceholder)
    }

    pub fn text(&self) -> Option<&TextPayload> {
        match &self.kind {
            NodeKind::Text(payload) => Some(payload),
            _ => None,
        }
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
