//! Scene nodes produced by the export pipeline.
//!
//! A `SceneNode` carries the fields every node type shares; the
//! type-specific payload lives in [`SceneKind`], so a template reference
//! cannot accidentally carry visual fields.

use super::{AdjustMode, BlendMode, NodeId, Pivot, SizeMode, Vector4};

/// A texture reference of the form `atlas/sprite`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub atlas: String,
    pub sprite: String,
}

impl TextureRef {
    pub fn new(atlas: impl Into<String>, sprite: impl Into<String>) -> Self {
        Self {
            atlas: atlas.into(),
            sprite: sprite.into(),
        }
    }

    /// The value written to a node's `texture` field.
    pub fn reference(&self) -> String {
        format!("{}/{}", self.atlas, self.sprite)
    }
}

/// Visual payload of a box node.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxVisual {
    pub texture: Option<TextureRef>,
    pub color: Vector4,
    /// Margins as `(left, top, right, bottom)`; zero when unsliced.
    pub slice9: Vector4,
    pub blend_mode: BlendMode,
    pub adjust_mode: AdjustMode,
    pub size_mode: SizeMode,
    pub material: Option<String>,
    /// Set by the author to keep the node out of collapsing.
    pub fixed: bool,
}

impl Default for BoxVisual {
    fn default() -> Self {
        Self {
            texture: None,
            color: Vector4::ONE,
            slice9: Vector4::ZERO,
            blend_mode: BlendMode::default(),
            adjust_mode: AdjustMode::default(),
            size_mode: SizeMode::default(),
            material: None,
            fixed: false,
        }
    }
}

/// Visual payload of a text node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextVisual {
    pub text: String,
    pub font: String,
    pub color: Vector4,
    pub outline: Vector4,
    pub shadow: Vector4,
    pub line_break: bool,
    pub leading: f64,
    pub tracking: f64,
    pub blend_mode: BlendMode,
    pub adjust_mode: AdjustMode,
}

/// A reference to a separately exported template scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    pub path: String,
}

/// Type-specific payload of a scene node.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneKind {
    Box(BoxVisual),
    Text(TextVisual),
    Template(TemplateRef),
}

impl SceneKind {
    /// The engine's type tag.
    pub fn type_tag(&self) -> &'static str {
        match self {
            SceneKind::Box(_) => "TYPE_BOX",
            SceneKind::Text(_) => "TYPE_TEXT",
            SceneKind::Template(_) => "TYPE_TEMPLATE",
        }
    }
}

/// One node of the exported scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: String,
    pub parent: Option<String>,
    pub pivot: Pivot,
    pub position: Vector4,
    pub rotation: Vector4,
    pub scale: Vector4,
    pub size: Vector4,
    pub visible: bool,
    pub enabled: bool,
    pub layer: Option<String>,
    pub inherit_alpha: bool,
    /// Child of an expanded template instance.
    pub template_child: bool,
    /// Originating design node; used for resource export, never serialized.
    pub source: Option<NodeId>,
    pub kind: SceneKind,
}

impl SceneNode {
    /// A visible, untextured box with unit scale at the origin.
    pub fn new_box(id: impl Into<String>) -> Self {
        Self::with_kind(id, SceneKind::Box(BoxVisual::default()))
    }

    pub fn with_kind(id: impl Into<String>, kind: SceneKind) -> Self {
        Self {
            id: id.into(),
            parent: None,
            pivot: Pivot::Center,
            position: Vector4::ZERO,
            rotation: Vector4::ZERO,
            scale: Vector4::ONE,
            size: Vector4::ZERO,
            visible: true,
            enabled: true,
            layer: None,
            inherit_alpha: true,
            template_child: false,
            source: None,
            kind,
        }
    }

    pub fn as_box(&self) -> Option<&BoxVisual> {
        match &self.kind {
            SceneKind::Box(visual) => Some(visual),
            _ => None,
        }
    }

    pub fn as_box_mut(&mut self) -> Option<&mut BoxVisual> {
        match &mut self.kind {
            SceneKind::Box(visual) => Some(visual),
            _ => None,
        }
    }

    /// Texture reference of a box node.
    pub fn texture(&self) -> Option<&TextureRef> {
        self.as_box().and_then(|visual| visual.texture.as_ref())
    }

    pub fn is_template(&self) -> bool {
        matches!(self.kind, SceneKind::Template(_))
    }
}
