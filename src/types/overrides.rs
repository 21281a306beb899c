//! Typed view of the export metadata an author attaches to a node.
//!
//! Metadata is author-controlled and frequently hand-edited, so every key is
//! parsed on its own: a malformed value is dropped with a warning and the
//! rest of the node's overrides still apply.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{Metadata, Pivot, Vector4};

/// Variant group name → ordered list of values to export.
pub type VariantSpec = BTreeMap<String, Vec<String>>;

/// Metadata keys understood by the exporter.
pub mod keys {
    pub const ID: &str = "id";
    pub const PIVOT: &str = "pivot";
    pub const SKIP: &str = "skip";
    pub const FIXED: &str = "fixed";
    pub const TEMPLATE: &str = "template";
    pub const TEMPLATE_PATH: &str = "template_path";
    pub const EXPAND_TEMPLATES: &str = "expand_templates";
    pub const VARIANTS: &str = "variants";
    pub const SLICE9: &str = "slice9";
    pub const SLICE9_SOURCE: &str = "slice9_source";
    pub const LAYER: &str = "layer";
    pub const BLEND_MODE: &str = "blend_mode";
    pub const ADJUST_MODE: &str = "adjust_mode";
    pub const SIZE_MODE: &str = "size_mode";
    pub const MATERIAL: &str = "material";
    pub const INHERIT_ALPHA: &str = "inherit_alpha";
    pub const ENABLED: &str = "enabled";

    pub const ALL: [&str; 17] = [
        ID,
        PIVOT,
        SKIP,
        FIXED,
        TEMPLATE,
        TEMPLATE_PATH,
        EXPAND_TEMPLATES,
        VARIANTS,
        SLICE9,
        SLICE9_SOURCE,
        LAYER,
        BLEND_MODE,
        ADJUST_MODE,
        SIZE_MODE,
        MATERIAL,
        INHERIT_ALPHA,
        ENABLED,
    ];
}

/// How a node's colour is composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum BlendMode {
    #[default]
    #[serde(rename = "BLEND_MODE_ALPHA", alias = "alpha")]
    Alpha,
    #[serde(rename = "BLEND_MODE_ADD", alias = "add")]
    Add,
    #[serde(rename = "BLEND_MODE_MULT", alias = "multiply")]
    Multiply,
    #[serde(rename = "BLEND_MODE_SCREEN", alias = "screen")]
    Screen,
}

impl BlendMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BlendMode::Alpha => "BLEND_MODE_ALPHA",
            BlendMode::Add => "BLEND_MODE_ADD",
            BlendMode::Multiply => "BLEND_MODE_MULT",
            BlendMode::Screen => "BLEND_MODE_SCREEN",
        }
    }
}

/// How a node reacts to the window aspect differing from the design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AdjustMode {
    #[default]
    #[serde(rename = "ADJUST_MODE_FIT", alias = "fit")]
    Fit,
    #[serde(rename = "ADJUST_MODE_ZOOM", alias = "zoom")]
    Zoom,
    #[serde(rename = "ADJUST_MODE_STRETCH", alias = "stretch")]
    Stretch,
}

impl AdjustMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AdjustMode::Fit => "ADJUST_MODE_FIT",
            AdjustMode::Zoom => "ADJUST_MODE_ZOOM",
            AdjustMode::Stretch => "ADJUST_MODE_STRETCH",
        }
    }
}

/// Whether a textured box takes its size from the design or the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SizeMode {
    #[default]
    #[serde(rename = "SIZE_MODE_MANUAL", alias = "manual")]
    Manual,
    #[serde(rename = "SIZE_MODE_AUTO", alias = "auto")]
    Auto,
}

impl SizeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeMode::Manual => "SIZE_MODE_MANUAL",
            SizeMode::Auto => "SIZE_MODE_AUTO",
        }
    }
}

/// Parsed export overrides of a single node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeOverrides {
    /// Forced scene id, replacing the design name.
    pub id: Option<String>,
    pub pivot: Option<Pivot>,
    pub skip: bool,
    /// Exempts the node from being collapsed into its parent.
    pub fixed: bool,
    pub template: bool,
    pub template_path: Option<String>,
    pub expand_templates: Option<bool>,
    pub variants: VariantSpec,
    /// Margins as `[left, top, right, bottom]`.
    pub slice9: Option<[f64; 4]>,
    /// On a slice placeholder: the node whose margins it previews.
    pub slice9_source: Option<String>,
    pub layer: Option<String>,
    pub blend_mode: Option<BlendMode>,
    pub adjust_mode: Option<AdjustMode>,
    pub size_mode: Option<SizeMode>,
    pub material: Option<String>,
    pub inherit_alpha: Option<bool>,
    pub enabled: Option<bool>,
}

impl NodeOverrides {
    /// Parse overrides from node metadata.
    ///
    /// Returns the overrides plus one warning per key whose value could not
    /// be understood.
    pub fn from_metadata(metadata: &Metadata) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut parse = Parser { metadata, warnings: &mut warnings };
        let overrides = Self {
            id: parse.get(keys::ID),
            pivot: parse.get(keys::PIVOT),
            skip: parse.get(keys::SKIP).unwrap_or(false),
            fixed: parse.get(keys::FIXED).unwrap_or(false),
            template: parse.get(keys::TEMPLATE).unwrap_or(false),
            template_path: parse.get(keys::TEMPLATE_PATH),
            expand_templates: parse.get(keys::EXPAND_TEMPLATES),
            variants: parse.get(keys::VARIANTS).unwrap_or_default(),
            slice9: parse.get(keys::SLICE9),
            slice9_source: parse.get(keys::SLICE9_SOURCE),
            layer: parse.get(keys::LAYER),
            blend_mode: parse.get(keys::BLEND_MODE),
            adjust_mode: parse.get(keys::ADJUST_MODE),
            size_mode: parse.get(keys::SIZE_MODE),
            material: parse.get(keys::MATERIAL),
            inherit_alpha: parse.get(keys::INHERIT_ALPHA),
            enabled: parse.get(keys::ENABLED),
        };

        (overrides, warnings)
    }

    /// Whether the author attached any export metadata at all.
    pub fn has_any(metadata: &Metadata) -> bool {
        keys::ALL.iter().any(|key| metadata.contains_key(*key))
    }

    /// Slice-9 margins as a vector, zero when unsliced.
    pub fn slice9_margins(&self) -> Vector4 {
        match self.slice9 {
            Some([left, top, right, bottom]) => Vector4::new(left, top, right, bottom),
            None => Vector4::ZERO,
        }
    }
}

struct Parser<'a> {
    metadata: &'a Metadata,
    warnings: &'a mut Vec<String>,
}

impl Parser<'_> {
    fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.metadata.get(key)?;
        if value.is_null() {
            return None;
        }
        match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                self.warnings
                    .push(format!("ignoring metadata '{}' ({}): {}", key, value, e));
                None
            }
        }
    }
}
