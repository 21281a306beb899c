//! Texture and font lookup.
//!
//! The exporter does not pack atlases or load fonts. It asks a resolver
//! which atlas sprite a component instance is drawn from and which font file
//! backs a text layer's family. [`AtlasTable`] and [`FontTable`] answer from
//! the project manifest.

use std::collections::BTreeMap;

use crate::discovery::{AtlasConfig, Manifest};
use crate::types::{DesignNode, NodeKind, TextureRef, Vector4};

/// Font used when a text layer's family is not in the project font table.
pub const DEFAULT_FONT_NAME: &str = "system_font";
pub const DEFAULT_FONT_PATH: &str = "/builtins/fonts/system_font.font";

/// A sprite inside an atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTexture {
    pub texture: TextureRef,
    /// Project path of the atlas resource.
    pub atlas_path: String,
    /// Sprite size in pixels.
    pub size: Vector4,
}

/// A font resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFont {
    /// Name the scene refers to the font by.
    pub name: String,
    pub path: String,
}

pub trait TextureResolver {
    fn resolve_texture(&self, node: &DesignNode) -> Option<ResolvedTexture>;
}

pub trait FontResolver {
    fn resolve_font(&self, node: &DesignNode) -> Option<ResolvedFont>;
}

/// Component → atlas sprite lookup.
#[derive(Debug, Clone, Default)]
pub struct AtlasTable {
    atlases: BTreeMap<String, AtlasConfig>,
}

impl AtlasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            atlases: manifest.atlases.clone(),
        }
    }

    /// Register an atlas.
    pub fn add_atlas(&mut self, name: impl Into<String>, config: AtlasConfig) {
        self.atlases.insert(name.into(), config);
    }

    pub fn atlases(&self) -> impl Iterator<Item = (&str, &AtlasConfig)> {
        self.atlases.iter().map(|(name, config)| (name.as_str(), config))
    }

    pub fn get(&self, atlas: &str) -> Option<&AtlasConfig> {
        self.atlases.get(atlas)
    }

    /// Find the atlas holding a sprite for `component`.
    pub fn lookup(&self, component: &str) -> Option<ResolvedTexture> {
        self.atlases.iter().find_map(|(atlas, config)| {
            let [w, h] = config.sprites.get(component)?;
            Some(ResolvedTexture {
                texture: TextureRef::new(atlas.clone(), component),
                atlas_path: config.path.clone(),
                size: Vector4::xy(f64::from(*w), f64::from(*h)),
            })
        })
    }
}

impl TextureResolver for AtlasTable {
    fn resolve_texture(&self, node: &DesignNode) -> Option<ResolvedTexture> {
        match node.kind {
            NodeKind::Instance => self.lookup(node.component.as_deref().unwrap_or(&node.name)),
            _ => None,
        }
    }
}

/// Font family → font resource lookup.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    fonts: BTreeMap<String, String>,
}

impl FontTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            fonts: manifest.fonts.clone(),
        }
    }

    pub fn add_font(&mut self, family: impl Into<String>, path: impl Into<String>) {
        self.fonts.insert(family.into(), path.into());
    }
}

impl FontResolver for FontTable {
    fn resolve_font(&self, node: &DesignNode) -> Option<ResolvedFont> {
        let family = &node.text()?.font_family;
        let path = self.fonts.get(family)?;
        Some(ResolvedFont {
            name: font_name(family),
            path: path.clone(),
        })
    }
}

/// Scene-facing name of a font family: lowercase, separators as `_`.
pub fn font_name(family: &str) -> String {
    family
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}
