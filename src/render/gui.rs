//! `.gui` scene serialization.

use crate::discovery::Manifest;
use crate::export::ExportedScene;
use crate::types::{BoxVisual, SceneKind, SceneNode, TextVisual, Vector4};

use super::writer::{PropertyWriter, VectorMode};

/// Scene-level fields that do not come from the design.
#[derive(Debug, Clone, PartialEq)]
pub struct GuiSettings {
    pub script: String,
    pub material: String,
    pub adjust_reference: String,
    pub max_nodes: u32,
    pub background_color: Vector4,
    pub vectors: VectorMode,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self::from_manifest(&Manifest::default())
    }
}

impl GuiSettings {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            script: String::new(),
            material: manifest.material.clone(),
            adjust_reference: manifest.adjust_reference.clone(),
            max_nodes: manifest.max_nodes,
            background_color: Vector4::ZERO,
            vectors: if manifest.compact_vectors {
                VectorMode::OmitZero
            } else {
                VectorMode::Full
            },
        }
    }
}

/// Serialize an exported scene as `.gui` text.
pub fn render_gui(scene: &ExportedScene, settings: &GuiSettings) -> String {
    let mut w = PropertyWriter::new(settings.vectors);

    w.string("script", &settings.script);
    for (name, path) in &scene.fonts {
        w.block("fonts", |w| {
            w.string("name", name);
            w.string("font", path);
        });
    }
    for (name, path) in &scene.textures {
        w.block("textures", |w| {
            w.string("name", name);
            w.string("texture", path);
        });
    }
    w.vector("background_color", settings.background_color);
    for node in &scene.nodes {
        w.block("nodes", |w| write_node(w, node));
    }
    for layer in &scene.layers {
        w.block("layers", |w| w.string("name", layer));
    }
    w.string("material", &settings.material);
    w.string("adjust_reference", &settings.adjust_reference);
    w.integer("max_nodes", i64::from(settings.max_nodes));

    w.finish()
}

/// Write the fields of one node (without the surrounding block).
pub fn write_node(w: &mut PropertyWriter, node: &SceneNode) {
    match &node.kind {
        SceneKind::Template(template) => {
            w.vector("position", node.position);
            w.vector("rotation", node.rotation);
            w.vector("scale", node.scale);
            w.string("type", node.kind.type_tag());
            w.string("id", &node.id);
            write_parent(w, node);
            w.string("layer", node.layer.as_deref().unwrap_or(""));
            w.boolean("inherit_alpha", node.inherit_alpha);
            w.string("template", &template.path);
            w.boolean("enabled", node.enabled);
        }
        SceneKind::Box(visual) => write_box(w, node, visual),
        SceneKind::Text(visual) => write_text(w, node, visual),
    }
}

fn write_parent(w: &mut PropertyWriter, node: &SceneNode) {
    if let Some(parent) = &node.parent {
        w.string("parent", parent);
    }
}

fn write_box(w: &mut PropertyWriter, node: &SceneNode, visual: &BoxVisual) {
    w.vector("position", node.position);
    w.vector("rotation", node.rotation);
    w.vector("scale", node.scale);
    w.vector("size", node.size);
    w.vector("color", visual.color);
    w.string("type", node.kind.type_tag());
    w.string("blend_mode", visual.blend_mode.as_str());
    let texture = visual.texture.as_ref().map(|t| t.reference()).unwrap_or_default();
    w.string("texture", &texture);
    w.string("id", &node.id);
    w.string("xanchor", "XANCHOR_NONE");
    w.string("yanchor", "YANCHOR_NONE");
    w.string("pivot", node.pivot.as_str());
    w.string("adjust_mode", visual.adjust_mode.as_str());
    write_parent(w, node);
    w.string("layer", node.layer.as_deref().unwrap_or(""));
    w.boolean("inherit_alpha", node.inherit_alpha);
    w.vector("slice9", visual.slice9);
    w.string("clipping_mode", "CLIPPING_MODE_NONE");
    w.boolean("clipping_visible", true);
    w.boolean("clipping_inverted", false);
    w.number("alpha", 1.0);
    w.boolean("template_node_child", node.template_child);
    w.string("size_mode", visual.size_mode.as_str());
    w.boolean("enabled", node.enabled);
    w.boolean("visible", node.visible);
    if let Some(material) = &visual.material {
        w.string("material", material);
    }
}

fn write_text(w: &mut PropertyWriter, node: &SceneNode, visual: &TextVisual) {
    w.vector("position", node.position);
    w.vector("rotation", node.rotation);
    w.vector("scale", node.scale);
    w.vector("size", node.size);
    w.vector("color", visual.color);
    w.string("type", node.kind.type_tag());
    w.string("blend_mode", visual.blend_mode.as_str());
    w.string("text", &visual.text);
    w.string("font", &visual.font);
    w.string("id", &node.id);
    w.string("xanchor", "XANCHOR_NONE");
    w.string("yanchor", "YANCHOR_NONE");
    w.string("pivot", node.pivot.as_str());
    w.vector("outline", visual.outline);
    w.vector("shadow", visual.shadow);
    w.string("adjust_mode", visual.adjust_mode.as_str());
    w.boolean("line_break", visual.line_break);
    write_parent(w, node);
    w.string("layer", node.layer.as_deref().unwrap_or(""));
    w.boolean("inherit_alpha", node.inherit_alpha);
    w.number("alpha", 1.0);
    w.number("outline_alpha", visual.outline.w);
    w.number("shadow_alpha", visual.shadow.w);
    w.boolean("template_node_child", node.template_child);
    w.number("text_leading", visual.leading);
    w.number("text_tracking", visual.tracking);
    w.boolean("enabled", node.enabled);
    w.boolean("visible", node.visible);
}
