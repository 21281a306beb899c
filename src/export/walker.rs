//! Depth-first traversal from a design root to a scene graph.
//!
//! The walk uses an explicit stack instead of recursion. Besides visiting
//! nodes, the stack carries variant frames: entering a variant pass pushes
//! the matching restore frame before the subtree is visited, so restoring
//! happens in stack order. When a step fails, every pending restore frame is
//! still run before the error is returned.

use std::collections::BTreeMap;

use crate::document::DesignDocument;
use crate::error::{GuiportError, Result};
use crate::types::{
    BoxVisual, Colour, DesignNode, NodeId, NodeKind, NodeOverrides, Pivot, SceneKind, SceneNode,
    TemplateRef, TextAlign, TextVisual, Vector4,
};
use crate::validation::{Diagnostic, ValidationResult};

use super::geometry::{
    elided_shift, resolve_position, resolve_rotation, resolve_text_scale, resolve_text_size, text_scale,
    ParentFrame, Placement,
};
use super::graph::{SceneGraph, SlotId};
use super::resolve::{FontResolver, ResolvedFont, TextureResolver, DEFAULT_FONT_NAME, DEFAULT_FONT_PATH};
use super::settle::Settle;
use super::slice9;
use super::variant::{plan_passes, VariantPass, VariantScope};
use super::ExportOptions;

/// Joins a skipped container's name to the ids of its descendants.
const SKIP_SEPARATOR: &str = "_";

/// Everything captured from one root.
#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    pub graph: SceneGraph,
    /// Atlas name → atlas resource path, for every atlas a node draws from.
    pub textures: BTreeMap<String, String>,
    /// Font name → font resource path.
    pub fonts: BTreeMap<String, String>,
    /// Layer names in order of first use.
    pub layers: Vec<String>,
    pub diagnostics: ValidationResult,
}

/// Per-node traversal state handed from parent to child.
#[derive(Debug, Clone)]
struct ExportContext {
    node: NodeId,
    at_root: bool,
    /// Prepended to every id: template scopes and skipped ancestors.
    name_prefix: String,
    /// Id forced by the caller; wins over metadata and the design name.
    forced_name: Option<String>,
    parent: Option<SlotId>,
    frame: ParentFrame,
    expand_templates: bool,
    in_variant: bool,
    variant_suffix: String,
    template_child: bool,
}

impl ExportContext {
    fn child(&self, node: &str, parent: Option<SlotId>, frame: ParentFrame) -> Self {
        Self {
            node: node.to_string(),
            at_root: false,
            forced_name: None,
            parent,
            frame,
            ..self.clone()
        }
    }
}

enum Frame {
    Visit(ExportContext),
    EnterVariant(ExportContext, VariantPass),
    ExitVariant(VariantScope),
}

/// Walks one design root into a scene graph.
pub struct Walker<'a, D: DesignDocument> {
    doc: &'a mut D,
    settle: &'a dyn Settle,
    textures: &'a dyn TextureResolver,
    fonts: &'a dyn FontResolver,
    options: &'a ExportOptions,
    out: WalkOutput,
}

impl<'a, D: DesignDocument> Walker<'a, D> {
    pub fn new(
        doc: &'a mut D,
        settle: &'a dyn Settle,
        textures: &'a dyn TextureResolver,
        fonts: &'a dyn FontResolver,
        options: &'a ExportOptions,
    ) -> Self {
        Self {
            doc,
            settle,
            textures,
            fonts,
            options,
            out: WalkOutput::default(),
        }
    }

    /// Traverse the subtree under `root`.
    ///
    /// `name` replaces the root's id when given. The document is left with
    /// every variant property at its original value, whether or not the walk
    /// succeeds.
    pub async fn walk(mut self, root: &str, name: Option<String>) -> Result<WalkOutput> {
        if self.doc.node(root).is_none() {
            return Err(GuiportError::Export {
                message: format!("Root node '{}' not found in design document", root),
                help: None,
            });
        }

        let mut stack = vec![Frame::Visit(ExportContext {
            node: root.to_string(),
            at_root: true,
            name_prefix: String::new(),
            forced_name: name,
            parent: None,
            frame: ParentFrame::default(),
            expand_templates: self.options.expand_templates,
            in_variant: false,
            variant_suffix: String::new(),
            template_child: false,
        })];

        while let Some(frame) = stack.pop() {
            let step = match frame {
                Frame::Visit(ctx) => {
                    self.visit(ctx, &mut stack);
                    Ok(())
                }
                Frame::EnterVariant(ctx, pass) => {
                    match VariantScope::enter(self.doc, self.settle, &ctx.node, &pass).await {
                        Ok(scope) => {
                            let suffix = format!("{}{}", ctx.variant_suffix, pass.suffix());
                            stack.push(Frame::ExitVariant(scope));
                            stack.push(Frame::Visit(ExportContext {
                                in_variant: true,
                                variant_suffix: suffix,
                                ..ctx
                            }));
                            Ok(())
                        }
                        Err(e) => Err(e),
                    }
                }
                Frame::ExitVariant(scope) => scope.exit(self.doc),
            };

            if let Err(e) = step {
                self.unwind(stack);
                return Err(e);
            }
        }

        Ok(self.out)
    }

    /// Run every pending restore frame. Restore failures become diagnostics.
    fn unwind(&mut self, stack: Vec<Frame>) {
        for frame in stack.into_iter().rev() {
            if let Frame::ExitVariant(scope) = frame {
                let node = scope.node().to_string();
                if let Err(e) = scope.exit(self.doc) {
                    self.out.diagnostics.push(Diagnostic::error(
                        "guiport::export::variant-restore",
                        format!("Failed to restore variant of '{}': {}", node, e),
                    ));
                }
            }
        }
    }

    fn visit(&mut self, ctx: ExportContext, stack: &mut Vec<Frame>) {
        let Some(node) = self.doc.node(&ctx.node).cloned() else {
            self.warn(
                "guiport::export::missing-node",
                format!("Child '{}' is not in the design document", ctx.node),
            );
            return;
        };

        if node.is_slice_placeholder() || !node.visible {
            return;
        }

        let (overrides, problems) = NodeOverrides::from_metadata(&node.metadata);
        for problem in problems {
            self.warn("guiport::export::metadata", format!("Node '{}': {}", node.name, problem));
        }

        if !ctx.in_variant && !overrides.variants.is_empty() {
            let passes = plan_passes(&*self.doc, &node.id, &overrides.variants, &mut self.out.diagnostics);
            if !passes.is_empty() {
                for pass in passes.into_iter().rev() {
                    stack.push(Frame::EnterVariant(ctx.clone(), pass));
                }
                return;
            }
        }

        let expand = overrides.expand_templates.unwrap_or(ctx.expand_templates);

        if overrides.template && !ctx.at_root {
            let path = overrides
                .template_path
                .clone()
                .unwrap_or_else(|| self.options.template_path(&node.name));
            let mut scene = self.place(&node, &overrides, &ctx, node.size(), Pivot::Center);
            scene.kind = SceneKind::Template(TemplateRef { path });
            let frame = ParentFrame {
                pivot: scene.pivot,
                size: scene.size,
                shift: Vector4::ZERO,
            };
            let prefix = format!("{}/", scene.id);
            let slot = self.out.graph.add(scene, ctx.parent);

            if expand {
                let child_ctx = ExportContext {
                    name_prefix: prefix,
                    template_child: true,
                    expand_templates: expand,
                    ..ctx.clone()
                };
                push_children(stack, &child_ctx, &node.children, Some(slot), frame);
            }
            return;
        }

        if let NodeKind::Text(_) = node.kind {
            let scene = self.text_node(&node, &overrides, &ctx);
            self.out.graph.add(scene, ctx.parent);
            return;
        }

        let ctx = ExportContext {
            expand_templates: expand,
            ..ctx
        };

        // Inside a variant pass a skipped owner stays elided; its children
        // carry both the owner's prefix and the pass suffix.
        if !ctx.at_root && self.is_skipped(&node, &overrides) {
            let frame = ParentFrame {
                shift: ctx.frame.shift + elided_shift(node.x, node.y),
                ..ctx.frame
            };
            let child_ctx = ExportContext {
                name_prefix: format!("{}{}", ctx.name_prefix, self.skipped_prefix(&node.name)),
                ..ctx.clone()
            };
            push_children(stack, &child_ctx, &node.children, ctx.parent, frame);
            return;
        }

        let scene = self.box_node(&node, &overrides, &ctx);
        let frame = ParentFrame {
            pivot: scene.pivot,
            size: scene.size,
            shift: Vector4::ZERO,
        };
        let slot = self.out.graph.add(scene, ctx.parent);
        push_children(stack, &ctx, &node.children, Some(slot), frame);
    }

    /// Containers elided from the output; their children attach to the
    /// nearest emitted ancestor.
    fn is_skipped(&self, node: &DesignNode, overrides: &NodeOverrides) -> bool {
        let prefix = &self.options.skip_prefix;
        if !prefix.is_empty() && node.name.starts_with(prefix.as_str()) {
            return true;
        }
        overrides.skip || self.is_sprite_wrapper(node)
    }

    /// Id prefix a skipped container hands down: its name without the skip
    /// prefix, followed by a separator.
    fn skipped_prefix(&self, name: &str) -> String {
        let stem = name.strip_prefix(self.options.skip_prefix.as_str()).unwrap_or(name);
        if stem.is_empty() {
            String::new()
        } else {
            format!("{}{}", stem, SKIP_SEPARATOR)
        }
    }

    /// An untextured box with no export metadata whose only child is a
    /// textured instance. The instance carries the visual.
    fn is_sprite_wrapper(&self, node: &DesignNode) -> bool {
        if node.kind != NodeKind::Box
            || NodeOverrides::has_any(&node.metadata)
            || self.textures.resolve_texture(node).is_some()
        {
            return false;
        }
        let [only] = node.children.as_slice() else {
            return false;
        };
        self.doc.node(only).is_some_and(|child| {
            child.kind == NodeKind::Instance
                && child.visible
                && self.textures.resolve_texture(child).is_some()
        })
    }

    /// Shared fields: id, placement and per-node flags.
    fn place(
        &mut self,
        node: &DesignNode,
        overrides: &NodeOverrides,
        ctx: &ExportContext,
        size: Vector4,
        default_pivot: Pivot,
    ) -> SceneNode {
        let base = ctx
            .forced_name
            .as_deref()
            .or(overrides.id.as_deref())
            .unwrap_or(&node.name);
        let id = format!("{}{}{}", ctx.name_prefix, base, ctx.variant_suffix);

        let pivot = overrides.pivot.unwrap_or(default_pivot);
        let placement = Placement::new(node.x, node.y, node.size(), pivot);

        if let Some(layer) = &overrides.layer {
            if !self.out.layers.contains(layer) {
                self.out.layers.push(layer.clone());
            }
        }

        let mut scene = SceneNode::new_box(id);
        scene.pivot = pivot;
        scene.position = resolve_position(&placement, &ctx.frame, ctx.at_root);
        scene.rotation = resolve_rotation(node.rotation);
        scene.size = size.rounded();
        scene.visible = node.visible;
        scene.enabled = overrides.enabled.unwrap_or(true);
        scene.layer = overrides.layer.clone();
        scene.inherit_alpha = overrides.inherit_alpha.unwrap_or(true);
        scene.template_child = ctx.template_child;
        scene.source = Some(node.id.clone());
        scene
    }

    fn box_node(&mut self, node: &DesignNode, overrides: &NodeOverrides, ctx: &ExportContext) -> SceneNode {
        let mut scene = self.place(node, overrides, ctx, node.size(), Pivot::Center);

        let texture = self.textures.resolve_texture(node).map(|resolved| {
            self.out
                .textures
                .entry(resolved.texture.atlas.clone())
                .or_insert(resolved.atlas_path);
            resolved.texture
        });

        scene.kind = SceneKind::Box(BoxVisual {
            texture,
            color: node.fill.unwrap_or(Colour::WHITE).to_vector(node.opacity).rounded(),
            slice9: slice9::margins(overrides),
            blend_mode: overrides.blend_mode.unwrap_or_default(),
            adjust_mode: overrides.adjust_mode.unwrap_or_default(),
            size_mode: overrides.size_mode.unwrap_or_default(),
            material: overrides.material.clone(),
            fixed: overrides.fixed,
        });
        scene
    }

    fn text_node(&mut self, node: &DesignNode, overrides: &NodeOverrides, ctx: &ExportContext) -> SceneNode {
        let payload = node.text().cloned().unwrap_or_default();

        let default_pivot = match payload.align {
            TextAlign::Left => Pivot::W,
            TextAlign::Center => Pivot::Center,
            TextAlign::Right => Pivot::E,
        };
        let scale = text_scale(payload.font_size, self.options.base_font_size);
        let size = resolve_text_size(node.size(), scale);
        let mut scene = self.place(node, overrides, ctx, size, default_pivot);
        scene.scale = resolve_text_scale(payload.font_size, self.options.base_font_size);

        let font = match self.fonts.resolve_font(node) {
            Some(font) => font,
            None => {
                self.warn(
                    "guiport::export::missing-font",
                    format!(
                        "Text '{}' uses font family '{}' which is not in the font table",
                        node.name, payload.font_family
                    ),
                );
                ResolvedFont {
                    name: DEFAULT_FONT_NAME.to_string(),
                    path: DEFAULT_FONT_PATH.to_string(),
                }
            }
        };
        self.out.fonts.entry(font.name.clone()).or_insert(font.path);

        let none = Colour::TRANSPARENT.to_vector(1.0);
        scene.kind = SceneKind::Text(TextVisual {
            text: payload.characters,
            font: font.name,
            color: node.fill.unwrap_or(Colour::WHITE).to_vector(node.opacity).rounded(),
            outline: payload.outline.map_or(none, |c| c.to_vector(1.0).rounded()),
            shadow: payload.shadow.map_or(none, |c| c.to_vector(1.0).rounded()),
            line_break: payload.line_break,
            leading: payload.leading,
            tracking: payload.tracking,
            blend_mode: overrides.blend_mode.unwrap_or_default(),
            adjust_mode: overrides.adjust_mode.unwrap_or_default(),
        });
        scene
    }

    fn warn(&mut self, code: &str, message: String) {
        self.out.diagnostics.push(Diagnostic::warning(code, message));
    }
}

/// Push child visits so the first child is popped first.
fn push_children(
    stack: &mut Vec<Frame>,
    ctx: &ExportContext,
    children: &[NodeId],
    parent: Option<SlotId>,
    frame: ParentFrame,
) {
    for child in children.iter().rev() {
        stack.push(Frame::Visit(ctx.child(child, parent, frame)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::AtlasConfig;
    use crate::document::DesignTree;
    use crate::export::resolve::{AtlasTable, FontTable};
    use crate::export::settle::NoSettle;
    use crate::types::TextPayload;
    use serde_json::json;

    fn atlas() -> AtlasTable {
        let mut table = AtlasTable::new();
        let mut config = AtlasConfig {
            path: "/assets/ui.atlas".to_string(),
            ..Default::default()
        };
        config.sprites.insert("button".to_string(), [200, 80]);
        config.sprites.insert("icon".to_string(), [32, 32]);
        table.add_atlas("ui", config);
        table
    }

    async fn walk(tree: &mut DesignTree, options: &ExportOptions) -> Result<WalkOutput> {
        let textures = atlas();
        let fonts = FontTable::new();
        Walker::new(tree, &NoSettle, &textures, &fonts, options)
            .walk("root", None)
            .await
    }

    fn ids(out: &WalkOutput) -> Vec<String> {
        out.graph
            .pre_order()
            .into_iter()
            .map(|s| out.graph.node(s).id.clone())
            .collect()
    }

    fn find<'o>(out: &'o WalkOutput, id: &str) -> &'o SceneNode {
        let slot = out
            .graph
            .pre_order()
            .into_iter()
            .find(|&s| out.graph.node(s).id == id)
            .unwrap();
        out.graph.node(slot)
    }

    fn screen() -> DesignTree {
        let mut tree = DesignTree::new();
        tree.insert(DesignNode::new("root", "menu", NodeKind::Box).with_box(0.0, 0.0, 400.0, 300.0), None)
            .unwrap();
        tree
    }

    #[tokio::test]
    async fn test_root_and_child_positions() {
        let mut tree = screen();
        tree.insert(
            DesignNode::new("a", "panel", NodeKind::Box).with_box(0.0, 0.0, 100.0, 100.0),
            Some("root"),
        )
        .unwrap();

        let out = walk(&mut tree, &ExportOptions::default()).await.unwrap();

        assert_eq!(ids(&out), vec!["menu", "panel"]);
        assert_eq!(find(&out, "menu").position, Vector4::ZERO);
        assert_eq!(find(&out, "panel").position, Vector4::xy(-150.0, 100.0));
        assert_eq!(find(&out, "panel").parent.as_deref(), Some("menu"));
    }

    #[tokio::test]
    async fn test_skip_prefix_shifts_children() {
        let mut tree = screen();
        tree.insert(
            DesignNode::new("g", "_group", NodeKind::Box).with_box(50.0, 50.0, 200.0, 200.0),
            Some("root"),
        )
        .unwrap();
        tree.insert(
            DesignNode::new("c", "label_bg", NodeKind::Box).with_box(0.0, 0.0, 10.0, 10.0),
            Some("g"),
        )
        .unwrap();

        let out = walk(&mut tree, &ExportOptions::default()).await.unwrap();

        assert_eq!(ids(&out), vec!["menu", "group_label_bg"]);
        let child = find(&out, "group_label_bg");
        assert_eq!(child.parent.as_deref(), Some("menu"));
        // Placed against the menu, then moved by the group's offset.
        assert_eq!(child.position, Vector4::xy(-195.0 + 50.0, 145.0 - 50.0));
    }

    #[tokio::test]
    async fn test_skipped_siblings_keep_children_apart() {
        let mut tree = screen();
        for (id, name) in [("l", "_left"), ("r", "_right")] {
            tree.insert(DesignNode::new(id, name, NodeKind::Box), Some("root")).unwrap();
            tree.insert(DesignNode::new(&format!("{id}1"), "label", NodeKind::Box), Some(id))
                .unwrap();
        }

        let out = walk(&mut tree, &ExportOptions::default()).await.unwrap();

        assert_eq!(ids(&out), vec!["menu", "left_label", "right_label"]);
    }

    #[tokio::test]
    async fn test_nested_skips_accumulate_prefix_and_shift() {
        let mut tree = screen();
        tree.insert(
            DesignNode::new("o", "_outer", NodeKind::Box).with_box(10.0, 20.0, 300.0, 200.0),
            Some("root"),
        )
        .unwrap();
        tree.insert(
            DesignNode::new("i", "inner", NodeKind::Box)
                .with_box(5.0, 5.0, 100.0, 100.0)
                .with_meta("skip", json!(true)),
            Some("o"),
        )
        .unwrap();
        tree.insert(DesignNode::new("d", "dot", NodeKind::Box).with_box(0.0, 0.0, 10.0, 10.0), Some("i"))
            .unwrap();

        let out = walk(&mut tree, &ExportOptions::default()).await.unwrap();

        assert_eq!(ids(&out), vec!["menu", "outer_inner_dot"]);
        let dot = find(&out, "outer_inner_dot");
        assert_eq!(dot.parent.as_deref(), Some("menu"));
        assert_eq!(dot.position, Vector4::xy(-195.0 + 15.0, 145.0 - 25.0));
    }

    #[tokio::test]
    async fn test_skipped_variant_owner_emits_children_per_pass() {
        let mut tree = screen();
        let mut owner = DesignNode::new("b", "_btn", NodeKind::Box)
            .with_box(0.0, 0.0, 100.0, 40.0)
            .with_meta("variants", json!({ "Zeta": ["z1"], "Alpha": ["a1"] }));
        owner.variant_properties.insert("Zeta".to_string(), "z0".to_string());
        owner.variant_properties.insert("Alpha".to_string(), "a0".to_string());
        tree.insert(owner, Some("root")).unwrap();
        tree.insert(DesignNode::new("l", "label", NodeKind::Box), Some("b")).unwrap();

        let out = walk(&mut tree, &ExportOptions::default()).await.unwrap();

        // Groups run in name order; the owner itself is never emitted.
        assert_eq!(ids(&out), vec!["menu", "btn_label_a1", "btn_label_z1"]);
        assert_eq!(find(&out, "btn_label_z1").parent.as_deref(), Some("menu"));
        assert_eq!(tree.variant_value("b", "Zeta").as_deref(), Some("z0"));
        assert_eq!(tree.variant_value("b", "Alpha").as_deref(), Some("a0"));
    }

    #[tokio::test]
    async fn test_sprite_wrapper_is_elided() {
        let mut tree = screen();
        tree.insert(
            DesignNode::new("w", "play", NodeKind::Box).with_box(0.0, 0.0, 200.0, 80.0),
            Some("root"),
        )
        .unwrap();
        let mut inst = DesignNode::new("i", "btn", NodeKind::Instance).with_box(0.0, 0.0, 200.0, 80.0);
        inst.component = Some("button".to_string());
        tree.insert(inst, Some("w")).unwrap();

        let out = walk(&mut tree, &ExportOptions::default()).await.unwrap();

        assert_eq!(ids(&out), vec!["menu", "play_btn"]);
        assert_eq!(find(&out, "play_btn").texture().unwrap().reference(), "ui/button");
        assert_eq!(out.textures["ui"], "/assets/ui.atlas");
    }

    #[tokio::test]
    async fn test_invisible_and_placeholder_nodes_are_dropped() {
        let mut tree = screen();
        let mut hidden = DesignNode::new("h", "hidden", NodeKind::Box);
        hidden.visible = false;
        tree.insert(hidden, Some("root")).unwrap();
        tree.insert(DesignNode::new("p", "preview", NodeKind::SlicePlaceholder), Some("root"))
            .unwrap();
        tree.insert(DesignNode::new("cell", "cell", NodeKind::Box), Some("p")).unwrap();

        let out = walk(&mut tree, &ExportOptions::default()).await.unwrap();

        assert_eq!(ids(&out), vec!["menu"]);
    }

    #[tokio::test]
    async fn test_text_scale_pivot_and_default_font() {
        let mut tree = screen();
        let text = DesignNode::new(
            "t",
            "title",
            NodeKind::Text(TextPayload {
                characters: "Hello".to_string(),
                font_family: "Comic".to_string(),
                font_size: 20.0,
                align: TextAlign::Left,
                ..Default::default()
            }),
        )
        .with_box(0.0, 0.0, 100.0, 20.0);
        tree.insert(text, Some("root")).unwrap();

        let out = walk(&mut tree, &ExportOptions::default()).await.unwrap();
        let title = find(&out, "title");

        assert_eq!(title.pivot, Pivot::W);
        assert_eq!(title.scale, Vector4::uniform(0.5));
        assert_eq!(title.size, Vector4::xy(200.0, 40.0));
        assert_eq!(out.fonts[DEFAULT_FONT_NAME], DEFAULT_FONT_PATH);
        assert_eq!(out.diagnostics.warning_count(), 1);
    }

    #[tokio::test]
    async fn test_template_reference_and_expansion() {
        let mut tree = screen();
        tree.insert(
            DesignNode::new("tp", "card", NodeKind::Box)
                .with_box(0.0, 0.0, 100.0, 100.0)
                .with_meta("template", json!(true)),
            Some("root"),
        )
        .unwrap();
        tree.insert(DesignNode::new("tc", "icon", NodeKind::Box).with_box(0.0, 0.0, 10.0, 10.0), Some("tp"))
            .unwrap();

        let out = walk(&mut tree, &ExportOptions::default()).await.unwrap();
        assert_eq!(ids(&out), vec!["menu", "card"]);
        assert!(find(&out, "card").is_template());

        let options = ExportOptions {
            expand_templates: true,
            ..Default::default()
        };
        let out = walk(&mut tree, &options).await.unwrap();
        assert_eq!(ids(&out), vec!["menu", "card", "card/icon"]);
        let icon = find(&out, "card/icon");
        assert!(icon.template_child);
        assert_eq!(icon.parent.as_deref(), Some("card"));
    }

    fn variant_tree() -> DesignTree {
        let mut tree = screen();
        let mut button = DesignNode::new("b", "button", NodeKind::Box)
            .with_box(0.0, 0.0, 100.0, 40.0)
            .with_meta("variants", json!({ "State": ["idle", "pressed"] }));
        button.variant_properties.insert("State".to_string(), "idle".to_string());
        tree.insert(button, Some("root")).unwrap();
        tree.insert(DesignNode::new("l1", "label", NodeKind::Box), Some("b")).unwrap();
        tree.insert_detached(DesignNode::new("l2", "glow", NodeKind::Box)).unwrap();
        tree.add_variant_layout("b", "State", "pressed", vec!["l2".to_string()])
            .unwrap();
        tree
    }

    #[tokio::test]
    async fn test_variant_passes_suffix_and_restore() {
        let mut tree = variant_tree();

        let out = walk(&mut tree, &ExportOptions::default()).await.unwrap();

        assert_eq!(
            ids(&out),
            vec!["menu", "button_idle", "label_idle", "button_pressed", "glow_pressed"]
        );
        assert_eq!(tree.variant_value("b", "State").as_deref(), Some("idle"));
    }

    /// A document whose variant switch succeeds once, then fails.
    struct FlakyDoc {
        inner: DesignTree,
        switches: usize,
    }

    impl DesignDocument for FlakyDoc {
        fn node(&self, id: &str) -> Option<&DesignNode> {
            self.inner.node(id)
        }

        fn set_metadata(&mut self, id: &str, key: &str, value: serde_json::Value) -> Result<()> {
            self.inner.set_metadata(id, key, value)
        }

        fn set_variant_value(&mut self, id: &str, group: &str, value: &str) -> Result<()> {
            self.switches += 1;
            if value == "pressed" {
                return Err(GuiportError::Export {
                    message: "host refused".to_string(),
                    help: None,
                });
            }
            self.inner.set_variant_value(id, group, value)
        }
    }

    #[tokio::test]
    async fn test_failed_pass_still_restores() {
        let mut doc = FlakyDoc {
            inner: variant_tree(),
            switches: 0,
        };
        let options = ExportOptions::default();
        let textures = atlas();
        let fonts = FontTable::new();

        let result = Walker::new(&mut doc, &NoSettle, &textures, &fonts, &options)
            .walk("root", None)
            .await;

        assert!(result.is_err());
        // idle applied, idle restored, pressed refused.
        assert_eq!(doc.switches, 3);
        assert_eq!(doc.inner.variant_value("b", "State").as_deref(), Some("idle"));
    }

    #[tokio::test]
    async fn test_forced_root_name() {
        let mut tree = screen();
        let textures = atlas();
        let fonts = FontTable::new();
        let options = ExportOptions::default();

        let out = Walker::new(&mut tree, &NoSettle, &textures, &fonts, &options)
            .walk("root", Some("main_menu".to_string()))
            .await
            .unwrap();

        assert_eq!(ids(&out), vec!["main_menu"]);
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let mut tree = DesignTree::new();
        assert!(walk(&mut tree, &ExportOptions::default()).await.is_err());
    }
}
