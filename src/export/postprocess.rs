//! Passes run over the scene graph after traversal.
//!
//! 1. [`collapse`] merges textured boxes into a bare parent that occupies the
//!    same rectangle.
//! 2. [`sanitize_ids`] makes every id unique, keeping parent references in
//!    step.
//! 3. [`flatten`] lists the nodes parents-first and checks that every parent
//!    reference resolves.
//!
//! Each pass is idempotent.

use std::collections::{HashMap, HashSet};

use crate::error::{GuiportError, Result};
use crate::types::{SceneNode, Vector4};

use super::graph::{SceneGraph, SlotId};

/// Merge redundant parent/child pairs, bottom-up.
///
/// Returns the number of nodes removed.
pub fn collapse(graph: &mut SceneGraph) -> usize {
    let mut merged = 0;

    for parent in graph.post_order() {
        let [child] = graph.children(parent) else {
            continue;
        };
        let child = *child;
        if !can_collapse(graph.node(parent), graph.node(child)) {
            continue;
        }

        let offset = graph.node(child).position;
        for &grandchild in &graph.children(child).to_vec() {
            let node = graph.node_mut(grandchild);
            node.position = Vector4 {
                x: node.position.x + offset.x,
                y: node.position.y + offset.y,
                ..node.position
            }
            .rounded();
        }

        let visual = graph.node(child).as_box().cloned();
        if let (Some(from), Some(into)) = (visual, graph.node_mut(parent).as_box_mut()) {
            into.texture = from.texture;
            into.color = from.color;
            into.slice9 = from.slice9;
            into.blend_mode = from.blend_mode;
            into.adjust_mode = from.adjust_mode;
            into.size_mode = from.size_mode;
            into.material = from.material;
        }

        graph.absorb_child(parent, child);
        merged += 1;
    }

    merged
}

/// A bare container and its only child can merge when the child is a
/// visible, textured box covering exactly the same rectangle.
fn can_collapse(parent: &SceneNode, child: &SceneNode) -> bool {
    let (Some(outer), Some(inner)) = (parent.as_box(), child.as_box()) else {
        return false;
    };

    if outer.texture.is_some() || !outer.slice9.is_zero() {
        return false;
    }
    if inner.texture.is_none() || inner.fixed || !child.visible || !child.enabled {
        return false;
    }
    if child.template_child != parent.template_child || child.layer != parent.layer {
        return false;
    }
    if !child.rotation.is_zero() || child.scale != Vector4::ONE {
        return false;
    }
    if !parent.size.approx_eq_xy(&child.size) {
        return false;
    }

    // Where the child's pivot sits when both boxes coincide.
    let aligned = child.pivot.offset(child.size) - parent.pivot.offset(parent.size);
    child.position.approx_eq_xy(&aligned)
}

/// Rename duplicate ids in pre-order by appending `_N`.
///
/// The first occurrence keeps its id. Children of a renamed node are
/// re-pointed at the new id; descendants of a renamed template instance keep
/// the `<id>/` prefix in step.
///
/// Returns the number of nodes renamed.
pub fn sanitize_ids(graph: &mut SceneGraph) -> usize {
    let mut used: HashSet<String> = HashSet::new();
    let mut renamed = 0;

    for slot in graph.pre_order() {
        let id = graph.node(slot).id.clone();
        if used.insert(id.clone()) {
            continue;
        }

        let fresh = (1..)
            .map(|n| format!("{}_{}", id, n))
            .find(|candidate| !used.contains(candidate))
            .unwrap_or_default();

        if graph.node(slot).is_template() {
            rename_template_children(graph, slot, &id, &fresh);
        }
        graph.rename(slot, fresh.clone());
        used.insert(fresh);
        renamed += 1;
    }

    renamed
}

fn rename_template_children(graph: &mut SceneGraph, slot: SlotId, old: &str, new: &str) {
    let old_prefix = format!("{}/", old);
    for descendant in graph.descendants(slot) {
        let id = graph.node(descendant).id.clone();
        if let Some(rest) = id.strip_prefix(&old_prefix) {
            graph.rename(descendant, format!("{}/{}", new, rest));
        }
    }
}

/// List the graph parents-first.
///
/// Fails with a consistency error when any parent reference does not resolve
/// to exactly one earlier node.
pub fn flatten(graph: &SceneGraph) -> Result<Vec<SceneNode>> {
    let nodes: Vec<SceneNode> = graph.pre_order().into_iter().map(|s| graph.node(s).clone()).collect();
    check_references(&nodes)?;
    Ok(nodes)
}

/// Verify ids are unique and each parent appears before its children.
pub fn check_references(nodes: &[SceneNode]) -> Result<()> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for node in nodes {
        *counts.entry(node.id.as_str()).or_default() += 1;
    }
    if let Some((id, _)) = counts.iter().find(|(_, count)| **count > 1) {
        return Err(GuiportError::Consistency {
            message: format!("scene id '{}' is used more than once", id),
        });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for node in nodes {
        if let Some(parent) = &node.parent {
            if !seen.contains(parent.as_str()) {
                return Err(GuiportError::Consistency {
                    message: format!(
                        "node '{}' references parent '{}' which is not emitted before it",
                        node.id, parent
                    ),
                });
            }
        }
        seen.insert(node.id.as_str());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Pivot, SceneKind, TemplateRef, TextureRef};
    use pretty_assertions::assert_eq;

    fn textured(id: &str, size: Vector4) -> SceneNode {
        let mut node = SceneNode::new_box(id);
        node.size = size;
        if let Some(visual) = node.as_box_mut() {
            visual.texture = Some(TextureRef::new("ui", id));
            visual.color = Vector4::new(1.0, 0.0, 0.0, 1.0);
        }
        node
    }

    fn bare(id: &str, size: Vector4) -> SceneNode {
        let mut node = SceneNode::new_box(id);
        node.size = size;
        node
    }

    fn ids(graph: &SceneGraph) -> Vec<String> {
        graph.pre_order().into_iter().map(|s| graph.node(s).id.clone()).collect()
    }

    #[test]
    fn test_collapse_merges_coinciding_child() {
        let size = Vector4::xy(100.0, 40.0);
        let mut graph = SceneGraph::new();
        let root = graph.add(bare("button", size), None);
        let bg = graph.add(textured("bg", size), Some(root));
        let mut label = bare("label", Vector4::xy(50.0, 20.0));
        label.position = Vector4::xy(5.0, 0.0);
        graph.add(label, Some(bg));

        assert_eq!(collapse(&mut graph), 1);

        assert_eq!(ids(&graph), vec!["button", "label"]);
        let button = graph.node(root);
        assert_eq!(button.texture().map(|t| t.reference()), Some("ui/bg".to_string()));
        assert_eq!(button.as_box().unwrap().color, Vector4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(graph.node(2).parent.as_deref(), Some("button"));
    }

    #[test]
    fn test_collapse_respects_pivots() {
        let size = Vector4::xy(100.0, 40.0);
        let mut graph = SceneGraph::new();
        let mut parent = bare("panel", size);
        parent.pivot = Pivot::NW;
        let root = graph.add(parent, None);
        let mut child = textured("bg", size);
        // Centre pivot of a box whose top-left sits on the parent's top-left.
        child.position = Vector4::xy(50.0, -20.0);
        graph.add(child, Some(root));

        assert_eq!(collapse(&mut graph), 1);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_collapse_leaves_distinct_boxes() {
        let mut graph = SceneGraph::new();
        let root = graph.add(bare("panel", Vector4::xy(100.0, 40.0)), None);

        let mut offset = textured("offset", Vector4::xy(100.0, 40.0));
        offset.position = Vector4::xy(10.0, 0.0);
        let a = graph.add(bare("a", Vector4::xy(100.0, 40.0)), Some(root));
        graph.add(offset, Some(a));

        let b = graph.add(bare("b", Vector4::xy(100.0, 40.0)), Some(root));
        let mut fixed = textured("fixed", Vector4::xy(100.0, 40.0));
        if let Some(visual) = fixed.as_box_mut() {
            visual.fixed = true;
        }
        graph.add(fixed, Some(b));

        assert_eq!(collapse(&mut graph), 0);
        assert_eq!(graph.len(), 5);
    }

    #[test]
    fn test_collapse_is_idempotent() {
        let size = Vector4::xy(64.0, 64.0);
        let mut graph = SceneGraph::new();
        let root = graph.add(bare("outer", size), None);
        let mid = graph.add(bare("mid", size), Some(root));
        graph.add(textured("icon", size), Some(mid));

        assert_eq!(collapse(&mut graph), 2);
        let once = graph.to_trees();
        assert_eq!(collapse(&mut graph), 0);
        assert_eq!(graph.to_trees(), once);
        assert_eq!(graph.node(root).texture().map(|t| t.sprite.clone()), Some("icon".to_string()));
    }

    #[test]
    fn test_sanitize_renames_second_label_and_its_children() {
        let mut graph = SceneGraph::new();
        let root = graph.add(bare("root", Vector4::ZERO), None);
        graph.add(bare("label", Vector4::ZERO), Some(root));
        let second = graph.add(bare("label", Vector4::ZERO), Some(root));
        graph.add(bare("shadow", Vector4::ZERO), Some(second));

        assert_eq!(sanitize_ids(&mut graph), 1);

        assert_eq!(ids(&graph), vec!["root", "label", "label_1", "shadow"]);
        assert_eq!(graph.node(3).parent.as_deref(), Some("label_1"));
        assert_eq!(sanitize_ids(&mut graph), 0);
    }

    #[test]
    fn test_sanitize_skips_taken_suffixes() {
        let mut graph = SceneGraph::new();
        let root = graph.add(bare("x", Vector4::ZERO), None);
        graph.add(bare("x_1", Vector4::ZERO), Some(root));
        graph.add(bare("x", Vector4::ZERO), Some(root));

        sanitize_ids(&mut graph);

        assert_eq!(ids(&graph), vec!["x", "x_1", "x_2"]);
    }

    #[test]
    fn test_sanitize_keeps_template_prefixes() {
        let mut graph = SceneGraph::new();
        let root = graph.add(bare("root", Vector4::ZERO), None);
        graph.add(bare("card", Vector4::ZERO), Some(root));
        let template = graph.add(
            SceneNode::with_kind("card", SceneKind::Template(TemplateRef { path: "/t.gui".to_string() })),
            Some(root),
        );
        let mut inner = bare("card/icon", Vector4::ZERO);
        inner.template_child = true;
        graph.add(inner, Some(template));

        sanitize_ids(&mut graph);

        assert_eq!(ids(&graph), vec!["root", "card", "card_1", "card_1/icon"]);
        assert_eq!(graph.node(3).parent.as_deref(), Some("card_1"));
    }

    #[test]
    fn test_flatten_orders_parents_first() {
        let mut graph = SceneGraph::new();
        let root = graph.add(bare("root", Vector4::ZERO), None);
        let a = graph.add(bare("a", Vector4::ZERO), Some(root));
        graph.add(bare("b", Vector4::ZERO), Some(root));
        graph.add(bare("a1", Vector4::ZERO), Some(a));

        let nodes = flatten(&graph).unwrap();
        let order: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

        assert_eq!(order, vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_flatten_rejects_duplicate_ids() {
        let mut graph = SceneGraph::new();
        let root = graph.add(bare("root", Vector4::ZERO), None);
        graph.add(bare("dup", Vector4::ZERO), Some(root));
        graph.add(bare("dup", Vector4::ZERO), Some(root));

        let err = flatten(&graph).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_check_references_rejects_dangling_parent() {
        let mut orphan = bare("orphan", Vector4::ZERO);
        orphan.parent = Some("ghost".to_string());

        assert!(check_references(&[bare("root", Vector4::ZERO), orphan]).is_err());
    }
}
