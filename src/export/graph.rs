//! Scene graph accumulated during traversal.
//!
//! Nodes live in slots addressed by index. Each slot knows its parent and
//! children, so post-processing can rewrite structure (merge, re-parent,
//! rename) without searching by id, and parent ids on the nodes are kept in
//! sync with that structure.

use std::collections::HashMap;

use crate::error::{GuiportError, Result};
use crate::types::SceneNode;

/// Index of a slot in a [`SceneGraph`].
pub type SlotId = usize;

#[derive(Debug, Clone)]
struct Slot {
    node: SceneNode,
    parent: Option<SlotId>,
    children: Vec<SlotId>,
    removed: bool,
}

/// A nested view of part of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneTree {
    pub node: SceneNode,
    pub children: Vec<SceneTree>,
}

/// Forest of scene nodes in document order.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    roots: Vec<SlotId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent` (or as a root), linking its parent id.
    pub fn add(&mut self, mut node: SceneNode, parent: Option<SlotId>) -> SlotId {
        let id = self.slots.len();
        node.parent = parent.map(|p| self.slots[p].node.id.clone());
        self.slots.push(Slot {
            node,
            parent,
            children: Vec::new(),
            removed: false,
        });
        match parent {
            Some(p) => self.slots[p].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Rebuild a graph from a flat node list linked by parent id.
    ///
    /// Fails when a parent id is unknown or ambiguous.
    pub fn from_nodes(nodes: Vec<SceneNode>) -> Result<Self> {
        let mut by_id: HashMap<String, Vec<SlotId>> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            by_id.entry(node.id.clone()).or_default().push(i);
        }

        let mut parents = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let parent = match &node.parent {
                None => None,
                Some(parent_id) => match by_id.get(parent_id).map(Vec::as_slice) {
                    Some([single]) => Some(*single),
                    _ => {
                        return Err(GuiportError::Consistency {
                            message: format!(
                                "node '{}' references parent '{}' which does not resolve to exactly one node",
                                node.id, parent_id
                            ),
                        })
                    }
                },
            };
            parents.push(parent);
        }

        let mut graph = SceneGraph::new();
        graph.slots = nodes
            .into_iter()
            .zip(&parents)
            .map(|(node, parent)| Slot {
                node,
                parent: *parent,
                children: Vec::new(),
                removed: false,
            })
            .collect();
        for (i, parent) in parents.iter().enumerate() {
            match parent {
                Some(p) => graph.slots[*p].children.push(i),
                None => graph.roots.push(i),
            }
        }
        Ok(graph)
    }

    pub fn node(&self, slot: SlotId) -> &SceneNode {
        &self.slots[slot].node
    }

    pub fn node_mut(&mut self, slot: SlotId) -> &mut SceneNode {
        &mut self.slots[slot].node
    }

    pub fn parent(&self, slot: SlotId) -> Option<SlotId> {
        self.slots[slot].parent
    }

    pub fn children(&self, slot: SlotId) -> &[SlotId] {
        &self.slots[slot].children
    }

    pub fn roots(&self) -> &[SlotId] {
        &self.roots
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.removed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live slots, depth-first, parents before children.
    pub fn pre_order(&self) -> Vec<SlotId> {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut stack: Vec<SlotId> = self.roots.iter().rev().copied().collect();
        while let Some(slot) = stack.pop() {
            order.push(slot);
            stack.extend(self.slots[slot].children.iter().rev());
        }
        order
    }

    /// Live slots, depth-first, children before parents.
    pub fn post_order(&self) -> Vec<SlotId> {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut stack: Vec<(SlotId, bool)> = self.roots.iter().rev().map(|s| (*s, false)).collect();
        while let Some((slot, expanded)) = stack.pop() {
            if expanded {
                order.push(slot);
                continue;
            }
            stack.push((slot, true));
            stack.extend(self.slots[slot].children.iter().rev().map(|c| (*c, false)));
        }
        order
    }

    /// All live descendants of `slot`, pre-order, excluding `slot` itself.
    pub fn descendants(&self, slot: SlotId) -> Vec<SlotId> {
        let mut found = Vec::new();
        let mut stack: Vec<SlotId> = self.slots[slot].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            found.push(current);
            stack.extend(self.slots[current].children.iter().rev());
        }
        found
    }

    /// Remove `child` from the graph, moving its children to `into`.
    pub(crate) fn absorb_child(&mut self, into: SlotId, child: SlotId) {
        let grandchildren = std::mem::take(&mut self.slots[child].children);
        let parent_id = self.slots[into].node.id.clone();
        for &gc in &grandchildren {
            self.slots[gc].parent = Some(into);
            self.slots[gc].node.parent = Some(parent_id.clone());
        }

        let siblings = &mut self.slots[into].children;
        if let Some(pos) = siblings.iter().position(|&c| c == child) {
            siblings.splice(pos..=pos, grandchildren);
        }

        let removed = &mut self.slots[child];
        removed.removed = true;
        removed.parent = None;
    }

    /// Change a node's id and re-point its children at the new id.
    pub(crate) fn rename(&mut self, slot: SlotId, new_id: String) {
        for &child in &self.slots[slot].children.clone() {
            self.slots[child].node.parent = Some(new_id.clone());
        }
        self.slots[slot].node.id = new_id;
    }

    /// Nested view of the live graph.
    pub fn to_trees(&self) -> Vec<SceneTree> {
        fn build(graph: &SceneGraph, slot: SlotId) -> SceneTree {
            SceneTree {
                node: graph.slots[slot].node.clone(),
                children: graph.slots[slot]
                    .children
                    .iter()
                    .map(|&c| build(graph, c))
                    .collect(),
            }
        }
        self.roots.iter().map(|&r| build(self, r)).collect()
    }
}
