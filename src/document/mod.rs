//! Access to the design document being exported.
//!
//! The exporter never owns the design tree. It reads nodes, writes export
//! metadata back (slice-9 inference) and flips variant properties through
//! the [`DesignDocument`] trait, which a host binding implements. The
//! in-memory [`DesignTree`] implementation backs the CLI and the tests.
//!
//! # Example
//!
//! ```ignore
//! use guiport::document::{DesignDocument, DesignTree};
//!
//! let mut tree = DesignTree::new();
//! tree.insert(root, None)?;
//! tree.insert(child, Some("root"))?;
//!
//! let node = tree.node("child").unwrap();
//! ```

use std::collections::HashMap;

use crate::error::{GuiportError, Result};
use crate::types::{DesignNode, NodeId};

/// Read/write capability over a design document.
pub trait DesignDocument {
    /// Look up a node by id.
    fn node(&self, id: &str) -> Option<&DesignNode>;

    /// Write one metadata value on a node.
    fn set_metadata(&mut self, id: &str, key: &str, value: serde_json::Value) -> Result<()>;

    /// Current value of a variant property, `None` when the node has no such
    /// property.
    fn variant_value(&self, id: &str, group: &str) -> Option<String> {
        self.node(id)?.variant_properties.get(group).cloned()
    }

    /// Switch a variant property. The host may rebuild the node's subtree in
    /// response; callers must wait for it to settle before reading.
    fn set_variant_value(&mut self, id: &str, group: &str, value: &str) -> Result<()>;
}

/// In-memory design document.
///
/// Nodes are stored flat and linked by id. Component variants are modelled
/// as alternative child lists that replace the node's children when the
/// matching variant value is selected.
#[derive(Debug, Clone, Default)]
pub struct DesignTree {
    nodes: HashMap<NodeId, DesignNode>,
    roots: Vec<NodeId>,
    /// `(node, group, value)` → children shown for that value.
    layouts: HashMap<(NodeId, String, String), Vec<NodeId>>,
}

impl DesignTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, appending it to `parent`'s children or to the roots.
    ///
    /// Any children already listed on `node` must be inserted separately.
    pub fn insert(&mut self, node: DesignNode, parent: Option<&str>) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(GuiportError::Parse {
                message: format!("Duplicate design node id '{}'", node.id),
                help: Some("Every node in a design document needs a unique id".to_string()),
            });
        }

        match parent {
            Some(parent_id) => {
                let parent = self.nodes.get_mut(parent_id).ok_or_else(|| GuiportError::Parse {
                    message: format!(
                        "Node '{}' references unknown parent '{}'",
                        node.id, parent_id
                    ),
                    help: None,
                })?;
                if !parent.children.contains(&node.id) {
                    parent.children.push(node.id.clone());
                }
            }
            None => self.roots.push(node.id.clone()),
        }

        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Insert a node that only becomes visible as a child of `owner` when a
    /// variant value is selected. The node is not attached to any parent.
    pub fn insert_detached(&mut self, node: DesignNode) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(GuiportError::Parse {
                message: format!("Duplicate design node id '{}'", node.id),
                help: None,
            });
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Register the children shown when `group` of `owner` is set to `value`.
    ///
    /// The owner's current children are registered for its current value the
    /// first time a layout is added for a group, so switching back restores
    /// them.
    pub fn add_variant_layout(
        &mut self,
        owner: &str,
        group: &str,
        value: &str,
        children: Vec<NodeId>,
    ) -> Result<()> {
        let node = self.nodes.get(owner).ok_or_else(|| GuiportError::Parse {
            message: format!("Variant layout for unknown node '{}'", owner),
            help: None,
        })?;

        if let Some(current) = node.variant_properties.get(group) {
            let current_key = (owner.to_string(), group.to_string(), current.clone());
            if !self.layouts.contains_key(&current_key) {
                let original = node.children.clone();
                self.layouts.insert(current_key, original);
            }
        }

        self.layouts
            .insert((owner.to_string(), group.to_string(), value.to_string()), children);
        Ok(())
    }

    /// Root node ids in document order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl DesignDocument for DesignTree {
    fn node(&self, id: &str) -> Option<&DesignNode> {
        self.nodes.get(id)
    }

    fn set_metadata(&mut self, id: &str, key: &str, value: serde_json::Value) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or_else(|| GuiportError::Export {
            message: format!("Cannot write metadata on unknown node '{}'", id),
            help: None,
        })?;
        node.metadata.insert(key.to_string(), value);
        Ok(())
    }

    fn set_variant_value(&mut self, id: &str, group: &str, value: &str) -> Result<()> {
        let layout = self
            .layouts
            .get(&(id.to_string(), group.to_string(), value.to_string()))
            .cloned();

        let node = self.nodes.get_mut(id).ok_or_else(|| GuiportError::Export {
            message: format!("Cannot switch variant on unknown node '{}'", id),
            help: None,
        })?;

        let Some(slot) = node.variant_properties.get_mut(group) else {
            return Err(GuiportError::Export {
                message: format!("Node '{}' has no variant property '{}'", node.name, group),
                help: None,
            });
        };
        *slot = value.to_string();

        if let Some(children) = layout {
            node.children = children;
        }
        Ok(())
    }
}
