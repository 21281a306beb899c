//! Component variant enumeration.
//!
//! A node whose metadata declares `variants: { Group: [a, b] }` is exported
//! once per `(group, value)` pair. Each pass switches that single group to
//! the value, waits for the host to settle, captures the subtree and switches
//! back. Groups are independent: every other group keeps its original value
//! during a pass.

use crate::document::DesignDocument;
use crate::error::Result;
use crate::types::{NodeId, VariantSpec};
use crate::validation::{Diagnostic, ValidationResult};

use super::settle::Settle;

/// One export pass over a variant node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPass {
    pub group: String,
    pub value: String,
}

impl VariantPass {
    /// Suffix appended to every scene id captured during this pass.
    pub fn suffix(&self) -> String {
        variant_suffix(&self.value)
    }
}

/// Id-safe `_value` suffix for a variant value.
pub fn variant_suffix(value: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("_{}", cleaned)
}

/// Expand a node's variant spec into passes, in group then value order.
///
/// Groups naming a property the node does not have are dropped with a
/// warning; an empty result means the node is exported once as-is.
pub fn plan_passes<D: DesignDocument>(
    doc: &D,
    node: &str,
    spec: &VariantSpec,
    diagnostics: &mut ValidationResult,
) -> Vec<VariantPass> {
    let mut passes = Vec::new();

    for (group, values) in spec {
        if doc.variant_value(node, group).is_none() {
            let name = doc.node(node).map_or(node, |n| n.name.as_str());
            diagnostics.push(
                Diagnostic::warning(
                    "guiport::export::variant-group",
                    format!("Node '{}' declares variant group '{}' but has no such property", name, group),
                )
                .with_help("Check the group name against the component's variant properties"),
            );
            continue;
        }

        for value in values {
            passes.push(VariantPass {
                group: group.clone(),
                value: value.clone(),
            });
        }
    }

    passes
}

/// A variant value applied to a node, pending restoration.
///
/// Entering switches the value and waits for the host to settle; exiting
/// puts the original value back. The walker keeps open scopes on its stack
/// and exits them on every path, including errors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a variant scope must be exited to restore the document"]
pub struct VariantScope {
    node: NodeId,
    group: String,
    original: String,
}

impl VariantScope {
    /// Apply `pass` to `node` and wait for the host to settle.
    pub async fn enter<D, S>(doc: &mut D, settle: &S, node: &str, pass: &VariantPass) -> Result<Self>
    where
        D: DesignDocument,
        S: Settle + ?Sized,
    {
        let original = doc.variant_value(node, &pass.group).unwrap_or_default();
        let scope = Self {
            node: node.to_string(),
            group: pass.group.clone(),
            original,
        };

        doc.set_variant_value(node, &pass.group, &pass.value)?;
        settle.settle().await;
        Ok(scope)
    }

    /// Restore the original value.
    pub fn exit<D: DesignDocument>(self, doc: &mut D) -> Result<()> {
        doc.set_variant_value(&self.node, &self.group, &self.original)
    }

    pub fn node(&self) -> &str {
        &self.node
    }
}
