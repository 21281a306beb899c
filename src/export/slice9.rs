//! Slice-9 margin resolution.
//!
//! Margins normally come straight from a node's `slice9` metadata. A design
//! tool plugin can also generate a *placeholder*: a 3×3 grid of sub-images
//! previewing how a sliced image stretches. The corner sizes of that grid
//! are the margins, so they are measured and written back onto the node the
//! placeholder previews.

use crate::document::DesignDocument;
use crate::types::{keys, DesignNode, NodeId, NodeOverrides, Vector4};
use crate::validation::{Diagnostic, ValidationResult};

/// Margins `(left, top, right, bottom)` of a node, zero when unsliced.
pub fn margins(overrides: &NodeOverrides) -> Vector4 {
    let margins = overrides.slice9_margins();
    Vector4::new(
        margins.x.max(0.0),
        margins.y.max(0.0),
        margins.z.max(0.0),
        margins.w.max(0.0),
    )
    .rounded()
}

/// Measure the margins previewed by a placeholder's nine sub-images.
///
/// Returns `None` unless the placeholder has exactly nine children laid out
/// as three rows of three.
pub fn infer_margins<D: DesignDocument>(doc: &D, placeholder: &DesignNode) -> Option<Vector4> {
    if placeholder.children.len() != 9 {
        return None;
    }

    let mut cells: Vec<&DesignNode> = placeholder
        .children
        .iter()
        .map(|id| doc.node(id))
        .collect::<Option<_>>()?;

    cells.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let rows: Vec<&[&DesignNode]> = cells.chunks(3).collect();
    for row in &rows {
        let y = row[0].y;
        if row.iter().any(|cell| (cell.y - y).abs() > 0.5) {
            return None;
        }
        if row.windows(2).any(|pair| pair[0].x >= pair[1].x) {
            return None;
        }
    }
    if rows.windows(2).any(|pair| pair[0][0].y >= pair[1][0].y) {
        return None;
    }

    let top_left = rows[0][0];
    let bottom_right = rows[2][2];
    let values = [top_left.width, top_left.height, bottom_right.width, bottom_right.height];
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return None;
    }

    Some(Vector4::new(values[0], values[1], values[2], values[3]).rounded())
}

/// Resolve every slice placeholder below `root`, writing the measured margins
/// to the previewed nodes. Malformed placeholders are reported as warnings
/// and leave metadata untouched.
///
/// Returns the number of nodes whose margins were written.
pub fn resolve_placeholders<D: DesignDocument>(
    doc: &mut D,
    root: &str,
    diagnostics: &mut ValidationResult,
) -> usize {
    let mut placeholders: Vec<NodeId> = Vec::new();
    let mut stack: Vec<NodeId> = vec![root.to_string()];
    while let Some(id) = stack.pop() {
        let Some(node) = doc.node(&id) else { continue };
        if node.is_slice_placeholder() {
            placeholders.push(id);
            continue;
        }
        stack.extend(node.children.iter().rev().cloned());
    }

    let mut written = 0;
    for id in placeholders {
        if resolve_placeholder(doc, &id, diagnostics).is_some() {
            written += 1;
        }
    }
    written
}

/// Resolve one placeholder. Returns the margins written, if any.
pub fn resolve_placeholder<D: DesignDocument>(
    doc: &mut D,
    placeholder_id: &str,
    diagnostics: &mut ValidationResult,
) -> Option<Vector4> {
    let placeholder = doc.node(placeholder_id)?;
    let name = placeholder.name.clone();
    let (overrides, _) = NodeOverrides::from_metadata(&placeholder.metadata);

    let Some(source) = overrides.slice9_source.filter(|id| doc.node(id).is_some()) else {
        diagnostics.push(
            Diagnostic::warning(
                "guiport::export::slice9-source",
                format!("Slice-9 placeholder '{}' does not name an existing source node", name),
            )
            .with_help("Set 'slice9_source' to the id of the sliced node"),
        );
        return None;
    };

    let Some(margins) = infer_margins(doc, placeholder) else {
        diagnostics.push(
            Diagnostic::warning(
                "guiport::export::slice9-layout",
                format!("Slice-9 placeholder '{}' is not a 3x3 grid of sub-images", name),
            )
            .with_help("Regenerate the placeholder from the design tool plugin"),
        );
        return None;
    };

    let value = serde_json::json!([margins.x, margins.y, margins.z, margins.w]);
    if let Err(e) = doc.set_metadata(&source, keys::SLICE9, value) {
        diagnostics.push(Diagnostic::warning(
            "guiport::export::slice9-write",
            format!("Could not store slice-9 margins from '{}': {}", name, e),
        ));
        return None;
    }

    Some(margins)
}
