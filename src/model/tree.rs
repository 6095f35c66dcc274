//! # Tree Operations
//!
//! The blessed operations over a node tree. Every structural change to the
//! model goes through one of these, so id uniqueness and the
//! undeletable-root rule are enforced in a single place.

use std::collections::HashSet;

use super::ids::mint_unique_id;
use super::legend::{find_entry, LegendEntry};
use super::node::Node;

/// Color used when neither the legend nor the node supplies one
pub const DEFAULT_COLOR: &str = "#666666";

/// Fill in missing ids across the tree.
///
/// Nodes that already carry an id are left untouched, so a second call is
/// a no-op. Returns the number of ids minted.
pub fn assign_ids(root: &mut Node) -> usize {
    let mut taken = collect_ids(root);
    fill_missing_ids(root, &mut taken)
}

fn fill_missing_ids(node: &mut Node, taken: &mut HashSet<String>) -> usize {
    let mut minted = 0;
    if !node.has_id() {
        node.id = mint_unique_id(taken);
        minted += 1;
    }
    for child in &mut node.children {
        minted += fill_missing_ids(child, taken);
    }
    minted
}

/// Re-mint every id that already appeared earlier in pre-order.
///
/// The first occurrence keeps its id. Returns the number of ids replaced.
pub fn dedupe_ids(root: &mut Node) -> usize {
    let mut taken = collect_ids(root);
    let mut seen = HashSet::new();
    let mut reminted = 0;
    visit_mut(root, &mut |node| {
        if !node.has_id() || seen.insert(node.id.clone()) {
            return;
        }
        let id = mint_unique_id(&mut taken);
        log::warn!(
            "Duplicate node id `{}` on `{}`, reassigned to `{}`",
            node.id,
            node.name,
            id
        );
        seen.insert(id.clone());
        node.id = id;
        reminted += 1;
    });
    reminted
}

/// Every non-empty id in the tree
pub fn collect_ids(root: &Node) -> HashSet<String> {
    let mut ids = HashSet::new();
    root.walk(&mut |node, _| {
        if node.has_id() {
            ids.insert(node.id.clone());
        }
    });
    ids
}

/// Pre-order depth-first search for `id`.
pub fn find_by_id<'a>(root: &'a Node, id: &str) -> Option<&'a Node> {
    if root.id == id {
        return Some(root);
    }
    root.children.iter().find_map(|child| find_by_id(child, id))
}

/// Mutable variant of [`find_by_id`].
pub fn find_by_id_mut<'a>(root: &'a mut Node, id: &str) -> Option<&'a mut Node> {
    if root.id == id {
        return Some(root);
    }
    root.children
        .iter_mut()
        .find_map(|child| find_by_id_mut(child, id))
}

/// Find the node whose children contain `id`.
pub fn find_parent<'a>(root: &'a Node, id: &str) -> Option<&'a Node> {
    if root.children.iter().any(|child| child.id == id) {
        return Some(root);
    }
    root.children.iter().find_map(|child| find_parent(child, id))
}

/// Remove the node with `id` and its whole subtree.
///
/// Refuses the root and returns `false`; otherwise returns `true` iff a
/// node was spliced out of its parent's children.
pub fn delete_by_id(root: &mut Node, id: &str) -> bool {
    if root.id == id {
        return false;
    }
    splice_out(root, id)
}

fn splice_out(parent: &mut Node, id: &str) -> bool {
    if let Some(idx) = parent.children.iter().position(|child| child.id == id) {
        parent.children.remove(idx);
        return true;
    }
    parent.children.iter_mut().any(|child| splice_out(child, id))
}

/// Append `child` under the node with `parent_id`.
///
/// Returns `false` when the parent does not exist; the child is dropped.
pub fn add_child(root: &mut Node, parent_id: &str, child: Node) -> bool {
    match find_by_id_mut(root, parent_id) {
        Some(parent) => {
            parent.children.push(child);
            true
        }
        None => false,
    }
}

/// Visit every node mutably, parents before children.
pub fn visit_mut<F>(node: &mut Node, visit: &mut F)
where
    F: FnMut(&mut Node),
{
    visit(node);
    for child in &mut node.children {
        visit_mut(child, visit);
    }
}

/// Ids of every descendant of `id` (not including `id` itself), in pre-order.
///
/// `None` when `id` is not in the tree.
pub fn collect_descendant_ids(root: &Node, id: &str) -> Option<Vec<String>> {
    let node = find_by_id(root, id)?;
    let mut ids = Vec::with_capacity(node.subtree_len().saturating_sub(1));
    for child in &node.children {
        child.walk(&mut |descendant, _| ids.push(descendant.id.clone()));
    }
    Some(ids)
}

/// Resolve the display color of a node.
///
/// Legend entry referenced by `category` first, then the node's own color,
/// then [`DEFAULT_COLOR`].
pub fn get_color<'a>(node: &'a Node, legend: &'a [LegendEntry]) -> &'a str {
    get_color_or(node, legend, DEFAULT_COLOR)
}

/// [`get_color`] with a caller-supplied fallback instead of [`DEFAULT_COLOR`].
pub fn get_color_or<'a>(node: &'a Node, legend: &'a [LegendEntry], default: &'a str) -> &'a str {
    if let Some(color) = node
        .category
        .as_deref()
        .and_then(|category| find_entry(legend, category))
        .and_then(LegendEntry::color)
    {
        return color;
    }

    match node.color.as_deref() {
        Some(color) if !color.is_empty() => color,
        _ => default,
    }
}

/// Reconcile node colors with the legend after a load.
///
/// Category-only nodes get their color hydrated from the entry; color-only
/// nodes whose color matches an entry (case-insensitively) get that entry as
/// their category.
pub fn map_colors_to_legend(node: &mut Node, legend: &[LegendEntry]) {
    if legend.is_empty() {
        return;
    }

    match (node.category.as_deref(), node.color.as_deref()) {
        (Some(category), None) => {
            if let Some(color) = find_entry(legend, category).and_then(LegendEntry::color) {
                node.color = Some(color.to_string());
            }
        }
        (None, Some(color)) => {
            if let Some(entry) = legend.iter().find(|entry| entry.matches_color(color)) {
                node.category = Some(entry.id.clone());
            }
        }
        _ => {}
    }

    for child in &mut node.children {
        map_colors_to_legend(child, legend);
    }
}
