use serde::Serialize;

use crate::model::node::{NodeId, ROOT, Tree};

/// One line of a flattened tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatItem {
    /// Arena index in the source tree
    #[serde(skip)]
    pub index: usize,
    pub id: NodeId,
    pub line: usize,
    /// Ancestors excluding the root
    pub depth: usize,
    /// `None` for lines directly under the root
    pub parent_id: Option<NodeId>,
}

/// Depth-first document order, parents before children, root excluded.
///
/// Walks child links rather than arena order, so it is valid on a tree that
/// has been relinked but not yet renumbered.
pub fn flat(tree: &Tree) -> Vec<FlatItem> {
    let mut items = Vec::with_capacity(tree.nodes.len().saturating_sub(1));
    let mut stack: Vec<(usize, usize)> = tree.nodes[ROOT]
        .children
        .iter()
        .rev()
        .map(|&c| (c, 0))
        .collect();

    while let Some((index, depth)) = stack.pop() {
        let node = &tree.nodes[index];
        let parent_id = match node.parent {
            Some(p) if p != ROOT => Some(tree.nodes[p].id),
            _ => None,
        };
        items.push(FlatItem {
            index,
            id: node.id,
            line: node.line,
            depth,
            parent_id,
        });
        stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
    }
    items
}
