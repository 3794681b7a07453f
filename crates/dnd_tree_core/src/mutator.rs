use serde_json::Value;

use crate::config::OrderMode;
use crate::node::{DragSource, Node, NodeId};
use crate::tree::Tree;

/// Details of an applied drop, handed to the host with the new tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DropOptions<T = Value> {
    pub drag_source_id: NodeId,
    pub drop_target_id: NodeId,
    /// The dragged node as it was before the drop.
    pub drag_source: Node<T>,
    /// `None` when dropped onto the root.
    pub drop_target: Option<Node<T>>,
    /// Absolute position of the moved node in the new sequence. Indexed mode only.
    pub destination_index: Option<usize>,
    /// The sibling-relative index the drop was resolved to. Indexed mode only.
    pub relative_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome<T = Value> {
    pub tree: Tree<T>,
    pub options: DropOptions<T>,
}

/// Apply a drop and return the resulting tree. `tree` is left untouched.
///
/// A foreign source is appended to a working copy first so both modes treat it like any
/// other member.
///
/// In [`OrderMode::Sorted`] the source is only reparented. In [`OrderMode::Indexed`] it is
/// also moved so that it becomes the `index`-th child of `drop_target_id` (counted in the
/// list that still contains the source). An `index` past the last child, or `None`, appends.
pub fn apply_drop<T: Clone>(
    tree: &Tree<T>,
    drag_source: &DragSource<T>,
    drop_target_id: &NodeId,
    mode: OrderMode,
    index: Option<usize>,
) -> DropOutcome<T> {
    let source_id = drag_source.id();
    let mut nodes = tree.nodes().to_vec();
    if !tree.contains(source_id) {
        nodes.push(drag_source.node().clone());
    }

    let original = tree
        .find(source_id)
        .cloned()
        .unwrap_or_else(|| drag_source.node().clone());

    let mut options = DropOptions {
        drag_source_id: source_id.clone(),
        drop_target_id: drop_target_id.clone(),
        drag_source: original,
        drop_target: tree.find(drop_target_id).cloned(),
        destination_index: None,
        relative_index: None,
    };

    match mode {
        OrderMode::Sorted => {
            for node in nodes.iter_mut().filter(|node| node.id == *source_id) {
                node.parent = drop_target_id.clone();
            }
        }
        OrderMode::Indexed => {
            let relative = index.unwrap_or(usize::MAX);
            if let Some((src_ix, dest_ix)) =
                modified_indices(&nodes, source_id, drop_target_id, relative)
            {
                let moved = nodes.remove(src_ix);
                let dest_ix = dest_ix.min(nodes.len());
                nodes.insert(dest_ix, moved.reparented(drop_target_id));
                options.destination_index = Some(dest_ix);
            }
            options.relative_index = index;
        }
    }

    tracing::debug!(
        source = %source_id,
        target = %drop_target_id,
        ?mode,
        index = ?options.destination_index,
        "applied drop"
    );

    DropOutcome {
        tree: Tree::new(tree.root_id().clone(), nodes),
        options,
    }
}

/// Absolute sequence position that makes a node the `index`-th child of `parent_id`.
///
/// Siblings are counted in sequence order. An index past the last sibling lands right after
/// it; a parent without children appends to the sequence.
pub fn destination_index<T>(nodes: &[Node<T>], parent_id: &NodeId, index: usize) -> usize {
    let mut last = None;
    let mut seen = 0;
    for (ix, node) in nodes.iter().enumerate() {
        if node.parent != *parent_id {
            continue;
        }
        if seen == index {
            return ix;
        }
        seen += 1;
        last = Some(ix);
    }
    last.map_or(nodes.len(), |ix| ix + 1)
}

/// `(source position, destination position)` with the destination already shifted for the
/// removal of the source.
fn modified_indices<T>(
    nodes: &[Node<T>],
    source_id: &NodeId,
    parent_id: &NodeId,
    index: usize,
) -> Option<(usize, usize)> {
    let src_ix = nodes.iter().position(|node| node.id == *source_id)?;
    let mut dest_ix = destination_index(nodes, parent_id, index);
    if dest_ix > src_ix {
        dest_ix -= 1;
    }
    Some((src_ix, dest_ix))
}
