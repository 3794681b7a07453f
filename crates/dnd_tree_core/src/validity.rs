use crate::config::{CanDropArgs, Hooks, Verdict};
use crate::node::NodeId;
use crate::tree::Tree;

/// Decide whether dropping `drag_source_id` onto `drop_target_id` is legal.
///
/// With no active drag (`drag_source_id == None`) this answers whether the target may
/// act as a landing zone at all: the root always can, other nodes only when droppable.
///
/// With an active drag, a `can_drop` hook that answers [`Verdict::Allow`] or
/// [`Verdict::Deny`] wins outright. Otherwise the built-in rules apply:
/// - a node can't be dropped onto itself;
/// - a foreign source (not in `tree`) is accepted by the root and by droppable nodes;
/// - a target that is not in `tree` is the root, which refuses its own direct children;
/// - a target refuses its own direct children and is refused when not droppable;
/// - a target inside the source's subtree is refused.
///
/// Only `tree.root_id()` and ids of member nodes are meaningful targets. Any other id is
/// answered as if it were the root, so a stale id can pass and [`crate::apply_drop`] would
/// then reparent under it.
pub fn is_droppable<T>(
    tree: &Tree<T>,
    drag_source_id: Option<&NodeId>,
    drop_target_id: &NodeId,
    hooks: &Hooks<T>,
) -> bool {
    let Some(drag_source_id) = drag_source_id else {
        if tree.is_root(drop_target_id) {
            return true;
        }
        return tree.find(drop_target_id).is_some_and(|node| node.droppable);
    };

    let drag_source = tree.find(drag_source_id);
    let drop_target = tree.find(drop_target_id);

    match hooks.check_drop(&CanDropArgs {
        tree,
        drag_source_id,
        drop_target_id,
        drag_source,
        drop_target,
    }) {
        Verdict::Allow => return true,
        Verdict::Deny => return false,
        Verdict::Defer => {}
    }

    if drag_source_id == drop_target_id {
        return false;
    }

    let Some(drag_source) = drag_source else {
        return tree.is_root(drop_target_id) || drop_target.is_some_and(|node| node.droppable);
    };

    let Some(drop_target) = drop_target else {
        return !tree.is_root(&drag_source.parent);
    };

    if drag_source.parent == *drop_target_id || !drop_target.droppable {
        return false;
    }

    !tree.is_ancestor(drag_source_id, drop_target_id)
}

/// Whether the node `id` may start a drag. Unknown ids can't.
pub fn can_drag<T>(tree: &Tree<T>, id: &NodeId, hooks: &Hooks<T>) -> bool {
    tree.find(id).is_some_and(|node| hooks.check_drag(node))
}
