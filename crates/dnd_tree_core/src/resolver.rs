use crate::config::{Hooks, TreeConfig};
use crate::node::NodeId;
use crate::tree::Tree;

/// Vertical extent of a rendered row, in the same space as the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowBounds {
    pub top: f32,
    pub height: f32,
}

impl RowBounds {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn midpoint(&self) -> f32 {
        self.top + self.height / 2.
    }

    fn is_usable(&self) -> bool {
        self.top.is_finite() && self.height.is_finite() && self.height > 0.
    }
}

/// What the pointer is currently over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hovered {
    /// The tree container itself, outside any row.
    Root,
    Node(NodeId),
}

/// Where within a row the pointer sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
    Inside,
}

/// A resolved drop location: the future parent and the sibling-relative index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DropCandidate {
    pub parent_id: NodeId,
    pub index: usize,
}

impl DropCandidate {
    pub fn new(parent_id: impl Into<NodeId>, index: usize) -> Self {
        Self {
            parent_id: parent_id.into(),
            index,
        }
    }
}

/// Per-hover inputs that aren't part of the tree itself.
pub struct ResolveContext<'a, T> {
    pub config: &'a TreeConfig,
    pub hooks: &'a Hooks<T>,
    /// Whether the hovered row is currently expanded.
    pub expanded: bool,
}

/// Classify `pointer_y` against the window `[mid - threshold, mid + threshold]`.
pub fn hover_position(bounds: RowBounds, pointer_y: f32, threshold: f32) -> DropPosition {
    let mid = bounds.midpoint();
    let threshold = threshold.max(0.);
    if pointer_y < mid - threshold {
        DropPosition::Before
    } else if pointer_y > mid + threshold {
        DropPosition::After
    } else {
        DropPosition::Inside
    }
}

/// Map a hovered row and pointer position to a drop candidate.
///
/// - above the proximity window: before the row, in the row's parent;
/// - below it, or inside it on a non-droppable row: after the row;
/// - inside it on a droppable row: into the row, as first child when the row is expanded and
///   has children, appended otherwise.
///
/// Hovering the bare container appends to the root. Unknown rows and unusable bounds give
/// `None`. Validity is not checked here.
pub fn resolve_drop_target<T>(
    tree: &Tree<T>,
    hovered: &Hovered,
    bounds: RowBounds,
    pointer_y: f32,
    cx: &ResolveContext<'_, T>,
) -> Option<DropCandidate> {
    let mode = cx.config.mode();
    let droppable_first = cx.config.insert_droppable_first;

    let node = match hovered {
        Hovered::Root => {
            let root_id = tree.root_id();
            let count = tree.children_of(root_id).len();
            return Some(DropCandidate::new(root_id.clone(), count));
        }
        Hovered::Node(id) => tree.find(id)?,
    };

    if !bounds.is_usable() || !pointer_y.is_finite() {
        return None;
    }

    let sibling_index = || {
        tree.ordered_children(&node.parent, mode, droppable_first, cx.hooks)
            .iter()
            .position(|sibling| sibling.id == node.id)
    };

    match hover_position(bounds, pointer_y, cx.config.drop_target_offset) {
        DropPosition::Before => Some(DropCandidate::new(node.parent.clone(), sibling_index()?)),
        DropPosition::Inside if node.droppable => {
            let count = tree.children_of(&node.id).len();
            let index = if cx.expanded && count > 0 { 0 } else { count };
            Some(DropCandidate::new(node.id.clone(), index))
        }
        DropPosition::After | DropPosition::Inside => {
            Some(DropCandidate::new(node.parent.clone(), sibling_index()? + 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn tree() -> Tree {
        Tree::new(
            0,
            vec![
                Node::folder(1, 0, "Folder 1"),
                Node::new(2, 1, "File 1-1"),
                Node::new(3, 1, "File 1-2"),
                Node::new(5, 0, "File 5"),
                Node::folder(4, 0, "Folder 2"),
            ],
        )
    }

    fn resolve(tree: &Tree, id: i64, y: f32, expanded: bool) -> Option<DropCandidate> {
        let config = TreeConfig::default().sort(false).drop_target_offset(4.);
        let hooks = Hooks::default();
        let cx = ResolveContext {
            config: &config,
            hooks: &hooks,
            expanded,
        };
        resolve_drop_target(tree, &Hovered::Node(id.into()), RowBounds::new(100., 20.), y, &cx)
    }

    #[test]
    fn classifies_row_regions() {
        let bounds = RowBounds::new(0., 20.);
        assert_eq!(hover_position(bounds, 2., 4.), DropPosition::Before);
        assert_eq!(hover_position(bounds, 6., 4.), DropPosition::Inside);
        assert_eq!(hover_position(bounds, 14., 4.), DropPosition::Inside);
        assert_eq!(hover_position(bounds, 14.5, 4.), DropPosition::After);
        assert_eq!(hover_position(bounds, 10., 0.), DropPosition::Inside);
        assert_eq!(hover_position(bounds, 10.5, 0.), DropPosition::After);
    }

    #[test]
    fn before_and_after_use_parent_list() {
        let tree = tree();
        assert_eq!(resolve(&tree, 3, 101., false), Some(DropCandidate::new(1, 1)));
        assert_eq!(resolve(&tree, 3, 119., false), Some(DropCandidate::new(1, 2)));
        assert_eq!(resolve(&tree, 5, 101., false), Some(DropCandidate::new(0, 1)));
    }

    #[test]
    fn middle_of_leaf_degrades_to_after() {
        let tree = tree();
        assert_eq!(resolve(&tree, 5, 110., false), Some(DropCandidate::new(0, 2)));
    }

    #[test]
    fn middle_of_folder_descends() {
        let tree = tree();
        assert_eq!(resolve(&tree, 1, 110., false), Some(DropCandidate::new(1, 2)));
        assert_eq!(resolve(&tree, 1, 110., true), Some(DropCandidate::new(1, 0)));
        assert_eq!(resolve(&tree, 4, 110., true), Some(DropCandidate::new(4, 0)));
    }

    #[test]
    fn sorted_mode_indexes_by_display_order() {
        let tree = tree();
        let config = TreeConfig::default().drop_target_offset(4.);
        let hooks = Hooks::default();
        let cx = ResolveContext {
            config: &config,
            hooks: &hooks,
            expanded: false,
        };
        // Folders first: Folder 1, Folder 2, File 5.
        let candidate = resolve_drop_target(
            &tree,
            &Hovered::Node(5.into()),
            RowBounds::new(0., 20.),
            1.,
            &cx,
        );
        assert_eq!(candidate, Some(DropCandidate::new(0, 2)));
    }

    #[test]
    fn container_appends_to_root() {
        let tree = tree();
        let config = TreeConfig::default();
        let hooks = Hooks::default();
        let cx = ResolveContext {
            config: &config,
            hooks: &hooks,
            expanded: false,
        };
        let candidate =
            resolve_drop_target(&tree, &Hovered::Root, RowBounds::new(0., 0.), f32::NAN, &cx);
        assert_eq!(candidate, Some(DropCandidate::new(0, 3)));
    }

    #[test]
    fn unknown_row_or_bad_bounds_resolve_to_nothing() {
        let tree = tree();
        assert_eq!(resolve(&tree, 42, 110., false), None);

        let config = TreeConfig::default();
        let hooks = Hooks::default();
        let cx = ResolveContext {
            config: &config,
            hooks: &hooks,
            expanded: false,
        };
        let hovered = Hovered::Node(1.into());
        assert_eq!(
            resolve_drop_target(&tree, &hovered, RowBounds::new(0., 0.), 0., &cx),
            None
        );
        assert_eq!(
            resolve_drop_target(&tree, &hovered, RowBounds::new(0., 20.), f32::INFINITY, &cx),
            None
        );
    }
}
