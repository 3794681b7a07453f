use gpui_dnd_tree_core::{
    DragController, DragSource, DropCandidate, Hooks, Hovered, Node, NodeId, RowBounds, Tree,
    TreeConfig, TreeError,
};
use serde_json::{Value, json};

const ROW_HEIGHT: f32 = 20.;

fn tree() -> Tree {
    Tree::from_json(
        0,
        json!([
            { "id": 1, "parent": 0, "droppable": true, "text": "Folder 1" },
            { "id": 2, "parent": 1, "text": "File 1-1" },
            { "id": 3, "parent": 1, "text": "File 1-2" },
            { "id": 4, "parent": 0, "droppable": true, "text": "Folder 2" },
            { "id": 5, "parent": 4, "droppable": true, "text": "Folder 2-1" },
            { "id": 6, "parent": 0, "text": "File 3" }
        ]),
    )
    .unwrap()
}

fn indexed() -> DragController {
    DragController::new(TreeConfig::default().sort(false), Hooks::default())
}

fn source(tree: &Tree, id: i64) -> DragSource {
    DragSource::new(tree.find(&id.into()).unwrap().clone())
}

fn row(ix: usize) -> RowBounds {
    RowBounds::new(ix as f32 * ROW_HEIGHT, ROW_HEIGHT)
}

fn middle(ix: usize) -> f32 {
    row(ix).midpoint()
}

fn upper(ix: usize) -> f32 {
    row(ix).top + 1.
}

fn lower(ix: usize) -> f32 {
    row(ix).top + ROW_HEIGHT - 1.
}

fn parents(tree: &Tree) -> Vec<String> {
    tree.nodes()
        .iter()
        .map(|node| format!("{}@{}", node.id, node.parent))
        .collect()
}

#[test]
fn drag_file_into_other_folder() -> anyhow::Result<()> {
    let tree = tree();
    let mut controller = indexed();
    controller.begin(&tree, source(&tree, 2))?;

    let hovered = Hovered::Node(4.into());
    let candidate = controller.hover(&tree, &hovered, row(3), middle(3), true);
    assert_eq!(candidate, Some(DropCandidate::new(4, 0)));
    assert!(controller.session().is_showing_at(&4.into(), 0));

    let outcome = controller.release(&tree).expect("drop accepted");
    assert_eq!(parents(&outcome.tree), ["1@0", "3@1", "4@0", "2@4", "5@4", "6@0"]);
    assert_eq!(outcome.options.drag_source_id, NodeId::Int(2));
    assert_eq!(outcome.options.relative_index, Some(0));
    assert!(!controller.session().is_visible());
    assert!(!controller.is_dragging());
    Ok(())
}

#[test]
fn last_hover_wins() {
    let tree = tree();
    let mut controller = indexed();
    controller.begin(&tree, source(&tree, 6)).unwrap();

    controller.hover(&tree, &Hovered::Node(1.into()), row(0), middle(0), false);
    assert!(controller.session().is_showing_at(&1.into(), 2));
    controller.hover(&tree, &Hovered::Node(3.into()), row(2), upper(2), false);
    assert!(controller.session().is_showing_at(&1.into(), 1));

    let outcome = controller.release(&tree).unwrap();
    assert_eq!(parents(&outcome.tree), ["1@0", "2@1", "6@1", "3@1", "4@0", "5@4"]);
}

#[test]
fn hover_onto_own_descendant_hides_placeholder() {
    let tree = tree();
    let mut controller = indexed();
    controller.begin(&tree, source(&tree, 6)).unwrap();
    controller.hover(&tree, &Hovered::Node(4.into()), row(3), middle(3), false);
    assert!(controller.session().is_visible());
    controller.cancel();

    controller.begin(&tree, source(&tree, 4)).unwrap();
    let candidate = controller.hover(&tree, &Hovered::Node(5.into()), row(4), middle(4), false);
    assert_eq!(candidate, None);
    assert!(!controller.session().is_visible());
    assert_eq!(controller.release(&tree), None);
}

#[test]
fn sibling_hover_is_refused_by_default() {
    let tree = tree();
    let mut controller = indexed();
    controller.begin(&tree, source(&tree, 3)).unwrap();
    let candidate = controller.hover(&tree, &Hovered::Node(2.into()), row(1), upper(1), false);
    assert_eq!(candidate, None);
}

#[test]
fn idempotent_hover() {
    let tree = tree();
    let mut controller = indexed();
    controller.begin(&tree, source(&tree, 2)).unwrap();
    let hovered = Hovered::Node(6.into());
    let first = controller.hover(&tree, &hovered, row(5), lower(5), false);
    let session = controller.session().clone();
    let second = controller.hover(&tree, &hovered, row(5), lower(5), false);
    assert_eq!(first, Some(DropCandidate::new(0, 3)));
    assert_eq!(first, second);
    assert_eq!(&session, controller.session());
}

#[test]
fn cancel_clears_without_mutation() {
    let tree = tree();
    let mut controller = indexed();
    controller.begin(&tree, source(&tree, 2)).unwrap();
    controller.hover(&tree, &Hovered::Node(4.into()), row(3), middle(3), false);
    controller.cancel();
    assert!(!controller.session().is_visible());
    assert_eq!(controller.release(&tree), None);
    assert!(controller.begin(&tree, source(&tree, 3)).is_ok());
}

#[test]
fn release_without_target_is_a_noop() {
    let tree = tree();
    let mut controller = indexed();
    controller.begin(&tree, source(&tree, 2)).unwrap();
    controller.hover(&tree, &Hovered::Node(4.into()), row(3), middle(3), false);
    controller.leave();
    assert_eq!(controller.release(&tree), None);
    assert!(!controller.is_dragging());
}

#[test]
fn one_drag_at_a_time_and_lock() {
    let tree = tree();
    let mut controller = indexed();
    controller.begin(&tree, source(&tree, 2)).unwrap();
    assert_eq!(
        controller.begin(&tree, source(&tree, 3)),
        Err(TreeError::DragInProgress)
    );
    controller.cancel();

    controller.lock();
    assert!(controller.is_locked());
    assert_eq!(controller.begin(&tree, source(&tree, 3)), Err(TreeError::DragLocked));
    controller.unlock();
    assert!(controller.begin(&tree, source(&tree, 3)).is_ok());
}

#[test]
fn can_drag_hook_rejects_members_only() {
    let tree = tree();
    let hooks: Hooks = Hooks::new().can_drag(|node| !node.droppable);
    let mut controller = DragController::new(TreeConfig::default(), hooks);
    assert_eq!(
        controller.begin(&tree, source(&tree, 1)),
        Err(TreeError::DragRejected { id: 1.into() })
    );

    let foreign = DragSource::new(Node::<Value>::folder("ext", 99, "External folder"));
    assert!(controller.begin(&tree, foreign).is_ok());
}

#[test]
fn hover_without_drag_resolves_nothing() {
    let tree = tree();
    let mut controller = indexed();
    let candidate = controller.hover(&tree, &Hovered::Node(1.into()), row(0), middle(0), false);
    assert_eq!(candidate, None);
}

#[test]
fn foreign_node_lands_in_folder() {
    let tree = tree();
    let mut controller = indexed();
    let foreign = DragSource::new(Node::<Value>::new("ext", "other-tree", "Imported"));
    controller.begin(&tree, foreign).unwrap();

    controller.hover(&tree, &Hovered::Node(1.into()), row(0), middle(0), true);
    let outcome = controller.release(&tree).unwrap();
    let node = outcome.tree.find(&"ext".into()).unwrap();
    assert_eq!(node.parent, NodeId::Int(1));
    assert_eq!(
        parents(&outcome.tree),
        ["1@0", "ext@1", "2@1", "3@1", "4@0", "5@4", "6@0"]
    );
    assert_eq!(tree.len(), 6);
}

#[test]
fn foreign_node_dropped_on_container_appends_to_root() {
    let tree = tree();
    let mut controller: DragController = DragController::default();
    let foreign = DragSource::new(Node::<Value>::new("ext", "other-tree", "Imported"));
    controller.begin(&tree, foreign).unwrap();

    let candidate = controller.hover(&tree, &Hovered::Root, RowBounds::new(0., 0.), 0., false);
    assert_eq!(candidate, Some(DropCandidate::new(0, 3)));
    let outcome = controller.release(&tree).unwrap();
    assert_eq!(outcome.tree.find(&"ext".into()).map(|n| &n.parent), Some(&NodeId::Int(0)));
    assert_eq!(outcome.options.destination_index, None);
}

#[test]
fn release_rechecks_against_new_tree() {
    let tree = tree();
    let mut controller = indexed();
    controller.begin(&tree, source(&tree, 2)).unwrap();
    controller.hover(&tree, &Hovered::Node(4.into()), row(3), middle(3), false);

    let mut nodes = tree.clone().into_nodes();
    nodes.retain(|node| node.id != NodeId::Int(2));
    nodes.push(Node::new(2, 4, "File 1-1"));
    let changed = Tree::new(0, nodes);
    assert_eq!(controller.release(&changed), None);
}
