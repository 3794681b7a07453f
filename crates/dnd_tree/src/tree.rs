use std::{collections::HashSet, ops::Range, rc::Rc};

use gpui::{
    AnyView, App, AppContext as _, Context, ElementId, Entity, EntityId, FocusHandle,
    InteractiveElement as _, IntoElement, ListSizingBehavior, ParentElement as _, Pixels, Point,
    Render, RenderOnce, SharedString, StatefulInteractiveElement as _, StyleRefinement, Styled,
    UniformListScrollHandle, Window, div, prelude::FluentBuilder as _, px, uniform_list,
};
use gpui_component::list::ListItem;
use gpui_component::scroll::{Scrollbar, ScrollbarState};
use gpui_component::{ActiveTheme as _, StyledExt as _};
use gpui_dnd_tree_core::{
    DragController, DragSource, DropCandidate, DropOutcome, Hooks, Hovered, InitialOpen, Node,
    NodeId, RowBounds, Tree, TreeConfig, can_drag,
};

const CONTEXT: &str = "DndTree";
const DEFAULT_ROW_HEIGHT: f32 = 28.;

type RenderItem =
    Rc<dyn Fn(usize, &DndTreeEntry, DndTreeRowState, &mut Window, &mut App) -> ListItem>;
type DropHandler = Rc<dyn Fn(&DropOutcome, &mut Window, &mut App)>;
type OpenHandler = Rc<dyn Fn(&[NodeId], &mut App)>;
type DragHandler = Rc<dyn Fn(&Node, &mut Window, &mut App)>;
type DragPreview = Rc<dyn Fn(&Node, &mut Window, &mut App) -> AnyView>;

/// Create a [`DndTree`].
pub fn dnd_tree<R>(state: &Entity<DndTreeState>, render_item: R) -> DndTree
where
    R: Fn(usize, &DndTreeEntry, DndTreeRowState, &mut Window, &mut App) -> ListItem + 'static,
{
    DndTree::new(state, render_item)
}

/// gpui drag payload. A payload whose `tree_id` is another tree is a foreign source here.
#[derive(Clone)]
pub struct DndTreeDrag {
    tree_id: EntityId,
    node: Node,
}

impl DndTreeDrag {
    /// A payload that doesn't belong to any tree, for external drag sources.
    pub fn external(owner: EntityId, node: Node) -> Self {
        Self {
            tree_id: owner,
            node,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }
}

/// The view that follows the pointer during a drag. Shows the node text unless a custom
/// preview was supplied.
pub struct DragGhost {
    label: SharedString,
    preview: Option<AnyView>,
}

impl DragGhost {
    pub fn new(label: impl Into<SharedString>) -> Self {
        Self {
            label: label.into(),
            preview: None,
        }
    }

    fn with_preview(label: impl Into<SharedString>, preview: Option<AnyView>) -> Self {
        Self {
            label: label.into(),
            preview,
        }
    }
}

impl Render for DragGhost {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if let Some(preview) = self.preview.clone() {
            return preview.into_any_element();
        }

        let theme = cx.theme();
        div()
            .px(px(10.))
            .py(px(6.))
            .rounded(px(8.))
            .bg(theme.popover)
            .border_1()
            .border_color(theme.border)
            .shadow_md()
            .text_color(theme.popover_foreground)
            .text_sm()
            .child(self.label.clone())
            .into_any_element()
    }
}

/// A visible row: a node and its depth below the root.
#[derive(Clone, Debug, PartialEq)]
pub struct DndTreeEntry {
    node: Node,
    depth: usize,
    has_children: bool,
    expanded: bool,
}

impl DndTreeEntry {
    #[inline]
    pub fn node(&self) -> &Node {
        &self.node
    }

    #[inline]
    pub fn id(&self) -> &NodeId {
        &self.node.id
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn is_droppable(&self) -> bool {
        self.node.droppable
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.has_children
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DndTreeRowState {
    pub selected: bool,
    pub dragging: bool,
    /// The row is the parent the dragged node would land in.
    pub drop_target: bool,
}

/// Gap between visible rows where the placeholder line is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PlaceholderLine {
    row: usize,
    depth: usize,
}

/// State for a drag-and-drop tree over a flat [`Tree`].
pub struct DndTreeState {
    focus_handle: FocusHandle,
    tree: Tree,
    open_ids: HashSet<NodeId>,
    entries: Vec<DndTreeEntry>,
    controller: DragController,
    indent_width: Pixels,
    indent_offset: Pixels,
    scrollbar_state: ScrollbarState,
    scroll_handle: UniformListScrollHandle,
    selected_id: Option<NodeId>,
    /// The node of a drag started from this tree, until that drag ends.
    dragged: Option<Node>,
    on_drop: Option<DropHandler>,
    on_change_open: Option<OpenHandler>,
    on_drag_start: Option<DragHandler>,
    on_drag_end: Option<DragHandler>,
    drag_preview: Option<DragPreview>,
    render_item: RenderItem,
}

impl DndTreeState {
    pub fn new(cx: &mut App) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            tree: Tree::new(0, Vec::new()),
            open_ids: HashSet::new(),
            entries: Vec::new(),
            controller: DragController::default(),
            indent_width: px(16.),
            indent_offset: px(0.),
            scrollbar_state: ScrollbarState::default(),
            scroll_handle: UniformListScrollHandle::default(),
            selected_id: None,
            dragged: None,
            on_drop: None,
            on_change_open: None,
            on_drag_start: None,
            on_drag_end: None,
            drag_preview: None,
            render_item: Rc::new(|_, _, _, _, _| ListItem::new("dnd-tree-empty")),
        }
    }

    /// Indentation per depth level of the placeholder line.
    ///
    /// This should match the indentation used by your row renderer.
    pub fn indent_width(mut self, indent_width: Pixels) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Left offset of the placeholder line. Purely visual.
    pub fn indent_offset(mut self, indent_offset: Pixels) -> Self {
        self.indent_offset = indent_offset;
        self
    }

    pub fn config(mut self, config: TreeConfig) -> Self {
        self.controller.set_config(config);
        self.reset_open_ids();
        self.rebuild_entries();
        self
    }

    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.controller.set_hooks(hooks);
        self.rebuild_entries();
        self
    }

    pub fn initial_open(mut self, initial_open: InitialOpen) -> Self {
        let config = self.controller.config().clone().initial_open(initial_open);
        self.controller.set_config(config);
        self.reset_open_ids();
        self.rebuild_entries();
        self
    }

    pub fn nodes(mut self, tree: Tree) -> Self {
        self.tree = tree;
        self.reset_open_ids();
        self.rebuild_entries();
        self
    }

    /// Called with the new tree after every accepted drop.
    pub fn on_drop<F>(mut self, on_drop: F) -> Self
    where
        F: Fn(&DropOutcome, &mut Window, &mut App) + 'static,
    {
        self.on_drop = Some(Rc::new(on_drop));
        self
    }

    /// Called with the open ids whenever a node is opened or closed.
    pub fn on_change_open<F>(mut self, on_change_open: F) -> Self
    where
        F: Fn(&[NodeId], &mut App) + 'static,
    {
        self.on_change_open = Some(Rc::new(on_change_open));
        self
    }

    /// Called when a drag starts from one of this tree's rows.
    pub fn on_drag_start<F>(mut self, on_drag_start: F) -> Self
    where
        F: Fn(&Node, &mut Window, &mut App) + 'static,
    {
        self.on_drag_start = Some(Rc::new(on_drag_start));
        self
    }

    /// Called when a drag started from this tree ends, dropped or not.
    pub fn on_drag_end<F>(mut self, on_drag_end: F) -> Self
    where
        F: Fn(&Node, &mut Window, &mut App) + 'static,
    {
        self.on_drag_end = Some(Rc::new(on_drag_end));
        self
    }

    /// Custom view to follow the pointer while a row is dragged. Defaults to a [`DragGhost`].
    pub fn drag_preview<F>(mut self, drag_preview: F) -> Self
    where
        F: Fn(&Node, &mut Window, &mut App) -> AnyView + 'static,
    {
        self.drag_preview = Some(Rc::new(drag_preview));
        self
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Replace the tree. Open nodes that still exist stay open.
    pub fn set_tree(&mut self, tree: Tree, cx: &mut Context<Self>) {
        self.tree = tree;
        self.open_ids.retain(|id| self.tree.contains(id));
        if self
            .selected_id
            .as_ref()
            .is_some_and(|id| !self.tree.contains(id))
        {
            self.selected_id = None;
        }
        self.controller.cancel();
        self.rebuild_entries();
        cx.notify();
    }

    pub fn entries(&self) -> &[DndTreeEntry] {
        &self.entries
    }

    pub fn selected_id(&self) -> Option<&NodeId> {
        self.selected_id.as_ref()
    }

    pub fn selected_entry(&self) -> Option<&DndTreeEntry> {
        let id = self.selected_id.as_ref()?;
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Open ids in tree order.
    pub fn open_ids(&self) -> Vec<NodeId> {
        self.tree
            .nodes()
            .iter()
            .filter(|node| self.open_ids.contains(&node.id))
            .map(|node| node.id.clone())
            .collect()
    }

    pub fn is_open(&self, id: &NodeId) -> bool {
        self.open_ids.contains(id)
    }

    pub fn toggle(&mut self, id: &NodeId, cx: &mut Context<Self>) {
        if !self.open_ids.remove(id) {
            self.open_ids.insert(id.clone());
        }
        self.open_changed(cx);
    }

    pub fn open(&mut self, ids: impl IntoIterator<Item = NodeId>, cx: &mut Context<Self>) {
        self.open_ids.extend(ids);
        self.open_changed(cx);
    }

    pub fn close(&mut self, ids: impl IntoIterator<Item = NodeId>, cx: &mut Context<Self>) {
        for id in ids {
            self.open_ids.remove(&id);
        }
        self.open_changed(cx);
    }

    pub fn open_all(&mut self, cx: &mut Context<Self>) {
        self.open_ids = self.tree.droppable_ids().into_iter().collect();
        self.open_changed(cx);
    }

    pub fn close_all(&mut self, cx: &mut Context<Self>) {
        self.open_ids.clear();
        self.open_changed(cx);
    }

    /// Refuse new drags, e.g. while a row is being renamed.
    pub fn set_drag_locked(&mut self, locked: bool) {
        if locked {
            self.controller.lock();
        } else {
            self.controller.unlock();
        }
    }

    fn open_changed(&mut self, cx: &mut Context<Self>) {
        self.rebuild_entries();
        if let Some(on_change_open) = self.on_change_open.clone() {
            let open_ids = self.open_ids();
            on_change_open(&open_ids, cx);
        }
        cx.notify();
    }

    fn reset_open_ids(&mut self) {
        self.open_ids = initial_open_ids(&self.tree, &self.controller.config().initial_open);
    }

    fn rebuild_entries(&mut self) {
        self.entries = visible_rows(
            &self.tree,
            &self.open_ids,
            self.controller.config(),
            self.controller.hooks(),
        );
    }

    fn row_height(&self) -> Pixels {
        self.scroll_handle
            .0
            .borrow()
            .last_item_size
            .map(|s| s.item.height)
            .unwrap_or(px(DEFAULT_ROW_HEIGHT))
    }

    fn scroll_y(&self) -> Pixels {
        self.scroll_handle.0.borrow().base_handle.offset().y
    }

    fn on_entry_click(
        &mut self,
        ix: usize,
        _event: &gpui::ClickEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let Some(entry) = self.entries.get(ix) else {
            return;
        };
        let id = entry.id().clone();
        let droppable = entry.is_droppable();
        self.selected_id = Some(id.clone());
        if droppable {
            self.toggle(&id, cx);
        } else {
            cx.notify();
        }
    }

    fn begin_row_drag(
        &mut self,
        drag: &DndTreeDrag,
        _cursor_offset: Point<Pixels>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.end_drag(window, cx);
        if start_drag(&mut self.controller, &self.tree, &drag.node) {
            self.selected_id = Some(drag.node.id.clone());
            self.dragged = Some(drag.node.clone());
            if let Some(on_drag_start) = self.on_drag_start.clone() {
                on_drag_start(&drag.node, window, cx);
            }
        }
        cx.notify();
    }

    fn end_drag(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if let Some(node) = self.dragged.take() {
            self.notify_drag_end(&node, window, cx);
        }
    }

    fn notify_drag_end(&self, node: &Node, window: &mut Window, cx: &mut Context<Self>) {
        if let Some(on_drag_end) = self.on_drag_end.clone() {
            on_drag_end(node, window, cx);
        }
    }

    /// A drag from another tree or an external source starts being tracked on first hover.
    fn adopt_foreign_drag(&mut self, drag: &DndTreeDrag, cx: &Context<Self>) {
        if self.controller.is_dragging() || drag.tree_id == cx.entity_id() {
            return;
        }
        if let Err(err) = self
            .controller
            .begin(&self.tree, DragSource::new(drag.node.clone()))
        {
            tracing::debug!(%err, "foreign drag refused");
        }
    }

    fn hover(
        &mut self,
        hovered: Hovered,
        bounds: RowBounds,
        pointer_y: f32,
        expanded: bool,
        cx: &mut Context<Self>,
    ) {
        let before = self.controller.session().clone();
        self.controller
            .hover(&self.tree, &hovered, bounds, pointer_y, expanded);
        if *self.controller.session() != before {
            cx.notify();
        }
    }

    fn on_drag_move(
        &mut self,
        event: &gpui::DragMoveEvent<DndTreeDrag>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !cx.has_active_drag() {
            return;
        }

        let mouse_position = event.event.position;
        let list_bounds = event.bounds;
        if !list_bounds.contains(&mouse_position) {
            if self.controller.session().is_visible() {
                self.controller.leave();
                cx.notify();
            }
            return;
        }

        let drag = event.drag(cx).clone();
        self.adopt_foreign_drag(&drag, cx);

        // Rows handle their own hover; only the empty area below them is the root.
        let rows_bottom = self.row_height() * self.entries.len() + self.scroll_y();
        if mouse_position.y - list_bounds.origin.y < rows_bottom {
            return;
        }
        self.hover(Hovered::Root, RowBounds::new(0., 0.), 0., false, cx);
    }

    fn on_row_drag_move(
        &mut self,
        row_ix: usize,
        event: &gpui::DragMoveEvent<DndTreeDrag>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !cx.has_active_drag() {
            return;
        }

        let mouse_position = event.event.position;
        if !event.bounds.contains(&mouse_position) {
            return;
        }
        let Some(entry) = self.entries.get(row_ix) else {
            return;
        };
        let hovered = Hovered::Node(entry.id().clone());
        let expanded = entry.is_expanded();

        let drag = event.drag(cx).clone();
        self.adopt_foreign_drag(&drag, cx);

        let bounds = RowBounds::new(0., event.bounds.size.height / px(1.));
        let pointer_y = (mouse_position.y - event.bounds.origin.y) / px(1.);
        self.hover(hovered, bounds, pointer_y, expanded, cx);
    }

    fn handle_drop(&mut self, _drag: &DndTreeDrag, window: &mut Window, cx: &mut Context<Self>) {
        let released = self.controller.release(&self.tree);
        self.end_drag(window, cx);
        let Some(outcome) = released else {
            cx.notify();
            return;
        };

        let target_id = outcome.options.drop_target_id.clone();
        self.tree = outcome.tree.clone();
        self.selected_id = Some(outcome.options.drag_source_id.clone());
        if !self.tree.is_root(&target_id) && !self.open_ids.contains(&target_id) {
            self.open_ids.insert(target_id);
            self.open_changed(cx);
        } else {
            self.rebuild_entries();
        }

        if let Some(on_drop) = self.on_drop.clone() {
            on_drop(&outcome, window, cx);
        }
        cx.notify();
    }
}

impl Render for DndTreeState {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if !cx.has_active_drag() {
            if self.controller.is_dragging() {
                self.controller.cancel();
            }
            if let Some(node) = self.dragged.take() {
                cx.defer_in(window, move |this, window, cx| {
                    this.notify_drag_end(&node, window, cx);
                });
            }
        }

        let render_item = Rc::clone(&self.render_item);
        let state_entity = cx.entity();
        let row_height = self.row_height();
        let scroll_y = self.scroll_y();

        let line = self
            .controller
            .session()
            .candidate()
            .and_then(|candidate| placeholder_line(&self.entries, self.tree.root_id(), &candidate))
            .map(|line| {
                let theme = cx.theme();
                div()
                    .absolute()
                    .left(self.indent_offset + self.indent_width * line.depth)
                    .right_0()
                    .top(row_height * line.row + scroll_y)
                    .h(px(2.))
                    .bg(theme.drag_border)
            });

        div()
            .id("dnd-tree-state")
            .size_full()
            .relative()
            .child(
                uniform_list("entries", self.entries.len(), {
                    cx.processor(move |state, visible_range: Range<usize>, window, cx| {
                        let drop_target_bg = cx.theme().drop_target;
                        let candidate = state.controller.session().candidate();
                        let dragged_id = state.controller.source().map(|s| s.id().clone());
                        let mut items = Vec::with_capacity(visible_range.len());
                        for ix in visible_range {
                            let entry = &state.entries[ix];
                            let selected = state.selected_id.as_ref() == Some(entry.id());
                            let dragging = dragged_id.as_ref() == Some(entry.id())
                                && cx.has_active_drag();
                            let drop_target = candidate
                                .as_ref()
                                .is_some_and(|c| c.parent_id == *entry.id());

                            let row_state = DndTreeRowState {
                                selected,
                                dragging,
                                drop_target,
                            };

                            let item = (render_item)(ix, entry, row_state, window, cx);
                            let draggable =
                                row_draggable(&state.tree, entry.id(), &state.controller);
                            let drag_value = DndTreeDrag {
                                tree_id: cx.entity_id(),
                                node: entry.node().clone(),
                            };

                            let row = div()
                                .id(ix)
                                .when(drop_target, |this| this.bg(drop_target_bg))
                                .child(item.selected(selected))
                                .on_drag_move::<DndTreeDrag>(cx.listener(
                                    move |this, ev, window, cx| {
                                        this.on_row_drag_move(ix, ev, window, cx);
                                    },
                                ))
                                .on_drop::<DndTreeDrag>(cx.listener(Self::handle_drop))
                                .on_click(cx.listener(move |this, click_event, window, cx| {
                                    this.on_entry_click(ix, click_event, window, cx);
                                }))
                                .when(draggable, |this| {
                                    let state_entity = state_entity.clone();
                                    this.on_drag(
                                        drag_value,
                                        move |drag, cursor_offset, window, cx| {
                                            let drag_preview =
                                                state_entity.update(cx, |state, cx| {
                                                    state.begin_row_drag(
                                                        drag,
                                                        cursor_offset,
                                                        window,
                                                        cx,
                                                    );
                                                    state.drag_preview.clone()
                                                });
                                            let preview = drag_preview
                                                .map(|preview| preview(&drag.node, window, cx));
                                            let label = drag.node.text.clone();
                                            cx.new(|_| DragGhost::with_preview(label, preview))
                                        },
                                    )
                                });

                            items.push(row);
                        }
                        items
                    })
                })
                .on_drag_move::<DndTreeDrag>(cx.listener(Self::on_drag_move))
                .on_drop::<DndTreeDrag>(cx.listener(Self::handle_drop))
                .flex_grow()
                .size_full()
                .track_scroll(self.scroll_handle.clone())
                .with_sizing_behavior(ListSizingBehavior::Auto)
                .into_any_element(),
            )
            .child(
                div()
                    .absolute()
                    .top_0()
                    .right_0()
                    .bottom_0()
                    .w(px(12.))
                    .child(Scrollbar::uniform_scroll(
                        &self.scrollbar_state,
                        &self.scroll_handle,
                    )),
            )
            .when_some(line, |this, line| this.child(line))
    }
}

/// A draggable tree view element over a [`DndTreeState`].
#[derive(IntoElement)]
pub struct DndTree {
    id: ElementId,
    state: Entity<DndTreeState>,
    style: StyleRefinement,
    render_item: RenderItem,
}

impl DndTree {
    pub fn new<R>(state: &Entity<DndTreeState>, render_item: R) -> Self
    where
        R: Fn(usize, &DndTreeEntry, DndTreeRowState, &mut Window, &mut App) -> ListItem + 'static,
    {
        Self {
            id: ElementId::Name(format!("dnd-tree-{}", state.entity_id()).into()),
            state: state.clone(),
            style: StyleRefinement::default(),
            render_item: Rc::new(render_item),
        }
    }
}

impl Styled for DndTree {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl RenderOnce for DndTree {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let focus_handle = self.state.read(cx).focus_handle.clone();
        self.state
            .update(cx, |state, _| state.render_item = self.render_item);

        div()
            .id(self.id)
            .key_context(CONTEXT)
            .track_focus(&focus_handle)
            .size_full()
            .child(self.state)
            .refine_style(&self.style)
    }
}

/// Rows of a locked tree expose no drag at all, so no other tree can pick one up either.
fn row_draggable(tree: &Tree, id: &NodeId, controller: &DragController) -> bool {
    !controller.is_locked() && can_drag(tree, id, controller.hooks())
}

/// Begin a gesture from a row of `tree`. A gesture that ended outside every tree never
/// saw a release, so a stale one is dropped first.
fn start_drag(controller: &mut DragController, tree: &Tree, node: &Node) -> bool {
    if controller.is_dragging() {
        controller.cancel();
    }
    match controller.begin(tree, DragSource::new(node.clone())) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(%err, "drag not started");
            false
        }
    }
}

fn initial_open_ids(tree: &Tree, initial_open: &InitialOpen) -> HashSet<NodeId> {
    match initial_open {
        InitialOpen::All(true) => tree.droppable_ids().into_iter().collect(),
        InitialOpen::All(false) => HashSet::new(),
        InitialOpen::Ids(ids) => ids.iter().cloned().collect(),
    }
}

/// Depth-first rows in display order, descending only into open nodes.
fn visible_rows(
    tree: &Tree,
    open_ids: &HashSet<NodeId>,
    config: &TreeConfig,
    hooks: &Hooks,
) -> Vec<DndTreeEntry> {
    let mut rows = RowCollector {
        tree,
        open_ids,
        config,
        hooks,
        seen: HashSet::new(),
        rows: Vec::with_capacity(tree.len()),
    };
    rows.push_children(tree.root_id(), 0);
    rows.rows
}

struct RowCollector<'a> {
    tree: &'a Tree,
    open_ids: &'a HashSet<NodeId>,
    config: &'a TreeConfig,
    hooks: &'a Hooks,
    seen: HashSet<NodeId>,
    rows: Vec<DndTreeEntry>,
}

impl RowCollector<'_> {
    fn push_children(&mut self, parent_id: &NodeId, depth: usize) {
        let tree = self.tree;
        let children = tree.ordered_children(
            parent_id,
            self.config.mode(),
            self.config.insert_droppable_first,
            self.hooks,
        );
        for node in children {
            // Duplicate ids would otherwise repeat whole subtrees.
            if !self.seen.insert(node.id.clone()) {
                continue;
            }
            let expanded = self.open_ids.contains(&node.id);
            self.rows.push(DndTreeEntry {
                node: node.clone(),
                depth,
                has_children: tree.has_children(&node.id),
                expanded,
            });
            if expanded {
                self.push_children(&node.id, depth + 1);
            }
        }
    }
}

/// Where the placeholder for `candidate` sits among the visible rows.
///
/// `None` when the target parent is collapsed or not visible; the row highlight is the only
/// feedback then.
fn placeholder_line(
    entries: &[DndTreeEntry],
    root_id: &NodeId,
    candidate: &DropCandidate,
) -> Option<PlaceholderLine> {
    let (first_row, depth) = if candidate.parent_id == *root_id {
        (0, 0)
    } else {
        let parent_ix = entries
            .iter()
            .position(|entry| *entry.id() == candidate.parent_id)?;
        let parent = &entries[parent_ix];
        if !parent.is_expanded() {
            return None;
        }
        (parent_ix + 1, parent.depth() + 1)
    };

    let mut seen = 0;
    let mut row = first_row;
    while row < entries.len() && entries[row].depth() >= depth {
        if entries[row].depth() == depth {
            if seen == candidate.index {
                return Some(PlaceholderLine { row, depth });
            }
            seen += 1;
        }
        row += 1;
    }
    Some(PlaceholderLine { row, depth })
}
