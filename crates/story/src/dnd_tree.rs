use anyhow::Context as _;
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::ActiveTheme as _;
use gpui_component::list::ListItem;
use gpui_component::{Icon, Sizable as _, h_flex, v_flex};
use gpui_dnd_tree::{
    DndTreeDrag, DndTreeEntry, DndTreeRowState, DndTreeState, DragGhost, DropOutcome, Hooks,
    InitialOpen, Node, NodeId, Tree, TreeConfig, Verdict, dnd_tree,
};

const DEMO_TREE: &str = r#"[
    { "id": 1, "parent": 0, "droppable": true, "text": "src" },
    { "id": 2, "parent": 1, "droppable": true, "text": "ui" },
    { "id": 3, "parent": 2, "text": "button.rs" },
    { "id": 4, "parent": 2, "text": "icon.rs" },
    { "id": 5, "parent": 2, "text": "dnd_tree.rs" },
    { "id": 6, "parent": 1, "text": "main.rs" },
    { "id": 7, "parent": 1, "text": "lib.rs" },
    { "id": 8, "parent": 0, "droppable": true, "text": "docs" },
    { "id": 9, "parent": 0, "text": "Cargo.toml" },
    { "id": 10, "parent": 0, "text": "Cargo.lock" },
    { "id": 11, "parent": 0, "text": "README.md" }
]"#;

pub fn demo_tree() -> anyhow::Result<Tree> {
    Tree::from_json_str(0, DEMO_TREE).context("failed to load the demo tree")
}

pub struct DndTreeExample {
    sorted: Entity<DndTreeState>,
    indexed: Entity<DndTreeState>,
    next_external: usize,
    log: Vec<String>,
}

impl DndTreeExample {
    pub fn view(tree: Tree, _window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| {
            let sorted = Self::tree_state(
                "Sorted",
                tree.clone(),
                TreeConfig::default().initial_open(InitialOpen::All(true)),
                Hooks::new().can_drag(|node| node.text != "Cargo.lock"),
                false,
                cx,
            );
            let indexed = Self::tree_state(
                "Indexed",
                tree,
                TreeConfig::default()
                    .sort(false)
                    .initial_open(InitialOpen::Ids(vec![1.into()])),
                Hooks::new().can_drop(|args| {
                    // Reordering within the same parent is off unless a hook allows it.
                    let same_parent = args
                        .drag_source
                        .is_some_and(|source| source.parent == *args.drop_target_id);
                    if same_parent {
                        Verdict::Allow
                    } else {
                        Verdict::Defer
                    }
                }),
                true,
                cx,
            );

            Self {
                sorted,
                indexed,
                next_external: 1,
                log: Vec::new(),
            }
        })
    }

    fn tree_state(
        pane: &'static str,
        tree: Tree,
        config: TreeConfig,
        hooks: Hooks,
        badge_preview: bool,
        cx: &mut Context<Self>,
    ) -> Entity<DndTreeState> {
        let on_drop_view = cx.weak_entity();
        let on_open_view = cx.weak_entity();
        let on_start_view = cx.weak_entity();
        let on_end_view = cx.weak_entity();
        cx.new(|cx| {
            let state = DndTreeState::new(cx)
                .indent_width(px(16.))
                .indent_offset(px(10.))
                .config(config)
                .hooks(hooks)
                .nodes(tree)
                .on_drop(move |outcome, _window, cx| {
                    _ = on_drop_view.update(cx, |this, cx| this.record_drop(pane, outcome, cx));
                })
                .on_change_open(move |open_ids, cx| {
                    let ids = open_ids.iter().map(NodeId::to_string).collect::<Vec<_>>();
                    _ = on_open_view.update(cx, |this, cx| {
                        this.push_log(format!("{pane}: open [{}]", ids.join(", ")), cx);
                    });
                })
                .on_drag_start(move |node, _window, cx| {
                    _ = on_start_view.update(cx, |this, cx| {
                        this.push_log(format!("{pane}: drag {}", node.text), cx);
                    });
                })
                .on_drag_end(move |node, _window, cx| {
                    _ = on_end_view.update(cx, |this, cx| {
                        this.push_log(format!("{pane}: end {}", node.text), cx);
                    });
                });
            if badge_preview {
                state.drag_preview(|node, _window, cx| {
                    let label = format!("Moving {}", node.text);
                    cx.new(|_| DragBadge { label: label.into() }).into()
                })
            } else {
                state
            }
        })
    }

    fn record_drop(&mut self, pane: &str, outcome: &DropOutcome, cx: &mut Context<Self>) {
        let options = &outcome.options;
        if options
            .drag_source_id
            .as_str()
            .is_some_and(|id| id.starts_with("external-"))
        {
            self.next_external += 1;
        }
        let index = options
            .relative_index
            .map_or_else(|| "-".to_string(), |ix| ix.to_string());
        self.push_log(
            format!(
                "{pane}: {} -> {} (index {index})",
                options.drag_source_id, options.drop_target_id
            ),
            cx,
        );
    }

    fn push_log(&mut self, line: String, cx: &mut Context<Self>) {
        self.log.push(line);
        if self.log.len() > 12 {
            self.log.remove(0);
        }
        cx.notify();
    }

    fn external_node(&self) -> Node {
        let id = format!("external-{}", self.next_external);
        Node::new(id, "clipboard", format!("note-{}.md", self.next_external))
    }
}

impl Render for DndTreeExample {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let external = self.external_node();
        let owner = cx.entity_id();
        let external_label = external.text.clone();
        let log = self.log.clone();

        v_flex()
            .size_full()
            .p(px(16.))
            .gap_y_3()
            .child(
                v_flex()
                    .gap_y_1()
                    .child(div().text_xl().font_weight(FontWeight::BOLD).child("DnD Tree"))
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child("Tip: drop on the upper or lower part of a row to land before or after it, on the middle of a folder to land inside. The left tree keeps folders first and sorts by name; the right tree keeps the order you drop in. The chip below is an outside source: drop it on either tree to add a node."),
                    ),
            )
            .child(
                h_flex()
                    .gap_x_2()
                    .child(
                        div()
                            .id("external-source")
                            .px(px(10.))
                            .py(px(4.))
                            .rounded(px(6.))
                            .border_1()
                            .border_color(theme.border)
                            .text_sm()
                            .cursor_grab()
                            .child(format!("Drag in: {external_label}"))
                            .on_drag(
                                DndTreeDrag::external(owner, external),
                                |drag, _cursor_offset, _window, cx| {
                                    let label = drag.node().text.clone();
                                    cx.new(|_| DragGhost::new(label))
                                },
                            ),
                    )
                    .child(
                        div()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child("Cargo.lock is pinned in the sorted tree."),
                    ),
            )
            .child(
                h_flex()
                    .flex_1()
                    .min_h(px(0.))
                    .gap_x_3()
                    .child(render_pane("Sorted", &self.sorted, cx))
                    .child(render_pane("Indexed", &self.indexed, cx))
                    .child(
                        v_flex()
                            .w(px(280.))
                            .h_full()
                            .gap_y_2()
                            .child(div().text_sm().font_weight(FontWeight::MEDIUM).child("Events"))
                            .child(
                                v_flex()
                                    .flex_1()
                                    .min_h(px(0.))
                                    .rounded(px(12.))
                                    .border_1()
                                    .border_color(theme.border)
                                    .bg(theme.background)
                                    .p(px(12.))
                                    .gap_y_0p5()
                                    .when(log.is_empty(), |this| {
                                        this.child(
                                            div()
                                                .text_sm()
                                                .text_color(theme.muted_foreground)
                                                .child("No drops yet"),
                                        )
                                    })
                                    .children(log.into_iter().map(|line| div().text_sm().child(line))),
                            ),
                    ),
            )
    }
}

struct DragBadge {
    label: SharedString,
}

impl Render for DragBadge {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        h_flex()
            .gap_x_1()
            .px(px(8.))
            .py(px(4.))
            .rounded(px(12.))
            .bg(theme.accent)
            .text_color(theme.accent_foreground)
            .text_xs()
            .child(Icon::empty().path("icons/pen-line.svg").small())
            .child(self.label.clone())
    }
}

fn render_pane(title: &'static str, state: &Entity<DndTreeState>, cx: &App) -> impl IntoElement {
    let theme = cx.theme();
    let selected = state
        .read(cx)
        .selected_entry()
        .map(|entry| entry.node().text.clone())
        .unwrap_or_else(|| "<none>".to_string());

    v_flex()
        .flex_1()
        .min_w(px(0.))
        .h_full()
        .gap_y_2()
        .child(
            h_flex()
                .justify_between()
                .child(div().text_sm().font_weight(FontWeight::MEDIUM).child(title))
                .child(
                    div()
                        .text_xs()
                        .text_color(theme.muted_foreground)
                        .child(format!("Selected: {selected}")),
                ),
        )
        .child(
            div()
                .flex_1()
                .min_h(px(0.))
                .rounded(px(12.))
                .border_1()
                .border_color(theme.border)
                .bg(theme.background)
                .child(dnd_tree(state, move |ix, entry, row_state, _window, cx| {
                    render_tree_row(ix, entry, row_state, cx)
                })),
        )
}

fn render_tree_row(
    ix: usize,
    entry: &DndTreeEntry,
    row_state: DndTreeRowState,
    cx: &mut App,
) -> ListItem {
    let theme = cx.theme();
    let indent = px(16.) * entry.depth();

    let icon_path = if entry.is_droppable() {
        if entry.is_expanded() {
            "icons/library.svg"
        } else {
            "icons/square-library.svg"
        }
    } else if row_state.selected {
        "icons/pen-line.svg"
    } else {
        "icons/text-align-start.svg"
    };
    let icon_color = if row_state.selected || row_state.drop_target {
        theme.foreground
    } else {
        theme.muted_foreground
    };

    ListItem::new(ix)
        .pl(px(10.) + indent)
        .when(row_state.dragging, |this| this.opacity(0.4))
        .child(
            h_flex()
                .gap_x_2()
                .items_center()
                .child(Icon::empty().path(icon_path).small().text_color(icon_color))
                .child(entry.node().text.clone()),
        )
}
