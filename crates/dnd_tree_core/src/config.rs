use std::{cmp::Ordering, fmt, rc::Rc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::{Node, NodeId};
use crate::tree::Tree;

/// Default vertical distance from a row's midpoint that still counts as "drop inside".
pub const DEFAULT_DROP_TARGET_OFFSET: f32 = 4.0;

/// How sibling order is decided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderMode {
    /// Display order comes from a comparator; sequence position is irrelevant.
    #[default]
    Sorted,
    /// Sequence position is the display order.
    Indexed,
}

/// Which droppable nodes start out expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialOpen {
    All(bool),
    Ids(Vec<NodeId>),
}

impl Default for InitialOpen {
    fn default() -> Self {
        InitialOpen::All(false)
    }
}

/// Plain-data options of a tree view. Loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// `true` selects [`OrderMode::Sorted`], `false` selects [`OrderMode::Indexed`].
    pub sort: bool,
    /// In sorted mode, list droppable nodes before the others.
    pub insert_droppable_first: bool,
    /// Proximity threshold around a row's midpoint, in logical pixels.
    pub drop_target_offset: f32,
    pub initial_open: InitialOpen,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            sort: true,
            insert_droppable_first: true,
            drop_target_offset: DEFAULT_DROP_TARGET_OFFSET,
            initial_open: InitialOpen::default(),
        }
    }
}

impl TreeConfig {
    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn insert_droppable_first(mut self, insert_droppable_first: bool) -> Self {
        self.insert_droppable_first = insert_droppable_first;
        self
    }

    /// Negative and non-finite values are treated as `0`.
    pub fn drop_target_offset(mut self, offset: f32) -> Self {
        self.drop_target_offset = if offset.is_finite() { offset.max(0.) } else { 0. };
        self
    }

    pub fn initial_open(mut self, initial_open: InitialOpen) -> Self {
        self.initial_open = initial_open;
        self
    }

    pub fn mode(&self) -> OrderMode {
        if self.sort {
            OrderMode::Sorted
        } else {
            OrderMode::Indexed
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Answer of a user override hook.
///
/// `Defer` hands the decision back to the built-in rules; it is not a refusal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny,
    #[default]
    Defer,
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value { Verdict::Allow } else { Verdict::Deny }
    }
}

impl From<Option<bool>> for Verdict {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Verdict::Defer, Verdict::from)
    }
}

/// What a `can_drop` hook gets to look at.
pub struct CanDropArgs<'a, T = Value> {
    pub tree: &'a Tree<T>,
    pub drag_source_id: &'a NodeId,
    pub drop_target_id: &'a NodeId,
    /// `None` for a foreign source.
    pub drag_source: Option<&'a Node<T>>,
    /// `None` when the target is the root.
    pub drop_target: Option<&'a Node<T>>,
}

type CanDropFn<T> = dyn Fn(&CanDropArgs<'_, T>) -> Verdict;
type CanDragFn<T> = dyn Fn(&Node<T>) -> bool;
type CompareFn<T> = dyn Fn(&Node<T>, &Node<T>) -> Ordering;

/// Optional user predicates consulted by the engine.
pub struct Hooks<T = Value> {
    can_drop: Option<Rc<CanDropFn<T>>>,
    can_drag: Option<Rc<CanDragFn<T>>>,
    compare: Option<Rc<CompareFn<T>>>,
}

impl<T> Hooks<T> {
    pub fn new() -> Self {
        Self {
            can_drop: None,
            can_drag: None,
            compare: None,
        }
    }

    pub fn can_drop<F>(mut self, can_drop: F) -> Self
    where
        F: Fn(&CanDropArgs<'_, T>) -> Verdict + 'static,
    {
        self.can_drop = Some(Rc::new(can_drop));
        self
    }

    pub fn can_drag<F>(mut self, can_drag: F) -> Self
    where
        F: Fn(&Node<T>) -> bool + 'static,
    {
        self.can_drag = Some(Rc::new(can_drag));
        self
    }

    /// Comparator for sorted mode. Without one, nodes compare by `text`.
    pub fn compare<F>(mut self, compare: F) -> Self
    where
        F: Fn(&Node<T>, &Node<T>) -> Ordering + 'static,
    {
        self.compare = Some(Rc::new(compare));
        self
    }

    pub(crate) fn check_drop(&self, args: &CanDropArgs<'_, T>) -> Verdict {
        self.can_drop
            .as_ref()
            .map_or(Verdict::Defer, |can_drop| can_drop(args))
    }

    pub(crate) fn check_drag(&self, node: &Node<T>) -> bool {
        self.can_drag.as_ref().is_none_or(|can_drag| can_drag(node))
    }

    pub(crate) fn cmp(&self, a: &Node<T>, b: &Node<T>) -> Ordering {
        match self.compare.as_ref() {
            Some(compare) => compare(a, b),
            None => a.text.cmp(&b.text),
        }
    }
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Hooks<T> {
    fn clone(&self) -> Self {
        Self {
            can_drop: self.can_drop.clone(),
            can_drag: self.can_drag.clone(),
            compare: self.compare.clone(),
        }
    }
}

impl<T> fmt::Debug for Hooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("can_drop", &self.can_drop.is_some())
            .field("can_drag", &self.can_drag.is_some())
            .field("compare", &self.compare.is_some())
            .finish()
    }
}
