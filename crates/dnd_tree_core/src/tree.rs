use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::config::{Hooks, OrderMode};
use crate::error::TreeError;
use crate::node::{Node, NodeId};

/// An insertion-ordered, flattened tree.
///
/// `root_id` is the distinguished parent of top-level nodes and is never a member itself.
/// The tree is never edited in place by the engine: every accepted drop produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree<T = Value> {
    #[serde(default)]
    root_id: NodeId,
    nodes: Vec<Node<T>>,
}

impl<T> Tree<T> {
    pub fn new(root_id: impl Into<NodeId>, nodes: impl Into<Vec<Node<T>>>) -> Self {
        Self {
            root_id: root_id.into(),
            nodes: nodes.into(),
        }
    }

    #[inline]
    pub fn root_id(&self) -> &NodeId {
        &self.root_id
    }

    #[inline]
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node<T>> {
        self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn is_root(&self, id: &NodeId) -> bool {
        self.root_id == *id
    }

    pub fn find(&self, id: &NodeId) -> Option<&Node<T>> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    /// Absolute position of `id` in the sequence.
    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == *id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.position(id).is_some()
    }

    /// Direct children of `parent_id`, in sequence order.
    pub fn children_of(&self, parent_id: &NodeId) -> Vec<&Node<T>> {
        self.nodes
            .iter()
            .filter(|node| node.parent == *parent_id)
            .collect()
    }

    pub fn has_children(&self, parent_id: &NodeId) -> bool {
        self.nodes.iter().any(|node| node.parent == *parent_id)
    }

    /// Direct children of `parent_id` in display order.
    ///
    /// Indexed mode keeps sequence order. Sorted mode applies the comparator (stable), and
    /// lists droppable nodes first when `droppable_first` is set.
    pub fn ordered_children(
        &self,
        parent_id: &NodeId,
        mode: OrderMode,
        droppable_first: bool,
        hooks: &Hooks<T>,
    ) -> Vec<&Node<T>> {
        let mut children = self.children_of(parent_id);
        if mode == OrderMode::Sorted {
            children.sort_by(|a, b| {
                if droppable_first && a.droppable != b.droppable {
                    return b.droppable.cmp(&a.droppable);
                }
                hooks.cmp(a, b)
            });
        }
        children
    }

    /// Ids of all droppable nodes, in sequence order.
    pub fn droppable_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.droppable)
            .map(|node| node.id.clone())
            .collect()
    }

    /// Whether `source_id` is a proper ancestor of `target_id`.
    ///
    /// Terminates on dangling references and on malformed (cyclic) parent chains, which
    /// both answer `false`.
    pub fn is_ancestor(&self, source_id: &NodeId, target_id: &NodeId) -> bool {
        self.ancestor_walk(source_id, target_id).unwrap_or(false)
    }

    /// Bounded parent-chain walk behind [`Tree::is_ancestor`].
    ///
    /// Fails with [`TreeError::MalformedTree`] when the chain from `target_id` is longer than
    /// the node count, which can only happen when it loops.
    pub fn ancestor_walk(
        &self,
        source_id: &NodeId,
        target_id: &NodeId,
    ) -> Result<bool, TreeError> {
        let mut current = target_id;
        for _ in 0..=self.nodes.len() {
            if self.is_root(current) {
                return Ok(false);
            }
            let Some(node) = self.find(current) else {
                return Ok(false);
            };
            if node.parent == *source_id {
                return Ok(true);
            }
            current = &node.parent;
        }

        tracing::warn!(node = %target_id, "parent chain does not reach the root");
        Err(TreeError::MalformedTree {
            node: target_id.clone(),
        })
    }

    /// Number of ancestors between `id` and the root, `None` for unknown or looping chains.
    pub fn depth_of(&self, id: &NodeId) -> Option<usize> {
        let mut node = self.find(id)?;
        for depth in 0..=self.nodes.len() {
            if self.is_root(&node.parent) {
                return Some(depth);
            }
            node = self.find(&node.parent)?;
        }
        None
    }
}

impl<T> Tree<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Load the bare `[{ id, parent, text, droppable, data }]` array form.
    pub fn from_json_str(root_id: impl Into<NodeId>, s: &str) -> Result<Self, TreeError> {
        let nodes: Vec<Node<T>> = serde_json::from_str(s)?;
        Ok(Self::new(root_id, nodes))
    }

    pub fn from_json(root_id: impl Into<NodeId>, value: Value) -> Result<Self, TreeError> {
        let nodes: Vec<Node<T>> = serde_json::from_value(value)?;
        Ok(Self::new(root_id, nodes))
    }

    /// Dump the bare node array; the root id is host configuration.
    pub fn to_json_pretty(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(&self.nodes)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Tree {
        Tree::new(
            0,
            vec![
                Node::folder(1, 0, "Folder 1"),
                Node::folder(2, 1, "Folder 2"),
                Node::new(3, 2, "File 3"),
                Node::new(4, 0, "File 4"),
            ],
        )
    }

    #[test]
    fn children_follow_sequence_order() {
        let tree = sample();
        let ids: Vec<_> = tree.children_of(&0.into()).iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec![NodeId::Int(1), NodeId::Int(4)]);
        assert!(tree.children_of(&3.into()).is_empty());
        assert_eq!(tree.position(&3.into()), Some(2));
        assert!(tree.find(&9.into()).is_none());
    }

    #[test]
    fn ancestry_follows_parent_chain() {
        let tree = sample();
        assert!(tree.is_ancestor(&1.into(), &3.into()));
        assert!(tree.is_ancestor(&2.into(), &3.into()));
        assert!(!tree.is_ancestor(&3.into(), &1.into()));
        assert!(!tree.is_ancestor(&4.into(), &3.into()));
        for node in tree.nodes() {
            assert!(!tree.is_ancestor(&node.id, &node.id));
        }
    }

    #[test]
    fn looping_chain_terminates() {
        let tree: Tree = Tree::new(0, vec![Node::folder(1, 2, "a"), Node::folder(2, 1, "b")]);
        assert!(!tree.is_ancestor(&9.into(), &1.into()));
        assert_eq!(
            tree.ancestor_walk(&9.into(), &1.into()),
            Err(TreeError::MalformedTree { node: 1.into() })
        );
        assert_eq!(tree.depth_of(&1.into()), None);
    }

    #[test]
    fn dangling_parent_is_not_an_ancestor() {
        let tree: Tree = Tree::new(0, vec![Node::new(1, 42, "orphan")]);
        assert!(!tree.is_ancestor(&42.into(), &42.into()));
        assert_eq!(tree.ancestor_walk(&7.into(), &1.into()), Ok(false));
        assert!(tree.is_ancestor(&42.into(), &1.into()));
    }

    #[test]
    fn sorted_children_put_folders_first() {
        let tree: Tree = Tree::new(
            0,
            vec![
                Node::new(1, 0, "b.txt"),
                Node::folder(2, 0, "zeta"),
                Node::new(3, 0, "a.txt"),
                Node::folder(4, 0, "alpha"),
            ],
        );
        let hooks = Hooks::default();
        let order = |mode: OrderMode, first: bool| -> Vec<String> {
            tree.ordered_children(&0.into(), mode, first, &hooks)
                .iter()
                .map(|n| n.text.clone())
                .collect()
        };
        assert_eq!(order(OrderMode::Sorted, true), ["alpha", "zeta", "a.txt", "b.txt"]);
        assert_eq!(order(OrderMode::Sorted, false), ["a.txt", "alpha", "b.txt", "zeta"]);
        assert_eq!(order(OrderMode::Indexed, true), ["b.txt", "zeta", "a.txt", "alpha"]);
    }

    #[test]
    fn depth_counts_ancestors() {
        let tree = sample();
        assert_eq!(tree.depth_of(&1.into()), Some(0));
        assert_eq!(tree.depth_of(&3.into()), Some(2));
    }

    #[test]
    fn json_round_trip_keeps_shape() {
        let tree = Tree::<Value>::from_json(
            0,
            json!([
                { "id": 1, "parent": 0, "text": "Folder", "droppable": true },
                { "id": "readme", "parent": 1, "text": "README", "data": { "size": 3 } }
            ]),
        )
        .unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.nodes()[1].data, Some(json!({ "size": 3 })));

        let dumped: Value = serde_json::from_str(&tree.to_json_pretty().unwrap()).unwrap();
        assert_eq!(dumped[0], json!({ "id": 1, "parent": 0, "text": "Folder", "droppable": true }));

        let wrapped: Tree = serde_json::from_value(json!({
            "root_id": "root",
            "nodes": [{ "id": "a", "parent": "root", "text": "A" }]
        }))
        .unwrap();
        assert_eq!(wrapped.root_id(), &NodeId::from("root"));
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        size: u32,
    }

    #[test]
    fn typed_payload_without_default_loads() {
        let tree = Tree::<Payload>::from_json_str(
            0,
            r#"[
                { "id": 1, "parent": 0, "text": "Folder", "droppable": true },
                { "id": 2, "parent": 1, "text": "File", "data": { "size": 7 } }
            ]"#,
        )
        .unwrap();
        assert_eq!(tree.nodes()[0].data, None);
        assert_eq!(tree.nodes()[1].data, Some(Payload { size: 7 }));

        let source = crate::node::DragSource::<Payload>::from_json(json!({
            "id": "x", "parent": 0, "text": "X", "data": { "size": 1 }
        }))
        .unwrap();
        assert_eq!(source.node().data, Some(Payload { size: 1 }));
    }
}
