use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TreeError;

/// Identity of a node. Either an integer or a string, unique within one tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Str(String),
}

impl NodeId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            NodeId::Int(value) => Some(*value),
            NodeId::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeId::Int(_) => None,
            NodeId::Str(value) => Some(value),
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::Int(0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(value) => write!(f, "{value}"),
            NodeId::Str(value) => f.write_str(value),
        }
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Int(value)
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        NodeId::Int(value.into())
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        NodeId::Int(value.into())
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Str(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Str(value)
    }
}

/// A single entry of a flattened tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<T = Value> {
    pub id: NodeId,
    pub parent: NodeId,
    pub text: String,
    /// Whether this node can contain children.
    #[serde(default)]
    pub droppable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Node<T> {
    pub fn new(id: impl Into<NodeId>, parent: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: parent.into(),
            text: text.into(),
            droppable: false,
            data: None,
        }
    }

    /// Shorthand for a droppable (folder-like) node.
    pub fn folder(
        id: impl Into<NodeId>,
        parent: impl Into<NodeId>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(id, parent, text).droppable(true)
    }

    pub fn droppable(mut self, droppable: bool) -> Self {
        self.droppable = droppable;
        self
    }

    pub fn data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub(crate) fn reparented(&self, parent: &NodeId) -> Self
    where
        T: Clone,
    {
        Self {
            parent: parent.clone(),
            ..self.clone()
        }
    }
}

/// The node carried by a drag gesture.
///
/// A source whose id is not found in the tree it is dropped into is foreign; it only
/// becomes a member of that tree when the drop is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSource<T = Value> {
    node: Node<T>,
}

impl<T> DragSource<T> {
    pub fn new(node: Node<T>) -> Self {
        Self { node }
    }

    pub fn id(&self) -> &NodeId {
        &self.node.id
    }

    pub fn node(&self) -> &Node<T> {
        &self.node
    }

    pub fn into_node(self) -> Node<T> {
        self.node
    }
}

impl<T> From<Node<T>> for DragSource<T> {
    fn from(node: Node<T>) -> Self {
        Self::new(node)
    }
}

impl<T> DragSource<T>
where
    T: serde::de::DeserializeOwned,
{
    /// Accept an arbitrary payload handed over by the host as a drag source.
    ///
    /// The payload must at least carry `id`, `parent` and `text`.
    pub fn from_json(value: Value) -> Result<Self, TreeError> {
        let Value::Object(map) = &value else {
            return Err(TreeError::Json("drag payload is not an object".into()));
        };
        for key in ["id", "parent", "text"] {
            if map.get(key).is_none_or(Value::is_null) {
                return Err(TreeError::Json(format!("drag payload is missing `{key}`")));
            }
        }
        let node = serde_json::from_value(value).map_err(|err| TreeError::Json(err.to_string()))?;
        Ok(Self::new(node))
    }
}
