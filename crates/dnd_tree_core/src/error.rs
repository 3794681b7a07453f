use std::fmt;

use crate::node::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A parent chain did not reach the root within the node count.
    MalformedTree { node: NodeId },
    /// A drag is already in flight for this tree.
    DragInProgress,
    /// Dragging is locked by the host.
    DragLocked,
    /// The `can_drag` hook refused the node.
    DragRejected { id: NodeId },
    Json(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::MalformedTree { node } => {
                write!(f, "parent chain of node {node} does not reach the root")
            }
            TreeError::DragInProgress => f.write_str("a drag is already in progress"),
            TreeError::DragLocked => f.write_str("dragging is locked"),
            TreeError::DragRejected { id } => write!(f, "node {id} cannot be dragged"),
            TreeError::Json(message) => write!(f, "invalid tree json: {message}"),
        }
    }
}

impl std::error::Error for TreeError {}

impl From<serde_json::Error> for TreeError {
    fn from(value: serde_json::Error) -> Self {
        TreeError::Json(value.to_string())
    }
}
