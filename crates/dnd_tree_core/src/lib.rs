//! Drag-and-drop engine for flattened trees.
//!
//! A [`Tree`] is a flat list of [`Node`]s linked by `parent` ids. While a drag is in flight,
//! [`resolve_drop_target`] turns the hovered row and pointer position into a
//! [`DropCandidate`], [`is_droppable`] decides whether that candidate is legal, and on
//! release [`apply_drop`] produces the new tree. [`DragController`] sequences the three for
//! one gesture and keeps the [`DragSession`] placeholder in sync.

mod config;
mod error;
mod mutator;
mod node;
mod resolver;
mod session;
mod tree;
mod validity;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::mutator::*;
pub use crate::node::*;
pub use crate::resolver::*;
pub use crate::session::*;
pub use crate::tree::*;
pub use crate::validity::*;
