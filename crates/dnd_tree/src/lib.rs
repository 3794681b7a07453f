//! gpui view for [`gpui_dnd_tree_core`]: renders a flat node list as a tree and turns gpui
//! drag events into drops.

mod tree;

pub use gpui_dnd_tree_core::*;

pub use crate::tree::*;
