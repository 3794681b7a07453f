use serde_json::Value;

use crate::config::{Hooks, TreeConfig};
use crate::error::TreeError;
use crate::mutator::{DropOutcome, apply_drop};
use crate::node::{DragSource, NodeId};
use crate::resolver::{DropCandidate, Hovered, ResolveContext, RowBounds, resolve_drop_target};
use crate::tree::Tree;
use crate::validity::is_droppable;

/// Placeholder state of the drag in flight: where the dragged node would land.
///
/// Written on hover, read on drop, cleared after every drop or cancel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragSession {
    drop_target_id: Option<NodeId>,
    index: Option<usize>,
}

impl DragSession {
    pub fn show_placeholder(&mut self, drop_target_id: NodeId, index: usize) {
        self.drop_target_id = Some(drop_target_id);
        self.index = Some(index);
    }

    pub fn hide_placeholder(&mut self) {
        self.drop_target_id = None;
        self.index = None;
    }

    #[inline]
    pub fn drop_target_id(&self) -> Option<&NodeId> {
        self.drop_target_id.as_ref()
    }

    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn candidate(&self) -> Option<DropCandidate> {
        let parent_id = self.drop_target_id.clone()?;
        let index = self.index?;
        Some(DropCandidate { parent_id, index })
    }

    pub fn is_showing_at(&self, drop_target_id: &NodeId, index: usize) -> bool {
        self.drop_target_id.as_ref() == Some(drop_target_id) && self.index == Some(index)
    }

    pub fn is_visible(&self) -> bool {
        self.drop_target_id.is_some() && self.index.is_some()
    }
}

/// Sequences one drag gesture at a time: start, hovers, then a release or a cancel.
pub struct DragController<T = Value> {
    config: TreeConfig,
    hooks: Hooks<T>,
    session: DragSession,
    source: Option<DragSource<T>>,
    locked: bool,
}

impl<T: Clone> DragController<T> {
    pub fn new(config: TreeConfig, hooks: Hooks<T>) -> Self {
        Self {
            config,
            hooks,
            session: DragSession::default(),
            source: None,
            locked: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TreeConfig) {
        self.config = config;
    }

    #[inline]
    pub fn hooks(&self) -> &Hooks<T> {
        &self.hooks
    }

    pub fn set_hooks(&mut self, hooks: Hooks<T>) {
        self.hooks = hooks;
    }

    #[inline]
    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn source(&self) -> Option<&DragSource<T>> {
        self.source.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.source.is_some()
    }

    /// Refuse new drags until [`DragController::unlock`], e.g. while a row is being edited.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Start dragging `source`. Sources that are members of `tree` go through `can_drag`.
    pub fn begin(&mut self, tree: &Tree<T>, source: DragSource<T>) -> Result<(), TreeError> {
        if self.source.is_some() {
            return Err(TreeError::DragInProgress);
        }
        if self.locked {
            return Err(TreeError::DragLocked);
        }
        if let Some(node) = tree.find(source.id())
            && !self.hooks.check_drag(node)
        {
            return Err(TreeError::DragRejected {
                id: source.id().clone(),
            });
        }

        let foreign = !tree.contains(source.id());
        tracing::debug!(source = %source.id(), foreign, "drag started");
        self.session.hide_placeholder();
        self.source = Some(source);
        Ok(())
    }

    /// Resolve the pointer position and keep the placeholder in sync with it.
    ///
    /// Returns the accepted candidate, or `None` (and hides the placeholder) when the
    /// position resolves to nothing or to an illegal drop.
    pub fn hover(
        &mut self,
        tree: &Tree<T>,
        hovered: &Hovered,
        bounds: RowBounds,
        pointer_y: f32,
        expanded: bool,
    ) -> Option<DropCandidate> {
        let source_id = self.source.as_ref()?.id().clone();
        let cx = ResolveContext {
            config: &self.config,
            hooks: &self.hooks,
            expanded,
        };

        let candidate = resolve_drop_target(tree, hovered, bounds, pointer_y, &cx)
            .filter(|c| is_droppable(tree, Some(&source_id), &c.parent_id, &self.hooks));

        let Some(candidate) = candidate else {
            if self.session.is_visible() {
                tracing::trace!("placeholder hidden");
                self.session.hide_placeholder();
            }
            return None;
        };

        if !self.session.is_showing_at(&candidate.parent_id, candidate.index) {
            tracing::trace!(
                parent = %candidate.parent_id,
                index = candidate.index,
                "placeholder moved"
            );
            self.session
                .show_placeholder(candidate.parent_id.clone(), candidate.index);
        }
        Some(candidate)
    }

    /// The pointer left every drop target.
    pub fn leave(&mut self) {
        self.session.hide_placeholder();
    }

    /// End the gesture and apply the last accepted candidate to `tree`.
    ///
    /// The session is cleared whether or not anything is applied. `None` means the drop was
    /// declined: no drag, no candidate, or a candidate that `tree` no longer accepts.
    pub fn release(&mut self, tree: &Tree<T>) -> Option<DropOutcome<T>> {
        let candidate = self.session.candidate();
        self.session.hide_placeholder();
        let source = self.source.take()?;
        let Some(candidate) = candidate else {
            tracing::debug!(source = %source.id(), "drag released without a target");
            return None;
        };

        if !is_droppable(tree, Some(source.id()), &candidate.parent_id, &self.hooks) {
            tracing::debug!(
                source = %source.id(),
                target = %candidate.parent_id,
                "drop declined"
            );
            return None;
        }

        Some(apply_drop(
            tree,
            &source,
            &candidate.parent_id,
            self.config.mode(),
            Some(candidate.index),
        ))
    }

    /// Abort the gesture without touching any tree.
    pub fn cancel(&mut self) {
        if let Some(source) = self.source.take() {
            tracing::debug!(source = %source.id(), "drag cancelled");
        }
        self.session.hide_placeholder();
    }
}

impl<T: Clone> Default for DragController<T> {
    fn default() -> Self {
        Self::new(TreeConfig::default(), Hooks::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_show_and_hide() {
        let mut session = DragSession::default();
        assert!(!session.is_visible());
        assert_eq!(session.candidate(), None);

        session.show_placeholder(4.into(), 2);
        assert!(session.is_showing_at(&4.into(), 2));
        assert!(!session.is_showing_at(&4.into(), 1));
        assert_eq!(session.candidate(), Some(DropCandidate::new(4, 2)));
        assert_eq!(session.drop_target_id(), Some(&NodeId::Int(4)));
        assert_eq!(session.index(), Some(2));

        session.hide_placeholder();
        assert_eq!(session, DragSession::default());
    }
}
