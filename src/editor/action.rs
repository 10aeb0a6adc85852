//! Reversible sketcher actions.
//!
//! This module defines the abstractions of the undo/redo system:
//!
//! - [`SketchAction`] — a reversible edit of the molecular graph
//!   (Command pattern)
//! - [`ActionError`] / [`ActionResult`] — error handling for actions
//!
//! Actions are self-contained: each implementation stores the handles
//! and old/new values it needs to perform and reverse exactly one edit.
//! `commit` captures generated structure on first use so a later redo
//! reinserts the same elements instead of regenerating fresh ones.

use std::any::Any;
use std::fmt;

use crate::graph::MolGraph;

/// Helper trait for downcasting trait objects to concrete types.
///
/// Automatically implemented for all `'static` types. Used by
/// [`SketchAction::merge`] to downcast `&dyn SketchAction` to the
/// concrete action type for merging.
pub trait AsAny: 'static {
    /// Returns a reference to `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: 'static> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Error type for action execution failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The referenced atom or bond is not part of the graph.
    TargetNotFound(String),
    /// The requested edit is structurally impossible.
    InvalidState(String),
    /// A custom error with a description.
    Custom(String),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound(msg) => write!(f, "target not found: {msg}"),
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Result type for action operations.
pub type ActionResult<T = ()> = Result<T, ActionError>;

/// A reversible edit of the molecular graph (Command pattern).
///
/// Every action captures its "before" state when it is constructed, so
/// `old_*` values reflect pre-edit truth even though [`commit`] runs
/// later. `commit` may run more than once: the first call performs the
/// edit, later calls are redos and must reproduce the same structural
/// result — add-style actions therefore cache the subgraph their first
/// commit produced and reinsert it instead of generating new elements.
/// [`rollback`] immediately after [`commit`] restores the graph to a
/// state observationally identical to before the commit; on an action
/// that never committed it is a silent no-op.
///
/// # Merging
///
/// Actions representing one step of a continuous interaction (dragging
/// an atom, retyping a label) override [`merge`](Self::merge) so that
/// consecutive actions coalesce into one undo step spanning from before
/// the first edit to after the last. Use [`AsAny::as_any`] on the
/// dereferenced `other` action (`(*other).as_any()`) to downcast it to
/// the concrete type; the box is `'static` itself and would satisfy the
/// blanket impl, downcasting to the box instead of the action. Merging
/// is always scoped to the same target atom.
///
/// # Object Safety
///
/// The trait is dyn-compatible so heterogeneous actions can live in one
/// undo/redo stack as `Box<dyn SketchAction>`.
///
/// [`commit`]: Self::commit
/// [`rollback`]: Self::rollback
pub trait SketchAction: fmt::Debug + AsAny + Send {
    /// Applies the edit to the graph (forward / redo direction).
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult;

    /// Reverses the edit (undo direction).
    ///
    /// Must restore the graph to the state before [`commit`](Self::commit)
    /// was called. A no-op when the action never committed.
    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult;

    /// A short, human-readable description for the edit menu and the
    /// history panel. Examples: `"Move atom"`, `"Attach ring"`.
    fn description(&self) -> &str;

    /// Tries to merge `other` into `self`, taking ownership.
    ///
    /// `other` has already been committed by the history; merging only
    /// folds its terminal state into `self` so the pair undoes as one
    /// step. Returns `None` when `other` was consumed, or `Some(other)`
    /// back to the caller when the actions are not mergeable (different
    /// concrete kind or different target atom) — the caller then pushes
    /// it as a separate entry.
    ///
    /// Returns `Some(other)` by default (no merging).
    fn merge(&mut self, other: Box<dyn SketchAction>) -> Option<Box<dyn SketchAction>> {
        Some(other)
    }
}
