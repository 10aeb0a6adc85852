//! Reversible editing core for the sketcher.
//!
//! This module provides the command/undo-redo system driving every
//! mutation of the molecular graph:
//!
//! - [`SketchAction`] — a reversible edit (Command pattern)
//! - [`actions`] — the concrete edit kinds (add, delete, bind, rings,
//!   label/move/charge, clear)
//! - [`ActionHistory`] — undo/redo stack with merge-or-push coalescing
//! - [`ActionQueue`] — thread-safe queue for submitting actions from
//!   read-only contexts
//! - [`SketchSession`] — owns graph + history + queue and drives them
//!   strictly sequentially
//!
//! # Coalescing
//!
//! Continuous interactions (dragging an atom, retyping a label,
//! repeated charge keystrokes) produce one action per step; mergeable
//! actions fold consecutive steps on the same atom into a single
//! history entry, so one undo spans from before the first step to
//! after the last.

mod action;
pub mod actions;
mod action_queue;
mod history;
mod session;

pub use action::{ActionError, ActionResult, AsAny, SketchAction};
pub use action_queue::ActionQueue;
pub use history::{ActionHistory, DEFAULT_MAX_UNDO};
pub use session::SketchSession;
