//! Editing session: graph, history, and queue under one roof.
//!
//! [`SketchSession`] is the single-actor driver of the command core: it
//! owns the document graph, the undo/redo history, and the submission
//! queue, and runs every edit strictly sequentially. The merge-or-push
//! decision lives entirely in [`ActionHistory::execute`].

use super::action::{ActionResult, SketchAction};
use super::action_queue::ActionQueue;
use super::history::{ActionHistory, DEFAULT_MAX_UNDO};
use crate::graph::MolGraph;

/// One editing session over one sketch document.
#[derive(Debug)]
pub struct SketchSession {
    graph: MolGraph,
    history: ActionHistory,
    queue: ActionQueue,
}

impl SketchSession {
    /// Creates a session with an empty graph and the default undo depth.
    pub fn new() -> Self {
        Self::with_max_undo(DEFAULT_MAX_UNDO)
    }

    /// Creates a session with the given undo depth.
    pub fn with_max_undo(max_undo: usize) -> Self {
        Self {
            graph: MolGraph::new(),
            history: ActionHistory::new(max_undo),
            queue: ActionQueue::new(),
        }
    }

    /// The document graph.
    pub fn graph(&self) -> &MolGraph {
        &self.graph
    }

    /// Mutable access to the document graph.
    ///
    /// Interaction code uses this to move atoms during a drag before
    /// committing the bookmarking move action.
    pub fn graph_mut(&mut self) -> &mut MolGraph {
        &mut self.graph
    }

    /// The undo/redo history.
    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    /// Enqueues an action for the next [`apply_pending`](Self::apply_pending).
    /// Callable from `&self`.
    pub fn submit(&self, action: Box<dyn SketchAction>) {
        self.queue.push(action);
    }

    /// Drains the queue and executes every pending action through the
    /// history, in submission order. Failed actions are logged and
    /// skipped. Returns the number of successfully applied actions.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        for action in self.queue.drain() {
            let desc = action.description().to_string();
            match self.history.execute(action, &mut self.graph) {
                Ok(()) => applied += 1,
                Err(e) => log::warn!("action '{desc}' failed: {e}"),
            }
        }
        applied
    }

    /// Commits one action through the history immediately.
    pub fn execute(&mut self, action: Box<dyn SketchAction>) -> ActionResult {
        self.history.execute(action, &mut self.graph)
    }

    /// Undoes the most recent action.
    pub fn undo(&mut self) -> ActionResult {
        log::debug!("undo");
        self.history.undo(&mut self.graph)
    }

    /// Redoes the most recently undone action.
    pub fn redo(&mut self) -> ActionResult {
        log::debug!("redo");
        self.history.redo(&mut self.graph)
    }

    /// Whether undo is currently possible.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is currently possible.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Records the current document state as saved.
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    /// Whether the document differs from its last saved state.
    pub fn has_unsaved_changes(&self) -> bool {
        self.history.has_unsaved_changes()
    }
}

impl Default for SketchSession {
    fn default() -> Self {
        Self::new()
    }
}
