//! Undo/redo action history.
//!
//! [`ActionHistory`] manages a linear undo/redo stack of
//! [`SketchAction`] trait objects. `execute` commits the action first
//! and only then tries to merge it into the top undo entry, so a merged
//! action's effect is already on the graph and merging only folds
//! state. Pushing a new action after undoing clears the redo stack
//! (standard editor behavior).

use std::collections::VecDeque;
use std::fmt;

use super::action::{ActionError, ActionResult, SketchAction};
use crate::graph::MolGraph;

/// Default maximum number of undo steps.
pub const DEFAULT_MAX_UNDO: usize = 100;

/// Manages an undo/redo stack of sketcher actions.
///
/// The undo stack is a bounded [`VecDeque`] — when it exceeds
/// `max_undo`, the oldest action is dropped from the front. The redo
/// stack is an unbounded [`Vec`] (it can never grow larger than the
/// undo stack was).
pub struct ActionHistory {
    undo_stack: VecDeque<Box<dyn SketchAction>>,
    redo_stack: Vec<Box<dyn SketchAction>>,
    max_undo: usize,
    /// Tracks distance from the saved state.
    ///
    /// - `Some(0)` — the current state matches the last save.
    /// - `Some(n)` where `n > 0` — `n` undos needed to reach the saved state.
    /// - `Some(n)` where `n < 0` — `|n|` redos needed to reach the saved state.
    /// - `None` — never saved, or the save point is permanently
    ///   unreachable (dropped by capacity overflow, discarded redo
    ///   branch, or folded away by a merge).
    save_distance: Option<i64>,
}

impl ActionHistory {
    /// Creates a new empty action history with the given maximum undo
    /// depth.
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_undo,
            save_distance: Some(0),
        }
    }

    /// Commits an action to the graph and records it.
    ///
    /// The redo stack is cleared, then the action is offered to the top
    /// undo entry via [`SketchAction::merge`]; if the top consumes it
    /// the history is unchanged in length, otherwise the action is
    /// pushed as a new entry (dropping the oldest past capacity).
    ///
    /// If the commit fails, nothing is recorded.
    pub fn execute(
        &mut self,
        mut action: Box<dyn SketchAction>,
        graph: &mut MolGraph,
    ) -> ActionResult {
        action.commit(graph)?;

        // Clearing the redo stack invalidates a save point that was in redo.
        self.redo_stack.clear();
        if let Some(d) = self.save_distance
            && d < 0
        {
            self.save_distance = None;
        }

        if let Some(last) = self.undo_stack.back_mut() {
            match last.merge(action) {
                None => {
                    // Merged into the top entry — if that entry was the
                    // save point, the document changed under it.
                    if self.save_distance == Some(0) {
                        self.save_distance = None;
                    }
                    return Ok(());
                }
                Some(returned) => action = returned,
            }
        }

        if let Some(d) = &mut self.save_distance {
            *d += 1;
        }

        self.undo_stack.push_back(action);
        if self.undo_stack.len() > self.max_undo {
            self.undo_stack.pop_front();
            // If the save point was beyond the oldest surviving entry, it's gone.
            if let Some(d) = self.save_distance
                && d > self.undo_stack.len() as i64
            {
                self.save_distance = None;
            }
        }
        Ok(())
    }

    /// Rolls back the most recent action.
    ///
    /// Returns an error if the undo stack is empty or the rollback failed.
    pub fn undo(&mut self, graph: &mut MolGraph) -> ActionResult {
        let mut action = self
            .undo_stack
            .pop_back()
            .ok_or_else(|| ActionError::Custom("nothing to undo".into()))?;
        action.rollback(graph)?;
        self.redo_stack.push(action);
        if let Some(d) = &mut self.save_distance {
            *d -= 1;
        }
        Ok(())
    }

    /// Re-commits the most recently undone action.
    ///
    /// Returns an error if the redo stack is empty or the commit failed.
    pub fn redo(&mut self, graph: &mut MolGraph) -> ActionResult {
        let mut action = self
            .redo_stack
            .pop()
            .ok_or_else(|| ActionError::Custom("nothing to redo".into()))?;
        action.commit(graph)?;
        self.undo_stack.push_back(action);
        if let Some(d) = &mut self.save_distance {
            *d += 1;
        }
        if self.undo_stack.len() > self.max_undo {
            self.undo_stack.pop_front();
            if let Some(d) = self.save_distance
                && d > self.undo_stack.len() as i64
            {
                self.save_distance = None;
            }
        }
        Ok(())
    }

    /// Returns `true` if there are actions that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns `true` if there are actions that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Returns an iterator over undo action descriptions, most recent first.
    pub fn undo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().rev().map(|a| a.description())
    }

    /// Returns an iterator over redo action descriptions, most recent first.
    pub fn redo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.redo_stack.iter().rev().map(|a| a.description())
    }

    /// Returns the number of actions in the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the number of actions in the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Returns the maximum undo depth.
    pub fn max_undo(&self) -> usize {
        self.max_undo
    }

    /// Records the current state as the saved state.
    pub fn mark_saved(&mut self) {
        self.save_distance = Some(0);
    }

    /// Returns `true` if the current state differs from the last saved
    /// state, or if no save point is reachable anymore.
    pub fn has_unsaved_changes(&self) -> bool {
        self.save_distance != Some(0)
    }

    /// Clears both stacks. The graph itself is untouched, so a history
    /// sitting at its save point stays saved.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        if self.save_distance != Some(0) {
            self.save_distance = None;
        }
    }
}

impl fmt::Debug for ActionHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHistory")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("max_undo", &self.max_undo)
            .field("save_distance", &self.save_distance)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::actions::{
        AddBoundVertexAction, AddDefaultFragmentAction, ChangeAtomLabelAction,
        DeleteVertexAction, MoveVertexAction,
    };
    use crate::graph::VertexId;
    use crate::math::Vec2;

    fn seeded() -> (ActionHistory, MolGraph, VertexId) {
        let mut graph = MolGraph::new();
        let sub = graph.add_default_fragment(Vec2::new(100.0, 100.0));
        let v1 = sub.vertex_ids().next().unwrap();
        (ActionHistory::new(DEFAULT_MAX_UNDO), graph, v1)
    }

    fn relabel(graph: &MolGraph, v: VertexId, label: &str) -> Box<dyn SketchAction> {
        Box::new(ChangeAtomLabelAction::new(graph, v, label))
    }

    #[test]
    fn execute_applies_and_pushes() {
        let (mut history, mut graph, v1) = seeded();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        assert_eq!(graph.vertex(v1).unwrap().label, "N");
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn undo_reverses_and_moves_to_redo() {
        let (mut history, mut graph, v1) = seeded();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        history.undo(&mut graph).unwrap();
        assert_eq!(graph.vertex(v1).unwrap().label, "");
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 1);
    }

    #[test]
    fn redo_reapplies_and_moves_to_undo() {
        let (mut history, mut graph, v1) = seeded();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        history.undo(&mut graph).unwrap();
        history.redo(&mut graph).unwrap();
        assert_eq!(graph.vertex(v1).unwrap().label, "N");
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn execute_clears_redo_stack() {
        let (mut history, mut graph, v1) = seeded();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        history.undo(&mut graph).unwrap();
        assert_eq!(history.redo_count(), 1);

        history
            .execute(Box::new(AddBoundVertexAction::new(v1)), &mut graph)
            .unwrap();
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn undo_empty_returns_error() {
        let (mut history, mut graph, _) = seeded();
        assert!(history.undo(&mut graph).is_err());
    }

    #[test]
    fn redo_empty_returns_error() {
        let (mut history, mut graph, _) = seeded();
        assert!(history.redo(&mut graph).is_err());
    }

    #[test]
    fn failed_execute_does_not_push() {
        let (mut history, mut graph, v1) = seeded();
        graph.delete_vertex(v1);
        let result = history.execute(Box::new(DeleteVertexAction::new(v1)), &mut graph);
        assert!(result.is_err());
        assert_eq!(history.undo_count(), 0);
    }

    #[test]
    fn capacity_drops_oldest() {
        let (_, mut graph, v1) = seeded();
        let mut history = ActionHistory::new(2);
        let mut anchor = v1;
        for _ in 0..3 {
            let action = AddBoundVertexAction::new(anchor);
            history.execute(Box::new(action), &mut graph).unwrap();
            anchor = graph.vertices().last().unwrap().id();
        }
        assert_eq!(history.undo_count(), 2);
        assert_eq!(graph.vertex_count(), 5);

        history.undo(&mut graph).unwrap();
        history.undo(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert!(history.undo(&mut graph).is_err());
    }

    #[test]
    fn label_edits_coalesce_into_one_entry() {
        let (mut history, mut graph, v1) = seeded();
        for label in ["N", "O", "S"] {
            history
                .execute(relabel(&graph, v1, label), &mut graph)
                .unwrap();
        }
        assert_eq!(graph.vertex(v1).unwrap().label, "S");
        assert_eq!(history.undo_count(), 1);

        history.undo(&mut graph).unwrap();
        assert_eq!(graph.vertex(v1).unwrap().label, "");
    }

    #[test]
    fn different_kinds_do_not_merge() {
        let (mut history, mut graph, v1) = seeded();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        history
            .execute(Box::new(MoveVertexAction::new(&graph, v1)), &mut graph)
            .unwrap();
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn different_targets_do_not_merge() {
        let (mut history, mut graph, v1) = seeded();
        let v2 = graph.vertices().nth(1).unwrap().id();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        history
            .execute(relabel(&graph, v2, "O"), &mut graph)
            .unwrap();
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn drag_sequence_is_one_undo_step() {
        let (mut history, mut graph, v1) = seeded();
        let start = graph.vertex(v1).unwrap().coords;

        for step in 1..=3 {
            let action = MoveVertexAction::new(&graph, v1);
            graph.vertex_mut(v1).unwrap().coords = Vec2::new(step as f32 * 10.0, 0.0);
            history.execute(Box::new(action), &mut graph).unwrap();
        }
        assert_eq!(history.undo_count(), 1);

        history.undo(&mut graph).unwrap();
        assert_eq!(graph.vertex(v1).unwrap().coords, start);

        history.redo(&mut graph).unwrap();
        assert_eq!(graph.vertex(v1).unwrap().coords, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn descriptions_read_most_recent_first() {
        let (mut history, mut graph, v1) = seeded();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        history
            .execute(Box::new(AddBoundVertexAction::new(v1)), &mut graph)
            .unwrap();
        let descs: Vec<&str> = history.undo_descriptions().collect();
        assert_eq!(descs, vec!["Add atom", "Change label"]);
    }

    #[test]
    fn can_undo_can_redo() {
        let (mut history, mut graph, v1) = seeded();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        assert!(history.can_undo());
        history.undo(&mut graph).unwrap();
        assert!(history.can_redo());
    }

    #[test]
    fn clear_empties_both_stacks() {
        let (mut history, mut graph, v1) = seeded();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        history.undo(&mut graph).unwrap();
        history.clear();
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn debug_impl() {
        let history = ActionHistory::new(DEFAULT_MAX_UNDO);
        let debug = format!("{history:?}");
        assert!(debug.contains("ActionHistory"));
        assert!(debug.contains("undo_count"));
    }

    // --- Save tracking ---

    #[test]
    fn fresh_history_is_saved() {
        let history = ActionHistory::new(DEFAULT_MAX_UNDO);
        assert!(!history.has_unsaved_changes());
    }

    #[test]
    fn unsaved_after_execute_saved_after_undo() {
        let (mut history, mut graph, v1) = seeded();
        history.mark_saved();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        assert!(history.has_unsaved_changes());
        history.undo(&mut graph).unwrap();
        assert!(!history.has_unsaved_changes());
        history.redo(&mut graph).unwrap();
        assert!(history.has_unsaved_changes());
    }

    #[test]
    fn save_lost_when_redo_branch_discarded() {
        let (mut history, mut graph, v1) = seeded();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        history.mark_saved();
        history.undo(&mut graph).unwrap();
        history
            .execute(Box::new(AddBoundVertexAction::new(v1)), &mut graph)
            .unwrap();
        assert!(history.has_unsaved_changes());
        history.undo(&mut graph).unwrap();
        assert!(history.has_unsaved_changes());
    }

    #[test]
    fn merge_at_save_point_invalidates() {
        let (mut history, mut graph, v1) = seeded();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        history.mark_saved();
        history
            .execute(relabel(&graph, v1, "O"), &mut graph)
            .unwrap();
        assert_eq!(history.undo_count(), 1);
        assert!(history.has_unsaved_changes());
    }

    #[test]
    fn save_lost_on_capacity_overflow() {
        let mut graph = MolGraph::new();
        let sub = graph.add_default_fragment(Vec2::zeros());
        let v1 = sub.vertex_ids().next().unwrap();
        let mut history = ActionHistory::new(2);

        history.mark_saved();
        let mut anchor = v1;
        for _ in 0..3 {
            let action = AddBoundVertexAction::new(anchor);
            history.execute(Box::new(action), &mut graph).unwrap();
            anchor = graph.vertices().last().unwrap().id();
        }
        assert!(history.has_unsaved_changes());
        history.undo(&mut graph).unwrap();
        history.undo(&mut graph).unwrap();
        // The save point predates the oldest surviving entry.
        assert!(history.has_unsaved_changes());
    }

    #[test]
    fn clear_preserves_save_only_at_save_point() {
        let (mut history, mut graph, v1) = seeded();
        history
            .execute(relabel(&graph, v1, "N"), &mut graph)
            .unwrap();
        history.mark_saved();
        history.clear();
        assert!(!history.has_unsaved_changes());

        history
            .execute(relabel(&graph, v1, "O"), &mut graph)
            .unwrap();
        history.clear();
        assert!(history.has_unsaved_changes());
    }

    #[test]
    fn structural_round_trip_through_history() {
        let mut graph = MolGraph::new();
        let mut history = ActionHistory::new(DEFAULT_MAX_UNDO);
        history
            .execute(
                Box::new(AddDefaultFragmentAction::new(Vec2::new(50.0, 50.0))),
                &mut graph,
            )
            .unwrap();
        let v1 = graph.vertices().next().unwrap().id();
        history
            .execute(Box::new(AddBoundVertexAction::new(v1)), &mut graph)
            .unwrap();
        history
            .execute(Box::new(DeleteVertexAction::new(v1)), &mut graph)
            .unwrap();
        assert!(!graph.contains_vertex(v1));

        history.undo(&mut graph).unwrap();
        assert!(graph.contains_vertex(v1));
        history.undo(&mut graph).unwrap();
        history.undo(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 0);

        history.redo(&mut graph).unwrap();
        history.redo(&mut graph).unwrap();
        history.redo(&mut graph).unwrap();
        assert!(!graph.contains_vertex(v1));
        assert_eq!(graph.vertex_count(), 2);
    }
}
