//! Attribute edits: bond shape, atom label, position, and charge.
//!
//! Label, position, and charge edits are driven by continuous
//! interaction (typing, dragging, repeated key presses) and implement
//! [`SketchAction::merge`] so a run of them collapses into one undo
//! step; merging is always scoped to the same target atom. Label and
//! charge changes cascade a refresh to every incident bond, since both
//! affect how the bonds around the atom are drawn.

use crate::editor::action::{ActionError, ActionResult, AsAny, SketchAction};
use crate::graph::{EdgeId, EdgeShape, MolGraph, VertexId};
use crate::math::Vec2;

fn vertex_gone() -> ActionError {
    ActionError::TargetNotFound("atom not in sketch".into())
}

/// Refresh an atom and every bond incident to it.
fn refresh_vertex(graph: &mut MolGraph, vertex: VertexId) {
    if let Some(v) = graph.vertex_mut(vertex) {
        v.update();
    }
    for e in graph.find_edges_by_vertex(vertex) {
        if let Some(edge) = graph.edge_mut(e) {
            edge.update();
        }
    }
}

/// Changes the visual form of one bond.
#[derive(Debug)]
pub struct SetEdgeShapeAction {
    edge: EdgeId,
    old_shape: EdgeShape,
    new_shape: EdgeShape,
}

impl SetEdgeShapeAction {
    /// Creates the action; the current shape of the live edge is
    /// captured as the rollback target.
    pub fn new(graph: &MolGraph, edge: EdgeId, shape: EdgeShape) -> Self {
        let old_shape = graph.edge(edge).map(|e| e.shape).unwrap_or_default();
        Self {
            edge,
            old_shape,
            new_shape: shape,
        }
    }

    fn apply(&self, graph: &mut MolGraph, shape: EdgeShape) -> ActionResult {
        let e = graph
            .edge_mut(self.edge)
            .ok_or_else(|| ActionError::TargetNotFound("bond not in sketch".into()))?;
        e.shape = shape;
        e.update();
        Ok(())
    }
}

impl SketchAction for SetEdgeShapeAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        self.apply(graph, self.new_shape)
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        self.apply(graph, self.old_shape)
    }

    fn description(&self) -> &str {
        "Change bond shape"
    }
}

/// Changes the element label of one atom. Mergeable.
#[derive(Debug)]
pub struct ChangeAtomLabelAction {
    vertex: VertexId,
    old_label: String,
    new_label: String,
}

impl ChangeAtomLabelAction {
    /// Creates the action; the live label is captured as the rollback
    /// target.
    pub fn new(graph: &MolGraph, vertex: VertexId, label: impl Into<String>) -> Self {
        let old_label = graph
            .vertex(vertex)
            .map(|v| v.label.clone())
            .unwrap_or_default();
        Self {
            vertex,
            old_label,
            new_label: label.into(),
        }
    }

    fn apply(&self, graph: &mut MolGraph, label: &str) -> ActionResult {
        let v = graph.vertex_mut(self.vertex).ok_or_else(vertex_gone)?;
        v.label = label.to_string();
        refresh_vertex(graph, self.vertex);
        Ok(())
    }
}

impl SketchAction for ChangeAtomLabelAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        let label = self.new_label.clone();
        self.apply(graph, &label)
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        let label = self.old_label.clone();
        self.apply(graph, &label)
    }

    fn description(&self) -> &str {
        "Change label"
    }

    fn merge(&mut self, other: Box<dyn SketchAction>) -> Option<Box<dyn SketchAction>> {
        if let Some(other) = (*other).as_any().downcast_ref::<Self>()
            && self.vertex == other.vertex
        {
            self.new_label = other.new_label.clone();
            return None; // consumed
        }
        Some(other)
    }
}

/// Bookmarks an atom move performed by the caller. Mergeable.
///
/// The caller drags the atom (writing its coordinates directly) and
/// commits this action afterwards; the first commit records the live
/// position as the redo target, later commits write that recorded
/// position back. Rollback restores the position from before the drag.
#[derive(Debug)]
pub struct MoveVertexAction {
    vertex: VertexId,
    old_coords: Vec2,
    new_coords: Vec2,
    committed: bool,
}

impl MoveVertexAction {
    /// Creates the action; the live position is captured as the
    /// rollback target, so construct it before the drag starts.
    pub fn new(graph: &MolGraph, vertex: VertexId) -> Self {
        let coords = graph
            .vertex(vertex)
            .map(|v| v.coords)
            .unwrap_or_else(Vec2::zeros);
        Self {
            vertex,
            old_coords: coords,
            new_coords: coords,
            committed: false,
        }
    }
}

impl SketchAction for MoveVertexAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        let v = graph.vertex_mut(self.vertex).ok_or_else(vertex_gone)?;
        if self.committed {
            v.coords = self.new_coords;
        } else {
            self.new_coords = v.coords;
            self.committed = true;
        }
        refresh_vertex(graph, self.vertex);
        Ok(())
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        let v = graph.vertex_mut(self.vertex).ok_or_else(vertex_gone)?;
        v.coords = self.old_coords;
        refresh_vertex(graph, self.vertex);
        Ok(())
    }

    fn description(&self) -> &str {
        "Move atom"
    }

    fn merge(&mut self, other: Box<dyn SketchAction>) -> Option<Box<dyn SketchAction>> {
        if let Some(other) = (*other).as_any().downcast_ref::<Self>()
            && self.vertex == other.vertex
        {
            self.new_coords = other.new_coords;
            return None; // consumed
        }
        Some(other)
    }
}

/// Changes the formal charge of one atom. Mergeable, so a run of +/-
/// keystrokes undoes in a single step.
#[derive(Debug)]
pub struct ChangeVertexChargeAction {
    vertex: VertexId,
    old_charge: i32,
    new_charge: i32,
}

impl ChangeVertexChargeAction {
    /// Creates the action; the live charge is captured as the rollback
    /// target.
    pub fn new(graph: &MolGraph, vertex: VertexId, charge: i32) -> Self {
        let old_charge = graph.vertex(vertex).map(|v| v.charge).unwrap_or_default();
        Self {
            vertex,
            old_charge,
            new_charge: charge,
        }
    }

    fn apply(&self, graph: &mut MolGraph, charge: i32) -> ActionResult {
        let v = graph.vertex_mut(self.vertex).ok_or_else(vertex_gone)?;
        v.charge = charge;
        refresh_vertex(graph, self.vertex);
        Ok(())
    }
}

impl SketchAction for ChangeVertexChargeAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        self.apply(graph, self.new_charge)
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        self.apply(graph, self.old_charge)
    }

    fn description(&self) -> &str {
        "Change charge"
    }

    fn merge(&mut self, other: Box<dyn SketchAction>) -> Option<Box<dyn SketchAction>> {
        if let Some(other) = (*other).as_any().downcast_ref::<Self>()
            && self.vertex == other.vertex
        {
            self.new_charge = other.new_charge;
            return None; // consumed
        }
        Some(other)
    }
}
