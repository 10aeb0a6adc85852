//! Structural edits: delete, add, bind, and whole-document clear.
//!
//! Add-style actions cache the subgraph their first commit generated
//! (see [`CachedSubgraph`]) so a redo reinserts the identical elements;
//! delete-style actions capture the removed subgraph on every commit
//! and reinsert it unconditionally on rollback. The one deliberate
//! exception is [`BindVerticesAction`], which clears its edge handle on
//! rollback and creates a fresh edge on every redo.

use super::CachedSubgraph;
use crate::editor::action::{ActionError, ActionResult, SketchAction};
use crate::graph::{EdgeId, MolGraph, Subgraph, VertexId};
use crate::math::Vec2;

fn vertex_gone() -> ActionError {
    ActionError::TargetNotFound("atom not in sketch".into())
}

fn edge_gone() -> ActionError {
    ActionError::TargetNotFound("bond not in sketch".into())
}

/// Clears the whole document; rollback restores it from a mol-string
/// snapshot taken at commit time.
///
/// The only action with O(document) cost instead of O(edit) cost —
/// clearing discards all structure, so structural diffing has nothing
/// to hold on to.
#[derive(Debug)]
pub struct ClearGraphAction {
    mol: Option<String>,
}

impl ClearGraphAction {
    /// Creates the action. The snapshot is taken when the clear commits.
    pub fn new() -> Self {
        Self { mol: None }
    }
}

impl Default for ClearGraphAction {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchAction for ClearGraphAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        self.mol = Some(graph.get_mol_string());
        graph.clear();
        Ok(())
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        let Some(mol) = &self.mol else {
            return Ok(());
        };
        graph
            .load_mol_string(mol)
            .map_err(|e| ActionError::Custom(format!("snapshot reload failed: {e}")))?;
        graph.update();
        Ok(())
    }

    fn description(&self) -> &str {
        "Clear sketch"
    }
}

/// Deletes one atom together with every bond incident to it.
#[derive(Debug)]
pub struct DeleteVertexAction {
    vertex: VertexId,
    removed: Option<Subgraph>,
}

impl DeleteVertexAction {
    /// Creates the action targeting `vertex`.
    pub fn new(vertex: VertexId) -> Self {
        Self {
            vertex,
            removed: None,
        }
    }
}

impl SketchAction for DeleteVertexAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        let v = graph.vertex_mut(self.vertex).ok_or_else(vertex_gone)?;
        // Deactivate first so renderers stop drawing the atom before the
        // structure underneath it changes.
        v.active = false;
        v.update();
        self.removed = Some(graph.delete_vertex(self.vertex));
        Ok(())
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = &self.removed {
            graph.add(sub);
            graph.update();
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Delete atom"
    }
}

/// Deletes one bond; its endpoints stay in place.
#[derive(Debug)]
pub struct DeleteEdgeAction {
    edge: EdgeId,
    removed: Option<Subgraph>,
}

impl DeleteEdgeAction {
    /// Creates the action targeting `edge`.
    pub fn new(edge: EdgeId) -> Self {
        Self {
            edge,
            removed: None,
        }
    }
}

impl SketchAction for DeleteEdgeAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        let e = graph.edge_mut(self.edge).ok_or_else(edge_gone)?;
        e.active = false;
        e.update();
        self.removed = Some(graph.delete_edge(self.edge));
        Ok(())
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = &self.removed {
            graph.add(sub);
            graph.update();
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Delete bond"
    }
}

/// Adds one new atom bonded to an existing anchor atom.
#[derive(Debug)]
pub struct AddBoundVertexAction {
    anchor: VertexId,
    added: CachedSubgraph,
}

impl AddBoundVertexAction {
    /// Creates the action; the new atom appears on first commit.
    pub fn new(anchor: VertexId) -> Self {
        Self {
            anchor,
            added: CachedSubgraph::Pending,
        }
    }
}

impl SketchAction for AddBoundVertexAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = self.added.materialized() {
            graph.add(sub);
            return Ok(());
        }
        if !graph.contains_vertex(self.anchor) {
            return Err(vertex_gone());
        }
        self.added = CachedSubgraph::Materialized(graph.add_bound_vertex_to(self.anchor));
        Ok(())
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = self.added.materialized() {
            graph.remove(sub);
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Add atom"
    }
}

/// Creates the default two-atom fragment at a canvas position.
#[derive(Debug)]
pub struct AddDefaultFragmentAction {
    pos: Vec2,
    added: CachedSubgraph,
}

impl AddDefaultFragmentAction {
    /// Creates the action; the fragment appears on first commit.
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            added: CachedSubgraph::Pending,
        }
    }
}

impl SketchAction for AddDefaultFragmentAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = self.added.materialized() {
            graph.add(sub);
            return Ok(());
        }
        self.added = CachedSubgraph::Materialized(graph.add_default_fragment(self.pos));
        Ok(())
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = self.added.materialized() {
            graph.remove(sub);
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Add fragment"
    }
}

/// Creates a bond between two existing atoms.
///
/// Unlike the other add-style actions this one does not cache what it
/// created: rollback deletes the edge and clears the handle, and the
/// next commit (redo) asks the graph for a fresh edge. The stale handle
/// must never be reused — a detached edge would otherwise come back
/// instead of a newly created one.
#[derive(Debug)]
pub struct BindVerticesAction {
    v1: VertexId,
    v2: VertexId,
    edge: Option<EdgeId>,
}

impl BindVerticesAction {
    /// Creates the action bonding `v1` to `v2`.
    pub fn new(v1: VertexId, v2: VertexId) -> Self {
        Self { v1, v2, edge: None }
    }
}

impl SketchAction for BindVerticesAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        if !graph.contains_vertex(self.v1) || !graph.contains_vertex(self.v2) {
            return Err(vertex_gone());
        }
        if self.v1 == self.v2 {
            return Err(ActionError::InvalidState(
                "cannot bond an atom to itself".into(),
            ));
        }
        let e = graph.bind_vertices(self.v1, self.v2);
        self.edge = Some(e);
        if let Some(edge) = graph.edge_mut(e) {
            edge.update();
        }
        if let Some(v) = graph.vertex_mut(self.v1) {
            v.update();
        }
        if let Some(v) = graph.vertex_mut(self.v2) {
            v.update();
        }
        Ok(())
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        let Some(e) = self.edge.take() else {
            return Ok(());
        };
        if graph.contains_edge(e) {
            graph.delete_edge(e);
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Bond atoms"
    }
}

/// Grows a zig-zag chain of new atoms out of an anchor atom.
#[derive(Debug)]
pub struct AddChainAction {
    anchor: VertexId,
    natoms: usize,
    added: CachedSubgraph,
}

impl AddChainAction {
    /// Creates the action growing `natoms` new atoms from `anchor`.
    pub fn new(anchor: VertexId, natoms: usize) -> Self {
        Self {
            anchor,
            natoms,
            added: CachedSubgraph::Pending,
        }
    }
}

impl SketchAction for AddChainAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = self.added.materialized() {
            graph.add(sub);
            return Ok(());
        }
        if !graph.contains_vertex(self.anchor) {
            return Err(vertex_gone());
        }
        if self.natoms == 0 {
            return Err(ActionError::InvalidState(
                "chain must add at least one atom".into(),
            ));
        }
        self.added = CachedSubgraph::Materialized(graph.add_chain(self.anchor, self.natoms));
        Ok(())
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = self.added.materialized() {
            graph.remove(sub);
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Add chain"
    }
}

/// Attaches a ring that includes the anchor atom as a member.
#[derive(Debug)]
pub struct AttachRingAction {
    anchor: VertexId,
    natoms: usize,
    added: CachedSubgraph,
}

impl AttachRingAction {
    /// Creates the action attaching an `natoms`-membered ring.
    pub fn new(anchor: VertexId, natoms: usize) -> Self {
        Self {
            anchor,
            natoms,
            added: CachedSubgraph::Pending,
        }
    }
}

impl SketchAction for AttachRingAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = self.added.materialized() {
            graph.add(sub);
            return Ok(());
        }
        if !graph.contains_vertex(self.anchor) {
            return Err(vertex_gone());
        }
        if self.natoms < 3 {
            return Err(ActionError::InvalidState(
                "ring needs at least three atoms".into(),
            ));
        }
        self.added = CachedSubgraph::Materialized(graph.attach_ring(self.anchor, self.natoms));
        Ok(())
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = self.added.materialized() {
            graph.remove(sub);
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Attach ring"
    }
}

/// Fuses a ring onto an existing bond; both endpoints become ring
/// members.
#[derive(Debug)]
pub struct FuseRingAction {
    edge: EdgeId,
    natoms: usize,
    added: CachedSubgraph,
}

impl FuseRingAction {
    /// Creates the action fusing an `natoms`-membered ring onto `edge`.
    pub fn new(edge: EdgeId, natoms: usize) -> Self {
        Self {
            edge,
            natoms,
            added: CachedSubgraph::Pending,
        }
    }
}

impl SketchAction for FuseRingAction {
    fn commit(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = self.added.materialized() {
            graph.add(sub);
            return Ok(());
        }
        if !graph.contains_edge(self.edge) {
            return Err(edge_gone());
        }
        if self.natoms < 3 {
            return Err(ActionError::InvalidState(
                "ring needs at least three atoms".into(),
            ));
        }
        self.added = CachedSubgraph::Materialized(graph.fuse_ring(self.edge, self.natoms));
        Ok(())
    }

    fn rollback(&mut self, graph: &mut MolGraph) -> ActionResult {
        if let Some(sub) = self.added.materialized() {
            graph.remove(sub);
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Fuse ring"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(graph: &mut MolGraph) -> (VertexId, VertexId, EdgeId) {
        let sub = graph.add_default_fragment(Vec2::new(100.0, 100.0));
        let mut vids = sub.vertex_ids();
        let v1 = vids.next().unwrap();
        let v2 = vids.next().unwrap();
        let e = sub.edge_ids().next().unwrap();
        (v1, v2, e)
    }

    #[test]
    fn delete_vertex_round_trip_restores_incident_bonds() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);
        graph.add_bound_vertex_to(v1);
        graph.add_bound_vertex_to(v1);
        let label = "N".to_string();
        graph.vertex_mut(v1).unwrap().label = label.clone();
        let coords = graph.vertex(v1).unwrap().coords;

        let mut action = DeleteVertexAction::new(v1);
        action.commit(&mut graph).unwrap();
        assert!(!graph.contains_vertex(v1));
        assert_eq!(graph.edge_count(), 0);

        action.rollback(&mut graph).unwrap();
        let restored = graph.vertex(v1).unwrap();
        assert_eq!(restored.label, label);
        assert_eq!(restored.coords, coords);
        assert!(restored.active);
        assert_eq!(graph.find_edges_by_vertex(v1).len(), 3);
    }

    #[test]
    fn delete_vertex_rollback_without_commit_is_noop() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);
        let mut action = DeleteVertexAction::new(v1);
        action.rollback(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn delete_vertex_commit_on_missing_target_fails() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);
        graph.delete_vertex(v1);
        let mut action = DeleteVertexAction::new(v1);
        assert!(matches!(
            action.commit(&mut graph),
            Err(ActionError::TargetNotFound(_))
        ));
    }

    #[test]
    fn delete_edge_round_trip() {
        let mut graph = MolGraph::new();
        let (_, _, e) = fragment(&mut graph);
        let mut action = DeleteEdgeAction::new(e);
        action.commit(&mut graph).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.vertex_count(), 2);

        action.rollback(&mut graph).unwrap();
        assert!(graph.contains_edge(e));
        assert!(graph.edge(e).unwrap().active);
    }

    #[test]
    fn add_bound_vertex_redo_restores_identical_elements() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);

        let mut action = AddBoundVertexAction::new(v1);
        action.commit(&mut graph).unwrap();
        let first_ids: Vec<VertexId> = graph.vertices().map(|v| v.id()).collect();

        action.rollback(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 2);

        action.commit(&mut graph).unwrap();
        let second_ids: Vec<VertexId> = graph.vertices().map(|v| v.id()).collect();
        assert_eq!(first_ids, second_ids, "redo must reinsert the same atom");
    }

    #[test]
    fn add_bound_vertex_rollback_without_commit_is_noop() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);
        let mut action = AddBoundVertexAction::new(v1);
        action.rollback(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn add_fragment_round_trip() {
        let mut graph = MolGraph::new();
        let mut action = AddDefaultFragmentAction::new(Vec2::new(10.0, 10.0));
        action.commit(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 2);
        action.rollback(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 0);
        action.commit(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn chain_redo_is_stable() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);
        let mut action = AddChainAction::new(v1, 3);
        action.commit(&mut graph).unwrap();
        let after_first: Vec<VertexId> = graph.vertices().map(|v| v.id()).collect();
        action.rollback(&mut graph).unwrap();
        action.commit(&mut graph).unwrap();
        let after_redo: Vec<VertexId> = graph.vertices().map(|v| v.id()).collect();
        assert_eq!(after_first, after_redo);
    }

    #[test]
    fn chain_of_zero_atoms_is_invalid() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);
        let mut action = AddChainAction::new(v1, 0);
        assert!(matches!(
            action.commit(&mut graph),
            Err(ActionError::InvalidState(_))
        ));
    }

    #[test]
    fn attach_ring_round_trip() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);
        let mut action = AttachRingAction::new(v1, 6);
        action.commit(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 7);
        assert_eq!(graph.edge_count(), 7);
        action.rollback(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn fuse_ring_redo_is_stable() {
        let mut graph = MolGraph::new();
        let (_, _, e) = fragment(&mut graph);
        let mut action = FuseRingAction::new(e, 5);
        action.commit(&mut graph).unwrap();
        let after_first: Vec<EdgeId> = graph.edges().map(|e| e.id()).collect();
        action.rollback(&mut graph).unwrap();
        action.commit(&mut graph).unwrap();
        let after_redo: Vec<EdgeId> = graph.edges().map(|e| e.id()).collect();
        assert_eq!(after_first, after_redo);
    }

    #[test]
    fn undersized_ring_is_invalid() {
        let mut graph = MolGraph::new();
        let (v1, _, e) = fragment(&mut graph);
        let mut attach = AttachRingAction::new(v1, 2);
        assert!(matches!(
            attach.commit(&mut graph),
            Err(ActionError::InvalidState(_))
        ));
        let mut fuse = FuseRingAction::new(e, 2);
        assert!(matches!(
            fuse.commit(&mut graph),
            Err(ActionError::InvalidState(_))
        ));
    }

    #[test]
    fn bind_round_trip() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);
        let other = graph.add_bound_vertex_to(v1).vertex_ids().next().unwrap();
        let far = graph.add_bound_vertex_to(other).vertex_ids().next().unwrap();

        let mut action = BindVerticesAction::new(v1, far);
        action.commit(&mut graph).unwrap();
        assert_eq!(graph.find_edges_by_vertex(far).len(), 2);
        action.rollback(&mut graph).unwrap();
        assert_eq!(graph.find_edges_by_vertex(far).len(), 1);
    }

    #[test]
    fn bind_redo_creates_fresh_edge() {
        // Deliberate asymmetry with the other add-style actions: the
        // bind action drops its handle on rollback, so redo allocates a
        // brand new edge instead of reviving the old one.
        let mut graph = MolGraph::new();
        let (v1, v2, _) = fragment(&mut graph);

        let mut action = BindVerticesAction::new(v1, v2);
        action.commit(&mut graph).unwrap();
        let first: Vec<EdgeId> = graph.find_edges_by_vertex(v1);
        action.rollback(&mut graph).unwrap();
        action.commit(&mut graph).unwrap();
        let second: Vec<EdgeId> = graph.find_edges_by_vertex(v1);

        let fresh: Vec<&EdgeId> = second.iter().filter(|e| !first.contains(e)).collect();
        assert_eq!(fresh.len(), 1, "redo must create a new edge id");
    }

    #[test]
    fn bind_rollback_without_commit_is_noop() {
        let mut graph = MolGraph::new();
        let (v1, v2, _) = fragment(&mut graph);
        let mut action = BindVerticesAction::new(v1, v2);
        action.rollback(&mut graph).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn bind_self_bond_is_invalid() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);
        let mut action = BindVerticesAction::new(v1, v1);
        assert!(matches!(
            action.commit(&mut graph),
            Err(ActionError::InvalidState(_))
        ));
    }

    #[test]
    fn bind_refreshes_endpoints() {
        let mut graph = MolGraph::new();
        let (v1, v2, _) = fragment(&mut graph);
        let r1 = graph.vertex(v1).unwrap().revision();
        let mut action = BindVerticesAction::new(v1, v2);
        action.commit(&mut graph).unwrap();
        assert!(graph.vertex(v1).unwrap().revision() > r1);
    }

    #[test]
    fn clear_restore_round_trip() {
        let mut graph = MolGraph::new();
        let (v1, _, _) = fragment(&mut graph);
        graph.attach_ring(v1, 6);
        graph.vertex_mut(v1).unwrap().label = "O".into();
        let vcount = graph.vertex_count();
        let ecount = graph.edge_count();

        let mut action = ClearGraphAction::new();
        action.commit(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);

        action.rollback(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), vcount);
        assert_eq!(graph.edge_count(), ecount);
        assert!(graph.vertices().any(|v| v.label == "O"));
    }

    #[test]
    fn clear_rollback_without_commit_is_noop() {
        let mut graph = MolGraph::new();
        fragment(&mut graph);
        let mut action = ClearGraphAction::new();
        action.rollback(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn clear_redo_clears_again() {
        let mut graph = MolGraph::new();
        fragment(&mut graph);
        let mut action = ClearGraphAction::new();
        action.commit(&mut graph).unwrap();
        action.rollback(&mut graph).unwrap();
        action.commit(&mut graph).unwrap();
        assert_eq!(graph.vertex_count(), 0);
    }
}
