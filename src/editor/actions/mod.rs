//! Concrete sketcher actions.
//!
//! One type per semantic edit. Structural edits (delete, add, bind,
//! clear) live in [`structural`], attribute edits (bond shape, label,
//! position, charge) in [`attribute`]; the attribute edits driven by
//! continuous interaction are mergeable.

mod attribute;
mod structural;

pub use attribute::{
    ChangeAtomLabelAction, ChangeVertexChargeAction, MoveVertexAction, SetEdgeShapeAction,
};
pub use structural::{
    AddBoundVertexAction, AddChainAction, AddDefaultFragmentAction, AttachRingAction,
    BindVerticesAction, ClearGraphAction, DeleteEdgeAction, DeleteVertexAction, FuseRingAction,
};

use crate::graph::Subgraph;

/// Lifecycle of the structure an add-style action introduces.
///
/// The first commit runs the generator and materializes the produced
/// subgraph; every later commit (redo) reinserts the materialized value
/// so the same elements come back under the same ids. Rollback is a
/// no-op while still pending.
#[derive(Debug)]
pub(crate) enum CachedSubgraph {
    /// The generator has not run yet.
    Pending,
    /// The generator ran; this is exactly the structure it produced.
    Materialized(Subgraph),
}

impl CachedSubgraph {
    pub(crate) fn materialized(&self) -> Option<&Subgraph> {
        match self {
            Self::Pending => None,
            Self::Materialized(sub) => Some(sub),
        }
    }
}
