//! Molecular graph data types.
//!
//! Element identity is the id: a [`Vertex`] or [`Edge`] carried inside a
//! [`Subgraph`] keeps its id, so reinserting a previously removed
//! subgraph restores the exact same elements. Ids are allocated by the
//! owning [`MolGraph`](super::MolGraph) and never reused.

use crate::math::Vec2;

/// Opaque handle to a vertex (atom) in a [`MolGraph`](super::MolGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) u64);

/// Opaque handle to an edge (bond) in a [`MolGraph`](super::MolGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) u64);

/// Visual form of a bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeShape {
    /// Plain single bond.
    #[default]
    Single,
    /// Double bond.
    Double,
    /// Triple bond.
    Triple,
    /// Stereo wedge pointing up (toward the viewer).
    WedgedUp,
    /// Stereo wedge pointing down (away from the viewer).
    WedgedDown,
}

/// An atom in the sketch.
///
/// `label` holds the element symbol or abbreviation; an empty label is
/// drawn as the default carbon skeleton vertex. `active` is the
/// visibility gate: actions flip it off before structural removal so
/// renderers stop drawing the atom immediately.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub(crate) id: VertexId,
    /// Element symbol or abbreviation; empty means default carbon.
    pub label: String,
    /// Screen coordinates.
    pub coords: Vec2,
    /// Formal charge.
    pub charge: i32,
    /// Visibility gate.
    pub active: bool,
    revision: u64,
}

impl Vertex {
    pub(crate) fn new(id: VertexId, coords: Vec2) -> Self {
        Self {
            id,
            label: String::new(),
            coords,
            charge: 0,
            active: true,
            revision: 0,
        }
    }

    /// Id of this vertex.
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Refresh hook: renderers cache per-atom layout keyed on this
    /// counter, so any state change must be followed by `update()`.
    pub fn update(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Current refresh revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// A bond between two atoms.
#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) id: EdgeId,
    pub(crate) v1: VertexId,
    pub(crate) v2: VertexId,
    /// Visual form of the bond.
    pub shape: EdgeShape,
    /// Visibility gate.
    pub active: bool,
    revision: u64,
}

impl Edge {
    pub(crate) fn new(id: EdgeId, v1: VertexId, v2: VertexId) -> Self {
        Self {
            id,
            v1,
            v2,
            shape: EdgeShape::Single,
            active: true,
            revision: 0,
        }
    }

    /// Id of this edge.
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// First endpoint.
    pub fn v1(&self) -> VertexId {
        self.v1
    }

    /// Second endpoint.
    pub fn v2(&self) -> VertexId {
        self.v2
    }

    /// Whether `v` is one of this edge's endpoints.
    pub fn is_incident_to(&self, v: VertexId) -> bool {
        self.v1 == v || self.v2 == v
    }

    /// Refresh hook, see [`Vertex::update`].
    pub fn update(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Current refresh revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// A set of vertices and edges treated as one unit for insertion or
/// removal.
///
/// Produced by the delete operations and the structural generators of
/// [`MolGraph`](super::MolGraph); held by actions so undo/redo can
/// reinsert or strip exactly the elements of the original edit.
#[derive(Debug, Clone, Default)]
pub struct Subgraph {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
}

impl Subgraph {
    /// Whether the subgraph holds no elements.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    /// Number of vertices in the subgraph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges in the subgraph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Ids of the contained vertices.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().map(|v| v.id)
    }

    /// Ids of the contained edges.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().map(|e| e.id)
    }
}
