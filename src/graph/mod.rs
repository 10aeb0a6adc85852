//! Mutable molecular graph.
//!
//! [`MolGraph`] owns the atoms and bonds of one sketch and exposes the
//! structural operations the editor actions are built on:
//!
//! - removal that returns the removed elements as a [`Subgraph`] value,
//!   so undo can reinsert exactly what was taken out
//! - idempotent [`add`](MolGraph::add)/[`remove`](MolGraph::remove) of
//!   subgraph values, preserving element identity across undo/redo
//! - structural generators (bound vertex, fragment, chain, rings) that
//!   place new atoms in the least crowded direction
//! - a whole-document mol-string snapshot used by the clear action
//!
//! Graph-internal preconditions (operating on a handle that belongs to
//! this graph) are programmer errors and are checked with
//! `debug_assert!`; the editor actions perform their own liveness checks
//! and surface them as recoverable errors.

mod molfile;
mod types;

pub use molfile::MolFileError;
pub use types::{Edge, EdgeId, EdgeShape, Subgraph, Vertex, VertexId};

use std::f32::consts::{FRAC_PI_6, PI, TAU};

use crate::math::{self, Vec2};

/// Standard bond length in screen pixels.
pub const BOND_LENGTH: f32 = 50.0;

/// Direction of the very first bond drawn from an isolated atom.
const DEFAULT_BOND_ANGLE: f32 = -FRAC_PI_6;

/// The mutable structural model of one sketch.
#[derive(Debug, Default)]
pub struct MolGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    next_vertex: u64,
    next_edge: u64,
}

impl MolGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of atoms.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of bonds.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over all atoms in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Iterate over all bonds in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Look up an atom by id.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.iter().find(|v| v.id == id)
    }

    /// Look up an atom by id, mutably.
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.iter_mut().find(|v| v.id == id)
    }

    /// Look up a bond by id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Look up a bond by id, mutably.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    /// Whether the atom is currently part of the graph.
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.iter().any(|v| v.id == id)
    }

    /// Whether the bond is currently part of the graph.
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.iter().any(|e| e.id == id)
    }

    /// Ids of all bonds incident to `v`.
    pub fn find_edges_by_vertex(&self, v: VertexId) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|e| e.is_incident_to(v))
            .map(|e| e.id)
            .collect()
    }

    fn alloc_vertex(&mut self, coords: Vec2) -> VertexId {
        let id = VertexId(self.next_vertex);
        self.next_vertex += 1;
        self.vertices.push(Vertex::new(id, coords));
        id
    }

    fn alloc_edge(&mut self, v1: VertexId, v2: VertexId) -> EdgeId {
        debug_assert!(
            self.contains_vertex(v1) && self.contains_vertex(v2),
            "alloc_edge: endpoint not in graph"
        );
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.push(Edge::new(id, v1, v2));
        id
    }

    /// Clone the named elements out of the graph into a subgraph value.
    fn snapshot(&self, vs: &[VertexId], es: &[EdgeId]) -> Subgraph {
        Subgraph {
            vertices: vs.iter().filter_map(|id| self.vertex(*id).cloned()).collect(),
            edges: es.iter().filter_map(|id| self.edge(*id).cloned()).collect(),
        }
    }

    /// Angles from `v` toward each of its bonded neighbors.
    fn neighbor_angles(&self, v: VertexId) -> Vec<f32> {
        let Some(origin) = self.vertex(v).map(|v| v.coords) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .filter(|e| e.is_incident_to(v))
            .filter_map(|e| {
                let other = if e.v1 == v { e.v2 } else { e.v1 };
                self.vertex(other).map(|o| math::angle_of(&(o.coords - origin)))
            })
            .collect()
    }

    /// Least crowded direction for a new bond out of `v`.
    fn open_direction(&self, v: VertexId) -> f32 {
        math::widest_gap_bisector(&self.neighbor_angles(v)).unwrap_or(DEFAULT_BOND_ANGLE)
    }

    // ----- structural mutation ------------------------------------------

    /// Remove `v` and every bond incident to it, returning exactly the
    /// removed elements.
    pub fn delete_vertex(&mut self, v: VertexId) -> Subgraph {
        debug_assert!(self.contains_vertex(v), "delete_vertex: unknown vertex");
        let mut sub = Subgraph::default();
        let mut kept = Vec::with_capacity(self.edges.len());
        for e in self.edges.drain(..) {
            if e.is_incident_to(v) {
                sub.edges.push(e);
            } else {
                kept.push(e);
            }
        }
        self.edges = kept;
        if let Some(pos) = self.vertices.iter().position(|x| x.id == v) {
            sub.vertices.push(self.vertices.remove(pos));
        }
        sub
    }

    /// Remove one bond, returning it as a subgraph. Endpoints stay.
    pub fn delete_edge(&mut self, e: EdgeId) -> Subgraph {
        debug_assert!(self.contains_edge(e), "delete_edge: unknown edge");
        let mut sub = Subgraph::default();
        if let Some(pos) = self.edges.iter().position(|x| x.id == e) {
            sub.edges.push(self.edges.remove(pos));
        }
        sub
    }

    /// Reinsert a previously produced subgraph, preserving ids.
    ///
    /// Idempotent: elements already present are left alone. Inserted
    /// elements are re-activated, since delete-style edits deactivate
    /// them before removal.
    pub fn add(&mut self, sub: &Subgraph) {
        for v in &sub.vertices {
            if !self.contains_vertex(v.id) {
                let mut v = v.clone();
                v.active = true;
                self.next_vertex = self.next_vertex.max(v.id.0 + 1);
                self.vertices.push(v);
            }
        }
        for e in &sub.edges {
            if !self.contains_edge(e.id) {
                debug_assert!(
                    self.contains_vertex(e.v1) && self.contains_vertex(e.v2),
                    "add: edge endpoint missing"
                );
                let mut e = e.clone();
                e.active = true;
                self.next_edge = self.next_edge.max(e.id.0 + 1);
                self.edges.push(e);
            }
        }
    }

    /// Remove every element of the subgraph that is still present.
    /// Idempotent.
    pub fn remove(&mut self, sub: &Subgraph) {
        self.edges
            .retain(|e| !sub.edges.iter().any(|s| s.id == e.id));
        self.vertices
            .retain(|v| !sub.vertices.iter().any(|s| s.id == v.id));
    }

    /// Create one new bond between two existing atoms.
    ///
    /// Always allocates a fresh edge; callers that need redo-stable
    /// identity cache the returned subgraphs of the generators instead.
    pub fn bind_vertices(&mut self, v1: VertexId, v2: VertexId) -> EdgeId {
        debug_assert!(v1 != v2, "bind_vertices: cannot bond an atom to itself");
        self.alloc_edge(v1, v2)
    }

    // ----- generators ---------------------------------------------------

    /// Add one new atom bonded to `anchor`, placed one bond length away
    /// in the least crowded direction.
    pub fn add_bound_vertex_to(&mut self, anchor: VertexId) -> Subgraph {
        debug_assert!(self.contains_vertex(anchor), "unknown anchor vertex");
        let dir = self.open_direction(anchor);
        let base = self.vertex(anchor).map(|v| v.coords).unwrap_or_else(Vec2::zeros);
        let coords = base + BOND_LENGTH * math::unit_from_angle(dir);
        let v = self.alloc_vertex(coords);
        let e = self.alloc_edge(anchor, v);
        self.snapshot(&[v], &[e])
    }

    /// Create the default two-atom fragment at `pos` (the result of a
    /// click on empty canvas).
    pub fn add_default_fragment(&mut self, pos: Vec2) -> Subgraph {
        let v1 = self.alloc_vertex(pos);
        let v2 = self.alloc_vertex(pos + BOND_LENGTH * math::unit_from_angle(DEFAULT_BOND_ANGLE));
        let e = self.alloc_edge(v1, v2);
        self.snapshot(&[v1, v2], &[e])
    }

    /// Grow a zig-zag chain of `n` new atoms out of `anchor`.
    pub fn add_chain(&mut self, anchor: VertexId, n: usize) -> Subgraph {
        debug_assert!(self.contains_vertex(anchor), "unknown anchor vertex");
        debug_assert!(n >= 1, "chain must add at least one atom");
        let dir = self.open_direction(anchor);
        let mut coords = self.vertex(anchor).map(|v| v.coords).unwrap_or_else(Vec2::zeros);
        let mut prev = anchor;
        let mut vs = Vec::with_capacity(n);
        let mut es = Vec::with_capacity(n);
        for i in 0..n {
            let angle = dir + if i % 2 == 0 { -FRAC_PI_6 } else { FRAC_PI_6 };
            coords += BOND_LENGTH * math::unit_from_angle(angle);
            let v = self.alloc_vertex(coords);
            es.push(self.alloc_edge(prev, v));
            vs.push(v);
            prev = v;
        }
        self.snapshot(&vs, &es)
    }

    /// Attach a regular ring of `n` atoms that includes `anchor` as a
    /// member, placed in the least crowded direction.
    pub fn attach_ring(&mut self, anchor: VertexId, n: usize) -> Subgraph {
        debug_assert!(self.contains_vertex(anchor), "unknown anchor vertex");
        debug_assert!(n >= 3, "ring needs at least three atoms");
        let dir = self.open_direction(anchor);
        let anchor_coords = self.vertex(anchor).map(|v| v.coords).unwrap_or_else(Vec2::zeros);
        let radius = BOND_LENGTH / (2.0 * (PI / n as f32).sin());
        let center = anchor_coords + radius * math::unit_from_angle(dir);
        let to_anchor = math::angle_of(&(anchor_coords - center));
        let step = TAU / n as f32;

        let mut prev = anchor;
        let mut vs = Vec::with_capacity(n - 1);
        let mut es = Vec::with_capacity(n);
        for k in 1..n {
            let coords = center + radius * math::unit_from_angle(to_anchor + step * k as f32);
            let v = self.alloc_vertex(coords);
            es.push(self.alloc_edge(prev, v));
            vs.push(v);
            prev = v;
        }
        es.push(self.alloc_edge(prev, anchor));
        self.snapshot(&vs, &es)
    }

    /// Fuse a regular ring of `n` atoms onto an existing bond; both of
    /// the bond's endpoints become ring members. The ring is placed on
    /// the less crowded side of the bond.
    pub fn fuse_ring(&mut self, edge: EdgeId, n: usize) -> Subgraph {
        debug_assert!(self.contains_edge(edge), "unknown edge");
        debug_assert!(n >= 3, "ring needs at least three atoms");
        let Some((a, b)) = self.edge(edge).map(|e| (e.v1, e.v2)) else {
            return Subgraph::default();
        };
        let ca = self.vertex(a).map(|v| v.coords).unwrap_or_else(Vec2::zeros);
        let cb = self.vertex(b).map(|v| v.coords).unwrap_or_else(Vec2::zeros);
        let side = (cb - ca).norm().max(f32::EPSILON);
        let radius = side / (2.0 * (PI / n as f32).sin());
        let apothem = side / (2.0 * (PI / n as f32).tan());
        let mid = (ca + cb) / 2.0;
        let normal = math::perpendicular(&((cb - ca) / side));

        // Pick the side of the bond with fewer atoms inside the would-be
        // ring area.
        let crowd = |center: Vec2| {
            self.vertices
                .iter()
                .filter(|v| v.id != a && v.id != b)
                .filter(|v| (v.coords - center).norm() < radius * 1.1)
                .count()
        };
        let c1 = mid + apothem * normal;
        let c2 = mid - apothem * normal;
        let center = if crowd(c1) <= crowd(c2) { c1 } else { c2 };

        let ang_a = math::angle_of(&(ca - center));
        let ang_b = math::angle_of(&(cb - center));
        let step = TAU / n as f32;
        // Step sign such that one step from a lands on b; the new atoms
        // continue around the circle from b back to a.
        let diff = math::normalize_angle(ang_b - ang_a);
        let signed_step = if (diff - step).abs() <= (diff - (TAU - step)).abs() {
            step
        } else {
            -step
        };

        let mut prev = b;
        let mut vs = Vec::with_capacity(n - 2);
        let mut es = Vec::with_capacity(n - 1);
        for k in 1..=(n - 2) {
            let coords = center + radius * math::unit_from_angle(ang_b + signed_step * k as f32);
            let v = self.alloc_vertex(coords);
            es.push(self.alloc_edge(prev, v));
            vs.push(v);
            prev = v;
        }
        es.push(self.alloc_edge(prev, a));
        self.snapshot(&vs, &es)
    }

    // ----- whole-document operations ------------------------------------

    /// Drop all structure. Id counters keep running so identities are
    /// never reused within one graph.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing graph ({} atoms, {} bonds)",
            self.vertices.len(),
            self.edges.len()
        );
        self.vertices.clear();
        self.edges.clear();
    }

    /// Serialize the whole document to its mol-string form.
    pub fn get_mol_string(&self) -> String {
        molfile::write_mol_string(&self.vertices, &self.edges)
    }

    /// Replace the whole document with the parsed mol string.
    pub fn load_mol_string(&mut self, input: &str) -> Result<(), MolFileError> {
        let doc = molfile::parse_mol_string(input)?;
        self.vertices.clear();
        self.edges.clear();
        let mut ids = Vec::with_capacity(doc.atoms.len());
        for atom in doc.atoms {
            let id = self.alloc_vertex(atom.coords);
            if let Some(v) = self.vertex_mut(id) {
                v.label = atom.label;
                v.charge = atom.charge;
            }
            ids.push(id);
        }
        for bond in doc.bonds {
            let e = self.alloc_edge(ids[bond.a], ids[bond.b]);
            if let Some(edge) = self.edge_mut(e) {
                edge.shape = bond.shape;
            }
        }
        log::debug!(
            "loaded mol string ({} atoms, {} bonds)",
            self.vertices.len(),
            self.edges.len()
        );
        Ok(())
    }

    /// Whole-graph refresh: bump every element's revision. Used after
    /// coarse restores where per-element dirty tracking is pointless.
    pub fn update(&mut self) {
        for v in &mut self.vertices {
            v.update();
        }
        for e in &mut self.edges {
            e.update();
        }
    }
}
