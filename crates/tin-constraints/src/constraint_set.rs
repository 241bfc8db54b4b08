//! Constraint definitions and the registry that remembers them (spec.md
//! §4.5.3/§4.5.4; the registry itself is a supplement — spec.md describes
//! per-edge bitfield bookkeeping but never names a type that owns the list
//! a caller would need to enumerate what it has added).

use serde::{Deserialize, Serialize};
use tin_kernel::VertexId;
use tin_pool::EdgeId;

/// One point of a constraint definition, in the caller's own coordinates —
/// not yet resolved to a [`VertexId`], since the vertex may or may not
/// already exist in the TIN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintPoint {
    pub x: f64,
    pub y: f64,
    pub z: f32,
}

impl ConstraintPoint {
    pub fn new(x: f64, y: f64, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// What kind of constraint a [`ConstraintDef`] describes (spec.md §4.5.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// An open chain of forced edges; no interior to flood-fill.
    Linear,
    /// A closed ring. `label_interior` controls whether the flood-fill pass
    /// runs after the ring's edges are all forced (spec.md §4.5.2) — a
    /// polygon constraint doesn't always want its interior tagged as a
    /// region (e.g. a break-line ring that just needs to stay conforming).
    Polygon { label_interior: bool },
}

/// A constraint as the caller supplies it: an ordered vertex chain plus
/// what kind it is. Polygon rings must be closed (first point equals last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDef {
    pub kind: ConstraintKind,
    pub points: Vec<ConstraintPoint>,
}

impl ConstraintDef {
    pub fn linear(points: Vec<ConstraintPoint>) -> Self {
        Self {
            kind: ConstraintKind::Linear,
            points,
        }
    }

    pub fn polygon(points: Vec<ConstraintPoint>, label_interior: bool) -> Self {
        Self {
            kind: ConstraintKind::Polygon { label_interior },
            points,
        }
    }
}

/// A constraint after it has been threaded into the mesh: the resolved
/// vertex chain and, for a region polygon, the seed edge the flood fill
/// walked from.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub index: i32,
    pub kind: ConstraintKind,
    pub vertices: Vec<VertexId>,
    /// An edge on the constraint's own ring, oriented so the region interior
    /// (for a `Polygon { label_interior: true }`) lies to its left. `None`
    /// for a `Linear` constraint, which has no interior.
    pub linking_edge: Option<EdgeId>,
}

/// Registry of every constraint added to a TIN, indexed the same way the
/// packed edge bitfield stamps its `line_index`/`region_*_index` fields —
/// every constrained edge's index refers back here (spec.md §4.5.4: "every
/// constraint edge is recorded in the per-TIN constraint list at the index
/// stamped into its bitfield").
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn get(&self, index: i32) -> Option<&Constraint> {
        self.constraints.get(usize::try_from(index).ok()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Reserves the next index and records a constraint against it. Called
    /// once the constraint's vertex chain is fully resolved and its edges
    /// are forced into the mesh.
    pub(crate) fn record(
        &mut self,
        kind: ConstraintKind,
        vertices: Vec<VertexId>,
        linking_edge: Option<EdgeId>,
    ) -> i32 {
        let index = self.constraints.len() as i32;
        self.constraints.push(Constraint {
            index,
            kind,
            vertices,
            linking_edge,
        });
        index
    }

    pub fn clear(&mut self) {
        self.constraints.clear();
    }
}
