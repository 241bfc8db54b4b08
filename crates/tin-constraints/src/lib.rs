//! Forced-edge constraints, cavity retriangulation, and region labelling on
//! top of `tin-engine`'s incremental Delaunay triangulation (spec.md §4.5).
//!
//! A constraint is supplied as an ordered chain of coordinates
//! ([`ConstraintDef`]); this crate resolves each coordinate to a live vertex
//! (inserting it via ordinary Delaunay insertion if it isn't already
//! present), forces every consecutive pair to be an edge in the mesh
//! ([`insert_forced_edge`]), stamps the mesh edges with the constraint's
//! line or region-border index, and — for a region polygon that asks for it
//! — flood-fills the interior with the same region index.

mod constraint_set;
mod insert_forced;
mod region;

pub use constraint_set::{Constraint, ConstraintDef, ConstraintKind, ConstraintPoint, ConstraintSet};
pub use insert_forced::insert_forced_edge;
pub use region::flood_fill_region;

use tin_engine::{InsertOutcome, Navigator, Tin};
use tin_kernel::{TinError, TinResult, VertexId};
use tin_pool::EdgeId;
use tin_topology::bits;

/// Resolves a constraint point to a live [`VertexId`], inserting it into the
/// mesh by ordinary Delaunay insertion first if it is new. Coincident points
/// fall back to whatever [`tin_engine::VertexMergeRule`] the TIN is
/// configured with (spec.md §4.3.4), same as any other `add_vertex` call.
pub fn resolve_vertex(tin: &mut Tin, p: &ConstraintPoint) -> TinResult<VertexId> {
    let outcome = tin.add_vertex(p.x, p.y, p.z)?;
    match outcome {
        InsertOutcome::Inserted(v) | InsertOutcome::Merged(v) => Ok(v),
        InsertOutcome::Bootstrapped => {
            let mut nav = Navigator::new(tin).ok_or(TinError::NotBootstrapped)?;
            Ok(nav.nearest_vertex(tin, p.x, p.y))
        }
        InsertOutcome::Staged => Err(TinError::NotBootstrapped),
    }
}

/// Forces a whole constraint's chain of vertices into the mesh, stamps the
/// resulting edges per [`ConstraintKind`], runs the region flood-fill when
/// asked, records the constraint, and returns its assigned index.
pub fn insert_constraint(tin: &mut Tin, set: &mut ConstraintSet, def: ConstraintDef) -> TinResult<i32> {
    if tin.locked {
        return Err(TinError::TinLocked);
    }
    match def.kind {
        ConstraintKind::Polygon { .. } => {
            if def.points.len() < 4 {
                return Err(TinError::UnclosedPolygon);
            }
            let first = &def.points[0];
            let last = &def.points[def.points.len() - 1];
            if (first.x - last.x).abs() > 1e-9 || (first.y - last.y).abs() > 1e-9 {
                return Err(TinError::UnclosedPolygon);
            }
        }
        ConstraintKind::Linear => {
            if def.points.len() < 2 {
                return Err(TinError::DegenerateConstraint);
            }
        }
    }

    let mut vertices = Vec::with_capacity(def.points.len());
    for p in &def.points {
        vertices.push(resolve_vertex(tin, p)?);
    }

    let mut forced_edges: Vec<EdgeId> = Vec::new();
    for pair in vertices.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a == b {
            continue;
        }
        let mut segment = insert_forced_edge(tin, a, b)?;
        forced_edges.append(&mut segment);
    }

    let linking_edge = forced_edges.first().copied();
    let index = set.record(def.kind, vertices, linking_edge);

    let is_region = matches!(def.kind, ConstraintKind::Polygon { .. });
    for &e in &forced_edges {
        if is_region {
            bits::set_region_border_index(&mut tin.pool, e, index);
            bits::set_region_border_index(&mut tin.pool, tin_topology::dual(e), index);
        } else {
            bits::set_line_index(&mut tin.pool, e, index);
            bits::set_line_index(&mut tin.pool, tin_topology::dual(e), index);
        }
    }

    if let ConstraintKind::Polygon { label_interior: true } = def.kind {
        if let Some(seed) = linking_edge {
            flood_fill_region(tin, seed, index);
        }
    }

    Ok(index)
}

/// Convenience wrapper for an open polyline with no interior to label.
pub fn insert_linear(tin: &mut Tin, set: &mut ConstraintSet, points: Vec<ConstraintPoint>) -> TinResult<i32> {
    insert_constraint(tin, set, ConstraintDef::linear(points))
}

/// Convenience wrapper for a closed ring, optionally flood-filling its
/// interior as a region.
pub fn insert_polygon(
    tin: &mut Tin,
    set: &mut ConstraintSet,
    points: Vec<ConstraintPoint>,
    label_interior: bool,
) -> TinResult<i32> {
    insert_constraint(tin, set, ConstraintDef::polygon(points, label_interior))
}
