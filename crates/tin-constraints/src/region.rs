//! Region flood-fill labelling (spec.md §4.5.2).
//!
//! Once a polygon's edges are all forced and marked `REGION_BORDER`, every
//! triangle strictly inside the ring needs its three edges stamped with the
//! same region index so a consumer can later ask "which region am I in"
//! without re-walking the boundary. The fill is a breadth-first walk over
//! faces that stops at any already-constrained edge (a region border, a
//! line, or an adjoining region's own border) — exactly the edges that are
//! frozen against Delaunay flips are also the edges that bound a region.

use std::collections::VecDeque;

use tin_engine::Tin;
use tin_pool::EdgeId;
use tin_topology::{bits, dual, face_triangle, origin};

/// Flood-fills the region whose interior lies to the left of `seed` (a
/// forced edge already marked `REGION_BORDER` at `region_index`), stamping
/// `REGION_MEMBER` + `region_index` on every interior edge it reaches.
/// Returns the number of faces visited.
pub fn flood_fill_region(tin: &mut Tin, seed: EdgeId, region_index: i32) -> usize {
    let mut visited: Vec<bool> = Vec::new();
    let mut mark_seen = |visited: &mut Vec<bool>, e: EdgeId| {
        let slot = e.0.max(0) as usize;
        if visited.len() <= slot {
            visited.resize(slot + 1, false);
        }
        let was = visited[slot];
        visited[slot] = true;
        was
    };

    let mut queue: VecDeque<EdgeId> = VecDeque::new();
    queue.push_back(seed);
    let mut faces_visited = 0usize;

    while let Some(e) = queue.pop_front() {
        if !tin.pool.is_live(e) {
            continue;
        }
        if mark_seen(&mut visited, e) {
            continue;
        }
        faces_visited += 1;

        let tri = face_triangle(&tin.pool, e);
        if tri.iter().any(|&te| origin(&tin.pool, te).is_null()) {
            // A ghost face bounds nothing; never reachable from inside a
            // closed ring but guarded against defensively.
            continue;
        }

        for &te in &tri {
            if bits::is_constrained(&tin.pool, te) {
                continue;
            }
            bits::set_region_interior_index(&mut tin.pool, te, region_index);
            bits::set_region_interior_index(&mut tin.pool, dual(te), region_index);

            let neighbor = dual(te);
            let slot = neighbor.0.max(0) as usize;
            let already = visited.get(slot).copied().unwrap_or(false);
            if !already {
                queue.push_back(neighbor);
            }
        }
    }

    faces_visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstraintDef, ConstraintPoint, ConstraintSet};
    use tin_engine::TinConfig;

    fn square_tin() -> tin_engine::Tin {
        let mut tin = tin_engine::Tin::new(TinConfig::new(1.0));
        tin.add_vertex(0.0, 0.0, 0.0).unwrap();
        tin.add_vertex(10.0, 0.0, 0.0).unwrap();
        tin.add_vertex(10.0, 10.0, 0.0).unwrap();
        tin.add_vertex(0.0, 10.0, 0.0).unwrap();
        for row in 0..=10 {
            for col in 0..=10 {
                let _ = tin.add_vertex(col as f64, row as f64, 0.0);
            }
        }
        tin
    }

    #[test]
    fn interior_triangles_of_a_small_ring_get_labelled() {
        let mut tin = square_tin();
        let mut set = ConstraintSet::new();
        let ring = ConstraintDef::polygon(
            vec![
                ConstraintPoint::new(2.0, 2.0, 0.0),
                ConstraintPoint::new(6.0, 2.0, 0.0),
                ConstraintPoint::new(6.0, 6.0, 0.0),
                ConstraintPoint::new(2.0, 6.0, 0.0),
                ConstraintPoint::new(2.0, 2.0, 0.0),
            ],
            true,
        );
        let index = crate::insert_constraint(&mut tin, &mut set, ring).unwrap();
        let recorded = set.get(index).unwrap();
        assert!(recorded.linking_edge.is_some());

        let mut interior_members = 0;
        for e in tin.pool.iter_allocated() {
            if bits::is_region_member(&tin.pool, e) && !bits::is_region_border(&tin.pool, e) {
                assert_eq!(bits::region_interior_index(&tin.pool, e), Some(index));
                interior_members += 1;
            }
        }
        assert!(interior_members > 0, "flood fill must label at least one interior edge");
    }
}
