//! Stochastic Lawson's-walk point location (spec.md §4.4.2).
//!
//! Starting from any live edge whose left face is real, the walk repeatedly
//! steps to whichever of the current triangle's three edges has the query
//! point strictly to its right, until no such edge exists (the point is
//! inside, or on, the current triangle) or the outside edge is a hull edge
//! (the point is exterior, and the walk stops rather than stepping into the
//! ghost face behind it). When two edges are tied for "outside" — the point
//! is beyond a shared vertex rather than cleanly past one edge — the next
//! edge is chosen by a coin flip from the TIN's seeded RNG rather than
//! always preferring the same side, so repeated walks over symmetric input
//! don't all pile onto one edge of the tie (spec.md §5: reproducible given a
//! fixed seed, not biased).

use rand::Rng;

use tin_kernel::{Kernel, Sign, Vertex, VertexArena};
use tin_pool::{EdgeId, EdgePool};
use tin_topology::{destination, dual, face_triangle, origin};

use crate::ghost::is_hull_edge;
use crate::stats::WalkStats;

/// Outcome of locating a query point relative to the current triangulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateResult {
    /// Strictly inside the triangle to the left of this edge.
    Interior(EdgeId),
    /// On the line of this edge, within the on-edge threshold.
    OnEdge(EdgeId),
    /// Outside the hull; this is the hull edge the point is outside of.
    Exterior(EdgeId),
}

/// Walks from `start` toward `(x, y)`, recording statistics into `stats`.
/// `start` must be an edge whose left face is real (never a ghost edge).
pub fn locate(
    pool: &EdgePool,
    vertices: &VertexArena,
    kernel: &Kernel,
    rng: &mut impl Rng,
    stats: &mut WalkStats,
    start: EdgeId,
    x: f64,
    y: f64,
) -> LocateResult {
    stats.walks += 1;
    let query = Vertex::new(x, y, 0.0, 0);

    let mut current = start;
    loop {
        stats.steps += 1;
        let [e0, e1, e2] = face_triangle(pool, current);
        let sides = [e0, e1, e2].map(|e| {
            let a = vertices.get(origin(pool, e));
            let b = vertices.get(destination(pool, e));
            kernel.orient(a, b, &query)
        });

        if let Some(on_idx) = sides.iter().position(|s| *s == Sign::Zero) {
            return LocateResult::OnEdge([e0, e1, e2][on_idx]);
        }

        let outside: Vec<usize> = sides
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Sign::Negative)
            .map(|(i, _)| i)
            .collect();

        let chosen = match outside.len() {
            0 => return LocateResult::Interior(current),
            1 => outside[0],
            _ => {
                stats.stochastic_tiebreaks += 1;
                outside[rng.gen_range(0..outside.len())]
            }
        };

        let edge = [e0, e1, e2][chosen];
        if is_hull_edge(pool, edge) {
            stats.exterior_walks += 1;
            return LocateResult::Exterior(edge);
        }
        current = dual(edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap_triangle;
    use rand::SeedableRng;
    use tin_kernel::{Kernel, Thresholds, VertexArena};
    use tin_pool::EdgePool;

    fn fixture() -> (EdgePool, VertexArena, Kernel, EdgeId) {
        let mut pool = EdgePool::new();
        let mut verts = VertexArena::new();
        let a = verts.push(Vertex::new(0.0, 0.0, 0.0, 0));
        let b = verts.push(Vertex::new(4.0, 0.0, 0.0, 0));
        let c = verts.push(Vertex::new(0.0, 4.0, 0.0, 0));
        let ab = bootstrap_triangle(&mut pool, a, b, c);
        let kernel = Kernel::new(Thresholds::for_spacing(1.0));
        (pool, verts, kernel, ab)
    }

    #[test]
    fn locates_interior_point() {
        let (pool, verts, kernel, ab) = fixture();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut stats = WalkStats::default();
        let result = locate(&pool, &verts, &kernel, &mut rng, &mut stats, ab, 1.0, 1.0);
        assert!(matches!(result, LocateResult::Interior(_)));
    }

    #[test]
    fn locates_exterior_point() {
        let (pool, verts, kernel, ab) = fixture();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut stats = WalkStats::default();
        let result = locate(&pool, &verts, &kernel, &mut rng, &mut stats, ab, 100.0, 100.0);
        assert!(matches!(result, LocateResult::Exterior(_)));
        assert_eq!(stats.exterior_walks, 1);
    }
}
