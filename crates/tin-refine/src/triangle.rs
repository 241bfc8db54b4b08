//! Enumeration of real (non-ghost) triangles, and the bad-triangle /
//! encroachment rescans the main loop runs after each insertion (spec.md
//! §4.6 "enqueue bad neighbours and newly encroached segments").

use std::collections::HashSet;

use tin_engine::Tin;
use tin_kernel::{Vertex, VertexId};
use tin_pool::EdgeId;
use tin_topology::{bits, destination, face_triangle, origin, pinwheel};

use crate::config::RuppertConfig;
use crate::geometry;
use crate::queues::{BadTriangleQueue, EncroachedQueue};
use crate::vdata::RefinementState;

/// Walks every live, non-ghost triangle exactly once (keyed by the smallest
/// of its three edge ids), calling `visit` with a representative edge.
pub fn for_each_real_triangle(tin: &Tin, mut visit: impl FnMut(EdgeId, [VertexId; 3])) {
    let mut seen: HashSet<EdgeId> = HashSet::new();
    for e in tin.pool.iter_allocated() {
        for cand in [e, e.dual()] {
            if seen.contains(&cand) {
                continue;
            }
            let tri = face_triangle(&tin.pool, cand);
            let verts = [
                origin(&tin.pool, tri[0]),
                origin(&tin.pool, tri[1]),
                origin(&tin.pool, tri[2]),
            ];
            if verts.iter().any(|v| v.is_null()) {
                continue;
            }
            let canonical = *tri.iter().min().unwrap();
            if !seen.insert(canonical) {
                continue;
            }
            for &te in &tri {
                seen.insert(te);
            }
            visit(canonical, verts);
        }
    }
}

/// Tests one real triangle (given by a representative edge and its CCW
/// corner ids) against the bad-triangle criterion and, if bad, pushes it
/// onto `queue` keyed by `cross²`. Returns whether it was bad.
pub fn rescan_triangle(
    tin: &Tin,
    state: &RefinementState,
    config: &RuppertConfig,
    edge: EdgeId,
    verts: [VertexId; 3],
    queue: &mut BadTriangleQueue,
) -> bool {
    let [a, b, c] = verts;
    let av = tin.vertices.get(a);
    let bv = tin.vertices.get(b);
    let cv = tin.vertices.get(c);
    let Some(verdict) = geometry::evaluate_triangle(av, bv, cv, config.rho_min(), config.min_triangle_area) else {
        return false;
    };

    let tri_edges = face_triangle(&tin.pool, edge);
    let shortest = tri_edges[verdict.shortest_side];

    if config.skip_seditious_triangles {
        let o = origin(&tin.pool, shortest);
        let d = destination(&tin.pool, shortest);
        if state.is_seditious_pair(o, d) {
            return false;
        }
    }

    queue.push(shortest, verdict.cross_sq);
    true
}

/// Re-examines every real triangle incident to `v` (via its pinwheel) for
/// badness, and every constrained segment incident to `v` for encroachment
/// by `v` itself — the local update spec.md asks for after an insertion,
/// since a freshly-split neighbourhood is the only part of the mesh whose
/// triangles/segments can have newly become bad or encroached.
pub fn rescan_neighbourhood(
    tin: &Tin,
    state: &RefinementState,
    config: &RuppertConfig,
    v: VertexId,
    start: EdgeId,
    bad_queue: &mut BadTriangleQueue,
    encroached_queue: &mut EncroachedQueue,
) {
    for spoke in pinwheel(&tin.pool, start) {
        let tri = face_triangle(&tin.pool, spoke);
        let verts = [
            origin(&tin.pool, tri[0]),
            origin(&tin.pool, tri[1]),
            origin(&tin.pool, tri[2]),
        ];
        if verts.iter().any(|id| id.is_null()) {
            continue;
        }
        rescan_triangle(tin, state, config, spoke, verts, bad_queue);

        for &te in &tri {
            if bits::is_constrained(&tin.pool, te) {
                let op = origin(&tin.pool, te);
                let oq = destination(&tin.pool, te);
                if op == v || oq == v {
                    continue;
                }
                let p = tin.vertices.get(op);
                let q = tin.vertices.get(oq);
                let r = tin.vertices.get(v);
                if geometry::encroaches(p, q, r) {
                    encroached_queue.push(te);
                }
            }
        }
    }
}

/// Re-evaluates the bad-triangle test for the triangle whose left face lies
/// across `edge` — the shortest-side edge that was originally pushed onto
/// the queue, whose own left face is always the triangle it was drawn from
/// (spec.md §4.6: "if t no longer exists or no longer bad, continue").
/// `None` means drop the queue entry: the edge was freed (a neighbouring
/// split or flip consumed it), one of its corners is now a ghost, the
/// triangle no longer meets the bad-triangle criterion, or it does but its
/// shortest side has become a seditious pair.
pub fn recheck_bad_triangle(
    tin: &Tin,
    state: &RefinementState,
    config: &RuppertConfig,
    edge: EdgeId,
) -> Option<geometry::BadTriangleVerdict> {
    if !tin.pool.is_live(edge) {
        return None;
    }
    let tri = face_triangle(&tin.pool, edge);
    let verts = [
        origin(&tin.pool, tri[0]),
        origin(&tin.pool, tri[1]),
        origin(&tin.pool, tri[2]),
    ];
    if verts.iter().any(|v| v.is_null()) {
        return None;
    }
    let [a, b, c] = verts;
    let verdict = geometry::evaluate_triangle(
        tin.vertices.get(a),
        tin.vertices.get(b),
        tin.vertices.get(c),
        config.rho_min(),
        config.min_triangle_area,
    )?;

    if config.skip_seditious_triangles {
        let shortest = tri[verdict.shortest_side];
        let o = origin(&tin.pool, shortest);
        let d = destination(&tin.pool, shortest);
        if state.is_seditious_pair(o, d) {
            return None;
        }
    }
    Some(verdict)
}

/// A frozen copy of every real triangle's corner coordinates, used as the
/// facet-interpolation source when [`crate::config::ZInterpolationSource::Snapshot`]
/// is selected — captured once before refinement begins so later splits
/// can't shift which facet a given point resolves against.
pub struct Snapshot {
    triangles: Vec<[Vertex; 3]>,
}

impl Snapshot {
    pub fn capture(tin: &Tin) -> Self {
        let mut triangles = Vec::new();
        for_each_real_triangle(tin, |_edge, verts| {
            triangles.push([
                *tin.vertices.get(verts[0]),
                *tin.vertices.get(verts[1]),
                *tin.vertices.get(verts[2]),
            ]);
        });
        Self { triangles }
    }

    /// Linear (barycentric) z interpolation against whichever captured
    /// triangle contains `(x, y)`; `None` if no captured triangle does
    /// (point lies outside the snapshot's hull).
    pub fn interpolate_z(&self, x: f64, y: f64) -> Option<f32> {
        for tri in &self.triangles {
            if let Some(z) = barycentric_z(tri, x, y) {
                return Some(z);
            }
        }
        None
    }
}

fn barycentric_z(tri: &[Vertex; 3], x: f64, y: f64) -> Option<f32> {
    let [a, b, c] = tri;
    let denom = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if denom.abs() < 1e-12 {
        return None;
    }
    let w_a = ((b.y - c.y) * (x - c.x) + (c.x - b.x) * (y - c.y)) / denom;
    let w_b = ((c.y - a.y) * (x - c.x) + (a.x - c.x) * (y - c.y)) / denom;
    let w_c = 1.0 - w_a - w_b;
    let eps = -1e-9;
    if w_a < eps || w_b < eps || w_c < eps {
        return None;
    }
    Some((w_a as f32) * a.z + (w_b as f32) * b.z + (w_c as f32) * c.z)
}
