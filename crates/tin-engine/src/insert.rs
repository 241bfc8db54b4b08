//! Incremental insertion: dispatch on where the query point lands, then the
//! interior-split and on-edge-split cases (spec.md §4.4.2/§4.4.3). Hull
//! extension (the exterior case) lives in [`crate::hull`].

use tin_kernel::{TinResult, Vertex, VertexId};
use tin_pool::EdgeId;
use tin_topology::{allocate_edge, destination, face_triangle, face_vertices, origin};

use crate::flip;
use crate::ghost::link;
use crate::hull;
use crate::locate::{self, LocateResult};
use crate::tin::Tin;

/// Result of one `add_vertex` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Held in the pre-bootstrap staging buffer; not yet a TIN vertex.
    Staged,
    /// This call completed bootstrap (and possibly replayed deferred staged
    /// vertices through the normal insertion path).
    Bootstrapped,
    /// A new vertex was inserted, splitting the triangle or edge it fell in.
    Inserted(VertexId),
    /// Coincided with an existing vertex; resolved per the configured
    /// [`crate::config::VertexMergeRule`] rather than inserted.
    Merged(VertexId),
}

/// Inserts `(x, y, z)` into an already-bootstrapped `tin`.
pub fn insert_vertex(tin: &mut Tin, x: f64, y: f64, z: f32) -> TinResult<InsertOutcome> {
    let start = tin.search_edge.expect("insert_vertex requires bootstrap");
    let locate_result = locate::locate(
        &tin.pool,
        &tin.vertices,
        &tin.kernel,
        &mut tin.rng,
        &mut tin.walk_stats,
        start,
        x,
        y,
    );

    match locate_result {
        LocateResult::Interior(e) => {
            if let Some(existing) = coincident_vertex(tin, &face_vertices(&tin.pool, e), x, y) {
                return tin.resolve_merge(existing, x, y, z);
            }
            let v = tin.vertices.push(Vertex::new(x, y, z, 0));
            let seed = split_interior(tin, e, v);
            flip::restore_delaunay(
                &mut tin.pool,
                &tin.vertices,
                &tin.kernel,
                &mut tin.engine_stats,
                v,
                seed,
            );
            tin.search_edge = Some(e);
            tin.engine_stats.vertices_inserted += 1;
            Ok(InsertOutcome::Inserted(v))
        }
        LocateResult::OnEdge(e) => {
            let ends = [origin(&tin.pool, e), destination(&tin.pool, e)];
            if let Some(existing) = coincident_vertex(tin, &ends, x, y) {
                return tin.resolve_merge(existing, x, y, z);
            }
            let v = tin.vertices.push(Vertex::new(x, y, z, 0));
            let seed = split_edge(tin, e, v);
            flip::restore_delaunay(
                &mut tin.pool,
                &tin.vertices,
                &tin.kernel,
                &mut tin.engine_stats,
                v,
                seed,
            );
            tin.search_edge = Some(e);
            tin.engine_stats.vertices_inserted += 1;
            tin.engine_stats.edge_splits += 1;
            Ok(InsertOutcome::Inserted(v))
        }
        LocateResult::Exterior(hull_edge) => {
            let v = tin.vertices.push(Vertex::new(x, y, z, 0));
            let seed = hull::extend_hull(tin, hull_edge, v);
            flip::restore_delaunay(
                &mut tin.pool,
                &tin.vertices,
                &tin.kernel,
                &mut tin.engine_stats,
                v,
                seed,
            );
            tin.engine_stats.vertices_inserted += 1;
            tin.engine_stats.hull_extensions += 1;
            Ok(InsertOutcome::Inserted(v))
        }
    }
}

/// If `(x, y)` coincides (within the kernel's coincidence threshold) with
/// one of `e`'s own endpoints, returns that vertex's id.
fn coincident_vertex(tin: &Tin, e: EdgeId, x: f64, y: f64) -> Option<VertexId> {
    let threshold = tin.kernel.thresholds.vertex_coincidence_threshold;
    let threshold_sq = threshold * threshold;
    for candidate in [origin(&tin.pool, e), destination(&tin.pool, e)] {
        if candidate.is_null() {
            continue;
        }
        let cv = tin.vertices.get(candidate);
        let dx = cv.x - x;
        let dy = cv.y - y;
        if dx * dx + dy * dy <= threshold_sq {
            return Some(candidate);
        }
    }
    None
}

/// Splits the triangle to the left of `e` (corners `p, q, r`) by inserting
/// `v` in its interior: three new quad-edges `p -> v`, `q -> v`, `r -> v`,
/// and three new real faces. Returns the three original edges of `p, q, r`
/// as the Delaunay-restoration seed queue.
fn split_interior(tin: &mut Tin, e: EdgeId, v: VertexId) -> [EdgeId; 3] {
    let [pq, qr, rp] = face_triangle(&tin.pool, e);
    let p = origin(&tin.pool, pq);
    let q = origin(&tin.pool, qr);
    let r = origin(&tin.pool, rp);

    let pv = allocate_edge(&mut tin.pool, p, v);
    let qv = allocate_edge(&mut tin.pool, q, v);
    let rv = allocate_edge(&mut tin.pool, r, v);

    // Face p -> q -> v
    link(&mut tin.pool, pq, qv);
    link(&mut tin.pool, qv, pv.dual());
    link(&mut tin.pool, pv.dual(), pq);

    // Face q -> r -> v
    link(&mut tin.pool, qr, rv);
    link(&mut tin.pool, rv, qv.dual());
    link(&mut tin.pool, qv.dual(), qr);

    // Face r -> p -> v
    link(&mut tin.pool, rp, pv);
    link(&mut tin.pool, pv, rv.dual());
    link(&mut tin.pool, rv.dual(), rp);

    [pq, qr, rp]
}

/// Splits edge `e = a -> b` (shared by real faces `a, b, c` and `b, a, d`)
/// at a point `v` lying on its line: reuses `e`'s own pair (now `a -> v` /
/// `v -> a`) and allocates three new pairs (`v -> b`, `v -> c`, `v -> d`),
/// producing the four faces `a, v, c`; `v, b, c`; `b, v, d`; `v, a, d`.
/// Returns the four original "far" edges (`bc`, `ca`, `ad`, `db`) as the
/// restoration seed.
fn split_edge(tin: &mut Tin, e: EdgeId, v: VertexId) -> [EdgeId; 4] {
    let e_dual = e.dual();
    let a = origin(&tin.pool, e);
    let b = destination(&tin.pool, e);
    let bc = tin_topology::forward(&tin.pool, e);
    let ca = tin_topology::forward(&tin.pool, bc);
    let c = destination(&tin.pool, bc);
    let ad = tin_topology::forward(&tin.pool, e_dual);
    let db = tin_topology::forward(&tin.pool, ad);
    let d = destination(&tin.pool, ad);

    // Reuse e's pair as a -> v (primal, unchanged origin `a`) / v -> a
    // (dual, whose origin becomes `v`).
    tin.pool.set_origin(e_dual, v);
    let av = e;
    let va = e_dual;

    let vb = allocate_edge(&mut tin.pool, v, b);
    let vc = allocate_edge(&mut tin.pool, v, c);
    let vd = allocate_edge(&mut tin.pool, v, d);

    // Face a -> v -> c
    link(&mut tin.pool, av, vc);
    link(&mut tin.pool, vc, ca);
    link(&mut tin.pool, ca, av);

    // Face v -> b -> c
    link(&mut tin.pool, vb, bc);
    link(&mut tin.pool, bc, vc.dual());
    link(&mut tin.pool, vc.dual(), vb);

    // Face b -> v -> d
    link(&mut tin.pool, vb.dual(), vd);
    link(&mut tin.pool, vd, db);
    link(&mut tin.pool, db, vb.dual());

    // Face v -> a -> d
    link(&mut tin.pool, va, ad);
    link(&mut tin.pool, ad, vd.dual());
    link(&mut tin.pool, vd.dual(), va);

    [bc, ca, ad, db]
}
