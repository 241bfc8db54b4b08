//! Extending the hull when an inserted point lands outside it (spec.md
//! §4.4.2 exterior case).
//!
//! The point `v` is tangent to the hull along a contiguous run of hull
//! edges — the *visible chain* — found by walking outward from the edge the
//! locator exited through while the next edge along the hull is still
//! strictly visible from `v`. Every visible hull edge becomes an interior
//! edge of a new triangle fanning out to `v`; the two chain endpoints keep
//! their existing ghost edges (re-linked to close against `v`'s new one),
//! and every interior chain vertex's ghost edge is freed, since it is no
//! longer on the hull.

use tin_kernel::{Kernel, Sign, VertexArena, VertexId};
use tin_pool::{EdgeId, EdgePool};
use tin_topology::{allocate_edge, destination, origin};

use crate::ghost::{ghost_edge_at, link, next_hull_edge, prev_hull_edge};
use crate::tin::Tin;

fn visible(pool: &EdgePool, vertices: &VertexArena, kernel: &Kernel, h: EdgeId, vx: f64, vy: f64) -> bool {
    let a = vertices.get(origin(pool, h));
    let b = vertices.get(destination(pool, h));
    let q = tin_kernel::Vertex::new(vx, vy, 0.0, 0);
    kernel.orient(a, b, &q) == Sign::Negative
}

/// Extends the hull to include `v`, given a hull edge known to be visible
/// from it. Returns the chain's original hull edges as the Delaunay-
/// restoration seed.
pub fn extend_hull(tin: &mut Tin, seed_edge: EdgeId, v: VertexId) -> Vec<EdgeId> {
    let vv = tin.vertices.get(v);
    let (vx, vy) = (vv.x, vv.y);

    let mut first = seed_edge;
    loop {
        let cand = prev_hull_edge(&tin.pool, first);
        if visible(&tin.pool, &tin.vertices, &tin.kernel, cand, vx, vy) {
            first = cand;
        } else {
            break;
        }
    }

    let mut last = seed_edge;
    loop {
        let cand = next_hull_edge(&tin.pool, last);
        if visible(&tin.pool, &tin.vertices, &tin.kernel, cand, vx, vy) {
            last = cand;
        } else {
            break;
        }
    }

    let mut chain = vec![first];
    let mut cursor = first;
    while cursor != last {
        cursor = next_hull_edge(&tin.pool, cursor);
        chain.push(cursor);
    }

    // w[0..=chain.len()]: the chain's vertices, w[0] the origin of `first`,
    // w[chain.len()] the destination of `last`.
    let mut w = vec![origin(&tin.pool, chain[0])];
    for &h in &chain {
        w.push(destination(&tin.pool, h));
    }
    let m = chain.len();

    // Capture endpoint ghost edges before any relinking.
    let g_w0 = ghost_edge_at(&tin.pool, chain[0]);
    let g_wm = ghost_edge_at(&tin.pool, chain[m - 1].dual());

    // Free interior chain vertices' ghost edges; they are no longer hull
    // vertices once the fan to `v` is built. Vertex `w[i]` (1 <= i < m) is
    // the destination of `chain[i - 1]`, so its ghost edge is found by
    // pinwheeling from that edge's dual.
    for i in 1..m {
        let g = ghost_edge_at(&tin.pool, chain[i - 1].dual());
        tin.pool.free(g.base());
    }

    let s: Vec<EdgeId> = w.iter().map(|&wi| allocate_edge(&mut tin.pool, wi, v)).collect();

    for i in 0..m {
        let h = chain[i];
        let dh = h.dual();
        link(&mut tin.pool, dh, s[i]);
        link(&mut tin.pool, s[i], s[i + 1].dual());
        link(&mut tin.pool, s[i + 1].dual(), dh);
    }

    let gv = allocate_edge(&mut tin.pool, v, VertexId::NULL);

    link(&mut tin.pool, s[0].dual(), g_w0);
    link(&mut tin.pool, g_w0, gv.dual());
    link(&mut tin.pool, gv.dual(), s[0].dual());

    link(&mut tin.pool, s[m], gv);
    link(&mut tin.pool, gv, g_wm.dual());
    link(&mut tin.pool, g_wm.dual(), s[m]);

    tin.search_edge = Some(s[0]);

    chain
}
