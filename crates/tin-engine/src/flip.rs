//! Edge flipping and Delaunay restoration after an insertion (spec.md
//! §4.4.3).

use std::collections::VecDeque;

use tin_kernel::{Kernel, Sign, VertexArena, VertexId};
use tin_pool::{EdgeId, EdgePool};
use tin_topology::{bits, destination, dual, forward, origin, reverse};

use crate::ghost::{is_hull_edge, link, opposite_across};
use crate::stats::EngineStats;

/// Flips quad-edge `e` (shared by two real triangles `a, b, c` and `a, d,
/// b` where `e = a -> b`) in place: reuses the same pair, now running
/// `c -> d`, and relinks the four surrounding face rings.
///
/// `e` must not be a hull edge (a flip across the ghost face is meaningless)
/// — callers check this via [`can_flip`] before calling.
pub fn flip_edge(pool: &mut EdgePool, e: EdgeId) {
    let e_dual = dual(e);

    // The four "far" edges of the two triangles, captured before any
    // mutation: e's face is a(=origin e) -> b(=dest e) -> c; e_dual's face
    // is b -> a -> d.
    let bc = forward(pool, e);
    let ca = forward(pool, bc);
    let ad = forward(pool, e_dual);
    let db = forward(pool, ad);

    let c = destination(pool, bc);
    let d = destination(pool, ad);

    pool.set_origin(e, c);
    pool.set_origin(e_dual, d);

    // New face c -> d -> a: e (c->d), da (reused), ac (reused).
    link(pool, e, ad);
    link(pool, ad, ca);
    link(pool, ca, e);

    // New face d -> c -> b: e_dual (d->c), cb (reused), bd (reused).
    link(pool, e_dual, bc);
    link(pool, bc, db);
    link(pool, db, e_dual);
}

/// True iff `e` borders two real triangles on both sides, i.e. it is
/// flippable at all.
pub fn can_flip(pool: &EdgePool, e: EdgeId) -> bool {
    !is_hull_edge(pool, e) && !is_hull_edge(pool, dual(e))
}

/// Restores the Delaunay property around a freshly-inserted vertex `v` by
/// repeatedly flipping non-Delaunay edges reachable from the seed queue,
/// skipping constrained edges (spec.md §4.5: constrained edges are frozen
/// against Delaunay flips) and re-enqueuing the two new edges a flip
/// produces that are not themselves incident to `v`.
pub fn restore_delaunay(
    pool: &mut EdgePool,
    vertices: &VertexArena,
    kernel: &Kernel,
    stats: &mut EngineStats,
    v: VertexId,
    seed: impl IntoIterator<Item = EdgeId>,
) {
    let mut queue: VecDeque<EdgeId> = seed.into_iter().collect();
    while let Some(e) = queue.pop_front() {
        if !pool.is_live(e) {
            continue;
        }
        if bits::is_constrained(pool, e) {
            continue;
        }
        if !can_flip(pool, e) {
            continue;
        }

        let a = origin(pool, e);
        let b = destination(pool, e);
        let c = opposite_across(pool, e);
        let d = opposite_across(pool, dual(e));
        if c.is_null() || d.is_null() {
            continue;
        }

        let va = vertices.get(a);
        let vb = vertices.get(b);
        let vc = vertices.get(c);
        let vd = vertices.get(d);
        // d is e's own left-face opposite (a, b, d is CCW, per the face-ring
        // convention) and c is the opposite across the right face, so c is
        // inside the circumcircle of a, b, d iff in_circle(a, b, d, c) is
        // positive. Passing (va, vb, vc, vd) instead tests a clockwise triple
        // and returns the negated sign.
        if kernel.in_circle(va, vb, vd, vc) != Sign::Positive {
            continue;
        }

        let e_dual = dual(e);
        let bc = forward(pool, e);
        let ca = reverse(pool, e);
        let ad = forward(pool, e_dual);
        let db = reverse(pool, e_dual);

        flip_edge(pool, e);
        stats.flips += 1;

        for cand in [bc, ca, ad, db] {
            if origin(pool, cand) != v && destination(pool, cand) != v {
                queue.push_back(cand);
            }
        }
    }
}
