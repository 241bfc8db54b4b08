//! Helpers for the ghost/null-vertex rim that closes the outer face
//! (spec.md §3 "Ghost vertex / null vertex").
//!
//! The mesh is a standard half-edge (DCEL) structure: `forward`/`reverse`
//! thread the face ring (`Lnext`/`Lprev`), `dual` is the twin/`Sym` side, and
//! the vertex ring (`pinwheel`, i.e. `Onext`) is derived as `dual(reverse(e))`
//! per spec.md §4.3 and `tin-topology::nav`. Every hull vertex has exactly
//! one *ghost edge* — a real vertex to [`NULL_VERTEX`] — and every hull edge
//! `U -> V` owns a private 3-cycle ghost face built from that edge's dual
//! plus the ghost edges at `U` and at `V`:
//!
//! ```text
//! forward(dual(h))       = G(U)
//! forward(G(U))          = dual(G(V))
//! forward(dual(G(V)))    = dual(h)
//! ```
//!
//! where `G(X)` is the ghost edge `X -> NULL`. This is what `bootstrap` and
//! `hull` build directly, and what lets `next_hull_edge`/`prev_hull_edge`
//! walk the hull ring without scanning the whole mesh.

use tin_pool::{EdgeId, EdgePool};
use tin_topology::{destination, dual, forward, pinwheel, reverse};

/// Sets `forward(e) = to` and `reverse(to) = e` together — every face-ring
/// assignment in this crate is made through this helper so the two
/// directions can never drift apart.
pub fn link(pool: &mut EdgePool, e: EdgeId, to: EdgeId) {
    pool.set_forward(e, to);
    pool.set_reverse(to, e);
}

/// `Onext(e) = dual(reverse(e))`, the standard DCEL vertex-ring successor.
pub fn onext(pool: &EdgePool, e: EdgeId) -> EdgeId {
    dual(reverse(pool, e))
}

/// `Oprev(e) = forward(dual(e))`, the inverse of [`onext`].
pub fn oprev(pool: &EdgePool, e: EdgeId) -> EdgeId {
    forward(pool, dual(e))
}

/// Finds the ghost edge (`X -> NULL`) incident to `origin(e)`, by pinwheeling
/// around `e`'s origin. Every hull vertex has exactly one; panics (via the
/// pinwheel's own closure guard) if the ring never closes, and returns
/// `EdgeId::NONE` if `origin(e)` is not on the hull.
pub fn ghost_edge_at(pool: &EdgePool, e: EdgeId) -> EdgeId {
    for cand in pinwheel(pool, e) {
        if destination(pool, cand).is_null() {
            return cand;
        }
    }
    EdgeId::NONE
}

/// The third vertex of the face to the right of `h` (i.e. the face of
/// `dual(h)`) — `NULL` iff `h` is a hull edge.
pub fn opposite_across(pool: &EdgePool, h: EdgeId) -> tin_kernel::VertexId {
    let f1 = forward(pool, dual(h));
    destination(pool, f1)
}

/// True iff `h` is a hull edge: the face on its dual side has `NULL_VERTEX`
/// as its third corner.
pub fn is_hull_edge(pool: &EdgePool, h: EdgeId) -> bool {
    opposite_across(pool, h).is_null()
}

/// Given hull edge `h = A -> B` (real interior to its left), returns the
/// next hull edge continuing CCW around the hull, `B -> C`.
pub fn next_hull_edge(pool: &EdgePool, h: EdgeId) -> EdgeId {
    let b = dual(h);
    let g_b = ghost_edge_at(pool, b);
    dual(reverse(pool, g_b))
}

/// Given hull edge `h = A -> B`, returns the previous hull edge, `Z -> A`.
pub fn prev_hull_edge(pool: &EdgePool, h: EdgeId) -> EdgeId {
    let g_a = oprev(pool, h);
    dual(oprev(pool, g_a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap_triangle;
    use tin_kernel::{Vertex, VertexArena};
    use tin_pool::EdgePool;

    fn seed_triangle() -> (EdgePool, VertexArena, EdgeId) {
        let mut pool = EdgePool::new();
        let mut verts = VertexArena::new();
        let a = verts.push(Vertex::new(0.0, 0.0, 0.0, 0));
        let b = verts.push(Vertex::new(2.0, 0.0, 0.0, 0));
        let c = verts.push(Vertex::new(1.0, 2.0, 0.0, 0));
        let ab = bootstrap_triangle(&mut pool, a, b, c);
        (pool, verts, ab)
    }

    #[test]
    fn hull_ring_is_three_edges_for_a_bootstrap_triangle() {
        let (pool, _v, ab) = seed_triangle();
        assert!(is_hull_edge(&pool, ab));
        let bc = next_hull_edge(&pool, ab);
        let ca = next_hull_edge(&pool, bc);
        let back_to_ab = next_hull_edge(&pool, ca);
        assert_eq!(back_to_ab, ab);
        assert_eq!(prev_hull_edge(&pool, bc), ab);
        assert_eq!(prev_hull_edge(&pool, ab), ca);
    }

    #[test]
    fn ghost_edge_is_found_at_every_hull_vertex() {
        let (pool, _v, ab) = seed_triangle();
        let g = ghost_edge_at(&pool, ab);
        assert!(destination(&pool, g).is_null());
    }
}
