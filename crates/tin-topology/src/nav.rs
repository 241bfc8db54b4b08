//! Navigation primitives over the edge pool (spec.md §4.3).

use tin_kernel::{VertexArena, VertexId};
use tin_pool::{EdgeId, EdgePool};

use crate::bits;

#[inline]
pub fn dual(e: EdgeId) -> EdgeId {
    e.dual()
}

#[inline]
pub fn origin(pool: &EdgePool, e: EdgeId) -> VertexId {
    pool.origin(e)
}

#[inline]
pub fn destination(pool: &EdgePool, e: EdgeId) -> VertexId {
    pool.origin(e.dual())
}

#[inline]
pub fn forward(pool: &EdgePool, e: EdgeId) -> EdgeId {
    pool.forward(e)
}

#[inline]
pub fn reverse(pool: &EdgePool, e: EdgeId) -> EdgeId {
    pool.reverse(e)
}

/// The primal (even-indexed) side of `e`'s pair — spec.md §4.3's `base_ref`.
#[inline]
pub fn base_ref(e: EdgeId) -> EdgeId {
    e.base()
}

/// Allocates a quad-edge pair from the pool and resets its constraint word
/// to the unset sentinel. Every caller in this workspace that needs a new
/// edge goes through this rather than `EdgePool::allocate` directly, so the
/// "index 0 vs unset" trap documented on [`bits::init_constraint_word`] can
/// only be hit by code outside this crate.
pub fn allocate_edge(pool: &mut EdgePool, a: VertexId, b: VertexId) -> EdgeId {
    let e = pool.allocate(a, b);
    bits::init_constraint_word(pool, e);
    bits::init_constraint_word(pool, e.dual());
    e
}

/// Splices `e` into the ring immediately before `at`, i.e. sets
/// `reverse(at) -> e -> at` and threads `e`'s own reverse/forward to fit.
/// This is the low-level ring-insertion primitive every higher-level
/// operation (triangle creation, flip, cavity retriangulation) is built
/// from; it only touches `forward`/`reverse`, never origins or constraint
/// bits.
pub fn splice_before(pool: &mut EdgePool, e: EdgeId, at: EdgeId) {
    let before = pool.reverse(at);
    pool.set_forward(before, e);
    pool.set_reverse(e, before);
    pool.set_forward(e, at);
    pool.set_reverse(at, e);
}

/// Walks the three edges of the face to the left of `e`: `e, e.forward,
/// e.forward.forward`. For a bootstrapped, fully-triangulated TIN this is
/// always length 3 (a triangle); ghost faces are also triangles (two ghost
/// edges plus one real hull edge) so this never needs special-casing them.
pub fn face_triangle(pool: &EdgePool, e: EdgeId) -> [EdgeId; 3] {
    let e1 = forward(pool, e);
    let e2 = forward(pool, e1);
    [e, e1, e2]
}

/// The three vertices of the face to the left of `e`, in the same order as
/// [`face_triangle`].
pub fn face_vertices(pool: &EdgePool, e: EdgeId) -> [VertexId; 3] {
    let [e0, e1, e2] = face_triangle(pool, e);
    [origin(pool, e0), origin(pool, e1), origin(pool, e2)]
}

/// Iterator over the pinwheel of edges leaving `origin(e)`, counterclockwise:
/// `e_{k+1} = dual(reverse(e_k))` (spec.md §4.3). Terminates when it returns
/// to the starting edge; a malformed ring (one that never closes) would spin
/// forever, so this additionally caps at one lap past the vertex's nominal
/// degree as a defensive bound — tripping that cap is a bug, not a valid
/// high-degree vertex.
pub struct Pinwheel<'a> {
    pool: &'a EdgePool,
    start: EdgeId,
    current: Option<EdgeId>,
    guard: usize,
}

impl<'a> Iterator for Pinwheel<'a> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        let cur = self.current?;
        self.guard += 1;
        debug_assert!(self.guard < 1_000_000, "pinwheel ring failed to close");
        let nxt = dual(reverse(self.pool, cur));
        self.current = if nxt == self.start { None } else { Some(nxt) };
        Some(cur)
    }
}

pub fn pinwheel(pool: &EdgePool, e: EdgeId) -> Pinwheel<'_> {
    Pinwheel {
        pool,
        start: e,
        current: Some(e),
        guard: 0,
    }
}

pub fn length_sq(pool: &EdgePool, vertices: &VertexArena, e: EdgeId) -> f64 {
    let a = vertices.get(origin(pool, e));
    let b = vertices.get(destination(pool, e));
    if a.is_null() || b.is_null() {
        return f64::INFINITY;
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

pub fn length(pool: &EdgePool, vertices: &VertexArena, e: EdgeId) -> f64 {
    length_sq(pool, vertices, e).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tin_kernel::Vertex;

    fn triangle() -> (EdgePool, VertexArena, [EdgeId; 3]) {
        let mut pool = EdgePool::new();
        let mut verts = VertexArena::new();
        let a = verts.push(Vertex::new(0.0, 0.0, 0.0, 0));
        let b = verts.push(Vertex::new(1.0, 0.0, 0.0, 0));
        let c = verts.push(Vertex::new(0.0, 1.0, 0.0, 0));

        let ab = allocate_edge(&mut pool, a, b);
        let bc = allocate_edge(&mut pool, b, c);
        let ca = allocate_edge(&mut pool, c, a);
        pool.set_forward(ab, bc);
        pool.set_reverse(bc, ab);
        pool.set_forward(bc, ca);
        pool.set_reverse(ca, bc);
        pool.set_forward(ca, ab);
        pool.set_reverse(ab, ca);
        (pool, verts, [ab, bc, ca])
    }

    #[test]
    fn face_triangle_walks_all_three_sides() {
        let (pool, _verts, [ab, bc, ca]) = triangle();
        assert_eq!(face_triangle(&pool, ab), [ab, bc, ca]);
    }

    #[test]
    fn length_of_unit_edge_is_one() {
        let (pool, verts, [ab, ..]) = triangle();
        assert!((length(&pool, &verts, ab) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn length_through_null_vertex_is_infinite() {
        let mut pool = EdgePool::new();
        let verts = VertexArena::new();
        let e = allocate_edge(&mut pool, VertexId::NULL, VertexId(0));
        assert!(length(&pool, &verts, e).is_infinite());
    }

    #[test]
    fn base_ref_is_always_the_even_index() {
        let (pool, _v, [ab, ..]) = triangle();
        assert_eq!(base_ref(ab), ab);
        assert_eq!(base_ref(ab.dual()), ab);
    }
}
