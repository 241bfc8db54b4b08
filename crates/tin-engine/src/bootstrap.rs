//! Seeding a triangulation from its first three non-collinear vertices
//! (spec.md §4.4.1).
//!
//! A fresh TIN has no edges to walk from, so the first triangle is built
//! directly rather than through the general insertion path: three real
//! quad-edges for the triangle itself, plus three ghost quad-edges (one per
//! hull vertex, each running to [`tin_kernel::VertexId::NULL`]) that close
//! the outer face so every later hull-extension and point-location step can
//! treat "off the edge of the mesh" uniformly as "the face across this edge
//! has a null corner" rather than a special case.

use tin_kernel::{Kernel, Sign, Vertex, VertexId};
use tin_pool::{EdgeId, EdgePool};
use tin_topology::allocate_edge;

use crate::ghost::link;
use crate::tin::Tin;

/// Scans `staged` for the first triple that is not collinear (within the
/// kernel's orientation threshold), returning their indices in CCW order.
/// `None` if every triple so far is collinear.
pub fn select_triple(kernel: &Kernel, staged: &[Vertex]) -> Option<(usize, usize, usize)> {
    for i in 0..staged.len() {
        for j in (i + 1)..staged.len() {
            for k in (j + 1)..staged.len() {
                match kernel.orient(&staged[i], &staged[j], &staged[k]) {
                    Sign::Positive => return Some((i, j, k)),
                    Sign::Negative => return Some((i, k, j)),
                    Sign::Zero => continue,
                }
            }
        }
    }
    None
}

/// Pushes the three selected vertices into `tin`'s arena (already CCW-
/// ordered by [`select_triple`]) and builds the initial triangle plus its
/// ghost rim. Returns the primal edge `a -> b` of the real face.
pub fn bootstrap(tin: &mut Tin, a: &Vertex, b: &Vertex, c: &Vertex) -> EdgeId {
    let va = tin.vertices.push(*a);
    let vb = tin.vertices.push(*b);
    let vc = tin.vertices.push(*c);
    bootstrap_triangle(&mut tin.pool, va, vb, vc)
}

/// The pure-topology half of bootstrap: given three already-arena-resident,
/// CCW-ordered vertex ids, allocates the real triangle and its ghost rim and
/// returns the primal `a -> b` edge.
pub fn bootstrap_triangle(pool: &mut EdgePool, a: VertexId, b: VertexId, c: VertexId) -> EdgeId {
    let ab = allocate_edge(pool, a, b);
    let bc = allocate_edge(pool, b, c);
    let ca = allocate_edge(pool, c, a);
    link(pool, ab, bc);
    link(pool, bc, ca);
    link(pool, ca, ab);

    let ga = allocate_edge(pool, a, VertexId::NULL);
    let gb = allocate_edge(pool, b, VertexId::NULL);
    let gc = allocate_edge(pool, c, VertexId::NULL);

    // Ghost face across `ab`: forward(dual(ab)) = G(a), forward(G(a)) =
    // dual(G(b)), forward(dual(G(b))) = dual(ab).
    link(pool, dual_of(ab), ga);
    link(pool, ga, dual_of(gb));
    link(pool, dual_of(gb), dual_of(ab));

    link(pool, dual_of(bc), gb);
    link(pool, gb, dual_of(gc));
    link(pool, dual_of(gc), dual_of(bc));

    link(pool, dual_of(ca), gc);
    link(pool, gc, dual_of(ga));
    link(pool, dual_of(ga), dual_of(ca));

    ab
}

fn dual_of(e: EdgeId) -> EdgeId {
    e.dual()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tin_topology::{face_vertices, pinwheel};

    #[test]
    fn bootstrap_triangle_closes_three_ghost_faces() {
        let mut pool = EdgePool::new();
        let a = VertexId(0);
        let b = VertexId(1);
        let c = VertexId(2);
        let ab = bootstrap_triangle(&mut pool, a, b, c);
        let bc = pool.forward(ab);
        let ca = pool.forward(bc);
        assert_eq!(pool.forward(ca), ab);
        assert_eq!(face_vertices(&pool, ab), [a, b, c]);

        // Every hull vertex pinwheels to exactly one ghost edge.
        let ga = pinwheel(&pool, ab)
            .find(|&e| tin_topology::destination(&pool, e).is_null())
            .unwrap();
        assert_eq!(tin_topology::origin(&pool, ga), a);
    }

    #[test]
    fn select_triple_skips_collinear_prefixes() {
        let kernel = Kernel::new(tin_kernel::Thresholds::for_spacing(1.0));
        let staged = vec![
            Vertex::new(0.0, 0.0, 0.0, 0),
            Vertex::new(1.0, 0.0, 0.0, 0),
            Vertex::new(2.0, 0.0, 0.0, 0),
            Vertex::new(0.0, 1.0, 0.0, 0),
        ];
        let (i, j, k) = select_triple(&kernel, &staged).unwrap();
        assert_eq!((i, j, k), (0, 1, 3));
    }
}
