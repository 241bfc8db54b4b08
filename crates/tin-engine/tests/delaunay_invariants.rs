//! Property tests for spec.md §8's universal invariants over the bare
//! engine: quad-edge closure, the Euler characteristic, and Delaunay-ness
//! (§8.1–§8.3). Constraints and refinement aren't exercised here — those
//! layers get their own property coverage in `tin-constraints`/`tin-refine`.

use std::collections::HashSet;

use proptest::prelude::*;

use tin_engine::ghost::opposite_across;
use tin_engine::{Tin, TinConfig};
use tin_kernel::Sign;
use tin_pool::EdgeId;
use tin_topology::{bits, destination, dual, face_triangle, forward, origin, reverse};

/// Builds a TIN from `points`, returning `None` if bootstrap never happens
/// (e.g. every point turned out collinear).
fn build(points: &[(f64, f64)]) -> Option<Tin> {
    let mut tin = Tin::new(TinConfig::new(1.0));
    for &(x, y) in points {
        tin.add_vertex(x, y, 0.0).ok()?;
    }
    if tin.bootstrapped {
        Some(tin)
    } else {
        None
    }
}

/// Number of real (non-ghost) quad-edges, counting each pair once.
fn count_real_edges(tin: &Tin) -> usize {
    tin.pool
        .iter_allocated()
        .filter(|&e| e.is_primal())
        .filter(|&e| !origin(&tin.pool, e).is_null() && !destination(&tin.pool, e).is_null())
        .count()
}

/// Number of real triangles, each counted once regardless of which of its
/// three edges (or which side of the pair) it's first reached from — same
/// dedup-by-canonical-edge approach `tin-refine::triangle::for_each_real_triangle`
/// uses, reproduced locally so this crate's own property tests don't need to
/// depend on a higher layer.
fn count_real_triangles(tin: &Tin) -> usize {
    let mut seen: HashSet<EdgeId> = HashSet::new();
    let mut count = 0;
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
            for &te in &tri {
                seen.insert(te);
            }
            count += 1;
        }
    }
    count
}

/// Pseudo-random scatter of `n` points over a bounded integer grid, driven
/// by a simple LCG so each proptest case stays deterministic from its seed
/// without pulling in a full `rand` strategy for floats.
fn scatter(seed: u64, n: usize, span: u64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(n);
    let mut state = seed.wrapping_add(1);
    for _ in 0..n {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let x = ((state >> 33) % span) as f64;
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let y = ((state >> 33) % span) as f64;
        points.push((x, y));
    }
    points
}

proptest! {
    #[test]
    fn quad_edge_closure_holds_for_every_live_edge(seed in any::<u64>(), n in 6usize..24) {
        let Some(tin) = build(&scatter(seed, n, 20)) else { return Ok(()); };
        for e in tin.pool.iter_allocated() {
            prop_assert_eq!(dual(dual(e)), e);
            prop_assert_eq!(forward(&tin.pool, reverse(&tin.pool, e)), e);
        }
    }

    #[test]
    fn euler_characteristic_holds_after_bootstrap(seed in any::<u64>(), n in 6usize..24) {
        let Some(tin) = build(&scatter(seed, n, 20)) else { return Ok(()); };
        let v = tin.vertices.len() as isize;
        let e = count_real_edges(&tin) as isize;
        let f = count_real_triangles(&tin) as isize;
        prop_assert_eq!(v - e + f, 1);
    }

    #[test]
    fn every_non_constrained_edge_is_locally_delaunay(seed in any::<u64>(), n in 6usize..24) {
        let Some(tin) = build(&scatter(seed, n, 20)) else { return Ok(()); };

        for e in tin.pool.iter_allocated() {
            if !e.is_primal() || bits::is_constrained(&tin.pool, e) {
                continue;
            }
            let a = origin(&tin.pool, e);
            let b = destination(&tin.pool, e);
            if a.is_null() || b.is_null() {
                continue;
            }
            // c is opposite across e's right face, d across its own left
            // face (spec.md §4.4.3: `in_circle(A(e), B(e), v, d)`, where `v`
            // plays the role of this edge's own left-face opposite).
            let c = opposite_across(&tin.pool, e);
            let d = opposite_across(&tin.pool, dual(e));
            if c.is_null() || d.is_null() {
                continue;
            }
            let va = tin.vertices.get(a);
            let vb = tin.vertices.get(b);
            let vc = tin.vertices.get(c);
            let vd = tin.vertices.get(d);
            prop_assert_ne!(tin.kernel.in_circle(va, vb, vd, vc), Sign::Positive);
        }
    }
}
