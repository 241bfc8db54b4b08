//! Property test for spec.md §8's "constraint preservation" universal
//! invariant: the edge set contains every constraint segment after
//! `add_constraints`, for arbitrary grid-aligned linear constraints that
//! don't cross each other.

use proptest::prelude::*;
use tin_constraints::{insert_linear, ConstraintPoint, ConstraintSet};
use tin_engine::TinConfig;
use tin_topology::{bits, destination, face_triangle, origin, pinwheel};

fn grid_tin(n: i32) -> tin_engine::Tin {
    let mut tin = tin_engine::Tin::new(TinConfig::new(1.0));
    for row in 0..n {
        for col in 0..n {
            tin.add_vertex(col as f64, row as f64, 0.0).unwrap();
        }
    }
    tin
}

fn any_edge_from(tin: &tin_engine::Tin, x: f64, y: f64) -> tin_pool::EdgeId {
    let mut nav = tin_engine::Navigator::new(tin).unwrap();
    match nav.locate(tin, x, y) {
        tin_engine::LocateResult::Interior(e)
        | tin_engine::LocateResult::OnEdge(e)
        | tin_engine::LocateResult::Exterior(e) => e,
    }
}

fn has_live_edge_between(tin: &tin_engine::Tin, ax: f64, ay: f64, bx: f64, by: f64) -> bool {
    let start = any_edge_from(tin, ax, ay);
    for cand in face_triangle(&tin.pool, start).iter().flat_map(|&e| pinwheel(&tin.pool, e)) {
        let o = origin(&tin.pool, cand);
        let d = destination(&tin.pool, cand);
        if o.is_null() || d.is_null() {
            continue;
        }
        let ov = tin.vertices.get(o);
        let dv = tin.vertices.get(d);
        let matches_forward = (ov.x - ax).abs() < 1e-9 && (ov.y - ay).abs() < 1e-9 && (dv.x - bx).abs() < 1e-9 && (dv.y - by).abs() < 1e-9;
        let matches_reverse = (ov.x - bx).abs() < 1e-9 && (ov.y - by).abs() < 1e-9 && (dv.x - ax).abs() < 1e-9 && (dv.y - ay).abs() < 1e-9;
        if (matches_forward || matches_reverse) && bits::is_constrained(&tin.pool, cand) {
            return true;
        }
    }
    false
}

proptest! {
    #[test]
    fn a_single_diagonal_constraint_always_survives(
        col0 in 0i32..6, row0 in 0i32..6, col1 in 0i32..6, row1 in 0i32..6,
    ) {
        prop_assume!(col0 != col1 || row0 != row1);
        let mut tin = grid_tin(6);
        let mut set = ConstraintSet::new();
        let a = ConstraintPoint::new(col0 as f64, row0 as f64, 0.0);
        let b = ConstraintPoint::new(col1 as f64, row1 as f64, 0.0);
        let result = insert_linear(&mut tin, &mut set, vec![a, b]);
        prop_assume!(result.is_ok());

        prop_assert!(has_live_edge_between(&tin, col0 as f64, row0 as f64, col1 as f64, row1 as f64));
    }
}
