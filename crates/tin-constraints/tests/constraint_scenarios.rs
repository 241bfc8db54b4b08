//! End-to-end constraint scenarios (spec.md §8 scenarios 4 and 7).

use tin_constraints::{insert_linear, insert_polygon, ConstraintPoint, ConstraintSet};
use tin_engine::TinConfig;
use tin_topology::bits;

fn grid_tin(n: i32) -> tin_engine::Tin {
    let mut tin = tin_engine::Tin::new(TinConfig::new(1.0));
    for row in 0..n {
        for col in 0..n {
            tin.add_vertex(col as f64, row as f64, 0.0).unwrap();
        }
    }
    tin
}

fn pt(x: f64, y: f64) -> ConstraintPoint {
    ConstraintPoint::new(x, y, 0.0)
}

/// Scenario 4: a polygon constraint on a 5x5 grid gets every ring edge
/// marked `REGION_BORDER`, all carrying the constraint's own index.
#[test]
fn polygon_ring_edges_are_all_region_borders_at_the_assigned_index() {
    let mut tin = grid_tin(5);
    let mut set = ConstraintSet::new();
    let ring = vec![pt(1.0, 1.0), pt(3.0, 1.0), pt(3.0, 3.0), pt(1.0, 3.0), pt(1.0, 1.0)];
    let index = insert_polygon(&mut tin, &mut set, ring, true).unwrap();

    let constraint = set.get(index).unwrap();
    assert_eq!(constraint.vertices.len(), 5);

    let mut border_edges_found = 0;
    for e in tin.pool.iter_allocated() {
        if bits::is_region_border(&tin.pool, e) {
            assert_eq!(bits::region_border_index(&tin.pool, e), Some(index));
            border_edges_found += 1;
        }
    }
    // Each of the 4 ring sides contributes at least one mesh edge on both
    // the primal and dual side of the pair, so at least 4 borders exist.
    assert!(border_edges_found >= 4);
}

/// Scenario 7: a linear constraint crossing nothing else gets every segment
/// marked as a line member at the constraint's index, leaving the border
/// field untouched.
#[test]
fn linear_constraint_segments_are_line_members_with_no_border_index() {
    let mut tin = grid_tin(5);
    let mut set = ConstraintSet::new();
    let chain = vec![pt(0.0, 0.0), pt(2.0, 2.0), pt(4.0, 4.0)];
    let index = insert_linear(&mut tin, &mut set, chain).unwrap();

    let constraint = set.get(index).unwrap();
    assert!(constraint.linking_edge.is_some());

    let mut line_members_found = 0;
    for e in tin.pool.iter_allocated() {
        if bits::is_line_member(&tin.pool, e) {
            assert_eq!(bits::line_index(&tin.pool, e), Some(index));
            assert_eq!(bits::region_border_index(&tin.pool, e), None);
            line_members_found += 1;
        }
    }
    assert!(line_members_found > 0);
}

#[test]
fn unclosed_polygon_is_rejected() {
    let mut tin = grid_tin(3);
    let mut set = ConstraintSet::new();
    let open = vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)];
    let err = insert_polygon(&mut tin, &mut set, open, true);
    assert!(err.is_err());
}
