//! End-to-end incremental-insertion scenarios over the bare engine (no
//! constraints, no refinement).

use tin_engine::{InsertOutcome, Navigator, TinConfig};

fn square_tin() -> tin_engine::Tin {
    let mut tin = tin_engine::Tin::new(TinConfig::new(1.0));
    tin.add_vertex(0.0, 0.0, 0.0).unwrap();
    tin.add_vertex(1.0, 0.0, 0.0).unwrap();
    tin.add_vertex(1.0, 1.0, 0.0).unwrap();
    tin.add_vertex(0.0, 1.0, 0.0).unwrap();
    tin
}

#[test]
fn unit_square_triangulates_into_two_triangles() {
    let tin = square_tin();
    assert!(tin.bootstrapped);
    // 4 real edges on the hull + 1 diagonal = 5 real quad-edges, plus 4
    // ghost quad-edges = 9 live pairs.
    assert_eq!(tin.pool.live_count(), 9);
    assert_eq!(tin.engine_stats.vertices_inserted, 4);
}

#[test]
fn five_by_five_grid_has_the_expected_triangle_count() {
    let mut tin = tin_engine::Tin::new(TinConfig::new(1.0));
    for row in 0..5 {
        for col in 0..5 {
            tin.add_vertex(col as f64, row as f64, 0.0).unwrap();
        }
    }
    assert!(tin.bootstrapped);
    // A fully-triangulated m x n point grid has 2*(m-1)*(n-1) triangles; for
    // a 5x5 grid that's 32. Each triangle contributes 3 edges, each interior
    // edge shared by 2 triangles and each hull edge by 1, so live real
    // quad-edges = (3 * 32 + hull_len) / 2 with hull_len = 16 for this grid.
    let v = tin.vertices.len();
    assert_eq!(v, 25);
    let hull_len = 16;
    let expected_real_edges = (3 * 32 + hull_len) / 2;
    let expected_live_pairs = expected_real_edges + hull_len; // plus one ghost pair per hull vertex
    assert_eq!(tin.pool.live_count(), expected_live_pairs);
}

#[test]
fn coincident_vertex_merges_rather_than_duplicates() {
    let mut tin = square_tin();
    let before = tin.vertices.len();
    let outcome = tin.add_vertex(0.0, 0.0, 5.0).unwrap();
    assert!(matches!(outcome, InsertOutcome::Merged(_)));
    assert_eq!(tin.vertices.len(), before);
    assert_eq!(tin.engine_stats.merges, 1);
}

#[test]
fn exterior_point_extends_the_hull() {
    let mut tin = square_tin();
    let before_merges = tin.engine_stats.hull_extensions;
    let outcome = tin.add_vertex(5.0, 5.0, 0.0).unwrap();
    assert!(matches!(outcome, InsertOutcome::Inserted(_)));
    assert_eq!(tin.engine_stats.hull_extensions, before_merges + 1);
    assert_eq!(tin.vertices.len(), 5);
}

#[test]
fn navigator_finds_nearest_vertex() {
    let tin = square_tin();
    let mut nav = Navigator::new(&tin).unwrap();
    let nearest = nav.nearest_vertex(&tin, 0.1, 0.1);
    let v = tin.vertices.get(nearest);
    assert!((v.x - 0.0).abs() < 1e-9);
    assert!((v.y - 0.0).abs() < 1e-9);
}
