//! End-to-end Ruppert refinement scenario (spec.md §8, scenario 5): a bare
//! 10x10 square polygon constraint, refined at a 20 degree minimum angle.

use tin_constraints::{ConstraintPoint, ConstraintSet};
use tin_engine::{Tin, TinConfig};
use tin_kernel::Vertex;
use tin_refine::triangle::for_each_real_triangle;
use tin_refine::{refine, RuppertConfig};

fn point(x: f64, y: f64) -> ConstraintPoint {
    ConstraintPoint { x, y, z: 0.0 }
}

fn square_tin() -> Tin {
    let mut tin = Tin::new(TinConfig::new(1.0));
    tin.add_vertex(0.0, 0.0, 0.0).unwrap();
    tin.add_vertex(10.0, 0.0, 0.0).unwrap();
    tin.add_vertex(10.0, 10.0, 0.0).unwrap();
    tin.add_vertex(0.0, 10.0, 0.0).unwrap();
    tin
}

fn angle_deg(p: &Vertex, q: &Vertex, r: &Vertex) -> f64 {
    let (ux, uy) = (q.x - p.x, q.y - p.y);
    let (vx, vy) = (r.x - p.x, r.y - p.y);
    let lu = (ux * ux + uy * uy).sqrt();
    let lv = (vx * vx + vy * vy).sqrt();
    let cos = ((ux * vx + uy * vy) / (lu * lv)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

fn min_angle_deg(a: &Vertex, b: &Vertex, c: &Vertex) -> f64 {
    angle_deg(a, b, c).min(angle_deg(b, c, a)).min(angle_deg(c, a, b))
}

#[test]
fn square_polygon_refines_to_twenty_degree_minimum_angle() {
    let mut tin = square_tin();
    let mut set = ConstraintSet::new();
    tin_constraints::insert_polygon(
        &mut tin,
        &mut set,
        vec![
            point(0.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
            point(0.0, 10.0),
            point(0.0, 0.0),
        ],
        true,
    )
    .unwrap();

    let config = RuppertConfig::new(20.0);
    let outcome = refine(&mut tin, &config).unwrap();

    assert!(outcome.converged);
    assert!(tin.vertices.len() >= 4);

    let mut worst = 180.0_f64;
    for_each_real_triangle(&tin, |_edge, verts| {
        let a = tin.vertices.get(verts[0]);
        let b = tin.vertices.get(verts[1]);
        let c = tin.vertices.get(verts[2]);
        worst = worst.min(min_angle_deg(a, b, c));
    });

    assert!(worst >= 20.0 - 1e-6, "worst triangle angle was {worst} degrees");
}
