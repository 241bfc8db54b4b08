//! Consumer-facing facade over the constrained Delaunay TIN engine
//! (spec.md §6 "External interfaces").
//!
//! This crate wires `tin-engine`, `tin-constraints`, and `tin-refine`
//! together into one handle the way the teacher's `core-model` wires
//! `core-state`/`core-actions`/`core-text` into a single `EditorModel`: the
//! lower crates reach directly into each other's public fields (one mutation
//! domain, per spec.md §5), and this crate is where the external boundary
//! actually exists. Everything callers need — insertion, constraints,
//! refinement, and the read-only per-edge/per-vertex accessors external
//! collaborators (interpolators, contour builders) build against — is
//! exposed here; nothing else in the workspace is meant to be used directly
//! by a caller outside this crate.
//!
//! Explicitly not implemented, per spec.md §1/§6 (external-collaborator
//! concerns that consume this crate rather than living inside it):
//! triangular-facet/natural-neighbor/IDW interpolation, rasterization,
//! contour tracing, Voronoi/Thiessen extraction, smoothing filters, the
//! bit-exact wire serialization format, and any CLI/GUI surface.

pub mod hilbert;

pub use hilbert::InsertOrder;
pub use tin_constraints::{ConstraintDef, ConstraintKind, ConstraintPoint};
pub use tin_engine::{Bounds, InsertOutcome, VertexMergeRule};
pub use tin_kernel::{TinError, TinResult, VertexId, VertexKindTag};
pub use tin_pool::EdgeId;
pub use tin_refine::{RefineOutcome, RuppertConfig, ZInterpolationSource};

use tin_constraints::ConstraintSet;
use tin_engine::{Navigator, TinConfig};
use tin_topology::{bits, destination, dual, face_triangle, forward, origin, pinwheel, reverse};

/// A constrained Delaunay TIN: the consumer-facing handle spec.md §6 names.
///
/// Owns the engine's `Tin` (vertex arena, edge pool, kernel, search cursor)
/// and the registry of constraints threaded into it. Everything below is a
/// thin dispatch onto `tin-engine`/`tin-constraints`/`tin-refine` — this
/// struct's only real job is keeping the constraint registry in sync with
/// the mesh it describes.
pub struct Tin {
    engine: tin_engine::Tin,
    constraints: ConstraintSet,
}

impl Tin {
    /// `new_tin(nominal_spacing)` (spec.md §6): an empty TIN whose kernel
    /// thresholds and default merge/seed policy are derived from
    /// `nominal_spacing`.
    pub fn new_tin(nominal_spacing: f64) -> Self {
        Self {
            engine: tin_engine::Tin::new(TinConfig::new(nominal_spacing)),
            constraints: ConstraintSet::new(),
        }
    }

    /// `add_vertex(v)` (spec.md §6): inserts or merges a single vertex.
    pub fn add_vertex(&mut self, x: f64, y: f64, z: f32) -> TinResult<InsertOutcome> {
        self.engine.add_vertex(x, y, z)
    }

    /// `add_vertices(iter, order)` (spec.md §6): bulk insert, optionally
    /// Hilbert-reordered first for throughput (spec.md §5 — a performance
    /// hint with no effect on the final Delaunay result). Returns the
    /// number of vertices processed (inserted or merged).
    pub fn add_vertices(
        &mut self,
        vertices: impl IntoIterator<Item = (f64, f64, f32)>,
        order: InsertOrder,
    ) -> TinResult<u32> {
        let points: Vec<(f64, f64, f32)> = vertices.into_iter().collect();
        let ordered = hilbert::reorder(&points, order);
        let mut count = 0u32;
        for (x, y, z) in ordered {
            self.engine.add_vertex(x, y, z)?;
            count += 1;
        }
        Ok(count)
    }

    /// `add_constraints(list, restore_conformity, pre_interpolate_z?)`
    /// (spec.md §6): forces every constraint's chain of edges into the
    /// mesh, stamps line/region-border bits, flood-fills labelled regions,
    /// and returns each constraint's assigned index in input order.
    ///
    /// `pre_interpolate_z`, when true, fills any constraint point whose `z`
    /// is `NaN` by barycentric interpolation against the mesh as it stands
    /// *before* any of this call's constraints are inserted — narrower than
    /// a general interpolation module (explicitly out of scope, spec.md §1)
    /// since it only ever feeds this one call's own input points.
    ///
    /// `restore_conformity`, when true, runs a Delaunay-restoration flip
    /// pass around every vertex touched by a forced edge after all
    /// constraints are threaded in — widening the local Delaunay-ness the
    /// cavity retriangulation already guarantees to the rest of each
    /// touched vertex's neighbourhood. When false, only the cavity-local
    /// guarantee `tin-constraints` already provides holds.
    pub fn add_constraints(
        &mut self,
        mut list: Vec<ConstraintDef>,
        restore_conformity: bool,
        pre_interpolate_z: bool,
    ) -> TinResult<Vec<i32>> {
        if pre_interpolate_z {
            let snapshot = tin_refine::triangle::Snapshot::capture(&self.engine);
            for def in &mut list {
                for p in &mut def.points {
                    if p.z.is_nan() {
                        p.z = snapshot.interpolate_z(p.x, p.y).unwrap_or(0.0);
                    }
                }
            }
        }

        let mut indices = Vec::with_capacity(list.len());
        let mut touched = Vec::new();
        for def in list {
            let index = tin_constraints::insert_constraint(&mut self.engine, &mut self.constraints, def)?;
            if let Some(c) = self.constraints.get(index) {
                touched.extend(c.vertices.iter().copied());
            }
            indices.push(index);
        }

        if restore_conformity {
            for v in touched {
                if let Some(seed) = self.any_edge_incident(v) {
                    let seeds: Vec<EdgeId> = pinwheel(&self.engine.pool, seed).collect();
                    tin_engine::flip::restore_delaunay(
                        &mut self.engine.pool,
                        &self.engine.vertices,
                        &self.engine.kernel,
                        &mut self.engine.engine_stats,
                        v,
                        seeds,
                    );
                }
            }
        }

        Ok(indices)
    }

    /// `lock()` (spec.md §6): refuse further mutation; readers remain safe.
    pub fn lock(&mut self) {
        self.engine.lock();
    }

    /// `is_locked()` (spec.md §6).
    pub fn is_locked(&self) -> bool {
        self.engine.is_locked()
    }

    /// `clear()` (spec.md §6): discards every vertex, edge, and constraint.
    pub fn clear(&mut self) {
        self.engine.clear();
        self.constraints.clear();
    }

    /// `bounds()` (spec.md §6): the axis-aligned box over every real vertex
    /// added so far, or `None` before the first vertex.
    pub fn bounds(&self) -> Option<Bounds> {
        self.engine.bounds
    }

    /// `get_triangles()` (spec.md §6): every real (non-ghost) triangle, as
    /// a representative edge plus its three corner vertex ids.
    pub fn get_triangles(&self) -> Vec<(EdgeId, [VertexId; 3])> {
        let mut out = Vec::new();
        tin_refine::triangle::for_each_real_triangle(&self.engine, |edge, verts| {
            out.push((edge, verts));
        });
        out
    }

    /// `get_edges()` (spec.md §6): every live primal (even-index) edge.
    pub fn get_edges(&self) -> Vec<EdgeId> {
        self.engine
            .pool
            .iter_allocated()
            .filter(|e| e.is_primal())
            .collect()
    }

    /// `get_perimeter()` (spec.md §6): the hull ring, walked counterclockwise
    /// starting from the engine's current search edge. Empty before
    /// bootstrap.
    pub fn get_perimeter(&self) -> Vec<EdgeId> {
        let mut out = Vec::new();
        let Some(start_edge) = self.engine.search_edge else {
            return out;
        };
        let Some(mut h) = self.find_hull_edge(start_edge) else {
            return out;
        };
        let first = h;
        loop {
            out.push(h);
            h = tin_engine::ghost::next_hull_edge(&self.engine.pool, h);
            if h == first {
                break;
            }
        }
        out
    }

    /// Finds a hull edge reachable from `seed` by pinwheeling around its
    /// origin — `search_edge` isn't guaranteed to be a hull edge itself.
    fn find_hull_edge(&self, seed: EdgeId) -> Option<EdgeId> {
        for cand in pinwheel(&self.engine.pool, seed) {
            if tin_engine::ghost::is_hull_edge(&self.engine.pool, cand) {
                return Some(cand);
            }
        }
        None
    }

    /// `navigator()` (spec.md §6): a fresh locator bound to this TIN. Each
    /// caller needing concurrent read-only queries must hold its own
    /// (spec.md §5: "readers must not share the navigator").
    pub fn navigator(&self) -> Option<Navigator> {
        Navigator::new(&self.engine)
    }

    /// `refine(ruppert_options)` (spec.md §6): Ruppert quality refinement,
    /// inserting Steiner points until every triangle meets the angle/area
    /// criteria or `max_iterations` is reached.
    pub fn refine(&mut self, options: &RuppertConfig) -> TinResult<RefineOutcome> {
        tin_refine::refine(&mut self.engine, options)
    }

    fn any_edge_incident(&self, v: VertexId) -> Option<EdgeId> {
        let p = *self.engine.vertices.get(v);
        let mut nav = Navigator::new(&self.engine)?;
        let located = nav.locate(&self.engine, p.x, p.y);
        let seed = match located {
            tin_engine::LocateResult::Interior(e)
            | tin_engine::LocateResult::OnEdge(e)
            | tin_engine::LocateResult::Exterior(e) => e,
        };
        for cand in face_triangle(&self.engine.pool, seed) {
            if origin(&self.engine.pool, cand) == v {
                return Some(cand);
            }
            if destination(&self.engine.pool, cand) == v {
                return Some(dual(cand));
            }
        }
        None
    }

    // -- Per-edge accessors for external collaborators (spec.md §6) --

    pub fn origin(&self, e: EdgeId) -> VertexId {
        origin(&self.engine.pool, e)
    }
    pub fn destination(&self, e: EdgeId) -> VertexId {
        destination(&self.engine.pool, e)
    }
    pub fn forward(&self, e: EdgeId) -> EdgeId {
        forward(&self.engine.pool, e)
    }
    pub fn reverse(&self, e: EdgeId) -> EdgeId {
        reverse(&self.engine.pool, e)
    }
    pub fn dual(&self, e: EdgeId) -> EdgeId {
        dual(e)
    }
    pub fn pinwheel(&self, e: EdgeId) -> impl Iterator<Item = EdgeId> + '_ {
        pinwheel(&self.engine.pool, e)
    }
    pub fn is_constrained(&self, e: EdgeId) -> bool {
        bits::is_constrained(&self.engine.pool, e)
    }
    pub fn is_constraint_line_member(&self, e: EdgeId) -> bool {
        bits::is_line_member(&self.engine.pool, e)
    }
    pub fn is_constraint_region_border(&self, e: EdgeId) -> bool {
        bits::is_region_border(&self.engine.pool, e)
    }
    pub fn is_constraint_region_interior(&self, e: EdgeId) -> bool {
        bits::is_region_member(&self.engine.pool, e) && !bits::is_region_border(&self.engine.pool, e)
    }
    pub fn constraint_border_index(&self, e: EdgeId) -> Option<i32> {
        bits::region_border_index(&self.engine.pool, e)
    }
    pub fn constraint_line_index(&self, e: EdgeId) -> Option<i32> {
        bits::line_index(&self.engine.pool, e)
    }
    pub fn constraint_region_interior_index(&self, e: EdgeId) -> Option<i32> {
        bits::region_interior_index(&self.engine.pool, e)
    }

    // -- Per-vertex accessors for external collaborators (spec.md §6) --

    pub fn x(&self, v: VertexId) -> f64 {
        self.engine.vertices.get(v).x
    }
    pub fn y(&self, v: VertexId) -> f64 {
        self.engine.vertices.get(v).y
    }
    pub fn z(&self, v: VertexId) -> f32 {
        self.engine.vertices.get(v).z
    }
    pub fn index(&self, v: VertexId) -> i32 {
        self.engine.vertices.get(v).index
    }
    pub fn is_null(&self, v: VertexId) -> bool {
        self.engine.vertices.get(v).is_null()
    }
    pub fn is_synthetic(&self, v: VertexId) -> bool {
        self.engine
            .vertices
            .get(v)
            .status
            .contains(tin_kernel::VertexStatus::SYNTHETIC)
    }
    pub fn is_constraint_member(&self, v: VertexId) -> bool {
        self.engine
            .vertices
            .get(v)
            .status
            .contains(tin_kernel::VertexStatus::CONSTRAINT_MEMBER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Tin {
        let mut tin = Tin::new_tin(1.0);
        tin.add_vertex(0.0, 0.0, 0.0).unwrap();
        tin.add_vertex(2.0, 0.0, 0.0).unwrap();
        tin.add_vertex(2.0, 2.0, 0.0).unwrap();
        tin.add_vertex(0.0, 2.0, 0.0).unwrap();
        tin
    }

    #[test]
    fn unit_square_has_two_real_triangles() {
        let tin = square();
        assert_eq!(tin.get_triangles().len(), 2);
    }

    #[test]
    fn bounds_reflect_inserted_vertices() {
        let tin = square();
        let b = tin.bounds().unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn perimeter_is_a_closed_four_edge_ring() {
        let tin = square();
        let perimeter = tin.get_perimeter();
        assert_eq!(perimeter.len(), 4);
        for &h in &perimeter {
            assert!(tin_engine::ghost::is_hull_edge(&tin.engine.pool, h));
        }
    }

    #[test]
    fn lock_rejects_further_mutation() {
        let mut tin = square();
        tin.lock();
        assert!(tin.is_locked());
        assert!(tin.add_vertex(5.0, 5.0, 0.0).is_err());
    }

    #[test]
    fn polygon_constraint_stamps_region_border_on_every_ring_edge() {
        let mut tin = Tin::new_tin(1.0);
        for row in 0..=4 {
            for col in 0..=4 {
                tin.add_vertex(col as f64, row as f64, 0.0).unwrap();
            }
        }
        let ring = vec![
            ConstraintPoint::new(1.0, 1.0, 0.0),
            ConstraintPoint::new(3.0, 1.0, 0.0),
            ConstraintPoint::new(3.0, 3.0, 0.0),
            ConstraintPoint::new(1.0, 3.0, 0.0),
            ConstraintPoint::new(1.0, 1.0, 0.0),
        ];
        let indices = tin
            .add_constraints(vec![ConstraintDef::polygon(ring, true)], true, false)
            .unwrap();
        assert_eq!(indices.len(), 1);
        let idx = indices[0];

        let mut border_edges = 0;
        for e in tin.get_edges() {
            if tin.is_constraint_region_border(e) {
                assert_eq!(tin.constraint_border_index(e), Some(idx));
                border_edges += 1;
            }
        }
        assert_eq!(border_edges, 4);
    }

    #[test]
    fn refine_converges_on_a_square_polygon() {
        let mut tin = Tin::new_tin(1.0);
        tin.add_vertex(0.0, 0.0, 0.0).unwrap();
        tin.add_vertex(10.0, 0.0, 0.0).unwrap();
        tin.add_vertex(10.0, 10.0, 0.0).unwrap();
        tin.add_vertex(0.0, 10.0, 0.0).unwrap();
        let ring = vec![
            ConstraintPoint::new(0.0, 0.0, 0.0),
            ConstraintPoint::new(10.0, 0.0, 0.0),
            ConstraintPoint::new(10.0, 10.0, 0.0),
            ConstraintPoint::new(0.0, 10.0, 0.0),
            ConstraintPoint::new(0.0, 0.0, 0.0),
        ];
        tin.add_constraints(vec![ConstraintDef::polygon(ring, true)], false, false)
            .unwrap();

        let outcome = tin.refine(&RuppertConfig::new(20.0)).unwrap();
        assert!(outcome.converged);
        assert!(tin.get_triangles().len() >= 2);

        let angle_deg = |px: f64, py: f64, qx: f64, qy: f64, rx: f64, ry: f64| -> f64 {
            let (ux, uy) = (qx - px, qy - py);
            let (vx, vy) = (rx - px, ry - py);
            let lu = (ux * ux + uy * uy).sqrt();
            let lv = (vx * vx + vy * vy).sqrt();
            let cos = ((ux * vx + uy * vy) / (lu * lv)).clamp(-1.0, 1.0);
            cos.acos().to_degrees()
        };

        let mut worst = 180.0_f64;
        for (_edge, verts) in tin.get_triangles() {
            let (ax, ay) = (tin.x(verts[0]), tin.y(verts[0]));
            let (bx, by) = (tin.x(verts[1]), tin.y(verts[1]));
            let (cx, cy) = (tin.x(verts[2]), tin.y(verts[2]));
            let tri_min = angle_deg(ax, ay, bx, by, cx, cy)
                .min(angle_deg(bx, by, cx, cy, ax, ay))
                .min(angle_deg(cx, cy, ax, ay, bx, by));
            worst = worst.min(tri_min);
        }
        assert!(worst >= 20.0 - 1e-6, "worst triangle angle was {worst} degrees");
    }
}
