//! A read-only locator over a `Tin` (spec.md §5: "readers must not share a
//! mutable search cursor with the writer"; SPEC_FULL.md supplements this
//! with a `nearest_vertex` query used by external collaborators that need a
//! seed vertex rather than a containing triangle).
//!
//! A `Navigator` borrows nothing; it holds its own copy of the search edge
//! so that many navigators (or a navigator alongside ongoing mutation,
//! between calls) never fight over one cursor the way `Tin::search_edge`
//! does for the writer.

use tin_kernel::{Kernel, VertexArena, VertexId};
use tin_pool::{EdgeId, EdgePool};
use tin_topology::{destination, face_vertices, origin};

use crate::locate::{self, LocateResult};
use crate::stats::WalkStats;
use crate::tin::Tin;

/// A cheap, cloneable read-only view for repeated point queries against a
/// TIN that is not being mutated concurrently with the queries (spec.md §5
/// requires no concurrent mutation; this type does not defend against it).
#[derive(Debug, Clone, Copy)]
pub struct Navigator {
    search_edge: EdgeId,
}

impl Navigator {
    pub fn new(tin: &Tin) -> Option<Self> {
        tin.search_edge.map(|search_edge| Navigator { search_edge })
    }

    /// Locates `(x, y)` against `tin`, using and then updating this
    /// navigator's own cursor (not `tin`'s).
    pub fn locate(&mut self, tin: &Tin, x: f64, y: f64) -> LocateResult {
        let mut stats = WalkStats::default();
        let result = locate::locate(
            &tin.pool,
            &tin.vertices,
            &tin.kernel,
            &mut rand::rngs::mock::StepRng::new(0, 1),
            &mut stats,
            self.search_edge,
            x,
            y,
        );
        self.search_edge = match result {
            LocateResult::Interior(e) | LocateResult::OnEdge(e) | LocateResult::Exterior(e) => e,
        };
        result
    }

    /// The nearest vertex to `(x, y)`, found by locating the containing (or
    /// nearest-hull) triangle and comparing its corners directly — correct
    /// because the nearest vertex to any query point is always a corner of
    /// the triangle containing it (or, outside the hull, a corner of the
    /// hull edge the walk exits through).
    pub fn nearest_vertex(&mut self, tin: &Tin, x: f64, y: f64) -> VertexId {
        let located = self.locate(tin, x, y);
        let candidates: Vec<VertexId> = match located {
            LocateResult::Interior(e) | LocateResult::OnEdge(e) => {
                face_vertices(&tin.pool, e).to_vec()
            }
            LocateResult::Exterior(e) => {
                vec![origin(&tin.pool, e), destination(&tin.pool, e)]
            }
        };
        nearest_of(&tin.pool, &tin.vertices, &tin.kernel, &candidates, x, y)
    }
}

fn nearest_of(
    _pool: &EdgePool,
    vertices: &VertexArena,
    _kernel: &Kernel,
    candidates: &[VertexId],
    x: f64,
    y: f64,
) -> VertexId {
    candidates
        .iter()
        .copied()
        .filter(|v| !v.is_null())
        .min_by(|&a, &b| {
            let da = dist_sq(vertices, a, x, y);
            let db = dist_sq(vertices, b, x, y);
            da.partial_cmp(&db).unwrap()
        })
        .unwrap_or(VertexId::NULL)
}

fn dist_sq(vertices: &VertexArena, v: VertexId, x: f64, y: f64) -> f64 {
    let p = vertices.get(v);
    let dx = p.x - x;
    let dy = p.y - y;
    dx * dx + dy * dy
}
