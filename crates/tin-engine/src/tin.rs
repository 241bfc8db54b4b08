//! The `Tin` struct: the single owner of a triangulation's vertex arena,
//! edge pool, kernel, and mutable cursor state (spec.md §3 "TIN state",
//! §4.4 "Engine").

use rand::rngs::StdRng;
use rand::SeedableRng;

use tin_kernel::{Kernel, Thresholds, TinError, TinResult, Vertex, VertexArena, VertexId};
use tin_pool::{EdgeId, EdgePool};

use crate::bootstrap;
use crate::bounds::Bounds;
use crate::config::{TinConfig, VertexMergeRule};
use crate::insert::{self, InsertOutcome};
use crate::stats::{EngineStats, WalkStats};

/// Vertices seen before bootstrap, held until three non-collinear points are
/// available (spec.md §4.4.1 "Bootstrap").
#[derive(Debug, Default)]
struct Staging {
    vertices: Vec<Vertex>,
}

/// One triangulated irregular network: the vertex arena, edge pool, kernel,
/// and the cursor/config state the incremental algorithms mutate.
///
/// Every other crate in this workspace (`tin-constraints`, `tin-refine`, the
/// `tin` facade) takes `&mut Tin` and reaches into these fields directly —
/// there is deliberately no accessor layer inside the workspace, only at the
/// facade's external boundary (spec.md §5).
#[derive(Debug)]
pub struct Tin {
    pub vertices: VertexArena,
    pub pool: EdgePool,
    pub kernel: Kernel,
    pub config: TinConfig,
    pub bounds: Option<Bounds>,

    /// Any live edge, used to seed the next point-location walk. `None`
    /// before bootstrap.
    pub search_edge: Option<EdgeId>,
    pub bootstrapped: bool,
    pub locked: bool,

    pub rng: StdRng,
    pub engine_stats: EngineStats,
    pub walk_stats: WalkStats,

    staging: Staging,
}

impl Tin {
    pub fn new(config: TinConfig) -> Self {
        let thresholds = Thresholds::for_spacing(config.nominal_spacing);
        Self {
            vertices: VertexArena::new(),
            pool: EdgePool::new(),
            kernel: Kernel::new(thresholds),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            bounds: None,
            search_edge: None,
            bootstrapped: false,
            locked: false,
            engine_stats: EngineStats::default(),
            walk_stats: WalkStats::default(),
            staging: Staging::default(),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.pool.clear();
        self.bounds = None;
        self.search_edge = None;
        self.bootstrapped = false;
        self.locked = false;
        self.engine_stats = EngineStats::default();
        self.walk_stats = WalkStats::default();
        self.staging = Staging::default();
    }

    fn expand_bounds(&mut self, x: f64, y: f64) {
        match &mut self.bounds {
            Some(b) => b.expand(x, y),
            None => self.bounds = Some(Bounds::from_point(x, y)),
        }
    }

    /// Adds one vertex to the TIN, triggering bootstrap once three
    /// non-collinear points have accumulated (spec.md §4.4.1/§4.4.2).
    pub fn add_vertex(&mut self, x: f64, y: f64, z: f32) -> TinResult<InsertOutcome> {
        if self.locked {
            return Err(TinError::TinLocked);
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(TinError::InvalidVertex { x, y });
        }

        if !self.bootstrapped {
            self.staging.vertices.push(Vertex::new(x, y, z, 0));
            self.expand_bounds(x, y);
            if self.staging.vertices.len() < 3 {
                return Ok(InsertOutcome::Staged);
            }
            return self.try_bootstrap();
        }

        self.expand_bounds(x, y);
        insert::insert_vertex(self, x, y, z)
    }

    /// Attempts to bootstrap from the staged vertices, scanning forward for
    /// a non-collinear triple if the first three happen to be collinear.
    /// Vertices consumed by a failed collinear triple remain staged so a
    /// later point can complete a valid triple without being re-submitted.
    fn try_bootstrap(&mut self) -> TinResult<InsertOutcome> {
        let staged = std::mem::take(&mut self.staging.vertices);
        match bootstrap::select_triple(&self.kernel, &staged) {
            Some((i, j, k)) => {
                let ab = bootstrap::bootstrap(self, &staged[i], &staged[j], &staged[k]);
                self.search_edge = Some(ab);
                self.bootstrapped = true;
                self.engine_stats.vertices_inserted += 3;

                let mut outcome = InsertOutcome::Bootstrapped;
                for (n, v) in staged.iter().enumerate() {
                    if n == i || n == j || n == k {
                        continue;
                    }
                    outcome = insert::insert_vertex(self, v.x, v.y, v.z)?;
                }
                Ok(outcome)
            }
            None => {
                self.staging.vertices = staged;
                Ok(InsertOutcome::Staged)
            }
        }
    }

    /// Resolves a coincident-vertex hit per the configured merge rule.
    pub(crate) fn resolve_merge(
        &mut self,
        existing: VertexId,
        x: f64,
        y: f64,
        z: f32,
    ) -> TinResult<InsertOutcome> {
        self.engine_stats.merges += 1;
        match self.config.merge_rule {
            VertexMergeRule::KeepFirst => Ok(InsertOutcome::Merged(existing)),
            VertexMergeRule::Reject => Err(TinError::DuplicateVertex),
            VertexMergeRule::Replace => {
                if let Some(v) = self.vertices.get_mut(existing) {
                    v.x = x;
                    v.y = y;
                    v.z = z;
                }
                Ok(InsertOutcome::Merged(existing))
            }
            VertexMergeRule::Average => {
                if let Some(v) = self.vertices.get_mut(existing) {
                    v.x = (v.x + x) / 2.0;
                    v.y = (v.y + y) / 2.0;
                    v.z = (v.z + z) / 2.0;
                }
                Ok(InsertOutcome::Merged(existing))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_happens_on_the_third_non_collinear_vertex() {
        let mut tin = Tin::new(TinConfig::new(1.0));
        assert_eq!(tin.add_vertex(0.0, 0.0, 0.0).unwrap(), InsertOutcome::Staged);
        assert_eq!(tin.add_vertex(2.0, 0.0, 0.0).unwrap(), InsertOutcome::Staged);
        let outcome = tin.add_vertex(1.0, 2.0, 0.0).unwrap();
        assert_eq!(outcome, InsertOutcome::Bootstrapped);
        assert!(tin.bootstrapped);
        assert_eq!(tin.pool.live_count(), 6);
    }

    #[test]
    fn collinear_triple_defers_bootstrap_until_a_non_collinear_point_arrives() {
        let mut tin = Tin::new(TinConfig::new(1.0));
        tin.add_vertex(0.0, 0.0, 0.0).unwrap();
        tin.add_vertex(1.0, 0.0, 0.0).unwrap();
        assert_eq!(tin.add_vertex(2.0, 0.0, 0.0).unwrap(), InsertOutcome::Staged);
        assert!(!tin.bootstrapped);
        let outcome = tin.add_vertex(1.0, 1.0, 0.0).unwrap();
        assert_eq!(outcome, InsertOutcome::Bootstrapped);
        assert!(tin.bootstrapped);
    }

    #[test]
    fn locked_tin_rejects_further_inserts() {
        let mut tin = Tin::new(TinConfig::new(1.0));
        tin.add_vertex(0.0, 0.0, 0.0).unwrap();
        tin.add_vertex(2.0, 0.0, 0.0).unwrap();
        tin.add_vertex(1.0, 2.0, 0.0).unwrap();
        tin.lock();
        assert_eq!(tin.add_vertex(5.0, 5.0, 0.0), Err(TinError::TinLocked));
    }
}
