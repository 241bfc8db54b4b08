//! Ruppert quality-driven mesh refinement over a constrained TIN (spec.md
//! §4.6): off-center/circumcenter Steiner-point insertion for bad triangles,
//! midpoint splitting (with shell-indexed clamping near critical corners)
//! for encroached segments, and the seditious-edge skip/ignore rules that
//! guarantee termination near acute input angles.
//!
//! This crate owns only the main loop ([`refine`]) and the per-run scratch
//! state ([`RefinementState`]); the geometric tests, the two work queues,
//! and the segment/triangle mechanics it drains live in their own modules so
//! each can be unit-tested in isolation.

pub mod config;
pub mod geometry;
pub mod queues;
pub mod segment;
pub mod triangle;
pub mod vdata;

pub use config::{RuppertConfig, ZInterpolationSource};
pub use queues::{BadTriangleQueue, EncroachedQueue};
pub use triangle::Snapshot;
pub use vdata::{CornerInfo, RefinementState, VertexData};

use std::collections::HashMap;

use tin_engine::{InsertOutcome, LocateResult, Navigator, Tin};
use tin_kernel::{TinError, TinResult, Vertex, VertexId, VertexStatus};
use tin_pool::EdgeId;
use tin_topology::{bits, destination, dual, face_triangle, origin};

/// Outcome of a [`refine`] call (spec.md §4.6 "Failure semantics").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineOutcome {
    /// `true` iff both queues drained before `max_iterations` was reached.
    pub converged: bool,
    /// Number of Steiner points actually inserted (midpoints + off-centers/
    /// circumcenters). Does not count candidates that were rejected in
    /// favour of a segment split.
    pub vertices_added: u32,
}

/// Runs Ruppert refinement over `tin` to convergence or `config.max_iterations`,
/// whichever comes first.
///
/// `tin` must already be bootstrapped and carry whatever constrained
/// segments the caller wants respected (region borders, linear constraints);
/// this function never adds constraints of its own, only Steiner vertices.
pub fn refine(tin: &mut Tin, config: &RuppertConfig) -> TinResult<RefineOutcome> {
    if !tin.bootstrapped {
        return Err(TinError::NotBootstrapped);
    }
    if tin.locked {
        return Err(TinError::TinLocked);
    }

    let snapshot = if config.interpolate_z
        && matches!(config.z_interpolation_source, ZInterpolationSource::Snapshot)
    {
        Some(Snapshot::capture(tin))
    } else {
        None
    };

    let mut state = RefinementState::new();
    state.corner_info = compute_corner_info(tin);

    let mut bad_queue = BadTriangleQueue::new();
    let mut encroached_queue = EncroachedQueue::new();

    triangle::for_each_real_triangle(tin, |edge, verts| {
        triangle::rescan_triangle(tin, &state, config, edge, verts, &mut bad_queue);
    });

    let constrained_edges: Vec<EdgeId> = tin
        .pool
        .iter_allocated()
        .filter(|&e| bits::is_constrained(&tin.pool, e))
        .collect();
    for &e in &constrained_edges {
        if find_encroaching_vertex(tin, e).is_some() {
            encroached_queue.push(e);
        }
    }

    let mut vertices_added: u32 = 0;
    let mut iterations: u32 = 0;

    loop {
        if iterations >= config.max_iterations {
            tracing::debug!(
                target: "tin_refine",
                vertices_added,
                iterations,
                "refinement hit max_iterations without converging"
            );
            return Ok(RefineOutcome {
                converged: false,
                vertices_added,
            });
        }

        if let Some(s) = encroached_queue.pop() {
            iterations += 1;
            let Some(witness) = find_encroaching_vertex(tin, s) else {
                continue;
            };

            if config.ignore_seditious_encroachments {
                let p_id = origin(&tin.pool, s);
                let q_id = destination(&tin.pool, s);
                if state.is_seditious_pair(p_id, witness) || state.is_seditious_pair(q_id, witness) {
                    continue;
                }
            }

            let (m, pm, mq) =
                segment::split_segment(tin, &mut state, s, config.interpolate_z, snapshot.as_ref())?;
            vertices_added += 1;
            tracing::trace!(target: "tin_refine", vertex = m.0, "encroachment_split");

            for &seg in &[pm, mq] {
                if find_encroaching_vertex(tin, seg).is_some() {
                    encroached_queue.push(seg);
                }
            }
            triangle::rescan_neighbourhood(tin, &state, config, m, pm, &mut bad_queue, &mut encroached_queue);
            triangle::rescan_neighbourhood(tin, &state, config, m, mq, &mut bad_queue, &mut encroached_queue);
            continue;
        }

        let Some(edge) = bad_queue.pop() else {
            tracing::debug!(target: "tin_refine", vertices_added, iterations, "refinement converged");
            return Ok(RefineOutcome {
                converged: true,
                vertices_added,
            });
        };
        iterations += 1;

        let Some(verdict) = triangle::recheck_bad_triangle(tin, &state, config, edge) else {
            continue;
        };

        let tri = face_triangle(&tin.pool, edge);
        let verts = [
            origin(&tin.pool, tri[0]),
            origin(&tin.pool, tri[1]),
            origin(&tin.pool, tri[2]),
        ];
        let (p_idx, q_idx, apex_idx) = match verdict.shortest_side {
            0 => (0, 1, 2),
            1 => (1, 2, 0),
            _ => (2, 0, 1),
        };
        let p = *tin.vertices.get(verts[p_idx]);
        let q = *tin.vertices.get(verts[q_idx]);
        let apex = *tin.vertices.get(verts[apex_idx]);

        let Some((cx, cy, _)) = tin.kernel.circumcircle(&p, &q, &apex) else {
            continue;
        };
        let (px, py) = geometry::off_center_point(&p, &q, &apex, (cx, cy), config.beta());

        let hits = candidate_encroaches(tin, px, py);
        if !hits.is_empty() {
            for h in hits {
                encroached_queue.push(h);
            }
            continue;
        }

        let z = if config.interpolate_z {
            snapshot
                .as_ref()
                .and_then(|s| s.interpolate_z(px, py))
                .unwrap_or(0.0)
        } else {
            0.0
        };

        let outcome = tin.add_vertex(px, py, z)?;
        let v = match outcome {
            InsertOutcome::Inserted(v) => {
                if let Some(mv) = tin.vertices.get_mut(v) {
                    mv.status |= VertexStatus::SYNTHETIC;
                }
                state.record_offcenter(v);
                vertices_added += 1;
                v
            }
            InsertOutcome::Merged(v) => v,
            InsertOutcome::Bootstrapped | InsertOutcome::Staged => {
                return Err(TinError::NotBootstrapped)
            }
        };
        tracing::trace!(
            target: "tin_refine",
            vertex = v.0,
            cross_sq = verdict.cross_sq,
            "bad_triangle_split"
        );

        let seed = edge_incident_to(tin, v);
        triangle::rescan_neighbourhood(tin, &state, config, v, seed, &mut bad_queue, &mut encroached_queue);
    }
}

/// The minimum angle between any two constrained segments sharing each
/// vertex they touch (spec.md §4.6 `cornerInfo[v]`); a vertex with fewer
/// than two incident constrained segments has no meaningful corner angle
/// and is left out of the map (never critical).
fn compute_corner_info(tin: &Tin) -> HashMap<VertexId, CornerInfo> {
    let mut incident: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
    for e in tin.pool.iter_allocated() {
        if !bits::is_constrained(&tin.pool, e) {
            continue;
        }
        let a = origin(&tin.pool, e);
        let b = destination(&tin.pool, e);
        if a.is_null() || b.is_null() {
            continue;
        }
        incident.entry(a).or_default().push(b);
        incident.entry(b).or_default().push(a);
    }

    let mut out = HashMap::new();
    for (v, others) in incident {
        if others.len() < 2 {
            continue;
        }
        let vv = tin.vertices.get(v);
        let mut min_angle = f64::INFINITY;
        for i in 0..others.len() {
            for j in (i + 1)..others.len() {
                let a = tin.vertices.get(others[i]);
                let b = tin.vertices.get(others[j]);
                min_angle = min_angle.min(angle_deg(vv, a, b));
            }
        }
        out.insert(v, CornerInfo { min_angle_deg: min_angle });
    }
    out
}

fn angle_deg(v: &Vertex, a: &Vertex, b: &Vertex) -> f64 {
    let (ax, ay) = (a.x - v.x, a.y - v.y);
    let (bx, by) = (b.x - v.x, b.y - v.y);
    let la = (ax * ax + ay * ay).sqrt();
    let lb = (bx * bx + by * by).sqrt();
    if la == 0.0 || lb == 0.0 {
        return 180.0;
    }
    let cos = ((ax * bx + ay * by) / (la * lb)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// The first vertex (other than `s`'s own endpoints) found inside `s`'s
/// diametral disk, or `None` if `s` is no longer live or encroached. A
/// linear scan of every vertex in the arena — acceptable for the mesh sizes
/// this refiner targets; a spatial index would trade this for an R-tree or
/// grid bucket lookup without changing the encroachment test itself.
fn find_encroaching_vertex(tin: &Tin, s: EdgeId) -> Option<VertexId> {
    if !tin.pool.is_live(s) || !bits::is_constrained(&tin.pool, s) {
        return None;
    }
    let p_id = origin(&tin.pool, s);
    let q_id = destination(&tin.pool, s);
    let p = *tin.vertices.get(p_id);
    let q = *tin.vertices.get(q_id);
    for (id, v) in tin.vertices.iter() {
        if id == p_id || id == q_id || v.is_null() {
            continue;
        }
        if geometry::encroaches(&p, &q, v) {
            return Some(id);
        }
    }
    None
}

/// Every currently-constrained segment whose diametral disk would contain
/// the candidate point `(x, y)` (spec.md §4.6: "if p encroaches any segment
/// s: enqueue s; do not insert p").
fn candidate_encroaches(tin: &Tin, x: f64, y: f64) -> Vec<EdgeId> {
    let q = Vertex::new(x, y, 0.0, -1);
    let mut hits = Vec::new();
    for e in tin.pool.iter_allocated() {
        if !bits::is_constrained(&tin.pool, e) {
            continue;
        }
        let p = tin.vertices.get(origin(&tin.pool, e));
        let r = tin.vertices.get(destination(&tin.pool, e));
        if p.is_null() || r.is_null() {
            continue;
        }
        if geometry::encroaches(p, r, &q) {
            hits.push(e);
        }
    }
    hits
}

/// Resolves any live edge incident to `v`, by point-locating `v`'s own
/// coordinates (guaranteed to land on an edge touching it). Needed because
/// [`tin_engine::InsertOutcome`] returns only the new vertex id, and the
/// hull-extension insertion path leaves `tin.search_edge` pointing at an
/// edge whose *origin* is a hull neighbour rather than `v` itself.
fn edge_incident_to(tin: &Tin, v: VertexId) -> EdgeId {
    let p = *tin.vertices.get(v);
    let mut nav = Navigator::new(tin).expect("bootstrapped tin");
    let located = nav.locate(tin, p.x, p.y);
    let e = match located {
        LocateResult::Interior(e) | LocateResult::OnEdge(e) | LocateResult::Exterior(e) => e,
    };
    for cand in face_triangle(&tin.pool, e) {
        if origin(&tin.pool, cand) == v {
            return cand;
        }
        if destination(&tin.pool, cand) == v {
            return dual(cand);
        }
    }
    e
}
