//! Constrained-segment splitting (spec.md §4.6 "Segment split").

use tin_engine::{InsertOutcome, Navigator};
use tin_kernel::{TinResult, VertexId};
use tin_pool::EdgeId;
use tin_topology::{bits, destination, dual, origin, pinwheel};

use crate::geometry;
use crate::triangle::Snapshot;
use crate::vdata::RefinementState;

/// Finds the mesh edge, among those incident to `v`, whose other endpoint is
/// `target` — used to recover the new half of a just-split segment, since
/// `tin.add_vertex` only returns the new vertex id, not the edges it split.
fn edge_between(tin: &tin_engine::Tin, v: VertexId, target: VertexId) -> Option<EdgeId> {
    let mut nav = Navigator::new(tin)?;
    let p = *tin.vertices.get(v);
    let located = nav.locate(tin, p.x, p.y);
    let seed = match located {
        tin_engine::LocateResult::Interior(e)
        | tin_engine::LocateResult::OnEdge(e)
        | tin_engine::LocateResult::Exterior(e) => e,
    };
    // `seed` lands somewhere near v but isn't guaranteed to originate there;
    // walk its face corners' pinwheels to find one that does.
    for start in [seed, dual(seed)] {
        for cand in pinwheel(&tin.pool, start) {
            if origin(&tin.pool, cand) == v && destination(&tin.pool, cand) == target {
                return Some(cand);
            }
        }
    }
    None
}

/// Splits constrained segment `s` at its (possibly shell-clamped) midpoint,
/// propagating the original segment's constraint bits (constrained,
/// line/region-border index) onto the new half, and records `vdata` for the
/// new vertex. Returns the new vertex id plus the two replacement segment
/// edges (`p -> m`, `m -> q`) so the caller can rescan their neighbourhood.
pub fn split_segment(
    tin: &mut tin_engine::Tin,
    state: &mut RefinementState,
    s: EdgeId,
    interpolate_z: bool,
    snapshot: Option<&Snapshot>,
) -> TinResult<(VertexId, EdgeId, EdgeId)> {
    let p_id = origin(&tin.pool, s);
    let q_id = destination(&tin.pool, s);
    let p = *tin.vertices.get(p_id);
    let q = *tin.vertices.get(q_id);

    let mut mx = (p.x + q.x) / 2.0;
    let mut my = (p.y + q.y) / 2.0;
    let mut corner_and_shell: Option<(VertexId, i32)> = None;

    for (corner_id, corner_v, _other) in [(p_id, p, q), (q_id, q, p)] {
        if let Some(info) = state.corner_info.get(&corner_id) {
            if info.is_critical() {
                let midpoint = tin_kernel::Vertex::new(mx, my, 0.0, -1);
                let shell = geometry::shell_index(&corner_v, &midpoint);
                let (cx, cy) = geometry::clamp_to_shell(&corner_v, &midpoint, shell);
                mx = cx;
                my = cy;
                corner_and_shell = Some((corner_id, shell));
                break;
            }
        }
    }

    let mz = if interpolate_z {
        snapshot
            .and_then(|snap| snap.interpolate_z(mx, my))
            .unwrap_or_else(|| (p.z + q.z) / 2.0)
    } else {
        (p.z + q.z) / 2.0
    };

    let original_constrained = bits::is_constrained(&tin.pool, s);
    let original_line_index = bits::line_index(&tin.pool, s);
    let original_border_index = if bits::is_region_border(&tin.pool, s) {
        bits::region_border_index(&tin.pool, s)
    } else {
        None
    };

    let outcome = tin.add_vertex(mx, my, mz)?;
    let m_id = match outcome {
        InsertOutcome::Inserted(v) => v,
        InsertOutcome::Merged(v) => v,
        InsertOutcome::Bootstrapped | InsertOutcome::Staged => {
            return Err(tin_kernel::TinError::NotBootstrapped)
        }
    };

    if let InsertOutcome::Inserted(_) = outcome {
        if let Some(mv) = tin.vertices.get_mut(m_id) {
            mv.status |= tin_kernel::VertexStatus::SYNTHETIC;
        }
    }

    if let Some((corner_id, shell)) = corner_and_shell {
        state.record_midpoint(m_id, corner_id, shell);
    } else {
        state.record_plain_midpoint(m_id);
    }

    let pm = edge_between(tin, p_id, m_id).unwrap_or(s);
    let mq = edge_between(tin, m_id, q_id).unwrap_or(dual(s));

    for &e in &[pm, mq] {
        bits::set_constrained(&mut tin.pool, e, original_constrained);
        bits::set_constrained(&mut tin.pool, dual(e), original_constrained);
        if let Some(idx) = original_line_index {
            bits::set_line_index(&mut tin.pool, e, idx);
            bits::set_line_index(&mut tin.pool, dual(e), idx);
        }
        if let Some(idx) = original_border_index {
            bits::set_region_border_index(&mut tin.pool, e, idx);
            bits::set_region_border_index(&mut tin.pool, dual(e), idx);
        }
    }

    Ok((m_id, pm, mq))
}
