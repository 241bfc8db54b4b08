//! Per-vertex and per-corner refinement metadata (spec.md §4.6
//! `vdata[v]`/`cornerInfo[v]`).

use std::collections::HashMap;

use tin_kernel::{VertexId, VertexKindTag};

/// The richer half of `vdata[v]` that doesn't fit in [`tin_kernel::Vertex`]'s
/// one-byte `aux` tag: which critical corner a midpoint descends from, and
/// which concentric shell around it the midpoint sits on.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexData {
    pub kind: VertexKindTag,
    pub corner: Option<VertexId>,
    pub shell: Option<i32>,
}

/// Minimum incident angle at a constraint vertex, computed once when the
/// vertex first appears on a constrained segment. A corner is *critical* iff
/// its minimum angle is below 60° (spec.md §4.6).
#[derive(Debug, Clone, Copy)]
pub struct CornerInfo {
    pub min_angle_deg: f64,
}

impl CornerInfo {
    pub fn is_critical(&self) -> bool {
        self.min_angle_deg < 60.0
    }
}

/// The side tables spec.md §4.6 names as `vdata`/`cornerInfo`, keyed by
/// vertex since neither belongs on [`tin_kernel::Vertex`] itself (`vdata`
/// partially does, via `aux`; this struct carries the rest).
#[derive(Debug, Default)]
pub struct RefinementState {
    pub vdata: HashMap<VertexId, VertexData>,
    pub corner_info: HashMap<VertexId, CornerInfo>,
}

impl RefinementState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a midpoint that descends from a critical corner, at the given
    /// shell index around it (spec.md §4.6 "shell splitting").
    pub fn record_midpoint(&mut self, v: VertexId, corner: VertexId, shell: i32) {
        self.vdata.insert(
            v,
            VertexData {
                kind: VertexKindTag::Midpoint,
                corner: Some(corner),
                shell: Some(shell),
            },
        );
    }

    /// Records a midpoint from an ordinary (non-critical-corner) segment
    /// split: no shell membership, so it can never form a seditious pair
    /// ([`Self::is_seditious_pair`] requires both sides to carry a corner).
    pub fn record_plain_midpoint(&mut self, v: VertexId) {
        self.vdata.insert(
            v,
            VertexData {
                kind: VertexKindTag::Midpoint,
                corner: None,
                shell: None,
            },
        );
    }

    pub fn record_offcenter(&mut self, v: VertexId) {
        self.vdata.insert(
            v,
            VertexData {
                kind: VertexKindTag::OffCenter,
                corner: None,
                shell: None,
            },
        );
    }

    pub fn record_circumcenter(&mut self, v: VertexId) {
        self.vdata.insert(
            v,
            VertexData {
                kind: VertexKindTag::Circumcenter,
                corner: None,
                shell: None,
            },
        );
    }

    pub fn kind_of(&self, v: VertexId) -> VertexKindTag {
        self.vdata.get(&v).map(|d| d.kind).unwrap_or(VertexKindTag::Input)
    }

    /// Two MIDPOINTs are seditious partners iff they share both their
    /// originating corner and their shell index (spec.md §4.6).
    pub fn is_seditious_pair(&self, a: VertexId, b: VertexId) -> bool {
        let (Some(da), Some(db)) = (self.vdata.get(&a), self.vdata.get(&b)) else {
            return false;
        };
        da.kind == VertexKindTag::Midpoint
            && db.kind == VertexKindTag::Midpoint
            && da.corner.is_some()
            && da.corner == db.corner
            && da.shell == db.shell
    }
}
