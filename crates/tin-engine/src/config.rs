//! Per-TIN configuration (spec.md §9 Open Question 3).

use serde::{Deserialize, Serialize};

/// Resolution rule applied when an incoming vertex coincides (within the
/// kernel's `vertex_coincidence_threshold`) with one already in the TIN.
///
/// Spec.md §9 Open Question 3 leaves the default inconsistent across the
/// source's own call paths and asks an implementer to pick one and document
/// it rather than vary silently. `KeepFirst` is the recommendation spec.md
/// itself names, so it is this crate's `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexMergeRule {
    /// The existing vertex wins; the incoming coordinates/z/aux are discarded.
    KeepFirst,
    /// The incoming vertex's coordinates/z replace the existing one's.
    Replace,
    /// The existing vertex's (x, y, z) become the average of the two.
    Average,
    /// Coincidence is treated as an error rather than silently resolved.
    Reject,
}

impl Default for VertexMergeRule {
    fn default() -> Self {
        VertexMergeRule::KeepFirst
    }
}

/// Per-TIN construction configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TinConfig {
    pub nominal_spacing: f64,
    pub merge_rule: VertexMergeRule,
    /// Seed for the stochastic Lawson's-walk tie-break PRNG (spec.md §5:
    /// "with a fixed pseudo-random stream and a fixed insertion order, the
    /// result is bit-reproducible").
    pub seed: u64,
}

impl TinConfig {
    pub fn new(nominal_spacing: f64) -> Self {
        Self {
            nominal_spacing,
            merge_rule: VertexMergeRule::default(),
            seed: 0,
        }
    }

    pub fn with_merge_rule(mut self, rule: VertexMergeRule) -> Self {
        self.merge_rule = rule;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
