//! Tolerance constants derived from a user-supplied nominal point spacing.
//!
//! Per spec.md §4.1: given nominal spacing `s`, predicates are allowed to
//! treat a result as zero (collinear / cocircular) when it falls below a
//! scale derived from `s`. The three scales differ because they bound
//! different geometric quantities: a coincidence test bounds a *distance*,
//! an on-edge test bounds a *distance from a line* (looser, since points
//! legitimately land near — not exactly on — segment interiors after a
//! few insertions), and the in-circle determinant's natural units are an
//! *area times a squared length*, so its scale is `s²` rather than `s`.

use serde::{Deserialize, Serialize};

/// Derived tolerance set for one TIN instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Two vertices closer than this are candidates for merge/duplicate
    /// handling rather than being treated as distinct.
    pub vertex_coincidence_threshold: f64,
    /// A point within this distance of an edge's supporting line is treated
    /// as lying on the edge (triggers the edge-split insertion path).
    pub on_edge_threshold: f64,
    /// Scale factor for the in-circle determinant; `orient`/`in_circle`
    /// results with `|value| < inCircleScale * eps` fall back to extended
    /// precision.
    pub in_circle_scale: f64,
}

impl Thresholds {
    /// Derive the threshold set for nominal spacing `s` (must be finite and positive).
    pub fn for_spacing(s: f64) -> Self {
        debug_assert!(s.is_finite() && s > 0.0, "nominal spacing must be positive and finite");
        Self {
            vertex_coincidence_threshold: s * 1e-13,
            on_edge_threshold: s * 1e-10,
            in_circle_scale: s * s,
        }
    }

    /// Absolute error bound for an `orient`/`in_circle` determinant given
    /// the magnitude of the coordinates involved. Scaled by machine epsilon
    /// on top of the spacing-derived scale so the bound tightens gracefully
    /// as `s` shrinks toward the precision floor of `f64`.
    pub fn orient_epsilon(&self, magnitude_hint: f64) -> f64 {
        let mag = magnitude_hint.max(1.0);
        mag * mag * f64::EPSILON * 8.0
    }

    pub fn in_circle_epsilon(&self, magnitude_hint: f64) -> f64 {
        let mag = magnitude_hint.max(1.0);
        self.in_circle_scale.max(mag.powi(4) * f64::EPSILON) * 16.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_scale_with_spacing() {
        let fine = Thresholds::for_spacing(0.01);
        let coarse = Thresholds::for_spacing(100.0);
        assert!(fine.vertex_coincidence_threshold < coarse.vertex_coincidence_threshold);
        assert!(fine.on_edge_threshold < coarse.on_edge_threshold);
        assert!(fine.in_circle_scale < coarse.in_circle_scale);
    }
}
