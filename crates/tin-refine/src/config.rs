//! Ruppert refiner configuration (spec.md §4.6).

use serde::{Deserialize, Serialize};

/// Where a newly-inserted refinement vertex's `z` comes from when
/// `interpolate_z` is set (spec.md §9 Open Question 4: "both are acceptable;
/// the choice must be a configurable option").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZInterpolationSource {
    /// Interpolate against the mesh as it evolves during refinement —
    /// cheaper, but a later split can shift the facet an earlier split
    /// already interpolated against.
    Evolving,
    /// Interpolate against a frozen snapshot of the pre-refinement TIN —
    /// stable, at roughly twice the memory of `Evolving`.
    Snapshot,
}

impl Default for ZInterpolationSource {
    fn default() -> Self {
        ZInterpolationSource::Evolving
    }
}

/// Tuning knobs for [`crate::refine`] (spec.md §4.6's opening parameter
/// list, field names translated to the workspace's `snake_case` convention).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RuppertConfig {
    pub min_angle_deg: f64,
    pub min_triangle_area: f64,
    pub skip_seditious_triangles: bool,
    pub ignore_seditious_encroachments: bool,
    pub enforce_sqrt2_guard: bool,
    pub interpolate_z: bool,
    pub z_interpolation_source: ZInterpolationSource,
    pub max_iterations: u32,
}

impl RuppertConfig {
    /// `min_angle_deg` has no spec-given default (§9: "default left to the
    /// implementer"); every other field gets the permissive/classical
    /// Ruppert default (seditious handling on, sqrt(2) guard on, no area
    /// floor, no z interpolation, a generous iteration cap).
    pub fn new(min_angle_deg: f64) -> Self {
        Self {
            min_angle_deg,
            min_triangle_area: 0.0,
            skip_seditious_triangles: true,
            ignore_seditious_encroachments: true,
            enforce_sqrt2_guard: true,
            interpolate_z: false,
            z_interpolation_source: ZInterpolationSource::default(),
            max_iterations: 100_000,
        }
    }

    pub fn with_min_triangle_area(mut self, area: f64) -> Self {
        self.min_triangle_area = area;
        self
    }

    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_interpolate_z(mut self, on: bool, source: ZInterpolationSource) -> Self {
        self.interpolate_z = on;
        self.z_interpolation_source = source;
        self
    }

    /// `β = 1 / (2·sin(minAngle))`; `ρ_target = β`. The practical limit for
    /// guaranteed termination is ≈33.8°, past which `ρ_min` can never be
    /// driven below the sqrt(2) guard and refinement may not converge.
    pub fn beta(&self) -> f64 {
        1.0 / (2.0 * self.min_angle_deg.to_radians().sin())
    }

    /// `ρ_min = max(√2, ρ_target)` if the guard is enabled, else `ρ_target`.
    pub fn rho_min(&self) -> f64 {
        let target = self.beta();
        if self.enforce_sqrt2_guard {
            target.max(std::f64::consts::SQRT_2)
        } else {
            target
        }
    }
}
