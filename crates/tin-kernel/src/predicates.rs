//! Orientation, in-circle, and circumcircle predicates with an
//! extended-precision fallback (spec.md §4.1).
//!
//! The happy path is a plain `f64` determinant. When the magnitude of the
//! result is smaller than an input-scaled error bound, the result is
//! recomputed using compensated (double-double) arithmetic built from
//! Dekker/Knuth error-free transformations (`two_sum`, `two_product` via
//! `f64::mul_add`). This is the same family of technique as Shewchuk's
//! adaptive expansions, simplified to a single compensated pass rather than
//! the full growing-expansion algorithm — sufficient to resolve the sign for
//! any input configuration that is not exactly degenerate in `f64`, which is
//! all §4.1 requires ("the correct sign for all pair-wise-distinct input
//! configurations").

use crate::diagnostics::KernelStats;
use crate::thresholds::Thresholds;
use crate::vertex::Vertex;

/// Sign of an orientation or in-circle test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Zero,
    Negative,
}

impl Sign {
    pub fn of_f64(v: f64) -> Self {
        if v > 0.0 {
            Sign::Positive
        } else if v < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            Sign::Positive => 1,
            Sign::Zero => 0,
            Sign::Negative => -1,
        }
    }
}

/// Stateless geometric kernel bound to one TIN's [`Thresholds`].
///
/// Holds no mutable geometry, only the derived tolerances and the
/// diagnostic counters (spec.md §5: "Kernel: stateless aside from
/// diagnostic counters").
#[derive(Debug)]
pub struct Kernel {
    pub thresholds: Thresholds,
    pub stats: KernelStats,
}

impl Kernel {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            stats: KernelStats::new(),
        }
    }

    /// Sign of the signed area of triangle `abc`: positive if `c` is left of
    /// ray `a->b`, negative if right, zero if collinear (within threshold).
    ///
    /// NaN/±∞ coordinates (spec.md §4.1 Failure modes) always collapse to
    /// `Sign::Zero`; callers must reject such vertices before this point —
    /// `orient` itself does not error.
    pub fn orient(&self, a: &Vertex, b: &Vertex, c: &Vertex) -> Sign {
        if !finite3(a, b, c) {
            return Sign::Zero;
        }
        let det = orient_det_f64(a, b, c);
        let mag = magnitude_hint3(a, b, c);
        let eps = self.thresholds.orient_epsilon(mag);
        if det.abs() > eps {
            self.stats.record_orient(false);
            return Sign::of_f64(det);
        }
        self.stats.record_orient(true);
        Sign::of_f64(orient_det_dd(a, b, c))
    }

    /// `d` relative to the circumcircle of `a, b, c` (assumed CCW):
    /// positive = inside, negative = outside, zero = on the circle.
    pub fn in_circle(&self, a: &Vertex, b: &Vertex, c: &Vertex, d: &Vertex) -> Sign {
        if !finite3(a, b, c) || !d.is_finite() {
            return Sign::Zero;
        }
        let det = in_circle_det_f64(a, b, c, d);
        let mag = magnitude_hint4(a, b, c, d);
        let eps = self.thresholds.in_circle_epsilon(mag);
        if det.abs() > eps {
            self.stats.record_in_circle(false);
            return Sign::of_f64(det);
        }
        self.stats.record_in_circle(true);
        Sign::of_f64(in_circle_det_dd(a, b, c, d))
    }

    /// Circumcircle of `a, b, c` as `(center_x, center_y, radius_squared)`.
    /// Returns `None` iff `orient(a, b, c) == Zero` (collinear, no finite circle).
    pub fn circumcircle(&self, a: &Vertex, b: &Vertex, c: &Vertex) -> Option<(f64, f64, f64)> {
        if self.orient(a, b, c) == Sign::Zero {
            return None;
        }
        let ax = a.x;
        let ay = a.y;
        let bx = b.x - ax;
        let by = b.y - ay;
        let cx = c.x - ax;
        let cy = c.y - ay;
        let d = 2.0 * (bx * cy - by * cx);
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        let r2 = ux * ux + uy * uy;
        Some((ux + ax, uy + ay, r2))
    }
}

fn finite3(a: &Vertex, b: &Vertex, c: &Vertex) -> bool {
    a.is_finite() && b.is_finite() && c.is_finite()
}

fn magnitude_hint3(a: &Vertex, b: &Vertex, c: &Vertex) -> f64 {
    [a.x, a.y, b.x, b.y, c.x, c.y]
        .iter()
        .fold(0.0_f64, |m, v| m.max(v.abs()))
}

fn magnitude_hint4(a: &Vertex, b: &Vertex, c: &Vertex, d: &Vertex) -> f64 {
    magnitude_hint3(a, b, c).max(d.x.abs()).max(d.y.abs())
}

fn orient_det_f64(a: &Vertex, b: &Vertex, c: &Vertex) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Standard Delaunay in-circle determinant, expanded by minors along the
/// third column so the `f64` fast path and the double-double fallback share
/// the same term structure.
fn in_circle_det_f64(a: &Vertex, b: &Vertex, c: &Vertex, d: &Vertex) -> f64 {
    let (adx, ady) = (a.x - d.x, a.y - d.y);
    let (bdx, bdy) = (b.x - d.x, b.y - d.y);
    let (cdx, cdy) = (c.x - d.x, c.y - d.y);
    let ad2 = adx * adx + ady * ady;
    let bd2 = bdx * bdx + bdy * bdy;
    let cd2 = cdx * cdx + cdy * cdy;
    adx * (bdy * cd2 - cdy * bd2) - ady * (bdx * cd2 - cdx * bd2) + ad2 * (bdx * cdy - cdx * bdy)
}

// ---------------------------------------------------------------------
// Compensated (double-double) fallback
// ---------------------------------------------------------------------

/// A non-overlapping `(hi, lo)` pair representing `hi + lo` more precisely
/// than either `f64` alone. Not a general-purpose bignum type — just enough
/// error-free-transformation arithmetic to recompute the two determinants
/// above with a compensated error term.
#[derive(Debug, Clone, Copy)]
struct Dd {
    hi: f64,
    lo: f64,
}

impl Dd {
    #[inline]
    fn from_f64(v: f64) -> Self {
        Dd { hi: v, lo: 0.0 }
    }

    /// Knuth's `two_sum`: exact `a + b` as a non-overlapping pair.
    #[inline]
    fn two_sum(a: f64, b: f64) -> Dd {
        let hi = a + b;
        let bv = hi - a;
        let lo = (a - (hi - bv)) + (b - bv);
        Dd { hi, lo }
    }

    /// Dekker's `two_product` using a fused multiply-add for the exact
    /// rounding error, avoiding the classic split-into-halves dance.
    #[inline]
    fn two_product(a: f64, b: f64) -> Dd {
        let hi = a * b;
        let lo = a.mul_add(b, -hi);
        Dd { hi, lo }
    }

    #[inline]
    fn add(self, other: Dd) -> Dd {
        let s = Dd::two_sum(self.hi, other.hi);
        let lo = s.lo + self.lo + other.lo;
        Dd::two_sum(s.hi, lo)
    }

    #[inline]
    fn sub(self, other: Dd) -> Dd {
        self.add(Dd {
            hi: -other.hi,
            lo: -other.lo,
        })
    }

    #[inline]
    fn mul(self, other: Dd) -> Dd {
        let p = Dd::two_product(self.hi, other.hi);
        let cross = self.hi * other.lo + self.lo * other.hi;
        Dd::two_sum(p.hi, p.lo + cross)
    }

    #[inline]
    fn mul_f64(self, v: f64) -> Dd {
        self.mul(Dd::from_f64(v))
    }

    /// Sign of `hi + lo`, treating the pair as exact: this is the whole
    /// point of the fallback, an `f64` subtraction that rounds to exactly
    /// zero may still have a nonzero, correctly-signed compensated residual.
    #[inline]
    fn sign(self) -> f64 {
        if self.hi != 0.0 {
            self.hi
        } else {
            self.lo
        }
    }
}

fn dd_sub(a: f64, b: f64) -> Dd {
    Dd::two_sum(a, -b)
}

fn orient_det_dd(a: &Vertex, b: &Vertex, c: &Vertex) -> f64 {
    let bax = dd_sub(b.x, a.x);
    let cay = dd_sub(c.y, a.y);
    let bay = dd_sub(b.y, a.y);
    let cax = dd_sub(c.x, a.x);
    let det = bax.mul(cay).sub(bay.mul(cax));
    det.sign()
}

fn in_circle_det_dd(a: &Vertex, b: &Vertex, c: &Vertex, d: &Vertex) -> f64 {
    let adx = dd_sub(a.x, d.x);
    let ady = dd_sub(a.y, d.y);
    let bdx = dd_sub(b.x, d.x);
    let bdy = dd_sub(b.y, d.y);
    let cdx = dd_sub(c.x, d.x);
    let cdy = dd_sub(c.y, d.y);

    let ad2 = adx.mul(adx).add(ady.mul(ady));
    let bd2 = bdx.mul(bdx).add(bdy.mul(bdy));
    let cd2 = cdx.mul(cdx).add(cdy.mul(cdy));

    let t1 = adx.mul(bdy.mul(cd2).sub(cdy.mul(bd2)));
    let t2 = ady.mul(bdx.mul(cd2).sub(cdx.mul(bd2)));
    let t3 = ad2.mul(bdx.mul(cdy).sub(cdx.mul(bdy)));

    let det = t1.sub(t2).add(t3);
    det.sign()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::Vertex;

    fn v(x: f64, y: f64) -> Vertex {
        Vertex::new(x, y, 0.0, 0)
    }

    fn kernel() -> Kernel {
        Kernel::new(Thresholds::for_spacing(1.0))
    }

    #[test]
    fn orient_ccw_triangle_is_positive() {
        let k = kernel();
        assert_eq!(k.orient(&v(0.0, 0.0), &v(1.0, 0.0), &v(0.0, 1.0)), Sign::Positive);
    }

    #[test]
    fn orient_cw_triangle_is_negative() {
        let k = kernel();
        assert_eq!(k.orient(&v(0.0, 0.0), &v(0.0, 1.0), &v(1.0, 0.0)), Sign::Negative);
    }

    #[test]
    fn orient_collinear_is_zero() {
        let k = kernel();
        assert_eq!(k.orient(&v(0.0, 0.0), &v(1.0, 1.0), &v(2.0, 2.0)), Sign::Zero);
    }

    #[test]
    fn orient_near_collinear_uses_fallback_and_keeps_correct_sign() {
        let k = kernel();
        // A one-ULP perturbation off the line y = x: the resulting
        // determinant is far smaller than the spacing-scaled threshold, so
        // the fallback must resolve it without collapsing to zero.
        let s = k.orient(&v(0.0, 0.0), &v(1.0, 1.0 + f64::EPSILON), &v(2.0, 2.0));
        assert_ne!(s, Sign::Zero);
    }

    #[test]
    fn in_circle_center_point_is_inside() {
        let k = kernel();
        // Unit circle through (1,0), (0,1), (-1,0); origin is inside.
        let sign = k.in_circle(&v(1.0, 0.0), &v(0.0, 1.0), &v(-1.0, 0.0), &v(0.0, 0.0));
        assert_eq!(sign, Sign::Positive);
    }

    #[test]
    fn in_circle_far_point_is_outside() {
        let k = kernel();
        let sign = k.in_circle(&v(1.0, 0.0), &v(0.0, 1.0), &v(-1.0, 0.0), &v(10.0, 10.0));
        assert_eq!(sign, Sign::Negative);
    }

    #[test]
    fn in_circle_cocircular_point_is_zero() {
        let k = kernel();
        let sign = k.in_circle(&v(1.0, 0.0), &v(0.0, 1.0), &v(-1.0, 0.0), &v(0.0, -1.0));
        assert_eq!(sign, Sign::Zero);
    }

    #[test]
    fn circumcircle_matches_equidistant_points() {
        let k = kernel();
        let (cx, cy, r2) = k
            .circumcircle(&v(1.0, 0.0), &v(0.0, 1.0), &v(-1.0, 0.0))
            .unwrap();
        assert!((cx - 0.0).abs() < 1e-9);
        assert!((cy - 0.0).abs() < 1e-9);
        assert!((r2 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn circumcircle_of_collinear_points_is_none() {
        let k = kernel();
        assert!(k.circumcircle(&v(0.0, 0.0), &v(1.0, 1.0), &v(2.0, 2.0)).is_none());
    }

    #[test]
    fn nan_vertex_orients_to_zero() {
        let k = kernel();
        let nan = Vertex::new(f64::NAN, 0.0, 0.0, 0);
        assert_eq!(k.orient(&v(0.0, 0.0), &v(1.0, 0.0), &nan), Sign::Zero);
    }
}
