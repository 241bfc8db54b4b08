//! Pure geometric helpers for the refinement loop (spec.md §4.6): the
//! bad-triangle test, off-center insertion point, segment encroachment, and
//! shell indexing.

use tin_kernel::Vertex;

/// Twice the signed area of `abc` — the "signed cross product" spec.md's
/// bad-triangle test keys on. Same formula the kernel's `orient` uses
/// internally, kept local here since this module only needs the magnitude,
/// not the kernel's epsilon-aware sign classification.
pub fn signed_cross(a: &Vertex, b: &Vertex, c: &Vertex) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn dist_sq(a: &Vertex, b: &Vertex) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Result of testing one triangle against the bad-triangle criterion.
pub struct BadTriangleVerdict {
    /// Index (0, 1, or 2) of the triangle's shortest side, in the same order
    /// as the `(a, b, c)` corners passed in: side 0 is `a-b`, 1 is `b-c`, 2
    /// is `c-a`.
    pub shortest_side: usize,
    pub cross_sq: f64,
}

/// Tests triangle `a, b, c` (assumed CCW) against spec.md's bad-triangle
/// criterion: letting `l_a, l_b, l_c` be edge-length-squared and `pairProd`
/// the product of the two lengths-squared *other than* the shortest side,
/// the triangle is bad iff `pairProd ≥ 4·ρ_min²·cross²` and
/// `cross² > 4·minTriangleArea²`.
pub fn evaluate_triangle(
    a: &Vertex,
    b: &Vertex,
    c: &Vertex,
    rho_min: f64,
    min_triangle_area: f64,
) -> Option<BadTriangleVerdict> {
    let l_ab = dist_sq(a, b); // side 0
    let l_bc = dist_sq(b, c); // side 1
    let l_ca = dist_sq(c, a); // side 2

    let (shortest_side, pair_prod) = if l_ab <= l_bc && l_ab <= l_ca {
        (0, l_bc * l_ca)
    } else if l_bc <= l_ca {
        (1, l_ab * l_ca)
    } else {
        (2, l_ab * l_bc)
    };

    let cross = signed_cross(a, b, c);
    let cross_sq = cross * cross;

    let is_bad = pair_prod >= 4.0 * rho_min * rho_min * cross_sq && cross_sq > 4.0 * min_triangle_area * min_triangle_area;
    if is_bad {
        Some(BadTriangleVerdict { shortest_side, cross_sq })
    } else {
        None
    }
}

/// Off-center candidate insertion point for a bad triangle whose shortest
/// edge is `p -> q`, with `apex` the triangle's third corner (used only to
/// orient the normal into the triangle's interior and as the degeneracy
/// fallback target). `circumcenter` is `(cx, cy)` of the same triangle.
///
/// Spec.md: "Let `(p, q)` be the shortest edge, `m` its midpoint, `n` the
/// unit normal pointing into the triangle interior, `dCirc = |circumcenter −
/// m|`, `d = min(dCirc, β·|pq|)`. Candidate is `m + d·n`. If it falls outside
/// the triangle due to near-degeneracy, fall back to the circumcenter."
pub fn off_center_point(p: &Vertex, q: &Vertex, apex: &Vertex, circumcenter: (f64, f64), beta: f64) -> (f64, f64) {
    let mx = (p.x + q.x) / 2.0;
    let my = (p.y + q.y) / 2.0;

    let dx = q.x - p.x;
    let dy = q.y - p.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return circumcenter;
    }

    // Perpendicular to pq, pointing toward `apex` (i.e. into the triangle).
    let (mut nx, mut ny) = (-dy / len, dx / len);
    let side = nx * (apex.x - mx) + ny * (apex.y - my);
    if side < 0.0 {
        nx = -nx;
        ny = -ny;
    }

    let (cx, cy) = circumcenter;
    let d_circ = ((cx - mx).powi(2) + (cy - my).powi(2)).sqrt();
    let d = d_circ.min(beta * len);

    let candidate = (mx + d * nx, my + d * ny);
    if is_inside_triangle(candidate, p, q, apex) {
        candidate
    } else {
        circumcenter
    }
}

fn is_inside_triangle(pt: (f64, f64), a: &Vertex, b: &Vertex, c: &Vertex) -> bool {
    let (px, py) = pt;
    let d1 = signed_cross(a, b, &point_vertex(px, py));
    let d2 = signed_cross(b, c, &point_vertex(px, py));
    let d3 = signed_cross(c, a, &point_vertex(px, py));
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

fn point_vertex(x: f64, y: f64) -> Vertex {
    Vertex::new(x, y, 0.0, -1)
}

/// True iff `r` lies inside (or on) the diametral (Gabriel) circle of
/// segment `p-q`: equivalent to the angle `p-r-q` being ≥ 90°, tested
/// directly via `(r - p)·(r - q) ≤ 0` rather than constructing the circle.
pub fn encroaches(p: &Vertex, q: &Vertex, r: &Vertex) -> bool {
    let dot = (r.x - p.x) * (r.x - q.x) + (r.y - p.y) * (r.y - q.y);
    dot <= 0.0
}

/// `shellIndex(z, m) = round(log2(|m - z|))` — classifies a midpoint `m`
/// into the concentric ring around critical corner `z` it falls on.
pub fn shell_index(z: &Vertex, m: &Vertex) -> i32 {
    let d = dist_sq(z, m).sqrt();
    if d <= 0.0 {
        return i32::MIN;
    }
    d.log2().round() as i32
}

/// Clamps `m` onto the exact shell radius `2^shell` from `z`, along the ray
/// `z -> m` (spec.md §4.6 step 2: "clamp `m` to the exact shell radius...
/// along the segment").
pub fn clamp_to_shell(z: &Vertex, m: &Vertex, shell: i32) -> (f64, f64) {
    let dx = m.x - z.x;
    let dy = m.y - z.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return (m.x, m.y);
    }
    let target = 2f64.powi(shell);
    let scale = target / len;
    (z.x + dx * scale, z.y + dy * scale)
}
