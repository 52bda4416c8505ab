//! Pure collision-prediction and response functions. No state.
//!
//! Every function here either returns `f32::INFINITY` for a non-collision
//! (parallel, receding, tangent, degenerate) or a finite time/position —
//! never an `Err`. Degenerate geometry is an expected input, not a failure
//! (spec §7).
//!
//! Rectangle collision prediction uses the same disk time-to-hit as a
//! regular particle, against its bounding-radius proxy (`Particle::radius`
//! for a `Rect` is `0.5 * diagonal`). This is an acknowledged approximation
//! (spec §9) — true SAT/swept-AABB is out of scope.

use crate::constants::{
    MAX_SEGMENT_SAMPLES, MIN_SEGMENT_SAMPLES, NORMAL_ROUNDING_DIGITS, SEGMENT_RAY_REACH,
};
use crate::particle::Particle;
use crate::wall::Wall;

/// Time until two disks collide, or `f32::INFINITY` if they never will.
///
/// Closed-form solution of `|Δr + t·Δv| = σ` for the smallest non-negative
/// `t`, where `σ` is the combined radius. Symmetric: `time_to_hit(a, b) ==
/// time_to_hit(b, a)`.
pub fn time_to_hit_particle(a: &Particle, b: &Particle) -> f32 {
    if a == b {
        return f32::INFINITY;
    }

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dvx = b.vx - a.vx;
    let dvy = b.vy - a.vy;

    let dvdr = dx * dvx + dy * dvy;
    if dvdr >= 0.0 {
        return f32::INFINITY;
    }

    let dvdv = dvx * dvx + dvy * dvy;
    let drdr = dx * dx + dy * dy;
    let sigma = a.radius + b.radius;

    let d = dvdr * dvdr - dvdv * (drdr - sigma * sigma);
    if d <= 0.0 {
        return f32::INFINITY;
    }

    -(dvdr + d.sqrt()) / dvdv
}

/// Time until `p` crosses the vertical half-plane at `x`, or `f32::INFINITY`.
pub fn time_to_hit_vwall(p: &Particle, x: f32) -> f32 {
    if p.vx > 0.0 && p.x < x {
        (x - p.radius - p.x) / p.vx
    } else if p.vx < 0.0 && p.x > x {
        (x + p.radius - p.x) / p.vx
    } else {
        f32::INFINITY
    }
}

/// Time until `p` crosses the horizontal half-plane at `y`, or `f32::INFINITY`.
pub fn time_to_hit_hwall(p: &Particle, y: f32) -> f32 {
    if p.vy > 0.0 && p.y < y {
        (y - p.radius - p.y) / p.vy
    } else if p.vy < 0.0 && p.y > y {
        (y + p.radius - p.y) / p.vy
    } else {
        f32::INFINITY
    }
}

/// Number of leading-edge sample points used by `time_to_hit_segment` for
/// a disk of the given radius: `min(floor(r) + 5, 31)`, forced odd so the
/// point straight ahead of the velocity vector is always included.
fn segment_sample_count(radius: f32) -> u32 {
    let raw = (radius.floor() as i64 + 5).clamp(
        MIN_SEGMENT_SAMPLES as i64,
        MAX_SEGMENT_SAMPLES as i64,
    ) as u32;
    if raw % 2 == 0 {
        raw + 1
    } else {
        raw
    }
}

/// Time until `p` (a disk) collides with a `LineSegment` wall, or
/// `f32::INFINITY`.
///
/// No closed form exists for a moving disk against a finite segment, so
/// this samples `K` points evenly spaced along the half of the disk's
/// perimeter facing the velocity vector, casts a forward ray from each,
/// and returns the earliest finite hit (spec §4.1).
pub fn time_to_hit_segment(p: &Particle, wall: &Wall) -> f32 {
    let (seg_p0, seg_p1) = match wall {
        Wall::LineSegment { p0, p1, .. } => (*p0, *p1),
        _ => return f32::INFINITY,
    };

    let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
    if speed == 0.0 {
        return f32::INFINITY;
    }

    let heading = p.vy.atan2(p.vx);
    let k = segment_sample_count(p.radius);
    let half_sweep = std::f32::consts::PI; // leading half: ±90° from heading
    let mut best = f32::INFINITY;

    for i in 0..k {
        let frac = i as f32 / (k - 1) as f32; // 0..1
        let sample_angle = heading - half_sweep / 2.0 + frac * half_sweep;
        let sx = p.x + p.radius * sample_angle.cos();
        let sy = p.y + p.radius * sample_angle.sin();

        let ray_end = (
            sx + p.vx * SEGMENT_RAY_REACH,
            sy + p.vy * SEGMENT_RAY_REACH,
        );

        if let Intersection::Point(ix, iy) =
            segment_intersection((sx, sy), ray_end, seg_p0, seg_p1)
        {
            let t = if p.vx.abs() > p.vy.abs() {
                (ix - sx) / p.vx
            } else {
                (iy - sy) / p.vy
            };
            if t >= 0.0 && t < best {
                best = t;
            }
        }
    }

    best
}

/// Dispatches time-to-hit by wall variant.
pub fn time_to_hit_wall(p: &Particle, wall: &Wall) -> f32 {
    match wall {
        Wall::VHalfPlane { x } => time_to_hit_vwall(p, *x),
        Wall::HHalfPlane { y } => time_to_hit_hwall(p, *y),
        Wall::LineSegment { .. } => time_to_hit_segment(p, wall),
    }
}

/// Result of intersecting two finite segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    /// The segments do not intersect.
    None,
    /// A single intersection point.
    Point(f32, f32),
    /// The segments are collinear and overlap; returns a representative
    /// point (the first segment's own starting endpoint, per spec §4.1).
    Overlap(f32, f32),
}

/// Intersects segment `a0`-`a1` with segment `b0`-`b1`.
///
/// Parametric solve for `s, t ∈ [0, 1]`. Degenerate cases (parallel,
/// collinear) are handled explicitly rather than dividing by a
/// near-zero denominator.
pub fn segment_intersection(
    a0: (f32, f32),
    a1: (f32, f32),
    b0: (f32, f32),
    b1: (f32, f32),
) -> Intersection {
    let r = (a1.0 - a0.0, a1.1 - a0.1);
    let s = (b1.0 - b0.0, b1.1 - b0.1);
    let denom = r.0 * s.1 - r.1 * s.0;

    let qp = (b0.0 - a0.0, b0.1 - a0.1);

    if denom.abs() < 1e-9 {
        // Parallel. Collinear iff (b0 - a0) x r == 0 too.
        let cross = qp.0 * r.1 - qp.1 * r.0;
        if cross.abs() < 1e-9 {
            // Collinear: check for any overlap via projection onto r.
            let rr = r.0 * r.0 + r.1 * r.1;
            if rr < 1e-12 {
                return Intersection::None;
            }
            let t0 = (qp.0 * r.0 + qp.1 * r.1) / rr;
            let t1 = t0 + (s.0 * r.0 + s.1 * r.1) / rr;
            let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            if hi < 0.0 || lo > 1.0 {
                return Intersection::None;
            }
            return Intersection::Overlap(a0.0, a0.1);
        }
        return Intersection::None;
    }

    let t = (qp.0 * s.1 - qp.1 * s.0) / denom;
    let u = (qp.0 * r.1 - qp.1 * r.0) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Intersection::Point(a0.0 + t * r.0, a0.1 + t * r.1)
    } else {
        Intersection::None
    }
}

/// Projects `p` onto the infinite line through the segment, then clamps to
/// the segment's endpoints.
pub fn closest_point_on_segment(p: (f32, f32), seg_p0: (f32, f32), seg_p1: (f32, f32)) -> (f32, f32) {
    let dx = seg_p1.0 - seg_p0.0;
    let dy = seg_p1.1 - seg_p0.1;
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-12 {
        return seg_p0;
    }
    let t = ((p.0 - seg_p0.0) * dx + (p.1 - seg_p0.1) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);
    (seg_p0.0 + t * dx, seg_p0.1 + t * dy)
}

/// Components of the impulse applied in an elastic particle-particle
/// collision: `(fx, fy)`, to be divided by each particle's mass and
/// applied with opposite sign (spec §4.1). Returns `(0.0, 0.0)` if both
/// particles are immovable.
///
/// `ParticleStore::bounce_off` implements the immovable-particle limit
/// directly rather than calling this helper, to avoid `inf * 0` NaNs; this
/// function is kept for the finite-finite case and for tests exercising
/// the impulse formula in isolation.
pub fn elastic_impulse_components(a: &Particle, b: &Particle) -> (f32, f32) {
    if a.is_immovable() && b.is_immovable() {
        return (0.0, 0.0);
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dvx = b.vx - a.vx;
    let dvy = b.vy - a.vy;
    let dvdr = dx * dvx + dy * dvy;
    let dist = a.radius + b.radius;
    let j = 2.0 * a.mass * b.mass * dvdr / ((a.mass + b.mass) * dist);
    (j * dx / dist, j * dy / dist)
}

/// Reflects a velocity vector through a line at the given angle from the
/// x-axis, using a normal rounded to `NORMAL_ROUNDING_DIGITS` decimal
/// digits to suppress grazing drift (spec §4.1).
pub fn reflect_velocity(vx: f32, vy: f32, angle: f32) -> (f32, f32) {
    let scale = 10f32.powi(NORMAL_ROUNDING_DIGITS);
    let nx = (-angle.sin() * scale).round() / scale;
    let ny = (angle.cos() * scale).round() / scale;
    let dot = nx * vx + ny * vy;
    (vx - 2.0 * dot * nx, vy - 2.0 * dot * ny)
}
