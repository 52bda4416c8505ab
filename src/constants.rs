//! Centralised simulation constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.

// ── Timing ───────────────────────────────────────────────────────────────────

/// Fixed physics tick rate, in ticks per simulated second.
///
/// `TIME_PER_TICK = 1.0 / TICKS_PER_SECOND`. Raising this tightens the
/// sub-tick temporal error the scheduler tolerates (see `scheduler.rs`'s
/// catch-up loop) at the cost of more event-heap churn per real second.
pub const TICKS_PER_SECOND: f32 = 60.0;

/// Seconds advanced by a single `Scheduler` tick.
pub const TIME_PER_TICK: f32 = 1.0 / TICKS_PER_SECOND;

/// Absolute upper bound on a prediction's anchor-relative event time.
///
/// Events predicted further out than this are dropped rather than queued;
/// 10,000s at 60 ticks/s is effectively "the rest of the run" for any
/// session this core is expected to host.
pub const DEFAULT_HORIZON: f32 = 10_000.0;

/// Small time nudge that keeps an already-overlapping collision from
/// sliding into the unreachable past.
///
/// See spec scenario S4: an event computed with a negative `dt` is clamped
/// to `max(anchor - EPSILON, anchor + dt)` so it still surfaces near the
/// front of the heap instead of being silently skipped.
pub const EPSILON: f32 = 1.0 / TICKS_PER_SECOND;

// ── Geometry kernel ───────────────────────────────────────────────────────────

/// Decimal digits kept when rounding a line segment's outward normal before
/// reflecting a velocity through it.
///
/// Rounding suppresses the grazing drift that would otherwise make a
/// rebound direction hypersensitive to floating-point noise in `angle`.
pub const NORMAL_ROUNDING_DIGITS: i32 = 10;

/// Hard cap on the number of leading-edge sample points used by
/// `geometry::time_to_hit_segment`, regardless of radius.
pub const MAX_SEGMENT_SAMPLES: u32 = 31;

/// Minimum number of leading-edge sample points, used for small radii.
pub const MIN_SEGMENT_SAMPLES: u32 = 5;

/// Scalar multiple of particle speed used to build the forward ray cast
/// against a line segment in `geometry::time_to_hit_segment`. Large enough
/// that any segment within the arena is swept, small enough to avoid
/// floating-point blowup.
pub const SEGMENT_RAY_REACH: f32 = 1.0e6;

// ── Spawn defaults ────────────────────────────────────────────────────────────

/// Default per-axis speed range (world units/second) used to randomize an
/// unspecified particle velocity at spawn time.
pub const DEFAULT_SPEED_RANGE: (f32, f32) = (-200.0, 200.0);

/// Default particle radius when a configuration omits one.
pub const DEFAULT_RADIUS: f32 = 5.0;

/// Default particle mass when a configuration omits one.
pub const DEFAULT_MASS: f32 = 1.0;

// ── Concurrency ───────────────────────────────────────────────────────────────

/// Default number of stateless prediction workers in the pool.
pub const DEFAULT_WORKER_COUNT: usize = 4;

// ── Particle invariants ───────────────────────────────────────────────────────

/// Sentinel mass used for immovable particles (infinite-mass markers).
///
/// Impulse resolution checks `Particle::is_immovable()` rather than
/// comparing against this value directly; it exists so an immovable
/// particle can be constructed and displayed like any other without an
/// `Option<f32>` mass field.
pub const IMMOVABLE_MASS: f32 = f32::INFINITY;
