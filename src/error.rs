//! Simulation-specific error types.
//!
//! Systems propagate errors through these types rather than panicking where
//! practical, enabling graceful degradation instead of hard crashes. Only
//! startup-time failures (bad configuration, a too-small arena, unreadable
//! save files) are represented here — degenerate geometry never produces an
//! `Err`, it returns `f32::INFINITY` from the kernel (see `geometry.rs`).
//!
//! ## Usage
//!
//! ```rust
//! use collide_core::error::{SimError, SimResult};
//!
//! fn validate_arena(width: f32, height: f32) -> SimResult<()> {
//!     if width <= 0.0 || height <= 0.0 {
//!         return Err(SimError::ArenaTooSmall { width, height });
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Top-level error enum for the collision-scheduling core.
#[derive(Debug)]
pub enum SimError {
    /// A configuration document could not be parsed, or parsed into a
    /// record that violates a data-model invariant (e.g. a wall with zero
    /// length, or a particle group with a non-positive radius).
    Config {
        /// Human-readable description of what was wrong and where.
        detail: String,
    },

    /// The arena is too small to host the walls/particles a configuration
    /// describes, e.g. a boundary wall pair that leaves no positive
    /// interior, or a particle radius larger than half the arena's
    /// shortest side.
    ArenaTooSmall {
        /// Configured arena width.
        width: f32,
        /// Configured arena height.
        height: f32,
    },

    /// A particle or wall index referenced by an `Event` or `WorkRequest`
    /// fell outside the live `ParticleStore`/`WallSet`. This indicates a
    /// programming error in the scheduler or a worker, not a data problem.
    IndexOutOfRange {
        /// Human-readable description of where the lookup occurred.
        context: &'static str,
        /// The index that was rejected.
        index: usize,
        /// Number of live entries in the collection being indexed.
        len: usize,
    },

    /// Reading or writing a persisted configuration/save document failed.
    Io {
        /// Path the operation was attempted against.
        path: String,
        /// Underlying I/O error, rendered as text (kept `String` so
        /// `SimError` stays `Clone`-free-of-surprises and easy to match on
        /// in tests without depending on `std::io::Error`'s non-`PartialEq`
        /// nature).
        detail: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config { detail } => write!(f, "invalid configuration: {detail}"),
            SimError::ArenaTooSmall { width, height } => write!(
                f,
                "arena {width}x{height} is too small for the configured particles/walls"
            ),
            SimError::IndexOutOfRange {
                context,
                index,
                len,
            } => write!(
                f,
                "index {index} out of range (len {len}) during '{context}'"
            ),
            SimError::Io { path, detail } => write!(f, "I/O error on '{path}': {detail}"),
        }
    }
}

impl std::error::Error for SimError {}

impl SimError {
    /// Wraps a `std::io::Error` encountered while touching `path`.
    pub fn io(path: impl Into<String>, err: std::io::Error) -> Self {
        SimError::Io {
            path: path.into(),
            detail: err.to_string(),
        }
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if the arena's dimensions cannot host a particle of
/// `max_radius`, i.e. there is no positive space left once diameters on
/// both axes are subtracted.
pub fn validate_arena(width: f32, height: f32, max_radius: f32) -> SimResult<()> {
    if width <= 0.0 || height <= 0.0 {
        return Err(SimError::ArenaTooSmall { width, height });
    }
    if max_radius * 2.0 >= width || max_radius * 2.0 >= height {
        return Err(SimError::ArenaTooSmall { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_with_positive_interior_is_valid() {
        assert!(validate_arena(100.0, 100.0, 5.0).is_ok());
    }

    #[test]
    fn arena_smaller_than_one_particle_is_rejected() {
        assert!(matches!(
            validate_arena(8.0, 100.0, 5.0),
            Err(SimError::ArenaTooSmall { .. })
        ));
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        assert!(matches!(
            validate_arena(0.0, 100.0, 5.0),
            Err(SimError::ArenaTooSmall { .. })
        ));
    }
}
