//! Immutable wall descriptors, built once at startup.
//!
//! A `WallSet` never changes after construction — particles bounce off its
//! entries but no wall is ever added, removed, or moved during a run.

/// A single wall a particle can rebound off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wall {
    /// A vertical half-plane boundary at `x`.
    VHalfPlane {
        /// World-space x coordinate of the plane.
        x: f32,
    },
    /// A horizontal half-plane boundary at `y`.
    HHalfPlane {
        /// World-space y coordinate of the plane.
        y: f32,
    },
    /// An oriented line segment with precomputed derived fields.
    LineSegment {
        /// First endpoint.
        p0: (f32, f32),
        /// Second endpoint.
        p1: (f32, f32),
        /// `p1.0 - p0.0`.
        dx: f32,
        /// `p1.1 - p0.1`.
        dy: f32,
        /// Euclidean length of the segment; invariant: `> 0`.
        length: f32,
        /// `atan2(dy, dx)`.
        angle: f32,
    },
}

impl Wall {
    /// Builds a `LineSegment` wall from two endpoints, computing the
    /// derived `dx`/`dy`/`length`/`angle` fields.
    ///
    /// Panics if the endpoints coincide — a zero-length segment violates
    /// the `length > 0` invariant and configuration loading is expected to
    /// reject such records before they reach here (see `config.rs`).
    pub fn segment(p0: (f32, f32), p1: (f32, f32)) -> Self {
        let dx = p1.0 - p0.0;
        let dy = p1.1 - p0.1;
        let length = (dx * dx + dy * dy).sqrt();
        assert!(length > 0.0, "degenerate zero-length line segment wall");
        Wall::LineSegment {
            p0,
            p1,
            dx,
            dy,
            length,
            angle: dy.atan2(dx),
        }
    }

    /// Returns `true` if this is a `LineSegment` variant.
    pub fn is_segment(&self) -> bool {
        matches!(self, Wall::LineSegment { .. })
    }
}

/// An immutable collection of walls, indexed by position for use as an
/// `Event`/`WorkRequest` wall reference.
#[derive(Debug, Clone, Default)]
pub struct WallSet {
    walls: Vec<Wall>,
}

impl WallSet {
    /// Builds a `WallSet` from a fixed list of walls.
    pub fn new(walls: Vec<Wall>) -> Self {
        Self { walls }
    }

    /// Builds the four axis-aligned boundary walls for an arena of the
    /// given dimensions, with the origin at the arena's bottom-left
    /// corner (matching `config::SimConfig`'s coordinate convention).
    pub fn with_boundary(width: f32, height: f32) -> Self {
        Self::new(vec![
            Wall::VHalfPlane { x: 0.0 },
            Wall::VHalfPlane { x: width },
            Wall::HHalfPlane { y: 0.0 },
            Wall::HHalfPlane { y: height },
        ])
    }

    /// Appends a wall, returning its index.
    pub fn push(&mut self, wall: Wall) -> usize {
        self.walls.push(wall);
        self.walls.len() - 1
    }

    /// Number of walls in the set.
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// `true` if the set holds no walls.
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Looks up a wall by index.
    pub fn get(&self, index: usize) -> Option<&Wall> {
        self.walls.get(index)
    }

    /// Iterates over `(index, wall)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Wall)> {
        self.walls.iter().enumerate()
    }
}
