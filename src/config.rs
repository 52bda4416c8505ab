//! TOML simulation configuration: particle groups, walls, and run
//! parameters, loaded once at startup.
//!
//! Unspecified positions/velocities are randomized within the arena and
//! `DEFAULT_SPEED_RANGE` using `rand`, mirroring how the teacher's physics
//! config applied compiled defaults before an on-disk override was read.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MASS, DEFAULT_RADIUS, DEFAULT_SPEED_RANGE, DEFAULT_WORKER_COUNT};
use crate::error::{validate_arena, SimError, SimResult};
use crate::particle::{Particle, ParticleStore};
use crate::wall::{Wall, WallSet};

/// One group of particles spawned with shared physical properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleGroupConfig {
    /// Number of particles to spawn from this group.
    pub count: usize,
    /// Disk radius. Defaults to `DEFAULT_RADIUS` if omitted.
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Mass. Defaults to `DEFAULT_MASS` if omitted. Use a very large value
    /// (or explicitly set `immovable = true`) for a fixed obstacle.
    #[serde(default = "default_mass")]
    pub mass: f32,
    /// If true, overrides `mass` with `IMMOVABLE_MASS`.
    #[serde(default)]
    pub immovable: bool,
    /// Fixed starting positions, one per particle. If shorter than
    /// `count`, the remainder are placed at random positions inside the
    /// arena.
    #[serde(default)]
    pub positions: Vec<(f32, f32)>,
    /// Fixed starting velocities, same padding rule as `positions`.
    #[serde(default)]
    pub velocities: Vec<(f32, f32)>,
}

fn default_radius() -> f32 {
    DEFAULT_RADIUS
}

fn default_mass() -> f32 {
    DEFAULT_MASS
}

/// A configured line-segment wall, given as two endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallConfig {
    pub p0: (f32, f32),
    pub p1: (f32, f32),
}

/// Top-level simulation configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Arena width; also the position of the right boundary wall.
    pub arena_width: f32,
    /// Arena height; also the position of the top boundary wall.
    pub arena_height: f32,
    /// Particle groups to spawn, in order; indices are assigned
    /// sequentially across groups.
    #[serde(default)]
    pub particles: Vec<ParticleGroupConfig>,
    /// Interior line-segment walls, in addition to the arena boundary.
    #[serde(default)]
    pub walls: Vec<WallConfig>,
    /// Number of prediction worker threads.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

impl SimConfig {
    /// Loads and parses a configuration document from `path`.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SimError::io(path.display().to_string(), e))?;
        toml::from_str(&text).map_err(|e| SimError::Config {
            detail: format!("{}: {e}", path.display()),
        })
    }

    /// Builds the live `ParticleStore` and `WallSet` this configuration
    /// describes, validating the arena and every wall before returning.
    pub fn build<R: Rng>(&self, rng: &mut R) -> SimResult<(ParticleStore, WallSet)> {
        let max_radius = self
            .particles
            .iter()
            .map(|g| g.radius)
            .fold(0.0_f32, f32::max);
        validate_arena(self.arena_width, self.arena_height, max_radius)?;

        let mut walls = WallSet::with_boundary(self.arena_width, self.arena_height);
        for w in &self.walls {
            if w.p0 == w.p1 {
                return Err(SimError::Config {
                    detail: format!("zero-length wall segment at {:?}", w.p0),
                });
            }
            walls.push(Wall::segment(w.p0, w.p1));
        }

        let mut particles = Vec::new();
        let mut index = 0;
        for group in &self.particles {
            for n in 0..group.count {
                let (x, y) = group
                    .positions
                    .get(n)
                    .copied()
                    .unwrap_or_else(|| random_position(rng, self.arena_width, self.arena_height, group.radius));
                let (vx, vy) = group
                    .velocities
                    .get(n)
                    .copied()
                    .unwrap_or_else(|| random_velocity(rng));
                let mass = if group.immovable {
                    crate::constants::IMMOVABLE_MASS
                } else {
                    group.mass
                };
                particles.push(Particle::new_disk(index, x, y, vx, vy, mass, group.radius));
                index += 1;
            }
        }

        Ok((ParticleStore::new(particles), walls))
    }
}

fn random_position<R: Rng>(rng: &mut R, width: f32, height: f32, radius: f32) -> (f32, f32) {
    (
        rng.gen_range(radius..(width - radius)),
        rng.gen_range(radius..(height - radius)),
    )
}

fn random_velocity<R: Rng>(rng: &mut R) -> (f32, f32) {
    let (lo, hi) = DEFAULT_SPEED_RANGE;
    (rng.gen_range(lo..hi), rng.gen_range(lo..hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> SimConfig {
        SimConfig {
            arena_width: 100.0,
            arena_height: 100.0,
            particles: vec![ParticleGroupConfig {
                count: 2,
                radius: 5.0,
                mass: 1.0,
                immovable: false,
                positions: vec![(10.0, 10.0)],
                velocities: vec![],
            }],
            walls: vec![],
            worker_count: 2,
        }
    }

    #[test]
    fn build_assigns_sequential_indices() {
        let mut rng = rand::thread_rng();
        let (store, _walls) = sample_config().build(&mut rng).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().index, 0);
        assert_eq!(store.get(1).unwrap().index, 1);
    }

    #[test]
    fn build_fills_in_missing_positions_randomly() {
        let mut rng = rand::thread_rng();
        let (store, _walls) = sample_config().build(&mut rng).unwrap();
        let p0 = store.get(0).unwrap();
        assert_eq!((p0.x, p0.y), (10.0, 10.0));
    }

    #[test]
    fn arena_too_small_is_rejected() {
        let mut cfg = sample_config();
        cfg.arena_width = 5.0;
        let mut rng = rand::thread_rng();
        assert!(matches!(cfg.build(&mut rng), Err(SimError::ArenaTooSmall { .. })));
    }

    #[test]
    fn zero_length_wall_is_rejected() {
        let mut cfg = sample_config();
        cfg.walls.push(WallConfig {
            p0: (1.0, 1.0),
            p1: (1.0, 1.0),
        });
        let mut rng = rand::thread_rng();
        assert!(matches!(cfg.build(&mut rng), Err(SimError::Config { .. })));
    }

    #[test]
    fn immovable_flag_overrides_mass() {
        let mut cfg = sample_config();
        cfg.particles[0].immovable = true;
        let mut rng = rand::thread_rng();
        let (store, _walls) = cfg.build(&mut rng).unwrap();
        assert!(store.get(0).unwrap().is_immovable());
    }
}
