//! TOML persistence of a running simulation's live state.
//!
//! Unlike `config::SimConfig`, which describes how to *build* a fresh run,
//! `SimDocument` captures an in-progress run's exact particle state so it
//! can be restored later (spec §6).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::particle::{Particle, ParticleStore, Shape};
use crate::wall::{Wall, WallSet};

/// Persisted state of a single particle, keyed by its index as a string
/// (TOML tables require string keys).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub mass: f32,
    pub radius: f32,
    pub width: f32,
    pub height: f32,
    pub is_rect: bool,
}

impl From<&Particle> for ParticleRecord {
    fn from(p: &Particle) -> Self {
        ParticleRecord {
            x: p.x,
            y: p.y,
            vx: p.vx,
            vy: p.vy,
            mass: p.mass,
            radius: p.radius,
            width: p.width,
            height: p.height,
            is_rect: p.shape == Shape::Rect,
        }
    }
}

/// Persisted state of a single line-segment wall. Boundary half-planes are
/// not persisted; they are re-derived from `arena_width`/`arena_height` on
/// load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallRecord {
    pub p0: (f32, f32),
    pub p1: (f32, f32),
}

/// A full snapshot of a simulation's live state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimDocument {
    pub arena_width: f32,
    pub arena_height: f32,
    pub sim_time: f32,
    pub particles: HashMap<String, ParticleRecord>,
    pub walls: HashMap<String, WallRecord>,
}

impl SimDocument {
    /// Captures `store`/`walls`/`sim_time` into a document ready to
    /// serialize. Only `LineSegment` walls are recorded; boundary
    /// half-planes are reconstructed from the arena dimensions on load.
    pub fn capture(store: &ParticleStore, walls: &WallSet, arena_width: f32, arena_height: f32, sim_time: f32) -> Self {
        let particles = store
            .iter()
            .enumerate()
            .map(|(i, p)| (i.to_string(), ParticleRecord::from(p)))
            .collect();
        let segment_walls = walls
            .iter()
            .filter_map(|(i, w)| match w {
                Wall::LineSegment { p0, p1, .. } => Some((i.to_string(), WallRecord { p0: *p0, p1: *p1 })),
                _ => None,
            })
            .collect();
        SimDocument {
            arena_width,
            arena_height,
            sim_time,
            particles,
            walls: segment_walls,
        }
    }

    /// Reconstructs a `ParticleStore`/`WallSet` pair from this document.
    pub fn restore(&self) -> SimResult<(ParticleStore, WallSet, f32)> {
        let mut walls = WallSet::with_boundary(self.arena_width, self.arena_height);
        for record in self.walls.values() {
            walls.push(Wall::segment(record.p0, record.p1));
        }

        let mut entries: Vec<(usize, &ParticleRecord)> = self
            .particles
            .iter()
            .map(|(k, v)| {
                k.parse::<usize>()
                    .map(|i| (i, v))
                    .map_err(|_| SimError::Config {
                        detail: format!("non-numeric particle key '{k}' in save document"),
                    })
            })
            .collect::<SimResult<Vec<_>>>()?;
        entries.sort_by_key(|(i, _)| *i);

        let particles = entries
            .into_iter()
            .map(|(i, r)| {
                if r.is_rect {
                    Particle::new_rect(i, r.x, r.y, r.vx, r.vy, r.mass, r.width, r.height)
                } else {
                    Particle::new_disk(i, r.x, r.y, r.vx, r.vy, r.mass, r.radius)
                }
            })
            .collect();

        Ok((ParticleStore::new(particles), walls, self.sim_time))
    }

    /// Writes this document to `path` as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self).map_err(|e| SimError::Config {
            detail: format!("could not serialize save document: {e}"),
        })?;
        fs::write(path, text).map_err(|e| SimError::io(path.display().to_string(), e))
    }

    /// Loads a document previously written by `save`.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SimError::io(path.display().to_string(), e))?;
        toml::from_str(&text).map_err(|e| SimError::Config {
            detail: format!("{}: {e}", path.display()),
        })
    }
}
