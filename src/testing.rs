//! Scenario builders used by unit tests and `tests/scenarios.rs` to spawn
//! known-good starting configurations, following the spec §8 scenario
//! list (S1–S6).

use crate::particle::{Particle, ParticleStore};
use crate::scheduler::Scheduler;
use crate::wall::{Wall, WallSet};

/// S1: two approaching disks on a collision course in an open arena.
pub fn spawn_test_head_on_pair() -> Scheduler {
    let particles = ParticleStore::new(vec![
        Particle::new_disk(0, 30.0, 50.0, 10.0, 0.0, 1.0, 5.0),
        Particle::new_disk(1, 70.0, 50.0, -10.0, 0.0, 1.0, 5.0),
    ]);
    let walls = WallSet::with_boundary(100.0, 100.0);
    Scheduler::with_worker_count(particles, walls, 2)
}

/// S2: a single disk falling toward the top boundary wall.
pub fn spawn_test_wall_approach() -> Scheduler {
    let particles = ParticleStore::new(vec![Particle::new_disk(0, 50.0, 95.0, 0.0, 10.0, 1.0, 5.0)]);
    let walls = WallSet::with_boundary(100.0, 100.0);
    Scheduler::with_worker_count(particles, walls, 1)
}

/// S3: a disk on a collision course with an interior line-segment wall.
pub fn spawn_test_segment_approach() -> Scheduler {
    let particles = ParticleStore::new(vec![Particle::new_disk(0, 45.0, 30.0, 10.0, 0.0, 1.0, 5.0)]);
    let mut walls = WallSet::with_boundary(100.0, 100.0);
    walls.push(Wall::segment((60.0, 20.0), (60.0, 40.0)));
    Scheduler::with_worker_count(particles, walls, 1)
}

/// S4: two disks that already overlap at spawn time, exercising the
/// negative-`dt` clamp in `workers::predict_particle`.
pub fn spawn_test_overlapping_pair() -> Scheduler {
    let particles = ParticleStore::new(vec![
        Particle::new_disk(0, 47.5, 50.0, 10.0, 0.0, 1.0, 5.0),
        Particle::new_disk(1, 50.0, 50.0, -10.0, 0.0, 1.0, 5.0),
    ]);
    let walls = WallSet::with_boundary(100.0, 100.0);
    Scheduler::with_worker_count(particles, walls, 1)
}

/// S5: a movable disk colliding head-on with a fixed, infinite-mass disk.
pub fn spawn_test_immovable_obstacle() -> Scheduler {
    let particles = ParticleStore::new(vec![
        Particle::new_disk(0, 20.0, 50.0, 10.0, 0.0, 1.0, 5.0),
        Particle::new_disk(1, 60.0, 50.0, 0.0, 0.0, crate::constants::IMMOVABLE_MASS, 10.0),
    ]);
    let walls = WallSet::with_boundary(100.0, 100.0);
    Scheduler::with_worker_count(particles, walls, 1)
}

/// S6: a dense field of particles used to exercise the scheduler under
/// many simultaneous predictions, plus an intersecting pair of interior
/// segment walls.
pub fn spawn_test_dense_field(n: usize) -> Scheduler {
    let mut particles = Vec::with_capacity(n);
    for i in 0..n {
        let row = i / 10;
        let col = i % 10;
        let x = 10.0 + col as f32 * 8.0;
        let y = 10.0 + row as f32 * 8.0;
        let vx = if i % 2 == 0 { 15.0 } else { -15.0 };
        let vy = if i % 3 == 0 { 10.0 } else { -10.0 };
        particles.push(Particle::new_disk(i, x, y, vx, vy, 1.0, 3.0));
    }
    let mut walls = WallSet::with_boundary(100.0, 100.0);
    walls.push(Wall::segment((0.0, 0.0), (100.0, 100.0)));
    walls.push(Wall::segment((100.0, 0.0), (0.0, 100.0)));
    Scheduler::with_worker_count(ParticleStore::new(particles), walls, 4)
}
