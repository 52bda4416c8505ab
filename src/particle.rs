//! Particle data model, generation counters, and the `ParticleStore`.
//!
//! A `ParticleStore` is logically owned by the `Scheduler`; prediction
//! workers only ever see an immutable `Arc<ParticleSnapshot>` copy (see
//! `workers.rs`), never the live store.

use crate::constants::IMMOVABLE_MASS;
use crate::wall::Wall;

/// Disk vs. rectangle shape tag.
///
/// Rectangles use a disk-approximated bounding radius for collision
/// prediction (see `geometry.rs`'s module docs) — this is an acknowledged
/// simplification, not full SAT/swept-AABB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Disk,
    Rect,
}

/// A single particle: position, velocity, mass, extent, and the
/// generation counter used for lazy event invalidation.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// Stable identifier, equal to this particle's position in its store.
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Positive for ordinary particles; `IMMOVABLE_MASS` (`+inf`) marks an
    /// infinite-mass particle that never receives an impulse.
    pub mass: f32,
    /// Disk radius, or the bounding-radius proxy for a `Rect`.
    pub radius: f32,
    pub width: f32,
    pub height: f32,
    pub shape: Shape,
    /// Incremented on every call that changes `vx` or `vy`. Never reset.
    pub gen: u64,
    /// Index into the owning `WallSet` of the last `LineSegment` this
    /// particle rebounded off, or `None`. Used by the anti-stickiness rule
    /// in `bounce_off_segment`.
    pub last_line: Option<usize>,
}

impl PartialEq for Particle {
    /// Two particles are equal iff their indices are equal (spec §3).
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Particle {
    /// Builds a disk particle. `width`/`height` are derived as `2 * radius`
    /// per the data-model invariant.
    pub fn new_disk(index: usize, x: f32, y: f32, vx: f32, vy: f32, mass: f32, radius: f32) -> Self {
        assert!(radius > 0.0, "particle radius must be positive");
        Particle {
            index,
            x,
            y,
            vx,
            vy,
            mass,
            radius,
            width: radius * 2.0,
            height: radius * 2.0,
            shape: Shape::Disk,
            gen: 0,
            last_line: None,
        }
    }

    /// Builds a rectangle particle with its own width/height and a
    /// bounding-radius proxy used by the (disk-approximated) prediction
    /// kernel.
    pub fn new_rect(
        index: usize,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        mass: f32,
        width: f32,
        height: f32,
    ) -> Self {
        assert!(width > 0.0 && height > 0.0, "rect extents must be positive");
        let radius = 0.5 * (width * width + height * height).sqrt();
        Particle {
            index,
            x,
            y,
            vx,
            vy,
            mass,
            radius,
            width,
            height,
            shape: Shape::Rect,
            gen: 0,
            last_line: None,
        }
    }

    /// `true` for an infinite-mass particle: impulse resolution never
    /// changes its velocity.
    pub fn is_immovable(&self) -> bool {
        self.mass.is_infinite()
    }

    /// Advances position by `dt` seconds of ballistic motion. Does not
    /// touch `gen` — integration is not a velocity-changing mutation.
    pub fn integrate(&mut self, dt: f32) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }

    /// Rebounds off a vertical half-plane: negates `vx`.
    pub fn bounce_off_vwall(&mut self) {
        self.vx = -self.vx;
        self.last_line = None;
        self.gen += 1;
    }

    /// Rebounds off a horizontal half-plane: negates `vy`.
    pub fn bounce_off_hwall(&mut self) {
        self.vy = -self.vy;
        self.last_line = None;
        self.gen += 1;
    }

    /// Rebounds off an oriented line segment, applying the anti-stickiness
    /// rule: a second consecutive rebound off the *same* segment
    /// (`wall_index == self.last_line`) is a no-op (spec §4.1).
    pub fn bounce_off_segment(&mut self, wall_index: usize, wall: &Wall) {
        if self.last_line == Some(wall_index) {
            return;
        }
        let angle = match wall {
            Wall::LineSegment { angle, .. } => *angle,
            _ => panic!("bounce_off_segment called with a non-segment wall"),
        };
        let (vx, vy) = crate::geometry::reflect_velocity(self.vx, self.vy, angle);
        self.vx = vx;
        self.vy = vy;
        self.last_line = Some(wall_index);
        self.gen += 1;
    }
}

/// A densely indexed, fixed-size collection of particles created at
/// startup. Particles are never added or removed during a run.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new(particles: Vec<Particle>) -> Self {
        debug_assert!(
            particles.iter().enumerate().all(|(i, p)| p.index == i),
            "ParticleStore requires particle.index == position in the store"
        );
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    /// Live generation counter of a particle, or `None` if the index is
    /// out of range.
    pub fn gen_of(&self, index: usize) -> Option<u64> {
        self.particles.get(index).map(|p| p.gen)
    }

    /// Advances every particle by `dt` seconds of ballistic motion.
    pub fn integrate_all(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.integrate(dt);
        }
    }

    /// Applies an elastic collision between particles `ia` and `ib`,
    /// updating both velocities and generation counters, and clearing
    /// `last_line` on both (any non-segment collision clears the
    /// anti-stickiness state, per spec §4.1).
    ///
    /// If either particle is immovable, only the movable one's velocity
    /// changes (spec §9: "skip impulse update for infinite-mass
    /// parties"). If both are immovable this is a no-op — that
    /// configuration should never be predicted as colliding in practice,
    /// but resolving it safely avoids a division-by-infinity NaN.
    pub fn bounce_off(&mut self, ia: usize, ib: usize) {
        assert_ne!(ia, ib, "a particle cannot collide with itself");
        let (a, b) = (self.particles[ia], self.particles[ib]);

        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let dvx = b.vx - a.vx;
        let dvy = b.vy - a.vy;
        let dvdr = dx * dvx + dy * dvy;
        let dist = a.radius + b.radius;

        let (new_a, new_b) = match (a.is_immovable(), b.is_immovable()) {
            (true, true) => ((a.vx, a.vy), (b.vx, b.vy)),
            (false, true) => {
                let coeff = 2.0 * dvdr / (dist * dist);
                ((a.vx + coeff * dx, a.vy + coeff * dy), (b.vx, b.vy))
            }
            (true, false) => {
                let coeff = 2.0 * dvdr / (dist * dist);
                ((a.vx, a.vy), (b.vx - coeff * dx, b.vy - coeff * dy))
            }
            (false, false) => {
                let j = 2.0 * a.mass * b.mass * dvdr / ((a.mass + b.mass) * dist);
                let fx = j * dx / dist;
                let fy = j * dy / dist;
                (
                    (a.vx + fx / a.mass, a.vy + fy / a.mass),
                    (b.vx - fx / b.mass, b.vy - fy / b.mass),
                )
            }
        };

        let pa = &mut self.particles[ia];
        pa.vx = new_a.0;
        pa.vy = new_a.1;
        pa.last_line = None;
        pa.gen += 1;

        let pb = &mut self.particles[ib];
        pb.vx = new_b.0;
        pb.vy = new_b.1;
        pb.last_line = None;
        pb.gen += 1;
    }

    pub fn bounce_off_vwall(&mut self, index: usize) {
        self.particles[index].bounce_off_vwall();
    }

    pub fn bounce_off_hwall(&mut self, index: usize) {
        self.particles[index].bounce_off_hwall();
    }

    pub fn bounce_off_segment(&mut self, index: usize, wall_index: usize, wall: &Wall) {
        self.particles[index].bounce_off_segment(wall_index, wall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_on_pair() -> ParticleStore {
        ParticleStore::new(vec![
            Particle::new_disk(0, 30.0, 5.0, 10.0, 0.0, 1.0, 5.0),
            Particle::new_disk(1, 40.0, 5.0, -10.0, 0.0, 1.0, 5.0),
        ])
    }

    #[test]
    fn bounce_off_conserves_momentum() {
        let mut store = head_on_pair();
        let before: (f32, f32) = {
            let a = store.get(0).unwrap();
            let b = store.get(1).unwrap();
            (
                a.mass * a.vx + b.mass * b.vx,
                a.mass * a.vy + b.mass * b.vy,
            )
        };
        store.bounce_off(0, 1);
        let after: (f32, f32) = {
            let a = store.get(0).unwrap();
            let b = store.get(1).unwrap();
            (
                a.mass * a.vx + b.mass * b.vx,
                a.mass * a.vy + b.mass * b.vy,
            )
        };
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn bounce_off_conserves_energy() {
        let mut store = head_on_pair();
        let ke = |s: &ParticleStore| -> f32 {
            s.iter()
                .map(|p| 0.5 * p.mass * (p.vx * p.vx + p.vy * p.vy))
                .sum()
        };
        let before = ke(&store);
        store.bounce_off(0, 1);
        let after = ke(&store);
        assert!((before - after).abs() / before < 1e-6);
    }

    #[test]
    fn equal_mass_head_on_swaps_velocities() {
        let mut store = head_on_pair();
        store.bounce_off(0, 1);
        assert!((store.get(0).unwrap().vx - (-10.0)).abs() < 1e-4);
        assert!((store.get(1).unwrap().vx - 10.0).abs() < 1e-4);
    }

    #[test]
    fn gen_is_monotonic_across_velocity_changes() {
        let mut store = head_on_pair();
        let (ga, gb) = (store.gen_of(0).unwrap(), store.gen_of(1).unwrap());
        store.bounce_off(0, 1);
        assert_eq!(store.gen_of(0).unwrap(), ga + 1);
        assert_eq!(store.gen_of(1).unwrap(), gb + 1);
    }

    #[test]
    fn vwall_bounce_is_idempotent_over_two_calls() {
        let mut p = Particle::new_disk(0, 5.0, 5.0, 7.0, 0.0, 1.0, 5.0);
        let original_vx = p.vx;
        p.bounce_off_vwall();
        p.bounce_off_vwall();
        assert_eq!(p.vx, original_vx);
    }

    #[test]
    fn immovable_particle_is_unaffected_by_bounce() {
        let mut store = ParticleStore::new(vec![
            Particle::new_disk(0, 30.0, 5.0, 10.0, 0.0, 1.0, 5.0),
            Particle::new_disk(1, 40.0, 5.0, 0.0, 0.0, IMMOVABLE_MASS, 5.0),
        ]);
        store.bounce_off(0, 1);
        assert_eq!(store.get(1).unwrap().vx, 0.0);
        assert!(store.get(0).unwrap().vx < 0.0);
    }

    #[test]
    fn bounce_off_segment_twice_in_a_row_is_a_no_op() {
        let wall = Wall::segment((60.0, 0.0), (60.0, 100.0));
        let mut p = Particle::new_disk(0, 55.0, 50.0, 10.0, 0.0, 1.0, 5.0);
        p.bounce_off_segment(3, &wall);
        let after_first = (p.vx, p.vy, p.gen);
        p.bounce_off_segment(3, &wall);
        assert_eq!((p.vx, p.vy, p.gen), after_first);
    }

    #[test]
    fn any_other_collision_clears_last_line() {
        let wall = Wall::segment((60.0, 0.0), (60.0, 100.0));
        let mut store = ParticleStore::new(vec![
            Particle::new_disk(0, 55.0, 50.0, 10.0, 0.0, 1.0, 5.0),
            Particle::new_disk(1, 65.0, 50.0, -1.0, 0.0, 1.0, 5.0),
        ]);
        store.bounce_off_segment(0, 3, &wall);
        assert_eq!(store.get(0).unwrap().last_line, Some(3));
        store.bounce_off(0, 1);
        assert_eq!(store.get(0).unwrap().last_line, None);
    }
}
