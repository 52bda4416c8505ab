//! Predicted collision events and the min-heap that orders them.
//!
//! `Event` is a plain value; staleness is detected lazily by comparing the
//! generation captured at prediction time against the `ParticleStore`'s
//! live generation for the same particle (spec §4.2/§4.3). The heap never
//! removes stale entries eagerly — `Scheduler::drain` pops and discards them
//! as it finds them.

use std::cmp::Ordering;

use crate::particle::ParticleStore;

/// What the two sides of an `Event` refer to.
#[derive(Debug, Clone, Copy)]
pub enum EventKind {
    /// A predicted collision between two particles.
    ParticleParticle { a: usize, b: usize },
    /// A predicted collision between a particle and a wall.
    ParticleWall { particle: usize, wall: usize },
}

/// A single predicted collision, carrying the generation(s) of the
/// particle(s) involved at prediction time.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    /// Simulation time at which the collision is predicted to occur.
    pub time: f32,
    /// What is colliding.
    pub kind: EventKind,
    /// Generation of the first (or only) particle when this event was
    /// predicted.
    pub gen_a: u64,
    /// Generation of the second particle when this event was predicted,
    /// absent for `ParticleWall` events.
    pub gen_b: Option<u64>,
    /// Monotonic insertion sequence, used to break exact time ties with
    /// FIFO ordering so replay of a fixed input is deterministic.
    pub sequence: u64,
}

impl Event {
    /// Builds a particle-particle event.
    pub fn particle_particle(time: f32, a: usize, b: usize, gen_a: u64, gen_b: u64, sequence: u64) -> Self {
        Self {
            time,
            kind: EventKind::ParticleParticle { a, b },
            gen_a,
            gen_b: Some(gen_b),
            sequence,
        }
    }

    /// Builds a particle-wall event.
    pub fn particle_wall(time: f32, particle: usize, wall: usize, gen: u64, sequence: u64) -> Self {
        Self {
            time,
            kind: EventKind::ParticleWall { particle, wall },
            gen_a: gen,
            gen_b: None,
            sequence,
        }
    }

    /// An event is valid if every particle it references still has the
    /// generation captured when it was predicted. A stale event means at
    /// least one of its particles has collided with something else since
    /// the prediction was made, invalidating the prediction.
    pub fn is_valid(&self, store: &ParticleStore) -> bool {
        match self.kind {
            EventKind::ParticleParticle { a, b } => {
                store.gen_of(a) == Some(self.gen_a) && store.gen_of(b) == self.gen_b
            }
            EventKind::ParticleWall { particle, .. } => store.gen_of(particle) == Some(self.gen_a),
        }
    }

    /// Two events are considered the same dispatched collision if they
    /// share a kind and an (approximately) equal time. Used by the
    /// scheduler to avoid re-dispatching the event it just resolved, which
    /// would otherwise immediately re-fire from floating point residue.
    pub fn same_collision(&self, other: &Event) -> bool {
        self.kind == other.kind && (self.time - other.time).abs() < 1e-6
    }
}

impl PartialEq for EventKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                EventKind::ParticleParticle { a: a1, b: b1 },
                EventKind::ParticleParticle { a: a2, b: b2 },
            ) => (a1, b1) == (a2, b2) || (a1, b1) == (b2, a2),
            (
                EventKind::ParticleWall { particle: p1, wall: w1 },
                EventKind::ParticleWall { particle: p2, wall: w2 },
            ) => p1 == p2 && w1 == w2,
            _ => false,
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}
impl Eq for Event {}

/// Ordered so a `BinaryHeap<Event>` behaves as a min-heap on `time`,
/// ties broken by `sequence` (earlier insertion first).
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .partial_cmp(&self.time)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{Particle, ParticleStore};

    fn store_of(gens: &[u64]) -> ParticleStore {
        let particles = gens
            .iter()
            .enumerate()
            .map(|(i, _)| Particle::new_disk(i, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0))
            .collect::<Vec<_>>();
        let mut store = ParticleStore::new(particles);
        for (i, &g) in gens.iter().enumerate() {
            for _ in 0..g {
                store.bounce_off_vwall(i);
            }
        }
        store
    }

    #[test]
    fn binary_heap_pops_earliest_time_first() {
        use std::collections::BinaryHeap;
        let mut heap = BinaryHeap::new();
        heap.push(Event::particle_wall(5.0, 0, 0, 0, 0));
        heap.push(Event::particle_wall(1.0, 1, 0, 0, 1));
        heap.push(Event::particle_wall(3.0, 2, 0, 0, 2));
        assert_eq!(heap.pop().unwrap().time, 1.0);
        assert_eq!(heap.pop().unwrap().time, 3.0);
        assert_eq!(heap.pop().unwrap().time, 5.0);
    }

    #[test]
    fn equal_time_breaks_tie_by_sequence() {
        use std::collections::BinaryHeap;
        let mut heap = BinaryHeap::new();
        heap.push(Event::particle_wall(1.0, 0, 0, 0, 7));
        heap.push(Event::particle_wall(1.0, 1, 0, 0, 2));
        assert_eq!(heap.pop().unwrap().sequence, 2);
    }

    #[test]
    fn event_is_valid_when_generations_match() {
        let store = store_of(&[0, 0]);
        let ev = Event::particle_particle(1.0, 0, 1, 0, 0, 0);
        assert!(ev.is_valid(&store));
    }

    #[test]
    fn event_is_stale_after_either_side_collides_again() {
        let store = store_of(&[1, 0]);
        let ev = Event::particle_particle(1.0, 0, 1, 0, 0, 0);
        assert!(!ev.is_valid(&store));
    }

    #[test]
    fn wall_event_only_checks_the_particle_side() {
        let store = store_of(&[0]);
        let ev = Event::particle_wall(1.0, 0, 3, 0, 0);
        assert!(ev.is_valid(&store));
    }

    #[test]
    fn particle_particle_kind_equality_is_order_independent() {
        let k1 = EventKind::ParticleParticle { a: 1, b: 2 };
        let k2 = EventKind::ParticleParticle { a: 2, b: 1 };
        assert_eq!(k1, k2);
    }

    #[test]
    fn same_collision_requires_matching_kind_and_close_time() {
        let e1 = Event::particle_particle(10.0, 0, 1, 0, 0, 0);
        let e2 = Event::particle_particle(10.0000001, 1, 0, 0, 0, 1);
        assert!(e1.same_collision(&e2));
        let e3 = Event::particle_particle(11.0, 0, 1, 0, 0, 2);
        assert!(!e1.same_collision(&e3));
    }
}
