//! The fixed-timestep Integrate/Drain/Dispatch main loop.
//!
//! One `Scheduler` owns the live `ParticleStore`, the event min-heap, and
//! the prediction worker pool. Each frame it accumulates real elapsed time
//! into a lag budget, then repeatedly: integrates one tick forward, drains
//! any events that fall due, and dispatches fresh predictions for every
//! particle a resolved collision touched (spec §4.5).

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::{trace, warn};

use crate::constants::{DEFAULT_HORIZON, DEFAULT_WORKER_COUNT, TIME_PER_TICK};
use crate::event::{Event, EventKind};
use crate::particle::ParticleStore;
use crate::wall::WallSet;
use crate::workers::{Completion, ParticleSnapshot, WorkRequest, WorkerPool};

/// Monotonic counter handed out to every dispatched `WorkRequest` so its
/// predicted events sort deterministically against events from other
/// requests issued the same round.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn next_sequence_block(count: u64) -> u64 {
    SEQUENCE.fetch_add(count, AtomicOrdering::Relaxed)
}

/// Owns simulation state and drives it forward in fixed ticks.
pub struct Scheduler {
    particles: ParticleStore,
    walls: Arc<WallSet>,
    heap: BinaryHeap<Event>,
    pool: Option<WorkerPool>,
    completion_rx: Receiver<Completion>,
    sim_time: f32,
    paused: bool,
    last_event: Option<Event>,
    pending_requests: usize,
}

impl Scheduler {
    /// Builds a scheduler over `particles`/`walls`, spawns
    /// `DEFAULT_WORKER_COUNT` prediction workers, and dispatches the
    /// initial round of predictions for every particle.
    pub fn new(particles: ParticleStore, walls: WallSet) -> Self {
        Self::with_worker_count(particles, walls, DEFAULT_WORKER_COUNT)
    }

    /// Same as `new`, with an explicit worker count (used by tests and by
    /// `config.rs` when a document overrides the default).
    pub fn with_worker_count(particles: ParticleStore, walls: WallSet, worker_count: usize) -> Self {
        let walls = Arc::new(walls);
        let (completion_tx, completion_rx) = crossbeam_channel::unbounded();
        let (pool, _request_rx) = WorkerPool::spawn(worker_count.max(1), completion_tx);

        let mut scheduler = Self {
            particles,
            walls,
            heap: BinaryHeap::new(),
            pool: Some(pool),
            completion_rx,
            sim_time: 0.0,
            paused: false,
            last_event: None,
            pending_requests: 0,
        };
        scheduler.dispatch_all(0.0);
        scheduler.drain_dispatch_completions();
        scheduler
    }

    /// Current simulation time, in seconds.
    pub fn sim_time(&self) -> f32 {
        self.sim_time
    }

    /// Read-only access to the live particle store, e.g. for a renderer.
    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    /// Read-only access to the wall set.
    pub fn walls(&self) -> &WallSet {
        &self.walls
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Advances the simulation by `elapsed` seconds of real time, running
    /// as many fixed ticks as necessary to catch up. No-op while paused.
    pub fn advance(&mut self, elapsed: f32) {
        if self.paused {
            return;
        }
        let target = self.sim_time + elapsed;
        while self.sim_time + TIME_PER_TICK <= target {
            self.tick();
        }
    }

    /// One Integrate/Drain/Dispatch step of `TIME_PER_TICK` seconds.
    fn tick(&mut self) {
        let tick_end = self.sim_time + TIME_PER_TICK;
        self.particles.integrate_all(TIME_PER_TICK);

        while let Some(event) = self.heap.peek() {
            if event.time > tick_end {
                break;
            }
            let event = self.heap.pop().unwrap();
            self.process_event(event, tick_end);
        }

        self.sim_time = tick_end;
    }

    fn process_event(&mut self, event: Event, tick_end: f32) {
        if !event.is_valid(&self.particles) {
            trace!(?event.kind, "discarding stale event");
            return;
        }
        if let Some(prev) = &self.last_event {
            if prev.same_collision(&event) {
                trace!(?event.kind, "skipping immediate re-dispatch of the same collision");
                return;
            }
        }

        let touched: Vec<usize> = match event.kind {
            EventKind::ParticleParticle { a, b } => {
                self.particles.bounce_off(a, b);
                vec![a, b]
            }
            EventKind::ParticleWall { particle, wall } => {
                let w = *self.walls.get(wall).expect("event referenced an unknown wall");
                if w.is_segment() {
                    self.particles.bounce_off_segment(particle, wall, &w);
                } else if matches!(w, crate::wall::Wall::VHalfPlane { .. }) {
                    self.particles.bounce_off_vwall(particle);
                } else {
                    self.particles.bounce_off_hwall(particle);
                }
                vec![particle]
            }
        };

        self.last_event = Some(event);
        self.dispatch_for(&touched, tick_end);
        self.drain_dispatch_completions();
    }

    /// Issues a fresh `WorkRequest` for every particle in `indices`.
    fn dispatch_for(&mut self, indices: &[usize], anchor_time: f32) {
        let snapshot = Arc::new(ParticleSnapshot {
            particles: self.particles.iter().copied().collect(),
            walls: Arc::clone(&self.walls),
        });
        let pool = self.pool.as_ref().expect("scheduler pool is only taken down on drop");
        for &i in indices {
            let seq = next_sequence_block(self.particles.len() as u64 + self.walls.len() as u64 + 1);
            pool.submit(WorkRequest {
                particle_index: i,
                sequence_base: seq,
                tick_time: anchor_time,
                horizon: DEFAULT_HORIZON,
                snapshot: Arc::clone(&snapshot),
            });
            self.pending_requests += 1;
        }
    }

    /// Dispatches a prediction request for every live particle. Used at
    /// startup to seed the heap.
    fn dispatch_all(&mut self, anchor_time: f32) {
        let indices: Vec<usize> = (0..self.particles.len()).collect();
        self.dispatch_for(&indices, anchor_time);
    }

    /// Drains the completion channel until every outstanding request this
    /// dispatch round submitted has reported `RequestDone`. Deterministic
    /// at startup because the number of outstanding requests is known.
    fn drain_dispatch_completions(&mut self) {
        while self.pending_requests > 0 {
            match self.completion_rx.recv() {
                Ok(Completion::Event(ev)) => self.heap.push(ev),
                Ok(Completion::RequestDone { .. }) => self.pending_requests -= 1,
                Err(_) => {
                    warn!("prediction worker pool disconnected while draining completions");
                    break;
                }
            }
        }
    }
}

impl Drop for Scheduler {
    /// Drops the request sender and joins every worker thread so a
    /// `Scheduler` never leaks background threads when it goes out of
    /// scope.
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;

    fn two_particle_scheduler() -> Scheduler {
        let particles = ParticleStore::new(vec![
            Particle::new_disk(0, 30.0, 50.0, 10.0, 0.0, 1.0, 5.0),
            Particle::new_disk(1, 70.0, 50.0, -10.0, 0.0, 1.0, 5.0),
        ]);
        let walls = WallSet::with_boundary(100.0, 100.0);
        Scheduler::with_worker_count(particles, walls, 2)
    }

    #[test]
    fn advancing_time_moves_particles() {
        let mut sched = two_particle_scheduler();
        let before_x = sched.particles().get(0).unwrap().x;
        sched.advance(0.05);
        let after_x = sched.particles().get(0).unwrap().x;
        assert!(after_x > before_x);
    }

    #[test]
    fn paused_scheduler_does_not_advance() {
        let mut sched = two_particle_scheduler();
        sched.set_paused(true);
        let before = sched.sim_time();
        sched.advance(1.0);
        assert_eq!(before, sched.sim_time());
    }

    #[test]
    fn head_on_particles_eventually_separate_after_colliding() {
        let mut sched = two_particle_scheduler();
        sched.advance(5.0);
        let a = sched.particles().get(0).unwrap();
        let b = sched.particles().get(1).unwrap();
        assert!(a.vx < 0.0 || b.vx > 0.0);
    }
}
