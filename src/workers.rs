//! Stateless prediction worker pool.
//!
//! Workers never mutate simulation state; each pulls a `WorkRequest`
//! carrying an immutable snapshot, predicts every collision the named
//! particle could have against the rest of that snapshot and the walls,
//! and sends each finite prediction back as a `Completion::Event`. A
//! `Completion::RequestDone` marks the end of one request's predictions so
//! the scheduler can tell "no more events are coming from this dispatch"
//! apart from "no events existed at all" (spec §4.4).

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, trace};

use crate::constants::DEFAULT_HORIZON;
use crate::event::Event;
use crate::geometry::{time_to_hit_particle, time_to_hit_wall};
use crate::particle::Particle;
use crate::wall::WallSet;

/// Immutable, cheaply-clonable view of the world a worker predicts
/// against. Built once per dispatch round and shared via `Arc` so workers
/// never copy particle data more than once.
#[derive(Debug)]
pub struct ParticleSnapshot {
    /// All particles, indexed by `Particle::index`.
    pub particles: Vec<Particle>,
    /// The (immutable for the run's lifetime) wall set.
    pub walls: Arc<WallSet>,
}

/// One unit of prediction work: "predict every collision `particle_index`
/// could have, from `tick_time`, against `snapshot`".
pub struct WorkRequest {
    /// Index of the particle to predict from.
    pub particle_index: usize,
    /// Sequence number used to order the events this request yields in
    /// the heap relative to other requests dispatched the same round.
    pub sequence_base: u64,
    /// Simulation time the prediction is anchored to.
    pub tick_time: f32,
    /// How far into the future to search for a collision.
    pub horizon: f32,
    /// Shared, read-only world state.
    pub snapshot: Arc<ParticleSnapshot>,
}

impl WorkRequest {
    /// Builds a request with the default horizon.
    pub fn new(particle_index: usize, sequence_base: u64, tick_time: f32, snapshot: Arc<ParticleSnapshot>) -> Self {
        Self {
            particle_index,
            sequence_base,
            tick_time,
            horizon: DEFAULT_HORIZON,
            snapshot,
        }
    }
}

/// A message sent back from a worker to the scheduler.
pub enum Completion {
    /// A finite collision was predicted.
    Event(Event),
    /// This request produced no further events; the scheduler can treat
    /// the request as fully processed once it sees this.
    RequestDone { particle_index: usize },
}

/// Predicts every collision particle `particle_index` could have against
/// the rest of `snapshot`, anchored at `tick_time`, within `horizon`.
///
/// Predictions with a negative or already-elapsed `dt` are clamped per
/// spec S4 so an overlapping pair still surfaces near the front of the
/// heap instead of being silently dropped: `t' = max(t - EPSILON, t + dt)`.
pub fn predict_particle(req: &WorkRequest, out: &mut Vec<Event>) {
    use crate::constants::EPSILON;

    let snapshot = &req.snapshot;
    let i = req.particle_index;
    let Some(p) = snapshot.particles.get(i) else {
        return;
    };
    let gen_i = p.gen;
    let mut seq = req.sequence_base;

    for (j, q) in snapshot.particles.iter().enumerate() {
        if j == i {
            continue;
        }
        let dt = time_to_hit_particle(p, q);
        if !dt.is_finite() || dt > req.horizon {
            continue;
        }
        let t = if dt < 0.0 {
            (req.tick_time - EPSILON).max(req.tick_time + dt)
        } else {
            req.tick_time + dt
        };
        out.push(Event::particle_particle(t, i, j, gen_i, q.gen, seq));
        seq += 1;
    }

    for (w, wall) in snapshot.walls.iter() {
        let dt = time_to_hit_wall(p, wall);
        if !dt.is_finite() || dt > req.horizon {
            continue;
        }
        let t = if dt < 0.0 {
            (req.tick_time - EPSILON).max(req.tick_time + dt)
        } else {
            req.tick_time + dt
        };
        out.push(Event::particle_wall(t, i, w, gen_i, seq));
        seq += 1;
    }
}

/// A running pool of prediction worker threads.
///
/// Dropping the pool's request sender causes every worker to exit its
/// receive loop once the channel drains; `WorkerPool::shutdown` does this
/// and joins all threads.
pub struct WorkerPool {
    request_tx: Sender<WorkRequest>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `count` worker threads, each pulling from a shared
    /// `crossbeam_channel` request queue and pushing predictions onto a
    /// shared completion queue.
    pub fn spawn(count: usize, completion_tx: Sender<Completion>) -> (Self, Receiver<WorkRequest>) {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<WorkRequest>();

        let mut handles = Vec::with_capacity(count);
        for id in 0..count {
            let rx = request_rx.clone();
            let tx = completion_tx.clone();
            handles.push(
                thread::Builder::new()
                    .name(format!("predict-worker-{id}"))
                    .spawn(move || worker_loop(id, rx, tx))
                    .expect("failed to spawn prediction worker thread"),
            );
        }

        (
            Self {
                request_tx,
                handles,
            },
            request_rx,
        )
    }

    /// Submits a request to the pool. Any idle worker may pick it up.
    pub fn submit(&self, request: WorkRequest) {
        // An error here means every worker thread has died; the scheduler
        // treats a dead pool as fatal rather than silently dropping work.
        self.request_tx
            .send(request)
            .expect("prediction worker pool has no live receivers");
    }

    /// Drops the request sender and joins every worker thread.
    pub fn shutdown(self) {
        drop(self.request_tx);
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

fn worker_loop(id: usize, request_rx: Receiver<WorkRequest>, completion_tx: Sender<Completion>) {
    debug!(worker = id, "prediction worker started");
    let mut scratch = Vec::new();
    while let Ok(req) = request_rx.recv() {
        let particle_index = req.particle_index;
        scratch.clear();
        predict_particle(&req, &mut scratch);
        trace!(worker = id, particle_index, events = scratch.len(), "predicted");
        for ev in scratch.drain(..) {
            if completion_tx.send(Completion::Event(ev)).is_err() {
                return;
            }
        }
        if completion_tx
            .send(Completion::RequestDone { particle_index })
            .is_err()
        {
            return;
        }
    }
    debug!(worker = id, "prediction worker shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;

    fn snapshot(particles: Vec<Particle>) -> Arc<ParticleSnapshot> {
        Arc::new(ParticleSnapshot {
            particles,
            walls: Arc::new(WallSet::with_boundary(100.0, 100.0)),
        })
    }

    #[test]
    fn predicts_an_approaching_pair() {
        let snap = snapshot(vec![
            Particle::new_disk(0, 30.0, 5.0, 10.0, 0.0, 1.0, 5.0),
            Particle::new_disk(1, 50.0, 5.0, -10.0, 0.0, 1.0, 5.0),
        ]);
        let req = WorkRequest::new(0, 0, 0.0, snap);
        let mut out = Vec::new();
        predict_particle(&req, &mut out);
        assert!(out
            .iter()
            .any(|e| matches!(e.kind, crate::event::EventKind::ParticleParticle { .. })));
    }

    #[test]
    fn skips_self_and_infinite_predictions() {
        let snap = snapshot(vec![Particle::new_disk(0, 10.0, 10.0, 0.0, 0.0, 1.0, 5.0)]);
        let req = WorkRequest::new(0, 0, 0.0, snap);
        let mut out = Vec::new();
        predict_particle(&req, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn worker_pool_round_trips_a_request() {
        let (completion_tx, completion_rx) = crossbeam_channel::unbounded();
        let (pool, _request_rx) = WorkerPool::spawn(2, completion_tx);

        let snap = snapshot(vec![
            Particle::new_disk(0, 10.0, 50.0, 10.0, 0.0, 1.0, 5.0),
            Particle::new_disk(1, 50.0, 50.0, 0.0, 0.0, 1.0, 5.0),
        ]);
        pool.submit(WorkRequest::new(0, 0, 0.0, snap));

        let mut saw_request_done = false;
        for _ in 0..10 {
            match completion_rx.recv_timeout(std::time::Duration::from_secs(1)) {
                Ok(Completion::RequestDone { particle_index }) => {
                    assert_eq!(particle_index, 0);
                    saw_request_done = true;
                    break;
                }
                Ok(Completion::Event(_)) => continue,
                Err(_) => break,
            }
        }
        assert!(saw_request_done);
        pool.shutdown();
    }
}
