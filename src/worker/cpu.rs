//! CPU worker: drains output slots using the host diffusion walk (spec §4.3).

use std::sync::atomic::AtomicUsize;
use std::time::Instant;

use rand::Rng;
use rand_chacha::ChaCha12Rng;

use crate::diffusion::{independent_cascade, linear_threshold, DiffusionModel};
use crate::generator::SlotWriter;
use crate::graph::CsrGraph;
use crate::profiling::{WorkerProfile, WorkerProfileSnapshot};
use crate::worker::claim;

/// Internal claim size for CPU workers (spec §4.3, §6).
pub const CPU_BATCH_SIZE: usize = 32;

/// A CPU worker: owns its RNG sub-stream and runs the host walk for
/// every slot it claims.
pub struct CpuWorker<'g> {
    graph: &'g CsrGraph,
    model: DiffusionModel,
    rng: ChaCha12Rng,
    profile: WorkerProfile,
}

impl<'g> CpuWorker<'g> {
    /// Builds a CPU worker over `graph` running `model`, seeded with its
    /// own split RNG stream.
    pub fn new(graph: &'g CsrGraph, model: DiffusionModel, rng: ChaCha12Rng) -> Self {
        Self { graph, model, rng, profile: WorkerProfile::default() }
    }

    /// Drains slots from `cursor` until it reaches `theta`.
    pub fn svc_loop(&mut self, cursor: &AtomicUsize, theta: usize, out: &SlotWriter) {
        while let Some(range) = claim(cursor, theta, CPU_BATCH_SIZE) {
            for slot in range {
                let start = Instant::now();
                let root = self.rng.gen_range(0..self.graph.node_count() as u32);
                let set = match self.model {
                    DiffusionModel::LinearThreshold => linear_threshold::walk(self.graph, root, &mut self.rng),
                    DiffusionModel::IndependentCascade => {
                        independent_cascade::walk(self.graph, root, &mut self.rng)
                    }
                };
                self.profile.record_walk(start.elapsed());
                out.write(slot, set);
            }
        }
    }

    /// Snapshots this worker's profiling counters.
    pub fn profile(&self) -> WorkerProfileSnapshot {
        self.profile.snapshot()
    }
}
