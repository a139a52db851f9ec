//! The streaming generator: owns the graph, the optional device mirror,
//! and the worker layout, and drives one `generate` call end-to-end
//! (spec §4.6).

use std::sync::atomic::AtomicUsize;

use crossbeam_utils::CachePadded;
use tracing::{debug, info, info_span};

use crate::config::Config;
use crate::device::mirror::DeviceGraphMirror;
use crate::error::Error;
use crate::graph::CsrGraph;
use crate::mapping::layout_from_slots;
use crate::profiling::WorkerProfileSnapshot;
use crate::rng::MasterRng;
use crate::rrr_set::RrrSet;
use crate::worker::cpu::CpuWorker;
use crate::worker::AnyWorker;

/// A raw-pointer-plus-length wrapper giving worker threads write access
/// to disjoint slots of the shared output vector without a lock.
///
/// Soundness does not come from the type itself — `write` never checks
/// that an index hasn't already been written — but from every caller
/// claiming indices through the single atomic cursor in
/// [`crate::worker::claim`], which hands out each index in `0..theta`
/// exactly once across the whole worker pool.
pub(crate) struct SlotWriter {
    ptr: *mut RrrSet,
    len: usize,
}

// SAFETY: every write lands at a distinct index (guaranteed by the
// cursor, not by this type), so concurrent `write` calls from different
// threads never alias.
unsafe impl Send for SlotWriter {}
unsafe impl Sync for SlotWriter {}

impl SlotWriter {
    fn new(slots: &mut [RrrSet]) -> Self {
        Self { ptr: slots.as_mut_ptr(), len: slots.len() }
    }

    /// Writes `value` into slot `index`, which must not be written by
    /// any other call for the lifetime of this `SlotWriter`.
    pub(crate) fn write(&self, index: usize, value: RrrSet) {
        debug_assert!(index < self.len, "slot {index} out of bounds for {} slots", self.len);
        // SAFETY: `index < self.len` (checked above in debug builds, and
        // guaranteed by construction from `generate`'s `theta`-sized
        // vector); disjointness across threads is the cursor's invariant.
        unsafe { self.ptr.add(index).write(value) };
    }
}

/// Per-worker profiling folded over an entire `generate` call (spec §2, §6).
#[derive(Clone, Debug, Default)]
pub struct GenerationReport {
    /// One snapshot per worker slot, in slot order.
    pub per_worker: Vec<WorkerProfileSnapshot>,
}

impl GenerationReport {
    /// Total walks across every worker, including host-side GPU-LT
    /// overflow recoveries.
    #[must_use]
    pub fn total_walks(&self) -> u64 {
        self.per_worker.iter().map(|p| p.walks).sum()
    }

    /// Total GPU-LT overflow recoveries across every worker.
    #[must_use]
    pub fn total_exceedances(&self) -> u64 {
        self.per_worker.iter().map(|p| p.exceedances).sum()
    }
}

#[cfg(feature = "cuda")]
struct Kernels {
    lt: crate::device::lt_kernel::LtKernel,
    ic: crate::device::ic_solver::IcKernel,
}

/// Owns the graph and (if any GPU workers were requested) the device
/// mirror for the lifetime of however many `generate` calls are made.
/// Device resources are torn down on `Drop` — the idiomatic replacement
/// for an explicit `destroy()` method.
pub struct Generator {
    graph: CsrGraph,
    config: Config,
    layout: Vec<bool>,
    master_rng: MasterRng,
    mirror: Option<DeviceGraphMirror>,
    #[cfg(feature = "cuda")]
    kernels: Option<Kernels>,
}

impl Generator {
    /// Builds a generator over `graph` with the given `config`.
    ///
    /// Uploads the graph to the device once, up front, if
    /// `config.num_gpu_workers > 0` (spec §3's "built on construction
    /// when any GPU worker exists").
    ///
    /// # Errors
    /// Returns [`Error::DeviceUnavailable`] if GPU workers were
    /// requested but no device could be initialized (or the crate was
    /// built without the `cuda` feature).
    pub fn new(graph: CsrGraph, config: Config) -> Result<Self, Error> {
        let total = config.total_workers();
        if total == 0 {
            return Err(Error::InvalidLayout { total_workers: 0, gpu_workers: config.num_gpu_workers });
        }
        let layout = layout_from_slots(total, config.num_cpu_workers, &config.gpu_slots);

        let mirror = if config.num_gpu_workers > 0 {
            info!(num_gpu_workers = config.num_gpu_workers, "uploading graph to device");
            Some(DeviceGraphMirror::upload(&graph)?)
        } else {
            None
        };

        #[cfg(feature = "cuda")]
        let kernels = if let Some(m) = &mirror {
            let device = m.inner().device.clone();
            Some(Kernels {
                lt: crate::device::lt_kernel::LtKernel::compile(&device)?,
                ic: crate::device::ic_solver::IcKernel::compile(&device)?,
            })
        } else {
            None
        };

        Ok(Self {
            graph,
            master_rng: MasterRng::new(config.master_seed),
            config,
            layout,
            mirror,
            #[cfg(feature = "cuda")]
            kernels,
        })
    }

    /// Generates `theta` RRR sets, fanning the work out across every
    /// configured worker slot and blocking until all `theta` slots are
    /// filled (spec §4.6, §5).
    #[must_use]
    pub fn generate(&self, theta: usize) -> Vec<RrrSet> {
        self.generate_with_report(theta).0
    }

    /// Same as [`Generator::generate`], but also returns the folded
    /// per-worker profiling counters.
    #[must_use]
    pub fn generate_with_report(&self, theta: usize) -> (Vec<RrrSet>, GenerationReport) {
        let span = info_span!("generate", theta, total_workers = self.layout.len());
        let _guard = span.enter();

        let mut slots: Vec<RrrSet> = vec![RrrSet::new(); theta];
        let writer = SlotWriter::new(&mut slots);
        let cursor = CachePadded::new(AtomicUsize::new(0));
        let total = self.layout.len() as u64;

        let snapshots = std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .layout
                .iter()
                .enumerate()
                .map(|(slot, &is_gpu)| {
                    let mut worker = self.build_worker(slot, total, is_gpu);
                    let cursor = &cursor;
                    let writer = &writer;
                    scope.spawn(move || {
                        worker.svc_loop(cursor, theta, writer);
                        debug!(slot, "worker drained");
                        worker.profile()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("worker thread panicked")).collect::<Vec<_>>()
        });

        debug_assert!(slots.len() == theta, "every slot must have been written exactly once");
        (slots, GenerationReport { per_worker: snapshots })
    }

    fn build_worker(&self, slot: usize, total: u64, is_gpu: bool) -> AnyWorker<'_> {
        if !is_gpu {
            let rng = self.master_rng.split(total, slot as u64);
            return AnyWorker::Cpu(CpuWorker::new(&self.graph, self.config.diffusion_model, rng));
        }
        self.build_gpu_worker(slot, total)
    }

    #[cfg(feature = "cuda")]
    fn build_gpu_worker(&self, slot: usize, total: u64) -> AnyWorker<'_> {
        use crate::device::constants::LT_NUM_THREADS;
        use crate::diffusion::DiffusionModel;
        use crate::worker::gpu_ic::GpuIcWorker;
        use crate::worker::gpu_lt::GpuLtWorker;

        let mirror = self.mirror.as_ref().expect("device mirror present when num_gpu_workers > 0");
        let kernels = self.kernels.as_ref().expect("kernels compiled when num_gpu_workers > 0");
        let host_rng = self.master_rng.split(total, slot as u64);

        match self.config.diffusion_model {
            DiffusionModel::LinearThreshold => {
                let thread_seeds: Vec<u64> = (0..LT_NUM_THREADS as u64)
                    .map(|i| device_thread_seed(&self.master_rng, total, slot as u64, i))
                    .collect();
                let worker = GpuLtWorker::new(&self.graph, mirror, &kernels.lt, &thread_seeds, host_rng)
                    .expect("GPU-LT worker construction");
                AnyWorker::GpuLt(worker)
            }
            DiffusionModel::IndependentCascade => {
                let node_count = self.graph.node_count() as u64;
                let thread_seeds: Vec<u64> = (0..node_count)
                    .map(|i| device_thread_seed(&self.master_rng, total, slot as u64, i))
                    .collect();
                let worker = GpuIcWorker::new(&self.graph, mirror, &kernels.ic, &thread_seeds, host_rng)
                    .expect("GPU-IC worker construction");
                AnyWorker::GpuIc(worker)
            }
        }
    }

    #[cfg(not(feature = "cuda"))]
    fn build_gpu_worker(&self, _slot: usize, _total: u64) -> AnyWorker<'_> {
        unreachable!("Generator::new rejects num_gpu_workers > 0 without the cuda feature")
    }
}

/// Derives one device-thread seed. `thread` indexes the per-device-thread
/// stream within worker `slot`'s own share of the master RNG (spec §4.6's
/// "contiguous blocks of per-thread streams" split, one level below the
/// per-worker `(total, index)` split used for host-side streams).
#[cfg(feature = "cuda")]
fn device_thread_seed(master: &MasterRng, total: u64, slot: u64, thread: u64) -> u64 {
    use rand::RngCore;
    let mut stream = master.split(total * 1_000_003, slot * 1_000_003 + thread % 1_000_003);
    stream.next_u64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diffusion::DiffusionModel;

    fn chain_graph() -> CsrGraph {
        CsrGraph::from_edges(5, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)])
    }

    #[test]
    fn generate_fills_every_slot() {
        let config = Config::builder()
            .num_cpu_workers(3)
            .master_seed(1)
            .diffusion_model(DiffusionModel::LinearThreshold)
            .build()
            .unwrap();
        let generator = Generator::new(chain_graph(), config).unwrap();
        let sets = generator.generate(50);
        assert_eq!(sets.len(), 50);
        for set in &sets {
            assert!(!set.is_empty());
            let mut sorted = set.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(&sorted, set, "every set must already be sorted and deduplicated");
        }
    }

    #[test]
    fn generate_is_deterministic_for_fixed_layout_and_seed() {
        // Single worker: the claim order between independent runs cannot
        // vary, so the per-slot stream-to-index pairing is fixed and the
        // whole output vector must match exactly.
        let config = || {
            Config::builder()
                .num_cpu_workers(1)
                .master_seed(7)
                .diffusion_model(DiffusionModel::IndependentCascade)
                .build()
                .unwrap()
        };
        let a = Generator::new(chain_graph(), config()).unwrap().generate(20);
        let b = Generator::new(chain_graph(), config()).unwrap().generate(20);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_total_workers_is_rejected() {
        let config = Config { num_cpu_workers: 0, num_gpu_workers: 0, ..zero_config() };
        let err = Generator::new(chain_graph(), config).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { .. }));
    }

    fn zero_config() -> Config {
        Config::builder().num_cpu_workers(1).build().unwrap()
    }
}
