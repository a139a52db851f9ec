//! GPU worker for Independent-Cascade: one device BFS solve per walk
//! (spec §4.5).

use std::sync::atomic::AtomicUsize;
use std::time::Instant;

use rand::Rng;
use rand_chacha::ChaCha12Rng;

use crate::device::constants::IC_CLAIM_SIZE;
use crate::generator::SlotWriter;
use crate::graph::CsrGraph;
use crate::profiling::{WorkerProfile, WorkerProfileSnapshot};
use crate::worker::claim;

#[cfg(feature = "cuda")]
mod cuda {
    use super::*;
    use crate::device::ic_solver::{decode_predecessors, IcKernel};
    use crate::device::mirror::DeviceGraphMirror;
    use crate::error::Error;
    use crate::rrr_set::finalize;
    use cudarc::driver::{CudaFunction, CudaStream, LaunchAsync, LaunchConfig};

    const BLOCK_SIZE: u32 = 256;

    /// A GPU worker running one full-frontier BFS solve per claimed root.
    pub struct GpuIcWorker<'g> {
        mirror: &'g DeviceGraphMirror,
        func: CudaFunction,
        stream: CudaStream,
        device_rng: cudarc::driver::CudaSlice<u64>,
        device_pred: cudarc::driver::CudaSlice<i32>,
        device_changed: cudarc::driver::CudaSlice<u32>,
        host_pred: Vec<i32>,
        host_rng: ChaCha12Rng,
        profile: WorkerProfile,
        node_count: u32,
    }

    impl<'g> GpuIcWorker<'g> {
        /// Builds a GPU-IC worker. `thread_seeds` has one entry per
        /// vertex (spec §4.5: RNG state is indexed by vertex id, one
        /// stream per vertex, shared across every walk this worker runs).
        pub fn new(
            _graph: &'g CsrGraph,
            mirror: &'g DeviceGraphMirror,
            kernel: &IcKernel,
            thread_seeds: &[u64],
            host_rng: ChaCha12Rng,
        ) -> Result<Self, Error> {
            let node_count = mirror.node_count() as u32;
            assert_eq!(thread_seeds.len(), node_count as usize);
            let device = mirror.inner().device.clone();
            let stream = device
                .fork_default_stream()
                .map_err(|e| Error::DeviceUnavailable { reason: format!("fork_default_stream failed: {e}") })?;
            let device_rng = device
                .htod_sync_copy(thread_seeds)
                .map_err(|e| Error::DeviceUnavailable { reason: format!("rng upload failed: {e}") })?;
            let device_pred = device
                .alloc_zeros::<i32>(node_count as usize)
                .map_err(|e| Error::DeviceUnavailable { reason: format!("pred alloc failed: {e}") })?;
            let device_changed = device
                .alloc_zeros::<u32>(1)
                .map_err(|e| Error::DeviceUnavailable { reason: format!("changed-flag alloc failed: {e}") })?;
            Ok(Self {
                mirror,
                func: kernel.function().clone(),
                stream,
                device_rng,
                device_pred,
                device_changed,
                host_pred: vec![-1; node_count as usize],
                host_rng,
                profile: WorkerProfile::default(),
                node_count,
            })
        }

        /// Drains slots from `cursor` one at a time, running one full
        /// BFS solve (iterated to convergence) per slot.
        pub fn svc_loop(&mut self, cursor: &AtomicUsize, theta: usize, out: &SlotWriter) {
            while let Some(range) = claim(cursor, theta, IC_CLAIM_SIZE) {
                for slot in range {
                    let start = Instant::now();
                    let root = self.host_rng.gen_range(0..self.node_count);
                    let set = self.solve(root);
                    self.profile.record_walk(start.elapsed());
                    out.write(slot, set);
                }
            }
        }

        fn solve(&mut self, root: u32) -> crate::rrr_set::RrrSet {
            self.host_pred.fill(-1);
            self.host_pred[root as usize] = root as i32;
            self.stream
                .htod_sync_copy_into(&self.host_pred, &mut self.device_pred)
                .expect("IC pred upload failed");

            let blocks = self.node_count.div_ceil(BLOCK_SIZE);
            let cfg = LaunchConfig { grid_dim: (blocks, 1, 1), block_dim: (BLOCK_SIZE, 1, 1), shared_mem_bytes: 0 };

            for _ in 0..self.node_count {
                self.stream
                    .htod_sync_copy_into(&[0u32], &mut self.device_changed)
                    .expect("IC changed-flag reset failed");
                let inner = self.mirror.inner();
                // SAFETY: offsets/edges/weights are read-only graph
                // buffers sized by the mirror; rng/pred/changed are this
                // worker's own node_count/1-sized buffers.
                unsafe {
                    self.func
                        .clone()
                        .launch_on_stream(
                            &self.stream,
                            cfg,
                            (
                                &inner.offsets,
                                &inner.edges,
                                &inner.weights,
                                &mut self.device_rng,
                                &mut self.device_pred,
                                self.node_count,
                                &mut self.device_changed,
                            ),
                        )
                        .expect("IC kernel launch failed");
                }
                self.stream.synchronize().expect("IC stream sync failed");

                let mut changed = [0u32; 1];
                self.stream
                    .dtoh_sync_copy_into(&self.device_changed, &mut changed)
                    .expect("IC changed-flag copy-back failed");
                if changed[0] == 0 {
                    break;
                }
            }

            self.stream
                .dtoh_sync_copy_into(&self.device_pred, &mut self.host_pred)
                .expect("IC pred copy-back failed");
            let mut set = decode_predecessors(self.host_pred.clone(), root);
            finalize(&mut set);
            set
        }

        /// Snapshots this worker's profiling counters.
        pub fn profile(&self) -> WorkerProfileSnapshot {
            self.profile.snapshot()
        }
    }
}

#[cfg(feature = "cuda")]
pub use cuda::GpuIcWorker;

/// Never-constructed placeholder when the crate is built without the
/// `cuda` feature; see [`super::gpu_lt::GpuLtWorker`] for the same pattern.
#[cfg(not(feature = "cuda"))]
pub struct GpuIcWorker<'g> {
    never: std::convert::Infallible,
    _graph: std::marker::PhantomData<&'g CsrGraph>,
}

#[cfg(not(feature = "cuda"))]
impl<'g> GpuIcWorker<'g> {
    /// Unreachable: see [`GpuIcWorker`]'s type-level docs.
    pub fn svc_loop(&mut self, _cursor: &AtomicUsize, _theta: usize, _out: &SlotWriter) {
        match self.never {}
    }

    /// Unreachable: see [`GpuIcWorker`]'s type-level docs.
    pub fn profile(&self) -> WorkerProfileSnapshot {
        match self.never {}
    }
}
