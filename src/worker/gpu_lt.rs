//! GPU worker for Linear-Threshold: batched device kernel with host
//! overflow fallback (spec §4.4).

use std::sync::atomic::AtomicUsize;
use std::time::Instant;

use rand_chacha::ChaCha12Rng;

use crate::device::constants::{LT_MASK_WORDS, LT_NUM_THREADS};
use crate::diffusion::linear_threshold;
use crate::generator::SlotWriter;
use crate::graph::CsrGraph;
use crate::profiling::{WorkerProfile, WorkerProfileSnapshot};
use crate::worker::claim;

#[cfg(feature = "cuda")]
mod cuda {
    use super::*;
    use crate::device::lt_kernel::{decode_slot, launch_config, LtKernel};
    use crate::device::mirror::DeviceGraphMirror;
    use crate::error::Error;
    use crate::rrr_set::finalize;
    use cudarc::driver::{CudaFunction, CudaStream, LaunchAsync, LaunchConfig};

    /// A GPU worker running the batched LT kernel.
    pub struct GpuLtWorker<'g> {
        graph: &'g CsrGraph,
        mirror: &'g DeviceGraphMirror,
        func: CudaFunction,
        stream: CudaStream,
        device_rng: cudarc::driver::CudaSlice<u64>,
        device_mask: cudarc::driver::CudaSlice<u32>,
        host_mask: Vec<u32>,
        host_rng: ChaCha12Rng,
        profile: WorkerProfile,
        node_count: u32,
    }

    impl<'g> GpuLtWorker<'g> {
        /// Builds a GPU-LT worker. `thread_seeds` must have
        /// `LT_NUM_THREADS` entries, one per device thread (spec §4.6's
        /// "contiguous blocks of `threads_per_gpu_worker`" split of the
        /// master RNG, with `threads_per_gpu_worker = LT_NUM_THREADS`
        /// for this worker kind).
        pub fn new(
            graph: &'g CsrGraph,
            mirror: &'g DeviceGraphMirror,
            kernel: &LtKernel,
            thread_seeds: &[u64],
            host_rng: ChaCha12Rng,
        ) -> Result<Self, Error> {
            assert_eq!(thread_seeds.len(), LT_NUM_THREADS);
            let device = mirror.inner().device.clone();
            let stream = device
                .fork_default_stream()
                .map_err(|e| Error::DeviceUnavailable { reason: format!("fork_default_stream failed: {e}") })?;
            let device_rng = device
                .htod_sync_copy(thread_seeds)
                .map_err(|e| Error::DeviceUnavailable { reason: format!("rng upload failed: {e}") })?;
            let device_mask = device
                .alloc_zeros::<u32>(LT_NUM_THREADS * LT_MASK_WORDS)
                .map_err(|e| Error::DeviceUnavailable { reason: format!("mask alloc failed: {e}") })?;
            Ok(Self {
                graph,
                mirror,
                func: kernel.function().clone(),
                stream,
                device_rng,
                device_mask,
                host_mask: vec![0u32; LT_NUM_THREADS * LT_MASK_WORDS],
                host_rng,
                profile: WorkerProfile::default(),
                node_count: graph.node_count() as u32,
            })
        }

        /// Drains slots from `cursor` until it reaches `theta`, claiming
        /// `LT_NUM_THREADS` slots per kernel launch.
        pub fn svc_loop(&mut self, cursor: &AtomicUsize, theta: usize, out: &SlotWriter) {
            while let Some(range) = claim(cursor, theta, LT_NUM_THREADS) {
                let width = range.len();
                let start = Instant::now();
                let (blocks, block_size) = launch_config(width);
                let cfg = LaunchConfig {
                    grid_dim: (blocks, 1, 1),
                    block_dim: (block_size, 1, 1),
                    shared_mem_bytes: 0,
                };
                let inner = self.mirror.inner();
                // SAFETY: the kernel only reads the graph buffers and only
                // writes the first `width` walks' worth of `device_mask`
                // and `device_rng`, both sized for the full batch.
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
                                &mut self.device_mask,
                                self.node_count,
                                LT_MASK_WORDS as u32,
                                width as u32,
                            ),
                        )
                        .expect("LT kernel launch failed");
                }
                self.stream.synchronize().expect("LT stream sync failed");

                let copy_len = width * LT_MASK_WORDS;
                self.stream
                    .dtoh_sync_copy_into(&self.device_mask, &mut self.host_mask[..copy_len])
                    .expect("LT mask copy-back failed");

                for (i, slot) in range.enumerate() {
                    let slice = &self.host_mask[i * LT_MASK_WORDS..(i + 1) * LT_MASK_WORDS];
                    let mut set = match decode_slot(slice, self.node_count) {
                        Ok(verts) => verts,
                        Err(root) => {
                            self.profile.record_exceedance();
                            linear_threshold::walk(self.graph, root, &mut self.host_rng)
                        }
                    };
                    finalize(&mut set);
                    out.write(slot, set);
                    self.profile.record_walk(start.elapsed());
                }
            }
        }

        /// Snapshots this worker's profiling counters.
        pub fn profile(&self) -> WorkerProfileSnapshot {
            self.profile.snapshot()
        }
    }
}

#[cfg(feature = "cuda")]
pub use cuda::GpuLtWorker;

/// Never-constructed placeholder when the crate is built without the
/// `cuda` feature. [`crate::generator::Generator::new`] rejects
/// `num_gpu_workers > 0` before any value of this type could be created.
#[cfg(not(feature = "cuda"))]
pub struct GpuLtWorker<'g> {
    never: std::convert::Infallible,
    _graph: std::marker::PhantomData<&'g CsrGraph>,
}

#[cfg(not(feature = "cuda"))]
impl<'g> GpuLtWorker<'g> {
    /// Unreachable: see [`GpuLtWorker`]'s type-level docs.
    pub fn svc_loop(&mut self, _cursor: &AtomicUsize, _theta: usize, _out: &SlotWriter) {
        match self.never {}
    }

    /// Unreachable: see [`GpuLtWorker`]'s type-level docs.
    pub fn profile(&self) -> WorkerProfileSnapshot {
        match self.never {}
    }
}
