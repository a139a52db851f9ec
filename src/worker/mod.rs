//! Worker roles that drain output slots from the shared cursor (spec §2, §9).
//!
//! The role has one operation, `svc_loop`, and two shapes — CPU and GPU.
//! Per spec §9's "polymorphism without inheritance trees" note, this is
//! realized as a closed `enum` matched inside one `svc_loop` rather than
//! a trait-object hierarchy: the dispatch mechanism is an implementation
//! detail, the interchangeable-at-the-mapping-table contract is not.

pub mod cpu;
pub mod gpu_ic;
pub mod gpu_lt;

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::generator::SlotWriter;

/// One worker slot: either a CPU worker or one of the two GPU worker
/// shapes (LT batched-kernel, IC BFS-solver).
pub enum AnyWorker<'g> {
    /// Drains slots with the host diffusion walk.
    Cpu(cpu::CpuWorker<'g>),
    /// Drains slots with the batched LT device kernel, falling back to
    /// the host on overflow.
    GpuLt(gpu_lt::GpuLtWorker<'g>),
    /// Drains slots with one device BFS traversal per walk.
    GpuIc(gpu_ic::GpuIcWorker<'g>),
}

impl<'g> AnyWorker<'g> {
    /// Runs this worker's service loop until the cursor reaches `theta`.
    ///
    /// ```text
    /// while (offset = cursor.fetch_add(batch)) < theta:
    ///     fill out[offset .. min(offset + batch, theta)) with walks
    /// ```
    /// matching spec §4.3/§4.4/§4.5's shared claim discipline. The batch
    /// width is per-worker-kind (spec §6): 32 for CPU and GPU-IC,
    /// `LT_NUM_THREADS` for GPU-LT.
    pub fn svc_loop(&mut self, cursor: &AtomicUsize, theta: usize, out: &SlotWriter) {
        match self {
            AnyWorker::Cpu(w) => w.svc_loop(cursor, theta, out),
            AnyWorker::GpuLt(w) => w.svc_loop(cursor, theta, out),
            AnyWorker::GpuIc(w) => w.svc_loop(cursor, theta, out),
        }
    }
}

/// Claims the next contiguous range of up to `batch` slots, truncated at
/// `theta`. Returns `None` once the cursor has reached or passed `theta`
/// (spec §3's "the cursor never exceeds θ + max_claim" invariant: a claim
/// beyond θ is truncated to empty and discarded by the caller).
#[inline]
pub(crate) fn claim(cursor: &AtomicUsize, theta: usize, batch: usize) -> Option<std::ops::Range<usize>> {
    let offset = cursor.fetch_add(batch, Ordering::Relaxed);
    if offset >= theta {
        return None;
    }
    Some(offset..theta.min(offset + batch))
}
