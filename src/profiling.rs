//! Optional per-worker profiling counters (spec §2, §6).
//!
//! Collected unconditionally (the cost is a handful of relaxed atomic
//! increments) and folded into a [`crate::generator::GenerationReport`]
//! at the end of a `generate` call. What the *outer* influence-maximization
//! loop does with these numbers is out of scope; the counters themselves
//! are not.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

/// Per-worker counters, one instance owned by each worker for its whole
/// lifetime.
#[derive(Default)]
pub struct WorkerProfile {
    walks: CachePadded<AtomicU64>,
    nanos: CachePadded<AtomicU64>,
    exceedances: CachePadded<AtomicU64>,
}

impl WorkerProfile {
    /// Records one completed walk and the wall-time it took.
    #[inline]
    pub fn record_walk(&self, elapsed: std::time::Duration) {
        self.walks.fetch_add(1, Ordering::Relaxed);
        self.nanos.fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Records one GPU-LT overflow recovered on the host (spec §7).
    #[inline]
    pub fn record_exceedance(&self) {
        self.exceedances.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshots the counters into a plain, `Send`-able summary.
    pub fn snapshot(&self) -> WorkerProfileSnapshot {
        WorkerProfileSnapshot {
            walks: self.walks.load(Ordering::Relaxed),
            nanos: self.nanos.load(Ordering::Relaxed),
            exceedances: self.exceedances.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of a [`WorkerProfile`], returned from `generate`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerProfileSnapshot {
    /// Total walks this worker produced (including host fallbacks).
    pub walks: u64,
    /// Total nanoseconds spent running walks.
    pub nanos: u64,
    /// Total GPU-LT overflow fallbacks this worker redid on the host.
    pub exceedances: u64,
}
