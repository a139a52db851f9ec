//! The output type of a single random walk: a sorted, deduplicated RRR set.

use crate::MAX_SET_SIZE;

/// A Reverse Reachable set: a sorted sequence of distinct vertex ids.
pub type RrrSet = Vec<u32>;

/// Sorts `verts` ascending and removes duplicates in place, matching the
/// "every RRR set is sorted on return and contains no duplicates"
/// invariant (spec §3).
pub fn finalize(verts: &mut Vec<u32>) {
    verts.sort_unstable();
    verts.dedup();
}

/// Asserts the CPU-side set-size invariant from spec §3/§7: a host walk
/// must never carry more than `MAX_SET_SIZE` distinct vertices. Exceeding
/// it is a data-integrity error and is fatal, not recoverable — the walk
/// should not reach this size under the intended inputs.
///
/// # Panics
/// Panics (intentionally process-fatal, per spec §7) if `verts.len() >
/// MAX_SET_SIZE`.
pub fn assert_within_host_capacity(verts: &[u32]) {
    assert!(
        verts.len() <= MAX_SET_SIZE,
        "RRR set exceeded MAX_SET_SIZE ({MAX_SET_SIZE}); walk produced {} distinct vertices, \
         which indicates a data-integrity error in the input graph or diffusion parameters",
        verts.len()
    );
}
