//! Error types for the parts of the generator that return a `Result`.
//!
//! Per spec §7, only configuration-time problems (a bad mapping string,
//! an impossible worker layout, an unavailable device) are reportable.
//! Everything that happens *during* `generate` — a CPU walk exceeding
//! `MAX_SET_SIZE`, a device allocation or launch failure — is a fatal,
//! process-aborting condition by design and is raised with `panic!`
//! rather than represented here; see [`crate::generator`] and
//! [`crate::diffusion`] for those call sites.

/// Errors returned while validating configuration or constructing a
/// [`crate::generator::Generator`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `gpu_mapping` slot index was `>= total_workers`.
    #[error("gpu mapping slot {slot} is out of range for {total_workers} total workers")]
    SlotOutOfRange {
        /// The offending slot index.
        slot: usize,
        /// The total worker count the mapping was validated against.
        total_workers: usize,
    },

    /// The number of slots named by `gpu_mapping` did not equal `gpu_workers`.
    #[error("gpu mapping names {given} slots but gpu_workers is {expected}")]
    SlotCountMismatch {
        /// Slots actually present in the mapping string.
        given: usize,
        /// Expected count, i.e. `num_gpu_workers`.
        expected: usize,
    },

    /// `gpu_mapping` named the same slot more than once.
    #[error("gpu mapping names slot {slot} more than once")]
    DuplicateSlot {
        /// The slot index named twice.
        slot: usize,
    },

    /// The mapping string contained something other than a non-negative integer.
    #[error("gpu mapping entry {entry:?} is not a non-negative integer")]
    NotAnInteger {
        /// The offending token, verbatim.
        entry: String,
    },

    /// `total_workers == 0`, or `gpu_workers > total_workers`.
    #[error("invalid worker layout: total_workers={total_workers}, gpu_workers={gpu_workers}")]
    InvalidLayout {
        /// `num_cpu_workers + num_gpu_workers`.
        total_workers: usize,
        /// `num_gpu_workers`.
        gpu_workers: usize,
    },

    /// `num_gpu_workers > 0` but the crate was built without the `cuda`
    /// feature, or no CUDA device could be initialized at construction time.
    #[error("gpu workers were requested but no CUDA device is available: {reason}")]
    DeviceUnavailable {
        /// Human-readable reason (feature disabled / driver error / no device).
        reason: String,
    },
}
