//! The GPU device path: device graph mirror, batched LT kernel, and IC
//! BFS solver (spec §4, §4.4, §4.5).
//!
//! Gated behind the `cuda` feature (built on `cudarc`'s CUDA driver +
//! NVRTC bindings). Without the feature, [`mirror::DeviceGraphMirror`]
//! still exists as a type but its constructor always returns
//! [`crate::error::Error::DeviceUnavailable`] — this lets
//! [`crate::generator::Generator`] and [`crate::config::Config`] validate
//! a `num_gpu_workers > 0` request uniformly regardless of how the crate
//! was built, rather than needing two code paths at the call site.

pub mod ic_solver;
pub mod lt_kernel;
pub mod mirror;

/// Fixed GPU worker tuning constants (spec §4.4/§4.5/§6).
pub mod constants {
    /// CUDA block size used by the LT batched kernel.
    pub const LT_BLOCK_SIZE: u32 = 256;
    /// Number of concurrent LT walks (device threads) per kernel launch,
    /// and therefore the GPU-LT worker's claim size.
    pub const LT_NUM_THREADS: usize = 32_768;
    /// Fixed per-walk mask width, in vertex ids, for the LT device buffer.
    /// A walk that would visit more than this many distinct vertices
    /// overflows and is redone on the host (spec §4.1, §4.4, §7).
    pub const LT_MASK_WORDS: usize = 8;
    /// Host-bound claim size for GPU-IC workers (walks are not fused on
    /// device, spec §4.5).
    pub const IC_CLAIM_SIZE: usize = 32;
}
