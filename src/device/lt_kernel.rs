//! Batched Linear-Threshold device kernel (spec §4.1, §4.4).
//!
//! One walk per device thread, `batch_size` threads active within a
//! launch of `max_blocks × block_size` threads. Each thread writes a
//! fixed-width `mask_words_`-vertex slot; sentinel `node_count` marks
//! end-of-set. If slot 0 is still the sentinel once the walk halts, the
//! walk **overflowed**: slot 1 holds the original root and the host must
//! redo the walk (see [`crate::worker::gpu_lt`]).

use crate::device::constants::{LT_BLOCK_SIZE, LT_MASK_WORDS};
use crate::error::Error;

/// CUDA C source for the batched LT walk kernel. Each thread owns
/// `mask_words` contiguous `u32` slots of `mask` and one `u64` of
/// `rng_state` (xorshift64* — compact device-resident PRNG state, one
/// word per in-flight walk, matching spec §3's "device-side RNG-state
/// array of `num_threads` streams").
pub const LT_KERNEL_SRC: &str = r#"
extern "C" __global__ void lt_walk_batch(
    const unsigned int* offsets,
    const unsigned int* edges,
    const float* weights,
    unsigned long long* rng_state,
    unsigned int* mask,
    unsigned int node_count,
    unsigned int mask_words,
    unsigned int batch_size)
{
    unsigned int tid = blockIdx.x * blockDim.x + threadIdx.x;
    if (tid >= batch_size) return;

    unsigned long long state = rng_state[tid];
    unsigned int* my_mask = mask + (size_t)tid * mask_words;
    for (unsigned int i = 0; i < mask_words; ++i) {
        my_mask[i] = node_count;
    }

    // xorshift64* draws a [0,1) float from the top 24 bits.
    #define NEXT_U64(s) (s ^= s << 13, s ^= s >> 7, s ^= s << 17, s)
    #define NEXT_UNIT_FLOAT(s) ((float)((NEXT_U64(s) >> 40) & 0xFFFFFF) / 16777216.0f)

    unsigned int root = (unsigned int)(NEXT_U64(state) % (unsigned long long)node_count);
    unsigned int cur = root;
    my_mask[0] = root;
    unsigned int count = 1;

    for (;;) {
        float threshold = NEXT_UNIT_FLOAT(state);
        if (threshold <= 0.0f) {
            threshold = 1e-7f;
        }
        unsigned int start = offsets[cur];
        unsigned int end = offsets[cur + 1];
        int candidate = -1;
        for (unsigned int e = start; e < end; ++e) {
            threshold -= weights[e];
            if (threshold <= 0.0f) {
                candidate = (int)edges[e];
                break;
            }
        }
        if (candidate < 0) {
            break;
        }
        bool seen = false;
        for (unsigned int i = 0; i < count; ++i) {
            if (my_mask[i] == (unsigned int)candidate) {
                seen = true;
                break;
            }
        }
        if (seen) {
            break;
        }
        if (count >= mask_words) {
            my_mask[0] = node_count;
            my_mask[1] = root;
            rng_state[tid] = state;
            return;
        }
        my_mask[count] = (unsigned int)candidate;
        count += 1;
        cur = (unsigned int)candidate;
    }

    rng_state[tid] = state;
}
"#;

/// Name of the entry point inside [`LT_KERNEL_SRC`].
pub const LT_KERNEL_FN: &str = "lt_walk_batch";

/// Launch configuration for a batch of `batch_size` concurrent walks.
pub fn launch_config(batch_size: usize) -> (u32, u32) {
    let blocks = batch_size.div_ceil(LT_BLOCK_SIZE as usize) as u32;
    (blocks, LT_BLOCK_SIZE)
}

/// Sentinel check + decode of one walk's mask slot.
///
/// Returns `Ok(vertices)` for a completed walk, or `Err(root)` if the
/// walk overflowed `mask_words` (spec §4.4: "slot 0 being the sentinel
/// after the walk" marks overflow, "slot 1 is overwritten with the
/// original root").
pub fn decode_slot(mask: &[u32], node_count: u32) -> Result<Vec<u32>, u32> {
    debug_assert_eq!(mask.len(), LT_MASK_WORDS);
    if mask[0] == node_count {
        return Err(mask[1]);
    }
    Ok(mask.iter().copied().take_while(|&v| v != node_count).collect())
}

/// Built/compiled form of the kernel, ready to launch on a stream.
#[cfg(feature = "cuda")]
pub struct LtKernel {
    func: cudarc::driver::CudaFunction,
}

#[cfg(feature = "cuda")]
impl LtKernel {
    /// Compiles [`LT_KERNEL_SRC`] via NVRTC and loads it onto `device`.
    pub fn compile(device: &std::sync::Arc<cudarc::driver::CudaDevice>) -> Result<Self, Error> {
        let ptx = cudarc::nvrtc::compile_ptx(LT_KERNEL_SRC).map_err(|e| Error::DeviceUnavailable {
            reason: format!("failed to compile LT kernel: {e}"),
        })?;
        device
            .load_ptx(ptx, "lt_walk_batch_module", &[LT_KERNEL_FN])
            .map_err(|e| Error::DeviceUnavailable { reason: format!("failed to load LT kernel: {e}") })?;
        let func = device
            .get_func("lt_walk_batch_module", LT_KERNEL_FN)
            .ok_or_else(|| Error::DeviceUnavailable { reason: "LT kernel function missing after load".into() })?;
        Ok(Self { func })
    }

    /// Returns the loaded kernel function, for use in a worker's launch call.
    pub fn function(&self) -> &cudarc::driver::CudaFunction {
        &self.func
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::constants::LT_MASK_WORDS as MW;

    #[test]
    fn decode_success_trims_at_sentinel() {
        let mut mask = vec![7u32; MW];
        mask[0] = 3;
        mask[1] = 9;
        mask[2] = 10;
        for slot in mask.iter_mut().skip(3) {
            *slot = 42; // node_count == 42 is the sentinel
        }
        let decoded = decode_slot(&mask, 42).unwrap();
        assert_eq!(decoded, vec![3, 9, 10]);
    }

    #[test]
    fn decode_overflow_yields_root_from_slot_one() {
        let mut mask = vec![0u32; MW];
        mask[0] = 42; // sentinel
        mask[1] = 5; // root
        let root = decode_slot(&mask, 42).unwrap_err();
        assert_eq!(root, 5);
    }

    #[test]
    fn launch_config_covers_whole_batch() {
        let (blocks, block_size) = launch_config(32_768);
        assert_eq!(block_size, LT_BLOCK_SIZE);
        assert!(blocks * block_size >= 32_768);
    }
}
