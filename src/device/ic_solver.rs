//! Device Independent-Cascade BFS solver (spec §4.2, §4.5).
//!
//! A full-frontier BFS driver: each round scans every vertex in
//! parallel, and any already-reached vertex relaxes its out-edges
//! (per-edge Bernoulli trial against the worker's device RNG state),
//! writing a predecessor array of length `N` (`pred[v] >= 0` iff
//! reached). The host loops launches until a round makes no change,
//! copies the array back, sets `pred[root] = root`, and builds the set
//! as every index with `pred != -1`.

use crate::error::Error;

/// CUDA C source for one relaxation round of the full-frontier IC BFS.
/// `rng_state` is indexed by vertex id (one stream per vertex), so a
/// vertex's outgoing draws are reproducible regardless of which round
/// relaxes it.
pub const IC_KERNEL_SRC: &str = r#"
extern "C" __global__ void ic_bfs_step(
    const unsigned int* offsets,
    const unsigned int* edges,
    const float* weights,
    unsigned long long* rng_state,
    int* pred,
    unsigned int node_count,
    unsigned int* changed)
{
    unsigned int u = blockIdx.x * blockDim.x + threadIdx.x;
    if (u >= node_count) return;
    if (pred[u] == -1) return;

    #define NEXT_U64(s) (s ^= s << 13, s ^= s >> 7, s ^= s << 17, s)
    #define NEXT_UNIT_FLOAT(s) ((float)((NEXT_U64(s) >> 40) & 0xFFFFFF) / 16777216.0f)

    unsigned int start = offsets[u];
    unsigned int end = offsets[u + 1];
    for (unsigned int e = start; e < end; ++e) {
        unsigned int v = edges[e];
        if (pred[v] != -1) {
            continue;
        }
        float r = NEXT_UNIT_FLOAT(rng_state[u]);
        if (r <= weights[e]) {
            int prev = atomicCAS(&pred[v], -1, (int)u);
            if (prev == -1) {
                *changed = 1;
            }
        }
    }
}
"#;

/// Name of the entry point inside [`IC_KERNEL_SRC`].
pub const IC_KERNEL_FN: &str = "ic_bfs_step";

/// Decodes a copied-back predecessor array into a sorted, deduplicated
/// RRR set, applying the host-side `pred[root] = root` fixup spec §4.2
/// mandates before reading it.
pub fn decode_predecessors(mut pred: Vec<i32>, root: u32) -> Vec<u32> {
    pred[root as usize] = root as i32;
    let mut set: Vec<u32> = pred
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p != -1)
        .map(|(v, _)| v as u32)
        .collect();
    set.sort_unstable();
    set
}

/// Built/compiled form of the kernel, ready to launch on a stream.
#[cfg(feature = "cuda")]
pub struct IcKernel {
    func: cudarc::driver::CudaFunction,
}

#[cfg(feature = "cuda")]
impl IcKernel {
    /// Compiles [`IC_KERNEL_SRC`] via NVRTC and loads it onto `device`.
    pub fn compile(device: &std::sync::Arc<cudarc::driver::CudaDevice>) -> Result<Self, Error> {
        let ptx = cudarc::nvrtc::compile_ptx(IC_KERNEL_SRC).map_err(|e| Error::DeviceUnavailable {
            reason: format!("failed to compile IC kernel: {e}"),
        })?;
        device
            .load_ptx(ptx, "ic_bfs_step_module", &[IC_KERNEL_FN])
            .map_err(|e| Error::DeviceUnavailable { reason: format!("failed to load IC kernel: {e}") })?;
        let func = device
            .get_func("ic_bfs_step_module", IC_KERNEL_FN)
            .ok_or_else(|| Error::DeviceUnavailable { reason: "IC kernel function missing after load".into() })?;
        Ok(Self { func })
    }

    /// Returns the loaded kernel function, for use in a worker's launch loop.
    pub fn function(&self) -> &cudarc::driver::CudaFunction {
        &self.func
    }
}
