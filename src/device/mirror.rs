//! The device graph mirror: an immutable, device-resident CSR image of
//! `G`, built once per generation session and read-only for its whole
//! lifetime (spec §2, §3, §5, §9's "device mirror ownership" note).

use crate::error::Error;
use crate::graph::CsrGraph;

/// An immutable CSR graph uploaded to the device. Scoped to the
/// [`crate::generator::Generator`] instance that owns it; torn down on
/// `Drop`, never exposed as global state (spec §9).
pub struct DeviceGraphMirror {
    #[cfg(feature = "cuda")]
    inner: cuda_impl::Inner,
    #[cfg(not(feature = "cuda"))]
    _unused: (),
    node_count: usize,
}

impl DeviceGraphMirror {
    /// Uploads `graph` to the device. Only called when at least one GPU
    /// worker exists (spec §3's "built on construction when any GPU
    /// worker exists").
    pub fn upload(graph: &CsrGraph) -> Result<Self, Error> {
        #[cfg(feature = "cuda")]
        {
            let inner = cuda_impl::Inner::upload(graph)?;
            Ok(Self { inner, node_count: graph.node_count() })
        }
        #[cfg(not(feature = "cuda"))]
        {
            let _ = graph;
            Err(Error::DeviceUnavailable {
                reason: "crate built without the `cuda` feature".to_string(),
            })
        }
    }

    /// Number of vertices in the mirrored graph; doubles as the
    /// sentinel "no vertex" id inside packed device buffers.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[cfg(feature = "cuda")]
    pub(crate) fn inner(&self) -> &cuda_impl::Inner {
        &self.inner
    }
}

#[cfg(feature = "cuda")]
pub(crate) mod cuda_impl {
    use std::sync::Arc;

    use cudarc::driver::{CudaDevice, CudaSlice};

    use crate::error::Error;
    use crate::graph::CsrGraph;

    /// Device-side CSR buffers plus the owning device handle.
    pub struct Inner {
        pub device: Arc<CudaDevice>,
        pub offsets: CudaSlice<u32>,
        pub edges: CudaSlice<u32>,
        pub weights: CudaSlice<f32>,
    }

    impl Inner {
        pub fn upload(graph: &CsrGraph) -> Result<Self, Error> {
            let device = CudaDevice::new(0).map_err(|e| Error::DeviceUnavailable {
                reason: format!("CudaDevice::new(0) failed: {e}"),
            })?;
            let offsets = device.htod_sync_copy(graph.offsets()).map_err(|e| Error::DeviceUnavailable {
                reason: format!("failed to upload offsets: {e}"),
            })?;
            let edges = device.htod_sync_copy(graph.edges()).map_err(|e| Error::DeviceUnavailable {
                reason: format!("failed to upload edges: {e}"),
            })?;
            let weights = device.htod_sync_copy(graph.weights()).map_err(|e| Error::DeviceUnavailable {
                reason: format!("failed to upload weights: {e}"),
            })?;
            Ok(Self { device, offsets, edges, weights })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "cuda"))]
    #[test]
    fn upload_without_cuda_feature_is_device_unavailable() {
        let graph = CsrGraph::from_edges(2, &[(0, 1, 1.0)]);
        let err = DeviceGraphMirror::upload(&graph).unwrap_err();
        assert!(matches!(err, Error::DeviceUnavailable { .. }));
    }
}
