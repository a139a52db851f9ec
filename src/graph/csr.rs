//! A compact, immutable CSR graph with per-edge weights.
//!
//! Memory layout:
//! - `offsets`: `Vec<u32>` of length `n + 1` (row offsets)
//! - `edges`: flat `Vec<u32>` of destination vertices, CSR order
//! - `weights`: flat `Vec<f32>` parallel to `edges` — LT transition
//!   probability or IC activation probability, depending on the
//!   diffusion model the generator was built for
//!
//! `node_count()` doubles as the sentinel "no vertex" id used inside
//! packed device buffers (spec §3): it is never itself a valid vertex
//! index, so device code can use it as an unambiguous end-of-set marker.

/// An immutable, CSR-encoded directed graph with per-edge weights.
///
/// Construction (`from_edges`/`from_csr_parts`) is the only place
/// validity is checked; every other method assumes a well-formed graph
/// and is safe to call from any thread once construction completes,
/// since the graph is never mutated afterwards.
#[derive(Clone, Debug)]
pub struct CsrGraph {
    offsets: Vec<u32>,
    edges: Vec<u32>,
    weights: Vec<f32>,
}

impl CsrGraph {
    /// Builds a CSR graph from an edge list `(from, to, weight)`.
    ///
    /// Edges are grouped by `from` and sorted into CSR order; relative
    /// order of parallel edges out of the same vertex is preserved
    /// (stable sort), which is what spec §4.1 means by "neighbor scan
    /// order is the CSR order for `cur`".
    ///
    /// # Panics
    /// Panics if any endpoint is `>= n`.
    pub fn from_edges(n: usize, edges: &[(u32, u32, f32)]) -> Self {
        for &(from, to, _) in edges {
            assert!((from as usize) < n, "edge source {from} out of bounds for n={n}");
            assert!((to as usize) < n, "edge target {to} out of bounds for n={n}");
        }

        let mut by_source: Vec<Vec<(u32, f32)>> = vec![Vec::new(); n];
        for &(from, to, weight) in edges {
            by_source[from as usize].push((to, weight));
        }

        let mut offsets = Vec::with_capacity(n + 1);
        let mut flat_edges = Vec::with_capacity(edges.len());
        let mut flat_weights = Vec::with_capacity(edges.len());
        offsets.push(0u32);
        for nbrs in &by_source {
            for &(to, weight) in nbrs {
                flat_edges.push(to);
                flat_weights.push(weight);
            }
            offsets.push(flat_edges.len() as u32);
        }

        Self {
            offsets,
            edges: flat_edges,
            weights: flat_weights,
        }
    }

    /// Builds a CSR graph directly from already-encoded CSR parts.
    ///
    /// # Panics
    /// - if `offsets.len() < 1`
    /// - if offsets are not monotone
    /// - if `offsets.last() != edges.len()` or `edges.len() != weights.len()`
    /// - if any edge target is out of bounds
    pub fn from_csr_parts(offsets: Vec<u32>, edges: Vec<u32>, weights: Vec<f32>) -> Self {
        assert!(!offsets.is_empty(), "offsets must have length n+1");
        let n = offsets.len() - 1;
        for w in offsets.windows(2) {
            assert!(w[0] <= w[1], "offsets must be monotone");
        }
        let m = *offsets.last().expect("offsets non-empty") as usize;
        assert_eq!(m, edges.len(), "offsets.last() must equal edges.len()");
        assert_eq!(edges.len(), weights.len(), "edges and weights must be parallel");
        for &v in &edges {
            assert!((v as usize) < n, "edge to {v} out of bounds for n={n}");
        }
        Self { offsets, edges, weights }
    }

    /// Number of vertices `N`. Also the sentinel "no vertex" id.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the out-neighbors of `node` as `(destination, weight)`
    /// pairs, in CSR order.
    #[inline]
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (u32, f32)> + '_ {
        assert!(node < self.node_count(), "node {node} out of bounds");
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        self.edges[start..end]
            .iter()
            .copied()
            .zip(self.weights[start..end].iter().copied())
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn degree(&self, node: usize) -> usize {
        assert!(node < self.node_count(), "node {node} out of bounds");
        (self.offsets[node + 1] - self.offsets[node]) as usize
    }

    /// Raw row offsets, for device upload.
    #[inline]
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Raw flat edge targets, for device upload.
    #[inline]
    pub fn edges(&self) -> &[u32] {
        &self.edges
    }

    /// Raw flat edge weights, for device upload.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}
