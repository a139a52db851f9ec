//! CSR (compressed sparse row) graph storage for the RRR generator.
//!
//! Mirrors the layout `halo`'s own `graph::compressed::csr_graph` uses —
//! a row-offset array of length `n + 1` plus a flat edge array — but adds
//! a parallel per-edge weight array (LT transition probability / IC
//! activation probability) and drops the branded visited bitmap: this
//! graph is read-only for the lifetime of a [`crate::generator::Generator`],
//! so no concurrent mutation discipline is needed on it.

mod csr;

pub use csr::CsrGraph;
