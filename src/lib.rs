//! # `cascade` — heterogeneous RRR-set streaming generator
//!
//! Generates a batch of Reverse Reachable (RRR) sets over a weighted
//! directed graph, the sampling core of an influence-maximization
//! estimator. A pool of CPU and GPU workers cooperatively drains a single
//! θ-sized output vector through a shared atomic cursor; each worker
//! fills its claimed slots with random walks run under a chosen diffusion
//! model (Linear Threshold or Independent Cascade).
//!
//! ## Example
//!
//! ```rust
//! use cascade::{Config, DiffusionModel, Generator};
//! use cascade::graph::CsrGraph;
//!
//! // 0 -> 1 -> 2 -> 3 -> 4, weight 1.0 on every edge.
//! let graph = CsrGraph::from_edges(5, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)]);
//!
//! let config = Config::builder()
//!     .num_cpu_workers(2)
//!     .num_gpu_workers(0)
//!     .master_seed(42)
//!     .diffusion_model(DiffusionModel::LinearThreshold)
//!     .build()
//!     .expect("valid config");
//!
//! let generator = Generator::new(graph, config).expect("construct generator");
//! let sets = generator.generate(8);
//! assert_eq!(sets.len(), 8);
//! ```

#![warn(missing_docs, clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod device;
pub mod diffusion;
pub mod error;
pub mod generator;
pub mod graph;
pub mod mapping;
pub mod profiling;
pub mod rng;
pub mod rrr_set;
pub mod worker;

pub use config::{Config, ConfigBuilder};
pub use diffusion::DiffusionModel;
pub use error::Error;
pub use generator::{GenerationReport, Generator};
pub use rrr_set::RrrSet;

/// Hard cap on the number of distinct vertices a single RRR set may
/// contain. Exceeding it on the CPU path is a data-integrity error (see
/// [`error::Error`] and spec §7); exceeding it on the GPU LT path is the
/// documented overflow/fallback path (see [`device::lt_kernel`]).
pub const MAX_SET_SIZE: usize = 256;
