//! Diffusion models: the random-walk algorithms that produce one RRR set.
//!
//! Two models, never mixed within a single [`crate::generator::Generator`]
//! instance (spec §6): Linear Threshold (cumulative weight threshold) and
//! Independent Cascade (per-edge Bernoulli trial). Each has a host
//! implementation here and a device implementation under [`crate::device`].

pub mod independent_cascade;
pub mod linear_threshold;

use serde::{Deserialize, Serialize};

/// Selects which diffusion model a [`crate::generator::Generator`] runs.
///
/// The two models never mix within one generator instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffusionModel {
    /// Linear Threshold: a cumulative random threshold is driven to zero
    /// by out-edge weights.
    LinearThreshold,
    /// Independent Cascade: each out-edge activates independently with
    /// probability equal to its weight.
    IndependentCascade,
}
