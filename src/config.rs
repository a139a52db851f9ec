//! Generator configuration (spec §6's configuration table).
//!
//! Parsing these values out of a CLI invocation or a config file is an
//! external collaborator's job (spec §1's "command-line parsing... only
//! the validation rule for the worker-to-device mapping string is
//! specified"); this module owns that one validation rule plus the
//! in-memory struct a host program builds and hands to
//! [`crate::generator::Generator::new`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::diffusion::DiffusionModel;
use crate::error::Error;
use crate::mapping::parse_gpu_mapping;

/// Validated generator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Number of CPU worker threads.
    pub num_cpu_workers: usize,
    /// Number of GPU worker threads (0 disables the device path).
    pub num_gpu_workers: usize,
    /// Slot indices assigned to GPU workers; empty means the default
    /// layout (CPU first, GPU after).
    pub gpu_slots: BTreeSet<usize>,
    /// Seed for the splittable master RNG.
    pub master_seed: u64,
    /// Which diffusion model this generator runs.
    pub diffusion_model: DiffusionModel,
}

impl Config {
    /// Starts building a [`Config`] with [`ConfigBuilder`].
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Total worker count, `num_cpu_workers + num_gpu_workers`.
    #[inline]
    #[must_use]
    pub fn total_workers(&self) -> usize {
        self.num_cpu_workers + self.num_gpu_workers
    }
}

/// Builds and validates a [`Config`], parsing a raw `gpu_mapping` string
/// through [`parse_gpu_mapping`] at `build()` time.
#[derive(Default)]
pub struct ConfigBuilder {
    num_cpu_workers: usize,
    num_gpu_workers: usize,
    gpu_mapping: String,
    master_seed: u64,
    diffusion_model: Option<DiffusionModel>,
}

impl ConfigBuilder {
    /// Sets the number of CPU worker threads.
    #[must_use]
    pub fn num_cpu_workers(mut self, n: usize) -> Self {
        self.num_cpu_workers = n;
        self
    }

    /// Sets the number of GPU worker threads.
    #[must_use]
    pub fn num_gpu_workers(mut self, n: usize) -> Self {
        self.num_gpu_workers = n;
        self
    }

    /// Sets the raw `gpu_mapping` string (comma-separated slot indices,
    /// or empty for the default layout).
    #[must_use]
    pub fn gpu_mapping(mut self, mapping: impl Into<String>) -> Self {
        self.gpu_mapping = mapping.into();
        self
    }

    /// Sets the master RNG seed.
    #[must_use]
    pub fn master_seed(mut self, seed: u64) -> Self {
        self.master_seed = seed;
        self
    }

    /// Sets the diffusion model.
    #[must_use]
    pub fn diffusion_model(mut self, model: DiffusionModel) -> Self {
        self.diffusion_model = Some(model);
        self
    }

    /// Validates the accumulated settings and produces a [`Config`].
    ///
    /// # Errors
    /// Returns [`Error`] if the worker layout is invalid or the
    /// `gpu_mapping` string does not describe a valid slot assignment
    /// for it (spec §4.7).
    pub fn build(self) -> Result<Config, Error> {
        let total = self.num_cpu_workers + self.num_gpu_workers;
        let gpu_slots = parse_gpu_mapping(&self.gpu_mapping, total, self.num_gpu_workers)?;
        Ok(Config {
            num_cpu_workers: self.num_cpu_workers,
            num_gpu_workers: self.num_gpu_workers,
            gpu_slots,
            master_seed: self.master_seed,
            diffusion_model: self.diffusion_model.unwrap_or(DiffusionModel::LinearThreshold),
        })
    }
}
