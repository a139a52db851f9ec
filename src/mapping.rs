//! Parses and validates the `gpu_mapping` configuration string.
//!
//! A mapping is a comma-separated list of slot indices in
//! `[0, total_workers)` naming exactly which worker slots are GPU
//! workers; the rest are CPU. An empty string means "default layout":
//! CPU workers occupy the low slots, GPU workers the high slots (spec §4.6).

use std::collections::BTreeSet;

use crate::error::Error;

/// Parses and validates a `gpu_mapping` string against a worker layout.
///
/// Rules (spec §4.7):
/// - `total_workers > 0` and `gpu_workers <= total_workers`.
/// - every integer is `< total_workers`.
/// - the number of integers equals `gpu_workers`.
/// - empty input yields an empty set (caller falls back to the default layout).
pub fn parse_gpu_mapping(
    input: &str,
    total_workers: usize,
    gpu_workers: usize,
) -> Result<BTreeSet<usize>, Error> {
    if total_workers == 0 || gpu_workers > total_workers {
        return Err(Error::InvalidLayout { total_workers, gpu_workers });
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(BTreeSet::new());
    }

    let mut slots = BTreeSet::new();
    let mut count = 0usize;
    for token in trimmed.split(',') {
        let token = token.trim();
        let slot: usize = token
            .parse()
            .map_err(|_| Error::NotAnInteger { entry: token.to_string() })?;
        if slot >= total_workers {
            return Err(Error::SlotOutOfRange { slot, total_workers });
        }
        if !slots.insert(slot) {
            return Err(Error::DuplicateSlot { slot });
        }
        count += 1;
    }

    if count != gpu_workers {
        return Err(Error::SlotCountMismatch { given: count, expected: gpu_workers });
    }

    Ok(slots)
}

/// Builds the slot→is-gpu mapping for every worker slot, applying the
/// default layout (CPU first, GPU after) when `gpu_slots` is empty.
pub fn layout_from_slots(total_workers: usize, num_cpu: usize, gpu_slots: &BTreeSet<usize>) -> Vec<bool> {
    if gpu_slots.is_empty() {
        (0..total_workers).map(|slot| slot >= num_cpu).collect()
    } else {
        (0..total_workers).map(|slot| gpu_slots.contains(&slot)).collect()
    }
}
