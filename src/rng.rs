//! A splittable, counter-based RNG stream.
//!
//! Every RNG stream in the generator — one per CPU worker, one per GPU
//! worker's host-side RNG, one per GPU device thread — is derived from a
//! single master seed via `split(total, index)`, with `total` the same
//! value across every call made for one `Generator` (spec §3, §9). This
//! is what makes output reproducible for a fixed `(seed, num_cpu,
//! num_gpu, gpu_slots)` layout: changing the layout changes `total` and
//! therefore reseeds every stream.
//!
//! Built on `rand_chacha::ChaCha12Rng`: its `set_stream` gives a second,
//! free axis of independence (2^64 counter-disjoint streams per seed) on
//! top of the seed itself, so `index` is mixed into both the seed
//! derivation and the stream counter.

use rand_chacha::ChaCha12Rng;
use rand_chacha::rand_core::SeedableRng;

/// A master RNG seed. Splits into independent per-worker/per-thread streams.
#[derive(Clone, Copy, Debug)]
pub struct MasterRng {
    seed: u64,
}

impl MasterRng {
    /// Creates a master RNG from a 64-bit seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Splits off a stream statistically independent from every other
    /// `(total, index)` pair sharing this `total`.
    ///
    /// # Panics
    /// Panics if `index >= total` — every caller of `split` is expected
    /// to already know its position among a fixed-size stream set.
    #[must_use]
    pub fn split(&self, total: u64, index: u64) -> ChaCha12Rng {
        assert!(index < total, "split index {index} must be < total {total}");
        let mixed = splitmix64_mix(self.seed ^ splitmix64_mix(total) ^ splitmix64_mix(index.wrapping_add(1)));
        let mut seed_bytes = [0u8; 32];
        let mut state = mixed;
        for chunk in seed_bytes.chunks_mut(8) {
            state = splitmix64_mix(state.wrapping_add(0x9E37_79B9_7F4A_7C15));
            chunk.copy_from_slice(&state.to_le_bytes());
        }
        let mut rng = ChaCha12Rng::from_seed(seed_bytes);
        rng.set_stream(index);
        rng
    }
}

/// SplitMix64 finalizer, used only to decorrelate the integers fed into
/// the ChaCha seed — not itself exposed as a general-purpose RNG.
#[inline]
fn splitmix64_mix(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 31;
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn distinct_indices_diverge() {
        let master = MasterRng::new(7);
        let mut a = master.split(4, 0);
        let mut b = master.split(4, 1);
        let draws_a: Vec<u32> = (0..8).map(|_| a.gen::<u32>()).collect();
        let draws_b: Vec<u32> = (0..8).map(|_| b.gen::<u32>()).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn same_index_same_total_is_deterministic() {
        let master = MasterRng::new(123);
        let mut a = master.split(3, 2);
        let mut b = master.split(3, 2);
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }

    #[test]
    fn changing_total_reseeds_every_stream() {
        let master = MasterRng::new(99);
        let mut small = master.split(2, 0);
        let mut big = master.split(5, 0);
        assert_ne!(small.gen::<u64>(), big.gen::<u64>());
    }

    #[test]
    #[should_panic(expected = "must be < total")]
    fn index_must_be_in_range() {
        let master = MasterRng::new(1);
        let _ = master.split(2, 2);
    }
}
