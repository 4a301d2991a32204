//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through StreamRng instances derived
//! from the single master seed of the batch.
//!
//! Each table gets its own RNG stream, seeded deterministically
//! from (master_seed XOR stream_index). This means:
//!   - Adding a new stream never changes existing streams.
//!   - Each table's stream is fully reproducible in isolation.

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single generation stream.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream RNG from the master seed and a stable
    /// stream index. The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Draw from a normal distribution.
    pub fn normal(&mut self, dist: &Normal<f64>) -> f64 {
        dist.sample(&mut self.inner)
    }

    /// Uniform pick with replacement. `None` only for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_u64_below(items.len() as u64) as usize)
    }

    /// Categorical draw from `(value, weight)` pairs whose weights sum to 1.
    /// Rounding slack in the weights falls to the last entry.
    ///
    /// # Panics
    /// If `table` is empty. Every caller passes one of the constant
    /// `WEIGHTS` tables in `records`.
    pub fn pick_weighted<T: Copy>(&mut self, table: &[(T, f64)]) -> T {
        assert!(!table.is_empty(), "weight table must not be empty");
        let roll = self.next_f64();
        let mut cumulative = 0.0;
        for &(value, weight) in table {
            cumulative += weight;
            if roll < cumulative {
                return value;
            }
        }
        table[table.len() - 1].0
    }
}

/// All stream RNGs for a single batch, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_stream(&self, slot: StreamSlot) -> StreamRng {
        StreamRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries, only append.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Customer = 1,
    Account = 2,
    Transaction = 3,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Account => "account",
            Self::Transaction => "transaction",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let bank = RngBank::new(12345);
        let mut a = bank.for_stream(StreamSlot::Account);
        let mut b = bank.for_stream(StreamSlot::Account);
        for _ in 0..100 {
            assert_eq!(a.next_u64_below(1_000_000), b.next_u64_below(1_000_000));
        }
    }

    #[test]
    fn streams_are_independent() {
        let bank = RngBank::new(12345);
        let mut customer = bank.for_stream(StreamSlot::Customer);
        let mut account = bank.for_stream(StreamSlot::Account);
        let c: Vec<u64> = (0..16).map(|_| customer.next_u64_below(u64::MAX)).collect();
        let a: Vec<u64> = (0..16).map(|_| account.next_u64_below(u64::MAX)).collect();
        assert_ne!(c, a, "customer and account streams must not coincide");
    }

    #[test]
    fn weighted_pick_tracks_weights() {
        let mut rng = RngBank::new(7).for_stream(StreamSlot::Customer);
        let table = [('a', 0.7), ('b', 0.2), ('c', 0.1)];
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            match rng.pick_weighted(&table) {
                'a' => counts[0] += 1,
                'b' => counts[1] += 1,
                _ => counts[2] += 1,
            }
        }
        let share_a = counts[0] as f64 / 10_000.0;
        let share_c = counts[2] as f64 / 10_000.0;
        assert!((share_a - 0.7).abs() < 0.03, "share of 'a' was {share_a}");
        assert!((share_c - 0.1).abs() < 0.02, "share of 'c' was {share_c}");
    }

    #[test]
    fn weight_slack_falls_to_last_entry() {
        let mut rng = RngBank::new(3).for_stream(StreamSlot::Transaction);
        let short = [('x', 0.0), ('y', 0.0)];
        for _ in 0..100 {
            assert_eq!(rng.pick_weighted(&short), 'y');
        }
    }

    #[test]
    #[should_panic(expected = "weight table must not be empty")]
    fn weighted_pick_on_empty_table_panics() {
        let mut rng = RngBank::new(3).for_stream(StreamSlot::Transaction);
        let empty: [(char, f64); 0] = [];
        rng.pick_weighted(&empty);
    }

    #[test]
    fn pick_on_empty_slice_is_none() {
        let mut rng = RngBank::new(1).for_stream(StreamSlot::Account);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert_eq!(rng.pick(&[9u8]), Some(&9));
    }
}
