//! Deterministic randomness for degradation and choice.
//!
//! Every random decision is a pure function of a node seed and a time key,
//! never of query order or query span. Querying the same arc twice, or in
//! pieces, yields identical outcomes.

use crate::Fraction;
use rand::{Rng, SeedableRng};

const SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;
const KEY_MIX: u64 = 0xbf58_476d_1ce4_e5b9;

/// A uniform draw in `[0, 1)` determined entirely by `(seed, key)`.
pub fn unit_value(seed: u64, key: u64) -> f64 {
    let state = seed.wrapping_mul(SEED_MIX) ^ key.wrapping_mul(KEY_MIX);
    let mut rng = rand::rngs::StdRng::seed_from_u64(state);
    rng.gen::<f64>()
}

/// Key for per-cycle decisions (choice).
pub fn cycle_key(cycle: i64) -> u64 {
    cycle as u64
}

/// Key for per-event decisions (degradation), derived from the event's
/// onset time so fragments of one event agree.
pub fn time_key(time: Fraction) -> u64 {
    let n = time.numerator() as u64;
    let d = time.denominator() as u64;
    n.wrapping_mul(0x94d0_49bb_1331_11eb) ^ d.rotate_left(32)
}
