//! Deterministic baseline content generation.
//!
//! Baseline content is a pure function of `(seed, cell)` and is never
//! stored: any cell can be regenerated at any time, which is what makes the
//! grid effectively infinite. Two salted streams keep the two decisions
//! independent: presence rolls come straight from the salted FNV hash, while
//! the value tier is drawn from a ChaCha8 generator seeded by a second,
//! differently-salted hash.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    config::GameConfig,
    coords::CellId,
    hashing::{cell_hash, unit_roll},
};

const PRESENCE_SALT: &str = "cache.presence";
const VALUE_SALT: &str = "cache.value";

/// Baseline content of `cell`: `Some(value)` when an unmodified cell spawns
/// a token cache, `None` otherwise.
pub fn baseline(config: &GameConfig, cell: CellId) -> Option<u64> {
    let roll = unit_roll(config.seed, PRESENCE_SALT, cell);
    if roll >= config.spawn_probability {
        return None;
    }
    Some(sample_value(config, cell))
}

/// Draw a token value from the configured tier table.
fn sample_value(config: &GameConfig, cell: CellId) -> u64 {
    let stream_seed = cell_hash(config.seed, VALUE_SALT, cell);
    let mut rng = ChaCha8Rng::seed_from_u64(stream_seed);
    let total: f64 = config.value_tiers.iter().map(|tier| tier.weight).sum();
    if total <= 0.0 {
        return config.value_tiers.first().map(|tier| tier.value).unwrap_or(1);
    }
    let mut roll: f64 = rng.gen::<f64>() * total;
    for tier in &config.value_tiers {
        if roll < tier.weight {
            return tier.value;
        }
        roll -= tier.weight;
    }
    // Floating point residue lands on the last tier.
    config
        .value_tiers
        .last()
        .map(|tier| tier.value)
        .unwrap_or(1)
}
