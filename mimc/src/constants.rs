//! Round constant derivation.

use ark_ff::PrimeField;
use sha3::{Digest, Keccak256};

/// Seed of the default MiMCSponge instantiation.
pub const MIMC_SPONGE_SEED: &[u8] = b"mimcsponge";

/// Number of Feistel rounds of the default instantiation.
pub const MIMC_SPONGE_ROUNDS: usize = 220;

/// Exponent of the default instantiation.
pub const MIMC_SPONGE_EXPONENT: u64 = 5;

/// Derives `rounds` round constants from a seed by iterating Keccak-256.
///
/// Constant `i` is the big-endian reading of `keccak256^(i+1)(seed)` reduced modulo
/// the field order, except for the first and the last constants which are zero.
pub fn round_constants_from_seed<F: PrimeField>(seed: &[u8], rounds: usize) -> Vec<F> {
    let mut digest = Keccak256::digest(seed);
    (0..rounds)
        .map(|i| {
            if i == 0 {
                return F::zero();
            }
            digest = Keccak256::digest(digest);
            if i == rounds - 1 {
                F::zero()
            } else {
                F::from_be_bytes_mod_order(&digest)
            }
        })
        .collect()
}
