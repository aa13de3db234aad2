//! MiMC parameter sets.

use crate::constants::{
    round_constants_from_seed, MIMC_SPONGE_EXPONENT, MIMC_SPONGE_ROUNDS, MIMC_SPONGE_SEED,
};
use ark_ff::PrimeField;
use cipher_utils::serialization::SerdeAs;
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::serde_as;
use thiserror::Error;

/// Invalid MiMC configurations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MimcError {
    #[error("expected one round constant per round ({expected}), got {got}")]
    RoundConstantsLength { expected: usize, got: usize },

    #[error("the exponent {0} is even, x -> x^{0} is not a permutation")]
    EvenExponent(u64),

    #[error("a MiMC permutation needs at least one round")]
    ZeroRounds,
}

/// The fixed configuration of a MiMC permutation: `x_{i+1} = (x_i + key + c_i)^exponent`.
///
/// Two instances only agree when they share the exact same parameters, so the
/// table is validated once, here, and then only read.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MimcParams<F: PrimeField> {
    rounds: usize,
    exponent: u64,
    #[serde_as(as = "SerdeAs")]
    key: F,
    #[serde_as(as = "Vec<SerdeAs>")]
    round_constants: Vec<F>,
}

impl<F: PrimeField> MimcParams<F> {
    /// Creates a parameter set, rejecting tables that do not match the round count.
    pub fn new(
        rounds: usize,
        exponent: u64,
        key: F,
        round_constants: Vec<F>,
    ) -> Result<Self, MimcError> {
        if rounds == 0 {
            return Err(MimcError::ZeroRounds);
        }
        if round_constants.len() != rounds {
            return Err(MimcError::RoundConstantsLength {
                expected: rounds,
                got: round_constants.len(),
            });
        }
        if exponent % 2 == 0 {
            return Err(MimcError::EvenExponent(exponent));
        }

        Ok(Self {
            rounds,
            exponent,
            key,
            round_constants,
        })
    }

    /// Derives the round constants from `seed` (see [round_constants_from_seed]), with a zero key.
    pub fn from_seed(seed: &[u8], rounds: usize, exponent: u64) -> Result<Self, MimcError> {
        let round_constants = round_constants_from_seed(seed, rounds);
        Self::new(rounds, exponent, F::zero(), round_constants)
    }

    /// MiMCSponge with 220 rounds of `x^5`, the instantiation used by BN254 circuits.
    pub fn default_sponge() -> Self {
        Self {
            rounds: MIMC_SPONGE_ROUNDS,
            exponent: MIMC_SPONGE_EXPONENT,
            key: F::zero(),
            round_constants: round_constants_from_seed(MIMC_SPONGE_SEED, MIMC_SPONGE_ROUNDS),
        }
    }

    /// Returns the same parameters with a different key.
    pub fn with_key(mut self, key: F) -> Self {
        self.key = key;
        self
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn exponent(&self) -> u64 {
        self.exponent
    }

    pub fn key(&self) -> F {
        self.key
    }

    pub fn round_constants(&self) -> &[F] {
        &self.round_constants
    }
}

#[serde_as]
#[derive(Deserialize)]
struct UncheckedMimcParams<F: PrimeField> {
    rounds: usize,
    exponent: u64,
    #[serde_as(as = "SerdeAs")]
    key: F,
    #[serde_as(as = "Vec<SerdeAs>")]
    round_constants: Vec<F>,
}

impl<'de, F: PrimeField> Deserialize<'de> for MimcParams<F> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let params = UncheckedMimcParams::<F>::deserialize(deserializer)?;
        MimcParams::new(
            params.rounds,
            params.exponent,
            params.key,
            params.round_constants,
        )
        .map_err(serde::de::Error::custom)
    }
}
