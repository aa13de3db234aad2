//! This crate provides a generic implementation of the MiMC permutation in its
//! Feistel form, and of the sponge built on top of it (MiMCSponge).
//!
//! The parameters ([params::MimcParams]) are plain configuration: a round count,
//! an exponent, a key and one constant per round. The parameter set deployed
//! with BN254 circuits is derived from the seed `"mimcsponge"`:
//!
//! ```rust
//! use ark_bn254::Fr;
//! use mimc_sponge::{params::MimcParams, sponge::MimcSponge};
//!
//! let params = MimcParams::<Fr>::default_sponge();
//! let digest = MimcSponge::hash(&params, &[Fr::from(1u64), Fr::from(2u64)], 1);
//! assert_eq!(digest.len(), 1);
//! ```

pub mod constants;
pub mod params;
pub mod permutation;
pub mod sponge;

pub use params::{MimcError, MimcParams};
pub use sponge::{MimcSponge, Sponge};
