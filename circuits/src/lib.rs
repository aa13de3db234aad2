//! Symmetric ciphers and hash functions compiled to rank-1 constraint systems.
//!
//! Circuits are written once against [snarky::checked_runner::RunState] and run in two
//! modes: compilation records the constraints, witness generation evaluates them.
//! The gadgets cover AES-128/192/256 in counter mode ([aes]), ChaCha20 ([chacha]),
//! the MiMC sponge ([mimc]) and a circuit committing to a ChaCha20 decryption ([commitment]).

pub use cipher_utils;
pub use mimc_sponge;

pub mod aes;
pub mod chacha;
pub mod commitment;
pub mod gadgets;
pub mod mimc;
pub mod snarky;

#[cfg(test)]
mod tests;

/// Handy macro to return the filename and line number of a place in the code.
#[macro_export]
macro_rules! loc {
    () => {{
        ::std::borrow::Cow::Owned(format!("{}:{}", file!(), line!()))
    }};
}
