//! This module implements the MiMC sponge (MiMCSponge): a rate-1 sponge whose state
//! is the two branches of the Feistel permutation.

use crate::{params::MimcParams, permutation::feistel};
use ark_ff::PrimeField;

/// Cryptographic sponge interface - for hashing an arbitrary amount of
/// data into one or more field elements
pub trait Sponge<F: PrimeField> {
    /// Absorb an array of field elements `x`
    fn absorb(&mut self, x: &[F]);

    /// Squeeze an output from the sponge
    fn squeeze(&mut self) -> F;

    /// Reset the sponge back to its initial state (as if it were just created)
    fn reset(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpongeState {
    Absorbing,
    Squeezed,
}

/// The MiMC sponge. Each absorbed element is added to the left branch and followed by
/// one permutation; the first output is the left branch, later outputs permute again.
#[derive(Clone, Debug)]
pub struct MimcSponge<'a, F: PrimeField> {
    params: &'a MimcParams<F>,
    pub state: (F, F),
    pub sponge_state: SpongeState,
}

impl<'a, F: PrimeField> MimcSponge<'a, F> {
    pub fn new(params: &'a MimcParams<F>) -> Self {
        Self {
            params,
            state: (F::zero(), F::zero()),
            sponge_state: SpongeState::Absorbing,
        }
    }

    /// Hashes `inputs` into `num_outputs` field elements.
    pub fn hash(params: &MimcParams<F>, inputs: &[F], num_outputs: usize) -> Vec<F> {
        let mut sponge = MimcSponge::new(params);
        sponge.absorb(inputs);
        (0..num_outputs).map(|_| sponge.squeeze()).collect()
    }
}

impl<'a, F: PrimeField> Sponge<F> for MimcSponge<'a, F> {
    fn absorb(&mut self, x: &[F]) {
        self.sponge_state = SpongeState::Absorbing;
        for x in x {
            self.state.0 += x;
            feistel(self.params, &mut self.state);
        }
    }

    fn squeeze(&mut self) -> F {
        match self.sponge_state {
            SpongeState::Absorbing => self.sponge_state = SpongeState::Squeezed,
            SpongeState::Squeezed => feistel(self.params, &mut self.state),
        }
        self.state.0
    }

    fn reset(&mut self) {
        self.state = (F::zero(), F::zero());
        self.sponge_state = SpongeState::Absorbing;
    }
}
