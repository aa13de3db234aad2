//! The permutation module contains the functions implementing the MiMC Feistel
//! permutation used by the sponge.

use crate::params::MimcParams;
use ark_ff::PrimeField;

/// Raises `x` to the power `exponent` by square-and-multiply.
pub fn sbox<F: PrimeField>(x: F, exponent: u64) -> F {
    if exponent == 5 {
        // hard-coded for the common case
        let mut square = x;
        square.square_in_place();
        square.square_in_place();
        square * x
    } else {
        x.pow([exponent])
    }
}

/// One keyed MiMC round on a single branch: `(x + key + c)^exponent`.
pub fn round<F: PrimeField>(params: &MimcParams<F>, x: F, r: usize) -> F {
    sbox(x + params.key() + params.round_constants()[r], params.exponent())
}

/// Applies the Feistel permutation to `(left, right)`.
///
/// Every round computes `t = round(left)` and replaces the state by `(right + t, left)`,
/// except for the last round where the branches are not swapped.
pub fn feistel<F: PrimeField>(params: &MimcParams<F>, state: &mut (F, F)) {
    let last = params.rounds() - 1;
    for r in 0..params.rounds() {
        let t = round(params, state.0, r);
        if r < last {
            *state = (state.1 + t, state.0);
        } else {
            state.1 += t;
        }
    }
}
