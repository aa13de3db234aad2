//! The MiMC sponge as a circuit, matching [mimc_sponge::MimcSponge] exactly.

use std::borrow::Cow;

use ark_ff::PrimeField;
use mimc_sponge::MimcParams;
use serde::{Deserialize, Serialize};

use crate::{
    loc,
    snarky::{
        api::SnarkyCircuit,
        checked_runner::RunState,
        cvar::FieldVar,
        errors::{SnarkyResult, SnarkyRuntimeError},
    },
};

/// `x^exponent` by square-and-multiply, most significant bit first.
pub fn pow<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    x: &FieldVar<F>,
    exponent: u64,
) -> SnarkyResult<FieldVar<F>> {
    if exponent == 0 {
        return Ok(FieldVar::one());
    }

    let top = 63 - exponent.leading_zeros();
    let mut res = x.clone();
    for i in (0..top).rev() {
        res = res.square(loc.clone(), sys)?;
        if (exponent >> i) & 1 == 1 {
            res = res.mul(x, Some("mimc.pow".into()), loc.clone(), sys)?;
        }
    }
    Ok(res)
}

/// The Feistel permutation on `(left, right)`; the last round does not swap the branches.
pub fn mimc_feistel<F: PrimeField>(
    sys: &mut RunState<F>,
    params: &MimcParams<F>,
    state: (FieldVar<F>, FieldVar<F>),
) -> SnarkyResult<(FieldVar<F>, FieldVar<F>)> {
    let (mut left, mut right) = state;
    let last = params.rounds() - 1;
    for (r, c) in params.round_constants().iter().enumerate() {
        let shifted = &left + FieldVar::constant(params.key() + c);
        let t = pow(sys, loc!(), &shifted, params.exponent())?;
        if r < last {
            (left, right) = (right + t, left);
        } else {
            right = right + t;
        }
    }
    Ok((left, right))
}

/// Absorbs `inputs` and squeezes `num_outputs` elements.
pub fn mimc_sponge<F: PrimeField>(
    sys: &mut RunState<F>,
    params: &MimcParams<F>,
    inputs: &[FieldVar<F>],
    num_outputs: usize,
) -> SnarkyResult<Vec<FieldVar<F>>> {
    let mut state = (FieldVar::zero(), FieldVar::zero());
    for x in inputs {
        state.0 = &state.0 + x;
        state = mimc_feistel(sys, params, state)?;
    }

    let mut outputs = Vec::with_capacity(num_outputs);
    for i in 0..num_outputs {
        if i > 0 {
            state = mimc_feistel(sys, params, state)?;
        }
        outputs.push(state.0.clone());
    }
    Ok(outputs)
}

/// Hashes `num_inputs` private field elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct MimcSpongeCircuit<F: PrimeField> {
    pub params: MimcParams<F>,
    pub num_inputs: usize,
    pub num_outputs: usize,
}

impl<F: PrimeField> SnarkyCircuit<F> for MimcSpongeCircuit<F> {
    type Input = Vec<F>;
    type Output = Vec<FieldVar<F>>;

    fn circuit(
        &self,
        sys: &mut RunState<F>,
        input: Option<&Self::Input>,
    ) -> SnarkyResult<Self::Output> {
        let values = match input {
            Some(input) if input.len() != self.num_inputs => {
                return Err(SnarkyRuntimeError::InputLength {
                    what: "MiMC input".into(),
                    expected: self.num_inputs,
                    got: input.len(),
                }
                .into());
            }
            Some(input) => input.clone(),
            None if sys.has_witness => {
                return Err(SnarkyRuntimeError::MissingInput(loc!()).into());
            }
            None => vec![],
        };

        let inputs: Vec<FieldVar<F>> = sys.compute_vec(loc!(), self.num_inputs, move |_| values)?;

        mimc_sponge(sys, &self.params, &inputs, self.num_outputs)
    }
}
