//! 32-bit words, with addition modulo 2^32.

use std::borrow::Cow;

use ark_ff::PrimeField;
use cipher_utils::{bits_to_u32_le, u32_to_bits_le};

use super::bits::BitsVar;
use crate::snarky::{
    checked_runner::{RunState, WitnessGeneration},
    cvar::FieldVar,
    errors::{SnarkyCompilationError, SnarkyResult},
    traits::CircuitOutput,
};

/// A 32-bit word, as 32 checked bits (least-significant first).
#[derive(Debug, Clone)]
pub struct UInt32Var<F: PrimeField> {
    bits: BitsVar<F>,
}

impl<F: PrimeField> UInt32Var<F> {
    pub const WIDTH: usize = 32;

    pub fn constant(word: u32) -> Self {
        Self {
            bits: BitsVar::constant_bits(&u32_to_bits_le(word)),
        }
    }

    pub fn witness(
        sys: &mut RunState<F>,
        loc: Cow<'static, str>,
        word: Option<u32>,
    ) -> SnarkyResult<Self> {
        let bits = word.map(u32_to_bits_le);
        let bits = BitsVar::witness_bits(sys, loc, Self::WIDTH, bits.as_deref())?;
        Ok(Self { bits })
    }

    pub fn from_bits(bits: BitsVar<F>) -> SnarkyResult<Self> {
        if bits.len() != Self::WIDTH {
            return Err(SnarkyCompilationError::WidthMismatch {
                what: "32-bit word".into(),
                expected: Self::WIDTH,
                got: bits.len(),
            }
            .into());
        }
        Ok(Self { bits })
    }

    pub fn bits(&self) -> &BitsVar<F> {
        &self.bits
    }

    pub fn into_bits(self) -> BitsVar<F> {
        self.bits
    }

    pub fn to_constant(&self) -> Option<u32> {
        self.bits.to_constant().map(|bits| bits_to_u32_le(&bits))
    }

    /// The word as a single field element.
    pub fn value_var(&self) -> FieldVar<F> {
        self.bits.to_field()
    }

    pub fn xor(
        &self,
        other: &Self,
        sys: &mut RunState<F>,
        loc: Cow<'static, str>,
    ) -> SnarkyResult<Self> {
        Ok(Self {
            bits: self.bits.xor(&other.bits, sys, loc)?,
        })
    }

    pub fn rotate_left(&self, n: usize) -> Self {
        Self {
            bits: self.bits.rotate_left(n),
        }
    }

    /// Adds `words` modulo 2^32.
    ///
    /// The sum of k words fits in 32 + ceil(log2 k) bits: it is decomposed at that
    /// width, and only the low 32 bits are kept.
    pub fn wrapping_add_many(
        sys: &mut RunState<F>,
        loc: Cow<'static, str>,
        words: &[&Self],
    ) -> SnarkyResult<Self> {
        let k = words.len();
        if k == 0 {
            return Ok(Self::constant(0));
        }

        let carry_bits = (usize::BITS - (k - 1).leading_zeros()) as usize;
        let width = Self::WIDTH + carry_bits;

        let values: Vec<_> = words.iter().map(|w| w.value_var()).collect();
        let sum = FieldVar::sum(&values.iter().collect::<Vec<_>>());

        let bits = BitsVar::from_field(sys, loc, &sum, width)?;
        Self::from_bits(bits.take(Self::WIDTH))
    }

    pub fn wrapping_add(
        &self,
        other: &Self,
        sys: &mut RunState<F>,
        loc: Cow<'static, str>,
    ) -> SnarkyResult<Self> {
        Self::wrapping_add_many(sys, loc, &[self, other])
    }

    pub fn read<G: WitnessGeneration<F>>(&self, g: G) -> u32 {
        bits_to_u32_le(&self.bits.read(g))
    }
}

impl<F: PrimeField> CircuitOutput<F> for UInt32Var<F> {
    type OutOfCircuit = u32;

    fn read_output(&self, env: &dyn WitnessGeneration<F>) -> u32 {
        self.read(env)
    }
}
