//! Boolean vectors, and the constrained conversions between a field element and its bits.
//!
//! Bits are stored least-significant first. A vector of bytes is the concatenation
//! of the bits of each byte, in message order.

use std::borrow::Cow;

use ark_ff::{BigInteger, PrimeField};
use cipher_utils::{bits_to_bytes_le, bytes_to_bits_le};
use itertools::{iterate, Itertools};

use crate::snarky::{
    boolean::Boolean,
    checked_runner::{RunState, WitnessGeneration},
    cvar::FieldVar,
    errors::{SnarkyCompilationError, SnarkyResult, SnarkyRuntimeError},
    traits::{CircuitOutput, SnarkyType},
};

/// An ordered vector of checked booleans, least-significant bit first.
#[derive(Debug, Clone)]
pub struct BitsVar<F: PrimeField> {
    bits: Vec<Boolean<F>>,
}

impl<F: PrimeField> BitsVar<F> {
    pub fn new(bits: Vec<Boolean<F>>) -> Self {
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[Boolean<F>] {
        &self.bits
    }

    pub fn into_bits(self) -> Vec<Boolean<F>> {
        self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = &Boolean<F>> {
        self.bits.iter()
    }

    pub fn constant_bits(bits: &[bool]) -> Self {
        Self::new(bits.iter().map(|b| Boolean::constant(*b)).collect())
    }

    pub fn constant_bytes(bytes: &[u8]) -> Self {
        Self::constant_bits(&bytes_to_bits_le(bytes))
    }

    /// Returns the value of the vector if every bit is a constant.
    pub fn to_constant(&self) -> Option<Vec<bool>> {
        self.bits.iter().map(Boolean::to_constant).collect()
    }

    /// Allocates `len` checked bits.
    /// `value` is only read in witness generation, where it must be present.
    pub fn witness_bits(
        sys: &mut RunState<F>,
        loc: Cow<'static, str>,
        len: usize,
        value: Option<&[bool]>,
    ) -> SnarkyResult<Self> {
        let value = match value {
            Some(value) => value.to_vec(),
            None if sys.has_witness => return Err(SnarkyRuntimeError::MissingInput(loc).into()),
            None => vec![],
        };
        let bits: Vec<Boolean<F>> = sys.compute_vec(loc, len, move |_| value)?;
        Ok(Self::new(bits))
    }

    /// Allocates the checked bits of `len_bytes` bytes.
    /// In witness generation, an input of another length is rejected.
    pub fn witness_bytes(
        sys: &mut RunState<F>,
        loc: Cow<'static, str>,
        what: &'static str,
        len_bytes: usize,
        value: Option<&[u8]>,
    ) -> SnarkyResult<Self> {
        if let Some(bytes) = value {
            if bytes.len() != len_bytes {
                return Err(SnarkyRuntimeError::InputLength {
                    what: what.into(),
                    expected: len_bytes,
                    got: bytes.len(),
                }
                .into());
            }
        }
        let bits = value.map(bytes_to_bits_le);
        Self::witness_bits(sys, loc, len_bytes * 8, bits.as_deref())
    }

    /// Decomposes `x` into `width` checked bits, and constrains them to pack back to `x`.
    /// This doubles as a range check: a value of `width` bits or more cannot be decomposed.
    pub fn from_field(
        sys: &mut RunState<F>,
        loc: Cow<'static, str>,
        x: &FieldVar<F>,
        width: usize,
    ) -> SnarkyResult<Self> {
        if width >= F::MODULUS_BIT_SIZE as usize {
            return Err(SnarkyCompilationError::FieldTooSmall {
                field_bits: F::MODULUS_BIT_SIZE,
                needed: width + 1,
            }
            .into());
        }

        if let Some(c) = x.to_constant() {
            let bits = c.into_bigint().to_bits_le();
            if bits.iter().skip(width).any(|b| *b) {
                return Err(SnarkyCompilationError::ConstantAssertEquals(
                    c.to_string(),
                    format!("a {width}-bit value"),
                )
                .into());
            }
            return Ok(Self::constant_bits(&bits[..width]));
        }

        let x_clone = x.clone();
        let bits: Vec<Boolean<F>> = sys.compute_vec(loc.clone(), width, move |env| {
            let value = env.read_var(&x_clone);
            value
                .into_bigint()
                .to_bits_le()
                .into_iter()
                .take(width)
                .collect()
        })?;
        let bits = Self::new(bits);

        bits.to_field().assert_equals(sys, loc, x)?;

        Ok(bits)
    }

    /// Packs the bits into a single field element, `sum 2^i b_i`. No constraint.
    pub fn to_field(&self) -> FieldVar<F> {
        let terms = iterate(F::one(), |c| c.double())
            .zip(&self.bits)
            .map(|(coeff, bit)| (coeff, bit.to_field_var()))
            .collect_vec();
        FieldVar::linear_combination(&terms)
    }

    fn check_width(&self, other: &Self, what: &'static str) -> SnarkyResult<()> {
        if self.len() != other.len() {
            return Err(SnarkyCompilationError::WidthMismatch {
                what: what.into(),
                expected: self.len(),
                got: other.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Bitwise XOR, one constraint per bit that is not a constant.
    pub fn xor(
        &self,
        other: &Self,
        sys: &mut RunState<F>,
        loc: Cow<'static, str>,
    ) -> SnarkyResult<Self> {
        self.check_width(other, "xor operand")?;
        let bits = self
            .bits
            .iter()
            .zip(&other.bits)
            .map(|(a, b)| a.xor(b, sys, loc.clone()))
            .collect::<SnarkyResult<_>>()?;
        Ok(Self::new(bits))
    }

    /// Bitwise AND.
    pub fn and(
        &self,
        other: &Self,
        sys: &mut RunState<F>,
        loc: Cow<'static, str>,
    ) -> SnarkyResult<Self> {
        self.check_width(other, "and operand")?;
        let bits = self
            .bits
            .iter()
            .zip(&other.bits)
            .map(|(a, b)| a.and(b, sys, loc.clone()))
            .collect::<SnarkyResult<_>>()?;
        Ok(Self::new(bits))
    }

    /// Bitwise negation, free.
    pub fn not(&self) -> Self {
        Self::new(self.bits.iter().map(Boolean::not).collect())
    }

    /// Rotates the value of the vector left (towards the most significant bit). Free.
    pub fn rotate_left(&self, n: usize) -> Self {
        let mut bits = self.bits.clone();
        if !bits.is_empty() {
            let n = n % bits.len();
            bits.rotate_right(n);
        }
        Self::new(bits)
    }

    /// Rotates the value of the vector right (towards the least significant bit). Free.
    pub fn rotate_right(&self, n: usize) -> Self {
        let mut bits = self.bits.clone();
        if !bits.is_empty() {
            let n = n % bits.len();
            bits.rotate_left(n);
        }
        Self::new(bits)
    }

    /// Reverses the bit order inside each byte, turning an LSB-first byte string into
    /// an MSB-first one and back. A trailing partial byte is reversed as is. Free.
    pub fn reverse_bits_in_bytes(&self) -> Self {
        Self::new(
            self.bits
                .chunks(8)
                .flat_map(|byte| byte.iter().rev().cloned())
                .collect(),
        )
    }

    pub fn concat(parts: &[Self]) -> Self {
        Self::new(parts.iter().flat_map(|p| p.bits.iter().cloned()).collect())
    }

    /// The first `len` bits.
    pub fn take(&self, len: usize) -> Self {
        Self::new(self.bits.iter().take(len).cloned().collect())
    }

    /// Splits the vector into chunks of `size` bits; the last one can be shorter.
    pub fn chunks(&self, size: usize) -> Vec<Self> {
        self.bits
            .chunks(size)
            .map(|chunk| Self::new(chunk.to_vec()))
            .collect()
    }

    /// Reads the value of every bit.
    pub fn read<G: WitnessGeneration<F>>(&self, g: G) -> Vec<bool> {
        self.bits.iter().map(|b| b.read(&g)).collect()
    }
}

/// Packs bits into field elements of at most `chunk` bits each, least-significant first.
/// The packing is injective as long as a chunk fits in the field.
pub fn pack_bits<F: PrimeField>(bits: &BitsVar<F>, chunk: usize) -> SnarkyResult<Vec<FieldVar<F>>> {
    if chunk == 0 {
        return Err(SnarkyCompilationError::InvalidParameter(
            "cannot pack bits into chunks of 0 bits".to_string(),
        )
        .into());
    }
    if chunk >= F::MODULUS_BIT_SIZE as usize {
        return Err(SnarkyCompilationError::FieldTooSmall {
            field_bits: F::MODULUS_BIT_SIZE,
            needed: chunk + 1,
        }
        .into());
    }
    Ok(bits.chunks(chunk).iter().map(BitsVar::to_field).collect())
}

impl<F: PrimeField> CircuitOutput<F> for BitsVar<F> {
    type OutOfCircuit = Vec<bool>;

    fn read_output(&self, env: &dyn WitnessGeneration<F>) -> Vec<bool> {
        self.read(env)
    }
}

/// A [BitsVar] whose length is a whole number of bytes, read back as bytes.
#[derive(Debug, Clone)]
pub struct BytesVar<F: PrimeField>(pub BitsVar<F>);

impl<F: PrimeField> BytesVar<F> {
    pub fn len_bytes(&self) -> usize {
        self.0.len() / 8
    }
}

impl<F: PrimeField> CircuitOutput<F> for BytesVar<F> {
    type OutOfCircuit = Vec<u8>;

    fn read_output(&self, env: &dyn WitnessGeneration<F>) -> Vec<u8> {
        bits_to_bytes_le(&self.0.read(env))
    }
}
