//! Commitments to a ChaCha20 decryption.
//!
//! The circuit decrypts a ciphertext with a private key, and commits to both the
//! plaintext and the ciphertext: each is packed into field elements of `chunk_bits`
//! bits and hashed with the MiMC sponge. Before packing, the bits of each byte are
//! laid out in the configured [ByteBitOrder].

use ark_ff::PrimeField;
use cipher_utils::{
    bytes_to_bits_be, bytes_to_bits_le, field_helpers::FieldHelpersError, FieldHelpers,
};
use mimc_sponge::{MimcParams, MimcSponge};
use serde::{Deserialize, Serialize};

use crate::{
    chacha::{chacha20_encrypt_bytes, native::chacha20_xor},
    gadgets::{
        bits::{pack_bits, BitsVar},
        uint32::UInt32Var,
    },
    loc,
    mimc::mimc_sponge,
    snarky::{
        api::SnarkyCircuit, checked_runner::RunState, cvar::FieldVar, errors::SnarkyResult,
    },
};

/// 31 bytes, the largest whole number of bytes that fits in a BN254 scalar.
pub const DEFAULT_CHUNK_BITS: usize = 248;

/// Order of the bits of each byte in the packed stream. Chunks are always read
/// little-endian; this only decides which end of a byte comes first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteBitOrder {
    #[default]
    LsbFirst,
    /// Each byte most-significant bit first, as a big-endian bit dump of the message.
    MsbFirst,
}

impl ByteBitOrder {
    fn arrange<F: PrimeField>(self, bits: &BitsVar<F>) -> BitsVar<F> {
        match self {
            ByteBitOrder::LsbFirst => bits.clone(),
            ByteBitOrder::MsbFirst => bits.reverse_bits_in_bytes(),
        }
    }

    fn expand(self, bytes: &[u8]) -> Vec<bool> {
        match self {
            ByteBitOrder::LsbFirst => bytes_to_bits_le(bytes),
            ByteBitOrder::MsbFirst => bytes_to_bits_be(bytes),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct ChaCha20CommitmentCircuit<F: PrimeField> {
    pub len_bytes: usize,
    pub chunk_bits: usize,
    #[serde(default)]
    pub bit_order: ByteBitOrder,
    pub params: MimcParams<F>,
}

impl<F: PrimeField> ChaCha20CommitmentCircuit<F> {
    pub fn new(len_bytes: usize) -> Self {
        Self {
            len_bytes,
            chunk_bits: DEFAULT_CHUNK_BITS,
            bit_order: ByteBitOrder::default(),
            params: MimcParams::default_sponge(),
        }
    }

    /// Sets how message bits are laid out and chunked before hashing.
    pub fn with_packing(mut self, bit_order: ByteBitOrder, chunk_bits: usize) -> Self {
        self.bit_order = bit_order;
        self.chunk_bits = chunk_bits;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaCha20CommitmentInput {
    pub key: [u8; 32],
    pub nonce: [u8; 12],
    pub counter: u32,
    pub ciphertext: Vec<u8>,
}

fn commit<F: PrimeField>(
    sys: &mut RunState<F>,
    params: &MimcParams<F>,
    bits: &BitsVar<F>,
    bit_order: ByteBitOrder,
    chunk_bits: usize,
) -> SnarkyResult<FieldVar<F>> {
    let packed = pack_bits(&bit_order.arrange(bits), chunk_bits)?;
    let mut digest = mimc_sponge(sys, params, &packed, 1)?;
    Ok(digest.remove(0))
}

impl<F: PrimeField> SnarkyCircuit<F> for ChaCha20CommitmentCircuit<F> {
    type Input = ChaCha20CommitmentInput;

    /// The commitments to the plaintext and to the ciphertext.
    type Output = (FieldVar<F>, FieldVar<F>);

    fn circuit(
        &self,
        sys: &mut RunState<F>,
        input: Option<&Self::Input>,
    ) -> SnarkyResult<Self::Output> {
        let key = BitsVar::witness_bytes(sys, loc!(), "ChaCha20 key", 32, input.map(|i| &i.key[..]))?;
        let nonce =
            BitsVar::witness_bytes(sys, loc!(), "ChaCha20 nonce", 12, input.map(|i| &i.nonce[..]))?;
        let counter = UInt32Var::witness(sys, loc!(), input.map(|i| i.counter))?;
        let ciphertext = BitsVar::witness_bytes(
            sys,
            loc!(),
            "ciphertext",
            self.len_bytes,
            input.map(|i| i.ciphertext.as_slice()),
        )?;

        let plaintext = chacha20_encrypt_bytes(sys, loc!(), &key, &nonce, &counter, &ciphertext)?;

        let plaintext_commitment =
            commit(sys, &self.params, &plaintext, self.bit_order, self.chunk_bits)?;
        let ciphertext_commitment =
            commit(sys, &self.params, &ciphertext, self.bit_order, self.chunk_bits)?;

        Ok((plaintext_commitment, ciphertext_commitment))
    }
}

fn commit_native<F: PrimeField>(
    params: &MimcParams<F>,
    bytes: &[u8],
    bit_order: ByteBitOrder,
    chunk_bits: usize,
) -> Result<F, FieldHelpersError> {
    let packed = bit_order
        .expand(bytes)
        .chunks(chunk_bits)
        .map(F::from_bits)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MimcSponge::hash(params, &packed, 1)[0])
}

/// Computes the outputs of [ChaCha20CommitmentCircuit] outside of the circuit.
pub fn commitments_native<F: PrimeField>(
    circuit: &ChaCha20CommitmentCircuit<F>,
    input: &ChaCha20CommitmentInput,
) -> Result<(F, F), FieldHelpersError> {
    let plaintext = chacha20_xor(&input.key, &input.nonce, input.counter, &input.ciphertext);
    Ok((
        commit_native(&circuit.params, &plaintext, circuit.bit_order, circuit.chunk_bits)?,
        commit_native(
            &circuit.params,
            &input.ciphertext,
            circuit.bit_order,
            circuit.chunk_bits,
        )?,
    ))
}
