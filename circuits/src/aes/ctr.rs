//! AES in counter mode.
//!
//! Keystream block `i` is `AES(key, iv || be32(initial_counter + i))`, and the message is
//! XORed with as many keystream bits as it has. Encryption and decryption are the same circuit.

use std::borrow::Cow;

use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};

use super::{constants::AES_SBOX, encrypt_block, key_expansion, AesKeySize, BLOCK_BYTES};
use crate::{
    gadgets::bits::{BitsVar, BytesVar},
    loc,
    snarky::{
        api::SnarkyCircuit,
        checked_runner::RunState,
        errors::{SnarkyCompilationError, SnarkyResult},
    },
};

/// The bytes of the IV, the rest of a counter block is the 32-bit counter.
pub const IV_BYTES: usize = 12;

/// The first counter used by the TLS 1.3 record layer (counter 1 is kept for GCM's tag).
pub const DEFAULT_INITIAL_COUNTER: u32 = 2;

/// XORs `message` with the AES-CTR keystream.
///
/// The counters are constants of the circuit, so a message long enough to overflow the
/// 32-bit counter is rejected at compilation.
pub fn aes_ctr_xor<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    key_size: AesKeySize,
    key: &BitsVar<F>,
    iv: &BitsVar<F>,
    initial_counter: u32,
    message: &BitsVar<F>,
) -> SnarkyResult<BitsVar<F>> {
    if iv.len() != 8 * IV_BYTES {
        return Err(SnarkyCompilationError::WidthMismatch {
            what: "AES-CTR IV".into(),
            expected: 8 * IV_BYTES,
            got: iv.len(),
        }
        .into());
    }
    if message.len() % 8 != 0 {
        return Err(SnarkyCompilationError::WidthMismatch {
            what: "AES-CTR message".into(),
            expected: 8 * message.len().div_ceil(8),
            got: message.len(),
        }
        .into());
    }

    let blocks = (message.len() / 8).div_ceil(BLOCK_BYTES);
    if blocks == 0 {
        return Ok(BitsVar::new(vec![]));
    }
    if u64::from(initial_counter) + blocks as u64 - 1 > u64::from(u32::MAX) {
        return Err(SnarkyCompilationError::CounterOverflow {
            initial: initial_counter,
            blocks,
        }
        .into());
    }

    let round_keys = key_expansion(sys, &AES_SBOX, key_size, key)?;
    let iv = iv.chunks(8);

    let mut keystream = Vec::with_capacity(blocks * BLOCK_BYTES);
    for i in 0..blocks {
        let counter = initial_counter + i as u32;
        let mut block = iv.clone();
        block.extend(BitsVar::constant_bytes(&counter.to_be_bytes()).chunks(8));
        keystream.extend(encrypt_block(sys, &AES_SBOX, &round_keys, &block)?);
    }

    let keystream = BitsVar::concat(&keystream).take(message.len());
    message.xor(&keystream, sys, loc)
}

/// Encrypts (or decrypts) a message of `len_bytes` bytes with AES-CTR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AesCtrCircuit {
    pub key_size: AesKeySize,
    pub len_bytes: usize,
    pub initial_counter: u32,
}

impl AesCtrCircuit {
    /// A circuit for a key of `key_bytes` bytes, starting at the default counter.
    pub fn new(key_bytes: usize, len_bytes: usize) -> SnarkyResult<Self> {
        Ok(Self {
            key_size: AesKeySize::try_from(key_bytes)?,
            len_bytes,
            initial_counter: DEFAULT_INITIAL_COUNTER,
        })
    }

    pub fn with_initial_counter(mut self, initial_counter: u32) -> Self {
        self.initial_counter = initial_counter;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AesCtrInput {
    pub key: Vec<u8>,
    pub iv: [u8; IV_BYTES],
    pub message: Vec<u8>,
}

impl<F: PrimeField> SnarkyCircuit<F> for AesCtrCircuit {
    type Input = AesCtrInput;
    type Output = BytesVar<F>;

    fn circuit(
        &self,
        sys: &mut RunState<F>,
        input: Option<&Self::Input>,
    ) -> SnarkyResult<Self::Output> {
        let key = BitsVar::witness_bytes(
            sys,
            loc!(),
            "AES key",
            self.key_size.key_bytes(),
            input.map(|i| i.key.as_slice()),
        )?;
        let iv =
            BitsVar::witness_bytes(sys, loc!(), "IV", IV_BYTES, input.map(|i| &i.iv[..]))?;
        let message = BitsVar::witness_bytes(
            sys,
            loc!(),
            "message",
            self.len_bytes,
            input.map(|i| i.message.as_slice()),
        )?;

        let out = aes_ctr_xor(
            sys,
            loc!(),
            self.key_size,
            &key,
            &iv,
            self.initial_counter,
            &message,
        )?;

        Ok(BytesVar(out))
    }
}
