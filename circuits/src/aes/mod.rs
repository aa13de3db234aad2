//! The AES block cipher (FIPS-197) over boolean vectors.
//!
//! A block is 16 bytes, each a [BitsVar] of 8 bits. Byte `k` of a block sits at
//! row `k % 4` and column `k / 4` of the state.

pub mod constants;
pub mod ctr;
pub mod sbox;

use std::borrow::Cow;

use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};

use self::{
    constants::{SubstitutionTable, AES_SBOX, RCON},
    sbox::substitute,
};
use crate::{
    gadgets::bits::{BitsVar, BytesVar},
    loc,
    snarky::{
        api::SnarkyCircuit,
        boolean::Boolean,
        checked_runner::RunState,
        errors::{SnarkyCompilationError, SnarkyResult},
    },
};

pub use ctr::{aes_ctr_xor, AesCtrCircuit, AesCtrInput};

/// The bytes of a block.
pub const BLOCK_BYTES: usize = 16;

/// The three AES variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AesKeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl AesKeySize {
    pub fn rounds(&self) -> usize {
        match self {
            AesKeySize::Aes128 => 10,
            AesKeySize::Aes192 => 12,
            AesKeySize::Aes256 => 14,
        }
    }

    /// Number of 32-bit words of the key (`Nk`).
    pub fn key_words(&self) -> usize {
        match self {
            AesKeySize::Aes128 => 4,
            AesKeySize::Aes192 => 6,
            AesKeySize::Aes256 => 8,
        }
    }

    pub fn key_bytes(&self) -> usize {
        4 * self.key_words()
    }
}

impl TryFrom<usize> for AesKeySize {
    type Error = SnarkyCompilationError;

    /// From a key length in bytes.
    fn try_from(len: usize) -> Result<Self, Self::Error> {
        match len {
            16 => Ok(AesKeySize::Aes128),
            24 => Ok(AesKeySize::Aes192),
            32 => Ok(AesKeySize::Aes256),
            _ => Err(SnarkyCompilationError::UnsupportedKeyLength(len)),
        }
    }
}

type Word<F> = Vec<BitsVar<F>>;

fn sub_word<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    table: &SubstitutionTable,
    word: &[BitsVar<F>],
) -> SnarkyResult<Word<F>> {
    word.iter()
        .map(|byte| substitute(sys, loc.clone(), table, byte))
        .collect()
}

fn xor_bytes<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    a: &[BitsVar<F>],
    b: &[BitsVar<F>],
) -> SnarkyResult<Vec<BitsVar<F>>> {
    a.iter()
        .zip(b)
        .map(|(a, b)| a.xor(b, sys, loc.clone()))
        .collect()
}

/// Expands a key into `rounds + 1` round keys of 16 bytes.
pub fn key_expansion<F: PrimeField>(
    sys: &mut RunState<F>,
    table: &SubstitutionTable,
    key_size: AesKeySize,
    key: &BitsVar<F>,
) -> SnarkyResult<Vec<Vec<BitsVar<F>>>> {
    if key.len() != 8 * key_size.key_bytes() {
        return Err(SnarkyCompilationError::WidthMismatch {
            what: "AES key".into(),
            expected: 8 * key_size.key_bytes(),
            got: key.len(),
        }
        .into());
    }

    let nk = key_size.key_words();
    let total_words = 4 * (key_size.rounds() + 1);

    let bytes = key.chunks(8);
    let mut words: Vec<Word<F>> = bytes.chunks(4).map(<[_]>::to_vec).collect();

    for i in nk..total_words {
        let mut temp = words[i - 1].clone();
        if i % nk == 0 {
            temp.rotate_left(1);
            temp = sub_word(sys, loc!(), table, &temp)?;
            let rcon = BitsVar::constant_bytes(&[RCON[i / nk - 1]]);
            temp[0] = temp[0].xor(&rcon, sys, loc!())?;
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(sys, loc!(), table, &temp)?;
        }
        let word = xor_bytes(sys, loc!(), &words[i - nk], &temp)?;
        words.push(word);
    }

    Ok(words.chunks(4).map(|round| round.concat()).collect())
}

fn shift_rows<F: PrimeField>(state: &[BitsVar<F>]) -> Vec<BitsVar<F>> {
    (0..BLOCK_BYTES)
        .map(|k| {
            let (row, col) = (k % 4, k / 4);
            state[row + 4 * ((col + row) % 4)].clone()
        })
        .collect()
}

/// Multiplication by x in GF(2^8): a shift, and a reduction by 0x1b when the top bit is set.
fn xtime<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    byte: &BitsVar<F>,
) -> SnarkyResult<BitsVar<F>> {
    let a = byte.bits();
    let reduce = |sys: &mut RunState<F>, bit: &Boolean<F>| a[7].xor(bit, sys, loc.clone());
    Ok(BitsVar::new(vec![
        a[7].clone(),
        reduce(sys, &a[0])?,
        a[1].clone(),
        reduce(sys, &a[2])?,
        reduce(sys, &a[3])?,
        a[4].clone(),
        a[5].clone(),
        a[6].clone(),
    ]))
}

fn mix_columns<F: PrimeField>(
    sys: &mut RunState<F>,
    state: &[BitsVar<F>],
) -> SnarkyResult<Vec<BitsVar<F>>> {
    let mut out = Vec::with_capacity(BLOCK_BYTES);
    for column in state.chunks(4) {
        // b_i = a_i ^ t ^ xtime(a_i ^ a_{i+1}), with t the xor of the column
        let t = column[0].xor(&column[1], sys, loc!())?;
        let t = t.xor(&column[2], sys, loc!())?;
        let t = t.xor(&column[3], sys, loc!())?;
        for i in 0..4 {
            let a = &column[i];
            let next = &column[(i + 1) % 4];
            let pair = a.xor(next, sys, loc!())?;
            let doubled = xtime(sys, loc!(), &pair)?;
            let b = a.xor(&t, sys, loc!())?.xor(&doubled, sys, loc!())?;
            out.push(b);
        }
    }
    Ok(out)
}

/// Encrypts a block (16 bytes) with expanded round keys.
pub fn encrypt_block<F: PrimeField>(
    sys: &mut RunState<F>,
    table: &SubstitutionTable,
    round_keys: &[Vec<BitsVar<F>>],
    block: &[BitsVar<F>],
) -> SnarkyResult<Vec<BitsVar<F>>> {
    if block.len() != BLOCK_BYTES {
        return Err(SnarkyCompilationError::WidthMismatch {
            what: "AES block".into(),
            expected: BLOCK_BYTES,
            got: block.len(),
        }
        .into());
    }
    let rounds = round_keys.len().saturating_sub(1);
    if rounds == 0 {
        return Err(SnarkyCompilationError::InvalidParameter(
            "AES needs at least two round keys".to_string(),
        )
        .into());
    }

    let mut state = xor_bytes(sys, loc!(), block, &round_keys[0])?;
    for (round, round_key) in round_keys.iter().enumerate().skip(1) {
        let substituted = sub_word(sys, loc!(), table, &state)?;
        let shifted = shift_rows(&substituted);
        let mixed = if round < rounds {
            mix_columns(sys, &shifted)?
        } else {
            shifted
        };
        state = xor_bytes(sys, loc!(), &mixed, round_key)?;
    }

    Ok(state)
}

/// Encrypts a single block. Mostly useful to check the cipher against block vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AesBlockCircuit {
    pub key_size: AesKeySize,
}

#[derive(Debug, Clone)]
pub struct AesBlockInput {
    pub key: Vec<u8>,
    pub block: [u8; BLOCK_BYTES],
}

impl<F: PrimeField> SnarkyCircuit<F> for AesBlockCircuit {
    type Input = AesBlockInput;
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
        let block = BitsVar::witness_bytes(
            sys,
            loc!(),
            "AES block",
            BLOCK_BYTES,
            input.map(|i| &i.block[..]),
        )?;

        let round_keys = key_expansion(sys, &AES_SBOX, self.key_size, &key)?;
        let out = encrypt_block(sys, &AES_SBOX, &round_keys, &block.chunks(8))?;

        Ok(BytesVar(BitsVar::concat(&out)))
    }
}
