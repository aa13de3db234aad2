//! ChaCha20 (RFC 8439) over 32-bit words.
//!
//! The state is 16 words: 4 constants, 8 key words, the block counter and 3 nonce words.
//! Words are little-endian, so the bits of a word are the bits of its 4 serialized bytes.

pub mod native;

use std::borrow::Cow;

use ark_ff::PrimeField;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    gadgets::{bits::BitsVar, uint32::UInt32Var},
    loc,
    snarky::{
        api::SnarkyCircuit,
        checked_runner::RunState,
        errors::{SnarkyCompilationError, SnarkyResult, SnarkyRuntimeError},
    },
};

/// "expand 32-byte k"
pub const CHACHA20_CONSTANTS: [u32; 4] = [0x61707865, 0x3320646e, 0x79622d32, 0x6b206574];

pub const CHACHA20_ROTATIONS: [u32; 4] = [16, 12, 8, 7];

/// The quarter rounds of a double round: the columns, then the diagonals.
pub const CHACHA20_QRS: [[usize; 4]; 8] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14],
];

pub const BLOCK_WORDS: usize = 16;
pub const KEY_WORDS: usize = 8;
pub const NONCE_WORDS: usize = 3;

/// `s[x] += s[z]; s[y] ^= s[x]; s[y] <<<= k`
fn line<F: PrimeField>(
    sys: &mut RunState<F>,
    state: &mut [UInt32Var<F>],
    x: usize,
    y: usize,
    z: usize,
    k: u32,
) -> SnarkyResult<()> {
    state[x] = state[x].wrapping_add(&state[z], sys, loc!())?;
    state[y] = state[y].xor(&state[x], sys, loc!())?.rotate_left(k as usize);
    Ok(())
}

/// The quarter round on words `a`, `b`, `c` and `d` of the state.
pub fn quarter_round<F: PrimeField>(
    sys: &mut RunState<F>,
    state: &mut [UInt32Var<F>],
    a: usize,
    b: usize,
    c: usize,
    d: usize,
) -> SnarkyResult<()> {
    line(sys, state, a, d, b, CHACHA20_ROTATIONS[0])?;
    line(sys, state, c, b, d, CHACHA20_ROTATIONS[1])?;
    line(sys, state, a, d, b, CHACHA20_ROTATIONS[2])?;
    line(sys, state, c, b, d, CHACHA20_ROTATIONS[3])
}

fn check_words<F: PrimeField>(
    words: &[UInt32Var<F>],
    expected: usize,
    what: &'static str,
) -> SnarkyResult<()> {
    if words.len() != expected {
        return Err(SnarkyCompilationError::WidthMismatch {
            what: what.into(),
            expected: 32 * expected,
            got: 32 * words.len(),
        }
        .into());
    }
    Ok(())
}

/// A keystream block: 20 rounds, then the initial state added back.
pub fn chacha20_block<F: PrimeField>(
    sys: &mut RunState<F>,
    key: &[UInt32Var<F>],
    counter: &UInt32Var<F>,
    nonce: &[UInt32Var<F>],
) -> SnarkyResult<Vec<UInt32Var<F>>> {
    check_words(key, KEY_WORDS, "ChaCha20 key")?;
    check_words(nonce, NONCE_WORDS, "ChaCha20 nonce")?;

    let mut initial: Vec<UInt32Var<F>> = CHACHA20_CONSTANTS
        .iter()
        .map(|c| UInt32Var::constant(*c))
        .collect();
    initial.extend_from_slice(key);
    initial.push(counter.clone());
    initial.extend_from_slice(nonce);

    let mut state = initial.clone();
    for _ in 0..10 {
        for [a, b, c, d] in CHACHA20_QRS {
            quarter_round(sys, &mut state, a, b, c, d)?;
        }
    }

    state
        .iter()
        .zip(&initial)
        .map(|(w, w0)| w.wrapping_add(w0, sys, loc!()))
        .collect()
}

/// XORs `message` with the keystream, one block per 16 words.
/// The counter is incremented (modulo 2^32) in the circuit between blocks.
pub fn chacha20_xor_words<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    key: &[UInt32Var<F>],
    nonce: &[UInt32Var<F>],
    counter: &UInt32Var<F>,
    message: &[UInt32Var<F>],
) -> SnarkyResult<Vec<UInt32Var<F>>> {
    let mut counter = counter.clone();
    let mut out = Vec::with_capacity(message.len());
    for (i, chunk) in message.chunks(BLOCK_WORDS).enumerate() {
        if i > 0 {
            counter = counter.wrapping_add(&UInt32Var::constant(1), sys, loc.clone())?;
        }
        let keystream = chacha20_block(sys, key, &counter, nonce)?;
        for (m, k) in chunk.iter().zip(&keystream) {
            out.push(m.xor(k, sys, loc.clone())?);
        }
    }
    Ok(out)
}

fn words_of<F: PrimeField>(bits: &BitsVar<F>) -> SnarkyResult<Vec<UInt32Var<F>>> {
    bits.chunks(32).into_iter().map(UInt32Var::from_bits).collect()
}

/// Same as [chacha20_xor_words], for a message of any number of bytes given as bits.
pub fn chacha20_encrypt_bytes<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    key: &BitsVar<F>,
    nonce: &BitsVar<F>,
    counter: &UInt32Var<F>,
    message: &BitsVar<F>,
) -> SnarkyResult<BitsVar<F>> {
    if key.len() != 32 * KEY_WORDS {
        return Err(SnarkyCompilationError::WidthMismatch {
            what: "ChaCha20 key".into(),
            expected: 32 * KEY_WORDS,
            got: key.len(),
        }
        .into());
    }
    if nonce.len() != 32 * NONCE_WORDS {
        return Err(SnarkyCompilationError::WidthMismatch {
            what: "ChaCha20 nonce".into(),
            expected: 32 * NONCE_WORDS,
            got: nonce.len(),
        }
        .into());
    }
    let key = words_of(key)?;
    let nonce = words_of(nonce)?;

    let mut counter = counter.clone();
    let mut out = Vec::with_capacity(message.len());
    for (i, chunk) in message.chunks(32 * BLOCK_WORDS).into_iter().enumerate() {
        if i > 0 {
            counter = counter.wrapping_add(&UInt32Var::constant(1), sys, loc.clone())?;
        }
        let keystream = chacha20_block(sys, &key, &counter, &nonce)?;
        let keystream = keystream.into_iter().map(UInt32Var::into_bits).collect_vec();
        let keystream = BitsVar::concat(&keystream).take(chunk.len());
        out.push(chunk.xor(&keystream, sys, loc.clone())?);
    }
    Ok(BitsVar::concat(&out))
}

/// Encrypts (or decrypts) a message of `len_words` little-endian words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaCha20Circuit {
    pub len_words: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaCha20Input {
    pub key: [u32; KEY_WORDS],
    pub nonce: [u32; NONCE_WORDS],
    pub counter: u32,
    pub message: Vec<u32>,
}

fn witness_words<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    len: usize,
    words: Option<&[u32]>,
) -> SnarkyResult<Vec<UInt32Var<F>>> {
    (0..len)
        .map(|i| UInt32Var::witness(sys, loc.clone(), words.map(|w| w[i])))
        .collect()
}

impl<F: PrimeField> SnarkyCircuit<F> for ChaCha20Circuit {
    type Input = ChaCha20Input;
    type Output = Vec<UInt32Var<F>>;

    fn circuit(
        &self,
        sys: &mut RunState<F>,
        input: Option<&Self::Input>,
    ) -> SnarkyResult<Self::Output> {
        if let Some(input) = input {
            if input.message.len() != self.len_words {
                return Err(SnarkyRuntimeError::InputLength {
                    what: "message (in words)".into(),
                    expected: self.len_words,
                    got: input.message.len(),
                }
                .into());
            }
        }

        let key = witness_words(sys, loc!(), KEY_WORDS, input.map(|i| &i.key[..]))?;
        let nonce = witness_words(sys, loc!(), NONCE_WORDS, input.map(|i| &i.nonce[..]))?;
        let counter = UInt32Var::witness(sys, loc!(), input.map(|i| i.counter))?;
        let message = witness_words(
            sys,
            loc!(),
            self.len_words,
            input.map(|i| i.message.as_slice()),
        )?;

        chacha20_xor_words(sys, loc!(), &key, &nonce, &counter, &message)
    }
}
