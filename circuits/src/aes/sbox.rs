//! The S-box as a table lookup over one-hot nibble selectors.
//!
//! For a byte with nibbles `(lo, hi)`, the one-hot vectors `lo_l = [lo == l]` and
//! `hi_h = [hi == h]` select the entry `S[16 h + l]`:
//!
//! ```text
//! out = sum_h hi_h * (sum_l lo_l * S[16 h + l])
//! ```
//!
//! The inner sums are linear. Each one-hot vector costs 18 products (2 for the
//! selectors of each pair of bits, 16 to combine the pairs), the outer sum 16 more,
//! and `out` is then decomposed into 8 checked bits.

use std::borrow::Cow;

use ark_ff::PrimeField;
use cipher_utils::bits_to_bytes_le;

use super::constants::SubstitutionTable;
use crate::{
    gadgets::bits::BitsVar,
    snarky::{
        boolean::Boolean,
        checked_runner::RunState,
        cvar::FieldVar,
        errors::{SnarkyCompilationError, SnarkyResult},
    },
};

/// The selectors `[x + 2y == i]` for `i` in `0..4`, one product.
fn pair_selectors<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    x: &FieldVar<F>,
    y: &FieldVar<F>,
) -> SnarkyResult<[FieldVar<F>; 4]> {
    let p = x.mul(y, Some("aes.sbox.pair".into()), loc, sys)?;
    Ok([FieldVar::one() - x - y + &p, x - &p, y - &p, p])
}

/// The selectors `[nibble == v]` for `v` in `0..16`.
fn nibble_selectors<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    bits: &[Boolean<F>],
) -> SnarkyResult<Vec<FieldVar<F>>> {
    let bits: Vec<_> = bits.iter().map(Boolean::to_field_var).collect();
    let low = pair_selectors(sys, loc.clone(), &bits[0], &bits[1])?;
    let high = pair_selectors(sys, loc.clone(), &bits[2], &bits[3])?;

    let mut selectors = Vec::with_capacity(16);
    for h in &high {
        for l in &low {
            selectors.push(l.mul(h, Some("aes.sbox.nibble".into()), loc.clone(), sys)?);
        }
    }
    Ok(selectors)
}

/// Substitutes a byte (8 bits) through `table`.
pub fn substitute<F: PrimeField>(
    sys: &mut RunState<F>,
    loc: Cow<'static, str>,
    table: &SubstitutionTable,
    byte: &BitsVar<F>,
) -> SnarkyResult<BitsVar<F>> {
    if byte.len() != 8 {
        return Err(SnarkyCompilationError::WidthMismatch {
            what: "S-box input".into(),
            expected: 8,
            got: byte.len(),
        }
        .into());
    }

    if let Some(bits) = byte.to_constant() {
        let x = bits_to_bytes_le(&bits)[0];
        return Ok(BitsVar::constant_bytes(&[table.lookup(x)]));
    }

    let lo = nibble_selectors(sys, loc.clone(), &byte.bits()[..4])?;
    let hi = nibble_selectors(sys, loc.clone(), &byte.bits()[4..])?;

    let entries = table.entries();
    let mut out = FieldVar::zero();
    for (h, hi_h) in hi.iter().enumerate() {
        let row: Vec<_> = lo
            .iter()
            .enumerate()
            .map(|(l, lo_l)| (F::from(entries[16 * h + l]), lo_l.clone()))
            .collect();
        let row = FieldVar::linear_combination(&row);
        out = out + hi_h.mul(&row, Some("aes.sbox.select".into()), loc.clone(), sys)?;
    }

    BitsVar::from_field(sys, loc, &out, 8)
}
