//! Conversions between field elements, their canonical bytes and little-endian bits.

use ark_ff::Field;
use thiserror::Error;

// Field helpers error
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHelpersError {
    #[error("failed to deserialize field bytes")]
    DeserializeBytes,
    #[error("too many bits for the field: got {0}, the field holds at most {1}")]
    TooManyBits(usize, usize),
}
pub type Result<T> = std::result::Result<T, FieldHelpersError>;

/// Field element helpers
pub trait FieldHelpers<F> {
    /// Deserialize from bytes
    fn from_bytes(bytes: &[u8]) -> Result<F>;

    /// Deserialize from little-endian bits
    fn from_bits(bits: &[bool]) -> Result<F>;

    /// Serialize to bytes
    fn to_bytes(&self) -> Vec<u8>;
}

impl<F: Field> FieldHelpers<F> for F {
    fn from_bytes(bytes: &[u8]) -> Result<F> {
        F::deserialize_compressed(&mut &*bytes).map_err(|_| FieldHelpersError::DeserializeBytes)
    }

    fn from_bits(bits: &[bool]) -> Result<F> {
        let mut bytes = F::zero().to_bytes();
        let capacity = bytes.len() * 8;
        if bits.len() > capacity {
            return Err(FieldHelpersError::TooManyBits(bits.len(), capacity));
        }

        for (i, bit) in bits.iter().enumerate() {
            bytes[i / 8] |= (*bit as u8) << (i % 8);
        }

        F::from_bytes(&bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = vec![];
        self.serialize_compressed(&mut bytes)
            .expect("Failed to serialize field");

        bytes
    }
}
