//! Small helpers on top of arkworks used across the cipher circuits:
//! field element encodings, bit and byte conversions, and serde adapters.

pub mod bits;
pub mod field_helpers;
pub mod serialization;

pub use bits::{
    bits_to_bytes_le, bits_to_u32_le, bytes_to_bits_be, bytes_to_bits_le, u32_to_bits_le,
};
pub use field_helpers::{FieldHelpers, FieldHelpersError};
