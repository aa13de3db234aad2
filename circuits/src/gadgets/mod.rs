//! Bit-level gadgets shared by the ciphers.

pub mod bits;
pub mod uint32;

pub use bits::{pack_bits, BitsVar, BytesVar};
pub use uint32::UInt32Var;
