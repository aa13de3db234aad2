//! Bit layout conversions.
//!
//! Every bit vector in this workspace is least-significant bit first within a byte,
//! and bytes appear in message order. A little-endian 32-bit word therefore has the
//! same bit layout as its four serialized bytes.

/// Expands bytes into bits, least-significant bit of each byte first.
pub fn bytes_to_bits_le(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|byte| (0..8).map(move |i| (byte >> i) & 1 == 1))
        .collect()
}

/// Expands bytes into bits, most-significant bit of each byte first.
pub fn bytes_to_bits_be(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect()
}

/// Packs bits back into bytes. A trailing partial byte is zero-padded.
pub fn bits_to_bytes_le(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, bit)| byte | ((*bit as u8) << i))
        })
        .collect()
}

/// The 32 bits of a word, least-significant first.
pub fn u32_to_bits_le(word: u32) -> Vec<bool> {
    (0..32).map(|i| (word >> i) & 1 == 1).collect()
}

/// Reads a word from (at most) 32 little-endian bits.
pub fn bits_to_u32_le(bits: &[bool]) -> u32 {
    bits.iter()
        .take(32)
        .enumerate()
        .fold(0u32, |word, (i, bit)| word | ((*bit as u32) << i))
}
