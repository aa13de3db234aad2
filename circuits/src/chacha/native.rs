//! Out-of-circuit ChaCha20 (RFC 8439), used to produce expected values.

use super::{CHACHA20_CONSTANTS, CHACHA20_QRS, CHACHA20_ROTATIONS};

/// Runs the 20 rounds on a state, without the final addition.
pub fn chacha20_rounds(mut s: [u32; 16]) -> [u32; 16] {
    let mut line = |x: usize, y: usize, z: usize, k: u32| {
        s[x] = u32::wrapping_add(s[x], s[z]);
        s[y] ^= s[x];
        s[y] = s[y].rotate_left(k);
    };
    for _ in 0..10 {
        for [a, b, c, d] in CHACHA20_QRS {
            line(a, d, b, CHACHA20_ROTATIONS[0]);
            line(c, b, d, CHACHA20_ROTATIONS[1]);
            line(a, d, b, CHACHA20_ROTATIONS[2]);
            line(c, b, d, CHACHA20_ROTATIONS[3]);
        }
    }
    s
}

pub fn initial_state(key: &[u32; 8], counter: u32, nonce: &[u32; 3]) -> [u32; 16] {
    let mut s = [0u32; 16];
    s[..4].copy_from_slice(&CHACHA20_CONSTANTS);
    s[4..12].copy_from_slice(key);
    s[12] = counter;
    s[13..].copy_from_slice(nonce);
    s
}

/// A keystream block, as 16 words.
pub fn chacha20_block(key: &[u32; 8], counter: u32, nonce: &[u32; 3]) -> [u32; 16] {
    let s0 = initial_state(key, counter, nonce);
    let mut s = chacha20_rounds(s0);
    for (w, w0) in s.iter_mut().zip(s0) {
        *w = w.wrapping_add(w0);
    }
    s
}

/// Reads little-endian words; a trailing partial word is zero-padded.
pub fn words_from_le_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_le_bytes(word)
        })
        .collect()
}

/// XORs `message` with the keystream starting at block `counter`.
pub fn chacha20_xor(key: &[u8; 32], nonce: &[u8; 12], counter: u32, message: &[u8]) -> Vec<u8> {
    let key: [u32; 8] = words_array(key);
    let nonce: [u32; 3] = words_array(nonce);

    let mut counter = counter;
    let mut out = Vec::with_capacity(message.len());
    for chunk in message.chunks(64) {
        let keystream = chacha20_block(&key, counter, &nonce);
        let keystream = keystream.iter().flat_map(|w| w.to_le_bytes());
        out.extend(chunk.iter().zip(keystream).map(|(m, k)| m ^ k));
        counter = counter.wrapping_add(1);
    }
    out
}

fn words_array<const N: usize>(bytes: &[u8]) -> [u32; N] {
    let mut words = [0u32; N];
    for (w, chunk) in words.iter_mut().zip(bytes.chunks(4)) {
        *w = words_from_le_bytes(chunk)[0];
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_round_vector() {
        // RFC 8439, section 2.1.1, through a state holding the quarter round in its first column
        let mut s = [0u32; 16];
        s[0] = 0x11111111;
        s[4] = 0x01020304;
        s[8] = 0x9b8d6f43;
        s[12] = 0x01234567;

        let mut line = |x: usize, y: usize, z: usize, k: u32| {
            s[x] = u32::wrapping_add(s[x], s[z]);
            s[y] ^= s[x];
            s[y] = s[y].rotate_left(k);
        };
        let [a, b, c, d] = CHACHA20_QRS[0];
        line(a, d, b, 16);
        line(c, b, d, 12);
        line(a, d, b, 8);
        line(c, b, d, 7);

        assert_eq!(
            [s[0], s[4], s[8], s[12]],
            [0xea2a92f4, 0xcb1cf8ce, 0x4581472e, 0x5881c4bb]
        );
    }

    #[test]
    fn block_vector() {
        // RFC 8439, section 2.3.2
        let key: [u32; 8] = words_array(&(0u8..32).collect::<Vec<_>>());
        let nonce = [0x09000000, 0x4a000000, 0x00000000];
        let block = chacha20_block(&key, 1, &nonce);
        assert_eq!(block[0], 0xe4e7f110);
        assert_eq!(block[15], 0x4e3c50a2);
    }

    #[test]
    fn zero_key_short_message() {
        assert_eq!(
            chacha20_xor(&[0; 32], &[0; 12], 1, &[49, 50, 51, 52]),
            vec![174, 53, 212, 138]
        );
    }
}
