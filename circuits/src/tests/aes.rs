use crate::{
    aes::{
        constants::AES_SBOX, key_expansion, AesBlockCircuit, AesBlockInput, AesCtrCircuit,
        AesKeySize,
    },
    gadgets::bits::BitsVar,
    snarky::{
        api::SnarkyCircuit,
        checked_runner::RunState,
        errors::{SnarkyCompilationError, SnarkyError, SnarkyRuntimeError},
    },
};
use ark_bn254::Fr;

const FIPS_197_PLAINTEXT: &str = "00112233445566778899aabbccddeeff";

fn sequential_key(len: usize) -> Vec<u8> {
    (0..len as u8).collect()
}

fn check_block(key_size: AesKeySize, expected: &str) {
    let compiled = SnarkyCircuit::<Fr>::compile(AesBlockCircuit { key_size }).unwrap();
    let mut block = [0u8; 16];
    block.copy_from_slice(&hex::decode(FIPS_197_PLAINTEXT).unwrap());
    let input = AesBlockInput {
        key: sequential_key(key_size.key_bytes()),
        block,
    };
    compiled
        .expect_output(&input, &hex::decode(expected).unwrap())
        .unwrap();
}

// FIPS-197, appendix C

#[test]
fn test_aes128_block() {
    check_block(AesKeySize::Aes128, "69c4e0d86a7b0430d8cdb78070b4c55a");
}

#[test]
fn test_aes192_block() {
    check_block(AesKeySize::Aes192, "dda97ca4864cdfe06eaf70a0ec0d7191");
}

#[test]
fn test_aes256_block() {
    check_block(AesKeySize::Aes256, "8ea2b7ca516745bfeafc49904b496089");
}

#[test]
fn test_key_size_changes_the_output() {
    // same key byte pattern and plaintext, only the key size differs
    let mut block = [0u8; 16];
    block.copy_from_slice(&hex::decode(FIPS_197_PLAINTEXT).unwrap());
    let outputs: Vec<Vec<u8>> = [AesKeySize::Aes128, AesKeySize::Aes192, AesKeySize::Aes256]
        .into_iter()
        .map(|key_size| {
            let compiled = SnarkyCircuit::<Fr>::compile(AesBlockCircuit { key_size }).unwrap();
            let input = AesBlockInput {
                key: vec![7; key_size.key_bytes()],
                block,
            };
            let (_, out) = compiled.generate_witness(&input).unwrap();
            out
        })
        .collect();
    assert_ne!(outputs[0], outputs[1]);
    assert_ne!(outputs[1], outputs[2]);
    assert_ne!(outputs[0], outputs[2]);
}

#[test]
fn test_key_sizes() {
    for (bytes, size, rounds) in [
        (16, AesKeySize::Aes128, 10),
        (24, AesKeySize::Aes192, 12),
        (32, AesKeySize::Aes256, 14),
    ] {
        assert_eq!(AesKeySize::try_from(bytes).unwrap(), size);
        assert_eq!(size.rounds(), rounds);
        assert_eq!(size.key_bytes(), bytes);
    }
}

#[test]
fn test_unsupported_key_length() {
    assert!(matches!(
        AesCtrCircuit::new(20, 16),
        Err(SnarkyError::CompilationError(
            SnarkyCompilationError::UnsupportedKeyLength(20)
        ))
    ));
}

#[test]
fn test_key_schedule() {
    // FIPS-197, appendix A.1: the last round key of 2b7e1516 28aed2a6 abf71588 09cf4f3c
    let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
    let mut sys = RunState::<Fr>::new(true);
    let key = BitsVar::constant_bytes(&key);
    let round_keys = key_expansion(&mut sys, &AES_SBOX, AesKeySize::Aes128, &key).unwrap();
    assert_eq!(round_keys.len(), 11);

    // a constant key is expanded without any constraint
    let last = BitsVar::concat(&round_keys[10]).to_constant().unwrap();
    assert_eq!(
        cipher_utils::bits_to_bytes_le(&last),
        hex::decode("d014f9a8c9ee2589e13f0cc8b6630ca6").unwrap()
    );
    assert_eq!(sys.system.unwrap().num_constraints(), 0);
}

#[test]
fn test_key_schedule_width() {
    let mut sys = RunState::<Fr>::new(true);
    let key = BitsVar::constant_bytes(&[0; 16]);
    assert!(matches!(
        key_expansion(&mut sys, &AES_SBOX, AesKeySize::Aes256, &key),
        Err(SnarkyError::CompilationError(
            SnarkyCompilationError::WidthMismatch { .. }
        ))
    ));
}

#[test]
fn test_wrong_key_input() {
    let compiled = SnarkyCircuit::<Fr>::compile(AesBlockCircuit {
        key_size: AesKeySize::Aes128,
    })
    .unwrap();
    let input = AesBlockInput {
        key: sequential_key(32),
        block: [0; 16],
    };
    assert!(matches!(
        compiled.generate_witness(&input),
        Err(SnarkyError::RuntimeError(SnarkyRuntimeError::InputLength {
            expected: 16,
            got: 32,
            ..
        }))
    ));
}

#[test]
fn test_tampered_key_bit() {
    let compiled = SnarkyCircuit::<Fr>::compile(AesBlockCircuit {
        key_size: AesKeySize::Aes128,
    })
    .unwrap();
    let mut block = [0u8; 16];
    block.copy_from_slice(&hex::decode(FIPS_197_PLAINTEXT).unwrap());
    let input = AesBlockInput {
        key: sequential_key(16),
        block,
    };
    let (mut witness, _) = compiled.generate_witness(&input).unwrap();

    // the first key bit is the first variable
    witness.0[0] = Fr::from(2u64);
    match compiled.system.is_satisfied(&witness) {
        Err(SnarkyRuntimeError::UnsatisfiedR1CSConstraint(label, ..)) => {
            assert!(label.starts_with("boolean check"), "{label}")
        }
        res => panic!("unexpected result: {res:?}"),
    }
}
