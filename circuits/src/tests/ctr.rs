use crate::{
    aes::{AesCtrCircuit, AesCtrInput},
    snarky::{
        api::{CompiledCircuit, SnarkyCircuit},
        errors::{SnarkyCompilationError, SnarkyError},
    },
};
use ark_bn254::Fr;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

#[derive(Deserialize)]
struct CtrVector {
    name: String,
    #[serde(with = "hex")]
    key: Vec<u8>,
    #[serde(with = "hex")]
    iv: Vec<u8>,
    initial_counter: u32,
    #[serde(with = "hex")]
    plaintext: Vec<u8>,
    #[serde(with = "hex")]
    ciphertext: Vec<u8>,
}

fn vectors() -> Vec<CtrVector> {
    serde_json::from_str(include_str!("vectors/aes_ctr.json")).unwrap()
}

fn iv(bytes: &[u8]) -> [u8; 12] {
    bytes.try_into().unwrap()
}

fn compile(circuit: AesCtrCircuit) -> CompiledCircuit<Fr, AesCtrCircuit> {
    SnarkyCircuit::<Fr>::compile(circuit).unwrap()
}

#[test]
fn test_ctr_vectors() {
    for v in vectors() {
        let circuit = AesCtrCircuit::new(v.key.len(), v.plaintext.len())
            .unwrap()
            .with_initial_counter(v.initial_counter);
        let compiled = compile(circuit);

        let encrypt = AesCtrInput {
            key: v.key.clone(),
            iv: iv(&v.iv),
            message: v.plaintext.clone(),
        };
        let (_, ciphertext) = compiled.generate_witness(&encrypt).unwrap();
        assert_eq!(ciphertext, v.ciphertext, "{}", v.name);

        // decryption is the same circuit
        let decrypt = AesCtrInput {
            message: v.ciphertext,
            ..encrypt
        };
        compiled
            .expect_output(&decrypt, &v.plaintext)
            .unwrap_or_else(|e| panic!("{}: {e}", v.name));
    }
}

#[test]
fn test_partial_blocks() {
    let v = &vectors()[0];
    for len in [1, 15, 16, 17] {
        let circuit = AesCtrCircuit::new(v.key.len(), len)
            .unwrap()
            .with_initial_counter(v.initial_counter);
        let input = AesCtrInput {
            key: v.key.clone(),
            iv: iv(&v.iv),
            message: v.plaintext[..len].to_vec(),
        };
        compile(circuit)
            .expect_output(&input, &v.ciphertext[..len].to_vec())
            .unwrap();
    }
}

#[test]
fn test_empty_message() {
    let compiled = compile(AesCtrCircuit::new(16, 0).unwrap());
    // only the booleanity of the key and IV bits
    assert_eq!(compiled.num_constraints(), 8 * (16 + 12));

    let input = AesCtrInput {
        key: vec![0; 16],
        iv: [0; 12],
        message: vec![],
    };
    let (_, out) = compiled.generate_witness(&input).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_counter_overflow() {
    let circuit = AesCtrCircuit::new(16, 33)
        .unwrap()
        .with_initial_counter(u32::MAX);
    assert!(matches!(
        SnarkyCircuit::<Fr>::compile(circuit),
        Err(SnarkyError::CompilationError(
            SnarkyCompilationError::CounterOverflow {
                initial: u32::MAX,
                blocks: 3
            }
        ))
    ));

    // the last counter value is still usable
    let circuit = AesCtrCircuit::new(16, 16)
        .unwrap()
        .with_initial_counter(u32::MAX);
    assert!(SnarkyCircuit::<Fr>::compile(circuit).is_ok());
}

#[test]
fn test_random_keys() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for key_bytes in [16, 24, 32] {
        let mut key = vec![0u8; key_bytes];
        rng.fill(&mut key[..]);
        let message: Vec<u8> = (0..40).map(|_| rng.gen()).collect();
        let input = AesCtrInput {
            key,
            iv: rng.gen(),
            message: message.clone(),
        };

        let compiled = compile(AesCtrCircuit::new(key_bytes, message.len()).unwrap());
        let (_, ciphertext) = compiled.generate_witness(&input).unwrap();
        assert_ne!(ciphertext, message);

        let input = AesCtrInput {
            message: ciphertext,
            ..input
        };
        compiled.expect_output(&input, &message).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    #[test]
    fn test_ctr_is_an_involution(
        key in any::<[u8; 16]>(),
        iv in any::<[u8; 12]>(),
        message in proptest::collection::vec(any::<u8>(), 20),
    ) {
        let compiled = compile(AesCtrCircuit::new(16, 20).unwrap());
        let input = AesCtrInput { key: key.to_vec(), iv, message: message.clone() };
        let (_, ciphertext) = compiled.generate_witness(&input).unwrap();

        let input = AesCtrInput { message: ciphertext, ..input };
        let (_, plaintext) = compiled.generate_witness(&input).unwrap();
        prop_assert_eq!(plaintext, message);
    }
}
