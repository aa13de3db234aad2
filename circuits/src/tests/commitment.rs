use crate::{
    chacha::native::chacha20_xor,
    commitment::{
        commitments_native, ByteBitOrder, ChaCha20CommitmentCircuit, ChaCha20CommitmentInput,
    },
    snarky::{
        api::SnarkyCircuit,
        errors::{SnarkyCompilationError, SnarkyError},
    },
};
use ark_bn254::Fr;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_input(rng: &mut StdRng, len: usize) -> ChaCha20CommitmentInput {
    ChaCha20CommitmentInput {
        key: rng.gen(),
        nonce: rng.gen(),
        counter: rng.gen(),
        ciphertext: (0..len).map(|_| rng.gen()).collect(),
    }
}

#[test]
fn test_commitments_match_native() {
    let mut rng = StdRng::seed_from_u64(1);
    // one chunk, then a full chunk and a partial one
    for len in [5, 40] {
        let circuit = ChaCha20CommitmentCircuit::<Fr>::new(len);
        let input = random_input(&mut rng, len);
        let expected = commitments_native(&circuit, &input).unwrap();

        let compiled = SnarkyCircuit::<Fr>::compile(circuit).unwrap();
        compiled.expect_output(&input, &expected).unwrap();
    }
}

#[test]
fn test_commitment_binds_plaintext() {
    let mut rng = StdRng::seed_from_u64(2);
    let input = random_input(&mut rng, 16);
    let circuit = ChaCha20CommitmentCircuit::<Fr>::new(16);
    let (plaintext, ciphertext) = commitments_native(&circuit, &input).unwrap();
    assert_ne!(plaintext, ciphertext);

    // another key decrypts to another plaintext, the ciphertext commitment is unchanged
    let other = ChaCha20CommitmentInput {
        key: [0; 32],
        ..input.clone()
    };
    let (other_plaintext, other_ciphertext) = commitments_native(&circuit, &other).unwrap();
    assert_ne!(plaintext, other_plaintext);
    assert_eq!(ciphertext, other_ciphertext);

    // encrypting with the same key and nonce is decrypting
    let decrypted = chacha20_xor(&input.key, &input.nonce, input.counter, &input.ciphertext);
    let reencrypted = chacha20_xor(&input.key, &input.nonce, input.counter, &decrypted);
    assert_eq!(reencrypted, input.ciphertext);
}

#[test]
fn test_chunk_sizes() {
    let mut circuit = ChaCha20CommitmentCircuit::<Fr>::new(8);

    circuit.chunk_bits = 0;
    assert!(matches!(
        SnarkyCircuit::<Fr>::compile(circuit.clone()),
        Err(SnarkyError::CompilationError(
            SnarkyCompilationError::InvalidParameter(_)
        ))
    ));

    circuit.chunk_bits = 254;
    assert!(matches!(
        SnarkyCircuit::<Fr>::compile(circuit.clone()),
        Err(SnarkyError::CompilationError(
            SnarkyCompilationError::FieldTooSmall { field_bits: 254, .. }
        ))
    ));

    circuit.chunk_bits = 8;
    let input = random_input(&mut StdRng::seed_from_u64(3), 8);
    let expected = commitments_native(&circuit, &input).unwrap();
    SnarkyCircuit::<Fr>::compile(circuit)
        .unwrap()
        .expect_output(&input, &expected)
        .unwrap();
}

#[test]
fn test_msb_first_packing() {
    let mut rng = StdRng::seed_from_u64(4);
    // 32 bytes: one 250-bit chunk and a 6-bit tail
    let input = random_input(&mut rng, 32);

    let lsb_first = ChaCha20CommitmentCircuit::<Fr>::new(32);
    let msb_first =
        ChaCha20CommitmentCircuit::<Fr>::new(32).with_packing(ByteBitOrder::MsbFirst, 250);
    let expected = commitments_native(&msb_first, &input).unwrap();
    assert_ne!(expected, commitments_native(&lsb_first, &input).unwrap());

    SnarkyCircuit::<Fr>::compile(msb_first)
        .unwrap()
        .expect_output(&input, &expected)
        .unwrap();
}

#[test]
fn test_bit_order_defaults_when_absent() {
    let circuit = ChaCha20CommitmentCircuit::<Fr>::new(4);
    let mut json = serde_json::to_value(&circuit).unwrap();
    assert_eq!(json["bit_order"], "LsbFirst");

    json.as_object_mut().unwrap().remove("bit_order");
    let parsed: ChaCha20CommitmentCircuit<Fr> = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.bit_order, ByteBitOrder::LsbFirst);
    assert_eq!(parsed.chunk_bits, circuit.chunk_bits);
}
