use crate::{
    loc,
    mimc::{pow, MimcSpongeCircuit},
    snarky::{
        api::SnarkyCircuit,
        checked_runner::RunState,
        cvar::FieldVar,
        errors::{SnarkyError, SnarkyResult, SnarkyRuntimeError},
    },
};
use ark_bn254::Fr;
use ark_ff::{Field, UniformRand};
use mimc_sponge::{MimcParams, MimcSponge};
use rand::{rngs::StdRng, SeedableRng};
use std::str::FromStr;

fn fr(decimal: &str) -> Fr {
    Fr::from_str(decimal).unwrap()
}

fn vector_input() -> Vec<Fr> {
    vec![
        Fr::from(0u64),
        Fr::from(1u64),
        fr("567778336660098848776366662228888333"),
    ]
}

#[test]
fn test_mimc_sponge_vector() {
    let circuit = MimcSpongeCircuit {
        params: MimcParams::default_sponge(),
        num_inputs: 3,
        num_outputs: 2,
    };
    let compiled = SnarkyCircuit::<Fr>::compile(circuit).unwrap();
    // one permutation per input and per extra output, 3 products per round
    assert_eq!(compiled.num_constraints(), (3 + 1) * 220 * 3);

    compiled
        .expect_output(
            &vector_input(),
            &vec![
                fr("12525131868496031425744154881744336661020056362076131525086600857748260152186"),
                fr("107160996140643481529509144817482077155451694047485604476533597862135880398"),
            ],
        )
        .unwrap();
}

#[test]
fn test_mimc_matches_native() {
    let params = MimcParams::<Fr>::from_seed(b"mimc", 91, 7)
        .unwrap()
        .with_key(Fr::from(42u64));
    let circuit = MimcSpongeCircuit {
        params: params.clone(),
        num_inputs: 5,
        num_outputs: 3,
    };
    let compiled = SnarkyCircuit::<Fr>::compile(circuit).unwrap();
    assert_eq!(compiled.num_constraints(), (5 + 2) * 91 * 4);

    let mut rng = StdRng::seed_from_u64(7);
    let inputs: Vec<Fr> = (0..5).map(|_| Fr::rand(&mut rng)).collect();
    let expected = MimcSponge::hash(&params, &inputs, 3);
    compiled.expect_output(&inputs, &expected).unwrap();
}

#[test]
fn test_mimc_round_count_changes_the_digest() {
    let inputs = vector_input();
    let digests: Vec<Fr> = [10, 11]
        .into_iter()
        .map(|rounds| {
            let circuit = MimcSpongeCircuit {
                params: MimcParams::from_seed(b"mimcsponge", rounds, 5).unwrap(),
                num_inputs: 3,
                num_outputs: 1,
            };
            let compiled = SnarkyCircuit::<Fr>::compile(circuit).unwrap();
            let (_, digest) = compiled.generate_witness(&inputs).unwrap();
            digest[0]
        })
        .collect();
    assert_ne!(digests[0], digests[1]);
}

#[test]
fn test_mimc_input_length() {
    let circuit = MimcSpongeCircuit {
        params: MimcParams::default_sponge(),
        num_inputs: 2,
        num_outputs: 1,
    };
    let compiled = SnarkyCircuit::<Fr>::compile(circuit).unwrap();
    assert!(matches!(
        compiled.generate_witness(&vector_input()),
        Err(SnarkyError::RuntimeError(SnarkyRuntimeError::InputLength {
            expected: 2,
            got: 3,
            ..
        }))
    ));
}

#[test]
fn test_mimc_witness_without_input() {
    let circuit = MimcSpongeCircuit {
        params: MimcParams::<Fr>::default_sponge(),
        num_inputs: 3,
        num_outputs: 1,
    };
    let mut sys = RunState::<Fr>::new_witness(true);
    assert!(matches!(
        circuit.circuit(&mut sys, None),
        Err(SnarkyError::RuntimeError(SnarkyRuntimeError::MissingInput(_)))
    ));
}

#[test]
fn test_mimc_no_input() {
    // the digest of nothing is the zero state, no permutation runs
    let circuit = MimcSpongeCircuit {
        params: MimcParams::default_sponge(),
        num_inputs: 0,
        num_outputs: 1,
    };
    let compiled = SnarkyCircuit::<Fr>::compile(circuit).unwrap();
    assert_eq!(compiled.num_constraints(), 0);
    compiled.expect_output(&vec![], &vec![Fr::from(0u64)]).unwrap();
}

struct PowCircuit {
    exponent: u64,
}

impl SnarkyCircuit<Fr> for PowCircuit {
    type Input = Fr;
    type Output = FieldVar<Fr>;

    fn circuit(
        &self,
        sys: &mut RunState<Fr>,
        input: Option<&Self::Input>,
    ) -> SnarkyResult<Self::Output> {
        let x: FieldVar<Fr> = sys.compute(loc!(), |_| *input.unwrap())?;
        pow(sys, loc!(), &x, self.exponent)
    }
}

#[test]
fn test_pow() {
    let x = Fr::from(3u64);
    for (exponent, products) in [(0, 0), (1, 0), (2, 1), (5, 3), (7, 4), (17, 5)] {
        let compiled = SnarkyCircuit::<Fr>::compile(PowCircuit { exponent }).unwrap();
        assert_eq!(compiled.num_constraints(), products, "x^{exponent}");
        compiled.expect_output(&x, &x.pow([exponent])).unwrap();
    }
}
