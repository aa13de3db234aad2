use crate::{
    gadgets::uint32::UInt32Var,
    loc,
    snarky::{api::SnarkyCircuit, checked_runner::RunState, errors::SnarkyResult},
};
use ark_bn254::Fr;
use proptest::prelude::*;

struct AddCircuit {
    words: usize,
}

impl SnarkyCircuit<Fr> for AddCircuit {
    type Input = Vec<u32>;
    type Output = UInt32Var<Fr>;

    fn circuit(
        &self,
        sys: &mut RunState<Fr>,
        input: Option<&Self::Input>,
    ) -> SnarkyResult<Self::Output> {
        let words = (0..self.words)
            .map(|i| UInt32Var::witness(sys, loc!(), input.map(|words| words[i])))
            .collect::<SnarkyResult<Vec<_>>>()?;
        let words: Vec<_> = words.iter().collect();
        UInt32Var::wrapping_add_many(sys, loc!(), &words)
    }
}

#[test]
fn test_wrapping_add_cost() {
    let compiled = SnarkyCircuit::<Fr>::compile(AddCircuit { words: 2 }).unwrap();
    // 64 input booleans, 33 for the sum and its packing
    assert_eq!(compiled.num_constraints(), 64 + 33 + 1);

    let compiled = SnarkyCircuit::<Fr>::compile(AddCircuit { words: 5 }).unwrap();
    assert_eq!(compiled.num_constraints(), 5 * 32 + 35 + 1);
}

#[test]
fn test_wrapping_add_wraps() {
    let compiled = SnarkyCircuit::<Fr>::compile(AddCircuit { words: 2 }).unwrap();
    compiled
        .expect_output(&vec![u32::MAX, 1], &0)
        .unwrap();
    compiled
        .expect_output(&vec![0x8000_0000, 0x8000_0001], &1)
        .unwrap();
}

#[test]
fn test_constant_words_fold() {
    let mut sys = RunState::<Fr>::new(true);
    let a = UInt32Var::constant(0xffff_fff0);
    let b = UInt32Var::constant(0x20);
    let sum = a.wrapping_add(&b, &mut sys, loc!()).unwrap();
    assert_eq!(sum.to_constant(), Some(0x10));
    assert_eq!(a.rotate_left(4).to_constant(), Some(0xffff_ff0f));
    assert_eq!(sys.next_var, 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_wrapping_add_many(words in proptest::collection::vec(any::<u32>(), 1..6)) {
        let compiled = SnarkyCircuit::<Fr>::compile(AddCircuit { words: words.len() }).unwrap();
        let expected = words.iter().fold(0u32, |acc, w| acc.wrapping_add(*w));
        let (_, sum) = compiled.generate_witness(&words).unwrap();
        prop_assert_eq!(sum, expected);
    }
}
