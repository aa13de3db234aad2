//! Traits.

use std::{borrow::Cow, fmt::Debug};

use ark_ff::PrimeField;

use super::{
    checked_runner::{RunState, WitnessGeneration},
    cvar::FieldVar,
    errors::SnarkyResult,
};

/// A snarky type is a type that can be used in a circuit.
/// It references an equivalent "out-of-circuit" type that one can use outside of the circuit.
/// (For example, to construct private inputs to the circuit.)
pub trait SnarkyType<F>: Sized
where
    F: PrimeField,
{
    /// Some 'out-of-circuit' data, which is carried as part of Self.
    /// This data isn't encoded as FieldVars in the circuit, and is only used by witness computations.
    type Auxiliary;

    /// The equivalent "out-of-circuit" type.
    /// For example, the [super::boolean::Boolean] snarky type has an out-of-circuit type of [bool].
    type OutOfCircuit;

    /// The number of field elements that this type takes.
    const SIZE_IN_FIELD_ELEMENTS: usize;

    /// Returns the circuit variables (and auxiliary data) behind this type.
    fn to_cvars(&self) -> (Vec<FieldVar<F>>, Self::Auxiliary);

    /// Creates a new instance of this type from the given circuit variables (And some auxiliary data).
    fn from_cvars_unsafe(cvars: Vec<FieldVar<F>>, aux: Self::Auxiliary) -> Self;

    /// Checks that the circuit variables behind this type are valid.
    /// For some definition of valid.
    /// For example, a Boolean snarky type would check that the field element representing it is either 0 or 1.
    /// The function does this by adding constraints to your constraint system.
    fn check(&self, cs: &mut RunState<F>, loc: Cow<'static, str>) -> SnarkyResult<()>;

    /// The "default" value of [Self::Auxiliary].
    /// This is passed to [Self::from_cvars_unsafe] when we are not generating a witness,
    /// since we have no candidate value to get the auxiliary data from.
    fn constraint_system_auxiliary() -> Self::Auxiliary;

    /// Converts an out-of-circuit value into field elements.
    fn value_to_field_elements(value: &Self::OutOfCircuit) -> (Vec<F>, Self::Auxiliary);

    /// Converts field elements back into an out-of-circuit value.
    fn value_of_field_elements(fields: Vec<F>, aux: Self::Auxiliary) -> Self::OutOfCircuit;

    fn read<G>(&self, g: G) -> Self::OutOfCircuit
    where
        G: WitnessGeneration<F>,
    {
        let (cvars, aux) = self.to_cvars();
        let values = cvars.iter().map(|cvar| g.read_var(cvar)).collect();
        Self::value_of_field_elements(values, aux)
    }
}

/// What a circuit returns: the variables it exposes,
/// and how to read their value once a witness has been generated.
pub trait CircuitOutput<F>
where
    F: PrimeField,
{
    /// The out-of-circuit value of the output.
    type OutOfCircuit: Debug + PartialEq;

    /// Reads the value of the output.
    fn read_output(&self, env: &dyn WitnessGeneration<F>) -> Self::OutOfCircuit;
}

//
// Auto traits
//

impl<F> SnarkyType<F> for ()
where
    F: PrimeField,
{
    type Auxiliary = ();

    type OutOfCircuit = ();

    const SIZE_IN_FIELD_ELEMENTS: usize = 0;

    fn to_cvars(&self) -> (Vec<FieldVar<F>>, Self::Auxiliary) {
        (vec![], ())
    }

    fn from_cvars_unsafe(_cvars: Vec<FieldVar<F>>, _aux: Self::Auxiliary) -> Self {}

    fn check(&self, _cs: &mut RunState<F>, _loc: Cow<'static, str>) -> SnarkyResult<()> {
        Ok(())
    }

    fn constraint_system_auxiliary() -> Self::Auxiliary {}

    fn value_to_field_elements(_value: &Self::OutOfCircuit) -> (Vec<F>, Self::Auxiliary) {
        (vec![], ())
    }

    fn value_of_field_elements(_fields: Vec<F>, _aux: Self::Auxiliary) -> Self::OutOfCircuit {}
}

impl<F, T1, T2> SnarkyType<F> for (T1, T2)
where
    F: PrimeField,
    T1: SnarkyType<F>,
    T2: SnarkyType<F>,
{
    type Auxiliary = (T1::Auxiliary, T2::Auxiliary);

    type OutOfCircuit = (T1::OutOfCircuit, T2::OutOfCircuit);

    const SIZE_IN_FIELD_ELEMENTS: usize = T1::SIZE_IN_FIELD_ELEMENTS + T2::SIZE_IN_FIELD_ELEMENTS;

    fn to_cvars(&self) -> (Vec<FieldVar<F>>, Self::Auxiliary) {
        let (mut cvars1, aux1) = self.0.to_cvars();
        let (cvars2, aux2) = self.1.to_cvars();
        cvars1.extend(cvars2);
        (cvars1, (aux1, aux2))
    }

    fn from_cvars_unsafe(cvars: Vec<FieldVar<F>>, aux: Self::Auxiliary) -> Self {
        assert_eq!(cvars.len(), Self::SIZE_IN_FIELD_ELEMENTS);
        let (cvars1, cvars2) = cvars.split_at(T1::SIZE_IN_FIELD_ELEMENTS);
        let (aux1, aux2) = aux;
        (
            T1::from_cvars_unsafe(cvars1.to_vec(), aux1),
            T2::from_cvars_unsafe(cvars2.to_vec(), aux2),
        )
    }

    fn check(&self, cs: &mut RunState<F>, loc: Cow<'static, str>) -> SnarkyResult<()> {
        self.0.check(cs, loc.clone())?;
        self.1.check(cs, loc)
    }

    fn constraint_system_auxiliary() -> Self::Auxiliary {
        (
            T1::constraint_system_auxiliary(),
            T2::constraint_system_auxiliary(),
        )
    }

    fn value_to_field_elements(value: &Self::OutOfCircuit) -> (Vec<F>, Self::Auxiliary) {
        let (mut fields, aux1) = T1::value_to_field_elements(&value.0);
        let (fields2, aux2) = T2::value_to_field_elements(&value.1);
        fields.extend(fields2);
        (fields, (aux1, aux2))
    }

    fn value_of_field_elements(fields: Vec<F>, aux: Self::Auxiliary) -> Self::OutOfCircuit {
        let (fields1, fields2) = fields.split_at(T1::SIZE_IN_FIELD_ELEMENTS);

        let out1 = T1::value_of_field_elements(fields1.to_vec(), aux.0);
        let out2 = T2::value_of_field_elements(fields2.to_vec(), aux.1);

        (out1, out2)
    }
}

//
// Circuit outputs
//

impl<F> CircuitOutput<F> for FieldVar<F>
where
    F: PrimeField,
{
    type OutOfCircuit = F;

    fn read_output(&self, env: &dyn WitnessGeneration<F>) -> F {
        env.read_var(self)
    }
}

impl<F> CircuitOutput<F> for ()
where
    F: PrimeField,
{
    type OutOfCircuit = ();

    fn read_output(&self, _env: &dyn WitnessGeneration<F>) {}
}

impl<F, T1, T2> CircuitOutput<F> for (T1, T2)
where
    F: PrimeField,
    T1: CircuitOutput<F>,
    T2: CircuitOutput<F>,
{
    type OutOfCircuit = (T1::OutOfCircuit, T2::OutOfCircuit);

    fn read_output(&self, env: &dyn WitnessGeneration<F>) -> Self::OutOfCircuit {
        (self.0.read_output(env), self.1.read_output(env))
    }
}

impl<F, T> CircuitOutput<F> for Vec<T>
where
    F: PrimeField,
    T: CircuitOutput<F>,
{
    type OutOfCircuit = Vec<T::OutOfCircuit>;

    fn read_output(&self, env: &dyn WitnessGeneration<F>) -> Self::OutOfCircuit {
        self.iter().map(|out| out.read_output(env)).collect()
    }
}
