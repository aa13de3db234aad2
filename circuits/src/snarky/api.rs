//! The main interface to using Snarky.
//!
//! To use Snarky, simply implements the [SnarkyCircuit] trait.

use ark_ff::PrimeField;
use log::debug;

use super::{
    checked_runner::RunState,
    constraint_system::ConstraintSystem,
    errors::{SnarkyCompilationError, SnarkyError, SnarkyResult, SnarkyRuntimeError},
    traits::CircuitOutput,
};

/// A witness is the value of every variable of a circuit, in allocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness<F>(pub Vec<F>);

impl<F> Witness<F> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

type Output<F, C> = <<C as SnarkyCircuit<F>>::Output as CircuitOutput<F>>::OutOfCircuit;

/// A compiled circuit.
#[derive(Debug)]
pub struct CompiledCircuit<F, Circuit>
where
    F: PrimeField,
    Circuit: SnarkyCircuit<F>,
{
    /// The snarky circuit itself.
    circuit: Circuit,

    /// The constraints obtained after compilation.
    pub system: ConstraintSystem<F>,
}

impl<F, Circuit> CompiledCircuit<F, Circuit>
where
    F: PrimeField,
    Circuit: SnarkyCircuit<F>,
{
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn num_constraints(&self) -> usize {
        self.system.num_constraints()
    }

    pub fn num_variables(&self) -> usize {
        self.system.num_variables()
    }

    /// Runs the circuit on an input, returning the witness and the value of the output.
    /// The witness is checked against every compiled constraint before being returned.
    pub fn generate_witness(
        &self,
        input: &Circuit::Input,
    ) -> SnarkyResult<(Witness<F>, Output<F, Circuit>)> {
        let mut sys = RunState::new_witness(true);
        let output = self.circuit.circuit(&mut sys, Some(input))?;
        let value = output.read_output(&sys);
        let witness = sys.into_witness();

        if witness.len() != self.num_variables() {
            return Err(SnarkyRuntimeError::VariableCountMismatch {
                compiled: self.num_variables(),
                witness: witness.len(),
            }
            .into());
        }
        self.system.is_satisfied(&witness)?;

        debug!(
            "generated a witness of {} variables for {} constraints",
            witness.len(),
            self.num_constraints()
        );

        Ok((witness, value))
    }

    /// Same as [Self::generate_witness], but also checks the output against an expected value.
    pub fn expect_output(
        &self,
        input: &Circuit::Input,
        expected: &Output<F, Circuit>,
    ) -> SnarkyResult<Witness<F>> {
        let (witness, actual) = self.generate_witness(input)?;
        if &actual != expected {
            return Err(SnarkyError::OutputMismatch {
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
            });
        }
        Ok(witness)
    }
}

//
// The main user-facing trait for constructing circuits.
//

/// The main trait. Implement this on your circuit to get access to more functions (specifically [Self::compile]).
pub trait SnarkyCircuit<F>: Sized
where
    F: PrimeField,
{
    /// The private input used by the circuit.
    type Input;

    /// The output returned by the circuit.
    type Output: CircuitOutput<F>;

    /// The circuit. It takes:
    ///
    /// - `self`: to parameterize it at compile time.
    /// - `sys`: to construct the circuit or generate the witness (depending on mode)
    /// - `input`: the private input as an option, set to `None` for compilation.
    ///
    /// It returns a [SnarkyResult] containing the output.
    /// The circuit must allocate the same variables and emit the same constraints in both modes.
    fn circuit(
        &self,
        sys: &mut RunState<F>,
        input: Option<&Self::Input>,
    ) -> SnarkyResult<Self::Output>;

    /// Compiles the circuit to a [CompiledCircuit].
    fn compile(self) -> SnarkyResult<CompiledCircuit<F, Self>> {
        let mut sys = RunState::new(true);
        self.circuit(&mut sys, None)?;

        let system = sys.finalize().ok_or_else(|| {
            SnarkyCompilationError::InvalidParameter(
                "compilation ran without a constraint system".to_string(),
            )
        })?;

        debug!(
            "compiled a circuit of {} constraints over {} variables",
            system.num_constraints(),
            system.num_variables()
        );

        Ok(CompiledCircuit {
            circuit: self,
            system,
        })
    }
}
