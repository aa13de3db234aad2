//! The circuit-generation and witness-generation logic.

use std::borrow::Cow;

use ark_ff::PrimeField;
use log::trace;

use super::{
    api::Witness,
    constraint_system::{BasicSnarkyConstraint, ConstraintSystem, R1csRow},
    cvar::FieldVar,
    errors::{SnarkyCompilationError, SnarkyError, SnarkyResult, SnarkyRuntimeError},
    traits::SnarkyType,
};

/// The state used when compiling a circuit in snarky, or used in witness generation as well.
#[derive(Debug)]
pub struct RunState<F>
where
    F: PrimeField,
{
    /// The constraint system used to build the circuit.
    /// If not set, the constraint system is not built.
    pub system: Option<ConstraintSystem<F>>,

    /// The values of the variables allocated so far, in witness generation.
    values: Vec<F>,

    /// If set, the witness generation will check if the constraints are satisfied.
    /// This is useful to simulate running the circuit and return an error if an assertion fails.
    pub eval_constraints: bool,

    /// A counter used to track variables as they're being created.
    pub next_var: usize,

    /// Indication that we're running the witness generation.
    pub has_witness: bool,
}

//
// witness generation
//

/// A witness generation environment.
/// This is passed to any closure in [RunState::compute] so that they can access the witness generation environment.
pub trait WitnessGeneration<F>
where
    F: PrimeField,
{
    /// Allows the caller to obtain the value behind a circuit variable.
    fn read_var(&self, var: &FieldVar<F>) -> F;
}

impl<F: PrimeField, G: WitnessGeneration<F>> WitnessGeneration<F> for &G {
    fn read_var(&self, var: &FieldVar<F>) -> F {
        G::read_var(*self, var)
    }
}

impl<F: PrimeField> WitnessGeneration<F> for &dyn WitnessGeneration<F> {
    fn read_var(&self, var: &FieldVar<F>) -> F {
        (**self).read_var(var)
    }
}

impl<F> WitnessGeneration<F> for RunState<F>
where
    F: PrimeField,
{
    fn read_var(&self, var: &FieldVar<F>) -> F {
        var.eval(self)
    }
}

//
// circuit generation
//

impl<F> RunState<F>
where
    F: PrimeField,
{
    /// Creates a new [Self] for compilation.
    /// Without a system, the circuit is only run to count variables.
    pub fn new(with_system: bool) -> Self {
        let system = with_system.then(ConstraintSystem::create);
        Self {
            system,
            values: vec![],
            eval_constraints: false,
            next_var: 0,
            has_witness: false,
        }
    }

    /// Creates a new [Self] for witness generation.
    /// No constraint system is built in this mode.
    pub fn new_witness(eval_constraints: bool) -> Self {
        Self {
            system: None,
            values: vec![],
            eval_constraints,
            next_var: 0,
            has_witness: true,
        }
    }

    /// Used internaly to evaluate variables.
    /// Can panic if used with a wrong index.
    pub fn read_var_idx(&self, idx: usize) -> F {
        self.values[idx]
    }

    /// Allocates a new var without a value.
    pub fn alloc_var(&mut self) -> FieldVar<F> {
        let v = self.next_var;
        self.next_var += 1;
        FieldVar::Var(v)
    }

    /// Stores a field element as an unconstrained variable.
    pub fn store_field_elt(&mut self, x: F) -> FieldVar<F> {
        let v = self.next_var;
        self.next_var += 1;
        self.values.push(x);
        FieldVar::Var(v)
    }

    /// Creates a new non-deterministic variable associated to a value type ([SnarkyType]),
    /// and a closure that can compute it when in witness generation mode.
    pub fn compute<T, FUNC>(
        &mut self,
        loc: Cow<'static, str>,
        to_compute_value: FUNC,
    ) -> SnarkyResult<T>
    where
        T: SnarkyType<F>,
        FUNC: FnOnce(&dyn WitnessGeneration<F>) -> T::OutOfCircuit,
    {
        self.compute_inner(true, loc, to_compute_value)
    }

    /// Same as [Self::compute] except that it does not attempt to constrain the value it computes.
    /// This is to be used internally only, when we know that the value cannot be malformed.
    pub(crate) fn compute_unsafe<T, FUNC>(
        &mut self,
        loc: Cow<'static, str>,
        to_compute_value: FUNC,
    ) -> SnarkyResult<T>
    where
        T: SnarkyType<F>,
        FUNC: FnOnce(&dyn WitnessGeneration<F>) -> T::OutOfCircuit,
    {
        self.compute_inner(false, loc, to_compute_value)
    }

    fn compute_inner<T, FUNC>(
        &mut self,
        checked: bool,
        loc: Cow<'static, str>,
        to_compute_value: FUNC,
    ) -> SnarkyResult<T>
    where
        T: SnarkyType<F>,
        FUNC: FnOnce(&dyn WitnessGeneration<F>) -> T::OutOfCircuit,
    {
        let snarky_type = if self.has_witness {
            // compute the value by running the closure
            let value: T::OutOfCircuit = to_compute_value(&*self);
            self.store_value::<T>(&value)
        } else {
            self.alloc_value::<T>()
        };

        // constrain the conversion
        if checked {
            snarky_type.check(self, loc)?;
        }

        Ok(snarky_type)
    }

    /// Same as [Self::compute] for `len` values of the same type.
    /// In witness generation, the closure must return exactly `len` values.
    pub fn compute_vec<T, FUNC>(
        &mut self,
        loc: Cow<'static, str>,
        len: usize,
        to_compute_values: FUNC,
    ) -> SnarkyResult<Vec<T>>
    where
        T: SnarkyType<F>,
        FUNC: FnOnce(&dyn WitnessGeneration<F>) -> Vec<T::OutOfCircuit>,
    {
        let vars: Vec<T> = if self.has_witness {
            let values = to_compute_values(&*self);
            if values.len() != len {
                return Err(SnarkyRuntimeError::WitnessShapeMismatch {
                    loc,
                    expected: len,
                    got: values.len(),
                }
                .into());
            }
            values.iter().map(|value| self.store_value::<T>(value)).collect()
        } else {
            (0..len).map(|_| self.alloc_value::<T>()).collect()
        };

        for var in &vars {
            var.check(self, loc.clone())?;
        }

        Ok(vars)
    }

    fn store_value<T: SnarkyType<F>>(&mut self, value: &T::OutOfCircuit) -> T {
        let (fields, aux) = T::value_to_field_elements(value);
        let cvars = fields
            .into_iter()
            .map(|field| self.store_field_elt(field))
            .collect();
        T::from_cvars_unsafe(cvars, aux)
    }

    fn alloc_value<T: SnarkyType<F>>(&mut self) -> T {
        let cvars = (0..T::SIZE_IN_FIELD_ELEMENTS)
            .map(|_| self.alloc_var())
            .collect();
        T::from_cvars_unsafe(cvars, T::constraint_system_auxiliary())
    }

    /// Handles a list of [BasicSnarkyConstraint].
    pub fn assert_(
        &mut self,
        label: Option<Cow<'static, str>>,
        loc: Cow<'static, str>,
        basic_constraints: Vec<BasicSnarkyConstraint<FieldVar<F>>>,
    ) -> SnarkyResult<()> {
        let label = label.unwrap_or(Cow::Borrowed("<unknown>"));
        for constraint in basic_constraints {
            self.add_constraint(constraint, label.clone(), loc.clone())?;
        }
        Ok(())
    }

    /// Creates a constraint for `assert_eq!(a * b, c)`.
    pub fn assert_r1cs(
        &mut self,
        label: Option<Cow<'static, str>>,
        loc: Cow<'static, str>,
        a: FieldVar<F>,
        b: FieldVar<F>,
        c: FieldVar<F>,
    ) -> SnarkyResult<()> {
        let constraint = BasicSnarkyConstraint::R1CS(a, b, c);
        self.assert_(label, loc, vec![constraint])
    }

    /// Creates a constraint for `assert_eq!(x, y)`;
    pub fn assert_eq(
        &mut self,
        label: Option<Cow<'static, str>>,
        loc: Cow<'static, str>,
        x: FieldVar<F>,
        y: FieldVar<F>,
    ) -> SnarkyResult<()> {
        let constraint = BasicSnarkyConstraint::Equal(x, y);
        self.assert_(label, loc, vec![constraint])
    }

    /// Creates a constraint for `assert_eq!(x * x, z)`.
    pub fn assert_square(
        &mut self,
        label: Option<Cow<'static, str>>,
        loc: Cow<'static, str>,
        x: FieldVar<F>,
        z: FieldVar<F>,
    ) -> SnarkyResult<()> {
        let constraint = BasicSnarkyConstraint::Square(x, z);
        self.assert_(label, loc, vec![constraint])
    }

    /// Adds a constraint to the circuit.
    ///
    /// In witness generation the constraint is only evaluated (if [Self::eval_constraints] is set).
    /// In compilation, rows that do not reference any variable are checked right away and dropped.
    pub fn add_constraint(
        &mut self,
        constraint: BasicSnarkyConstraint<FieldVar<F>>,
        label: Cow<'static, str>,
        loc: Cow<'static, str>,
    ) -> SnarkyResult<()> {
        if self.has_witness {
            // We can't evaluate the constraints if we are not computing over a value.
            if self.eval_constraints {
                constraint
                    .check_constraint(&*self, &format!("{label} ({loc})"))
                    .map_err(SnarkyError::RuntimeError)?;
            }
            return Ok(());
        }

        let cs = match &mut self.system {
            Some(cs) => cs,
            None => return Ok(()),
        };

        let row = R1csRow::new(&constraint, label, loc);
        if row.is_constant() {
            let (a, b, c) = row.evaluate(&[]);
            if a * b != c {
                return Err(SnarkyCompilationError::ConstantAssertEquals(
                    (a * b).to_string(),
                    c.to_string(),
                )
                .into());
            }
            trace!("dropping constant row `{}` at {}", row.label, row.loc);
            return Ok(());
        }

        cs.add_row(row);
        Ok(())
    }

    /// Records the number of variables allocated by the circuit and returns the system.
    pub(crate) fn finalize(mut self) -> Option<ConstraintSystem<F>> {
        let num_variables = self.next_var;
        if let Some(cs) = &mut self.system {
            cs.set_num_variables(num_variables);
        }
        self.system
    }

    /// Returns the assignment of every variable allocated during witness generation.
    pub fn into_witness(self) -> Witness<F> {
        Witness(self.values)
    }
}
