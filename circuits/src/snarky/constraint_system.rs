//! The rank-1 constraint system produced by compiling a circuit.
//!
//! Every constraint is a row `<a, z> * <b, z> = <c, z>` where `a`, `b` and `c` are
//! sparse linear combinations over the assignment `z`. Constants are folded into
//! each combination instead of reserving a variable for the value one.

use std::borrow::Cow;

use ark_ff::PrimeField;

use crate::snarky::{
    api::Witness,
    checked_runner::WitnessGeneration,
    cvar::FieldVar,
    errors::{SnarkyRuntimeError, SnarkyRuntimeResult},
};

/// The basic constraints a circuit can emit.
#[derive(Debug, Clone)]
pub enum BasicSnarkyConstraint<Var> {
    Boolean(Var),
    Equal(Var, Var),
    Square(Var, Var),
    R1CS(Var, Var, Var),
}

impl<F> BasicSnarkyConstraint<FieldVar<F>>
where
    F: PrimeField,
{
    /// In witness generation, this checks if the constraint is satisfied by some witness values.
    pub fn check_constraint(
        &self,
        env: &impl WitnessGeneration<F>,
        label: &str,
    ) -> SnarkyRuntimeResult<()> {
        match self {
            BasicSnarkyConstraint::Boolean(v) => {
                let v = env.read_var(v);
                if !(v.is_one() || v.is_zero()) {
                    return Err(SnarkyRuntimeError::UnsatisfiedBooleanConstraint(
                        label.to_string(),
                        v.to_string(),
                    ));
                }
            }
            BasicSnarkyConstraint::Equal(v1, v2) => {
                let v1 = env.read_var(v1);
                let v2 = env.read_var(v2);
                if v1 != v2 {
                    return Err(SnarkyRuntimeError::UnsatisfiedEqualConstraint(
                        label.to_string(),
                        v1.to_string(),
                        v2.to_string(),
                    ));
                }
            }
            BasicSnarkyConstraint::Square(v1, v2) => {
                let v1 = env.read_var(v1);
                let v2 = env.read_var(v2);
                if v1.square() != v2 {
                    return Err(SnarkyRuntimeError::UnsatisfiedSquareConstraint(
                        label.to_string(),
                        v1.to_string(),
                        v2.to_string(),
                    ));
                }
            }
            BasicSnarkyConstraint::R1CS(v1, v2, v3) => {
                let v1 = env.read_var(v1);
                let v2 = env.read_var(v2);
                let v3 = env.read_var(v3);
                if v1 * v2 != v3 {
                    return Err(SnarkyRuntimeError::UnsatisfiedR1CSConstraint(
                        label.to_string(),
                        v1.to_string(),
                        v2.to_string(),
                        v3.to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Rewrites the constraint as `a * b = c`.
    pub fn to_r1cs(&self) -> (FieldVar<F>, FieldVar<F>, FieldVar<F>) {
        match self {
            // x * x = x
            BasicSnarkyConstraint::Boolean(x) => (x.clone(), x.clone(), x.clone()),
            // (x - y) * 1 = 0
            BasicSnarkyConstraint::Equal(x, y) => (x - y, FieldVar::one(), FieldVar::zero()),
            BasicSnarkyConstraint::Square(x, z) => (x.clone(), x.clone(), z.clone()),
            BasicSnarkyConstraint::R1CS(a, b, c) => (a.clone(), b.clone(), c.clone()),
        }
    }
}

/// A sparse linear combination `constant + sum coeff * z[var]`, sorted by variable,
/// without duplicated variables nor zero coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearCombination<F: PrimeField> {
    pub constant: F,
    pub terms: Vec<(F, usize)>,
}

impl<F: PrimeField> LinearCombination<F> {
    pub fn from_field_var(var: &FieldVar<F>) -> Self {
        let (constant, terms) = var.to_constant_and_terms();
        Self {
            constant: constant.unwrap_or_else(F::zero),
            terms: compress_terms(terms),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn evaluate(&self, assignment: &[F]) -> F {
        self.terms
            .iter()
            .fold(self.constant, |acc, (coeff, var)| acc + *coeff * assignment[*var])
    }
}

fn compress_terms<F: PrimeField>(mut terms: Vec<(F, usize)>) -> Vec<(F, usize)> {
    terms.sort_by_key(|(_, var)| *var);
    let mut out: Vec<(F, usize)> = Vec::with_capacity(terms.len());
    for (coeff, var) in terms {
        if coeff.is_zero() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.1 == var => {
                last.0 += coeff;
                if last.0.is_zero() {
                    out.pop();
                }
            }
            _ => out.push((coeff, var)),
        }
    }
    out
}

/// A single rank-1 constraint, with the label and source location that emitted it.
#[derive(Debug, Clone)]
pub struct R1csRow<F: PrimeField> {
    pub a: LinearCombination<F>,
    pub b: LinearCombination<F>,
    pub c: LinearCombination<F>,
    pub label: Cow<'static, str>,
    pub loc: Cow<'static, str>,
}

impl<F: PrimeField> R1csRow<F> {
    pub fn new(
        constraint: &BasicSnarkyConstraint<FieldVar<F>>,
        label: Cow<'static, str>,
        loc: Cow<'static, str>,
    ) -> Self {
        let (a, b, c) = constraint.to_r1cs();
        Self {
            a: LinearCombination::from_field_var(&a),
            b: LinearCombination::from_field_var(&b),
            c: LinearCombination::from_field_var(&c),
            label,
            loc,
        }
    }

    /// A row that does not reference any variable.
    pub fn is_constant(&self) -> bool {
        self.a.is_constant() && self.b.is_constant() && self.c.is_constant()
    }

    pub fn evaluate(&self, assignment: &[F]) -> (F, F, F) {
        (
            self.a.evaluate(assignment),
            self.b.evaluate(assignment),
            self.c.evaluate(assignment),
        )
    }
}

/// The constraint system of a compiled circuit.
#[derive(Debug, Clone)]
pub struct ConstraintSystem<F: PrimeField> {
    rows: Vec<R1csRow<F>>,
    num_variables: usize,
}

impl<F: PrimeField> Default for ConstraintSystem<F> {
    fn default() -> Self {
        Self::create()
    }
}

impl<F: PrimeField> ConstraintSystem<F> {
    pub fn create() -> Self {
        Self {
            rows: vec![],
            num_variables: 0,
        }
    }

    pub fn add_row(&mut self, row: R1csRow<F>) {
        self.rows.push(row);
    }

    pub fn set_num_variables(&mut self, num_variables: usize) {
        self.num_variables = num_variables;
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_constraints(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[R1csRow<F>] {
        &self.rows
    }

    /// Checks a full assignment against every row, reporting the first unsatisfied one.
    pub fn is_satisfied(&self, witness: &Witness<F>) -> SnarkyRuntimeResult<()> {
        let z = &witness.0;
        if z.len() != self.num_variables {
            return Err(SnarkyRuntimeError::VariableCountMismatch {
                compiled: self.num_variables,
                witness: z.len(),
            });
        }

        for (idx, row) in self.rows.iter().enumerate() {
            let (az, bz, cz) = row.evaluate(z);
            if az * bz != cz {
                return Err(SnarkyRuntimeError::UnsatisfiedR1CSConstraint(
                    format!("{} (row {idx}, {})", row.label, row.loc),
                    az.to_string(),
                    bz.to_string(),
                    cz.to_string(),
                ));
            }
        }

        Ok(())
    }
}
