use std::{
    borrow::Cow,
    ops::{Add, Neg, Sub},
};

use ark_ff::PrimeField;

use crate::snarky::{
    checked_runner::RunState,
    constraint_system::LinearCombination,
    errors::{SnarkyCompilationError, SnarkyResult},
    traits::SnarkyType,
};

/// A circuit variable represents a field element in the circuit.
/// Any linear combination of variables is a circuit variable, building one is free.
#[derive(Clone, Debug)]
pub enum FieldVar<F>
where
    F: PrimeField,
{
    /// A constant.
    Constant(F),

    /// A variable that can be referred to via a `usize`.
    Var(usize),

    /// The addition of two other [FieldVar]s.
    Add(Box<FieldVar<F>>, Box<FieldVar<F>>),

    /// Scaling of a [FieldVar].
    Scale(F, Box<FieldVar<F>>),
}

pub type Term<F> = (F, usize);

pub type ScaledCVar<F> = (F, FieldVar<F>);

impl<F> FieldVar<F>
where
    F: PrimeField,
{
    pub fn constant(c: F) -> Self {
        FieldVar::Constant(c)
    }

    pub fn zero() -> Self {
        Self::constant(F::zero())
    }

    pub fn one() -> Self {
        Self::constant(F::one())
    }

    fn eval_inner(&self, state: &RunState<F>, scale: F, res: &mut F) {
        match self {
            FieldVar::Constant(c) => {
                *res += scale * c;
            }
            FieldVar::Var(v) => {
                let v = state.read_var_idx(*v);
                *res += scale * v;
            }
            FieldVar::Add(a, b) => {
                a.eval_inner(state, scale, res);
                b.eval_inner(state, scale, res);
            }
            FieldVar::Scale(s, v) => {
                v.eval_inner(state, scale * s, res);
            }
        }
    }

    /// Evaluate the field element associated to a variable (used during witness generation)
    pub fn eval(&self, state: &RunState<F>) -> F {
        let mut res = F::zero();
        self.eval_inner(state, F::one(), &mut res);
        res
    }

    fn to_constant_and_terms_inner(&self, scale: F, constant: &mut F, terms: &mut Vec<Term<F>>) {
        match self {
            FieldVar::Constant(c) => *constant += scale * c,
            FieldVar::Var(v) => terms.push((scale, *v)),
            FieldVar::Scale(s, t) => t.to_constant_and_terms_inner(scale * s, constant, terms),
            FieldVar::Add(x1, x2) => {
                x1.to_constant_and_terms_inner(scale, constant, terms);
                x2.to_constant_and_terms_inner(scale, constant, terms);
            }
        }
    }

    /// Flattens the expression into a constant and a list of (coefficient, variable) terms.
    /// The same variable can appear in several terms.
    pub fn to_constant_and_terms(&self) -> (Option<F>, Vec<Term<F>>) {
        let mut constant = F::zero();
        let mut terms = vec![];
        self.to_constant_and_terms_inner(F::one(), &mut constant, &mut terms);
        let constant = if constant.is_zero() {
            None
        } else {
            Some(constant)
        };
        (constant, terms)
    }

    /// Returns the value of the expression if it does not depend on any variable.
    pub fn to_constant(&self) -> Option<F> {
        match self {
            FieldVar::Constant(c) => Some(*c),
            FieldVar::Var(_) => None,
            _ => {
                let lc = LinearCombination::from_field_var(self);
                lc.terms.is_empty().then_some(lc.constant)
            }
        }
    }

    pub fn scale(&self, scalar: F) -> Self {
        if scalar.is_zero() {
            return FieldVar::Constant(scalar);
        } else if scalar.is_one() {
            return self.clone();
        }

        match self {
            FieldVar::Constant(x) => FieldVar::Constant(*x * scalar),
            FieldVar::Scale(s, v) => FieldVar::Scale(*s * scalar, v.clone()),
            FieldVar::Var(_) | FieldVar::Add(..) => FieldVar::Scale(scalar, Box::new(self.clone())),
        }
    }

    pub fn linear_combination(terms: &[ScaledCVar<F>]) -> Self {
        let mut res = FieldVar::zero();
        for (cst, term) in terms {
            res = res.add(&term.scale(*cst));
        }
        res
    }

    pub fn sum(vs: &[&Self]) -> Self {
        let terms: Vec<_> = vs.iter().map(|v| (F::one(), (*v).clone())).collect();
        Self::linear_combination(&terms)
    }

    /// Multiplies two variables. Unless one side is a constant, this allocates the
    /// product as a new variable and costs one constraint.
    pub fn mul(
        &self,
        other: &Self,
        label: Option<Cow<'static, str>>,
        loc: Cow<'static, str>,
        cs: &mut RunState<F>,
    ) -> SnarkyResult<Self> {
        let res = match (self, other) {
            (FieldVar::Constant(x), FieldVar::Constant(y)) => FieldVar::Constant(*x * y),

            (FieldVar::Constant(cst), _) | (_, FieldVar::Constant(cst)) if cst.is_zero() => {
                FieldVar::zero()
            }

            (FieldVar::Constant(cst), cvar) | (cvar, FieldVar::Constant(cst)) if cst.is_one() => {
                cvar.clone()
            }

            (FieldVar::Constant(cst), cvar) | (cvar, FieldVar::Constant(cst)) => cvar.scale(*cst),

            (_, _) => {
                let self_clone = self.clone();
                let other_clone = other.clone();
                let res: FieldVar<F> = cs.compute_unsafe(loc.clone(), move |env| {
                    let x: F = env.read_var(&self_clone);
                    let y: F = env.read_var(&other_clone);
                    x * y
                })?;

                let label = label.unwrap_or(Cow::Borrowed("checked_mul"));

                cs.assert_r1cs(Some(label), loc, self.clone(), other.clone(), res.clone())?;
                res
            }
        };

        Ok(res)
    }

    /// Squares a variable, one constraint unless it is a constant.
    pub fn square(&self, loc: Cow<'static, str>, cs: &mut RunState<F>) -> SnarkyResult<Self> {
        if let FieldVar::Constant(x) = self {
            return Ok(FieldVar::Constant(x.square()));
        }

        let self_clone = self.clone();
        let res: FieldVar<F> = cs.compute_unsafe(loc.clone(), move |env| {
            let x: F = env.read_var(&self_clone);
            x.square()
        })?;
        cs.assert_square(Some("checked_square".into()), loc, self.clone(), res.clone())?;

        Ok(res)
    }

    /// Asserts that two variables are equal.
    /// Two constants are compared right away and fail the compilation if they differ.
    pub fn assert_equals(
        &self,
        cs: &mut RunState<F>,
        loc: Cow<'static, str>,
        other: &FieldVar<F>,
    ) -> SnarkyResult<()> {
        match (self, other) {
            (FieldVar::Constant(x), FieldVar::Constant(y)) => {
                if x == y {
                    Ok(())
                } else {
                    Err(
                        SnarkyCompilationError::ConstantAssertEquals(x.to_string(), y.to_string())
                            .into(),
                    )
                }
            }
            (_, _) => cs.assert_eq(Some("assert_equals".into()), loc, self.clone(), other.clone()),
        }
    }
}

//
// Our Traits
//

impl<F> SnarkyType<F> for FieldVar<F>
where
    F: PrimeField,
{
    type Auxiliary = ();

    type OutOfCircuit = F;

    const SIZE_IN_FIELD_ELEMENTS: usize = 1;

    fn to_cvars(&self) -> (Vec<FieldVar<F>>, Self::Auxiliary) {
        (vec![self.clone()], ())
    }

    fn from_cvars_unsafe(cvars: Vec<FieldVar<F>>, _aux: Self::Auxiliary) -> Self {
        assert_eq!(cvars.len(), Self::SIZE_IN_FIELD_ELEMENTS);
        cvars[0].clone()
    }

    fn check(&self, _cs: &mut RunState<F>, _loc: Cow<'static, str>) -> SnarkyResult<()> {
        // do nothing
        Ok(())
    }

    fn constraint_system_auxiliary() -> Self::Auxiliary {}

    fn value_to_field_elements(x: &Self::OutOfCircuit) -> (Vec<F>, Self::Auxiliary) {
        (vec![*x], ())
    }

    fn value_of_field_elements(fields: Vec<F>, _aux: Self::Auxiliary) -> Self::OutOfCircuit {
        assert_eq!(fields.len(), Self::SIZE_IN_FIELD_ELEMENTS);
        fields[0]
    }
}

//
// Operations
//

impl<F> Add for &FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn add(self, other: Self) -> Self::Output {
        match (self, other) {
            (FieldVar::Constant(x), y) | (y, FieldVar::Constant(x)) if x.is_zero() => y.clone(),
            (FieldVar::Constant(x), FieldVar::Constant(y)) => FieldVar::Constant(*x + y),
            (_, _) => FieldVar::Add(Box::new(self.clone()), Box::new(other.clone())),
        }
    }
}

impl<'a, F> Add<&'a Self> for FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn add(self, other: &Self) -> Self::Output {
        (&self).add(other)
    }
}

impl<F> Add<FieldVar<F>> for &FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn add(self, other: FieldVar<F>) -> Self::Output {
        self.add(&other)
    }
}

impl<F> Add for FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn add(self, other: FieldVar<F>) -> Self::Output {
        (&self).add(&other)
    }
}

impl<F> Sub for &FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn sub(self, other: Self) -> Self::Output {
        match (self, other) {
            (FieldVar::Constant(x), FieldVar::Constant(y)) => FieldVar::Constant(*x - y),
            _ => self.add(&other.scale(-F::one())),
        }
    }
}

impl<'a, F> Sub<&'a FieldVar<F>> for FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn sub(self, other: &Self) -> Self::Output {
        (&self).sub(other)
    }
}

impl<F> Sub<FieldVar<F>> for &FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn sub(self, other: FieldVar<F>) -> Self::Output {
        self.sub(&other)
    }
}

impl<F> Sub for FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn sub(self, other: FieldVar<F>) -> Self::Output {
        (&self).sub(&other)
    }
}

impl<F> Neg for &FieldVar<F>
where
    F: PrimeField,
{
    type Output = FieldVar<F>;

    fn neg(self) -> Self::Output {
        self.scale(-F::one())
    }
}
