//! Combine membership functions of the same domain.
//!
//! Every combinator is an N-ary reduction over the values its operands produce for one
//! input. Pairwise operators are folded left to right.

use std::cmp::Ordering;

use num::Float;
use serde::{Deserialize, Serialize};

use crate::error::{configuration, Result};
use crate::functions::Membership;

/// How the memberships of several functions are folded into one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    /// Classic AND
    Min,
    /// Classic OR, 1 for no operands at all
    Max,
    Product,
    /// `x + y - xy`
    BoundedSum,
    LukasiewiczAnd,
    LukasiewiczOr,
    EinsteinProduct,
    EinsteinSum,
    HamacherProduct,
    HamacherSum,
    /// Compensatory: `w * xy + (1 - w) * (x + y - xy)`
    Lambda { weight: f64 },
    /// Compensatory (Zimmermann): `(xy)^(1 - w) * (1 - (1 - x)(1 - y))^w`
    Gamma { weight: f64 },
    /// Fuzzy XOR
    SimpleDisjointSum,
}

fn lit<F: Float>(v: f64) -> F {
    F::from(v).unwrap_or_else(F::nan)
}

impl Combinator {
    pub fn name(self) -> &'static str {
        match self {
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Product => "product",
            Self::BoundedSum => "bounded_sum",
            Self::LukasiewiczAnd => "lukasiewicz_and",
            Self::LukasiewiczOr => "lukasiewicz_or",
            Self::EinsteinProduct => "einstein_product",
            Self::EinsteinSum => "einstein_sum",
            Self::HamacherProduct => "hamacher_product",
            Self::HamacherSum => "hamacher_sum",
            Self::Lambda { .. } => "lambda_op",
            Self::Gamma { .. } => "gamma_op",
            Self::SimpleDisjointSum => "simple_disjoint_sum",
        }
    }

    /// Combines two membership values.
    ///
    /// For [`Combinator::SimpleDisjointSum`] this is the two operand XOR.
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        let one = F::one();
        let zero = F::zero();

        match self {
            Self::Min => F::min(u, v),
            Self::Max => F::max(u, v),
            Self::Product => u * v,
            Self::BoundedSum => u + v - u * v,
            Self::LukasiewiczAnd => F::max(zero, u + v - one),
            Self::LukasiewiczOr => F::min(one, u + v),
            Self::EinsteinProduct => (u * v) / (lit::<F>(2.) - (u + v - u * v)),
            Self::EinsteinSum => (u + v) / (one + u * v),
            Self::HamacherProduct => {
                if u == zero || v == zero {
                    zero
                } else {
                    (u * v) / (u + v - u * v)
                }
            },
            Self::HamacherSum => {
                if u * v == one {
                    one
                } else {
                    (u + v - lit::<F>(2.) * u * v) / (one - u * v)
                }
            },
            Self::Lambda { weight } => {
                let w = lit::<F>(weight);
                w * (u * v) + (one - w) * (u + v - u * v)
            },
            Self::Gamma { weight } => {
                let w = lit::<F>(weight);
                (u * v).powf(one - w) * (one - (one - u) * (one - v)).powf(w)
            },
            Self::SimpleDisjointSum => self.reduce([u, v]),
        }
    }

    /// Folds any number of membership values.
    pub fn reduce<F: Float>(self, values: impl IntoIterator<Item = F>) -> F {
        if let Self::SimpleDisjointSum = self {
            return disjoint_sum(values.into_iter().collect());
        }

        let mut iter = values.into_iter();
        let Some(first) = iter.next() else {
            // vacuous truth for OR; the rest reject empty operands up front
            return match self {
                Self::Max => F::one(),
                _ => F::zero(),
            };
        };

        iter.fold(first, |acc, next| self.call(acc, next))
    }

    pub(crate) fn validate(self, operands: usize) -> Result<()> {
        if let Self::Lambda { weight } | Self::Gamma { weight } = self {
            if !(0. ..=1.).contains(&weight) {
                return Err(configuration(format!("{} weight must be within [0, 1], got {weight}", self.name())));
            }
        }
        if operands == 0 && self != Self::Max {
            return Err(configuration(format!("{} needs at least one operand", self.name())));
        }

        Ok(())
    }

    /// Builds the combined membership function.
    pub fn apply(self, operands: impl IntoIterator<Item = Membership>) -> Result<Membership> {
        let operands: Vec<_> = operands.into_iter().collect();

        self.validate(operands.len())?;

        Ok(Membership::Combination { op: self, operands })
    }
}

/// For the distinct values M: max over x of min(x, 1 - y for every other y).
fn disjoint_sum<F: Float>(mut values: Vec<F>) -> F {
    values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values.dedup();

    let mut result: Option<F> = None;

    for (i, x) in values.iter().copied().enumerate() {
        let rest = values
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, y)| F::one() - *y)
            .reduce(F::min)
            // all values were equal
            .unwrap_or(F::one() - x);
        let m = F::min(x, rest);

        result = Some(result.map_or(m, |r| F::max(r, m)));
    }

    result.unwrap_or_else(F::zero)
}

#[allow(non_snake_case)]
pub fn MIN(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::Min.apply(funcs)
}

#[allow(non_snake_case)]
pub fn MAX(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::Max.apply(funcs)
}

pub fn product(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::Product.apply(funcs)
}

pub fn bounded_sum(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::BoundedSum.apply(funcs)
}

pub fn lukasiewicz_and(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::LukasiewiczAnd.apply(funcs)
}

pub fn lukasiewicz_or(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::LukasiewiczOr.apply(funcs)
}

pub fn einstein_product(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::EinsteinProduct.apply(funcs)
}

pub fn einstein_sum(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::EinsteinSum.apply(funcs)
}

/// `xy / (x + y - xy)`, 0 if either is 0
pub fn hamacher_product(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::HamacherProduct.apply(funcs)
}

/// `(x + y - 2xy) / (1 - xy)`, 1 if both are 1
pub fn hamacher_sum(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::HamacherSum.apply(funcs)
}

/// Compensatory operator blending AND (weight 1) with OR (weight 0).
///
/// Two stages: configure here, then [`Combinator::apply`] to the operands.
pub fn lambda_op(weight: f64) -> Result<Combinator> {
    let op = Combinator::Lambda { weight };

    op.validate(1)?;

    Ok(op)
}

/// Compensatory operator blending AND (weight 0) with OR (weight 1).
pub fn gamma_op(weight: f64) -> Result<Combinator> {
    let op = Combinator::Gamma { weight };

    op.validate(1)?;

    Ok(op)
}

/// Fuzzy XOR over any number of functions.
pub fn simple_disjoint_sum(funcs: impl IntoIterator<Item = Membership>) -> Result<Membership> {
    Combinator::SimpleDisjointSum.apply(funcs)
}

#[test]
fn test_min_max() {
    use crate::functions::constant;

    let low = constant(0.2).unwrap();
    let high = constant(0.7).unwrap();

    assert_eq!(MIN([low.clone(), high.clone()]).unwrap().evaluate(0.), 0.2);
    assert_eq!(MAX([low, high]).unwrap().evaluate(0.), 0.7);
    assert_eq!(MAX([]).unwrap().evaluate(0.), 1.);
    assert!(MIN([]).is_err());
    assert!(product([]).is_err());
}

#[test]
fn test_pairwise() {
    assert_eq!(Combinator::Product.call(0.5, 0.5), 0.25);
    assert_eq!(Combinator::BoundedSum.call(0.5, 0.5), 0.75);
    assert_eq!(Combinator::LukasiewiczAnd.call(0.5, 0.25), 0.);
    assert_eq!(Combinator::LukasiewiczAnd.call(0.75, 0.5), 0.25);
    assert_eq!(Combinator::LukasiewiczOr.call(0.75, 0.5), 1.);
    assert_eq!(Combinator::EinsteinProduct.call(1., 0.5), 0.5);
    assert_eq!(Combinator::EinsteinSum.call(0.5, 0.5), 0.8);
    assert_eq!(Combinator::HamacherProduct.call(0., 0.), 0.);
    assert_eq!(Combinator::HamacherProduct.call(1., 0.5), 0.5);
    assert_eq!(Combinator::HamacherSum.call(1., 1.), 1.);
    assert_eq!(Combinator::HamacherSum.call(0., 0.5), 0.5);
    assert_eq!(Combinator::HamacherSum.call(0.5f32, 0.5), 2. / 3.);
}

#[test]
fn test_fold() {
    assert_eq!(Combinator::Product.reduce([0.5, 0.5, 0.5]), 0.125);
    assert_eq!(Combinator::Min.reduce([0.3, 0.1, 0.9]), 0.1);
}

#[test]
fn test_compensatory() {
    let and = lambda_op(1.).unwrap();
    let or = lambda_op(0.).unwrap();

    assert_eq!(and.call(0.5, 0.5), 0.25);
    assert_eq!(or.call(0.5, 0.5), 0.75);
    assert_eq!(gamma_op(0.).unwrap().call(0.5, 0.5), 0.25);
    assert_eq!(gamma_op(1.).unwrap().call(0.5, 0.5), 0.75);
    assert!(lambda_op(1.5).is_err());
    assert!(gamma_op(-0.1).is_err());
}

#[test]
fn test_simple_disjoint_sum() {
    use crate::functions::noop;

    let xor = simple_disjoint_sum([noop(), noop()]).unwrap();

    assert_eq!(xor.evaluate(0.), 0.);
    assert_eq!(xor.evaluate(1.), 0.);
    assert_eq!(xor.evaluate(0.5), 0.5);
    assert_eq!(xor.evaluate(0.3), 0.3);
    assert_eq!(Combinator::SimpleDisjointSum.call(0.5, 1.), 0.5);
    assert_eq!(Combinator::SimpleDisjointSum.reduce([0., 0.5, 1.]), 0.5);
    assert_eq!(Combinator::SimpleDisjointSum.call(1., 0.), 1.);
}
