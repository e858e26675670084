use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Neg, Not};
use std::rc::{Rc, Weak};

use crate::combinators::Combinator;
use crate::defuzz::centroid;
use crate::domain::{Domain, DomainInner};
use crate::error::{configuration, mismatch, Result};
use crate::functions::{self, Membership};

/// A fuzzy set: a membership function living in (at most) one [`Domain`].
///
/// `Set` is a cheap handle, clones refer to the same set. Hashing and `==` go by that
/// identity so sets can key maps; comparing what two sets contain is done through
/// [`Set::is_equal_to`] and friends, which need a domain to sample over.
///
/// Sets produced by the operators are derived sets: they inherit the left operand's
/// domain and stay unnamed until registered with [`Domain::add_set`].
#[derive(Clone)]
pub struct Set(Rc<SetInner>);

struct SetInner {
    func: Membership,
    domain: OnceCell<Weak<DomainInner>>,
    name: OnceCell<String>,
    array: OnceCell<Vec<f64>>,
    center_of_gravity: OnceCell<f64>,
}

impl Set {
    pub fn new(func: Membership) -> Self {
        Set(Rc::new(SetInner {
            func,
            domain: OnceCell::new(),
            name: OnceCell::new(),
            array: OnceCell::new(),
            center_of_gravity: OnceCell::new(),
        }))
    }

    fn derive(&self, func: Membership) -> Self {
        let set = Set::new(func);

        if let Some(domain) = self.0.domain.get() {
            let _ = set.0.domain.set(domain.clone());
        }

        set
    }

    pub fn func(&self) -> &Membership {
        &self.0.func
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.get().map(String::as_str)
    }

    pub fn domain(&self) -> Option<Domain> {
        self.0.domain.get().and_then(Weak::upgrade).map(Domain)
    }

    /// Identity of the set, stable for as long as any handle is alive.
    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Binds this set to `domain` for good. Binding to the domain it already has is a no-op.
    pub fn bind_domain(&self, domain: &Domain) -> Result<()> {
        self.check_domain_binding(domain)?;
        let _ = self.0.domain.set(Rc::downgrade(&domain.0));

        Ok(())
    }

    pub(crate) fn check_domain_binding(&self, domain: &Domain) -> Result<()> {
        match self.0.domain.get() {
            Some(current) if !Weak::ptr_eq(current, &Rc::downgrade(&domain.0)) => Err(configuration(format!(
                "{self} is already bound to another domain than {domain}"
            ))),
            _ => Ok(()),
        }
    }

    pub(crate) fn check_name_binding(&self, name: &str) -> Result<()> {
        match self.name() {
            Some(current) if current != name => {
                Err(configuration(format!("{self} is already named {current}, can't rename it to {name}")))
            },
            _ => Ok(()),
        }
    }

    pub(crate) fn bind_name(&self, name: &str) {
        let _ = self.0.name.set(name.to_owned());
    }

    /// Membership of `x`, without looking at the domain.
    pub fn call(&self, x: f64) -> f64 {
        self.0.func.evaluate(x)
    }

    /// Membership of `x`, which must lie within the domain when the set has one.
    pub fn evaluate(&self, x: f64) -> Result<f64> {
        if let Some(domain) = self.domain() {
            domain.check_range(x)?;
        }

        Ok(self.call(x))
    }

    fn bound_domain(&self) -> Result<Domain> {
        self.domain().ok_or_else(|| mismatch(format!("{self} has no domain")))
    }

    fn same_domain(&self, other: &Set) -> bool {
        match (self.0.domain.get(), other.0.domain.get()) {
            (Some(a), Some(b)) => Weak::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn ensure_same_domain(&self, other: &Set) -> Result<()> {
        if self.same_domain(other) {
            Ok(())
        } else {
            Err(mismatch(format!("{self} and {other} belong to different domains")))
        }
    }

    fn singleton_location(&self) -> Option<f64> {
        match self.0.func {
            Membership::Singleton { c, .. } => Some(c),
            _ => None,
        }
    }

    /// Where the set is sampled: the domain's range, plus the spike of a singleton when it
    /// falls between grid points.
    pub fn sample_points(&self) -> Result<Vec<f64>> {
        let domain = self.bound_domain()?;
        let mut points = domain.range();

        if let Some(c) = self.singleton_location() {
            if domain.contains(c) {
                if let Err(i) = points.binary_search_by(|p| p.partial_cmp(&c).unwrap_or(Ordering::Less)) {
                    points.insert(i, c);
                }
            }
        }

        Ok(points)
    }

    /// All membership values over [`Set::sample_points`], computed once.
    pub fn array(&self) -> Result<&[f64]> {
        if let Some(array) = self.0.array.get() {
            return Ok(array.as_slice());
        }

        let values = self.sample_points()?.into_iter().map(|x| self.call(x)).collect();

        Ok(self.0.array.get_or_init(|| values).as_slice())
    }

    /// Weighted average of the sample points, computed once.
    ///
    /// A singleton answers its location directly, domain or not. An all zero set has its
    /// center of gravity at 0.
    pub fn center_of_gravity(&self) -> Result<f64> {
        if let Some(cog) = self.0.center_of_gravity.get() {
            return Ok(*cog);
        }

        let cog = match self.singleton_location() {
            Some(c) => c,
            None => {
                let points = self.sample_points()?;
                centroid(&points, self.array()?).unwrap_or(0.)
            },
        };

        Ok(*self.0.center_of_gravity.get_or_init(|| cog))
    }

    /// Number of sample points.
    pub fn len(&self) -> Result<usize> {
        Ok(self.array()?.len())
    }

    /// The sum of all membership values.
    pub fn cardinality(&self) -> Result<f64> {
        Ok(self.array()?.iter().sum())
    }

    /// The sum of all membership values by the number of values.
    pub fn relative_cardinality(&self) -> Result<f64> {
        let len = self.len()?;

        if len == 0 {
            return Err(configuration(format!("{self} has no sample points")));
        }

        Ok(self.cardinality()? / len as f64)
    }

    /// Same shape, divided by this set's current maximum so it peaks at 1.
    pub fn normalized(&self) -> Result<Set> {
        let height = self.array()?.iter().copied().fold(0., f64::max);

        if height <= 0. {
            return Err(configuration(format!("{self} is zero everywhere, can't normalize it")));
        }

        Ok(self.derive(functions::normalize(height, self.0.func.clone())?))
    }

    pub fn not_(&self) -> Set {
        self.derive(functions::inv(self.0.func.clone()))
    }

    /// Combine with `other` under any combinator.
    pub fn combine(&self, op: Combinator, other: &Set) -> Result<Set> {
        self.ensure_same_domain(other)?;

        Ok(self.derive(op.apply([self.0.func.clone(), other.0.func.clone()])?))
    }

    pub fn and_(&self, other: &Set) -> Result<Set> {
        self.combine(Combinator::Min, other)
    }

    pub fn or_(&self, other: &Set) -> Result<Set> {
        self.combine(Combinator::Max, other)
    }

    pub fn multiply(&self, other: &Set) -> Result<Set> {
        self.combine(Combinator::Product, other)
    }

    pub fn add(&self, other: &Set) -> Result<Set> {
        self.combine(Combinator::BoundedSum, other)
    }

    pub fn xor(&self, other: &Set) -> Result<Set> {
        self.combine(Combinator::SimpleDisjointSum, other)
    }

    /// Pointwise power, used by the hedges.
    pub fn power(&self, exponent: f64) -> Result<Set> {
        Ok(self.derive(functions::power(self.0.func.clone(), exponent)?))
    }

    pub(crate) fn with_func(&self, func: Membership) -> Set {
        self.derive(func)
    }

    /// Alternative to the hedge "very": squares every membership.
    pub fn concentrated(&self) -> Set {
        self.derive(Membership::Power {
            exponent: 2.,
            func: Box::new(self.0.func.clone()),
        })
    }

    /// Square root of every membership, widening the set.
    pub fn dilated(&self) -> Set {
        self.derive(Membership::Power {
            exponent: 0.5,
            func: Box::new(self.0.func.clone()),
        })
    }

    /// Increase memberships above 0.5, dampen the ones below.
    pub fn intensified(&self) -> Set {
        self.derive(functions::intensify(self.0.func.clone()))
    }

    fn bound_arrays<'a>(&'a self, other: &'a Set) -> Result<(&'a [f64], &'a [f64])> {
        if self.domain().is_none() || other.domain().is_none() {
            return Err(mismatch(format!("can't compare {self} and {other} without domains")));
        }

        Ok((self.array()?, other.array()?))
    }

    /// Both sets map their domains' sample points to exactly the same values.
    ///
    /// The domains don't have to be the same one.
    pub fn is_equal_to(&self, other: &Set) -> Result<bool> {
        let (a, b) = self.bound_arrays(other)?;

        Ok(a == b)
    }

    fn compare_pointwise(&self, other: &Set, cmp: impl Fn(f64, f64) -> bool) -> Result<bool> {
        let (a, b) = self.bound_arrays(other)?;
        self.ensure_same_domain(other)?;

        if a.len() == b.len() {
            return Ok(a.iter().zip(b).all(|(x, y)| cmp(*x, *y)));
        }

        // a singleton spike made the grids differ, sample both over the union
        let mut points = self.sample_points()?;
        points.extend(other.sample_points()?);
        points.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        points.dedup();

        Ok(points.into_iter().all(|x| cmp(self.call(x), other.call(x))))
    }

    /// `self <= other` everywhere.
    pub fn is_subset_of(&self, other: &Set) -> Result<bool> {
        self.compare_pointwise(other, |a, b| a <= b)
    }

    /// `self < other` everywhere.
    pub fn is_proper_subset_of(&self, other: &Set) -> Result<bool> {
        self.compare_pointwise(other, |a, b| a < b)
    }

    pub fn is_superset_of(&self, other: &Set) -> Result<bool> {
        self.compare_pointwise(other, |a, b| a >= b)
    }

    pub fn is_proper_superset_of(&self, other: &Set) -> Result<bool> {
        self.compare_pointwise(other, |a, b| a > b)
    }
}

impl From<Membership> for Set {
    fn from(func: Membership) -> Self {
        Set::new(func)
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Set {}

impl Hash for Set {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.domain(), self.name()) {
            (Some(domain), Some(name)) => write!(f, "{}.{name}", domain.name()),
            (None, Some(name)) => write!(f, "{name}"),
            (Some(_), None) => write!(f, "Set({})", self.0.func),
            (None, None) => write!(f, "dangling Set({})", self.0.func),
        }
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Set")
            .field("name", &self.name())
            .field("domain", &self.domain().map(|d| d.name().to_owned()))
            .field("func", &self.0.func)
            .finish()
    }
}

impl Not for &Set {
    type Output = Set;

    fn not(self) -> Set {
        self.not_()
    }
}

impl Neg for &Set {
    type Output = Set;

    fn neg(self) -> Set {
        self.not_()
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $op:ident) => {
        impl $trait<&Set> for &Set {
            type Output = Result<Set>;

            fn $method(self, rhs: &Set) -> Result<Set> {
                Set::$op(self, rhs)
            }
        }
    };
}

binary_op!(BitAnd, bitand, and_);
binary_op!(BitOr, bitor, or_);
binary_op!(BitXor, bitxor, xor);
binary_op!(Mul, mul, multiply);
binary_op!(Add, add, add);

#[cfg(test)]
fn simple() -> Domain {
    use crate::functions::{R, S};

    let d = Domain::new("simple", 0., 10., 1.).unwrap();
    d.add_set("low", S(0., 1.).unwrap()).unwrap();
    d.add_set("high", R(8., 10.).unwrap()).unwrap();
    d
}

#[test]
fn test_array() {
    let d = simple();
    let low = d.set("low").unwrap();
    let high = d.set("high").unwrap();

    assert_eq!(low.array().unwrap(), &[1., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0.]);
    assert_eq!(high.array().unwrap(), &[0., 0., 0., 0., 0., 0., 0., 0., 0., 0.5, 1.]);
    // upper boundary included
    assert_eq!(low.len().unwrap(), 11);
    assert_eq!(high.cardinality().unwrap(), 1.5);
}

#[test]
fn test_derived_sets_inherit_domain() {
    let d = simple();
    let low = d.set("low").unwrap();
    let high = d.set("high").unwrap();

    let either = (&low | &high).unwrap();
    assert_eq!(either.domain(), Some(d.clone()));
    assert_eq!(either.name(), None);
    assert_eq!(either.call(9.), 0.5);

    let neither = (&!&low & &!&high).unwrap();
    assert_eq!(neither.call(5.), 1.);
    assert_eq!((&low * &high).unwrap().call(9.), 0.);
    assert_eq!((&low + &high).unwrap().call(9.), 0.5);
    assert_eq!((&low ^ &high).unwrap().call(0.), 1.);
    assert_eq!((-&low).call(0.), 0.);
    assert_eq!(high.power(2.).unwrap().call(9.), 0.25);
    assert!(high.power(-1.).is_err());
}

#[test]
fn test_operators_need_same_domain() {
    let d = simple();
    let other = Domain::new("other", 0., 10., 1.).unwrap();
    let elsewhere = other.add_set("x", crate::functions::constant(1.).unwrap()).unwrap();
    let dangling = Set::new(crate::functions::constant(1.).unwrap());
    let low = d.set("low").unwrap();

    assert!(matches!(low.and_(&elsewhere), Err(crate::FuzzyError::DomainMismatch(_))));
    assert!(low.or_(&dangling).is_err());
    // two dangling sets may be combined
    assert!(dangling.and_(&dangling.not_()).is_ok());
}

#[test]
fn test_comparisons() {
    use crate::functions::{R, S};

    let d = simple();
    let low = d.set("low").unwrap();
    let twin = Set::new(S(0., 1.).unwrap());
    twin.bind_domain(&d).unwrap();

    assert_ne!(low, twin);
    assert!(low.is_equal_to(&twin).unwrap());
    assert!(!low.is_equal_to(&d.set("high").unwrap()).unwrap());

    let everything = Set::new(crate::functions::constant(1.).unwrap());
    everything.bind_domain(&d).unwrap();
    assert!(low.is_subset_of(&everything).unwrap());
    assert!(!low.is_proper_subset_of(&everything).unwrap());
    assert!(everything.is_superset_of(&low).unwrap());
    assert!(!everything.is_proper_superset_of(&low).unwrap());

    let a = Set::new(R(0., 1.).unwrap());
    let b = Set::new(R(0., 1.).unwrap());
    assert!(a.is_equal_to(&b).is_err());
    assert!(a.is_subset_of(&b).is_err());
}

#[test]
fn test_center_of_gravity() {
    use crate::functions::{constant, triangular};

    let d = Domain::new("d", 0., 10., 0.5).unwrap();
    let peak = d.add_set("peak", triangular(2., 6., None, 1., 0.).unwrap()).unwrap();
    let nothing = d.add_set("nothing", constant(0.).unwrap()).unwrap();

    assert!((peak.center_of_gravity().unwrap() - 4.).abs() < 1e-9);
    assert_eq!(nothing.center_of_gravity().unwrap(), 0.);
    assert!(Set::new(constant(1.).unwrap()).center_of_gravity().is_err());
}

#[test]
fn test_normalized() {
    use crate::functions::triangular;

    let d = simple();
    let half = d.add_set("half", triangular(2., 8., None, 0.5, 0.).unwrap()).unwrap();
    let normalized = half.normalized().unwrap();

    assert_eq!(normalized.call(5.), 1.);
    assert!(normalized.normalized().unwrap().is_equal_to(&normalized).unwrap());
    assert!(d.add_set("zero", crate::functions::constant(0.).unwrap()).unwrap().normalized().is_err());
}

#[test]
fn test_display() {
    let d = simple();

    assert_eq!(d.set("low").unwrap().to_string(), "simple.low");
    assert_eq!(Set::new(crate::functions::noop()).to_string(), "dangling Set(noop())");
}

#[test]
fn test_modified_sets() {
    let d = simple();
    let high = d.set("high").unwrap();

    assert_eq!(high.relative_cardinality().unwrap(), 1.5 / 11.);
    assert_eq!(high.concentrated().call(9.), 0.25);
    assert_eq!(high.dilated().call(9.), 0.5f64.powf(0.5));
    assert_eq!(high.intensified().call(9.), 0.5);
    assert_eq!(high.intensified().call(10.), 1.);
    assert_eq!(high.concentrated().domain(), Some(d));
}

#[test]
fn test_evaluate_checks_range() {
    let d = Domain::new("d", -100., 100., 1.).unwrap();
    let rising = d.add_set("rising", crate::functions::R(0., 10.).unwrap()).unwrap();

    assert_eq!(rising.evaluate(5.).unwrap(), 0.5);
    assert!(matches!(rising.evaluate(1000.), Err(crate::FuzzyError::OutOfRange { .. })));
    assert_eq!(rising.call(1000.), 1.);
    // nothing to check against
    assert_eq!(Set::new(crate::functions::R(0., 10.).unwrap()).evaluate(1000.).unwrap(), 1.);
}

#[test]
fn test_comparisons_over_merged_points() {
    use crate::functions::{constant, singleton};

    let d = simple();
    let spike = singleton(2.5, 0., 1.).unwrap();
    spike.bind_domain(&d).unwrap();
    let everything = Set::new(constant(1.).unwrap());
    everything.bind_domain(&d).unwrap();
    let nothing = Set::new(constant(0.).unwrap());
    nothing.bind_domain(&d).unwrap();

    assert_eq!(spike.len().unwrap(), 12);
    assert_eq!(everything.len().unwrap(), 11);
    assert!(!spike.is_equal_to(&everything).unwrap());

    assert!(spike.is_subset_of(&everything).unwrap());
    assert!(everything.is_superset_of(&spike).unwrap());
    assert!(!spike.is_proper_subset_of(&everything).unwrap());
    // only the spike, which lies off the grid, rises above nothing
    assert!(spike.is_superset_of(&nothing).unwrap());
    assert!(!nothing.is_superset_of(&spike).unwrap());
}
