use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{configuration, FuzzyError, Result};
use crate::linspace::Linspace;
use crate::set::Set;

/// A linguistic variable: a bounded, discretized range of values and the named fuzzy sets
/// living on it.
///
/// Handles are cheap to clone and compare by identity. Sets only hold a weak reference back,
/// so a domain lives as long as some handle to it does.
#[derive(Clone)]
pub struct Domain(pub(crate) Rc<DomainInner>);

pub(crate) struct DomainInner {
    name: String,
    low: f64,
    high: f64,
    res: f64,
    len: usize,
    sets: RefCell<IndexMap<String, Set>>,
}

/// Upper bound on the number of sample points of a domain.
pub(crate) const MAX_POINTS: usize = 10_000_000;

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

impl Domain {
    /// `res` is the stride between sample points, both bounds are always sampled.
    pub fn new(name: impl Into<String>, low: f64, high: f64, res: impl Into<Option<f64>>) -> Result<Self> {
        let name = name.into();
        let res = res.into().unwrap_or(1.);

        if !is_identifier(&name) {
            return Err(configuration(format!("{name:?} is not a valid identifier")));
        }
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(configuration(format!("{name}: need finite low < high, got {low} and {high}")));
        }
        if !(res.is_finite() && res > 0.) {
            return Err(configuration(format!("{name}: resolution must be finite and positive, got {res}")));
        }

        let ratio = (high - low) / res;
        if !(ratio.is_finite() && ratio < MAX_POINTS as f64) {
            return Err(configuration(format!(
                "{name}: resolution {res} over [{low}, {high}] needs more than {MAX_POINTS} points"
            )));
        }

        let len = Linspace::count(low, high, res);

        debug!(domain = %name, low, high, res, points = len, "created domain");

        Ok(Domain(Rc::new(DomainInner {
            name,
            low,
            high,
            res,
            len,
            sets: RefCell::new(IndexMap::new()),
        })))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn low(&self) -> f64 {
        self.0.low
    }

    pub fn high(&self) -> f64 {
        self.0.high
    }

    pub fn res(&self) -> f64 {
        self.0.res
    }

    /// Actual distance between two sample points. Equals `res` unless it doesn't divide the range.
    pub fn step(&self) -> f64 {
        (self.0.high - self.0.low) / (self.0.len - 1) as f64
    }

    /// Sample points from `low` to `high`, both included exactly.
    pub fn range(&self) -> Vec<f64> {
        Linspace::new(self.0.low, self.0.high, self.0.len).collect()
    }

    pub fn contains(&self, x: f64) -> bool {
        self.0.low <= x && x <= self.0.high
    }

    pub(crate) fn check_range(&self, x: f64) -> Result<()> {
        if self.contains(x) {
            Ok(())
        } else {
            Err(FuzzyError::OutOfRange {
                domain: self.0.name.clone(),
                value: x,
                low: self.0.low,
                high: self.0.high,
            })
        }
    }

    /// Registers a set under `name`, replacing whatever was registered there before.
    ///
    /// A bare [`crate::Membership`] is wrapped into a fresh set. The set gets bound to this
    /// domain and named for good; a set already bound elsewhere or named differently is
    /// rejected without touching the registry.
    pub fn add_set(&self, name: &str, set: impl Into<Set>) -> Result<Set> {
        let set = set.into();

        if !is_identifier(name) {
            return Err(configuration(format!("{name:?} is not a valid set name")));
        }
        set.check_domain_binding(self)?;
        set.check_name_binding(name)?;

        set.bind_domain(self)?;
        set.bind_name(name);

        debug!(domain = %self.0.name, set = name, func = %set.func(), "registered set");

        self.0.sets.borrow_mut().insert(name.to_owned(), set.clone());

        Ok(set)
    }

    pub fn set(&self, name: &str) -> Option<Set> {
        self.0.sets.borrow().get(name).cloned()
    }

    /// Unregisters a set. The set itself stays bound to this domain.
    pub fn remove_set(&self, name: &str) -> Option<Set> {
        let removed = self.0.sets.borrow_mut().shift_remove(name);

        if removed.is_some() {
            debug!(domain = %self.0.name, set = name, "removed set");
        }

        removed
    }

    /// Registered sets in registration order.
    pub fn sets(&self) -> Vec<(String, Set)> {
        self.0
            .sets
            .borrow()
            .iter()
            .map(|(name, set)| (name.clone(), set.clone()))
            .collect()
    }

    pub fn set_names(&self) -> Vec<String> {
        self.0.sets.borrow().keys().cloned().collect()
    }

    /// Membership of `x` in every registered set.
    pub fn evaluate(&self, x: f64) -> Result<IndexMap<Set, f64>> {
        self.check_range(x)?;

        Ok(self
            .0
            .sets
            .borrow()
            .values()
            .map(|set| (set.clone(), set.call(x)))
            .collect())
    }

    fn reduce(&self, x: f64, f: fn(f64, f64) -> f64) -> Result<f64> {
        self.check_range(x)?;

        self.0
            .sets
            .borrow()
            .values()
            .map(|set| set.call(x))
            .reduce(f)
            .ok_or_else(|| configuration(format!("{} has no sets", self.0.name)))
    }

    /// Smallest membership of `x` over all registered sets.
    pub fn min(&self, x: f64) -> Result<f64> {
        self.reduce(x, f64::min)
    }

    /// Largest membership of `x` over all registered sets.
    pub fn max(&self, x: f64) -> Result<f64> {
        self.reduce(x, f64::max)
    }
}

impl PartialEq for Domain {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Domain {}

impl Hash for Domain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Domain")
            .field("name", &self.0.name)
            .field("low", &self.0.low)
            .field("high", &self.0.high)
            .field("res", &self.0.res)
            .field("sets", &self.set_names())
            .finish()
    }
}

#[cfg(test)]
fn temperature() -> Domain {
    use crate::functions::{R, S};

    let temp = Domain::new("temperature", -100., 100., 1.).unwrap();
    let cold = temp.add_set("cold", S(0., 15.).unwrap()).unwrap();
    let hot = temp.add_set("hot", R(10., 30.).unwrap()).unwrap();
    temp.add_set("warm", (&!&cold & &!&hot).unwrap()).unwrap();
    temp
}

#[test]
fn test_temperature() {
    let temp = temperature();
    let got = temp.evaluate(6.).unwrap();
    let by_name: Vec<_> = got.iter().map(|(set, m)| (set.name().unwrap().to_owned(), *m)).collect();

    assert_eq!(
        by_name,
        vec![("cold".to_owned(), 0.6), ("hot".to_owned(), 0.), ("warm".to_owned(), 0.4)]
    );
    assert_eq!(temp.min(6.).unwrap(), 0.);
    assert_eq!(temp.max(6.).unwrap(), 0.6);
}

#[test]
fn test_out_of_range() {
    let temp = temperature();

    assert!(matches!(temp.evaluate(100.5), Err(FuzzyError::OutOfRange { .. })));
    assert!(matches!(temp.max(-101.), Err(FuzzyError::OutOfRange { .. })));
    assert!(temp.evaluate(100.).is_ok());
}

#[test]
fn test_range() {
    let d = Domain::new("d", 0., 1.3, 0.0001).unwrap();
    let range = d.range();

    assert_eq!(range.len(), 13001);
    assert_eq!(range[0], 0.);
    assert_eq!(range[13000], 1.3);

    let d = Domain::new("d", 0., 10., None).unwrap();
    assert_eq!(d.range(), (0..=10).map(f64::from).collect::<Vec<_>>());
    assert_eq!(d.step(), 1.);
}

#[test]
fn test_new_rejects() {
    assert!(Domain::new("3d", 0., 1., 1.).is_err());
    assert!(Domain::new("d", 1., 1., 1.).is_err());
    assert!(Domain::new("d", 0., f64::INFINITY, 1.).is_err());
    assert!(Domain::new("d", 0., 1., 0.).is_err());
    assert!(Domain::new("d", 0., 1., f64::NAN).is_err());
    assert!(Domain::new("größe", 0., 1., 0.1).is_ok());
    assert!(matches!(Domain::new("d", 0., 1., 1e-300), Err(FuzzyError::Configuration(_))));
    assert!(Domain::new("d", -1e308, 1e308, 1.).is_err());
    assert!(Domain::new("d", 0., 1., 1e-8).is_err());
}

#[test]
fn test_coarse_resolution() {
    let d = Domain::new("d", 0., 0.5, 9.4).unwrap();

    assert_eq!(d.range(), [0., 0.5]);
    assert_eq!(d.step(), 0.5);
}

#[test]
fn test_registry() {
    use crate::functions::{constant, R};

    let temp = temperature();
    let other = Domain::new("other", 0., 1., 0.1).unwrap();
    let cold = temp.set("cold").unwrap();

    assert_eq!(cold.domain(), Some(temp.clone()));
    assert_eq!(cold.name(), Some("cold"));
    assert!(other.add_set("cold", cold.clone()).is_err());
    assert!(temp.add_set("chilly", cold.clone()).is_err());
    assert!(temp.add_set("not valid", constant(1.).unwrap()).is_err());
    // registering the same set under its own name again is fine
    assert_eq!(temp.add_set("cold", cold.clone()).unwrap(), cold);

    let scorching = temp.add_set("hot", R(30., 50.).unwrap()).unwrap();
    assert_eq!(temp.set("hot"), Some(scorching));
    assert_eq!(temp.set_names(), ["cold", "hot", "warm"]);

    assert_eq!(temp.remove_set("cold"), Some(cold));
    assert_eq!(temp.remove_set("cold"), None);
    assert_eq!(temp.sets().len(), 2);

    let empty = Domain::new("empty", 0., 1., 0.1).unwrap();
    assert!(matches!(empty.min(0.5), Err(FuzzyError::Configuration(_))));
    assert!(empty.evaluate(0.5).unwrap().is_empty());
}
