use std::collections::HashMap;
use std::fmt;
use std::ops::BitOr;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::defuzz::{aggregate, cog, Method};
use crate::domain::Domain;
use crate::error::{configuration, mismatch, FuzzyError, Result};
use crate::inputs::Inputs;
use crate::set::Set;

/// The sets that all have to hold for a condition to fire.
///
/// Unordered and free of duplicates: `(a, b)` and `(b, a, b)` are the same antecedent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Antecedent(Vec<Set>);

impl Antecedent {
    pub fn new(sets: impl IntoIterator<Item = Set>) -> Self {
        let mut sets: Vec<_> = sets.into_iter().collect();

        sets.sort_unstable_by_key(Set::id);
        sets.dedup();

        Antecedent(sets)
    }

    pub fn sets(&self) -> &[Set] {
        &self.0
    }

    pub fn contains(&self, set: &Set) -> bool {
        self.0.contains(set)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sets: Vec<_> = self.0.iter().map(Set::to_string).collect();
        write!(f, "({})", sets.join(", "))
    }
}

/// A collection of conditions spanning several domains, all concluding into one target domain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rule {
    conditions: IndexMap<Antecedent, Set>,
}

fn check_targets<'s>(consequents: impl IntoIterator<Item = &'s Set>) -> Result<()> {
    let mut consequents = consequents.into_iter();
    let Some(first) = consequents.next() else {
        return Ok(());
    };
    let target = first.domain();

    for then in consequents {
        if then.domain() != target {
            return Err(mismatch(format!("consequents {first} and {then} have different domains")));
        }
    }

    Ok(())
}

impl Rule {
    /// Builds a rule from `(antecedent sets, consequent)` pairs. A later pair replaces an
    /// earlier one with the same antecedent.
    pub fn new<A>(conditions: impl IntoIterator<Item = (A, Set)>) -> Result<Self>
    where
        A: IntoIterator<Item = Set>,
    {
        let conditions: IndexMap<_, _> = conditions
            .into_iter()
            .map(|(antecedent, then)| (Antecedent::new(antecedent), then))
            .collect();

        check_targets(conditions.values())?;

        Ok(Rule { conditions })
    }

    /// All conditions of both rules, `other` winning on identical antecedents.
    pub fn union(&self, other: &Rule) -> Result<Rule> {
        let mut conditions = self.conditions.clone();

        conditions.extend(other.conditions.iter().map(|(k, v)| (k.clone(), v.clone())));
        check_targets(conditions.values())?;

        Ok(Rule { conditions })
    }

    /// Union of any number of rules, left to right.
    pub fn combine(rules: impl IntoIterator<Item = Rule>) -> Result<Rule> {
        rules.into_iter().try_fold(Rule::default(), |acc, rule| acc.union(&rule))
    }

    /// The consequent of exactly this antecedent, if any.
    pub fn get(&self, antecedent: impl IntoIterator<Item = Set>) -> Option<&Set> {
        self.conditions.get(&Antecedent::new(antecedent))
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&Antecedent, &Set)> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Domain of the consequents, `None` for a rule without conditions.
    pub fn target_domain(&self) -> Result<Option<Domain>> {
        let Some(then) = self.conditions.values().next() else {
            return Ok(None);
        };

        then.domain()
            .map(Some)
            .ok_or_else(|| mismatch(format!("consequent {then} is not bound to a domain")))
    }

    /// Infers a crisp value of the target domain from `inputs`.
    ///
    /// Each condition fires with the smallest membership among its antecedents. Returns
    /// `None` if no condition fires at all.
    pub fn evaluate(&self, inputs: &Inputs, method: Method) -> Result<Option<f64>> {
        let Some(target) = self.target_domain()? else {
            return Ok(None);
        };
        let mut actual_values: HashMap<&Set, f64> = HashMap::new();
        let mut target_weights = Vec::new();

        for (antecedent, then) in &self.conditions {
            let mut strength: Option<f64> = None;

            for set in antecedent.sets() {
                let m = match actual_values.get(set) {
                    Some(m) => *m,
                    None => {
                        let m = membership(set, inputs)?;
                        actual_values.insert(set, m);
                        m
                    },
                };
                strength = Some(strength.map_or(m, |s| s.min(m)));
            }

            let strength = strength.unwrap_or(0.);

            if strength > 0. {
                trace!(antecedent = %antecedent, then = %then, strength, "condition fired");
                target_weights.push((then.clone(), strength));
            }
        }

        if target_weights.is_empty() {
            debug!(target = %target, "no condition fired");
            return Ok(None);
        }

        trace!(target = %target, method = %method, fired = target_weights.len(), "defuzzificating");

        match method {
            Method::Cog => cog(&target_weights).map(Some),
            _ => {
                let points = target.range();
                let aggregated = aggregate(&points, &target_weights);

                method
                    .call(&points, &aggregated, target.step())
                    .map(Some)
                    .ok_or_else(|| FuzzyError::Defuzzification(format!("{target} has no sample points")))
            },
        }
    }

    /// Same as [`Rule::evaluate`] with center of gravity.
    pub fn call(&self, inputs: &Inputs) -> Result<Option<f64>> {
        self.evaluate(inputs, Method::Cog)
    }
}

fn membership(set: &Set, inputs: &Inputs) -> Result<f64> {
    let domain = set
        .domain()
        .ok_or_else(|| mismatch(format!("antecedent {set} is not bound to a domain")))?;
    let value = inputs
        .get(&domain)
        .ok_or_else(|| configuration(format!("no input value for domain {domain}")))?;

    domain.check_range(value)?;

    Ok(set.call(value))
}

impl BitOr<&Rule> for &Rule {
    type Output = Result<Rule>;

    fn bitor(self, rhs: &Rule) -> Result<Rule> {
        self.union(rhs)
    }
}

#[cfg(test)]
pub(crate) struct Caro {
    pub(crate) temp: Domain,
    pub(crate) tan: Domain,
    pub(crate) gef: Domain,
}

#[cfg(test)]
impl Caro {
    pub(crate) fn new() -> Self {
        use crate::functions::{trapezoid, R, S};

        let temp = Domain::new("Temperatur", -30., 100., 0.0001).unwrap();
        let kalt = temp.add_set("kalt", S(-10., 30.).unwrap()).unwrap();
        let heiss = temp.add_set("heiß", R(30., 70.).unwrap()).unwrap();
        temp.add_set("mittel", (&!&heiss & &!&kalt).unwrap()).unwrap();

        let tan = Domain::new("tandelta", 0., 1.3, 0.0001).unwrap();
        let klein = tan.add_set("klein", S(0.1, 0.5).unwrap()).unwrap();
        let gross = tan.add_set("groß", R(0.5, 0.9).unwrap()).unwrap();
        tan.add_set("mittel", (&!&gross & &!&klein).unwrap()).unwrap();

        let gef = Domain::new("Gefahrenbewertung", -0.5, 1.5, 0.0001).unwrap();
        gef.add_set("klein", trapezoid(-0.5, 0., 0., 0.5, 1., 0.).unwrap()).unwrap();
        gef.add_set("groß", trapezoid(0.5, 1., 1., 1.5, 1., 0.).unwrap()).unwrap();
        gef.add_set("mittel", trapezoid(0., 0.5, 0.5, 1., 1., 0.).unwrap()).unwrap();

        Caro { temp, tan, gef }
    }

    fn single(&self, t: &str, d: &str, g: &str) -> Rule {
        let at = |domain: &Domain, name: &str| domain.set(name).unwrap();

        Rule::new([([at(&self.temp, t), at(&self.tan, d)], at(&self.gef, g))]).unwrap()
    }

    pub(crate) fn rules(&self) -> Rule {
        Rule::combine([
            self.single("kalt", "klein", "klein"),
            self.single("mittel", "klein", "klein"),
            self.single("heiß", "klein", "klein"),
            self.single("kalt", "mittel", "klein"),
            self.single("mittel", "mittel", "mittel"),
            self.single("heiß", "mittel", "groß"),
            self.single("kalt", "groß", "mittel"),
            self.single("mittel", "groß", "groß"),
            self.single("heiß", "groß", "groß"),
        ])
        .unwrap()
    }

    pub(crate) fn inputs(&self, temp: f64, tan: f64) -> Inputs {
        [(&self.temp, temp), (&self.tan, tan)].into_iter().collect()
    }
}

#[test]
fn test_caro_cog() {
    let caro = Caro::new();
    let rules = caro.rules();

    assert_eq!(rules.len(), 9);
    assert_eq!(rules.target_domain().unwrap(), Some(caro.gef.clone()));

    let result = rules.call(&caro.inputs(20., 0.55)).unwrap().unwrap();
    assert!((result - 0.45).abs() < 1e-4, "{result}");
}

#[test]
fn test_caro_aggregated() {
    let caro = Caro::new();
    let rules = caro.rules();
    let inputs = caro.inputs(20., 0.55);
    let eval = |method| rules.evaluate(&inputs, method).unwrap().unwrap();

    // gef.mittel clipped at 0.75 dominates: a plateau over [0.375, 0.625]
    assert!((eval(Method::Mom) - 0.5).abs() < 1e-3);
    assert!((eval(Method::Som) - 0.375).abs() < 1e-3);
    assert!((eval(Method::Lom) - 0.625).abs() < 1e-3);

    let bisector = eval(Method::Bisector);
    assert!(bisector > 0.375 && bisector < 0.625, "{bisector}");
}

#[test]
fn test_nothing_fires() {
    let caro = Caro::new();
    let heiss = caro.temp.set("heiß").unwrap();
    let rule = Rule::new([([heiss], caro.gef.set("groß").unwrap())]).unwrap();

    assert_eq!(rule.call(&caro.inputs(0., 0.)).unwrap(), None);
    assert_eq!(rule.evaluate(&caro.inputs(0., 0.), Method::Lom).unwrap(), None);
    assert_eq!(Rule::default().call(&Inputs::new()).unwrap(), None);

    // an empty antecedent never fires
    let empty = Rule::new([(Vec::new(), caro.gef.set("groß").unwrap())]).unwrap();
    assert_eq!(empty.call(&caro.inputs(0., 0.)).unwrap(), None);
}

#[test]
fn test_bad_inputs() {
    let caro = Caro::new();
    let rules = caro.rules();

    let mut inputs = Inputs::new();
    inputs.add(&caro.temp, 20.);
    assert!(matches!(rules.call(&inputs), Err(FuzzyError::Configuration(_))));
    assert!(matches!(rules.call(&caro.inputs(120., 0.5)), Err(FuzzyError::OutOfRange { .. })));
}

#[test]
fn test_construction() {
    let caro = Caro::new();
    let kalt = caro.temp.set("kalt").unwrap();
    let klein = caro.tan.set("klein").unwrap();
    let gef_klein = caro.gef.set("klein").unwrap();
    let gef_gross = caro.gef.set("groß").unwrap();

    // consequents from different domains
    assert!(matches!(
        Rule::new([([kalt.clone()], gef_klein.clone()), ([klein.clone()], kalt.clone())]),
        Err(FuzzyError::DomainMismatch(_))
    ));

    let first = Rule::new([([kalt.clone(), klein.clone()], gef_klein.clone())]).unwrap();
    let second = Rule::new([([klein.clone(), kalt.clone(), klein.clone()], gef_gross.clone())]).unwrap();
    let union = (&first | &second).unwrap();

    assert_eq!(union.len(), 1);
    assert_eq!(union.get([kalt.clone(), klein.clone()]), Some(&gef_gross));
    assert_eq!(first.get([klein.clone(), kalt.clone()]), Some(&gef_klein));
    assert_eq!(first.get([kalt.clone()]), None);

    let wrong = Rule::new([([kalt.clone()], klein.clone())]).unwrap();
    assert!(first.union(&wrong).is_err());
    assert_eq!(Rule::combine([]).unwrap(), Rule::default());
}
