use std::collections::HashMap;

use crate::domain::Domain;

/// Crisp values of the domains a rule reads from.
#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) HashMap<Domain, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add(&mut self, domain: &Domain, val: f64) -> &mut Self {
        self.0.insert(domain.clone(), val);
        self
    }

    pub fn get(&self, domain: &Domain) -> Option<f64> {
        self.0.get(domain).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'d> FromIterator<(&'d Domain, f64)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (&'d Domain, f64)>>(iter: I) -> Self {
        Inputs(iter.into_iter().map(|(domain, val)| (domain.clone(), val)).collect())
    }
}
