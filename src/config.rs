use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::error::Result;
use crate::functions::Membership;

fn default_res() -> f64 {
    1.
}

/// Serializable description of a domain and its sets.
///
/// ```json
/// {
///   "name": "temperature", "low": -100, "high": 100, "res": 0.1,
///   "sets": {
///     "cold": {"family": "S", "low": 0, "high": 15},
///     "hot": {"family": "R", "low": 10, "high": 30}
///   }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub name: String,
    pub low: f64,
    pub high: f64,
    #[serde(default = "default_res")]
    pub res: f64,
    #[serde(default)]
    pub sets: IndexMap<String, Membership>,
}

impl DomainConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every set before building anything, so a bad set never leaves a half
    /// populated domain behind.
    pub fn build(&self) -> Result<Domain> {
        for func in self.sets.values() {
            func.validate()?;
        }

        let domain = Domain::new(self.name.as_str(), self.low, self.high, self.res)?;

        for (name, func) in &self.sets {
            domain.add_set(name, func.clone())?;
        }

        Ok(domain)
    }
}

impl From<&Domain> for DomainConfig {
    fn from(domain: &Domain) -> Self {
        DomainConfig {
            name: domain.name().to_owned(),
            low: domain.low(),
            high: domain.high(),
            res: domain.res(),
            sets: domain
                .sets()
                .into_iter()
                .map(|(name, set)| (name, set.func().clone()))
                .collect(),
        }
    }
}

/// Builds every domain of a JSON array of [`DomainConfig`]s.
pub fn load_domains(json: &str) -> Result<Vec<Domain>> {
    let configs: Vec<DomainConfig> = serde_json::from_str(json)?;

    configs.iter().map(DomainConfig::build).collect()
}

#[cfg(test)]
const TEMPERATURE: &str = r#"{
    "name": "temperature",
    "low": -100,
    "high": 100,
    "res": 0.1,
    "sets": {
        "cold": {"family": "S", "low": 0, "high": 15},
        "hot": {"family": "R", "low": 10, "high": 30},
        "warm": {
            "family": "combination",
            "op": "min",
            "operands": [
                {"family": "inv", "func": {"family": "S", "low": 0, "high": 15}},
                {"family": "inv", "func": {"family": "R", "low": 10, "high": 30}}
            ]
        }
    }
}"#;

#[test]
fn test_build_from_json() {
    let temp = DomainConfig::from_json(TEMPERATURE).unwrap().build().unwrap();
    let got: Vec<_> = temp.evaluate(6.).unwrap().into_values().collect();

    assert_eq!(temp.name(), "temperature");
    assert_eq!(temp.res(), 0.1);
    assert_eq!(got, vec![0.6, 0., 0.4]);
}

#[test]
fn test_config_of_domain() {
    use crate::functions::{gauss, S};

    let d = Domain::new("d", 0., 10., None).unwrap();
    d.add_set("low", S(0., 5.).unwrap()).unwrap();
    d.add_set("mid", gauss(5., 0.5, 1.).unwrap()).unwrap();

    let config = DomainConfig::from(&d);
    let rebuilt = DomainConfig::from_json(&config.to_json().unwrap()).unwrap();

    assert_eq!(rebuilt, config);
    assert_eq!(rebuilt.build().unwrap().set_names(), ["low", "mid"]);
}

#[test]
fn test_config_errors() {
    use crate::FuzzyError;

    let bad_set = r#"{"name": "d", "low": 0, "high": 1, "sets": {"g": {"family": "gauss", "c": 0, "b": 0, "c_m": 1}}}"#;
    assert!(matches!(DomainConfig::from_json(bad_set).unwrap().build(), Err(FuzzyError::Configuration(_))));

    let bad_bounds = r#"{"name": "d", "low": 1, "high": 0}"#;
    assert!(matches!(DomainConfig::from_json(bad_bounds).unwrap().build(), Err(FuzzyError::Configuration(_))));

    assert!(matches!(DomainConfig::from_json("{\"name\": 1}"), Err(FuzzyError::Config(_))));
    assert!(matches!(
        DomainConfig::from_json(r#"{"name": "d", "low": 0, "high": 1, "sets": {"x": {"family": "wobbly"}}}"#),
        Err(FuzzyError::Config(_))
    ));

    let both = format!("[{TEMPERATURE}, {bad_bounds}]");
    assert!(load_domains(&both).is_err());
    assert_eq!(load_domains(&format!("[{TEMPERATURE}]")).unwrap().len(), 1);
}
