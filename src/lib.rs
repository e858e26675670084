//! Fuzzy logic: domains of linguistic variables, membership functions and the sets built
//! from them, rule inference across domains and defuzzification back to crisp values.
//!
//! ```
//! use fuzzylogic::functions::{R, S};
//! use fuzzylogic::Domain;
//!
//! let temp = Domain::new("temperature", -100., 100., 0.1)?;
//! let cold = temp.add_set("cold", S(0., 15.)?)?;
//! let hot = temp.add_set("hot", R(10., 30.)?)?;
//! temp.add_set("warm", (&!&cold & &!&hot)?)?;
//!
//! let memberships: Vec<f64> = temp.evaluate(6.)?.into_values().collect();
//! assert_eq!(memberships, [0.6, 0., 0.4]);
//! # Ok::<(), fuzzylogic::FuzzyError>(())
//! ```

pub mod combinators;
pub mod config;
pub mod defuzz;
mod domain;
mod error;
pub mod functions;
pub mod hedges;
mod inputs;
mod linspace;
mod math;
mod rule;
mod set;
mod table;
pub mod tools;
pub mod truth;

pub use combinators::Combinator;
pub use config::DomainConfig;
pub use defuzz::Method;
pub use domain::Domain;
pub use error::{FuzzyError, Result};
pub use functions::Membership;
pub use hedges::Hedge;
pub use inputs::Inputs;
pub use rule::{Antecedent, Rule};
pub use set::Set;
pub use table::rule_from_table;
