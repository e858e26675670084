use thiserror::Error;

/// Everything that can go wrong while building or evaluating fuzzy structures.
///
/// Membership functions themselves never fail once built: all of these are raised
/// either at construction time or by the Domain/Set/Rule layer around them.
#[derive(Debug, Error)]
pub enum FuzzyError {
    /// Invalid constructor parameters, identifiers or bindings.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Operands live in different domains, or a domain is needed but missing.
    #[error("domain mismatch: {0}")]
    DomainMismatch(String),

    #[error("{value} is outside of domain {domain} [{low}, {high}]")]
    OutOfRange { domain: String, value: f64, low: f64, high: f64 },

    #[error("cannot defuzzify: {0}")]
    Defuzzification(String),

    /// Malformed configuration document.
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = FuzzyError> = std::result::Result<T, E>;

pub(crate) fn configuration(msg: impl Into<String>) -> FuzzyError {
    FuzzyError::Configuration(msg.into())
}

pub(crate) fn mismatch(msg: impl Into<String>) -> FuzzyError {
    FuzzyError::DomainMismatch(msg.into())
}
