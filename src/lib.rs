//! # HerdDx - Fuzzy Disease Risk Diagnosis for Cattle
//!
//! This crate provides a Mamdani-style fuzzy inference engine for diagnosing
//! cattle disease risk from physiological measurements (body temperature,
//! heart rate, respiration, appetite scores and similar observations).
//!
//! ## Features
//!
//! - **Fuzzy Sets**: Membership functions (triangular, trapezoidal, gaussian)
//! - **Fuzzification**: Crisp readings to membership degrees with dominant-set detection
//! - **Rule Evaluation**: IF-THEN rules with min-AND antecedents and weighted activation
//! - **Aggregation**: Clip-then-max Mamdani aggregation over a sampled output universe
//! - **Defuzzification**: Centroid, bisector, and maximum-family methods
//! - **Interpretation**: Risk banding, disease ranking, and severity classification
//! - **Explainability**: Every diagnosis carries its full audit trail
//!
//! ## Example
//!
//! ```rust
//! use herddx::{
//!     DefuzzificationMethod, FuzzyEngine, FuzzySet, MembershipFunction, Parameter,
//!     ParameterRole, Registry, Rule, RuleTerm,
//! };
//! use indexmap::IndexMap;
//!
//! # fn main() -> herddx::Result<()> {
//! let mut registry = Registry::new();
//! registry.add_parameter(Parameter::new("suhu_tubuh", "°C", 35.0, 42.0, ParameterRole::Input));
//! registry.add_parameter(Parameter::new("risiko", "%", 0.0, 100.0, ParameterRole::Output));
//!
//! registry.add_fuzzy_set(FuzzySet::new(
//!     "demam",
//!     "suhu_tubuh",
//!     MembershipFunction::Triangular { a: 38.5, b: 40.0, c: 41.5 },
//! ))?;
//! registry.add_fuzzy_set(FuzzySet::new(
//!     "tinggi",
//!     "risiko",
//!     MembershipFunction::Triangular { a: 50.0, b: 75.0, c: 100.0 },
//! ))?;
//!
//! let rules = vec![Rule::new(
//!     "demam_risiko_tinggi",
//!     vec![RuleTerm::new("suhu_tubuh", "demam")],
//!     vec![RuleTerm::new("risiko", "tinggi")],
//! )];
//!
//! let mut inputs = IndexMap::new();
//! inputs.insert("suhu_tubuh".to_string(), 39.5);
//!
//! let engine = FuzzyEngine::new();
//! let result = engine.diagnose(&inputs, &registry, &rules, DefuzzificationMethod::Centroid)?;
//! assert!(!result.outputs[0].no_rules_fired);
//! # Ok(())
//! # }
//! ```
//!
//! ## Design
//!
//! The engine is a pure, synchronous pipeline: fuzzification, rule evaluation,
//! aggregation, defuzzification, interpretation. Each stage produces an
//! immutable value consumed by the next; no stage reaches back. Parameter,
//! fuzzy set, and rule definitions are supplied by the caller as already
//! validated reference data, and every diagnosis allocates its own working
//! state, so concurrent invocations never share mutable data.

pub mod aggregate;
pub mod defuzz;
pub mod engine;
pub mod fuzzifier;
pub mod interpret;
pub mod membership;
pub mod model;
pub mod rules;

pub use aggregate::{AggregatedOutput, CurvePoint};
pub use defuzz::DefuzzificationMethod;
pub use engine::{DiagnosisResult, EngineConfig, FallbackValue, FuzzyEngine, OutputAssessment};
pub use fuzzifier::{FuzzifiedInput, MembershipResult, ParameterReading};
pub use interpret::{DiseaseScore, RiskBands, RiskCategory};
pub use membership::{MembershipFunction, MembershipKind, Universe};
pub use model::{
    DiagnosticWarning, FuzzySet, Parameter, ParameterRole, Registry, Rule, RuleTerm, Severity,
};
pub use rules::RuleActivation;

/// Core error type for fuzzy inference operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FuzzyError {
    /// Malformed membership function definition (wrong arity, decreasing
    /// breakpoints, non-positive sigma)
    #[error("invalid membership function parameter: {0}")]
    InvalidParameter(String),

    /// An input value references a parameter absent from the registry
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Structural configuration problem (dangling rule reference, weight out
    /// of range, bad engine settings)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The aggregated output set has zero membership everywhere, so the
    /// requested defuzzification method is undefined
    #[error("cannot defuzzify output '{0}': aggregated membership is zero everywhere")]
    EmptyAggregate(String),
}

/// Result type alias for fuzzy inference operations
pub type Result<T> = std::result::Result<T, FuzzyError>;

/// Comparison tolerance used for membership degrees and curve maxima
pub(crate) const EPSILON: f64 = 1e-10;
