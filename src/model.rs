//! Reference data model
//!
//! Parameters, fuzzy sets, and rules are authored outside the engine (a
//! configuration store owns them) and handed in as read-only values. The
//! [`Registry`] keeps them in declaration order because order is
//! semantically meaningful: dominant-set ties and equal-score rankings
//! resolve to the first declared entry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::membership::MembershipFunction;
use crate::{FuzzyError, Result};

/// Whether a parameter is measured (input) or diagnosed (output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterRole {
    Input,
    Output,
}

/// An input or output variable with its nominal numeric range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub unit: String,
    pub min: f64,
    pub max: f64,
    pub role: ParameterRole,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        min: f64,
        max: f64,
        role: ParameterRole,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            min,
            max,
            role,
        }
    }

    /// Whether a crisp value lies within the declared nominal range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Named membership function attached to exactly one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySet {
    pub name: String,
    /// Name of the owning parameter
    pub parameter: String,
    pub function: MembershipFunction,
    /// Display color for presentation layers, not used computationally
    #[serde(default)]
    pub color: String,
}

impl FuzzySet {
    pub fn new(
        name: impl Into<String>,
        parameter: impl Into<String>,
        function: MembershipFunction,
    ) -> Self {
        Self {
            name: name.into(),
            parameter: parameter.into(),
            function,
            color: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Membership degree of a crisp value in this set
    pub fn membership(&self, x: f64) -> f64 {
        self.function.membership(x)
    }
}

/// One `(parameter, fuzzy set)` reference inside a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTerm {
    pub parameter: String,
    pub fuzzy_set: String,
}

impl RuleTerm {
    pub fn new(parameter: impl Into<String>, fuzzy_set: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            fuzzy_set: fuzzy_set.into(),
        }
    }
}

/// Severity level the rule author assigned to the condition a rule detects
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    #[default]
    Moderate,
    Severe,
}

/// IF-THEN fuzzy rule. Antecedents conjoin via fuzzy AND (minimum); no OR
/// or NOT is modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    /// Ordered `(parameter, fuzzy set)` conditions, combined by min
    pub antecedents: Vec<RuleTerm>,
    /// One or more `(output parameter, fuzzy set)` conclusions
    pub consequents: Vec<RuleTerm>,
    /// Influence scale in `[0, 1]`
    pub weight: f64,
    /// Inactive rules are excluded from evaluation entirely
    pub enabled: bool,
    pub severity: Severity,
}

impl Rule {
    /// Create an enabled rule with weight 1.0 and the default severity
    pub fn new(
        name: impl Into<String>,
        antecedents: Vec<RuleTerm>,
        consequents: Vec<RuleTerm>,
    ) -> Self {
        Self {
            name: name.into(),
            antecedents,
            consequents,
            weight: 1.0,
            enabled: true,
            severity: Severity::default(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Non-fatal findings recorded during a diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum DiagnosticWarning {
    /// A crisp reading fell outside its parameter's nominal range;
    /// fuzzification proceeded on the raw value
    OutOfRange {
        parameter: String,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Lenient mode only: an input named a parameter the registry does not
    /// know, so the reading was skipped
    SkippedInput { parameter: String, value: f64 },
}

/// Insertion-ordered store of parameters and their fuzzy sets.
///
/// Plain immutable data passed into each diagnosis; the engine holds no
/// process-wide registry state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    parameters: IndexMap<String, Parameter>,
    /// Fuzzy sets grouped per owning parameter, in declaration order
    fuzzy_sets: IndexMap<String, Vec<FuzzySet>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter. Re-registering a name replaces the previous
    /// definition but keeps its declaration position.
    pub fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.insert(parameter.name.clone(), parameter);
    }

    /// Register a fuzzy set under its owning parameter.
    ///
    /// Fails if the owning parameter is unknown or the membership function
    /// violates its shape invariants.
    pub fn add_fuzzy_set(&mut self, set: FuzzySet) -> Result<()> {
        if !self.parameters.contains_key(&set.parameter) {
            return Err(FuzzyError::UnknownParameter(set.parameter.clone()));
        }
        set.function.validate()?;
        self.fuzzy_sets
            .entry(set.parameter.clone())
            .or_default()
            .push(set);
        Ok(())
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Fuzzy sets declared for a parameter, in declaration order
    pub fn sets_for(&self, parameter: &str) -> &[FuzzySet] {
        self.fuzzy_sets
            .get(parameter)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up one fuzzy set of a parameter by name
    pub fn set(&self, parameter: &str, set_name: &str) -> Option<&FuzzySet> {
        self.sets_for(parameter).iter().find(|s| s.name == set_name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    pub fn output_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .values()
            .filter(|p| p.role == ParameterRole::Output)
    }

    /// Re-check every registered membership function. Useful after
    /// deserializing a registry that bypassed [`Registry::add_fuzzy_set`].
    pub fn validate(&self) -> Result<()> {
        for sets in self.fuzzy_sets.values() {
            for set in sets {
                if !self.parameters.contains_key(&set.parameter) {
                    return Err(FuzzyError::UnknownParameter(set.parameter.clone()));
                }
                set.function.validate()?;
            }
        }
        Ok(())
    }
}
