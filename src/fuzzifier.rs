//! Fuzzification
//!
//! First pipeline stage: converts the crisp input vector into membership
//! degrees against every fuzzy set registered for each measured parameter,
//! and identifies the dominant set per parameter.
//!
//! Out-of-range readings are recorded as warnings but still fuzzified on
//! the raw value, since membership functions are defined outside the
//! nominal range too. Readings that name an unknown parameter are fatal by
//! default; in lenient mode they are skipped and reported, never silently
//! fabricated.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{DiagnosticWarning, Registry};
use crate::{FuzzyError, Result};

/// Membership degree of one crisp value in one fuzzy set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipResult {
    pub parameter: String,
    pub fuzzy_set: String,
    pub degree: f64,
}

/// Full fuzzification detail for one measured parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterReading {
    pub parameter: String,
    pub value: f64,
    /// Degrees against every registered set, in declaration order
    pub memberships: Vec<MembershipResult>,
    /// Highest-degree set; declaration order breaks ties (first wins).
    /// `None` only when the parameter has no registered sets.
    pub dominant: Option<String>,
    pub out_of_range: bool,
}

/// Fuzzified input vector: per-parameter readings plus a degree index for
/// rule evaluation. Working state of a single diagnosis, not serialized;
/// the readings and warnings move into the final result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuzzifiedInput {
    pub readings: Vec<ParameterReading>,
    pub warnings: Vec<DiagnosticWarning>,
    /// parameter -> set -> degree
    index: HashMap<String, HashMap<String, f64>>,
}

impl FuzzifiedInput {
    /// Degree of the given set for the given parameter, if that parameter
    /// was present in the input vector
    pub fn degree(&self, parameter: &str, fuzzy_set: &str) -> Option<f64> {
        self.index.get(parameter)?.get(fuzzy_set).copied()
    }

    /// Whether the input vector carried a reading for the parameter
    pub fn has_parameter(&self, parameter: &str) -> bool {
        self.index.contains_key(parameter)
    }

    fn push(&mut self, reading: ParameterReading) {
        let degrees = reading
            .memberships
            .iter()
            .map(|m| (m.fuzzy_set.clone(), m.degree))
            .collect();
        self.index.insert(reading.parameter.clone(), degrees);
        self.readings.push(reading);
    }
}

/// Fuzzify a crisp input vector against the registry.
///
/// With `lenient` set, inputs naming unknown parameters are skipped and
/// recorded as [`DiagnosticWarning::SkippedInput`]; otherwise they fail the
/// whole diagnosis with [`FuzzyError::UnknownParameter`].
pub fn fuzzify(
    inputs: &IndexMap<String, f64>,
    registry: &Registry,
    lenient: bool,
) -> Result<FuzzifiedInput> {
    let mut fuzzified = FuzzifiedInput::default();

    for (name, &value) in inputs {
        let parameter = match registry.parameter(name) {
            Some(p) => p,
            None if lenient => {
                warn!(parameter = %name, value, "skipping input with no registry entry");
                fuzzified.warnings.push(DiagnosticWarning::SkippedInput {
                    parameter: name.clone(),
                    value,
                });
                continue;
            }
            None => return Err(FuzzyError::UnknownParameter(name.clone())),
        };

        let out_of_range = !parameter.contains(value);
        if out_of_range {
            warn!(
                parameter = %name,
                value,
                min = parameter.min,
                max = parameter.max,
                "input outside nominal range, fuzzifying raw value"
            );
            fuzzified.warnings.push(DiagnosticWarning::OutOfRange {
                parameter: name.clone(),
                value,
                min: parameter.min,
                max: parameter.max,
            });
        }

        let memberships: Vec<MembershipResult> = registry
            .sets_for(name)
            .iter()
            .map(|set| MembershipResult {
                parameter: name.clone(),
                fuzzy_set: set.name.clone(),
                degree: set.membership(value),
            })
            .collect();

        // strict > keeps the first declared set on ties
        let mut dominant: Option<(&str, f64)> = None;
        for m in &memberships {
            let better = match dominant {
                None => true,
                Some((_, best)) => m.degree > best,
            };
            if better {
                dominant = Some((m.fuzzy_set.as_str(), m.degree));
            }
        }

        fuzzified.push(ParameterReading {
            parameter: name.clone(),
            value,
            dominant: dominant.map(|(name, _)| name.to_string()),
            memberships,
            out_of_range,
        });
    }

    debug!(
        inputs = inputs.len(),
        readings = fuzzified.readings.len(),
        warnings = fuzzified.warnings.len(),
        "fuzzified input vector"
    );
    Ok(fuzzified)
}
