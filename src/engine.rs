//! Diagnosis Engine
//!
//! Orchestrates the full inference pipeline: fuzzification, rule
//! evaluation, aggregation, defuzzification, interpretation. One call to
//! [`FuzzyEngine::diagnose`] is a pure synchronous computation over one
//! input vector; all working state is allocated per invocation and the
//! returned [`DiagnosisResult`] carries the complete audit trail, so
//! presentation layers can render each inference step without recomputing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aggregate::{aggregate, AggregatedOutput};
use crate::defuzz::{defuzzify, DefuzzificationMethod};
use crate::fuzzifier::{fuzzify, ParameterReading};
use crate::interpret::{dominant_severity, rank_diseases, DiseaseScore, RiskBands, RiskCategory};
use crate::model::{DiagnosticWarning, FuzzySet, Parameter, Registry, Rule};
use crate::rules::{evaluate_rules, group_by_output, validate_rules, RuleActivation};
use crate::{FuzzyError, Result};

/// Crisp value substituted when no rule fires for an output
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackValue {
    /// Midpoint of the output parameter's range
    #[default]
    UniverseMidpoint,
    /// A fixed configured value
    Fixed(f64),
}

impl FallbackValue {
    fn resolve(&self, parameter: &Parameter) -> f64 {
        match *self {
            FallbackValue::UniverseMidpoint => parameter.midpoint(),
            FallbackValue::Fixed(value) => value,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Sample points per output universe. 101 keeps centroid integration
    /// error negligible for the ranges this engine sees.
    pub resolution: usize,
    /// Value reported for outputs no rule fired on
    pub fallback: FallbackValue,
    /// Skip inputs naming unknown parameters instead of failing
    pub lenient_inputs: bool,
    /// Risk band thresholds shared by all outputs
    pub bands: RiskBands,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolution: 101,
            fallback: FallbackValue::default(),
            lenient_inputs: false,
            bands: RiskBands::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackValue) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_lenient_inputs(mut self, lenient: bool) -> Self {
        self.lenient_inputs = lenient;
        self
    }

    pub fn with_bands(mut self, bands: RiskBands) -> Self {
        self.bands = bands;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution < 2 {
            return Err(FuzzyError::Configuration(format!(
                "universe resolution must be at least 2, got {}",
                self.resolution
            )));
        }
        self.bands.validate()
    }
}

/// Crisp assessment of one output parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputAssessment {
    pub parameter: String,
    pub crisp_value: f64,
    pub risk: RiskCategory,
    /// Human-readable interpretation of the risk category
    pub interpretation: String,
    pub method: DefuzzificationMethod,
    /// Set when the fallback value was substituted because the aggregated
    /// curve was zero everywhere; distinguishes an unmodeled input
    /// combination from a genuine low-risk assessment
    pub no_rules_fired: bool,
}

/// Immutable result of one diagnosis, with full traceability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Per-parameter fuzzification detail
    pub readings: Vec<ParameterReading>,
    /// Per-rule activation detail, in rule-base order
    pub activations: Vec<RuleActivation>,
    /// Aggregated output curves, in registry declaration order
    pub aggregated: Vec<AggregatedOutput>,
    /// Crisp assessments, in registry declaration order
    pub outputs: Vec<OutputAssessment>,
    /// Outputs ranked descending by activation score
    pub ranking: Vec<DiseaseScore>,
    /// Non-fatal findings (out-of-range readings, skipped inputs)
    pub warnings: Vec<DiagnosticWarning>,
}

impl DiagnosisResult {
    pub fn output(&self, parameter: &str) -> Option<&OutputAssessment> {
        self.outputs.iter().find(|o| o.parameter == parameter)
    }

    pub fn aggregated_for(&self, parameter: &str) -> Option<&AggregatedOutput> {
        self.aggregated.iter().find(|a| a.parameter == parameter)
    }
}

/// Mamdani fuzzy inference engine for disease risk diagnosis.
///
/// The engine itself is just configuration; parameters, fuzzy sets, and
/// rules are passed into each call, so one engine value is safely shared
/// across concurrent diagnoses.
#[derive(Debug, Clone, Default)]
pub struct FuzzyEngine {
    config: EngineConfig,
}

impl FuzzyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one diagnosis over a crisp input vector.
    ///
    /// Configuration and structural errors (bad membership functions,
    /// dangling rule references, invalid settings) fail before any
    /// computation; numeric edge cases degrade gracefully with flags in
    /// the result.
    pub fn diagnose(
        &self,
        inputs: &IndexMap<String, f64>,
        registry: &Registry,
        rules: &[Rule],
        method: DefuzzificationMethod,
    ) -> Result<DiagnosisResult> {
        self.config.validate()?;
        registry.validate()?;
        validate_rules(rules, registry)?;

        let fuzzified = fuzzify(inputs, registry, self.config.lenient_inputs)?;
        let activations = evaluate_rules(rules, &fuzzified);
        let grouped = group_by_output(&activations, registry);

        let mut aggregated = Vec::with_capacity(grouped.len());
        let mut outputs = Vec::with_capacity(grouped.len());
        let mut scores = Vec::with_capacity(grouped.len());

        for (name, contributions) in &grouped {
            // group_by_output only emits registered outputs, and rule
            // references were resolved during pre-flight
            let parameter = registry
                .parameter(name)
                .ok_or_else(|| FuzzyError::UnknownParameter(name.clone()))?;
            let resolved: Vec<(f64, &FuzzySet)> = contributions
                .iter()
                .map(|(activation, term)| {
                    registry
                        .set(&term.parameter, &term.fuzzy_set)
                        .map(|set| (*activation, set))
                        .ok_or_else(|| {
                            FuzzyError::Configuration(format!(
                                "unresolved consequent set '{}' of '{}'",
                                term.fuzzy_set, term.parameter
                            ))
                        })
                })
                .collect::<Result<_>>()?;

            let curve = aggregate(parameter, &resolved, self.config.resolution);

            let (crisp_value, no_rules_fired) = match defuzzify(&curve, method) {
                Ok(value) => (value, false),
                Err(FuzzyError::EmptyAggregate(_)) => {
                    let fallback = self.config.fallback.resolve(parameter);
                    warn!(
                        parameter = %name,
                        fallback,
                        "no rules fired for output, using fallback value"
                    );
                    (fallback, true)
                }
                Err(other) => return Err(other),
            };

            let risk = self.config.bands.classify(crisp_value, parameter);
            let activation_score: f64 = resolved.iter().map(|(a, _)| a).sum();
            let severity = dominant_severity(&activations, name).unwrap_or_default();

            outputs.push(OutputAssessment {
                parameter: name.clone(),
                crisp_value,
                risk,
                interpretation: risk.label().to_string(),
                method,
                no_rules_fired,
            });
            scores.push(DiseaseScore {
                parameter: name.clone(),
                crisp_value,
                risk,
                activation_score,
                severity,
                no_rules_fired,
            });
            aggregated.push(curve);
        }

        debug!(
            outputs = outputs.len(),
            activations = activations.len(),
            "diagnosis complete"
        );
        Ok(DiagnosisResult {
            readings: fuzzified.readings,
            activations,
            aggregated,
            outputs,
            ranking: rank_diseases(scores),
            warnings: fuzzified.warnings,
        })
    }
}
