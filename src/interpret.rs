//! Interpretation
//!
//! Final pipeline stage: maps crisp output values to discrete risk
//! categories and ranks the diagnosed diseases by how strongly the rule
//! base fired for each. Band thresholds are deployment configuration, not
//! hard-coded business rules.

use serde::{Deserialize, Serialize};

use crate::model::{Parameter, Severity};
use crate::rules::RuleActivation;
use crate::{FuzzyError, Result};

/// Discrete risk classification of a crisp output value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    LowMedium,
    Medium,
    High,
    VeryHigh,
}

impl RiskCategory {
    /// Human-readable label for presentation layers
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Low => "low risk",
            RiskCategory::LowMedium => "low to medium risk",
            RiskCategory::Medium => "medium risk",
            RiskCategory::High => "high risk",
            RiskCategory::VeryHigh => "very high risk",
        }
    }
}

/// Ordered band thresholds, expressed as fractions of the output range so
/// one configuration applies to outputs with different units.
///
/// The default splits the range into even fifths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBands {
    /// Ascending cut points in `(0, 1)` separating the five categories
    pub fractions: [f64; 4],
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            fractions: [0.2, 0.4, 0.6, 0.8],
        }
    }
}

impl RiskBands {
    pub fn new(fractions: [f64; 4]) -> Self {
        Self { fractions }
    }

    /// Check that the cut points are strictly ascending inside `(0, 1)`
    pub fn validate(&self) -> Result<()> {
        let f = &self.fractions;
        let ascending = f.windows(2).all(|w| w[0] < w[1]);
        if ascending && f[0] > 0.0 && f[3] < 1.0 {
            Ok(())
        } else {
            Err(FuzzyError::Configuration(format!(
                "risk band fractions must be strictly ascending within (0, 1), got {f:?}"
            )))
        }
    }

    /// Classify a crisp value against an output parameter's range
    pub fn classify(&self, value: f64, parameter: &Parameter) -> RiskCategory {
        let span = parameter.max - parameter.min;
        let position = if span > 0.0 {
            ((value - parameter.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        match position {
            p if p < self.fractions[0] => RiskCategory::Low,
            p if p < self.fractions[1] => RiskCategory::LowMedium,
            p if p < self.fractions[2] => RiskCategory::Medium,
            p if p < self.fractions[3] => RiskCategory::High,
            _ => RiskCategory::VeryHigh,
        }
    }
}

/// One diagnosed output in the final ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseScore {
    pub parameter: String,
    pub crisp_value: f64,
    pub risk: RiskCategory,
    /// Sum of weighted activations targeting this output
    pub activation_score: f64,
    /// Severity declared by the strongest contributing rule; the default
    /// when nothing fired
    pub severity: Severity,
    pub no_rules_fired: bool,
}

/// Rank outputs descending by activation score. The sort is stable, so
/// equal scores keep registry declaration order.
pub fn rank_diseases(mut scores: Vec<DiseaseScore>) -> Vec<DiseaseScore> {
    scores.sort_by(|a, b| {
        b.activation_score
            .partial_cmp(&a.activation_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scores
}

/// Severity of the strongest rule among those targeting `parameter`.
/// Earlier activations win ties, matching rule-base order.
pub fn dominant_severity(activations: &[RuleActivation], parameter: &str) -> Option<Severity> {
    let mut best: Option<(f64, Severity)> = None;
    for activation in activations {
        if !activation.consequents.iter().any(|t| t.parameter == parameter) {
            continue;
        }
        let stronger = match best {
            None => true,
            Some((strength, _)) => activation.weighted_activation > strength,
        };
        if stronger {
            best = Some((activation.weighted_activation, activation.severity));
        }
    }
    best.map(|(_, severity)| severity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParameterRole, RuleTerm};

    fn risk_parameter() -> Parameter {
        Parameter::new("risiko", "%", 0.0, 100.0, ParameterRole::Output)
    }

    #[test]
    fn test_default_bands_are_even_fifths() {
        let bands = RiskBands::default();
        let p = risk_parameter();
        assert_eq!(bands.classify(0.0, &p), RiskCategory::Low);
        assert_eq!(bands.classify(19.9, &p), RiskCategory::Low);
        assert_eq!(bands.classify(20.0, &p), RiskCategory::LowMedium);
        assert_eq!(bands.classify(45.0, &p), RiskCategory::Medium);
        assert_eq!(bands.classify(70.0, &p), RiskCategory::High);
        assert_eq!(bands.classify(95.0, &p), RiskCategory::VeryHigh);
        assert_eq!(bands.classify(100.0, &p), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_bands_respect_parameter_offset() {
        let bands = RiskBands::default();
        let p = Parameter::new("skor", "", 50.0, 150.0, ParameterRole::Output);
        assert_eq!(bands.classify(55.0, &p), RiskCategory::Low);
        assert_eq!(bands.classify(100.0, &p), RiskCategory::Medium);
        assert_eq!(bands.classify(145.0, &p), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_custom_bands_validate() {
        assert!(RiskBands::new([0.1, 0.3, 0.6, 0.9]).validate().is_ok());
        assert!(RiskBands::new([0.3, 0.1, 0.6, 0.9]).validate().is_err());
        assert!(RiskBands::new([0.0, 0.3, 0.6, 0.9]).validate().is_err());
        assert!(RiskBands::new([0.1, 0.3, 0.6, 1.0]).validate().is_err());
    }

    #[test]
    fn test_ranking_descending_and_stable() {
        let scores = vec![
            score("bef", 0.4),
            score("helminthiasis", 0.9),
            score("scabies", 0.4),
        ];
        let ranked = rank_diseases(scores);
        let names: Vec<&str> = ranked.iter().map(|s| s.parameter.as_str()).collect();
        // equal scores keep declaration order: bef before scabies
        assert_eq!(names, vec!["helminthiasis", "bef", "scabies"]);
    }

    fn score(name: &str, activation: f64) -> DiseaseScore {
        DiseaseScore {
            parameter: name.to_string(),
            crisp_value: 0.0,
            risk: RiskCategory::Low,
            activation_score: activation,
            severity: Severity::Moderate,
            no_rules_fired: false,
        }
    }

    #[test]
    fn test_dominant_severity_follows_strongest_rule() {
        let activations = vec![
            RuleActivation {
                rule: "mild_rule".into(),
                firing_strength: 0.3,
                weighted_activation: 0.3,
                severity: Severity::Mild,
                consequents: vec![RuleTerm::new("risiko", "rendah")],
            },
            RuleActivation {
                rule: "severe_rule".into(),
                firing_strength: 0.8,
                weighted_activation: 0.8,
                severity: Severity::Severe,
                consequents: vec![RuleTerm::new("risiko", "tinggi")],
            },
        ];
        assert_eq!(
            dominant_severity(&activations, "risiko"),
            Some(Severity::Severe)
        );
        assert_eq!(dominant_severity(&activations, "other"), None);
    }
}
