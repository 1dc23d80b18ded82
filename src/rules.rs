//! Rule Evaluation
//!
//! Second pipeline stage: computes each active rule's firing strength from
//! the fuzzified inputs and groups the resulting activations by output
//! parameter for aggregation.
//!
//! Antecedents conjoin through fuzzy AND (minimum): the weakest condition
//! bounds the rule. An antecedent whose parameter carries no membership
//! result (the input was not measured) contributes 0, so the rule does not
//! activate. Rules are independent and read only shared immutable state,
//! which makes evaluation embarrassingly parallel; the parallel pass below
//! preserves rule order on collect, so parallel and sequential evaluation
//! produce bit-identical results.

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::fuzzifier::FuzzifiedInput;
use crate::model::{Registry, Rule, RuleTerm, Severity};
use crate::{FuzzyError, Result};

/// Outcome of evaluating one active rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleActivation {
    pub rule: String,
    /// Minimum membership degree across the antecedents
    pub firing_strength: f64,
    /// `firing_strength * weight`; caps the consequent curves downstream
    pub weighted_activation: f64,
    pub severity: Severity,
    pub consequents: Vec<RuleTerm>,
}

/// Structural pre-flight over a rule base.
///
/// Every antecedent and consequent reference must resolve against the
/// registry, weights must lie in `[0, 1]`, and each rule needs at least one
/// consequent. Runs before any computation so a configuration problem can
/// never surface mid-diagnosis or leak a partial result.
pub fn validate_rules(rules: &[Rule], registry: &Registry) -> Result<()> {
    for rule in rules {
        if !(0.0..=1.0).contains(&rule.weight) {
            return Err(FuzzyError::Configuration(format!(
                "rule '{}' weight {} outside [0, 1]",
                rule.name, rule.weight
            )));
        }
        if rule.consequents.is_empty() {
            return Err(FuzzyError::Configuration(format!(
                "rule '{}' has no consequents",
                rule.name
            )));
        }
        for term in rule.antecedents.iter().chain(&rule.consequents) {
            if registry.parameter(&term.parameter).is_none() {
                return Err(FuzzyError::Configuration(format!(
                    "rule '{}' references unknown parameter '{}'",
                    rule.name, term.parameter
                )));
            }
            if registry.set(&term.parameter, &term.fuzzy_set).is_none() {
                return Err(FuzzyError::Configuration(format!(
                    "rule '{}' references unknown fuzzy set '{}' of parameter '{}'",
                    rule.name, term.fuzzy_set, term.parameter
                )));
            }
        }
    }
    Ok(())
}

/// Evaluate all active rules against the fuzzified inputs.
///
/// Returns only activated rules (weighted activation > 0), in rule-base
/// order.
pub fn evaluate_rules(rules: &[Rule], fuzzified: &FuzzifiedInput) -> Vec<RuleActivation> {
    let active: Vec<&Rule> = rules.iter().filter(|r| r.enabled).collect();

    let activations: Vec<RuleActivation> = active
        .par_iter()
        .filter_map(|&rule| evaluate_rule(rule, fuzzified))
        .collect();

    debug!(
        rules = rules.len(),
        active = active.len(),
        activated = activations.len(),
        "evaluated rule base"
    );
    activations
}

fn evaluate_rule(rule: &Rule, fuzzified: &FuzzifiedInput) -> Option<RuleActivation> {
    let mut firing_strength = 1.0_f64;
    for term in &rule.antecedents {
        let degree = fuzzified
            .degree(&term.parameter, &term.fuzzy_set)
            .unwrap_or(0.0);
        firing_strength = firing_strength.min(degree);
        if firing_strength == 0.0 {
            break;
        }
    }

    let weighted_activation = firing_strength * rule.weight;
    trace!(
        rule = %rule.name,
        firing_strength,
        weighted_activation,
        "evaluated rule"
    );
    if weighted_activation > 0.0 {
        Some(RuleActivation {
            rule: rule.name.clone(),
            firing_strength,
            weighted_activation,
            severity: rule.severity,
            consequents: rule.consequents.clone(),
        })
    } else {
        None
    }
}

/// Group activations by consequent output parameter.
///
/// Every output parameter of the registry appears in the result, in
/// declaration order, so outputs nothing fired for still get a (zero)
/// aggregate downstream. A rule with several consequents contributes to
/// each of its target outputs independently.
pub fn group_by_output<'a>(
    activations: &'a [RuleActivation],
    registry: &Registry,
) -> IndexMap<String, Vec<(f64, &'a RuleTerm)>> {
    let mut grouped: IndexMap<String, Vec<(f64, &RuleTerm)>> = registry
        .output_parameters()
        .map(|p| (p.name.clone(), Vec::new()))
        .collect();

    for activation in activations {
        for term in &activation.consequents {
            if let Some(contributions) = grouped.get_mut(&term.parameter) {
                contributions.push((activation.weighted_activation, term));
            }
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzifier::fuzzify;
    use crate::membership::MembershipFunction;
    use crate::model::{FuzzySet, Parameter, ParameterRole};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.add_parameter(Parameter::new(
            "suhu_tubuh",
            "°C",
            35.0,
            42.0,
            ParameterRole::Input,
        ));
        registry.add_parameter(Parameter::new(
            "nafsu_makan",
            "score",
            0.0,
            10.0,
            ParameterRole::Input,
        ));
        registry.add_parameter(Parameter::new(
            "risiko",
            "%",
            0.0,
            100.0,
            ParameterRole::Output,
        ));
        registry
            .add_fuzzy_set(FuzzySet::new(
                "demam",
                "suhu_tubuh",
                MembershipFunction::Triangular {
                    a: 38.5,
                    b: 40.0,
                    c: 41.5,
                },
            ))
            .unwrap();
        registry
            .add_fuzzy_set(FuzzySet::new(
                "rendah",
                "nafsu_makan",
                MembershipFunction::Triangular {
                    a: 0.0,
                    b: 0.0,
                    c: 5.0,
                },
            ))
            .unwrap();
        registry
            .add_fuzzy_set(FuzzySet::new(
                "tinggi",
                "risiko",
                MembershipFunction::Triangular {
                    a: 50.0,
                    b: 75.0,
                    c: 100.0,
                },
            ))
            .unwrap();
        registry
    }

    fn fever_rule() -> Rule {
        Rule::new(
            "demam_dan_lesu",
            vec![
                RuleTerm::new("suhu_tubuh", "demam"),
                RuleTerm::new("nafsu_makan", "rendah"),
            ],
            vec![RuleTerm::new("risiko", "tinggi")],
        )
    }

    fn inputs(temp: f64, appetite: f64) -> IndexMap<String, f64> {
        let mut map = IndexMap::new();
        map.insert("suhu_tubuh".to_string(), temp);
        map.insert("nafsu_makan".to_string(), appetite);
        map
    }

    #[test]
    fn test_firing_strength_is_min_of_antecedents() {
        let registry = registry();
        // demam degree = 2/3, rendah degree = (5 - 2.5) / 5 = 0.5
        let fuzzified = fuzzify(&inputs(39.5, 2.5), &registry, false).unwrap();
        let activations = evaluate_rules(&[fever_rule()], &fuzzified);

        assert_eq!(activations.len(), 1);
        assert!((activations[0].firing_strength - 0.5).abs() < 1e-9);
        assert!((activations[0].weighted_activation - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_antecedent_kills_rule() {
        let registry = registry();
        // appetite 5.0 -> rendah degree 0 -> AND semantics zero the rule
        let fuzzified = fuzzify(&inputs(39.5, 5.0), &registry, false).unwrap();
        let activations = evaluate_rules(&[fever_rule()], &fuzzified);
        assert!(activations.is_empty());
    }

    #[test]
    fn test_missing_input_means_no_activation() {
        let registry = registry();
        let mut only_temp = IndexMap::new();
        only_temp.insert("suhu_tubuh".to_string(), 39.5);
        let fuzzified = fuzzify(&only_temp, &registry, false).unwrap();

        let activations = evaluate_rules(&[fever_rule()], &fuzzified);
        assert!(activations.is_empty());
    }

    #[test]
    fn test_weight_scales_activation() {
        let registry = registry();
        let fuzzified = fuzzify(&inputs(40.0, 0.0), &registry, false).unwrap();
        let activations = evaluate_rules(&[fever_rule().with_weight(0.5)], &fuzzified);

        assert_eq!(activations.len(), 1);
        assert!((activations[0].firing_strength - 1.0).abs() < 1e-9);
        assert!((activations[0].weighted_activation - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_rule_is_excluded() {
        let registry = registry();
        let fuzzified = fuzzify(&inputs(40.0, 0.0), &registry, false).unwrap();
        let activations = evaluate_rules(&[fever_rule().disabled()], &fuzzified);
        assert!(activations.is_empty());
    }

    #[test]
    fn test_validate_rejects_dangling_reference() {
        let registry = registry();
        let rule = Rule::new(
            "bad",
            vec![RuleTerm::new("suhu_tubuh", "hipotermia")],
            vec![RuleTerm::new("risiko", "tinggi")],
        );
        let err = validate_rules(&[rule], &registry);
        assert!(matches!(err, Err(FuzzyError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_bad_weight_and_empty_consequents() {
        let registry = registry();
        let err = validate_rules(&[fever_rule().with_weight(1.5)], &registry);
        assert!(matches!(err, Err(FuzzyError::Configuration(_))));

        let mut rule = fever_rule();
        rule.consequents.clear();
        let err = validate_rules(&[rule], &registry);
        assert!(matches!(err, Err(FuzzyError::Configuration(_))));
    }

    #[test]
    fn test_grouping_covers_all_outputs() {
        let registry = registry();
        let fuzzified = fuzzify(&inputs(40.0, 0.0), &registry, false).unwrap();
        let activations = evaluate_rules(&[fever_rule()], &fuzzified);

        let grouped = group_by_output(&activations, &registry);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped["risiko"].len(), 1);
        assert!((grouped["risiko"][0].0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let registry = registry();
        let fuzzified = fuzzify(&inputs(39.5, 2.5), &registry, false).unwrap();
        let rules: Vec<Rule> = (0..64)
            .map(|i| {
                let mut r = fever_rule().with_weight(1.0 / (i + 1) as f64);
                r.name = format!("rule_{i}");
                r
            })
            .collect();

        let parallel = evaluate_rules(&rules, &fuzzified);
        let sequential: Vec<RuleActivation> = rules
            .iter()
            .filter(|r| r.enabled)
            .filter_map(|r| super::evaluate_rule(r, &fuzzified))
            .collect();
        assert_eq!(parallel, sequential);
    }
}
