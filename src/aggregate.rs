//! Mamdani Aggregation
//!
//! Third pipeline stage: builds one aggregated fuzzy output set per output
//! parameter by sampling the parameter's universe, clipping each activated
//! rule's consequent curve at its weighted activation (implication caps,
//! never scales), and taking the pointwise maximum across rules.
//!
//! Max is associative and commutative, so the aggregated curve is
//! independent of rule order and safe to compute in parallel per output.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::membership::Universe;
use crate::model::{FuzzySet, Parameter};
use crate::EPSILON;

/// One `(x, degree)` sample of an aggregated output curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub degree: f64,
}

/// Aggregated fuzzy output set for one output parameter, sampled over its
/// universe. The resolution is recorded so downstream consumers can
/// reproduce the defuzzification exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedOutput {
    pub parameter: String,
    pub resolution: usize,
    pub samples: Vec<CurvePoint>,
}

impl AggregatedOutput {
    /// Whether no rule contributed any membership anywhere on the universe
    pub fn is_empty(&self) -> bool {
        self.samples.iter().all(|p| p.degree < EPSILON)
    }

    /// Highest sampled degree
    pub fn max_degree(&self) -> f64 {
        self.samples.iter().map(|p| p.degree).fold(0.0, f64::max)
    }
}

/// Aggregate the contributions of all activated rules targeting one output
/// parameter.
///
/// `contributions` pairs each rule's weighted activation with its
/// consequent fuzzy set. An empty list produces the uniformly zero curve;
/// the caller decides the fallback.
pub fn aggregate(
    parameter: &Parameter,
    contributions: &[(f64, &FuzzySet)],
    resolution: usize,
) -> AggregatedOutput {
    let universe = Universe::new(parameter.min, parameter.max, resolution);

    let samples: Vec<CurvePoint> = universe
        .points()
        .map(|x| {
            let degree = contributions
                .iter()
                .map(|(activation, set)| set.membership(x).min(*activation))
                .fold(0.0, f64::max);
            CurvePoint { x, degree }
        })
        .collect();

    debug!(
        parameter = %parameter.name,
        contributions = contributions.len(),
        resolution,
        "aggregated output curve"
    );
    AggregatedOutput {
        parameter: parameter.name.clone(),
        resolution,
        samples,
    }
}
