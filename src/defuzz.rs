//! Defuzzification
//!
//! Fourth pipeline stage: reduces an aggregated fuzzy output set to a
//! single crisp value. All methods operate on the sampled `(x, degree)`
//! points in ascending-x order, so results are deterministic for a given
//! curve and method, and tied maxima resolve by sample order.

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregatedOutput;
use crate::{FuzzyError, Result, EPSILON};

/// Method for reducing an aggregated fuzzy set to a crisp value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationMethod {
    /// Center of gravity: `Σ(x·μ) / Σμ`
    #[default]
    Centroid,
    /// Smallest x where the cumulative degree reaches half the total
    Bisector,
    /// Mean of all x achieving the maximum degree
    MeanOfMaximum,
    /// Smallest x achieving the maximum degree
    SmallestOfMaximum,
    /// Largest x achieving the maximum degree
    LargestOfMaximum,
}

/// Defuzzify an aggregated curve.
///
/// Every method is undefined on the uniformly zero curve and fails with
/// [`FuzzyError::EmptyAggregate`]; the engine substitutes the configured
/// fallback in that case rather than surfacing the error.
pub fn defuzzify(curve: &AggregatedOutput, method: DefuzzificationMethod) -> Result<f64> {
    match method {
        DefuzzificationMethod::Centroid => centroid(curve),
        DefuzzificationMethod::Bisector => bisector(curve),
        DefuzzificationMethod::MeanOfMaximum => {
            let peaks = maxima(curve)?;
            Ok(peaks.iter().sum::<f64>() / peaks.len() as f64)
        }
        DefuzzificationMethod::SmallestOfMaximum => Ok(maxima(curve)?[0]),
        DefuzzificationMethod::LargestOfMaximum => {
            let peaks = maxima(curve)?;
            Ok(peaks[peaks.len() - 1])
        }
    }
}

fn centroid(curve: &AggregatedOutput) -> Result<f64> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for point in &curve.samples {
        numerator += point.x * point.degree;
        denominator += point.degree;
    }
    if denominator < EPSILON {
        return Err(FuzzyError::EmptyAggregate(curve.parameter.clone()));
    }
    Ok(numerator / denominator)
}

fn bisector(curve: &AggregatedOutput) -> Result<f64> {
    let total: f64 = curve.samples.iter().map(|p| p.degree).sum();
    if total < EPSILON {
        return Err(FuzzyError::EmptyAggregate(curve.parameter.clone()));
    }
    let half = total / 2.0;
    let mut cumulative = 0.0;
    for point in &curve.samples {
        cumulative += point.degree;
        if cumulative >= half {
            return Ok(point.x);
        }
    }
    // unreachable for finite sums, but keep the failure typed
    Err(FuzzyError::EmptyAggregate(curve.parameter.clone()))
}

/// The x positions achieving the curve's maximum degree, ascending.
/// Guaranteed non-empty on success.
fn maxima(curve: &AggregatedOutput) -> Result<Vec<f64>> {
    let max_degree = curve.max_degree();
    if max_degree < EPSILON {
        return Err(FuzzyError::EmptyAggregate(curve.parameter.clone()));
    }
    Ok(curve
        .samples
        .iter()
        .filter(|p| (p.degree - max_degree).abs() < EPSILON)
        .map(|p| p.x)
        .collect())
}
