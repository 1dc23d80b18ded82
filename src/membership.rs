//! Membership Function Library
//!
//! Pure evaluation of the membership curves the diagnosis pipeline is built
//! on. A membership function maps a crisp value to a degree in `[0, 1]`;
//! the supported shapes form a closed set so that every consumer can match
//! exhaustively.
//!
//! # Example
//!
//! ```rust
//! use herddx::membership::MembershipFunction;
//!
//! let demam = MembershipFunction::Triangular { a: 38.5, b: 40.0, c: 41.5 };
//! let degree = demam.membership(39.5);
//! assert!((degree - 2.0 / 3.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::{FuzzyError, Result};

/// Discriminant for the supported membership function shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipKind {
    Triangular,
    Trapezoidal,
    Gaussian,
}

impl MembershipKind {
    /// Number of shape parameters the kind expects
    pub fn arity(&self) -> usize {
        match self {
            MembershipKind::Triangular => 3,
            MembershipKind::Trapezoidal => 4,
            MembershipKind::Gaussian => 2,
        }
    }
}

/// Membership function attached to a fuzzy set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Triangular: rises linearly from 0 at `a` to 1 at `b`, falls to 0 at `c`.
    /// A degenerate edge (`a == b` or `b == c`) is a step, not a ramp.
    Triangular { a: f64, b: f64, c: f64 },
    /// Trapezoidal: linear rise `a..b`, plateau of 1 over `[b, c]`, linear fall `c..d`
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    /// Gaussian: `exp(-(x - center)^2 / (2 * sigma^2))`, `sigma > 0`
    Gaussian { center: f64, sigma: f64 },
}

impl MembershipFunction {
    /// Build a membership function from a kind and its ordered parameter
    /// list, as supplied by an external configuration store.
    ///
    /// Fails if the list length does not match the kind's arity or the
    /// shape invariants do not hold.
    pub fn from_params(kind: MembershipKind, params: &[f64]) -> Result<Self> {
        if params.len() != kind.arity() {
            return Err(FuzzyError::InvalidParameter(format!(
                "{:?} expects {} parameters, got {}",
                kind,
                kind.arity(),
                params.len()
            )));
        }
        let function = match kind {
            MembershipKind::Triangular => MembershipFunction::Triangular {
                a: params[0],
                b: params[1],
                c: params[2],
            },
            MembershipKind::Trapezoidal => MembershipFunction::Trapezoidal {
                a: params[0],
                b: params[1],
                c: params[2],
                d: params[3],
            },
            MembershipKind::Gaussian => MembershipFunction::Gaussian {
                center: params[0],
                sigma: params[1],
            },
        };
        function.validate()?;
        Ok(function)
    }

    /// Shape discriminant
    pub fn kind(&self) -> MembershipKind {
        match self {
            MembershipFunction::Triangular { .. } => MembershipKind::Triangular,
            MembershipFunction::Trapezoidal { .. } => MembershipKind::Trapezoidal,
            MembershipFunction::Gaussian { .. } => MembershipKind::Gaussian,
        }
    }

    /// Check the shape invariants: non-decreasing breakpoints for the
    /// piecewise-linear shapes, strictly positive sigma for gaussian.
    pub fn validate(&self) -> Result<()> {
        match *self {
            MembershipFunction::Triangular { a, b, c } => {
                if a <= b && b <= c {
                    Ok(())
                } else {
                    Err(FuzzyError::InvalidParameter(format!(
                        "triangular breakpoints must be non-decreasing, got ({a}, {b}, {c})"
                    )))
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if a <= b && b <= c && c <= d {
                    Ok(())
                } else {
                    Err(FuzzyError::InvalidParameter(format!(
                        "trapezoidal breakpoints must be non-decreasing, got ({a}, {b}, {c}, {d})"
                    )))
                }
            }
            MembershipFunction::Gaussian { sigma, .. } => {
                if sigma > 0.0 {
                    Ok(())
                } else {
                    Err(FuzzyError::InvalidParameter(format!(
                        "gaussian sigma must be positive, got {sigma}"
                    )))
                }
            }
        }
    }

    /// Compute the membership degree for a crisp value
    pub fn membership(&self, x: f64) -> f64 {
        match *self {
            MembershipFunction::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x < b {
                    // a == b cannot reach this arm, so the division is safe
                    (x - a) / (b - a)
                } else if c > b {
                    (c - x) / (c - b)
                } else {
                    1.0
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else if x <= c {
                    1.0
                } else if d > c {
                    (d - x) / (d - c)
                } else {
                    1.0
                }
            }
            MembershipFunction::Gaussian { center, sigma } => {
                (-((x - center).powi(2)) / (2.0 * sigma.powi(2))).exp()
            }
        }
    }

    /// Evaluate the function over an ordered sequence of sample points.
    ///
    /// The returned iterator is lazy and a pure function of its input:
    /// re-sampling the same points yields the same `(x, degree)` pairs.
    pub fn sample<I>(&self, points: I) -> impl Iterator<Item = (f64, f64)>
    where
        I: IntoIterator<Item = f64>,
    {
        let function = *self;
        points.into_iter().map(move |x| (x, function.membership(x)))
    }
}

/// Equally spaced sample points spanning a parameter's range, endpoints
/// included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub min: f64,
    pub max: f64,
    pub resolution: usize,
}

impl Universe {
    /// Create a universe with `resolution` sample points over `[min, max]`
    pub fn new(min: f64, max: f64, resolution: usize) -> Self {
        Self {
            min,
            max,
            resolution,
        }
    }

    /// Iterate the sample points in ascending order. The last point is
    /// exactly `max` so both endpoints are always sampled.
    pub fn points(&self) -> impl Iterator<Item = f64> {
        let Universe {
            min,
            max,
            resolution,
        } = *self;
        let step = if resolution > 1 {
            (max - min) / (resolution - 1) as f64
        } else {
            0.0
        };
        (0..resolution).map(move |i| {
            if i + 1 == resolution {
                max
            } else {
                min + step * i as f64
            }
        })
    }
}
