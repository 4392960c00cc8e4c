//! One-dimensional calibration curves
//!
//! Momentum-dependent band limits and the run/eta corrections all consume the
//! same abstraction: a curve mapping one real variable to one real value. Two
//! concrete shapes cover what calibration procedures actually hand over, a
//! table of fitted samples interpolated linearly, and the coefficients of a
//! fitted polynomial.

use crate::{
    error::{Error, Result},
    numeric::Float,
};

use serde::{Deserialize, Serialize};

/// A 1-D calibration curve
///
/// The variable on the x axis is whatever the consumer evaluates the curve
/// at: track momentum for band limits, pseudorapidity for the eta shift, and
/// the numeric run id for run-by-run lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Curve {
    /// Sorted (x, y) samples, interpolated linearly between neighbours
    Graph {
        /// Sample points, strictly increasing in x
        points: Vec<(Float, Float)>,
    },
    /// Polynomial with coefficients in ascending order of power
    Poly {
        /// c0 + c1*x + c2*x^2 + ...
        coeffs: Vec<Float>,
    },
}
//
impl Curve {
    /// Build a sampled curve, checking that the support is usable
    pub fn graph(points: Vec<(Float, Float)>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::Config("sampled curve needs at least one point".into()));
        }
        let sorted = points.windows(2).all(|pair| pair[0].0 < pair[1].0);
        if !sorted {
            return Err(Error::Config(
                "sampled curve points must be strictly increasing in x".into(),
            ));
        }
        if points.iter().any(|&(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(Error::Config("sampled curve points must be finite".into()));
        }
        Ok(Curve::Graph { points })
    }

    /// Build a polynomial curve from ascending-power coefficients
    pub fn poly(coeffs: Vec<Float>) -> Result<Self> {
        if coeffs.is_empty() {
            return Err(Error::Config("polynomial curve needs at least one coefficient".into()));
        }
        Ok(Curve::Poly { coeffs })
    }

    /// Constant curve, occasionally handy as a degenerate correction
    pub fn constant(value: Float) -> Self {
        Curve::Poly { coeffs: vec![value] }
    }

    /// Evaluate the curve at `x`
    ///
    /// Sampled curves only answer within their sampled domain; `None` outside
    /// of it, or for a curve that was deserialized with an empty support.
    /// Polynomials are defined everywhere.
    pub fn eval(&self, x: Float) -> Option<Float> {
        match self {
            Curve::Graph { points } => {
                let &(x_first, y_first) = points.first()?;
                let &(x_last, y_last) = points.last()?;
                if x < x_first || x > x_last {
                    return None;
                }
                if x >= x_last {
                    return Some(y_last);
                }
                // Index of the first sample strictly above x; the guards above
                // ensure both neighbours exist
                let i = points.partition_point(|&(px, _)| px <= x);
                if i == 0 {
                    return Some(y_first);
                }
                let (x0, y0) = points[i - 1];
                let (x1, y1) = points[i];
                Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
            }
            Curve::Poly { coeffs } => {
                if coeffs.is_empty() {
                    return None;
                }
                Some(coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c))
            }
        }
    }

    /// Evaluate at `x`, holding sampled curves at their edge value outside
    /// the sampled domain
    pub fn eval_clamped(&self, x: Float) -> Option<Float> {
        match self {
            Curve::Graph { points } => {
                let &(x_first, y_first) = points.first()?;
                let &(x_last, y_last) = points.last()?;
                if x <= x_first {
                    Some(y_first)
                } else if x >= x_last {
                    Some(y_last)
                } else {
                    self.eval(x)
                }
            }
            Curve::Poly { .. } => self.eval(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_interpolates_linearly() {
        let curve = Curve::graph(vec![(0.0, 1.0), (2.0, 3.0)]).unwrap();
        assert_eq!(curve.eval(0.0), Some(1.0));
        assert_eq!(curve.eval(1.0), Some(2.0));
        assert_eq!(curve.eval(2.0), Some(3.0));
    }

    #[test]
    fn graph_rejects_queries_outside_its_domain() {
        let curve = Curve::graph(vec![(1.0, 0.5), (4.0, 0.8)]).unwrap();
        assert_eq!(curve.eval(0.9), None);
        assert_eq!(curve.eval(4.1), None);
        assert_eq!(curve.eval_clamped(0.9), Some(0.5));
        assert_eq!(curve.eval_clamped(4.1), Some(0.8));
    }

    #[test]
    fn graph_construction_is_validated() {
        assert!(Curve::graph(vec![]).is_err());
        assert!(Curve::graph(vec![(1.0, 0.0), (1.0, 1.0)]).is_err());
        assert!(Curve::graph(vec![(2.0, 0.0), (1.0, 1.0)]).is_err());
    }

    #[test]
    fn poly_uses_ascending_coefficients() {
        // 1 + 2x + x^2
        let curve = Curve::poly(vec![1.0, 2.0, 1.0]).unwrap();
        assert_eq!(curve.eval(0.0), Some(1.0));
        assert_eq!(curve.eval(2.0), Some(9.0));
        assert_eq!(curve.eval(-1.0), Some(0.0));
        // Polynomials have no domain edge to clamp to
        assert_eq!(curve.eval_clamped(100.0), curve.eval(100.0));
    }

    #[test]
    fn single_point_graph_answers_only_at_its_sample() {
        let curve = Curve::graph(vec![(3.0, 0.25)]).unwrap();
        assert_eq!(curve.eval(3.0), Some(0.25));
        assert_eq!(curve.eval(2.9), None);
        assert_eq!(curve.eval_clamped(7.0), Some(0.25));
    }
}
