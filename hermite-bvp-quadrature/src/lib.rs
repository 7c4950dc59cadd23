//! One-dimensional quadrature rules.
//!
//! Rules are defined on the reference interval `[-1, 1]` and can be mapped onto any physical
//! interval `[a, b]` with [`Rule::on_interval`].

pub mod univariate;

pub use univariate::gauss;

/// A one-dimensional quadrature rule, stored as parallel lists of weights and points.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    weights: Vec<f64>,
    points: Vec<f64>,
}

impl Rule {
    /// Constructs a rule from weights and points.
    ///
    /// # Panics
    ///
    /// Panics if the number of weights and points differ.
    pub fn from_weights_and_points(weights: Vec<f64>, points: Vec<f64>) -> Self {
        assert_eq!(weights.len(), points.len(), "weights and points must have the same length");
        Self { weights, points }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maps a rule on `[-1, 1]` onto the interval `[a, b]`.
    ///
    /// Points are transformed affinely and weights are scaled by the Jacobian `(b - a) / 2`.
    pub fn on_interval(&self, a: f64, b: f64) -> Rule {
        let half_length = 0.5 * (b - a);
        let midpoint = 0.5 * (a + b);
        Rule {
            weights: self.weights.iter().map(|w| w * half_length).collect(),
            points: self.points.iter().map(|xi| midpoint + half_length * xi).collect(),
        }
    }

    /// Approximates the integral of `f` over the domain of the rule.
    pub fn integrate(&self, mut f: impl FnMut(f64) -> f64) -> f64 {
        self.weights
            .iter()
            .zip(&self.points)
            .map(|(w, x)| w * f(*x))
            .sum()
    }
}
