//! Hermite interpolation bases on two-node elements.
//!
//! An element of order `n` carries `n` unknowns per node: the value of the solution and its first
//! `n - 1` derivatives. The `2n` local basis functions are the polynomials of degree `2n - 1`
//! that interpolate exactly one of these unknowns at one end point and vanish for all others.
use crate::assembly::AssemblyError;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// End point of an element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Offset of the node on this side relative to the left node of the element.
    pub fn node_offset(&self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// A local unknown of an element: derivative `derivative` of the solution at end point `boundary`.
///
/// `boundary` is `0` for the left node and `1` for the right node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeightVariable {
    pub boundary: usize,
    pub derivative: usize,
}

impl WeightVariable {
    pub fn new(side: Side, derivative: usize) -> Self {
        Self {
            boundary: side.node_offset(),
            derivative,
        }
    }

    pub fn side(&self) -> Result<Side, AssemblyError> {
        match self.boundary {
            0 => Ok(Side::Left),
            1 => Ok(Side::Right),
            tag => Err(AssemblyError::UnknownVariableTag { tag }),
        }
    }
}

/// Falling factorial `j (j - 1) ... (j - k + 1)`, the factor produced by differentiating `t^j`
/// `k` times.
fn falling_factorial(j: usize, k: usize) -> f64 {
    (0..k).map(|i| (j - i) as f64).product()
}

#[derive(Debug, Clone, PartialEq)]
pub struct HermiteBasis {
    order: usize,
    variables: Vec<WeightVariable>,
    /// Column `m` holds the monomial coefficients of reference basis function `m` on `[0, 1]`.
    coefficients: DMatrix<f64>,
}

impl HermiteBasis {
    /// Constructs the basis with `order` unknowns per node.
    ///
    /// # Panics
    ///
    /// Panics if `order` is zero.
    pub fn new(order: usize) -> Self {
        assert!(order > 0, "a Hermite basis needs at least one unknown per node");
        let n = 2 * order;
        let variables: Vec<_> = [Side::Left, Side::Right]
            .into_iter()
            .flat_map(|side| (0..order).map(move |k| WeightVariable::new(side, k)))
            .collect();

        // Row (s, k) of the confluent Vandermonde matrix holds the k-th derivative of every
        // monomial t^j at t = s.
        let vandermonde = DMatrix::from_fn(n, n, |row, j| {
            let variable = &variables[row];
            let k = variable.derivative;
            match variable.boundary {
                0 if j == k => falling_factorial(j, k),
                1 if j >= k => falling_factorial(j, k),
                _ => 0.0,
            }
        });
        let coefficients = vandermonde
            .try_inverse()
            .expect("confluent Vandermonde matrix with distinct nodes is invertible");

        Self {
            order,
            variables,
            coefficients,
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Local unknowns in side-major order: all left-node derivatives, then all right-node ones.
    pub fn variables(&self) -> &[WeightVariable] {
        &self.variables
    }

    /// Derivative `derivative` of every reference basis function at `t` in `[0, 1]`.
    pub fn evaluate_reference(&self, t: f64, derivative: usize) -> DVector<f64> {
        let n = self.num_variables();
        DVector::from_fn(n, |m, _| {
            (derivative..n)
                .rev()
                .fold(0.0, |acc, j| acc * t + self.coefficients[(j, m)] * falling_factorial(j, derivative))
        })
    }

    /// Derivative `derivative` (with respect to `x`) of every basis function of the element
    /// `[x_left, x_right]`, evaluated at `x`.
    ///
    /// Basis function `(s, k)` is scaled by `h^k` so that the corresponding weight is the `k`-th
    /// derivative of the interpolant with respect to `x` at node `s`.
    pub fn evaluate(&self, x_left: f64, x_right: f64, x: f64, derivative: usize) -> DVector<f64> {
        let h = x_right - x_left;
        let t = (x - x_left) / h;
        let mut values = self.evaluate_reference(t, derivative);
        for (value, variable) in values.iter_mut().zip(&self.variables) {
            *value *= h.powi(variable.derivative as i32 - derivative as i32);
        }
        values
    }

    /// Derivative `derivative` of the interpolant with the given local weights, evaluated at `x`.
    pub fn interpolate(&self, x_left: f64, x_right: f64, local_weights: &[f64], x: f64, derivative: usize) -> f64 {
        assert_eq!(local_weights.len(), self.num_variables(), "one local weight per basis function required");
        self.evaluate(x_left, x_right, x, derivative)
            .iter()
            .zip(local_weights)
            .map(|(phi, w)| phi * w)
            .sum()
    }
}
