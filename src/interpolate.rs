//! Evaluation of piecewise Hermite interpolants.
use crate::basis::HermiteBasis;
use crate::mesh::Mesh1d;
use nalgebra::DMatrix;

/// The piecewise polynomial described by nodal Hermite weights on a mesh.
#[derive(Debug, Clone)]
pub struct HermiteInterpolator {
    mesh: Mesh1d,
    weights: DMatrix<f64>,
    basis: HermiteBasis,
}

impl HermiteInterpolator {
    /// # Panics
    ///
    /// Panics if `weights` does not have one row per mesh node, or has no columns.
    pub fn new(mesh: Mesh1d, weights: DMatrix<f64>) -> Self {
        assert_eq!(weights.nrows(), mesh.num_nodes(), "weights must have one row per node");
        let basis = HermiteBasis::new(weights.ncols());
        Self { mesh, weights, basis }
    }

    pub fn mesh(&self) -> &Mesh1d {
        &self.mesh
    }

    pub fn weights(&self) -> &DMatrix<f64> {
        &self.weights
    }

    pub fn order(&self) -> usize {
        self.basis.order()
    }

    /// Value of the interpolant at `x`.
    ///
    /// Points outside the mesh are extrapolated with the polynomial of the nearest element.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.evaluate_derivative(x, 0)
    }

    /// Derivative of order `derivative` of the interpolant at `x`.
    ///
    /// At interior nodes the element to the right of the node is used. Derivatives of order
    /// `order()` and above may jump across nodes.
    pub fn evaluate_derivative(&self, x: f64, derivative: usize) -> f64 {
        let element = self.mesh.locate_element(x);
        let [x_left, x_right] = self.mesh.element(element);
        let local_weights: Vec<f64> = self
            .weights
            .row(element)
            .iter()
            .chain(self.weights.row(element + 1).iter())
            .copied()
            .collect();
        self.basis
            .interpolate(x_left, x_right, &local_weights, x, derivative)
    }

    pub fn evaluate_many(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.evaluate(x)).collect()
    }
}
