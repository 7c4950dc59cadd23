//! Newton iteration for the assembled nonlinear system.
use crate::assembly::{assemble_jacobian, assemble_residual, AssemblyError};
use crate::mesh::Mesh1d;
use crate::operators::OperatorTable;
use hermite_bvp_banded::BandedSolveError;
use hermite_bvp_optimize::calculus::{DifferentiableVectorFunction, FunctionError, VectorFunction};
use hermite_bvp_optimize::newton::{newton, NewtonError, NewtonObserver, NewtonSettings, Termination};
use log::debug;
use nalgebra::{DMatrix, DVector, DVectorView, DVectorViewMut};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("assembly failed: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("linear solve failed: {0}")]
    LinearSolve(#[from] BandedSolveError),
    #[error(transparent)]
    Other(FunctionError),
}

impl From<NewtonError> for SolveError {
    fn from(error: NewtonError) -> Self {
        let source = match error {
            NewtonError::FunctionError { source, .. } | NewtonError::JacobianError { source, .. } => source,
        };
        match source.downcast::<SolveError>() {
            Ok(error) => *error,
            Err(other) => SolveError::Other(other),
        }
    }
}

/// Result of a Newton solve. Reaching the iteration cap is not an error, so check
/// [`termination`](Self::termination) or the residual norm before trusting the weights.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Nodal weights with the same shape as the initial guess.
    pub weights: DMatrix<f64>,
    pub residual: DVector<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
    pub termination: Termination,
}

impl Solution {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Node-major flattening of a `(num_nodes, order)` weight array into the global unknown vector.
pub fn flatten_weights(weights: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(weights.len(), weights.transpose().iter().copied())
}

/// Inverse of [`flatten_weights`].
pub fn unflatten_weights(unknowns: &DVectorView<f64>, order: usize) -> DMatrix<f64> {
    DMatrix::from_row_iterator(unknowns.len() / order, order, unknowns.iter().copied())
}

/// The global residual as a vector function of the flattened weights.
struct AssembledSystem<'a> {
    mesh: &'a Mesh1d,
    table: &'a OperatorTable,
    parameters: &'a [f64],
}

impl VectorFunction<f64> for AssembledSystem<'_> {
    fn dimension(&self) -> usize {
        self.mesh.num_nodes() * self.table.order()
    }

    fn eval_into(&mut self, f: &mut DVectorViewMut<f64>, x: &DVectorView<f64>) -> Result<(), FunctionError> {
        let weights = unflatten_weights(x, self.table.order());
        let residual = assemble_residual(self.mesh, &weights, self.table, self.parameters)
            .map_err(SolveError::from)?;
        f.copy_from(&residual);
        Ok(())
    }
}

impl DifferentiableVectorFunction<f64> for AssembledSystem<'_> {
    fn solve_jacobian_system(
        &mut self,
        sol: &mut DVectorViewMut<f64>,
        x: &DVectorView<f64>,
        rhs: &DVectorView<f64>,
    ) -> Result<(), FunctionError> {
        let weights = unflatten_weights(x, self.table.order());
        let jacobian = assemble_jacobian(self.mesh, &weights, self.table, self.parameters)
            .map_err(SolveError::from)?;
        let step = jacobian
            .solve(&rhs.clone_owned())
            .map_err(SolveError::from)?;
        sol.copy_from(&step);
        Ok(())
    }
}

/// Solves the system described by `table` on `mesh` with Newton's method, starting from
/// `initial_weights` (one row per node, `table.order()` columns).
///
/// The observer receives the flattened residual of every iteration, starting with the residual
/// of the initial guess.
pub fn solve(
    mesh: &Mesh1d,
    initial_weights: DMatrix<f64>,
    table: &OperatorTable,
    parameters: &[f64],
    settings: &NewtonSettings<f64>,
    observer: &mut impl NewtonObserver<f64>,
) -> Result<Solution, SolveError> {
    let order = table.order();
    let expected = (mesh.num_nodes(), order);
    if initial_weights.shape() != expected {
        return Err(AssemblyError::ShapeMismatch {
            expected,
            actual: initial_weights.shape(),
        }
        .into());
    }

    debug!(
        "Solving for {} unknowns on {} elements (order {}, {} essential conditions)",
        mesh.num_nodes() * order,
        mesh.num_elements(),
        order,
        table.essential_conditions().len()
    );
    let system = AssembledSystem {
        mesh,
        table,
        parameters,
    };
    let output = newton(system, flatten_weights(&initial_weights), settings, observer)?;

    Ok(Solution {
        weights: unflatten_weights(&DVectorView::from(&output.solution), order),
        residual: output.residual,
        residual_norm: output.residual_norm,
        iterations: output.iterations,
        termination: output.termination,
    })
}
