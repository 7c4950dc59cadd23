//! Problem instances: a weak form together with concrete parameter values.
use crate::assembly::{assemble_jacobian, assemble_residual, AssemblyError};
use crate::cache::cached_operators;
use crate::mesh::Mesh1d;
use crate::operators::OperatorTable;
use crate::solve::{flatten_weights, solve, unflatten_weights, Solution, SolveError};
use crate::weak_form::WeakForm;
use hermite_bvp_banded::BandedMatrix;
use hermite_bvp_optimize::calculus::{approximate_jacobian, FunctionError, VectorFunctionBuilder};
use hermite_bvp_optimize::newton::{NewtonObserver, NewtonSettings};
use nalgebra::{DMatrix, DVector, DVectorView, DVectorViewMut};
use std::fmt;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    #[error("{problem} takes {expected} parameters, got {actual}")]
    ParameterCount {
        problem: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Default perturbation of [`Problem::numerical_jacobian`].
pub const DEFAULT_JACOBIAN_PERTURBATION: f64 = 1e-4;

pub struct Problem<P> {
    parameters: Vec<f64>,
    marker: PhantomData<fn() -> P>,
}

impl<P> Clone for Problem<P> {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            marker: PhantomData,
        }
    }
}

impl<P: WeakForm> Debug for Problem<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("name", &P::NAME)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl<P: WeakForm> Problem<P> {
    /// Instantiates the problem with parameter values given in the order of `P::PARAMETERS`.
    pub fn new(parameters: Vec<f64>) -> Result<Self, ProblemError> {
        if parameters.len() != P::PARAMETERS.len() {
            return Err(ProblemError::ParameterCount {
                problem: P::NAME,
                expected: P::PARAMETERS.len(),
                actual: parameters.len(),
            });
        }
        Ok(Self {
            parameters,
            marker: PhantomData,
        })
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Operator table at the given order, shared with every other instance of `P`.
    ///
    /// # Panics
    ///
    /// Panics if `order` is zero. The remaining methods take the order from the number of columns
    /// of the weights and panic likewise for empty weights.
    pub fn operators(&self, order: usize) -> Arc<OperatorTable> {
        cached_operators::<P>(order)
    }

    /// Flattened global residual. The order is taken from the number of columns of `weights`.
    pub fn residual(&self, mesh: &Mesh1d, weights: &DMatrix<f64>) -> Result<DVector<f64>, AssemblyError> {
        let table = self.operators(weights.ncols());
        assemble_residual(mesh, weights, &table, &self.parameters)
    }

    pub fn jacobian(&self, mesh: &Mesh1d, weights: &DMatrix<f64>) -> Result<BandedMatrix<f64>, AssemblyError> {
        let table = self.operators(weights.ncols());
        assemble_jacobian(mesh, weights, &table, &self.parameters)
    }

    /// Dense Jacobian approximated by central differences of the residual with perturbation `dx`.
    pub fn numerical_jacobian(
        &self,
        mesh: &Mesh1d,
        weights: &DMatrix<f64>,
        dx: f64,
    ) -> Result<DMatrix<f64>, SolveError> {
        let order = weights.ncols();
        let table = self.operators(order);
        let residual = VectorFunctionBuilder::with_dimension(weights.len()).with_function(
            |f: &mut DVectorViewMut<f64>, x: &DVectorView<f64>| -> Result<(), FunctionError> {
                let perturbed = unflatten_weights(x, order);
                f.copy_from(&assemble_residual(mesh, &perturbed, &table, &self.parameters)?);
                Ok(())
            },
        );
        approximate_jacobian(residual, &flatten_weights(weights), dx).map_err(|err| match err.downcast::<AssemblyError>() {
            Ok(err) => SolveError::Assembly(*err),
            Err(other) => SolveError::Other(other),
        })
    }

    pub fn solve(
        &self,
        mesh: &Mesh1d,
        initial_weights: DMatrix<f64>,
        settings: &NewtonSettings<f64>,
        observer: &mut impl NewtonObserver<f64>,
    ) -> Result<Solution, SolveError> {
        let table = self.operators(initial_weights.ncols());
        solve(mesh, initial_weights, &table, &self.parameters, settings, observer)
    }

    /// Exact solution at `x`, if the problem has a known closed form.
    pub fn exact_solution(&self, x: f64) -> Option<f64> {
        P::exact_solution(x, &self.parameters)
    }
}
