use crate::calculus::{DifferentiableVectorFunction, FunctionError};
use hermite_bvp_traits::Real;
use log::{debug, info, warn};
use nalgebra::{DVector, DVectorView, DVectorViewMut, Scalar};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewtonSettings<T> {
    /// Soft cap: reaching it ends the iteration without an error.
    pub max_iterations: usize,
    pub tolerance: T,
}

impl Default for NewtonSettings<f64> {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tolerance: 1e-6,
        }
    }
}

/// How a Newton iteration ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The residual norm dropped to or below the tolerance.
    Converged,
    /// The iteration cap was reached first. The caller decides whether the residual is acceptable.
    IterationLimitReached,
}

#[derive(Debug, Clone)]
pub struct NewtonOutput<T>
where
    T: Scalar,
{
    pub solution: DVector<T>,
    /// Residual evaluated at `solution`.
    pub residual: DVector<T>,
    pub residual_norm: T,
    pub iterations: usize,
    pub termination: Termination,
}

impl<T: Scalar> NewtonOutput<T> {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

#[derive(Debug)]
pub enum NewtonError {
    /// Evaluating the function failed.
    FunctionError { iteration: usize, source: FunctionError },
    /// Solving the Jacobian system failed.
    JacobianError { iteration: usize, source: FunctionError },
}

impl Display for NewtonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            NewtonError::FunctionError { iteration, source } => {
                write!(f, "Failed to evaluate function at Newton iteration {}. Error: {}", iteration, source)
            }
            NewtonError::JacobianError { iteration, source } => {
                write!(f, "Failed to solve Jacobian system at Newton iteration {}. Error: {}", iteration, source)
            }
        }
    }
}

impl Error for NewtonError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NewtonError::FunctionError { source, .. } | NewtonError::JacobianError { source, .. } => {
                Some(source.as_ref())
            }
        }
    }
}

/// Receives every residual computed during a Newton solve, starting with the initial one.
///
/// Observers are purely informational and cannot influence the iteration.
pub trait NewtonObserver<T: Scalar> {
    fn observe(&mut self, iteration: usize, residual: &DVector<T>);
}

/// Observer that discards all updates.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoObserver;

impl<T: Scalar> NewtonObserver<T> for NoObserver {
    fn observe(&mut self, _iteration: usize, _residual: &DVector<T>) {}
}

impl<T, F> NewtonObserver<T> for F
where
    T: Scalar,
    F: FnMut(usize, &DVector<T>),
{
    fn observe(&mut self, iteration: usize, residual: &DVector<T>) {
        self(iteration, residual)
    }
}

/// Attempts to solve the non-linear equation F(u) = 0 with undamped Newton steps.
///
/// Each iteration evaluates `F`, stops if `|F(u)|_2 <= tolerance` or the iteration cap is
/// reached, and otherwise solves `J(u) du = -F(u)` and sets `u <- u + du`. Hitting the cap is
/// reported through [`Termination::IterationLimitReached`], not as an error.
pub fn newton<T, F>(
    mut function: F,
    initial_guess: DVector<T>,
    settings: &NewtonSettings<T>,
    observer: &mut impl NewtonObserver<T>,
) -> Result<NewtonOutput<T>, NewtonError>
where
    T: Real,
    F: DifferentiableVectorFunction<T>,
{
    let n = function.dimension();
    assert_eq!(initial_guess.len(), n, "initial guess must match function dimension");

    let mut x = initial_guess;
    let mut f = DVector::zeros(n);
    let mut minus_f = DVector::zeros(n);
    let mut dx = DVector::zeros(n);

    function
        .eval_into(&mut DVectorViewMut::from(&mut f), &DVectorView::from(&x))
        .map_err(|source| NewtonError::FunctionError { iteration: 0, source })?;
    observer.observe(0, &f);

    let mut iter = 0;
    loop {
        let residual_norm = f.norm();

        let termination = if residual_norm <= settings.tolerance {
            info!("Newton converged after {} iterations (residual norm {})", iter, residual_norm);
            Some(Termination::Converged)
        } else if iter >= settings.max_iterations {
            warn!(
                "Newton stopped at iteration cap {} with residual norm {} (tolerance {})",
                settings.max_iterations, residual_norm, settings.tolerance
            );
            Some(Termination::IterationLimitReached)
        } else {
            None
        };

        if let Some(termination) = termination {
            return Ok(NewtonOutput {
                solution: x,
                residual: f,
                residual_norm,
                iterations: iter,
                termination,
            });
        }

        minus_f.copy_from(&f);
        minus_f.neg_mut();
        function
            .solve_jacobian_system(
                &mut DVectorViewMut::from(&mut dx),
                &DVectorView::from(&x),
                &DVectorView::from(&minus_f),
            )
            .map_err(|source| NewtonError::JacobianError { iteration: iter, source })?;

        x += &dx;
        iter += 1;

        function
            .eval_into(&mut DVectorViewMut::from(&mut f), &DVectorView::from(&x))
            .map_err(|source| NewtonError::FunctionError { iteration: iter, source })?;
        debug!("Newton iteration {}: residual norm {}, step norm {}", iter, f.norm(), dx.norm());
        observer.observe(iter, &f);
    }
}
