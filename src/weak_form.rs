//! Numeric derivation of operator tables from a pointwise weak form.
//!
//! A weak form on one element reads
//!
//! ```text
//! R_m = ∫ source(x, u, u') φ_m + flux(x, u, u') φ_m' dx,
//! ```
//!
//! where `φ_m` runs over the local Hermite basis functions and `u` is the interpolant of the local
//! weights. The integral is evaluated with Gauss-Legendre quadrature of `2 * order + 1` points, and
//! the Jacobian follows from the partial derivatives of `source` and `flux` that accompany every
//! [`Integrand`].
use crate::basis::HermiteBasis;
use crate::operators::{
    ElementBatch, EssentialBoundaryOperator, NaturalBoundaryOperators, OperatorTable, ParametricValue, SharedOperator,
};
use hermite_bvp_quadrature::{gauss, Rule};
use nalgebra::DVector;
use rayon::prelude::*;
use std::sync::Arc;

/// Pointwise values of the weak form integrand and its partial derivatives with respect to `u`
/// and `u'`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Integrand {
    /// Multiplies the test function.
    pub source: f64,
    /// Multiplies the derivative of the test function.
    pub flux: f64,
    pub source_u: f64,
    pub source_du: f64,
    pub flux_u: f64,
    pub flux_du: f64,
}

impl Integrand {
    /// The integrand tested against a function with value `phi` and derivative `dphi`.
    pub fn tested(&self, phi: f64, dphi: f64) -> f64 {
        self.source * phi + self.flux * dphi
    }

    /// Derivative of [`tested`](Self::tested) with respect to the weight of the trial function
    /// with value `trial_phi` and derivative `trial_dphi`.
    pub fn linearized(&self, phi: f64, dphi: f64, trial_phi: f64, trial_dphi: f64) -> f64 {
        let d_source = self.source_u * trial_phi + self.source_du * trial_dphi;
        let d_flux = self.flux_u * trial_phi + self.flux_du * trial_dphi;
        d_source * phi + d_flux * dphi
    }
}

/// A pointwise form `(x, u, u', parameters) -> Integrand`.
pub type PointwiseForm = fn(f64, f64, f64, &[f64]) -> Integrand;

/// The condition `u^(derivative)(location) = value`.
#[derive(Debug, Copy, Clone)]
pub struct EssentialCondition {
    pub location: ParametricValue,
    pub derivative: usize,
    pub value: ParametricValue,
}

impl EssentialCondition {
    /// Prescribes the value of the solution itself.
    pub fn value_at(location: impl Into<ParametricValue>, value: impl Into<ParametricValue>) -> Self {
        Self {
            location: location.into(),
            derivative: 0,
            value: value.into(),
        }
    }
}

/// A class of boundary value problems, described independently of concrete parameter values.
pub trait WeakForm: 'static {
    const NAME: &'static str;

    /// Names of the parameters, in the order the parameter values are passed to every function.
    const PARAMETERS: &'static [&'static str] = &[];

    fn integrand(x: f64, u: f64, du: f64, parameters: &[f64]) -> Integrand;

    /// Surface term left over from integration by parts, applied at both ends of the domain.
    ///
    /// Only `source` and its partial derivatives are meaningful: the term multiplies the test
    /// function itself.
    fn natural_term() -> Option<PointwiseForm> {
        None
    }

    fn essential_conditions() -> Vec<EssentialCondition>;

    fn exact_solution(_x: f64, _parameters: &[f64]) -> Option<f64> {
        None
    }
}

/// Values and derivatives of the local basis and of the interpolant at a point.
struct PointState {
    phi: DVector<f64>,
    dphi: DVector<f64>,
    u: f64,
    du: f64,
}

#[derive(Debug)]
struct LocalEvaluator {
    basis: HermiteBasis,
    rule: Rule,
}

impl LocalEvaluator {
    fn new(order: usize) -> Self {
        Self {
            basis: HermiteBasis::new(order),
            rule: gauss(2 * order + 1),
        }
    }

    fn state(&self, x_left: f64, x_right: f64, weights: &[f64], x: f64) -> PointState {
        let phi = self.basis.evaluate(x_left, x_right, x, 0);
        let dphi = self.basis.evaluate(x_left, x_right, x, 1);
        let u = phi.iter().zip(weights).map(|(p, w)| p * w).sum();
        let du = dphi.iter().zip(weights).map(|(p, w)| p * w).sum();
        PointState { phi, dphi, u, du }
    }

    /// Integrates `f(x, state)` over the element.
    fn integrate(
        &self,
        x_left: f64,
        x_right: f64,
        weights: &[f64],
        f: impl Fn(f64, &PointState) -> f64,
    ) -> f64 {
        self.rule
            .on_interval(x_left, x_right)
            .integrate(|x| f(x, &self.state(x_left, x_right, weights, x)))
    }
}

/// Evaluates `f(x_left, x_right, local_weights)` for every element of the batch, in parallel.
fn map_elements<F>(batch: &ElementBatch, f: F) -> DVector<f64>
where
    F: Fn(f64, f64, &[f64]) -> f64 + Sync + Send,
{
    let values: Vec<f64> = (0..batch.len())
        .into_par_iter()
        .map(|e| f(batch.x_left[e], batch.x_right[e], &batch.local_weights(e)))
        .collect();
    DVector::from_vec(values)
}

fn shared<F>(f: F) -> SharedOperator
where
    F: Fn(&ElementBatch, &[f64]) -> DVector<f64> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Derives the operator table of `P` at the given order.
///
/// This is comparatively expensive; prefer [`cached_operators`](crate::cache::cached_operators).
pub fn derive_operators<P: WeakForm>(order: usize) -> OperatorTable {
    derive_operators_from(order, P::integrand, P::natural_term(), &P::essential_conditions())
}

/// Derives an operator table from a pointwise form and its boundary conditions.
pub fn derive_operators_from(
    order: usize,
    integrand: PointwiseForm,
    natural_term: Option<PointwiseForm>,
    essential_conditions: &[EssentialCondition],
) -> OperatorTable {
    let evaluator = Arc::new(LocalEvaluator::new(order));
    let n = evaluator.basis.num_variables();
    let variables = evaluator.basis.variables().to_vec();

    let residuals = (0..n)
        .map(|m| {
            let evaluator = Arc::clone(&evaluator);
            shared(move |batch: &ElementBatch, parameters: &[f64]| {
                map_elements(batch, |x_left, x_right, weights| {
                    evaluator.integrate(x_left, x_right, weights, |x, s| {
                        integrand(x, s.u, s.du, parameters).tested(s.phi[m], s.dphi[m])
                    })
                })
            })
        })
        .collect();

    let jacobians = (0..n)
        .map(|m| {
            (0..n)
                .map(|l| {
                    let evaluator = Arc::clone(&evaluator);
                    shared(move |batch: &ElementBatch, parameters: &[f64]| {
                        map_elements(batch, |x_left, x_right, weights| {
                            evaluator.integrate(x_left, x_right, weights, |x, s| {
                                integrand(x, s.u, s.du, parameters).linearized(
                                    s.phi[m],
                                    s.dphi[m],
                                    s.phi[l],
                                    s.dphi[l],
                                )
                            })
                        })
                    })
                })
                .collect()
        })
        .collect();

    let essential = essential_conditions
        .iter()
        .map(|condition| essential_operator(&evaluator, *condition))
        .collect();

    let table = OperatorTable::new(order, variables, residuals, jacobians).with_essential_conditions(essential);
    match natural_term {
        Some(term) => table.with_natural_conditions(natural_operators(&evaluator, term)),
        None => table,
    }
}

fn essential_operator(evaluator: &Arc<LocalEvaluator>, condition: EssentialCondition) -> EssentialBoundaryOperator {
    let EssentialCondition {
        location,
        derivative,
        value,
    } = condition;

    let value_evaluator = Arc::clone(evaluator);
    let value = shared(move |batch: &ElementBatch, parameters: &[f64]| {
        let x = location.resolve(parameters);
        let prescribed = value.resolve(parameters);
        map_elements(batch, |x_left, x_right, weights| {
            value_evaluator
                .basis
                .interpolate(x_left, x_right, weights, x, derivative)
                - prescribed
        })
    });

    let jacobian_row = (0..evaluator.basis.num_variables())
        .map(|l| {
            let evaluator = Arc::clone(evaluator);
            shared(move |batch: &ElementBatch, parameters: &[f64]| {
                let x = location.resolve(parameters);
                map_elements(batch, |x_left, x_right, _| {
                    evaluator.basis.evaluate(x_left, x_right, x, derivative)[l]
                })
            })
        })
        .collect();

    EssentialBoundaryOperator {
        location,
        value,
        jacobian_row,
    }
}

fn natural_operators(evaluator: &Arc<LocalEvaluator>, term: PointwiseForm) -> NaturalBoundaryOperators {
    let n = evaluator.basis.num_variables();

    // Left terms are evaluated at the left end of an element, right terms at its right end
    let values = |at_right: bool| -> Vec<SharedOperator> {
        (0..n)
            .map(|c| {
                let evaluator = Arc::clone(evaluator);
                shared(move |batch: &ElementBatch, parameters: &[f64]| {
                    map_elements(batch, |x_left, x_right, weights| {
                        let x = if at_right { x_right } else { x_left };
                        let s = evaluator.state(x_left, x_right, weights, x);
                        term(x, s.u, s.du, parameters).tested(s.phi[c], s.dphi[c])
                    })
                })
            })
            .collect()
    };

    let jacobian = |at_right: bool| -> Vec<Vec<SharedOperator>> {
        (0..n)
            .map(|c| {
                (0..n)
                    .map(|l| {
                        let evaluator = Arc::clone(evaluator);
                        shared(move |batch: &ElementBatch, parameters: &[f64]| {
                            map_elements(batch, |x_left, x_right, weights| {
                                let x = if at_right { x_right } else { x_left };
                                let s = evaluator.state(x_left, x_right, weights, x);
                                term(x, s.u, s.du, parameters).linearized(s.phi[c], s.dphi[c], s.phi[l], s.dphi[l])
                            })
                        })
                    })
                    .collect()
            })
            .collect()
    };

    NaturalBoundaryOperators {
        left: values(false),
        right: values(true),
        left_jacobian: jacobian(false),
        right_jacobian: jacobian(true),
    }
}
