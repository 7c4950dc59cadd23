use hermite_bvp_optimize::calculus::{DifferentiableVectorFunction, FunctionError, VectorFunction, VectorFunctionBuilder};
use hermite_bvp_optimize::newton::*;
use nalgebra::{DVector, DVectorView, DVectorViewMut, Matrix3, Vector3};
use numeric_literals::replace_numeric_literals;

struct MockLinearVectorFunction;

#[replace_numeric_literals(f64::from(literal))]
fn system_matrix() -> Matrix3<f64> {
    Matrix3::new(5, 1, 2, 1, 4, 2, 2, 2, 4)
}

impl VectorFunction<f64> for MockLinearVectorFunction {
    fn dimension(&self) -> usize {
        3
    }

    fn eval_into(&mut self, f: &mut DVectorViewMut<f64>, x: &DVectorView<f64>) -> Result<(), FunctionError> {
        let b = Vector3::new(1.0, 2.0, 3.0);
        let r = system_matrix() * x - b;
        f.copy_from(&r);
        Ok(())
    }
}

impl DifferentiableVectorFunction<f64> for MockLinearVectorFunction {
    fn solve_jacobian_system(
        &mut self,
        sol: &mut DVectorViewMut<f64>,
        _x: &DVectorView<f64>,
        rhs: &DVectorView<f64>,
    ) -> Result<(), FunctionError> {
        let a_inv = system_matrix().try_inverse().ok_or("singular")?;
        sol.copy_from(&(a_inv * rhs));
        Ok(())
    }
}

/// f(x) = x^2 - 2 in one dimension.
fn square_root_of_two() -> impl DifferentiableVectorFunction<f64> {
    VectorFunctionBuilder::with_dimension(1)
        .with_function(|f: &mut DVectorViewMut<f64>, x: &DVectorView<f64>| -> Result<(), FunctionError> {
            f[0] = x[0] * x[0] - 2.0;
            Ok(())
        })
        .with_jacobian_solver(
            |sol: &mut DVectorViewMut<f64>, x: &DVectorView<f64>, rhs: &DVectorView<f64>| -> Result<(), FunctionError> {
                sol[0] = rhs[0] / (2.0 * x[0]);
                Ok(())
            },
        )
}

#[test]
fn newton_converges_in_single_iteration_for_linear_system() {
    let expected_solution = Vector3::new(-0.125, 0.16666667, 0.72916667);

    let settings = NewtonSettings {
        max_iterations: 2,
        tolerance: Vector3::new(1.0, 2.0, 3.0).norm() * 1e-6,
    };

    let output = newton(MockLinearVectorFunction, DVector::zeros(3), &settings, &mut NoObserver)
        .expect("Newton iterations must succeed");
    let diff = output.solution - expected_solution;
    assert!(diff.norm() < 1e-6);
    assert_eq!(output.iterations, 1);
    assert_eq!(output.termination, Termination::Converged);
}

#[test]
fn newton_returns_immediately_when_initial_guess_solves_system() {
    let settings = NewtonSettings::default();
    let x0 = DVector::from_column_slice(&[2.0f64.sqrt()]);
    let output = newton(square_root_of_two(), x0, &settings, &mut NoObserver).unwrap();
    assert_eq!(output.iterations, 0);
    assert!(output.converged());
}

#[test]
fn newton_converges_quadratically_for_scalar_problem() {
    let settings = NewtonSettings {
        max_iterations: 20,
        tolerance: 1e-12,
    };
    let output = newton(square_root_of_two(), DVector::from_column_slice(&[1.0]), &settings, &mut NoObserver).unwrap();
    assert!(output.converged());
    assert!((output.solution[0] - 2.0f64.sqrt()).abs() < 1e-12);
    assert!(output.iterations <= 6);
    assert!(output.residual_norm <= 1e-12);
}

#[test]
fn newton_reports_iteration_limit_without_error() {
    let settings = NewtonSettings {
        max_iterations: 2,
        tolerance: 1e-14,
    };
    let output = newton(square_root_of_two(), DVector::from_column_slice(&[100.0]), &settings, &mut NoObserver)
        .expect("reaching the iteration cap is not an error");
    assert_eq!(output.termination, Termination::IterationLimitReached);
    assert_eq!(output.iterations, 2);
    assert!(!output.converged());
    assert_eq!(output.residual_norm, output.residual.norm());
}

#[test]
fn newton_zero_iteration_cap_only_evaluates_initial_residual() {
    let settings = NewtonSettings {
        max_iterations: 0,
        tolerance: 1e-10,
    };
    let output = newton(square_root_of_two(), DVector::from_column_slice(&[1.0]), &settings, &mut NoObserver).unwrap();
    assert_eq!(output.termination, Termination::IterationLimitReached);
    assert_eq!(output.iterations, 0);
    assert_eq!(output.solution[0], 1.0);
    assert_eq!(output.residual[0], -1.0);
}

#[test]
fn newton_observer_sees_every_residual() {
    let settings = NewtonSettings {
        max_iterations: 20,
        tolerance: 1e-10,
    };
    let mut seen = Vec::new();
    let mut observer = |iteration: usize, residual: &DVector<f64>| seen.push((iteration, residual.norm()));
    let output = newton(square_root_of_two(), DVector::from_column_slice(&[1.0]), &settings, &mut observer).unwrap();

    assert_eq!(seen.len(), output.iterations + 1);
    for (expected_iteration, (iteration, _)) in seen.iter().enumerate() {
        assert_eq!(*iteration, expected_iteration);
    }
    assert_eq!(seen[0].1, 1.0);
    assert_eq!(seen.last().unwrap().1, output.residual_norm);
}

#[test]
fn newton_propagates_jacobian_errors() {
    let function = VectorFunctionBuilder::with_dimension(1)
        .with_function(|f: &mut DVectorViewMut<f64>, x: &DVectorView<f64>| -> Result<(), FunctionError> {
            f[0] = x[0] + 1.0;
            Ok(())
        })
        .with_jacobian_solver(
            |_sol: &mut DVectorViewMut<f64>, _x: &DVectorView<f64>, _rhs: &DVectorView<f64>| -> Result<(), FunctionError> {
                Err("no jacobian".into())
            },
        );
    let error = newton(function, DVector::zeros(1), &NewtonSettings::default(), &mut NoObserver).unwrap_err();
    match error {
        NewtonError::JacobianError { iteration, .. } => assert_eq!(iteration, 0),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn newton_settings_default() {
    let settings = NewtonSettings::default();
    assert_eq!(settings.max_iterations, 10);
    assert_eq!(settings.tolerance, 1e-6);
}
