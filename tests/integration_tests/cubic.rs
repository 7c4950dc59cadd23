use super::linear_weights;
use hermite_bvp::interpolate::HermiteInterpolator;
use hermite_bvp::mesh::Mesh1d;
use hermite_bvp::optimize::newton::{NewtonSettings, NoObserver, Termination};
use hermite_bvp::problem::Problem;
use hermite_bvp::problems::CubicReactionDiffusion;
use matrixcompare::assert_scalar_eq;
use nalgebra::DMatrix;

#[test]
fn cubic_reaction_diffusion_converges_from_zero() {
    let problem = Problem::<CubicReactionDiffusion>::new(vec![1.0]).unwrap();
    let mesh = Mesh1d::uniform(0.0, 1.0, 4).unwrap();
    let solution = problem
        .solve(&mesh, DMatrix::zeros(5, 2), &NewtonSettings::default(), &mut NoObserver)
        .unwrap();

    assert!(solution.converged());
    assert!(solution.iterations <= 6);
    assert!(solution.residual_norm <= 1e-6);
    assert_scalar_eq!(solution.weights[(0, 0)], 1.0, comp = abs, tol = 1e-8);
    assert_scalar_eq!(solution.weights[(4, 0)], 0.0, comp = abs, tol = 1e-8);

    // u'' = u^3 >= 0 on a solution between 0 and 1, so the solution is convex and decreasing
    let values: Vec<f64> = solution.weights.column(0).iter().copied().collect();
    assert!(values.windows(2).all(|pair| pair[1] < pair[0]));
    assert!(values.windows(3).all(|t| t[0] - 2.0 * t[1] + t[2] >= 0.0));
}

#[test]
fn stronger_reaction_needs_more_iterations() {
    let mesh = Mesh1d::uniform(0.0, 1.0, 4).unwrap();
    let iterations = |lambda: f64| {
        Problem::<CubicReactionDiffusion>::new(vec![lambda])
            .unwrap()
            .solve(&mesh, DMatrix::zeros(5, 2), &NewtonSettings::default(), &mut NoObserver)
            .unwrap()
            .iterations
    };
    assert!(iterations(10.0) >= iterations(1.0));
}

#[test]
fn poor_initial_guess_hits_the_iteration_cap() {
    let problem = Problem::<CubicReactionDiffusion>::new(vec![1.0]).unwrap();
    let mesh = Mesh1d::uniform(0.0, 1.0, 4).unwrap();
    let initial = DMatrix::from_fn(5, 2, |_, k| if k == 0 { 50.0 } else { 0.0 });
    let settings = NewtonSettings {
        max_iterations: 3,
        ..NewtonSettings::default()
    };
    let solution = problem
        .solve(&mesh, initial, &settings, &mut NoObserver)
        .expect("reaching the iteration cap is not an error");

    assert_eq!(solution.termination, Termination::IterationLimitReached);
    assert_eq!(solution.iterations, 3);
    assert!(solution.residual_norm > settings.tolerance);
}

#[test]
fn hermite_and_linear_elements_agree() {
    let problem = Problem::<CubicReactionDiffusion>::new(vec![1.0]).unwrap();
    let settings = NewtonSettings {
        max_iterations: 20,
        tolerance: 1e-10,
    };

    let fine = Mesh1d::uniform(0.0, 1.0, 64).unwrap();
    let linear = problem
        .solve(&fine, linear_weights(&fine, 1, (0.0, 1.0), (1.0, 0.0)), &settings, &mut NoObserver)
        .unwrap();
    let coarse = Mesh1d::uniform(0.0, 1.0, 8).unwrap();
    let hermite = problem
        .solve(&coarse, linear_weights(&coarse, 2, (0.0, 1.0), (1.0, 0.0)), &settings, &mut NoObserver)
        .unwrap();
    assert!(linear.converged() && hermite.converged());

    let linear = HermiteInterpolator::new(fine, linear.weights);
    let hermite = HermiteInterpolator::new(coarse, hermite.weights);
    for x in [0.125, 0.3, 0.5, 0.77] {
        assert_scalar_eq!(linear.evaluate(x), hermite.evaluate(x), comp = abs, tol = 1e-3);
    }
}
