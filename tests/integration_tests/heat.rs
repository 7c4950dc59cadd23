use hermite_bvp::mesh::Mesh1d;
use hermite_bvp::optimize::newton::{NewtonSettings, NoObserver};
use hermite_bvp::problem::Problem;
use hermite_bvp::problems::HeatEquation;
use matrixcompare::assert_scalar_eq;
use nalgebra::DMatrix;
use proptest::prelude::*;

#[test]
fn heat_equation_is_solved_in_a_single_newton_step() {
    let problem = Problem::<HeatEquation>::new(vec![]).unwrap();
    let mesh = Mesh1d::uniform(0.0, 1.0, 4).unwrap();
    for order in 1..=3 {
        let solution = problem
            .solve(&mesh, DMatrix::zeros(5, order), &NewtonSettings::default(), &mut NoObserver)
            .unwrap();
        assert!(solution.converged(), "order {}", order);
        assert_eq!(solution.iterations, 1, "order {}", order);

        for (i, x) in mesh.nodes().iter().enumerate() {
            let exact = problem.exact_solution(*x).unwrap();
            assert_scalar_eq!(solution.weights[(i, 0)], exact, comp = abs, tol = 1e-10);
            if order >= 2 {
                assert_scalar_eq!(solution.weights[(i, 1)], -1.0, comp = abs, tol = 1e-10);
            }
            if order >= 3 {
                assert_scalar_eq!(solution.weights[(i, 2)], 0.0, comp = abs, tol = 1e-10);
            }
        }
    }
}

proptest! {
    #[test]
    fn heat_equation_converges_in_one_step_from_any_guess(
        guess in prop::collection::vec(-10.0f64..10.0, 10),
    ) {
        let problem = Problem::<HeatEquation>::new(vec![]).unwrap();
        let mesh = Mesh1d::uniform(0.0, 1.0, 4).unwrap();
        let initial = DMatrix::from_row_slice(5, 2, &guess);
        let solution = problem
            .solve(&mesh, initial, &NewtonSettings::default(), &mut NoObserver)
            .unwrap();
        prop_assert!(solution.converged());
        prop_assert!(solution.iterations <= 1);
        prop_assert!((solution.weights[(2, 0)] - 0.5).abs() <= 1e-9);
    }
}
