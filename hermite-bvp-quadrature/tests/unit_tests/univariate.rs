use hermite_bvp_quadrature::gauss;

use matrixcompare::assert_scalar_eq;

fn monomial_integral(a: f64, b: f64, degree: i32) -> f64 {
    (b.powi(degree + 1) - a.powi(degree + 1)) / (degree as f64 + 1.0)
}

#[test]
fn gauss_rules_integrate_polynomials_up_to_expected_degree() {
    for n in 1..=40 {
        let rule = gauss(n);
        assert_eq!(rule.len(), n);
        assert!(rule.weights().iter().all(|&w| w > 0.0));

        let expected_degree = 2 * n as i32 - 1;
        for alpha in 0..=expected_degree {
            let estimate = rule.integrate(|x| x.powi(alpha));
            assert_scalar_eq!(estimate, monomial_integral(-1.0, 1.0, alpha), comp = abs, tol = 1e-13);
        }
    }
}

#[test]
fn gauss_rule_mapped_onto_interval_keeps_accuracy() {
    let (a, b) = (-2.5, 4.0);
    for n in 1..=8 {
        let rule = gauss(n).on_interval(a, b);
        assert_scalar_eq!(rule.weights().iter().sum::<f64>(), b - a, comp = abs, tol = 1e-12);
        assert!(rule.points().iter().all(|x| *x > a && *x < b));

        for alpha in 0..=(2 * n as i32 - 1) {
            let estimate = rule.integrate(|x| x.powi(alpha));
            let expected = monomial_integral(a, b, alpha);
            assert_scalar_eq!(estimate, expected, comp = abs, tol = 1e-10 * expected.abs().max(1.0));
        }
    }
}

#[test]
fn gauss_points_are_symmetric() {
    for n in 1..=12 {
        let rule = gauss(n);
        let points = rule.points();
        let weights = rule.weights();
        for i in 0..n / 2 {
            let mirror = points.iter().position(|x| (x + points[i]).abs() < 1e-14);
            let mirror = mirror.expect("every Gauss point must have a mirror image");
            assert_scalar_eq!(weights[i], weights[mirror], comp = abs, tol = 1e-14);
        }
    }
}
