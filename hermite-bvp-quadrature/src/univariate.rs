//! Gauss-Legendre rules for the reference interval `[-1, 1]`.

use crate::Rule;
use std::f64::consts::PI;

/// Legendre polynomial `P_n` and its predecessor `P_{n-1}` at a point.
///
/// The derivative formula is singular at `|x| == 1`, which is never a Gauss point.
#[derive(Debug, Clone, Copy)]
struct Legendre {
    n: usize,
    x: f64,
    p_n: f64,
    p_n_minus_1: f64,
}

impl Legendre {
    fn at(n: usize, x: f64) -> Self {
        // Bonnet recurrence: m P_m = (2m - 1) x P_{m-1} - (m - 1) P_{m-2}
        let mut p_n = 1.0;
        let mut p_n_minus_1 = 0.0;
        for m in 1..=n {
            let m = m as f64;
            let p_n_minus_2 = p_n_minus_1;
            p_n_minus_1 = p_n;
            p_n = ((2.0 * m - 1.0) * x * p_n_minus_1 - (m - 1.0) * p_n_minus_2) / m;
        }
        Self { n, x, p_n, p_n_minus_1 }
    }

    fn value(&self) -> f64 {
        self.p_n
    }

    fn derivative(&self) -> f64 {
        let n = self.n as f64;
        n * (self.x * self.p_n - self.p_n_minus_1) / (self.x * self.x - 1.0)
    }
}

const MAX_ROOT_ITERATIONS: usize = 100;

/// Gauss-Legendre rule with `num_points` points on `[-1, 1]`.
///
/// A rule with `n` points integrates polynomials of degree up to `2n - 1` exactly. Points are
/// returned in descending order for the first half and mirrored for the second half.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn gauss(num_points: usize) -> Rule {
    let n = num_points;
    assert!(n > 0, "number of points must be positive");

    let half = (n + 1) / 2;
    let mut points = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);

    for i in 0..half {
        // Chebyshev-like initial guess, then polish the root of P_n with Newton's method
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..MAX_ROOT_ITERATIONS {
            let p = Legendre::at(n, x);
            let dx = -p.value() / p.derivative();
            x += dx;
            if dx.abs() <= 1e-15 {
                break;
            }
        }

        let dp = Legendre::at(n, x).derivative();
        points.push(x);
        weights.push(2.0 / ((1.0 - x * x) * dp * dp));
    }

    for i in half..n {
        let mirror = n - i - 1;
        points.push(-points[mirror]);
        weights.push(weights[mirror]);
    }

    Rule::from_weights_and_points(weights, points)
}
