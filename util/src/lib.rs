use nalgebra::{DMatrix, DVector};

/// Poor man's approx assertion for matrices
#[macro_export]
macro_rules! assert_approx_matrix_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let diff = $x - $y;

        let max_absdiff = diff.abs().max();
        let approx_eq = max_absdiff <= $tol;

        if !approx_eq {
            println!("abstol: {:e}", $tol);
            println!("left: {}", $x);
            println!("right: {}", $y);
            println!("diff: {:e}", diff);
        }
        assert!(approx_eq);
    }};
    ($x:expr, $y:expr, reltol = $tol:expr) => {{
        let reldiff = $crate::max_relative_difference(&$x, &$y);
        if reldiff > $tol {
            println!("reltol: {:e}", $tol);
            println!("left: {}", $x);
            println!("right: {}", $y);
            println!("max relative difference: {:e}", reldiff);
        }
        assert!(reldiff <= $tol);
    }};
}

/// Largest entrywise difference, relative to the largest entry of either matrix.
///
/// Returns zero when both matrices vanish.
pub fn max_relative_difference(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
    assert_eq!(a.shape(), b.shape(), "matrices must have the same shape");
    let scale = a.amax().max(b.amax());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).amax() / scale
    }
}

/// Node-major flattening of a `(nodes, slots)` array, matching the global unknown numbering.
pub fn flatten_rows(matrix: &DMatrix<f64>) -> DVector<f64> {
    let cols = matrix.ncols();
    DVector::from_fn(matrix.nrows() * cols, |k, _| matrix[(k / cols, k % cols)])
}
