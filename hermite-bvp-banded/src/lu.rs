use crate::{BandedMatrix, BandedSolveError};
use hermite_bvp_traits::Real;
use nalgebra::DVector;

/// LU factorization with partial pivoting of a banded matrix.
///
/// Row interchanges let the upper triangle grow by up to `lower` additional diagonals, so every
/// row `i` of the factorization keeps the columns `i - lower ..= i + upper + lower`. Multipliers of
/// the unit lower factor are stored in place of the entries they eliminate, and the row
/// interchanges are recorded in the order they were applied.
#[derive(Debug, Clone)]
pub struct BandedLu<T> {
    dim: usize,
    lower: usize,
    upper: usize,
    width: usize,
    factors: Vec<T>,
    pivots: Vec<usize>,
}

impl<T: Real> BandedLu<T> {
    pub fn factor(matrix: &BandedMatrix<T>) -> Result<Self, BandedSolveError> {
        let n = matrix.ncols();
        let lower = matrix.lower_bandwidth();
        let upper = matrix.upper_bandwidth();
        let width = 2 * lower + upper + 1;

        let mut lu = Self {
            dim: n,
            lower,
            upper,
            width,
            factors: vec![T::zero(); n * width],
            pivots: Vec::with_capacity(n),
        };

        for j in 0..n {
            for i in j.saturating_sub(upper)..usize::min(n, j + lower + 1) {
                let idx = lu.index(i, j);
                lu.factors[idx] = matrix.get(i, j);
            }
        }

        for i in 0..n {
            let last_row = usize::min(n - 1, i + lower);
            let last_col = lu.last_col(i);

            let mut pivot = i;
            for r in i + 1..=last_row {
                if lu.entry(r, i).abs() > lu.entry(pivot, i).abs() {
                    pivot = r;
                }
            }
            if lu.entry(pivot, i) == T::zero() {
                return Err(BandedSolveError::SingularMatrix { pivot: i });
            }

            if pivot != i {
                for j in i..=last_col {
                    let (a, b) = (lu.index(i, j), lu.index(pivot, j));
                    lu.factors.swap(a, b);
                }
            }
            lu.pivots.push(pivot);

            let diagonal = lu.entry(i, i);
            for r in i + 1..=last_row {
                let multiplier = lu.entry(r, i) / diagonal;
                let idx = lu.index(r, i);
                lu.factors[idx] = multiplier;
                if multiplier == T::zero() {
                    continue;
                }
                for j in i + 1..=last_col {
                    let u_ij = lu.entry(i, j);
                    let idx = lu.index(r, j);
                    lu.factors[idx] -= multiplier * u_ij;
                }
            }
        }

        Ok(lu)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Solves `A x = b` using the factorization.
    pub fn solve(&self, b: &DVector<T>) -> Result<DVector<T>, BandedSolveError> {
        let n = self.dim;
        if b.len() != n {
            return Err(BandedSolveError::DimensionMismatch {
                expected: n,
                actual: b.len(),
            });
        }

        let mut x = b.clone();

        // Forward substitution with L, replaying the row interchanges
        for i in 0..n {
            let pivot = self.pivots[i];
            if pivot != i {
                x.swap_rows(i, pivot);
            }
            let x_i = x[i];
            for r in i + 1..=usize::min(n - 1, i + self.lower) {
                x[r] -= self.entry(r, i) * x_i;
            }
        }

        // Back substitution with U
        for i in (0..n).rev() {
            let mut sum = x[i];
            for j in i + 1..=self.last_col(i) {
                sum -= self.entry(i, j) * x[j];
            }
            x[i] = sum / self.entry(i, i);
        }

        Ok(x)
    }

    fn last_col(&self, i: usize) -> usize {
        usize::min(self.dim - 1, i + self.upper + self.lower)
    }

    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(j + self.lower >= i && j <= i + self.upper + self.lower);
        i * self.width + (j + self.lower - i)
    }

    fn entry(&self, i: usize, j: usize) -> T {
        self.factors[self.index(i, j)]
    }
}

impl<T: Real> BandedMatrix<T> {
    /// Solves `A x = b` by banded LU factorization with partial pivoting.
    pub fn solve(&self, b: &DVector<T>) -> Result<DVector<T>, BandedSolveError> {
        BandedLu::factor(self)?.solve(b)
    }
}
