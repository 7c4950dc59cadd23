//! Banded matrices in diagonal storage, and a direct solver for them.
//!
//! The storage convention is the one used by LAPACK's `gbsv` and SciPy's `solve_banded`:
//! a square matrix `A` with `l` sub-diagonals and `u` super-diagonals is stored as a dense
//! `(l + u + 1) x n` array `ab` with
//!
//! ```text
//! ab[u + i - j, j] == A[i, j]    for max(0, j - u) <= i <= min(n - 1, j + l).
//! ```
//!
//! Each row of `ab` therefore holds one diagonal of `A`, and each column of `ab` holds the
//! banded part of the corresponding column of `A`.

mod lu;
mod operator;

pub use lu::*;
pub use operator::*;

use nalgebra::{DMatrix, Scalar};
use num::Zero;
use thiserror::Error;

/// Errors produced by the banded direct solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BandedSolveError {
    #[error("right-hand side has {actual} rows, but the matrix has dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("matrix is singular: no non-zero pivot available for column {pivot}")]
    SingularMatrix { pivot: usize },
}

/// A square banded matrix in diagonal storage.
#[derive(Debug, Clone, PartialEq)]
pub struct BandedMatrix<T: Scalar> {
    lower: usize,
    upper: usize,
    storage: DMatrix<T>,
}

impl<T: Scalar + Zero> BandedMatrix<T> {
    /// An `n x n` banded matrix with all stored diagonals set to zero.
    pub fn zeros(n: usize, lower: usize, upper: usize) -> Self {
        Self {
            lower,
            upper,
            storage: DMatrix::zeros(lower + upper + 1, n),
        }
    }

    /// Wraps an existing diagonal storage array.
    ///
    /// # Panics
    ///
    /// Panics if `storage` does not have exactly `lower + upper + 1` rows.
    pub fn from_storage(lower: usize, upper: usize, storage: DMatrix<T>) -> Self {
        assert_eq!(
            storage.nrows(),
            lower + upper + 1,
            "diagonal storage must have lower + upper + 1 rows"
        );
        Self { lower, upper, storage }
    }

    /// Extracts the band of a dense square matrix. Entries outside the band are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `dense` is not square.
    pub fn from_dense(dense: &DMatrix<T>, lower: usize, upper: usize) -> Self {
        assert_eq!(dense.nrows(), dense.ncols(), "banded matrices must be square");
        let n = dense.ncols();
        let mut banded = Self::zeros(n, lower, upper);
        for j in 0..n {
            for i in j.saturating_sub(upper)..usize::min(n, j + lower + 1) {
                banded.storage[(upper + i - j, j)] = dense[(i, j)].clone();
            }
        }
        banded
    }

    pub fn nrows(&self) -> usize {
        self.storage.ncols()
    }

    pub fn ncols(&self) -> usize {
        self.storage.ncols()
    }

    pub fn lower_bandwidth(&self) -> usize {
        self.lower
    }

    pub fn upper_bandwidth(&self) -> usize {
        self.upper
    }

    pub fn storage(&self) -> &DMatrix<T> {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut DMatrix<T> {
        &mut self.storage
    }

    pub fn into_storage(self) -> DMatrix<T> {
        self.storage
    }

    /// Whether `(i, j)` lies inside the band.
    pub fn in_band(&self, i: usize, j: usize) -> bool {
        i <= j + self.lower && j <= i + self.upper
    }

    /// Returns `A[i, j]`, which is zero outside the band.
    pub fn get(&self, i: usize, j: usize) -> T {
        assert!(i < self.nrows() && j < self.ncols(), "index out of bounds");
        if self.in_band(i, j) {
            self.storage[(self.upper + i - j, j)].clone()
        } else {
            T::zero()
        }
    }

    /// Mutable access to `A[i, j]`, or `None` if `(i, j)` lies outside the band.
    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        if i < self.nrows() && j < self.ncols() && self.in_band(i, j) {
            Some(&mut self.storage[(self.upper + i - j, j)])
        } else {
            None
        }
    }

    /// Expands the banded matrix into a dense square matrix.
    pub fn to_dense(&self) -> DMatrix<T> {
        let n = self.ncols();
        DMatrix::from_fn(n, n, |i, j| self.get(i, j))
    }
}
