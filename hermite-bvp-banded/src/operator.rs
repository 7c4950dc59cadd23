use crate::BandedMatrix;
use hermite_bvp_traits::Real;
use nalgebra::{DVector, DVectorView, DVectorViewMut};

/// A linear map `y = A x`.
pub trait LinearOperator<T: Real> {
    fn apply(&self, y: DVectorViewMut<T>, x: DVectorView<T>);

    /// Convenience wrapper that allocates the output.
    fn apply_to(&self, x: &DVector<T>) -> DVector<T> {
        let mut y = DVector::zeros(x.len());
        self.apply(DVectorViewMut::from(&mut y), DVectorView::from(x));
        y
    }
}

impl<'a, T, A> LinearOperator<T> for &'a A
where
    T: Real,
    A: ?Sized + LinearOperator<T>,
{
    fn apply(&self, y: DVectorViewMut<T>, x: DVectorView<T>) {
        <A as LinearOperator<T>>::apply(self, y, x)
    }
}

impl<T: Real> LinearOperator<T> for BandedMatrix<T> {
    fn apply(&self, mut y: DVectorViewMut<T>, x: DVectorView<T>) {
        let n = self.ncols();
        assert_eq!(x.len(), n, "input dimension must match matrix dimension");
        assert_eq!(y.len(), n, "output dimension must match matrix dimension");

        y.fill(T::zero());
        let upper = self.upper_bandwidth();
        for j in 0..n {
            let x_j = x[j];
            for i in j.saturating_sub(upper)..usize::min(n, j + self.lower_bandwidth() + 1) {
                y[i] += self.storage()[(upper + i - j, j)] * x_j;
            }
        }
    }
}
