use nalgebra::RealField;

pub use nalgebra;

/// Scalar type used by the generic numerical routines in `hermite-bvp`.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
