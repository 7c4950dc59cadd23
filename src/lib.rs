//! Nonlinear two-point boundary value problems with Hermite finite elements.
//!
//! A problem is given in weak form on a one-dimensional [`mesh::Mesh1d`]. Each node carries
//! `order` unknowns (the solution and its first `order - 1` derivatives), elements couple the
//! unknowns of their two nodes, and the resulting nonlinear system is solved with Newton's method
//! against a banded Jacobian.
//!
//! The main entry points are:
//!
//! - [`problem::Problem`], which ties a [`weak_form::WeakForm`] to concrete parameter values,
//! - [`assembly::assemble_residual`] and [`assembly::assemble_jacobian`] for direct access to the
//!   global system given an [`operators::OperatorTable`],
//! - [`solve::solve`] for the Newton iteration.

pub mod assembly;
pub mod basis;
pub mod cache;
pub mod interpolate;
pub mod mesh;
pub mod operators;
pub mod problem;
pub mod problems;
pub mod solve;
pub mod weak_form;

pub mod banded {
    pub use hermite_bvp_banded::*;
}

pub mod optimize {
    pub use hermite_bvp_optimize::*;
}

pub mod quadrature {
    pub use hermite_bvp_quadrature::*;
}

pub extern crate nalgebra;

pub use hermite_bvp_traits::Real;
