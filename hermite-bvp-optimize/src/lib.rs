/// Calculus helper traits and numerical differentiation
pub mod calculus;
/// Newton iteration with a soft iteration cap
pub mod newton;
