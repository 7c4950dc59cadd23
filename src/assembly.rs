//! Assembly of the global residual and the banded global Jacobian.
//!
//! Global unknowns are numbered node-major: slot `k` of node `i` is unknown `i * order + k`.
//! Elemental contributions are added, boundary conditions are applied afterwards, with natural
//! conditions added at the domain ends and essential conditions overwriting a single equation.
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

pub mod boundary;
mod jacobian;
mod residual;

pub use jacobian::*;
pub use residual::*;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    /// An operator produced a NaN or infinite value, typically from a division by zero.
    #[error("operator {operator} produced a non-finite value on element {element}")]
    NumericSingularity { operator: String, element: usize },
    /// More essential conditions resolved to a node than it has unknowns.
    #[error("essential condition {condition} needs slot {slot} of node {node}, but nodes only have {order} slots")]
    SlotCollision {
        condition: usize,
        node: usize,
        slot: usize,
        order: usize,
    },
    #[error("weight variable has unknown boundary tag {tag} (expected 0 or 1)")]
    UnknownVariableTag { tag: usize },
    /// Weights or operator output do not have the shape implied by the mesh and the table.
    #[error("expected an array of shape {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("location of essential condition {condition} evaluated to {location}")]
    InvalidLocation { condition: usize, location: f64 },
}

fn check_shape(num_nodes: usize, order: usize, weights: &DMatrix<f64>) -> Result<(), AssemblyError> {
    if weights.shape() != (num_nodes, order) {
        Err(AssemblyError::ShapeMismatch {
            expected: (num_nodes, order),
            actual: weights.shape(),
        })
    } else {
        Ok(())
    }
}

/// Rejects operator output of the wrong length or containing NaN or infinite values.
///
/// `first_element` is the global index of the first element of the evaluated batch.
fn check_output(
    values: &DVector<f64>,
    batch_len: usize,
    first_element: usize,
    operator: impl FnOnce() -> String,
) -> Result<(), AssemblyError> {
    if values.len() != batch_len {
        return Err(AssemblyError::ShapeMismatch {
            expected: (batch_len, 1),
            actual: (values.len(), 1),
        });
    }
    match values.iter().position(|v| !v.is_finite()) {
        None => Ok(()),
        Some(offset) => Err(AssemblyError::NumericSingularity {
            operator: operator(),
            element: first_element + offset,
        }),
    }
}
