//! Numeric operator tables consumed by the assemblers.
//!
//! Every operator is evaluated on a batch of elements at once and returns one value per element.
//! How the operators are produced (derived from a weak form, generated elsewhere, written by hand)
//! is of no concern to the assembly.
use crate::basis::WeightVariable;
use crate::mesh::Mesh1d;
use nalgebra::{DMatrix, DVector};
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

/// The common argument of all element operators: end points and local weights of a set of
/// elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBatch {
    pub x_left: Vec<f64>,
    pub x_right: Vec<f64>,
    /// Row `e` holds the weights of the left node of element `e` followed by those of its right
    /// node, i.e. the matrix has `2 * order` columns.
    pub weights: DMatrix<f64>,
}

impl ElementBatch {
    /// Collects all elements of the mesh.
    ///
    /// # Panics
    ///
    /// Panics if `weights` does not have one row per mesh node.
    pub fn from_mesh(mesh: &Mesh1d, weights: &DMatrix<f64>) -> Self {
        assert_eq!(weights.nrows(), mesh.num_nodes(), "weights must have one row per node");
        let order = weights.ncols();
        let num_elements = mesh.num_elements();
        let mut local_weights = DMatrix::zeros(num_elements, 2 * order);
        local_weights
            .columns_mut(0, order)
            .copy_from(&weights.rows(0, num_elements));
        local_weights
            .columns_mut(order, order)
            .copy_from(&weights.rows(1, num_elements));
        Self {
            x_left: mesh.left_edges().to_vec(),
            x_right: mesh.right_edges().to_vec(),
            weights: local_weights,
        }
    }

    /// A batch consisting of the single element `element` of `self`.
    pub fn element(&self, element: usize) -> Self {
        Self {
            x_left: vec![self.x_left[element]],
            x_right: vec![self.x_right[element]],
            weights: self.weights.rows(element, 1).into_owned(),
        }
    }

    pub fn len(&self) -> usize {
        self.x_left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_left.is_empty()
    }

    /// The `2 * order` local weights of element `element`.
    pub fn local_weights(&self, element: usize) -> Vec<f64> {
        self.weights.row(element).iter().copied().collect()
    }
}

/// A batched numeric function of the element end points, local weights and problem parameters.
pub trait ElementOperator: Send + Sync {
    /// Returns one value per element of the batch.
    fn evaluate(&self, batch: &ElementBatch, parameters: &[f64]) -> DVector<f64>;
}

impl<F> ElementOperator for F
where
    F: Fn(&ElementBatch, &[f64]) -> DVector<f64> + Send + Sync,
{
    fn evaluate(&self, batch: &ElementBatch, parameters: &[f64]) -> DVector<f64> {
        self(batch, parameters)
    }
}

pub type SharedOperator = Arc<dyn ElementOperator>;

/// A scalar that is either fixed or computed from the problem parameters.
#[derive(Copy, Clone)]
pub enum ParametricValue {
    Constant(f64),
    Parametric(fn(&[f64]) -> f64),
}

impl Debug for ParametricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParametricValue::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            ParametricValue::Parametric(_) => f.write_str("Parametric(..)"),
        }
    }
}

impl ParametricValue {
    pub fn resolve(&self, parameters: &[f64]) -> f64 {
        match self {
            ParametricValue::Constant(value) => *value,
            ParametricValue::Parametric(f) => f(parameters),
        }
    }
}

impl From<f64> for ParametricValue {
    fn from(value: f64) -> Self {
        ParametricValue::Constant(value)
    }
}

/// Residual and Jacobian row of a single essential boundary condition.
///
/// Both operators are evaluated on the element containing `location`.
#[derive(Clone)]
pub struct EssentialBoundaryOperator {
    pub location: ParametricValue,
    pub value: SharedOperator,
    /// One partial derivative per local weight variable.
    pub jacobian_row: Vec<SharedOperator>,
}

impl Debug for EssentialBoundaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EssentialBoundaryOperator")
            .field("location", &self.location)
            .field("jacobian_row_len", &self.jacobian_row.len())
            .finish_non_exhaustive()
    }
}

/// Surface terms applied at the two ends of the domain.
///
/// `left` is evaluated on the first element and `right` on the last one, each holding one
/// operator per local weight variable; the Jacobians hold one row per local weight variable.
#[derive(Clone)]
pub struct NaturalBoundaryOperators {
    pub left: Vec<SharedOperator>,
    pub right: Vec<SharedOperator>,
    pub left_jacobian: Vec<Vec<SharedOperator>>,
    pub right_jacobian: Vec<Vec<SharedOperator>>,
}

impl Debug for NaturalBoundaryOperators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaturalBoundaryOperators")
            .field("num_terms", &self.left.len())
            .finish_non_exhaustive()
    }
}

/// Everything the assemblers need to know about a problem at a fixed interpolation order.
#[derive(Clone)]
pub struct OperatorTable {
    order: usize,
    variables: Vec<WeightVariable>,
    residuals: Vec<SharedOperator>,
    jacobians: Vec<Vec<SharedOperator>>,
    essential: Vec<EssentialBoundaryOperator>,
    natural: Option<NaturalBoundaryOperators>,
}

impl Debug for OperatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorTable")
            .field("order", &self.order)
            .field("variables", &self.variables)
            .field("essential", &self.essential)
            .field("natural", &self.natural)
            .finish_non_exhaustive()
    }
}

impl OperatorTable {
    /// Creates a table without boundary conditions.
    ///
    /// # Panics
    ///
    /// Panics if there are not exactly `2 * order` variables and residual operators, or if
    /// `jacobians` is not a `2 * order x 2 * order` table.
    pub fn new(
        order: usize,
        variables: Vec<WeightVariable>,
        residuals: Vec<SharedOperator>,
        jacobians: Vec<Vec<SharedOperator>>,
    ) -> Self {
        let n = 2 * order;
        assert_eq!(variables.len(), n, "expected one weight variable per local unknown");
        assert_eq!(residuals.len(), n, "expected one residual operator per weight variable");
        assert_eq!(jacobians.len(), n, "expected one Jacobian row per weight variable");
        assert!(
            jacobians.iter().all(|row| row.len() == n),
            "expected one Jacobian entry per weight variable"
        );
        Self {
            order,
            variables,
            residuals,
            jacobians,
            essential: Vec::new(),
            natural: None,
        }
    }

    /// # Panics
    ///
    /// Panics if a Jacobian row does not have `2 * order` entries.
    pub fn with_essential_conditions(mut self, conditions: Vec<EssentialBoundaryOperator>) -> Self {
        assert!(
            conditions
                .iter()
                .all(|condition| condition.jacobian_row.len() == self.num_variables()),
            "essential condition Jacobian rows must have one entry per weight variable"
        );
        self.essential = conditions;
        self
    }

    /// # Panics
    ///
    /// Panics if the operators do not form `2 * order` terms with square Jacobians.
    pub fn with_natural_conditions(mut self, natural: NaturalBoundaryOperators) -> Self {
        let n = self.num_variables();
        assert_eq!(natural.left.len(), n);
        assert_eq!(natural.right.len(), n);
        assert!(natural
            .left_jacobian
            .iter()
            .chain(&natural.right_jacobian)
            .all(|row| row.len() == n));
        assert_eq!(natural.left_jacobian.len(), n);
        assert_eq!(natural.right_jacobian.len(), n);
        self.natural = Some(natural);
        self
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &[WeightVariable] {
        &self.variables
    }

    pub fn residuals(&self) -> &[SharedOperator] {
        &self.residuals
    }

    /// Row `m` holds the partial derivatives of residual operator `m` with respect to every local
    /// weight variable.
    pub fn jacobians(&self) -> &[Vec<SharedOperator>] {
        &self.jacobians
    }

    pub fn essential_conditions(&self) -> &[EssentialBoundaryOperator] {
        &self.essential
    }

    pub fn natural_conditions(&self) -> Option<&NaturalBoundaryOperators> {
        self.natural.as_ref()
    }
}
