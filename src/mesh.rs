//! One-dimensional meshes.
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod procedural;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("a mesh needs at least two nodes, got {count}")]
    TooFewNodes { count: usize },
    #[error("node {index} is not finite")]
    NonFiniteNode { index: usize },
    #[error("nodes must be strictly increasing, but node {index} does not exceed its predecessor")]
    NotStrictlyIncreasing { index: usize },
}

/// A mesh of the interval `[nodes[0], nodes[n - 1]]` made of `n - 1` two-node elements.
///
/// Element `i` spans `[nodes[i], nodes[i + 1]]`. Node coordinates are validated on construction
/// (also when deserializing), so a `Mesh1d` always has at least one element of positive length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Mesh1d {
    nodes: Vec<f64>,
}

impl Mesh1d {
    pub fn from_nodes(nodes: Vec<f64>) -> Result<Self, MeshError> {
        if nodes.len() < 2 {
            return Err(MeshError::TooFewNodes { count: nodes.len() });
        }
        if let Some(index) = nodes.iter().position(|x| !x.is_finite()) {
            return Err(MeshError::NonFiniteNode { index });
        }
        if let Some(index) = nodes.iter().tuple_windows().position(|(a, b)| a >= b) {
            return Err(MeshError::NotStrictlyIncreasing { index: index + 1 });
        }
        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.nodes.len() - 1
    }

    /// The end points `[x_left, x_right]` of the given element.
    ///
    /// # Panics
    ///
    /// Panics if `element >= self.num_elements()`.
    pub fn element(&self, element: usize) -> [f64; 2] {
        [self.nodes[element], self.nodes[element + 1]]
    }

    /// Left end points of all elements, i.e. every node except the last.
    pub fn left_edges(&self) -> &[f64] {
        &self.nodes[..self.num_elements()]
    }

    /// Right end points of all elements, i.e. every node except the first.
    pub fn right_edges(&self) -> &[f64] {
        &self.nodes[1..]
    }

    /// Index of the element whose left edge is the last one not exceeding `x`.
    ///
    /// Locations outside the mesh are clamped to the first or last element.
    pub fn locate_element(&self, x: f64) -> usize {
        let edges_not_exceeding = self.left_edges().partition_point(|&edge| edge <= x);
        edges_not_exceeding.saturating_sub(1)
    }

    /// Index of the node closest to `x`. Ties go to the node with the lower index.
    pub fn nearest_node(&self, x: f64) -> usize {
        self.nodes
            .iter()
            .map(|node| (node - x).abs())
            .position_min_by(|a, b| a.total_cmp(b))
            .unwrap_or(0)
    }

    pub fn domain(&self) -> [f64; 2] {
        [self.nodes[0], self.nodes[self.num_nodes() - 1]]
    }
}

impl TryFrom<Vec<f64>> for Mesh1d {
    type Error = MeshError;

    fn try_from(nodes: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_nodes(nodes)
    }
}

impl From<Mesh1d> for Vec<f64> {
    fn from(mesh: Mesh1d) -> Self {
        mesh.nodes
    }
}
