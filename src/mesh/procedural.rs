//! Basic procedural mesh generation routines.
use crate::mesh::{Mesh1d, MeshError};

impl Mesh1d {
    /// A mesh of `[a, b]` with `num_elements` elements of equal length.
    pub fn uniform(a: f64, b: f64, num_elements: usize) -> Result<Self, MeshError> {
        if num_elements == 0 {
            return Err(MeshError::TooFewNodes { count: 1 });
        }
        let h = (b - a) / num_elements as f64;
        let mut nodes: Vec<f64> = (0..=num_elements).map(|i| a + i as f64 * h).collect();
        // Avoid accumulating round-off in the last node
        nodes[num_elements] = b;
        Self::from_nodes(nodes)
    }

    /// A mesh of `[-half_width, half_width]` with nodes `half_width * s^3` for `num_nodes` values
    /// of `s` uniformly spaced in `[-1, 1]`.
    ///
    /// The nodes cluster around the origin, which suits solutions with a sharp interior layer
    /// there, such as a flat interface.
    pub fn graded_cubic(half_width: f64, num_nodes: usize) -> Result<Self, MeshError> {
        if num_nodes < 2 {
            return Err(MeshError::TooFewNodes { count: num_nodes });
        }
        let nodes = (0..num_nodes)
            .map(|i| {
                let s = -1.0 + 2.0 * i as f64 / (num_nodes - 1) as f64;
                half_width * s * s * s
            })
            .collect();
        Self::from_nodes(nodes)
    }
}
