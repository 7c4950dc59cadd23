//! Placement of essential boundary conditions.
//!
//! A condition at `location` is evaluated on the element containing `location` but stored in an
//! equation of the node closest to it. Conditions resolving to the same node take the slots of
//! that node in the order they are declared.
use crate::assembly::AssemblyError;
use crate::mesh::Mesh1d;
use crate::operators::EssentialBoundaryOperator;

/// Where an essential condition is evaluated and which global equation it replaces.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EssentialPlacement {
    /// Index of the condition in declaration order.
    pub condition: usize,
    pub location: f64,
    /// Element the condition is evaluated on.
    pub element: usize,
    /// Node whose equation is replaced.
    pub node: usize,
    pub slot: usize,
}

impl EssentialPlacement {
    /// Global index of the replaced equation.
    pub fn equation(&self, order: usize) -> usize {
        self.node * order + self.slot
    }

    /// Whether the replaced equation belongs to the left node of the evaluation element.
    pub fn on_left_node(&self) -> bool {
        self.node == self.element
    }
}

pub fn place_essential_conditions(
    mesh: &Mesh1d,
    conditions: &[EssentialBoundaryOperator],
    order: usize,
    parameters: &[f64],
) -> Result<Vec<EssentialPlacement>, AssemblyError> {
    let mut claimed_slots = vec![0; mesh.num_nodes()];
    conditions
        .iter()
        .enumerate()
        .map(|(condition, operator)| {
            let location = operator.location.resolve(parameters);
            if !location.is_finite() {
                return Err(AssemblyError::InvalidLocation { condition, location });
            }
            let element = mesh.locate_element(location);
            let node = mesh.nearest_node(location);
            let slot = claimed_slots[node];
            if slot >= order {
                return Err(AssemblyError::SlotCollision {
                    condition,
                    node,
                    slot,
                    order,
                });
            }
            claimed_slots[node] += 1;
            Ok(EssentialPlacement {
                condition,
                location,
                element,
                node,
                slot,
            })
        })
        .collect()
}
