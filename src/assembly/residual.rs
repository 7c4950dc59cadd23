use crate::assembly::boundary::place_essential_conditions;
use crate::assembly::{check_output, check_shape, AssemblyError};
use crate::mesh::Mesh1d;
use crate::operators::{ElementBatch, OperatorTable};
use nalgebra::{DMatrix, DVector};

/// Assembles the global residual for the given nodal weights.
///
/// `weights` has one row per mesh node and `table.order()` columns. The result is flattened
/// node-major, so entry `i * order + k` is the equation of slot `k` at node `i`.
pub fn assemble_residual(
    mesh: &Mesh1d,
    weights: &DMatrix<f64>,
    table: &OperatorTable,
    parameters: &[f64],
) -> Result<DVector<f64>, AssemblyError> {
    let order = table.order();
    let num_nodes = mesh.num_nodes();
    check_shape(num_nodes, order, weights)?;

    let batch = ElementBatch::from_mesh(mesh, weights);
    let mut residual = DVector::zeros(num_nodes * order);

    for (m, (variable, operator)) in table.variables().iter().zip(table.residuals()).enumerate() {
        let side = variable.side()?;
        let values = operator.evaluate(&batch, parameters);
        check_output(&values, batch.len(), 0, || format!("residual[{}]", m))?;
        for (element, value) in values.iter().enumerate() {
            let node = element + side.node_offset();
            residual[node * order + variable.derivative] += *value;
        }
    }

    if let Some(natural) = table.natural_conditions() {
        let last = mesh.num_elements() - 1;
        let first_element = batch.element(0);
        let last_element = batch.element(last);
        for (c, (left, right)) in natural.left.iter().zip(&natural.right).enumerate() {
            let left_value = left.evaluate(&first_element, parameters);
            check_output(&left_value, 1, 0, || format!("natural left[{}]", c))?;
            let right_value = right.evaluate(&last_element, parameters);
            check_output(&right_value, 1, last, || format!("natural right[{}]", c))?;

            let (node, slot) = (c / order, c % order);
            residual[node * order + slot] += left_value[0];
            residual[(last + node) * order + slot] += right_value[0];
        }
    }

    let conditions = table.essential_conditions();
    for placement in place_essential_conditions(mesh, conditions, order, parameters)? {
        let element_batch = batch.element(placement.element);
        let value = conditions[placement.condition]
            .value
            .evaluate(&element_batch, parameters);
        check_output(&value, 1, placement.element, || format!("essential[{}]", placement.condition))?;
        residual[placement.equation(order)] = value[0];
    }

    Ok(residual)
}
