use crate::assembly::boundary::place_essential_conditions;
use crate::assembly::{check_output, check_shape, AssemblyError};
use crate::basis::Side;
use crate::mesh::Mesh1d;
use crate::operators::{ElementBatch, OperatorTable};
use hermite_bvp_banded::BandedMatrix;
use nalgebra::DMatrix;

/// Number of super-diagonals (and sub-diagonals) of the global Jacobian for the given order.
///
/// Unknowns of the two nodes of an element are at most `2 * order - 1` apart. The bandwidth never
/// drops below `order + 1`, which keeps the assembly layout identical for orders 1 and 2.
pub fn jacobian_bandwidth(order: usize) -> usize {
    usize::max(order + 1, 2 * order - 1)
}

/// Row of the working buffer that receives the partial derivative with respect to local variable
/// `local` of an equation living on the `side` node of its element.
///
/// Rows count down from `bandwidth + order`, so that after the derivative shift in
/// [`align_diagonals`] the row equals `bandwidth + i - j` for equation `i` and unknown `j`.
fn coupling_row(bandwidth: usize, order: usize, side: Side, local: usize) -> usize {
    let base = bandwidth + order;
    match side {
        Side::Left => base - order - local,
        Side::Right => base - local,
    }
}

/// Assembles the global Jacobian of [`assemble_residual`](crate::assembly::assemble_residual) in
/// banded storage.
///
/// Entries are first collected in a working buffer with one column per global equation and one
/// row per coupling distance, then re-indexed into the diagonal storage of [`BandedMatrix`].
pub fn assemble_jacobian(
    mesh: &Mesh1d,
    weights: &DMatrix<f64>,
    table: &OperatorTable,
    parameters: &[f64],
) -> Result<BandedMatrix<f64>, AssemblyError> {
    let order = table.order();
    check_shape(mesh.num_nodes(), order, weights)?;

    let bandwidth = jacobian_bandwidth(order);
    let height = 2 * bandwidth + 1;
    let mut buffer = DMatrix::zeros(height, mesh.num_nodes() * order);
    let batch = ElementBatch::from_mesh(mesh, weights);

    for (m, (variable, row)) in table.variables().iter().zip(table.jacobians()).enumerate() {
        let side = variable.side()?;
        for (local, operator) in row.iter().enumerate() {
            let values = operator.evaluate(&batch, parameters);
            check_output(&values, batch.len(), 0, || format!("jacobian[{}][{}]", m, local))?;
            let working_row = coupling_row(bandwidth, order, side, local);
            for (element, value) in values.iter().enumerate() {
                let equation = (element + side.node_offset()) * order + variable.derivative;
                buffer[(working_row, equation)] += *value;
            }
        }
    }

    if let Some(natural) = table.natural_conditions() {
        let last = mesh.num_elements() - 1;
        let ends = [(0, &natural.left_jacobian, "left"), (last, &natural.right_jacobian, "right")];
        for (element, jacobian, end) in ends {
            let element_batch = batch.element(element);
            for (c, row) in jacobian.iter().enumerate() {
                let side = if c < order { Side::Left } else { Side::Right };
                let equation = (element + side.node_offset()) * order + c % order;
                for (local, operator) in row.iter().enumerate() {
                    let value = operator.evaluate(&element_batch, parameters);
                    check_output(&value, 1, element, || format!("natural {} jacobian[{}][{}]", end, c, local))?;
                    let working_row = coupling_row(bandwidth, order, side, local) % height;
                    buffer[(working_row, equation)] += value[0];
                }
            }
        }
    }

    let conditions = table.essential_conditions();
    for placement in place_essential_conditions(mesh, conditions, order, parameters)? {
        let element_batch = batch.element(placement.element);
        let side = if placement.on_left_node() { Side::Left } else { Side::Right };
        let equation = placement.equation(order);
        buffer.column_mut(equation).fill(0.0);
        for (local, operator) in conditions[placement.condition].jacobian_row.iter().enumerate() {
            let value = operator.evaluate(&element_batch, parameters);
            check_output(&value, 1, placement.element, || {
                format!("essential[{}] jacobian[{}]", placement.condition, local)
            })?;
            buffer[(coupling_row(bandwidth, order, side, local), equation)] = value[0];
        }
    }

    align_diagonals(&mut buffer, order);
    Ok(BandedMatrix::from_storage(bandwidth, bandwidth, buffer))
}

/// Converts the working buffer into diagonal storage in place.
///
/// Equations of derivative slot `c` are first moved down by `c` rows, after which column `i` holds
/// the entry for unknown `j` in row `u + i - j`. Each row `r` is then rolled by `u - r` columns so
/// that the entry moves to column `j`.
fn align_diagonals(buffer: &mut DMatrix<f64>, order: usize) {
    let (height, num_columns) = buffer.shape();

    for c in 1..order {
        for equation in (c..num_columns).step_by(order) {
            buffer
                .column_mut(equation)
                .as_mut_slice()
                .rotate_right(c);
        }
    }

    let half = (height / 2) as isize;
    let mut rolled = vec![0.0; num_columns];
    for r in 0..height {
        let shift = (half - r as isize).rem_euclid(num_columns as isize) as usize;
        for j in 0..num_columns {
            rolled[(j + shift) % num_columns] = buffer[(r, j)];
        }
        for (j, value) in rolled.iter().enumerate() {
            buffer[(r, j)] = *value;
        }
    }
}
