use super::{constant_operator, element_scaled_operator, table_from_fns, zero_table};
use hermite_bvp::assembly::{assemble_jacobian, assemble_residual, jacobian_bandwidth, AssemblyError};
use hermite_bvp::basis::WeightVariable;
use hermite_bvp::mesh::Mesh1d;
use hermite_bvp::operators::{ElementBatch, NaturalBoundaryOperators, OperatorTable, SharedOperator};
use nalgebra::{DMatrix, DVector};
use std::sync::Arc;

fn mesh() -> Mesh1d {
    Mesh1d::from_nodes(vec![0.0, 0.5, 1.5, 2.0]).unwrap()
}

/// Table whose operators return distinct values depending on operator and element index.
fn distinct_table(order: usize) -> OperatorTable {
    let n = 2 * order;
    table_from_fns(
        order,
        |m| element_scaled_operator((m + 1) as f64),
        move |m, l| element_scaled_operator((1 + m * n + l) as f64),
    )
}

#[test]
fn zero_operators_assemble_to_zero() {
    for order in 1..=3 {
        let weights = DMatrix::from_element(4, order, 1.5);
        let residual = assemble_residual(&mesh(), &weights, &zero_table(order), &[]).unwrap();
        assert_eq!(residual, DVector::zeros(4 * order));

        let jacobian = assemble_jacobian(&mesh(), &weights, &zero_table(order), &[]).unwrap();
        assert_eq!(jacobian.nrows(), 4 * order);
        assert_eq!(jacobian.lower_bandwidth(), jacobian_bandwidth(order));
        assert_eq!(jacobian.upper_bandwidth(), jacobian_bandwidth(order));
        assert_eq!(jacobian.to_dense(), DMatrix::zeros(4 * order, 4 * order));
    }
}

#[test]
fn elemental_residuals_are_scattered_to_element_nodes() {
    for order in 1..=3 {
        let table = distinct_table(order);
        let weights = DMatrix::zeros(4, order);
        let residual = assemble_residual(&mesh(), &weights, &table, &[]).unwrap();

        let mut expected = DVector::zeros(4 * order);
        for element in 0..3 {
            for (m, variable) in table.variables().iter().enumerate() {
                let equation = (element + variable.boundary) * order + variable.derivative;
                expected[equation] += ((m + 1) * (element + 1)) as f64;
            }
        }
        assert_eq!(residual, expected, "order {}", order);
    }
}

#[test]
fn elemental_jacobians_match_dense_assembly() {
    for order in 1..=3 {
        let n = 2 * order;
        let table = distinct_table(order);
        let weights = DMatrix::zeros(4, order);
        let jacobian = assemble_jacobian(&mesh(), &weights, &table, &[]).unwrap();

        let mut expected = DMatrix::zeros(4 * order, 4 * order);
        for element in 0..3 {
            for (m, variable) in table.variables().iter().enumerate() {
                let equation = (element + variable.boundary) * order + variable.derivative;
                for l in 0..n {
                    let unknown = element * order + l;
                    expected[(equation, unknown)] += ((1 + m * n + l) * (element + 1)) as f64;
                }
            }
        }
        assert_eq!(jacobian.to_dense(), expected, "order {}", order);
    }
}

fn natural_operators(order: usize) -> NaturalBoundaryOperators {
    let n = 2 * order;
    let jacobian = |offset: usize| -> Vec<Vec<SharedOperator>> {
        (0..n)
            .map(|c| (0..n).map(|l| constant_operator((offset + c * n + l) as f64)).collect())
            .collect()
    };
    NaturalBoundaryOperators {
        left: (0..n).map(|c| constant_operator((c + 1) as f64)).collect(),
        right: (0..n).map(|c| constant_operator(10.0 * (c + 1) as f64)).collect(),
        left_jacobian: jacobian(100),
        right_jacobian: jacobian(200),
    }
}

#[test]
fn natural_terms_are_added_at_domain_ends() {
    for order in 1..=3 {
        let n = 2 * order;
        let table = zero_table(order).with_natural_conditions(natural_operators(order));
        let weights = DMatrix::zeros(4, order);
        let last = 2;

        let residual = assemble_residual(&mesh(), &weights, &table, &[]).unwrap();
        let mut expected = DVector::zeros(4 * order);
        for c in 0..n {
            expected[c] += (c + 1) as f64;
            expected[last * order + c] += 10.0 * (c + 1) as f64;
        }
        assert_eq!(residual, expected, "order {}", order);

        let jacobian = assemble_jacobian(&mesh(), &weights, &table, &[]).unwrap();
        let mut expected = DMatrix::zeros(4 * order, 4 * order);
        for c in 0..n {
            for l in 0..n {
                expected[(c, l)] += (100 + c * n + l) as f64;
                expected[(last * order + c, last * order + l)] += (200 + c * n + l) as f64;
            }
        }
        assert_eq!(jacobian.to_dense(), expected, "order {}", order);
    }
}

#[test]
fn single_element_mesh_combines_both_natural_ends() {
    let mesh = Mesh1d::from_nodes(vec![0.0, 1.0]).unwrap();
    let table = zero_table(1).with_natural_conditions(natural_operators(1));
    let residual = assemble_residual(&mesh, &DMatrix::zeros(2, 1), &table, &[]).unwrap();
    assert_eq!(residual.as_slice(), &[11.0, 22.0]);
}

#[test]
fn weights_of_wrong_shape_are_rejected() {
    let weights = DMatrix::zeros(3, 2);
    let expected = AssemblyError::ShapeMismatch {
        expected: (4, 2),
        actual: (3, 2),
    };
    assert_eq!(assemble_residual(&mesh(), &weights, &zero_table(2), &[]).unwrap_err(), expected);
    assert_eq!(assemble_jacobian(&mesh(), &weights, &zero_table(2), &[]).unwrap_err(), expected);
}

#[test]
fn operator_output_of_wrong_length_is_rejected() {
    let short: SharedOperator = Arc::new(|_: &ElementBatch, _: &[f64]| DVector::<f64>::zeros(1));
    let table = table_from_fns(1, |_| Arc::clone(&short), |_, _| constant_operator(0.0));
    let error = assemble_residual(&mesh(), &DMatrix::zeros(4, 1), &table, &[]).unwrap_err();
    assert_eq!(
        error,
        AssemblyError::ShapeMismatch {
            expected: (3, 1),
            actual: (1, 1)
        }
    );
}

#[test]
fn unknown_variable_tags_are_rejected() {
    let variables = vec![
        WeightVariable {
            boundary: 0,
            derivative: 0,
        },
        WeightVariable {
            boundary: 2,
            derivative: 0,
        },
    ];
    let zeros = || constant_operator(0.0);
    let table = OperatorTable::new(
        1,
        variables,
        vec![zeros(), zeros()],
        vec![vec![zeros(), zeros()], vec![zeros(), zeros()]],
    );
    let weights = DMatrix::zeros(4, 1);
    let expected = AssemblyError::UnknownVariableTag { tag: 2 };
    assert_eq!(assemble_residual(&mesh(), &weights, &table, &[]).unwrap_err(), expected);
    assert_eq!(assemble_jacobian(&mesh(), &weights, &table, &[]).unwrap_err(), expected);
}

#[test]
fn non_finite_operator_values_report_operator_and_element() {
    let singular: SharedOperator = Arc::new(|batch: &ElementBatch, _: &[f64]| {
        DVector::from_fn(batch.len(), |e, _| if e == 1 { 1.0 / 0.0 } else { 0.0 })
    });
    let residual_table = table_from_fns(
        1,
        |m| if m == 1 { Arc::clone(&singular) } else { constant_operator(0.0) },
        |_, _| constant_operator(0.0),
    );
    let weights = DMatrix::zeros(4, 1);
    assert_eq!(
        assemble_residual(&mesh(), &weights, &residual_table, &[]).unwrap_err(),
        AssemblyError::NumericSingularity {
            operator: "residual[1]".to_string(),
            element: 1
        }
    );

    let jacobian_table = table_from_fns(
        1,
        |_| constant_operator(0.0),
        |m, l| if (m, l) == (0, 1) { Arc::clone(&singular) } else { constant_operator(0.0) },
    );
    assert_eq!(
        assemble_jacobian(&mesh(), &weights, &jacobian_table, &[]).unwrap_err(),
        AssemblyError::NumericSingularity {
            operator: "jacobian[0][1]".to_string(),
            element: 1
        }
    );
}

#[test]
fn operators_receive_parameters() {
    let parametric: SharedOperator =
        Arc::new(|batch: &ElementBatch, parameters: &[f64]| DVector::from_element(batch.len(), parameters[0]));
    let table = table_from_fns(1, |_| Arc::clone(&parametric), |_, _| constant_operator(0.0));
    let residual = assemble_residual(&mesh(), &DMatrix::zeros(4, 1), &table, &[0.25]).unwrap();
    assert_eq!(residual.as_slice(), &[0.25, 0.5, 0.5, 0.25]);
}
