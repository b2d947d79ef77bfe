mod common;

use common::{int, row, schema, text};
use proptest::prelude::*;
use row_decoder::{
    data::Value,
    decoder::{Decoder, Optional, Scalar},
    error::DecodeError,
    naming::Configuration,
    resolve::Decode,
    schema::DataType,
};

fn int_row(values: &[i32]) -> row_decoder::row::Row {
    let names = (0..values.len()).map(|i| format!("c{i}")).collect::<Vec<_>>();
    let columns = names
        .iter()
        .map(|name| (name.as_str(), DataType::Int))
        .collect::<Vec<_>>();
    let schema = schema(&columns);
    row(&schema, values.iter().map(|v| int(*v)).collect())
}

#[test]
fn pair_decodes_consecutive_cells() {
    let schema = schema(&[("name", DataType::Text), ("age", DataType::Int)]);
    let row = row(&schema, vec![text("Alice"), int(30)]);
    let pair: (String, i32) = row.decode(&Configuration::default()).unwrap();
    assert_eq!(pair, ("Alice".to_string(), 30));
}

#[test]
fn null_component_reports_its_column() {
    let schema = schema(&[("name", DataType::Text), ("age", DataType::Int)]);
    let row = row(&schema, vec![text("Alice"), None]);
    match row.decode::<(String, i32)>(&Configuration::default()) {
        Err(DecodeError::UnexpectedNullInColumn { column, expected, .. }) => {
            assert_eq!(column, "age");
            assert_eq!(expected, "i32");
        }
        other => panic!("Expected null in age, got {other:?}"),
    }
    let lenient = row
        .decode::<(String, Option<i32>)>(&Configuration::default())
        .unwrap();
    assert_eq!(lenient, ("Alice".to_string(), None));
}

#[test]
fn tuple_running_past_the_row_fails() {
    let row = int_row(&[1, 2]);
    assert_eq!(
        <(i32, i32, i32)>::decoder(&Configuration::default())
            .decode(&row, 0)
            .unwrap_err(),
        DecodeError::IndexOutOfRange { index: 2, width: 2 }
    );
}

#[test]
fn tuple_column_decodes_as_one_cell() {
    let schema = schema(&[
        ("id", DataType::Int),
        ("point", DataType::Tuple(vec![DataType::Double, DataType::Double])),
    ]);
    let row = row(
        &schema,
        vec![
            int(1),
            Some(Value::Tuple(vec![
                Some(Value::Double(1.5)),
                Some(Value::Double(-2.0)),
            ])),
        ],
    );
    let decoder = Optional((Scalar::<f64>::new(), Scalar::<f64>::new()));
    let cell = row.cell(1).unwrap();
    let point = row_decoder::decoder::decode_cell(&decoder, &row, cell).unwrap();
    assert_eq!(point, Some((1.5, -2.0)));
}

proptest! {
    #[test]
    fn cursor_advances_by_width(
        values in prop::collection::vec(any::<i32>(), 4..12),
        offset in 0usize..4,
    ) {
        let row = int_row(&values);
        let decoder = (Scalar::<i32>::new(), (Scalar::<i32>::new(), Scalar::<i32>::new()));
        prop_assume!(offset + decoder.width() <= values.len());

        let (decoded, next) = decoder.decode_next(&row, offset).unwrap();
        prop_assert_eq!(decoded, (values[offset], (values[offset + 1], values[offset + 2])));
        prop_assert_eq!(next, offset + 3);

        let (unchecked, next_unchecked) = decoder.decode_next_unchecked(&row, offset).unwrap();
        prop_assert_eq!(unchecked, decoded);
        prop_assert_eq!(next_unchecked, next);
    }

    #[test]
    fn width_is_sum_of_component_widths(values in prop::collection::vec(any::<i32>(), 6)) {
        let row = int_row(&values);
        let decoder = <((i32, i32), i32, (i32, (i32, i32)))>::decoder(&Configuration::default());
        prop_assert_eq!(decoder.width(), 6);
        let decoded = decoder.decode(&row, 0).unwrap();
        prop_assert_eq!(
            decoded,
            ((values[0], values[1]), values[2], (values[3], (values[4], values[5])))
        );
    }
}
