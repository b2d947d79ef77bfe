mod common;

use common::{int, row, schema, text};
use row_decoder::{
    data::{UdtValue, Value},
    decoder::Decoder,
    error::DecodeError,
    naming::{CaseConvention, Configuration, FieldNaming},
    record,
    resolve::{Decode, Strategy, strategy_of},
    schema::{DataType, UdtType},
};

#[derive(Debug, PartialEq)]
struct Person {
    name: String,
    age: Option<i32>,
}

record!(Person { name: String, age: Option<i32> });

#[derive(Debug, PartialEq)]
#[allow(non_snake_case)]
struct Account {
    userId: i64,
    displayName: String,
}

record!(Account {
    userId: i64,
    displayName: String,
});

#[derive(Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

record!(Point { x: i32, y: i32 });

#[derive(Debug, PartialEq)]
struct Shape {
    label: String,
    origin: Point,
}

record!(Shape { label: String, origin: Point });

fn people_schema() -> std::sync::Arc<row_decoder::schema::ResultSchema> {
    schema(&[("name", DataType::Text), ("age", DataType::Int)])
}

#[test]
fn optional_field_round_trips() {
    let schema = people_schema();
    let config = Configuration::default();
    let without_age = row(&schema, vec![text("Alice"), None]);
    assert_eq!(
        without_age.decode::<Person>(&config).unwrap(),
        Person {
            name: "Alice".to_string(),
            age: None
        }
    );
    let with_age = row(&schema, vec![text("Alice"), int(30)]);
    assert_eq!(
        with_age.decode::<Person>(&config).unwrap(),
        Person {
            name: "Alice".to_string(),
            age: Some(30)
        }
    );
}

#[test]
fn required_field_null_names_column_and_row() {
    let schema = people_schema();
    let row = row(&schema, vec![None, int(30)]);
    match row.decode::<Person>(&Configuration::default()).unwrap_err() {
        DecodeError::UnexpectedNullInColumn {
            column, expected, row, ..
        } => {
            assert_eq!(column, "name");
            assert_eq!(expected, "String");
            assert_eq!(row, "[name: null, age: 30]");
        }
        other => panic!("Expected null in name, got {other:?}"),
    }
}

#[test]
fn fields_are_found_by_name_regardless_of_column_order() {
    let schema = schema(&[
        ("display_name", DataType::Text),
        ("extra", DataType::Boolean),
        ("user_id", DataType::BigInt),
    ]);
    let row = row(
        &schema,
        vec![text("Al"), Some(Value::Boolean(true)), Some(Value::BigInt(42))],
    );
    let account: Account = row.decode(&Configuration::default()).unwrap();
    assert_eq!(
        account,
        Account {
            userId: 42,
            displayName: "Al".to_string()
        }
    );
}

#[test]
fn identity_naming_matches_field_names_verbatim() {
    let schema = schema(&[("userId", DataType::BigInt), ("displayName", DataType::Text)]);
    let row = row(&schema, vec![Some(Value::BigInt(1)), text("x")]);
    assert!(row.decode::<Account>(&Configuration::identity()).is_ok());
    assert!(matches!(
        row.decode::<Account>(&Configuration::default()),
        Err(DecodeError::MissingColumn { .. })
    ));
}

#[test]
fn custom_transform_is_applied_per_field() {
    let schema = schema(&[("NAME", DataType::Text), ("AGE", DataType::Int)]);
    let row = row(&schema, vec![text("Bo"), int(5)]);
    let config = Configuration::new(FieldNaming::transform(|name| name.to_uppercase()));
    let person: Person = row.decode(&config).unwrap();
    assert_eq!(person.age, Some(5));
    let upper = Configuration::convention(CaseConvention::ScreamingSnake);
    assert_eq!(row.decode::<Person>(&upper).unwrap().name, "Bo");
}

#[test]
fn nested_record_decodes_from_udt_column() {
    let point_type = DataType::Udt(UdtType::new(
        "point",
        vec![
            ("x".to_string(), DataType::Int),
            ("y".to_string(), DataType::Int),
        ],
    ));
    let schema = schema(&[("label", DataType::Text), ("origin", point_type)]);
    let origin = UdtValue::new("point")
        .with_field("x", int(1))
        .with_field("y", None);
    let row = row(&schema, vec![text("sq"), Some(Value::Udt(origin))]);
    match row.decode::<Shape>(&Configuration::default()).unwrap_err() {
        DecodeError::UnexpectedNullInNestedRecord {
            column,
            path,
            nested_type,
            ..
        } => {
            assert_eq!(column, "origin");
            assert_eq!(path, vec!["y".to_string()]);
            assert_eq!(nested_type, "Point");
        }
        other => panic!("Expected nested null, got {other:?}"),
    }
}

#[test]
fn record_decoder_reports_strategy_and_width() {
    assert_eq!(strategy_of::<Person>(), Strategy::Record);
    assert_eq!(strategy_of::<Option<Person>>(), Strategy::Optional);
    let decoder = Shape::decoder(&Configuration::default());
    assert_eq!(decoder.width(), 3);
    assert_eq!(decoder.type_name(), "Shape");
}

fn positional_row(cells: Vec<Option<Value>>) -> row_decoder::row::Row {
    let schema = schema(&[
        ("note", DataType::Text),
        ("name", DataType::Text),
        ("age", DataType::Int),
        ("count", DataType::Int),
    ]);
    row(&schema, cells)
}

#[test]
fn optional_record_ignores_the_cell_under_the_cursor() {
    let row = positional_row(vec![None, text("Alice"), int(30), int(7)]);
    let config = Configuration::default();
    let expected = Some(Person {
        name: "Alice".to_string(),
        age: Some(30),
    });
    assert_eq!(row.decode::<Option<Person>>(&config).unwrap(), expected);
    assert_eq!(row.decode_at::<Option<Person>>(1, &config).unwrap(), expected);
    assert_eq!(row.decode_at::<Option<Person>>(3, &config).unwrap(), expected);
}

#[test]
fn optional_record_is_none_when_every_field_is_null() {
    let row = positional_row(vec![text("n"), None, None, int(7)]);
    let config = Configuration::default();
    assert_eq!(row.decode::<Option<Person>>(&config).unwrap(), None);
    let partial = positional_row(vec![text("n"), None, int(30), int(7)]);
    assert!(
        partial
            .decode::<Option<Person>>(&config)
            .unwrap_err()
            .is_unexpected_null()
    );
}

#[test]
fn record_inside_a_tuple_advances_by_its_width() {
    let row = positional_row(vec![text("n"), text("Alice"), int(30), int(7)]);
    let config = Configuration::default();
    let decoder = <(Person, i32)>::decoder(&config);
    assert_eq!(decoder.width(), 3);
    let (value, next) = decoder.decode_next(&row, 1).unwrap();
    assert_eq!(
        value,
        (
            Person {
                name: "Alice".to_string(),
                age: Some(30)
            },
            7
        )
    );
    assert_eq!(next, 4);
    let (unchecked, next_unchecked) = decoder.decode_next_unchecked(&row, 1).unwrap();
    assert_eq!(unchecked, value);
    assert_eq!(next_unchecked, 4);
}

#[test]
fn optional_record_inside_a_tuple() {
    let config = Configuration::default();
    let decoder = <(Option<Person>, i32)>::decoder(&config);

    let empty = positional_row(vec![text("n"), None, None, int(7)]);
    assert_eq!(decoder.decode_next(&empty, 1).unwrap(), ((None, 7), 4));

    let cursor_on_null = positional_row(vec![None, text("Al"), int(3), int(7)]);
    let ((person, count), next) = decoder.decode_next(&cursor_on_null, 0).unwrap();
    assert_eq!(person.map(|p| p.name), Some("Al".to_string()));
    assert_eq!(count, 3);
    assert_eq!(next, 3);
}

#[test]
fn nested_record_field_counts_toward_width() {
    let label = Shape::decoder(&Configuration::default())
        .descriptors()
        .iter()
        .map(|d| d.width)
        .collect::<Vec<_>>();
    assert_eq!(label, vec![1, 2]);
}
