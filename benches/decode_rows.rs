use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use row_decoder::{
    data::Value,
    decoder::Decoder,
    naming::{CaseConvention, Configuration, snake_case},
    record,
    resolve::Decode,
    row::Row,
    schema::{DataType, ResultSchema},
};

#[allow(dead_code, non_snake_case)]
struct Order {
    orderId: i64,
    customerName: String,
    discountCode: Option<String>,
    lineItems: Vec<i32>,
}

record!(Order {
    orderId: i64,
    customerName: String,
    discountCode: Option<String>,
    lineItems: Vec<i32>,
});

fn generate_rows(count: usize) -> Vec<Row> {
    let schema = ResultSchema::new(
        "shop",
        "orders",
        vec![
            ("order_id".to_string(), DataType::BigInt),
            ("customer_name".to_string(), DataType::Text),
            ("discount_code".to_string(), DataType::Text),
            ("line_items".to_string(), DataType::list(DataType::Int)),
        ],
    );
    (0..count)
        .map(|i| {
            let code = (i % 3 == 0).then(|| Value::Text("SAVE10".to_string()));
            Row::new(
                Arc::clone(&schema),
                vec![
                    Some(Value::BigInt(i as i64)),
                    Some(Value::Text(format!("customer-{i}"))),
                    code,
                    Some(Value::List((0..4).map(Value::Int).collect())),
                ],
            )
            .expect("row")
        })
        .collect()
}

fn bench_decoding(c: &mut Criterion) {
    let rows = generate_rows(1_000);
    let config = Configuration::default();
    let record_decoder = Order::decoder(&config);
    let tuple_decoder = <(i64, String, Option<String>, Vec<i32>)>::decoder(&config);

    let mut group = c.benchmark_group("decode_rows");
    group.bench_function("record_by_name", |b| {
        b.iter(|| {
            for row in &rows {
                std::hint::black_box(record_decoder.decode_row(row).expect("decode"));
            }
        })
    });
    group.bench_function("tuple_safe", |b| {
        b.iter(|| {
            for row in &rows {
                std::hint::black_box(tuple_decoder.decode(row, 0).expect("decode"));
            }
        })
    });
    group.bench_function("tuple_unchecked", |b| {
        b.iter(|| {
            for row in &rows {
                std::hint::black_box(tuple_decoder.decode_unchecked(row, 0).expect("decode"));
            }
        })
    });
    group.finish();
}

fn bench_naming(c: &mut Criterion) {
    let fields = ["orderId", "customerName", "HTTPServer", "lineItems"];
    let memoized = Configuration::convention(CaseConvention::Snake);

    let mut group = c.benchmark_group("field_naming");
    group.bench_function("per_call", |b| {
        b.iter(|| {
            for field in fields {
                std::hint::black_box(snake_case(field));
            }
        })
    });
    group.bench_function("memoized", |b| {
        b.iter(|| {
            for field in fields {
                std::hint::black_box(memoized.column_name(field));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_decoding, bench_naming);
criterion_main!(benches);
