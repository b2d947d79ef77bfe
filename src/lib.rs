//! Decoding of schema-described query result rows into typed domain values.
//!
//! A [`Row`](row::Row) holds possibly-null cells sharing one
//! [`ResultSchema`](schema::ResultSchema). [`Decode`](resolve::Decode)
//! resolves a [`Decoder`](decoder::Decoder) for a domain type (scalar,
//! `Option`, tuple, collection or [`record!`] record) which then turns rows
//! into values, reporting unexpected nulls with their column, table, keyspace
//! and the row's contents.

pub mod cli;
pub mod collection;
pub mod data;
pub mod decoder;
pub mod error;
pub mod fixture;
pub mod naming;
pub mod native;
pub mod record;
pub mod resolve;
pub mod row;
pub mod schema;
pub mod table;
pub mod tuple;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands},
    data::Value,
    decoder::{Optional, Scalar},
    error::DecodeError,
    fixture::ResultSetFixture,
    naming::Configuration,
    record::{FieldSource, RowFields},
    row::Row,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("row_decoder", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Columns(args) => handle_columns(&args),
        Commands::Dump(args) => handle_dump(&args),
        Commands::Check(args) => handle_check(&args),
    }
}

fn handle_columns(args: &cli::ColumnsArgs) -> Result<()> {
    let config = Configuration::convention(args.convention);
    let rows = args
        .fields
        .iter()
        .map(|field| vec![field.clone(), config.column_name(field).into_owned()])
        .collect::<Vec<_>>();
    let headers = vec!["field".to_string(), "column".to_string()];
    print!("{}", table::render_table(&headers, &rows));
    Ok(())
}

fn handle_dump(args: &cli::DumpArgs) -> Result<()> {
    let fixture = ResultSetFixture::load(&args.rows)
        .with_context(|| format!("Loading fixture from {:?}", args.rows))?;
    let schema = fixture.schema();
    let rows = fixture.rows()?;
    print!("{}", table::render_rows(schema.columns(), &rows));
    info!(
        "Dumped {} row(s) from {}.{}",
        rows.len(),
        schema.keyspace(),
        schema.table()
    );
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldCheck {
    name: String,
    optional: bool,
}

impl FieldCheck {
    fn parse(spec: &str) -> Self {
        let trimmed = spec.trim();
        match trimmed.strip_suffix('?') {
            Some(name) => FieldCheck {
                name: name.trim().to_string(),
                optional: true,
            },
            None => FieldCheck {
                name: trimmed.to_string(),
                optional: false,
            },
        }
    }
}

fn check_row(row: &Row, fields: &[FieldCheck], config: &Configuration) -> Result<(), DecodeError> {
    let required = Scalar::<Value>::new();
    let optional = Optional(Scalar::<Value>::new());
    let source = RowFields::new(row, "fixture row");
    for field in fields {
        let column = config.column_name(&field.name);
        if field.optional {
            source.field(&column, &optional)?;
        } else {
            source.field(&column, &required)?;
        }
    }
    Ok(())
}

fn handle_check(args: &cli::CheckArgs) -> Result<()> {
    let fixture = ResultSetFixture::load(&args.rows)
        .with_context(|| format!("Loading fixture from {:?}", args.rows))?;
    let rows = fixture.rows()?;
    let config = Configuration::convention(args.convention);
    let fields = args
        .fields
        .iter()
        .filter(|f| !f.trim().is_empty())
        .map(|f| FieldCheck::parse(f))
        .collect::<Vec<_>>();
    debug!("Checking fields: {:?}", fields);

    let mut failures = 0usize;
    for (idx, row) in rows.iter().enumerate() {
        if let Err(err) = check_row(row, &fields, &config) {
            failures += 1;
            println!("row {}: {err}", idx + 1);
        }
    }
    info!(
        "Checked {} row(s) against {} field(s); {} failed",
        rows.len(),
        fields.len(),
        failures
    );
    ensure!(
        failures == 0,
        "{failures} of {} row(s) failed to decode",
        rows.len()
    );
    println!("{} row(s) decoded", rows.len());
    Ok(())
}
