use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::naming::CaseConvention;

#[derive(Debug, Parser)]
#[command(author, version, about = "Inspect how query result rows decode into typed values", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the column name each record field is matched against
    Columns(ColumnsArgs),
    /// Print the rows of a result-set fixture as a table
    Dump(DumpArgs),
    /// Decode every row of a fixture by field name and report failures
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Record field names, e.g. `userId HTTPServer`
    #[arg(required = true)]
    pub fields: Vec<String>,
    /// Naming convention used to derive column names
    #[arg(long, value_enum, default_value_t = CaseConvention::Snake)]
    pub convention: CaseConvention,
}

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Result-set fixture (.yaml, .yml or .json)
    #[arg(short, long)]
    pub rows: PathBuf,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Result-set fixture (.yaml, .yml or .json)
    #[arg(short, long)]
    pub rows: PathBuf,
    /// Fields to decode; a trailing `?` marks a field as optional (e.g. `name,age?`)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub fields: Vec<String>,
    /// Naming convention used to derive column names
    #[arg(long, value_enum, default_value_t = CaseConvention::Snake)]
    pub convention: CaseConvention,
}
