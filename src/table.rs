use std::fmt::Write as _;

use crate::{data::display_cell, row::Row, schema::ColumnDefinition};

/// Renders aligned columns separated by two spaces, with a dashed rule under
/// the header.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count().max(3))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(single_line(cell).chars().count());
        }
    }

    let mut output = String::new();
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    for line in std::iter::once(headers)
        .chain(std::iter::once(rule.as_slice()))
        .chain(rows.iter().map(Vec::as_slice))
    {
        let cells = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", single_line(cell), width = *width))
            .collect::<Vec<_>>();
        let _ = writeln!(output, "{}", cells.join("  ").trim_end());
    }
    output
}

/// One table line per row, headed by the column names of `columns`.
pub fn render_rows(columns: &[ColumnDefinition], rows: &[Row]) -> String {
    let headers = columns
        .iter()
        .map(|c| format!("{} ({})", c.name, c.data_type))
        .collect::<Vec<_>>();
    let body = rows
        .iter()
        .map(|row| {
            (0..columns.len())
                .map(|idx| {
                    row.cell(idx)
                        .map(|cell| display_cell(cell.value))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect::<Vec<Vec<String>>>();
    render_table(&headers, &body)
}

fn single_line(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}
