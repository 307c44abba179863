//! Plain-text, JSON, and CSV output of row tables.

use std::io::Write;

use anyhow::Result;
use chart_core::models::{CellValue, Row};
use serde_json::{Map, Value};

/// Serialize rows as a pretty-printed JSON array of objects in `columns`
/// order. Absent keys are omitted, matching the sparse row model.
pub fn to_json(columns: &[String], rows: &[Row]) -> Result<String> {
    let mut array = Vec::with_capacity(rows.len());
    for row in rows {
        let mut object = Map::new();
        for column in columns {
            if let Some(value) = row.get(column) {
                object.insert(column.clone(), serde_json::to_value(value)?);
            }
        }
        array.push(Value::Object(object));
    }
    Ok(serde_json::to_string_pretty(&Value::Array(array))?)
}

/// Write rows as CSV in `columns` order. Absent cells are written empty.
pub fn write_csv<W: Write>(columns: &[String], rows: &[Row], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(columns)?;
    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| row.get(column).map(cell_text).unwrap_or_default())
            .collect();
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

/// Print a fixed-width text table to stdout.
pub fn print_table(columns: &[String], rows: &[Row]) {
    let mut widths: Vec<usize> = columns.iter().map(String::len).collect();
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let text = row.get(column).map(cell_text).unwrap_or_default();
                    widths[i] = widths[i].max(text.len());
                    text
                })
                .collect()
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{:<width$}", column, width = widths[i]))
        .collect();
    println!("{}", header.join("  "));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    );
    for cells in rendered {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  "));
    }
}

/// Render one cell for text output. Whole numbers drop the trailing ".0".
fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        CellValue::Text(s) => s.clone(),
    }
}
