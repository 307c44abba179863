mod bootstrap;
mod render;

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use chart_core::error::ChartError;
use chart_core::metrics::{default_time_header, group_headers};
use chart_core::models::{AggregateMethod, BucketSort, Format, Granularity};
use chart_core::settings::Settings;
use chart_data::aggregator::SeriesAggregator;
use chart_data::parser::parse_with_format;

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("meter-chart v{} starting", env!("CARGO_PKG_VERSION"));

    let files = bootstrap::discover_csv_files(&settings.path)?;
    tracing::info!(
        "Processing {} CSV file(s) under {}",
        files.len(),
        settings.path.display()
    );

    for file in &files {
        process_file(file, &settings)?;
    }

    Ok(())
}

/// Parse, aggregate, and render one CSV file.
fn process_file(path: &Path, settings: &Settings) -> Result<()> {
    let text = std::fs::read_to_string(path).map_err(|source| ChartError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let format: Format = settings.format.parse().map_err(ChartError::Config)?;
    let result = parse_with_format(&text, format)?;

    tracing::info!(
        "{}: {} columns, {} rows ({:?})",
        path.display(),
        result.headers.len(),
        result.rows.len(),
        result.source_format
    );
    for (category, members) in group_headers(&result.headers) {
        tracing::debug!("{}: {}", category.label(), members.join(", "));
    }

    let time_column = resolve_time_column(settings, &result.headers, path)?;
    let value_columns = resolve_value_columns(settings, &result.headers, &time_column, path)?;

    let granularity: Granularity = settings.group.parse().map_err(ChartError::Config)?;
    let method: AggregateMethod = settings.method.parse().map_err(ChartError::Config)?;
    let sort: BucketSort = settings.sort.parse().map_err(ChartError::Config)?;

    let aggregator = SeriesAggregator::with_timezone(&settings.timezone).bucket_sort(sort);
    let rows = aggregator.aggregate(&result.rows, &time_column, granularity, &value_columns, method);

    // Pass-through keeps the file's own column order; grouped output leads
    // with the time column followed by the selected value columns.
    let columns: Vec<String> = if granularity == Granularity::None {
        result.headers.clone()
    } else {
        std::iter::once(time_column.clone())
            .chain(value_columns.iter().cloned())
            .collect()
    };

    match settings.output.as_str() {
        "json" => println!("{}", render::to_json(&columns, &rows)?),
        "csv" => render::write_csv(&columns, &rows, std::io::stdout())?,
        _ => render::print_table(&columns, &rows),
    }

    Ok(())
}

/// The time column: the explicit flag when given (and present), else the
/// first time-like header, else the first header.
fn resolve_time_column(
    settings: &Settings,
    headers: &[String],
    path: &Path,
) -> Result<String, ChartError> {
    match &settings.time_column {
        Some(name) => {
            if headers.contains(name) {
                Ok(name.clone())
            } else {
                Err(ChartError::Config(format!(
                    "time column \"{}\" not found in {}",
                    name,
                    path.display()
                )))
            }
        }
        None => default_time_header(headers).cloned().ok_or_else(|| {
            ChartError::Config(format!("{} has no columns", path.display()))
        }),
    }
}

/// The value columns: the explicit comma-separated flag when given (all
/// names must exist), else every header other than the time column.
fn resolve_value_columns(
    settings: &Settings,
    headers: &[String],
    time_column: &str,
    path: &Path,
) -> Result<Vec<String>, ChartError> {
    match &settings.columns {
        Some(list) => {
            let columns: Vec<String> = list
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
            for column in &columns {
                if !headers.contains(column) {
                    return Err(ChartError::Config(format!(
                        "value column \"{}\" not found in {}",
                        column,
                        path.display()
                    )));
                }
            }
            Ok(columns)
        }
        None => Ok(headers
            .iter()
            .filter(|header| header.as_str() != time_column)
            .cloned()
            .collect()),
    }
}
