//! Row parsing for the two sensor CSV dialects.
//!
//! Standard files carry one value per comma cell. Compound files pack a
//! whole record into comma cells as semicolon-joined sub-fields; each
//! sub-value consumes one header slot in order. Both variants coerce cells
//! to typed values and degrade gracefully on ragged input; the only fatal
//! conditions are an empty file and a file without a data row.

use chart_core::error::{ChartError, Result};
use chart_core::models::{CellValue, Format, ParseResult, Row, SourceFormat};
use tracing::debug;

use crate::detect::resolve_format;
use crate::normalize::HeaderNormalizer;
use crate::tokenizer::split_line;

/// Parse a full CSV text blob, auto-detecting the dialect.
pub fn parse(text: &str) -> Result<ParseResult> {
    parse_with_format(text, Format::AutoDetect)
}

/// Parse with an explicit dialect hint.
///
/// Fails with [`ChartError::EmptyInput`] when the text has no non-blank
/// content and [`ChartError::InsufficientRows`] when it has fewer than two
/// non-empty lines. Every other irregularity degrades per dialect rules.
pub fn parse_with_format(text: &str, format: Format) -> Result<ParseResult> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.is_empty() {
        return Err(ChartError::EmptyInput);
    }
    if lines.len() < 2 {
        return Err(ChartError::InsufficientRows { found: lines.len() });
    }

    let source_format = resolve_format(format, lines[0], lines[1]);
    let normalizer = HeaderNormalizer::new();
    let result = match source_format {
        SourceFormat::Standard => parse_standard(&lines, &normalizer),
        SourceFormat::Compound => parse_compound(&lines, &normalizer),
    };

    debug!(
        "parsed {} rows across {} headers ({:?})",
        result.rows.len(),
        result.headers.len(),
        result.source_format
    );
    Ok(result)
}

// ── Standard dialect ──────────────────────────────────────────────────────────

fn parse_standard(lines: &[&str], normalizer: &HeaderNormalizer) -> ParseResult {
    let headers = normalizer.normalize(&split_line(lines[0], ','));

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for line in &lines[1..] {
        let cells = split_line(line, ',');
        let mut row = Row::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            // Ragged rows: missing trailing cells become empty text; cells
            // beyond the header list are dropped.
            let value = match cells.get(i) {
                Some(cell) => coerce_cell(cell),
                None => CellValue::Text(String::new()),
            };
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }

    ParseResult {
        headers,
        rows,
        is_multi_metric: false,
        source_format: SourceFormat::Standard,
    }
}

// ── Compound dialect ──────────────────────────────────────────────────────────

fn parse_compound(lines: &[&str], normalizer: &HeaderNormalizer) -> ParseResult {
    let mut raw_headers: Vec<String> = Vec::new();
    for cell in split_line(lines[0], ',') {
        if cell.contains(';') {
            raw_headers.extend(cell.split(';').map(|sub| sub.trim().to_string()));
        } else {
            raw_headers.push(cell);
        }
    }
    let headers = normalizer.normalize(&raw_headers);

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for line in &lines[1..] {
        let mut row = Row::new();
        let mut slot = 0usize;
        for cell in split_line(line, ',') {
            if cell.contains(';') {
                for sub in cell.split(';') {
                    assign_slot(&mut row, &headers, &mut slot, sub);
                }
            } else {
                assign_slot(&mut row, &headers, &mut slot, &cell);
            }
        }
        // Rows short on sub-values keep their trailing headers unset.
        rows.push(row);
    }

    ParseResult {
        headers,
        rows,
        is_multi_metric: true,
        source_format: SourceFormat::Compound,
    }
}

/// Assign one sub-value to the next unfilled header slot. Sub-values beyond
/// the last header are dropped.
fn assign_slot(row: &mut Row, headers: &[String], slot: &mut usize, raw: &str) {
    let Some(header) = headers.get(*slot) else {
        return;
    };
    row.insert(header.clone(), coerce_compound_cell(raw, *slot));
    *slot += 1;
}

/// Slot 0 holds the timestamp column; text with a date-like separator
/// (`/`, `:`, or `-`) stays textual there even when it would parse as a
/// number.
fn coerce_compound_cell(raw: &str, slot: usize) -> CellValue {
    let trimmed = raw.trim();
    if slot == 0 && trimmed.contains(['/', ':', '-']) {
        return CellValue::Text(trimmed.to_string());
    }
    coerce_cell(trimmed)
}

// ── Typed coercion ────────────────────────────────────────────────────────────

/// Coerce trimmed cell text to a typed value: a finite decimal becomes a
/// number, anything else stays text. Decimal-comma exports ("23,5") are
/// retried with the comma as a dot.
pub(crate) fn coerce_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if let Ok(parsed) = trimmed.parse::<f64>() {
        if parsed.is_finite() {
            return CellValue::Number(parsed);
        }
    }
    if trimmed.matches(',').count() == 1 && !trimmed.contains('.') {
        if let Ok(parsed) = trimmed.replace(',', ".").parse::<f64>() {
            if parsed.is_finite() {
                return CellValue::Number(parsed);
            }
        }
    }
    CellValue::Text(trimmed.to_string())
}
