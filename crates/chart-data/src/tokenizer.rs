//! Quote-aware line splitting.
//!
//! Sensor exports quote any cell whose text contains the field separator.
//! Malformed quoting (an odd number of quote characters) degrades to
//! best-effort splitting; this module never errors.

/// Split one line of text into cell strings.
///
/// A double quote toggles the in-quote state; while inside quotes the
/// separator is literal cell content. The accumulated cell is flushed at
/// each separator and at line end. Every returned cell is trimmed and has a
/// single pair of enclosing double quotes removed.
pub fn split_line(line: &str, separator: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            current.push(ch);
        } else if ch == separator && !in_quotes {
            cells.push(finish_cell(&current));
            current.clear();
        } else {
            current.push(ch);
        }
    }
    cells.push(finish_cell(&current));
    cells
}

/// Trim a raw cell and strip one pair of enclosing double quotes.
fn finish_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    stripped.trim().to_string()
}
