//! Standard/compound dialect detection.

use chart_core::models::{Format, SourceFormat};
use tracing::debug;

use crate::tokenizer::split_line;

/// Decide the dialect from the first two non-empty lines of a file.
///
/// Compound exports pack their header into the first comma cell as
/// semicolon-joined sub-fields, and every data row carries semicolon-joined
/// sub-values as well (though a data row may lead with a plain timestamp
/// cell). The check is therefore: semicolon in the first cell of the header
/// line, and a semicolon anywhere in the first data line. A standard file
/// with semicolons in a quoted text field can misclassify; callers with
/// such input families force the format via [`resolve_format`] instead.
pub fn detect_format(first_line: &str, second_line: &str) -> SourceFormat {
    if first_cell_has_semicolon(first_line) && second_line.contains(';') {
        SourceFormat::Compound
    } else {
        SourceFormat::Standard
    }
}

/// Resolve a caller-supplied hint: forced formats win, `AutoDetect` runs
/// the heuristic.
pub fn resolve_format(hint: Format, first_line: &str, second_line: &str) -> SourceFormat {
    match hint {
        Format::Standard => SourceFormat::Standard,
        Format::Compound => SourceFormat::Compound,
        Format::AutoDetect => {
            let detected = detect_format(first_line, second_line);
            debug!("auto-detected {:?} dialect", detected);
            detected
        }
    }
}

fn first_cell_has_semicolon(line: &str) -> bool {
    split_line(line, ',')
        .into_iter()
        .next()
        .map(|cell| cell.contains(';'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_standard() {
        assert_eq!(
            detect_format("Date,Temperature", "2025-01-01,23.5"),
            SourceFormat::Standard
        );
    }

    #[test]
    fn test_detect_compound_packed_data_row() {
        assert_eq!(
            detect_format("TIME;V1;V2", "00:00:05;230;231"),
            SourceFormat::Compound
        );
    }

    #[test]
    fn test_detect_compound_with_leading_timestamp_cell() {
        // The data row's semicolons may sit after a plain first cell.
        assert_eq!(
            detect_format("TIME;V1;V2", "2025-01-01 00:00:00,10;20"),
            SourceFormat::Compound
        );
    }

    #[test]
    fn test_detect_requires_semicolons_in_both_lines() {
        // Header looks compound but the data line has no semicolon at all.
        assert_eq!(
            detect_format("TIME;V1;V2", "2025-01-01,10,20"),
            SourceFormat::Standard
        );
        // Data has semicolons but the header's first cell does not.
        assert_eq!(
            detect_format("Date,Temperature", "a;b,c"),
            SourceFormat::Standard
        );
    }

    #[test]
    fn test_detect_header_check_is_first_cell_only() {
        // A semicolon beyond the header's first comma cell does not count.
        assert_eq!(
            detect_format("Date,notes;more", "2025-01-01,a;b"),
            SourceFormat::Standard
        );
    }

    #[test]
    fn test_resolve_forced_formats_win() {
        assert_eq!(
            resolve_format(Format::Standard, "TIME;V1", "1;2"),
            SourceFormat::Standard
        );
        assert_eq!(
            resolve_format(Format::Compound, "a,b", "1,2"),
            SourceFormat::Compound
        );
    }

    #[test]
    fn test_resolve_auto_runs_heuristic() {
        assert_eq!(
            resolve_format(Format::AutoDetect, "TIME;V1", "00:00;2"),
            SourceFormat::Compound
        );
    }
}
