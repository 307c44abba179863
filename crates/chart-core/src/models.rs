use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single typed cell value produced by the row parsers.
///
/// Serialized untagged so JSON export reproduces the plain scalar shape
/// downstream chart layers expect (`23.5`, not `{"Number": 23.5}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// The trimmed cell text parsed as a finite decimal.
    Number(f64),
    /// Anything else, kept verbatim (trimmed).
    Text(String),
}

impl CellValue {
    /// The numeric value, if this cell is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    /// The text content, if this cell is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Number(_) => None,
            CellValue::Text(s) => Some(s.as_str()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// A parsed data row: header name → typed value.
///
/// Sparse by design: a compound row short on sub-values simply lacks the
/// trailing keys. Consumers must treat a missing key as absent, never as
/// zero.
pub type Row = HashMap<String, CellValue>;

/// Which dialect the parser concluded the file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// One value per comma-delimited cell.
    Standard,
    /// Records packed into comma cells as semicolon-joined sub-fields.
    Compound,
}

/// Caller-supplied dialect hint for parsing.
///
/// `AutoDetect` runs the first-cell semicolon heuristic; the forced variants
/// exist for input families known to defeat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    Standard,
    Compound,
    #[default]
    AutoDetect,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Format::Standard),
            "compound" => Ok(Format::Compound),
            "auto" => Ok(Format::AutoDetect),
            other => Err(format!("unknown format \"{}\"", other)),
        }
    }
}

/// The immutable result of parsing one file's text.
///
/// Superseded, never mutated, when a new file is loaded.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// Unique display names in first-seen column order.
    pub headers: Vec<String>,
    /// Typed rows keyed by header name.
    pub rows: Vec<Row>,
    /// Whether the file comes from the multi-metric (compound) dialect.
    pub is_multi_metric: bool,
    /// The dialect the parser settled on.
    pub source_format: SourceFormat,
}

/// Calendar granularity for re-bucketing a row stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Pass rows through without grouping.
    None,
    /// One bucket per day of week (Sun..Sat).
    Days,
    /// One bucket per ISO 8601 week.
    Weeks,
    /// One bucket per calendar month.
    Months,
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Granularity::None),
            "days" => Ok(Granularity::Days),
            "weeks" => Ok(Granularity::Weeks),
            "months" => Ok(Granularity::Months),
            other => Err(format!("unknown granularity \"{}\"", other)),
        }
    }
}

/// How bucketed observations are reduced to a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateMethod {
    /// Arithmetic sum of the numeric observations.
    Sum,
    /// Arithmetic mean; 0 when a column has no numeric observations.
    Average,
    /// Number of rows in the bucket, shared across all value columns.
    Count,
}

impl std::str::FromStr for AggregateMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(AggregateMethod::Sum),
            "average" => Ok(AggregateMethod::Average),
            "count" => Ok(AggregateMethod::Count),
            other => Err(format!("unknown aggregation method \"{}\"", other)),
        }
    }
}

/// Ordering applied to week and month buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketSort {
    /// The historical ordering: months by month index regardless of year,
    /// weeks lexicographically by their unpadded key.
    #[default]
    WithinYear,
    /// Strict chronological ordering across year boundaries.
    Chronological,
}

impl std::str::FromStr for BucketSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "within-year" => Ok(BucketSort::WithinYear),
            "chronological" => Ok(BucketSort::Chronological),
            other => Err(format!("unknown bucket sort \"{}\"", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── CellValue ─────────────────────────────────────────────────────────────

    #[test]
    fn test_cell_value_accessors() {
        assert_eq!(CellValue::Number(23.5).as_number(), Some(23.5));
        assert_eq!(CellValue::Number(23.5).as_text(), None);
        assert_eq!(CellValue::from("abc").as_text(), Some("abc"));
        assert_eq!(CellValue::from("abc").as_number(), None);
    }

    #[test]
    fn test_cell_value_serializes_as_plain_scalar() {
        assert_eq!(
            serde_json::to_string(&CellValue::Number(23.5)).unwrap(),
            "23.5"
        );
        assert_eq!(
            serde_json::to_string(&CellValue::Text("L1".to_string())).unwrap(),
            "\"L1\""
        );
    }

    #[test]
    fn test_cell_value_deserializes_untagged() {
        let n: CellValue = serde_json::from_str("42").unwrap();
        assert_eq!(n, CellValue::Number(42.0));
        let t: CellValue = serde_json::from_str("\"42 V\"").unwrap();
        assert_eq!(t, CellValue::Text("42 V".to_string()));
    }

    // ── FromStr conversions ───────────────────────────────────────────────────

    #[test]
    fn test_format_from_str() {
        assert_eq!("auto".parse::<Format>().unwrap(), Format::AutoDetect);
        assert_eq!("standard".parse::<Format>().unwrap(), Format::Standard);
        assert_eq!("compound".parse::<Format>().unwrap(), Format::Compound);
        assert!("tsv".parse::<Format>().is_err());
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("none".parse::<Granularity>().unwrap(), Granularity::None);
        assert_eq!("weeks".parse::<Granularity>().unwrap(), Granularity::Weeks);
        assert!("hours".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_method_and_sort_from_str() {
        assert_eq!(
            "average".parse::<AggregateMethod>().unwrap(),
            AggregateMethod::Average
        );
        assert_eq!(
            "chronological".parse::<BucketSort>().unwrap(),
            BucketSort::Chronological
        );
        assert_eq!(BucketSort::default(), BucketSort::WithinYear);
    }

    #[test]
    fn test_source_format_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SourceFormat::Compound).unwrap(),
            "\"compound\""
        );
    }
}
