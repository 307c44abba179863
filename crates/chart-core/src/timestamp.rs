use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use tracing::warn;

use crate::models::CellValue;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses time-column cells into local calendar timestamps.
///
/// Sensor exports usually carry naive local timestamps, which are taken at
/// face value. Timestamps with an explicit offset (RFC 3339, including the
/// `Z` suffix) are converted into the configured display timezone first, so
/// bucketing always works on local calendar fields.
pub struct TimestampParser {
    display_tz: Tz,
}

impl TimestampParser {
    /// Create a parser for the given IANA timezone name.
    ///
    /// `"auto"` resolves to the system timezone. An unrecognised name falls
    /// back to UTC and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let resolved = if tz_name == "auto" {
            system_timezone()
        } else {
            tz_name.to_string()
        };
        let tz = resolved.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimestampParser: unrecognised timezone \"{}\", falling back to UTC",
                resolved
            );
            Tz::UTC
        });
        Self { display_tz: tz }
    }

    /// The configured display timezone.
    pub fn display_tz(&self) -> Tz {
        self.display_tz
    }

    /// Parse one cell into a local calendar timestamp.
    ///
    /// Numeric cells are treated as Unix epoch seconds; text cells go
    /// through [`TimestampParser::parse`]. Returns `None` when the cell is
    /// not date-like.
    pub fn parse_value(&self, value: &CellValue) -> Option<NaiveDateTime> {
        match value {
            CellValue::Number(n) => {
                let dt = DateTime::from_timestamp(n.trunc() as i64, 0)?;
                Some(dt.with_timezone(&self.display_tz).naive_local())
            }
            CellValue::Text(s) => self.parse(s),
        }
    }

    /// Parse a timestamp string into a local calendar timestamp.
    ///
    /// Handles RFC 3339 (including the `Z` suffix), a fixed list of common
    /// naive date-time patterns, and date-only strings (midnight). Returns
    /// `None` for empty or unrecognised input.
    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&self.display_tz).naive_local());
        }

        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
            "%Y/%m/%d %H:%M:%S",
            "%m/%d/%Y %H:%M:%S",
            "%d.%m.%Y %H:%M:%S",
        ];
        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        None
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new("auto")
    }
}
