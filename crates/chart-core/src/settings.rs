use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Chart-ready datasets from sensor CSV exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "meter-chart",
    about = "Parse sensor CSV exports into typed, time-bucketed chart data",
    version
)]
pub struct Settings {
    /// CSV file, or directory scanned recursively for CSV files
    pub path: PathBuf,

    /// Input dialect
    #[arg(long, default_value = "auto", value_parser = ["auto", "standard", "compound"])]
    pub format: String,

    /// Calendar grouping applied to the parsed rows
    #[arg(long, default_value = "none", value_parser = ["none", "days", "weeks", "months"])]
    pub group: String,

    /// Aggregation method for grouped value columns
    #[arg(long, default_value = "average", value_parser = ["sum", "average", "count"])]
    pub method: String,

    /// Time column name (defaults to the first time-like header)
    #[arg(long)]
    pub time_column: Option<String>,

    /// Comma-separated value column names (defaults to every non-time header)
    #[arg(long)]
    pub columns: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json", "csv"])]
    pub output: String,

    /// Timezone for timestamp display and bucketing (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Week/month bucket ordering
    #[arg(long, default_value = "within-year", value_parser = ["within-year", "chronological"])]
    pub sort: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::try_parse_from(["meter-chart", "export.csv"]).unwrap();
        assert_eq!(settings.path, PathBuf::from("export.csv"));
        assert_eq!(settings.format, "auto");
        assert_eq!(settings.group, "none");
        assert_eq!(settings.method, "average");
        assert_eq!(settings.output, "table");
        assert_eq!(settings.timezone, "auto");
        assert_eq!(settings.sort, "within-year");
        assert!(settings.time_column.is_none());
        assert!(settings.columns.is_none());
    }

    #[test]
    fn test_settings_full_invocation() {
        let settings = Settings::try_parse_from([
            "meter-chart",
            "exports/",
            "--format",
            "compound",
            "--group",
            "weeks",
            "--method",
            "sum",
            "--time-column",
            "TIME",
            "--columns",
            "Voltage L1,Voltage L2",
            "--output",
            "json",
            "--sort",
            "chronological",
        ])
        .unwrap();
        assert_eq!(settings.format, "compound");
        assert_eq!(settings.group, "weeks");
        assert_eq!(settings.method, "sum");
        assert_eq!(settings.time_column.as_deref(), Some("TIME"));
        assert_eq!(settings.columns.as_deref(), Some("Voltage L1,Voltage L2"));
        assert_eq!(settings.output, "json");
        assert_eq!(settings.sort, "chronological");
    }

    #[test]
    fn test_settings_rejects_unknown_group() {
        assert!(Settings::try_parse_from(["meter-chart", "f.csv", "--group", "hours"]).is_err());
    }

    #[test]
    fn test_settings_requires_path() {
        assert!(Settings::try_parse_from(["meter-chart"]).is_err());
    }
}
