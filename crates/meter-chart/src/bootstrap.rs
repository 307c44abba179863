use std::path::{Path, PathBuf};

use chart_core::error::ChartError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── CSV discovery ──────────────────────────────────────────────────────────────

/// Resolve the input path to the list of CSV files to process.
///
/// A file path is returned as-is. A directory is scanned recursively for
/// `.csv` files (case-insensitive extension), sorted by path.
pub fn discover_csv_files(path: &Path) -> Result<Vec<PathBuf>, ChartError> {
    if !path.exists() {
        return Err(ChartError::Config(format!(
            "path does not exist: {}",
            path.display()
        )));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    if files.is_empty() {
        return Err(ChartError::Config(format!(
            "no CSV files found in {}",
            path.display()
        )));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_discover_single_file() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "export.csv", "a,b\n1,2\n");
        let files = discover_csv_files(&file).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_discover_directory_recursive_sorted() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("march");
        std::fs::create_dir_all(&sub).unwrap();
        write_file(dir.path(), "b.csv", "x\n");
        write_file(dir.path(), "a.CSV", "x\n");
        write_file(&sub, "nested.csv", "x\n");
        write_file(dir.path(), "notes.txt", "skip me");

        let files = discover_csv_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv", "nested.csv"]);
    }

    #[test]
    fn test_discover_missing_path_errors() {
        let err = discover_csv_files(Path::new("/tmp/meter-chart-does-not-exist-xyz")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_discover_empty_directory_errors() {
        let dir = TempDir::new().unwrap();
        let err = discover_csv_files(dir.path()).unwrap_err();
        assert!(err.to_string().contains("no CSV files"));
    }
}
