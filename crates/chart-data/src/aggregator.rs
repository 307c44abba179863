//! Calendar bucketing and aggregation over parsed rows.
//!
//! Given a designated time column, a granularity, and one or more value
//! columns, the row stream collapses into ordered buckets with the chosen
//! aggregation applied per value column. Rows whose time value does not
//! parse as a date are excluded from any grouped output.

use std::collections::{BTreeMap, HashMap};

use chart_core::models::{AggregateMethod, BucketSort, CellValue, Granularity, Row};
use chart_core::timestamp::TimestampParser;
use chrono::{Datelike, NaiveDateTime};
use tracing::debug;

/// Rows emitted for `Granularity::None` when nothing in the time column
/// parses as a date, so a non-time-series dump cannot flood the
/// presentation layer.
const NON_DATE_PASSTHROUGH_LIMIT: usize = 50;

// ── TimeBucket ────────────────────────────────────────────────────────────────

/// Working state for one aggregation group; discarded once the output row
/// has been emitted.
struct TimeBucket {
    /// Human label for the time column of the output row.
    label: String,
    /// Numeric observations per value column.
    samples: HashMap<String, Vec<f64>>,
    /// Rows that fell into this bucket, shared across all value columns.
    count: u32,
}

impl TimeBucket {
    fn new(label: String) -> Self {
        Self {
            label,
            samples: HashMap::new(),
            count: 0,
        }
    }

    /// Accumulate one row. A non-numeric cell is skipped for that column
    /// only; the row still counts toward the bucket.
    fn add_row(&mut self, row: &Row, value_columns: &[String]) {
        self.count += 1;
        for column in value_columns {
            if let Some(CellValue::Number(n)) = row.get(column) {
                self.samples.entry(column.clone()).or_default().push(*n);
            }
        }
    }
}

// ── SeriesAggregator ──────────────────────────────────────────────────────────

/// Groups parsed rows into calendar buckets.
///
/// Holds no state between calls; each invocation reads its input and
/// returns a freshly built output.
pub struct SeriesAggregator {
    timestamps: TimestampParser,
    bucket_sort: BucketSort,
}

impl SeriesAggregator {
    /// Aggregator with the auto-detected timezone and the historical bucket
    /// ordering.
    pub fn new() -> Self {
        Self {
            timestamps: TimestampParser::default(),
            bucket_sort: BucketSort::default(),
        }
    }

    /// Aggregator with an explicit display timezone.
    pub fn with_timezone(tz_name: &str) -> Self {
        Self {
            timestamps: TimestampParser::new(tz_name),
            bucket_sort: BucketSort::default(),
        }
    }

    /// Select the week/month bucket ordering.
    pub fn bucket_sort(mut self, sort: BucketSort) -> Self {
        self.bucket_sort = sort;
        self
    }

    /// Aggregate `rows` by `granularity`.
    ///
    /// Grouped output maps the time column to the bucket label and each
    /// value column to its aggregate, rounded to 2 decimal places.
    /// `Granularity::None` passes rows through with the time value
    /// reformatted for display.
    pub fn aggregate(
        &self,
        rows: &[Row],
        time_column: &str,
        granularity: Granularity,
        value_columns: &[String],
        method: AggregateMethod,
    ) -> Vec<Row> {
        match granularity {
            Granularity::None => self.passthrough(rows, time_column),
            Granularity::Days => {
                let buckets = self.bucket_rows(rows, time_column, value_columns, |ts| {
                    (
                        ts.weekday().num_days_from_sunday(),
                        ts.format("%a").to_string(),
                    )
                });
                emit(buckets, time_column, value_columns, method)
            }
            Granularity::Weeks => match self.bucket_sort {
                // Week numbers are not zero padded, so the historical key
                // order is lexicographic, not chronological.
                BucketSort::WithinYear => {
                    let buckets = self.bucket_rows(rows, time_column, value_columns, |ts| {
                        let week = ts.iso_week();
                        (
                            format!("{}-W{}", week.year(), week.week()),
                            format!("Week {}", week.week()),
                        )
                    });
                    emit(buckets, time_column, value_columns, method)
                }
                BucketSort::Chronological => {
                    let buckets = self.bucket_rows(rows, time_column, value_columns, |ts| {
                        let week = ts.iso_week();
                        ((week.year(), week.week()), format!("Week {}", week.week()))
                    });
                    emit(buckets, time_column, value_columns, method)
                }
            },
            Granularity::Months => match self.bucket_sort {
                // Historical order: month index first, so multiple years
                // interleave by calendar month.
                BucketSort::WithinYear => {
                    let buckets = self.bucket_rows(rows, time_column, value_columns, |ts| {
                        ((ts.month0(), ts.year()), ts.format("%b").to_string())
                    });
                    emit(buckets, time_column, value_columns, method)
                }
                BucketSort::Chronological => {
                    let buckets = self.bucket_rows(rows, time_column, value_columns, |ts| {
                        ((ts.year(), ts.month0()), ts.format("%b").to_string())
                    });
                    emit(buckets, time_column, value_columns, method)
                }
            },
        }
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Pass rows through, reformatting parseable time values for display.
    fn passthrough(&self, rows: &[Row], time_column: &str) -> Vec<Row> {
        let any_dates = rows.iter().any(|row| {
            row.get(time_column)
                .and_then(|v| self.timestamps.parse_value(v))
                .is_some()
        });
        let limit = if any_dates {
            rows.len()
        } else {
            NON_DATE_PASSTHROUGH_LIMIT.min(rows.len())
        };

        rows[..limit]
            .iter()
            .map(|row| {
                let mut out = row.clone();
                if let Some(ts) = row
                    .get(time_column)
                    .and_then(|v| self.timestamps.parse_value(v))
                {
                    out.insert(
                        time_column.to_string(),
                        CellValue::Text(ts.format("%m/%d %H:%M:%S").to_string()),
                    );
                }
                out
            })
            .collect()
    }

    /// Generic bucketing driver.
    ///
    /// `key_fn` maps a local timestamp to the bucket's sort key and display
    /// label; the BTreeMap keeps buckets ordered by key. Rows without a
    /// parseable time value are skipped.
    fn bucket_rows<K: Ord>(
        &self,
        rows: &[Row],
        time_column: &str,
        value_columns: &[String],
        key_fn: impl Fn(NaiveDateTime) -> (K, String),
    ) -> BTreeMap<K, TimeBucket> {
        let mut buckets: BTreeMap<K, TimeBucket> = BTreeMap::new();
        let mut skipped = 0usize;

        for row in rows {
            let parsed = row
                .get(time_column)
                .and_then(|v| self.timestamps.parse_value(v));
            let Some(ts) = parsed else {
                skipped += 1;
                continue;
            };
            let (key, label) = key_fn(ts);
            buckets
                .entry(key)
                .or_insert_with(|| TimeBucket::new(label))
                .add_row(row, value_columns);
        }

        if skipped > 0 {
            debug!(
                "{} row(s) had no parseable \"{}\" value and were excluded",
                skipped, time_column
            );
        }
        buckets
    }
}

impl Default for SeriesAggregator {
    fn default() -> Self {
        Self::new()
    }
}

// ── Output assembly ───────────────────────────────────────────────────────────

/// Convert ordered buckets into output rows.
fn emit<K: Ord>(
    buckets: BTreeMap<K, TimeBucket>,
    time_column: &str,
    value_columns: &[String],
    method: AggregateMethod,
) -> Vec<Row> {
    buckets
        .into_values()
        .map(|bucket| {
            let TimeBucket {
                label,
                samples,
                count,
            } = bucket;
            let mut row = Row::with_capacity(value_columns.len() + 1);
            row.insert(time_column.to_string(), CellValue::Text(label));
            for column in value_columns {
                let observations: &[f64] =
                    samples.get(column).map(Vec::as_slice).unwrap_or(&[]);
                let value = match method {
                    AggregateMethod::Sum => observations.iter().sum::<f64>(),
                    AggregateMethod::Average => {
                        if observations.is_empty() {
                            0.0
                        } else {
                            observations.iter().sum::<f64>() / observations.len() as f64
                        }
                    }
                    AggregateMethod::Count => f64::from(count),
                };
                row.insert(column.clone(), CellValue::Number(round2(value)));
            }
            row
        })
        .collect()
}

/// Round to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregate with the default timezone and bucket ordering.
pub fn aggregate(
    rows: &[Row],
    time_column: &str,
    granularity: Granularity,
    value_columns: &[String],
    method: AggregateMethod,
) -> Vec<Row> {
    SeriesAggregator::new().aggregate(rows, time_column, granularity, value_columns, method)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
