//! Header cleaning and deduplication.

use regex::Regex;
use std::collections::HashMap;

/// An alphanumeric device tag prefixed to a header with a `>` separator,
/// e.g. `"Analyzer7 > Voltage L1"`.
const DEVICE_TAG_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9 _.-]*>\s*";

/// Cleans raw header text and guarantees uniqueness across a header list.
///
/// Uniqueness is a hard invariant: the row parsers key rows by header name,
/// so a repeated name would silently overwrite values.
pub struct HeaderNormalizer {
    prefix_patterns: Vec<Regex>,
}

impl HeaderNormalizer {
    /// Normalizer with the built-in device-tag prefix pattern.
    pub fn new() -> Self {
        Self {
            prefix_patterns: vec![Regex::new(DEVICE_TAG_PATTERN).expect("regex is valid")],
        }
    }

    /// Normalizer with a caller-supplied prefix pattern set instead of the
    /// default.
    pub fn with_patterns(prefix_patterns: Vec<Regex>) -> Self {
        Self { prefix_patterns }
    }

    /// Clean every header and deduplicate repeats with a counter suffix.
    ///
    /// The first occurrence of a cleaned name stays unchanged; every later
    /// occurrence gets a space and its 1-based occurrence count appended
    /// ("Voltage", "Voltage 2", "Voltage 3", …). Output length and order
    /// match the input.
    pub fn normalize(&self, raw_headers: &[String]) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        raw_headers
            .iter()
            .map(|raw| {
                let cleaned = self.clean(raw);
                let count = seen.entry(cleaned.clone()).or_insert(0);
                *count += 1;
                if *count == 1 {
                    cleaned
                } else {
                    format!("{} {}", cleaned, count)
                }
            })
            .collect()
    }

    /// Strip each configured prefix pattern from the start of a name.
    fn clean(&self, raw: &str) -> String {
        let mut name = raw.trim();
        for pattern in &self.prefix_patterns {
            if let Some(found) = pattern.find(name) {
                name = name[found.end()..].trim_start();
            }
        }
        name.trim().to_string()
    }
}

impl Default for HeaderNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
