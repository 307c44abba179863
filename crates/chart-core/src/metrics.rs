use serde::{Deserialize, Serialize};

// ── MetricCategory ────────────────────────────────────────────────────────────

/// Semantic grouping of a header name.
///
/// Derived, never stored: recomputed from headers whenever a selection UI
/// needs it. Has no effect on parsing or aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricCategory {
    Voltage,
    PowerFactor,
    Current,
    Power,
    Frequency,
    Time,
    Other,
}

impl MetricCategory {
    /// All categories in classification priority order.
    pub const ALL: [MetricCategory; 7] = [
        MetricCategory::Voltage,
        MetricCategory::PowerFactor,
        MetricCategory::Current,
        MetricCategory::Power,
        MetricCategory::Frequency,
        MetricCategory::Time,
        MetricCategory::Other,
    ];

    /// Human-readable group label.
    pub fn label(self) -> &'static str {
        match self {
            MetricCategory::Voltage => "Voltage",
            MetricCategory::PowerFactor => "Power Factor",
            MetricCategory::Current => "Current",
            MetricCategory::Power => "Power",
            MetricCategory::Frequency => "Frequency",
            MetricCategory::Time => "Time",
            MetricCategory::Other => "Other",
        }
    }
}

// ── Classification ────────────────────────────────────────────────────────────

/// Classify a header name into exactly one category.
///
/// Substring rules evaluated in a fixed priority order; the first match
/// wins. "PF" is matched case-sensitively (a lowercase "pf" is too
/// ambiguous), the word rules are case-insensitive, and the time rule
/// accepts the "TIME"/"Time" spellings sensor exports use plus "timestamp".
pub fn categorize(header: &str) -> MetricCategory {
    let lower = header.to_lowercase();
    if lower.contains("volt") {
        return MetricCategory::Voltage;
    }
    if header.contains("PF") || lower.contains("power factor") {
        return MetricCategory::PowerFactor;
    }
    if lower.contains("current") {
        return MetricCategory::Current;
    }
    if lower.contains("power") {
        return MetricCategory::Power;
    }
    if lower.contains("freq") {
        return MetricCategory::Frequency;
    }
    if header.contains("TIME") || header.contains("Time") || header.contains("timestamp") {
        return MetricCategory::Time;
    }
    MetricCategory::Other
}

/// Group headers by category, in priority order, preserving header order
/// within each group. Categories with no members are omitted.
pub fn group_headers(headers: &[String]) -> Vec<(MetricCategory, Vec<String>)> {
    MetricCategory::ALL
        .iter()
        .filter_map(|category| {
            let members: Vec<String> = headers
                .iter()
                .filter(|h| categorize(h) == *category)
                .cloned()
                .collect();
            if members.is_empty() {
                None
            } else {
                Some((*category, members))
            }
        })
        .collect()
}

/// The header a chart should default to for its time axis: the first
/// Time-categorized header, else the first header overall.
pub fn default_time_header(headers: &[String]) -> Option<&String> {
    headers
        .iter()
        .find(|h| categorize(h) == MetricCategory::Time)
        .or_else(|| headers.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── categorize ────────────────────────────────────────────────────────────

    #[test]
    fn test_categorize_voltage() {
        assert_eq!(categorize("Voltage L1"), MetricCategory::Voltage);
        assert_eq!(categorize("AVG VOLTAGE"), MetricCategory::Voltage);
        assert_eq!(categorize("volt [V]"), MetricCategory::Voltage);
    }

    #[test]
    fn test_categorize_power_factor() {
        assert_eq!(categorize("PF Total"), MetricCategory::PowerFactor);
        assert_eq!(categorize("Power Factor L2"), MetricCategory::PowerFactor);
        assert_eq!(categorize("power factor"), MetricCategory::PowerFactor);
    }

    #[test]
    fn test_categorize_current_and_power() {
        assert_eq!(categorize("Current L3"), MetricCategory::Current);
        assert_eq!(categorize("Active Power"), MetricCategory::Power);
        // "Power" alone must not steal the PF headers matched earlier.
        assert_eq!(categorize("PF"), MetricCategory::PowerFactor);
    }

    #[test]
    fn test_categorize_frequency_and_time() {
        assert_eq!(categorize("Frequency"), MetricCategory::Frequency);
        assert_eq!(categorize("Freq [Hz]"), MetricCategory::Frequency);
        assert_eq!(categorize("TIME"), MetricCategory::Time);
        assert_eq!(categorize("Time of day"), MetricCategory::Time);
        assert_eq!(categorize("timestamp"), MetricCategory::Time);
    }

    #[test]
    fn test_categorize_other() {
        assert_eq!(categorize("Energy"), MetricCategory::Other);
        assert_eq!(categorize(""), MetricCategory::Other);
        // Lowercase "time" has no rule of its own.
        assert_eq!(categorize("time"), MetricCategory::Other);
    }

    #[test]
    fn test_categorize_priority_first_match_wins() {
        // Contains both "volt" and "PF": the voltage rule fires first.
        assert_eq!(categorize("Voltage PF"), MetricCategory::Voltage);
        // Contains both "current" and "power": current wins by priority.
        assert_eq!(categorize("Current Power"), MetricCategory::Current);
    }

    // ── group_headers / default_time_header ───────────────────────────────────

    #[test]
    fn test_group_headers_priority_order_and_membership() {
        let headers: Vec<String> = ["TIME", "Voltage L1", "Voltage L2", "Current L1", "Energy"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let groups = group_headers(&headers);

        let categories: Vec<MetricCategory> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            categories,
            vec![
                MetricCategory::Voltage,
                MetricCategory::Current,
                MetricCategory::Time,
                MetricCategory::Other,
            ]
        );
        assert_eq!(groups[0].1, vec!["Voltage L1", "Voltage L2"]);
    }

    #[test]
    fn test_default_time_header_prefers_time_category() {
        let headers: Vec<String> = ["Voltage L1", "TIME", "Current L1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(default_time_header(&headers).unwrap(), "TIME");
    }

    #[test]
    fn test_default_time_header_falls_back_to_first() {
        let headers: Vec<String> = ["Date", "Temperature"].iter().map(|s| s.to_string()).collect();
        assert_eq!(default_time_header(&headers).unwrap(), "Date");
        assert!(default_time_header(&[]).is_none());
    }
}
