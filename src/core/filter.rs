// Logsight - GPL-3.0-or-later
// This file is part of Logsight.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// Logsight is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Logsight is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Logsight.  If not, see <https://www.gnu.org/licenses/>.

//! Cross filtering from a selected chart bucket back to its records.
//!
//! Membership is decided by the same key functions the aggregators group by,
//! so the records returned for a bucket always number exactly its count.

use crate::anomaly::{Category, SeverityLevel};
use crate::core::aggregate::{category_key, service_key, severity_key};
use crate::parser::LogRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A selected chart bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "lowercase")]
pub enum Selection {
    Service(String),
    Category(Category),
    Severity(SeverityLevel),
}

impl Selection {
    /// Whether `record` belongs to the selected bucket
    #[must_use]
    pub fn matches(&self, record: &LogRecord) -> bool {
        match self {
            Self::Service(name) => service_key(record) == name,
            Self::Category(category) => category_key(record) == *category,
            Self::Severity(level) => severity_key(record) == *level,
        }
    }

    /// Records in the selected bucket, in their original order
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [LogRecord]) -> Vec<&'a LogRecord> {
        profiling::scope!("Selection::apply");
        let matched = filter_records(records, |record| self.matches(record));
        tracing::debug!(
            "Drill-down on {}: {} of {} records",
            self,
            matched.len(),
            records.len()
        );
        matched
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(name) => write!(f, "service '{name}'"),
            Self::Category(category) => write!(f, "category '{category}'"),
            Self::Severity(level) => write!(f, "severity '{level}'"),
        }
    }
}

fn filter_records<F>(records: &[LogRecord], predicate: F) -> Vec<&LogRecord>
where
    F: Fn(&LogRecord) -> bool,
{
    records.iter().filter(|record| predicate(*record)).collect()
}

#[must_use]
pub fn filter_by_service<'a>(records: &'a [LogRecord], service_name: &str) -> Vec<&'a LogRecord> {
    filter_records(records, |record| service_key(record) == service_name)
}

#[must_use]
pub fn filter_by_category(records: &[LogRecord], category: Category) -> Vec<&LogRecord> {
    filter_records(records, |record| category_key(record) == category)
}

#[must_use]
pub fn filter_by_severity(records: &[LogRecord], level: SeverityLevel) -> Vec<&LogRecord> {
    filter_records(records, |record| severity_key(record) == level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::{aggregate_by_category, aggregate_by_service, aggregate_by_severity};

    const MESSAGES: [&str; 10] = [
        "Request processed successfully",
        "User login failed",
        "Database connection timeout",
        "Cache miss detected",
        "Service unavailable",
        "Payment gateway error",
        "Retrying request",
        "Session expired",
        "connection error occurred",
        "NullPointerException in handler",
    ];
    const SERVICES: [&str; 4] = ["auth-service", "payment-service", "user-service", "order-service"];

    fn sample_snapshot() -> Vec<LogRecord> {
        (0..97_usize)
            .map(|i| {
                let score = ((i * 37) % 41) as f64 / 20.0 - 1.0;
                LogRecord::new(
                    i.to_string(),
                    SERVICES[(i * 7) % SERVICES.len()],
                    MESSAGES[(i * 3) % MESSAGES.len()],
                    1_700_000_000_000 + i as i64 * 60_000,
                    score,
                )
            })
            .collect()
    }

    #[test]
    fn test_filter_by_service_preserves_order() {
        let records = vec![
            LogRecord::new("1", "auth", "a", 0, 0.0),
            LogRecord::new("2", "billing", "b", 0, 0.0),
            LogRecord::new("3", "auth", "c", 0, 0.0),
        ];
        let ids: Vec<&str> = filter_by_service(&records, "auth")
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(filter_by_service(&records, "missing").is_empty());
    }

    #[test]
    fn test_filter_by_category_uses_rule_priority() {
        let records = vec![
            LogRecord::new("1", "a", "connection error occurred", 0, 0.0),
            LogRecord::new("2", "a", "connection reset", 0, 0.0),
        ];
        let errors = filter_by_category(&records, Category::Errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id, "1");

        let connection = filter_by_category(&records, Category::ConnectionIssues);
        assert_eq!(connection.len(), 1);
        assert_eq!(connection[0].id, "2");
    }

    #[test]
    fn test_category_bucket_counts_match_filter_lengths() {
        let records = sample_snapshot();
        let buckets = aggregate_by_category(&records);
        assert!(buckets.len() > 1);
        for bucket in buckets {
            assert_eq!(
                filter_by_category(&records, bucket.key).len(),
                bucket.count,
                "category {}",
                bucket.key
            );
        }
    }

    #[test]
    fn test_service_bucket_counts_match_filter_lengths() {
        let records = sample_snapshot();
        for bucket in aggregate_by_service(&records) {
            assert_eq!(filter_by_service(&records, &bucket.key).len(), bucket.count);
        }
    }

    #[test]
    fn test_severity_bucket_counts_match_filter_lengths() {
        let records = sample_snapshot();
        for bucket in aggregate_by_severity(&records) {
            assert_eq!(filter_by_severity(&records, bucket.key).len(), bucket.count);
        }
    }

    #[test]
    fn test_selection_apply_matches_free_functions() {
        let records = sample_snapshot();
        assert_eq!(
            Selection::Service("user-service".to_string()).apply(&records),
            filter_by_service(&records, "user-service")
        );
        assert_eq!(
            Selection::Category(Category::Failures).apply(&records),
            filter_by_category(&records, Category::Failures)
        );
        assert_eq!(
            Selection::Severity(SeverityLevel::Critical).apply(&records),
            filter_by_severity(&records, SeverityLevel::Critical)
        );
    }

    #[test]
    fn test_selection_serialization() {
        let json = serde_json::to_value(Selection::Category(Category::ConnectionIssues))
            .expect("serialize");
        assert_eq!(json["kind"], "category");
        assert_eq!(json["key"], "Connection Issues");
    }
}
