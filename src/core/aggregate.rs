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

//! Per-service, per-category and per-severity counts.
//!
//! The `*_key` functions are the bucket membership predicates. Drill-down
//! filtering in [`crate::core::filter`] compares against the same functions,
//! which keeps bucket counts and filtered list lengths equal.

use crate::anomaly::{category, Category, SeverityLevel};
use crate::parser::LogRecord;
use indexmap::IndexMap;
use serde::Serialize;
use std::hash::Hash;

/// Number of services shown in the service chart
pub const TOP_SERVICES: usize = 5;

/// One grouped-and-counted unit of an aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket<K> {
    pub key: K,
    pub count: usize,
}

#[must_use]
pub fn service_key(record: &LogRecord) -> &str {
    &record.service_name
}

#[must_use]
pub fn category_key(record: &LogRecord) -> Category {
    category::classify(&record.message)
}

#[must_use]
pub fn severity_key(record: &LogRecord) -> SeverityLevel {
    SeverityLevel::from_score(record.score)
}

/// Count records per key, buckets in first-encountered order
fn count_by<'a, K, F>(records: &'a [LogRecord], key_of: F) -> Vec<Bucket<K>>
where
    K: Hash + Eq,
    F: Fn(&'a LogRecord) -> K,
{
    let mut counts: IndexMap<K, usize> = IndexMap::new();
    for record in records {
        *counts.entry(key_of(record)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(key, count)| Bucket { key, count })
        .collect()
}

/// The [`TOP_SERVICES`] busiest services, by count descending.
/// Equal counts keep the order in which the services first appear.
#[must_use]
pub fn aggregate_by_service(records: &[LogRecord]) -> Vec<Bucket<String>> {
    profiling::scope!("aggregate_by_service");

    let mut buckets = count_by(records, service_key);
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets.truncate(TOP_SERVICES);

    tracing::trace!("Service aggregate: {} buckets", buckets.len());
    buckets
        .into_iter()
        .map(|bucket| Bucket {
            key: bucket.key.to_owned(),
            count: bucket.count,
        })
        .collect()
}

/// Every category with at least one record, in first-encountered order
#[must_use]
pub fn aggregate_by_category(records: &[LogRecord]) -> Vec<Bucket<Category>> {
    profiling::scope!("aggregate_by_category");
    count_by(records, category_key)
}

/// Every severity level with at least one record, most severe first
#[must_use]
pub fn aggregate_by_severity(records: &[LogRecord]) -> Vec<Bucket<SeverityLevel>> {
    profiling::scope!("aggregate_by_severity");
    let mut buckets = count_by(records, severity_key);
    buckets.sort_by(|a, b| b.key.cmp(&a.key));
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(service: &str, message: &str, score: f64) -> LogRecord {
        LogRecord::new("id", service, message, 0, score)
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_by_service(&[]).is_empty());
        assert!(aggregate_by_category(&[]).is_empty());
        assert!(aggregate_by_severity(&[]).is_empty());
    }

    #[test]
    fn test_service_sorted_descending_top_five() {
        let mut records = Vec::new();
        for (service, n) in [("a", 1), ("b", 4), ("c", 2), ("d", 6), ("e", 3), ("f", 5), ("g", 2)] {
            for _ in 0..n {
                records.push(record(service, "ok", 0.1));
            }
        }

        let buckets = aggregate_by_service(&records);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["d", "f", "b", "e", "c"]);
        assert!(buckets.windows(2).all(|pair| pair[0].count >= pair[1].count));
    }

    #[test]
    fn test_service_ties_keep_first_encountered_order() {
        let records = vec![
            record("zeta", "x", 0.0),
            record("alpha", "x", 0.0),
            record("zeta", "x", 0.0),
            record("alpha", "x", 0.0),
            record("mid", "x", 0.0),
        ];

        let buckets = aggregate_by_service(&records);
        assert_eq!(
            buckets,
            vec![
                Bucket { key: "zeta".to_string(), count: 2 },
                Bucket { key: "alpha".to_string(), count: 2 },
                Bucket { key: "mid".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_category_counts_cover_every_record() {
        let records = vec![
            record("a", "fatal exception in handler", -0.6),
            record("a", "ok", 0.2),
            record("b", "connection unavailable", -0.1),
            record("b", "Request timeout", -0.3),
            record("c", "job failed", -0.2),
            record("c", "Database connection error", -0.8),
        ];

        let buckets = aggregate_by_category(&records);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, records.len());
        assert_eq!(
            buckets,
            vec![
                Bucket { key: Category::Errors, count: 2 },
                Bucket { key: Category::Other, count: 1 },
                Bucket { key: Category::ConnectionIssues, count: 1 },
                Bucket { key: Category::Timeouts, count: 1 },
                Bucket { key: Category::Failures, count: 1 },
            ]
        );
    }

    #[test]
    fn test_severity_most_severe_first() {
        let records = vec![
            record("a", "x", 0.3),
            record("a", "x", -0.9),
            record("a", "x", -0.01),
            record("a", "x", 0.5),
        ];

        let buckets = aggregate_by_severity(&records);
        assert_eq!(
            buckets,
            vec![
                Bucket { key: SeverityLevel::Critical, count: 1 },
                Bucket { key: SeverityLevel::Low, count: 1 },
                Bucket { key: SeverityLevel::Normal, count: 2 },
            ]
        );
    }

    #[test]
    fn test_input_untouched() {
        let records = vec![record("b", "x", 0.0), record("a", "x", 0.0), record("a", "y", 0.0)];
        let before = records.clone();
        let _ = aggregate_by_service(&records);
        let _ = aggregate_by_category(&records);
        assert_eq!(records, before);
    }
}
