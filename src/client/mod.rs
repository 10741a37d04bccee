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

//! Snapshot acquisition: the log service over HTTP, or a snapshot file.

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::LogServiceClient;

use crate::parser::{LogRecord, ParsedSnapshot, SnapshotDocument, SnapshotError};
use serde::Serialize;
use std::future::Future;
use thiserror::Error;

/// Which records to fetch. Serialized as the query string of `GET /logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Inclusive lower bound, epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    /// Inclusive upper bound, epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl LogQuery {
    /// Whether `record` passes the service and time window filters
    #[must_use]
    pub fn matches(&self, record: &LogRecord) -> bool {
        self.service_name
            .as_deref()
            .is_none_or(|name| record.service_name == name)
            && self.from.is_none_or(|from| record.timestamp >= from)
            && self.to.is_none_or(|to| record.timestamp <= to)
    }

    /// Filter `records` locally. With a limit, the newest records are kept,
    /// still in their input order.
    #[must_use]
    pub fn apply(&self, records: Vec<LogRecord>) -> Vec<LogRecord> {
        let matched: Vec<LogRecord> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();

        let Some(limit) = self.limit.filter(|&limit| limit < matched.len()) else {
            return matched;
        };

        let mut newest: Vec<usize> = (0..matched.len()).collect();
        newest.sort_by(|&a, &b| matched[b].timestamp.cmp(&matched[a].timestamp));
        let mut keep = vec![false; matched.len()];
        for &index in newest.iter().take(limit) {
            keep[index] = true;
        }

        matched
            .into_iter()
            .zip(keep)
            .filter_map(|(record, kept)| kept.then_some(record))
            .collect()
    }

    /// Narrow separately fetched anomalies to what `records`, already
    /// narrowed by this query, cover: same service and time window, and
    /// with a limit nothing older than the oldest kept record.
    #[must_use]
    pub fn scope_anomalies(&self, anomalies: Vec<LogRecord>, records: &[LogRecord]) -> Vec<LogRecord> {
        let oldest_kept = if self.limit.is_some() {
            let Some(oldest) = records.iter().map(|record| record.timestamp).min() else {
                return Vec::new();
            };
            Some(oldest)
        } else {
            None
        };

        anomalies
            .into_iter()
            .filter(|record| {
                self.matches(record) && oldest_kept.is_none_or(|oldest| record.timestamp >= oldest)
            })
            .collect()
    }
}

/// Errors acquiring a snapshot
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl FetchError {
    /// Whether the next refresh has a chance of succeeding where this one failed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { .. } => true,
            Self::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            Self::Snapshot(SnapshotError::Io { .. }) => true,
            Self::Client(_) | Self::Decode { .. } | Self::Snapshot(SnapshotError::Json(_)) => false,
        }
    }
}

/// Somewhere a snapshot's two record collections can be fetched from
pub trait SnapshotSource: Send + Sync {
    /// Records matching `query`
    fn fetch_logs(
        &self,
        query: &LogQuery,
    ) -> impl Future<Output = Result<ParsedSnapshot, FetchError>> + Send;

    /// Records the upstream model flagged as anomalous
    fn fetch_anomalies(&self) -> impl Future<Output = Result<ParsedSnapshot, FetchError>> + Send;

    /// Both collections for one refresh. Fetched concurrently unless the
    /// source can produce them together.
    fn fetch_snapshot(
        &self,
        query: &LogQuery,
    ) -> impl Future<Output = Result<SnapshotDocument, FetchError>> + Send {
        async move {
            let (logs, anomalies) =
                tokio::try_join!(self.fetch_logs(query), self.fetch_anomalies())?;
            Ok(SnapshotDocument { logs, anomalies })
        }
    }

    /// Human-readable origin, used in log messages
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, service: &str, timestamp: i64) -> LogRecord {
        LogRecord::new(id, service, "msg", timestamp, 0.0)
    }

    #[test]
    fn test_query_serialization_omits_absent_fields() {
        let query = LogQuery {
            service_name: Some("auth".to_string()),
            limit: Some(50),
            ..LogQuery::default()
        };
        let json = serde_json::to_value(&query).expect("serialize");
        assert_eq!(json, serde_json::json!({"serviceName": "auth", "limit": 50}));

        let empty = serde_json::to_value(LogQuery::default()).expect("serialize");
        assert_eq!(empty, serde_json::json!({}));
    }

    #[test]
    fn test_query_matches_window_inclusive() {
        let query = LogQuery {
            from: Some(100),
            to: Some(200),
            ..LogQuery::default()
        };
        assert!(!query.matches(&record("1", "a", 99)));
        assert!(query.matches(&record("2", "a", 100)));
        assert!(query.matches(&record("3", "a", 200)));
        assert!(!query.matches(&record("4", "a", 201)));
    }

    #[test]
    fn test_query_limit_keeps_newest_in_input_order() {
        let records = vec![
            record("1", "auth", 300),
            record("2", "billing", 100),
            record("3", "auth", 500),
            record("4", "auth", 200),
            record("5", "auth", 400),
        ];
        let query = LogQuery {
            service_name: Some("auth".to_string()),
            limit: Some(2),
            ..LogQuery::default()
        };

        let ids: Vec<String> = query.apply(records).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["3", "5"]);
    }

    #[test]
    fn test_scope_anomalies_follows_service_and_window() {
        let records = vec![record("1", "auth", 150)];
        let anomalies = vec![
            record("1", "auth", 150),
            record("2", "billing", 150),
            record("3", "auth", 50),
        ];
        let query = LogQuery {
            service_name: Some("auth".to_string()),
            from: Some(100),
            ..LogQuery::default()
        };

        let ids: Vec<String> = query
            .scope_anomalies(anomalies, &records)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_scope_anomalies_with_limit_drops_older_than_kept() {
        let query = LogQuery {
            limit: Some(2),
            ..LogQuery::default()
        };
        let records = query.apply(vec![
            record("1", "auth", 100),
            record("2", "auth", 200),
            record("3", "auth", 300),
        ]);
        let anomalies = vec![record("1", "auth", 100), record("3", "auth", 300)];

        let ids: Vec<String> = query
            .scope_anomalies(anomalies.clone(), &records)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["3"]);
        assert!(query.scope_anomalies(anomalies, &[]).is_empty());
    }

    #[test]
    fn test_retryable_classification() {
        let server = FetchError::Status {
            url: "http://x/logs".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        let throttled = FetchError::Status {
            url: "http://x/logs".to_string(),
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
        };
        let not_found = FetchError::Status {
            url: "http://x/logs".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(server.is_retryable());
        assert!(throttled.is_retryable());
        assert!(!not_found.is_retryable());

        let bad_json = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid");
        assert!(!FetchError::from(SnapshotError::Json(bad_json)).is_retryable());
    }
}
