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

//! Snapshot ingestion.
//!
//! Records arrive as loosely-typed JSON. Every record is validated on its
//! own: a malformed record is rejected and reported, the rest of the
//! snapshot is kept.

pub mod record;

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use record::LogRecord;

/// Why a single record was excluded from a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("serviceName must not be empty")]
    EmptyServiceName,
    #[error("score must be a finite number")]
    NonFiniteScore,
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Errors reading a whole snapshot document
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A record that failed validation, with its position in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub index: usize,
    /// The record's `id`, when it carried a usable one
    pub id: Option<String>,
    pub reason: RecordError,
}

/// Result of validating a batch of records
#[derive(Debug, Clone, Default)]
pub struct ParsedSnapshot {
    pub records: Vec<LogRecord>,
    pub rejected: Vec<RejectedRecord>,
}

/// Both record collections of a snapshot document
#[derive(Debug, Clone, Default)]
pub struct SnapshotDocument {
    pub logs: ParsedSnapshot,
    pub anomalies: ParsedSnapshot,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    id: Option<RawId>,
    #[serde(alias = "service")]
    service_name: Option<String>,
    message: Option<String>,
    timestamp: Option<RawTimestamp>,
    is_anomaly: Option<bool>,
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    List(Vec<Value>),
    Split {
        logs: Vec<Value>,
        #[serde(default)]
        anomalies: Option<Vec<Value>>,
    },
}

impl TryFrom<RawRecord> for LogRecord {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let id = match raw.id.ok_or(RecordError::MissingField("id"))? {
            RawId::Text(text) => text,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        };

        let service_name = raw
            .service_name
            .ok_or(RecordError::MissingField("serviceName"))?;
        if service_name.trim().is_empty() {
            return Err(RecordError::EmptyServiceName);
        }

        let message = raw.message.ok_or(RecordError::MissingField("message"))?;

        let timestamp = match raw.timestamp.ok_or(RecordError::MissingField("timestamp"))? {
            RawTimestamp::Millis(ms) => validate_millis(ms)?,
            RawTimestamp::Text(text) => parse_timestamp_text(&text)?,
        };

        let score = raw.score.ok_or(RecordError::MissingField("score"))?;
        if !score.is_finite() {
            return Err(RecordError::NonFiniteScore);
        }

        Ok(Self {
            id,
            service_name,
            message,
            timestamp,
            is_anomaly: raw.is_anomaly.unwrap_or(false),
            score,
        })
    }
}

fn validate_millis(ms: i64) -> Result<i64, RecordError> {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|_| ms)
        .ok_or_else(|| RecordError::InvalidTimestamp(format!("{ms} is out of range")))
}

/// Parse a textual timestamp: RFC 3339 first, then a naive ISO date-time in local time
fn parse_timestamp_text(text: &str) -> Result<i64, RecordError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.timestamp_millis());
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| resolve_local(&Local, &naive))
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| RecordError::InvalidTimestamp(text.to_string()))
}

/// Pin a wall-clock time to an instant in `tz`. Ambiguous times take the
/// earlier instant; times skipped by a forward clock change are moved
/// forward by the usual one-hour gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(naive).earliest().or_else(|| {
        let shifted = naive.checked_add_signed(TimeDelta::hours(1))?;
        tz.from_local_datetime(&shifted).earliest()
    })
}

/// Validate a single JSON value as a log record
pub fn parse_record(value: Value) -> Result<LogRecord, RecordError> {
    let raw: RawRecord =
        serde_json::from_value(value).map_err(|e| RecordError::Malformed(e.to_string()))?;
    LogRecord::try_from(raw)
}

fn raw_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

/// Validate every value independently, keeping the good records in input order.
pub fn parse_records(values: Vec<Value>) -> ParsedSnapshot {
    profiling::scope!("parse_records");

    let mut parsed = ParsedSnapshot::default();
    for (index, value) in values.into_iter().enumerate() {
        let id = raw_id(&value);
        match parse_record(value) {
            Ok(record) => parsed.records.push(record),
            Err(reason) => {
                tracing::warn!("Rejected log record #{index}: {reason}");
                parsed.rejected.push(RejectedRecord { index, id, reason });
            }
        }
    }

    if !parsed.rejected.is_empty() {
        tracing::info!(
            "Accepted {} log records, rejected {}",
            parsed.records.len(),
            parsed.rejected.len()
        );
    }
    parsed
}

/// Parse a snapshot document.
///
/// Accepts either a plain array of records or `{ "logs": [...], "anomalies": [...] }`.
/// Without an explicit `anomalies` list, the records flagged `isAnomaly` are used.
pub fn parse_snapshot_document(text: &str) -> Result<SnapshotDocument, SnapshotError> {
    let (logs, anomalies) = match serde_json::from_str::<RawDocument>(text)? {
        RawDocument::List(logs) => (logs, None),
        RawDocument::Split { logs, anomalies } => (logs, anomalies),
    };

    let logs = parse_records(logs);
    let anomalies = anomalies.map_or_else(
        || ParsedSnapshot {
            records: logs
                .records
                .iter()
                .filter(|record| record.is_anomaly)
                .cloned()
                .collect(),
            rejected: Vec::new(),
        },
        parse_records,
    );

    Ok(SnapshotDocument { logs, anomalies })
}

/// Read and parse a snapshot document from disk
pub fn load_snapshot_file(path: &Path) -> Result<SnapshotDocument, SnapshotError> {
    tracing::info!("Loading snapshot from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot_document(&contents)
}
