use crate::parser::{LogRecord, ParsedSnapshot, RejectedRecord, SnapshotDocument};
use chrono::{DateTime, Local};
use std::collections::HashSet;

/// The immutable set of records fetched by one refresh
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Vec<LogRecord>,
    /// Records the upstream model flagged, fetched separately
    pub anomalies: Vec<LogRecord>,
    /// Records excluded during ingestion. A bad record present in both
    /// collections is listed once.
    pub rejected: Vec<RejectedRecord>,
    pub fetched_at: DateTime<Local>,
}

impl Snapshot {
    #[must_use]
    pub fn new(records: Vec<LogRecord>, anomalies: Vec<LogRecord>) -> Self {
        Self {
            records,
            anomalies,
            rejected: Vec::new(),
            fetched_at: Local::now(),
        }
    }

    #[must_use]
    pub fn from_parsed(logs: ParsedSnapshot, anomalies: ParsedSnapshot) -> Self {
        let mut rejected = logs.rejected;
        let seen: HashSet<String> = rejected.iter().filter_map(|r| r.id.clone()).collect();
        // Anomalies are a subset of the logs, so the same bad record shows up twice
        rejected.extend(
            anomalies
                .rejected
                .into_iter()
                .filter(|r| r.id.as_ref().is_none_or(|id| !seen.contains(id))),
        );

        Self {
            records: logs.records,
            anomalies: anomalies.records,
            rejected,
            fetched_at: Local::now(),
        }
    }
}

impl From<SnapshotDocument> for Snapshot {
    fn from(document: SnapshotDocument) -> Self {
        Self::from_parsed(document.logs, document.anomalies)
    }
}
