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

use super::{FetchError, LogQuery, SnapshotSource};
use crate::parser::{parse_snapshot_document, ParsedSnapshot, SnapshotDocument, SnapshotError};
use std::path::{Path, PathBuf};

/// Serves snapshots from a JSON document on disk. The file is re-read on
/// every fetch so watch mode picks up edits.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<SnapshotDocument, FetchError> {
        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| SnapshotError::Io {
                    path: self.path.clone(),
                    source,
                })?;
        Ok(parse_snapshot_document(&contents)?)
    }
}

impl SnapshotSource for FileSource {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<ParsedSnapshot, FetchError> {
        Ok(self.fetch_snapshot(query).await?.logs)
    }

    async fn fetch_anomalies(&self) -> Result<ParsedSnapshot, FetchError> {
        Ok(self.read_document().await?.anomalies)
    }

    /// One read per refresh, so both collections come from the same file contents
    async fn fetch_snapshot(&self, query: &LogQuery) -> Result<SnapshotDocument, FetchError> {
        let document = self.read_document().await?;
        Ok(SnapshotDocument {
            logs: ParsedSnapshot {
                records: query.apply(document.logs.records),
                rejected: document.logs.rejected,
            },
            anomalies: document.anomalies,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
