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
use crate::config::GlobalConfig;
use crate::parser::{parse_records, ParsedSnapshot};
use serde_json::Value;
use std::time::Duration;

/// Client for the log service REST API. Performs no retries.
#[derive(Debug, Clone)]
pub struct LogServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl LogServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("logsight/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &GlobalConfig) -> Result<Self, FetchError> {
        Self::new(config.log_service_url.clone(), config.request_timeout())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_records(
        &self,
        path: &str,
        query: Option<&LogQuery>,
    ) -> Result<ParsedSnapshot, FetchError> {
        let url = self.endpoint(path);
        tracing::debug!("GET {url}");

        let mut request = self.client.get(&url);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|source| FetchError::Http {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{url} returned {status}");
            return Err(FetchError::Status { url, status });
        }

        let values: Vec<Value> = response
            .json()
            .await
            .map_err(|source| FetchError::Decode {
                url: url.clone(),
                source,
            })?;
        tracing::debug!("{url}: received {} records", values.len());

        Ok(parse_records(values))
    }
}

impl SnapshotSource for LogServiceClient {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<ParsedSnapshot, FetchError> {
        self.get_records("/logs", Some(query)).await
    }

    async fn fetch_anomalies(&self) -> Result<ParsedSnapshot, FetchError> {
        self.get_records("/logs/anomalies", None).await
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
