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

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// A single log record as served by the log service, already scored by the
/// anomaly model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: String,
    pub service_name: String,
    pub message: String,
    /// Event time in epoch milliseconds
    pub timestamp: i64,
    /// Flag set by the upstream model. Severity classification does not look at it.
    pub is_anomaly: bool,
    /// Raw model score, nominally in [-1, 1]. More negative = more anomalous.
    pub score: f64,
}

impl LogRecord {
    pub fn new(
        id: impl Into<String>,
        service_name: impl Into<String>,
        message: impl Into<String>,
        timestamp: i64,
        score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            service_name: service_name.into(),
            message: message.into(),
            timestamp,
            is_anomaly: false,
            score,
        }
    }

    #[must_use]
    pub const fn with_anomaly_flag(mut self, is_anomaly: bool) -> Self {
        self.is_anomaly = is_anomaly;
        self
    }

    /// Event time in the viewer's local time zone
    #[must_use]
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.timestamp).single()
    }

    /// Calendar date of the event in the viewer's local time zone
    #[must_use]
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.local_time().map(|ts| ts.date_naive())
    }
}
