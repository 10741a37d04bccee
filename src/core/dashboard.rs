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

use crate::anomaly::{category, normalizer, severity, Category, SeverityLevel, SeverityTier};
use crate::core::aggregate::{
    aggregate_by_category, aggregate_by_service, aggregate_by_severity, Bucket,
};
use crate::core::filter::Selection;
use crate::core::histogram::{aggregate_by_day, DateBucket};
use crate::core::snapshot::Snapshot;
use crate::parser::LogRecord;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;

/// Headline numbers shown above the charts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub anomalies: usize,
    /// Percentage of anomalies relative to all records, one decimal
    pub anomaly_rate: f64,
    /// Distinct service names
    pub services: usize,
    pub rejected: usize,
    pub most_severe: Option<SeverityLevel>,
}

impl Summary {
    fn from_snapshot(snapshot: &Snapshot) -> Self {
        let records = &snapshot.records;
        let total = records.len();
        let anomalies = snapshot.anomalies.len();
        let anomaly_rate = if total == 0 {
            0.0
        } else {
            (anomalies as f64 / total as f64 * 1000.0).round() / 10.0
        };
        let services = records
            .iter()
            .map(|record| record.service_name.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total,
            anomalies,
            anomaly_rate,
            services,
            rejected: snapshot.rejected.len(),
            most_severe: records
                .iter()
                .map(|record| SeverityLevel::from_score(record.score))
                .max(),
        }
    }
}

/// A record decorated with everything the detail list displays
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView<'a> {
    #[serde(flatten)]
    pub record: &'a LogRecord,
    pub severity: SeverityTier,
    pub normalized_score: f64,
    pub category: Category,
}

impl<'a> From<&'a LogRecord> for RecordView<'a> {
    fn from(record: &'a LogRecord) -> Self {
        Self {
            record,
            severity: severity::classify(record.score),
            normalized_score: normalizer::to_ten_scale(record.score),
            category: category::classify(&record.message),
        }
    }
}

/// Records behind one selected bucket
#[derive(Debug, Clone, Serialize)]
pub struct DrillDownView<'a> {
    pub selection: Selection,
    pub count: usize,
    pub records: Vec<RecordView<'a>>,
}

/// Everything derived from one snapshot. Immutable once computed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(skip)]
    snapshot: Snapshot,
    pub generated_at: DateTime<Local>,
    pub summary: Summary,
    pub time_series: Vec<DateBucket>,
    pub services: Vec<Bucket<String>>,
    pub categories: Vec<Bucket<Category>>,
    pub severities: Vec<Bucket<SeverityLevel>>,
}

impl Dashboard {
    #[must_use]
    pub fn compute(snapshot: Snapshot) -> Self {
        profiling::scope!("Dashboard::compute");

        let records = snapshot.records.as_slice();
        let ((time_series, services), (categories, severities)) = rayon::join(
            || {
                rayon::join(
                    || aggregate_by_day(records),
                    || aggregate_by_service(records),
                )
            },
            || {
                rayon::join(
                    || aggregate_by_category(records),
                    || aggregate_by_severity(records),
                )
            },
        );
        let summary = Summary::from_snapshot(&snapshot);

        tracing::debug!(
            "Computed dashboard: {} records, {} anomalies, {} days, {} services, {} categories",
            summary.total,
            summary.anomalies,
            time_series.len(),
            services.len(),
            categories.len()
        );

        Self {
            snapshot,
            generated_at: Local::now(),
            summary,
            time_series,
            services,
            categories,
            severities,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn records(&self) -> &[LogRecord] {
        &self.snapshot.records
    }

    #[must_use]
    pub fn anomalies(&self) -> &[LogRecord] {
        &self.snapshot.anomalies
    }

    /// Records of the snapshot that belong to the selected bucket
    #[must_use]
    pub fn drill_down(&self, selection: &Selection) -> Vec<&LogRecord> {
        selection.apply(self.records())
    }

    #[must_use]
    pub fn drill_down_view(&self, selection: &Selection) -> DrillDownView<'_> {
        let records: Vec<RecordView<'_>> = self
            .drill_down(selection)
            .into_iter()
            .map(RecordView::from)
            .collect();
        DrillDownView {
            selection: selection.clone(),
            count: records.len(),
            records,
        }
    }

    /// The anomaly detail list
    #[must_use]
    pub fn anomaly_views(&self) -> Vec<RecordView<'_>> {
        self.anomalies().iter().map(RecordView::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dashboard {
        let records = vec![
            LogRecord::new("1", "auth", "fatal exception in handler", 1_700_000_000_000, -0.6)
                .with_anomaly_flag(true),
            LogRecord::new("2", "auth", "ok", 1_700_000_060_000, 0.2),
            LogRecord::new("3", "billing", "connection unavailable", 1_700_000_120_000, -0.1),
        ];
        let anomalies = vec![records[0].clone()];
        Dashboard::compute(Snapshot::new(records, anomalies))
    }

    #[test]
    fn test_end_to_end_scenario() {
        let dashboard = sample();

        let tiers: Vec<SeverityLevel> = dashboard
            .records()
            .iter()
            .map(|record| RecordView::from(record).severity.level)
            .collect();
        assert_eq!(
            tiers,
            vec![SeverityLevel::Critical, SeverityLevel::Normal, SeverityLevel::Moderate]
        );

        assert_eq!(
            dashboard.categories,
            vec![
                Bucket { key: Category::Errors, count: 1 },
                Bucket { key: Category::Other, count: 1 },
                Bucket { key: Category::ConnectionIssues, count: 1 },
            ]
        );
        assert_eq!(
            dashboard.services,
            vec![
                Bucket { key: "auth".to_string(), count: 2 },
                Bucket { key: "billing".to_string(), count: 1 },
            ]
        );

        let auth = dashboard.drill_down(&Selection::Service("auth".to_string()));
        let ids: Vec<&str> = auth.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary;
        assert_eq!(summary.total, 3);
        assert_eq!(summary.anomalies, 1);
        assert!((summary.anomaly_rate - 33.3).abs() < f64::EPSILON);
        assert_eq!(summary.services, 2);
        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.most_severe, Some(SeverityLevel::Critical));
    }

    #[test]
    fn test_empty_snapshot() {
        let dashboard = Dashboard::compute(Snapshot::new(Vec::new(), Vec::new()));
        assert_eq!(dashboard.summary.total, 0);
        assert!(dashboard.summary.anomaly_rate.abs() < f64::EPSILON);
        assert_eq!(dashboard.summary.most_severe, None);
        assert!(dashboard.time_series.is_empty());
        assert!(dashboard.services.is_empty());
        assert!(dashboard.categories.is_empty());
        assert!(dashboard.severities.is_empty());
        assert!(dashboard
            .drill_down(&Selection::Category(Category::Errors))
            .is_empty());
    }

    #[test]
    fn test_drill_down_view_counts() {
        let dashboard = sample();
        for bucket in &dashboard.severities {
            let view = dashboard.drill_down_view(&Selection::Severity(bucket.key));
            assert_eq!(view.count, bucket.count);
            assert_eq!(view.records.len(), bucket.count);
        }
    }

    #[test]
    fn test_record_view_serialization() {
        let record = LogRecord::new("7", "auth", "Request timeout", 0, -0.4);
        let json = serde_json::to_value(RecordView::from(&record)).expect("serialize");
        assert_eq!(json["id"], "7");
        assert_eq!(json["serviceName"], "auth");
        assert_eq!(json["category"], "Timeouts");
        assert_eq!(json["severity"]["label"], "Severe");
        assert_eq!(json["normalizedScore"], 7.3);
    }

    #[test]
    fn test_dashboard_serialization_skips_snapshot() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert!(json.get("snapshot").is_none());
        assert_eq!(json["summary"]["total"], 3);
        assert_eq!(json["severities"][0]["key"], "critical");
        assert!(json["timeSeries"][0]["date"].is_string());
    }
}
