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

//! Plain-text rendering of a dashboard for the terminal.

use crate::core::{Dashboard, DrillDownView, RecordView};
use chrono::{Local, TimeZone};
use std::fmt::Display;
use std::io::{self, Write};

const BAR_WIDTH: usize = 30;
const MESSAGE_WIDTH: usize = 60;

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let width = (count * BAR_WIDTH).div_ceil(max);
    "█".repeat(width)
}

fn chart<W, K, I>(out: &mut W, title: &str, rows: I) -> io::Result<()>
where
    W: Write,
    K: Display,
    I: IntoIterator<Item = (K, usize)>,
{
    let rows: Vec<(String, usize)> = rows
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect();

    writeln!(out, "{title}")?;
    if rows.is_empty() {
        writeln!(out, "  (no data)")?;
        return Ok(());
    }

    let max = rows.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let label_width = rows.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
    for (key, count) in &rows {
        writeln!(out, "  {key:<label_width$}  {count:>6}  {}", bar(*count, max))?;
    }
    Ok(())
}

fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map_or_else(|| millis.to_string(), |time| time.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn truncate(message: &str, width: usize) -> String {
    if message.chars().count() <= width {
        message.to_string()
    } else {
        let mut shortened: String = message.chars().take(width.saturating_sub(1)).collect();
        shortened.push('…');
        shortened
    }
}

/// Write the summary followed by the four charts
pub fn render_dashboard<W: Write>(out: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    let summary = &dashboard.summary;
    writeln!(
        out,
        "Snapshot of {}",
        dashboard.snapshot().fetched_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(
        out,
        "  {} records, {} anomalies ({}%), {} services",
        summary.total, summary.anomalies, summary.anomaly_rate, summary.services
    )?;
    if summary.rejected > 0 {
        writeln!(out, "  {} records rejected during ingestion", summary.rejected)?;
    }
    if let Some(level) = summary.most_severe {
        writeln!(out, "  Most severe: {level}")?;
    }
    writeln!(out)?;

    chart(
        out,
        "Records per day",
        dashboard
            .time_series
            .iter()
            .map(|bucket| (bucket.date, bucket.count)),
    )?;
    writeln!(out)?;
    chart(
        out,
        "Top services",
        dashboard
            .services
            .iter()
            .map(|bucket| (bucket.key.as_str(), bucket.count)),
    )?;
    writeln!(out)?;
    chart(
        out,
        "Categories",
        dashboard
            .categories
            .iter()
            .map(|bucket| (bucket.key, bucket.count)),
    )?;
    writeln!(out)?;
    chart(
        out,
        "Severity",
        dashboard
            .severities
            .iter()
            .map(|bucket| (bucket.key, bucket.count)),
    )
}

/// Write one line per record: time, severity, score, service, category, message
pub fn render_records<W: Write>(out: &mut W, records: &[RecordView<'_>]) -> io::Result<()> {
    if records.is_empty() {
        writeln!(out, "  (no records)")?;
        return Ok(());
    }
    for view in records {
        writeln!(
            out,
            "  {}  {:<8}  {:>4.1}  {:<20}  {:<17}  {}",
            format_timestamp(view.record.timestamp),
            view.severity.label,
            view.normalized_score,
            view.record.service_name,
            view.category.label(),
            truncate(&view.record.message, MESSAGE_WIDTH)
        )?;
    }
    Ok(())
}

pub fn render_drill_down<W: Write>(out: &mut W, view: &DrillDownView<'_>) -> io::Result<()> {
    writeln!(out, "Records for {} ({})", view.selection, view.count)?;
    render_records(out, &view.records)
}

pub fn render_anomalies<W: Write>(out: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    let anomalies = dashboard.anomaly_views();
    writeln!(out, "Anomalies ({})", anomalies.len())?;
    render_records(out, &anomalies)
}
