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

//! Daily time series of record counts.
//!
//! Days are calendar dates in the viewer's local time zone, so the same
//! snapshot can bucket differently on machines in different zones.

use crate::parser::LogRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of most recent days kept in the time series
pub const MAX_DAYS: usize = 10;

/// Record count for one local calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBucket {
    pub date: NaiveDate,
    pub count: usize,
}

/// Count records per local date, oldest first, keeping only the most recent
/// [`MAX_DAYS`] dates. Records whose timestamp has no local date are left
/// out of every bucket.
#[must_use]
pub fn aggregate_by_day(records: &[LogRecord]) -> Vec<DateBucket> {
    profiling::scope!("aggregate_by_day");

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records {
        let Some(date) = record.local_date() else {
            tracing::trace!(
                "Record {} has no local date (timestamp {}), not bucketed",
                record.id,
                record.timestamp
            );
            continue;
        };
        *per_day.entry(date).or_insert(0) += 1;
    }

    let skip = per_day.len().saturating_sub(MAX_DAYS);
    per_day
        .into_iter()
        .skip(skip)
        .map(|(date, count)| DateBucket { date, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn at(year: i32, month: u32, day: u32, hour: u32) -> i64 {
        Local
            .with_ymd_and_hms(year, month, day, hour, 0, 0)
            .earliest()
            .expect("valid local time")
            .timestamp_millis()
    }

    fn record(id: usize, timestamp: i64) -> LogRecord {
        LogRecord::new(id.to_string(), "svc", "msg", timestamp, 0.0)
    }

    #[test]
    fn test_empty() {
        assert!(aggregate_by_day(&[]).is_empty());
    }

    #[test]
    fn test_out_of_range_timestamp_is_not_bucketed() {
        let records = vec![
            record(1, at(2025, 3, 1, 9)),
            record(2, i64::MAX),
            record(3, at(2025, 3, 1, 12)),
        ];

        let buckets = aggregate_by_day(&records);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 2);
    }

    #[test]
    fn test_groups_by_local_date_ascending() {
        let records = vec![
            record(1, at(2025, 3, 2, 9)),
            record(2, at(2025, 3, 1, 23)),
            record(3, at(2025, 3, 2, 18)),
            record(4, at(2025, 3, 1, 0)),
            record(5, at(2025, 3, 2, 0)),
        ];

        let buckets = aggregate_by_day(&records);
        assert_eq!(
            buckets,
            vec![
                DateBucket {
                    date: NaiveDate::from_ymd_opt(2025, 3, 1).expect("date"),
                    count: 2
                },
                DateBucket {
                    date: NaiveDate::from_ymd_opt(2025, 3, 2).expect("date"),
                    count: 3
                },
            ]
        );
    }

    #[test]
    fn test_keeps_most_recent_days() {
        let records: Vec<LogRecord> = (1..=14_u32)
            .rev()
            .map(|day| record(day as usize, at(2025, 6, day, 12)))
            .collect();

        let buckets = aggregate_by_day(&records);
        assert_eq!(buckets.len(), MAX_DAYS);
        assert_eq!(buckets[0].date, NaiveDate::from_ymd_opt(2025, 6, 5).expect("date"));
        assert_eq!(
            buckets[MAX_DAYS - 1].date,
            NaiveDate::from_ymd_opt(2025, 6, 14).expect("date")
        );
        assert!(buckets.windows(2).all(|pair| pair[0].date < pair[1].date));
        assert!(buckets.iter().all(|bucket| bucket.count == 1));
    }

    #[test]
    fn test_dates_sort_chronologically_across_years() {
        let records = vec![
            record(1, at(2026, 1, 2, 12)),
            record(2, at(2025, 12, 31, 12)),
            record(3, at(2025, 2, 1, 12)),
        ];
        let dates: Vec<String> = aggregate_by_day(&records)
            .iter()
            .map(|bucket| bucket.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2025-02-01", "2025-12-31", "2026-01-02"]);
    }
}
