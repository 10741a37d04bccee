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

use crate::client::{FetchError, LogQuery, SnapshotSource};
use crate::core::dashboard::Dashboard;
use crate::core::snapshot::Snapshot;
use crate::core::snapshot_cache::SnapshotCache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Sequence number reserved for one refresh. Issued before fetching so the
/// order of tickets is the order in which refreshes were started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket {
    sequence: u64,
}

impl RefreshTicket {
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.sequence
    }
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The new dashboard is now the published one
    Applied(Arc<Dashboard>),
    /// A refresh started later already published; this result was dropped
    Stale { sequence: u64, latest: u64 },
}

impl RefreshOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Fetches snapshots from a source and publishes their dashboards, newest
/// started refresh wins.
pub struct Refresher<S> {
    source: S,
    cache: SnapshotCache,
    next_sequence: AtomicU64,
}

impl<S: SnapshotSource> Refresher<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: SnapshotCache::new(),
            next_sequence: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    pub fn begin(&self) -> RefreshTicket {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!("Refresh #{sequence} started");
        RefreshTicket { sequence }
    }

    /// Build the dashboard for `snapshot` and publish it under `ticket`
    pub fn complete(&self, ticket: RefreshTicket, snapshot: Snapshot) -> RefreshOutcome {
        let sequence = ticket.sequence;
        if let Some(latest) = self.cache.sequence().filter(|&latest| latest >= sequence) {
            tracing::debug!("Refresh #{sequence} is stale (#{latest} already published)");
            return RefreshOutcome::Stale { sequence, latest };
        }

        let dashboard = Arc::new(Dashboard::compute(snapshot));
        if self.cache.publish(sequence, Arc::clone(&dashboard)) {
            tracing::debug!("Refresh #{sequence} published");
            RefreshOutcome::Applied(dashboard)
        } else {
            // Lost the race against a newer refresh while computing
            let latest = self.cache.sequence().unwrap_or(sequence);
            tracing::debug!("Refresh #{sequence} is stale (#{latest} already published)");
            RefreshOutcome::Stale { sequence, latest }
        }
    }

    /// Fetch logs and anomalies, then publish the resulting dashboard.
    /// On failure the previously published dashboard stays in place.
    pub async fn refresh(&self, query: &LogQuery) -> Result<RefreshOutcome, FetchError> {
        let ticket = self.begin();
        tracing::info!(
            "Refreshing #{} from {}",
            ticket.sequence,
            self.source.describe()
        );

        let document = self
            .source
            .fetch_snapshot(query)
            .await
            .inspect_err(|e| tracing::warn!("Refresh #{} failed: {e}", ticket.sequence))?;

        let mut anomalies = document.anomalies;
        anomalies.records = query.scope_anomalies(anomalies.records, &document.logs.records);
        Ok(self.complete(ticket, Snapshot::from_parsed(document.logs, anomalies)))
    }
}
