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

//! Latest-wins holder for the published dashboard.
//!
//! Each dashboard is tagged with the sequence number of the refresh that
//! produced it. A publish is applied only when its sequence is newer than
//! the one currently held, so a slow refresh finishing late can never
//! replace the result of a refresh that started after it.

use crate::core::dashboard::Dashboard;
use std::sync::Arc;
use tokio::sync::watch;

/// A dashboard together with the refresh sequence that produced it
#[derive(Debug, Clone)]
pub struct Published {
    pub sequence: u64,
    pub dashboard: Arc<Dashboard>,
}

pub struct SnapshotCache {
    tx: watch::Sender<Option<Published>>,
}

impl SnapshotCache {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Publish `dashboard` under `sequence`. Returns whether it replaced
    /// the held value; older or equal sequences are discarded.
    pub fn publish(&self, sequence: u64, dashboard: Arc<Dashboard>) -> bool {
        self.tx.send_if_modified(|held| {
            if held.as_ref().is_some_and(|current| current.sequence >= sequence) {
                return false;
            }
            *held = Some(Published {
                sequence,
                dashboard,
            });
            true
        })
    }

    /// The most recently published dashboard, if any
    #[must_use]
    pub fn latest(&self) -> Option<Published> {
        self.tx.borrow().clone()
    }

    /// Sequence number of the held dashboard
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.tx.borrow().as_ref().map(|published| published.sequence)
    }

    /// Receiver notified on every applied publish
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Published>> {
        self.tx.subscribe()
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}
