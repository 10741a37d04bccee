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

pub mod aggregate;
pub mod dashboard;
pub mod filter;
pub mod histogram;
pub mod refresher;
pub mod selection;
pub mod snapshot;
pub mod snapshot_cache;

pub use aggregate::{aggregate_by_category, aggregate_by_service, aggregate_by_severity, Bucket};
pub use dashboard::{Dashboard, DrillDownView, RecordView, Summary};
pub use filter::{filter_by_category, filter_by_service, filter_by_severity, Selection};
pub use histogram::{aggregate_by_day, DateBucket};
pub use refresher::{RefreshOutcome, RefreshTicket, Refresher};
pub use selection::DrillDown;
pub use snapshot::Snapshot;
pub use snapshot_cache::{Published, SnapshotCache};
