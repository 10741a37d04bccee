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

//! Command-line pieces shared by both binaries.

use crate::anomaly::{Category, SeverityLevel};
use crate::core::Selection;
use clap::Args;
use tracing_subscriber::EnvFilter;

/// Drill-down flags. At most one may be given.
#[derive(Args, Debug, Clone, Default)]
pub struct DrillArgs {
    /// Show the records of one service
    #[arg(long, value_name = "SERVICE", group = "drill")]
    pub drill_service: Option<String>,

    /// Show the records of one category (errors, timeouts, connection-issues, failures, other)
    #[arg(long, value_name = "CATEGORY", group = "drill")]
    pub drill_category: Option<Category>,

    /// Show the records of one severity tier (critical, severe, moderate, low, normal)
    #[arg(long, value_name = "LEVEL", group = "drill")]
    pub drill_severity: Option<SeverityLevel>,
}

impl DrillArgs {
    /// The bucket selected on the command line, if any
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        if let Some(service) = &self.drill_service {
            return Some(Selection::Service(service.clone()));
        }
        self.drill_category
            .map(Selection::Category)
            .or_else(|| self.drill_severity.map(Selection::Severity))
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
