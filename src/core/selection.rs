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

use crate::core::filter::Selection;
use crate::parser::LogRecord;

/// Tracks the currently selected chart bucket. Lives only as long as the
/// view; it is never persisted.
#[derive(Debug, Clone, Default)]
pub struct DrillDown {
    selection: Option<Selection>,
}

impl DrillDown {
    #[must_use]
    pub const fn new() -> Self {
        Self { selection: None }
    }

    /// Select a bucket, replacing any previous selection
    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    /// Select a bucket, or clear the selection when that bucket is already selected.
    /// Returns whether a bucket is selected afterwards.
    pub fn toggle(&mut self, selection: Selection) -> bool {
        if self.is_selected(&selection) {
            self.selection = None;
            false
        } else {
            self.selection = Some(selection);
            true
        }
    }

    pub fn clear(&mut self) {
        self.selection = None;
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn is_selected(&self, selection: &Selection) -> bool {
        self.selection.as_ref() == Some(selection)
    }

    /// Records to show in the detail list: the selected bucket, or everything
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [LogRecord]) -> Vec<&'a LogRecord> {
        self.selection
            .as_ref()
            .map_or_else(|| records.iter().collect(), |selection| selection.apply(records))
    }
}
