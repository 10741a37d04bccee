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

//! Severity tiers derived from the raw model score.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete severity, ordered so that a greater value is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Normal,
    Low,
    Moderate,
    Severe,
    Critical,
}

/// Display information for a severity badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityTier {
    pub level: SeverityLevel,
    pub label: &'static str,
    pub color: &'static str,
    pub background_color: &'static str,
    pub border_color: &'static str,
}

/// Exclusive upper bounds, checked in order. First match wins; anything
/// not below the last bound is `Normal`. A score equal to a bound therefore
/// lands in the less severe tier.
const SEVERITY_RULES: [(f64, SeverityLevel); 4] = [
    (-0.5, SeverityLevel::Critical),
    (-0.2, SeverityLevel::Severe),
    (-0.05, SeverityLevel::Moderate),
    (0.0, SeverityLevel::Low),
];

impl SeverityLevel {
    /// All levels, most severe first
    pub const ALL: [Self; 5] = [
        Self::Critical,
        Self::Severe,
        Self::Moderate,
        Self::Low,
        Self::Normal,
    ];

    /// Classify a raw score. Uses the raw value, no clamping.
    /// The model's `isAnomaly` flag is deliberately not an input.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        SEVERITY_RULES
            .iter()
            .find(|(bound, _)| score < *bound)
            .map_or(Self::Normal, |&(_, level)| level)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Severe => "Severe",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::Normal => "Normal",
        }
    }

    #[must_use]
    pub const fn tier(self) -> SeverityTier {
        let (color, background_color, border_color) = match self {
            Self::Critical => ("#dc2626", "rgba(220, 38, 38, 0.1)", "rgba(220, 38, 38, 0.3)"),
            Self::Severe => ("#ea580c", "rgba(234, 88, 12, 0.1)", "rgba(234, 88, 12, 0.3)"),
            Self::Moderate => ("#d97706", "rgba(217, 119, 6, 0.1)", "rgba(217, 119, 6, 0.3)"),
            Self::Low => ("#ca8a04", "rgba(202, 138, 4, 0.1)", "rgba(202, 138, 4, 0.3)"),
            Self::Normal => ("#16a34a", "rgba(22, 163, 74, 0.1)", "rgba(22, 163, 74, 0.3)"),
        };
        SeverityTier {
            level: self,
            label: self.label(),
            color,
            background_color,
            border_color,
        }
    }
}

/// Severity tier for a raw model score
#[must_use]
pub fn classify(score: f64) -> SeverityTier {
    SeverityLevel::from_score(score).tier()
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeverityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown severity '{s}' (expected critical, severe, moderate, low or normal)")
            })
    }
}
