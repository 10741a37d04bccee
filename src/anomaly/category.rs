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

//! Message categories.
//!
//! A message belongs to exactly one category. The rules below are tried in
//! order and the first match wins, so "connection error" is an error, not a
//! connection issue. Aggregation and drill-down filtering both go through
//! [`classify`]; there is no second copy of these rules.

use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Errors,
    Timeouts,
    #[serde(rename = "Connection Issues")]
    ConnectionIssues,
    Failures,
    Other,
}

/// Keyword sets in priority order. Matching is a case-insensitive substring search.
const CATEGORY_KEYWORDS: [(Category, &[&str]); 4] = [
    (Category::Errors, &["error", "exception"]),
    (Category::Timeouts, &["timeout"]),
    (Category::ConnectionIssues, &["connection", "unavailable"]),
    (Category::Failures, &["fail"]),
];

struct CategoryRule {
    category: Category,
    pattern: Regex,
}

impl CategoryRule {
    fn new(category: Category, keywords: &[&str]) -> Self {
        let pattern = Regex::new(&format!("(?i)(?:{})", keywords.join("|")))
            .expect("category keywords form a valid pattern");
        Self { category, pattern }
    }

    fn matches(&self, message: &str) -> bool {
        self.pattern.is_match(message).unwrap_or(false)
    }
}

static CATEGORY_RULES: LazyLock<Vec<CategoryRule>> = LazyLock::new(|| {
    CATEGORY_KEYWORDS
        .iter()
        .map(|(category, keywords)| CategoryRule::new(*category, keywords))
        .collect()
});

/// Category of a log message. Total: unmatched messages are `Other`.
#[must_use]
pub fn classify(message: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.matches(message))
        .map_or(Category::Other, |rule| rule.category)
}

impl Category {
    /// All categories in rule priority order, `Other` last
    pub const ALL: [Self; 5] = [
        Self::Errors,
        Self::Timeouts,
        Self::ConnectionIssues,
        Self::Failures,
        Self::Other,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Errors => "Errors",
            Self::Timeouts => "Timeouts",
            Self::ConnectionIssues => "Connection Issues",
            Self::Failures => "Failures",
            Self::Other => "Other",
        }
    }

    /// Keywords that select this category; empty for `Other`
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        CATEGORY_KEYWORDS
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the display label ("Connection Issues") or a kebab-case form
    /// ("connection-issues"), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                format!(
                    "unknown category '{s}' (expected errors, timeouts, connection-issues, failures or other)"
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_category() {
        assert_eq!(classify("NullPointerException thrown"), Category::Errors);
        assert_eq!(classify("Database error"), Category::Errors);
        assert_eq!(classify("Request timeout after 30s"), Category::Timeouts);
        assert_eq!(classify("Service unavailable"), Category::ConnectionIssues);
        assert_eq!(classify("connection reset by peer"), Category::ConnectionIssues);
        assert_eq!(classify("User login failed"), Category::Failures);
        assert_eq!(classify("random informational text"), Category::Other);
        assert_eq!(classify(""), Category::Other);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(classify("connection error occurred"), Category::Errors);
        assert_eq!(classify("Database connection timeout"), Category::Timeouts);
        assert_eq!(classify("timeout caused exception"), Category::Errors);
        assert_eq!(classify("connection failed"), Category::ConnectionIssues);
    }

    #[test]
    fn test_case_insensitive_substring() {
        assert_eq!(classify("PAYMENT GATEWAY ERROR"), Category::Errors);
        assert_eq!(classify("ReadTimeoutException"), Category::Errors);
        assert_eq!(classify("jobFAILURE"), Category::Failures);
        assert_eq!(classify("UnAvailable"), Category::ConnectionIssues);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_value(Category::ConnectionIssues).expect("serialize"),
            "Connection Issues"
        );
        assert_eq!(
            serde_json::to_value(Category::Errors).expect("serialize"),
            "Errors"
        );
    }

    #[test]
    fn test_parse_category() {
        assert_eq!("errors".parse::<Category>(), Ok(Category::Errors));
        assert_eq!(
            "connection-issues".parse::<Category>(),
            Ok(Category::ConnectionIssues)
        );
        assert_eq!(
            "Connection Issues".parse::<Category>(),
            Ok(Category::ConnectionIssues)
        );
        assert!("warnings".parse::<Category>().is_err());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(Category::Errors.keywords(), &["error", "exception"]);
        assert!(Category::Other.keywords().is_empty());
    }
}
