//! Display name/publisher decision
//!
//! Name and publisher are independent axes: an invalid localized name never
//! blocks a valid localized publisher. Only the name takes priority when both
//! are valid.

use super::publisher::is_localized_publisher;
use super::script::is_valid_localized_name;
use serde::Serialize;
use std::fmt;

/// Which rule produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    LocalizedName,
    LocalizedPublisher,
    Original,
}

impl DecisionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalizedName => "localized version detected with valid localized name",
            Self::LocalizedPublisher => "localized publisher detected",
            Self::Original => "no localized version detected, using original",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and publisher to display for a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizationDecision {
    pub display_name: String,
    pub display_publisher: Option<String>,
    pub reason: DecisionReason,
}

impl LocalizationDecision {
    pub fn uses_localized_name(&self) -> bool {
        self.reason == DecisionReason::LocalizedName
    }
}

/// Decide what to display, first matching rule wins
///
/// 1. Valid localized name: show it, with the candidate publisher when that
///    publisher is localized.
/// 2. Localized publisher (candidate first, then original): original name,
///    localized publisher.
/// 3. Otherwise the original name and publisher.
pub fn decide(
    original_name: &str,
    candidate_name: Option<&str>,
    original_publisher: Option<&str>,
    candidate_publisher: Option<&str>,
) -> LocalizationDecision {
    let localized_candidate_publisher = candidate_publisher.filter(|p| is_localized_publisher(p));

    if let Some(name) = candidate_name.filter(|n| is_valid_localized_name(n)) {
        return LocalizationDecision {
            display_name: name.to_string(),
            display_publisher: localized_candidate_publisher
                .or(original_publisher)
                .map(str::to_string),
            reason: DecisionReason::LocalizedName,
        };
    }

    let localized_publisher =
        localized_candidate_publisher.or(original_publisher.filter(|p| is_localized_publisher(p)));
    if let Some(publisher) = localized_publisher {
        return LocalizationDecision {
            display_name: original_name.to_string(),
            display_publisher: Some(publisher.to_string()),
            reason: DecisionReason::LocalizedPublisher,
        };
    }

    LocalizationDecision {
        display_name: original_name.to_string(),
        display_publisher: original_publisher.map(str::to_string),
        reason: DecisionReason::Original,
    }
}
