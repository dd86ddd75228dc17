//! Manually authored game input

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Caller-supplied attributes for a game with no catalog entry
///
/// Categories and mechanics are already in site vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualGameInput {
    pub name: String,
    pub localized_name: String,
    pub description: Option<String>,
    pub year_published: Option<i32>,
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub playing_time: Option<u32>,
    pub min_playing_time: Option<u32>,
    pub max_playing_time: Option<u32>,
    pub min_age: Option<u32>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub designers: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub site_categories: BTreeSet<String>,
    #[serde(default)]
    pub site_mechanics: BTreeSet<String>,
}

impl ManualGameInput {
    /// Every problem with the input; empty when valid
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("name is required".to_string());
        }
        if self.localized_name.trim().is_empty() {
            problems.push("localized name is required".to_string());
        }
        if self.min_players == Some(0) {
            problems.push("min players must be at least 1".to_string());
        }
        if let (Some(min), Some(max)) = (self.min_players, self.max_players) {
            if max < min {
                problems.push(format!("max players ({}) is below min players ({})", max, min));
            }
        }
        if let (Some(min), Some(max)) = (self.min_playing_time, self.max_playing_time) {
            if max < min {
                problems.push(format!(
                    "max playing time ({}) is below min playing time ({})",
                    max, min
                ));
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ManualGameInput {
        ManualGameInput {
            name: "Tanto Cuore".to_string(),
            localized_name: "ドミニオン風カード".to_string(),
            min_players: Some(2),
            max_players: Some(4),
            min_playing_time: Some(30),
            max_playing_time: Some(60),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(valid().validate().is_empty());
    }

    #[test]
    fn test_all_problems_reported() {
        let input = ManualGameInput {
            name: " ".to_string(),
            localized_name: String::new(),
            min_players: Some(0),
            max_players: None,
            min_playing_time: Some(90),
            max_playing_time: Some(45),
            ..Default::default()
        };

        let problems = input.validate();
        assert_eq!(problems.len(), 4, "{:?}", problems);
    }

    #[test]
    fn test_player_range_inverted() {
        let input = ManualGameInput {
            min_players: Some(5),
            max_players: Some(2),
            ..valid()
        };
        assert_eq!(input.validate(), vec!["max players (2) is below min players (5)"]);
    }
}
