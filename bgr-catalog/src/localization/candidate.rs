//! Localized candidate extraction from catalog data
//!
//! Used when the caller supplies no localized candidate. Names and editions
//! are ranked by how strongly they indicate a localized release:
//!
//! | Priority | Evidence                                   |
//! |----------|--------------------------------------------|
//! | 4        | kana in the name                           |
//! | 3        | Japanese edition and localized publisher   |
//! | 2        | Japanese edition alone                     |
//! | 1        | kanji-only, non-Chinese name               |
//!
//! An edition counts as Japanese when its name carries a "japan"/日本語
//! keyword or its language list includes Japanese.

use super::publisher::is_localized_publisher;
use super::script::{
    has_chinese_only, has_kana, has_kanji_only, is_valid_localized_name, mentions_japan_keyword,
};
use crate::types::{CatalogGame, CatalogVersion};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Localized name/publisher candidate for a game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedCandidate {
    pub name: Option<String>,
    pub publisher: Option<String>,
    pub year_published: Option<i32>,
    pub image_url: Option<String>,
}

fn name_priority(name: &str) -> u8 {
    if has_kana(name) {
        4
    } else if has_kanji_only(name) && !has_chinese_only(name) {
        1
    } else {
        0
    }
}

fn version_priority(name: &str, japanese_edition: bool, has_localized_publisher: bool) -> u8 {
    if has_kana(name) {
        4
    } else if japanese_edition && has_localized_publisher {
        3
    } else if japanese_edition {
        2
    } else if has_kanji_only(name) && !has_chinese_only(name) {
        1
    } else {
        0
    }
}

/// Keyword in the edition name, or Japanese among its listed languages
fn is_japanese_edition(version: &CatalogVersion) -> bool {
    mentions_japan_keyword(&version.name)
        || version
            .languages
            .iter()
            .any(|language| {
                language.trim().eq_ignore_ascii_case("japanese") || language.contains("日本語")
            })
}

/// Best localized candidate found in the game's names, editions and publishers
pub fn extract_candidate(game: &CatalogGame) -> Option<LocalizedCandidate> {
    let mut best: Option<LocalizedCandidate> = None;
    let mut highest = 0u8;

    // Kana names beat kanji-only names regardless of order
    let names = || std::iter::once(&game.name).chain(&game.alternate_names);
    let native_name = names()
        .find(|n| has_kana(n))
        .or_else(|| names().find(|n| name_priority(n) == 1));

    if let Some(name) = native_name.filter(|n| is_valid_localized_name(n)) {
        debug!("Localized name in catalog names: {}", name);
        highest = name_priority(name);
        best = Some(LocalizedCandidate {
            name: Some(name.clone()),
            image_url: game.image_url.clone(),
            ..Default::default()
        });
    }

    let game_publisher = game
        .publishers
        .iter()
        .find(|p| is_localized_publisher(p))
        .cloned();

    for version in &game.versions {
        let version_publisher = version
            .publishers
            .iter()
            .find(|p| is_localized_publisher(p))
            .cloned();
        let priority = version_priority(
            &version.name,
            is_japanese_edition(version),
            version_publisher.is_some(),
        );

        if priority == 0 || priority <= highest {
            continue;
        }

        debug!("Localized edition: {} (priority {})", version.name, priority);
        let previous = best.take().unwrap_or_default();
        best = Some(LocalizedCandidate {
            name: if is_valid_localized_name(&version.name) {
                Some(version.name.clone())
            } else {
                previous.name
            },
            publisher: version_publisher.or_else(|| game_publisher.clone()),
            year_published: version.year_published,
            image_url: version.image_url.clone().or(previous.image_url),
        });
        highest = priority;

        if priority == 4 {
            break;
        }
    }

    match (best, game_publisher) {
        (Some(mut candidate), publisher) => {
            if candidate.publisher.is_none() {
                candidate.publisher = publisher;
            }
            Some(candidate)
        }
        (None, Some(publisher)) => Some(LocalizedCandidate {
            publisher: Some(publisher),
            image_url: game.image_url.clone(),
            ..Default::default()
        }),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(name: &str) -> CatalogGame {
        CatalogGame {
            catalog_id: 129622,
            name: name.to_string(),
            image_url: Some("https://img.example/original.jpg".to_string()),
            ..Default::default()
        }
    }

    fn version(name: &str, publishers: &[&str]) -> CatalogVersion {
        CatalogVersion {
            name: name.to_string(),
            publishers: publishers.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_nothing_localized() {
        let mut game = game("Love Letter");
        game.alternate_names = vec!["Liebesbrief".to_string()];
        game.publishers = vec!["Alderac Entertainment Group".to_string()];
        game.versions = vec![version("English edition", &["Z-Man Games"])];

        assert_eq!(extract_candidate(&game), None);
    }

    #[test]
    fn test_kana_alternate_name() {
        let mut game = game("Love Letter");
        game.alternate_names = vec!["情書".to_string(), "ラブレター".to_string()];

        let candidate = extract_candidate(&game).unwrap();
        assert_eq!(candidate.name.as_deref(), Some("ラブレター"));
        assert_eq!(candidate.image_url.as_deref(), Some("https://img.example/original.jpg"));
    }

    #[test]
    fn test_chinese_alternate_name_ignored() {
        let mut game = game("Love Letter");
        game.alternate_names = vec!["我们的情书".to_string()];

        assert_eq!(extract_candidate(&game), None);
    }

    #[test]
    fn test_kana_version_stops_scan() {
        let mut game = game("Love Letter");
        game.versions = vec![
            version("Japanese edition", &["Arclight"]),
            CatalogVersion {
                name: "ラブレター 第二版".to_string(),
                publishers: vec!["Arclight".to_string()],
                year_published: Some(2014),
                image_url: Some("https://img.example/jp.jpg".to_string()),
                ..Default::default()
            },
            version("ラブレター 廉価版", &["Hobby Japan"]),
        ];

        let candidate = extract_candidate(&game).unwrap();
        assert_eq!(candidate.name.as_deref(), Some("ラブレター 第二版"));
        assert_eq!(candidate.publisher.as_deref(), Some("Arclight"));
        assert_eq!(candidate.year_published, Some(2014));
        assert_eq!(candidate.image_url.as_deref(), Some("https://img.example/jp.jpg"));
    }

    #[test]
    fn test_keyword_version_keeps_earlier_name() {
        let mut game = game("Coup");
        game.alternate_names = vec!["政変".to_string()];
        game.versions = vec![version("Japanese edition", &["Hobby Japan"])];

        let candidate = extract_candidate(&game).unwrap();
        // Name from the kanji-only alternate; publisher from the edition
        assert_eq!(candidate.name.as_deref(), Some("政変"));
        assert_eq!(candidate.publisher.as_deref(), Some("Hobby Japan"));
    }

    #[test]
    fn test_keyword_with_publisher_beats_keyword_alone() {
        let mut game = game("Coup");
        game.versions = vec![
            version("Japanese edition", &["Indie Boards & Cards"]),
            version("Japan retail edition", &["Arclight"]),
        ];

        let candidate = extract_candidate(&game).unwrap();
        assert_eq!(candidate.name, None);
        assert_eq!(candidate.publisher.as_deref(), Some("Arclight"));
    }

    #[test]
    fn test_japanese_language_counts_as_edition_evidence() {
        let mut game = game("Love Letter");
        game.versions = vec![
            version("English edition", &["Z-Man Games"]),
            CatalogVersion {
                name: "Second edition".to_string(),
                publishers: vec!["Kodansha".to_string()],
                languages: vec!["Japanese".to_string()],
                year_published: Some(2019),
                ..Default::default()
            },
        ];

        let candidate = extract_candidate(&game).unwrap();
        assert_eq!(candidate.name, None);
        assert_eq!(candidate.publisher.as_deref(), Some("Kodansha"));
        assert_eq!(candidate.year_published, Some(2019));
    }

    #[test]
    fn test_publisher_only_candidate() {
        let mut game = game("Coup");
        game.publishers = vec![
            "Indie Boards & Cards".to_string(),
            "Hobby Japan".to_string(),
        ];

        let candidate = extract_candidate(&game).unwrap();
        assert_eq!(candidate.name, None);
        assert_eq!(candidate.publisher.as_deref(), Some("Hobby Japan"));
    }

    #[test]
    fn test_game_publisher_fills_missing_candidate_publisher() {
        let mut game = game("Love Letter");
        game.alternate_names = vec!["ラブレター".to_string()];
        game.publishers = vec!["Arclight".to_string()];

        let candidate = extract_candidate(&game).unwrap();
        assert_eq!(candidate.name.as_deref(), Some("ラブレター"));
        assert_eq!(candidate.publisher.as_deref(), Some("Arclight"));
    }
}
