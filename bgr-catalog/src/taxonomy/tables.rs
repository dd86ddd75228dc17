//! Source-to-site vocabulary tables
//!
//! Built once at startup (either the built-in curation or a JSON file) and
//! shared read-only behind an `Arc` for the life of the process. Replacing
//! the tables means building a new value, never mutating this one.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Mapping table load failure
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Failed to read mapping file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid mapping JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid mapping tables: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Immutable source-to-site vocabulary tables
///
/// JSON form uses camelCase keys (`categoryToSiteCategory`,
/// `categoryToSiteMechanic`, `mechanicToSiteCategory`,
/// `mechanicToSiteMechanic`, `playerCountToSiteCategory`,
/// `publisherMapping`); every table is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingTables {
    #[serde(default)]
    category_to_site_category: HashMap<String, String>,
    #[serde(default)]
    category_to_site_mechanic: HashMap<String, String>,
    #[serde(default)]
    mechanic_to_site_category: HashMap<String, String>,
    #[serde(default)]
    mechanic_to_site_mechanic: HashMap<String, String>,
    #[serde(default)]
    player_count_to_site_category: BTreeMap<u32, String>,
    /// Keys are lower-case and trimmed
    #[serde(default)]
    publisher_mapping: HashMap<String, String>,
}

impl MappingTables {
    /// Built-in curated tables
    pub fn builtin() -> Self {
        Self {
            category_to_site_category: Self::build_category_to_site_category(),
            category_to_site_mechanic: Self::build_category_to_site_mechanic(),
            mechanic_to_site_category: Self::build_mechanic_to_site_category(),
            mechanic_to_site_mechanic: Self::build_mechanic_to_site_mechanic(),
            player_count_to_site_category: Self::build_player_count_to_site_category(),
            publisher_mapping: Self::build_publisher_mapping(),
        }
        .with_normalized_publisher_keys()
    }

    /// Parse tables from JSON and validate them
    pub fn from_json_str(json: &str) -> Result<Self, MappingError> {
        let tables: MappingTables = serde_json::from_str(json)?;
        let tables = tables.with_normalized_publisher_keys();

        let problems = tables.validate();
        if !problems.is_empty() {
            return Err(MappingError::Invalid(problems));
        }

        Ok(tables)
    }

    /// Load tables from a JSON file
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let json = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tables = Self::from_json_str(&json)?;

        info!(
            "Loaded mapping tables from {} ({} source terms, {} publishers)",
            path.display(),
            tables.source_term_count(),
            tables.publisher_mapping.len()
        );

        Ok(tables)
    }

    /// Structural problems in the tables (empty list when valid)
    ///
    /// Blank keys or values are rejected, and so is a player-count key of 0.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (table, map) in [
            ("categoryToSiteCategory", &self.category_to_site_category),
            ("categoryToSiteMechanic", &self.category_to_site_mechanic),
            ("mechanicToSiteCategory", &self.mechanic_to_site_category),
            ("mechanicToSiteMechanic", &self.mechanic_to_site_mechanic),
            ("publisherMapping", &self.publisher_mapping),
        ] {
            for (key, value) in map {
                if key.trim().is_empty() {
                    problems.push(format!("{}: blank key", table));
                }
                if value.trim().is_empty() {
                    problems.push(format!("{}: blank value for '{}'", table, key));
                }
            }
        }

        for (count, value) in &self.player_count_to_site_category {
            if *count == 0 {
                problems.push("playerCountToSiteCategory: player count 0".to_string());
            }
            if value.trim().is_empty() {
                problems.push(format!(
                    "playerCountToSiteCategory: blank value for {}",
                    count
                ));
            }
        }

        problems.sort();
        problems
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn site_category_for_category(&self, term: &str) -> Option<&str> {
        self.category_to_site_category.get(term).map(String::as_str)
    }

    pub fn site_mechanic_for_category(&self, term: &str) -> Option<&str> {
        self.category_to_site_mechanic.get(term).map(String::as_str)
    }

    pub fn site_category_for_mechanic(&self, term: &str) -> Option<&str> {
        self.mechanic_to_site_category.get(term).map(String::as_str)
    }

    pub fn site_mechanic_for_mechanic(&self, term: &str) -> Option<&str> {
        self.mechanic_to_site_mechanic.get(term).map(String::as_str)
    }

    /// Site category for a raw player count
    ///
    /// Counts above the largest key fall back to that key's category, so a
    /// poll value of 12 still reads as party-sized.
    pub fn site_category_for_player_count(&self, count: u32) -> Option<&str> {
        if let Some(category) = self.player_count_to_site_category.get(&count) {
            return Some(category);
        }

        match self.player_count_to_site_category.last_key_value() {
            Some((max, category)) if count > *max => Some(category),
            _ => None,
        }
    }

    /// Canonical publisher name, if the publisher is known
    pub fn canonical_publisher(&self, publisher: &str) -> Option<&str> {
        self.publisher_mapping
            .get(&publisher.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Every site category any table can produce
    pub fn all_site_categories(&self) -> BTreeSet<&str> {
        self.category_to_site_category
            .values()
            .chain(self.mechanic_to_site_category.values())
            .chain(self.player_count_to_site_category.values())
            .map(String::as_str)
            .collect()
    }

    /// Every site mechanic any table can produce
    pub fn all_site_mechanics(&self) -> BTreeSet<&str> {
        self.category_to_site_mechanic
            .values()
            .chain(self.mechanic_to_site_mechanic.values())
            .map(String::as_str)
            .collect()
    }

    fn source_term_count(&self) -> usize {
        self.category_to_site_category.len()
            + self.category_to_site_mechanic.len()
            + self.mechanic_to_site_category.len()
            + self.mechanic_to_site_mechanic.len()
    }

    fn with_normalized_publisher_keys(mut self) -> Self {
        self.publisher_mapping = self
            .publisher_mapping
            .into_iter()
            .map(|(key, value)| (key.trim().to_lowercase(), value))
            .collect();
        self
    }

    // ========================================================================
    // Built-in curation
    // ========================================================================

    fn build_category_to_site_category() -> HashMap<String, String> {
        to_map(&[
            ("Animals", "動物"),
            ("Bluffing", "ブラフ"),
            ("Card Game", "カードゲーム"),
            ("Children's Game", "子供向け"),
            ("Deduction", "推理"),
            ("Memory", "記憶"),
            ("Negotiation", "交渉"),
            ("Party Game", "パーティー"),
            ("Puzzle", "パズル"),
            ("Wargame", "ウォーゲーム"),
            ("Word Game", "ワードゲーム"),
        ])
    }

    fn build_category_to_site_mechanic() -> HashMap<String, String> {
        to_map(&[("Dice", "ダイスロール")])
    }

    fn build_mechanic_to_site_category() -> HashMap<String, String> {
        to_map(&[
            ("Acting", "演技"),
            ("Deduction", "推理"),
            ("Legacy Game", "レガシー・キャンペーン"),
            ("Memory", "記憶"),
            ("Negotiation", "交渉"),
            ("Paper-and-Pencil", "紙ペン"),
            ("Scenario / Mission / Campaign Game", "レガシー・キャンペーン"),
            ("Solo / Solitaire Game", "ソロ向き"),
            ("Pattern Building", "パズル"),
            ("Trick-taking", "トリテ"),
        ])
    }

    fn build_mechanic_to_site_mechanic() -> HashMap<String, String> {
        let mut mappings = to_map(&[
            ("Area Majority / Influence", "エリア支配"),
            ("Betting and Bluffing", "賭け"),
            ("Closed Drafting", "ドラフト"),
            ("Open Drafting", "ドラフト"),
            ("Cooperative Game", "協力"),
            ("Deck Construction", "デッキ/バッグビルド"),
            ("Deck, Bag, and Pool Building", "デッキ/バッグビルド"),
            ("Dice Rolling", "ダイスロール"),
            ("Hidden Roles", "正体隠匿"),
            ("Modular Board", "モジュラーボード"),
            ("Network and Route Building", "ルート構築"),
            ("Push Your Luck", "バースト"),
            ("Set Collection", "セット収集"),
            ("Simultaneous Action Selection", "同時手番"),
            ("Tile Placement", "タイル配置"),
            ("Variable Player Powers", "プレイヤー別能力"),
            ("Variable Set-up", "プレイヤー別能力"),
            ("Worker Placement", "ワカプレ"),
            ("Worker Placement with Dice Workers", "ワカプレ"),
            ("Worker Placement, Different Worker Types", "ワカプレ"),
        ]);

        // Every auction variant collapses to one site mechanic
        for auction in [
            "Auction / Bidding",
            "Auction Compensation",
            "Auction: Dexterity",
            "Auction: Dutch",
            "Auction: Dutch Priority",
            "Auction: English",
            "Auction: Fixed Placement",
            "Auction: Multiple Lot",
            "Auction: Once Around",
            "Auction: Sealed Bid",
            "Auction: Turn Order Until Pass",
        ] {
            mappings.insert(auction.to_string(), "オークション".to_string());
        }

        mappings
    }

    fn build_player_count_to_site_category() -> BTreeMap<u32, String> {
        let mut mappings = BTreeMap::new();
        mappings.insert(1, "ソロ向き".to_string());
        mappings.insert(2, "ペア向き".to_string());
        for count in 6..=10 {
            mappings.insert(count, "多人数向き".to_string());
        }
        mappings
    }

    /// Publisher aliases, keyed by lower-cased alias
    fn build_publisher_mapping() -> HashMap<String, String> {
        let groups: &[(&str, &[&str])] = &[
            ("ホビージャパン", &["hobby japan", "hobbyjapan", "hobby-japan", "hj"]),
            (
                "アークライト",
                &["arclight", "arclightgames", "arc light", "arclight games"],
            ),
            ("グループSNE", &["グループSNE", "groupsne", "group sne"]),
            (
                "カナイ製作所",
                &[
                    "カナイ製作所",
                    "kanai",
                    "カナイファクトリー",
                    "kanai factory",
                    "kanai seisaku-sho",
                ],
            ),
            (
                "ニューゲームズオーダー",
                &["ニューゲームズオーダー", "new games order", "ngo", "newgamesorder"],
            ),
            ("オインクゲームズ", &["オインクゲームズ", "oink games", "oinkgames"]),
            ("コロンアーク", &["コロンアーク", "colon arc"]),
            ("数寄ゲームズ", &["数寄ゲームズ", "suki games"]),
            ("ダイスタワー", &["ダイスタワー", "dice tower"]),
            (
                "ボードゲームジャパン",
                &["ボードゲームジャパン", "board game japan", "bgj"],
            ),
            ("ゲームマーケット", &["ゲームマーケット", "game market"]),
            ("ジーピー", &["ジーピー", "gp"]),
            ("ハコニワ", &["ハコニワ", "hakoniwagames"]),
            (
                "グラウンディング",
                &["グラウンディング", "grounding inc.", "grounding"],
            ),
            (
                "アズモデージャパン",
                &["アズモデージャパン", "asmodee japan", "asmodee"],
            ),
            ("ケンビル", &["株式会社ケンビル", "kenbill"]),
            ("コザイク", &["cosaic", "コザイク"]),
            ("すごろくや", &["すごろくや", "sugorokuya"]),
            (
                "テンデイズゲームズ",
                &["テンデイズゲームズ", "tendays games", "tendaysgames"],
            ),
            ("ワンドロー", &["ワンドロー", "one draw", "onedraw"]),
            (
                "クロノノーツゲームズ",
                &["クロノノーツゲームズ", "chrono nauts games", "chrono nauts"],
            ),
            ("バンダイ", &["バンダイ", "bandai"]),
            ("タカラトミー", &["タカラトミー", "takara tomy", "takaratomy"]),
            ("エポック社", &["エポック社", "epoch"]),
            ("メガハウス", &["メガハウス", "megahouse"]),
            ("やのまん", &["やのまん", "yanoman"]),
        ];

        let mut mappings = HashMap::new();
        for (canonical, aliases) in groups {
            for alias in *aliases {
                mappings.insert(alias.to_string(), canonical.to_string());
            }
        }
        mappings
    }
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(source, site)| (source.to_string(), site.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_is_valid() {
        let tables = MappingTables::builtin();
        assert!(tables.validate().is_empty());
    }

    #[test]
    fn test_builtin_lookups() {
        let tables = MappingTables::builtin();
        assert_eq!(tables.site_category_for_category("Card Game"), Some("カードゲーム"));
        assert_eq!(tables.site_mechanic_for_category("Dice"), Some("ダイスロール"));
        assert_eq!(tables.site_category_for_mechanic("Trick-taking"), Some("トリテ"));
        assert_eq!(tables.site_mechanic_for_mechanic("Auction: Dutch"), Some("オークション"));
        assert_eq!(tables.site_mechanic_for_mechanic("Roll / Spin and Move"), None);
    }

    #[test]
    fn test_lookups_are_case_sensitive_for_terms() {
        let tables = MappingTables::builtin();
        assert_eq!(tables.site_category_for_category("card game"), None);
    }

    #[test]
    fn test_player_count_lookup() {
        let tables = MappingTables::builtin();
        assert_eq!(tables.site_category_for_player_count(1), Some("ソロ向き"));
        assert_eq!(tables.site_category_for_player_count(2), Some("ペア向き"));
        assert_eq!(tables.site_category_for_player_count(4), None);
        assert_eq!(tables.site_category_for_player_count(8), Some("多人数向き"));
        assert_eq!(tables.site_category_for_player_count(12), Some("多人数向き"));
    }

    #[test]
    fn test_canonical_publisher_normalizes_case_and_whitespace() {
        let tables = MappingTables::builtin();
        assert_eq!(tables.canonical_publisher("  Hobby Japan "), Some("ホビージャパン"));
        assert_eq!(tables.canonical_publisher("ARCLIGHT"), Some("アークライト"));
        assert_eq!(tables.canonical_publisher("グループsne"), Some("グループSNE"));
        assert_eq!(tables.canonical_publisher("Z-Man Games"), None);
    }

    #[test]
    fn test_vocabulary_listing() {
        let tables = MappingTables::builtin();
        let categories = tables.all_site_categories();
        assert!(categories.contains("カードゲーム"));
        assert!(categories.contains("多人数向き"));
        assert!(!categories.contains("協力"));

        let mechanics = tables.all_site_mechanics();
        assert!(mechanics.contains("協力"));
        assert!(mechanics.contains("ダイスロール"));
    }

    #[test]
    fn test_from_json_partial_tables() {
        let tables = MappingTables::from_json_str(
            r#"{
                "categoryToSiteCategory": { "Card Game": "Cards" },
                "playerCountToSiteCategory": { "1": "Solo" },
                "publisherMapping": { "Z-Man Games": "Z-Man" }
            }"#,
        )
        .unwrap();

        assert_eq!(tables.site_category_for_category("Card Game"), Some("Cards"));
        assert_eq!(tables.site_mechanic_for_mechanic("Set Collection"), None);
        assert_eq!(tables.site_category_for_player_count(1), Some("Solo"));
        assert_eq!(tables.canonical_publisher("z-man games"), Some("Z-Man"));
    }

    #[test]
    fn test_from_json_rejects_blank_values() {
        let result = MappingTables::from_json_str(
            r#"{ "mechanicToSiteMechanic": { "Set Collection": " " } }"#,
        );
        assert!(matches!(result, Err(MappingError::Invalid(problems)) if problems.len() == 1));
    }

    #[test]
    fn test_from_json_rejects_player_count_zero() {
        let result = MappingTables::from_json_str(
            r#"{ "playerCountToSiteCategory": { "0": "Nobody" } }"#,
        );
        assert!(matches!(result, Err(MappingError::Invalid(_))));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let result = MappingTables::from_json_str("{ not json");
        assert!(matches!(result, Err(MappingError::Parse(_))));
    }

    #[test]
    fn test_load_round_trips_builtin() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mappings.json");
        let builtin = MappingTables::builtin();
        std::fs::write(&path, serde_json::to_string(&builtin).unwrap()).unwrap();

        let loaded = MappingTables::load(&path).unwrap();
        assert_eq!(loaded, builtin);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = MappingTables::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(MappingError::Io { .. })));
    }
}
