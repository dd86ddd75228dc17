//! Core data types shared across the catalog modules
//!
//! `GameRecord` is the normalized, persisted game. `CatalogGame` is the raw
//! record returned by the catalog lookup collaborator, in source vocabulary.
//! Review and vote rows are read-only inputs to scoring and statistics.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Site-local game id
pub type LocalId = i64;
/// Source catalog game id
pub type CatalogId = i64;
/// Review id
pub type ReviewId = i64;
/// Reviewer id
pub type UserId = Uuid;

// ============================================================================
// Game record
// ============================================================================

/// Where a game's stored rating aggregate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingSource {
    /// No rating yet (manual entries before any review)
    Unrated,
    /// Copied from the source catalog at import time
    Catalog,
    /// Written back by the weighted score service; never overwritten by a re-sync
    Reviews,
}

impl RatingSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unrated => "unrated",
            Self::Catalog => "catalog",
            Self::Reviews => "reviews",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unrated" => Some(Self::Unrated),
            "catalog" => Some(Self::Catalog),
            "reviews" => Some(Self::Reviews),
            _ => None,
        }
    }
}

/// How a game entered the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOrigin {
    /// Imported from the source catalog; local id equals catalog id
    Catalog,
    /// Authored on the site; local id drawn from the reserved range
    Manual,
}

/// Normalized game record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: LocalId,
    pub catalog_id: Option<CatalogId>,
    /// Canonical name as the source catalog (or manual author) gives it
    pub name: String,
    /// Shown instead of `name` when present
    pub localized_name: Option<String>,
    pub description: Option<String>,
    pub year_published: Option<i32>,
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub playing_time: Option<u32>,
    pub min_playing_time: Option<u32>,
    pub max_playing_time: Option<u32>,
    pub min_age: Option<u32>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub designers: Vec<String>,
    pub display_publisher: Option<String>,

    // Source vocabulary, verbatim
    pub source_categories: Vec<String>,
    pub source_mechanics: Vec<String>,
    pub source_publishers: Vec<String>,

    // Site vocabulary, derived
    pub site_categories: BTreeSet<String>,
    pub site_mechanics: BTreeSet<String>,
    pub site_publishers: Vec<String>,
    pub player_count_categories: BTreeSet<String>,

    /// Disjoint from `recommended_player_counts`
    pub best_player_counts: BTreeSet<u32>,
    pub recommended_player_counts: BTreeSet<u32>,

    pub rating_average: Option<f64>,
    pub rating_count: u32,
    pub rating_source: RatingSource,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameRecord {
    /// Empty record with the given identity and name
    pub fn new(id: LocalId, catalog_id: Option<CatalogId>, name: impl Into<String>) -> Self {
        // Stored timestamps keep millisecond precision
        let now = Utc::now().trunc_subsecs(3);
        Self {
            id,
            catalog_id,
            name: name.into(),
            localized_name: None,
            description: None,
            year_published: None,
            min_players: None,
            max_players: None,
            playing_time: None,
            min_playing_time: None,
            max_playing_time: None,
            min_age: None,
            image_url: None,
            thumbnail_url: None,
            designers: Vec::new(),
            display_publisher: None,
            source_categories: Vec::new(),
            source_mechanics: Vec::new(),
            source_publishers: Vec::new(),
            site_categories: BTreeSet::new(),
            site_mechanics: BTreeSet::new(),
            site_publishers: Vec::new(),
            player_count_categories: BTreeSet::new(),
            best_player_counts: BTreeSet::new(),
            recommended_player_counts: BTreeSet::new(),
            rating_average: None,
            rating_count: 0,
            rating_source: RatingSource::Unrated,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn display_name(&self) -> &str {
        self.localized_name.as_deref().unwrap_or(&self.name)
    }

    pub fn origin(&self) -> GameOrigin {
        if self.catalog_id.is_some() {
            GameOrigin::Catalog
        } else {
            GameOrigin::Manual
        }
    }
}

// ============================================================================
// Catalog collaborator output
// ============================================================================

/// Raw game attributes from the source catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogGame {
    pub catalog_id: CatalogId,
    /// Primary name
    pub name: String,
    /// Alternate names (may include localized titles)
    #[serde(default)]
    pub alternate_names: Vec<String>,
    pub description: Option<String>,
    pub year_published: Option<i32>,
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub playing_time: Option<u32>,
    pub min_playing_time: Option<u32>,
    pub max_playing_time: Option<u32>,
    pub min_age: Option<u32>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub designers: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub mechanics: Vec<String>,
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: u32,
    /// Poll-derived "best" player counts (raw values, up to 10+)
    #[serde(default)]
    pub best_player_counts: Vec<u32>,
    /// Poll-derived "recommended" player counts (raw values)
    #[serde(default)]
    pub recommended_player_counts: Vec<u32>,
    /// Published editions
    #[serde(default)]
    pub versions: Vec<CatalogVersion>,
}

/// A published edition of a catalog game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogVersion {
    pub name: String,
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub year_published: Option<i32>,
    pub image_url: Option<String>,
}

// ============================================================================
// Review-side rows
// ============================================================================

/// Published review as read for scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub id: ReviewId,
    pub user_id: UserId,
    pub rating: f64,
    pub content: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub reviewer_is_admin: bool,
}

/// Local player-count votes for one raw count value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRow {
    /// Raw player count as voted (values above 6 are collapsed later)
    pub player_count: u32,
    /// Reviews that voted for this count
    pub votes: u32,
    /// Published reviews for the game
    pub total_reviews: u32,
}

/// What a reviewer tagged in a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteKind {
    Mechanic,
    Category,
    PlayerCount,
}

impl VoteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mechanic => "mechanic",
            Self::Category => "category",
            Self::PlayerCount => "player_count",
        }
    }
}

/// Vote tally for one tag value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVote {
    pub value: String,
    pub votes: u32,
}
