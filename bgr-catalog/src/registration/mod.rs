//! Game registration orchestrator
//!
//! Catalog registration progresses through:
//! LOOKUP_EXISTING → FETCH_SOURCE → LOCALIZE → MAP_TAXONOMY → RECONCILE_COUNTS → PERSIST → DONE
//!
//! with terminal failures CONFLICT and SOURCE_UNAVAILABLE. Manual registration
//! validates, checks the localized name, allocates an id from the manual range
//! and persists. Collaborators are injected at construction; nothing here
//! retries.

pub mod allocator;
pub mod manual;

pub use allocator::SequenceAllocator;
pub use manual::ManualGameInput;

use crate::error::{RegistrationError, StoreError};
use crate::localization::{decide, extract_candidate, LocalizationDecision, LocalizedCandidate};
use crate::player_counts::{reconcile, PlayerCountStat};
use crate::ports::{CatalogLookup, GameStore, IdAllocator, Translator};
use crate::taxonomy::{MappingTables, TaxonomyMapper, TaxonomyMapping};
use crate::types::{CatalogGame, CatalogId, GameRecord, LocalId, RatingSource};
use bgr_common::config::RegistrationConfig;
use chrono::{SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Manual ids tried before a write conflict on the id is reported
const MAX_ID_ATTEMPTS: usize = 8;

/// Catalog registration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStage {
    /// Query persistence by catalog id
    LookupExisting,
    /// Catalog lookup collaborator
    FetchSource,
    /// Display name/publisher decision
    Localize,
    /// Source → site vocabulary
    MapTaxonomy,
    /// Seed player-count statistics
    ReconcileCounts,
    /// Write the assembled record
    Persist,
    Done,
}

impl RegistrationStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LookupExisting => "LOOKUP_EXISTING",
            Self::FetchSource => "FETCH_SOURCE",
            Self::Localize => "LOCALIZE",
            Self::MapTaxonomy => "MAP_TAXONOMY",
            Self::ReconcileCounts => "RECONCILE_COUNTS",
            Self::Persist => "PERSIST",
            Self::Done => "DONE",
        }
    }
}

/// Request to register a game from the source catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRegistration {
    pub catalog_id: CatalogId,
    /// Return an existing record instead of failing with a conflict;
    /// `None` falls back to the configured default
    pub reuse_existing: Option<bool>,
    /// Localized candidate found by the caller; derived from the catalog
    /// record when absent
    pub candidate: Option<LocalizedCandidate>,
}

impl CatalogRegistration {
    pub fn new(catalog_id: CatalogId) -> Self {
        Self {
            catalog_id,
            reuse_existing: None,
            candidate: None,
        }
    }

    pub fn with_candidate(mut self, candidate: LocalizedCandidate) -> Self {
        self.candidate = Some(candidate);
        self
    }

    pub fn reuse_existing(mut self, reuse: bool) -> Self {
        self.reuse_existing = Some(reuse);
        self
    }
}

/// Result of a catalog registration or re-sync
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOutcome {
    pub record: GameRecord,
    /// False when an existing record was reused
    pub created: bool,
    /// Absent when an existing record was reused
    pub decision: Option<LocalizationDecision>,
    pub player_counts: Vec<PlayerCountStat>,
}

/// Registers games from the catalog or from manual input
pub struct GameRegistrar {
    catalog: Arc<dyn CatalogLookup>,
    store: Arc<dyn GameStore>,
    translator: Arc<dyn Translator>,
    ids: Arc<dyn IdAllocator>,
    mapper: TaxonomyMapper,
    config: RegistrationConfig,
}

impl GameRegistrar {
    pub fn new(
        catalog: Arc<dyn CatalogLookup>,
        store: Arc<dyn GameStore>,
        translator: Arc<dyn Translator>,
        ids: Arc<dyn IdAllocator>,
        tables: Arc<MappingTables>,
        config: RegistrationConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            translator,
            ids,
            mapper: TaxonomyMapper::new(tables),
            config,
        }
    }

    // ========================================================================
    // Catalog registration
    // ========================================================================

    pub async fn register_from_catalog(
        &self,
        request: CatalogRegistration,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let catalog_id = request.catalog_id;
        if catalog_id >= self.config.manual_id_start {
            warn!(
                "Rejecting catalog id {}: inside the manual id range (starting {})",
                catalog_id, self.config.manual_id_start
            );
            return Err(RegistrationError::ValidationFailed(vec![format!(
                "catalog id {} falls inside the reserved manual id range (starting {})",
                catalog_id, self.config.manual_id_start
            )]));
        }

        let mut stage = RegistrationStage::LookupExisting;
        debug!("Catalog game {}: {}", catalog_id, stage.as_str());

        if let Some(existing) = self.store.find_by_catalog_id(catalog_id).await? {
            let reuse = request
                .reuse_existing
                .unwrap_or(self.config.reuse_existing_by_default);
            if !reuse {
                debug!("Catalog game {}: CONFLICT with game {}", catalog_id, existing.id);
                return Err(RegistrationError::Conflict {
                    existing_id: existing.id,
                    message: format!("catalog game {} is already registered", catalog_id),
                });
            }

            debug!("Catalog game {}: reusing game {}", catalog_id, existing.id);
            let player_counts = reconcile_record(&existing);
            return Ok(RegistrationOutcome {
                record: existing,
                created: false,
                decision: None,
                player_counts,
            });
        }

        stage = self.advance(catalog_id, stage, RegistrationStage::FetchSource);
        let game = self.fetch_source(catalog_id).await?;

        stage = self.advance(catalog_id, stage, RegistrationStage::Localize);
        let candidate = request.candidate.or_else(|| extract_candidate(&game));
        let decision = localize(&game, candidate.as_ref());

        stage = self.advance(catalog_id, stage, RegistrationStage::MapTaxonomy);
        let mapping = self.map_taxonomy(&game);

        stage = self.advance(catalog_id, stage, RegistrationStage::ReconcileCounts);
        let player_counts = reconcile(&[], &game.best_player_counts, &game.recommended_player_counts);

        stage = self.advance(catalog_id, stage, RegistrationStage::Persist);
        let description = self.translate_description(game.description.as_deref()).await;

        let mut record = GameRecord::new(catalog_id, Some(catalog_id), game.name.clone());
        apply_catalog(&mut record, &game, &decision, candidate.as_ref(), mapping, description);
        record.rating_average = game.average_rating;
        record.rating_count = game.rating_count;
        record.rating_source = if game.average_rating.is_some() {
            RatingSource::Catalog
        } else {
            RatingSource::Unrated
        };

        match self.store.insert_game(&record).await {
            Ok(()) => {}
            Err(StoreError::UniqueViolation { constraint }) => {
                // Lost a race with a concurrent registration of the same id
                let existing_id = self
                    .store
                    .find_by_catalog_id(catalog_id)
                    .await?
                    .map(|existing| existing.id)
                    .unwrap_or(catalog_id);
                debug!("Catalog game {}: CONFLICT at write ({})", catalog_id, constraint);
                return Err(RegistrationError::Conflict {
                    existing_id,
                    message: format!("catalog game {} was registered concurrently", catalog_id),
                });
            }
            Err(e) => return Err(e.into()),
        }

        self.advance(catalog_id, stage, RegistrationStage::Done);
        info!(
            "Registered catalog game {} as '{}' ({})",
            catalog_id,
            record.display_name(),
            decision.reason
        );

        Ok(RegistrationOutcome {
            record,
            created: true,
            decision: Some(decision),
            player_counts,
        })
    }

    /// Refresh an imported game from the catalog
    ///
    /// Source-derived fields are replaced. The rating aggregate is only
    /// refreshed while it has not been replaced by a review-based score.
    pub async fn resync_from_catalog(
        &self,
        local_id: LocalId,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let existing = self
            .store
            .find_by_id(local_id)
            .await?
            .ok_or(RegistrationError::NotFound(local_id))?;

        let catalog_id = existing.catalog_id.ok_or_else(|| {
            RegistrationError::ValidationFailed(vec![format!(
                "game {} was not imported from the catalog",
                local_id
            )])
        })?;

        let game = self.fetch_source(catalog_id).await?;

        let mut candidate = extract_candidate(&game).unwrap_or_default();
        if candidate.name.is_none() {
            candidate.name = existing.localized_name.clone();
        }
        let decision = localize(&game, Some(&candidate));
        let mapping = self.map_taxonomy(&game);
        let description = self.translate_description(game.description.as_deref()).await;

        let mut record = existing;
        record.name = game.name.clone();
        apply_catalog(&mut record, &game, &decision, Some(&candidate), mapping, description);
        if record.rating_source != RatingSource::Reviews {
            record.rating_average = game.average_rating;
            record.rating_count = game.rating_count;
            record.rating_source = if game.average_rating.is_some() {
                RatingSource::Catalog
            } else {
                RatingSource::Unrated
            };
        } else {
            debug!("Game {}: keeping review-based rating", local_id);
        }
        record.updated_at = Utc::now().trunc_subsecs(3);

        self.store.update_game(&record).await?;
        info!("Re-synced game {} from catalog game {}", local_id, catalog_id);

        let player_counts = reconcile_record(&record);
        Ok(RegistrationOutcome {
            record,
            created: false,
            decision: Some(decision),
            player_counts,
        })
    }

    // ========================================================================
    // Manual registration
    // ========================================================================

    pub async fn register_manual(
        &self,
        input: ManualGameInput,
    ) -> Result<GameRecord, RegistrationError> {
        let problems = input.validate();
        if !problems.is_empty() {
            return Err(RegistrationError::ValidationFailed(problems));
        }

        let localized_name = input.localized_name.trim().to_string();
        if let Some(existing) = self.store.find_manual_by_localized_name(&localized_name).await? {
            return Err(RegistrationError::Conflict {
                existing_id: existing.id,
                message: format!("a manual game named '{}' already exists", localized_name),
            });
        }

        let id = self.ids.next_local_id().await?;

        let mut record = GameRecord::new(id, None, input.name.trim());
        record.localized_name = Some(localized_name.clone());
        record.description = input.description;
        record.year_published = input.year_published;
        record.min_players = input.min_players;
        record.max_players = input.max_players;
        record.playing_time = input.playing_time;
        record.min_playing_time = input.min_playing_time;
        record.max_playing_time = input.max_playing_time;
        record.min_age = input.min_age;
        record.image_url = input.image_url;
        record.designers = input.designers;
        record.site_publishers = input
            .publishers
            .iter()
            .map(|p| self.mapper.normalize_publisher(p))
            .collect();
        record.display_publisher = record.site_publishers.first().cloned();
        record.source_publishers = input.publishers;
        record.site_categories = input.site_categories;
        record.site_mechanics = input.site_mechanics;

        // A taken id (left by data written outside the allocator) is skipped;
        // only the localized-name index is a real conflict
        let mut attempts = 1;
        loop {
            match self.store.insert_game(&record).await {
                Ok(()) => break,
                Err(StoreError::UniqueViolation { constraint }) => {
                    if let Some(existing) =
                        self.store.find_manual_by_localized_name(&localized_name).await?
                    {
                        debug!("Manual game '{}': conflict at write ({})", localized_name, constraint);
                        return Err(RegistrationError::Conflict {
                            existing_id: existing.id,
                            message: format!("a manual game named '{}' already exists", localized_name),
                        });
                    }

                    let id_taken = self.store.find_by_id(record.id).await?.is_some();
                    if !id_taken || attempts >= MAX_ID_ATTEMPTS {
                        return Err(StoreError::UniqueViolation { constraint }.into());
                    }

                    warn!("Manual id {} is already in use, allocating another", record.id);
                    record.id = self.ids.next_local_id().await?;
                    attempts += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!("Registered manual game {} as '{}'", record.id, localized_name);
        Ok(record)
    }

    // ========================================================================
    // Stages
    // ========================================================================

    fn advance(
        &self,
        catalog_id: CatalogId,
        from: RegistrationStage,
        to: RegistrationStage,
    ) -> RegistrationStage {
        debug!("Catalog game {}: {} → {}", catalog_id, from.as_str(), to.as_str());
        to
    }

    async fn fetch_source(&self, catalog_id: CatalogId) -> Result<CatalogGame, RegistrationError> {
        match self.catalog.fetch_game(catalog_id).await {
            Ok(Some(game)) => Ok(game),
            Ok(None) => {
                debug!("Catalog game {}: SOURCE_UNAVAILABLE (not found)", catalog_id);
                Err(RegistrationError::SourceUnavailable(format!(
                    "catalog game {} not found",
                    catalog_id
                )))
            }
            Err(e) => {
                warn!("Catalog lookup for {} failed: {:#}", catalog_id, e);
                Err(RegistrationError::SourceUnavailable(format!(
                    "catalog lookup for {} failed: {:#}",
                    catalog_id, e
                )))
            }
        }
    }

    fn map_taxonomy(&self, game: &CatalogGame) -> TaxonomyMapping {
        self.mapper.map(
            &game.categories,
            &game.mechanics,
            &game.publishers,
            &game.best_player_counts,
            &game.recommended_player_counts,
        )
    }

    /// Translated description, or the original when translation fails
    async fn translate_description(&self, description: Option<&str>) -> Option<String> {
        let text = description?;
        if text.trim().is_empty() {
            return None;
        }

        match self.translator.translate(text).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                warn!("Description translation failed, keeping original: {:#}", e);
                Some(text.to_string())
            }
        }
    }
}

fn localize(game: &CatalogGame, candidate: Option<&LocalizedCandidate>) -> LocalizationDecision {
    decide(
        &game.name,
        candidate.and_then(|c| c.name.as_deref()),
        game.publishers.first().map(String::as_str),
        candidate.and_then(|c| c.publisher.as_deref()),
    )
}

/// Copy source-derived fields onto a record
fn apply_catalog(
    record: &mut GameRecord,
    game: &CatalogGame,
    decision: &LocalizationDecision,
    candidate: Option<&LocalizedCandidate>,
    mapping: TaxonomyMapping,
    description: Option<String>,
) {
    record.localized_name = if decision.uses_localized_name() {
        Some(decision.display_name.clone())
    } else {
        None
    };
    record.display_publisher = decision.display_publisher.clone();
    record.description = description;
    record.year_published = game.year_published;
    record.min_players = game.min_players;
    record.max_players = game.max_players;
    record.playing_time = game.playing_time;
    record.min_playing_time = game.min_playing_time;
    record.max_playing_time = game.max_playing_time;
    record.min_age = game.min_age;
    record.image_url = candidate
        .and_then(|c| c.image_url.clone())
        .or_else(|| game.image_url.clone());
    record.thumbnail_url = game.thumbnail_url.clone();
    record.designers = game.designers.clone();

    record.source_categories = game.categories.clone();
    record.source_mechanics = game.mechanics.clone();
    record.source_publishers = game.publishers.clone();

    record.site_categories = mapping.site_categories;
    record.site_mechanics = mapping.site_mechanics;
    record.site_publishers = mapping.normalized_publishers;
    record.player_count_categories = mapping.player_count_categories;

    let best: BTreeSet<u32> = game.best_player_counts.iter().copied().collect();
    record.recommended_player_counts = game
        .recommended_player_counts
        .iter()
        .copied()
        .filter(|count| !best.contains(count))
        .collect();
    record.best_player_counts = best;
}

/// Seeded player-count stats for a stored record
fn reconcile_record(record: &GameRecord) -> Vec<PlayerCountStat> {
    let best: Vec<u32> = record.best_player_counts.iter().copied().collect();
    let recommended: Vec<u32> = record.recommended_player_counts.iter().copied().collect();
    reconcile(&[], &best, &recommended)
}
