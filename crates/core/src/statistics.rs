//! Per-character kill statistics.
//!
//! Submissions are folded additively into one document per character holding
//! a bucket per difficulty. Reads trim the long-tail `area` and `special`
//! maps of every bucket to their top entries.

use std::future::Future;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::naming::{normalize_identifier, MIN_STATISTICS_NAME_LENGTH};

/// Maximum number of `area` or `special` entries returned per bucket.
///
/// A character can visit well over a hundred areas, so reads keep only the
/// highest-ranked entries.
pub const MAX_DATA_POINTS: usize = 8;

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Game difficulty a statistics bucket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Normal,
    Nightmare,
    Hell,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Normal, Self::Nightmare, Self::Hell];

    /// Storage name, also used as the bucket key in responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Nightmare => "nightmare",
            Self::Hell => "hell",
        }
    }

    /// Name used by the game server in submissions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Nightmare => "Nightmare",
            Self::Hell => "Hell",
        }
    }

    /// Parse a submitted difficulty. Only the exact names `Normal`,
    /// `Nightmare` and `Hell` are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    /// Parse a storage name as produced by [`Difficulty::as_str`].
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == key)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Time and kills accumulated in a single area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaStats {
    #[serde(default)]
    pub kills: u64,
    #[serde(default)]
    pub time: u64,
    #[serde(default, rename = "uniquekills")]
    pub unique_kills: u64,
    #[serde(default, rename = "champkills")]
    pub champ_kills: u64,
}

/// Counters for one difficulty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub total_kills: u64,
    pub total_unique_kills: u64,
    pub total_champ_kills: u64,
    /// Named monster -> kills.
    pub special: IndexMap<String, u64>,
    /// Area name -> accumulated area stats.
    pub area: IndexMap<String, AreaStats>,
}

impl DifficultyStats {
    /// Trim `area` (by time) and `special` (by kills) to [`MAX_DATA_POINTS`] entries each.
    pub fn shaped(self) -> Self {
        Self {
            area: top_entries(self.area, MAX_DATA_POINTS, |a| a.time),
            special: top_entries(self.special, MAX_DATA_POINTS, |kills| *kills),
            ..self
        }
    }
}

/// The full statistics document of a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterStatistics {
    pub account: String,
    pub character: String,
    pub normal: DifficultyStats,
    pub nightmare: DifficultyStats,
    pub hell: DifficultyStats,
}

impl CharacterStatistics {
    /// A document with three zeroed buckets and empty maps.
    pub fn baseline(account: &str, character: &str) -> Self {
        Self {
            account: account.to_string(),
            character: character.to_string(),
            ..Default::default()
        }
    }

    pub fn bucket_mut(&mut self, difficulty: Difficulty) -> &mut DifficultyStats {
        match difficulty {
            Difficulty::Normal => &mut self.normal,
            Difficulty::Nightmare => &mut self.nightmare,
            Difficulty::Hell => &mut self.hell,
        }
    }

    /// Apply read-time shaping to every bucket independently.
    pub fn shaped(self) -> Self {
        Self {
            normal: self.normal.shaped(),
            nightmare: self.nightmare.shaped(),
            hell: self.hell.shaped(),
            ..self
        }
    }
}

/// Keep the `limit` entries with the highest `metric`.
///
/// The sort is stable, so entries with equal metric keep their incoming
/// relative order. Maps at or under the limit are returned unchanged.
pub fn top_entries<V>(
    entries: IndexMap<String, V>,
    limit: usize,
    metric: impl Fn(&V) -> u64,
) -> IndexMap<String, V> {
    if entries.len() <= limit {
        return entries;
    }

    let mut ranked: Vec<(String, V)> = entries.into_iter().collect();
    ranked.sort_by(|(_, a), (_, b)| metric(b).cmp(&metric(a)));
    ranked.truncate(limit);
    ranked.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

/// One entry of a statistics submission batch, as sent by the game server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRequest {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, rename = "totalkills")]
    pub total_kills: u64,
    #[serde(default, rename = "totaluniquekills")]
    pub total_unique_kills: u64,
    #[serde(default, rename = "totalchampkills")]
    pub total_champ_kills: u64,
    #[serde(default)]
    pub special: IndexMap<String, u64>,
    #[serde(default)]
    pub area: IndexMap<String, AreaStats>,
}

/// A validated, normalized increment ready to be applied by a [`StatisticsStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsUpdate {
    /// Lower-cased account name.
    pub account: String,
    /// Lower-cased character name; the document key.
    pub character: String,
    pub difficulty: Difficulty,
    pub total_kills: u64,
    pub total_unique_kills: u64,
    pub total_champ_kills: u64,
    pub special: IndexMap<String, u64>,
    pub area: IndexMap<String, AreaStats>,
}

impl TryFrom<StatisticsRequest> for StatisticsUpdate {
    type Error = CoreError;

    fn try_from(req: StatisticsRequest) -> Result<Self, Self::Error> {
        let difficulty = Difficulty::from_name(&req.difficulty).ok_or_else(|| {
            CoreError::Request(format!(
                "difficulty {} supplied for character {}",
                req.difficulty, req.character
            ))
        })?;

        if req.character.is_empty() {
            return Err(CoreError::Request(
                "statistics entry is missing a character name".to_string(),
            ));
        }

        Ok(Self {
            account: normalize_identifier(&req.account),
            character: normalize_identifier(&req.character),
            difficulty,
            total_kills: req.total_kills,
            total_unique_kills: req.total_unique_kills,
            total_champ_kills: req.total_champ_kills,
            special: req.special,
            area: req.area,
        })
    }
}

// ---------------------------------------------------------------------------
// Store + service
// ---------------------------------------------------------------------------

/// Persistence for character statistics documents.
///
/// The upsert is split into its two store-level steps so the service can
/// drive the increment-or-create transition explicitly.
pub trait StatisticsStore: Send + Sync {
    /// Fails with [`CoreError::NotFound`] when the character has no document.
    fn get_by_character(
        &self,
        character: &str,
    ) -> impl Future<Output = Result<CharacterStatistics, CoreError>> + Send;

    /// Atomically add `update` to the existing document of `update.character`.
    ///
    /// Returns `false` without writing anything when no document matches.
    fn increment(
        &self,
        update: &StatisticsUpdate,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    /// Create the baseline document (three zeroed buckets, empty maps).
    ///
    /// Fails with [`CoreError::Conflict`] when a document already exists.
    fn insert_baseline(
        &self,
        account: &str,
        character: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete(&self, character: &str) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Validates, folds and shapes character statistics.
pub struct StatisticsService<S> {
    store: S,
}

impl<S: StatisticsStore> StatisticsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Apply a batch of submissions in order.
    ///
    /// Every entry is validated before anything is written, so a batch with a
    /// bad entry writes nothing. A store error aborts the remaining entries;
    /// entries already applied stay applied.
    pub async fn submit(&self, batch: Vec<StatisticsRequest>) -> Result<(), CoreError> {
        let updates = batch
            .into_iter()
            .map(StatisticsUpdate::try_from)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| tracing::debug!(error = %err, "Rejected statistics batch"))?;

        tracing::debug!(entries = updates.len(), "Applying statistics batch");
        for update in &updates {
            self.upsert(update).await?;
        }
        Ok(())
    }

    /// Increment the character's document, creating it first when missing.
    ///
    /// Returns whether an existing document was matched on the first attempt.
    pub async fn upsert(&self, update: &StatisticsUpdate) -> Result<bool, CoreError> {
        if self.store.increment(update).await? {
            return Ok(true);
        }

        match self
            .store
            .insert_baseline(&update.account, &update.character)
            .await
        {
            Ok(()) => {
                tracing::debug!(character = %update.character, "Created statistics document");
            }
            // Another submission created the document first; re-apply below.
            Err(CoreError::Conflict(msg)) => {
                tracing::debug!(character = %update.character, %msg, "Statistics document already created");
            }
            Err(err) => return Err(err),
        }

        if self.store.increment(update).await? {
            Ok(false)
        } else {
            Err(CoreError::Internal(format!(
                "statistics document for {} missing after insert",
                update.character
            )))
        }
    }

    /// Fetch a character's statistics with long-tail maps trimmed.
    pub async fn get(&self, character: &str) -> Result<CharacterStatistics, CoreError> {
        let stats = self
            .store
            .get_by_character(&normalize_identifier(character))
            .await?;
        Ok(stats.shaped())
    }

    /// Delete every statistic recorded for `character`.
    ///
    /// The minimum length is counted in characters, not bytes.
    pub async fn delete(&self, character: &str) -> Result<(), CoreError> {
        if character.chars().count() < MIN_STATISTICS_NAME_LENGTH {
            return Err(CoreError::Request(format!(
                "character name needs a length of at least {MIN_STATISTICS_NAME_LENGTH}"
            )));
        }
        self.store.delete(&normalize_identifier(character)).await
    }
}
