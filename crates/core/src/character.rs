//! Character snapshot cache orchestration.
//!
//! [`CharacterService::resolve`] serves a stored snapshot while it is younger
//! than the configured staleness window and re-parses the save file otherwise.
//! A snapshot moves `Absent -> Fresh` on its first parse, `Fresh -> Stale` as
//! time passes, and `Stale -> Fresh` on a successful refresh.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::naming::validate_character_name;
use crate::types::Timestamp;

/// Default staleness window for character snapshots (3 minutes).
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(180);

/// A parsed character snapshot as persisted by the [`CharacterStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// The character's save name.
    pub id: String,
    /// Opaque snapshot produced by the [`CharacterParser`].
    pub payload: serde_json::Value,
    /// When the payload was produced.
    pub last_parsed_at: Timestamp,
}

impl CharacterRecord {
    /// Age of the snapshot relative to `now`. Timestamps in the future count as zero.
    pub fn age_at(&self, now: Timestamp) -> Duration {
        (now - self.last_parsed_at).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn is_stale_at(&self, now: Timestamp, stale_after: Duration) -> bool {
        self.age_at(now) >= stale_after
    }
}

/// Produces a fresh snapshot from the source material for a character.
///
/// Fails with [`CoreError::NotFound`] when no source exists and with
/// [`CoreError::Internal`] when the source cannot be decoded.
pub trait CharacterParser: Send + Sync {
    fn parse(&self, name: &str) -> impl Future<Output = Result<CharacterRecord, CoreError>> + Send;
}

/// Persistence for character snapshots, keyed by save name.
pub trait CharacterStore: Send + Sync {
    /// Fails with [`CoreError::NotFound`] when no snapshot is stored.
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<CharacterRecord, CoreError>> + Send;

    fn insert(&self, record: &CharacterRecord)
        -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Replace payload and timestamp of the snapshot matching `record.id`.
    fn update(&self, record: &CharacterRecord)
        -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Cache-aside resolution of character snapshots.
pub struct CharacterService<P, S> {
    parser: P,
    store: S,
    stale_after: Duration,
}

impl<P, S> CharacterService<P, S>
where
    P: CharacterParser,
    S: CharacterStore,
{
    pub fn new(parser: P, store: S, stale_after: Duration) -> Self {
        Self {
            parser,
            store,
            stale_after,
        }
    }

    /// Return the snapshot for `name`, parsing and persisting it when it is
    /// missing or older than the staleness window.
    ///
    /// A failed refresh leaves the stored snapshot untouched.
    pub async fn resolve(&self, name: &str) -> Result<CharacterRecord, CoreError> {
        validate_character_name(name)?;

        let cached = match self.store.find_by_id(name).await {
            Ok(record) => record,
            Err(err) if err.is_not_found() => {
                tracing::debug!(character = name, "Character not cached, parsing");
                let parsed = self.parser.parse(name).await?;
                self.store.insert(&parsed).await?;
                return Ok(parsed);
            }
            Err(err) => return Err(err),
        };

        let now = Utc::now();
        if !cached.is_stale_at(now, self.stale_after) {
            tracing::debug!(character = name, "Serving cached character");
            return Ok(cached);
        }

        tracing::debug!(
            character = name,
            age_secs = cached.age_at(now).as_secs(),
            "Cached character is stale, refreshing"
        );
        let parsed = self.parser.parse(name).await?;
        self.store.update(&parsed).await?;
        Ok(parsed)
    }
}
