//! Repository for the `characters` table.

use armory_core::character::{CharacterRecord, CharacterStore};
use armory_core::error::CoreError;

use crate::error::classify;
use crate::models::character::CharacterRow;
use crate::DbPool;

const ENTITY: &str = "Character";

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, payload, last_parsed_at";

/// Provides [`CharacterStore`] over PostgreSQL.
#[derive(Clone)]
pub struct CharacterRepo {
    pool: DbPool,
}

impl CharacterRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CharacterStore for CharacterRepo {
    async fn find_by_id(&self, id: &str) -> Result<CharacterRecord, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, ENTITY, id))?
            .map(CharacterRecord::from)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))
    }

    /// Insert a first snapshot. A concurrent first insert surfaces as
    /// [`CoreError::Conflict`].
    async fn insert(&self, record: &CharacterRecord) -> Result<(), CoreError> {
        sqlx::query(
            "INSERT INTO characters (id, payload, last_parsed_at)
             VALUES ($1, $2, $3)",
        )
        .bind(&record.id)
        .bind(&record.payload)
        .bind(record.last_parsed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, ENTITY, &record.id))?;

        tracing::debug!(character = %record.id, "Stored character snapshot");
        Ok(())
    }

    /// Replace the snapshot unless the stored one is newer, so
    /// `last_parsed_at` never moves backwards.
    async fn update(&self, record: &CharacterRecord) -> Result<(), CoreError> {
        let result = sqlx::query(
            "UPDATE characters SET payload = $2, last_parsed_at = $3
             WHERE id = $1 AND last_parsed_at <= $3",
        )
        .bind(&record.id)
        .bind(&record.payload)
        .bind(record.last_parsed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, ENTITY, &record.id))?;

        if result.rows_affected() == 0 {
            tracing::debug!(character = %record.id, "Snapshot not updated, stored copy is newer or gone");
        } else {
            tracing::debug!(character = %record.id, "Refreshed character snapshot");
        }
        Ok(())
    }
}
