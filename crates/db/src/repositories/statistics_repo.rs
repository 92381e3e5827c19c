//! Repository for character statistics documents.
//!
//! Increments run in a single transaction: the bucket's scalar counters are
//! bumped with one `UPDATE` (which also row-locks the bucket), then every map
//! entry is merged with `INSERT ... ON CONFLICT DO UPDATE`.

use armory_core::error::CoreError;
use armory_core::statistics::{CharacterStatistics, Difficulty, StatisticsStore, StatisticsUpdate};

use crate::error::{classify, to_db_count};
use crate::models::statistics::{
    assemble, AreaStatsRow, DifficultyTotalsRow, SpecialKillRow, StatisticsRow,
};
use crate::DbPool;

const ENTITY: &str = "Statistics";

/// Provides [`StatisticsStore`] over PostgreSQL.
#[derive(Clone)]
pub struct StatisticsRepo {
    pool: DbPool,
}

impl StatisticsRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl StatisticsStore for StatisticsRepo {
    async fn get_by_character(&self, character: &str) -> Result<CharacterStatistics, CoreError> {
        let err = |e| classify(e, ENTITY, character);
        let mut tx = self.pool.begin().await.map_err(err)?;

        let identity = sqlx::query_as::<_, StatisticsRow>(
            "SELECT character, account FROM character_statistics WHERE character = $1",
        )
        .bind(character)
        .fetch_optional(&mut *tx)
        .await
        .map_err(err)?
        .ok_or_else(|| CoreError::not_found(ENTITY, character))?;

        let totals = sqlx::query_as::<_, DifficultyTotalsRow>(
            "SELECT difficulty, total_kills, total_unique_kills, total_champ_kills
             FROM difficulty_totals WHERE character = $1",
        )
        .bind(character)
        .fetch_all(&mut *tx)
        .await
        .map_err(err)?;

        let specials = sqlx::query_as::<_, SpecialKillRow>(
            "SELECT difficulty, monster, kills
             FROM special_kills WHERE character = $1
             ORDER BY difficulty, monster",
        )
        .bind(character)
        .fetch_all(&mut *tx)
        .await
        .map_err(err)?;

        let areas = sqlx::query_as::<_, AreaStatsRow>(
            "SELECT difficulty, area, kills, time_spent, unique_kills, champ_kills
             FROM area_stats WHERE character = $1
             ORDER BY difficulty, area",
        )
        .bind(character)
        .fetch_all(&mut *tx)
        .await
        .map_err(err)?;

        tx.commit().await.map_err(err)?;

        Ok(assemble(identity, totals, specials, areas))
    }

    async fn increment(&self, update: &StatisticsUpdate) -> Result<bool, CoreError> {
        let character = update.character.as_str();
        let difficulty = update.difficulty.as_str();
        let err = |e| classify(e, ENTITY, character);

        let total_kills = to_db_count(update.total_kills, "totalkills")?;
        let total_unique_kills = to_db_count(update.total_unique_kills, "totaluniquekills")?;
        let total_champ_kills = to_db_count(update.total_champ_kills, "totalchampkills")?;

        let mut tx = self.pool.begin().await.map_err(err)?;

        let matched = sqlx::query(
            "UPDATE difficulty_totals SET
                total_kills = total_kills + $3,
                total_unique_kills = total_unique_kills + $4,
                total_champ_kills = total_champ_kills + $5
             WHERE character = $1 AND difficulty = $2",
        )
        .bind(character)
        .bind(difficulty)
        .bind(total_kills)
        .bind(total_unique_kills)
        .bind(total_champ_kills)
        .execute(&mut *tx)
        .await
        .map_err(err)?
        .rows_affected();

        if matched == 0 {
            tx.rollback().await.map_err(err)?;
            return Ok(false);
        }

        for (monster, kills) in &update.special {
            sqlx::query(
                "INSERT INTO special_kills (character, difficulty, monster, kills)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (character, difficulty, monster) DO UPDATE SET
                    kills = special_kills.kills + EXCLUDED.kills",
            )
            .bind(character)
            .bind(difficulty)
            .bind(monster)
            .bind(to_db_count(*kills, "special")?)
            .execute(&mut *tx)
            .await
            .map_err(err)?;
        }

        for (area, stats) in &update.area {
            sqlx::query(
                "INSERT INTO area_stats
                    (character, difficulty, area, kills, time_spent, unique_kills, champ_kills)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (character, difficulty, area) DO UPDATE SET
                    kills = area_stats.kills + EXCLUDED.kills,
                    time_spent = area_stats.time_spent + EXCLUDED.time_spent,
                    unique_kills = area_stats.unique_kills + EXCLUDED.unique_kills,
                    champ_kills = area_stats.champ_kills + EXCLUDED.champ_kills",
            )
            .bind(character)
            .bind(difficulty)
            .bind(area)
            .bind(to_db_count(stats.kills, "kills")?)
            .bind(to_db_count(stats.time, "time")?)
            .bind(to_db_count(stats.unique_kills, "uniquekills")?)
            .bind(to_db_count(stats.champ_kills, "champkills")?)
            .execute(&mut *tx)
            .await
            .map_err(err)?;
        }

        tx.commit().await.map_err(err)?;

        tracing::debug!(
            character,
            difficulty,
            specials = update.special.len(),
            areas = update.area.len(),
            "Incremented statistics"
        );
        Ok(true)
    }

    async fn insert_baseline(&self, account: &str, character: &str) -> Result<(), CoreError> {
        let err = |e| classify(e, ENTITY, character);
        let mut tx = self.pool.begin().await.map_err(err)?;

        sqlx::query("INSERT INTO character_statistics (character, account) VALUES ($1, $2)")
            .bind(character)
            .bind(account)
            .execute(&mut *tx)
            .await
            .map_err(err)?;

        for difficulty in Difficulty::ALL {
            sqlx::query("INSERT INTO difficulty_totals (character, difficulty) VALUES ($1, $2)")
                .bind(character)
                .bind(difficulty.as_str())
                .execute(&mut *tx)
                .await
                .map_err(err)?;
        }

        tx.commit().await.map_err(err)?;
        Ok(())
    }

    async fn delete(&self, character: &str) -> Result<(), CoreError> {
        let removed = sqlx::query("DELETE FROM character_statistics WHERE character = $1")
            .bind(character)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, ENTITY, character))?
            .rows_affected();

        tracing::debug!(character, removed, "Deleted statistics");
        Ok(())
    }
}
