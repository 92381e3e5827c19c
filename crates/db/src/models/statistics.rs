//! Statistics document rows.
//!
//! A document is spread over `character_statistics` (identity),
//! `difficulty_totals` (scalar counters per bucket), `special_kills` and
//! `area_stats` (map entries per bucket).

use armory_core::statistics::{AreaStats, CharacterStatistics, Difficulty};
use sqlx::FromRow;

use crate::error::from_db_count;

/// A row from the `character_statistics` table.
#[derive(Debug, Clone, FromRow)]
pub struct StatisticsRow {
    pub character: String,
    pub account: String,
}

/// A row from the `difficulty_totals` table.
#[derive(Debug, Clone, FromRow)]
pub struct DifficultyTotalsRow {
    pub difficulty: String,
    pub total_kills: i64,
    pub total_unique_kills: i64,
    pub total_champ_kills: i64,
}

/// A row from the `special_kills` table.
#[derive(Debug, Clone, FromRow)]
pub struct SpecialKillRow {
    pub difficulty: String,
    pub monster: String,
    pub kills: i64,
}

/// A row from the `area_stats` table.
#[derive(Debug, Clone, FromRow)]
pub struct AreaStatsRow {
    pub difficulty: String,
    pub area: String,
    pub kills: i64,
    pub time_spent: i64,
    pub unique_kills: i64,
    pub champ_kills: i64,
}

/// Assemble a document from its rows. Rows with an unknown difficulty are skipped.
///
/// Map entries keep the order of the given rows.
pub fn assemble(
    identity: StatisticsRow,
    totals: Vec<DifficultyTotalsRow>,
    specials: Vec<SpecialKillRow>,
    areas: Vec<AreaStatsRow>,
) -> CharacterStatistics {
    let mut stats = CharacterStatistics::baseline(&identity.account, &identity.character);

    for row in totals {
        let Some(difficulty) = Difficulty::from_key(&row.difficulty) else {
            continue;
        };
        let bucket = stats.bucket_mut(difficulty);
        bucket.total_kills = from_db_count(row.total_kills);
        bucket.total_unique_kills = from_db_count(row.total_unique_kills);
        bucket.total_champ_kills = from_db_count(row.total_champ_kills);
    }

    for row in specials {
        if let Some(difficulty) = Difficulty::from_key(&row.difficulty) {
            stats
                .bucket_mut(difficulty)
                .special
                .insert(row.monster, from_db_count(row.kills));
        }
    }

    for row in areas {
        if let Some(difficulty) = Difficulty::from_key(&row.difficulty) {
            stats.bucket_mut(difficulty).area.insert(
                row.area,
                AreaStats {
                    kills: from_db_count(row.kills),
                    time: from_db_count(row.time_spent),
                    unique_kills: from_db_count(row.unique_kills),
                    champ_kills: from_db_count(row.champ_kills),
                },
            );
        }
    }

    stats
}
