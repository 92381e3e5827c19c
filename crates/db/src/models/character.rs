//! Character snapshot model.

use armory_core::character::CharacterRecord;
use armory_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `characters` table.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterRow {
    pub id: String,
    pub payload: serde_json::Value,
    pub last_parsed_at: Timestamp,
}

impl From<CharacterRow> for CharacterRecord {
    fn from(row: CharacterRow) -> Self {
        Self {
            id: row.id,
            payload: row.payload,
            last_parsed_at: row.last_parsed_at,
        }
    }
}
