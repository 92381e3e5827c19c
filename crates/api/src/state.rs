use std::sync::Arc;

use armory_core::character::CharacterService;
use armory_core::parsing::SaveFileParser;
use armory_core::statistics::StatisticsService;
use armory_db::repositories::{CharacterRepo, StatisticsRepo};
use armory_db::DbPool;

use crate::config::ServerConfig;

/// Character cache service wired to the save-file parser and PostgreSQL.
pub type Characters = CharacterService<SaveFileParser, CharacterRepo>;

/// Statistics service wired to PostgreSQL.
pub type Statistics = StatisticsService<StatisticsRepo>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Server configuration (credentials are read by the basic-auth extractor).
    pub config: Arc<ServerConfig>,
    pub characters: Arc<Characters>,
    pub statistics: Arc<Statistics>,
}

impl AppState {
    /// Build the services over `pool` according to `config`.
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        let characters = CharacterService::new(
            SaveFileParser::new(config.save_path.clone()),
            CharacterRepo::new(pool.clone()),
            config.cache_duration,
        );
        let statistics = StatisticsService::new(StatisticsRepo::new(pool.clone()));

        Self {
            pool,
            config: Arc::new(config),
            characters: Arc::new(characters),
            statistics: Arc::new(statistics),
        }
    }
}
