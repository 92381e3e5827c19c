pub mod character_repo;
pub mod statistics_repo;

pub use character_repo::CharacterRepo;
pub use statistics_repo::StatisticsRepo;
