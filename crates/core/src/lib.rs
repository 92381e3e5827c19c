//! Domain layer for the armory service.
//!
//! Holds the character cache orchestration, the statistics aggregation rules,
//! the error taxonomy shared by every layer, and the collaborator traits the
//! storage and parsing backends implement.

pub mod character;
pub mod error;
pub mod naming;
pub mod parsing;
pub mod statistics;
pub mod types;
