//! Query parameter types for API handlers.

use serde::Deserialize;

/// `?name=` selecting a character snapshot.
#[derive(Debug, Deserialize)]
pub struct NameParams {
    #[serde(default)]
    pub name: String,
}

/// `?character=` selecting a statistics document.
#[derive(Debug, Deserialize)]
pub struct CharacterParams {
    #[serde(default)]
    pub character: String,
}
