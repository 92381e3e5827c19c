//! Save-file backed [`CharacterParser`].
//!
//! Reads `<root>/<name>` and decodes the fixed-offset header of the save
//! file into a JSON summary. Item, skill and quest sections are not decoded.

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use crate::character::{CharacterParser, CharacterRecord};
use crate::error::CoreError;
use crate::naming::validate_character_name;

/// Signature at offset 0 of every save file.
pub const SAVE_FILE_SIGNATURE: u32 = 0xaa55_aa55;

/// Number of header bytes required to produce a summary.
pub const HEADER_LEN: usize = 44;

const OFFSET_VERSION: usize = 0x04;
const OFFSET_FILE_SIZE: usize = 0x08;
const OFFSET_CHECKSUM: usize = 0x0c;
const OFFSET_NAME: usize = 0x14;
const NAME_LEN: usize = 16;
const OFFSET_STATUS: usize = 0x24;
const OFFSET_CLASS: usize = 0x28;
const OFFSET_LEVEL: usize = 0x2b;

const STATUS_HARDCORE: u8 = 0x04;
const STATUS_DIED: u8 = 0x08;
const STATUS_EXPANSION: u8 = 0x20;

/// Header fields of a save file, serialized as the snapshot payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveHeader {
    pub version: u32,
    pub file_size: u32,
    pub checksum: u32,
    pub name: String,
    pub class: &'static str,
    pub level: u8,
    pub hardcore: bool,
    pub died: bool,
    pub expansion: bool,
}

/// Decode the header of a save file.
///
/// Fails with [`CoreError::Internal`] on a short buffer or wrong signature.
pub fn parse_header(bytes: &[u8]) -> Result<SaveHeader, CoreError> {
    if bytes.len() < HEADER_LEN {
        return Err(CoreError::Internal(format!(
            "binary parse error: save file is {} bytes, header needs {HEADER_LEN}",
            bytes.len()
        )));
    }

    let signature = read_u32(bytes, 0);
    if signature != SAVE_FILE_SIGNATURE {
        return Err(CoreError::Internal(format!(
            "binary parse error: unexpected signature {signature:#010x}"
        )));
    }

    let raw_name = &bytes[OFFSET_NAME..OFFSET_NAME + NAME_LEN];
    let name_end = raw_name.iter().position(|b| *b == 0).unwrap_or(NAME_LEN);
    let name = String::from_utf8_lossy(&raw_name[..name_end]).into_owned();
    let status = bytes[OFFSET_STATUS];

    Ok(SaveHeader {
        version: read_u32(bytes, OFFSET_VERSION),
        file_size: read_u32(bytes, OFFSET_FILE_SIZE),
        checksum: read_u32(bytes, OFFSET_CHECKSUM),
        name,
        class: class_name(bytes[OFFSET_CLASS]),
        level: bytes[OFFSET_LEVEL],
        hardcore: status & STATUS_HARDCORE != 0,
        died: status & STATUS_DIED != 0,
        expansion: status & STATUS_EXPANSION != 0,
    })
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn class_name(id: u8) -> &'static str {
    match id {
        0 => "Amazon",
        1 => "Sorceress",
        2 => "Necromancer",
        3 => "Paladin",
        4 => "Barbarian",
        5 => "Druid",
        6 => "Assassin",
        _ => "Unknown",
    }
}

/// Parses characters from save files stored flat under a root directory.
#[derive(Debug, Clone)]
pub struct SaveFileParser {
    root: PathBuf,
}

impl SaveFileParser {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CharacterParser for SaveFileParser {
    async fn parse(&self, name: &str) -> Result<CharacterRecord, CoreError> {
        // Names double as file names; never let one escape the root.
        validate_character_name(name)?;

        let path = self.root.join(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CoreError::not_found("Save file", name));
            }
            Err(err) => {
                return Err(CoreError::Internal(format!(
                    "failed to read save file {}: {err}",
                    path.display()
                )));
            }
        };

        let header = parse_header(&bytes)?;
        let payload = serde_json::to_value(&header)
            .map_err(|e| CoreError::Internal(format!("failed to encode save header: {e}")))?;

        tracing::debug!(character = name, level = header.level, "Parsed save file");

        Ok(CharacterRecord {
            id: name.to_string(),
            payload,
            last_parsed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn header_bytes(name: &str, class: u8, level: u8, status: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; 64];
        bytes[0..4].copy_from_slice(&SAVE_FILE_SIGNATURE.to_le_bytes());
        bytes[OFFSET_VERSION..OFFSET_VERSION + 4].copy_from_slice(&96u32.to_le_bytes());
        bytes[OFFSET_FILE_SIZE..OFFSET_FILE_SIZE + 4].copy_from_slice(&64u32.to_le_bytes());
        bytes[OFFSET_CHECKSUM..OFFSET_CHECKSUM + 4].copy_from_slice(&0xdead_beefu32.to_le_bytes());
        bytes[OFFSET_NAME..OFFSET_NAME + name.len()].copy_from_slice(name.as_bytes());
        bytes[OFFSET_STATUS] = status;
        bytes[OFFSET_CLASS] = class;
        bytes[OFFSET_LEVEL] = level;
        bytes
    }

    #[test]
    fn decodes_header_fields() {
        let bytes = header_bytes("nokka", 4, 87, STATUS_EXPANSION | STATUS_HARDCORE);

        let header = parse_header(&bytes).unwrap();

        assert_eq!(
            header,
            SaveHeader {
                version: 96,
                file_size: 64,
                checksum: 0xdead_beef,
                name: "nokka".into(),
                class: "Barbarian",
                level: 87,
                hardcore: true,
                died: false,
                expansion: true,
            }
        );
    }

    #[test]
    fn rejects_short_buffer() {
        assert_matches!(parse_header(&[0u8; 10]), Err(CoreError::Internal(_)));
    }

    #[test]
    fn rejects_wrong_signature() {
        let mut bytes = header_bytes("nokka", 0, 1, 0);
        bytes[0] = 0;
        let err = parse_header(&bytes).unwrap_err();
        assert!(err.to_string().contains("signature"));
    }

    #[tokio::test]
    async fn parses_file_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nokka"), header_bytes("nokka", 1, 42, 0)).unwrap();
        let parser = SaveFileParser::new(dir.path());

        let record = parser.parse("nokka").await.unwrap();

        assert_eq!(record.id, "nokka");
        assert_eq!(record.payload["class"], "Sorceress");
        assert_eq!(record.payload["level"], 42);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let parser = SaveFileParser::new(dir.path());

        assert_matches!(parser.parse("nokka").await, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn corrupt_file_is_internal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nokka"), b"not a save file").unwrap();
        let parser = SaveFileParser::new(dir.path());

        assert_matches!(parser.parse("nokka").await, Err(CoreError::Internal(_)));
    }
}
