//! Village snapshots: raw building placements as read from JSON.

use crate::error::LoadError;
use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A village snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Village {
    /// Raw building placements in snapshot order.
    #[serde(default)]
    pub buildings: Vec<RawBuilding>,
}

impl Village {
    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid snapshot.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Distinct building kinds in first-seen order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = Vec::new();
        for building in &self.buildings {
            if !kinds.contains(&building.kind.as_str()) {
                kinds.push(&building.kind);
            }
        }
        kinds
    }
}

/// One raw building record.
///
/// Single-instance kinds give `x`/`y`; multi-instance kinds give a
/// `positions` list. Any other field is kept in `extras`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBuilding {
    /// Building kind name.
    #[serde(rename = "type", alias = "name")]
    pub kind: String,
    /// Building level, 1-based.
    #[serde(deserialize_with = "level_from_number_or_string")]
    pub level: u32,
    /// Singleton x position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    /// Singleton y position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    /// Positions of every instance of a multi-instance kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<[i32; 2]>>,
    /// Kind-specific extras (troop loadouts and the like).
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl RawBuilding {
    /// A single-position building.
    #[must_use]
    pub fn at(kind: impl Into<String>, level: u32, x: i32, y: i32) -> Self {
        Self {
            kind: kind.into(),
            level,
            x: Some(x),
            y: Some(y),
            positions: None,
            extras: Map::new(),
        }
    }

    /// A multi-position building.
    #[must_use]
    pub fn at_positions(kind: impl Into<String>, level: u32, positions: Vec<[i32; 2]>) -> Self {
        Self {
            kind: kind.into(),
            level,
            x: None,
            y: None,
            positions: Some(positions),
            extras: Map::new(),
        }
    }

    /// Attach an extra field (builder style).
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    /// The singleton position, if both coordinates are given.
    #[must_use]
    pub fn singleton(&self) -> Option<[i32; 2]> {
        Some([self.x?, self.y?])
    }
}

/// Levels appear both as numbers and as numeric strings in snapshots.
fn level_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Level {
        Number(u32),
        Text(String),
    }

    let level = match Level::deserialize(deserializer)? {
        Level::Number(n) => n,
        Level::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&s), &"a positive level"))?,
    };
    if level == 0 {
        return Err(de::Error::invalid_value(
            Unexpected::Unsigned(0),
            &"a positive level",
        ));
    }
    Ok(level)
}
