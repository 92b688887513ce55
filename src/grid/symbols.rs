//! Bidirectional id ↔ name tables shared with the grid environment
//!
//! The environment owns these tables; the encoders mirror them exactly. A
//! name or id missing on either side is a setup bug and surfaces as
//! [`SspError::UnknownSymbol`].

use crate::{Result, SspError};
use serde::{Deserialize, Serialize};

/// MiniGrid object types, indexed by id
pub const OBJECT_NAMES: [&str; 11] = [
    "unseen", "empty", "wall", "floor", "door", "key", "ball", "box", "goal", "lava", "agent",
];

/// MiniGrid colours, indexed by id
pub const COLOR_NAMES: [&str; 6] = ["red", "green", "blue", "purple", "yellow", "grey"];

/// MiniGrid door states, indexed by id
pub const STATE_NAMES: [&str; 3] = ["open", "closed", "locked"];

/// One id ↔ name table; the id is the position in `names`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    kind: String,
    names: Vec<String>,
}

impl SymbolTable {
    pub fn new<I, S>(kind: &str, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() > usize::from(u8::MAX) + 1 {
            return Err(SspError::Configuration(format!(
                "{} table has {} entries; ids must fit in a byte",
                kind,
                names.len()
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(SspError::Configuration(format!(
                    "Duplicate {} name '{}'",
                    kind, name
                )));
            }
        }
        Ok(Self {
            kind: kind.to_string(),
            names,
        })
    }

    /// Id for `name`
    pub fn id(&self, name: &str) -> Result<u8> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| i as u8)
            .ok_or_else(|| SspError::UnknownSymbol(format!("{} '{}'", self.kind, name)))
    }

    /// Name for `id`
    pub fn name(&self, id: u8) -> Result<&str> {
        self.names
            .get(usize::from(id))
            .map(String::as_str)
            .ok_or_else(|| SspError::UnknownSymbol(format!("{} id {}", self.kind, id)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Object, colour and state tables together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTables {
    pub objects: SymbolTable,
    pub colors: SymbolTable,
    pub states: SymbolTable,
}

impl SymbolTables {
    /// Standard MiniGrid tables
    pub fn minigrid() -> Self {
        let table = |kind: &str, names: &[&str]| SymbolTable {
            kind: kind.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
        };
        Self {
            objects: table("object", &OBJECT_NAMES),
            colors: table("color", &COLOR_NAMES),
            states: table("state", &STATE_NAMES),
        }
    }
}

impl Default for SymbolTables {
    fn default() -> Self {
        Self::minigrid()
    }
}
