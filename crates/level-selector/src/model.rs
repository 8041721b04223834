//! Core data models used by the `level-selector` crate.
//!
//! This module is intentionally focused on *pure* types, with no host or
//! rendering concerns. Higher-level modules (`store`, `subscription`,
//! `presentation`) build on top of these types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SelectorError, SelectorResult};

/// Raw id reserved for automatic (adaptive) selection.
///
/// Hosts exchange selections as plain integers; this value never names a real level.
pub const AUTO_SENTINEL: i64 = -1;

/// Identifier of a quality level as assigned by the playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub i64);

impl LevelId {
    /// Whether this id collides with [`AUTO_SENTINEL`].
    pub fn is_reserved(self) -> bool {
        self.0 == AUTO_SENTINEL
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for LevelId {
    fn from(raw: i64) -> Self {
        LevelId(raw)
    }
}

/// Identifier of a playback source (one per media/container the host creates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaybackId(pub u64);

impl fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "playback#{}", self.0)
    }
}

/// The user's choice: adaptive selection or a concrete level.
///
/// Serialized as the raw integer form used by hosts (`-1` for AUTO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum LevelSelection {
    /// Let the playback engine pick the level.
    #[default]
    Auto,
    /// Lock playback to the given level.
    Level(LevelId),
}

impl LevelSelection {
    /// Decodes the host integer form, mapping [`AUTO_SENTINEL`] to [`LevelSelection::Auto`].
    pub fn from_raw(raw: i64) -> Self {
        if raw == AUTO_SENTINEL {
            LevelSelection::Auto
        } else {
            LevelSelection::Level(LevelId(raw))
        }
    }

    /// Encodes into the host integer form.
    pub fn to_raw(self) -> i64 {
        match self {
            LevelSelection::Auto => AUTO_SENTINEL,
            LevelSelection::Level(id) => id.0,
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, LevelSelection::Auto)
    }

    /// The concrete level id, if any.
    pub fn level_id(self) -> Option<LevelId> {
        match self {
            LevelSelection::Auto => None,
            LevelSelection::Level(id) => Some(id),
        }
    }
}

impl From<i64> for LevelSelection {
    fn from(raw: i64) -> Self {
        LevelSelection::from_raw(raw)
    }
}

impl From<LevelSelection> for i64 {
    fn from(selection: LevelSelection) -> Self {
        selection.to_raw()
    }
}

impl From<LevelId> for LevelSelection {
    fn from(id: LevelId) -> Self {
        LevelSelection::Level(id)
    }
}

impl fmt::Display for LevelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSelection::Auto => f.write_str("auto"),
            LevelSelection::Level(id) => write!(f, "level {id}"),
        }
    }
}

/// One selectable quality variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Engine-assigned id, unique within a level set.
    pub id: LevelId,
    /// Optional human-readable name advertised by the stream (e.g., "720p").
    #[serde(default)]
    pub name: Option<String>,
    /// Text shown to the user.
    #[serde(default)]
    pub label: String,
}

impl Level {
    /// Creates a level with an empty label and no name.
    pub fn new(id: i64) -> Self {
        Self {
            id: LevelId(id),
            name: None,
            label: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Whether this level is addressed by `reference`.
    pub fn matches(&self, reference: LevelRef<'_>) -> bool {
        match reference {
            LevelRef::Id(id) => self.id == id,
            LevelRef::Name(name) => self.name.as_deref() == Some(name),
        }
    }
}

/// Addresses a level either by id or by advertised name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRef<'a> {
    Id(LevelId),
    Name(&'a str),
}

impl fmt::Display for LevelRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelRef::Id(id) => write!(f, "id {id}"),
            LevelRef::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

impl From<LevelId> for LevelRef<'_> {
    fn from(id: LevelId) -> Self {
        LevelRef::Id(id)
    }
}

impl<'a> From<&'a str> for LevelRef<'a> {
    fn from(name: &'a str) -> Self {
        LevelRef::Name(name)
    }
}

/// Checks a host-provided level list against the id invariants.
///
/// Fails on the first level that uses [`AUTO_SENTINEL`] or repeats an earlier id.
pub fn validate_levels(levels: &[Level]) -> SelectorResult<()> {
    for (index, level) in levels.iter().enumerate() {
        if level.id.is_reserved() {
            return Err(SelectorError::ReservedLevelId(level.id));
        }
        if levels[..index].iter().any(|earlier| earlier.id == level.id) {
            return Err(SelectorError::DuplicateLevelId(level.id));
        }
    }
    Ok(())
}
