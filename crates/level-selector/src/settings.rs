//! Configuration for the `level-selector` crate.
//!
//! The options bag is static: it is read whenever a level set is
//! (re)established and never written back. Every key is optional; an absent
//! key means "no override".
//!
//! Included configuration domains:
//! - Presentation (`title` shown above the level list)
//! - Label overrides keyed by the level name the stream advertises
//! - Out-of-band event channel sizing
//!
//! Hosts usually carry this bag inside their player options under the
//! `levelSelectorConfig` key; [`LevelSelectorSettings::from_player_options_json`]
//! extracts it from there.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{SelectorError, SelectorResult};

/// Key under which hosts nest the selector's options bag.
pub const PLAYER_OPTIONS_KEY: &str = "levelSelectorConfig";

/// Unified settings for the level selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelSelectorSettings {
    /// Optional heading rendered above the level list.
    /// Default: none.
    pub title: Option<String>,

    /// Custom labels keyed by level name (e.g. `"720p" -> "HD"`).
    /// Names that do not exist in the current stream are ignored.
    /// Default: empty.
    pub labels: BTreeMap<String, String>,

    /// Capacity of the broadcast channel carrying `SelectorEvent`s.
    /// Slow receivers observe `Lagged` rather than blocking the selector.
    /// Default: 32.
    pub event_channel_capacity: usize,
}

impl Default for LevelSelectorSettings {
    fn default() -> Self {
        Self {
            title: None,
            labels: BTreeMap::new(),
            event_channel_capacity: 32,
        }
    }
}

impl LevelSelectorSettings {
    // -------------------------
    // Constructors
    // -------------------------

    /// Create default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a standalone options bag such as `{"title": "Quality", "labels": {"720p": "HD"}}`.
    pub fn from_json(json: &str) -> SelectorResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses the host player options and extracts the `levelSelectorConfig` bag.
    ///
    /// A missing key yields default settings.
    pub fn from_player_options_json(json: &str) -> SelectorResult<Self> {
        let mut options: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| SelectorError::from(e).with_context("reading player options"))?;
        let settings = match options.get_mut(PLAYER_OPTIONS_KEY).map(serde_json::Value::take) {
            None | Some(serde_json::Value::Null) => Self::default(),
            Some(bag) => serde_json::from_value(bag)
                .map_err(|e| SelectorError::from(e).with_context("reading levelSelectorConfig"))?,
        };
        settings.validate()?;
        Ok(settings)
    }

    // -------------------------
    // Builder-style setters
    // -------------------------

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds (or replaces) the label override for levels named `name`.
    pub fn with_label(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(name.into(), label.into());
        self
    }

    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity;
        self
    }

    // -------------------------
    // Validation
    // -------------------------

    /// Rejects values that cannot be honored.
    pub fn validate(&self) -> SelectorResult<()> {
        if self.event_channel_capacity == 0 {
            return Err(SelectorError::InvalidSettings(
                "eventChannelCapacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
