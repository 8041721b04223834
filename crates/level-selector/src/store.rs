//! Level store: single source of truth for levels and selection.
//!
//! The store owns three pieces of state:
//! - the current level set, replaced wholesale whenever the host announces levels,
//! - the user's selection (AUTO or a concrete level), initialized once and then
//!   only changed by explicit [`LevelStore::select`] calls,
//! - the level the playback engine reports as currently playing.
//!
//! Label overrides are applied while a level set is being established, on the
//! owned records before they are stored. Readers only ever see finished sets.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::error::{SelectorError, SelectorResult};
use crate::model::{Level, LevelId, LevelRef, LevelSelection};

#[derive(Debug, Clone, Default)]
pub struct LevelStore {
    levels: Vec<Level>,
    /// `None` until the first level set arrives or the user picks something.
    selection: Option<LevelSelection>,
    /// Id of the level the engine is playing; only set when it was found in `levels`.
    current: Option<LevelId>,
    label_overrides: BTreeMap<String, String>,
}

impl LevelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that applies `overrides` to every level set it receives.
    pub fn with_label_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self {
            label_overrides: overrides,
            ..Self::default()
        }
    }

    /// Replaces the level set.
    ///
    /// The selection is initialized to `initial` only if nothing was ever
    /// selected; an existing selection survives every replacement.
    ///
    /// Levels using the reserved AUTO id, and repeated ids, are dropped with a
    /// warning so lookups stay unambiguous.
    pub fn set_levels(&mut self, levels: Vec<Level>, initial: LevelSelection) {
        if self.selection.is_none() {
            debug!(selection = %initial, "initializing level selection");
            self.selection = Some(initial);
        }

        let mut accepted: Vec<Level> = Vec::with_capacity(levels.len());
        for mut level in levels {
            if level.id.is_reserved() {
                warn!(id = %level.id, "dropping level that uses the AUTO id");
                continue;
            }
            if accepted.iter().any(|l| l.id == level.id) {
                warn!(id = %level.id, "dropping level with duplicate id");
                continue;
            }
            if let Some(name) = &level.name {
                level.label = name.clone();
            } else if level.label.is_empty() {
                level.label = level.id.to_string();
            }
            accepted.push(level);
        }

        for (name, label) in &self.label_overrides {
            for level in accepted
                .iter_mut()
                .filter(|l| l.name.as_deref() == Some(name.as_str()))
            {
                trace!(name = %name, label = %label, "applying label override");
                level.label = label.clone();
            }
        }

        debug!(count = accepted.len(), "level set replaced");
        self.levels = accepted;
    }

    /// Drops the level set and the current level. The selection is kept.
    pub fn clear_levels(&mut self) {
        self.levels.clear();
        self.current = None;
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn find_by_id(&self, id: LevelId) -> Option<&Level> {
        self.find(LevelRef::Id(id))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Level> {
        self.find(LevelRef::Name(name))
    }

    /// First level addressed by `reference`.
    pub fn find(&self, reference: LevelRef<'_>) -> Option<&Level> {
        self.levels.iter().find(|level| level.matches(reference))
    }

    /// Like [`LevelStore::find`] but reports a miss as [`SelectorError::LookupMiss`].
    pub fn resolve(&self, reference: LevelRef<'_>) -> SelectorResult<&Level> {
        self.find(reference)
            .ok_or_else(|| SelectorError::lookup_miss(reference))
    }

    /// Sets the label of every level addressed by `reference`.
    ///
    /// Returns whether any level changed. A miss leaves the set untouched.
    pub fn relabel<'a>(&mut self, reference: impl Into<LevelRef<'a>>, label: &str) -> bool {
        let reference = reference.into();
        let mut changed = false;
        for level in self.levels.iter_mut().filter(|l| l.matches(reference)) {
            level.label = label.to_string();
            changed = true;
        }
        if !changed {
            trace!(reference = %reference, "relabel target not present");
        }
        changed
    }

    /// Records the user's choice.
    ///
    /// The id is not checked against the level set: a choice made before
    /// levels arrive is kept and honored later.
    pub fn select(&mut self, selection: LevelSelection) {
        if let LevelSelection::Level(id) = selection {
            if self.is_empty() {
                debug!(error = %SelectorError::PrematureSelect, id = %id, "keeping selection");
            } else if self.find_by_id(id).is_none() {
                debug!(id = %id, "selected level is not in the current set");
            }
        }
        self.selection = Some(selection);
    }

    /// The user's choice, or `None` if neither levels nor a selection arrived yet.
    pub fn selection(&self) -> Option<LevelSelection> {
        self.selection
    }

    /// The user's choice, defaulting to AUTO before initialization.
    pub fn effective_selection(&self) -> LevelSelection {
        self.selection.unwrap_or_default()
    }

    /// Tracks the level reported by the engine; unknown ids clear it.
    pub fn update_current(&mut self, id: LevelId) {
        self.current = self.find_by_id(id).map(|level| level.id);
        if self.current.is_none() {
            trace!(id = %id, "current level not in set");
        }
    }

    /// The level the engine is playing, as labeled in the current set.
    pub fn current_level(&self) -> Option<&Level> {
        self.current.and_then(|id| self.find_by_id(id))
    }
}
