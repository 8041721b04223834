//! Pure derivation of the render-ready view model.
//!
//! Nothing here mutates state or touches the host; every function takes the
//! store (and a few flags) and returns plain data for a [`crate::Renderer`].

use crate::model::{LevelId, LevelSelection};
use crate::store::LevelStore;
use crate::traits::Host;

/// Button text while adaptive selection is active.
pub const AUTO_TEXT: &str = "AUTO";

/// Button text when the selected level vanished from the set.
pub const PLACEHOLDER_TEXT: &str = "?";

/// What the host currently has to offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostPresence {
    pub container: bool,
    pub playback: bool,
    /// The playback exposes a current-level concept.
    pub reports_current_level: bool,
}

impl HostPresence {
    pub fn of(host: &dyn Host) -> Self {
        let playback = host.current_playback();
        Self {
            container: host.has_active_container(),
            playback: playback.is_some(),
            reports_current_level: playback.is_some_and(|p| p.reports_current_level()),
        }
    }
}

/// Flags owned by the selector rather than the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState<'a> {
    pub title: Option<&'a str>,
    /// A level switch is in flight.
    pub switching: bool,
    pub menu_open: bool,
}

/// One row of the level list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub id: LevelId,
    pub label: String,
    /// The engine is playing this level.
    pub current: bool,
    /// The user locked playback to this level.
    pub selected: bool,
}

/// Everything a renderer needs to paint the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSelectorView {
    pub title: Option<String>,
    pub button_text: String,
    pub highlighted_level_id: Option<LevelId>,
    /// Levels in display order. The AUTO row is implied.
    pub levels: Vec<LevelEntry>,
    pub selection: LevelSelection,
    pub switching: bool,
    pub menu_open: bool,
}

/// Whether the host should render the selector at all.
pub fn should_present(store: &LevelStore, presence: HostPresence) -> bool {
    presence.container && presence.playback && presence.reports_current_level && !store.is_empty()
}

pub fn button_text(store: &LevelStore) -> String {
    match store.effective_selection() {
        LevelSelection::Auto => match store.current_level() {
            Some(current) => format!("{AUTO_TEXT} ({})", current.label),
            None => AUTO_TEXT.to_string(),
        },
        LevelSelection::Level(id) => store
            .find_by_id(id)
            .map(|level| level.label.clone())
            .unwrap_or_else(|| PLACEHOLDER_TEXT.to_string()),
    }
}

/// The one entry to mark as "current"; every other entry is unmarked.
pub fn highlighted_level_id(store: &LevelStore) -> Option<LevelId> {
    store.current_level().map(|level| level.id)
}

pub fn view(store: &LevelStore, state: ViewState<'_>) -> LevelSelectorView {
    let highlighted = highlighted_level_id(store);
    let selection = store.effective_selection();
    let levels = store
        .levels()
        .iter()
        .map(|level| LevelEntry {
            id: level.id,
            label: level.label.clone(),
            current: highlighted == Some(level.id),
            selected: selection == LevelSelection::Level(level.id),
        })
        .collect();

    LevelSelectorView {
        title: state.title.map(str::to_string),
        button_text: button_text(store),
        highlighted_level_id: highlighted,
        levels,
        selection,
        switching: state.switching,
        menu_open: state.menu_open,
    }
}
