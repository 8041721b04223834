//! Video quality level selection for media player hosts.
//!
//! This crate holds the state behind a "quality" button in a player's media
//! control bar: the list of levels (renditions) the playback offers, which one
//! the user picked (or AUTO), which one the engine is actually playing, and
//! which host event sources the selector is listening to.
//!
//! Design goals:
//! - Keep the host out of the core: the player, its event bus and its markup
//!   are reached only through the [`Host`], [`Playback`] and [`Renderer`] traits.
//! - Survive container swaps: listeners are rebound transactionally and the
//!   user's selection outlives every level set.
//! - Never fail towards the host: lookup misses and stale sources are resolved
//!   locally.
//!
//! This crate is composed of several modules:
//! - `model`: Level ids, selections and level records.
//! - `store`: `LevelStore`, the single source of truth for levels and selection.
//! - `subscription`: `SubscriptionManager`, bindings and the switching state machine.
//! - `presentation`: Pure derivation of the view model.
//! - `events`: Host notifications and out-of-band selector events.
//! - `traits`: Host, playback and renderer seams.
//! - `selector`: `LevelSelector`, the plugin wiring everything together.
//! - `settings`: The configuration options bag.
//! - `error`: Unified error types.
//!
//! This file (`lib.rs`) acts as a facade: it re-exports the main types of the
//! internal modules to form the public API.

mod error;
mod events;
mod model;
mod presentation;
mod selector;
mod settings;
mod store;
mod subscription;
mod traits;

pub use crate::error::{SelectorError, SelectorResult};
pub use crate::events::{EventKind, EventSource, HostEvent, Notification, SelectorEvent};
pub use crate::model::{
    AUTO_SENTINEL, Level, LevelId, LevelRef, LevelSelection, PlaybackId, validate_levels,
};
pub use crate::presentation::{
    AUTO_TEXT, HostPresence, LevelEntry, LevelSelectorView, PLACEHOLDER_TEXT, ViewState,
    button_text, highlighted_level_id, should_present, view,
};
pub use crate::selector::{LevelSelector, PLUGIN_NAME, VERSION};
pub use crate::settings::{LevelSelectorSettings, PLAYER_OPTIONS_KEY};
pub use crate::store::LevelStore;
pub use crate::subscription::{BindingState, SubscriptionManager};
pub use crate::traits::{Host, Playback, Renderer};
