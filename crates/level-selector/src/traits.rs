//! Seams towards the host player.
//!
//! The selector never owns the player: it is handed a [`Host`] on every call
//! and asks it for the current container and playback. Rendering is delegated
//! to a [`Renderer`] that turns a [`LevelSelectorView`] into whatever markup the
//! host uses.
//!
//! All methods are synchronous. The host drives the selector from its own
//! event loop and the selector runs each call to completion.

use crate::model::{Level, LevelSelection, PlaybackId};
use crate::presentation::LevelSelectorView;

/// A playback instance of the host (one per loaded media).
pub trait Playback {
    /// Stable identity of this playback, used to key subscriptions.
    fn id(&self) -> PlaybackId;

    /// Levels the playback already knows about.
    ///
    /// May be non-empty before the selector subscribes, in which case the
    /// selector replays them instead of waiting for the next announcement.
    fn levels(&self) -> &[Level];

    /// Whether the playback exposes a current-level concept at all.
    ///
    /// Playbacks that cannot switch levels (progressive files, audio) return `false`
    /// and the selector stays hidden.
    fn reports_current_level(&self) -> bool;

    /// Forwards the user's choice to the engine.
    fn set_current_level(&mut self, selection: LevelSelection);
}

/// The host player as seen by the selector.
pub trait Host {
    fn has_active_container(&self) -> bool;

    fn current_playback(&self) -> Option<&dyn Playback>;

    fn current_playback_mut(&mut self) -> Option<&mut dyn Playback>;
}

/// Paints the view model.
///
/// Called only when there is something to present, after every state change
/// has been applied to the store.
pub trait Renderer {
    fn render(&mut self, view: &LevelSelectorView);
}

impl<F> Renderer for F
where
    F: FnMut(&LevelSelectorView),
{
    fn render(&mut self, view: &LevelSelectorView) {
        self(view)
    }
}
