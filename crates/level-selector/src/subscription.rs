//! Subscription bookkeeping for host event sources.
//!
//! The manager keeps the set of `(EventSource, EventKind)` pairs this plugin
//! currently listens to, plus the one playback source those playback
//! listeners belong to. The host may deliver anything at any time; only
//! notifications matching a live binding get through [`SubscriptionManager::accepts`].
//! Removing a binding therefore cancels delivery to its handler immediately.
//!
//! Per playback source the manager also tracks:
//!
//! ```text
//! Unbound --bind--> Bound --switch start--> Switching
//!    ^                ^ <----switch end------ |
//!    |                |                       |
//!    +---unbind/rebind+-----------------------+
//! ```

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::events::{EventKind, EventSource};
use crate::model::PlaybackId;

/// Binding state of the playback listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingState {
    #[default]
    Unbound,
    Bound,
    /// A level switch is in flight on the bound playback.
    Switching,
}

#[derive(Debug, Default)]
pub struct SubscriptionManager {
    bindings: BTreeSet<(EventSource, EventKind)>,
    /// The playback whose listeners are in `bindings`.
    playback: Option<PlaybackId>,
    state: BindingState,
    /// Playback whose buffered levels were already replayed, until it sends its own.
    replayed: Option<PlaybackId>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listens to core and media-control lifecycle, and to `playback` when one exists.
    ///
    /// Existing bindings are kept; binding twice is harmless.
    pub fn bind(&mut self, playback: Option<PlaybackId>) {
        for kind in EventKind::CORE {
            self.bindings.insert((EventSource::Core, kind));
        }
        for kind in EventKind::MEDIA_CONTROL {
            self.bindings.insert((EventSource::MediaControl, kind));
        }
        if let Some(playback) = playback {
            self.bind_playback(playback);
        }
    }

    /// Listens to the playback events of `playback`.
    ///
    /// A different playback that was bound before is released first.
    pub fn bind_playback(&mut self, playback: PlaybackId) {
        if self.playback == Some(playback) {
            trace!(playback = %playback, "playback already bound");
            return;
        }
        self.unbind_playback();
        for kind in EventKind::PLAYBACK {
            self.bindings.insert((EventSource::Playback(playback), kind));
        }
        self.playback = Some(playback);
        self.state = BindingState::Bound;
        debug!(playback = %playback, "playback listeners bound");
    }

    /// Transactional unbind-then-bind onto `playback`.
    ///
    /// Everything is dropped first, so no listener of the previous playback
    /// survives even if `playback` is the same source or `None`.
    pub fn rebind(&mut self, playback: Option<PlaybackId>) {
        self.unbind();
        self.bind(playback);
        debug!(playback = ?playback, "listeners rebound");
    }

    /// Removes every listener. Safe to call repeatedly.
    pub fn unbind(&mut self) {
        self.unbind_playback();
        self.bindings.clear();
    }

    /// Removes the playback listeners only.
    ///
    /// Nothing bound is a normal situation (container already gone) and is skipped.
    pub fn unbind_playback(&mut self) {
        let Some(playback) = self.playback.take() else {
            trace!("no playback bound, skipping unbind");
            return;
        };
        self.bindings
            .retain(|(source, _)| *source != EventSource::Playback(playback));
        self.state = BindingState::Unbound;
        debug!(playback = %playback, "playback listeners released");
    }

    /// Whether a notification of `kind` from `source` should be delivered.
    pub fn accepts(&self, source: EventSource, kind: EventKind) -> bool {
        self.bindings.contains(&(source, kind))
    }

    pub fn playback(&self) -> Option<PlaybackId> {
        self.playback
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn is_switching(&self) -> bool {
        self.state == BindingState::Switching
    }

    pub fn is_bound(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Bound → Switching. Ignored without a bound playback.
    pub fn begin_switch(&mut self) {
        match self.state {
            BindingState::Bound | BindingState::Switching => self.state = BindingState::Switching,
            BindingState::Unbound => trace!("switch start without bound playback"),
        }
    }

    /// Switching → Bound. Ignored without a bound playback.
    pub fn end_switch(&mut self) {
        match self.state {
            BindingState::Bound | BindingState::Switching => self.state = BindingState::Bound,
            BindingState::Unbound => trace!("switch end without bound playback"),
        }
    }

    /// Decides whether buffered levels of `playback` should be replayed.
    ///
    /// Answers `true` once per playback until that playback delivers a level
    /// set of its own (see [`SubscriptionManager::note_levels_delivered`]).
    pub fn take_replay(&mut self, playback: PlaybackId, has_buffered_levels: bool) -> bool {
        if !has_buffered_levels {
            return false;
        }
        if self.replayed == Some(playback) {
            trace!(playback = %playback, "buffered levels already replayed");
            return false;
        }
        self.replayed = Some(playback);
        true
    }

    /// Records that `playback` emitted levels itself, re-arming replay.
    pub fn note_levels_delivered(&mut self, playback: PlaybackId) {
        if self.replayed == Some(playback) {
            self.replayed = None;
        }
    }

    /// Re-arms replay for every playback. Call when the replayed levels were dropped.
    pub fn forget_replay(&mut self) {
        if let Some(playback) = self.replayed.take() {
            trace!(playback = %playback, "replayed levels dropped");
        }
    }
}
