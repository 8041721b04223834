//! Notifications exchanged with the host.
//!
//! Inbound: the host delivers [`Notification`]s (a [`HostEvent`] tagged with
//! the [`EventSource`] that emitted it). Whether a notification reaches a
//! handler is decided by the subscription manager, keyed by
//! `(EventSource, EventKind)`.
//!
//! Outbound: the selector publishes [`SelectorEvent`]s on a broadcast channel
//! for consumers that want to observe state changes out of band (analytics,
//! tests, accessibility announcers).

use std::fmt;

use crate::model::{Level, LevelId, LevelSelection, PlaybackId};

/// Object on the host side that emits notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventSource {
    /// Player core lifecycle.
    Core,
    /// Media control bar lifecycle.
    MediaControl,
    /// A specific playback instance.
    Playback(PlaybackId),
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::Core => f.write_str("core"),
            EventSource::MediaControl => f.write_str("media-control"),
            EventSource::Playback(id) => write!(f, "{id}"),
        }
    }
}

/// Discriminant of [`HostEvent`], used as a subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    CoreReady,
    ContainerChanged,
    MediaControlRendered,
    LevelsAvailable,
    LevelSwitchStart,
    LevelSwitchEnd,
    BitrateChanged,
}

impl EventKind {
    /// Kinds emitted by the core.
    pub const CORE: [EventKind; 1] = [EventKind::CoreReady];

    /// Kinds emitted by the media control.
    pub const MEDIA_CONTROL: [EventKind; 2] =
        [EventKind::ContainerChanged, EventKind::MediaControlRendered];

    /// Kinds emitted by a playback.
    pub const PLAYBACK: [EventKind; 4] = [
        EventKind::LevelsAvailable,
        EventKind::LevelSwitchStart,
        EventKind::LevelSwitchEnd,
        EventKind::BitrateChanged,
    ];
}

/// Payload of a host notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    CoreReady,
    /// The active container (and therefore playback) was replaced.
    ContainerChanged,
    /// The media control finished (re)drawing; the plugin may attach now.
    MediaControlRendered,
    /// A fresh level set, optionally with the engine's starting selection.
    LevelsAvailable {
        levels: Vec<Level>,
        initial: Option<LevelSelection>,
    },
    LevelSwitchStart,
    LevelSwitchEnd,
    /// The engine is now playing `level`.
    BitrateChanged { level: LevelId },
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::CoreReady => EventKind::CoreReady,
            HostEvent::ContainerChanged => EventKind::ContainerChanged,
            HostEvent::MediaControlRendered => EventKind::MediaControlRendered,
            HostEvent::LevelsAvailable { .. } => EventKind::LevelsAvailable,
            HostEvent::LevelSwitchStart => EventKind::LevelSwitchStart,
            HostEvent::LevelSwitchEnd => EventKind::LevelSwitchEnd,
            HostEvent::BitrateChanged { .. } => EventKind::BitrateChanged,
        }
    }
}

/// A host event together with its emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub source: EventSource,
    pub event: HostEvent,
}

impl Notification {
    pub fn new(source: EventSource, event: HostEvent) -> Self {
        Self { source, event }
    }

    pub fn core_ready() -> Self {
        Self::new(EventSource::Core, HostEvent::CoreReady)
    }

    pub fn container_changed() -> Self {
        Self::new(EventSource::MediaControl, HostEvent::ContainerChanged)
    }

    pub fn media_control_rendered() -> Self {
        Self::new(EventSource::MediaControl, HostEvent::MediaControlRendered)
    }

    pub fn levels_available(
        playback: PlaybackId,
        levels: Vec<Level>,
        initial: Option<LevelSelection>,
    ) -> Self {
        Self::new(
            EventSource::Playback(playback),
            HostEvent::LevelsAvailable { levels, initial },
        )
    }

    pub fn level_switch_start(playback: PlaybackId) -> Self {
        Self::new(EventSource::Playback(playback), HostEvent::LevelSwitchStart)
    }

    pub fn level_switch_end(playback: PlaybackId) -> Self {
        Self::new(EventSource::Playback(playback), HostEvent::LevelSwitchEnd)
    }

    pub fn bitrate_changed(playback: PlaybackId, level: LevelId) -> Self {
        Self::new(
            EventSource::Playback(playback),
            HostEvent::BitrateChanged { level },
        )
    }
}

/// Out-of-band events published by the selector.
///
/// Every event is sent after the state it describes has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEvent {
    /// A level set was stored (from the host or from a replay).
    LevelsChanged { count: usize },
    /// Buffered levels of a freshly bound playback were replayed.
    LevelsReplayed { playback: PlaybackId, count: usize },
    /// The user picked a level (or AUTO).
    SelectionChanged { selection: LevelSelection },
    /// The engine reported a new current level; `None` if it is unknown.
    CurrentLevelChanged { level: Option<LevelId> },
    SwitchStarted,
    SwitchEnded,
    /// Listeners were moved to a new playback (or to none).
    Rebound { playback: Option<PlaybackId> },
    /// All listeners were removed.
    Detached,
}
