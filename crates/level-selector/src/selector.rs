//! The level selector plugin.
//!
//! [`LevelSelector`] wires host notifications to the [`LevelStore`], keeps the
//! [`SubscriptionManager`] in sync with the host's current playback, and hands
//! a fresh [`LevelSelectorView`] to the [`Renderer`] after every change.
//!
//! Ordering guarantees:
//! - store and subscription updates are applied before the renderer runs and
//!   before any [`SelectorEvent`] is published,
//! - notifications from sources that are not bound are dropped on entry, so a
//!   replaced playback can never reach a handler.

use tokio::sync::broadcast;
use tracing::{debug, instrument, trace};

use crate::events::{EventSource, HostEvent, Notification, SelectorEvent};
use crate::model::{Level, LevelId, LevelSelection, PlaybackId};
use crate::presentation::{self, HostPresence, LevelSelectorView, ViewState};
use crate::settings::LevelSelectorSettings;
use crate::store::LevelStore;
use crate::subscription::SubscriptionManager;
use crate::traits::{Host, Renderer};

/// Crate version, reported to hosts that list plugin versions.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Plugin name as registered with hosts.
pub const PLUGIN_NAME: &str = "level_selector";

pub struct LevelSelector<R: Renderer> {
    settings: LevelSelectorSettings,
    store: LevelStore,
    subscriptions: SubscriptionManager,
    renderer: R,
    menu_open: bool,
    /// Playback that delivered the stored level set.
    levels_owner: Option<PlaybackId>,
    /// Event broadcaster for out-of-band selector events.
    event_sender: broadcast::Sender<SelectorEvent>,
}

impl<R: Renderer> LevelSelector<R> {
    /// Creates an unattached selector.
    ///
    /// A zero `event_channel_capacity` is raised to one; use
    /// [`LevelSelectorSettings::validate`] to reject it instead.
    pub fn new(settings: LevelSelectorSettings, renderer: R) -> Self {
        let (event_sender, _) = broadcast::channel(settings.event_channel_capacity.max(1));
        Self {
            store: LevelStore::with_label_overrides(settings.labels.clone()),
            settings,
            subscriptions: SubscriptionManager::new(),
            renderer,
            menu_open: false,
            levels_owner: None,
            event_sender,
        }
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn settings(&self) -> &LevelSelectorSettings {
        &self.settings
    }

    pub fn store(&self) -> &LevelStore {
        &self.store
    }

    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.subscriptions
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Receives every [`SelectorEvent`] published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SelectorEvent> {
        self.event_sender.subscribe()
    }

    /// Starts listening to core and media-control lifecycle.
    ///
    /// Playback listeners are added once the core reports ready.
    pub fn attach(&mut self) {
        self.subscriptions.bind(None);
        debug!(plugin = PLUGIN_NAME, version = VERSION, "attached");
    }

    /// Tears the plugin down: removes every listener and discards levels and selection.
    ///
    /// Safe to call when nothing is bound.
    pub fn detach(&mut self) {
        self.subscriptions.unbind();
        self.subscriptions.forget_replay();
        self.store = LevelStore::with_label_overrides(self.settings.labels.clone());
        self.levels_owner = None;
        self.menu_open = false;
        self.emit(SelectorEvent::Detached);
    }

    /// Entry point for host notifications.
    #[instrument(skip_all, fields(source = %notification.source, kind = ?notification.event.kind()))]
    pub fn handle(&mut self, host: &dyn Host, notification: Notification) {
        let Notification { source, event } = notification;
        if !self.subscriptions.accepts(source, event.kind()) {
            trace!("not subscribed, dropping notification");
            return;
        }

        match event {
            HostEvent::CoreReady => self.bind_playback(host),
            HostEvent::ContainerChanged => self.reload(host),
            HostEvent::MediaControlRendered => self.render(host),
            HostEvent::LevelsAvailable { levels, initial } => {
                let EventSource::Playback(playback) = source else {
                    trace!("levels from a non-playback source");
                    return;
                };
                self.subscriptions.note_levels_delivered(playback);
                self.fill_levels(host, playback, levels, initial.unwrap_or_default());
            }
            HostEvent::LevelSwitchStart => self.start_level_switch(host),
            HostEvent::LevelSwitchEnd => self.stop_level_switch(host),
            HostEvent::BitrateChanged { level } => self.update_current_level(host, level),
        }
    }

    /// Records the user's choice and forwards it to the playback.
    pub fn select(&mut self, host: &mut dyn Host, selection: LevelSelection) {
        self.store.select(selection);
        self.menu_open = false;

        match host.current_playback_mut() {
            Some(playback) => playback.set_current_level(selection),
            None => trace!(selection = %selection, "no playback to forward selection to"),
        }

        self.emit(SelectorEvent::SelectionChanged { selection });
        self.render(host);
    }

    /// Opens or closes the level list.
    pub fn toggle_menu(&mut self, host: &dyn Host) {
        self.menu_open = !self.menu_open;
        self.render(host);
    }

    /// The view the renderer would get right now, or `None` if nothing should be shown.
    pub fn view(&self, host: &dyn Host) -> Option<LevelSelectorView> {
        presentation::should_present(&self.store, HostPresence::of(host))
            .then(|| presentation::view(&self.store, self.view_state()))
    }

    fn view_state(&self) -> ViewState<'_> {
        ViewState {
            title: self.settings.title.as_deref(),
            switching: self.subscriptions.is_switching(),
            menu_open: self.menu_open,
        }
    }

    fn render(&mut self, host: &dyn Host) {
        match self.view(host) {
            Some(view) => self.renderer.render(&view),
            None => trace!("nothing to present"),
        }
    }

    fn emit(&self, event: SelectorEvent) {
        // No receivers is fine.
        let _ = self.event_sender.send(event);
    }

    /// Binds the host's current playback and replays levels it already buffers.
    fn bind_playback(&mut self, host: &dyn Host) {
        let Some(playback) = host.current_playback().map(|p| p.id()) else {
            debug!("core ready without playback");
            return;
        };
        self.subscriptions.bind_playback(playback);
        self.replay_buffered_levels(host, playback);
    }

    /// Container swap: drop every listener, bind again to the new playback.
    ///
    /// Selection survives. The level list of the old playback does not; it is
    /// refilled by the replay or by the next announcement of the new playback.
    fn reload(&mut self, host: &dyn Host) {
        let playback = host.current_playback().map(|p| p.id());
        self.subscriptions.rebind(playback);
        if self.levels_owner.is_some() && self.levels_owner != playback {
            self.store.clear_levels();
            self.levels_owner = None;
            self.subscriptions.forget_replay();
        }
        self.emit(SelectorEvent::Rebound { playback });

        if let Some(playback) = playback {
            self.replay_buffered_levels(host, playback);
        }
    }

    fn replay_buffered_levels(&mut self, host: &dyn Host, playback: PlaybackId) {
        let buffered: Vec<Level> = host
            .current_playback()
            .map(|p| p.levels().to_vec())
            .unwrap_or_default();

        if !self.subscriptions.take_replay(playback, !buffered.is_empty()) {
            return;
        }

        let count = buffered.len();
        debug!(playback = %playback, count, "replaying buffered levels");
        self.fill_levels(host, playback, buffered, LevelSelection::Auto);
        self.emit(SelectorEvent::LevelsReplayed { playback, count });
    }

    fn fill_levels(
        &mut self,
        host: &dyn Host,
        owner: PlaybackId,
        levels: Vec<Level>,
        initial: LevelSelection,
    ) {
        self.store.set_levels(levels, initial);
        self.levels_owner = Some(owner);
        self.emit(SelectorEvent::LevelsChanged {
            count: self.store.len(),
        });
        self.render(host);
    }

    fn start_level_switch(&mut self, host: &dyn Host) {
        self.subscriptions.begin_switch();
        self.emit(SelectorEvent::SwitchStarted);
        self.render(host);
    }

    fn stop_level_switch(&mut self, host: &dyn Host) {
        self.subscriptions.end_switch();
        self.emit(SelectorEvent::SwitchEnded);
        self.render(host);
    }

    fn update_current_level(&mut self, host: &dyn Host, level: LevelId) {
        self.store.update_current(level);
        self.emit(SelectorEvent::CurrentLevelChanged {
            level: self.store.current_level().map(|l| l.id),
        });
        self.render(host);
    }
}
