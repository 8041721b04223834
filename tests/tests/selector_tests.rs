//! End-to-end level selector tests against the in-memory host fixture.
//!
//! These tests validate:
//! - the notification flow from core-ready to rendered views,
//! - selection vs current level presentation (AUTO, AUTO (X), manual, placeholder),
//! - switching indicator lifecycle,
//! - container swaps: rebind, replay of buffered levels, stale playbacks,
//! - detach and pre-attach delivery.

use rstest::rstest;
use tokio::sync::broadcast;

use level_selector::{
    BindingState, Level, LevelId, LevelSelection, LevelSelector, LevelSelectorSettings,
    Notification, PlaybackId, SelectorEvent,
};

use selector_fixture::{
    FakePlayback, HostFixture, RecordingRenderer, low_high_levels, ready_selector,
};

fn drain(rx: &mut broadcast::Receiver<SelectorEvent>) -> Vec<SelectorEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn replay_count(events: &[SelectorEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SelectorEvent::LevelsReplayed { .. }))
        .count()
}

#[test]
fn select_then_switch_updates_text_and_indicator() {
    let mut host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());
    let playback = host.playback_id();

    host.deliver(
        &mut selector,
        Notification::levels_available(playback, vec![Level::new(0), Level::new(1)], None),
    );
    let view = renderer.last().expect("levels must be rendered");
    assert_eq!(view.button_text, "AUTO");
    assert_eq!(view.levels.len(), 2);

    selector.select(&mut host, LevelSelection::Level(LevelId(1)));
    assert_eq!(renderer.last().unwrap().button_text, "1");

    host.deliver(&mut selector, Notification::level_switch_start(playback));
    let switching = renderer.last().unwrap();
    assert!(switching.switching);
    assert_eq!(switching.button_text, "1");
    assert_eq!(selector.subscriptions().state(), BindingState::Switching);

    host.deliver(&mut selector, Notification::level_switch_end(playback));
    let done = renderer.last().unwrap();
    assert!(!done.switching);
    assert_eq!(done.button_text, "1");
    assert_eq!(selector.subscriptions().state(), BindingState::Bound);
}

#[test]
fn select_forwards_to_playback_and_closes_menu() {
    let mut host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());
    let playback = host.playback_id();
    host.deliver(
        &mut selector,
        Notification::levels_available(playback, low_high_levels(), None),
    );

    selector.toggle_menu(&host);
    assert!(renderer.last().unwrap().menu_open);

    let mut events = selector.subscribe();
    selector.select(&mut host, LevelSelection::Level(LevelId(0)));
    selector.select(&mut host, LevelSelection::Auto);

    assert!(!selector.is_menu_open());
    assert_eq!(
        host.playback.as_ref().unwrap().forwarded,
        [LevelSelection::Level(LevelId(0)), LevelSelection::Auto]
    );
    assert_eq!(
        drain(&mut events),
        [
            SelectorEvent::SelectionChanged {
                selection: LevelSelection::Level(LevelId(0))
            },
            SelectorEvent::SelectionChanged {
                selection: LevelSelection::Auto
            },
        ]
    );
}

#[test]
fn label_overrides_from_player_options() {
    let settings = LevelSelectorSettings::from_player_options_json(
        r#"{"levelSelectorConfig": {"title": "Quality", "labels": {"high": "HD"}}}"#,
    )
    .unwrap();
    let host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, settings);

    host.deliver(
        &mut selector,
        Notification::levels_available(host.playback_id(), low_high_levels(), None),
    );

    assert_eq!(selector.store().find_by_name("high").unwrap().label, "HD");
    let view = renderer.last().unwrap();
    assert_eq!(view.title.as_deref(), Some("Quality"));
    let labels: Vec<_> = view.levels.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["low", "HD"]);
}

#[test]
fn bitrate_change_drives_auto_text_and_highlight() {
    let host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());
    let playback = host.playback_id();
    host.deliver(
        &mut selector,
        Notification::levels_available(playback, low_high_levels(), None),
    );

    host.deliver(&mut selector, Notification::bitrate_changed(playback, LevelId(1)));
    let view = renderer.last().unwrap();
    assert_eq!(view.button_text, "AUTO (high)");
    assert_eq!(view.highlighted_level_id, Some(LevelId(1)));
    assert_eq!(view.levels.iter().filter(|e| e.current).count(), 1);

    host.deliver(&mut selector, Notification::bitrate_changed(playback, LevelId(8)));
    let view = renderer.last().unwrap();
    assert_eq!(view.button_text, "AUTO");
    assert_eq!(view.highlighted_level_id, None);
    assert!(view.levels.iter().all(|e| !e.current));
}

#[rstest]
#[case(None, "AUTO")]
#[case(Some(LevelSelection::Level(LevelId(1))), "high")]
fn initial_selection_comes_from_first_level_set(
    #[case] initial: Option<LevelSelection>,
    #[case] expected: &str,
) {
    let host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());
    let playback = host.playback_id();

    host.deliver(
        &mut selector,
        Notification::levels_available(playback, low_high_levels(), initial),
    );
    assert_eq!(renderer.last().unwrap().button_text, expected);

    host.deliver(
        &mut selector,
        Notification::levels_available(
            playback,
            low_high_levels(),
            Some(LevelSelection::Level(LevelId(0))),
        ),
    );
    assert_eq!(renderer.last().unwrap().button_text, expected);
}

#[test]
fn premature_selection_is_honored_when_levels_arrive() {
    let mut host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());

    selector.select(&mut host, LevelSelection::Level(LevelId(1)));
    assert_eq!(renderer.count(), 0, "nothing to present without levels");

    host.deliver(
        &mut selector,
        Notification::levels_available(host.playback_id(), low_high_levels(), None),
    );
    assert_eq!(renderer.last().unwrap().button_text, "high");
}

#[test]
fn vanished_selection_shows_placeholder() {
    let mut host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());
    let playback = host.playback_id();
    host.deliver(
        &mut selector,
        Notification::levels_available(playback, low_high_levels(), None),
    );
    selector.select(&mut host, LevelSelection::Level(LevelId(1)));

    host.deliver(
        &mut selector,
        Notification::levels_available(playback, vec![Level::new(0).with_name("low")], None),
    );
    assert_eq!(renderer.last().unwrap().button_text, "?");
}

#[test]
fn playback_without_level_support_is_not_rendered() {
    let host = HostFixture::with_playback(FakePlayback::new(1).without_level_support());
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());

    host.deliver(
        &mut selector,
        Notification::levels_available(host.playback_id(), low_high_levels(), None),
    );
    host.deliver(&mut selector, Notification::media_control_rendered());

    assert_eq!(renderer.count(), 0);
    assert!(selector.view(&host).is_none());
    assert_eq!(selector.store().len(), 2);
}

#[test]
fn media_control_render_repaints_current_state() {
    let host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());
    host.deliver(
        &mut selector,
        Notification::levels_available(host.playback_id(), low_high_levels(), None),
    );
    renderer.clear();

    host.deliver(&mut selector, Notification::media_control_rendered());
    assert_eq!(renderer.count(), 1);
    assert_eq!(renderer.last(), selector.view(&host));
}

#[test]
fn core_ready_replays_levels_buffered_before_binding() {
    let host =
        HostFixture::with_playback(FakePlayback::new(1).with_buffered_levels(low_high_levels()));
    let renderer = RecordingRenderer::new();
    let mut selector = LevelSelector::new(LevelSelectorSettings::default(), renderer.clone());
    let mut events = selector.subscribe();
    selector.attach();

    host.deliver(&mut selector, Notification::core_ready());

    assert_eq!(selector.store().len(), 2);
    assert_eq!(renderer.last().unwrap().button_text, "AUTO");
    assert!(drain(&mut events).contains(&SelectorEvent::LevelsReplayed {
        playback: PlaybackId(1),
        count: 2,
    }));
}

#[test]
fn rebind_replays_buffered_levels_exactly_once() {
    let mut host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, _renderer) = ready_selector(&host, LevelSelectorSettings::default());
    let mut events = selector.subscribe();

    host.swap_playback(Some(
        FakePlayback::new(2).with_buffered_levels(low_high_levels()),
    ));
    host.deliver(&mut selector, Notification::container_changed());
    host.deliver(&mut selector, Notification::container_changed());

    let events = drain(&mut events);
    assert_eq!(replay_count(&events), 1);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SelectorEvent::Rebound { .. }))
            .count(),
        2
    );
    assert_eq!(selector.subscriptions().playback(), Some(PlaybackId(2)));
    assert_eq!(selector.store().len(), 2);
}

#[test]
fn replay_rearms_after_playback_sends_its_own_levels() {
    let mut host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, _renderer) = ready_selector(&host, LevelSelectorSettings::default());
    let mut events = selector.subscribe();

    host.swap_playback(Some(
        FakePlayback::new(2).with_buffered_levels(low_high_levels()),
    ));
    host.deliver(&mut selector, Notification::container_changed());
    host.deliver(
        &mut selector,
        Notification::levels_available(PlaybackId(2), low_high_levels(), None),
    );
    host.deliver(&mut selector, Notification::container_changed());

    assert_eq!(replay_count(&drain(&mut events)), 2);
}

#[test]
fn swap_back_replays_levels_dropped_by_previous_swap() {
    let mut host =
        HostFixture::with_playback(FakePlayback::new(1).with_buffered_levels(low_high_levels()));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());
    let mut events = selector.subscribe();
    assert_eq!(selector.store().len(), 2);

    let first = host.swap_playback(Some(FakePlayback::new(2)));
    host.deliver(&mut selector, Notification::container_changed());
    assert!(selector.store().is_empty());
    assert!(selector.view(&host).is_none());

    host.swap_playback(first);
    host.deliver(&mut selector, Notification::container_changed());

    assert_eq!(selector.store().len(), 2);
    assert_eq!(renderer.last().unwrap().levels.len(), 2);
    assert!(selector.view(&host).is_some());
    assert!(drain(&mut events).contains(&SelectorEvent::LevelsReplayed {
        playback: PlaybackId(1),
        count: 2,
    }));
}

#[test]
fn reattach_replays_buffered_levels_again() {
    let host =
        HostFixture::with_playback(FakePlayback::new(1).with_buffered_levels(low_high_levels()));
    let (mut selector, _renderer) = ready_selector(&host, LevelSelectorSettings::default());

    selector.detach();
    assert!(selector.store().is_empty());

    selector.attach();
    host.deliver(&mut selector, Notification::core_ready());
    assert_eq!(selector.store().len(), 2);
}

#[test]
fn levels_buffered_after_rebind_wait_for_announcement() {
    let mut host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());
    let mut events = selector.subscribe();

    host.swap_playback(Some(FakePlayback::new(2)));
    host.deliver(&mut selector, Notification::container_changed());
    host.playback
        .as_mut()
        .unwrap()
        .set_buffered_levels(low_high_levels());
    host.deliver(&mut selector, Notification::media_control_rendered());

    assert!(selector.store().is_empty());
    assert_eq!(renderer.count(), 0);

    host.deliver(
        &mut selector,
        Notification::levels_available(PlaybackId(2), low_high_levels(), None),
    );
    assert_eq!(renderer.count(), 1);
    assert_eq!(renderer.last().unwrap().levels.len(), 2);
    assert_eq!(replay_count(&drain(&mut events)), 0);
}

#[test]
fn container_swap_keeps_selection_and_ignores_old_playback() {
    let mut host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());
    host.deliver(
        &mut selector,
        Notification::levels_available(PlaybackId(1), low_high_levels(), None),
    );
    selector.select(&mut host, LevelSelection::Level(LevelId(1)));

    host.swap_playback(Some(FakePlayback::new(2)));
    host.deliver(&mut selector, Notification::container_changed());
    assert!(selector.store().is_empty());

    // Late notifications from the replaced playback must not reach the store.
    host.deliver(
        &mut selector,
        Notification::levels_available(PlaybackId(1), vec![Level::new(9)], None),
    );
    host.deliver(&mut selector, Notification::level_switch_start(PlaybackId(1)));
    assert!(selector.store().find_by_id(LevelId(9)).is_none());
    assert!(!selector.subscriptions().is_switching());

    host.deliver(
        &mut selector,
        Notification::levels_available(
            PlaybackId(2),
            vec![Level::new(1).with_name("1080p"), Level::new(2).with_name("4k")],
            None,
        ),
    );
    let view = renderer.last().unwrap();
    assert_eq!(view.selection, LevelSelection::Level(LevelId(1)));
    assert_eq!(view.button_text, "1080p");
}

#[test]
fn swap_to_no_playback_unbinds_playback_listeners() {
    let mut host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());
    host.deliver(
        &mut selector,
        Notification::levels_available(PlaybackId(1), low_high_levels(), None),
    );
    let rendered = renderer.count();

    host.swap_playback(None);
    host.deliver(&mut selector, Notification::container_changed());
    host.deliver(&mut selector, Notification::bitrate_changed(PlaybackId(1), LevelId(0)));
    host.deliver(&mut selector, Notification::media_control_rendered());

    assert_eq!(selector.subscriptions().playback(), None);
    assert_eq!(selector.subscriptions().state(), BindingState::Unbound);
    assert!(selector.store().current_level().is_none());
    assert_eq!(renderer.count(), rendered);
}

#[test]
fn detach_is_idempotent_and_stops_delivery() {
    let host = HostFixture::with_playback(FakePlayback::new(1));
    let (mut selector, renderer) = ready_selector(&host, LevelSelectorSettings::default());

    selector.detach();
    selector.detach();

    host.deliver(&mut selector, Notification::core_ready());
    host.deliver(
        &mut selector,
        Notification::levels_available(PlaybackId(1), low_high_levels(), None),
    );
    assert!(selector.store().is_empty());
    assert_eq!(selector.store().selection(), None);
    assert!(!selector.subscriptions().is_bound());
    assert_eq!(renderer.count(), 0);
}

#[test]
fn notifications_before_attach_are_dropped() {
    let host = HostFixture::with_playback(FakePlayback::new(1));
    let renderer = RecordingRenderer::new();
    let mut selector = LevelSelector::new(LevelSelectorSettings::default(), renderer.clone());

    host.deliver(&mut selector, Notification::core_ready());
    host.deliver(
        &mut selector,
        Notification::levels_available(PlaybackId(1), low_high_levels(), None),
    );

    assert!(selector.store().is_empty());
    assert_eq!(selector.subscriptions().playback(), None);
    assert_eq!(selector.name(), "level_selector");
}
