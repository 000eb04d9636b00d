//! Engine delegate: load queueing, transport gating, time translation.

mod common;

use common::{fixture, fixture_with_config, HostCommand};
use interstitch::config::{EndOfProjectPolicy, InteractiveConfig};
use interstitch::engine::{EngineEventKind, MediaRef};
use interstitch::events::PlayerEvent;
use interstitch::SessionStatus;
use interstitch_common::EntryId;
use std::time::Duration;

fn change_media_commands(commands: &[HostCommand]) -> Vec<EntryId> {
    commands
        .iter()
        .filter_map(|c| match c {
            HostCommand::ChangeMedia(entry) => Some(entry.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn loads_queue_fifo_and_resolve_on_their_own_completion() {
    let f = fixture();
    f.enable_ready("proj").await;
    f.start_project();

    let delegate = f.loader.delegate();

    let d1 = delegate.clone();
    let load_b = tokio::spawn(async move { d1.load(MediaRef::new(EntryId::from("b"))).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let d2 = delegate.clone();
    let load_c = tokio::spawn(async move { d2.load(MediaRef::new(EntryId::from("c"))).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Only the first change is issued while it is outstanding.
    assert_eq!(
        change_media_commands(&f.host.commands()),
        vec![EntryId::from("b")]
    );
    assert!(!load_b.is_finished());
    assert!(!load_c.is_finished());

    f.controller.on_change_media_done(&EntryId::from("b"));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(load_b.is_finished());
    assert!(!load_c.is_finished());
    assert_eq!(
        change_media_commands(&f.host.commands()),
        vec![EntryId::from("b"), EntryId::from("c")]
    );

    f.controller.on_change_media_done(&EntryId::from("c"));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(load_c.is_finished());
}

#[tokio::test]
async fn play_is_suppressed_while_change_outstanding() {
    let f = fixture();
    f.enable_ready("proj").await;
    f.start_project();

    let delegate = f.loader.delegate();
    let d = delegate.clone();
    let load = tokio::spawn(async move { d.load(MediaRef::new(EntryId::from("b"))).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    delegate.play();
    assert!(!f.host.commands().contains(&HostCommand::Play));

    f.controller.on_change_media_done(&EntryId::from("b"));
    load.await.unwrap();

    delegate.play();
    assert!(f.host.commands().contains(&HostCommand::Play));
}

#[tokio::test]
async fn unknown_load_target_is_a_benign_no_op() {
    let f = fixture();
    f.enable_ready("proj").await;
    f.start_project();

    let delegate = f.loader.delegate();
    // Resolves immediately; nothing reaches the host.
    delegate.load(MediaRef::new(EntryId::from("missing"))).await;
    assert!(change_media_commands(&f.host.commands()).is_empty());
}

#[tokio::test]
async fn pre_start_load_defers_until_project_start() {
    let f = fixture();
    f.enable_ready("proj").await;

    let delegate = f.loader.delegate();
    delegate.load(MediaRef::new(EntryId::from("b"))).await;
    assert!(change_media_commands(&f.host.commands()).is_empty());

    delegate.event(EngineEventKind::ProjectStart);
    assert_eq!(
        change_media_commands(&f.host.commands()),
        vec![EntryId::from("b")]
    );
}

#[tokio::test]
async fn seek_translates_local_to_global() {
    let f = fixture();
    f.enable_ready("proj").await;
    f.start_project();

    // Segment "b" starts at 3000 ms.
    f.controller.on_change_media_done(&EntryId::from("b"));

    f.loader.delegate().seek(2.5);
    assert!(f.host.commands().contains(&HostCommand::Seek(5.5)));
}

#[tokio::test]
async fn engine_error_is_always_fatal() {
    let f = fixture();
    let mut events = f.controller.subscribe();
    f.enable_ready("proj").await;

    f.loader.delegate().error("graph evaluation failed");

    assert_eq!(f.controller.status(), SessionStatus::Error);
    let mut saw_alert = false;
    while let Ok(event) = events.try_recv() {
        if let PlayerEvent::FatalAlert { title, message } = event {
            assert_eq!(title, "Error in the decision engine");
            assert!(message.contains("graph evaluation failed"));
            saw_alert = true;
        }
    }
    assert!(saw_alert);
}

#[tokio::test]
async fn project_ended_honors_hold_policy() {
    let f = fixture();
    f.enable_ready("proj").await;
    f.start_project();

    f.loader.delegate().event(EngineEventKind::ProjectEnded);

    assert!(f.host.commands().contains(&HostCommand::Pause));
    assert_eq!(*f.handle.replays.lock(), 0);
}

#[tokio::test]
async fn project_ended_honors_replay_policy() {
    let mut config = InteractiveConfig::default();
    config.engine.end_of_project = EndOfProjectPolicy::Replay;

    let f = fixture_with_config(config);
    f.enable_ready("proj").await;
    f.start_project();

    f.loader.delegate().event(EngineEventKind::ProjectEnded);

    assert_eq!(*f.handle.replays.lock(), 1);
    assert!(!f.host.commands().contains(&HostCommand::Pause));
}

#[tokio::test]
async fn engine_events_are_rebroadcast() {
    let f = fixture();
    let mut events = f.controller.subscribe();
    f.enable_ready("proj").await;

    f.loader
        .delegate()
        .event(EngineEventKind::parse("node:enter"));

    let mut saw_event = false;
    while let Ok(event) = events.try_recv() {
        if let PlayerEvent::EngineEvent { kind } = event {
            if kind == "node:enter" {
                saw_event = true;
            }
        }
    }
    assert!(saw_event);
}
