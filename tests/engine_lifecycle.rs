use std::time::Duration;

use guandan_core::engine::{spawn_match, EngineConfig};
use guandan_core::transport::MatchRegistry;

fn short_timeout_config(seed: u64) -> EngineConfig {
    EngineConfig {
        shuffle_seed: Some(seed),
        play_decision_timeout: Duration::from_millis(30),
        tribute_decision_timeout: Duration::from_millis(30),
        heartbeat_timeout: Duration::from_secs(60),
        match_idle_timeout: Duration::from_secs(300),
        event_queue_capacity: 256,
    }
}

#[tokio::test]
async fn a_connected_seat_that_repeatedly_misses_decisions_keeps_autoplaying_without_entering_trusteeship() {
    let (handle, join) = spawn_match(1, short_timeout_config(11));
    let mut rx = handle.attach(0).await.expect("attach succeeds");

    let mut autoplay_count = 0;
    for _ in 0..200 {
        let env = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("an event keeps arriving")
            .expect("channel stays open");
        match env.payload {
            guandan_core::engine::EventPayload::Public(guandan_core::engine::PublicEvent::AutoPlayApplied { seat }) if seat == 0 => {
                autoplay_count += 1;
                if autoplay_count >= 3 {
                    break;
                }
            }
            guandan_core::engine::EventPayload::Public(guandan_core::engine::PublicEvent::SeatEnteredTrusteeship { seat }) if seat == 0 => {
                panic!("a connected seat missing decisions should not be placed into trusteeship");
            }
            _ => {}
        }
    }
    assert!(autoplay_count >= 3, "seat 0 should keep auto-playing on every missed decision");

    handle.abort().await;
    let _ = join.await;
}

#[tokio::test]
async fn a_seat_whose_heartbeat_lapses_enters_trusteeship_via_the_sweep() {
    let mut config = short_timeout_config(15);
    config.heartbeat_timeout = Duration::from_millis(30);
    let (handle, join) = spawn_match(5, config);
    let mut rx = handle.attach(0).await.expect("attach succeeds");

    let mut saw_trusteeship = false;
    for _ in 0..200 {
        let env = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("an event keeps arriving")
            .expect("channel stays open");
        if let guandan_core::engine::EventPayload::Public(
            guandan_core::engine::PublicEvent::SeatEnteredTrusteeship { seat },
        ) = env.payload
        {
            assert_eq!(seat, 0);
            saw_trusteeship = true;
            break;
        }
    }
    assert!(saw_trusteeship, "seat 0's lapsed heartbeat should be swept straight into trusteeship");

    handle.abort().await;
    let _ = join.await;
}

#[tokio::test]
async fn reattaching_replaces_the_event_stream_without_killing_the_match() {
    let (handle, join) = spawn_match(2, short_timeout_config(12));
    let first = handle.attach(0).await.expect("first attach succeeds");
    drop(first);

    // A second attach on the same seat must succeed even though the first
    // receiver was dropped mid-match (a reconnect from a fresh session).
    let mut second = handle.attach(0).await.expect("reattach succeeds");
    let env = tokio::time::timeout(Duration::from_secs(2), second.recv())
        .await
        .expect("the reattached stream still receives events")
        .expect("channel stays open");
    // Whatever arrives first after reattaching, the match is still alive
    // and producing events for this seat.
    let _ = env;

    handle.abort().await;
    let _ = join.await;
}

#[tokio::test]
async fn registry_tracks_and_then_forgets_a_finished_match() {
    let registry = MatchRegistry::new(short_timeout_config(13));
    let handle = registry.create();
    assert_eq!(registry.active_match_count(), 1);
    assert!(registry.get(handle.match_id).is_ok());

    handle.abort().await;

    for _ in 0..50 {
        if registry.active_match_count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(registry.active_match_count(), 0);
    assert!(registry.get(handle.match_id).is_err());
}

#[tokio::test]
async fn unknown_match_id_is_rejected() {
    let registry = MatchRegistry::new(short_timeout_config(14));
    assert!(registry.get(9999).is_err());
}
