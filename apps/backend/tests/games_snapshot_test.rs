//! Information hiding: a serialized snapshot carries the viewer's hand and
//! nobody else's, in any phase.

use std::sync::Arc;

use sushigo_backend::services::events::RecordingSink;
use sushigo_backend::{Event, GameRegistry, Recipient, Selection};

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

#[tokio::test]
async fn snapshots_never_leak_opponent_hands() {
    let sink = Arc::new(RecordingSink::new());
    let registry = GameRegistry::new(sink.clone());

    let (code, host) = registry.create_game("alice").unwrap();
    let guest = registry.join_game(&code, "bob").await.unwrap();
    registry.start_game(&code, host).await.unwrap();

    for &viewer in &[host, guest] {
        let snap = registry.lookup(&code).unwrap().snapshot(viewer).await.unwrap();
        assert_eq!(snap.player_id, viewer);
        assert_eq!(snap.hand.len(), 10);

        let json = serde_json::to_value(&snap).unwrap();
        // The only "hand" key in the whole document is the top-level one.
        for player in json["players"].as_array().unwrap() {
            assert!(player.get("hand").is_none());
            assert!(player.get("hand_count").is_some());
        }
    }
}

#[tokio::test]
async fn broadcast_game_state_events_are_personalized() {
    let sink = Arc::new(RecordingSink::new());
    let registry = GameRegistry::new(sink.clone());

    let (code, host) = registry.create_game("alice").unwrap();
    let guest = registry.join_game(&code, "bob").await.unwrap();
    registry.start_game(&code, host).await.unwrap();

    // Commit one turn so state broadcasts flow.
    for &player in &[host, guest] {
        let snap = registry.lookup(&code).unwrap().snapshot(player).await.unwrap();
        registry
            .select(&code, player, Selection::single(snap.hand[0].id))
            .await
            .unwrap();
    }

    let events = sink.take();
    let mut saw_state_for_both = 0;
    for (_, to, event) in &events {
        if let Event::GameState { state } = event {
            // A state event is always addressed to exactly the player whose
            // hand it contains.
            match to {
                Recipient::Player(p) => assert_eq!(*p, state.player_id),
                Recipient::All => panic!("game_state must never be broadcast"),
            }
            saw_state_for_both += 1;
        }
    }
    assert!(saw_state_for_both >= 2);
}
