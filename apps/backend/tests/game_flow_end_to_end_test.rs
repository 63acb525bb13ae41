//! Full game through the session actor: create, join, three rounds of
//! selections, scoring, and the final ranking, observed via the event sink.

use std::sync::Arc;

use sushigo_backend::domain::rules::{hand_size_for_players, ROUNDS};
use sushigo_backend::services::events::{RecordingSink, Recipient};
use sushigo_backend::{Event, GameRegistry, Phase, PlayerId, Selection};

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

async fn select_first_card(
    registry: &GameRegistry,
    code: &str,
    player_id: PlayerId,
) {
    let snap = registry
        .lookup(code)
        .unwrap()
        .snapshot(player_id)
        .await
        .unwrap();
    let card_id = snap.hand.first().expect("hand not empty").id;
    registry
        .select(code, player_id, Selection::single(card_id))
        .await
        .unwrap();
}

#[tokio::test]
async fn two_player_game_runs_to_completion() {
    let sink = Arc::new(RecordingSink::new());
    let registry = GameRegistry::new(sink.clone());

    let (code, host) = registry.create_game("alice").unwrap();
    let guest = registry.join_game(&code, "bob").await.unwrap();
    registry.start_game(&code, host).await.unwrap();

    let deal_size = hand_size_for_players(2).unwrap() as u32;
    let mut committed_turns = 0u32;

    // Drive the game until the session closes itself after round 3.
    loop {
        let handle = match registry.lookup(&code) {
            Ok(h) => h,
            Err(_) => break, // game over, session discarded
        };
        let snap = match handle.snapshot(host).await {
            Ok(s) => s,
            Err(_) => break,
        };
        match snap.phase {
            Phase::Selecting => {
                select_first_card(&registry, &code, host).await;
                select_first_card(&registry, &code, guest).await;
                committed_turns += 1;
            }
            Phase::RoundEnd => {
                registry.next_round(&code, host).await.unwrap();
            }
            other => panic!("unexpected resting phase {other:?}"),
        }
    }

    assert_eq!(committed_turns, deal_size * ROUNDS as u32);

    let events = sink.take();
    let broadcast: Vec<&Event> = events
        .iter()
        .filter(|(_, to, _)| *to == Recipient::All)
        .map(|(_, _, e)| e)
        .collect();

    let reveals = broadcast
        .iter()
        .filter(|e| matches!(e, Event::CardsRevealed { .. }))
        .count();
    assert_eq!(reveals as u32, deal_size * ROUNDS as u32);

    let round_ends: Vec<_> = broadcast
        .iter()
        .filter_map(|e| match e {
            Event::RoundEnd { report } => Some(report),
            _ => None,
        })
        .collect();
    assert_eq!(round_ends.len(), ROUNDS as usize);
    assert_eq!(
        round_ends.iter().map(|r| r.round).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    // Exactly one game end, consistent with the per-round totals plus the
    // pudding bonus applied exactly once.
    let game_ends: Vec<_> = broadcast
        .iter()
        .filter_map(|e| match e {
            Event::GameEnd { scores, winner } => Some((scores, winner)),
            _ => None,
        })
        .collect();
    assert_eq!(game_ends.len(), 1);
    let (scores, winner) = &game_ends[0];
    assert_eq!(scores.ranking.len(), 2);
    assert_eq!(winner.as_deref(), Some(scores.ranking[0].name.as_str()));

    for ranked in &scores.ranking {
        let bonus = scores
            .bonuses
            .iter()
            .find(|b| b.player_id == ranked.player_id)
            .unwrap()
            .bonus;
        let round_sum: i32 = ranked.round_scores.iter().sum();
        assert_eq!(ranked.score, round_sum + bonus);
    }

    // Every reveal carries exactly one play per player.
    for event in &broadcast {
        if let Event::CardsRevealed { plays, .. } = event {
            assert_eq!(plays.len(), 2);
            for play in plays {
                assert!(!play.cards.is_empty() && play.cards.len() <= 2);
            }
        }
    }
}

#[tokio::test]
async fn chopsticks_flow_through_the_actor() {
    let sink = Arc::new(RecordingSink::new());
    let registry = GameRegistry::new(sink.clone());

    let (code, host) = registry.create_game("alice").unwrap();
    let guest = registry.join_game(&code, "bob").await.unwrap();
    registry.start_game(&code, host).await.unwrap();

    // Play until the host has chopsticks on the pile, then double-pick.
    let mut used_chopsticks = false;
    loop {
        let handle = match registry.lookup(&code) {
            Ok(h) => h,
            Err(_) => break,
        };
        let snap = match handle.snapshot(host).await {
            Ok(s) => s,
            Err(_) => break,
        };
        match snap.phase {
            Phase::Selecting => {
                let me = snap
                    .players
                    .iter()
                    .find(|p| p.player_id == host)
                    .unwrap();
                if !used_chopsticks && me.has_chopsticks && snap.hand.len() >= 2 {
                    registry
                        .select(
                            &code,
                            host,
                            Selection::with_chopsticks(snap.hand[0].id, snap.hand[1].id),
                        )
                        .await
                        .unwrap();
                    used_chopsticks = true;
                } else {
                    let pick = snap
                        .hand
                        .iter()
                        .find(|c| c.card_type == sushigo_backend::CardType::Chopsticks)
                        .or_else(|| snap.hand.first())
                        .unwrap()
                        .id;
                    registry
                        .select(&code, host, Selection::single(pick))
                        .await
                        .unwrap();
                }
                select_first_card(&registry, &code, guest).await;
            }
            Phase::RoundEnd => registry.next_round(&code, host).await.unwrap(),
            other => panic!("unexpected resting phase {other:?}"),
        }
    }

    let events = sink.take();
    if used_chopsticks {
        let flagged = events.iter().any(|(_, _, e)| match e {
            Event::CardsRevealed { plays, .. } => plays
                .iter()
                .any(|p| p.player_id == host && p.used_chopsticks && p.cards.len() == 2),
            _ => false,
        });
        assert!(flagged, "chopsticks reveal should carry both cards");
    }

    // Whatever happened, the game must have completed cleanly.
    assert!(events
        .iter()
        .any(|(_, _, e)| matches!(e, Event::GameEnd { .. })));
}

#[tokio::test]
async fn disconnected_player_does_not_stall_the_barrier() {
    let sink = Arc::new(RecordingSink::new());
    let registry = GameRegistry::new(sink.clone());

    let (code, host) = registry.create_game("alice").unwrap();
    let guest = registry.join_game(&code, "bob").await.unwrap();
    registry.start_game(&code, host).await.unwrap();

    registry.disconnect(&code, guest).await.unwrap();

    // The host alone drives the whole game; the guest's hands auto-play.
    loop {
        let handle = match registry.lookup(&code) {
            Ok(h) => h,
            Err(_) => break,
        };
        let snap = match handle.snapshot(host).await {
            Ok(s) => s,
            Err(_) => break,
        };
        match snap.phase {
            Phase::Selecting => select_first_card(&registry, &code, host).await,
            Phase::RoundEnd => registry.next_round(&code, host).await.unwrap(),
            other => panic!("unexpected resting phase {other:?}"),
        }
    }

    let events = sink.take();
    assert!(events
        .iter()
        .any(|(_, _, e)| matches!(e, Event::PlayerDisconnected { player_id } if *player_id == guest)));
    assert!(events
        .iter()
        .any(|(_, _, e)| matches!(e, Event::GameEnd { .. })));
}
