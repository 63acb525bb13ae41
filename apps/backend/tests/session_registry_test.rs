//! Registry lifecycle: create, lookup, join guards, command dispatch, and
//! idle expiry.

use std::sync::Arc;

use sushigo_backend::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use sushigo_backend::services::events::RecordingSink;
use sushigo_backend::{Command, CommandOutcome, GameRegistry};

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

fn new_registry() -> GameRegistry {
    GameRegistry::new(Arc::new(RecordingSink::new()))
}

#[tokio::test]
async fn create_and_lookup_round_trip() {
    let registry = new_registry();
    let (code, host) = registry.create_game("alice").unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(registry.len(), 1);

    let handle = registry.lookup(&code).unwrap();
    assert_eq!(handle.code(), code);
    assert_eq!(handle.host_id(), host);

    assert!(matches!(
        registry.lookup("NOSUCH"),
        Err(DomainError::NotFound(NotFoundKind::Game, _))
    ));
}

#[tokio::test]
async fn join_guards_names_capacity_and_phase() {
    let registry = new_registry();
    let (code, host) = registry.create_game("alice").unwrap();

    assert!(matches!(
        registry.join_game(&code, "alice").await,
        Err(DomainError::Conflict(ConflictKind::DuplicateName, _))
    ));

    for i in 0..4 {
        registry.join_game(&code, &format!("guest{i}")).await.unwrap();
    }
    assert!(matches!(
        registry.join_game(&code, "one-too-many").await,
        Err(DomainError::Conflict(ConflictKind::GameFull, _))
    ));

    let (code2, host2) = registry.create_game("carol").unwrap();
    registry.join_game(&code2, "dave").await.unwrap();
    registry.start_game(&code2, host2).await.unwrap();
    assert!(matches!(
        registry.join_game(&code2, "late").await,
        Err(DomainError::Conflict(ConflictKind::GameAlreadyStarted, _))
    ));

    // Unrelated session untouched by all of the above.
    let handle = registry.lookup(&code).unwrap();
    let snap = handle.snapshot(host).await.unwrap();
    assert_eq!(snap.players.len(), 5);
}

#[tokio::test]
async fn start_and_next_round_authorization() {
    let registry = new_registry();
    let (code, host) = registry.create_game("alice").unwrap();
    let guest = registry.join_game(&code, "bob").await.unwrap();

    assert!(matches!(
        registry.start_game(&code, guest).await,
        Err(DomainError::Validation(ValidationKind::NotHost, _))
    ));
    registry.start_game(&code, host).await.unwrap();

    // Mid-round, next_round is premature for anyone.
    assert!(matches!(
        registry.next_round(&code, host).await,
        Err(DomainError::Validation(ValidationKind::RoundNotComplete, _))
    ));
}

#[tokio::test]
async fn command_dispatch_covers_the_wire_surface() {
    let registry = new_registry();

    let created = registry
        .execute(Command::CreateGame {
            host_name: "alice".into(),
        })
        .await
        .unwrap();
    let (code, host) = match created {
        CommandOutcome::GameCreated { code, player_id } => (code, player_id),
        other => panic!("wrong outcome: {other:?}"),
    };

    let joined = registry
        .execute(Command::JoinGame {
            code: code.clone(),
            player_name: "bob".into(),
        })
        .await
        .unwrap();
    assert!(matches!(joined, CommandOutcome::Joined { .. }));

    registry
        .execute(Command::StartGame {
            code: code.clone(),
            player_id: host,
        })
        .await
        .unwrap();

    let state = registry
        .execute(Command::GetState {
            code: code.clone(),
            player_id: host,
        })
        .await
        .unwrap();
    match state {
        CommandOutcome::State { state } => {
            assert_eq!(state.player_id, host);
            assert!(!state.hand.is_empty());
        }
        other => panic!("wrong outcome: {other:?}"),
    }

    // A bad select comes back as a typed user error, state untouched.
    let err = registry
        .execute(Command::Select {
            code: code.clone(),
            player_id: host,
            card_id: sushigo_backend::CardId(9999),
            use_chopsticks: false,
            second_card_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::CardNotInHand, _)
    ));
}

#[tokio::test]
async fn expire_idle_sweeps_stale_sessions() {
    let registry = new_registry();
    let (code, _) = registry.create_game("alice").unwrap();
    assert_eq!(registry.len(), 1);

    // Nothing is stale yet under a generous window.
    assert_eq!(registry.expire_idle(time::Duration::minutes(30)), 0);

    // A zero-width window treats every session as idle.
    assert_eq!(registry.expire_idle(time::Duration::ZERO), 1);
    assert!(registry.lookup(&code).is_err());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn remove_drops_a_session() {
    let registry = new_registry();
    let (code, _) = registry.create_game("alice").unwrap();
    assert!(registry.remove(&code));
    assert!(!registry.remove(&code));
    assert!(registry.lookup(&code).is_err());
}
