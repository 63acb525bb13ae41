//! The per-session actor.
//!
//! Each game session is one tokio task that owns its `GameState` outright
//! and drains a command queue. Commands are processed strictly one at a
//! time, so a barrier commit is indivisible by construction: no other
//! command can observe the state mid-commit. Teardown happens only between
//! commands, never inside one.

use std::sync::Arc;

use parking_lot::Mutex;
use time::OffsetDateTime;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

use crate::domain::lifecycle;
use crate::domain::player::PlayerId;
use crate::domain::rules::ROUNDS;
use crate::domain::snapshot::{snapshot_for, GameSnapshot};
use crate::domain::state::{GameState, Phase, Selection};
use crate::domain::turns;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::protocol::Event;
use crate::services::events::{EventSink, Recipient};

const COMMAND_QUEUE_DEPTH: usize = 64;

/// Command objects processed by the session actor, each carrying its reply
/// channel. The reply resolves as soon as the command validates; any events
/// the command causes are delivered through the sink.
#[derive(Debug)]
pub enum SessionCommand {
    Join {
        name: String,
        reply: oneshot::Sender<Result<PlayerId, DomainError>>,
    },
    Start {
        requester: PlayerId,
        reply: oneshot::Sender<Result<(), DomainError>>,
    },
    Select {
        player_id: PlayerId,
        selection: Selection,
        reply: oneshot::Sender<Result<(), DomainError>>,
    },
    NextRound {
        requester: PlayerId,
        reply: oneshot::Sender<Result<(), DomainError>>,
    },
    Connect {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), DomainError>>,
    },
    Disconnect {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), DomainError>>,
    },
    Snapshot {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<GameSnapshot, DomainError>>,
    },
}

/// Cheap cloneable handle to a session actor.
#[derive(Clone)]
pub struct SessionHandle {
    code: String,
    host_id: PlayerId,
    tx: mpsc::Sender<SessionCommand>,
    created_at: OffsetDateTime,
    last_activity: Arc<Mutex<OffsetDateTime>>,
}

impl SessionHandle {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn host_id(&self) -> PlayerId {
        self.host_id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn last_activity(&self) -> OffsetDateTime {
        *self.last_activity.lock()
    }

    /// True once the actor has stopped (game over or torn down).
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub async fn join(&self, name: impl Into<String>) -> Result<PlayerId, DomainError> {
        self.call(|reply| SessionCommand::Join {
            name: name.into(),
            reply,
        })
        .await
    }

    pub async fn start(&self, requester: PlayerId) -> Result<(), DomainError> {
        self.call(|reply| SessionCommand::Start { requester, reply }).await
    }

    /// Record a selection. Returns as soon as the selection is validated,
    /// whether or not it fired the barrier.
    pub async fn select(
        &self,
        player_id: PlayerId,
        selection: Selection,
    ) -> Result<(), DomainError> {
        self.call(|reply| SessionCommand::Select {
            player_id,
            selection,
            reply,
        })
        .await
    }

    pub async fn next_round(&self, requester: PlayerId) -> Result<(), DomainError> {
        self.call(|reply| SessionCommand::NextRound { requester, reply }).await
    }

    pub async fn connect(&self, player_id: PlayerId) -> Result<(), DomainError> {
        self.call(|reply| SessionCommand::Connect { player_id, reply }).await
    }

    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), DomainError> {
        self.call(|reply| SessionCommand::Disconnect { player_id, reply }).await
    }

    pub async fn snapshot(&self, player_id: PlayerId) -> Result<GameSnapshot, DomainError> {
        self.call(|reply| SessionCommand::Snapshot { player_id, reply }).await
    }

    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, DomainError>>) -> SessionCommand,
    ) -> Result<T, DomainError> {
        *self.last_activity.lock() = OffsetDateTime::now_utc();
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(make(tx))
            .await
            .map_err(|_| session_gone())?;
        rx.await.map_err(|_| session_gone())?
    }
}

fn session_gone() -> DomainError {
    DomainError::not_found(NotFoundKind::Game, "Session is no longer live")
}

/// Spawn the actor task for a fresh session and return its handle.
pub fn spawn(state: GameState, sink: Arc<dyn EventSink>) -> SessionHandle {
    let (tx, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
    let now = OffsetDateTime::now_utc();
    let handle = SessionHandle {
        code: state.code.clone(),
        host_id: state.host_id,
        tx,
        created_at: now,
        last_activity: Arc::new(Mutex::new(now)),
    };
    tokio::spawn(run(state, rx, sink));
    handle
}

async fn run(
    mut state: GameState,
    mut rx: mpsc::Receiver<SessionCommand>,
    sink: Arc<dyn EventSink>,
) {
    info!(code = %state.code, "Session started");
    while let Some(cmd) = rx.recv().await {
        match handle_command(&mut state, cmd, &sink).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Finished) => {
                info!(code = %state.code, "Session complete");
                break;
            }
            Err(err) => {
                // Integrity failure: a core defect, fatal and unrecoverable.
                error!(code = %state.code, %err, "Session torn down");
                sink.deliver(&state.code, Recipient::All, Event::error(&err))
                    .await;
                break;
            }
        }
    }
}

enum Flow {
    Continue,
    Finished,
}

/// Process one command. `Ok` results (including user errors sent through
/// the reply) keep the session alive; an `Err` is an integrity failure and
/// kills it.
async fn handle_command(
    state: &mut GameState,
    cmd: SessionCommand,
    sink: &Arc<dyn EventSink>,
) -> Result<Flow, DomainError> {
    match cmd {
        SessionCommand::Join { name, reply } => {
            let result = state.add_player(name);
            if let Ok(player_id) = &result {
                let name = state.player(*player_id)?.name.clone();
                sink.deliver(
                    &state.code,
                    Recipient::All,
                    Event::PlayerConnected {
                        player_id: *player_id,
                        name,
                    },
                )
                .await;
                broadcast_snapshots(state, sink).await;
            }
            let _ = reply.send(result);
            Ok(Flow::Continue)
        }

        SessionCommand::Start { requester, reply } => {
            let result = lifecycle::start_game(state, requester);
            let started = result.is_ok();
            let _ = reply.send(result);
            if started {
                sink.deliver(&state.code, Recipient::All, Event::GameStarted)
                    .await;
                broadcast_snapshots(state, sink).await;
            }
            Ok(Flow::Continue)
        }

        SessionCommand::Select {
            player_id,
            selection,
            reply,
        } => {
            match turns::record_selection(state, player_id, selection) {
                Err(err) => {
                    let _ = reply.send(Err(err));
                    Ok(Flow::Continue)
                }
                Ok(ready) => {
                    let _ = reply.send(Ok(()));
                    sink.deliver(
                        &state.code,
                        Recipient::All,
                        Event::PlayerReady { player_id },
                    )
                    .await;
                    if ready {
                        cross_barrier(state, sink).await?;
                    }
                    finished_flow(state)
                }
            }
        }

        SessionCommand::NextRound { requester, reply } => {
            let result = lifecycle::advance_round(state, requester);
            let advanced = result.is_ok();
            let _ = reply.send(result);
            if advanced {
                sink.deliver(
                    &state.code,
                    Recipient::All,
                    Event::NewRound {
                        round: state.round,
                        pass_direction: state.pass_direction,
                    },
                )
                .await;
                broadcast_snapshots(state, sink).await;
            }
            Ok(Flow::Continue)
        }

        SessionCommand::Connect { player_id, reply } => {
            let result = state.player_mut(player_id).map(|p| {
                p.is_connected = true;
                p.name.clone()
            });
            match result {
                Ok(name) => {
                    let _ = reply.send(Ok(()));
                    sink.deliver(
                        &state.code,
                        Recipient::All,
                        Event::PlayerConnected { player_id, name },
                    )
                    .await;
                    broadcast_snapshots(state, sink).await;
                }
                Err(err) => {
                    let _ = reply.send(Err(err));
                }
            }
            Ok(Flow::Continue)
        }

        SessionCommand::Disconnect { player_id, reply } => {
            let result = state.player_mut(player_id).map(|p| p.is_connected = false);
            match result {
                Ok(()) => {
                    let _ = reply.send(Ok(()));
                    sink.deliver(
                        &state.code,
                        Recipient::All,
                        Event::PlayerDisconnected { player_id },
                    )
                    .await;
                    // The missing player may have been the last hold-out.
                    if turns::barrier_ready(state) {
                        cross_barrier(state, sink).await?;
                    }
                    finished_flow(state)
                }
                Err(err) => {
                    let _ = reply.send(Err(err));
                    Ok(Flow::Continue)
                }
            }
        }

        SessionCommand::Snapshot { player_id, reply } => {
            let result = state
                .player(player_id)
                .map(|_| snapshot_for(state, player_id));
            let _ = reply.send(result);
            Ok(Flow::Continue)
        }
    }
}

fn finished_flow(state: &GameState) -> Result<Flow, DomainError> {
    if state.phase == Phase::GameEnd {
        Ok(Flow::Finished)
    } else {
        Ok(Flow::Continue)
    }
}

/// Fire the barrier: commit the turn, reveal, and either open the next
/// selection window or close out the round (and, after round 3, the game).
async fn cross_barrier(
    state: &mut GameState,
    sink: &Arc<dyn EventSink>,
) -> Result<(), DomainError> {
    let outcome = turns::commit_turn(state)?;
    sink.deliver(
        &state.code,
        Recipient::All,
        Event::CardsRevealed {
            turn: outcome.turn,
            plays: outcome.reveals,
        },
    )
    .await;

    if !outcome.round_complete {
        broadcast_snapshots(state, sink).await;
        return Ok(());
    }

    let report = lifecycle::complete_round(state)?;
    sink.deliver(&state.code, Recipient::All, Event::RoundEnd { report })
        .await;

    if state.round >= ROUNDS {
        let scores = lifecycle::finish_game(state)?;
        let winner = scores.ranking.first().map(|r| r.name.clone());
        sink.deliver(
            &state.code,
            Recipient::All,
            Event::GameEnd { scores, winner },
        )
        .await;
    } else {
        broadcast_snapshots(state, sink).await;
    }
    Ok(())
}

/// Send each player their own view of the state. Hands never cross wires:
/// the snapshot type only carries the recipient's hand.
async fn broadcast_snapshots(state: &GameState, sink: &Arc<dyn EventSink>) {
    for player in &state.players {
        sink.deliver(
            &state.code,
            Recipient::Player(player.id),
            Event::GameState {
                state: snapshot_for(state, player.id),
            },
        )
        .await;
    }
}
