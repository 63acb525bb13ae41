//! Explicit session registry: create, look up, expire.
//!
//! One registry per process, owned by whoever wires the transport. It is an
//! object with a defined lifecycle, not an ambient singleton; different
//! sessions behind it run fully in parallel with no shared mutable state.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::domain::player::PlayerId;
use crate::domain::state::{GameState, Selection};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::protocol::{Command, CommandOutcome};
use crate::services::events::EventSink;
use crate::services::session::{self, SessionHandle};
use crate::utils::join_code::generate_join_code;

const MAX_CODE_ATTEMPTS: usize = 16;

pub struct GameRegistry {
    sessions: DashMap<String, SessionHandle>,
    sink: Arc<dyn EventSink>,
}

impl GameRegistry {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sessions: DashMap::new(),
            sink,
        }
    }

    /// Create a session with a fresh unique code and its host seated.
    /// Must be called from within a tokio runtime (the actor is spawned).
    pub fn create_game(&self, host_name: &str) -> Result<(String, PlayerId), DomainError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_join_code();
            if self.sessions.contains_key(&code) {
                continue;
            }
            let state = GameState::new(code.clone(), host_name, rand::rng().random::<u64>());
            let host_id = state.host_id;
            let handle = session::spawn(state, Arc::clone(&self.sink));
            match self.sessions.entry(code.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(handle);
                    info!(code, "Game created");
                    return Ok((code, host_id));
                }
                // Lost a race for the code; the orphaned actor exits once
                // its handle drops.
                Entry::Occupied(_) => continue,
            }
        }
        warn!("Exhausted join code attempts");
        Err(DomainError::conflict(
            ConflictKind::JoinCodeConflict,
            "Could not allocate a unique game code",
        ))
    }

    /// Look up a live session. Sessions whose actor has stopped (game over
    /// or torn down) are swept on sight.
    pub fn lookup(&self, code: &str) -> Result<SessionHandle, DomainError> {
        if let Some(entry) = self.sessions.get(code) {
            if !entry.is_closed() {
                return Ok(entry.value().clone());
            }
        }
        self.sessions.remove_if(code, |_, handle| handle.is_closed());
        Err(DomainError::not_found(
            NotFoundKind::Game,
            format!("No game with code {code}"),
        ))
    }

    pub async fn join_game(&self, code: &str, player_name: &str) -> Result<PlayerId, DomainError> {
        self.lookup(code)?.join(player_name).await
    }

    pub async fn start_game(&self, code: &str, requester: PlayerId) -> Result<(), DomainError> {
        self.lookup(code)?.start(requester).await
    }

    pub async fn select(
        &self,
        code: &str,
        player_id: PlayerId,
        selection: Selection,
    ) -> Result<(), DomainError> {
        self.lookup(code)?.select(player_id, selection).await
    }

    pub async fn next_round(&self, code: &str, requester: PlayerId) -> Result<(), DomainError> {
        self.lookup(code)?.next_round(requester).await
    }

    pub async fn connect(&self, code: &str, player_id: PlayerId) -> Result<(), DomainError> {
        self.lookup(code)?.connect(player_id).await
    }

    pub async fn disconnect(&self, code: &str, player_id: PlayerId) -> Result<(), DomainError> {
        self.lookup(code)?.disconnect(player_id).await
    }

    /// Dispatch a wire command. User errors come back as `Err`; the
    /// transport turns them into `Event::error` for the offending caller.
    pub async fn execute(&self, cmd: Command) -> Result<CommandOutcome, DomainError> {
        match cmd {
            Command::CreateGame { host_name } => {
                let (code, player_id) = self.create_game(&host_name)?;
                Ok(CommandOutcome::GameCreated { code, player_id })
            }
            Command::JoinGame { code, player_name } => {
                let player_id = self.join_game(&code, &player_name).await?;
                Ok(CommandOutcome::Joined { player_id })
            }
            Command::StartGame { code, player_id } => {
                self.start_game(&code, player_id).await?;
                Ok(CommandOutcome::Ok)
            }
            Command::Select {
                code,
                player_id,
                card_id,
                use_chopsticks,
                second_card_id,
            } => {
                let selection = Selection {
                    card_id,
                    use_chopsticks,
                    second_card_id,
                };
                self.select(&code, player_id, selection).await?;
                Ok(CommandOutcome::Ok)
            }
            Command::NextRound { code, player_id } => {
                self.next_round(&code, player_id).await?;
                Ok(CommandOutcome::Ok)
            }
            Command::Connect { code, player_id } => {
                self.connect(&code, player_id).await?;
                Ok(CommandOutcome::Ok)
            }
            Command::Disconnect { code, player_id } => {
                self.disconnect(&code, player_id).await?;
                Ok(CommandOutcome::Ok)
            }
            Command::GetState { code, player_id } => {
                let state = self.lookup(&code)?.snapshot(player_id).await?;
                Ok(CommandOutcome::State { state })
            }
        }
    }

    /// Sweep closed sessions and sessions idle longer than `max_idle`.
    /// Returns how many were removed.
    pub fn expire_idle(&self, max_idle: time::Duration) -> usize {
        let now = OffsetDateTime::now_utc();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, handle| !handle.is_closed() && now - handle.last_activity() < max_idle);
        let removed = before - self.sessions.len();
        if removed > 0 {
            info!(removed, "Expired idle sessions");
        }
        removed
    }

    pub fn remove(&self, code: &str) -> bool {
        self.sessions.remove(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
