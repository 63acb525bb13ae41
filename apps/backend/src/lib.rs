#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Session engine for a simultaneous-reveal card-drafting game.
//!
//! 2-5 players draft cards over three scored rounds: everyone picks from
//! their hand at once, picks are revealed together, and the shrinking hands
//! rotate around the table. This crate is the whole game brain - deck
//! composition and dealing, the selection barrier, hand rotation, scoring
//! with its tie-splitting and wasabi-multiplier rules, and the per-session
//! actor that serializes concurrent commands - while transport, rendering,
//! and storage stay on the far side of the [`protocol`] boundary.

pub mod domain;
pub mod errors;
pub mod protocol;
pub mod services;
pub mod telemetry;
pub mod utils;

// Re-exports for the public API
pub use domain::{Card, CardId, CardType, GameSnapshot, GameState, PassDirection, Phase, Player, PlayerId, Selection};
pub use errors::{DomainError, ErrorCode};
pub use protocol::{Command, CommandOutcome, Event};
pub use services::{EventSink, GameRegistry, RecordingSink, Recipient, SessionHandle, TracingSink};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
