//! Core engine types: players, state, commands, RNG, configuration, errors.
//!
//! Everything here is independent of the card data. The catalog and the
//! effects plug in through `cards` and `effects`; the state machine lives
//! in `rules`.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod action;
pub mod state;

pub use player::{LandmarkStatus, Player, PlayerId};
pub use rng::{DiceSource, GameRng, GameRngState, LoadedDice, DIE_FACES};
pub use config::{LandmarkMode, MatchConfig, StartingHolding, TurnOrder, MAX_MARKET_WIDTH};
pub use error::{ConfigError, ErrorKind, GameError, SnapshotError};
pub use action::{Command, JoinRequest, Outcome};
pub use state::{GameState, TurnPhase};
