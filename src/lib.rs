//! # dice-tower
//!
//! Authoritative game-state engine for a turn-based dice tableau game:
//! players roll dice, collect income from the establishments they own,
//! buy more from a shared market, and race to build landmarks.
//!
//! ## Design Principles
//!
//! 1. **Single writer**: one `TurnEngine` per match, one command at a time.
//!    Transport and rooms live outside this crate.
//!
//! 2. **Data-driven cards**: every establishment carries an `EffectKind`;
//!    a pure resolver turns it into coin movements.
//!
//! 3. **Configuration over variants**: table rules (landmark sets, turn
//!    order, seats, bonuses) are chosen per match via `MatchConfig`.
//!
//! ## Architecture
//!
//! - **Deterministic**: all randomness comes from a seeded ChaCha8 stream
//!   stored in the game record, so a snapshot replays identically.
//!
//! - **Persistent Data Structures**: holdings, decks and the log use `im`,
//!   so broadcasting a snapshot is a cheap clone.
//!
//! ## Modules
//!
//! - `core`: players, game record, commands, RNG, configuration, errors
//! - `cards`: establishment and landmark definitions, the catalog
//! - `effects`: effect kinds and the pure resolver
//! - `market`: decks, market rows and global supply
//! - `rules`: the turn engine

pub mod core;
pub mod cards;
pub mod effects;
pub mod market;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Command, ConfigError, DiceSource, ErrorKind, GameError, GameRng, GameRngState, GameState, JoinRequest,
    LandmarkMode, LandmarkStatus, LoadedDice, MatchConfig, Outcome, Player, PlayerId, SnapshotError,
    StartingHolding, TurnOrder, TurnPhase,
};

pub use crate::cards::{Band, CardId, Catalog, ColorClass, EstablishmentDef, LandmarkAbility, LandmarkDef, LandmarkId};

pub use crate::effects::{apply_effect, EffectContext, EffectDelta, EffectKind, EffectOutcome, Transfer};

pub use crate::market::{Market, MarketBand};

pub use crate::rules::{MatchResult, TurnEngine};
