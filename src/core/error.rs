//! Error types for command rejection, snapshots and configuration.
//!
//! Every rejected command returns a [`GameError`] and leaves the match
//! untouched. [`GameError::kind`] groups the variants for callers that only
//! care about the category.

use thiserror::Error;

use super::state::TurnPhase;
use crate::cards::Band;

/// Broad category of a rejected command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Valid in shape but not applicable now (not your turn, wrong phase).
    WrongTurn,
    /// Not enough coins, out of stock, or not in the named market row.
    InsufficientResource,
    /// Unknown card, landmark or player.
    NotFound,
    /// The match as a whole does not allow the command.
    InvalidState,
}

/// Why a command was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Not your turn.")]
    NotYourTurn,

    #[error("Cannot do that during the {actual} phase (needs {expected}).")]
    WrongPhase { expected: TurnPhase, actual: TurnPhase },

    #[error("You cannot roll two dice yet (build Train Station).")]
    TwoDiceLocked,

    #[error("You can roll 1 or 2 dice, not {0}.")]
    InvalidDiceCount(u8),

    #[error("Die face {0} is not between 1 and 6.")]
    InvalidDieFace(u8),

    #[error("Cannot reroll now.")]
    RerollUnavailable,

    #[error("Not enough coins for {name} (costs {cost}, you have {coins}).")]
    InsufficientCoins { name: String, cost: u32, coins: u32 },

    #[error("{card} is out of stock globally.")]
    OutOfStock { card: String },

    #[error("{card} is not currently in the {band} market row.")]
    NotInMarket { card: String, band: Band },

    #[error("Card not found: {0}.")]
    UnknownCard(String),

    #[error("Landmark not found: {0}.")]
    UnknownLandmark(String),

    #[error("{0} is not one of your landmarks.")]
    LandmarkNotAssigned(String),

    #[error("{0} already built.")]
    AlreadyBuilt(String),

    #[error("Player not found: {0}.")]
    UnknownPlayer(String),

    #[error("Need at least {min} players to start, have {seated}.")]
    NotEnoughPlayers { min: usize, seated: usize },

    #[error("Game is full.")]
    MatchFull,

    #[error("Game has already started.")]
    AlreadyStarted,

    #[error("Game is over.")]
    GameOver,

    #[error("Current player is missing from the roster; the game has ended.")]
    RosterInconsistent,
}

impl GameError {
    /// Category of this rejection.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NotYourTurn
            | GameError::WrongPhase { .. }
            | GameError::TwoDiceLocked
            | GameError::InvalidDiceCount(_)
            | GameError::InvalidDieFace(_)
            | GameError::RerollUnavailable => ErrorKind::WrongTurn,

            GameError::InsufficientCoins { .. }
            | GameError::OutOfStock { .. }
            | GameError::NotInMarket { .. } => ErrorKind::InsufficientResource,

            GameError::UnknownCard(_)
            | GameError::UnknownLandmark(_)
            | GameError::LandmarkNotAssigned(_)
            | GameError::UnknownPlayer(_) => ErrorKind::NotFound,

            GameError::AlreadyBuilt(_)
            | GameError::NotEnoughPlayers { .. }
            | GameError::MatchFull
            | GameError::AlreadyStarted
            | GameError::GameOver
            | GameError::RosterInconsistent => ErrorKind::InvalidState,
        }
    }
}

/// Snapshot encoding or decoding failed.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Match configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid match config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid match config: {0}")]
    Invalid(String),
}
