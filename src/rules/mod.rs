//! Turn engine for the dice tableau game.
//!
//! `TurnEngine` validates commands and drives the phase state machine:
//! - Roster changes and match start
//! - Dice, income resolution and the City Hall step
//! - Purchases, landmark builds and the victory check
//! - Turn advancement, including the doubles bonus turn

pub mod engine;
mod income;
mod turn;

pub use engine::{MatchResult, TurnEngine};
