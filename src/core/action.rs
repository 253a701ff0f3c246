//! Commands callers send to the engine and the outcomes it returns.
//!
//! A command is always paired with the id of the player sending it. The
//! engine answers `Ok(Outcome)` or `Err(GameError)`; callers never need to
//! inspect message text to tell the two apart.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::cards::{Band, CardId, LandmarkId};

/// A player command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Leave the waiting room and begin play.
    StartMatch,
    /// Roll one or two dice.
    RollDice { num_dice: u8 },
    /// Discard the current roll and roll again (Radio Tower).
    RerollDice,
    /// Buy an establishment from a market row.
    BuyEstablishment { card_id: CardId, band: Band },
    /// Build one of your landmarks.
    BuildLandmark { landmark_id: LandmarkId },
    /// End the build phase without buying.
    PassTurn,
}

impl Command {
    /// Short name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::StartMatch => "start_match",
            Command::RollDice { .. } => "roll_dice",
            Command::RerollDice => "reroll_dice",
            Command::BuyEstablishment { .. } => "buy_establishment",
            Command::BuildLandmark { .. } => "build_landmark",
            Command::PassTurn => "pass_turn",
        }
    }
}

/// Data supplied when a player sits down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub id: PlayerId,
    pub display_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl JoinRequest {
    /// A join request without an avatar.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            display_name: display_name.into(),
            avatar: None,
        }
    }

    /// Attach an avatar URL.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// What an accepted command did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// A player sat down (or was already seated).
    Joined { rejoined: bool, started: bool },
    /// A player left.
    Removed,
    /// The match began with this seating order.
    Started { order: Vec<PlayerId> },
    /// Dice were rolled and income resolved.
    Rolled { dice: SmallVec<[u8; 2]>, sum: u8 },
    /// The roll was discarded; roll again.
    Rerolled,
    /// An establishment was bought.
    Bought { card_id: CardId },
    /// A landmark was built.
    Built { landmark_id: LandmarkId, won: bool },
    /// The build phase was passed.
    Passed,
}
