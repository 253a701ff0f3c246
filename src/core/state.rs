//! Game state: the authoritative record of one match.
//!
//! ## GameState
//!
//! - Roster and seating order
//! - Current player, phase, last roll
//! - Market and supply
//! - Winner and the append-only game log
//! - The match RNG, so a restored snapshot replays identically
//!
//! The whole record is the broadcast snapshot: it serializes with `serde`
//! and round-trips through [`GameState::to_bytes`] / [`GameState::from_bytes`].

use std::collections::BTreeMap;
use std::fmt;

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::MatchConfig;
use super::error::SnapshotError;
use super::player::{Player, PlayerId};
use super::rng::GameRng;
use crate::cards::LandmarkId;
use crate::effects::EffectDelta;
use crate::market::Market;

/// Turn phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    WaitingForPlayers,
    Roll,
    Build,
    GameOver,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnPhase::WaitingForPlayers => "waiting_for_players",
            TurnPhase::Roll => "roll",
            TurnPhase::Build => "build",
            TurnPhase::GameOver => "game_over",
        };
        f.write_str(name)
    }
}

/// Complete state of one match.
///
/// Uses `im` persistent structures for the log and holdings so cloning a
/// snapshot for broadcast is cheap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub match_id: String,
    pub config: MatchConfig,

    // === Roster ===
    /// Seated players in join order.
    pub players: Vec<Player>,
    /// Seating order, fixed at match start (rotation only).
    pub player_order: Vec<PlayerId>,
    pub current_player: Option<PlayerId>,

    // === Progression ===
    pub phase: TurnPhase,
    pub last_roll: Option<SmallVec<[u8; 2]>>,
    /// Meaningful only while `last_roll` is present.
    pub dice_sum: u8,
    /// A doubles bonus turn was granted for the current roll. Every fresh
    /// roll clears it.
    pub extra_turn_taken: bool,

    // === Economy ===
    pub market: Market,

    // === Outcome ===
    pub winner: Option<PlayerId>,
    pub game_log: Vector<String>,

    /// Landmark sets handed out at join time, kept across leave/re-join.
    landmark_assignments: BTreeMap<PlayerId, Vec<LandmarkId>>,

    rng: GameRng,
}

impl GameState {
    /// Create an empty match waiting for players.
    #[must_use]
    pub fn new(match_id: impl Into<String>, config: MatchConfig, market: Market, rng: GameRng) -> Self {
        let match_id = match_id.into();
        let mut game_log = Vector::new();
        game_log.push_back(format!("Game instance {match_id} created. Waiting for players..."));

        Self {
            match_id,
            config,
            players: Vec::new(),
            player_order: Vec::new(),
            current_player: None,
            phase: TurnPhase::WaitingForPlayers,
            last_roll: None,
            dice_sum: 0,
            extra_turn_taken: false,
            market,
            winner: None,
            game_log,
            landmark_assignments: BTreeMap::new(),
            rng,
        }
    }

    // === Roster ===

    /// Look up a seated player.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Look up a seated player mutably.
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current(&self) -> Option<&Player> {
        self.current_player.as_ref().and_then(|id| self.player(id))
    }

    /// Players in seating order. Before the match starts, join order.
    #[must_use]
    pub fn seated(&self) -> Vec<&Player> {
        if self.player_order.is_empty() {
            return self.players.iter().collect();
        }
        self.player_order.iter().filter_map(|id| self.player(id)).collect()
    }

    /// Display name for log lines, falling back to the raw id.
    #[must_use]
    pub fn name_of(&self, id: &PlayerId) -> String {
        self.player(id)
            .map_or_else(|| id.to_string(), |p| p.display_name.clone())
    }

    /// Has the match ended?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    /// Was the last roll two matching dice?
    #[must_use]
    pub fn rolled_doubles(&self) -> bool {
        matches!(self.last_roll.as_deref(), Some([a, b]) if a == b)
    }

    /// Forget the current roll.
    pub fn clear_dice(&mut self) {
        self.last_roll = None;
        self.dice_sum = 0;
    }

    /// End the match with no winner.
    pub fn abandon(&mut self, reason: impl Into<String>) {
        self.phase = TurnPhase::GameOver;
        self.winner = None;
        self.current_player = None;
        self.clear_dice();
        self.log(reason);
    }

    // === Log ===

    /// Append a line to the game log.
    pub fn log(&mut self, line: impl Into<String>) {
        self.game_log.push_back(line.into());
    }

    // === Economy ===

    /// Apply an effect's coin movements. Transfers are clamped again to the
    /// payer's balance at application time.
    pub fn apply_delta(&mut self, delta: &EffectDelta) {
        for (id, amount) in &delta.bank_credits {
            if let Some(p) = self.player_mut(id) {
                p.credit(*amount);
            }
        }
        for transfer in &delta.transfers {
            let taken = self
                .player_mut(&transfer.from)
                .map_or(0, |p| p.debit_clamped(transfer.amount));
            if let Some(p) = self.player_mut(&transfer.to) {
                p.credit(taken);
            }
        }
    }

    // === Landmark assignments ===

    /// Landmarks previously assigned to `id`.
    #[must_use]
    pub fn assigned_landmarks(&self, id: &PlayerId) -> Option<&[LandmarkId]> {
        self.landmark_assignments.get(id).map(Vec::as_slice)
    }

    /// Every landmark currently assigned to anyone.
    pub fn all_assigned_landmarks(&self) -> impl Iterator<Item = &LandmarkId> {
        self.landmark_assignments.values().flatten()
    }

    /// Remember a landmark assignment.
    pub fn assign_landmarks(&mut self, id: PlayerId, landmarks: Vec<LandmarkId>) {
        self.landmark_assignments.insert(id, landmarks);
    }

    // === RNG ===

    /// The match RNG.
    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// The match RNG, mutably.
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    // === Snapshots ===

    /// Encode the full state.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a state produced by [`GameState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
