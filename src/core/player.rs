//! Player identification and the per-player ledger.
//!
//! ## PlayerId
//!
//! Opaque, caller-supplied identifier. The engine never interprets it.
//!
//! ## Player
//!
//! Coins, establishment holdings, landmark statuses and the ability flags
//! landmarks grant. Owned and mutated only by the engine.

use std::fmt;

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, LandmarkAbility, LandmarkDef, LandmarkId};

/// Opaque player identifier, stable for the lifetime of a match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a new player ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Build status of one landmark assigned to a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkStatus {
    pub id: LandmarkId,
    pub built: bool,
}

impl LandmarkStatus {
    /// Status for a freshly assigned landmark. Starting landmarks begin built.
    #[must_use]
    pub fn for_definition(def: &LandmarkDef) -> Self {
        Self {
            id: def.id.clone(),
            built: def.is_starting(),
        }
    }
}

/// Per-player record.
///
/// Coins are unsigned: every deduction goes through [`Player::debit_clamped`]
/// or is validated against the balance first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub avatar: Option<String>,
    pub coins: u32,

    /// Owned establishments: card id -> count (never zero).
    pub establishments: OrdMap<CardId, u32>,

    /// Landmarks available to this player, in assignment order.
    pub landmarks: Vec<LandmarkStatus>,

    // === Abilities (set once by a landmark, never unset) ===
    pub can_roll_two_dice: bool,
    pub has_shopping_mall: bool,
    pub can_take_extra_turn_on_doubles: bool,
    pub can_reroll_once: bool,
    pub has_harbor: bool,
    pub has_city_hall: bool,

    /// Reset at the start of each of this player's turns.
    pub has_used_reroll_this_turn: bool,
}

impl Player {
    /// Create a player with no establishments and no abilities.
    #[must_use]
    pub fn new(
        id: PlayerId,
        display_name: impl Into<String>,
        avatar: Option<String>,
        coins: u32,
        landmarks: Vec<LandmarkStatus>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            avatar,
            coins,
            establishments: OrdMap::new(),
            landmarks,
            can_roll_two_dice: false,
            has_shopping_mall: false,
            can_take_extra_turn_on_doubles: false,
            can_reroll_once: false,
            has_harbor: false,
            has_city_hall: false,
            has_used_reroll_this_turn: false,
        }
    }

    // === Coins ===

    /// Bank payment.
    pub fn credit(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Remove up to `amount` coins. Returns what was actually removed.
    pub fn debit_clamped(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.coins);
        self.coins -= taken;
        taken
    }

    // === Establishments ===

    /// Copies of `card` this player owns.
    #[must_use]
    pub fn holding_count(&self, card: &CardId) -> u32 {
        self.establishments.get(card).copied().unwrap_or(0)
    }

    /// Add one copy of `card`.
    pub fn add_establishment(&mut self, card: &CardId) {
        *self.establishments.entry(card.clone()).or_insert(0) += 1;
    }

    /// Total establishments owned.
    #[must_use]
    pub fn establishment_total(&self) -> u32 {
        self.establishments.values().sum()
    }

    // === Landmarks ===

    /// Status of a landmark, if it is assigned to this player.
    #[must_use]
    pub fn landmark(&self, id: &LandmarkId) -> Option<&LandmarkStatus> {
        self.landmarks.iter().find(|l| &l.id == id)
    }

    /// Is `id` assigned to this player and built?
    #[must_use]
    pub fn has_built(&self, id: &LandmarkId) -> bool {
        self.landmark(id).is_some_and(|l| l.built)
    }

    /// Mark an assigned landmark as built. Returns false if not assigned.
    pub fn mark_built(&mut self, id: &LandmarkId) -> bool {
        match self.landmarks.iter_mut().find(|l| &l.id == id) {
            Some(status) => {
                status.built = true;
                true
            }
            None => false,
        }
    }

    /// Apply a landmark's one-time build hook.
    pub fn grant_ability(&mut self, ability: LandmarkAbility) {
        match ability {
            LandmarkAbility::None => {}
            LandmarkAbility::TwoDice => self.can_roll_two_dice = true,
            LandmarkAbility::ShoppingMall => self.has_shopping_mall = true,
            LandmarkAbility::ExtraTurnOnDoubles => self.can_take_extra_turn_on_doubles = true,
            LandmarkAbility::Reroll => self.can_reroll_once = true,
            LandmarkAbility::Harbor => self.has_harbor = true,
            LandmarkAbility::CityHall => self.has_city_hall = true,
            LandmarkAbility::CoinBonus(amount) => self.credit(amount),
        }
    }

    /// Can this player use their reroll right now?
    #[must_use]
    pub fn can_reroll(&self) -> bool {
        self.can_reroll_once && !self.has_used_reroll_this_turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(coins: u32) -> Player {
        Player::new(
            PlayerId::new("p1"),
            "Alice",
            None,
            coins,
            vec![
                LandmarkStatus {
                    id: LandmarkId::new("town_hall"),
                    built: true,
                },
                LandmarkStatus {
                    id: LandmarkId::new("harbor"),
                    built: false,
                },
            ],
        )
    }

    #[test]
    fn test_player_id_basics() {
        let id = PlayerId::new("discord-123");
        assert_eq!(id.as_str(), "discord-123");
        assert_eq!(format!("{}", id), "discord-123");
        assert_eq!(PlayerId::from("discord-123"), id);
    }

    #[test]
    fn test_debit_is_clamped() {
        let mut p = player(2);

        assert_eq!(p.debit_clamped(5), 2);
        assert_eq!(p.coins, 0);
        assert_eq!(p.debit_clamped(1), 0);
        assert_eq!(p.coins, 0);

        p.credit(3);
        assert_eq!(p.coins, 3);
    }

    #[test]
    fn test_holdings() {
        let mut p = player(0);
        let wheat = CardId::new("wheat_field");

        assert_eq!(p.holding_count(&wheat), 0);
        p.add_establishment(&wheat);
        p.add_establishment(&wheat);
        p.add_establishment(&CardId::new("bakery"));

        assert_eq!(p.holding_count(&wheat), 2);
        assert_eq!(p.establishment_total(), 3);
    }

    #[test]
    fn test_landmarks() {
        let mut p = player(0);
        let harbor = LandmarkId::new("harbor");

        assert!(p.has_built(&LandmarkId::new("town_hall")));
        assert!(!p.has_built(&harbor));
        assert!(p.mark_built(&harbor));
        assert!(p.has_built(&harbor));
        assert!(!p.mark_built(&LandmarkId::new("airport")));
    }

    #[test]
    fn test_grant_ability() {
        let mut p = player(0);

        p.grant_ability(LandmarkAbility::TwoDice);
        p.grant_ability(LandmarkAbility::Reroll);
        p.grant_ability(LandmarkAbility::CoinBonus(10));

        assert!(p.can_roll_two_dice);
        assert!(p.can_reroll());
        assert!(!p.has_harbor);
        assert_eq!(p.coins, 10);

        p.has_used_reroll_this_turn = true;
        assert!(!p.can_reroll());
    }

    #[test]
    fn test_player_serialization() {
        let mut p = player(4);
        p.add_establishment(&CardId::new("cafe"));

        let json = serde_json::to_string(&p).unwrap();
        let deserialized: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(p, deserialized);
    }
}
