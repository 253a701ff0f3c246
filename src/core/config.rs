//! Match configuration.
//!
//! One `MatchConfig` per match, fixed at creation. It decides which
//! landmarks players can build, how turn order is chosen, and the numeric
//! rules (seats, victory threshold, starting coins, bonuses).
//!
//! Two presets cover the common tables:
//! - [`MatchConfig::classic`]: every landmark for everyone, shuffled order,
//!   starts itself once enough players sit down
//! - [`MatchConfig::tower`]: three random landmarks per player, host-first
//!   order, started explicitly by the room

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::cards::CardId;

/// Widest a market row may be.
pub const MAX_MARKET_WIDTH: usize = 5;

/// Which landmarks a player may build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkMode {
    /// Every catalog landmark. Zero-cost landmarks start built.
    FullSet,
    /// `count` landmarks drawn at random from the buildable ones when the
    /// player joins. Disjoint from other players' sets while enough remain.
    RandomSubset { count: usize },
}

/// How seating order is fixed at match start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrder {
    /// Uniform random permutation of seated players.
    Shuffled,
    /// Join order, so the host goes first.
    SeatOrder,
}

/// A starting establishment grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingHolding {
    pub card: CardId,
    pub count: u32,
}

/// Complete match configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub landmark_mode: LandmarkMode,
    pub turn_order: TurnOrder,

    /// Seated players needed to start (at least 2).
    pub min_players: usize,
    /// Seats at the table.
    pub max_players: usize,
    /// Non-starting landmarks needed to win.
    pub victory_landmarks: usize,
    /// Target width of each market row, 1 to [`MAX_MARKET_WIDTH`].
    pub market_width: usize,

    pub starting_coins: u32,
    /// Granted outside the supply; never drawn from the decks.
    pub starting_holdings: Vec<StartingHolding>,

    /// Paid to a Harbor owner rolling at least `harbor_threshold`.
    pub harbor_bonus: u32,
    pub harbor_threshold: u8,
    /// Paid to a broke City Hall owner on entering the build phase.
    pub city_hall_bonus: u32,

    /// Start as soon as `min_players` have joined.
    pub auto_start: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::tower()
    }
}

impl MatchConfig {
    /// Single-table rules: all landmarks, shuffled order, auto-start.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            landmark_mode: LandmarkMode::FullSet,
            turn_order: TurnOrder::Shuffled,
            auto_start: true,
            ..Self::base()
        }
    }

    /// Room rules: three random landmarks each, host first, explicit start.
    #[must_use]
    pub fn tower() -> Self {
        Self::base()
    }

    fn base() -> Self {
        Self {
            landmark_mode: LandmarkMode::RandomSubset { count: 3 },
            turn_order: TurnOrder::SeatOrder,
            min_players: 2,
            max_players: 4,
            victory_landmarks: 3,
            market_width: 5,
            starting_coins: 3,
            starting_holdings: vec![
                StartingHolding {
                    card: CardId::new("wheat_field"),
                    count: 1,
                },
                StartingHolding {
                    card: CardId::new("bakery"),
                    count: 1,
                },
            ],
            harbor_bonus: 2,
            harbor_threshold: 10,
            city_hall_bonus: 1,
            auto_start: false,
        }
    }

    /// Set the landmark mode.
    #[must_use]
    pub fn with_landmark_mode(mut self, mode: LandmarkMode) -> Self {
        self.landmark_mode = mode;
        self
    }

    /// Set the turn order policy.
    #[must_use]
    pub fn with_turn_order(mut self, order: TurnOrder) -> Self {
        self.turn_order = order;
        self
    }

    /// Set seat limits.
    #[must_use]
    pub fn with_players(mut self, min: usize, max: usize) -> Self {
        self.min_players = min;
        self.max_players = max;
        self
    }

    /// Set starting coins.
    #[must_use]
    pub fn with_starting_coins(mut self, coins: u32) -> Self {
        self.starting_coins = coins;
        self
    }

    /// Enable or disable auto-start.
    #[must_use]
    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Parse a TOML document. Missing keys fall back to [`MatchConfig::tower`].
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players < 2 {
            return Err(ConfigError::Invalid(format!(
                "min_players must be at least 2, got {}",
                self.min_players
            )));
        }
        if self.max_players < self.min_players {
            return Err(ConfigError::Invalid(format!(
                "max_players ({}) is below min_players ({})",
                self.max_players, self.min_players
            )));
        }
        if !(1..=MAX_MARKET_WIDTH).contains(&self.market_width) {
            return Err(ConfigError::Invalid(format!(
                "market_width must be between 1 and {MAX_MARKET_WIDTH}, got {}",
                self.market_width
            )));
        }
        if self.victory_landmarks == 0 {
            return Err(ConfigError::Invalid("victory_landmarks must be positive".into()));
        }
        if let LandmarkMode::RandomSubset { count } = self.landmark_mode {
            if count < self.victory_landmarks {
                return Err(ConfigError::Invalid(format!(
                    "random landmark count ({count}) is below victory_landmarks ({})",
                    self.victory_landmarks
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let classic = MatchConfig::classic();
        assert_eq!(classic.landmark_mode, LandmarkMode::FullSet);
        assert_eq!(classic.turn_order, TurnOrder::Shuffled);
        assert!(classic.auto_start);

        let tower = MatchConfig::tower();
        assert_eq!(tower.landmark_mode, LandmarkMode::RandomSubset { count: 3 });
        assert_eq!(tower.turn_order, TurnOrder::SeatOrder);
        assert!(!tower.auto_start);
        assert_eq!(tower.victory_landmarks, 3);
        assert_eq!(tower.market_width, 5);
    }

    #[test]
    fn test_builder() {
        let config = MatchConfig::tower()
            .with_players(3, 5)
            .with_starting_coins(10)
            .with_turn_order(TurnOrder::Shuffled)
            .with_auto_start(true);

        assert_eq!(config.min_players, 3);
        assert_eq!(config.max_players, 5);
        assert_eq!(config.starting_coins, 10);
        assert!(config.auto_start);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = MatchConfig::from_toml_str(
            r#"
            turn_order = "shuffled"
            max_players = 3
            landmark_mode = "full_set"
            "#,
        )
        .unwrap();

        assert_eq!(config.turn_order, TurnOrder::Shuffled);
        assert_eq!(config.max_players, 3);
        assert_eq!(config.landmark_mode, LandmarkMode::FullSet);
        assert_eq!(config.starting_coins, 3);
    }

    #[test]
    fn test_from_toml_subset_table() {
        let config = MatchConfig::from_toml_str(
            r#"
            [landmark_mode.random_subset]
            count = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.landmark_mode, LandmarkMode::RandomSubset { count: 4 });
    }

    #[test]
    fn test_validation() {
        assert!(MatchConfig::tower().with_players(1, 4).validate().is_err());
        assert!(MatchConfig::tower().with_players(3, 2).validate().is_err());
        assert!(MatchConfig::tower()
            .with_landmark_mode(LandmarkMode::RandomSubset { count: 2 })
            .validate()
            .is_err());
        assert!(MatchConfig::from_toml_str("min_players = \"two\"").is_err());
    }

    #[test]
    fn test_market_width_bounds() {
        let mut config = MatchConfig::tower();
        config.market_width = 0;
        assert!(config.validate().is_err());
        config.market_width = MAX_MARKET_WIDTH;
        assert!(config.validate().is_ok());

        assert!(MatchConfig::from_toml_str("market_width = 8").is_err());
        assert_eq!(MatchConfig::from_toml_str("market_width = 3").unwrap().market_width, 3);
    }
}
