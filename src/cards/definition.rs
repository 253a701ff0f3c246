//! Card definitions - static card data.
//!
//! `EstablishmentDef` holds the immutable properties of an establishment:
//! cost, color class, activation numbers, supply, market band and effect.
//! `LandmarkDef` holds a landmark's cost and the ability it grants once
//! built.
//!
//! How many copies a player owns is stored separately on the
//! [`Player`](crate::core::Player) ledger.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::effects::EffectKind;

/// Identifier of an establishment definition (e.g. `"wheat_field"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a landmark definition (e.g. `"train_station"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkId(pub String);

impl LandmarkId {
    /// Create a new landmark ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LandmarkId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Establishment color class. Decides whose roll triggers the card and
/// who pays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    /// Pays its owner from the bank on anyone's roll.
    Blue,
    /// Pays its owner from the bank on the owner's own roll.
    Green,
    /// Takes coins from the roller on an opponent's roll.
    Red,
    /// Major establishment, multi-target effect on the owner's own roll.
    Purple,
}

impl fmt::Display for ColorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorClass::Blue => "blue",
            ColorClass::Green => "green",
            ColorClass::Red => "red",
            ColorClass::Purple => "purple",
        };
        f.write_str(name)
    }
}

/// Market band: which deck and row a card is sold from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    /// Cards activated by low sums.
    #[serde(rename = "1-6", alias = "2-6")]
    Low,
    /// Cards activated by high sums.
    #[serde(rename = "7-12")]
    High,
    /// Cards spanning the whole range.
    #[serde(rename = "all")]
    Any,
}

impl Band {
    /// Every band, in market display order.
    pub const ALL: [Band; 3] = [Band::Low, Band::High, Band::Any];

    /// Position of this band in [`Band::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Band::Low => 0,
            Band::High => 1,
            Band::Any => 2,
        }
    }

    /// Display label used on the wire and in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Band::Low => "1-6",
            Band::High => "7-12",
            Band::Any => "all",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static establishment definition.
///
/// ## Example
///
/// ```
/// use dice_tower::cards::{Band, ColorClass, EstablishmentDef};
/// use dice_tower::effects::EffectKind;
///
/// let ranch = EstablishmentDef::new("ranch", "Ranch", ColorClass::Blue, 1)
///     .activates_on([2])
///     .with_band(Band::Low)
///     .with_supply(6)
///     .with_effect(EffectKind::BankPayout { amount: 1, mall_bonus: 0 });
///
/// assert!(ranch.activates_for(2));
/// assert!(!ranch.activates_for(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentDef {
    /// Unique identifier.
    pub id: CardId,
    /// Display name.
    pub name: String,
    /// Display icon.
    pub icon: String,
    /// Rules text for display.
    pub description: String,
    /// Purchase cost in coins.
    pub cost: u32,
    /// Color class.
    pub color: ColorClass,
    /// Dice sums (2..=12, or 1 for single-die rolls) that trigger the card.
    pub activation: SmallVec<[u8; 2]>,
    /// Copies in the global supply at match start.
    pub initial_supply: u32,
    /// Market band the card is sold from.
    pub band: Band,
    /// What the card does when it triggers.
    pub effect: EffectKind,
}

impl EstablishmentDef {
    /// Create a definition with no activations, no supply and an effect
    /// that pays nothing. Use the builder methods to fill it in.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: ColorClass, cost: u32) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            icon: String::new(),
            description: String::new(),
            cost,
            color,
            activation: SmallVec::new(),
            initial_supply: 0,
            band: Band::Any,
            effect: EffectKind::BankPayout { amount: 0, mall_bonus: 0 },
        }
    }

    /// Set the activation numbers.
    #[must_use]
    pub fn activates_on(mut self, sums: impl IntoIterator<Item = u8>) -> Self {
        self.activation = sums.into_iter().collect();
        self
    }

    /// Set the market band.
    #[must_use]
    pub fn with_band(mut self, band: Band) -> Self {
        self.band = band;
        self
    }

    /// Set the initial supply.
    #[must_use]
    pub fn with_supply(mut self, supply: u32) -> Self {
        self.initial_supply = supply;
        self
    }

    /// Set the effect.
    #[must_use]
    pub fn with_effect(mut self, effect: EffectKind) -> Self {
        self.effect = effect;
        self
    }

    /// Set the display icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Set the rules text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Does a roll summing to `sum` trigger this card?
    #[must_use]
    pub fn activates_for(&self, sum: u8) -> bool {
        self.activation.contains(&sum)
    }
}

/// One-time hook a landmark applies to its builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkAbility {
    /// No ongoing effect (starting landmarks).
    None,
    /// May roll one or two dice.
    TwoDice,
    /// Bakery and Cafe earn one extra coin.
    ShoppingMall,
    /// Doubles grant one extra turn.
    ExtraTurnOnDoubles,
    /// May reroll once per turn.
    Reroll,
    /// Bonus coins on rolls of ten or more.
    Harbor,
    /// One coin when entering the build phase broke.
    CityHall,
    /// Lump sum paid once on build.
    CoinBonus(u32),
}

/// Static landmark definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkDef {
    /// Unique identifier.
    pub id: LandmarkId,
    /// Display name.
    pub name: String,
    /// Display icon.
    pub icon: String,
    /// Rules text for display.
    pub description: String,
    /// Build cost. Zero marks a starting landmark.
    pub cost: u32,
    /// Applied once when built.
    pub ability: LandmarkAbility,
}

impl LandmarkDef {
    /// Create a landmark definition.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, cost: u32, ability: LandmarkAbility) -> Self {
        Self {
            id: LandmarkId::new(id),
            name: name.into(),
            icon: String::new(),
            description: String::new(),
            cost,
            ability,
        }
    }

    /// Set the display icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Set the rules text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Zero-cost landmarks start built and never count toward victory.
    #[must_use]
    pub fn is_starting(&self) -> bool {
        self.cost == 0
    }
}
