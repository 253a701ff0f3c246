//! Card catalog for definition lookup.
//!
//! The `Catalog` stores every establishment and landmark definition for a
//! match. It is immutable once built: construct it at startup, wrap it in
//! an `Arc`, and hand it to each [`TurnEngine`](crate::rules::TurnEngine).
//! Iteration follows registration order, which keeps income resolution and
//! the market reproducible for a fixed seed.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::definition::{
    Band, CardId, ColorClass, EstablishmentDef, LandmarkAbility, LandmarkDef, LandmarkId,
};
use crate::effects::EffectKind;

static STANDARD: Lazy<Arc<Catalog>> = Lazy::new(|| Arc::new(Catalog::standard()));

/// Registry of establishment and landmark definitions.
///
/// ## Example
///
/// ```
/// use dice_tower::cards::{Catalog, CardId, ColorClass, EstablishmentDef};
///
/// let mut catalog = Catalog::new();
/// catalog.register_establishment(EstablishmentDef::new("cafe", "Cafe", ColorClass::Red, 2));
///
/// let found = catalog.establishment(&CardId::new("cafe")).unwrap();
/// assert_eq!(found.name, "Cafe");
/// ```
#[derive(Clone, Debug, Default, Serialize)]
pub struct Catalog {
    establishments: Vec<EstablishmentDef>,
    landmarks: Vec<LandmarkDef>,
    #[serde(skip)]
    establishment_index: FxHashMap<CardId, usize>,
    #[serde(skip)]
    landmark_index: FxHashMap<LandmarkId, usize>,
}

impl Catalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide shared copy of [`Catalog::standard`].
    #[must_use]
    pub fn shared() -> Arc<Catalog> {
        Arc::clone(&STANDARD)
    }

    /// Register an establishment definition.
    ///
    /// Panics if an establishment with the same ID already exists.
    pub fn register_establishment(&mut self, card: EstablishmentDef) {
        if self.establishment_index.contains_key(&card.id) {
            panic!("Establishment {} already registered", card.id);
        }
        self.establishment_index.insert(card.id.clone(), self.establishments.len());
        self.establishments.push(card);
    }

    /// Register a landmark definition.
    ///
    /// Panics if a landmark with the same ID already exists.
    pub fn register_landmark(&mut self, landmark: LandmarkDef) {
        if self.landmark_index.contains_key(&landmark.id) {
            panic!("Landmark {} already registered", landmark.id);
        }
        self.landmark_index.insert(landmark.id.clone(), self.landmarks.len());
        self.landmarks.push(landmark);
    }

    /// Get an establishment definition by ID.
    #[must_use]
    pub fn establishment(&self, id: &CardId) -> Option<&EstablishmentDef> {
        self.establishment_index.get(id).map(|&i| &self.establishments[i])
    }

    /// Get a landmark definition by ID.
    #[must_use]
    pub fn landmark(&self, id: &LandmarkId) -> Option<&LandmarkDef> {
        self.landmark_index.get(id).map(|&i| &self.landmarks[i])
    }

    /// All establishments in registration order.
    pub fn establishments(&self) -> impl Iterator<Item = &EstablishmentDef> {
        self.establishments.iter()
    }

    /// All landmarks in registration order.
    pub fn landmarks(&self) -> impl Iterator<Item = &LandmarkDef> {
        self.landmarks.iter()
    }

    /// Establishments of one color class.
    pub fn by_color(&self, color: ColorClass) -> impl Iterator<Item = &EstablishmentDef> {
        self.establishments.iter().filter(move |c| c.color == color)
    }

    /// Establishments sold from one market band.
    pub fn in_band(&self, band: Band) -> impl Iterator<Item = &EstablishmentDef> {
        self.establishments.iter().filter(move |c| c.band == band)
    }

    /// Number of establishment definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.establishments.len()
    }

    /// Check if the catalog has no establishments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.establishments.is_empty()
    }

    /// The built-in card set.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for card in standard_establishments() {
            catalog.register_establishment(card);
        }
        for landmark in standard_landmarks() {
            catalog.register_landmark(landmark);
        }
        catalog
    }
}

fn standard_establishments() -> Vec<EstablishmentDef> {
    use ColorClass::{Blue, Green, Purple, Red};

    let bank = |amount| EffectKind::BankPayout { amount, mall_bonus: 0 };

    vec![
        // === Blue: anyone's roll ===
        EstablishmentDef::new("wheat_field", "Wheat Field", Blue, 1)
            .activates_on([1])
            .with_band(Band::Low)
            .with_supply(6)
            .with_effect(bank(1))
            .with_icon("🌾")
            .with_description("Get 1 coin from the bank."),
        EstablishmentDef::new("ranch", "Ranch", Blue, 1)
            .activates_on([2])
            .with_band(Band::Low)
            .with_supply(6)
            .with_effect(bank(1))
            .with_icon("🐄")
            .with_description("Get 1 coin from the bank."),
        EstablishmentDef::new("forest", "Forest", Blue, 3)
            .activates_on([5])
            .with_band(Band::Low)
            .with_supply(6)
            .with_effect(bank(1))
            .with_icon("🌳")
            .with_description("Get 1 coin from the bank."),
        EstablishmentDef::new("mine", "Mine", Blue, 6)
            .activates_on([9])
            .with_band(Band::High)
            .with_supply(6)
            .with_effect(bank(5))
            .with_icon("⛏️")
            .with_description("Get 5 coins from the bank."),
        EstablishmentDef::new("apple_orchard", "Apple Orchard", Blue, 3)
            .activates_on([10])
            .with_band(Band::High)
            .with_supply(6)
            .with_effect(bank(3))
            .with_icon("🍎")
            .with_description("Get 3 coins from the bank."),
        // === Green: your roll only ===
        EstablishmentDef::new("bakery", "Bakery", Green, 1)
            .activates_on([2, 3])
            .with_band(Band::Low)
            .with_supply(6)
            .with_effect(EffectKind::BankPayout { amount: 1, mall_bonus: 1 })
            .with_icon("🥖")
            .with_description("Get 1 coin. (+1 if Shopping Mall built)."),
        EstablishmentDef::new("convenience_store", "Convenience Store", Green, 2)
            .activates_on([4])
            .with_band(Band::Low)
            .with_supply(6)
            .with_effect(bank(3))
            .with_icon("🏪")
            .with_description("Get 3 coins."),
        EstablishmentDef::new("cheese_factory", "Cheese Factory", Green, 5)
            .activates_on([7])
            .with_band(Band::High)
            .with_supply(6)
            .with_effect(EffectKind::PerOwnedCard {
                per_card: 3,
                cards: vec![CardId::new("ranch")],
            })
            .with_icon("🧀")
            .with_description("Get 3 coins for each Ranch you own."),
        EstablishmentDef::new("furniture_factory", "Furniture Factory", Green, 3)
            .activates_on([8])
            .with_band(Band::High)
            .with_supply(6)
            .with_effect(EffectKind::PerOwnedCard {
                per_card: 3,
                cards: vec![CardId::new("forest")],
            })
            .with_icon("🛋️")
            .with_description("Get 3 coins for each Forest you own."),
        EstablishmentDef::new("fruit_and_vegetable_market", "Fruit and Vegetable Market", Green, 2)
            .activates_on([11, 12])
            .with_band(Band::Any)
            .with_supply(6)
            .with_effect(EffectKind::PerOwnedCard {
                per_card: 2,
                cards: vec![CardId::new("wheat_field"), CardId::new("apple_orchard")],
            })
            .with_icon("🥕")
            .with_description("Get 2 coins for each Wheat Field and Apple Orchard you own."),
        // === Red: the roller pays ===
        EstablishmentDef::new("cafe", "Cafe", Red, 2)
            .activates_on([3])
            .with_band(Band::Low)
            .with_supply(6)
            .with_effect(EffectKind::TakeFromRoller { amount: 1, mall_bonus: 1 })
            .with_icon("☕")
            .with_description("Take 1 coin from the player who rolled. (+1 if Shopping Mall built)."),
        EstablishmentDef::new("family_restaurant", "Family Restaurant", Red, 3)
            .activates_on([9, 10])
            .with_band(Band::High)
            .with_supply(6)
            .with_effect(EffectKind::TakeFromRoller { amount: 2, mall_bonus: 0 })
            .with_icon("🍝")
            .with_description("Take 2 coins from the player who rolled."),
        // === Purple: major establishments ===
        EstablishmentDef::new("stadium", "Stadium", Purple, 6)
            .activates_on([6])
            .with_band(Band::Low)
            .with_supply(4)
            .with_effect(EffectKind::TakeFromEachOpponent { amount: 2 })
            .with_icon("🏟️")
            .with_description("Get 2 coins from all other players."),
        EstablishmentDef::new("tv_station", "TV Station", Purple, 7)
            .activates_on([6])
            .with_band(Band::Any)
            .with_supply(4)
            .with_effect(EffectKind::TakeFromRichestOpponent { amount: 5 })
            .with_icon("📺")
            .with_description("Take 5 coins from the richest other player."),
        EstablishmentDef::new("business_center", "Business Center", Purple, 8)
            .activates_on([6])
            .with_band(Band::Any)
            .with_supply(4)
            .with_effect(EffectKind::TradeEstablishments)
            .with_icon("🏢")
            .with_description("Trade one non-purple establishment with an opponent (not supported)."),
        EstablishmentDef::new("publishers", "Publishers", Purple, 5)
            .activates_on([7])
            .with_band(Band::High)
            .with_supply(4)
            .with_effect(EffectKind::TakePerOpponentCard {
                per_card: 1,
                cards: vec![CardId::new("cafe"), CardId::new("family_restaurant")],
            })
            .with_icon("📰")
            .with_description("Get 1 coin from each player for every Cafe and Family Restaurant they own."),
        EstablishmentDef::new("tax_office", "Tax Office", Purple, 4)
            .activates_on([8, 9])
            .with_band(Band::High)
            .with_supply(4)
            .with_effect(EffectKind::TaxWealthyOpponents {
                threshold: 10,
                divisor: 2,
            })
            .with_icon("🏛️")
            .with_description("Take half (rounded down) of the coins from each player who has 10 or more."),
    ]
}

fn standard_landmarks() -> Vec<LandmarkDef> {
    vec![
        LandmarkDef::new("town_hall", "Town Hall", 0, LandmarkAbility::None)
            .with_icon("🏛")
            .with_description("Your starting point. All players begin with this built."),
        LandmarkDef::new("train_station", "Train Station", 4, LandmarkAbility::TwoDice)
            .with_icon("🚉")
            .with_description("You may choose to roll 1 or 2 dice on your turn."),
        LandmarkDef::new("shopping_mall", "Shopping Mall", 10, LandmarkAbility::ShoppingMall)
            .with_icon("🛍️")
            .with_description("Your Cafe and Bakery establishments earn +1 coin each time they activate."),
        LandmarkDef::new("amusement_park", "Amusement Park", 16, LandmarkAbility::ExtraTurnOnDoubles)
            .with_icon("🎡")
            .with_description("If you roll doubles, take another turn after this one (once per roll)."),
        LandmarkDef::new("radio_tower", "Radio Tower", 22, LandmarkAbility::Reroll)
            .with_icon("📡")
            .with_description("Once during your turn, you may re-roll your dice."),
        LandmarkDef::new("harbor", "Harbor", 2, LandmarkAbility::Harbor)
            .with_icon("⚓")
            .with_description("If you roll 10 or more on your turn, gain 2 extra coins."),
        LandmarkDef::new("airport", "Airport", 30, LandmarkAbility::CoinBonus(10))
            .with_icon("✈️")
            .with_description("When you build the Airport, you immediately gain 10 coins."),
        LandmarkDef::new("city_hall", "City Hall", 7, LandmarkAbility::CityHall)
            .with_icon("🏤")
            .with_description("If you have no coins at the start of your build phase, gain 1 coin."),
    ]
}
