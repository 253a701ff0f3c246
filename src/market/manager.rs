//! Market and supply manager.
//!
//! Three independent bands, each a shuffled deck feeding a face-up row.
//! A global per-card supply counter tracks copies not yet bought. For every
//! card, copies left in its deck plus copies showing in its row always equal
//! the remaining supply.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use crate::cards::{Band, CardId, Catalog, EstablishmentDef};
use crate::core::error::GameError;
use crate::core::rng::GameRng;

/// One band's deck and face-up row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBand {
    /// Face-down copies, drawn front to back.
    deck: Vector<CardId>,
    /// Face-up cards available for purchase. Never holds duplicates.
    row: Vec<CardId>,
}

/// The shared market: supply counters, decks and rows.
///
/// ## Usage
///
/// ```
/// use dice_tower::cards::{Band, Catalog};
/// use dice_tower::core::GameRng;
/// use dice_tower::market::Market;
///
/// let catalog = Catalog::standard();
/// let mut rng = GameRng::new(42);
/// let market = Market::new(&catalog, 5, &mut rng);
///
/// assert_eq!(market.row(Band::Low).len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    supply: OrdMap<CardId, u32>,
    bands: [MarketBand; 3],
    width: usize,
}

impl Market {
    /// Stock the supply, build and shuffle each band's deck, and deal every
    /// row up to `width`.
    #[must_use]
    pub fn new(catalog: &Catalog, width: usize, rng: &mut GameRng) -> Self {
        let mut supply = OrdMap::new();
        let mut decks: [Vec<CardId>; 3] = Default::default();

        for card in catalog.establishments() {
            supply.insert(card.id.clone(), card.initial_supply);
            let deck = &mut decks[card.band.index()];
            for _ in 0..card.initial_supply {
                deck.push(card.id.clone());
            }
        }

        for deck in &mut decks {
            rng.shuffle(deck);
        }

        let [low, high, any] = decks;
        let mut market = Self {
            supply,
            bands: [low, high, any].map(|deck| MarketBand {
                deck: deck.into_iter().collect(),
                row: Vec::with_capacity(width),
            }),
            width,
        };

        for band in Band::ALL {
            market.fill_row(band, width);
        }
        market
    }

    /// Target row width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Face-up cards in a band.
    #[must_use]
    pub fn row(&self, band: Band) -> &[CardId] {
        &self.bands[band.index()].row
    }

    /// Face-down cards left in a band's deck.
    #[must_use]
    pub fn deck(&self, band: Band) -> &Vector<CardId> {
        &self.bands[band.index()].deck
    }

    /// Copies of `card` not yet bought.
    #[must_use]
    pub fn supply(&self, card: &CardId) -> u32 {
        self.supply.get(card).copied().unwrap_or(0)
    }

    /// Remaining supply for every card.
    #[must_use]
    pub fn supply_map(&self) -> &OrdMap<CardId, u32> {
        &self.supply
    }

    /// Copies of `card` sitting in decks or rows.
    #[must_use]
    pub fn copies_in_circulation(&self, card: &CardId) -> u32 {
        let count = self
            .bands
            .iter()
            .map(|b| b.deck.iter().chain(b.row.iter()).filter(|id| *id == card).count())
            .sum::<usize>();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Move cards from the deck into the row until it holds `target` cards.
    ///
    /// Takes the first deck card not already showing. Stops early, leaving
    /// the row short, when every remaining deck card duplicates a face-up
    /// one. Returns the number of cards dealt.
    pub fn fill_row(&mut self, band: Band, target: usize) -> usize {
        let slot = &mut self.bands[band.index()];
        let mut dealt = 0;

        while slot.row.len() < target {
            let Some(pos) = slot.deck.iter().position(|id| !slot.row.contains(id)) else {
                break;
            };
            let card = slot.deck.remove(pos);
            slot.row.push(card);
            dealt += 1;
        }
        dealt
    }

    /// Take a bought card off its row and top the row back up.
    pub fn refill_after_purchase(&mut self, band: Band, purchased: &CardId) {
        let row = &mut self.bands[band.index()].row;
        if let Some(pos) = row.iter().position(|id| id == purchased) {
            row.remove(pos);
        }
        self.fill_row(band, self.width);
    }

    /// Is `card` showing in `band` with supply left?
    #[must_use]
    pub fn is_available(&self, band: Band, card: &CardId) -> bool {
        self.row(band).contains(card) && self.supply(card) > 0
    }

    /// Check that `card` can be bought from `band`.
    pub fn check_available(&self, band: Band, card: &EstablishmentDef) -> Result<(), GameError> {
        if !self.row(band).contains(&card.id) {
            return Err(GameError::NotInMarket {
                card: card.name.clone(),
                band,
            });
        }
        if self.supply(&card.id) == 0 {
            return Err(GameError::OutOfStock {
                card: card.name.clone(),
            });
        }
        Ok(())
    }

    /// Sell one copy of `card` from `band`: decrement supply, clear the slot,
    /// refill the row.
    pub fn purchase(&mut self, band: Band, card: &EstablishmentDef) -> Result<(), GameError> {
        self.check_available(band, card)?;
        if let Some(remaining) = self.supply.get_mut(&card.id) {
            *remaining -= 1;
        }
        self.refill_after_purchase(band, &card.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::ColorClass;

    fn tiny_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.register_establishment(
            EstablishmentDef::new("a", "A", ColorClass::Blue, 1)
                .activates_on([1])
                .with_band(Band::Low)
                .with_supply(3),
        );
        catalog.register_establishment(
            EstablishmentDef::new("b", "B", ColorClass::Blue, 1)
                .activates_on([2])
                .with_band(Band::Low)
                .with_supply(1),
        );
        catalog
    }

    fn assert_conserved(market: &Market, catalog: &Catalog) {
        for card in catalog.establishments() {
            assert_eq!(
                market.copies_in_circulation(&card.id),
                market.supply(&card.id),
                "circulation mismatch for {}",
                card.id
            );
        }
    }

    #[test]
    fn test_initialize_standard() {
        let catalog = Catalog::standard();
        let mut rng = GameRng::new(1);
        let market = Market::new(&catalog, 5, &mut rng);

        for band in Band::ALL {
            let row = market.row(band);
            assert_eq!(row.len(), 5);
            let mut unique = row.to_vec();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), row.len(), "duplicate face in {band}");
            assert!(row.iter().all(|id| catalog.establishment(id).map(|c| c.band) == Some(band)));
        }
        for card in catalog.establishments() {
            assert_eq!(market.supply(&card.id), card.initial_supply);
        }
        assert_conserved(&market, &catalog);
    }

    #[test]
    fn test_row_underfills_rather_than_duplicate() {
        let catalog = tiny_catalog();
        let mut rng = GameRng::new(3);
        let market = Market::new(&catalog, 5, &mut rng);

        let mut row = market.row(Band::Low).to_vec();
        row.sort();
        assert_eq!(row, vec![CardId::new("a"), CardId::new("b")]);
        assert_eq!(market.deck(Band::Low).len(), 2);
        assert!(market.row(Band::High).is_empty());
    }

    #[test]
    fn test_purchase_refills_row() {
        let catalog = tiny_catalog();
        let mut rng = GameRng::new(3);
        let mut market = Market::new(&catalog, 5, &mut rng);
        let a = catalog.establishment(&CardId::new("a")).unwrap().clone();

        market.purchase(Band::Low, &a).unwrap();

        assert_eq!(market.supply(&a.id), 2);
        assert!(market.row(Band::Low).contains(&a.id), "next copy of A is dealt");
        assert_eq!(market.deck(Band::Low).len(), 1);
        assert_conserved(&market, &catalog);
    }

    #[test]
    fn test_purchase_last_copy_leaves_row_short() {
        let catalog = tiny_catalog();
        let mut rng = GameRng::new(3);
        let mut market = Market::new(&catalog, 5, &mut rng);
        let b = catalog.establishment(&CardId::new("b")).unwrap().clone();

        market.purchase(Band::Low, &b).unwrap();

        assert_eq!(market.supply(&b.id), 0);
        assert_eq!(market.row(Band::Low), &[CardId::new("a")]);
        assert!(!market.is_available(Band::Low, &b.id));

        let err = market.purchase(Band::Low, &b).unwrap_err();
        assert!(matches!(err, GameError::NotInMarket { .. }));
        assert_conserved(&market, &catalog);
    }

    #[test]
    fn test_wrong_band_is_rejected() {
        let catalog = tiny_catalog();
        let mut rng = GameRng::new(3);
        let mut market = Market::new(&catalog, 5, &mut rng);
        let a = catalog.establishment(&CardId::new("a")).unwrap().clone();
        let before = market.clone();

        let err = market.purchase(Band::High, &a).unwrap_err();
        assert!(matches!(err, GameError::NotInMarket { band: Band::High, .. }));
        assert_eq!(market, before);
    }

    #[test]
    fn test_same_seed_same_market() {
        let catalog = Catalog::standard();
        let a = Market::new(&catalog, 5, &mut GameRng::new(11));
        let b = Market::new(&catalog, 5, &mut GameRng::new(11));
        assert_eq!(a, b);
    }
}
