//! Market rows, band decks and the global supply.

mod manager;

pub use manager::{Market, MarketBand};
