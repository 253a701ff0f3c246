//! Card system: definitions and the catalog.
//!
//! ## Key Types
//!
//! - `CardId` / `LandmarkId`: identifiers for definitions
//! - `EstablishmentDef`: cost, color class, activation sums, supply, effect
//! - `LandmarkDef`: cost and the ability granted when built
//! - `Catalog`: immutable definition lookup, shared behind an `Arc`

pub mod definition;
pub mod registry;

pub use definition::{Band, CardId, ColorClass, EstablishmentDef, LandmarkAbility, LandmarkDef, LandmarkId};
pub use registry::Catalog;
