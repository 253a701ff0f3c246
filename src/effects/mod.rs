//! Effect system for establishment income.
//!
//! - `EffectKind`: what a card does when it activates
//! - `apply_effect`: pure resolver producing an `EffectDelta` and a log line
//!
//! Resolution never touches the game state directly. The engine applies
//! the returned delta, so every effect can be tested against a handful of
//! `Player` records.

mod effect;
mod resolver;

pub use effect::{EffectDelta, EffectKind, EffectOutcome, Transfer};
pub use resolver::{apply_effect, EffectContext};
