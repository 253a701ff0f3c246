//! Effect definitions.
//!
//! Every establishment carries one `EffectKind`. Effects are plain data;
//! [`apply_effect`](super::apply_effect) turns one into an [`EffectDelta`]
//! against a read-only view of the table, and the engine applies the delta.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardId;
use crate::core::PlayerId;

/// What an establishment does when it triggers.
///
/// ## Bank Effects
///
/// - `BankPayout`: flat income from the bank
/// - `PerOwnedCard`: income scaled by the owner's holdings of other cards
///
/// ## Transfer Effects
///
/// Every transfer is clamped to the payer's balance:
/// - `TakeFromRoller`: red cards, the roller pays the owner
/// - `TakeFromEachOpponent`: flat amount from every opponent
/// - `TakeFromRichestOpponent`: from the single richest opponent
/// - `TakePerOpponentCard`: scaled by what each opponent owns
/// - `TaxWealthyOpponents`: a fraction from opponents above a threshold
///
/// ## Stubs
///
/// - `TradeEstablishments`: announces itself, moves nothing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Bank pays `amount`, plus `mall_bonus` if the owner has a Shopping Mall.
    BankPayout {
        amount: u32,
        mall_bonus: u32,
    },

    /// Bank pays `per_card` for each copy of any listed card the owner holds.
    PerOwnedCard {
        per_card: u32,
        cards: Vec<CardId>,
    },

    /// The roller pays the owner `amount` (+`mall_bonus` with a Shopping Mall).
    TakeFromRoller {
        amount: u32,
        mall_bonus: u32,
    },

    /// Every opponent pays the owner `amount`.
    TakeFromEachOpponent {
        amount: u32,
    },

    /// The richest opponent pays the owner `amount`. Ties go to seat order.
    TakeFromRichestOpponent {
        amount: u32,
    },

    /// Each opponent pays `per_card` for every copy of a listed card they hold.
    TakePerOpponentCard {
        per_card: u32,
        cards: Vec<CardId>,
    },

    /// Opponents holding at least `threshold` coins pay `coins / divisor`.
    TaxWealthyOpponents {
        threshold: u32,
        divisor: u32,
    },

    /// Trade one establishment with an opponent. Not implemented: logs only.
    TradeEstablishments,
}

/// A coin movement between two players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: PlayerId,
    pub to: PlayerId,
    pub amount: u32,
}

/// Economic change produced by one effect application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectDelta {
    /// Coins paid out of the bank.
    pub bank_credits: SmallVec<[(PlayerId, u32); 1]>,
    /// Coins moved between players, applied in order.
    pub transfers: Vec<Transfer>,
}

impl EffectDelta {
    /// A single bank payment.
    #[must_use]
    pub fn credit(player: &PlayerId, amount: u32) -> Self {
        let mut delta = Self::default();
        delta.push_credit(player, amount);
        delta
    }

    /// Add a bank payment. Zero amounts are dropped.
    pub fn push_credit(&mut self, player: &PlayerId, amount: u32) {
        if amount > 0 {
            self.bank_credits.push((player.clone(), amount));
        }
    }

    /// Add a transfer. Zero amounts are dropped.
    pub fn push_transfer(&mut self, from: &PlayerId, to: &PlayerId, amount: u32) {
        if amount > 0 {
            self.transfers.push(Transfer {
                from: from.clone(),
                to: to.clone(),
                amount,
            });
        }
    }

    /// Does this delta move any coins?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bank_credits.is_empty() && self.transfers.is_empty()
    }

    /// Total coins moved, bank payments and transfers alike.
    #[must_use]
    pub fn total(&self) -> u32 {
        let credited: u32 = self.bank_credits.iter().map(|(_, amount)| amount).sum();
        let moved: u32 = self.transfers.iter().map(|t| t.amount).sum();
        credited + moved
    }
}

/// Result of resolving one effect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectOutcome {
    pub delta: EffectDelta,
    /// Log line, if the effect has anything to report.
    pub message: Option<String>,
}

impl EffectOutcome {
    /// An effect that did nothing and says nothing.
    #[must_use]
    pub fn silent() -> Self {
        Self::default()
    }

    /// An effect with a delta and a log line.
    #[must_use]
    pub fn new(delta: EffectDelta, message: impl Into<String>) -> Self {
        Self {
            delta,
            message: Some(message.into()),
        }
    }

    /// A log line with no economic change.
    #[must_use]
    pub fn note(message: impl Into<String>) -> Self {
        Self {
            delta: EffectDelta::default(),
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amounts_are_dropped() {
        let a = PlayerId::new("a");
        let b = PlayerId::new("b");
        let mut delta = EffectDelta::default();

        delta.push_credit(&a, 0);
        delta.push_transfer(&a, &b, 0);
        assert!(delta.is_empty());

        delta.push_transfer(&a, &b, 2);
        delta.push_credit(&b, 1);
        assert!(!delta.is_empty());
        assert_eq!(delta.total(), 3);
    }

    #[test]
    fn test_effect_kind_serialization() {
        let effect = EffectKind::PerOwnedCard {
            per_card: 3,
            cards: vec![CardId::new("ranch")],
        };

        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("per_owned_card"));

        let deserialized: EffectKind = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, deserialized);
    }
}
