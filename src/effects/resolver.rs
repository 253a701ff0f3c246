//! Effect resolution.
//!
//! `apply_effect` is pure: it reads the table through an [`EffectContext`]
//! and returns the coins it would move, already clamped so that no payer
//! goes below zero. The engine applies the delta and appends the message
//! to the game log.

use crate::core::Player;

use super::effect::{EffectDelta, EffectKind, EffectOutcome};

/// Read-only view of the table for one effect application.
#[derive(Clone, Copy, Debug)]
pub struct EffectContext<'a> {
    /// Display name of the triggering card.
    pub card_name: &'a str,
    /// The player who owns the triggering card.
    pub owner: &'a Player,
    /// The player who rolled.
    pub roller: &'a Player,
    /// Everyone at the table in seat order, owner included.
    pub seated: &'a [&'a Player],
}

impl<'a> EffectContext<'a> {
    /// Seated players other than the owner, in seat order.
    pub fn opponents(&self) -> impl Iterator<Item = &'a Player> + '_ {
        let owner = &self.owner.id;
        self.seated.iter().copied().filter(move |p| &p.id != owner)
    }
}

/// Resolve one trigger of `kind` for `ctx.owner`.
#[must_use]
pub fn apply_effect(kind: &EffectKind, ctx: &EffectContext<'_>) -> EffectOutcome {
    let owner = ctx.owner;
    let card = ctx.card_name;

    match kind {
        EffectKind::BankPayout { amount, mall_bonus } => {
            let income = amount + if owner.has_shopping_mall { *mall_bonus } else { 0 };
            if income == 0 {
                return EffectOutcome::silent();
            }
            EffectOutcome::new(
                EffectDelta::credit(&owner.id, income),
                format!("{} gained {} {} from {}.", owner.display_name, income, coins(income), card),
            )
        }

        EffectKind::PerOwnedCard { per_card, cards } => {
            let matching: u32 = cards.iter().map(|id| owner.holding_count(id)).sum();
            let income = matching * per_card;
            if income == 0 {
                return EffectOutcome::silent();
            }
            EffectOutcome::new(
                EffectDelta::credit(&owner.id, income),
                format!(
                    "{} gained {} {} from {} ({} matching {}).",
                    owner.display_name,
                    income,
                    coins(income),
                    card,
                    matching,
                    if matching == 1 { "card" } else { "cards" },
                ),
            )
        }

        EffectKind::TakeFromRoller { amount, mall_bonus } => {
            let roller = ctx.roller;
            if roller.id == owner.id {
                return EffectOutcome::silent();
            }
            let wanted = amount + if owner.has_shopping_mall { *mall_bonus } else { 0 };
            let taken = wanted.min(roller.coins);
            if taken == 0 {
                return EffectOutcome::silent();
            }
            let mut delta = EffectDelta::default();
            delta.push_transfer(&roller.id, &owner.id, taken);
            EffectOutcome::new(
                delta,
                format!(
                    "{} took {} {} from {} via {}.",
                    owner.display_name,
                    taken,
                    coins(taken),
                    roller.display_name,
                    card
                ),
            )
        }

        EffectKind::TakeFromEachOpponent { amount } => {
            let mut delta = EffectDelta::default();
            for victim in ctx.opponents() {
                delta.push_transfer(&victim.id, &owner.id, (*amount).min(victim.coins));
            }
            if delta.is_empty() {
                return EffectOutcome::note(format!(
                    "{} activated {}, but no other player had coins.",
                    owner.display_name, card
                ));
            }
            let total = delta.total();
            EffectOutcome::new(
                delta,
                format!(
                    "{} gained {} total {} from other players via {}.",
                    owner.display_name,
                    total,
                    coins(total),
                    card
                ),
            )
        }

        EffectKind::TakeFromRichestOpponent { amount } => {
            let mut richest: Option<&Player> = None;
            for victim in ctx.opponents().filter(|p| p.coins > 0) {
                if richest.map_or(true, |best| victim.coins > best.coins) {
                    richest = Some(victim);
                }
            }
            let Some(target) = richest else {
                return EffectOutcome::note(format!(
                    "{} activated {}, but no target player had coins.",
                    owner.display_name, card
                ));
            };
            let taken = (*amount).min(target.coins);
            let mut delta = EffectDelta::default();
            delta.push_transfer(&target.id, &owner.id, taken);
            EffectOutcome::new(
                delta,
                format!(
                    "{} took {} {} from {} via {}.",
                    owner.display_name,
                    taken,
                    coins(taken),
                    target.display_name,
                    card
                ),
            )
        }

        EffectKind::TakePerOpponentCard { per_card, cards } => {
            let mut delta = EffectDelta::default();
            for victim in ctx.opponents() {
                let owed: u32 = cards.iter().map(|id| victim.holding_count(id)).sum::<u32>() * per_card;
                delta.push_transfer(&victim.id, &owner.id, owed.min(victim.coins));
            }
            if delta.is_empty() {
                return EffectOutcome::note(format!(
                    "{} activated {}, but no opponent owed anything.",
                    owner.display_name, card
                ));
            }
            let total = delta.total();
            EffectOutcome::new(
                delta,
                format!("{} gained {} total {} via {}.", owner.display_name, total, coins(total), card),
            )
        }

        EffectKind::TaxWealthyOpponents { threshold, divisor } => {
            let mut delta = EffectDelta::default();
            for victim in ctx.opponents().filter(|p| p.coins >= *threshold) {
                let owed = victim.coins.checked_div(*divisor).unwrap_or(0);
                delta.push_transfer(&victim.id, &owner.id, owed.min(victim.coins));
            }
            if delta.is_empty() {
                return EffectOutcome::note(format!(
                    "{} activated {}, but no players met the criteria.",
                    owner.display_name, card
                ));
            }
            let total = delta.total();
            EffectOutcome::new(
                delta,
                format!("{} collected {} {} via {}.", owner.display_name, total, coins(total), card),
            )
        }

        EffectKind::TradeEstablishments => EffectOutcome::note(format!(
            "{} activated {}. Trading establishments is not supported; nothing changes hands.",
            owner.display_name, card
        )),
    }
}

fn coins(amount: u32) -> &'static str {
    if amount == 1 {
        "coin"
    } else {
        "coins"
    }
}
