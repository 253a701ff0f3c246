//! Income resolution for one completed roll.
//!
//! Order is fixed: Harbor bonus, then red, blue, green and purple cards.
//! Red cards settle first so opponents get first claim on the roller's
//! coins. Owners are visited in seating order and cards in catalog order,
//! and every owned copy triggers its effect separately against the
//! balances left by the previous one.

use crate::cards::{Catalog, ColorClass};
use crate::core::{GameState, PlayerId};
use crate::effects::{apply_effect, EffectContext};

/// Color classes in resolution order.
const RESOLUTION_ORDER: [ColorClass; 4] = [
    ColorClass::Red,
    ColorClass::Blue,
    ColorClass::Green,
    ColorClass::Purple,
];

/// Log line when neither the income pass nor City Hall paid out.
pub(crate) const NO_INCOME: &str = "No card income generated from this roll.";

/// Resolve all income for `roller`'s roll of `sum`.
///
/// Returns true if any coins moved.
pub(crate) fn resolve_income(state: &mut GameState, catalog: &Catalog, roller: &PlayerId, sum: u8) -> bool {
    let mut changed = harbor_bonus(state, roller, sum);

    for color in RESOLUTION_ORDER {
        let owners: Vec<PlayerId> = state
            .seated()
            .into_iter()
            .filter(|p| triggers_for(color, &p.id, roller))
            .map(|p| p.id.clone())
            .collect();

        for owner_id in &owners {
            for card in catalog.by_color(color).filter(|c| c.activates_for(sum)) {
                let copies = state.player(owner_id).map_or(0, |p| p.holding_count(&card.id));

                for _ in 0..copies {
                    let outcome = {
                        let seated = state.seated();
                        let (Some(owner), Some(rolling)) = (state.player(owner_id), state.player(roller)) else {
                            break;
                        };
                        apply_effect(
                            &card.effect,
                            &EffectContext {
                                card_name: &card.name,
                                owner,
                                roller: rolling,
                                seated: &seated,
                            },
                        )
                    };

                    if !outcome.delta.is_empty() {
                        state.apply_delta(&outcome.delta);
                        changed = true;
                    }
                    if let Some(message) = outcome.message {
                        state.log(message);
                    }
                }
            }
        }
    }

    changed
}

/// Whose copies of a `color` card trigger on `roller`'s roll.
fn triggers_for(color: ColorClass, owner: &PlayerId, roller: &PlayerId) -> bool {
    match color {
        ColorClass::Red => owner != roller,
        ColorClass::Blue => true,
        ColorClass::Green | ColorClass::Purple => owner == roller,
    }
}

fn harbor_bonus(state: &mut GameState, roller: &PlayerId, sum: u8) -> bool {
    let bonus = state.config.harbor_bonus;
    let threshold = state.config.harbor_threshold;
    let Some(player) = state.player_mut(roller) else {
        return false;
    };
    if !player.has_harbor || sum < threshold || bonus == 0 {
        return false;
    }
    player.credit(bonus);
    let name = player.display_name.clone();
    state.log(format!(
        "{name} gained {bonus} extra coins from Harbor (roll {sum} >= {threshold})."
    ));
    true
}

/// Pay the City Hall bonus to a broke roller about to enter the build phase.
pub(crate) fn city_hall_bonus(state: &mut GameState, roller: &PlayerId) -> bool {
    let bonus = state.config.city_hall_bonus;
    let Some(player) = state.player_mut(roller) else {
        return false;
    };
    if !player.has_city_hall || player.coins > 0 || bonus == 0 {
        return false;
    }
    player.credit(bonus);
    let name = player.display_name.clone();
    state.log(format!(
        "{name} gained {bonus} {} from City Hall (no coins entering the build phase).",
        if bonus == 1 { "coin" } else { "coins" }
    ));
    true
}
