//! Property-based tests for the turn engine.
//!
//! Random matches are driven by picking among `legal_commands` (plus the
//! odd deliberately bad command) and the game record is checked after
//! every step.

use proptest::prelude::*;

use dice_tower::{
    apply_effect, Band, CardId, Catalog, Command, EffectContext, EffectKind, GameState, JoinRequest, LandmarkId,
    MatchConfig, Player, PlayerId, TurnEngine, TurnPhase,
};

fn new_match(config: MatchConfig, players: usize, seed: u64) -> TurnEngine {
    // Auto-start tables begin once the last seat fills.
    let max_players = config.max_players.max(players);
    let config = config.with_players(players, max_players);
    let mut engine = TurnEngine::new("prop", Catalog::shared(), config, seed).unwrap();
    for i in 0..players {
        engine
            .add_player(JoinRequest::new(format!("p{i}"), format!("P{i}")))
            .unwrap();
    }
    if engine.state().phase == TurnPhase::WaitingForPlayers {
        engine.start_match().unwrap();
    }
    engine
}

/// Copies of `card` a player was seated with.
fn starting_count(state: &GameState, card: &CardId) -> u32 {
    state
        .config
        .starting_holdings
        .iter()
        .filter(|h| &h.card == card)
        .map(|h| h.count)
        .sum()
}

fn check_invariants(engine: &TurnEngine, order: &[PlayerId]) -> Result<(), TestCaseError> {
    let state = engine.state();

    for card in engine.catalog().establishments() {
        let supply = state.market.supply(&card.id);
        prop_assert_eq!(state.market.copies_in_circulation(&card.id), supply, "{} deck+row", card.id);

        let bought: u32 = state
            .players
            .iter()
            .map(|p| p.holding_count(&card.id) - starting_count(state, &card.id))
            .sum();
        prop_assert_eq!(supply + bought, card.initial_supply, "{} conservation", card.id);
    }

    for band in Band::ALL {
        let row = state.market.row(band);
        prop_assert!(row.len() <= 5);
        let mut unique = row.to_vec();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), row.len(), "duplicate in {} row", band);
    }

    prop_assert_eq!(&state.player_order[..], order);
    if state.phase != TurnPhase::GameOver {
        let current = state.current_player.as_ref();
        prop_assert!(current.is_some_and(|id| state.player_order.contains(id)));
    }
    if state.last_roll.is_none() {
        prop_assert_eq!(state.dice_sum, 0);
    }
    Ok(())
}

fn bad_command(pick: u8) -> Command {
    match pick % 4 {
        0 => Command::RollDice { num_dice: 3 },
        1 => Command::BuyEstablishment {
            card_id: CardId::new("casino"),
            band: Band::Any,
        },
        2 => Command::StartMatch,
        _ => Command::BuildLandmark {
            landmark_id: LandmarkId::new("castle"),
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any sequence of accepted commands keeps supply, rows and turn order consistent.
    #[test]
    fn prop_random_play_keeps_invariants(
        seed in any::<u64>(),
        players in 2usize..=4,
        classic in any::<bool>(),
        picks in prop::collection::vec(any::<u8>(), 1..300),
    ) {
        let config = if classic { MatchConfig::classic() } else { MatchConfig::tower() };
        let mut engine = new_match(config, players, seed);
        let order = engine.state().player_order.clone();
        check_invariants(&engine, &order)?;

        for pick in picks {
            if engine.state().is_over() {
                break;
            }
            let Some(current) = engine.current_player().map(|p| p.id.clone()) else {
                break;
            };

            if pick % 17 == 0 {
                let before = engine.state().to_bytes().unwrap();
                let rejected = engine.apply(&current, &bad_command(pick / 17));
                prop_assert!(rejected.is_err());
                prop_assert_eq!(engine.state().to_bytes().unwrap(), before);
                continue;
            }

            let legal = engine.legal_commands(&current);
            prop_assert!(!legal.is_empty());
            let command = legal[pick as usize % legal.len()].clone();
            let accepted = engine.apply(&current, &command);
            prop_assert!(accepted.is_ok(), "{:?} rejected: {:?}", command, accepted);

            check_invariants(&engine, &order)?;
        }
    }

    /// Commands from anyone but the current player never change the record.
    #[test]
    fn prop_out_of_turn_is_inert(
        seed in any::<u64>(),
        num_dice in 0u8..4,
    ) {
        let mut engine = new_match(MatchConfig::tower(), 3, seed);
        let before = engine.state().to_bytes().unwrap();

        for other in ["p1", "p2", "stranger"] {
            let who = PlayerId::new(other);
            let roll = Command::RollDice { num_dice };
            prop_assert!(engine.apply(&who, &roll).is_err());
            prop_assert!(engine.apply(&who, &Command::PassTurn).is_err());
        }
        prop_assert_eq!(engine.state().to_bytes().unwrap(), before);
    }

    /// Effects never take more from a payer than the payer holds.
    #[test]
    fn prop_effects_never_overdraw(
        owner_coins in 0u32..30,
        opponent_coins in prop::collection::vec(0u32..30, 1..4),
        cafes in 0u32..4,
        amount in 0u32..8,
        threshold in 0u32..15,
        divisor in 0u32..4,
    ) {
        let owner = Player::new(PlayerId::new("owner"), "Owner", None, owner_coins, Vec::new());
        let opponents: Vec<Player> = opponent_coins
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let mut p = Player::new(PlayerId::new(format!("o{i}")), format!("O{i}"), None, c, Vec::new());
                for _ in 0..cafes {
                    p.add_establishment(&CardId::new("cafe"));
                }
                p
            })
            .collect();
        let mut seated: Vec<&Player> = vec![&owner];
        seated.extend(opponents.iter());

        let kinds = [
            EffectKind::TakeFromRoller { amount, mall_bonus: 1 },
            EffectKind::TakeFromEachOpponent { amount },
            EffectKind::TakeFromRichestOpponent { amount },
            EffectKind::TakePerOpponentCard { per_card: amount, cards: vec![CardId::new("cafe")] },
            EffectKind::TaxWealthyOpponents { threshold, divisor },
        ];

        for kind in &kinds {
            let ctx = EffectContext {
                card_name: "Card",
                owner: &owner,
                roller: &opponents[0],
                seated: &seated,
            };
            let outcome = apply_effect(kind, &ctx);
            for payer in &opponents {
                let paid: u32 = outcome
                    .delta
                    .transfers
                    .iter()
                    .filter(|t| t.from == payer.id)
                    .map(|t| t.amount)
                    .sum();
                prop_assert!(paid <= payer.coins, "{:?} overdrew {}", kind, payer.id);
            }
            prop_assert!(outcome.delta.transfers.iter().all(|t| t.to == owner.id && t.amount > 0));
        }
    }
}
