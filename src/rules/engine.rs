//! The turn engine: command validation and the phase state machine.
//!
//! A `TurnEngine` owns one match. Every command is processed to completion
//! before the next is accepted; the surrounding transport is responsible for
//! funnelling concurrent submissions into one sequential stream.
//!
//! ## Phases
//!
//! ```text
//! waiting_for_players --start--> roll --roll--> build --buy/build/pass--> roll (next player)
//!                                  ^              |
//!                                  +---reroll-----+
//! build --winning landmark--> game_over
//! ```
//!
//! Rejected commands return a [`GameError`] and leave the state untouched.
//! The one exception is the roster safety valve: if the turn ever points at
//! a player who is not seated, the match ends with no winner.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, info};

use super::income::{city_hall_bonus, resolve_income, NO_INCOME};
use super::turn::{advance_turn, begin_match, roster_inconsistent, seat_player, unseat_player};
use crate::cards::{Band, CardId, Catalog, LandmarkAbility, LandmarkId};
use crate::core::{
    Command, ConfigError, DiceSource, GameError, GameRng, GameState, JoinRequest, LandmarkMode, MatchConfig,
    Outcome, Player, PlayerId, TurnPhase, DIE_FACES,
};
use crate::market::Market;

/// Result of a finished match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchResult {
    /// A player reached the landmark threshold.
    Winner(PlayerId),
    /// The match ended without a winner (players left).
    Abandoned,
}

impl MatchResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: &PlayerId) -> bool {
        matches!(self, MatchResult::Winner(p) if p == player)
    }
}

/// Authoritative engine for one match.
///
/// ## Example
///
/// ```
/// use dice_tower::cards::Catalog;
/// use dice_tower::core::{Command, JoinRequest, MatchConfig, PlayerId, TurnPhase};
/// use dice_tower::rules::TurnEngine;
///
/// let mut engine = TurnEngine::new("room", Catalog::shared(), MatchConfig::tower(), 7).unwrap();
/// engine.add_player(JoinRequest::new("a", "Alice")).unwrap();
/// engine.add_player(JoinRequest::new("b", "Bob")).unwrap();
///
/// let alice = PlayerId::new("a");
/// engine.apply(&alice, &Command::StartMatch).unwrap();
/// engine.apply(&alice, &Command::RollDice { num_dice: 1 }).unwrap();
/// assert_eq!(engine.state().phase, TurnPhase::Build);
/// ```
#[derive(Clone, Debug)]
pub struct TurnEngine {
    catalog: Arc<Catalog>,
    state: GameState,
}

impl TurnEngine {
    /// Create a match waiting for players.
    pub fn new(
        match_id: impl Into<String>,
        catalog: Arc<Catalog>,
        config: MatchConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        check_config(&config, &catalog)?;

        let mut rng = GameRng::new(seed);
        let market = Market::new(&catalog, config.market_width, &mut rng);
        let state = GameState::new(match_id, config, market, rng);
        info!(match_id = %state.match_id, seed, "match created");

        Ok(Self { catalog, state })
    }

    /// Resume a match from a snapshot.
    #[must_use]
    pub fn restore(catalog: Arc<Catalog>, state: GameState) -> Self {
        Self { catalog, state }
    }

    /// Current game record.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The catalog this match plays with.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Take the game record out of the engine.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.state.current()
    }

    /// Look up a seated player.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.state.player(id)
    }

    /// Built landmarks that count toward victory.
    #[must_use]
    pub fn built_landmark_count(&self, id: &PlayerId) -> usize {
        self.state
            .player(id)
            .map_or(0, |p| count_victory_landmarks(p, &self.catalog))
    }

    /// How the match ended, once it has.
    #[must_use]
    pub fn result(&self) -> Option<MatchResult> {
        if !self.state.is_over() {
            return None;
        }
        Some(match &self.state.winner {
            Some(id) => MatchResult::Winner(id.clone()),
            None => MatchResult::Abandoned,
        })
    }

    // === Command surface ===

    /// Dispatch a player command.
    pub fn apply(&mut self, player: &PlayerId, command: &Command) -> Result<Outcome, GameError> {
        let result = match command {
            Command::StartMatch => {
                if self.state.player(player).is_none() {
                    Err(GameError::UnknownPlayer(player.to_string()))
                } else {
                    self.start_match()
                }
            }
            Command::RollDice { num_dice } => self.roll_dice(player, *num_dice),
            Command::RerollDice => self.reroll_dice(player),
            Command::BuyEstablishment { card_id, band } => self.buy_establishment(player, card_id, *band),
            Command::BuildLandmark { landmark_id } => self.build_landmark(player, landmark_id),
            Command::PassTurn => self.pass_turn(player),
        };

        match &result {
            Ok(outcome) => debug!(
                player = %player,
                command = command.name(),
                phase = %self.state.phase,
                ?outcome,
                "command accepted"
            ),
            Err(err) => debug!(player = %player, command = command.name(), error = %err, "command rejected"),
        }
        result
    }

    /// Seat a player. Re-joining with a seated id succeeds without changes.
    pub fn add_player(&mut self, join: JoinRequest) -> Result<Outcome, GameError> {
        let id = join.id.clone();
        let rejoined = seat_player(&mut self.state, &self.catalog, join)?;

        let started = !rejoined
            && self.state.config.auto_start
            && self.state.phase == TurnPhase::WaitingForPlayers
            && self.state.players.len() >= self.state.config.min_players;
        if started {
            begin_match(&mut self.state)?;
        }

        debug!(player = %id, rejoined, started, "player joined");
        Ok(Outcome::Joined { rejoined, started })
    }

    /// Remove a player. Privileged: not a normal player command.
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Outcome, GameError> {
        unseat_player(&mut self.state, id)?;
        debug!(player = %id, phase = %self.state.phase, "player removed");
        Ok(Outcome::Removed)
    }

    /// Leave the waiting room: fix seating order and start the first turn.
    pub fn start_match(&mut self) -> Result<Outcome, GameError> {
        let order = begin_match(&mut self.state)?;
        Ok(Outcome::Started { order })
    }

    /// Roll with the match RNG.
    pub fn roll_dice(&mut self, player: &PlayerId, num_dice: u8) -> Result<Outcome, GameError> {
        self.check_roll(player, num_dice)?;
        let dice: SmallVec<[u8; 2]> = (0..num_dice).map(|_| self.state.rng_mut().roll_die()).collect();
        Ok(self.resolve_roll(player, dice))
    }

    /// Roll with caller-supplied dice (a physical table, a replay, a test).
    pub fn roll_dice_from<D: DiceSource + ?Sized>(
        &mut self,
        player: &PlayerId,
        num_dice: u8,
        source: &mut D,
    ) -> Result<Outcome, GameError> {
        self.check_roll(player, num_dice)?;
        let dice: SmallVec<[u8; 2]> = (0..num_dice).map(|_| source.roll_die()).collect();
        if let Some(&bad) = dice.iter().find(|&&face| !(1..=DIE_FACES).contains(&face)) {
            return Err(GameError::InvalidDieFace(bad));
        }
        Ok(self.resolve_roll(player, dice))
    }

    /// Discard the current roll and go back to the roll phase (Radio Tower).
    pub fn reroll_dice(&mut self, player: &PlayerId) -> Result<Outcome, GameError> {
        self.require_turn(player, TurnPhase::Build)?;
        let roller = self.seated(player)?;
        if !roller.can_reroll() {
            return Err(GameError::RerollUnavailable);
        }
        let name = roller.display_name.clone();

        if let Some(p) = self.state.player_mut(player) {
            p.has_used_reroll_this_turn = true;
        }
        self.state.phase = TurnPhase::Roll;
        self.state.clear_dice();
        self.state.log(format!("{name} chose to reroll their dice."));
        Ok(Outcome::Rerolled)
    }

    /// Buy an establishment from a market row, ending the build phase.
    pub fn buy_establishment(&mut self, player: &PlayerId, card_id: &CardId, band: Band) -> Result<Outcome, GameError> {
        self.require_turn(player, TurnPhase::Build)?;
        let catalog = Arc::clone(&self.catalog);
        let card = catalog
            .establishment(card_id)
            .ok_or_else(|| GameError::UnknownCard(card_id.to_string()))?;

        self.state.market.check_available(band, card)?;
        let buyer = self.seated(player)?;
        if buyer.coins < card.cost {
            return Err(GameError::InsufficientCoins {
                name: card.name.clone(),
                cost: card.cost,
                coins: buyer.coins,
            });
        }

        self.state.market.purchase(band, card)?;
        let Some(buyer) = self.state.player_mut(player) else {
            return Err(roster_inconsistent(&mut self.state));
        };
        buyer.debit_clamped(card.cost);
        buyer.add_establishment(&card.id);
        let name = buyer.display_name.clone();
        self.state.log(format!("{name} bought {}.", card.name));

        advance_turn(&mut self.state)?;
        Ok(Outcome::Bought {
            card_id: card.id.clone(),
        })
    }

    /// Build one of the player's landmarks. Reaching the victory threshold
    /// ends the match instead of advancing the turn.
    pub fn build_landmark(&mut self, player: &PlayerId, landmark_id: &LandmarkId) -> Result<Outcome, GameError> {
        self.require_turn(player, TurnPhase::Build)?;
        let catalog = Arc::clone(&self.catalog);
        let landmark = catalog
            .landmark(landmark_id)
            .ok_or_else(|| GameError::UnknownLandmark(landmark_id.to_string()))?;

        let builder = self.seated(player)?;
        let status = builder
            .landmark(landmark_id)
            .ok_or_else(|| GameError::LandmarkNotAssigned(landmark.name.clone()))?;
        if status.built {
            return Err(GameError::AlreadyBuilt(landmark.name.clone()));
        }
        if builder.coins < landmark.cost {
            return Err(GameError::InsufficientCoins {
                name: landmark.name.clone(),
                cost: landmark.cost,
                coins: builder.coins,
            });
        }

        let Some(builder) = self.state.player_mut(player) else {
            return Err(roster_inconsistent(&mut self.state));
        };
        builder.debit_clamped(landmark.cost);
        builder.mark_built(landmark_id);
        builder.grant_ability(landmark.ability);
        let name = builder.display_name.clone();
        let built = count_victory_landmarks(builder, &catalog);

        self.state.log(format!("{name} built {}.", landmark.name));
        if let LandmarkAbility::CoinBonus(bonus) = landmark.ability {
            self.state
                .log(format!("{name} gained {bonus} coins from building {}.", landmark.name));
        }

        let threshold = self.state.config.victory_landmarks;
        if built >= threshold {
            self.state.winner = Some(player.clone());
            self.state.phase = TurnPhase::GameOver;
            self.state
                .log(format!("{name} has built {threshold} major landmarks and wins the game!"));
            info!(match_id = %self.state.match_id, winner = %player, "match won");
            return Ok(Outcome::Built {
                landmark_id: landmark_id.clone(),
                won: true,
            });
        }

        advance_turn(&mut self.state)?;
        Ok(Outcome::Built {
            landmark_id: landmark_id.clone(),
            won: false,
        })
    }

    /// End the build phase without buying.
    pub fn pass_turn(&mut self, player: &PlayerId) -> Result<Outcome, GameError> {
        self.require_turn(player, TurnPhase::Build)?;
        let name = self.seated(player)?.display_name.clone();
        self.state.log(format!("{name} passed their build phase."));
        advance_turn(&mut self.state)?;
        Ok(Outcome::Passed)
    }

    /// Every command `player` could issue right now that would be accepted.
    #[must_use]
    pub fn legal_commands(&self, player: &PlayerId) -> Vec<Command> {
        let state = &self.state;
        let Some(me) = state.player(player) else {
            return Vec::new();
        };

        match state.phase {
            TurnPhase::GameOver => Vec::new(),
            TurnPhase::WaitingForPlayers => {
                if state.players.len() >= state.config.min_players {
                    vec![Command::StartMatch]
                } else {
                    Vec::new()
                }
            }
            _ if state.current_player.as_ref() != Some(player) => Vec::new(),
            TurnPhase::Roll => {
                let mut commands = vec![Command::RollDice { num_dice: 1 }];
                if me.can_roll_two_dice {
                    commands.push(Command::RollDice { num_dice: 2 });
                }
                commands
            }
            TurnPhase::Build => {
                let mut commands = vec![Command::PassTurn];
                if me.can_reroll() {
                    commands.push(Command::RerollDice);
                }
                for band in Band::ALL {
                    for card_id in state.market.row(band) {
                        let affordable = self.catalog.establishment(card_id).is_some_and(|c| c.cost <= me.coins);
                        if affordable && state.market.supply(card_id) > 0 {
                            commands.push(Command::BuyEstablishment {
                                card_id: card_id.clone(),
                                band,
                            });
                        }
                    }
                }
                for status in me.landmarks.iter().filter(|l| !l.built) {
                    if self.catalog.landmark(&status.id).is_some_and(|l| l.cost <= me.coins) {
                        commands.push(Command::BuildLandmark {
                            landmark_id: status.id.clone(),
                        });
                    }
                }
                commands
            }
        }
    }

    // === Internals ===

    /// Shared validation: match running, requester holds the turn, phase matches.
    fn require_turn(&mut self, player: &PlayerId, phase: TurnPhase) -> Result<(), GameError> {
        match self.state.phase {
            TurnPhase::GameOver => return Err(GameError::GameOver),
            TurnPhase::WaitingForPlayers => {
                return Err(GameError::WrongPhase {
                    expected: phase,
                    actual: TurnPhase::WaitingForPlayers,
                })
            }
            TurnPhase::Roll | TurnPhase::Build => {}
        }
        if self.state.current_player.as_ref() != Some(player) {
            if self.state.player(player).is_none() {
                return Err(GameError::UnknownPlayer(player.to_string()));
            }
            return Err(GameError::NotYourTurn);
        }
        if self.state.player(player).is_none() {
            return Err(roster_inconsistent(&mut self.state));
        }
        if self.state.phase != phase {
            return Err(GameError::WrongPhase {
                expected: phase,
                actual: self.state.phase,
            });
        }
        Ok(())
    }

    fn seated(&self, player: &PlayerId) -> Result<&Player, GameError> {
        self.state
            .player(player)
            .ok_or_else(|| GameError::UnknownPlayer(player.to_string()))
    }

    fn check_roll(&mut self, player: &PlayerId, num_dice: u8) -> Result<(), GameError> {
        self.require_turn(player, TurnPhase::Roll)?;
        match num_dice {
            1 => Ok(()),
            2 if self.seated(player)?.can_roll_two_dice => Ok(()),
            2 => Err(GameError::TwoDiceLocked),
            n => Err(GameError::InvalidDiceCount(n)),
        }
    }

    /// Record the roll, pay income, and enter the build phase.
    fn resolve_roll(&mut self, player: &PlayerId, dice: SmallVec<[u8; 2]>) -> Outcome {
        let sum: u8 = dice.iter().sum();
        let faces: Vec<String> = dice.iter().map(u8::to_string).collect();
        let name = self.state.name_of(player);
        if dice.len() > 1 {
            self.state
                .log(format!("{name} rolled {} = {sum}.", faces.join(" + ")));
        } else {
            self.state.log(format!("{name} rolled {sum}."));
        }

        self.state.last_roll = Some(dice.clone());
        self.state.dice_sum = sum;
        self.state.extra_turn_taken = false;

        let paid = resolve_income(&mut self.state, &self.catalog, player, sum);
        let rescued = city_hall_bonus(&mut self.state, player);
        if !paid && !rescued {
            self.state.log(NO_INCOME);
        }
        self.state.phase = TurnPhase::Build;

        Outcome::Rolled { dice, sum }
    }
}

fn count_victory_landmarks(player: &Player, catalog: &Catalog) -> usize {
    player
        .landmarks
        .iter()
        .filter(|l| l.built)
        .filter(|l| catalog.landmark(&l.id).is_some_and(|def| !def.is_starting()))
        .count()
}

/// Reject configurations this catalog cannot support.
fn check_config(config: &MatchConfig, catalog: &Catalog) -> Result<(), ConfigError> {
    config.validate()?;

    for holding in &config.starting_holdings {
        if catalog.establishment(&holding.card).is_none() {
            return Err(ConfigError::Invalid(format!(
                "starting holding {} is not in the catalog",
                holding.card
            )));
        }
    }

    let buildable = catalog.landmarks().filter(|l| !l.is_starting()).count();
    let per_player = match config.landmark_mode {
        LandmarkMode::FullSet => buildable,
        LandmarkMode::RandomSubset { count } => {
            if count > buildable {
                return Err(ConfigError::Invalid(format!(
                    "cannot assign {count} landmarks, the catalog has {buildable} buildable"
                )));
            }
            count
        }
    };
    if per_player < config.victory_landmarks {
        return Err(ConfigError::Invalid(format!(
            "victory needs {} landmarks but players only get {per_player}",
            config.victory_landmarks
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoadedDice;

    fn engine(config: MatchConfig, ids: &[&str]) -> TurnEngine {
        let mut engine = TurnEngine::new("test", Catalog::shared(), config, 42).unwrap();
        for id in ids {
            engine.add_player(JoinRequest::new(*id, id.to_uppercase())).unwrap();
        }
        engine
    }

    fn started(ids: &[&str]) -> TurnEngine {
        let mut engine = engine(MatchConfig::tower(), ids);
        engine.start_match().unwrap();
        engine
    }

    fn id(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    #[test]
    fn test_config_checked_against_catalog() {
        let bad = MatchConfig::tower().with_landmark_mode(LandmarkMode::RandomSubset { count: 12 });
        assert!(TurnEngine::new("x", Catalog::shared(), bad, 1).is_err());

        let mut wide = MatchConfig::tower();
        wide.market_width = 8;
        assert!(TurnEngine::new("x", Catalog::shared(), wide, 1).is_err());

        let mut unknown = MatchConfig::tower();
        unknown.starting_holdings[0].card = CardId::new("casino");
        assert!(TurnEngine::new("x", Catalog::shared(), unknown, 1).is_err());
    }

    #[test]
    fn test_auto_start() {
        let mut engine = engine(MatchConfig::classic(), &["a"]);
        assert_eq!(engine.state().phase, TurnPhase::WaitingForPlayers);

        let outcome = engine.add_player(JoinRequest::new("b", "B")).unwrap();
        assert_eq!(
            outcome,
            Outcome::Joined {
                rejoined: false,
                started: true
            }
        );
        assert_eq!(engine.state().phase, TurnPhase::Roll);
    }

    #[test]
    fn test_start_requires_seated_requester() {
        let mut engine = engine(MatchConfig::tower(), &["a", "b"]);
        assert_eq!(
            engine.apply(&id("z"), &Command::StartMatch),
            Err(GameError::UnknownPlayer("z".into()))
        );
        assert!(engine.apply(&id("b"), &Command::StartMatch).is_ok());
    }

    #[test]
    fn test_validation_order() {
        let mut engine = started(&["a", "b"]);
        let before = engine.state().clone();

        assert_eq!(engine.roll_dice(&id("b"), 1), Err(GameError::NotYourTurn));
        assert_eq!(engine.pass_turn(&id("a")).unwrap_err().kind(), crate::core::ErrorKind::WrongTurn);
        assert_eq!(engine.roll_dice(&id("a"), 2), Err(GameError::TwoDiceLocked));
        assert_eq!(engine.roll_dice(&id("a"), 3), Err(GameError::InvalidDiceCount(3)));
        assert_eq!(engine.roll_dice(&id("zz"), 1), Err(GameError::UnknownPlayer("zz".into())));

        assert_eq!(engine.state().game_log, before.game_log);
        assert_eq!(engine.state().rng().state(), before.rng().state());
    }

    #[test]
    fn test_roll_then_pass() {
        let mut engine = started(&["a", "b"]);
        let mut dice = LoadedDice::new([5]);

        let outcome = engine.roll_dice_from(&id("a"), 1, &mut dice).unwrap();
        assert_eq!(outcome, Outcome::Rolled { dice: SmallVec::from_slice(&[5]), sum: 5 });
        assert_eq!(engine.state().phase, TurnPhase::Build);
        assert_eq!(engine.state().dice_sum, 5);

        engine.pass_turn(&id("a")).unwrap();
        assert_eq!(engine.current_player().map(|p| p.id.clone()), Some(id("b")));
        assert!(engine.state().last_roll.is_none());
    }

    #[test]
    fn test_bad_die_face_rejected() {
        let mut engine = started(&["a", "b"]);
        let mut dice = LoadedDice::new([7]);
        assert_eq!(engine.roll_dice_from(&id("a"), 1, &mut dice), Err(GameError::InvalidDieFace(7)));
        assert_eq!(engine.state().phase, TurnPhase::Roll);
    }

    #[test]
    fn test_reroll_once_per_turn() {
        let mut engine = started(&["a", "b"]);
        engine.state.player_mut(&id("a")).unwrap().can_reroll_once = true;

        engine.roll_dice_from(&id("a"), 1, &mut LoadedDice::new([1])).unwrap();
        assert_eq!(engine.reroll_dice(&id("a")), Ok(Outcome::Rerolled));
        assert_eq!(engine.state().phase, TurnPhase::Roll);
        assert!(engine.state().last_roll.is_none());

        engine.roll_dice_from(&id("a"), 1, &mut LoadedDice::new([1])).unwrap();
        assert_eq!(engine.reroll_dice(&id("a")), Err(GameError::RerollUnavailable));
    }

    #[test]
    fn test_buy_rejections_leave_state() {
        let mut engine = started(&["a", "b"]);
        engine.roll_dice_from(&id("a"), 1, &mut LoadedDice::new([6])).unwrap();
        let before = engine.state().clone();

        assert_eq!(
            engine.buy_establishment(&id("a"), &CardId::new("casino"), Band::Low),
            Err(GameError::UnknownCard("casino".into()))
        );
        let err = engine
            .buy_establishment(&id("a"), &CardId::new("mine"), Band::Low)
            .unwrap_err();
        assert!(matches!(err, GameError::NotInMarket { .. }));

        assert_eq!(engine.state().market, before.market);
        assert_eq!(engine.state().players, before.players);
    }

    #[test]
    fn test_build_landmark_errors() {
        let mut engine = started(&["a", "b"]);
        engine.roll_dice_from(&id("a"), 1, &mut LoadedDice::new([6])).unwrap();

        let assigned = engine.player(&id("a")).unwrap().landmarks[0].id.clone();
        let foreign = engine.player(&id("b")).unwrap().landmarks[0].id.clone();

        assert!(matches!(
            engine.build_landmark(&id("a"), &LandmarkId::new("castle")),
            Err(GameError::UnknownLandmark(_))
        ));
        assert!(matches!(
            engine.build_landmark(&id("a"), &foreign),
            Err(GameError::LandmarkNotAssigned(_))
        ));

        engine.state.player_mut(&id("a")).unwrap().coins = 0;
        assert!(matches!(
            engine.build_landmark(&id("a"), &assigned),
            Err(GameError::InsufficientCoins { coins: 0, .. })
        ));
    }

    #[test]
    fn test_win_ends_match() {
        let mut engine = started(&["a", "b"]);
        let assigned: Vec<_> = engine.player(&id("a")).unwrap().landmarks.iter().map(|l| l.id.clone()).collect();
        engine.state.player_mut(&id("a")).unwrap().coins = 200;

        for (i, landmark) in assigned.iter().enumerate() {
            engine.roll_dice_from(&id("a"), 1, &mut LoadedDice::new([6])).unwrap();
            let outcome = engine.build_landmark(&id("a"), landmark).unwrap();
            let won = i + 1 == assigned.len();
            assert_eq!(
                outcome,
                Outcome::Built {
                    landmark_id: landmark.clone(),
                    won
                }
            );
            if !won {
                engine.roll_dice_from(&id("b"), 1, &mut LoadedDice::new([6])).unwrap();
                engine.pass_turn(&id("b")).unwrap();
            }
        }

        assert_eq!(engine.result(), Some(MatchResult::Winner(id("a"))));
        assert_eq!(engine.built_landmark_count(&id("a")), 3);
        assert_eq!(engine.pass_turn(&id("a")), Err(GameError::GameOver));
        assert!(engine.legal_commands(&id("a")).is_empty());
    }

    #[test]
    fn test_legal_commands_are_accepted() {
        let mut engine = started(&["a", "b"]);
        assert_eq!(engine.legal_commands(&id("a")), vec![Command::RollDice { num_dice: 1 }]);
        assert!(engine.legal_commands(&id("b")).is_empty());

        engine.roll_dice_from(&id("a"), 1, &mut LoadedDice::new([6])).unwrap();
        let legal = engine.legal_commands(&id("a"));
        assert_eq!(legal[0], Command::PassTurn);

        for command in legal {
            let mut probe = engine.clone();
            assert!(probe.apply(&id("a"), &command).is_ok(), "{command:?} was rejected");
        }
    }

    #[test]
    fn test_missing_current_player_is_fatal() {
        let mut engine = started(&["a", "b"]);
        engine.state.players.retain(|p| p.id != id("a"));

        assert_eq!(engine.roll_dice(&id("a"), 1), Err(GameError::RosterInconsistent));
        assert_eq!(engine.result(), Some(MatchResult::Abandoned));
    }
}
