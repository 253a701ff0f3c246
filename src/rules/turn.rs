//! Roster changes, match start and turn advancement.

use rustc_hash::FxHashSet;
use tracing::{info, warn};

use crate::cards::{Catalog, LandmarkId};
use crate::core::{
    GameError, GameState, JoinRequest, LandmarkMode, LandmarkStatus, Player, PlayerId, TurnOrder, TurnPhase,
};

/// Seat a player. Returns true if the id was already seated.
pub(crate) fn seat_player(state: &mut GameState, catalog: &Catalog, join: JoinRequest) -> Result<bool, GameError> {
    if state.player(&join.id).is_some() {
        return Ok(true);
    }
    match state.phase {
        TurnPhase::WaitingForPlayers => {}
        TurnPhase::GameOver => return Err(GameError::GameOver),
        TurnPhase::Roll | TurnPhase::Build => return Err(GameError::AlreadyStarted),
    }
    if state.players.len() >= state.config.max_players {
        return Err(GameError::MatchFull);
    }

    let landmarks = landmarks_for(state, catalog, &join.id);
    let mut player = Player::new(
        join.id,
        join.display_name,
        join.avatar,
        state.config.starting_coins,
        landmarks,
    );

    for holding in &state.config.starting_holdings {
        if catalog.establishment(&holding.card).is_none() {
            continue;
        }
        for _ in 0..holding.count {
            player.add_establishment(&holding.card);
        }
    }

    // Starting landmarks come pre-built; apply their hooks now.
    let prebuilt: Vec<_> = player
        .landmarks
        .iter()
        .filter(|l| l.built)
        .filter_map(|l| catalog.landmark(&l.id))
        .map(|def| def.ability)
        .collect();
    for ability in prebuilt {
        player.grant_ability(ability);
    }

    state.log(format!("{} joined the game.", player.display_name));
    state.players.push(player);
    Ok(false)
}

/// Landmarks a joining player may build.
fn landmarks_for(state: &mut GameState, catalog: &Catalog, id: &PlayerId) -> Vec<LandmarkStatus> {
    let ids = match state.config.landmark_mode {
        LandmarkMode::FullSet => catalog.landmarks().map(|l| l.id.clone()).collect(),
        LandmarkMode::RandomSubset { count } => {
            if let Some(existing) = state.assigned_landmarks(id) {
                existing.to_vec()
            } else {
                let drawn = draw_landmarks(state, catalog, count);
                state.assign_landmarks(id.clone(), drawn.clone());
                drawn
            }
        }
    };

    ids.iter()
        .filter_map(|lid| catalog.landmark(lid))
        .map(LandmarkStatus::for_definition)
        .collect()
}

/// Draw `count` buildable landmarks, avoiding ones already handed out
/// while enough remain.
fn draw_landmarks(state: &mut GameState, catalog: &Catalog, count: usize) -> Vec<LandmarkId> {
    let taken: FxHashSet<LandmarkId> = state.all_assigned_landmarks().cloned().collect();
    let buildable: Vec<LandmarkId> = catalog
        .landmarks()
        .filter(|l| !l.is_starting())
        .map(|l| l.id.clone())
        .collect();
    let free: Vec<LandmarkId> = buildable.iter().filter(|id| !taken.contains(*id)).cloned().collect();

    let mut pool = if free.len() >= count { free } else { buildable };
    state.rng_mut().shuffle(&mut pool);
    pool.truncate(count);
    pool
}

/// Remove a player from the roster and the turn order.
pub(crate) fn unseat_player(state: &mut GameState, id: &PlayerId) -> Result<(), GameError> {
    let Some(pos) = state.players.iter().position(|p| &p.id == id) else {
        return Err(GameError::UnknownPlayer(id.to_string()));
    };
    let removed = state.players.remove(pos);
    state.log(format!("{} left the game.", removed.display_name));

    let order_pos = state.player_order.iter().position(|p| p == id);
    if let Some(i) = order_pos {
        state.player_order.remove(i);
    }

    if !matches!(state.phase, TurnPhase::Roll | TurnPhase::Build) {
        return Ok(());
    }

    if state.players.len() < state.config.min_players || state.player_order.is_empty() {
        warn!(match_id = %state.match_id, remaining = state.players.len(), "too few players remain");
        state.abandon("Not enough players remain. Game over.");
        return Ok(());
    }

    if state.current_player.as_ref() == Some(id) {
        // The next seat slides into the removed player's index.
        let next = order_pos.map_or(0, |i| i % state.player_order.len());
        let next_id = state.player_order[next].clone();
        start_turn(state, &next_id);
        let name = state.name_of(&next_id);
        state.log(format!("Current player left. It's now {name}'s turn."));
    }
    Ok(())
}

/// Fix seating order and hand the first turn out.
pub(crate) fn begin_match(state: &mut GameState) -> Result<Vec<PlayerId>, GameError> {
    match state.phase {
        TurnPhase::WaitingForPlayers => {}
        TurnPhase::GameOver => return Err(GameError::GameOver),
        TurnPhase::Roll | TurnPhase::Build => return Err(GameError::AlreadyStarted),
    }
    let seated = state.players.len();
    if seated < state.config.min_players {
        return Err(GameError::NotEnoughPlayers {
            min: state.config.min_players,
            seated,
        });
    }

    let mut order: Vec<PlayerId> = state.players.iter().map(|p| p.id.clone()).collect();
    if state.config.turn_order == TurnOrder::Shuffled {
        state.rng_mut().shuffle(&mut order);
    }
    state.player_order = order.clone();

    let names: Vec<String> = order.iter().map(|id| state.name_of(id)).collect();
    state.log(format!("Game started! Player order: {}.", names.join(", ")));

    let first = order[0].clone();
    start_turn(state, &first);
    let name = state.name_of(&first);
    state.log(format!("It's {name}'s turn to roll."));

    info!(match_id = %state.match_id, players = seated, first = %first, "match started");
    Ok(order)
}

/// End the current build phase: grant a doubles bonus turn or pass play on.
pub(crate) fn advance_turn(state: &mut GameState) -> Result<(), GameError> {
    let Some(current_id) = state.current_player.clone() else {
        return Err(roster_inconsistent(state));
    };
    let Some(current) = state.player(&current_id) else {
        return Err(roster_inconsistent(state));
    };

    let bonus = current.can_take_extra_turn_on_doubles && state.rolled_doubles() && !state.extra_turn_taken;
    if bonus {
        let name = current.display_name.clone();
        state.extra_turn_taken = true;
        state.phase = TurnPhase::Roll;
        state.clear_dice();
        if let Some(p) = state.player_mut(&current_id) {
            p.has_used_reroll_this_turn = false;
        }
        state.log(format!("{name} rolled doubles and gets an extra turn!"));
        return Ok(());
    }

    let Some(idx) = state.player_order.iter().position(|id| id == &current_id) else {
        return Err(roster_inconsistent(state));
    };
    let next_id = state.player_order[(idx + 1) % state.player_order.len()].clone();
    start_turn(state, &next_id);
    let name = state.name_of(&next_id);
    state.log(format!("It's {name}'s turn."));
    Ok(())
}

/// Hand the turn to `id` with a clean slate.
fn start_turn(state: &mut GameState, id: &PlayerId) {
    state.current_player = Some(id.clone());
    state.phase = TurnPhase::Roll;
    state.clear_dice();
    state.extra_turn_taken = false;
    if let Some(p) = state.player_mut(id) {
        p.has_used_reroll_this_turn = false;
    }
}

/// Last-resort recovery when the turn points at nobody.
pub(crate) fn roster_inconsistent(state: &mut GameState) -> GameError {
    warn!(
        match_id = %state.match_id,
        current = ?state.current_player,
        "current player missing from roster, ending match"
    );
    state.abandon("Error advancing turn: no valid current player. Game over.");
    GameError::RosterInconsistent
}
