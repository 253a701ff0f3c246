//! Simulate CLI: play random-bot matches against the engine.
//!
//! Usage:
//!   cargo run --release --bin simulate -- --games 100 --players 4 --variant classic
//!   cargo run --release --bin simulate -- --config table.toml --seed 7 --show-log

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use dice_tower::{Catalog, Command, JoinRequest, MatchConfig, MatchResult, PlayerId, TurnEngine};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Variant {
    /// Every landmark, shuffled order, auto-start
    Classic,
    /// Three random landmarks each, host first
    Tower,
}

#[derive(Parser)]
#[command(name = "simulate", about = "Play random-bot dice tower matches")]
struct Cli {
    /// Number of matches to play
    #[arg(long, default_value = "1")]
    games: usize,

    /// Random seed (match n uses seed + n)
    #[arg(long, default_value = "42", env = "DICE_TOWER_SEED")]
    seed: u64,

    /// Players per match
    #[arg(long, default_value = "4")]
    players: usize,

    /// Rules preset, ignored when --config is given
    #[arg(long, value_enum, default_value = "tower")]
    variant: Variant,

    /// Path to a match config TOML
    #[arg(long, env = "DICE_TOWER_CONFIG")]
    config: Option<PathBuf>,

    /// Give up on a match after this many commands
    #[arg(long, default_value = "5000")]
    max_commands: usize,

    /// Print the game log of every match
    #[arg(long)]
    show_log: bool,
}

#[derive(Debug, Default)]
struct Summary {
    finished: usize,
    abandoned: usize,
    timed_out: usize,
    commands: usize,
    wins_by_seat: Vec<usize>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let source = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            MatchConfig::from_toml_str(&source)?
        }
        None => match cli.variant {
            Variant::Classic => MatchConfig::classic(),
            Variant::Tower => MatchConfig::tower(),
        },
    };
    // Auto-start tables would otherwise begin before every bot is seated.
    let min_players = if config.auto_start { cli.players } else { config.min_players };
    let max_players = config.max_players.max(cli.players);
    let config = config.with_players(min_players, max_players);

    let catalog = Catalog::shared();
    let mut summary = Summary {
        wins_by_seat: vec![0; cli.players],
        ..Summary::default()
    };

    for game in 0..cli.games {
        let seed = cli.seed.wrapping_add(game as u64);
        let mut engine = TurnEngine::new(format!("sim-{game}"), catalog.clone(), config.clone(), seed)?;
        let seats: Vec<PlayerId> = (0..cli.players).map(|i| PlayerId::new(format!("bot{i}"))).collect();

        for (i, id) in seats.iter().enumerate() {
            engine.add_player(JoinRequest {
                id: id.clone(),
                display_name: format!("Bot {}", i + 1),
                avatar: None,
            })?;
        }
        if !engine.state().is_over() && engine.state().player_order.is_empty() {
            engine.apply(&seats[0], &Command::StartMatch)?;
        }

        let mut bot_rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
        let played = play(&mut engine, &mut bot_rng, cli.max_commands);
        summary.commands += played;

        match engine.result() {
            Some(MatchResult::Winner(winner)) => {
                summary.finished += 1;
                if let Some(seat) = seats.iter().position(|id| id == &winner) {
                    summary.wins_by_seat[seat] += 1;
                }
                tracing::info!(game, seed, %winner, commands = played, "match finished");
            }
            Some(MatchResult::Abandoned) => {
                summary.abandoned += 1;
                tracing::warn!(game, seed, "match abandoned");
            }
            None => {
                summary.timed_out += 1;
                tracing::warn!(game, seed, commands = played, "match hit the command limit");
            }
        }

        if cli.show_log {
            for line in &engine.state().game_log {
                println!("{line}");
            }
            println!();
        }
    }

    println!(
        "{} games: {} won, {} abandoned, {} unfinished, {:.1} commands/game",
        cli.games,
        summary.finished,
        summary.abandoned,
        summary.timed_out,
        summary.commands as f64 / cli.games.max(1) as f64
    );
    for (seat, wins) in summary.wins_by_seat.iter().enumerate() {
        println!("  seat {}: {} wins", seat + 1, wins);
    }
    Ok(())
}

/// Drive the match with uniformly random legal commands. Landmark builds
/// are taken whenever offered so matches actually end.
fn play(engine: &mut TurnEngine, rng: &mut ChaCha8Rng, max_commands: usize) -> usize {
    let mut played = 0;
    while played < max_commands {
        let Some(current) = engine.current_player().map(|p| p.id.clone()) else {
            break;
        };
        let legal = engine.legal_commands(&current);
        let build = legal
            .iter()
            .find(|c| matches!(c, Command::BuildLandmark { .. }))
            .cloned();
        let Some(command) = build.or_else(|| legal.choose(rng).cloned()) else {
            break;
        };

        if let Err(err) = engine.apply(&current, &command) {
            tracing::error!(player = %current, ?command, %err, "legal command was rejected");
            break;
        }
        played += 1;
    }
    played
}
