//! Match command - AI-vs-AI games from one scenario
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_setup(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use leaders_core::{
    character_by_name, AiConfig, AiOpponent, CharacterId, GameId, Player, Reserve, Scenario, VictoryType,
};

use crate::scenario_cmd::load_scenario;
use crate::Level;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Scenario JSON file (built-in default when omitted)
    #[arg(long, value_name = "FILE")]
    pub scenario: Option<PathBuf>,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Strength of the First player's AI
    #[arg(long, value_enum, default_value = "easy")]
    pub first: Level,

    /// Strength of the Second player's AI (scenario setting when omitted)
    #[arg(long, value_enum)]
    pub second: Option<Level>,

    /// Recruitable characters, drawn in order by both players
    #[arg(long, value_delimiter = ',', default_value = "Vizier,Jailer,Assassin,Grappler")]
    pub reserve: Vec<String>,

    /// Maximum turns per game
    #[arg(long, default_value = "60")]
    pub max_turns: u32,

    /// Play games on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, PartialEq)]
struct GameRecord {
    game_number: usize,
    winner: Option<Player>,
    victory_type: Option<VictoryType>,
    turns: u32,
    actions: usize,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    first_wins: usize,
    second_wins: usize,
    unfinished: usize,
    avg_turns: f32,
}

/// Everything a game needs besides its seed
struct MatchSetup {
    scenario: Scenario,
    reserve: Vec<CharacterId>,
    first: AiConfig,
    second: AiConfig,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Load the scenario and reserve
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let setup = load_setup(&args)?;

    tracing::info!(
        "Starting match on {}: {:?} vs {:?} ({} games)",
        setup.scenario.name,
        setup.first.difficulty,
        setup.second.difficulty,
        args.games
    );

    let results = play_match(&setup, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_setup(args: &MatchArgs) -> Result<MatchSetup> {
    let scenario = load_scenario(args.scenario.as_deref())?;
    let reserve = parse_reserve(&args.reserve)?;

    let first = AiConfig {
        difficulty: args.first.into(),
        ..AiConfig::default()
    }
    .playing(Player::First);
    let second = AiConfig {
        difficulty: args
            .second
            .map(Into::into)
            .or(scenario.ai_difficulty)
            .unwrap_or_default(),
        ..AiConfig::default()
    }
    .playing(Player::Second);

    Ok(MatchSetup {
        scenario,
        reserve,
        first,
        second,
    })
}

/// Play all games in the match
fn play_match(setup: &MatchSetup, args: &MatchArgs, seed: Option<u64>) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let seeds: Vec<u64> = (0..args.games).map(|_| rng.gen()).collect();

    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(args.games as u64)
    };
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let play = |(i, game_seed): (usize, &u64)| -> Result<GameRecord> {
        let record = play_single_game(setup, i + 1, *game_seed, args.max_turns)?;
        progress.inc(1);
        Ok(record)
    };
    let games: Vec<GameRecord> = if args.parallel {
        seeds.par_iter().enumerate().map(play).collect::<Result<_>>()?
    } else {
        seeds.iter().enumerate().map(play).collect::<Result<_>>()?
    };
    progress.finish_and_clear();

    for record in &games {
        tracing::info!(
            "Game {}: {} ({} turns)",
            record.game_number,
            describe_outcome(record),
            record.turns
        );
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to a finish or the turn limit
fn play_single_game(setup: &MatchSetup, game_number: usize, seed: u64, max_turns: u32) -> Result<GameRecord> {
    let mut state = setup
        .scenario
        .to_game_state(GameId(game_number as u64))
        .with_context(|| format!("Invalid scenario: {}", setup.scenario.name))?;
    // Both seats already carry their resolved level in their configs
    state.turn.ai_difficulty = None;
    let mut reserve = Reserve::mirrored(setup.reserve.clone());
    let mut first = AiOpponent::new(setup.first.clone().with_seed(seed));
    let mut second = AiOpponent::new(setup.second.clone().with_seed(seed.wrapping_add(1)));

    let mut actions = 0;
    while !state.is_over() && state.turn.turn_number <= max_turns {
        let ai = match state.current_player() {
            Player::First => &mut first,
            Player::Second => &mut second,
        };
        let report = ai
            .play_turn(&mut state, &mut reserve)
            .with_context(|| format!("Game {} turn {}", game_number, state.turn.turn_number))?;
        actions += report.actions.len();
    }

    Ok(GameRecord {
        game_number,
        winner: state.winner,
        victory_type: state.check_victory().victory_type,
        turns: state.turn.turn_number,
        actions,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let first_wins = games.iter().filter(|g| g.winner == Some(Player::First)).count();
    let second_wins = games.iter().filter(|g| g.winner == Some(Player::Second)).count();
    let unfinished = games.iter().filter(|g| g.winner.is_none()).count();

    let total_turns: u32 = games.iter().map(|g| g.turns).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    MatchResults {
        games,
        first_wins,
        second_wins,
        unfinished,
        avg_turns,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn parse_reserve(names: &[String]) -> Result<Vec<CharacterId>> {
    names
        .iter()
        .filter(|n| !n.trim().is_empty())
        .map(|n| character_by_name(n.trim()).with_context(|| format!("Unknown character: {}", n)))
        .collect()
}

fn describe_outcome(record: &GameRecord) -> String {
    match (record.winner, record.victory_type) {
        (Some(winner), Some(kind)) => format!("{:?} wins by {:?}", winner, kind),
        (Some(winner), None) => format!("{:?} wins", winner),
        (None, _) => "unfinished".to_string(),
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: Option<Player>,
        victory_type: Option<VictoryType>,
        turns: u32,
        actions: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        first_wins: usize,
        second_wins: usize,
        unfinished: usize,
        avg_turns: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        first_wins: results.first_wins,
        second_wins: results.second_wins,
        unfinished: results.unfinished,
        avg_turns: results.avg_turns,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: g.winner,
                victory_type: g.victory_type,
                turns: g.turns,
                actions: g.actions,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games:  {}", total);
    println!("First wins:   {} ({:.1}%)", results.first_wins, percent(results.first_wins, total));
    println!("Second wins:  {} ({:.1}%)", results.second_wins, percent(results.second_wins, total));
    println!("Unfinished:   {} ({:.1}%)", results.unfinished, percent(results.unfinished, total));
    println!("Avg turns:    {:.1}", results.avg_turns);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} in {} turns, {} actions",
            game.game_number,
            describe_outcome(game),
            game.turns,
            game.actions
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
