//! Game simulator CLI - fast in-memory simulation with random bots.
//!
//! Runs complete games through the real engine (dealing, barrier, rotation,
//! scoring) without any transport, for sanity-checking rule changes and
//! eyeballing score distributions.

mod simulator;

use std::collections::HashMap;
use std::time::Instant;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use simulator::run_game;

#[derive(Parser)]
#[command(name = "game-simulator")]
#[command(about = "Fast in-memory simulator with randomly-selecting bots")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Players per game (2-5)
    #[arg(short, long, default_value = "4")]
    players: usize,

    /// Base seed for deterministic runs; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print each game's final ranking as a JSON line
    #[arg(long)]
    per_game: bool,
}

#[derive(Serialize)]
struct GameLine {
    game: u32,
    turns: u32,
    ranking: Vec<(String, i32)>,
}

#[derive(Serialize)]
struct Summary {
    games: u32,
    players: usize,
    elapsed_ms: u128,
    wins_by_seat: HashMap<String, u32>,
    mean_winning_score: f64,
}

fn main() {
    let args = Args::parse();
    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if !(2..=5).contains(&args.players) {
        eprintln!("players must be 2-5");
        std::process::exit(2);
    }

    let base_seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!(base_seed, games = args.games, "starting simulation");

    let mut wins_by_seat: HashMap<String, u32> = HashMap::new();
    let mut winning_scores: Vec<i32> = Vec::with_capacity(args.games as usize);
    let started = Instant::now();

    for game_no in 0..args.games {
        let game_seed = base_seed.wrapping_add(game_no as u64);
        let mut rng = StdRng::seed_from_u64(game_seed ^ 0x5EED);
        let result = run_game(args.players, game_seed, &mut rng);

        let winner = &result.scores.ranking[0];
        *wins_by_seat.entry(winner.name.clone()).or_default() += 1;
        winning_scores.push(winner.score);

        if args.per_game {
            let line = GameLine {
                game: game_no,
                turns: result.turns_played,
                ranking: result
                    .scores
                    .ranking
                    .iter()
                    .map(|r| (r.name.clone(), r.score))
                    .collect(),
            };
            println!("{}", serde_json::to_string(&line).expect("serializable"));
        }
    }

    let mean_winning_score =
        winning_scores.iter().map(|&s| s as f64).sum::<f64>() / winning_scores.len().max(1) as f64;
    let summary = Summary {
        games: args.games,
        players: args.players,
        elapsed_ms: started.elapsed().as_millis(),
        wins_by_seat,
        mean_winning_score,
    };
    println!("{}", serde_json::to_string_pretty(&summary).expect("serializable"));
}
