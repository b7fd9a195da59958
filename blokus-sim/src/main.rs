//! Blokus Self-Play Simulator
//!
//! Plays complete games with a random legal-move policy and prints aggregate
//! statistics. Every move goes through the public engine API, so a long run doubles
//! as a soak test of the rules.
//!
//! ```text
//! selfplay [--games N] [--seed S] [--config game.json] [--show-final]
//! ```

mod runner;
mod stats;

use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blokus_core::{Engine, GameConfig, Outcome, PlayerId};

use crate::stats::SimStats;

#[derive(Debug, PartialEq)]
struct Args {
    games: u64,
    seed: Option<u64>,
    config: Option<PathBuf>,
    show_final: bool,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            games: 100,
            seed: None,
            config: None,
            show_final: false,
        }
    }
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--games" => {
                let value = iter.next().context("--games needs a value")?;
                parsed.games = value.parse().with_context(|| format!("bad --games value {value:?}"))?;
            }
            "--seed" => {
                let value = iter.next().context("--seed needs a value")?;
                parsed.seed = Some(value.parse().with_context(|| format!("bad --seed value {value:?}"))?);
            }
            "--config" => {
                let value = iter.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--show-final" => parsed.show_final = true,
            other => bail!("unknown argument {other:?}"),
        }
    }
    Ok(parsed)
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: GameConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&args)?;
    let config = load_config(args.config.as_ref())?;
    let engine = Engine::with_config(config)?;
    let seed = args.seed.unwrap_or_else(rand::random);

    println!("Blokus Self-Play");
    println!("================");
    println!("Board: {0}x{0}", config.board_size);
    println!("Games: {}", args.games);
    println!("Seed: {}", seed);
    println!();

    // Set up SIGINT handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\n\nInterrupt received, finishing current game...");
        r.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    let players = [PlayerId(1), PlayerId(2)];
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = SimStats::new();
    let mut last = None;
    let start = Instant::now();

    for game in 0..args.games {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let summary = runner::play_game(&engine, players, &mut rng)?;
        stats.record(&summary);
        info!(game, moves = summary.moves, outcome = ?summary.result.outcome, "game finished");
        last = Some(summary);
    }

    println!("\n================");
    println!("Run complete!");
    println!("================");
    println!("Time: {:.2}s", start.elapsed().as_secs_f64());
    println!();
    stats.print_summary();

    if args.show_final {
        if let Some(game) = last {
            println!("\nFinal board of last game ({} moves):", game.moves);
            println!("{}", runner::render(&game.board, game.players));
            for score in &game.result.scores {
                println!(
                    "  {:?}: score {} (remaining {} cells, bonus {})",
                    score.seat, score.score, score.remaining_cells, score.bonus
                );
            }
            match game.result.outcome {
                Outcome::Winner(id) => println!("Winner: {}", id),
                Outcome::Tie => println!("Tie"),
            }
        }
    }

    if !running.load(Ordering::SeqCst) {
        println!("\nRun was interrupted after {} games.", stats.games);
    }
    Ok(())
}
