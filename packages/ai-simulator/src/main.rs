//! AI simulator CLI: headless single-player sessions for tuning the bots.
//!
//! Every game runs through the engine's validated session flow with all
//! delays disabled. The human seat is played by a heuristic stand-in.

mod metrics;
mod output;
mod simulator;
mod types;

use std::error::Error;
use std::time::{Duration, Instant};

use clap::Parser;
use engine::ai::AiConfig;
use engine::domain::{MAX_PLAYERS, MIN_PLAYERS};
use metrics::build_game_metrics;
use output::OutputWriter;
use simulator::{GameResult, Simulator};
use tracing::{info, warn};
use types::{DifficultyArg, OutputFormat};

#[derive(Parser)]
#[command(name = "ai-simulator")]
#[command(about = "Headless single-player game simulator for bot tuning")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Seats at the table, including the human stand-in
    #[arg(short, long, default_value = "4")]
    players: usize,

    /// Difficulty for every bot seat
    #[arg(long, default_value = "normal")]
    difficulty: DifficultyArg,

    /// Base session seed; game N uses seed + N - 1. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON overrides for the stand-in policy, e.g. '{"difficulty":"hard"}'
    #[arg(long)]
    ai_config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress the JSONL output
    #[arg(long)]
    compress: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    if args.json_logs {
        engine::init_tracing_with(filter);
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&args.players) {
        return Err(format!(
            "--players must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {}",
            args.players
        )
        .into());
    }

    let ai_config = match &args.ai_config {
        Some(raw) => AiConfig::from_json(Some(&serde_json::from_str(raw)?)),
        None => AiConfig::default(),
    };
    let difficulty_name = format!("{:?}", args.difficulty).to_lowercase();
    let simulator = Simulator::new(args.players, args.difficulty.into(), ai_config);
    let base_seed = args.seed.unwrap_or_else(rand::random);

    if args.show_output {
        info!(
            games = args.games,
            players = args.players,
            difficulty = %difficulty_name,
            base_seed,
            "Starting simulation"
        );
    }

    let mut writer = OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        let seed = base_seed.wrapping_add(u64::from(game_num - 1));
        let game_start = Instant::now();

        match simulator.simulate_game(seed) {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics =
                    build_game_metrics(game_num, &difficulty_name, args.games, &result, duration_ms);
                if let Err(e) = writer.write_game(&metrics) {
                    warn!(game_num, error = %e, "Failed to write metrics");
                }
                if args.verbose {
                    info!(game_num, scores = ?metrics.result.final_scores, "Game completed");
                }
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!(game_num, seed, error = %e, "Game failed");
            }
        }
    }

    let elapsed = start.elapsed();
    let (jsonl_path, csv_path) = writer.output_paths();
    let (jsonl_path, csv_path) = (jsonl_path.cloned(), csv_path.clone());
    writer.finish()?;

    if args.show_output {
        if let Some(path) = jsonl_path {
            info!("Detailed results written to: {}", path.display());
        }
        info!("Summary CSV written to: {}", csv_path.display());
        print_summary(&results, errors, elapsed, args.games);
    }

    Ok(())
}

fn print_summary(results: &[GameResult], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    if results.is_empty() {
        return;
    }
    println!("Average time per game: {:?}", elapsed / results.len() as u32);

    let seats = results[0].state.seats.len();
    let mut wins = vec![0u32; seats];
    let mut totals = vec![0i64; seats];
    let mut best = vec![i32::MIN; seats];
    let mut worst = vec![i32::MAX; seats];

    for result in results {
        let scores = result.final_scores();
        let top = scores.iter().max().copied().unwrap_or(0);
        for (seat, &score) in scores.iter().enumerate() {
            totals[seat] += i64::from(score);
            best[seat] = best[seat].max(score);
            worst[seat] = worst[seat].min(score);
            if score == top {
                wins[seat] += 1;
            }
        }
    }

    println!("\n=== Results by Seat ===");
    let games = results.len() as f64;
    for seat in 0..seats {
        let label = if seat == 0 { "human" } else { "bot" };
        println!(
            "Seat {seat} ({label}): avg={:.1}, min={}, max={}, wins={} ({:.1}%)",
            totals[seat] as f64 / games,
            worst[seat],
            best[seat],
            wins[seat],
            f64::from(wins[seat]) / games * 100.0
        );
    }
}
