use std::time::Instant;

use clap::Parser;
use ladders_rs::cli::StatisticsAccumulator;
use ladders_rs::game::{Game, GameConfig, today_utc};
use ladders_rs::types::PlayerId;
use ladders_rs::JumpLayout;

#[derive(Debug, Parser, Clone)]
#[command(name = "ladders-sim")]
#[command(about = "Snakes & Ladders simulator - play seeded games and report statistics")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// JSON game config; flags below override it
    #[arg(long)]
    config: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Jump layout: CLASSIC, RANDOM, or RANDOM:<ladders>:<snakes>
    #[arg(long)]
    layout: Option<String>,

    /// Rolls each player may make per day
    #[arg(long)]
    daily_cap: Option<u32>,

    /// Silence console output
    #[arg(long)]
    quiet: bool,

    /// Number of worker threads for parallel execution
    #[arg(long, default_value_t = 1)]
    workers: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::from_json_file(path).unwrap_or_else(|err| {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }),
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(cap) = args.daily_cap {
        config.daily_roll_cap = cap;
    }
    if let Some(layout) = &args.layout {
        config.jumps = layout.parse::<JumpLayout>().unwrap_or_else(|err| {
            eprintln!("Error: {err}. Use CLASSIC, RANDOM, or RANDOM:<ladders>:<snakes>");
            std::process::exit(1);
        });
    }
    // Simulated rolls must not eat into a real quota ledger.
    config.quota_ledger = None;

    let mut stats = StatisticsAccumulator::new();

    if args.workers > 1 {
        run_parallel_simulations(&args, &config, &mut stats);
    } else {
        run_sequential_simulations(&args, &config, &mut stats);
    }

    if !args.quiet {
        print_summary(&stats, &config);
    }
}

fn new_game(config: &GameConfig, game_idx: u64) -> Game {
    let config = GameConfig {
        seed: config.seed.wrapping_add(game_idx),
        ..config.clone()
    };
    Game::new(config).unwrap_or_else(|err| {
        eprintln!("Error: could not start game {}: {err}", game_idx + 1);
        std::process::exit(1);
    })
}

fn run_sequential_simulations(
    args: &Args,
    config: &GameConfig,
    stats: &mut StatisticsAccumulator,
) {
    for game_idx in 0..args.num {
        let start = Instant::now();
        let mut game = new_game(config, u64::from(game_idx));
        let result = game.play(today_utc());
        let duration = start.elapsed();

        stats.after(&game, result, duration);

        if !args.quiet {
            let last_n = 10;
            if game_idx < last_n || game_idx >= args.num.saturating_sub(last_n) {
                let winner_str = result
                    .winner
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "None".to_string());
                println!(
                    "Game {:>4}: Winner={:>8}, Rolls={:>4}, Days={:>3}, Duration={:?}",
                    game_idx + 1,
                    winner_str,
                    game.state.rolls,
                    result.days,
                    duration
                );
            } else if (game_idx + 1) % 100 == 0 {
                print!(".");
                use std::io::Write;
                let _ = std::io::stdout().flush();
            }
        }
    }
}

fn run_parallel_simulations(
    args: &Args,
    config: &GameConfig,
    stats: &mut StatisticsAccumulator,
) {
    use std::sync::Arc;
    use std::thread;

    let config = Arc::new(config.clone());
    let mut handles = Vec::new();
    let games_per_worker = args.num as usize / args.workers;
    let remainder = args.num as usize % args.workers;

    for worker_id in 0..args.workers {
        let config_clone = Arc::clone(&config);
        let num_games = if worker_id < remainder {
            games_per_worker + 1
        } else {
            games_per_worker
        };

        let handle = thread::spawn(move || {
            let mut local_stats = StatisticsAccumulator::new();
            let start_idx = worker_id * games_per_worker + worker_id.min(remainder);

            for local_idx in 0..num_games {
                let game_idx = (start_idx + local_idx) as u64;
                let start = Instant::now();
                let mut game = new_game(&config_clone, game_idx);
                let result = game.play(today_utc());
                local_stats.after(&game, result, start.elapsed());
            }

            local_stats
        });

        handles.push(handle);
    }

    for handle in handles {
        match handle.join() {
            Ok(worker_stats) => stats.stats.merge(worker_stats.stats),
            Err(_) => log::error!("a simulation worker panicked; its games are missing"),
        }
    }
}

fn print_summary(stats: &StatisticsAccumulator, config: &GameConfig) {
    let stats = &stats.stats;
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY ({} board)", config.jumps);
    println!("{}", "=".repeat(80));

    println!("\nPlayer Summary:");
    println!(
        "{:<12} {:<8} {:<10} {:<10} {:<10}",
        "Player", "Wins", "Win Rate", "Ladders", "Snakes"
    );
    println!("{}", "-".repeat(54));

    for player in PlayerId::ORDERED {
        println!(
            "{:<12} {:<8} {:<9.1}% {:<10} {:<10}",
            player.to_string(),
            stats.wins.get(&player).copied().unwrap_or(0),
            stats.win_rate(player),
            stats.ladders_by_player.get(&player).copied().unwrap_or(0),
            stats.snakes_by_player.get(&player).copied().unwrap_or(0),
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.games);
    println!("  Unfinished: {}", stats.unfinished);
    println!("  Avg Rolls: {:.2}", stats.get_avg_rolls());
    println!("  Avg Days: {:.2}", stats.get_avg_days());
    println!("  Avg Overshoots: {:.2}", stats.get_avg_overshoots());
    println!("  Avg Duration: {:.2?}", stats.get_avg_duration());
}
