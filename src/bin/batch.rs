use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;
use slide_2048::policy::PolicyKind;
use slide_2048::runner::{play_game, GameSummary, RunOptions};
use slide_2048::session::GameSession;
use std::time::{Duration, Instant};

#[derive(Debug, Parser)]
#[command(name = "batch", about = "Play many independent 2048 games in parallel and report statistics")]
struct Args {
    /// Policy: random, cycle, greedy, expectimax, expectimax-growing
    #[arg(long, default_value = "expectimax")]
    policy: String,

    /// Number of games to play
    #[arg(long, default_value_t = 16)]
    games: u64,

    /// Worker threads (defaults to rayon's choice)
    #[arg(long)]
    threads: Option<usize>,

    /// Base seed; game i uses seed + i (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Per-game: stop after this many moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let kind: PolicyKind = args.policy.parse().context("invalid --policy")?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = args.threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build().context("failed to build thread pool")?;

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:30}] {pos}/{len} games | best: {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃")
                .progress_chars("=> "),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let start = Instant::now();
    let opts = RunOptions { max_moves: args.max_moves };
    info!("playing {} games with {}", args.games, kind);
    let summaries: Vec<GameSummary> = pool.install(|| {
        (0..args.games)
            .into_par_iter()
            .map(|i| {
                // Each game owns its session and policy; nothing is shared across threads.
                let seed = args.seed.map(|s| s.wrapping_add(i));
                let mut session = match seed {
                    Some(seed) => GameSession::with_seed(seed),
                    None => GameSession::new(),
                };
                let mut policy = kind.build(seed);
                let summary = play_game(&mut session, &mut policy, &opts);
                pb.inc(1);
                pb.set_message(summary.true_score.to_string());
                summary
            })
            .collect()
    });
    pb.finish_and_clear();

    report(&kind, &summaries, start.elapsed());
    Ok(())
}

fn report(kind: &PolicyKind, summaries: &[GameSummary], elapsed: Duration) {
    if summaries.is_empty() {
        println!("No games played.");
        return;
    }
    let n = summaries.len() as f64;
    let mean_score = summaries.iter().map(|s| s.true_score as f64).sum::<f64>() / n;
    let max_score = summaries.iter().map(|s| s.true_score).max().unwrap_or(0);
    let total_moves: u64 = summaries.iter().map(|s| s.total_moves).sum();
    let invalid_moves: u64 = summaries.iter().map(|s| s.invalid_moves).sum();
    let highest_tile = summaries.iter().map(|s| s.highest_tile).max().unwrap_or(0);
    let invalid_ratio = if total_moves > 0 { invalid_moves as f64 / total_moves as f64 } else { 0.0 };
    println!(
        "Policy: {} | games: {} | mean score: {:.1} | max score: {} | mean moves: {:.1} | invalid: {:.1}% | highest tile: {} | time: {:.2?}",
        kind,
        summaries.len(),
        mean_score,
        max_score,
        total_moves as f64 / n,
        invalid_ratio * 100.0,
        highest_tile,
        elapsed
    );
}
