use anyhow::Context;
use clap::Parser;
use slide_2048::policy::PolicyKind;
use slide_2048::runner::{play_game, RunOptions};
use slide_2048::session::GameSession;

#[derive(Debug, Parser)]
#[command(name = "slide-2048", about = "Play one 2048 game with an automated policy")]
struct Args {
    /// Policy: random, cycle, greedy, expectimax, expectimax-growing
    #[arg(long, default_value = "expectimax")]
    policy: String,

    /// Seed for both the game and the policy (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Print the grid after every accepted move
    #[arg(long)]
    show: bool,

    /// Print only the summary line (no grids)
    #[arg(short, long, conflicts_with = "show")]
    quiet: bool,

    /// Log per-move details (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let kind: PolicyKind = args.policy.parse().context("invalid --policy")?;
    let mut policy = kind.build(args.seed);
    let mut session = match args.seed {
        Some(seed) => GameSession::with_seed(seed),
        None => GameSession::new(),
    };
    if !args.quiet {
        println!("{}", session.grid());
    }

    let opts = RunOptions { max_moves: args.max_moves };
    let summary = play_game(&mut session, &mut policy, &opts);

    if args.show {
        for step in &summary.history.steps {
            println!("{} (+{}, total {})", step.direction, step.move_score, step.total_score_after_move);
            println!("{}", step.game_state);
        }
    }
    if !args.quiet {
        println!("{}", session.grid());
    }
    println!(
        "Policy: {}, stop: {:?}, moves: {} ({} invalid), score: {}, highest tile: {}, time: {:.2?}",
        summary.policy,
        summary.stop,
        summary.total_moves,
        summary.invalid_moves,
        summary.true_score,
        summary.highest_tile,
        summary.elapsed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quiet_and_defaults() {
        let args = Args::try_parse_from(["slide-2048", "--quiet", "--seed", "4"]).unwrap();
        assert!(args.quiet);
        assert!(!args.show);
        assert_eq!(args.seed, Some(4));
        assert_eq!(args.policy, "expectimax");

        let args = Args::try_parse_from(["slide-2048"]).unwrap();
        assert!(!args.quiet);
    }

    #[test]
    fn quiet_conflicts_with_show() {
        assert!(Args::try_parse_from(["slide-2048", "--quiet", "--show"]).is_err());
    }
}
