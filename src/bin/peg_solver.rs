use anyhow::Context;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use puzzle_search::config::{SearchConfig, SearchLimits, Strategy, DEFAULT_DEPTH_BOUND};
use puzzle_search::heuristics::PegsRemaining;
use puzzle_search::pegboard::{PegBoard, DEFAULT_GOAL_SLOT};
use puzzle_search::solver::solve;
use puzzle_search::state::State;
use puzzle_search::stats::SearchStats;
use puzzle_search::utils::random_walk;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Solve a peg solitaire board", long_about = None)]
struct Args {
    /// Number of rows on the board
    #[clap(default_value_t = 4)]
    rows: usize,

    /// Number of columns on the board
    #[clap(default_value_t = 4)]
    cols: usize,

    /// Empty slot of the starting board (slot 0 is the bottom-right corner)
    #[clap(long, default_value_t = DEFAULT_GOAL_SLOT)]
    hole: usize,

    /// Slot the last peg must end in (defaults to the hole)
    #[clap(long)]
    goal: Option<usize>,

    /// Explicit starting board, rows*cols characters of X (peg) and . (empty)
    #[clap(short, long)]
    board: Option<String>,

    /// Search method: b, d, a, i or a depth-first bound
    #[clap(short, long, default_value = "i")]
    method: Strategy,

    /// Deepest path considered by iterative deepening and backtracking
    #[clap(long, default_value_t = DEFAULT_DEPTH_BOUND)]
    depth_bound: u32,

    /// Make random jumps until none is left instead of searching
    #[clap(long)]
    flail: bool,

    /// Seed for --flail (random if omitted)
    #[clap(long)]
    seed: Option<u64>,

    /// Log every backtracking step and expansion
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let goal = args.goal.unwrap_or(args.hole);
    let board = match &args.board {
        Some(text) => PegBoard::from_config(args.rows, args.cols, text, goal)
            .with_context(|| format!("Failed to parse board {:?}", text))?,
        None => {
            let board = PegBoard::with_hole(args.rows, args.cols, args.hole)
                .context("Failed to build the starting board")?;
            PegBoard::new(args.rows, args.cols, board.pegs(), goal)?
        }
    };

    println!("Initial State: {}", board.pegs());
    println!("{}\n", board);

    if args.flail {
        let mut rng = match args.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let (end, jumps) = random_walk(&board, usize::MAX, &mut rng)?;
        for jump in &jumps {
            println!("{}", jump);
        }
        println!("\nNo jumps left after {} moves:\n{}", jumps.len(), end);
        println!("Goal reached: {}", end.is_goal());
        return Ok(());
    }

    let config = SearchConfig::new(args.method)
        .with_limits(SearchLimits::with_depth_bound(args.depth_bound));
    let mut stats = SearchStats::new();

    match solve(&board, &config, &PegsRemaining, &mut stats) {
        Ok(solution) => {
            println!("Final solution path:");
            for (state, jump) in solution.iter().skip(1) {
                if let Some(jump) = jump {
                    println!("{}", jump);
                    println!("{}\n", state);
                }
            }
        }
        Err(err) => println!("No solution: {}", err),
    }

    println!("Total number of calls to backtrack: {}", stats.backtrack_calls);
    println!("Cycles detected: {}", stats.failures.cycle);
    println!("Dead ends: {}", stats.failures.dead_end);
    println!("Depth limit exceeded: {}", stats.failures.depth_bound);
    println!("No applicable rules: {}", stats.failures.no_rule);
    println!("All rules failed: {}", stats.failures.exhausted);
    println!("{}", stats);

    Ok(())
}
