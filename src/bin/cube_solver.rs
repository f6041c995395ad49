use anyhow::Context;
use clap::Parser;
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use puzzle_search::config::{InitialConfig, SearchConfig, SearchLimits, Strategy, DEFAULT_DEPTH_BOUND};
use puzzle_search::cube::Cube;
use puzzle_search::heuristics::{Heuristic, MisplacedTiles};
use puzzle_search::solver::solve;
use puzzle_search::stats::SearchStats;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Solve a 2x2x2 pocket cube", long_about = None)]
struct Args {
    /// Initial cube as 24 stickers over WRGYOB (spaces allowed), or a number
    /// of random twists to apply to the solved cube
    #[clap(short, long, default_value = "3")]
    config: InitialConfig,

    /// Search method: b (breadth), d (iterative depth), a (best),
    /// i (backtrack), or a number n for depth-first bounded at n
    #[clap(short, long, default_value = "d")]
    method: Strategy,

    /// Deepest path considered by iterative deepening and backtracking
    #[clap(long, default_value_t = DEFAULT_DEPTH_BOUND)]
    depth_bound: u32,

    /// Give up after expanding this many states
    #[clap(long)]
    max_expansions: Option<u64>,

    /// Seed for scrambling (random if omitted)
    #[clap(long)]
    seed: Option<u64>,

    /// Log every expansion
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let start = match &args.config {
        InitialConfig::Literal(text) => {
            Cube::from_config(text).with_context(|| format!("Failed to parse cube {:?}", text))?
        }
        InitialConfig::Scramble(twists) => {
            let mut rng = match args.seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_entropy(),
            };
            let (cube, applied) = Cube::scramble(*twists, &mut rng)?;
            let names: Vec<String> = applied.iter().map(|t| t.to_string()).collect();
            info!("Scrambled with {}", names.join(" "));
            cube
        }
    };

    println!("initialState={}", start);
    println!("method={}", args.method);
    println!("h={}", MisplacedTiles.score(&start, 0));
    println!("{}\n", start.to_grid());

    let config = SearchConfig::new(args.method).with_limits(SearchLimits {
        depth_bound: args.depth_bound,
        max_expansions: args.max_expansions,
        max_states: None,
    });
    let mut stats = SearchStats::new();

    match solve(&start, &config, &MisplacedTiles, &mut stats) {
        Ok(solution) => {
            println!("Goal reached in {} twists:", solution.depth());
            for (step, (cube, twist)) in solution.iter().enumerate().skip(1) {
                if let Some(twist) = twist {
                    println!("  {:>2}. {:<2}  {}", step, twist, cube);
                }
            }
        }
        Err(err) => println!("No solution: {}", err),
    }
    println!("{}", stats);

    Ok(())
}
