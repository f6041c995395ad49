use clap::Parser;
use log::warn;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use puzzle_search::config::{SearchConfig, SearchLimits, Strategy};
use puzzle_search::cube::Cube;
use puzzle_search::heuristics::MisplacedTiles;
use puzzle_search::solver::solve;
use puzzle_search::stats::SearchStats;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare search strategies on seeded cube scrambles", long_about = None)]
struct Args {
    /// Number of scrambled cubes to solve
    #[clap(short, long, default_value_t = 10)]
    boards: usize,

    /// Random twists per scramble
    #[clap(short, long, default_value_t = 4)]
    twists: usize,

    /// Seed of the first scramble; later ones count up from it
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Depth bound for every strategy (defaults to the twist count)
    #[clap(long)]
    depth_bound: Option<u32>,

    /// Expansions allowed per run before a strategy gives up
    #[clap(long, default_value_t = 200_000)]
    max_expansions: u64,

    #[clap(short, long)]
    verbose: bool,
}

#[derive(Default)]
struct Tally {
    solved: usize,
    depths: usize,
    work: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let bound = args.depth_bound.unwrap_or(args.twists as u32);
    let strategies = Strategy::all(bound);
    let mut tallies: Vec<Tally> = strategies.iter().map(|_| Tally::default()).collect();
    let limits = SearchLimits {
        depth_bound: bound,
        max_expansions: Some(args.max_expansions),
        max_states: None,
    };

    println!("Starting strategy evaluation for {} cubes...", args.boards);

    for board_idx in 0..args.boards {
        let seed = args.seed + board_idx as u64;
        let mut rng = SmallRng::seed_from_u64(seed);
        let (cube, _) = Cube::scramble(args.twists, &mut rng)?;

        println!("\nEvaluating Cube {} (Seed: {}): {}", board_idx, seed, cube);

        for (strategy, tally) in strategies.iter().zip(tallies.iter_mut()) {
            let config = SearchConfig::new(*strategy).with_limits(limits);
            let mut stats = SearchStats::new();
            // Backtracking never expands frontier nodes; count its calls instead.
            let outcome = solve(&cube, &config, &MisplacedTiles, &mut stats);
            let work = stats.expanded + stats.backtrack_calls;
            match outcome {
                Ok(solution) => {
                    tally.solved += 1;
                    tally.depths += solution.depth();
                    tally.work += work;
                    println!(
                        "  Strategy: {:<24} Depth: {:<3} Work: {}",
                        strategy.to_string(),
                        solution.depth(),
                        work
                    );
                }
                Err(err) => {
                    warn!("{} failed on seed {}: {}", strategy, seed, err);
                    println!("  Strategy: {:<24} Failed: {}", strategy.to_string(), err);
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of cubes evaluated: {}", args.boards);
    println!("\n--- Averages Over Solved Cubes ---");

    let mut averages: Vec<(String, usize, f64, f64)> = Vec::new();
    for (strategy, tally) in strategies.iter().zip(&tallies) {
        if tally.solved == 0 {
            println!("Strategy {}: No cube solved.", strategy);
            continue;
        }
        let n = tally.solved as f64;
        averages.push((
            strategy.to_string(),
            tally.solved,
            tally.depths as f64 / n,
            tally.work as f64 / n,
        ));
    }

    averages.sort_by(|a, b| a.3.total_cmp(&b.3));

    for (name, solved, depth, work) in averages {
        println!(
            "Strategy {:<24}: Solved = {:<3} Average Depth = {:.2}, Average Work = {:.1}",
            name, solved, depth, work
        );
    }

    Ok(())
}
