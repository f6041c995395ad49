use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use log::info;

use puzzle_search::adversarial::choose_move;
use puzzle_search::config::{MinimaxConfig, PlayerKind};
use puzzle_search::pentago::{instructions, PentagoBoard, PentagoMove, PentagoState, Token};
use puzzle_search::state::{Rule, State};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play Pentago", long_about = None)]
struct Args {
    /// Starting board: 36 characters of w, b and . in row-major order
    #[clap(short, long)]
    board: Option<String>,

    /// Token that moves first (w or b)
    #[clap(long, default_value = "w")]
    first: Token,

    /// Who plays White: human or computer
    #[clap(long, default_value = "human")]
    white: PlayerKind,

    /// Who plays Black: human or computer
    #[clap(long, default_value = "computer")]
    black: PlayerKind,

    /// Name shown for the White player
    #[clap(long, default_value = "White")]
    white_name: String,

    /// Name shown for the Black player
    #[clap(long, default_value = "Black")]
    black_name: String,

    /// Print the rules and position numbering before the game starts
    #[clap(long)]
    instructions: bool,

    /// Plies the computer looks ahead
    #[clap(short, long, default_value_t = 2)]
    depth: u32,

    /// Search every node instead of using alpha-beta cutoffs
    #[clap(long)]
    no_pruning: bool,

    /// Log search statistics for every computer move
    #[clap(short, long)]
    verbose: bool,
}

enum Turn {
    Play(PentagoMove),
    Exit,
}

/// Prompts until the user enters a legal move or `exit`. End of input exits.
fn human_move(state: &PentagoState, name: &str, input: &mut impl BufRead) -> anyhow::Result<Turn> {
    loop {
        print!(
            "Input your move, {} (block/position block-to-rotate direction): ",
            name
        );
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read move")? == 0 {
            return Ok(Turn::Exit);
        }
        let line = line.trim();
        if line == "exit" {
            return Ok(Turn::Exit);
        }
        match line.parse::<PentagoMove>() {
            Ok(mv) if mv.precondition(state) => return Ok(Turn::Play(mv)),
            Ok(_) => println!("Invalid move. That cell is taken."),
            Err(err) => println!("Invalid move. {}", err),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let board = match &args.board {
        Some(text) => PentagoBoard::from_config(text)
            .with_context(|| format!("Failed to parse board {:?}", text))?,
        None => PentagoBoard::empty(),
    };
    let config = MinimaxConfig {
        max_depth: args.depth,
        pruning: !args.no_pruning,
    };
    let player = |token: Token| match token {
        Token::White => (args.white_name.as_str(), args.white),
        Token::Black => (args.black_name.as_str(), args.black),
    };

    println!("\n-------------------\nWelcome to Pentago!\n-------------------");
    if args.instructions {
        println!("{}", instructions());
    }
    println!(
        "{} (White): {}, {} (Black): {}\n",
        args.white_name, args.white, args.black_name, args.black
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut state = PentagoState::new(board, args.first);
    println!("{}", state.board());

    loop {
        if state.board().is_full() || state.is_goal() {
            break;
        }
        let token = state.to_move();
        let (name, kind) = player(token);
        let turn = match kind {
            PlayerKind::Human => human_move(&state, name, &mut input)?,
            PlayerKind::Computer => {
                let result = choose_move(&state, &config);
                info!(
                    "{} searched {} nodes ({} cutoffs), value {}",
                    name,
                    result.stats.nodes,
                    result.stats.cutoffs,
                    result.value
                );
                match result.best_move {
                    Some(mv) => Turn::Play(mv),
                    None => break,
                }
            }
        };
        let mv = match turn {
            Turn::Play(mv) => mv,
            Turn::Exit => {
                println!("Exiting game.");
                return Ok(());
            }
        };

        println!("{}'s move: {}", name, mv);
        println!("{}", mv.explain(token));
        state = state.apply(&mv)?;
        println!("{}", state.board());
    }

    let white_won = state.board().win(Token::White);
    let black_won = state.board().win(Token::Black);
    match (white_won, black_won) {
        (true, true) => println!("Game ends in a tie (multiple winners)."),
        (true, false) => println!("{} (White) wins", args.white_name),
        (false, true) => println!("{} (Black) wins", args.black_name),
        (false, false) => println!("Game ends in a tie (no winner)."),
    }

    Ok(())
}
