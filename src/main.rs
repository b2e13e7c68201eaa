//! Terminal chess game, human versus the Negamove engine.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use negamove_engine::coretypes::{Color, Move};
use negamove_engine::error::Error;
use negamove_engine::fen::Fen;
use negamove_engine::search;
use negamove_engine::{evaluate, Engine, EngineBuilder, EvalParams, Position, DEPTH};

/// Play chess against a fixed-depth negamax search.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Search depth in plies. Depths above 4 answer slowly.
    #[arg(short, long, default_value_t = DEPTH)]
    depth: u8,

    /// Play as Black. The engine moves first and the board is drawn from Black's side.
    #[arg(short, long)]
    black: bool,

    /// Seed for the engine's choice among equally good moves.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Start from this position instead of the standard one.
    #[arg(short, long)]
    fen: Option<String>,
}

enum InputKind {
    Exit,
    Newgame,
    Help,
    Error,
    Undo,
    GameMove(Move),
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        if let Ok(move_) = s.parse::<Move>() {
            Self::GameMove(move_)
        } else {
            match s {
                "exit" | "quit" => Self::Exit,
                "newgame" | "ng" => Self::Newgame,
                "help" => Self::Help,
                "undo" => Self::Undo,
                _ => Self::Error,
            }
        }
    }
}

/// What happened to the game after a move.
enum Outcome {
    Continue,
    Over,
}

fn new_engine(args: &Args) -> Result<Engine> {
    let position = match &args.fen {
        Some(fen) => Position::parse_fen(fen).context("could not start from --fen")?,
        None => Position::start_position(),
    };
    let mut builder = EngineBuilder::new()
        .position(position)
        .depth(args.depth)
        .plays_as_black(args.black);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    Ok(builder.build()?)
}

fn human_color(engine: &Engine) -> Color {
    if engine.position().plays_as_black() {
        Color::Black
    } else {
        Color::White
    }
}

fn print_position(engine: &Engine) {
    let static_score = evaluate(engine.position(), EvalParams::default());
    println!("{}", engine.position());
    println!("Current static score: {static_score}");
}

/// Report checkmate or stalemate for the side to move, if the game has ended.
fn game_over(engine: &Engine, human: Color) -> Outcome {
    let position = engine.position();
    if position.is_checkmate() {
        println!("{position}");
        if position.side_to_move() == human {
            println!("Oh no!! Negamove won by CHECKMATE.");
        } else {
            println!("Congrats!! You won by CHECKMATE.");
        }
        Outcome::Over
    } else if position.is_stalemate() {
        println!("{position}");
        println!("The game is DRAWN via STALEMATE.");
        Outcome::Over
    } else {
        Outcome::Continue
    }
}

/// Read one line into `input`. Returns false once the input is exhausted.
fn read_input<R: BufRead>(reader: &mut R, input: &mut String) -> io::Result<bool> {
    input.clear();
    Ok(reader.read_line(input)? > 0)
}

/// Let the engine play one move for the side to move.
fn engine_move(engine: &mut Engine) -> Result<()> {
    println!("thinking...");
    let result = engine.search_sync()?;
    let best_move = match result.best_move {
        Some(best_move) => best_move,
        None => {
            warn!("search found no move, playing a random one");
            let mut position = engine.position().clone();
            let legal_moves = position.legal_moves();
            search::random_move(&legal_moves, &mut rand::thread_rng())
                .context("no legal moves left")?
        }
    };
    engine.do_move(best_move)?;
    println!("Negamove played move {best_move}.");
    println!("{result}");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    println!("Negamove CLI {}\n", env!("CARGO_PKG_VERSION"));
    let mut engine = new_engine(&args)?;
    let human = human_color(&engine);
    let mut input = String::new();

    loop {
        let position = engine.position();
        let ongoing = !(position.is_checkmate() || position.is_stalemate());
        if ongoing && position.side_to_move() != human {
            engine_move(&mut engine)?;
        }
        if let Outcome::Over = game_over(&engine, human) {
            println!("Press Enter to start a new game.");
            if !read_input(&mut io::stdin().lock(), &mut input)? {
                break;
            }
            engine = new_engine(&args)?;
            continue;
        }

        print_position(&engine);
        print!("> ");
        io::stdout().flush()?;
        if !read_input(&mut io::stdin().lock(), &mut input)? {
            break;
        }

        match InputKind::from(input.trim()) {
            InputKind::Exit => break,
            InputKind::Newgame => {
                engine = new_engine(&args)?;
                println!("Starting new game...");
            }
            InputKind::Help => {
                println!("Commands:");
                println!("newgame | ng => Begin a new game.");
                println!("undo => Undo the position to return to your last move.");
                println!("help => Print this help text.");
                println!("exit => end CLI.");
                println!("\nTo make a move, enter a move in long algebraic form.");
                println!("Examples: d2d4 -> Move piece on D2 to D4. e7e8q -> Promote to a queen.");
            }
            InputKind::Undo => {
                // Undo both the engine's move and the player's last move.
                for _ in 0..2 {
                    match engine.take_back() {
                        Ok(move_info) => println!("Undo move {}.", move_info.move_()),
                        Err(Error::NoMoveToUndo) => break,
                        Err(err) => return Err(err.into()),
                    }
                }
            }
            InputKind::Error => println!("Invalid command: {}", input.trim()),
            InputKind::GameMove(move_) => match engine.do_move(move_) {
                Ok(_) => info!("player moved {move_}"),
                Err(Error::IllegalMove(_)) => println!("That move was illegal! No action taken."),
                Err(err) => return Err(err.into()),
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_input_stops_at_end_of_input() {
        let mut reader = io::Cursor::new("e2e4\n");
        let mut input = String::from("stale");
        assert!(read_input(&mut reader, &mut input).unwrap());
        assert_eq!(input.trim(), "e2e4");
        assert!(!read_input(&mut reader, &mut input).unwrap());
        assert!(input.is_empty());
    }

    #[test]
    fn input_kinds() {
        assert!(matches!(InputKind::from("quit"), InputKind::Exit));
        assert!(matches!(InputKind::from("ng"), InputKind::Newgame));
        assert!(matches!(InputKind::from("e7e8q"), InputKind::GameMove(_)));
        assert!(matches!(InputKind::from("e9e8"), InputKind::Error));
    }
}
