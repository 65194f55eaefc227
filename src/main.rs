use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use minichess_core::engine::config::EngineConfig;
use minichess_core::engine::Move;
use minichess_core::logic::board::{Color, Square};
use minichess_core::logic::game::{Game, Player, TurnOutcome};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    Human,
    Ai,
}

#[derive(Parser)]
#[command(name = "minichess")]
#[command(about = "Chess on a 5x6 board, against a friend or the built-in AI", long_about = None)]
struct Args {
    /// Game mode: 1 human vs human, 2 human vs AI, 3 AI vs AI
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
    mode: Option<u8>,

    /// Who plays White (overrides --mode)
    #[arg(long, value_enum)]
    white: Option<PlayerKind>,

    /// Who plays Black (overrides --mode)
    #[arg(long, value_enum)]
    black: Option<PlayerKind>,

    /// AI search depth in plies
    #[arg(short, long)]
    depth: Option<u8>,

    /// JSON file with engine settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pause before each AI move is shown, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Stop after this many moves
    #[arg(long)]
    max_turns: Option<usize>,
}

enum HumanInput {
    Move(Move),
    Undo,
    Quit,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config = EngineConfig::load_from_json(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            info!("engine settings loaded from {}", path.display());
            config
        }
        None => EngineConfig::default(),
    };
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    if let Some(delay) = args.delay_ms {
        config.move_delay_ms = delay;
    }
    info!(
        "search depth {}, node limit {:?}",
        config.depth, config.node_limit
    );
    let config = Arc::new(config);

    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Welcome to Minichess!");
    let (white, black) = choose_players(&args, &mut input)?;
    let make_player = |kind, color| match kind {
        PlayerKind::Human => Player::Human,
        PlayerKind::Ai => Player::ai(color, config.clone()),
    };
    let mut game = Game::new(
        make_player(white, Color::White),
        make_player(black, Color::Black),
    );

    println!("White pieces are uppercase (PRNBQK)");
    println!("Black pieces are lowercase (prnbqk)");
    println!("Enter moves as two squares (e.g. 'e2 e3'), 'undo' or 'quit'");

    play(&mut game, &config, args.max_turns, &mut input)?;

    println!("\nGame Over!");
    print!("{}", game.board());
    Ok(())
}

fn choose_players(args: &Args, input: &mut impl BufRead) -> Result<(PlayerKind, PlayerKind)> {
    if args.white.is_some() || args.black.is_some() {
        return Ok((
            args.white.unwrap_or(PlayerKind::Human),
            args.black.unwrap_or(PlayerKind::Ai),
        ));
    }

    let mode = match args.mode {
        Some(mode) => mode,
        None => {
            println!("1. Human vs Human");
            println!("2. Human vs AI");
            println!("3. AI vs AI");
            loop {
                let Some(line) = prompt(input, "Select game mode (1-3): ")? else {
                    bail!("no game mode selected");
                };
                match line.trim().parse::<u8>() {
                    Ok(choice @ 1..=3) => break choice,
                    Ok(_) => println!("Please enter 1, 2, or 3."),
                    Err(_) => println!("Please enter a valid number."),
                }
            }
        }
    };

    Ok(match mode {
        1 => (PlayerKind::Human, PlayerKind::Human),
        2 => (PlayerKind::Human, PlayerKind::Ai),
        _ => (PlayerKind::Ai, PlayerKind::Ai),
    })
}

fn play(
    game: &mut Game,
    config: &EngineConfig,
    max_turns: Option<usize>,
    input: &mut impl BufRead,
) -> Result<()> {
    let mut turns = 0;
    loop {
        print!("{}", game.board());

        let status = game.update_status();
        if status.is_over() {
            info!("finished after {turns} moves: {status}");
            println!("{status}");
            return Ok(());
        }
        if max_turns.is_some_and(|limit| turns >= limit) {
            info!("stopped at the turn limit of {turns} moves");
            println!("Turn limit of {turns} moves reached.");
            return Ok(());
        }

        println!("\n{}'s turn", game.current_turn());

        if game.is_ai_turn() {
            thread::sleep(config.move_delay());
            if let TurnOutcome::Moved { mv, .. } = game.play_turn(&mut None::<Move>)? {
                println!("AI moves from {} to {}", mv.from, mv.to);
                turns += 1;
            }
            continue;
        }

        match read_human_input(input)? {
            HumanInput::Quit => {
                info!("quit after {turns} moves");
                return Ok(());
            }
            HumanInput::Undo => {
                if game.undo().is_err() {
                    println!("Nothing to undo.");
                    continue;
                }
                // Take back the AI reply too, so the human is on move again.
                while game.is_ai_turn() && game.undo().is_ok() {}
            }
            HumanInput::Move(mv) => match game.play_turn(&mut Some(mv)) {
                Ok(_) => turns += 1,
                Err(err) if err.is_retryable() => {
                    println!("Invalid move. Try again. ({err})");
                }
                Err(err) => return Err(err.into()),
            },
        }
    }
}

fn read_human_input(input: &mut impl BufRead) -> Result<HumanInput> {
    loop {
        let Some(line) = prompt(input, "Enter start position (e.g., e2): ")? else {
            return Ok(HumanInput::Quit);
        };
        let words: Vec<&str> = line.split_whitespace().collect();

        let parsed = match words.as_slice() {
            ["quit" | "exit"] => return Ok(HumanInput::Quit),
            ["undo"] => return Ok(HumanInput::Undo),
            [start, end] => parse_move(start, end),
            [start] => {
                let Some(end) = prompt(input, "Enter end position (e.g., e4): ")? else {
                    return Ok(HumanInput::Quit);
                };
                parse_move(start, end.trim())
            }
            _ => {
                println!("Invalid move. Try again.");
                continue;
            }
        };

        match parsed {
            Ok(mv) => return Ok(HumanInput::Move(mv)),
            Err(err) => println!("Invalid move. Try again. ({err})"),
        }
    }
}

fn parse_move(start: &str, end: &str) -> Result<Move> {
    let from: Square = start.parse()?;
    let to: Square = end.parse()?;
    Ok(Move::new(from, to))
}

/// Prints `text`, then reads one line. `None` on end of input.
fn prompt(input: &mut impl BufRead, text: &str) -> Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
