use std::io::{self, BufRead};

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use minefield_core::{CellCount, Controller, Coord, Difficulty, GameConfig, GameError, Phase, Session};
use web_time::Instant;

use crate::clock::Clock;
use crate::command::{Command, Preset, parse_line};
use crate::render::{OutputFormat, Presenter};

mod clock;
mod command;
mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Clear the minefield without hitting a mine", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Preset board for the first game
    #[arg(short, long, value_enum, default_value_t = Preset::Beginner)]
    difficulty: Preset,

    /// Custom board rows, overrides the preset
    #[arg(long, requires_all = ["cols", "mines"])]
    rows: Option<Coord>,

    /// Custom board columns
    #[arg(long, requires_all = ["rows", "mines"])]
    cols: Option<Coord>,

    /// Custom mine count
    #[arg(long, requires_all = ["rows", "cols"])]
    mines: Option<CellCount>,

    /// Force a seed for the first game instead of random
    #[arg(short, long, value_parser = parse_seed)]
    seed: Option<u64>,

    /// Print one JSON object per game event instead of drawing the board
    #[arg(long)]
    json: bool,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        match (self.rows, self.cols, self.mines) {
            (Some(rows), Some(cols), Some(mines)) => GameConfig::new_unchecked(rows, cols, mines),
            _ => Difficulty::from(self.difficulty).config(),
        }
    }
}

/// Accepts decimal or `0x`-prefixed hex.
fn parse_seed(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|err| format!("invalid seed {s:?}: {err}"))
}

type Game<'a> = Controller<Presenter<io::StdoutLock<'a>>>;

fn sync_clock(clock: &mut Clock, game: &mut Game<'_>) {
    let running = game.session().phase() == Phase::InProgress;
    for _ in 0..clock.sync(running, Instant::now()) {
        game.tick();
    }
}

fn report(game: &mut Game<'_>, err: GameError) {
    log::debug!("Rejected command: {}", err);
    game.notifier_mut().error(&err.to_string());
}

/// Runs one player command, returning `false` once the player wants to leave.
fn run_command(game: &mut Game<'_>, command: Command, last_config: &mut GameConfig) -> bool {
    match command {
        Command::Reveal { row, col } => {
            if let Err(err) = game.reveal((row, col)) {
                report(game, err);
            }
        }
        Command::Flag { row, col } => {
            if let Err(err) = game.toggle_flag((row, col)) {
                report(game, err);
            }
        }
        Command::New { difficulty } => {
            let config = difficulty.map_or(*last_config, |preset| Difficulty::from(preset).config());
            match game.new_game(config) {
                Ok(()) => *last_config = config,
                Err(err) => report(game, err),
            }
        }
        Command::Show => {
            let (session, presenter) = game.split_mut();
            presenter.show(session);
        }
        Command::Quit => return false,
    }
    true
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut config = args.game_config();
    let session = match args.seed {
        Some(seed) => Session::with_seed(config, seed),
        None => Session::new(config),
    }
    .context("Could not start the game")?;
    log::debug!("Starting with {:?}, seed {:#018x}", config, session.seed());

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let stdout = io::stdout();
    let mut game = Controller::new(session, Presenter::new(stdout.lock(), format));
    game.notifier_mut().message("Commands: reveal R C, flag R C, new [PRESET], show, quit");

    let mut clock = Clock::default();
    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read input")?;
        sync_clock(&mut clock, &mut game);

        let keep_going = match parse_line(&line) {
            None => true,
            Some(Ok(command)) => run_command(&mut game, command, &mut config),
            Some(Err(err)) => {
                game.notifier_mut().error(&err.render().to_string());
                true
            }
        };

        sync_clock(&mut clock, &mut game);
        game.notifier_mut()
            .take_error()
            .context("Could not write output")?;

        if !keep_going {
            break;
        }
    }

    log::debug!("Bye");
    Ok(())
}
