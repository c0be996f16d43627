use clap::{Parser, Subcommand, ValueEnum};
use minefield_core::{Coord, Difficulty};

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl From<Preset> for Difficulty {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Beginner => Difficulty::Beginner,
            Preset::Intermediate => Difficulty::Intermediate,
            Preset::Expert => Difficulty::Expert,
        }
    }
}

/// One line of player input.
#[derive(Parser, Debug, PartialEq)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub(crate) struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub(crate) enum Command {
    /// Reveal the cell at ROW COL
    #[command(visible_alias = "r")]
    Reveal { row: Coord, col: Coord },
    /// Place or remove a flag at ROW COL
    #[command(visible_alias = "f")]
    Flag { row: Coord, col: Coord },
    /// Start over, optionally on another preset
    #[command(visible_alias = "n")]
    New {
        #[arg(value_enum)]
        difficulty: Option<Preset>,
    },
    /// Print the board again
    #[command(visible_alias = "s")]
    Show,
    /// Leave the game
    #[command(visible_alias = "q", alias = "exit")]
    Quit,
}

pub(crate) fn parse_line(line: &str) -> Option<Result<Command, clap::Error>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    Some(Line::try_parse_from(words).map(|line| line.command))
}
