use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - NotStarted -> Won
/// - NotStarted -> Lost, only when mines were laid out up front
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No cell revealed yet, mines not placed
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// What a reveal changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealResult {
    pub outcome: RevealOutcome,
    /// Cells whose revealed state changed, in reveal order.
    pub changed: Vec<Coord2>,
    pub phase: Phase,
    /// The mine that ended the game, when this reveal lost it.
    pub triggered_mine: Option<Coord2>,
}

impl RevealResult {
    fn no_change(phase: Phase) -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            changed: Vec::new(),
            phase,
            triggered_mine: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagResult {
    pub outcome: MarkOutcome,
    pub flagged: bool,
    /// `total_mines - flags_placed`, negative when over-flagged.
    pub mines_left: i64,
}

/// Represents a game from start to finish
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    board: Board,
    phase: Phase,
    flags_placed: CellCount,
    elapsed_seconds: u32,
    seed: u64,
    triggered_mine: Option<Coord2>,
}

impl Session {
    /// New game with a random seed.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_seed(config, rand::random())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        let board = Board::new(config)?;
        log::debug!(
            "New game: {}x{} with {} mines, seed {:#018x}",
            config.rows,
            config.cols,
            config.mines,
            seed
        );
        Ok(Self::from_board(board, seed))
    }

    /// New game on a fixed layout; the first reveal skips mine placement.
    pub fn from_layout(layout: &MineLayout) -> Result<Self> {
        Ok(Self::from_board(Board::from_layout(layout)?, 0))
    }

    fn from_board(board: Board, seed: u64) -> Self {
        Self {
            board,
            phase: Phase::NotStarted,
            flags_placed: 0,
            elapsed_seconds: 0,
            seed,
            triggered_mine: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_final()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.total_mines()
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flags_placed
    }

    /// How many mines have not been flagged yet
    pub fn mines_left(&self) -> i64 {
        i64::from(self.board.total_mines()) - i64::from(self.flags_placed)
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.board[coords])
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealResult> {
        let coords = self.board.validate_coords(coords)?;

        if self.phase.is_final() || !self.board[coords].is_hidden() {
            return Ok(RevealResult::no_change(self.phase));
        }

        if self.phase.is_initial() {
            self.start(coords);
        }

        if self.board[coords].is_mine {
            self.board.detonate(coords);
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return Ok(RevealResult {
                outcome: RevealOutcome::HitMine,
                changed: vec![coords],
                phase: self.phase,
                triggered_mine: Some(coords),
            });
        }

        let changed = self.board.flood_reveal(coords);
        log::debug!("Reveal at {:?} opened {} cells", coords, changed.len());

        let outcome = if self.board.is_cleared() {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        };

        Ok(RevealResult {
            outcome,
            changed,
            phase: self.phase,
            triggered_mine: None,
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagResult> {
        let coords = self.board.validate_coords(coords)?;

        let flipped = if self.phase.is_final() {
            None
        } else {
            self.board.toggle_flag(coords)
        };

        let outcome = match flipped {
            Some(true) => {
                self.flags_placed += 1;
                MarkOutcome::Changed
            }
            Some(false) => {
                self.flags_placed -= 1;
                MarkOutcome::Changed
            }
            None => MarkOutcome::NoChange,
        };

        Ok(FlagResult {
            outcome,
            flagged: self.board[coords].flagged,
            mines_left: self.mines_left(),
        })
    }

    /// Advances the clock by one second while the game is in progress.
    pub fn tick(&mut self) -> u32 {
        if matches!(self.phase, Phase::InProgress) {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
        self.elapsed_seconds
    }

    /// Places mines away from `coords` unless the layout was fixed up front, then starts the clock.
    fn start(&mut self, coords: Coord2) {
        if !self.board.mines_placed() {
            let layout = RandomMineGenerator::new(self.seed, coords).generate(self.board.config());
            self.board.place_mines(&layout);
        }
        self.phase = Phase::InProgress;
    }

    fn end_game(&mut self, won: bool) {
        if self.phase.is_final() {
            return;
        }

        self.phase = if won { Phase::Won } else { Phase::Lost };
        log::debug!(
            "Game {} after {}s",
            if won { "won" } else { "lost" },
            self.elapsed_seconds
        );
    }
}
