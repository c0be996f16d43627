use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What the player should see at one position.
///
/// The last four variants only appear once the game is over; they are derived from the session on the fly and never
/// written back into the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    /// The mine that ended the game
    Exploded,
    /// Unflagged mine shown after a loss
    Mine,
    /// Unflagged mine shown as flagged after a win
    AutoFlag,
    /// Flag on a cell without a mine, shown after a loss
    WrongFlag,
}

impl CellView {
    /// Whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        use CellView::*;
        match self {
            Hidden | Flagged | AutoFlag | WrongFlag => true,
            Revealed(_) | Exploded | Mine => false,
        }
    }
}

impl Session {
    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let cell = self.cell_at(coords)?;
        Ok(project(cell, self.phase()))
    }
}

fn project(cell: Cell, phase: Phase) -> CellView {
    use CellView::*;

    match (phase, cell.is_mine, cell.revealed, cell.flagged) {
        (_, true, true, _) => Exploded,
        (_, false, true, _) => Revealed(cell.adjacent_mines),
        (Phase::Lost, true, false, false) => Mine,
        (Phase::Lost, false, false, true) => WrongFlag,
        (Phase::Won, true, false, false) => AutoFlag,
        (_, _, false, true) => Flagged,
        (_, _, false, false) => Hidden,
    }
}

/// Snapshot of everything a presentation layer renders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Coord2,
    pub phase: Phase,
    pub mines_left: i64,
    pub elapsed_seconds: u32,
    pub cells: Array2<CellView>,
}

impl BoardView {
    pub fn from_session(session: &Session) -> Self {
        let phase = session.phase();
        let mut cells = Array2::from_elem(session.size().to_nd_index(), CellView::Hidden);
        for (coords, cell) in session.board().iter_cells() {
            cells[coords.to_nd_index()] = project(cell, phase);
        }

        Self {
            size: session.size(),
            phase,
            mines_left: session.mines_left(),
            elapsed_seconds: session.elapsed_seconds(),
            cells,
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> CellView {
        self.cells[coords.to_nd_index()]
    }
}
