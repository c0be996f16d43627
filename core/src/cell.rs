use serde::{Deserialize, Serialize};

/// Engine-side state of one grid position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub adjacent_mines: u8,
    pub revealed: bool,
    pub flagged: bool,
}

impl Cell {
    /// Neither revealed nor flagged.
    pub const fn is_hidden(self) -> bool {
        !self.revealed && !self.flagged
    }
}
