use std::collections::VecDeque;
use std::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Grid of cells plus the mine total it was created for.
///
/// A board created with [`Board::new`] holds no mines until [`Board::place_mines`] runs, which the engine does on
/// the first reveal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    total_mines: CellCount,
    mines_placed: bool,
    revealed_count: CellCount,
}

impl Board {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cells: Array2::default(config.size().to_nd_index()),
            total_mines: config.mines,
            mines_placed: false,
            revealed_count: 0,
        })
    }

    /// Board with a fixed, already placed layout.
    pub fn from_layout(layout: &MineLayout) -> Result<Self> {
        let (rows, cols) = layout.size();
        let mut board = Self::new(GameConfig::new_unchecked(rows, cols, layout.mine_count()))?;
        board.place_mines(layout);
        Ok(board)
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        Self::from_layout(&MineLayout::from_mine_coords(size, mine_coords)?)
    }

    pub fn config(&self) -> GameConfig {
        let (rows, cols) = self.size();
        GameConfig::new_unchecked(rows, cols, self.total_mines)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (
            Coord::try_from(rows).unwrap_or(Coord::MAX),
            Coord::try_from(cols).unwrap_or(Coord::MAX),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        CellCount::try_from(self.cells.len()).unwrap_or(CellCount::MAX)
    }

    pub fn total_mines(&self) -> CellCount {
        self.total_mines
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.total_mines
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds { coords, size })
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> Neighbors {
        neighbors(coords, self.size())
    }

    /// Counts mined neighbors directly from the mine flags.
    pub fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        let count = self
            .iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count();
        // at most eight neighbors
        count as u8
    }

    /// Every cell without a mine has been revealed; mine cells are not consulted.
    pub fn is_cleared(&self) -> bool {
        self.mines_placed && self.revealed_count == self.safe_cell_count()
    }

    /// Copies `layout` onto the grid and computes every adjacency count.
    pub(crate) fn place_mines(&mut self, layout: &MineLayout) {
        debug_assert_eq!(layout.size(), self.size());
        debug_assert_eq!(layout.mine_count(), self.total_mines);

        for (coords, cell) in self.cells.indexed_iter_mut() {
            cell.is_mine = layout.contains_mine((coords.0 as Coord, coords.1 as Coord));
        }

        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let count = self.count_adjacent_mines((row, col));
                self.cells[(row, col).to_nd_index()].adjacent_mines = count;
            }
        }

        self.mines_placed = true;
    }

    /// Reveals a mined cell; safe-cell bookkeeping is untouched.
    pub(crate) fn detonate(&mut self, coords: Coord2) {
        let cell = &mut self.cells[coords.to_nd_index()];
        debug_assert!(cell.is_mine);
        cell.revealed = true;
        cell.flagged = false;
    }

    /// Reveals `coords` and, while the opened cells have no adjacent mines, their hidden neighbors.
    ///
    /// Returns the cells that were opened, in opening order. Flagged and already revealed cells are left alone, and
    /// each cell is opened at most once since `revealed` doubles as the visited mark.
    pub(crate) fn flood_reveal(&mut self, coords: Coord2) -> Vec<Coord2> {
        let mut opened = Vec::new();
        let mut to_visit = VecDeque::from([coords]);

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = &mut self.cells[visit_coords.to_nd_index()];
            if !cell.is_hidden() || cell.is_mine {
                continue;
            }

            cell.revealed = true;
            let adjacent_mines = cell.adjacent_mines;
            self.revealed_count += 1;
            opened.push(visit_coords);
            log::trace!(
                "Opened cell at {:?}, adjacent mines: {}",
                visit_coords,
                adjacent_mines
            );

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.iter_neighbors(visit_coords)
                        .filter(|&pos| self[pos].is_hidden()),
                );
            }
        }

        opened
    }

    /// Flips the flag on a hidden cell, returning the new flag state or `None` when the cell is revealed.
    pub(crate) fn toggle_flag(&mut self, coords: Coord2) -> Option<bool> {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.revealed {
            return None;
        }
        cell.flagged = !cell.flagged;
        Some(cell.flagged)
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn new_board_has_no_mines() {
        let board = Board::new(GameConfig::beginner()).unwrap();
        assert!(!board.mines_placed());
        assert_eq!(board.total_mines(), 10);
        assert!(board.iter_cells().all(|(_, cell)| cell == Cell::default()));
    }

    #[test]
    fn neighbors_follow_board_size() {
        let board = board((2, 4), &[(0, 0)]);

        assert_eq!(
            board.iter_neighbors((1, 3)).collect::<Vec<_>>(),
            vec![(0, 2), (0, 3), (1, 2)]
        );
        assert_eq!(board.iter_neighbors((0, 1)).count(), 5);
    }

    #[test]
    fn adjacency_matches_mined_neighbors() {
        let board = board((4, 5), &[(0, 0), (1, 1), (3, 4), (2, 4)]);

        for (coords, cell) in board.iter_cells() {
            let expected = board
                .iter_neighbors(coords)
                .filter(|&pos| board[pos].is_mine)
                .count();
            assert_eq!(cell.adjacent_mines as usize, expected, "at {coords:?}");
        }
        assert_eq!(board[(0, 1)].adjacent_mines, 2);
        assert_eq!(board[(2, 3)].adjacent_mines, 2);
    }

    #[test]
    fn flood_stops_at_numbered_border() {
        // column 2 is a wall of mines, so the left side is one zero region bordered by column 1
        let mines = [(0, 2), (1, 2), (2, 2), (3, 2)];
        let mut board = board((4, 5), &mines);

        let opened = board.flood_reveal((0, 0));

        assert_eq!(opened.len(), 8);
        for row in 0..4 {
            assert!(board[(row, 0)].revealed);
            assert!(board[(row, 1)].revealed);
            assert!(!board[(row, 3)].revealed);
            assert!(!board[(row, 4)].revealed);
        }
    }

    #[test]
    fn flood_skips_flags() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.toggle_flag((0, 2));

        let opened = board.flood_reveal((0, 0));

        assert!(!opened.contains(&(0, 2)));
        assert!(board[(0, 2)].flagged);
        assert!(!board[(0, 2)].revealed);
        assert_eq!(opened.len(), 7);
    }

    #[test]
    fn numbered_cell_does_not_expand() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.flood_reveal((1, 1)), vec![(1, 1)]);
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn cleared_ignores_mine_cells() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.flood_reveal((1, 1));
        board.flood_reveal((0, 1));
        assert!(!board.is_cleared());
        board.flood_reveal((1, 0));
        assert!(board.is_cleared());
        assert!(!board[(0, 0)].revealed);
    }

    #[test]
    fn large_empty_board_floods_without_recursion() {
        let mut board = board((300, 300), &[]);

        let opened = board.flood_reveal((150, 150));

        assert_eq!(opened.len(), 90_000);
        assert!(board.is_cleared());
    }

    #[test]
    fn flag_toggle_refuses_revealed_cells() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.flood_reveal((1, 1));
        assert_eq!(board.toggle_flag((1, 1)), None);
        assert_eq!(board.toggle_flag((0, 0)), Some(true));
        assert_eq!(board.toggle_flag((0, 0)), Some(false));
    }
}
