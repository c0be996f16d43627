/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Row-major flat index of `coords` on a board with `cols` columns.
pub(crate) fn flat_index((row, col): Coord2, cols: Coord) -> usize {
    usize::from(row) * usize::from(cols) + usize::from(col)
}

/// Inverse of [`flat_index`].
pub(crate) fn from_flat_index(index: usize, cols: Coord) -> Coord2 {
    let cols = usize::from(cols);
    // both parts are bounded by the board size, which itself fits in `Coord`
    ((index / cols) as Coord, (index % cols) as Coord)
}

/// Cells one step away from `center` in any direction, clipped to a board of `size`.
///
/// Yields in row-major order and never yields `center` itself.
pub fn neighbors(center: Coord2, size: Coord2) -> Neighbors {
    let (row, col) = center;
    let (rows, cols) = size;
    if row >= rows || col >= cols {
        return Neighbors {
            center,
            next: None,
            first_col: 0,
            last: (0, 0),
        };
    }

    let first = (row.saturating_sub(1), col.saturating_sub(1));
    let last = (row.saturating_add(1).min(rows - 1), col.saturating_add(1).min(cols - 1));
    Neighbors {
        center,
        next: Some(first),
        first_col: first.1,
        last,
    }
}

/// Iterator returned by [`neighbors`].
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    next: Option<Coord2>,
    first_col: Coord,
    last: Coord2,
}

impl Neighbors {
    fn advance(&mut self, (row, col): Coord2) {
        self.next = if col < self.last.1 {
            Some((row, col + 1))
        } else if row < self.last.0 {
            Some((row + 1, self.first_col))
        } else {
            None
        };
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(coords) = self.next {
            self.advance(coords);
            if coords != self.center {
                return Some(coords);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = neighbors((0, 0), (3, 3)).collect();
        assert_eq!(neighbors, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn interior_has_eight_neighbors() {
        assert_eq!(neighbors((1, 1), (3, 3)).count(), 8);
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert_eq!(neighbors((0, 0), (1, 1)).count(), 0);
    }

    #[test]
    fn edge_of_wide_board_is_clipped() {
        let neighbors: Vec<_> = neighbors((0, 29), (16, 30)).collect();
        assert_eq!(neighbors, vec![(0, 28), (1, 28), (1, 29)]);
    }

    #[test]
    fn center_outside_board_has_no_neighbors() {
        assert_eq!(neighbors((3, 0), (3, 3)).count(), 0);
    }

    #[test]
    fn flat_index_is_row_major() {
        assert_eq!(flat_index((2, 3), 5), 13);
        assert_eq!(from_flat_index(13, 5), (2, 3));
    }
}
