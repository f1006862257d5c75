use serde::{Deserialize, Serialize};

/// Single coordinate axis used for grid rows, columns, and positions.
pub type Coord = u8;

/// Count type used for card counts and total-cell counts.
pub type CellCount = u16;

/// Grid coordinates `(row, column)`.
pub type Position = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Position {
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

/// Smallest `n` such that `n * n >= value`.
pub(crate) const fn ceil_sqrt(value: CellCount) -> CellCount {
    let mut n: CellCount = 0;
    while (n as u32) * (n as u32) < value as u32 {
        n += 1;
    }
    n
}

/// Dimensions of a deal, `rows` by `cols`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: Coord,
    pub cols: Coord,
}

impl GridSize {
    pub const EMPTY: Self = Self { rows: 0, cols: 0 };

    pub const fn new(rows: Coord, cols: Coord) -> Self {
        Self { rows, cols }
    }

    /// Near-square grid for `cards`, never taller than `max_rows`.
    ///
    /// Starts from a `ceil(sqrt(cards))` square. When that is too tall the overflow rows are turned
    /// into extra columns, and if the result still cannot hold every card the columns are widened
    /// until it does.
    pub fn for_cards(cards: CellCount, max_rows: Coord) -> Self {
        if cards == 0 {
            return Self::EMPTY;
        }
        let max_rows = CellCount::from(max_rows.max(1));
        let side = ceil_sqrt(cards);
        let (mut rows, mut cols) = (side, side);
        if rows > max_rows {
            cols += rows - max_rows;
            rows = max_rows;
        }
        if rows * cols < cards {
            cols = cards.div_ceil(rows);
        }
        Self {
            rows: rows.try_into().unwrap_or(Coord::MAX),
            cols: cols.try_into().unwrap_or(Coord::MAX),
        }
    }

    pub const fn total_cells(self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn contains(self, (row, col): Position) -> bool {
        row < self.rows && col < self.cols
    }

    /// All positions of the grid in row-major order.
    pub fn positions(self) -> impl Iterator<Item = Position> {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| (row, col)))
    }

    pub(crate) const fn to_nd_dim(self) -> (usize, usize) {
        (self.rows as usize, self.cols as usize)
    }
}
