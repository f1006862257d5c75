#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Index;

use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

pub use builder::*;
pub use card::*;
pub use error::*;
pub use session::*;
pub use shell::*;
pub use types::*;

mod builder;
mod card;
mod error;
mod session;
mod shell;
mod types;

/// Cards currently face-up, keyed by where they lie.
pub type RevealState = BTreeMap<Position, CardFace>;

/// Limits applied when laying out a new deal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealConfig {
    /// Distinct faces kept from the supplied images; each becomes a pair.
    pub max_cards: u8,
    pub max_rows: Coord,
}

impl DealConfig {
    pub const DEFAULT_MAX_CARDS: u8 = 16;
    pub const DEFAULT_MAX_ROWS: Coord = 4;
    /// Keeps `2 * max_cards` representable as a single grid row.
    pub const MAX_CARDS_LIMIT: u8 = 127;

    pub(crate) const fn new_unchecked(max_cards: u8, max_rows: Coord) -> Self {
        Self {
            max_cards,
            max_rows,
        }
    }

    pub fn new(max_cards: u8, max_rows: Coord) -> Self {
        let max_cards = max_cards.clamp(1, Self::MAX_CARDS_LIMIT);
        let max_rows = max_rows.clamp(1, Coord::MAX);
        Self::new_unchecked(max_cards, max_rows)
    }

    /// Same limits, with out-of-range values pulled back in.
    pub fn sanitized(self) -> Self {
        Self::new(self.max_cards, self.max_rows)
    }
}

impl Default for DealConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_MAX_CARDS, Self::DEFAULT_MAX_ROWS)
    }
}

/// The fixed assignment of faces to grid positions for one playthrough.
///
/// Each supplied face contributes one pair, so a face supplied twice fills four cells. Cells past
/// the last card stay empty.
///
/// Deserializing goes through [`Deal::from_cells`], so a stored deal with stray or unpaired faces
/// is rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DealCells", into = "DealCells")]
pub struct Deal {
    cells: Array2<Option<CardFace>>,
    card_count: CellCount,
}

/// Stored form of a [`Deal`]: just the grid.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct DealCells {
    cells: Array2<Option<CardFace>>,
}

impl Deal {
    pub fn empty() -> Self {
        Self {
            cells: Array2::default(GridSize::EMPTY.to_nd_dim()),
            card_count: 0,
        }
    }

    /// Lays `faces` out row-major over `size`, leaving any trailing cells empty.
    ///
    /// Callers are responsible for the pairing invariant.
    pub(crate) fn from_row_major(size: GridSize, faces: Vec<CardFace>) -> Self {
        let mut cells: Array2<Option<CardFace>> = Array2::default(size.to_nd_dim());
        let mut card_count = 0;
        for (pos, face) in size.positions().zip(faces) {
            cells[pos.to_nd_index()] = Some(face);
            card_count += 1;
        }
        Self { cells, card_count }
    }

    /// Builds a deal from explicit cells, checking that they fit `size`, that no position is used
    /// twice, and that every face fills whole pairs.
    pub fn from_cells(
        size: GridSize,
        cells: impl IntoIterator<Item = (Position, CardFace)>,
    ) -> Result<Self> {
        let mut grid: Array2<Option<CardFace>> = Array2::default(size.to_nd_dim());
        let mut counts: BTreeMap<CardFace, u8> = BTreeMap::new();
        let mut card_count = 0;

        for (pos, face) in cells {
            if !size.contains(pos) {
                return Err(GameError::InvalidPosition);
            }
            let cell = &mut grid[pos.to_nd_index()];
            if cell.is_some() {
                return Err(GameError::InvalidPosition);
            }
            *counts.entry(face.clone()).or_default() += 1;
            *cell = Some(face);
            card_count += 1;
        }

        if let Some((face, _)) = counts.into_iter().find(|&(_, count)| count % 2 != 0) {
            return Err(GameError::UnpairedFace(String::from(face.as_str())));
        }

        Ok(Self {
            cells: grid,
            card_count,
        })
    }

    pub fn size(&self) -> GridSize {
        let (rows, cols) = self.cells.dim();
        GridSize::new(
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn card_count(&self) -> CellCount {
        self.card_count
    }

    pub fn pair_count(&self) -> CellCount {
        self.card_count / 2
    }

    pub fn is_empty(&self) -> bool {
        self.card_count == 0
    }

    pub fn face_at(&self, pos: Position) -> Option<&CardFace> {
        if self.size().contains(pos) {
            self.cells[pos.to_nd_index()].as_ref()
        } else {
            None
        }
    }

    /// Accepts only positions that hold a card.
    pub fn validate_position(&self, pos: Position) -> Result<Position> {
        match self.face_at(pos) {
            Some(_) => Ok(pos),
            None => Err(GameError::InvalidPosition),
        }
    }

    /// Occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &CardFace)> {
        self.size()
            .positions()
            .filter_map(|pos| self.cells[pos.to_nd_index()].as_ref().map(|face| (pos, face)))
    }

    pub fn positions_of<'a>(&'a self, face: &'a CardFace) -> impl Iterator<Item = Position> + 'a {
        self.iter()
            .filter(move |&(_, other)| other == face)
            .map(|(pos, _)| pos)
    }

    /// Distinct faces, in order of first appearance.
    pub fn faces(&self) -> Vec<CardFace> {
        let mut seen = BTreeSet::new();
        self.iter()
            .filter(|&(_, face)| seen.insert(face))
            .map(|(_, face)| face.clone())
            .collect()
    }

    /// Same occupied cells and faces, with the faces permuted among the cells.
    pub fn reshuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut faces: Vec<CardFace> = self.iter().map(|(_, face)| face.clone()).collect();
        faces.shuffle(rng);

        let mut cells = self.cells.clone();
        let occupied = cells.iter_mut().filter(|cell| cell.is_some());
        for (cell, face) in occupied.zip(faces) {
            *cell = Some(face);
        }
        Self {
            cells,
            card_count: self.card_count,
        }
    }
}

impl Default for Deal {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<Position> for Deal {
    type Output = Option<CardFace>;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.cells[pos.to_nd_index()]
    }
}

impl From<Deal> for DealCells {
    fn from(deal: Deal) -> Self {
        Self { cells: deal.cells }
    }
}

impl TryFrom<DealCells> for Deal {
    type Error = GameError;

    fn try_from(stored: DealCells) -> Result<Self> {
        let (rows, cols) = stored.cells.dim();
        let size = GridSize::new(
            rows.try_into().map_err(|_| GameError::InvalidPosition)?,
            cols.try_into().map_err(|_| GameError::InvalidPosition)?,
        );
        let cells = size
            .positions()
            .zip(stored.cells.iter())
            .filter_map(|(pos, cell)| cell.clone().map(|face| (pos, face)));
        Self::from_cells(size, cells)
    }
}

/// Every occupied cell is revealed with its own face, and nothing else is.
impl PartialEq<RevealState> for Deal {
    fn eq(&self, revealed: &RevealState) -> bool {
        usize::from(self.card_count) == revealed.len()
            && self
                .iter()
                .all(|(pos, face)| revealed.get(&pos) == Some(face))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    InProgress,
    Won,
}

impl GameOutcome {
    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Result of a single click on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Revealed,
    Matched,
    Mismatched,
    Won,
}

impl ClickOutcome {
    /// Whether this outcome changed what the player sees.
    pub const fn has_update(self) -> bool {
        use ClickOutcome::*;
        match self {
            Ignored => false,
            Revealed => true,
            Matched => true,
            Mismatched => true,
            Won => true,
        }
    }
}
