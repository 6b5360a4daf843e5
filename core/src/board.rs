use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Minefield matrix. Once generated, every cell is `Mine` or `Numbered`;
/// before generation it is all `Empty`. Opening cells never changes board
/// content, only the session overlays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// All-`Empty` placeholder used between session creation and the first
    /// reveal.
    pub fn placeholder(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
            mine_count: 0,
        }
    }

    /// Builds a finished board from a mine mask, deriving every non-mine
    /// cell's adjacency number.
    pub fn from_mine_mask(mask: &Array2<bool>) -> Self {
        let mut mine_count: CellCount = 0;
        let cells = Array2::from_shape_fn(mask.raw_dim(), |(row, col)| {
            if mask[(row, col)] {
                mine_count += 1;
                Cell::Mine
            } else {
                let coords = (row as Coord, col as Coord);
                let adjacent = mask
                    .iter_neighbors(coords)
                    .filter(|&pos| mask[pos.to_nd_index()])
                    .count() as u8;
                Cell::Numbered(adjacent)
            }
        });
        Self { cells, mine_count }
    }

    /// Builds a board with mines at exactly the given coordinates. Used for
    /// fixed layouts in tests and replays.
    pub fn with_mines(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoordinate);
            }
            mask[coords.to_nd_index()] = true;
        }
        Ok(Self::from_mine_mask(&mask))
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    /// Whether mine placement has run; placeholders hold no mines.
    pub fn is_generated(&self) -> bool {
        self.mine_count > 0
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn cell(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn is_mine(&self, coords: Coord2) -> bool {
        self.cell(coords).is_mine()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoordinate)
        }
    }
}
