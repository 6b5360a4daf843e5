use serde::{Deserialize, Serialize};

/// Content of a single board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Placeholder before mine placement has run; a generated board never
    /// contains it.
    Empty,
    Mine,
    /// Count of mines among the up-to-8 neighbors.
    Numbered(u8),
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}

/// Player-visible state of a cell, as reported by the read-only queries.
/// Unopened, unflagged cells always come back as `Hidden` regardless of
/// their content.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flag,
    Open(u8),
    Mine,
    /// The mine that ended the game.
    Exploded,
    /// A flag that turned out to sit on a safe cell, shown after a loss.
    IncorrectFlag,
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        use CellView::*;
        match self {
            Hidden => true,
            Flag => true,
            Open(_) => false,
            Mine => false,
            Exploded => false,
            IncorrectFlag => true,
        }
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
