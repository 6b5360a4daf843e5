use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod session;
mod types;

/// Three-digit clock cap; a session that reaches it ends as a stalemate.
pub const TIME_CAP_SECS: u32 = 999;

// The classic expert board. Both 30x16/99 and 32x16/100 circulate; the
// 99-mine shape is used here.
const EXPERT_SIZE: Coord2 = (16, 30);
const EXPERT_MINES: CellCount = 99;

// Envelope accepted from user-entered custom boards.
const CUSTOM_AXIS_RANGE: core::ops::RangeInclusive<Coord> = 8..=100;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates the engine-level invariant: positive dimensions and a mine
    /// count that leaves at least one safe cell.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let total = mult(size.0, size.1);
        if size.0 == 0 || size.1 == 0 || mines == 0 || mines >= total {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    /// Validates a user-entered board: each axis within [8, 100] and mine
    /// density at most a third of the grid.
    pub fn custom(size: Coord2, mines: CellCount) -> Result<Self> {
        if !CUSTOM_AXIS_RANGE.contains(&size.0) || !CUSTOM_AXIS_RANGE.contains(&size.1) {
            return Err(GameError::InvalidConfiguration);
        }
        if mines == 0 || mines > mult(size.0, size.1) / 3 {
            return Err(GameError::InvalidConfiguration);
        }
        Self::new(size, mines)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked((8, 8), 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked((16, 16), 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(EXPERT_SIZE, EXPERT_MINES)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Outcome of a flag toggle
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Toggled,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Toggled => true,
        }
    }
}

/// Outcome of revealing a cell
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Opened,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Opened => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes when a chord opens several cells
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            // a hit mine has priority
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            // then a win
            (Won, _) => Won,
            (_, Won) => Won,
            // then any plain open
            (Opened, _) => Opened,
            (_, Opened) => Opened,
            // and no-change only with both
            (NoChange, NoChange) => NoChange,
        }
    }
}
