use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

/// Produces a finished board for a config. Consumed on use so
/// implementations can own their randomness.
pub trait BoardGenerator {
    fn generate(self, config: GameConfig) -> Board;
}

/// How much of the first-revealed area is kept clear of mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafeZone {
    /// No exclusion; the first reveal may hit a mine.
    None,
    /// Only the revealed cell is kept clear.
    StartOnly,
    /// The revealed cell and all its neighbors are kept clear, so the first
    /// reveal always cascades.
    StartAndNeighbors,
}

impl Default for SafeZone {
    fn default() -> Self {
        Self::StartOnly
    }
}
