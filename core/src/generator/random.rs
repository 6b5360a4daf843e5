use ndarray::Array2;

use super::*;

/// Rejection-sampling generator: uniform coordinates are drawn and redrawn
/// until the requested number of mines lands outside the safe zone and off
/// already-mined cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomBoardGenerator {
    seed: u64,
    start: Coord2,
    safe_zone: SafeZone,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64, start: Coord2, safe_zone: SafeZone) -> Self {
        Self {
            seed,
            start,
            safe_zone,
        }
    }

    /// Degrades the requested zone when the board is too full to honor it.
    fn effective_safe_zone(&self, config: GameConfig) -> SafeZone {
        use SafeZone::*;
        match self.safe_zone {
            StartAndNeighbors if config.mines + 9 > config.total_cells() => {
                log::warn!("not enough room to clear the start neighborhood, keeping only the start cell clear");
                StartOnly
            }
            zone => zone,
        }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Board {
        use rand::prelude::*;

        let (rows, cols) = config.size;
        let total_cells = config.total_cells();

        // a full board needs no sampling
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "mine count {} exceeds the {}x{} board, filling it instead",
                    config.mines,
                    rows,
                    cols
                );
            }
            return Board::from_mine_mask(&Array2::from_elem(config.size.to_nd_index(), true));
        }

        let mut excluded: Array2<bool> = Array2::default(config.size.to_nd_index());
        match self.effective_safe_zone(config) {
            SafeZone::None => {}
            SafeZone::StartOnly => {
                excluded[self.start.to_nd_index()] = true;
            }
            SafeZone::StartAndNeighbors => {
                excluded[self.start.to_nd_index()] = true;
                for coords in NeighborIter::new(self.start, config.size) {
                    excluded[coords.to_nd_index()] = true;
                }
            }
        }

        let mut mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut placed: CellCount = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while placed < config.mines {
            let coords: Coord2 = (rng.random_range(0..rows), rng.random_range(0..cols));
            if excluded[coords.to_nd_index()] || mask[coords.to_nd_index()] {
                continue;
            }
            mask[coords.to_nd_index()] = true;
            placed += 1;
        }
        log::debug!("placed {} mines on a {}x{} board", placed, rows, cols);

        Board::from_mine_mask(&mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_mines(board: &Board) -> CellCount {
        let (rows, cols) = board.size();
        let mut count = 0;
        for row in 0..rows {
            for col in 0..cols {
                if board.is_mine((row, col)) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn places_exactly_the_requested_mines() {
        let config = GameConfig::new((8, 8), 10).unwrap();
        let board = RandomBoardGenerator::new(42, (4, 4), SafeZone::StartOnly).generate(config);
        assert_eq!(board.mine_count(), 10);
        assert_eq!(count_mines(&board), 10);
    }

    #[test]
    fn never_mines_the_start_cell() {
        let config = GameConfig::new((8, 8), 20).unwrap();
        for seed in 0..32 {
            let board =
                RandomBoardGenerator::new(seed, (3, 5), SafeZone::StartOnly).generate(config);
            assert!(!board.is_mine((3, 5)));
        }
    }

    #[test]
    fn neighborhood_zone_forces_a_zero_start() {
        let config = GameConfig::new((8, 8), 20).unwrap();
        for seed in 0..32 {
            let board =
                RandomBoardGenerator::new(seed, (4, 4), SafeZone::StartAndNeighbors)
                    .generate(config);
            assert_eq!(board.cell((4, 4)), Cell::Numbered(0));
        }
    }

    #[test]
    fn unrestricted_zone_may_mine_anywhere_but_count_holds() {
        let config = GameConfig::new((4, 4), 15).unwrap();
        let board = RandomBoardGenerator::new(7, (0, 0), SafeZone::None).generate(config);
        assert_eq!(board.mine_count(), 15);
    }

    #[test]
    fn crowded_board_degrades_to_start_cell_only() {
        // 9 cells, 2 mines: no room for a clear neighborhood around (1, 1)
        let config = GameConfig::new((3, 3), 2).unwrap();
        for seed in 0..32 {
            let board =
                RandomBoardGenerator::new(seed, (1, 1), SafeZone::StartAndNeighbors)
                    .generate(config);
            assert!(!board.is_mine((1, 1)));
            assert_eq!(board.mine_count(), 2);
        }
    }

    #[test]
    fn same_seed_reproduces_the_board() {
        let config = GameConfig::intermediate();
        let a = RandomBoardGenerator::new(9, (8, 8), SafeZone::StartOnly).generate(config);
        let b = RandomBoardGenerator::new(9, (8, 8), SafeZone::StartOnly).generate(config);
        assert_eq!(a, b);
    }

    #[test]
    fn full_board_skips_sampling() {
        let config = GameConfig::new_unchecked((2, 2), 4);
        let board = RandomBoardGenerator::new(0, (0, 0), SafeZone::StartOnly).generate(config);
        assert_eq!(board.mine_count(), 4);
        for row in 0..2 {
            for col in 0..2 {
                assert!(board.is_mine((row, col)));
            }
        }
    }
}
