use std::collections::{HashSet, VecDeque};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress (first reveal; mine placement runs here)
/// - InProgress -> Won
/// - InProgress -> Lost
/// - InProgress -> TimedOut (clock cap)
/// plus NotStarted -> Won | Lost when the very first reveal already decides
/// the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    NotStarted,
    InProgress,
    Won,
    Lost,
    /// The clock reached `TIME_CAP_SECS`; terminal and non-winning.
    TimedOut,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves are accepted anymore
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::TimedOut)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// One game from configuration to win, loss, or timeout.
///
/// The board starts as an all-`Empty` placeholder and is generated on the
/// first reveal, with the revealed coordinate as the safe start. Opened and
/// flagged state live in boolean overlays next to the board; the opened
/// overlay only ever grows within a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    config: GameConfig,
    board: Board,
    opened: Array2<bool>,
    flagged: Array2<bool>,
    open_count: CellCount,
    flag_count: CellCount,
    state: GameState,
    elapsed_secs: u32,
    triggered_mine: Option<Coord2>,
    seed: u64,
    safe_zone: SafeZone,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_safe_zone(config, seed, SafeZone::default())
    }

    pub fn with_safe_zone(config: GameConfig, seed: u64, safe_zone: SafeZone) -> Self {
        let dim = config.size.to_nd_index();
        Self {
            config,
            board: Board::placeholder(config.size),
            opened: Array2::default(dim),
            flagged: Array2::default(dim),
            open_count: 0,
            flag_count: 0,
            state: GameState::default(),
            elapsed_secs: 0,
            triggered_mine: None,
            seed,
            safe_zone,
        }
    }

    /// Runs a session over a pre-built board, skipping lazy generation.
    /// Used for replays and fixed layouts.
    pub fn from_board(board: Board) -> Result<Self> {
        let config = GameConfig::new(board.size(), board.mine_count())?;
        let mut session = Self::new(config, 0);
        session.board = board;
        Ok(session)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn open_count(&self) -> CellCount {
        self.open_count
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// The mine that ended the game, if it ended by detonation.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// How many mines have not been flagged yet. Goes negative when the
    /// player has placed more flags than there are mines.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.config.mines) - i32::from(self.flag_count)
    }

    pub fn is_opened(&self, coords: Coord2) -> bool {
        self.opened[coords.to_nd_index()]
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.flagged[coords.to_nd_index()]
    }

    /// Player-visible value of a cell. Content of unopened, unflagged cells
    /// is never disclosed.
    pub fn cell_view(&self, coords: Coord2) -> CellView {
        let nd = coords.to_nd_index();
        let cell = self.board.cell(coords);
        match (self.opened[nd], self.flagged[nd]) {
            // opened and flagged can only coincide on mines shown at loss,
            // where the flag was correct
            (true, true) => CellView::Flag,
            (true, false) => match cell {
                Cell::Mine if self.triggered_mine == Some(coords) => CellView::Exploded,
                Cell::Mine => CellView::Mine,
                Cell::Numbered(count) => CellView::Open(count),
                Cell::Empty => CellView::Hidden,
            },
            (false, true) => {
                if matches!(self.state, GameState::Lost) && !cell.is_mine() {
                    CellView::IncorrectFlag
                } else {
                    CellView::Flag
                }
            }
            (false, false) => CellView::Hidden,
        }
    }

    /// Reveals a cell. The first reveal of a session generates the board
    /// with `coords` as the safe start. Already-open and flagged cells are
    /// benign no-ops.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_terminal()?;

        let nd = coords.to_nd_index();
        if self.opened[nd] || self.flagged[nd] {
            return Ok(RevealOutcome::NoChange);
        }

        self.ensure_generated(coords);
        Ok(self.open_cell(coords))
    }

    /// Whether a chord on this cell would open its neighbors.
    pub fn is_chordable(&self, coords: Coord2) -> bool {
        if self.state.is_terminal() || !self.opened[coords.to_nd_index()] {
            return false;
        }
        match self.board.cell(coords) {
            Cell::Numbered(count) => count == self.count_flagged_neighbors(coords),
            _ => false,
        }
    }

    /// Reveals a cell, or, on an open numbered cell whose flagged-neighbor
    /// count matches its number, reveals every unflagged closed neighbor in
    /// one operation.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_terminal()?;

        if self.is_chordable(coords) {
            return Ok(self
                .iter_neighbors(coords)
                .map(|pos| self.open_cell(pos))
                .reduce(core::ops::BitOr::bitor)
                .unwrap_or(RevealOutcome::NoChange));
        }

        let nd = coords.to_nd_index();
        if self.opened[nd] || self.flagged[nd] {
            return Ok(RevealOutcome::NoChange);
        }
        self.ensure_generated(coords);
        Ok(self.open_cell(coords))
    }

    /// Flips the flag on an unopened cell while the game is in progress.
    /// Opened cells are a benign no-op.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_in_progress()?;

        let nd = coords.to_nd_index();
        if self.opened[nd] {
            return Ok(FlagOutcome::NoChange);
        }
        if self.flagged[nd] {
            self.flagged[nd] = false;
            self.flag_count -= 1;
        } else {
            self.flagged[nd] = true;
            self.flag_count += 1;
        }
        Ok(FlagOutcome::Toggled)
    }

    /// Consumes one one-second signal from the external timer. Only
    /// effective while the game is in progress; reaching the cap ends the
    /// session as a stalemate. Returns the clock value.
    pub fn tick(&mut self) -> u32 {
        if matches!(self.state, GameState::InProgress) {
            self.elapsed_secs += 1;
            if self.elapsed_secs >= TIME_CAP_SECS {
                self.elapsed_secs = TIME_CAP_SECS;
                self.state = GameState::TimedOut;
                log::debug!("clock cap reached, session timed out");
            }
        }
        self.elapsed_secs
    }

    /// Returns to `NotStarted` with the same configuration: placeholder
    /// board, cleared overlays and counters, zeroed clock, fresh seed.
    pub fn reset(&mut self, seed: u64) {
        *self = Self::with_safe_zone(self.config, seed, self.safe_zone);
    }

    /// Swaps the configuration and forces a reset.
    pub fn change_difficulty(&mut self, config: GameConfig, seed: u64) {
        *self = Self::with_safe_zone(config, seed, self.safe_zone);
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.config.size;
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoordinate)
        }
    }

    fn check_not_terminal(&self) -> Result<()> {
        if self.state.is_terminal() {
            Err(GameError::IllegalOperation)
        } else {
            Ok(())
        }
    }

    fn check_in_progress(&self) -> Result<()> {
        if matches!(self.state, GameState::InProgress) {
            Ok(())
        } else {
            Err(GameError::IllegalOperation)
        }
    }

    fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.config.size)
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self.flagged[pos.to_nd_index()])
            .count() as u8
    }

    fn ensure_generated(&mut self, start: Coord2) {
        if self.board.is_generated() {
            return;
        }
        self.board =
            RandomBoardGenerator::new(self.seed, start, self.safe_zone).generate(self.config);
        log::debug!("board generated on first reveal at {:?}", start);
    }

    /// Opens a single cell and flood-fills from it if it has no adjacent
    /// mines. Flagged cells are never opened.
    fn open_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let nd = coords.to_nd_index();
        if self.opened[nd] || self.flagged[nd] {
            return RevealOutcome::NoChange;
        }

        match self.board.cell(coords) {
            Cell::Empty => RevealOutcome::NoChange,
            Cell::Mine => {
                self.opened[nd] = true;
                self.triggered_mine = Some(coords);
                self.finish(false);
                RevealOutcome::HitMine
            }
            Cell::Numbered(count) => {
                self.opened[nd] = true;
                self.open_count += 1;
                log::debug!("opened {:?}, adjacent mines: {}", coords, count);

                if count == 0 {
                    self.cascade_from(coords);
                }

                if self.open_count == self.board.safe_cells() {
                    self.finish(true);
                    RevealOutcome::Won
                } else {
                    self.mark_started();
                    RevealOutcome::Opened
                }
            }
        }
    }

    /// Breadth-first expansion across the zero region around `start`. The
    /// numbered border ring is opened but not expanded past; flagged cells
    /// are traversal barriers.
    fn cascade_from(&mut self, start: Coord2) {
        let mut visited = HashSet::from([start]);
        let mut queue: VecDeque<Coord2> = self
            .iter_neighbors(start)
            .filter(|&pos| {
                !self.opened[pos.to_nd_index()] && !self.flagged[pos.to_nd_index()]
            })
            .collect();
        log::trace!("flood fill from {:?}, seeds: {:?}", start, queue);

        while let Some(pos) = queue.pop_front() {
            if !visited.insert(pos) {
                continue;
            }
            let nd = pos.to_nd_index();
            if self.opened[nd] || self.flagged[nd] {
                continue;
            }

            // mines are never adjacent to a zero cell
            let Cell::Numbered(count) = self.board.cell(pos) else {
                continue;
            };
            self.opened[nd] = true;
            self.open_count += 1;
            log::trace!("flood opened {:?}, adjacent mines: {}", pos, count);

            if count == 0 {
                queue.extend(
                    self.iter_neighbors(pos)
                        .filter(|&next| {
                            !self.opened[next.to_nd_index()]
                                && !self.flagged[next.to_nd_index()]
                        })
                        .filter(|next| !visited.contains(next)),
                );
            }
        }
    }

    fn mark_started(&mut self) {
        if self.state.is_initial() {
            log::debug!("game started");
            self.state = GameState::InProgress;
        }
    }

    fn finish(&mut self, won: bool) {
        if self.state.is_terminal() {
            return;
        }
        self.state = if won { GameState::Won } else { GameState::Lost };
        log::debug!("game over: {:?}", self.state);
        if won {
            self.triggered_mine = None;
            self.flag_remaining_mines();
        } else {
            self.reveal_mines();
        }
    }

    /// Loss display: every mine becomes visible; non-mine opened and flag
    /// state is left untouched.
    fn reveal_mines(&mut self) {
        let (rows, cols) = self.config.size;
        for row in 0..rows {
            for col in 0..cols {
                if self.board.is_mine((row, col)) {
                    self.opened[[usize::from(row), usize::from(col)]] = true;
                }
            }
        }
    }

    /// Flags the still-unflagged mines after a win so the counter reads
    /// zero.
    fn flag_remaining_mines(&mut self) {
        let (rows, cols) = self.config.size;
        for row in 0..rows {
            for col in 0..cols {
                let nd = [usize::from(row), usize::from(col)];
                if self.board.is_mine((row, col)) && !self.flagged[nd] {
                    self.flagged[nd] = true;
                    self.flag_count += 1;
                }
            }
        }
    }
}
