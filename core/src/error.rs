use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board dimensions or mine count")]
    InvalidConfiguration,
    #[error("Coordinates outside the board")]
    InvalidCoordinate,
    #[error("Operation not allowed in the current game state")]
    IllegalOperation,
}

pub type Result<T> = core::result::Result<T, GameError>;
