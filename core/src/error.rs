use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Symbol pool too small for the requested grid")]
    InsufficientSymbols,
    #[error("Grid must hold an even number of cards, at least four")]
    InvalidGridShape,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure reported by a best-score storage collaborator. These are logged
/// and never block a game-state transition.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Best-score storage is unavailable")]
    Unavailable,
    #[error("Best-score storage rejected the value")]
    Rejected,
}
