use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("Coordinates are outside the board")]
    OutOfRange,
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },
    #[error("Saved session is corrupt or incompatible")]
    CorruptData,
    #[error("Storage backend failed")]
    StorageFailed,
}

pub type Result<T> = core::result::Result<T, GameError>;
