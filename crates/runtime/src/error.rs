//! Unified error type surfaced by the runtime API.
//!
//! Wraps core execution, command and path failures so callers can bubble
//! them up with consistent context.

use thiserror::Error;

use behavior_tree::spec::SpecError;
use tactics_core::{
    CommandError, ErrorSeverity, ExecuteError, GameError, PathError, PlayerId, UnitId,
};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("invalid runtime configuration")]
    Config(#[source] serde_json::Error),

    #[error("invalid behavior tree: {0}")]
    Tree(#[from] SpecError),

    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),

    #[error("player {0} is not registered")]
    UnknownPlayer(PlayerId),

    #[error("no player has a unit to act with")]
    NoPlayableTurn,

    #[error("the match has already started")]
    AlreadyStarted,

    #[error("no AI is attached to player {0}")]
    AiNotSet(PlayerId),

    #[error("there is no command to undo")]
    NothingToUndo,

    #[error("the last command was issued in an earlier turn")]
    UndoAcrossTurn,
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Execute(error) => match error.command_error() {
                Some(error) => error.severity(),
                None => ErrorSeverity::InvalidUsage,
            },
            RuntimeError::Command(error) => error.severity(),
            RuntimeError::Path(error) => error.severity(),
            RuntimeError::Config(_) | RuntimeError::Tree(_) => ErrorSeverity::InvalidUsage,
            RuntimeError::UnknownUnit(_)
            | RuntimeError::UnknownPlayer(_)
            | RuntimeError::AlreadyStarted
            | RuntimeError::AiNotSet(_) => ErrorSeverity::InvalidUsage,
            RuntimeError::NoPlayableTurn => ErrorSeverity::Internal,
            RuntimeError::NothingToUndo | RuntimeError::UndoAcrossTurn => {
                ErrorSeverity::Rejected
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Execute(_) => "RUNTIME_EXECUTE",
            RuntimeError::Command(error) => error.error_code(),
            RuntimeError::Path(error) => error.error_code(),
            RuntimeError::Config(_) => "RUNTIME_CONFIG",
            RuntimeError::Tree(_) => "RUNTIME_TREE",
            RuntimeError::UnknownUnit(_) => "RUNTIME_UNKNOWN_UNIT",
            RuntimeError::UnknownPlayer(_) => "RUNTIME_UNKNOWN_PLAYER",
            RuntimeError::NoPlayableTurn => "RUNTIME_NO_PLAYABLE_TURN",
            RuntimeError::AlreadyStarted => "RUNTIME_ALREADY_STARTED",
            RuntimeError::AiNotSet(_) => "RUNTIME_AI_NOT_SET",
            RuntimeError::NothingToUndo => "RUNTIME_NOTHING_TO_UNDO",
            RuntimeError::UndoAcrossTurn => "RUNTIME_UNDO_ACROSS_TURN",
        }
    }
}
