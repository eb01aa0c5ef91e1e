//! Shared error classification for tactics-core.
//!
//! Domain errors (`GridError`, `PathError`, `CommandError`) live next to the
//! code that raises them and implement [`GameError`] so callers can decide
//! how to react without matching every variant.
//!
//! Illegal player input is never an error in this crate: abilities and the
//! interaction state machine swallow it. Errors describe invalid usage of
//! the engine (a bug in the caller) or rejected commands.

/// How an error should be handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// The command was rejected by the rules; the game can continue.
    ///
    /// Examples: destination occupied, target out of range.
    Rejected,

    /// The caller broke an engine contract.
    ///
    /// Examples: stale path cache, payload naming a unit that no longer exists.
    InvalidUsage,

    /// The requested operation is deliberately not supported.
    ///
    /// Example: undoing an end-turn command.
    Unsupported,

    /// Internal state is inconsistent; indicates an engine bug.
    ///
    /// Example: a unit missing from the occupant list of its own cell.
    Internal,
}

impl ErrorSeverity {
    /// True when the error points at a bug rather than a rejected move.
    pub const fn is_bug(&self) -> bool {
        matches!(self, Self::InvalidUsage | Self::Internal)
    }
}

/// Common behaviour of all tactics-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier of the variant, suitable for logs and metrics.
    fn error_code(&self) -> &'static str;
}
