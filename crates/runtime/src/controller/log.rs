use serde::{Deserialize, Serialize};

use tactics_core::{Command, UndoRecord};

/// Entry point a command came through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Invocation {
    Human,
    Ai,
    Network,
}

/// A command that executed successfully.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub command: Command,
    pub invocation: Invocation,
    /// Turn number the command executed in.
    pub turn: u32,
    pub(crate) undo: UndoRecord,
}

impl LogEntry {
    pub fn is_undoable(&self) -> bool {
        self.undo.is_undoable()
    }
}
