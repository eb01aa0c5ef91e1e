//! Command execution pipeline.

use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::grid::Board;
use crate::unit::{PlayerId, Unit, UnitId};

use super::{Command, CommandError, CommandTransition};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing a command.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExecuteError {
    #[error("{command} command failed: {error}")]
    Transition {
        command: &'static str,
        error: TransitionPhaseError<CommandError>,
    },

    #[error("the acting unit or player of a {0} command does not exist")]
    UnknownActor(&'static str),

    #[error("actor belongs to {actor}, but it is {current}'s turn")]
    NotCurrentPlayer { actor: PlayerId, current: PlayerId },

    #[error("unit {0} is not playable this turn")]
    UnitNotPlayable(UnitId),

    #[error("no turn is in progress")]
    NoTurn,

    #[error("the game has ended")]
    GameEnded,
}

impl ExecuteError {
    /// The command error behind a failed transition, if any.
    pub fn command_error(&self) -> Option<&CommandError> {
        match self {
            ExecuteError::Transition { error, .. } => Some(&error.error),
            _ => None,
        }
    }
}

/// Before-images captured when a command executes.
///
/// Undo puts every touched unit back exactly as it was and removes any
/// unit the command created.
#[derive(Clone, Debug, PartialEq)]
pub struct UndoRecord {
    command: &'static str,
    undoable: bool,
    before: Vec<Unit>,
    spawned: Option<UnitId>,
}

impl UndoRecord {
    fn capture(command: &Command, board: &Board) -> Self {
        let transition = command.transition();
        Self {
            command: command.name(),
            undoable: transition.is_undoable(),
            before: transition
                .touched_units()
                .into_iter()
                .filter_map(|id| board.unit(id).cloned())
                .collect(),
            spawned: transition.spawned_unit(),
        }
    }

    pub fn command(&self) -> &'static str {
        self.command
    }

    pub fn is_undoable(&self) -> bool {
        self.undoable
    }
}

/// Executes a transition through the three-phase pipeline.
#[inline]
fn drive_transition(
    transition: &dyn CommandTransition,
    board: &mut Board,
    config: &GameConfig,
) -> Result<(), TransitionPhaseError<CommandError>> {
    transition
        .pre_validate(board, config)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(board, config)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(board, config)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))
}

/// Applies commands to a board.
///
/// Execution is run-to-completion: a command either fully applies or, if
/// `apply` or `post_validate` fails, the touched units are rolled back and
/// the events it recorded are discarded.
pub struct CommandEngine<'a> {
    board: &'a mut Board,
    config: &'a GameConfig,
}

impl<'a> CommandEngine<'a> {
    pub fn new(board: &'a mut Board, config: &'a GameConfig) -> Self {
        Self { board, config }
    }

    pub fn execute(&mut self, command: &Command) -> Result<UndoRecord, ExecuteError> {
        let record = UndoRecord::capture(command, self.board);
        let mark = self.board.pending_events().len();

        match drive_transition(command.transition(), self.board, self.config) {
            Ok(()) => {
                debug!(target: "tactics::command", command = command.name(), "command executed");
                Ok(record)
            }
            Err(error) => {
                if error.phase != TransitionPhase::PreValidate {
                    self.roll_back(&record, mark);
                }
                warn!(
                    target: "tactics::command",
                    command = command.name(),
                    phase = error.phase.as_str(),
                    %error,
                    "command rejected"
                );
                Err(ExecuteError::Transition {
                    command: command.name(),
                    error,
                })
            }
        }
    }

    /// Reverts a previously executed command. Only valid while nothing
    /// else has touched the same units since.
    pub fn undo(&mut self, record: &UndoRecord) -> Result<(), CommandError> {
        if !record.undoable {
            return Err(CommandError::NotUndoable(record.command));
        }
        self.board.restore_units(&record.before, record.spawned)?;
        debug!(target: "tactics::command", command = record.command, "command undone");
        Ok(())
    }

    fn roll_back(&mut self, record: &UndoRecord, mark: usize) {
        if let Err(error) = self.board.restore_units(&record.before, record.spawned) {
            warn!(target: "tactics::command", command = record.command, %error, "rollback failed");
        }
        self.board.truncate_events(mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{AttackCommand, EndTurnCommand, MoveCommand, SpawnCommand};
    use crate::events::GameEvent;
    use crate::grid::{Coord, RectangularGenerator};
    use crate::unit::{UnitStats, UnitTemplate};

    fn setup() -> (Board, UnitId, UnitId) {
        let mut board = RectangularGenerator::new(4, 4).generate();
        let soldier = UnitTemplate::new("soldier", UnitStats::default());
        let a = board.spawn(&soldier, PlayerId(0), Coord::new(0, 0)).unwrap();
        let b = board.spawn(&soldier, PlayerId(1), Coord::new(1, 0)).unwrap();
        board.drain_events();
        (board, a, b)
    }

    #[test]
    fn pre_validate_failure_reports_phase() {
        let (mut board, a, _) = setup();
        let config = GameConfig::default();
        let mut engine = CommandEngine::new(&mut board, &config);

        let error = engine
            .execute(&MoveCommand::new(a, vec![Coord::new(1, 0)]).into())
            .unwrap_err();
        match error {
            ExecuteError::Transition { command, error } => {
                assert_eq!(command, "move");
                assert_eq!(error.phase, TransitionPhase::PreValidate);
                assert_eq!(error.error, CommandError::DestinationBlocked(Coord::new(1, 0)));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn undo_restores_move_and_attack() {
        let (mut board, a, b) = setup();
        let config = GameConfig::default();
        let original = board.clone();
        let mut engine = CommandEngine::new(&mut board, &config);

        let moved = engine
            .execute(&MoveCommand::new(a, vec![Coord::new(0, 1), Coord::new(1, 1)]).into())
            .unwrap();
        let attacked = engine.execute(&AttackCommand::new(a, b, 2).into()).unwrap();

        engine.undo(&attacked).unwrap();
        engine.undo(&moved).unwrap();

        for unit in original.units() {
            assert_eq!(board.unit(unit.id()), Some(unit));
        }
        board.check_occupancy().unwrap();
    }

    #[test]
    fn undo_removes_spawned_unit() {
        let (mut board, a, _) = setup();
        let config = GameConfig::default();
        let template = UnitTemplate::new("recruit", UnitStats::default());
        let spawn = SpawnCommand::next(&board, a, Coord::new(0, 1), template);
        let spawned = spawn.unit;
        let mut engine = CommandEngine::new(&mut board, &config);

        let record = engine.execute(&spawn.into()).unwrap();
        engine.undo(&record).unwrap();

        assert!(board.unit(spawned).is_none());
        assert_eq!(board.unit(a).unwrap().action_points, 1);
    }

    #[test]
    fn end_turn_cannot_be_undone() {
        let (mut board, _, _) = setup();
        let config = GameConfig::default();
        let mut engine = CommandEngine::new(&mut board, &config);

        let record = engine.execute(&EndTurnCommand::new(PlayerId(0)).into()).unwrap();
        assert_eq!(engine.undo(&record), Err(CommandError::NotUndoable("end_turn")));
    }

    #[test]
    fn lethal_attack_emits_destruction_once() {
        let (mut board, a, b) = setup();
        board.modify_health(b, -8).unwrap();
        board.drain_events();
        let config = GameConfig::default();
        let attack = AttackCommand::resolve(&board, &config, a, b).unwrap();
        let mut engine = CommandEngine::new(&mut board, &config);

        engine.execute(&attack.into()).unwrap();

        let events = board.drain_events();
        let destroyed = events
            .iter()
            .filter(|event| matches!(event, GameEvent::UnitDestroyed { unit, .. } if *unit == b))
            .count();
        let health = events
            .iter()
            .filter(|event| matches!(event, GameEvent::HealthChanged { .. }))
            .count();
        assert_eq!((destroyed, health), (1, 1));
    }
}
