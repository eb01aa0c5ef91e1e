//! Commands: immutable, serializable units of game work.
//!
//! Every built-in command implements [`CommandTransition`], the three-phase
//! contract driven by [`CommandEngine`]: `pre_validate` checks the board
//! before mutation, `apply` mutates it, `post_validate` checks the result
//! (occupancy consistency by default). The closed [`Command`] enum wraps the
//! built-in kinds so that serialization can match exhaustively.

mod combat;
mod engine;
mod error;
mod movement;
mod payload;
mod structure;
mod support;
mod turn;

pub use combat::{AttackCommand, MultiAttackCommand};
pub use engine::{CommandEngine, ExecuteError, TransitionPhase, TransitionPhaseError, UndoRecord};
pub use error::CommandError;
pub use movement::{ChargeCommand, MoveCommand};
pub use payload::{Payload, TYPE_KEY};
pub use structure::{CaptureCommand, SpawnCommand};
pub use support::HealCommand;
pub use turn::EndTurnCommand;

use crate::config::GameConfig;
use crate::grid::Board;
use crate::unit::{PlayerId, Unit, UnitId};

use payload::PayloadReader;

/// Who issues a command. Authorization compares the owning player with
/// the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Actor {
    Unit(UnitId),
    Player(PlayerId),
}

impl Actor {
    /// Owning player, looked up on the board for unit actors.
    pub fn player(&self, board: &Board) -> Option<PlayerId> {
        match self {
            Actor::Unit(id) => board.unit(*id).map(|unit| unit.player),
            Actor::Player(player) => Some(*player),
        }
    }

    pub fn unit(&self) -> Option<UnitId> {
        match self {
            Actor::Unit(id) => Some(*id),
            Actor::Player(_) => None,
        }
    }
}

/// Three-phase transition contract shared by all commands.
pub trait CommandTransition {
    fn actor(&self) -> Actor;

    /// Units whose state the command may change. Their before-images make
    /// up the undo record.
    fn touched_units(&self) -> Vec<UnitId>;

    /// Id of the unit the command creates, if any.
    fn spawned_unit(&self) -> Option<UnitId> {
        None
    }

    fn is_undoable(&self) -> bool {
        true
    }

    /// Validates pre-conditions against the board **before** mutation.
    fn pre_validate(&self, _board: &Board, _config: &GameConfig) -> Result<(), CommandError> {
        Ok(())
    }

    /// Mutates the board. Assumes `pre_validate` succeeded.
    fn apply(&self, board: &mut Board, config: &GameConfig) -> Result<(), CommandError>;

    /// Validates post-conditions against the board **after** mutation.
    fn post_validate(&self, board: &Board, _config: &GameConfig) -> Result<(), CommandError> {
        board.check_occupancy().map_err(CommandError::from)
    }

    fn to_payload(&self) -> Payload;
}

/// Built-in commands.
#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    Move(MoveCommand),
    Attack(AttackCommand),
    MultiAttack(MultiAttackCommand),
    Capture(CaptureCommand),
    Spawn(SpawnCommand),
    Heal(HealCommand),
    Charge(ChargeCommand),
    EndTurn(EndTurnCommand),
}

impl Command {
    /// Stable name, also used as the payload `type`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn transition(&self) -> &dyn CommandTransition {
        match self {
            Command::Move(command) => command,
            Command::Attack(command) => command,
            Command::MultiAttack(command) => command,
            Command::Capture(command) => command,
            Command::Spawn(command) => command,
            Command::Heal(command) => command,
            Command::Charge(command) => command,
            Command::EndTurn(command) => command,
        }
    }

    pub fn actor(&self) -> Actor {
        self.transition().actor()
    }

    pub fn ends_turn(&self) -> bool {
        matches!(self, Command::EndTurn(_))
    }

    pub fn serialize(&self) -> Payload {
        self.transition().to_payload()
    }

    /// Rebuilds a command from its payload, resolving every unit and cell
    /// reference against `board`. References to missing units or cells
    /// are invalid usage.
    pub fn deserialize(payload: &Payload, board: &Board) -> Result<Self, CommandError> {
        let reader = PayloadReader::new(payload, board);
        let kind = PayloadReader::kind(payload)?;
        let command = match kind {
            MoveCommand::NAME => Command::Move(MoveCommand::from_payload(&reader)?),
            AttackCommand::NAME => Command::Attack(AttackCommand::from_payload(&reader)?),
            MultiAttackCommand::NAME => {
                Command::MultiAttack(MultiAttackCommand::from_payload(&reader)?)
            }
            CaptureCommand::NAME => Command::Capture(CaptureCommand::from_payload(&reader)?),
            SpawnCommand::NAME => Command::Spawn(SpawnCommand::from_payload(&reader)?),
            HealCommand::NAME => Command::Heal(HealCommand::from_payload(&reader)?),
            ChargeCommand::NAME => Command::Charge(ChargeCommand::from_payload(&reader)?),
            EndTurnCommand::NAME => Command::EndTurn(EndTurnCommand::from_payload(&reader)?),
            other => return Err(CommandError::UnknownCommand(other.into())),
        };
        Ok(command)
    }
}

macro_rules! impl_from_command {
    ($($kind:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$kind> for Command {
                fn from(command: $kind) -> Self {
                    Command::$variant(command)
                }
            }
        )*
    };
}

impl_from_command! {
    MoveCommand => Move,
    AttackCommand => Attack,
    MultiAttackCommand => MultiAttack,
    CaptureCommand => Capture,
    SpawnCommand => Spawn,
    HealCommand => Heal,
    ChargeCommand => Charge,
    EndTurnCommand => EndTurn,
}

// ===== helpers shared by the command kinds =====

pub(crate) fn unit_of(board: &Board, id: UnitId) -> Result<&Unit, CommandError> {
    board.unit(id).ok_or(CommandError::UnitNotFound(id))
}

pub(crate) fn require_action_point(unit: &Unit) -> Result<(), CommandError> {
    if unit.action_points == 0 {
        return Err(CommandError::NoActionPoints(unit.id()));
    }
    Ok(())
}

pub(crate) fn spend_action_point(board: &mut Board, id: UnitId) -> Result<(), CommandError> {
    let unit = board.unit_mut(id).ok_or(CommandError::UnitNotFound(id))?;
    unit.action_points = unit.action_points.saturating_sub(1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Coord, RectangularGenerator};
    use crate::unit::{UnitStats, UnitTemplate};

    fn board() -> Board {
        let mut board = RectangularGenerator::new(4, 4).generate();
        let soldier = UnitTemplate::new("soldier", UnitStats::default());
        board.spawn(&soldier, PlayerId(0), Coord::new(0, 0)).unwrap();
        board.spawn(&soldier, PlayerId(1), Coord::new(1, 0)).unwrap();
        board
    }

    #[test]
    fn names_match_payload_type() {
        let board = board();
        let commands: Vec<Command> = vec![
            MoveCommand::new(UnitId(0), vec![Coord::new(0, 1)]).into(),
            AttackCommand::new(UnitId(0), UnitId(1), 2).into(),
            EndTurnCommand::new(PlayerId(0)).into(),
        ];
        for command in commands {
            let payload = command.serialize();
            assert_eq!(payload[TYPE_KEY], command.name());
            assert_eq!(Command::deserialize(&payload, &board).unwrap(), command);
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut payload = Payload::new();
        payload.insert(TYPE_KEY.into(), "teleport".into());
        assert_eq!(
            Command::deserialize(&payload, &board()),
            Err(CommandError::UnknownCommand("teleport".into()))
        );
    }

    #[test]
    fn actors_resolve_to_owning_player() {
        let board = board();
        assert_eq!(Actor::Unit(UnitId(1)).player(&board), Some(PlayerId(1)));
        assert_eq!(Actor::Unit(UnitId(9)).player(&board), None);
        assert_eq!(Actor::Player(PlayerId(3)).player(&board), Some(PlayerId(3)));
    }
}
