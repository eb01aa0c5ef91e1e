use tactics_core::{GameResult, UnitId};

/// Interaction state of the controller.
///
/// ```text
/// BlockInput ──turn of a human player──▶ AwaitInput
/// AwaitInput ──click on a playable unit──▶ UnitSelected
/// UnitSelected ──click no ability wants──▶ AwaitInput
/// UnitSelected ──ability executes──▶ BlockInput ──▶ UnitSelected | AwaitInput
/// any ──end condition met──▶ GameEnded (terminal)
/// ```
#[derive(Clone, Debug, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(GridStateKind), derive(Hash, strum::Display))]
pub enum GridState {
    /// Commands are executing or another player is acting; input is ignored.
    BlockInput,
    /// Waiting for the current human player to pick a unit.
    AwaitInput,
    /// A unit is selected. `active` indexes the unit's abilities that can
    /// perform and therefore receive input.
    UnitSelected { unit: UnitId, active: Vec<usize> },
    GameEnded { result: GameResult },
}

impl GridState {
    pub fn kind(&self) -> GridStateKind {
        self.into()
    }

    pub fn selected_unit(&self) -> Option<UnitId> {
        match self {
            GridState::UnitSelected { unit, .. } => Some(*unit),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GridState::GameEnded { .. })
    }
}
