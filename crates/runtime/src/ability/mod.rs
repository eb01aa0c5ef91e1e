//! Unit abilities: input handlers that turn clicks into commands.
//!
//! While a unit is selected the controller forwards every click and hover
//! to the unit's active abilities. An ability answers with an
//! [`AbilityResponse`]; it never mutates the board itself. Commands it
//! produces go through the controller's execution funnel like any other.

mod attack;
mod capture;
mod heal;
mod movement;
mod spawn;

pub use attack::AttackAbility;
pub use capture::CaptureAbility;
pub use heal::HealAbility;
pub use movement::MoveAbility;
pub use spawn::SpawnAbility;

use std::fmt;

use tactics_core::{Board, Command, Coord, GameConfig, PathCache, Unit, UnitId};

use crate::config::InputMode;
use crate::presenter::Presenter;

/// Read-only view handed to abilities. `paths` is fresh for the current
/// board revision and belongs to `unit`.
#[derive(Clone, Copy)]
pub struct AbilityContext<'a> {
    pub unit: &'a Unit,
    pub board: &'a Board,
    pub paths: &'a PathCache,
    pub config: &'a GameConfig,
    pub input_mode: InputMode,
}

/// How an ability reacted to an input event.
#[derive(Clone, Debug, PartialEq)]
pub enum AbilityResponse {
    /// Not meant for this ability.
    Ignored,
    /// Handled without producing a command (e.g. a preview click).
    Consumed,
    /// Execute this command on behalf of the selected unit.
    Execute(Command),
}

/// Input handler attached to one unit.
///
/// On selection the controller calls [`Ability::on_selected`] and then
/// [`Ability::can_perform`]; only abilities that can perform receive input
/// and [`Ability::display`]. [`Ability::clean_up`] runs for every ability of
/// the unit when the selection ends.
pub trait Ability: Send + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Recomputes whatever the ability needs for this selection.
    fn on_selected(&mut self, _ctx: &AbilityContext<'_>) {}

    fn can_perform(&self, ctx: &AbilityContext<'_>) -> bool;

    fn display(&mut self, _ctx: &AbilityContext<'_>, _presenter: &mut dyn Presenter) {}

    fn on_unit_clicked(
        &mut self,
        _ctx: &AbilityContext<'_>,
        _presenter: &mut dyn Presenter,
        _target: UnitId,
    ) -> AbilityResponse {
        AbilityResponse::Ignored
    }

    fn on_cell_clicked(
        &mut self,
        _ctx: &AbilityContext<'_>,
        _presenter: &mut dyn Presenter,
        _cell: Coord,
    ) -> AbilityResponse {
        AbilityResponse::Ignored
    }

    fn on_cell_highlighted(
        &mut self,
        _ctx: &AbilityContext<'_>,
        _presenter: &mut dyn Presenter,
        _cell: Coord,
    ) {
    }

    fn on_cell_dehighlighted(
        &mut self,
        _ctx: &AbilityContext<'_>,
        _presenter: &mut dyn Presenter,
        _cell: Coord,
    ) {
    }

    fn on_unit_highlighted(
        &mut self,
        _ctx: &AbilityContext<'_>,
        _presenter: &mut dyn Presenter,
        _unit: UnitId,
    ) {
    }

    fn on_unit_dehighlighted(
        &mut self,
        _ctx: &AbilityContext<'_>,
        _presenter: &mut dyn Presenter,
        _unit: UnitId,
    ) {
    }

    /// Removes every marking this ability made and drops per-selection state.
    fn clean_up(&mut self, _presenter: &mut dyn Presenter) {}

    fn on_turn_start(&mut self, _unit: &Unit) {}

    fn on_turn_end(&mut self, _unit: &Unit) {}
}

/// The abilities a unit gets when none are registered explicitly.
pub fn default_abilities(board: &Board, unit: &Unit) -> Vec<Box<dyn Ability>> {
    let rules = board.rules_for(unit);
    let mut abilities: Vec<Box<dyn Ability>> = Vec::new();
    if rules.can_move(unit) {
        abilities.push(Box::new(MoveAbility::default()));
    }
    if rules.can_attack(unit) {
        abilities.push(Box::new(AttackAbility::default()));
    }
    if rules.can_move(unit) {
        abilities.push(Box::new(CaptureAbility::default()));
    }
    abilities
}

/// Two-step commit for [`InputMode::ConfirmToCommit`].
#[derive(Clone, Debug, Default)]
pub(crate) struct Confirmation<T> {
    pending: Option<T>,
}

impl<T: PartialEq + Copy> Confirmation<T> {
    /// Whether a click on `target` should commit now.
    pub(crate) fn commit(&mut self, mode: InputMode, target: T) -> bool {
        match mode {
            InputMode::Direct => true,
            InputMode::ConfirmToCommit => {
                if self.pending == Some(target) {
                    self.pending = None;
                    true
                } else {
                    self.pending = Some(target);
                    false
                }
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.pending = None;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_mode_commits_at_once() {
        let mut confirmation = Confirmation::default();
        assert!(confirmation.commit(InputMode::Direct, Coord::new(1, 1)));
    }

    #[test]
    fn confirm_mode_needs_two_clicks_on_the_same_target() {
        let mut confirmation = Confirmation::default();
        let mode = InputMode::ConfirmToCommit;
        assert!(!confirmation.commit(mode, Coord::new(1, 1)));
        assert!(!confirmation.commit(mode, Coord::new(2, 1)));
        assert!(confirmation.commit(mode, Coord::new(2, 1)));
        assert!(!confirmation.commit(mode, Coord::new(2, 1)));
    }
}
