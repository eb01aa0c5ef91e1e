//! Presentation hooks.
//!
//! The controller and abilities describe what should be shown through this
//! trait; rendering, animation and sound stay outside the runtime. Every
//! method defaults to a no-op so a presenter only implements what it draws.

use tactics_core::{Coord, GameEvent, UnitId};

pub trait Presenter: Send {
    fn mark_cell_highlighted(&mut self, _cell: Coord) {}

    fn mark_cell_reachable(&mut self, _cell: Coord) {}

    fn mark_path(&mut self, _path: &[Coord]) {}

    /// Clears any marking on `cell`.
    fn unmark_cell(&mut self, _cell: Coord) {}

    fn mark_unit_selected(&mut self, _unit: UnitId) {}

    fn mark_unit_deselected(&mut self, _unit: UnitId) {}

    /// The unit has nothing left to do this turn.
    fn mark_unit_finished(&mut self, _unit: UnitId) {}

    /// An enemy the selected unit can act on.
    fn mark_unit_targetable(&mut self, _unit: UnitId) {}

    fn unmark_unit(&mut self, _unit: UnitId) {}

    fn animate_move(&mut self, _unit: UnitId, _path: &[Coord]) {}

    fn animate_attack(&mut self, _attacker: UnitId, _target: UnitId) {}

    fn animate_destroyed(&mut self, _unit: UnitId) {}

    /// Receives every published event after the specific hooks above.
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// Presenter that draws nothing. Used by headless matches and servers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

/// Routes an event to the matching animation hook, then to `on_event`.
pub(crate) fn present(presenter: &mut dyn Presenter, event: &GameEvent) {
    match event {
        GameEvent::UnitMoved { unit, path, .. } => presenter.animate_move(*unit, path),
        GameEvent::UnitAttacked {
            attacker, target, ..
        } => presenter.animate_attack(*attacker, *target),
        GameEvent::UnitDestroyed { unit, .. } => presenter.animate_destroyed(*unit),
        _ => {}
    }
    presenter.on_event(event);
}
