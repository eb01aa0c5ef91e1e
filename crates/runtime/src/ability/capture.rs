use tactics_core::{CaptureCommand, Coord, UnitId};

use super::{Ability, AbilityContext, AbilityResponse, Confirmation};
use crate::presenter::Presenter;

/// Captures an enemy structure on the selected unit's cell.
#[derive(Debug, Default)]
pub struct CaptureAbility {
    structures: Vec<UnitId>,
    confirmation: Confirmation<UnitId>,
}

impl CaptureAbility {
    pub const NAME: &'static str = "capture";

    fn capture(&mut self, ctx: &AbilityContext<'_>, structure: UnitId) -> AbilityResponse {
        if !self.structures.contains(&structure) {
            return AbilityResponse::Ignored;
        }
        if self.confirmation.commit(ctx.input_mode, structure) {
            AbilityResponse::Execute(CaptureCommand::new(ctx.unit.id(), structure).into())
        } else {
            AbilityResponse::Consumed
        }
    }
}

impl Ability for CaptureAbility {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_selected(&mut self, ctx: &AbilityContext<'_>) {
        self.confirmation.reset();
        self.structures.clear();
        if ctx.unit.action_points == 0 {
            return;
        }
        self.structures = ctx
            .board
            .units_at(ctx.unit.cell())
            .filter(|other| {
                other.player != ctx.unit.player && ctx.board.rules_for(other).is_capturable(other)
            })
            .map(|other| other.id())
            .collect();
    }

    fn can_perform(&self, _ctx: &AbilityContext<'_>) -> bool {
        !self.structures.is_empty()
    }

    fn display(&mut self, _ctx: &AbilityContext<'_>, presenter: &mut dyn Presenter) {
        for structure in &self.structures {
            presenter.mark_unit_targetable(*structure);
        }
    }

    fn on_unit_clicked(
        &mut self,
        ctx: &AbilityContext<'_>,
        _presenter: &mut dyn Presenter,
        target: UnitId,
    ) -> AbilityResponse {
        self.capture(ctx, target)
    }

    /// Clicking the unit's own cell captures the first structure there.
    fn on_cell_clicked(
        &mut self,
        ctx: &AbilityContext<'_>,
        _presenter: &mut dyn Presenter,
        cell: Coord,
    ) -> AbilityResponse {
        match self.structures.first() {
            Some(structure) if cell == ctx.unit.cell() => self.capture(ctx, *structure),
            _ => AbilityResponse::Ignored,
        }
    }

    fn clean_up(&mut self, presenter: &mut dyn Presenter) {
        for structure in self.structures.drain(..) {
            presenter.unmark_unit(structure);
        }
        self.confirmation.reset();
    }
}
