use tactics_core::{Coord, CommandTransition, SpawnCommand, UnitTemplate};

use super::{Ability, AbilityContext, AbilityResponse, Confirmation};
use crate::presenter::Presenter;

/// Creates a unit from a template next to (or on) the selected unit.
#[derive(Debug)]
pub struct SpawnAbility {
    template: UnitTemplate,
    cells: Vec<Coord>,
    confirmation: Confirmation<Coord>,
}

impl SpawnAbility {
    pub const NAME: &'static str = "spawn";

    pub fn new(template: UnitTemplate) -> Self {
        Self {
            template,
            cells: Vec::new(),
            confirmation: Confirmation::default(),
        }
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }
}

impl Ability for SpawnAbility {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_selected(&mut self, ctx: &AbilityContext<'_>) {
        self.confirmation.reset();
        let origin = ctx.unit.cell();
        let candidates = std::iter::once(origin)
            .chain(ctx.board.neighbours(origin).map(|cell| cell.coord()));
        self.cells = candidates
            .filter(|cell| {
                SpawnCommand::next(ctx.board, ctx.unit.id(), *cell, self.template.clone())
                    .pre_validate(ctx.board, ctx.config)
                    .is_ok()
            })
            .collect();
    }

    fn can_perform(&self, _ctx: &AbilityContext<'_>) -> bool {
        !self.cells.is_empty()
    }

    fn display(&mut self, _ctx: &AbilityContext<'_>, presenter: &mut dyn Presenter) {
        for cell in &self.cells {
            presenter.mark_cell_reachable(*cell);
        }
    }

    fn on_cell_clicked(
        &mut self,
        ctx: &AbilityContext<'_>,
        _presenter: &mut dyn Presenter,
        cell: Coord,
    ) -> AbilityResponse {
        if !self.cells.contains(&cell) {
            return AbilityResponse::Ignored;
        }
        if self.confirmation.commit(ctx.input_mode, cell) {
            let command = SpawnCommand::next(ctx.board, ctx.unit.id(), cell, self.template.clone());
            AbilityResponse::Execute(command.into())
        } else {
            AbilityResponse::Consumed
        }
    }

    fn clean_up(&mut self, presenter: &mut dyn Presenter) {
        for cell in self.cells.drain(..) {
            presenter.unmark_cell(cell);
        }
        self.confirmation.reset();
    }
}
