use tracing::warn;

use tactics_core::{Coord, MoveCommand};

use super::{Ability, AbilityContext, AbilityResponse, Confirmation};
use crate::presenter::Presenter;

/// Moves the selected unit to a reachable cell.
#[derive(Debug, Default)]
pub struct MoveAbility {
    destinations: Vec<Coord>,
    preview: Vec<Coord>,
    confirmation: Confirmation<Coord>,
}

impl MoveAbility {
    pub const NAME: &'static str = "move";

    pub fn destinations(&self) -> &[Coord] {
        &self.destinations
    }

    fn path_to(ctx: &AbilityContext<'_>, cell: Coord) -> Vec<Coord> {
        ctx.paths.find_path(ctx.board, cell).unwrap_or_else(|error| {
            warn!(target: "tactics::ability", unit = %ctx.unit.id(), %error, "path lookup failed");
            Vec::new()
        })
    }

    fn clear_preview(&mut self, presenter: &mut dyn Presenter) {
        for cell in self.preview.drain(..) {
            if self.destinations.contains(&cell) {
                presenter.mark_cell_reachable(cell);
            } else {
                presenter.unmark_cell(cell);
            }
        }
    }
}

impl Ability for MoveAbility {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_selected(&mut self, ctx: &AbilityContext<'_>) {
        self.confirmation.reset();
        self.preview.clear();
        self.destinations = ctx
            .paths
            .available_destinations(ctx.board, ctx.unit.movement_points)
            .unwrap_or_else(|error| {
                warn!(target: "tactics::ability", unit = %ctx.unit.id(), %error, "no destinations");
                Vec::new()
            });
    }

    fn can_perform(&self, ctx: &AbilityContext<'_>) -> bool {
        ctx.board.rules_for(ctx.unit).can_move(ctx.unit)
            && ctx.unit.movement_points > 0.0
            && !self.destinations.is_empty()
    }

    fn display(&mut self, _ctx: &AbilityContext<'_>, presenter: &mut dyn Presenter) {
        for cell in &self.destinations {
            presenter.mark_cell_reachable(*cell);
        }
    }

    fn on_cell_clicked(
        &mut self,
        ctx: &AbilityContext<'_>,
        presenter: &mut dyn Presenter,
        cell: Coord,
    ) -> AbilityResponse {
        if !self.destinations.contains(&cell) {
            return AbilityResponse::Ignored;
        }
        let path = Self::path_to(ctx, cell);
        if path.is_empty() {
            return AbilityResponse::Ignored;
        }
        if self.confirmation.commit(ctx.input_mode, cell) {
            AbilityResponse::Execute(MoveCommand::new(ctx.unit.id(), path).into())
        } else {
            self.clear_preview(presenter);
            presenter.mark_path(&path);
            self.preview = path;
            AbilityResponse::Consumed
        }
    }

    fn on_cell_highlighted(
        &mut self,
        ctx: &AbilityContext<'_>,
        presenter: &mut dyn Presenter,
        cell: Coord,
    ) {
        if !self.destinations.contains(&cell) {
            return;
        }
        self.clear_preview(presenter);
        let path = Self::path_to(ctx, cell);
        presenter.mark_path(&path);
        self.preview = path;
    }

    fn on_cell_dehighlighted(
        &mut self,
        _ctx: &AbilityContext<'_>,
        presenter: &mut dyn Presenter,
        _cell: Coord,
    ) {
        self.clear_preview(presenter);
    }

    fn clean_up(&mut self, presenter: &mut dyn Presenter) {
        for cell in self.preview.drain(..).chain(self.destinations.drain(..)) {
            presenter.unmark_cell(cell);
        }
        self.confirmation.reset();
    }

    fn on_turn_end(&mut self, _unit: &tactics_core::Unit) {
        self.confirmation.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Marks, config, duel, paths};
    use super::*;
    use crate::config::InputMode;
    use tactics_core::Command;

    #[test]
    fn destinations_respect_movement_and_blocking() {
        let (board, ours, _) = duel();
        let cache = paths(&board, ours);
        let config = config();
        let ctx = AbilityContext {
            unit: board.unit(ours).unwrap(),
            board: &board,
            paths: &cache,
            config: &config,
            input_mode: InputMode::Direct,
        };
        let mut ability = MoveAbility::default();

        ability.on_selected(&ctx);

        assert!(ability.can_perform(&ctx));
        assert!(!ability.destinations().contains(&Coord::new(1, 0)));
        assert!(ability.destinations().contains(&Coord::new(0, 3)));
        assert!(!ability.destinations().contains(&Coord::new(3, 3)));
    }

    #[test]
    fn click_executes_move_along_cached_path() {
        let (board, ours, _) = duel();
        let cache = paths(&board, ours);
        let config = config();
        let ctx = AbilityContext {
            unit: board.unit(ours).unwrap(),
            board: &board,
            paths: &cache,
            config: &config,
            input_mode: InputMode::Direct,
        };
        let mut ability = MoveAbility::default();
        let mut marks = Marks::default();
        ability.on_selected(&ctx);

        assert_eq!(
            ability.on_cell_clicked(&ctx, &mut marks, Coord::new(3, 3)),
            AbilityResponse::Ignored
        );
        match ability.on_cell_clicked(&ctx, &mut marks, Coord::new(0, 2)) {
            AbilityResponse::Execute(Command::Move(command)) => {
                assert_eq!(command.path, vec![Coord::new(0, 1), Coord::new(0, 2)]);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn confirm_mode_previews_first() {
        let (board, ours, _) = duel();
        let cache = paths(&board, ours);
        let config = config();
        let ctx = AbilityContext {
            unit: board.unit(ours).unwrap(),
            board: &board,
            paths: &cache,
            config: &config,
            input_mode: InputMode::ConfirmToCommit,
        };
        let mut ability = MoveAbility::default();
        let mut marks = Marks::default();
        ability.on_selected(&ctx);

        let first = ability.on_cell_clicked(&ctx, &mut marks, Coord::new(0, 1));
        let second = ability.on_cell_clicked(&ctx, &mut marks, Coord::new(0, 1));

        assert_eq!(first, AbilityResponse::Consumed);
        assert_eq!(marks.paths, vec![vec![Coord::new(0, 1)]]);
        assert!(matches!(second, AbilityResponse::Execute(Command::Move(_))));
    }

    #[test]
    fn clean_up_unmarks_everything() {
        let (board, ours, _) = duel();
        let cache = paths(&board, ours);
        let config = config();
        let ctx = AbilityContext {
            unit: board.unit(ours).unwrap(),
            board: &board,
            paths: &cache,
            config: &config,
            input_mode: InputMode::Direct,
        };
        let mut ability = MoveAbility::default();
        let mut marks = Marks::default();
        ability.on_selected(&ctx);
        ability.display(&ctx, &mut marks);

        let shown = marks.reachable.len();
        ability.clean_up(&mut marks);

        assert_eq!(marks.unmarked_cells.len(), shown);
        assert!(ability.destinations().is_empty());
    }
}
