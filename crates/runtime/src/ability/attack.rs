use tracing::warn;

use tactics_core::combat::targets_in_range;
use tactics_core::{AttackCommand, Coord, UnitId};

use super::{Ability, AbilityContext, AbilityResponse, Confirmation};
use crate::presenter::Presenter;

/// Attacks an enemy in range of the selected unit's cell.
#[derive(Debug, Default)]
pub struct AttackAbility {
    targets: Vec<UnitId>,
    confirmation: Confirmation<UnitId>,
}

impl AttackAbility {
    pub const NAME: &'static str = "attack";

    pub fn targets(&self) -> &[UnitId] {
        &self.targets
    }

    fn attack(
        &mut self,
        ctx: &AbilityContext<'_>,
        presenter: &mut dyn Presenter,
        target: UnitId,
    ) -> AbilityResponse {
        if !self.targets.contains(&target) {
            return AbilityResponse::Ignored;
        }
        if !self.confirmation.commit(ctx.input_mode, target) {
            presenter.mark_unit_targetable(target);
            return AbilityResponse::Consumed;
        }
        match AttackCommand::resolve(ctx.board, ctx.config, ctx.unit.id(), target) {
            Ok(command) => AbilityResponse::Execute(command.into()),
            Err(error) => {
                warn!(target: "tactics::ability", unit = %ctx.unit.id(), %error, "attack not resolvable");
                AbilityResponse::Ignored
            }
        }
    }
}

impl Ability for AttackAbility {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_selected(&mut self, ctx: &AbilityContext<'_>) {
        self.confirmation.reset();
        self.targets = if ctx.unit.action_points > 0 {
            targets_in_range(ctx.board, ctx.unit, ctx.unit.cell())
        } else {
            Vec::new()
        };
    }

    fn can_perform(&self, _ctx: &AbilityContext<'_>) -> bool {
        !self.targets.is_empty()
    }

    fn display(&mut self, _ctx: &AbilityContext<'_>, presenter: &mut dyn Presenter) {
        for target in &self.targets {
            presenter.mark_unit_targetable(*target);
        }
    }

    fn on_unit_clicked(
        &mut self,
        ctx: &AbilityContext<'_>,
        presenter: &mut dyn Presenter,
        target: UnitId,
    ) -> AbilityResponse {
        self.attack(ctx, presenter, target)
    }

    fn on_cell_clicked(
        &mut self,
        ctx: &AbilityContext<'_>,
        presenter: &mut dyn Presenter,
        cell: Coord,
    ) -> AbilityResponse {
        let target = ctx
            .board
            .units_at(cell)
            .map(|unit| unit.id())
            .find(|unit| self.targets.contains(unit));
        match target {
            Some(target) => self.attack(ctx, presenter, target),
            None => AbilityResponse::Ignored,
        }
    }

    fn clean_up(&mut self, presenter: &mut dyn Presenter) {
        for target in self.targets.drain(..) {
            presenter.unmark_unit(target);
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
    fn clicking_an_adjacent_enemy_attacks_it() {
        let (board, ours, theirs) = duel();
        let cache = paths(&board, ours);
        let config = config();
        let ctx = AbilityContext {
            unit: board.unit(ours).unwrap(),
            board: &board,
            paths: &cache,
            config: &config,
            input_mode: InputMode::Direct,
        };
        let mut ability = AttackAbility::default();
        let mut marks = Marks::default();

        ability.on_selected(&ctx);
        ability.display(&ctx, &mut marks);

        assert!(ability.can_perform(&ctx));
        assert_eq!(marks.targetable, vec![theirs]);
        assert_eq!(
            ability.on_unit_clicked(&ctx, &mut marks, ours),
            AbilityResponse::Ignored
        );
        match ability.on_cell_clicked(&ctx, &mut marks, Coord::new(1, 0)) {
            AbilityResponse::Execute(Command::Attack(command)) => {
                assert_eq!((command.attacker, command.target), (ours, theirs));
                assert_eq!(command.damage, 2);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn no_action_points_means_no_targets() {
        let (mut board, ours, _) = duel();
        board.unit_mut(ours).unwrap().action_points = 0;
        let cache = paths(&board, ours);
        let config = config();
        let ctx = AbilityContext {
            unit: board.unit(ours).unwrap(),
            board: &board,
            paths: &cache,
            config: &config,
            input_mode: InputMode::Direct,
        };
        let mut ability = AttackAbility::default();

        ability.on_selected(&ctx);

        assert!(!ability.can_perform(&ctx));
    }
}
