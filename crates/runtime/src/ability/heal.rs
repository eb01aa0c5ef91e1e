use tactics_core::{CommandTransition, HealCommand, UnitId};

use super::{Ability, AbilityContext, AbilityResponse, Confirmation};
use crate::presenter::Presenter;

/// Restores health of a wounded ally in range.
#[derive(Debug)]
pub struct HealAbility {
    amount: i32,
    targets: Vec<UnitId>,
    confirmation: Confirmation<UnitId>,
}

impl HealAbility {
    pub const NAME: &'static str = "heal";

    pub fn new(amount: i32) -> Self {
        Self {
            amount,
            targets: Vec::new(),
            confirmation: Confirmation::default(),
        }
    }

    pub fn targets(&self) -> &[UnitId] {
        &self.targets
    }
}

impl Ability for HealAbility {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_selected(&mut self, ctx: &AbilityContext<'_>) {
        self.confirmation.reset();
        let healer = ctx.unit.id();
        self.targets = ctx
            .board
            .units_of(ctx.unit.player)
            .map(|ally| ally.id())
            .filter(|ally| {
                HealCommand::new(healer, *ally, self.amount)
                    .pre_validate(ctx.board, ctx.config)
                    .is_ok()
            })
            .collect();
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
        _presenter: &mut dyn Presenter,
        target: UnitId,
    ) -> AbilityResponse {
        if !self.targets.contains(&target) {
            return AbilityResponse::Ignored;
        }
        if self.confirmation.commit(ctx.input_mode, target) {
            AbilityResponse::Execute(HealCommand::new(ctx.unit.id(), target, self.amount).into())
        } else {
            AbilityResponse::Consumed
        }
    }

    fn clean_up(&mut self, presenter: &mut dyn Presenter) {
        for target in self.targets.drain(..) {
            presenter.unmark_unit(target);
        }
        self.confirmation.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Marks, config, paths};
    use super::*;
    use crate::config::InputMode;
    use tactics_core::{Coord, PlayerId, RectangularGenerator, UnitStats, UnitTemplate};

    #[test]
    fn only_wounded_allies_in_range_are_targets() {
        let mut board = RectangularGenerator::new(4, 4).generate();
        let soldier = UnitTemplate::new("soldier", UnitStats::default());
        let medic = board.spawn(&soldier, PlayerId(0), Coord::new(0, 0)).unwrap();
        let wounded = board.spawn(&soldier, PlayerId(0), Coord::new(1, 0)).unwrap();
        let healthy = board.spawn(&soldier, PlayerId(0), Coord::new(0, 1)).unwrap();
        let distant = board.spawn(&soldier, PlayerId(0), Coord::new(3, 3)).unwrap();
        board.modify_health(wounded, -4).unwrap();
        board.modify_health(distant, -4).unwrap();
        let cache = paths(&board, medic);
        let config = config();
        let ctx = AbilityContext {
            unit: board.unit(medic).unwrap(),
            board: &board,
            paths: &cache,
            config: &config,
            input_mode: InputMode::Direct,
        };
        let mut ability = HealAbility::new(3);
        let mut marks = Marks::default();

        ability.on_selected(&ctx);

        assert_eq!(ability.targets(), &[wounded]);
        assert_eq!(
            ability.on_unit_clicked(&ctx, &mut marks, healthy),
            AbilityResponse::Ignored
        );
        assert!(matches!(
            ability.on_unit_clicked(&ctx, &mut marks, wounded),
            AbilityResponse::Execute(_)
        ));
    }
}
