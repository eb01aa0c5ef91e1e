use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::grid::Board;
use crate::unit::UnitId;

use super::payload::{PayloadReader, PayloadWriter};
use super::{
    Actor, CommandError, CommandTransition, Payload, require_action_point, spend_action_point,
    unit_of,
};

/// Restores health of a wounded ally within the healer's range.
#[derive(Clone, Debug, PartialEq)]
pub struct HealCommand {
    pub healer: UnitId,
    pub target: UnitId,
    pub amount: i32,
}

impl HealCommand {
    pub const NAME: &'static str = "heal";

    pub fn new(healer: UnitId, target: UnitId, amount: i32) -> Self {
        Self {
            healer,
            target,
            amount,
        }
    }

    pub(crate) fn from_payload(reader: &PayloadReader<'_>) -> Result<Self, CommandError> {
        Ok(Self::new(
            reader.unit("healer")?,
            reader.unit("target")?,
            reader.int("amount")?,
        ))
    }
}

impl CommandTransition for HealCommand {
    fn actor(&self) -> Actor {
        Actor::Unit(self.healer)
    }

    fn touched_units(&self) -> Vec<UnitId> {
        vec![self.healer, self.target]
    }

    fn pre_validate(&self, board: &Board, _config: &GameConfig) -> Result<(), CommandError> {
        let healer = unit_of(board, self.healer)?;
        let target = unit_of(board, self.target)?;
        require_action_point(healer)?;

        let healable = self.amount > 0
            && healer.player == target.player
            && target.health < target.stats.max_health
            && board.distance(healer.cell(), target.cell()) <= healer.stats.attack_range;
        if !healable {
            return Err(CommandError::NotHealable {
                healer: self.healer,
                target: self.target,
            });
        }
        Ok(())
    }

    fn apply(&self, board: &mut Board, _config: &GameConfig) -> Result<(), CommandError> {
        spend_action_point(board, self.healer)?;
        board.emit(GameEvent::UnitHealed {
            healer: self.healer,
            target: self.target,
            amount: self.amount,
        });
        board.modify_health(self.target, self.amount)?;
        Ok(())
    }

    fn to_payload(&self) -> Payload {
        PayloadWriter::new(Self::NAME)
            .unit("healer", self.healer)
            .unit("target", self.target)
            .int("amount", self.amount)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Coord, RectangularGenerator};
    use crate::unit::{PlayerId, UnitStats, UnitTemplate};

    #[test]
    fn heal_is_capped_and_limited_to_wounded_allies() {
        let mut board = RectangularGenerator::new(3, 1).generate();
        let soldier = UnitTemplate::new("soldier", UnitStats::default());
        let medic = board.spawn(&soldier, PlayerId(0), Coord::new(0, 0)).unwrap();
        let ally = board.spawn(&soldier, PlayerId(0), Coord::new(1, 0)).unwrap();
        let enemy = board.spawn(&soldier, PlayerId(1), Coord::new(2, 0)).unwrap();
        let config = GameConfig::default();

        assert!(HealCommand::new(medic, ally, 3).pre_validate(&board, &config).is_err());

        board.modify_health(ally, -2).unwrap();
        board.modify_health(enemy, -2).unwrap();
        assert!(HealCommand::new(medic, enemy, 3).pre_validate(&board, &config).is_err());

        let heal = HealCommand::new(medic, ally, 3);
        heal.pre_validate(&board, &config).unwrap();
        heal.apply(&mut board, &config).unwrap();
        assert_eq!(board.unit(ally).unwrap().health, 10);
    }
}
