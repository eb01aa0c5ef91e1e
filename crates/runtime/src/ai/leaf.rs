//! Leaf vocabulary of AI behavior trees.
//!
//! Trees are described as `NodeSpec<AiLeaf>` and interpreted against an
//! [`AiContext`]. Action leaves score their candidates with the weighted
//! evaluators they carry and execute one command; condition leaves only
//! read the board.

use behavior_tree::{Behavior, Status};
use serde::{Deserialize, Serialize};

use tactics_core::UnitTemplate;
use tactics_core::combat::targets_in_range;

use super::actions;
use super::context::AiContext;
use super::evaluator::{WeightedPosition, WeightedTarget};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AiLeaf {
    /// Moves toward the best scoring cell, stopping at the best cell the
    /// unit can reach this turn along the way.
    Move {
        #[serde(default)]
        evaluators: Vec<WeightedPosition>,
    },
    /// Attacks the best scoring enemy in range.
    Attack {
        #[serde(default)]
        evaluators: Vec<WeightedTarget>,
    },
    /// Captures an enemy structure sharing the unit's cell.
    Capture,
    /// Spawns `template` on the best scoring free cell around the unit.
    Spawn {
        template: UnitTemplate,
        #[serde(default)]
        evaluators: Vec<WeightedPosition>,
    },
    /// Heals the most wounded ally in range.
    Heal { amount: i32 },

    HasActionPoints,
    HasMovementPoints,
    EnemyInRange,
    /// Health below `threshold` of the maximum.
    IsWounded { threshold: f32 },
}

impl AiLeaf {
    pub fn move_with(evaluators: Vec<WeightedPosition>) -> Self {
        AiLeaf::Move { evaluators }
    }

    pub fn attack_with(evaluators: Vec<WeightedTarget>) -> Self {
        AiLeaf::Attack { evaluators }
    }

    pub fn is_action(&self) -> bool {
        matches!(
            self,
            AiLeaf::Move { .. }
                | AiLeaf::Attack { .. }
                | AiLeaf::Capture
                | AiLeaf::Spawn { .. }
                | AiLeaf::Heal { .. }
        )
    }
}

impl<'a> Behavior<AiContext<'a>> for AiLeaf {
    fn tick(&self, ctx: &mut AiContext<'a>) -> Status {
        match self {
            AiLeaf::Move { evaluators } => actions::move_unit(ctx, evaluators),
            AiLeaf::Attack { evaluators } => actions::attack(ctx, evaluators),
            AiLeaf::Capture => actions::capture(ctx),
            AiLeaf::Spawn {
                template,
                evaluators,
            } => actions::spawn(ctx, template, evaluators),
            AiLeaf::Heal { amount } => actions::heal(ctx, *amount),
            AiLeaf::HasActionPoints => {
                Status::from(ctx.actor().is_some_and(|unit| unit.action_points > 0))
            }
            AiLeaf::HasMovementPoints => {
                Status::from(ctx.actor().is_some_and(|unit| unit.movement_points > 0.0))
            }
            AiLeaf::EnemyInRange => Status::from(ctx.actor().is_some_and(|unit| {
                unit.action_points > 0
                    && !targets_in_range(ctx.board(), unit, unit.cell()).is_empty()
            })),
            AiLeaf::IsWounded { threshold } => Status::from(ctx.actor().is_some_and(|unit| {
                unit.stats.max_health > 0
                    && (unit.health as f32 / unit.stats.max_health as f32) < *threshold
            })),
        }
    }
}
