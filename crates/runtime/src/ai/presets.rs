//! Ready-made tree descriptions.
//!
//! Presets are plain [`NodeSpec`] values: they can be serialized, edited
//! and loaded back with [`super::AiPlayer::from_json`].
//!
//! ```text
//! aggressive()
//!   └─ Selector
//!       ├─ Sequence [enemy in range, attack]
//!       ├─ capture
//!       └─ Sequence [move toward enemies, try attack]
//! ```

use behavior_tree::NodeSpec;

use tactics_core::UnitTemplate;

use super::evaluator::{
    PositionEvaluatorSpec, TargetEvaluatorSpec, WeightedPosition, WeightedTarget,
};
use super::leaf::AiLeaf;

pub type AiTree = NodeSpec<AiLeaf>;

fn leaf(leaf: AiLeaf) -> AiTree {
    NodeSpec::leaf(leaf)
}

fn strike() -> AiLeaf {
    AiLeaf::attack_with(vec![
        WeightedTarget::new(TargetEvaluatorSpec::Damage, 1.0),
        WeightedTarget::new(TargetEvaluatorSpec::Health, 1.0),
    ])
}

/// Attacks whatever is in range, otherwise closes in on the nearest enemy
/// and attacks from there.
pub fn aggressive() -> AiTree {
    NodeSpec::selector(vec![
        NodeSpec::sequence(vec![leaf(AiLeaf::EnemyInRange), leaf(strike())]),
        leaf(AiLeaf::Capture),
        NodeSpec::sequence(vec![
            leaf(AiLeaf::move_with(vec![
                WeightedPosition::new(PositionEvaluatorSpec::Distance, 1.0),
                WeightedPosition::new(PositionEvaluatorSpec::Damage, 0.5),
            ])),
            NodeSpec::succeeder(leaf(strike())),
        ]),
    ])
}

/// Holds ground: attacks in range, retreats out of reach when wounded and
/// otherwise only advances to cells few enemies can hit.
pub fn defensive() -> AiTree {
    NodeSpec::selector(vec![
        NodeSpec::sequence(vec![
            leaf(AiLeaf::IsWounded { threshold: 0.5 }),
            leaf(AiLeaf::move_with(vec![
                WeightedPosition::new(PositionEvaluatorSpec::Threat, 1.0),
                WeightedPosition::new(PositionEvaluatorSpec::MovementFreedom, 0.25),
            ])),
        ]),
        NodeSpec::sequence(vec![
            leaf(AiLeaf::EnemyInRange),
            leaf(AiLeaf::attack_with(vec![WeightedTarget::new(
                TargetEvaluatorSpec::Health,
                1.0,
            )])),
        ]),
        leaf(AiLeaf::move_with(vec![
            WeightedPosition::new(PositionEvaluatorSpec::Distance, 0.5),
            WeightedPosition::new(PositionEvaluatorSpec::Threat, 1.0),
        ])),
    ])
}

/// Spawns `template` next to the acting structure every `every_turns`
/// turns, toward the enemy.
pub fn spawner(template: UnitTemplate, every_turns: u32) -> AiTree {
    NodeSpec::turn_delay(
        "spawn",
        every_turns,
        leaf(AiLeaf::Spawn {
            template,
            evaluators: vec![WeightedPosition::new(PositionEvaluatorSpec::Distance, 1.0)],
        }),
    )
}

/// Spawning structures and fighting units under one player.
pub fn army(template: UnitTemplate, every_turns: u32) -> AiTree {
    NodeSpec::selector(vec![aggressive(), spawner(template, every_turns)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::UnitStats;

    #[test]
    fn presets_are_valid() {
        let template = UnitTemplate::new("recruit", UnitStats::default());
        for tree in [aggressive(), defensive(), army(template, 2)] {
            assert_eq!(tree.validate(), Ok(()));
        }
    }

    #[test]
    fn presets_survive_json() {
        let tree = defensive();
        let json = serde_json::to_string(&tree).unwrap();
        let back: AiTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
