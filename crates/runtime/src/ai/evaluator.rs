//! Scoring of candidate cells and targets.
//!
//! Evaluators are stateful: [`PositionEvaluator::initialize`] (or the
//! target counterpart) runs at the start of every scoring pass and replaces
//! whatever the previous pass cached, typically a normalization maximum.
//! Scores are combined as a weighted sum by [`PositionScorer`] and
//! [`TargetScorer`].

use std::fmt;

use serde::{Deserialize, Serialize};

use tactics_core::combat::{damage_between, is_attackable_from};
use tactics_core::{Board, Coord, GameConfig, Unit};

pub trait PositionEvaluator: Send + fmt::Debug {
    /// Prepares a scoring pass for `unit`. Must not depend on earlier calls.
    fn initialize(&mut self, unit: &Unit, board: &Board, config: &GameConfig);

    /// Score of `unit` standing on `cell`; higher is better.
    fn evaluate(&self, cell: Coord, unit: &Unit, board: &Board) -> f32;
}

pub trait TargetEvaluator: Send + fmt::Debug {
    /// Prepares a scoring pass for `unit`. Must not depend on earlier calls.
    fn initialize(&mut self, unit: &Unit, board: &Board, config: &GameConfig);

    /// Score of `unit` acting on `target`; higher is better.
    fn evaluate(&self, target: &Unit, unit: &Unit, board: &Board) -> f32;
}

fn ratio(value: f32, max: f32) -> f32 {
    if max > 0.0 { value / max } else { 0.0 }
}

// ============================================================================
// Position evaluators
// ============================================================================

/// Prefers cells close to the nearest enemy. Range `[0, 1]`.
#[derive(Clone, Debug, Default)]
pub struct DistanceEvaluator {
    enemies: Vec<Coord>,
    max_distance: u32,
}

impl DistanceEvaluator {
    fn nearest(&self, board: &Board, cell: Coord) -> Option<u32> {
        self.enemies
            .iter()
            .map(|enemy| board.distance(cell, *enemy))
            .min()
    }
}

impl PositionEvaluator for DistanceEvaluator {
    fn initialize(&mut self, unit: &Unit, board: &Board, _config: &GameConfig) {
        self.enemies = board.enemies_of(unit.player).map(Unit::cell).collect();
        self.max_distance = board
            .cells()
            .filter_map(|cell| self.nearest(board, cell.coord()))
            .max()
            .unwrap_or(0);
    }

    fn evaluate(&self, cell: Coord, _unit: &Unit, board: &Board) -> f32 {
        match self.nearest(board, cell) {
            Some(_) if self.max_distance == 0 => 1.0,
            Some(distance) => 1.0 - distance as f32 / self.max_distance as f32,
            None => 0.0,
        }
    }
}

/// Prefers cells from which the unit could deal the most damage.
/// Range `[0, 1]`.
#[derive(Clone, Debug, Default)]
pub struct DamageEvaluator {
    minimum_damage: i32,
    best_damage: i32,
}

impl DamageEvaluator {
    fn damage_from(&self, cell: Coord, unit: &Unit, board: &Board) -> i32 {
        board
            .enemies_of(unit.player)
            .filter(|enemy| is_attackable_from(board, unit, cell, enemy))
            .map(|enemy| damage_between(board, unit, enemy, self.minimum_damage))
            .max()
            .unwrap_or(0)
    }
}

impl PositionEvaluator for DamageEvaluator {
    fn initialize(&mut self, unit: &Unit, board: &Board, config: &GameConfig) {
        self.minimum_damage = config.minimum_damage;
        self.best_damage = board
            .enemies_of(unit.player)
            .map(|enemy| damage_between(board, unit, enemy, config.minimum_damage))
            .max()
            .unwrap_or(0);
    }

    fn evaluate(&self, cell: Coord, unit: &Unit, board: &Board) -> f32 {
        ratio(
            self.damage_from(cell, unit, board) as f32,
            self.best_damage as f32,
        )
    }
}

/// Prefers cells with many traversable neighbours. Range `[0, 1]`.
#[derive(Clone, Debug, Default)]
pub struct MovementFreedomEvaluator {
    max_neighbours: usize,
}

impl PositionEvaluator for MovementFreedomEvaluator {
    fn initialize(&mut self, _unit: &Unit, board: &Board, _config: &GameConfig) {
        self.max_neighbours = board.shape().neighbours(Coord::ORIGIN).len();
    }

    fn evaluate(&self, cell: Coord, unit: &Unit, board: &Board) -> f32 {
        let Some(from) = board.cell(cell) else {
            return 0.0;
        };
        let rules = board.rules_for(unit);
        let open = board
            .neighbours(cell)
            .filter(|to| rules.is_cell_traversable(unit, board, from, to))
            .count();
        ratio(open as f32, self.max_neighbours as f32)
    }
}

/// Penalizes cells enemies could attack next turn. Range `[-1, 0]`.
#[derive(Clone, Debug, Default)]
pub struct ThreatEvaluator {
    /// Enemy position and how far it threatens (movement plus range).
    threats: Vec<(Coord, u32)>,
}

impl PositionEvaluator for ThreatEvaluator {
    fn initialize(&mut self, unit: &Unit, board: &Board, _config: &GameConfig) {
        self.threats = board
            .enemies_of(unit.player)
            .filter(|enemy| board.rules_for(enemy).can_attack(enemy))
            .map(|enemy| {
                let movement = if board.rules_for(enemy).can_move(enemy) {
                    enemy.stats.max_movement_points.floor() as u32
                } else {
                    0
                };
                (enemy.cell(), movement + enemy.stats.attack_range)
            })
            .collect();
    }

    fn evaluate(&self, cell: Coord, _unit: &Unit, board: &Board) -> f32 {
        let exposed = self
            .threats
            .iter()
            .filter(|(enemy, reach)| board.distance(cell, *enemy) <= *reach)
            .count();
        -ratio(exposed as f32, self.threats.len() as f32)
    }
}

// ============================================================================
// Target evaluators
// ============================================================================

/// Prefers targets taking the most damage. Range `[0, 1]`.
#[derive(Clone, Debug, Default)]
pub struct TargetDamageEvaluator {
    minimum_damage: i32,
    best_damage: i32,
}

impl TargetEvaluator for TargetDamageEvaluator {
    fn initialize(&mut self, unit: &Unit, board: &Board, config: &GameConfig) {
        self.minimum_damage = config.minimum_damage;
        self.best_damage = board
            .enemies_of(unit.player)
            .map(|enemy| damage_between(board, unit, enemy, config.minimum_damage))
            .max()
            .unwrap_or(0);
    }

    fn evaluate(&self, target: &Unit, unit: &Unit, board: &Board) -> f32 {
        let damage = damage_between(board, unit, target, self.minimum_damage);
        ratio(damage as f32, self.best_damage as f32)
    }
}

/// Prefers targets with little health left. Range `[0, 1]`.
#[derive(Clone, Debug, Default)]
pub struct TargetHealthEvaluator {
    max_health: i32,
}

impl TargetEvaluator for TargetHealthEvaluator {
    fn initialize(&mut self, unit: &Unit, board: &Board, _config: &GameConfig) {
        self.max_health = board
            .enemies_of(unit.player)
            .map(|enemy| enemy.health)
            .max()
            .unwrap_or(0);
    }

    fn evaluate(&self, target: &Unit, _unit: &Unit, _board: &Board) -> f32 {
        1.0 - ratio(target.health as f32, self.max_health as f32)
    }
}

/// Prefers close targets. Range `[0, 1]`.
#[derive(Clone, Debug, Default)]
pub struct TargetDistanceEvaluator {
    max_distance: u32,
}

impl TargetEvaluator for TargetDistanceEvaluator {
    fn initialize(&mut self, unit: &Unit, board: &Board, _config: &GameConfig) {
        self.max_distance = board
            .enemies_of(unit.player)
            .map(|enemy| board.distance(unit.cell(), enemy.cell()))
            .max()
            .unwrap_or(0);
    }

    fn evaluate(&self, target: &Unit, unit: &Unit, board: &Board) -> f32 {
        let distance = board.distance(unit.cell(), target.cell());
        1.0 - ratio(distance as f32, self.max_distance as f32)
    }
}

// ============================================================================
// Descriptions and weighted scoring
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PositionEvaluatorSpec {
    Distance,
    Damage,
    MovementFreedom,
    Threat,
}

impl PositionEvaluatorSpec {
    pub fn build(self) -> Box<dyn PositionEvaluator> {
        match self {
            PositionEvaluatorSpec::Distance => Box::new(DistanceEvaluator::default()),
            PositionEvaluatorSpec::Damage => Box::new(DamageEvaluator::default()),
            PositionEvaluatorSpec::MovementFreedom => {
                Box::new(MovementFreedomEvaluator::default())
            }
            PositionEvaluatorSpec::Threat => Box::new(ThreatEvaluator::default()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TargetEvaluatorSpec {
    Damage,
    Health,
    Distance,
}

impl TargetEvaluatorSpec {
    pub fn build(self) -> Box<dyn TargetEvaluator> {
        match self {
            TargetEvaluatorSpec::Damage => Box::new(TargetDamageEvaluator::default()),
            TargetEvaluatorSpec::Health => Box::new(TargetHealthEvaluator::default()),
            TargetEvaluatorSpec::Distance => Box::new(TargetDistanceEvaluator::default()),
        }
    }
}

fn unit_weight() -> f32 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedPosition {
    pub evaluator: PositionEvaluatorSpec,
    #[serde(default = "unit_weight")]
    pub weight: f32,
}

impl WeightedPosition {
    pub fn new(evaluator: PositionEvaluatorSpec, weight: f32) -> Self {
        Self { evaluator, weight }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedTarget {
    pub evaluator: TargetEvaluatorSpec,
    #[serde(default = "unit_weight")]
    pub weight: f32,
}

impl WeightedTarget {
    pub fn new(evaluator: TargetEvaluatorSpec, weight: f32) -> Self {
        Self { evaluator, weight }
    }
}

/// Weighted sum of position evaluators.
#[derive(Debug)]
pub struct PositionScorer {
    evaluators: Vec<(Box<dyn PositionEvaluator>, f32)>,
}

impl PositionScorer {
    pub fn new(specs: &[WeightedPosition]) -> Self {
        Self {
            evaluators: specs
                .iter()
                .map(|spec| (spec.evaluator.build(), spec.weight))
                .collect(),
        }
    }

    pub fn initialize(&mut self, unit: &Unit, board: &Board, config: &GameConfig) {
        for (evaluator, _) in &mut self.evaluators {
            evaluator.initialize(unit, board, config);
        }
    }

    pub fn score(&self, cell: Coord, unit: &Unit, board: &Board) -> f32 {
        self.evaluators
            .iter()
            .map(|(evaluator, weight)| weight * evaluator.evaluate(cell, unit, board))
            .sum()
    }
}

/// Weighted sum of target evaluators.
#[derive(Debug)]
pub struct TargetScorer {
    evaluators: Vec<(Box<dyn TargetEvaluator>, f32)>,
}

impl TargetScorer {
    pub fn new(specs: &[WeightedTarget]) -> Self {
        Self {
            evaluators: specs
                .iter()
                .map(|spec| (spec.evaluator.build(), spec.weight))
                .collect(),
        }
    }

    pub fn initialize(&mut self, unit: &Unit, board: &Board, config: &GameConfig) {
        for (evaluator, _) in &mut self.evaluators {
            evaluator.initialize(unit, board, config);
        }
    }

    pub fn score(&self, target: &Unit, unit: &Unit, board: &Board) -> f32 {
        self.evaluators
            .iter()
            .map(|(evaluator, weight)| weight * evaluator.evaluate(target, unit, board))
            .sum()
    }
}
