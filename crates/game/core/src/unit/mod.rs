//! Units, their owners and the per-type rule extension point.

mod rules;

pub use rules::{StandardRules, StructureRules, UnitRules};

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::grid::{Coord, WorldPosition};

/// Identifier of a unit in the board arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Player number; players act in ascending order by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Selects the [`UnitRules`] a unit obeys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Blocking, mobile combat unit.
    #[default]
    Standard,
    /// Immobile, non-blocking structure (town, spawner, objective).
    Structure { capturable: bool },
    /// Rules registered on the board under this name.
    Custom(String),
}

bitflags! {
    /// Cells occupied by other units that a unit may move through
    /// (but never stop on).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Traversal: u8 {
        const PASS_ALLIES = 0b01;
        const PASS_ENEMIES = 0b10;
    }
}

/// Maximum values and combat factors of a unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitStats {
    pub max_health: i32,
    pub max_action_points: u32,
    pub max_movement_points: f32,
    pub attack_range: u32,
    pub attack_factor: i32,
    pub defence_factor: i32,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            max_health: 10,
            max_action_points: 1,
            max_movement_points: 3.0,
            attack_range: 1,
            attack_factor: 3,
            defence_factor: 1,
        }
    }
}

/// Blueprint used to create units, both at setup and by spawn commands.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitTemplate {
    pub name: String,
    pub kind: UnitKind,
    pub stats: UnitStats,
    pub traversal: Traversal,
}

impl UnitTemplate {
    pub fn new(name: impl Into<String>, stats: UnitStats) -> Self {
        Self {
            name: name.into(),
            stats,
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: UnitKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Materializes a fresh unit with full health and points.
    pub fn instantiate(&self, id: UnitId, player: PlayerId, cell: Coord) -> Unit {
        Unit {
            id,
            player,
            cell,
            world_position: WorldPosition::default(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            traversal: self.traversal,
            health: self.stats.max_health,
            action_points: self.stats.max_action_points,
            movement_points: self.stats.max_movement_points,
            stats: self.stats.clone(),
        }
    }
}

/// A player-owned actor.
///
/// `cell` is a lookup key into the board, not an owning reference. Fields
/// that participate in the occupancy invariant (`cell`, `kind`) can only be
/// changed through [`crate::grid::Board`].
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    id: UnitId,
    cell: Coord,
    pub(crate) world_position: WorldPosition,
    pub player: PlayerId,
    kind: UnitKind,
    pub name: String,
    pub traversal: Traversal,
    pub stats: UnitStats,
    pub health: i32,
    pub action_points: u32,
    pub movement_points: f32,
}

impl Unit {
    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn cell(&self) -> Coord {
        self.cell
    }

    pub fn world_position(&self) -> WorldPosition {
        self.world_position
    }

    /// Rule selector; fixed for the unit's lifetime because it decides
    /// whether the unit blocks its cell.
    pub fn kind(&self) -> &UnitKind {
        &self.kind
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.player != other.player
    }

    /// Refills action and movement points; called at the start of the
    /// owner's turn.
    pub fn restore_points(&mut self) {
        self.action_points = self.stats.max_action_points;
        self.movement_points = self.stats.max_movement_points;
    }

    pub(crate) fn set_cell(&mut self, cell: Coord, world_position: WorldPosition) {
        self.cell = cell;
        self.world_position = world_position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_instantiates_full_unit() {
        let template = UnitTemplate::new(
            "archer",
            UnitStats {
                max_health: 7,
                max_action_points: 2,
                max_movement_points: 4.0,
                attack_range: 3,
                ..UnitStats::default()
            },
        );

        let unit = template.instantiate(UnitId(5), PlayerId(1), Coord::new(2, 2));
        assert_eq!(unit.id(), UnitId(5));
        assert_eq!(unit.cell(), Coord::new(2, 2));
        assert_eq!(unit.health, 7);
        assert_eq!(unit.action_points, 2);
        assert_eq!(unit.movement_points, 4.0);
        assert!(unit.is_alive());
    }

    #[test]
    fn restore_points_refills_to_maximum() {
        let mut unit = UnitTemplate::default().instantiate(UnitId(1), PlayerId(0), Coord::ORIGIN);
        unit.action_points = 0;
        unit.movement_points = 0.5;

        unit.restore_points();
        assert_eq!(unit.action_points, unit.stats.max_action_points);
        assert_eq!(unit.movement_points, unit.stats.max_movement_points);
    }

    #[test]
    fn template_round_trips_through_json() {
        let template = UnitTemplate::new("tower", UnitStats::default())
            .with_kind(UnitKind::Structure { capturable: true })
            .with_traversal(Traversal::PASS_ALLIES);

        let json = serde_json::to_string(&template).expect("serialize");
        let back: UnitTemplate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, template);
    }
}
