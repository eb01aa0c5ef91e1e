//! Arena owning every cell and unit of a match.
//!
//! Units reference their cell by coordinate and cells list their occupants
//! by id. Both sides of that relation are only written here, so every
//! mutation keeps them consistent.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::events::GameEvent;
use crate::unit::{
    PlayerId, StandardRules, StructureRules, Unit, UnitId, UnitKind, UnitRules, UnitTemplate,
};

use super::{Cell, Coord, GridError, GridShape, Occupant, WorldPosition};

static STANDARD_RULES: StandardRules = StandardRules;
static STRUCTURE_RULES: StructureRules = StructureRules;

/// Result of a [`Board::modify_health`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthChange {
    pub old: i32,
    pub new: i32,
    pub destroyed: bool,
}

#[derive(Clone, Debug)]
pub struct Board {
    shape: GridShape,
    cell_size: f32,
    cells: BTreeMap<Coord, Cell>,
    units: BTreeMap<UnitId, Unit>,
    custom_rules: BTreeMap<String, Arc<dyn UnitRules>>,
    next_unit_id: u32,
    revision: u64,
    events: Vec<GameEvent>,
}

impl Board {
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            cell_size: 1.0,
            cells: BTreeMap::new(),
            units: BTreeMap::new(),
            custom_rules: BTreeMap::new(),
            next_unit_id: 0,
            revision: 0,
            events: Vec::new(),
        }
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Monotonic counter bumped whenever the movement graph may have
    /// changed (occupancy, ownership, terrain). Path caches compare
    /// against it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ===== cells =====

    /// Adds or reconfigures a cell. Reconfiguring a cell that has
    /// occupants is refused.
    pub fn insert_cell(&mut self, cell: Cell) -> Result<(), GridError> {
        let coord = cell.coord();
        if self
            .cells
            .get(&coord)
            .is_some_and(|existing| !existing.occupants().is_empty())
        {
            return Err(GridError::Occupied(coord));
        }
        self.cells.insert(coord, cell);
        self.revision += 1;
        Ok(())
    }

    pub fn set_obstacle(&mut self, coord: Coord, obstacle: bool) -> Result<(), GridError> {
        let cell = self
            .cells
            .get_mut(&coord)
            .ok_or(GridError::CellNotFound(coord))?;
        cell.set_obstacle(obstacle);
        self.revision += 1;
        Ok(())
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// All cells, ordered by coordinate.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Existing neighbours of `coord`, in the shape's direction order.
    pub fn neighbours(&self, coord: Coord) -> impl Iterator<Item = &Cell> {
        self.shape
            .neighbours(coord)
            .into_iter()
            .filter_map(|neighbour| self.cells.get(&neighbour))
    }

    pub fn distance(&self, a: Coord, b: Coord) -> u32 {
        self.shape.distance(a, b)
    }

    pub fn world_position(&self, coord: Coord) -> WorldPosition {
        self.shape.world_position(coord, self.cell_size)
    }

    // ===== units =====

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Mutable access for point and stat bookkeeping. Position, owner and
    /// health go through the dedicated mutators.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// All units, ordered by id.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |unit| unit.player == player)
    }

    pub fn enemies_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |unit| unit.player != player)
    }

    pub fn units_at(&self, coord: Coord) -> impl Iterator<Item = &Unit> {
        self.cells
            .get(&coord)
            .into_iter()
            .flat_map(|cell| cell.current_units())
            .filter_map(|id| self.units.get(&id))
    }

    /// The unit making `coord` taken, if any.
    pub fn blocking_unit_at(&self, coord: Coord) -> Option<&Unit> {
        let cell = self.cells.get(&coord)?;
        cell.occupants()
            .iter()
            .find(|occupant| occupant.blocking)
            .and_then(|occupant| self.units.get(&occupant.unit))
    }

    /// Players that still own at least one unit.
    pub fn players_with_units(&self) -> BTreeSet<PlayerId> {
        self.units.values().map(|unit| unit.player).collect()
    }

    /// Id the next spawned unit will receive.
    pub fn next_unit_id(&self) -> UnitId {
        UnitId(self.next_unit_id)
    }

    // ===== rules =====

    /// Registers rules referenced by `UnitKind::Custom(name)`.
    pub fn register_rules(&mut self, name: impl Into<String>, rules: Arc<dyn UnitRules>) {
        self.custom_rules.insert(name.into(), rules);
        self.revision += 1;
    }

    /// Resolves the rules of a unit. Unknown custom kinds fall back to the
    /// standard rules.
    pub fn rules_for(&self, unit: &Unit) -> &dyn UnitRules {
        match unit.kind() {
            UnitKind::Standard => &STANDARD_RULES,
            UnitKind::Structure { .. } => &STRUCTURE_RULES,
            UnitKind::Custom(name) => match self.custom_rules.get(name) {
                Some(rules) => rules.as_ref(),
                None => &STANDARD_RULES,
            },
        }
    }

    // ===== mutation =====

    /// Places a fully built unit on its cell.
    pub fn place_unit(&mut self, mut unit: Unit) -> Result<UnitId, GridError> {
        let id = unit.id();
        if self.units.contains_key(&id) {
            return Err(GridError::DuplicateUnit(id));
        }
        if let UnitKind::Custom(name) = unit.kind()
            && !self.custom_rules.contains_key(name)
        {
            return Err(GridError::UnknownRules(name.clone()));
        }

        let coord = unit.cell();
        let blocking = self.rules_for(&unit).is_blocking(&unit);
        let cell = self
            .cells
            .get_mut(&coord)
            .ok_or(GridError::CellNotFound(coord))?;
        if cell.is_obstacle() {
            return Err(GridError::Obstacle(coord));
        }
        if blocking && cell.is_taken() {
            return Err(GridError::Occupied(coord));
        }
        if !cell.add_occupant(Occupant { unit: id, blocking }) {
            return Err(GridError::CellFull(coord));
        }

        unit.set_cell(coord, cell.world_position());
        let player = unit.player;
        self.units.insert(id, unit);
        self.next_unit_id = self.next_unit_id.max(id.0 + 1);
        self.revision += 1;

        debug!(target: "tactics::board", unit = %id, player = %player, cell = %coord, "unit placed");
        self.events.push(GameEvent::UnitPlaced {
            unit: id,
            player,
            cell: coord,
        });
        Ok(id)
    }

    /// Creates a unit from `template` with the next free id.
    pub fn spawn(
        &mut self,
        template: &UnitTemplate,
        player: PlayerId,
        cell: Coord,
    ) -> Result<UnitId, GridError> {
        let id = self.next_unit_id();
        self.place_unit(template.instantiate(id, player, cell))
    }

    /// Moves a unit to `to`, keeping both occupant lists consistent.
    /// Returns the cell the unit left.
    pub fn relocate_unit(&mut self, id: UnitId, to: Coord) -> Result<Coord, GridError> {
        let unit = self.units.get(&id).ok_or(GridError::UnitNotFound(id))?;
        let from = unit.cell();
        if from == to {
            return Ok(from);
        }
        let blocking = self.rules_for(unit).is_blocking(unit);

        let target = self.cells.get(&to).ok_or(GridError::CellNotFound(to))?;
        if target.is_obstacle() {
            return Err(GridError::Obstacle(to));
        }
        if blocking && target.is_taken() {
            return Err(GridError::Occupied(to));
        }
        if target.occupants().is_full() {
            return Err(GridError::CellFull(to));
        }

        let removed = self
            .cells
            .get_mut(&from)
            .is_some_and(|cell| cell.remove_occupant(id));
        if !removed {
            return Err(GridError::OccupancyDesync { unit: id, coord: from });
        }

        let target = self.cells.get_mut(&to).ok_or(GridError::CellNotFound(to))?;
        target.add_occupant(Occupant { unit: id, blocking });
        let world_position = target.world_position();

        if let Some(unit) = self.units.get_mut(&id) {
            unit.set_cell(to, world_position);
        }
        self.revision += 1;
        trace!(target: "tactics::board", unit = %id, from = %from, to = %to, "unit relocated");
        Ok(from)
    }

    /// Takes a unit off the board without emitting a destruction event.
    pub fn remove_unit(&mut self, id: UnitId) -> Result<Unit, GridError> {
        let unit = self.units.remove(&id).ok_or(GridError::UnitNotFound(id))?;
        if let Some(cell) = self.cells.get_mut(&unit.cell()) {
            cell.remove_occupant(id);
        }
        self.revision += 1;
        Ok(unit)
    }

    /// Applies a health delta, capped at the unit's maximum.
    ///
    /// Emits exactly one `HealthChanged` event per call and, when health
    /// drops to zero or below, exactly one `UnitDestroyed` event after which
    /// the unit is removed from the board.
    pub fn modify_health(&mut self, id: UnitId, delta: i32) -> Result<HealthChange, GridError> {
        let unit = self.units.get_mut(&id).ok_or(GridError::UnitNotFound(id))?;
        let old = unit.health;
        let new = old.saturating_add(delta).min(unit.stats.max_health);
        unit.health = new;
        let (player, cell) = (unit.player, unit.cell());

        self.events.push(GameEvent::HealthChanged { unit: id, old, new });

        let destroyed = new <= 0;
        if destroyed {
            self.remove_unit(id)?;
            debug!(target: "tactics::board", unit = %id, player = %player, cell = %cell, "unit destroyed");
            self.events.push(GameEvent::UnitDestroyed {
                unit: id,
                player,
                cell,
            });
        }
        Ok(HealthChange { old, new, destroyed })
    }

    /// Transfers a unit to another player. Returns the previous owner.
    pub fn set_owner(&mut self, id: UnitId, player: PlayerId) -> Result<PlayerId, GridError> {
        let unit = self.units.get_mut(&id).ok_or(GridError::UnitNotFound(id))?;
        let old = std::mem::replace(&mut unit.player, player);
        if old != player {
            self.revision += 1;
            self.events.push(GameEvent::OwnerChanged {
                unit: id,
                old,
                new: player,
            });
        }
        Ok(old)
    }

    /// Refills the points of the units about to act. Ids no longer on the
    /// board are skipped.
    pub fn begin_turn(&mut self, playable: impl IntoIterator<Item = UnitId>) {
        for id in playable {
            if let Some(unit) = self.units.get_mut(&id) {
                unit.restore_points();
            }
        }
    }

    /// Puts units back exactly as the `before` snapshots describe them and
    /// removes `spawned`. Current versions of the snapshot ids are taken
    /// off the board first so that units can swap cells.
    pub(crate) fn restore_units(
        &mut self,
        before: &[Unit],
        spawned: Option<UnitId>,
    ) -> Result<(), GridError> {
        if let Some(id) = spawned
            && self.units.contains_key(&id)
        {
            self.remove_unit(id)?;
        }
        for snapshot in before {
            if self.units.contains_key(&snapshot.id()) {
                self.remove_unit(snapshot.id())?;
            }
        }
        for snapshot in before {
            let id = snapshot.id();
            let coord = snapshot.cell();
            let blocking = self.rules_for(snapshot).is_blocking(snapshot);
            let cell = self
                .cells
                .get_mut(&coord)
                .ok_or(GridError::CellNotFound(coord))?;
            if blocking && cell.is_taken() {
                return Err(GridError::Occupied(coord));
            }
            if !cell.add_occupant(Occupant { unit: id, blocking }) {
                return Err(GridError::CellFull(coord));
            }
            self.units.insert(id, snapshot.clone());
            self.events.push(GameEvent::UnitRestored { unit: id });
        }
        self.revision += 1;
        Ok(())
    }

    /// Verifies that units and occupant lists agree with each other.
    pub fn check_occupancy(&self) -> Result<(), GridError> {
        for unit in self.units.values() {
            let coord = unit.cell();
            let cell = self
                .cells
                .get(&coord)
                .ok_or(GridError::CellNotFound(coord))?;
            let blocking = self.rules_for(unit).is_blocking(unit);
            let listed = cell
                .occupants()
                .iter()
                .any(|occupant| occupant.unit == unit.id() && occupant.blocking == blocking);
            if !listed {
                return Err(GridError::OccupancyDesync {
                    unit: unit.id(),
                    coord,
                });
            }
        }
        for cell in self.cells.values() {
            for id in cell.current_units() {
                let consistent = self
                    .units
                    .get(&id)
                    .is_some_and(|unit| unit.cell() == cell.coord());
                if !consistent {
                    return Err(GridError::OccupancyDesync {
                        unit: id,
                        coord: cell.coord(),
                    });
                }
            }
        }
        Ok(())
    }

    // ===== events =====

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain, oldest first.
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drops events recorded after the outbox held `len` entries.
    pub(crate) fn truncate_events(&mut self, len: usize) {
        self.events.truncate(len);
    }
}
