//! Flat, string-keyed wire form of commands.
//!
//! Values are primitives (integers, floats) or nested primitive maps for
//! coordinates (`{"x": 1, "y": 2}`) and sequences (`{"0": ..., "1": ...}`).
//! Units are referenced by id and cells by coordinates so that the
//! receiving side can resolve them against its own board.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::grid::{Board, Coord};
use crate::unit::{PlayerId, UnitId};

use super::CommandError;

pub type Payload = Map<String, Value>;

pub const TYPE_KEY: &str = "type";

/// Builds a payload field by field.
#[derive(Debug, Default)]
pub(crate) struct PayloadWriter {
    map: Payload,
}

impl PayloadWriter {
    pub(crate) fn new(kind: &str) -> Self {
        let mut map = Payload::new();
        map.insert(TYPE_KEY.into(), Value::from(kind));
        Self { map }
    }

    pub(crate) fn unit(mut self, key: &str, unit: UnitId) -> Self {
        self.map.insert(key.into(), Value::from(unit.0));
        self
    }

    pub(crate) fn player(mut self, key: &str, player: PlayerId) -> Self {
        self.map.insert(key.into(), Value::from(player.0));
        self
    }

    pub(crate) fn int(mut self, key: &str, value: i32) -> Self {
        self.map.insert(key.into(), Value::from(value));
        self
    }

    pub(crate) fn coord(mut self, key: &str, coord: Coord) -> Self {
        self.map.insert(key.into(), coord_value(coord));
        self
    }

    pub(crate) fn path(mut self, key: &str, path: &[Coord]) -> Self {
        self.map
            .insert(key.into(), indexed(path.iter().map(|coord| coord_value(*coord))));
        self
    }

    pub(crate) fn list(mut self, key: &str, items: impl IntoIterator<Item = Payload>) -> Self {
        self.map
            .insert(key.into(), indexed(items.into_iter().map(Value::Object)));
        self
    }

    pub(crate) fn value<T: Serialize>(mut self, key: &str, value: &T) -> Self {
        // Plain data structs and enums cannot fail to serialize.
        let encoded = serde_json::to_value(value).unwrap_or(Value::Null);
        self.map.insert(key.into(), encoded);
        self
    }

    pub(crate) fn finish(self) -> Payload {
        self.map
    }
}

fn coord_value(coord: Coord) -> Value {
    let mut map = Map::new();
    map.insert("x".into(), Value::from(coord.x));
    map.insert("y".into(), Value::from(coord.y));
    Value::Object(map)
}

fn indexed(values: impl Iterator<Item = Value>) -> Value {
    Value::Object(
        values
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
    )
}

/// Reads payload fields, resolving references against a board.
pub(crate) struct PayloadReader<'a> {
    map: &'a Payload,
    board: &'a Board,
}

impl<'a> PayloadReader<'a> {
    pub(crate) fn new(map: &'a Payload, board: &'a Board) -> Self {
        Self { map, board }
    }

    pub(crate) fn kind(map: &Payload) -> Result<&str, CommandError> {
        map.get(TYPE_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| CommandError::MissingField(TYPE_KEY.into()))
    }

    fn field(&self, key: &str) -> Result<&'a Value, CommandError> {
        self.map
            .get(key)
            .ok_or_else(|| CommandError::MissingField(key.into()))
    }

    pub(crate) fn int(&self, key: &str) -> Result<i32, CommandError> {
        int_value(key, self.field(key)?)
    }

    fn raw_id(&self, key: &str) -> Result<u32, CommandError> {
        let value = self.field(key)?;
        value
            .as_u64()
            .and_then(|raw| u32::try_from(raw).ok())
            .ok_or_else(|| invalid(key, "expected an unsigned 32-bit id"))
    }

    /// A unit id that must exist on the board.
    pub(crate) fn unit(&self, key: &str) -> Result<UnitId, CommandError> {
        let id = UnitId(self.raw_id(key)?);
        if self.board.unit(id).is_none() {
            return Err(CommandError::UnitNotFound(id));
        }
        Ok(id)
    }

    /// A unit id that is not resolved against the board.
    pub(crate) fn new_unit(&self, key: &str) -> Result<UnitId, CommandError> {
        Ok(UnitId(self.raw_id(key)?))
    }

    pub(crate) fn player(&self, key: &str) -> Result<PlayerId, CommandError> {
        Ok(PlayerId(self.raw_id(key)?))
    }

    /// A coordinate that must name an existing cell.
    pub(crate) fn cell(&self, key: &str) -> Result<Coord, CommandError> {
        self.checked_coord(key, self.field(key)?)
    }

    pub(crate) fn path(&self, key: &str) -> Result<Vec<Coord>, CommandError> {
        indexed_items(key, self.field(key)?)?
            .into_iter()
            .map(|value| self.checked_coord(key, value))
            .collect()
    }

    /// Nested maps stored under `key`, in index order.
    pub(crate) fn list(&self, key: &str) -> Result<Vec<&'a Payload>, CommandError> {
        indexed_items(key, self.field(key)?)?
            .into_iter()
            .map(|value| value.as_object().ok_or_else(|| invalid(key, "expected a map")))
            .collect()
    }

    pub(crate) fn value<T: DeserializeOwned>(&self, key: &str) -> Result<T, CommandError> {
        serde_json::from_value(self.field(key)?.clone())
            .map_err(|error| invalid(key, &error.to_string()))
    }

    /// Reader over a nested map sharing the same board.
    pub(crate) fn nested(&self, map: &'a Payload) -> Self {
        Self::new(map, self.board)
    }

    fn checked_coord(&self, key: &str, value: &Value) -> Result<Coord, CommandError> {
        let map = value
            .as_object()
            .ok_or_else(|| invalid(key, "expected a coordinate map"))?;
        let x = int_value(key, map.get("x").ok_or_else(|| invalid(key, "missing x"))?)?;
        let y = int_value(key, map.get("y").ok_or_else(|| invalid(key, "missing y"))?)?;
        let coord = Coord::new(x, y);
        if !self.board.contains(coord) {
            return Err(CommandError::CellNotFound(coord));
        }
        Ok(coord)
    }
}

fn invalid(key: &str, reason: &str) -> CommandError {
    CommandError::InvalidField {
        key: key.into(),
        reason: reason.into(),
    }
}

fn int_value(key: &str, value: &Value) -> Result<i32, CommandError> {
    value
        .as_i64()
        .and_then(|raw| i32::try_from(raw).ok())
        .ok_or_else(|| invalid(key, "expected a 32-bit integer"))
}

fn indexed_items<'v>(key: &str, value: &'v Value) -> Result<Vec<&'v Value>, CommandError> {
    let map = value
        .as_object()
        .ok_or_else(|| invalid(key, "expected an indexed map"))?;
    (0..map.len())
        .map(|index| {
            map.get(&index.to_string())
                .ok_or_else(|| invalid(key, &format!("missing index {index}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RectangularGenerator;

    #[test]
    fn coordinates_and_paths_are_nested_maps() {
        let payload = PayloadWriter::new("move")
            .coord("cell", Coord::new(1, 2))
            .path("path", &[Coord::new(0, 1), Coord::new(0, 2)])
            .finish();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "move");
        assert_eq!(json["cell"]["x"], 1);
        assert_eq!(json["path"]["1"]["y"], 2);
    }

    #[test]
    fn reader_rejects_cells_missing_from_board() {
        let board = RectangularGenerator::new(2, 2).generate();
        let payload = PayloadWriter::new("move")
            .coord("inside", Coord::new(1, 1))
            .coord("outside", Coord::new(5, 5))
            .finish();
        let reader = PayloadReader::new(&payload, &board);

        assert_eq!(reader.cell("inside"), Ok(Coord::new(1, 1)));
        assert_eq!(reader.cell("outside"), Err(CommandError::CellNotFound(Coord::new(5, 5))));
        assert_eq!(reader.cell("absent"), Err(CommandError::MissingField("absent".into())));
    }

    #[test]
    fn reader_rejects_unknown_units() {
        let board = RectangularGenerator::new(1, 1).generate();
        let payload = PayloadWriter::new("attack").unit("target", UnitId(3)).finish();
        let reader = PayloadReader::new(&payload, &board);
        assert_eq!(reader.unit("target"), Err(CommandError::UnitNotFound(UnitId(3))));
        assert_eq!(reader.new_unit("target"), Ok(UnitId(3)));
    }
}
