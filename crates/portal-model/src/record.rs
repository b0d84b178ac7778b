use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::CellValue;

/// Stable row identifier.
///
/// Rows keep their id for their whole life in a table; positions are only a
/// derived lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(u64);

impl RowId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RowId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One row of domain data. The engine enforces no schema on `cells`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RowId,
    pub cells: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Builder-style cell assignment.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(key.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Builds a record from a JSON object.
    ///
    /// The id is taken from a numeric `id` or `index` field when present,
    /// otherwise `fallback` is used. Non-object input yields an empty record.
    pub fn from_json(value: &Value, fallback: RowId) -> Self {
        let Some(object) = value.as_object() else {
            return Self::new(fallback);
        };
        let id = ["id", "index"]
            .iter()
            .find_map(|key| object.get(*key).and_then(json_row_id))
            .unwrap_or(fallback);
        Self {
            id,
            cells: object
                .iter()
                .map(|(key, value)| (key.clone(), CellValue::from_json(value)))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .cells
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }
}

fn json_row_id(value: &Value) -> Option<RowId> {
    match value {
        Value::Number(n) => n.as_u64().map(RowId),
        Value::String(s) => s.trim().parse().ok().map(RowId),
        _ => None,
    }
}
