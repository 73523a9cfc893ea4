//! Untyped record as fetched from the data store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A loosely-shaped row: string keys to JSON values.
///
/// Rows written by different schema generations name the same field
/// differently (`labor_charges` vs `laborCharges`), so nothing here assumes
/// a key set. Explicit `null` is indistinguishable from an absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Value stored under `key`, skipping explicit nulls.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Non-object values carry no fields and become an empty record.
impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }
}
