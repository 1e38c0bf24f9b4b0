//! Evaluated-value snapshots of a sheet.

use cellgraph_engine::engine::{CellStore, CellValue};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Evaluated values keyed by `"{column},{row}"`, in cell creation order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetData {
    entries: Vec<(String, CellValue)>,
}

impl SheetData {
    pub(crate) fn from_cells(cells: &CellStore) -> Self {
        SheetData {
            entries: cells
                .iter()
                .map(|cell| (cell.address.data_key(), cell.evaluated.clone()))
                .collect(),
        }
    }

    /// Value stored under a data key such as `"A,10"`.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SheetData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
