//! Cell data structures for a sheet.
//!
//! This module provides the core data types:
//! - [`ColumnType`] / [`ColumnDefinition`] / [`Schema`] - The fixed, typed column layout
//! - [`CellValue`] - An evaluated value, with an explicit absent case
//! - [`Cell`] - A cell's raw input plus its cached evaluated value
//! - [`CellStore`] - Sparse cell storage that remembers creation order

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::cell_ref::CellAddress;

/// The declared type of a column.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    String,
    Int,
    Double,
    Boolean,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "STRING",
            ColumnType::Int => "INT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    /// Case-insensitive: `"string"`, `"Int"` and `"DOUBLE"` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STRING" => Ok(ColumnType::String),
            "INT" => Ok(ColumnType::Int),
            "DOUBLE" => Ok(ColumnType::Double),
            "BOOLEAN" => Ok(ColumnType::Boolean),
            _ => Err(format!("Unknown column type: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A named, typed column.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> ColumnDefinition {
        ColumnDefinition {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered column layout of a sheet. Immutable once built.
///
/// Names are not required to be unique; lookups return the first match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<ColumnDefinition>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDefinition>) -> Schema {
        Schema { columns }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// An evaluated cell value.
///
/// `Absent` is what a lookup into a never-written cell produces. It is
/// compatible with every column type.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Absent,
    String(String),
    Int(i64),
    Double(f64),
    Bool(bool),
}

impl CellValue {
    /// The column type this value belongs to, or None when absent.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            CellValue::Absent => None,
            CellValue::String(_) => Some(ColumnType::String),
            CellValue::Int(_) => Some(ColumnType::Int),
            CellValue::Double(_) => Some(ColumnType::Double),
            CellValue::Bool(_) => Some(ColumnType::Boolean),
        }
    }
}

/// A cell in a sheet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cell {
    pub address: CellAddress,
    /// Literal text or a `lookup(col,row)` expression, exactly as written.
    pub raw_value: String,
    /// Kept in step with `raw_value` by every successful write.
    pub evaluated: CellValue,
}

impl Cell {
    /// Create a cell whose value has not been evaluated yet.
    pub fn new(address: CellAddress, raw_value: &str) -> Cell {
        Cell {
            address,
            raw_value: raw_value.to_string(),
            evaluated: CellValue::Absent,
        }
    }
}

/// Sparse cell storage keyed by address.
///
/// Iteration follows the order in which addresses were first inserted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellStore {
    cells: HashMap<CellAddress, Cell>,
    order: Vec<CellAddress>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &CellAddress) -> Option<&Cell> {
        self.cells.get(address)
    }

    pub fn get_mut(&mut self, address: &CellAddress) -> Option<&mut Cell> {
        self.cells.get_mut(address)
    }

    /// Insert or replace a cell, returning the cell previously stored there.
    /// Replacing keeps the address's original position in iteration order.
    pub fn insert(&mut self, cell: Cell) -> Option<Cell> {
        let address = cell.address.clone();
        let previous = self.cells.insert(address.clone(), cell);
        if previous.is_none() {
            self.order.push(address);
        }
        previous
    }

    pub fn remove(&mut self, address: &CellAddress) -> Option<Cell> {
        let removed = self.cells.remove(address)?;
        if self.order.last() == Some(address) {
            self.order.pop();
        } else {
            self.order.retain(|a| a != address);
        }
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.order.iter().filter_map(|a| self.cells.get(a))
    }
}
