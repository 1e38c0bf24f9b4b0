//! Shared fixtures for registry tests.

use cellgraph_core::{CellValue, ColumnDefinition, ColumnType, SheetId, SheetRegistry};

/// Registry holding one sheet with columns `A:STRING, B:BOOLEAN, C:STRING`.
pub fn registry_with_sheet() -> (SheetRegistry, SheetId) {
    let registry = SheetRegistry::new();
    let id = registry.create_sheet(vec![
        ColumnDefinition::new("A", ColumnType::String),
        ColumnDefinition::new("B", ColumnType::Boolean),
        ColumnDefinition::new("C", ColumnType::String),
    ]);
    (registry, id)
}

pub fn value(registry: &SheetRegistry, id: SheetId, key: &str) -> Option<CellValue> {
    registry.sheet_data(id).unwrap().get(key).cloned()
}

pub fn text(s: &str) -> Option<CellValue> {
    Some(CellValue::String(s.to_string()))
}
