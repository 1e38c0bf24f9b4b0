//! A sheet: fixed schema, cells and dependency graph behind one RwLock.
//!
//! Writes take the exclusive lock for their whole duration, so a reader sees
//! either all of a write or none of it. A failed write is undone through
//! [`Rollback`] before the lock is released.

use cellgraph_engine::engine::{
    Cell, CellAddress, CellStore, ColumnDefinition, ColumnType, DependencyGraph, DependencyMap,
    EvalError, GraphSnapshot, Schema, adopt_target, check_type, detect_cycle, evaluate,
    lookup_target, parse_literal, resolve,
};
use log::{debug, warn};
use parking_lot::RwLock;

use crate::data::SheetData;
use crate::error::{Result, SheetError};

pub type SheetId = i64;

/// Mutable part of a sheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetSnapshot {
    pub cells: CellStore,
    pub graph: DependencyGraph,
}

pub struct Sheet {
    id: SheetId,
    schema: Schema,
    state: RwLock<SheetSnapshot>,
}

impl Sheet {
    pub fn new(id: SheetId, columns: Vec<ColumnDefinition>) -> Self {
        Sheet {
            id,
            schema: Schema::new(columns),
            state: RwLock::new(SheetSnapshot::default()),
        }
    }

    pub fn id(&self) -> SheetId {
        self.id
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        self.schema.columns()
    }

    /// Write a raw value (literal or `lookup(col,row)`) into a cell.
    ///
    /// On success the cell and everything depending on it, directly or
    /// transitively, hold fresh evaluated values. On failure the sheet is left
    /// exactly as it was.
    pub fn set_cell(&self, column: &str, row: usize, raw_value: &str) -> Result<()> {
        let mut state = self.state.write();

        let column_type = self
            .schema
            .column(column)
            .map(|c| c.column_type)
            .ok_or_else(|| SheetError::ColumnNotFound {
                column: column.to_string(),
            })?;
        let address = CellAddress::new(column, row);

        match state.apply(&self.schema, column_type, &address, raw_value) {
            Ok(refreshed) => {
                debug!(
                    "sheet {}: set {} = {:?}, refreshed {} dependents",
                    self.id, address, raw_value, refreshed
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "sheet {}: rejected {} = {:?} ({}): {}",
                    self.id,
                    address,
                    raw_value,
                    err.kind(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Evaluated values of every cell, in creation order.
    pub fn data(&self) -> SheetData {
        SheetData::from_cells(&self.state.read().cells)
    }

    /// Copy of a single cell, if it has been written.
    pub fn cell(&self, column: &str, row: usize) -> Option<Cell> {
        self.state
            .read()
            .cells
            .get(&CellAddress::new(column, row))
            .cloned()
    }

    pub fn forward_dependencies(&self) -> DependencyMap {
        self.state.read().graph.forward_map()
    }

    pub fn reverse_dependencies(&self) -> DependencyMap {
        self.state.read().graph.reverse_map()
    }

    /// Full copy of the cell store and graph.
    pub fn snapshot(&self) -> SheetSnapshot {
        self.state.read().clone()
    }
}

impl SheetSnapshot {
    /// Apply one write, undoing it if any step fails.
    /// Returns how many dependents were refreshed.
    fn apply(
        &mut self,
        schema: &Schema,
        column_type: ColumnType,
        address: &CellAddress,
        raw_value: &str,
    ) -> Result<usize> {
        let target = lookup_target(raw_value);
        let rollback = Rollback::capture(self, address, target.as_ref());

        let result = self.try_apply(schema, column_type, address, raw_value, target.as_ref());
        if result.is_err() {
            rollback.restore(self);
        }
        result
    }

    fn try_apply(
        &mut self,
        schema: &Schema,
        column_type: ColumnType,
        address: &CellAddress,
        raw_value: &str,
        target: Option<&CellAddress>,
    ) -> Result<usize> {
        self.cells.insert(Cell::new(address.clone(), raw_value));
        self.graph.clear_dependencies(address);

        match target {
            Some(target) => {
                let value = resolve(schema, &self.cells, target)?;
                check_type(column_type, &value)?;
                self.check_cycle(address)?;
                self.graph.add_dependency(address, target);
            }
            None => {
                let value = parse_literal(column_type, raw_value)?;
                check_type(column_type, &value)?;
                self.check_cycle(address)?;
            }
        }

        evaluate(schema, &mut self.cells, address)?;
        Ok(self.propagate(address))
    }

    fn check_cycle(&self, address: &CellAddress) -> Result<()> {
        match detect_cycle(address, &self.cells) {
            Some(path) => Err(EvalError::CircularReference {
                address: address.clone(),
                path,
            }
            .into()),
            None => Ok(()),
        }
    }

    /// Refresh every cell reverse-reachable from `address`, breadth first.
    /// A dependent is always reached after the cell it looks up, so it can
    /// take that cell's freshly cached value.
    fn propagate(&mut self, address: &CellAddress) -> usize {
        let dependents = self.graph.transitive_dependents(address);
        for dependent in &dependents {
            adopt_target(&mut self.cells, dependent);
        }
        dependents.len()
    }
}

/// Pre-write state of everything a single write can touch.
struct Rollback {
    address: CellAddress,
    previous: Option<Cell>,
    graph: GraphSnapshot,
}

impl Rollback {
    fn capture(state: &SheetSnapshot, address: &CellAddress, target: Option<&CellAddress>) -> Self {
        let mut touched = vec![address];
        if let Some(old_targets) = state.graph.precedents(address) {
            touched.extend(old_targets.iter());
        }
        touched.extend(target);

        Rollback {
            address: address.clone(),
            previous: state.cells.get(address).cloned(),
            graph: state.graph.snapshot(touched),
        }
    }

    fn restore(self, state: &mut SheetSnapshot) {
        match self.previous {
            Some(cell) => {
                state.cells.insert(cell);
            }
            None => {
                state.cells.remove(&self.address);
            }
        }
        state.graph.restore(self.graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use cellgraph_engine::engine::CellValue;
    use pretty_assertions::assert_eq;

    fn sheet() -> Sheet {
        Sheet::new(
            1,
            vec![
                ColumnDefinition::new("A", ColumnType::String),
                ColumnDefinition::new("B", ColumnType::Boolean),
                ColumnDefinition::new("C", ColumnType::String),
            ],
        )
    }

    fn value(sheet: &Sheet, key: &str) -> Option<CellValue> {
        sheet.data().get(key).cloned()
    }

    #[test]
    fn test_rollback_restores_new_cell_and_edges() {
        let sheet = sheet();
        sheet.set_cell("A", 1, "hello").unwrap();
        let before = sheet.snapshot();

        let mut state = before.clone();
        let c1 = CellAddress::new("C", 1);
        let a1 = CellAddress::new("A", 1);
        let rollback = Rollback::capture(&state, &c1, Some(&a1));
        state.cells.insert(Cell::new(c1.clone(), "lookup(A,1)"));
        state.graph.add_dependency(&c1, &a1);
        assert_ne!(state, before);

        rollback.restore(&mut state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_rollback_restores_replaced_cell() {
        let sheet = sheet();
        sheet.set_cell("A", 1, "hi").unwrap();
        sheet.set_cell("C", 1, "lookup(A,1)").unwrap();
        let before = sheet.snapshot();

        let mut state = before.clone();
        let a1 = CellAddress::new("A", 1);
        let c1 = CellAddress::new("C", 1);
        let rollback = Rollback::capture(&state, &c1, Some(&a1));
        state.cells.insert(Cell::new(c1.clone(), "other"));
        state.graph.clear_dependencies(&c1);
        assert_ne!(state, before);

        rollback.restore(&mut state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_lookup_scenario() {
        let sheet = sheet();
        sheet.set_cell("A", 10, "hello").unwrap();
        sheet.set_cell("C", 1, "lookup(A,10)").unwrap();
        assert_eq!(value(&sheet, "C,1"), Some(CellValue::String("hello".into())));

        let err = sheet.set_cell("B", 1, "lookup(A,10)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidType);
        assert!(sheet.cell("B", 1).is_none());
        assert!(!sheet.forward_dependencies().contains_key("1:B"));
    }

    #[test]
    fn test_update_propagates_without_rewrite() {
        let sheet = sheet();
        sheet.set_cell("A", 1, "hi").unwrap();
        sheet.set_cell("C", 1, "lookup(A,1)").unwrap();
        sheet.set_cell("A", 1, "hello").unwrap();
        assert_eq!(value(&sheet, "C,1"), Some(CellValue::String("hello".into())));
    }

    #[test]
    fn test_unknown_column() {
        let sheet = sheet();
        let err = sheet.set_cell("Z", 1, "x").unwrap_err();
        assert_eq!(err, SheetError::ColumnNotFound { column: "Z".into() });
        assert_eq!(sheet.snapshot(), SheetSnapshot::default());
    }

    #[test]
    fn test_lookup_to_literal_drops_edge() {
        let sheet = sheet();
        sheet.set_cell("A", 10, "hello").unwrap();
        sheet.set_cell("C", 1, "lookup(A,10)").unwrap();
        sheet.set_cell("C", 1, "newLiteral").unwrap();

        assert_eq!(value(&sheet, "C,1"), Some(CellValue::String("newLiteral".into())));
        assert_eq!(value(&sheet, "A,10"), Some(CellValue::String("hello".into())));
        assert!(sheet.forward_dependencies()["1:C"].is_empty());
        assert!(sheet.reverse_dependencies()["10:A"].is_empty());
        assert!(sheet.snapshot().graph.is_symmetric());
    }

    #[test]
    fn test_cell_keeps_raw_value() {
        let sheet = sheet();
        sheet.set_cell("C", 3, " lookup(A,7) ").unwrap();
        let cell = sheet.cell("C", 3).unwrap();
        assert_eq!(cell.raw_value, " lookup(A,7) ");
        assert_eq!(cell.evaluated, CellValue::Absent);
        assert_eq!(sheet.forward_dependencies()["3:C"], vec!["7:A".to_string()]);
    }
}
