//! Concurrent registry of sheets keyed by id.

use dashmap::DashMap;
use log::info;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use cellgraph_engine::engine::{ColumnDefinition, DependencyMap};

use crate::data::SheetData;
use crate::error::{Result, SheetError};
use crate::sheet::{Sheet, SheetId};

/// Owns every sheet. Creation and lookup never take a sheet's own lock, so
/// work on one sheet does not block another.
pub struct SheetRegistry {
    sheets: DashMap<SheetId, Arc<Sheet>>,
    next_id: AtomicI64,
}

impl SheetRegistry {
    pub fn new() -> Self {
        SheetRegistry {
            sheets: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Create a sheet with a fixed schema and return its id.
    /// Ids start at 1 and strictly increase.
    pub fn create_sheet(&self, columns: Vec<ColumnDefinition>) -> SheetId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        info!("created sheet {} with {} columns", id, columns.len());
        self.sheets.insert(id, Arc::new(Sheet::new(id, columns)));
        id
    }

    pub fn get_sheet(&self, id: SheetId) -> Result<Arc<Sheet>> {
        self.sheets
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(SheetError::SheetNotFound { id })
    }

    pub fn set_cell(&self, id: SheetId, column: &str, row: usize, raw_value: &str) -> Result<()> {
        self.get_sheet(id)?.set_cell(column, row, raw_value)
    }

    pub fn sheet_data(&self, id: SheetId) -> Result<SheetData> {
        Ok(self.get_sheet(id)?.data())
    }

    pub fn forward_dependencies(&self, id: SheetId) -> Result<DependencyMap> {
        Ok(self.get_sheet(id)?.forward_dependencies())
    }

    pub fn reverse_dependencies(&self, id: SheetId) -> Result<DependencyMap> {
        Ok(self.get_sheet(id)?.reverse_dependencies())
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl Default for SheetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
