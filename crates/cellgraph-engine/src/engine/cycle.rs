//! Circular reference detection for lookup cells.
//!
//! When a raw value is written we must verify it doesn't close a loop
//! (e.g., C1 looks up A1, A1 looks up B1, B1 looks up C1). The proposed cell
//! is installed in the store first, then its lookup chain is walked from the
//! start. Each cell has at most one lookup, so the chain is a simple path.

use std::collections::HashSet;

use super::cell::CellStore;
use super::cell_ref::CellAddress;
use super::lookup::lookup_target;

/// Detect a circular reference starting from a cell.
/// Returns Some(cycle_path) if the chain revisits an address, None otherwise.
pub fn detect_cycle(start: &CellAddress, cells: &CellStore) -> Option<Vec<CellAddress>> {
    let mut visiting = HashSet::new();
    let mut path = Vec::new();
    let mut current = start.clone();

    loop {
        if !visiting.insert(current.clone()) {
            path.push(current);
            return Some(path);
        }
        path.push(current.clone());

        let next = cells
            .get(&current)
            .and_then(|cell| lookup_target(&cell.raw_value))?;
        current = next;
    }
}
