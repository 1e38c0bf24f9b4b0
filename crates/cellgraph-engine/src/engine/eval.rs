//! Literal parsing, type checks and single-cell evaluation.
//!
//! Evaluation follows a cell's raw value: a literal is parsed against the
//! cell's own column type, a lookup adopts whatever the referenced cell
//! evaluates to. A lookup into an address with no cell yields
//! [`CellValue::Absent`], which is not an error.

use std::collections::HashSet;
use thiserror::Error;

use super::cell::{CellStore, CellValue, ColumnType, Schema};
use super::cell_ref::CellAddress;
use super::lookup::{RawExpr, lookup_target};

/// Errors raised while evaluating a raw value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Expected {expected}, got: {input}")]
    InvalidType { expected: ColumnType, input: String },

    #[error("Expected {expected}, got {found}")]
    TypeMismatch {
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("Cycle detected at {address} ({})", format_path(.path))]
    CircularReference {
        address: CellAddress,
        path: Vec<CellAddress>,
    },
}

fn format_path(path: &[CellAddress]) -> String {
    path.iter()
        .map(|a| a.graph_key())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Parse a literal raw value as the given column type.
///
/// INT only accepts whole base-10 integers, so `"42.5"` fails. DOUBLE accepts
/// any finite float, including `"42"`; `"inf"`, `"NaN"` and overflowing
/// exponents are rejected since they have no JSON form.
pub fn parse_literal(column_type: ColumnType, raw: &str) -> Result<CellValue, EvalError> {
    let invalid = || EvalError::InvalidType {
        expected: column_type,
        input: raw.to_string(),
    };

    match column_type {
        ColumnType::String => Ok(CellValue::String(raw.to_string())),
        ColumnType::Boolean => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(CellValue::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(CellValue::Bool(false))
            } else {
                Err(invalid())
            }
        }
        ColumnType::Int => raw.parse::<i64>().map(CellValue::Int).map_err(|_| invalid()),
        ColumnType::Double => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(CellValue::Double(n)),
            _ => Err(invalid()),
        },
    }
}

/// Check that a value can be stored in a column of the expected type.
///
/// Absent values always pass. Otherwise the representation must match
/// exactly; an INT value does not widen into a DOUBLE column.
pub fn check_type(expected: ColumnType, value: &CellValue) -> Result<(), EvalError> {
    match value.column_type() {
        None => Ok(()),
        Some(found) if found == expected => Ok(()),
        Some(found) => Err(EvalError::TypeMismatch { expected, found }),
    }
}

/// Resolve the value at `address` without touching any cached value.
///
/// Each cell holds at most one lookup, so the chain is walked iteratively
/// down to a literal or a gap. Reaching an address already on the chain is
/// a circular reference.
pub fn resolve(
    schema: &Schema,
    cells: &CellStore,
    address: &CellAddress,
) -> Result<CellValue, EvalError> {
    let mut seen = HashSet::new();
    let mut chain = Vec::new();
    let mut current = address.clone();

    loop {
        if !seen.insert(current.clone()) {
            let start = chain.iter().position(|a| *a == current).unwrap_or(0);
            let mut path = chain.split_off(start);
            path.push(current.clone());
            return Err(EvalError::CircularReference {
                address: current,
                path,
            });
        }

        let Some(cell) = cells.get(&current) else {
            return Ok(CellValue::Absent);
        };

        match RawExpr::parse(&cell.raw_value) {
            RawExpr::Lookup(target) => {
                chain.push(current);
                current = target;
            }
            RawExpr::Literal(raw) => {
                return match schema.column(&current.column) {
                    Some(column) => parse_literal(column.column_type, raw),
                    // Cells are only ever created under schema columns.
                    None => Ok(CellValue::Absent),
                };
            }
        }
    }
}

/// Refresh a lookup cell from the cached value of the cell it points at.
///
/// Only valid when the target's cached value is current, as it is for a
/// dependent reached after its target in breadth-first order. Literal cells
/// are left alone.
pub fn adopt_target(cells: &mut CellStore, address: &CellAddress) -> Option<CellValue> {
    let target = lookup_target(&cells.get(address)?.raw_value)?;
    let value = cells
        .get(&target)
        .map(|cell| cell.evaluated.clone())
        .unwrap_or_default();
    let cell = cells.get_mut(address)?;
    cell.evaluated = value.clone();
    Some(value)
}

/// Evaluate the cell at `address` and cache the result on it.
pub fn evaluate(
    schema: &Schema,
    cells: &mut CellStore,
    address: &CellAddress,
) -> Result<CellValue, EvalError> {
    let value = resolve(schema, cells, address)?;
    if let Some(cell) = cells.get_mut(address) {
        cell.evaluated = value.clone();
    }
    Ok(value)
}
