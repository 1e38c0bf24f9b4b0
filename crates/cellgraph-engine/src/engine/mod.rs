//! Cell engine API.
//!
//! This module provides the core computation engine for a sheet:
//!
//! - [`Cell`], [`CellValue`], [`CellStore`] - Data structures for cell storage
//! - [`ColumnType`], [`ColumnDefinition`], [`Schema`] - The typed column layout
//! - [`CellAddress`] - Cell addresses and their two key formats
//! - [`RawExpr`] - Lookup/literal classification of raw values
//! - [`parse_literal`], [`check_type`], [`evaluate`] - Typed evaluation
//! - [`detect_cycle`] - Circular reference detection
//! - [`DependencyGraph`] - Forward/reverse dependency maps

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod eval;
mod lookup;

pub use cell::{Cell, CellStore, CellValue, ColumnDefinition, ColumnType, Schema};
pub use cell_ref::CellAddress;
pub use cycle::detect_cycle;
pub use deps::{DependencyGraph, DependencyMap, GraphSnapshot};
pub use eval::{EvalError, adopt_target, check_type, evaluate, parse_literal, resolve};
pub use lookup::{RawExpr, lookup_target};
