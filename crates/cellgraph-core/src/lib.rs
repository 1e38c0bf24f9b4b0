//! cellgraph-core - Thread-safe sheets on top of the cell engine.

pub mod data;
pub mod error;
pub mod registry;
pub mod sheet;

pub use data::SheetData;
pub use error::{ErrorKind, ErrorResponse, Result, SheetError};
pub use registry::SheetRegistry;
pub use sheet::{Sheet, SheetId, SheetSnapshot};

pub use cellgraph_engine::engine::{
    Cell, CellAddress, CellValue, ColumnDefinition, ColumnType, DependencyMap,
};
