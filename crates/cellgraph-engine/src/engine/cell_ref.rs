//! Cell address formatting.
//!
//! An address is a column name plus a row index. It has two textual forms:
//! the graph key `"{row}:{column}"` used by dependency introspection, and the
//! data key `"{column},{row}"` used by data snapshots.
//!
//! # Examples
//!
//! ```ignore
//! let addr = CellAddress::new("A", 10);
//! assert_eq!(addr.graph_key(), "10:A");
//! assert_eq!(addr.data_key(), "A,10");
//! ```

use serde::Serialize;
use std::fmt;

/// A reference to a cell by column name and row index.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub struct CellAddress {
    pub column: String,
    pub row: usize,
}

impl CellAddress {
    pub fn new(column: impl Into<String>, row: usize) -> CellAddress {
        CellAddress {
            column: column.into(),
            row,
        }
    }

    /// Key used by the forward and reverse dependency maps.
    pub fn graph_key(&self) -> String {
        format!("{}:{}", self.row, self.column)
    }

    /// Key used by sheet data snapshots.
    pub fn data_key(&self) -> String {
        format!("{},{}", self.column, self.row)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::CellAddress;

    #[test]
    fn test_keys_use_distinct_orders() {
        let addr = CellAddress::new("A", 10);
        assert_eq!(addr.graph_key(), "10:A");
        assert_eq!(addr.data_key(), "A,10");
        assert_eq!(addr.to_string(), addr.graph_key());
    }
}
