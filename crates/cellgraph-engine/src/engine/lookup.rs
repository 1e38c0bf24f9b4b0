//! Recognition of lookup expressions in raw cell values.
//!
//! A raw value is a lookup when, ignoring surrounding whitespace, it reads
//! `lookup(<column>,<row>)` with an optional space run after the comma.
//! The column is made of word characters and the row is a non-negative
//! integer. Anything else is a literal.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::CellAddress;

/// A raw cell value classified as literal or lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawExpr<'a> {
    Literal(&'a str),
    Lookup(CellAddress),
}

impl<'a> RawExpr<'a> {
    pub fn parse(raw: &'a str) -> RawExpr<'a> {
        match lookup_target(raw) {
            Some(target) => RawExpr::Lookup(target),
            None => RawExpr::Literal(raw),
        }
    }
}

/// The address a lookup expression points at, or None for literals.
///
/// A row index too large for `usize` does not count as a lookup.
pub fn lookup_target(raw: &str) -> Option<CellAddress> {
    let caps = lookup_re().captures(raw)?;
    let row = caps["row"].parse::<usize>().ok()?;
    Some(CellAddress::new(&caps["column"], row))
}

fn lookup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*lookup\((?<column>[A-Za-z0-9_]+),\s*(?<row>[0-9]+)\)\s*$")
            .expect("lookup regex must compile")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_forms() {
        assert_eq!(lookup_target("lookup(A,10)"), Some(CellAddress::new("A", 10)));
        assert_eq!(
            lookup_target("  lookup(col_2,   0)  "),
            Some(CellAddress::new("col_2", 0))
        );
    }

    #[test]
    fn test_non_lookups_are_literals() {
        for raw in [
            "lookup(A ,1)",
            "lookup( A,1)",
            "lookup(A,-1)",
            "lookup(A,1.5)",
            "LOOKUP(A,1)",
            "lookup(A,1) + 1",
            "lookup(A-B,1)",
            "lookup(A,99999999999999999999999999)",
            "hello",
            "",
        ] {
            assert_eq!(RawExpr::parse(raw), RawExpr::Literal(raw), "{raw}");
        }
    }
}
