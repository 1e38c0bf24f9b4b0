mod common;

use cellgraph_core::{CellValue, ColumnDefinition, ColumnType, SheetRegistry};
use common::{registry_with_sheet, text, value};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_cell_updates() {
    let (registry, id) = registry_with_sheet();
    let registry = Arc::new(registry);

    let r1 = Arc::clone(&registry);
    let t1 = thread::spawn(move || r1.set_cell(id, "A", 10, "foo"));
    let r2 = Arc::clone(&registry);
    let t2 = thread::spawn(move || r2.set_cell(id, "B", 10, "true"));

    t1.join().unwrap().unwrap();
    t2.join().unwrap().unwrap();

    assert_eq!(value(&registry, id, "A,10"), text("foo"));
    assert_eq!(value(&registry, id, "B,10"), Some(CellValue::Bool(true)));
}

#[test]
fn test_readers_never_see_partial_writes() {
    let (registry, id) = registry_with_sheet();
    let registry = Arc::new(registry);
    registry.set_cell(id, "A", 1, "v0").unwrap();
    for row in 1..=20 {
        registry.set_cell(id, "C", row, "lookup(A,1)").unwrap();
    }

    let writer = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for n in 1..=200 {
                registry.set_cell(id, "A", 1, &format!("v{n}")).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..200 {
                    let data = registry.sheet_data(id).unwrap();
                    let source = data.get("A,1").cloned();
                    for row in 1..=20 {
                        assert_eq!(data.get(&format!("C,{row}")).cloned(), source);
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(value(&registry, id, "C,20"), text("v200"));
}

#[test]
fn test_concurrent_sheet_creation() {
    let registry = Arc::new(SheetRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..25)
                    .map(|_| {
                        registry.create_sheet(vec![ColumnDefinition::new("A", ColumnType::Int)])
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 200);
    assert_eq!(registry.len(), 200);
    assert_eq!(ids.first(), Some(&1));
    assert_eq!(ids.last(), Some(&200));
}
