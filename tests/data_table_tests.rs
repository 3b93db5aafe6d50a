use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::bail;
use prettypage::{DataTableRegistry, PageError, Table, TableEntry, Value};

#[test]
fn test_add_table_and_get() {
    let mut registry = DataTableRegistry::new();
    registry
        .add_table("Build", Table::new().with("commit", "abc123"))
        .unwrap();

    match registry.get_tables("Build") {
        Some(TableEntry::Table(table)) => {
            assert_eq!(table.get("commit"), Some(&Value::from("abc123")));
        }
        other => panic!("unexpected entry: {:?}", other),
    }
    assert!(registry.get_tables("Missing").is_none());
    assert!(registry.evaluate_one("Missing").is_empty());
}

#[test]
fn test_producer_is_lazy() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut registry = DataTableRegistry::new();
    registry
        .add_table_producer("Expensive", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::map([("rows", 10i64)]))
        })
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(registry.get_tables("Expensive").unwrap().is_deferred());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let tables = registry.evaluate();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(tables[0].1.get("rows"), Some(&Value::Integer(10)));

    registry.evaluate();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_failing_producer_yields_empty_table() {
    let mut registry = DataTableRegistry::new();
    registry
        .add_table_producer("X", || bail!("database is down"))
        .unwrap();

    let table = registry.evaluate_one("X");
    assert!(table.is_empty());
}

#[test]
fn test_scalar_producer_yields_empty_table() {
    let mut registry = DataTableRegistry::new();
    registry
        .add_table_producer("X", || Ok(Value::from(42i64)))
        .unwrap();
    registry
        .add_table_producer("Y", || Ok(Value::from("not a table")))
        .unwrap();

    let tables = registry.evaluate();
    assert!(tables.iter().all(|(_, t)| t.is_empty()));
}

#[test]
fn test_list_producer_is_keyed_by_position() {
    let mut registry = DataTableRegistry::new();
    registry
        .add_table_producer("Queries", || Ok(Value::list(["SELECT 1", "SELECT 2"])))
        .unwrap();

    let table = registry.evaluate_one("Queries");
    assert_eq!(table.get("1"), Some(&Value::from("SELECT 2")));
}

#[test]
fn test_relabel_overwrites() {
    let mut registry = DataTableRegistry::new();
    registry.add_table("A", Table::new().with("k", 1i64)).unwrap();
    registry.add_table("B", Table::new()).unwrap();
    registry
        .add_table_producer("A", || Ok(Value::map([("k", 2i64)])))
        .unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.entries()[0].0, "A");
    assert_eq!(registry.evaluate_one("A").get("k"), Some(&Value::Integer(2)));
}

#[test]
fn test_empty_label_is_rejected() {
    let mut registry = DataTableRegistry::new();
    let err = registry.add_table(" ", Table::new()).unwrap_err();
    assert!(matches!(err, PageError::Configuration(_)));
    assert!(registry.is_empty());
}

#[test]
fn test_merge_prefers_registered_tables() {
    let mut registry = DataTableRegistry::new();
    registry
        .add_table("Session", Table::new().with("user", "alice"))
        .unwrap();
    registry.add_table("Build", Table::new()).unwrap();

    let builtin = vec![
        ("GET Data".to_string(), Table::new().with("q", "1")),
        ("Session".to_string(), Table::new()),
    ];
    let merged = registry.merged_with(builtin);

    let labels: Vec<&str> = merged.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["Session", "Build", "GET Data"]);
    assert_eq!(merged[0].1.get("user"), Some(&Value::from("alice")));
}
