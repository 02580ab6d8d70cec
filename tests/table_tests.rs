//! Table tests
//!
//! Tests for the immediate write path, point lookup and the mean aggregate.
//! Run with: cargo test --test table_tests

use memtab::{Database, DbError, Key, Table, Value};

#[test]
fn test_immediate_insert_and_read() {
    let mut table = Table::new("temperature");

    table.insert([(10, 10), (20, 11), (30, 9)]).unwrap();

    assert_eq!(table.mean(), 10.0);
    assert_eq!(table.lookup(20).unwrap(), Value::Integer(11));
    assert_eq!(table.len(), 3);
}

#[test]
fn test_overwrite_rejected_in_immediate_mode() {
    let mut table = Table::new("temperature");
    table.insert([(10, 10)]).unwrap();

    let result = table.insert([(10, 20)]);
    assert!(matches!(result, Err(DbError::OverwriteNotAllowed(_, _))));

    // The committed store is untouched.
    assert_eq!(table.lookup(10).unwrap(), Value::Integer(10));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_failed_batch_keeps_earlier_pairs() {
    let mut table = Table::new("t");
    table.insert([(2, 20)]).unwrap();

    // First pair lands before the second one hits the existing key.
    let result = table.insert([(1, 10), (2, 99), (3, 30)]);
    assert!(result.is_err());

    assert_eq!(table.lookup(1).unwrap(), Value::Integer(10));
    assert_eq!(table.lookup(2).unwrap(), Value::Integer(20));
    assert!(table.lookup(3).is_err());
}

#[test]
fn test_duplicate_key_in_batch_is_invalid_input() {
    let mut table = Table::new("t");

    let result = table.insert([(1, 10), (1, 20)]);
    assert!(matches!(result, Err(DbError::InvalidInput(_))));

    // Rejected before anything is applied.
    assert!(table.is_empty());
}

#[test]
fn test_immediate_delete() {
    let mut table = Table::new("t");
    table.insert([(1, 10), (2, 20)]).unwrap();

    table.delete([1]).unwrap();
    assert!(table.lookup(1).is_err());
    assert_eq!(table.len(), 1);
}

#[test]
fn test_immediate_delete_of_missing_key_is_noop() {
    let mut table = Table::new("t");
    table.insert([(1, 10)]).unwrap();

    // Outside a transaction a missing key is skipped, not an error.
    table.delete([999]).unwrap();
    table.delete([999, 1]).unwrap();

    assert!(table.is_empty());
}

#[test]
fn test_lookup_missing_key() {
    let table = Table::new("temperature");
    let result = table.lookup(42);
    match result {
        Err(DbError::KeyNotFound(table_name, key)) => {
            assert_eq!(table_name, "temperature");
            assert_eq!(key, Key::Integer(42));
        }
        other => panic!("expected KeyNotFound, got {:?}", other),
    }
}

#[test]
fn test_mean_on_empty_table() {
    let table = Table::new("t");
    assert_eq!(table.mean(), 0.0);
}

#[test]
fn test_mean_mixes_integers_and_floats() {
    let mut table = Table::new("t");
    table.insert([(1, Value::Integer(1)), (2, Value::Float(2.0))]).unwrap();

    assert_eq!(table.mean(), 1.5);
}

#[test]
fn test_text_keys() {
    let mut table = Table::new("sensors");
    table
        .insert([("hall", Value::Float(21.5)), ("roof", Value::Float(18.0))])
        .unwrap();

    assert_eq!(table.lookup("hall").unwrap(), Value::Float(21.5));
    assert!(table.contains_key("roof"));
    assert!(!table.contains_key("basement"));
}

#[test]
fn test_tables_do_not_share_storage() {
    let mut db = Database::new(["temperature", "pressure"]).unwrap();

    db.get_mut("temperature").unwrap().insert([(10, 10)]).unwrap();

    let pressure = db.get("pressure").unwrap();
    assert!(pressure.is_empty());
    assert_eq!(pressure.mean(), 0.0);
}

#[test]
fn test_key_value_serialization_round_trip() {
    let key = Key::Text("roof".to_string());
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(serde_json::from_str::<Key>(&json).unwrap(), key);

    let value = Value::Float(21.5);
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(serde_json::from_str::<Value>(&json).unwrap(), value);
}
