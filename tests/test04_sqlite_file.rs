#![cfg(feature = "sqlite")]

use sql_accessor::prelude::*;

#[test]
fn reconnect_switches_database_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let first = dir.path().join("first.db");
    let second = dir.path().join("second.db");

    let mut db = Database::new(DatabaseConfig::sqlite(first.to_string_lossy()))?;
    db.query("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)", None)?;
    db.query("INSERT INTO notes (body) VALUES ('kept')", None)?;
    assert_eq!(db.insert_id(), Some(1));

    db.connect(ConnectOptions::new().name(second.to_string_lossy()))?;
    assert_eq!(db.insert_id(), None);
    assert!(db.query("SELECT * FROM notes", None).is_err());

    db.connect(ConnectOptions::new().name(first.to_string_lossy()))?;
    db.query("SELECT body FROM notes", None)?;
    assert_eq!(
        db.fetch_array(FetchMode::item("body")),
        Fetched::Scalar(SqlValue::from("kept"))
    );
    Ok(())
}

#[test]
fn config_from_json_drives_the_accessor() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("json.db");
    let json = serde_json::json!({
        "type": "sqlite",
        "name": path.to_string_lossy(),
        "row_shape": "num",
    });
    let config: DatabaseConfig = serde_json::from_value(json)?;

    let mut db = Database::new(config)?;
    db.query("CREATE TABLE t (a INTEGER, b TEXT)", None)?;
    db.query(
        "INSERT INTO t (a, b) VALUES (?, ?)",
        Some(vec![SqlValue::Int(10), SqlValue::from("ten")].into()),
    )?;
    db.query("SELECT a, b FROM t", None)?;
    assert_eq!(db.fetch_array(FetchMode::item("1")), Fetched::Scalar(SqlValue::from("ten")));
    Ok(())
}

#[test]
fn stored_values_round_trip_through_sqlite() -> Result<(), AccessorError> {
    let mut db = Database::new(DatabaseConfig::sqlite_memory())?;
    db.query("CREATE TABLE v (i INTEGER, f REAL, t TEXT, b BLOB, flag BOOLEAN, j TEXT, n TEXT)", None)?;
    db.prepare("INSERT INTO v VALUES (?, ?, ?, ?, ?, ?, ?)", DEFAULT_STATEMENT)?
        .execute(
            vec![
                SqlValue::Int(3),
                SqlValue::Float(1.5),
                SqlValue::from("hi"),
                SqlValue::Blob(vec![0xde, 0xad]),
                SqlValue::Bool(true),
                SqlValue::Json(serde_json::json!({"k": [1, 2]})),
                SqlValue::Null,
            ],
            DEFAULT_STATEMENT,
        )?;

    db.query("SELECT * FROM v", None)?;
    let fetched = db.fetch_array(FetchMode::Single);
    let row = fetched.as_row().expect("one row");
    assert_eq!(row.get("i"), Some(&SqlValue::Int(3)));
    assert_eq!(row.get("f").and_then(SqlValue::as_float), Some(1.5));
    assert_eq!(row.get("b").and_then(SqlValue::as_blob), Some(&[0xde, 0xad][..]));
    assert_eq!(row.get("flag").and_then(SqlValue::as_bool), Some(&true));
    assert_eq!(row.get("j").and_then(SqlValue::as_text), Some(r#"{"k":[1,2]}"#));
    assert!(row.get("n").is_some_and(SqlValue::is_null));
    Ok(())
}

#[cfg(not(feature = "postgres"))]
#[test]
fn uncompiled_dialect_fails_to_connect() {
    let config = DatabaseConfig {
        db_type: DatabaseType::Postgres,
        ..DatabaseConfig::default()
    };
    let err = Database::new(config).err().expect("postgres is not compiled in");
    assert!(matches!(err, AccessorError::Connection { step: Step::Connect, .. }));
}

#[test]
fn mysql_is_rejected_as_configuration() {
    let err = DatabaseConfig::from_pairs([("type", "mysql")]).unwrap_err();
    assert!(matches!(err, AccessorError::Config(_)));
}
