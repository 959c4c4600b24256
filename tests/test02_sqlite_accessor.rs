#![cfg(feature = "sqlite")]

use sql_accessor::prelude::*;

fn users_db() -> Result<Database, AccessorError> {
    let mut db = Database::new(DatabaseConfig::sqlite_memory())?;
    db.query(
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE, email TEXT)",
        None,
    )?;
    Ok(db)
}

fn seed(db: &mut Database, names: &[&str]) -> Result<(), AccessorError> {
    db.prepare("INSERT INTO users (name) VALUES (?)", "seed")?;
    for name in names {
        db.execute(vec![SqlValue::from(*name)], "seed")?;
    }
    Ok(())
}

#[test]
fn fresh_accessor_has_no_rows() -> Result<(), AccessorError> {
    let db = Database::new(DatabaseConfig::sqlite_memory())?;
    assert_eq!(db.num_rows(), 0);
    assert_eq!(db.insert_id(), None);
    assert!(db.fetch_array(FetchMode::All).is_empty());
    Ok(())
}

#[test]
fn prepared_insert_captures_id_and_returns_no_rows() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    db.prepare("INSERT INTO users (name) VALUES (?)", "new_user")?
        .execute(vec![SqlValue::from("Alice")], "new_user")?;

    assert_eq!(db.num_rows(), 0);
    assert!(db.insert_id().is_some_and(|id| id > 0));
    assert!(db.fetch_array(FetchMode::Single).is_empty());

    db.execute([SqlValue::from("Bob")], "new_user")?;
    assert_eq!(db.insert_id(), Some(2));
    Ok(())
}

#[test]
fn many_rows_override_the_requested_mode() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    seed(&mut db, &["Alice", "Bob", "Carol"])?;

    db.query("SELECT * FROM users", None)?;
    assert_eq!(db.num_rows(), 3);
    assert_eq!(db.fetch_array(FetchMode::All).into_rows().len(), 3);

    let default = db.fetch_array(FetchMode::Single);
    let rows = default.as_rows().expect("three rows come back as a sequence");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].get("name"), Some(&SqlValue::from("Carol")));
    Ok(())
}

#[test]
fn single_row_item_returns_the_scalar() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    seed(&mut db, &["Alice", "Bob"])?;

    db.query("SELECT name FROM users WHERE id = 1", None)?;
    assert_eq!(db.num_rows(), 1);
    assert_eq!(
        db.fetch_array(FetchMode::item("name")),
        Fetched::Scalar(SqlValue::from("Alice"))
    );
    assert!(db.fetch_array(FetchMode::item("email")).is_empty());

    let row = db.fetch_array(FetchMode::Single);
    assert_eq!(row.as_row().and_then(|r| r.get("name")), Some(&SqlValue::from("Alice")));
    assert_eq!(db.fetch_array(FetchMode::All).into_rows().len(), 1);
    Ok(())
}

#[test]
fn blank_query_is_rejected() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    seed(&mut db, &["Alice"])?;
    assert!(db.insert_id().is_some());

    assert!(matches!(db.query("", None), Err(AccessorError::EmptyQuery)));
    assert!(matches!(db.query("   \n", None), Err(AccessorError::EmptyQuery)));
    assert!(matches!(db.query(";", None), Err(AccessorError::EmptyQuery)));
    assert!(matches!(db.query("-- nothing to run", None), Err(AccessorError::EmptyQuery)));
    // the failed call still cleared the previous outcome
    assert_eq!(db.insert_id(), None);
    Ok(())
}

#[test]
fn query_with_params_binds_positionally_and_by_name() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    seed(&mut db, &["Alice", "Bob", "Carol"])?;

    db.query(
        "SELECT id FROM users WHERE name = ?",
        Some(vec![SqlValue::from("Bob")].into()),
    )?;
    assert_eq!(db.fetch_array(FetchMode::item("id")), Fetched::Scalar(SqlValue::Int(2)));

    db.query(
        "SELECT name FROM users WHERE id > :min ORDER BY id",
        Some(Params::from([("min", SqlValue::Int(1))])),
    )?;
    assert_eq!(db.num_rows(), 2);
    // not registered
    assert_eq!(db.statement_sql(DEFAULT_STATEMENT), None);
    Ok(())
}

#[test]
fn insert_detection_is_a_substring_test() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    seed(&mut db, &["Alice"])?;

    db.query("UPDATE users SET email = 'a@x' WHERE name = 'Alice'", None)?;
    assert_eq!(db.insert_id(), None);

    // "insert" appears in a literal, so the id is captured even though nothing was inserted
    db.query("UPDATE users SET email = 'insert@x' WHERE name = 'Alice'", None)?;
    assert_eq!(db.insert_id(), Some(1));

    db.query("insert into users (name) values ('Dave')", None)?;
    assert_eq!(db.insert_id(), Some(2));
    assert_eq!(db.num_rows(), 0);
    Ok(())
}

#[test]
fn non_select_query_does_not_fetch() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    seed(&mut db, &["Alice"])?;

    db.query("SELECT * FROM users", None)?;
    assert_eq!(db.num_rows(), 1);

    // returns rows, but its leading keyword is not SELECT
    db.query("WITH u AS (SELECT * FROM users) SELECT * FROM u", None)?;
    assert_eq!(db.num_rows(), 0);

    db.query("  select name from users", None)?;
    assert_eq!(db.num_rows(), 1);
    Ok(())
}

#[test]
fn execute_fetches_any_row_returning_statement() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    seed(&mut db, &["Alice", "Bob"])?;

    db.prepare("WITH u AS (SELECT * FROM users) SELECT name FROM u ORDER BY id", DEFAULT_STATEMENT)?;
    db.execute(Params::None, DEFAULT_STATEMENT)?;
    assert_eq!(db.num_rows(), 2);
    assert_eq!(db.insert_id(), None);
    Ok(())
}

#[test]
fn preparing_again_replaces_the_statement() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    seed(&mut db, &["Alice", "Bob"])?;

    db.prepare("SELECT name FROM users WHERE id = ?", "lookup")?;
    db.prepare("SELECT email FROM users WHERE id = ?", "lookup")?;
    assert_eq!(db.statement_sql("lookup"), Some("SELECT email FROM users WHERE id = ?"));

    db.execute([SqlValue::Int(1)], "lookup")?;
    assert_eq!(db.fetch_array(FetchMode::item("email")), Fetched::Scalar(SqlValue::Null));
    assert!(db.fetch_array(FetchMode::item("name")).is_empty());
    Ok(())
}

#[test]
fn failures_name_their_step() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    seed(&mut db, &["Alice"])?;

    let err = db.prepare("SELEC * FROM users", "broken").err().expect("bad sql");
    assert!(matches!(err, AccessorError::Prepare { operation: Operation::Prepare, .. }));

    let err = db.execute(Params::None, "never_prepared").err().expect("unknown");
    assert!(matches!(err, AccessorError::UnknownStatement { ref name } if name == "never_prepared"));

    let err = db.execute([SqlValue::from("Alice")], "seed").err().expect("duplicate");
    assert!(matches!(
        err,
        AccessorError::Execution { operation: Operation::Execute, step: Step::Execute, .. }
    ));
    assert!(err.to_string().contains("UNIQUE"));

    let err = db
        .query("SELECT * FROM missing WHERE id = ?", Some(vec![SqlValue::Int(1)].into()))
        .err()
        .expect("missing table");
    assert!(matches!(err, AccessorError::Prepare { operation: Operation::Query, .. }));

    let err = db.query("SELECT * FROM missing", None).err().expect("missing table");
    assert_eq!(err.step(), Some(Step::Execute));
    assert_eq!(err.operation(), Some(Operation::Query));
    Ok(())
}

#[test]
fn row_shapes_change_the_keys() -> Result<(), AccessorError> {
    let mut db = users_db()?;
    seed(&mut db, &["Alice"])?;

    assert!(db.set_config("row_shape", "num")?);
    db.query("SELECT id, name FROM users", None)?;
    let row = db.fetch_array(FetchMode::Single);
    let row = row.as_row().expect("one row");
    assert_eq!(row.column_names(), ["0", "1"]);
    assert_eq!(row.get("1"), Some(&SqlValue::from("Alice")));

    db.set_config("row_shape", "both")?;
    db.query("SELECT id, name FROM users", None)?;
    let row = db.fetch_array(FetchMode::Single);
    let row = row.as_row().expect("one row");
    assert_eq!(row.column_names(), ["id", "0", "name", "1"]);
    assert_eq!(row.get("name"), row.get("1"));
    Ok(())
}

#[test]
fn repeated_column_names_keep_the_last_value() -> Result<(), AccessorError> {
    let mut db = Database::new(DatabaseConfig::sqlite_memory())?;

    db.query("SELECT 1 AS id, 2 AS id", None)?;
    assert_eq!(db.fetch_array(FetchMode::item("id")), Fetched::Scalar(SqlValue::Int(2)));
    let fetched = db.fetch_array(FetchMode::Single);
    let row = fetched.as_row().expect("one row");
    assert_eq!(row.column_names(), ["id"]);
    assert_eq!(row.iter().count(), 1);

    db.set_config("row_shape", "both")?;
    db.query("SELECT 1 AS id, 2 AS id", None)?;
    let fetched = db.fetch_array(FetchMode::Single);
    let row = fetched.as_row().expect("one row");
    assert_eq!(row.column_names(), ["id", "0", "1"]);
    assert_eq!(row.get("id"), Some(&SqlValue::Int(2)));
    assert_eq!(row.get("0"), Some(&SqlValue::Int(1)));
    Ok(())
}
