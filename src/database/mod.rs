// Copyright 2023 Remi Bernotavicius

use diesel::connection::SimpleConnection as _;
use diesel::prelude::Connection as _;
use diesel::RunQueryDsl as _;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::error::Error;
use std::path::Path;

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Rowid of the most recent insert on this connection.
pub fn last_insert_id(conn: &mut Connection) -> diesel::QueryResult<i32> {
    use diesel::dsl::sql;
    use diesel::sql_types::Integer;

    diesel::select(sql::<Integer>("last_insert_rowid()")).get_result(conn)
}

pub fn establish_connection(
    path: impl AsRef<Path>,
) -> Result<Connection, Box<dyn Error + Send + Sync + 'static>> {
    let mut connection = Connection::establish(path.as_ref().to_str().unwrap())?;
    // Concurrent submitters queue on the write lock instead of failing, and
    // the schema's foreign keys are actually enforced.
    connection.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;")?;
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(connection)
}

#[cfg(test)]
pub(crate) fn connection_for_testing() -> Connection {
    establish_connection(":memory:").unwrap()
}

#[test]
fn migrations() {
    let mut conn = connection_for_testing();

    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());

    conn.revert_all_migrations(MIGRATIONS).unwrap();
    assert!(conn.has_pending_migration(MIGRATIONS).unwrap());

    conn.run_pending_migrations(MIGRATIONS).unwrap();
    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());
}
