pub mod migrations;
pub mod queries;

use anyhow::Context;
use rusqlite::Connection;

/// Opens the local storage database, creating it on first use.
pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open local storage")?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .context("failed to set local storage pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}
