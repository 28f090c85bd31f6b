// ==========================================
// CORE kesim listesi - SQLite connection init
// ==========================================
// Goals:
// - one place for PRAGMA behaviour, so foreign keys are never
//   "on in some modules, off in others"
// - unified busy_timeout to absorb concurrent writer hiccups
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMA set to a connection.
///
/// foreign_keys and busy_timeout are per-connection settings and must be
/// re-applied for every `Connection::open`.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Default database location under the platform data directory
/// (e.g. ~/.local/share/core/core.db), falling back to the working
/// directory when no data dir is available.
pub fn default_db_path() -> String {
    let mut dir = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    dir.push("core");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(error = %e, "could not create data directory, using cwd");
        return "core.db".to_string();
    }
    dir.push("core.db");
    dir.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_applies_pragmas() {
        let file = NamedTempFile::new().unwrap();
        let conn = open_sqlite_connection(file.path().to_str().unwrap()).unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }
}
