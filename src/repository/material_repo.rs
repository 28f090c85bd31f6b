// ==========================================
// CORE kesim listesi - material registry
// ==========================================
// Responsibility: materials table (material code -> thickness)
// Mutations come from user confirmation flows, never from the
// classifier; the classifier only sees the materialized map.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct MaterialRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaterialRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS materials (
              material_code TEXT PRIMARY KEY,
              thickness_mm  INTEGER NOT NULL CHECK (thickness_mm > 0),
              updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    /// All registered materials as an in-memory map.
    ///
    /// The classifier receives this map read-only for the duration of a
    /// pass; registry mutation never overlaps classification.
    pub fn get_all(&self) -> RepositoryResult<HashMap<String, u32>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT material_code, thickness_mm FROM materials")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut map = HashMap::new();
        for row in rows {
            let (code, thickness) = row?;
            map.insert(code, thickness as u32);
        }
        Ok(map)
    }

    /// Insert or overwrite one material. Thickness must be positive.
    pub fn upsert(&self, material_code: &str, thickness_mm: i64) -> RepositoryResult<()> {
        if thickness_mm <= 0 {
            return Err(RepositoryError::InvalidThickness {
                material: material_code.to_string(),
                value: thickness_mm,
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO materials (material_code, thickness_mm, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(material_code) DO UPDATE SET
                thickness_mm = excluded.thickness_mm,
                updated_at = excluded.updated_at
            "#,
            params![material_code.trim(), thickness_mm],
        )?;
        Ok(())
    }

    /// Remove one material; Ok(false) when it was not registered.
    pub fn remove(&self, material_code: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM materials WHERE material_code = ?1",
            params![material_code],
        )?;
        Ok(affected > 0)
    }

    /// Clear the whole registry.
    pub fn clear(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM materials", [])?;
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM materials", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn temp_repo() -> (NamedTempFile, MaterialRepository) {
        let file = NamedTempFile::new().unwrap();
        let repo = MaterialRepository::new(file.path().to_str().unwrap()).unwrap();
        (file, repo)
    }

    #[test]
    fn test_upsert_and_get_all() {
        let (_f, repo) = temp_repo();
        repo.upsert("LAM BEYAZ 18MM", 18).unwrap();
        repo.upsert("MDF 8MM", 8).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.get("LAM BEYAZ 18MM"), Some(&18));
        assert_eq!(all.get("MDF 8MM"), Some(&8));
    }

    #[test]
    fn test_upsert_overwrites() {
        let (_f, repo) = temp_repo();
        repo.upsert("LAM BEYAZ 18MM", 18).unwrap();
        repo.upsert("LAM BEYAZ 18MM", 16).unwrap();
        assert_eq!(repo.get_all().unwrap().get("LAM BEYAZ 18MM"), Some(&16));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_invalid_thickness_rejected() {
        let (_f, repo) = temp_repo();
        let err = repo.upsert("LAM BEYAZ 18MM", 0).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidThickness { .. }));
        let err = repo.upsert("LAM BEYAZ 18MM", -3).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidThickness { .. }));
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_remove_and_clear() {
        let (_f, repo) = temp_repo();
        repo.upsert("A", 18).unwrap();
        repo.upsert("B", 8).unwrap();

        assert!(repo.remove("A").unwrap());
        assert!(!repo.remove("A").unwrap());

        repo.clear().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }
}
