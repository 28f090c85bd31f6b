// ==========================================
// CORE kesim listesi - analysis history repository
// ==========================================
// Responsibility: history table (one row per analysis run, the two
// grouped tables stored as JSON) + stats table (running totals).
// The engine does not persist anything itself; the caller hands the
// finished run here for archival.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::GroupedRow;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Local;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// HistoryEntry - one archived run
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub job_no: String,
    pub date: String, // "YYYY-MM-DD HH:MM"
    pub file_name: String,
    pub total_parts: u32,
    pub material_count: u32,
    pub type_count: u32,
    pub body: Vec<GroupedRow>,
    pub thin: Vec<GroupedRow>,
}

/// Payload for archiving a run (id assigned by the store).
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub job_no: String,
    pub file_name: String,
    pub total_parts: u32,
    pub material_count: u32,
    pub type_count: u32,
    pub body: Vec<GroupedRow>,
    pub thin: Vec<GroupedRow>,
}

/// Aggregate counters over all archived runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_jobs: u32,
    pub total_parts: u32,
}

pub struct HistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HistoryRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_tables()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_tables()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_tables(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS history (
              id             INTEGER PRIMARY KEY AUTOINCREMENT,
              job_no         TEXT NOT NULL,
              date           TEXT NOT NULL,
              file_name      TEXT NOT NULL,
              total_parts    INTEGER NOT NULL,
              material_count INTEGER NOT NULL,
              type_count     INTEGER NOT NULL,
              body_data      TEXT NOT NULL,
              thin_data      TEXT NOT NULL,
              created_at     TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS stats (
              id          INTEGER PRIMARY KEY,
              total_jobs  INTEGER NOT NULL DEFAULT 0,
              total_parts INTEGER NOT NULL DEFAULT 0
            );

            INSERT OR IGNORE INTO stats (id) VALUES (1);

            CREATE INDEX IF NOT EXISTS idx_history_created_at
              ON history(created_at DESC);
            "#,
        )?;
        Ok(())
    }

    /// Archive one run and bump the running totals. Returns the new id.
    pub fn add(&self, entry: &NewHistoryEntry) -> RepositoryResult<i64> {
        let body_json = serde_json::to_string(&entry.body)?;
        let thin_json = serde_json::to_string(&entry.thin)?;
        let date = Local::now().format("%Y-%m-%d %H:%M").to_string();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO history
              (job_no, date, file_name, total_parts, material_count, type_count,
               body_data, thin_data)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                entry.job_no,
                date,
                entry.file_name,
                entry.total_parts as i64,
                entry.material_count as i64,
                entry.type_count as i64,
                body_json,
                thin_json,
            ],
        )?;
        let id = conn.last_insert_rowid();

        conn.execute(
            "UPDATE stats SET total_jobs = total_jobs + 1, total_parts = total_parts + ?1
             WHERE id = 1",
            params![entry.total_parts as i64],
        )?;

        Ok(id)
    }

    /// Most recent runs, newest first.
    pub fn list(&self, limit: usize) -> RepositoryResult<Vec<HistoryEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, job_no, date, file_name, total_parts, material_count,
                   type_count, body_data, thin_data
            FROM history
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], Self::map_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(Self::decode_row(row?)?);
        }
        Ok(entries)
    }

    /// Fetch specific runs by id (for merge/export flows).
    pub fn get_by_ids(&self, ids: &[i64]) -> RepositoryResult<Vec<HistoryEntry>> {
        let mut entries = Vec::new();
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, job_no, date, file_name, total_parts, material_count,
                   type_count, body_data, thin_data
            FROM history WHERE id = ?1
            "#,
        )?;
        for id in ids {
            let mut rows = stmt.query_map(params![id], Self::map_row)?;
            if let Some(row) = rows.next() {
                entries.push(Self::decode_row(row?)?);
            }
        }
        Ok(entries)
    }

    /// Delete runs and decrement the running totals. Returns deleted
    /// count. Row deletes and the stats update commit atomically so
    /// the counters cannot drift from the table.
    pub fn delete(&self, ids: &[i64]) -> RepositoryResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;

        let mut removed_parts: i64 = 0;
        let mut deleted = 0;
        {
            let mut select = tx.prepare("SELECT total_parts FROM history WHERE id = ?1")?;
            let mut remove = tx.prepare("DELETE FROM history WHERE id = ?1")?;
            for id in ids {
                let parts: Option<i64> = select
                    .query_row(params![id], |row| row.get(0))
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        other => Err(other),
                    })?;
                removed_parts += parts.unwrap_or(0);
                deleted += remove.execute(params![id])?;
            }
        }

        tx.execute(
            "UPDATE stats SET total_jobs = total_jobs - ?1, total_parts = total_parts - ?2
             WHERE id = 1",
            params![deleted as i64, removed_parts],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;
        Ok(deleted)
    }

    pub fn get_stats(&self) -> RepositoryResult<HistoryStats> {
        let conn = self.get_conn()?;
        let (jobs, parts): (i64, i64) = conn.query_row(
            "SELECT total_jobs, total_parts FROM stats WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(HistoryStats {
            total_jobs: jobs.max(0) as u32,
            total_parts: parts.max(0) as u32,
        })
    }

    /// Reads the raw columns; the two table payloads stay as JSON text
    /// so serde errors surface through RepositoryError, not rusqlite.
    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(HistoryEntry, String, String)> {
        let entry = HistoryEntry {
            id: row.get(0)?,
            job_no: row.get(1)?,
            date: row.get(2)?,
            file_name: row.get(3)?,
            total_parts: row.get::<_, i64>(4)? as u32,
            material_count: row.get::<_, i64>(5)? as u32,
            type_count: row.get::<_, i64>(6)? as u32,
            body: Vec::new(),
            thin: Vec::new(),
        };
        let body_json: String = row.get(7)?;
        let thin_json: String = row.get(8)?;
        Ok((entry, body_json, thin_json))
    }

    fn decode_row(
        raw: (HistoryEntry, String, String),
    ) -> RepositoryResult<HistoryEntry> {
        let (mut entry, body_json, thin_json) = raw;
        entry.body = serde_json::from_str(&body_json)?;
        entry.thin = serde_json::from_str(&thin_json)?;
        Ok(entry)
    }
}
