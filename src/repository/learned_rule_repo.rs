// ==========================================
// CORE kesim listesi - learned-rule registry
// ==========================================
// Responsibility: learned_rules table
//   (long_mm, short_mm, material) -> part-type label
// Created only through explicit user confirmation; a later save
// for the same key overwrites the earlier one (the most recent
// human correction wins over the heuristic cascade).
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Key of one learned rule: long/short axis in mm plus material code.
pub type RuleKey = (u32, u32, String);

/// Batch upsert payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedRule {
    pub long_mm: u32,
    pub short_mm: u32,
    pub material: String,
    pub part_label: String,
}

pub struct LearnedRuleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LearnedRuleRepository {
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
            CREATE TABLE IF NOT EXISTS learned_rules (
              long_mm    INTEGER NOT NULL,
              short_mm   INTEGER NOT NULL,
              material   TEXT NOT NULL,
              part_label TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (long_mm, short_mm, material)
            );
            "#,
        )?;
        Ok(())
    }

    /// All learned rules as an in-memory map, keyed by (long, short, material).
    pub fn get_all(&self) -> RepositoryResult<HashMap<RuleKey, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT long_mm, short_mm, material, part_label FROM learned_rules")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)? as u32,
                row.get::<_, i64>(1)? as u32,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut map = HashMap::new();
        for row in rows {
            let (long, short, material, label) = row?;
            map.insert((long, short, material), label);
        }
        Ok(map)
    }

    /// Batch upsert, last write per key wins. One transaction for the batch.
    pub fn upsert_many(&self, rules: &[LearnedRule]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;

        let mut count = 0;
        for rule in rules {
            tx.execute(
                r#"
                INSERT INTO learned_rules (long_mm, short_mm, material, part_label, updated_at)
                VALUES (?1, ?2, ?3, ?4, datetime('now'))
                ON CONFLICT(long_mm, short_mm, material) DO UPDATE SET
                    part_label = excluded.part_label,
                    updated_at = excluded.updated_at
                "#,
                params![
                    rule.long_mm as i64,
                    rule.short_mm as i64,
                    rule.material.trim(),
                    rule.part_label
                ],
            )?;
            count += 1;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;
        Ok(count)
    }

    /// Remove one rule; Ok(false) when the key was not present.
    pub fn remove(&self, long_mm: u32, short_mm: u32, material: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM learned_rules WHERE long_mm = ?1 AND short_mm = ?2 AND material = ?3",
            params![long_mm as i64, short_mm as i64, material],
        )?;
        Ok(affected > 0)
    }

    /// Clear all learned rules.
    pub fn clear(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM learned_rules", [])?;
        Ok(())
    }
}
