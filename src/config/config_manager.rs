// ==========================================
// CORE kesim listesi - configuration manager
// ==========================================
// Responsibility: load/query/override of analysis settings
// Storage: config_kv table (key-value + scope)
// The classifier itself never reads config; it receives a
// materialized GeometryParams snapshot built here.
// ==========================================

use crate::config::geometry::GeometryParams;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Open (or create) the config store at the given database path.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        let mgr = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        mgr.ensure_table()?;
        Ok(mgr)
    }

    /// Build a ConfigManager over an existing connection.
    ///
    /// Re-applies the unified PRAGMA set (idempotent) so connection
    /// behaviour stays consistent regardless of who opened it.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let guard = conn.lock().map_err(|e| format!("lock poisoned: {}", e))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        let mgr = Self { conn };
        mgr.ensure_table()?;
        Ok(mgr)
    }

    fn ensure_table(&self) -> Result<(), Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("lock poisoned: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
              scope_id TEXT NOT NULL DEFAULT 'global',
              key      TEXT NOT NULL,
              value    TEXT NOT NULL,
              PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// Read a config value (scope_id='global'); None when absent.
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("lock poisoned: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Parse a numeric config value; malformed values fall back to the
    /// default with a warning (settings are user-edited, never trusted).
    fn get_u32_or(&self, key: &str, default: u32) -> Result<u32, Box<dyn Error>> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => Ok(raw.trim().parse::<u32>().unwrap_or_else(|_| {
                tracing::warn!(config_key = key, raw_value = %raw, "malformed config value, using default");
                default
            })),
        }
    }

    /// Upsert a global-scope config value.
    pub fn set_config(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("lock poisoned: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// Snapshot of all global config as JSON (recorded alongside runs so a
    /// result can always be traced back to the geometry it was computed with).
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("lock poisoned: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// Restore global config from a snapshot JSON. Overwrites existing keys.
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("lock poisoned: {}", e))?;

        conn.execute("BEGIN TRANSACTION", [])?;
        let mut count = 0;
        for (key, value) in config_map.iter() {
            let affected = conn.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
            count += affected;
        }
        conn.execute("COMMIT", [])?;

        Ok(count)
    }

    // ===== geometry snapshot =====

    /// Materialize the full GeometryParams for one analysis run.
    ///
    /// Every field has a shop-standard default; only keys present in
    /// config_kv override it. The returned value is immutable for the run.
    pub fn geometry_params(&self) -> Result<GeometryParams, Box<dyn Error>> {
        let d = GeometryParams::default();
        Ok(GeometryParams {
            base_height_mm: self.get_u32_or(config_keys::BASE_HEIGHT, d.base_height_mm)?,
            base_depth_mm: self.get_u32_or(config_keys::BASE_DEPTH, d.base_depth_mm)?,
            wall_height_mm: self.get_u32_or(config_keys::WALL_HEIGHT, d.wall_height_mm)?,
            wall_depth_mm: self.get_u32_or(config_keys::WALL_DEPTH, d.wall_depth_mm)?,
            tall_height_mm: self.get_u32_or(config_keys::TALL_HEIGHT, d.tall_height_mm)?,
            tall_depth_mm: self.get_u32_or(config_keys::TALL_DEPTH, d.tall_depth_mm)?,

            side_offset_mm: self.get_u32_or(config_keys::SIDE_OFFSET, d.side_offset_mm)?,
            top_bottom_depth_offset_mm: self
                .get_u32_or(config_keys::TOP_BOTTOM_DEPTH_OFFSET, d.top_bottom_depth_offset_mm)?,
            fixed_shelf_depth_offset_mm: self
                .get_u32_or(config_keys::FIXED_SHELF_DEPTH_OFFSET, d.fixed_shelf_depth_offset_mm)?,
            shelf_width_offset_mm: self
                .get_u32_or(config_keys::SHELF_WIDTH_OFFSET, d.shelf_width_offset_mm)?,
            shelf_depth_base_offset_mm: self
                .get_u32_or(config_keys::SHELF_DEPTH_BASE_OFFSET, d.shelf_depth_base_offset_mm)?,
            shelf_depth_wall_offset_mm: self
                .get_u32_or(config_keys::SHELF_DEPTH_WALL_OFFSET, d.shelf_depth_wall_offset_mm)?,
            back_offset_mm: self.get_u32_or(config_keys::BACK_OFFSET, d.back_offset_mm)?,
            back_recessed_offset_mm: self
                .get_u32_or(config_keys::BACK_RECESSED_OFFSET, d.back_recessed_offset_mm)?,

            tolerance_mm: self.get_u32_or(config_keys::TOLERANCE, d.tolerance_mm)?,

            back_panel_max_thickness_mm: self
                .get_u32_or(config_keys::BACK_MAX_THICKNESS, d.back_panel_max_thickness_mm)?,
            body_default_thickness_mm: self
                .get_u32_or(config_keys::BODY_DEFAULT_THICKNESS, d.body_default_thickness_mm)?,

            rail_min_mm: self.get_u32_or(config_keys::RAIL_MIN, d.rail_min_mm)?,
            rail_max_mm: self.get_u32_or(config_keys::RAIL_MAX, d.rail_max_mm)?,
        })
    }
}

// ==========================================
// Config key constants
// ==========================================
// Key names follow the original settings vocabulary (Turkish).
pub mod config_keys {
    pub const BASE_HEIGHT: &str = "standart_yukseklik";
    pub const BASE_DEPTH: &str = "standart_derinlik";
    pub const WALL_HEIGHT: &str = "ust_dolap_yukseklik";
    pub const WALL_DEPTH: &str = "ust_dolap_derinlik";
    pub const TALL_HEIGHT: &str = "boy_dolap_yukseklik";
    pub const TALL_DEPTH: &str = "boy_dolap_derinlik";

    pub const SIDE_OFFSET: &str = "yan_dusumu";
    pub const TOP_BOTTOM_DEPTH_OFFSET: &str = "alt_ust_derinlik_dusumu";
    pub const FIXED_SHELF_DEPTH_OFFSET: &str = "sabit_derinlik_dusumu";
    pub const SHELF_WIDTH_OFFSET: &str = "raf_genislik_dusumu";
    pub const SHELF_DEPTH_BASE_OFFSET: &str = "raf_derinlik_alt_dolap";
    pub const SHELF_DEPTH_WALL_OFFSET: &str = "raf_derinlik_ust_dolap";
    pub const BACK_OFFSET: &str = "arkalik_dusumu";
    pub const BACK_RECESSED_OFFSET: &str = "arkalik_icerde_dusumu";

    pub const TOLERANCE: &str = "tolerans";

    pub const BACK_MAX_THICKNESS: &str = "arkalik_max_kalinlik";
    pub const BODY_DEFAULT_THICKNESS: &str = "govde_kalinlik";

    pub const RAIL_MIN: &str = "kayit_min";
    pub const RAIL_MAX: &str = "kayit_max";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn temp_manager() -> (NamedTempFile, ConfigManager) {
        let file = NamedTempFile::new().unwrap();
        let mgr = ConfigManager::new(file.path().to_str().unwrap()).unwrap();
        (file, mgr)
    }

    #[test]
    fn test_geometry_defaults_without_overrides() {
        let (_f, mgr) = temp_manager();
        let g = mgr.geometry_params().unwrap();
        assert_eq!(g, GeometryParams::default());
    }

    #[test]
    fn test_geometry_override() {
        let (_f, mgr) = temp_manager();
        mgr.set_config(config_keys::TOLERANCE, "10").unwrap();
        mgr.set_config(config_keys::BASE_DEPTH, "560").unwrap();
        let g = mgr.geometry_params().unwrap();
        assert_eq!(g.tolerance_mm, 10);
        assert_eq!(g.base_depth_mm, 560);
        assert_eq!(g.base_height_mm, 720); // untouched default
    }

    #[test]
    fn test_malformed_value_falls_back() {
        let (_f, mgr) = temp_manager();
        mgr.set_config(config_keys::TOLERANCE, "çok").unwrap();
        let g = mgr.geometry_params().unwrap();
        assert_eq!(g.tolerance_mm, GeometryParams::default().tolerance_mm);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let (_f, mgr) = temp_manager();
        mgr.set_config(config_keys::TOLERANCE, "7").unwrap();
        let snapshot = mgr.get_config_snapshot().unwrap();

        mgr.set_config(config_keys::TOLERANCE, "3").unwrap();
        let restored = mgr.restore_config_from_snapshot(&snapshot).unwrap();
        assert!(restored >= 1);
        assert_eq!(mgr.geometry_params().unwrap().tolerance_mm, 7);
    }
}
