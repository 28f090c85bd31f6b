// ==========================================
// CORE kesim listesi - configuration layer
// ==========================================
// Geometry parameters + persistent settings store.
// ==========================================

pub mod config_manager;
pub mod geometry;

pub use config_manager::{config_keys, ConfigManager};
pub use geometry::GeometryParams;
