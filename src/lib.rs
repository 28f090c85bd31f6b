// ==========================================
// CORE kesim listesi - core library
// ==========================================
// Cut-list classification and reporting engine:
// import -> column mapping -> part classification -> export tables,
// with SQLite-backed material, learned-rule and history stores.
// ==========================================

// Initialize internationalization
rust_i18n::i18n!("locales", fallback = "tr");

// ==========================================
// Module declarations
// ==========================================

// Domain layer: entities and types
pub mod domain;

// Repository layer: data access
pub mod repository;

// Engine layer: classification rules
pub mod engine;

// Import layer: external data
pub mod importer;

// Config layer: geometry parameters and key-value store
pub mod config;

// Database infrastructure (connection init, unified PRAGMA)
pub mod db;

// Logging
pub mod logging;

// Internationalization
pub mod i18n;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    labeled, CabinetClass, ClassifiedPanel, GroupedRow, PartType, RawPanelRow, SkippedRow,
    CHANNEL_SUFFIX,
};

pub use config::{ConfigManager, GeometryParams};

pub use repository::{
    HistoryEntry, HistoryRepository, HistoryStats, LearnedRule, LearnedRuleRepository,
    MaterialRepository, NewHistoryEntry, RepositoryError, RepositoryResult, RuleKey,
};

pub use importer::{ColumnMapper, ImportError, ImportResult, RowMapper, UniversalFileParser};

pub use engine::{
    build_tables, classify, merge_tables, AnalysisReport, AnalysisTables, Analyzer,
    ClassifyContext, FileCheck, RunSummary,
};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "CORE Kesim Listesi Analiz Motoru";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
