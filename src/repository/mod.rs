// ==========================================
// CORE kesim listesi - repository layer
// ==========================================
// SQLite-backed stores. Each repository owns its table DDL and keeps
// the connection behind Arc<Mutex<..>> so the same database file can
// be shared across repositories.
// ==========================================

pub mod error;
pub mod history_repo;
pub mod learned_rule_repo;
pub mod material_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use history_repo::{HistoryEntry, HistoryRepository, HistoryStats, NewHistoryEntry};
pub use learned_rule_repo::{LearnedRule, LearnedRuleRepository, RuleKey};
pub use material_repo::MaterialRepository;
