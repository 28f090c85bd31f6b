// ==========================================
// CORE kesim listesi - domain layer
// ==========================================
// Entities and value types only; no I/O, no rules.
// ==========================================

pub mod panel;
pub mod types;

pub use panel::{ClassifiedPanel, GroupedRow, RawPanelRow, SkippedRow};
pub use types::{labeled, CabinetClass, PartType, CHANNEL_SUFFIX};
