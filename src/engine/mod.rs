// ==========================================
// CORE kesim listesi - classification engine
// ==========================================
// channel/module_label: cell-level feature extraction
// classifier: the decision cascade
// exporter: partition + compact + sort
// analyzer: per-file orchestration
// ==========================================

pub mod analyzer;
pub mod channel;
pub mod classifier;
pub mod exporter;
pub mod module_label;

pub use analyzer::{AnalysisReport, Analyzer, FileCheck, RunSummary};
pub use classifier::{classify, ClassifyContext};
pub use exporter::{build_tables, merge_tables, AnalysisTables};
