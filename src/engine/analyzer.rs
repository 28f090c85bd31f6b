// ==========================================
// CORE kesim listesi - analysis orchestration
// ==========================================
// Ties the layers together for one file: parse -> resolve columns ->
// map rows -> classify -> build tables. The analyzer reads the
// filesystem through the importer only; registries arrive as an
// already-materialized ClassifyContext and are never mutated here.
// ==========================================

use crate::domain::{ClassifiedPanel, SkippedRow};
use crate::engine::classifier::{classify, ClassifyContext};
use crate::engine::exporter::{build_tables, AnalysisTables};
use crate::importer::{ColumnMapper, Field, ImportResult, RowMapper, UniversalFileParser};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

// ==========================================
// Report types
// ==========================================
/// Pre-flight result: what the file looks like before committing to
/// a full run (used by the confirmation flow for unknown materials).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCheck {
    pub file_name: String,
    pub row_count: usize,
    pub materials: Vec<String>,
    /// materials not present in the registry (would fall back to the
    /// body default thickness)
    pub unknown_materials: Vec<String>,
    pub job_no: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_parts: u32,
    pub material_count: u32,
    pub type_count: u32,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub job_no: String,
    pub file_name: String,
    pub tables: AnalysisTables,
    pub summary: RunSummary,
    pub skipped: Vec<SkippedRow>,
}

pub struct Analyzer;

impl Analyzer {
    /// Pre-flight inspection. Column resolution failures surface here
    /// with the same error the full run would produce.
    pub fn check_file<P: AsRef<Path>>(
        &self,
        path: P,
        ctx: &ClassifyContext,
    ) -> ImportResult<FileCheck> {
        let path = path.as_ref();
        let parsed = UniversalFileParser.parse(path)?;
        let columns = ColumnMapper.resolve(&parsed.headers)?;

        let mut materials: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for row in &parsed.rows {
            if let Some(m) = columns.value(row, Field::Material) {
                if seen.insert(m.to_string()) {
                    materials.push(m.to_string());
                }
            }
        }
        let unknown_materials: Vec<String> = materials
            .iter()
            .filter(|m| !ctx.materials.contains_key(*m))
            .cloned()
            .collect();

        Ok(FileCheck {
            file_name: file_name_of(path),
            row_count: parsed.rows.len(),
            job_no: find_job_no(&parsed.rows, &columns),
            materials,
            unknown_materials,
        })
    }

    /// Full pipeline for one file.
    pub fn analyze_file<P: AsRef<Path>>(
        &self,
        path: P,
        ctx: &ClassifyContext,
    ) -> ImportResult<AnalysisReport> {
        let path = path.as_ref();
        let parsed = UniversalFileParser.parse(path)?;
        let columns = ColumnMapper.resolve(&parsed.headers)?;

        let job_no = find_job_no(&parsed.rows, &columns)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut panels: Vec<ClassifiedPanel> = Vec::new();
        let mut skipped: Vec<SkippedRow> = Vec::new();
        for (idx, row) in parsed.rows.iter().enumerate() {
            match RowMapper.map_row(&columns, row, idx + 1) {
                Ok(raw) => panels.push(classify(&raw, ctx)),
                Err(skip) => skipped.push(skip),
            }
        }

        let tables = build_tables(&panels, ctx.geometry.back_panel_max_thickness_mm);
        let summary = summarize(&panels);

        info!(
            job_no = %job_no,
            rows = parsed.rows.len(),
            classified = panels.len(),
            skipped = skipped.len(),
            total_parts = summary.total_parts,
            "analiz tamamlandı"
        );

        Ok(AnalysisReport {
            job_no,
            file_name: file_name_of(path),
            tables,
            summary,
            skipped,
        })
    }
}

fn summarize(panels: &[ClassifiedPanel]) -> RunSummary {
    let total_parts: u32 = panels.iter().map(|p| p.quantity).sum();
    let materials: HashSet<&str> = panels.iter().map(|p| p.material.as_str()).collect();
    let types: HashSet<&str> = panels.iter().map(|p| p.part_label.as_str()).collect();
    RunSummary {
        total_parts,
        material_count: materials.len() as u32,
        type_count: types.len() as u32,
    }
}

/// First non-empty job-number cell, when the column is mapped at all.
fn find_job_no(
    rows: &[std::collections::HashMap<String, String>],
    columns: &crate::importer::ColumnMap,
) -> Option<String> {
    rows.iter()
        .find_map(|row| columns.value(row, Field::JobNo).map(str::to_string))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
