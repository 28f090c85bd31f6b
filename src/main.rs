// ==========================================
// CORE kesim listesi - CLI entry
// ==========================================
// Usage: cutlist-core <file.xlsx|file.csv> [more files...]
// Analyzes each cut list, prints the two export tables and archives
// the run. Database path override: CUTLIST_DB environment variable.
// ==========================================

use anyhow::{bail, Context, Result};
use cutlist_core::{
    db, logging, AnalysisReport, Analyzer, ClassifyContext, ConfigManager, GroupedRow,
    HistoryRepository, LearnedRuleRepository, MaterialRepository, NewHistoryEntry,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", cutlist_core::APP_NAME);
    tracing::info!("Sürüm: {}", cutlist_core::VERSION);
    tracing::info!("==================================================");

    let files: Vec<String> = std::env::args().skip(1).collect();
    if files.is_empty() {
        bail!("kullanım: cutlist-core <dosya.xlsx|dosya.csv> [dosya2 ...]");
    }

    let db_path = std::env::var("CUTLIST_DB").unwrap_or_else(|_| db::default_db_path());
    tracing::info!("Veritabanı: {}", db_path);

    let conn = db::open_sqlite_connection(&db_path)
        .with_context(|| format!("veritabanı açılamadı: {db_path}"))?;
    let conn: Arc<Mutex<Connection>> = Arc::new(Mutex::new(conn));

    let materials = MaterialRepository::from_connection(conn.clone())?;
    let learned = LearnedRuleRepository::from_connection(conn.clone())?;
    let history = HistoryRepository::from_connection(conn.clone())?;
    let config =
        ConfigManager::from_connection(conn).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let geometry = config
        .geometry_params()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let ctx = ClassifyContext::new(geometry, materials.get_all()?, learned.get_all()?);

    for file in &files {
        let report = Analyzer
            .analyze_file(file, &ctx)
            .with_context(|| format!("analiz başarısız: {file}"))?;
        print_report(&report);
        archive(&history, &report)?;
    }

    Ok(())
}

fn archive(history: &HistoryRepository, report: &AnalysisReport) -> Result<()> {
    let id = history.add(&NewHistoryEntry {
        job_no: report.job_no.clone(),
        file_name: report.file_name.clone(),
        total_parts: report.summary.total_parts,
        material_count: report.summary.material_count,
        type_count: report.summary.type_count,
        body: report.tables.body.clone(),
        thin: report.tables.thin.clone(),
    })?;
    tracing::info!(id, job_no = %report.job_no, "analiz geçmişe kaydedildi");
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!();
    println!("İş emri: {}  ({})", report.job_no, report.file_name);
    println!(
        "Toplam parça: {}  Malzeme: {}  Parça tipi: {}",
        report.summary.total_parts, report.summary.material_count, report.summary.type_count
    );

    print_table("GÖVDE", &report.tables.body);
    print_table("İNCE (ARKALIK)", &report.tables.thin);

    if !report.skipped.is_empty() {
        println!();
        println!("Atlanan satırlar ({}):", report.skipped.len());
        for skip in &report.skipped {
            println!("  satır {}: {}", skip.row_number, skip.reason);
        }
    }
}

fn print_table(title: &str, rows: &[GroupedRow]) {
    println!();
    println!("=== {title} ===");
    if rows.is_empty() {
        println!("(boş)");
        return;
    }
    println!(
        "{:<24} {:>8} {:>6} {:>6}  {:<20} {:>5}",
        "MALZEME", "KALINLIK", "BOY", "EN", "PARÇA TİPİ", "ADET"
    );
    for row in rows {
        println!(
            "{:<24} {:>8} {:>6} {:>6}  {:<20} {:>5}",
            row.material, row.thickness_mm, row.long_mm, row.short_mm, row.part_label, row.quantity
        );
    }
}
