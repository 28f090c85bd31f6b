// ==========================================
// CORE kesim listesi - end-to-end analysis flow tests
// ==========================================
// CSV fixture -> import -> classify -> tables -> history archive,
// all against a scratch SQLite database.
// ==========================================

use cutlist_core::{
    db, logging, Analyzer, ClassifyContext, ConfigManager, GeometryParams, HistoryRepository,
    LearnedRule, LearnedRuleRepository, MaterialRepository, NewHistoryEntry,
};
use rusqlite::Connection;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::{Builder, NamedTempFile};

fn scratch_db() -> (NamedTempFile, Arc<Mutex<Connection>>) {
    let file = NamedTempFile::new().unwrap();
    let conn = db::open_sqlite_connection(file.path().to_str().unwrap()).unwrap();
    (file, Arc::new(Mutex::new(conn)))
}

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

fn context(conn: &Arc<Mutex<Connection>>) -> ClassifyContext {
    let materials = MaterialRepository::from_connection(conn.clone()).unwrap();
    let learned = LearnedRuleRepository::from_connection(conn.clone()).unwrap();
    ClassifyContext::new(
        GeometryParams::default(),
        materials.get_all().unwrap(),
        learned.get_all().unwrap(),
    )
}

#[test]
fn test_full_analysis_run() {
    logging::init_test();
    let (_db_file, conn) = scratch_db();

    let materials = MaterialRepository::from_connection(conn.clone()).unwrap();
    materials.upsert("LAM BEYAZ 18MM", 18).unwrap();
    materials.upsert("HDF 3MM", 3).unwrap();

    let csv = write_csv(&[
        "POZ,MODÜL,ADET,BOY,EN,KANALLI,MALZEME,Info16",
        "1,ALT DOLAP 60 cm,2,720,580,SOL_13+9,LAM BEYAZ 18MM,JOB-7",
        "2,ALT DOLAP 60 cm,2,564,579,,LAM BEYAZ 18MM,JOB-7",
        "3,ALT DOLAP 60 cm,1,702,582,,HDF 3MM,JOB-7",
    ]);

    let ctx = context(&conn);
    let report = Analyzer.analyze_file(csv.path(), &ctx).unwrap();

    assert_eq!(report.job_no, "JOB-7");
    assert!(report.skipped.is_empty());
    assert_eq!(report.summary.total_parts, 5);

    // channel suffix separates the grooved side panels
    let labels: Vec<&str> = report
        .tables
        .body
        .iter()
        .map(|r| r.part_label.as_str())
        .collect();
    assert!(labels.contains(&"YAN (K)"));
    assert!(labels.contains(&"ALT-ÜST"));

    // thin table carries the registry-resolved thickness
    assert_eq!(report.tables.thin.len(), 1);
    assert_eq!(report.tables.thin[0].thickness_mm, 3);
    assert_eq!(report.tables.thin[0].part_label, "ARKALIK");
}

#[test]
fn test_learned_rule_changes_next_run() {
    logging::init_test();
    let (_db_file, conn) = scratch_db();

    let materials = MaterialRepository::from_connection(conn.clone()).unwrap();
    materials.upsert("LAM BEYAZ 18MM", 18).unwrap();

    let csv = write_csv(&[
        "POZ,MODÜL,ADET,BOY,EN,KANALLI,MALZEME",
        "1,ALT DOLAP,1,400,100,,LAM BEYAZ 18MM",
    ]);

    // without a rule the 400x100 panel lands in the rail band
    let report = Analyzer.analyze_file(csv.path(), &context(&conn)).unwrap();
    assert_eq!(report.tables.body[0].part_label, "KAYIT/KUŞAK");

    // a human correction is authoritative on the next pass
    let learned = LearnedRuleRepository::from_connection(conn.clone()).unwrap();
    learned
        .upsert_many(&[LearnedRule {
            long_mm: 400,
            short_mm: 100,
            material: "LAM BEYAZ 18MM".to_string(),
            part_label: "ÇEKMECE YANI".to_string(),
        }])
        .unwrap();

    let report = Analyzer.analyze_file(csv.path(), &context(&conn)).unwrap();
    assert_eq!(report.tables.body[0].part_label, "ÇEKMECE YANI");

    // removing the rule reverts to the heuristic
    learned.remove(400, 100, "LAM BEYAZ 18MM").unwrap();
    let report = Analyzer.analyze_file(csv.path(), &context(&conn)).unwrap();
    assert_eq!(report.tables.body[0].part_label, "KAYIT/KUŞAK");
}

#[test]
fn test_archive_and_merge_runs() {
    logging::init_test();
    let (_db_file, conn) = scratch_db();

    let materials = MaterialRepository::from_connection(conn.clone()).unwrap();
    materials.upsert("LAM BEYAZ 18MM", 18).unwrap();

    let csv = write_csv(&[
        "POZ,MODÜL,ADET,BOY,EN,KANALLI,MALZEME,Info16",
        "1,ALT DOLAP 60 cm,2,720,580,,LAM BEYAZ 18MM,JOB-A",
    ]);

    let ctx = context(&conn);
    let history = HistoryRepository::from_connection(conn.clone()).unwrap();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let report = Analyzer.analyze_file(csv.path(), &ctx).unwrap();
        let id = history
            .add(&NewHistoryEntry {
                job_no: report.job_no.clone(),
                file_name: report.file_name.clone(),
                total_parts: report.summary.total_parts,
                material_count: report.summary.material_count,
                type_count: report.summary.type_count,
                body: report.tables.body.clone(),
                thin: report.tables.thin.clone(),
            })
            .unwrap();
        ids.push(id);
    }

    let stats = history.get_stats().unwrap();
    assert_eq!(stats.total_jobs, 2);
    assert_eq!(stats.total_parts, 4);

    // merge flow: identical rows of both runs compact into one
    let entries = history.get_by_ids(&ids).unwrap();
    let tables: Vec<cutlist_core::AnalysisTables> = entries
        .iter()
        .map(|e| cutlist_core::AnalysisTables {
            body: e.body.clone(),
            thin: e.thin.clone(),
        })
        .collect();
    let merged = cutlist_core::merge_tables(&tables);
    assert_eq!(merged.body.len(), 1);
    assert_eq!(merged.body[0].quantity, 4);
}

#[test]
fn test_missing_columns_refused_before_rows() {
    logging::init_test();
    let (_db_file, conn) = scratch_db();

    let csv = write_csv(&["POZ,BOY,EN", "1,720,580"]);
    let err = Analyzer
        .analyze_file(csv.path(), &context(&conn))
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("MALZEME"));
    assert!(message.contains("ADET"));
}

#[test]
fn test_geometry_from_config_store() {
    logging::init_test();
    let (_db_file, conn) = scratch_db();

    let config = ConfigManager::from_connection(conn.clone()).unwrap();
    // widen the tolerance and re-run the boundary case
    config.set_config("tolerans", "10").unwrap();
    let geometry = config.geometry_params().unwrap();
    assert_eq!(geometry.tolerance_mm, 10);

    let materials = MaterialRepository::from_connection(conn.clone()).unwrap();
    materials.upsert("LAM BEYAZ 18MM", 18).unwrap();

    let csv = write_csv(&[
        "POZ,MODÜL,ADET,BOY,EN,KANALLI,MALZEME",
        "1,ALT DOLAP,1,728,588,,LAM BEYAZ 18MM",
    ]);

    let learned = LearnedRuleRepository::from_connection(conn.clone()).unwrap();
    let ctx = ClassifyContext::new(
        geometry,
        materials.get_all().unwrap(),
        learned.get_all().unwrap(),
    );
    let report = Analyzer.analyze_file(csv.path(), &ctx).unwrap();
    assert_eq!(report.tables.body[0].part_label, "YAN");
}
