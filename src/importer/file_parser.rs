// ==========================================
// CORE kesim listesi - file parsers
// ==========================================
// Supported: Excel (.xlsx/.xls) / CSV (.csv)
// Output keeps the header order: column mapping is first-match-wins,
// so downstream code needs the original left-to-right sequence.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Raw parse result: ordered headers plus one map per non-blank row.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

// ==========================================
// CSV parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse(&self, path: &Path) -> ImportResult<ParsedFile> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // tolerate ragged rows
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyFile);
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // Skip fully blank rows
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(row_map);
        }

        Ok(ParsedFile { headers, rows })
    }
}

// ==========================================
// Excel parser
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    pub fn parse(&self, path: &Path) -> ImportResult<ParsedFile> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "Excel dosyasında sayfa yok".to_string(),
            ));
        }

        // First sheet only, like the desktop import flow
        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows.next().ok_or(ImportError::EmptyFile)?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let mut row_map = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    // Integral floats print as "580" rather than "580.0"
                    let value = match cell {
                        calamine::Data::Float(f) if f.fract() == 0.0 => {
                            format!("{}", *f as i64)
                        }
                        other => other.to_string().trim().to_string(),
                    };
                    row_map.insert(header.clone(), value);
                }
            }

            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(row_map);
        }

        Ok(ParsedFile { headers, rows })
    }
}

// ==========================================
// Universal parser (dispatch on extension)
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ParsedFile> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse(path),
            "xlsx" | "xls" => ExcelParser.parse(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
