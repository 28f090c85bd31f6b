// ==========================================
// CORE kesim listesi - import error types
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Dosya bulunamadı: {0}")]
    FileNotFound(String),

    #[error("Desteklenmeyen dosya formatı: {0} (xlsx/xls/csv bekleniyor)")]
    UnsupportedFormat(String),

    #[error("Dosya okunamadı: {0}")]
    FileReadError(String),

    #[error("Excel dosyası çözümlenemedi: {0}")]
    ExcelParseError(String),

    #[error("CSV dosyası çözümlenemedi: {0}")]
    CsvParseError(String),

    #[error("Dosya boş veya başlık satırı yok")]
    EmptyFile,

    #[error("Zorunlu sütunlar eksik: {}", .fields.join(", "))]
    MissingRequiredColumn { fields: Vec<String> },
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
