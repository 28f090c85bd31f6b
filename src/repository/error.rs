// ==========================================
// CORE kesim listesi - repository error types
// ==========================================
// thiserror derive enums, one per layer.
// ==========================================

use thiserror::Error;

/// Repository-layer error type.
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== registration rules =====
    #[error("geçersiz kalınlık (malzeme {material}): {value}, kalınlık pozitif olmalı")]
    InvalidThickness { material: String, value: i64 },

    // ===== database =====
    #[error("kayıt bulunamadı: {entity} id={id}")]
    NotFound { entity: String, id: String },

    #[error("veritabanı bağlantısı kurulamadı: {0}")]
    DatabaseConnectionError(String),

    #[error("veritabanı kilidi alınamadı: {0}")]
    LockError(String),

    #[error("veritabanı sorgusu başarısız: {0}")]
    DatabaseQueryError(String),

    #[error("benzersizlik kısıtı ihlali: {0}")]
    UniqueConstraintViolation(String),

    // ===== serialization =====
    #[error("JSON dönüşümü başarısız: {0}")]
    SerializationError(String),

    // ===== generic =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                RepositoryError::UniqueConstraintViolation(msg)
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

/// Result alias for the repository layer.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
