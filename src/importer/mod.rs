// ==========================================
// CORE kesim listesi - import layer
// ==========================================
// File parsing (Excel/CSV) -> column resolution -> row mapping.
// ==========================================

pub mod column_mapper;
pub mod error;
pub mod file_parser;
pub mod row_mapper;

pub use column_mapper::{ColumnMap, ColumnMapper, Field};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, ParsedFile, UniversalFileParser};
pub use row_mapper::RowMapper;
