// ==========================================
// CORE kesim listesi - column mapper
// ==========================================
// Responsibility: source headers -> canonical fields.
// Two-pass resolution: exact code tokens (ERP export columns like
// Info4/Info5) take precedence over human-readable synonyms. Within
// a pass the leftmost matching column wins and a header is consumed
// by at most one field.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

// ==========================================
// Canonical fields
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Position,
    Module,
    Quantity,
    Length1,
    Length2,
    Channel,
    Material,
    JobNo,
}

impl Field {
    pub const REQUIRED: [Field; 7] = [
        Field::Position,
        Field::Module,
        Field::Quantity,
        Field::Length1,
        Field::Length2,
        Field::Channel,
        Field::Material,
    ];

    /// Name used in the missing-column error message.
    pub fn display_name(&self) -> &'static str {
        match self {
            Field::Position => "POZ",
            Field::Module => "MODÜL",
            Field::Quantity => "ADET",
            Field::Length1 => "ÖLÇÜ 1 (BOY)",
            Field::Length2 => "ÖLÇÜ 2 (EN)",
            Field::Channel => "KANALLI",
            Field::Material => "MALZEME",
            Field::JobNo => "İŞ EMRİ NO",
        }
    }

    /// Fields carrying an ERP export code token, in token-matching
    /// order. "info16" must be claimed before "info1" is tried, the
    /// shorter token is a substring of the longer one.
    const CODE_TOKENS: [(Field, &'static str); 5] = [
        (Field::JobNo, "info16"),
        (Field::Position, "info4"),
        (Field::Module, "info5"),
        (Field::Channel, "info1"),
        (Field::Quantity, "sipariş"),
    ];

    fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Field::Position => &["poz", "poz no", "poz numarası"],
            Field::Module => &["modül", "modul", "modül adı", "modul adi"],
            Field::Quantity => &["adet", "miktar", "qty", "quantity", "sipariş", "siparis"],
            Field::Length1 => &["boy", "uzunluk", "length", "ölçü 1", "olcu 1"],
            Field::Length2 => &["en", "genişlik", "genislik", "width", "ölçü 2", "olcu 2"],
            Field::Channel => &["kanallı", "kanalli", "kanal"],
            Field::Material => &["malzeme", "malzeme kodu", "material", "malzeme adı"],
            Field::JobNo => &["iş emri", "is emri", "iş emri no", "sipariş no", "siparis no"],
        }
    }
}

/// Resolved header -> field assignment for one file.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    assignments: HashMap<Field, String>,
}

impl ColumnMap {
    /// Column header assigned to `field`, if any.
    pub fn header_for(&self, field: Field) -> Option<&str> {
        self.assignments.get(&field).map(|s| s.as_str())
    }

    /// Cell value for `field` in a parsed row, trimmed. Empty cells
    /// and unmapped fields both come back as None.
    pub fn value<'a>(&self, row: &'a HashMap<String, String>, field: Field) -> Option<&'a str> {
        let header = self.assignments.get(&field)?;
        let value = row.get(header)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

pub struct ColumnMapper;

impl ColumnMapper {
    /// Resolve the ordered header list into a column map. Fails with
    /// the full list of missing required fields, not just the first.
    pub fn resolve(&self, headers: &[String]) -> ImportResult<ColumnMap> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut assignments: HashMap<Field, String> = HashMap::new();
        let mut consumed = vec![false; headers.len()];

        let all_fields = [
            Field::Position,
            Field::Module,
            Field::Quantity,
            Field::Length1,
            Field::Length2,
            Field::Channel,
            Field::Material,
            Field::JobNo,
        ];

        // Pass 1: code tokens, matching anywhere in the header
        for (field, token) in Field::CODE_TOKENS {
            if let Some(idx) = normalized
                .iter()
                .enumerate()
                .position(|(i, h)| !consumed[i] && h.contains(token))
            {
                consumed[idx] = true;
                assignments.insert(field, headers[idx].clone());
            }
        }

        // Pass 2: synonyms, leftmost match wins
        for field in all_fields {
            if assignments.contains_key(&field) {
                continue;
            }
            if let Some(idx) = normalized
                .iter()
                .enumerate()
                .position(|(i, h)| !consumed[i] && field.synonyms().contains(&h.as_str()))
            {
                consumed[idx] = true;
                assignments.insert(field, headers[idx].clone());
            }
        }

        let missing: Vec<String> = Field::REQUIRED
            .iter()
            .filter(|f| !assignments.contains_key(f))
            .map(|f| f.display_name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingRequiredColumn { fields: missing });
        }

        Ok(ColumnMap { assignments })
    }
}
