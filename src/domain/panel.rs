// ==========================================
// CORE kesim listesi - panel domain model
// ==========================================
// RawPanelRow: canonical row after column mapping (import pipeline
// intermediate, lifecycle limited to one analysis run).
// ClassifiedPanel: classifier output, one per valid input row,
// never mutated after creation (quantity carried, not expanded).
// GroupedRow: exporter output, compacted table row.
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RawPanelRow - canonical mapped row
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPanelRow {
    pub position: String,     // POZ / line id (free text, may be blank)
    pub module_label: String, // module name, may embed a width ("Alt dolap 60 cm")
    pub quantity: u32,        // order quantity (blank cell defaults to 1)
    pub length1_mm: u32,      // first measurement, unordered
    pub length2_mm: u32,      // second measurement, unordered
    pub channel_text: String, // raw channel/groove indicator cell
    pub material: String,     // material code, trimmed, non-empty
    pub row_number: usize,    // 1-based source data row (excl. header)
}

impl RawPanelRow {
    /// Long axis = larger of the two raw measurements.
    pub fn long_mm(&self) -> u32 {
        self.length1_mm.max(self.length2_mm)
    }

    /// Short axis = smaller of the two raw measurements.
    pub fn short_mm(&self) -> u32 {
        self.length1_mm.min(self.length2_mm)
    }
}

// ==========================================
// ClassifiedPanel - classifier output
// ==========================================
// Thickness is ALWAYS the registry-resolved thickness of the material,
// never derived from the part-type label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedPanel {
    pub part_label: String, // part-type label (no channel suffix)
    pub thickness_mm: u32,  // registry-resolved
    pub long_mm: u32,
    pub short_mm: u32,
    pub channel: bool,
    pub material: String,
    pub quantity: u32,
    pub position: String,
}

// ==========================================
// GroupedRow - compacted export row
// ==========================================
// Group key: (material, thickness, suffixed label, long, short).
// Serialized into history as JSON, field names follow the sheet columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedRow {
    #[serde(rename = "KALINLIK")]
    pub thickness_mm: u32,
    #[serde(rename = "MALZEME")]
    pub material: String,
    #[serde(rename = "BOY")]
    pub long_mm: u32,
    #[serde(rename = "EN")]
    pub short_mm: u32,
    #[serde(rename = "PARÇA TİPİ")]
    pub part_label: String, // channel suffix already applied
    #[serde(rename = "ADET")]
    pub quantity: u32,
}

// ==========================================
// SkippedRow - row-level exclusion report entry
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row_number: usize,
    pub reason: String,
}
