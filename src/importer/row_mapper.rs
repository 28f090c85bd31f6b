// ==========================================
// CORE kesim listesi - row mapper
// ==========================================
// Responsibility: one parsed row -> RawPanelRow, or a SkippedRow with
// a human-readable reason. A bad row never aborts the whole import.
// ==========================================

use crate::domain::{RawPanelRow, SkippedRow};
use crate::importer::column_mapper::{ColumnMap, Field};
use std::collections::HashMap;

pub struct RowMapper;

impl RowMapper {
    /// `row_number` is 1-based and counts data rows (header excluded).
    pub fn map_row(
        &self,
        columns: &ColumnMap,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> Result<RawPanelRow, SkippedRow> {
        let length1 = self.parse_length(columns, row, Field::Length1, row_number)?;
        let length2 = self.parse_length(columns, row, Field::Length2, row_number)?;

        let material = match columns.value(row, Field::Material) {
            Some(v) => v.to_string(),
            None => {
                return Err(SkippedRow {
                    row_number,
                    reason: "malzeme kodu boş".to_string(),
                })
            }
        };

        // Quantity never invalidates a row: blank, unparseable and
        // explicit non-positive cells all fall back to a single piece
        let quantity = columns
            .value(row, Field::Quantity)
            .and_then(parse_positive)
            .unwrap_or(1);

        Ok(RawPanelRow {
            position: columns
                .value(row, Field::Position)
                .unwrap_or("")
                .to_string(),
            module_label: columns.value(row, Field::Module).unwrap_or("").to_string(),
            quantity,
            length1_mm: length1,
            length2_mm: length2,
            channel_text: columns.value(row, Field::Channel).unwrap_or("").to_string(),
            material,
            row_number,
        })
    }

    fn parse_length(
        &self,
        columns: &ColumnMap,
        row: &HashMap<String, String>,
        field: Field,
        row_number: usize,
    ) -> Result<u32, SkippedRow> {
        let raw = columns.value(row, field).ok_or_else(|| SkippedRow {
            row_number,
            reason: format!("{} değeri boş", field.display_name()),
        })?;
        parse_positive(raw).ok_or_else(|| SkippedRow {
            row_number,
            reason: format!("{} sayısal değil: '{}'", field.display_name(), raw),
        })
    }
}

/// Accepts "580", "580.0" and "580,5" (comma decimal); rejects zero,
/// negatives and non-numeric text. Rounds to whole millimetres.
fn parse_positive(raw: &str) -> Option<u32> {
    let normalized = raw.trim().replace(',', ".");
    let value: f64 = normalized.parse().ok()?;
    if value <= 0.0 || !value.is_finite() {
        return None;
    }
    Some(value.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::column_mapper::ColumnMapper;

    fn setup() -> ColumnMap {
        let headers: Vec<String> = ["POZ", "MODÜL", "ADET", "BOY", "EN", "KANALLI", "MALZEME"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        ColumnMapper.resolve(&headers).unwrap()
    }

    fn row(values: &[(&str, &str)]) -> HashMap<String, String> {
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_row_maps() {
        let columns = setup();
        let raw = row(&[
            ("POZ", "1"),
            ("MODÜL", "ALT DOLAP 60 cm"),
            ("ADET", "2"),
            ("BOY", "720"),
            ("EN", "580"),
            ("KANALLI", ""),
            ("MALZEME", "LAM BEYAZ 18MM"),
        ]);

        let panel = RowMapper.map_row(&columns, &raw, 1).unwrap();
        assert_eq!(panel.quantity, 2);
        assert_eq!(panel.long_mm(), 720);
        assert_eq!(panel.short_mm(), 580);
        assert_eq!(panel.material, "LAM BEYAZ 18MM");
    }

    #[test]
    fn test_blank_quantity_defaults_to_one() {
        let columns = setup();
        let raw = row(&[
            ("POZ", "1"),
            ("MODÜL", "ALT DOLAP"),
            ("ADET", ""),
            ("BOY", "720"),
            ("EN", "580"),
            ("KANALLI", ""),
            ("MALZEME", "LAM BEYAZ 18MM"),
        ]);
        let panel = RowMapper.map_row(&columns, &raw, 3).unwrap();
        assert_eq!(panel.quantity, 1);
    }

    #[test]
    fn test_zero_quantity_defaults_to_one() {
        let columns = setup();
        let raw = row(&[
            ("POZ", "1"),
            ("MODÜL", "ALT DOLAP"),
            ("ADET", "0"),
            ("BOY", "720"),
            ("EN", "580"),
            ("KANALLI", ""),
            ("MALZEME", "LAM BEYAZ 18MM"),
        ]);
        let panel = RowMapper.map_row(&columns, &raw, 4).unwrap();
        assert_eq!(panel.quantity, 1);
    }

    #[test]
    fn test_non_numeric_length_skips_row() {
        let columns = setup();
        let raw = row(&[
            ("POZ", "1"),
            ("MODÜL", "ALT DOLAP"),
            ("ADET", "2"),
            ("BOY", "yedi yüz"),
            ("EN", "580"),
            ("KANALLI", ""),
            ("MALZEME", "LAM BEYAZ 18MM"),
        ]);
        let skipped = RowMapper.map_row(&columns, &raw, 5).unwrap_err();
        assert_eq!(skipped.row_number, 5);
        assert!(skipped.reason.contains("sayısal değil"));
    }

    #[test]
    fn test_blank_material_skips_row() {
        let columns = setup();
        let raw = row(&[
            ("POZ", "1"),
            ("MODÜL", "ALT DOLAP"),
            ("ADET", "2"),
            ("BOY", "720"),
            ("EN", "580"),
            ("KANALLI", ""),
            ("MALZEME", "  "),
        ]);
        let skipped = RowMapper.map_row(&columns, &raw, 2).unwrap_err();
        assert!(skipped.reason.contains("malzeme"));
    }

    #[test]
    fn test_decimal_lengths_round() {
        let columns = setup();
        let raw = row(&[
            ("POZ", "1"),
            ("MODÜL", "ALT DOLAP"),
            ("ADET", "1"),
            ("BOY", "719,6"),
            ("EN", "580.0"),
            ("KANALLI", ""),
            ("MALZEME", "LAM BEYAZ 18MM"),
        ]);
        let panel = RowMapper.map_row(&columns, &raw, 1).unwrap();
        assert_eq!(panel.length1_mm, 720);
        assert_eq!(panel.length2_mm, 580);
    }
}
