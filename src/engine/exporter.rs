// ==========================================
// CORE kesim listesi - result partitioner / exporter
// ==========================================
// Classified panels -> two ordered tables:
//   body: thickness >  back-panel threshold
//   thin: thickness <= back-panel threshold
// Inside each table identical rows are compacted (quantities summed)
// and the rows are sorted deterministically for side-by-side export.
// No classification happens here; input is already decided.
// ==========================================

use crate::domain::{labeled, ClassifiedPanel, GroupedRow};
use std::collections::HashMap;

/// The two disjoint export tables of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisTables {
    pub body: Vec<GroupedRow>,
    pub thin: Vec<GroupedRow>,
}

impl AnalysisTables {
    pub fn total_quantity(&self) -> u32 {
        self.body
            .iter()
            .chain(self.thin.iter())
            .map(|r| r.quantity)
            .sum()
    }
}

/// Partition, compact and sort one run's classified panels.
pub fn build_tables(panels: &[ClassifiedPanel], thin_threshold_mm: u32) -> AnalysisTables {
    let mut body = Vec::new();
    let mut thin = Vec::new();

    for panel in panels {
        let row = GroupedRow {
            thickness_mm: panel.thickness_mm,
            material: panel.material.clone(),
            long_mm: panel.long_mm,
            short_mm: panel.short_mm,
            part_label: labeled(&panel.part_label, panel.channel),
            quantity: panel.quantity,
        };
        if panel.thickness_mm > thin_threshold_mm {
            body.push(row);
        } else {
            thin.push(row);
        }
    }

    AnalysisTables {
        body: compact_and_sort(body, true),
        thin: compact_and_sort(thin, false),
    }
}

/// Re-group and re-sort the concatenation of several runs' tables
/// under the same rules (job merge flow).
pub fn merge_tables(tables: &[AnalysisTables]) -> AnalysisTables {
    let mut body = Vec::new();
    let mut thin = Vec::new();
    for t in tables {
        body.extend(t.body.iter().cloned());
        thin.extend(t.thin.iter().cloned());
    }
    AnalysisTables {
        body: compact_and_sort(body, true),
        thin: compact_and_sort(thin, false),
    }
}

/// Sum quantities over identical (material, thickness, label, long,
/// short) rows, then order. Body tables sort by (material, thickness,
/// label, long); thin tables by (material, label, long). Short axis
/// is the final tiebreak so equal keys stay deterministic.
fn compact_and_sort(rows: Vec<GroupedRow>, with_thickness: bool) -> Vec<GroupedRow> {
    let mut groups: HashMap<(String, u32, String, u32, u32), u32> = HashMap::new();
    for row in rows {
        *groups
            .entry((
                row.material,
                row.thickness_mm,
                row.part_label,
                row.long_mm,
                row.short_mm,
            ))
            .or_insert(0) += row.quantity;
    }

    let mut compacted: Vec<GroupedRow> = groups
        .into_iter()
        .map(
            |((material, thickness_mm, part_label, long_mm, short_mm), quantity)| GroupedRow {
                thickness_mm,
                material,
                long_mm,
                short_mm,
                part_label,
                quantity,
            },
        )
        .collect();

    compacted.sort_by(|a, b| {
        let key_a = (
            &a.material,
            if with_thickness { a.thickness_mm } else { 0 },
            &a.part_label,
            a.long_mm,
            a.short_mm,
        );
        let key_b = (
            &b.material,
            if with_thickness { b.thickness_mm } else { 0 },
            &b.part_label,
            b.long_mm,
            b.short_mm,
        );
        key_a.cmp(&key_b)
    });

    compacted
}
