// ==========================================
// CORE kesim listesi - part classifier
// ==========================================
// The decision cascade. Strict order, first match wins:
//   1) thickness resolve   (always, registry or body default)
//   2) learned override    (human correction, authoritative)
//   3) thin-material shortcut -> ARKALIK / ARKALIK (İÇERDE)
//   4) standard side-panel match (ALT, ÜST, BOY in that order)
//   5) module-derived formula matches (fixed priority order)
//   6) rail band -> KAYIT/KUŞAK
//   7) fallback -> DİĞER
// Pure over a read-only context; a structurally valid row never fails.
// ==========================================

use crate::config::GeometryParams;
use crate::domain::{ClassifiedPanel, PartType, RawPanelRow};
use crate::engine::channel::is_channel;
use crate::engine::module_label::{cabinet_class, module_width_mm};
use crate::repository::RuleKey;
use std::collections::HashMap;

// ==========================================
// ClassifyContext - read-only lookup state for one pass
// ==========================================
#[derive(Debug, Clone)]
pub struct ClassifyContext {
    pub geometry: GeometryParams,
    /// material code -> thickness (mm), materialized from the registry
    pub materials: HashMap<String, u32>,
    /// (long, short, material) -> part-type label
    pub learned: HashMap<RuleKey, String>,
}

impl ClassifyContext {
    pub fn new(
        geometry: GeometryParams,
        materials: HashMap<String, u32>,
        learned: HashMap<RuleKey, String>,
    ) -> Self {
        Self {
            geometry,
            materials,
            learned,
        }
    }

    /// Registered thickness or the body default. Never fails; the
    /// thickness of a classified panel always comes from here.
    pub fn resolve_thickness(&self, material: &str) -> u32 {
        self.materials
            .get(material.trim())
            .copied()
            .unwrap_or(self.geometry.body_default_thickness_mm)
    }
}

/// Classify one mapped row. Label, thickness and channel flag are
/// decided here; partitioning and grouping happen downstream.
pub fn classify(row: &RawPanelRow, ctx: &ClassifyContext) -> ClassifiedPanel {
    let long = row.long_mm();
    let short = row.short_mm();
    let material = row.material.trim().to_string();
    let thickness = ctx.resolve_thickness(&material);
    let channel = is_channel(&row.channel_text);

    let part_label = decide_label(row, ctx, long, short, &material, thickness);

    ClassifiedPanel {
        part_label,
        thickness_mm: thickness,
        long_mm: long,
        short_mm: short,
        channel,
        material,
        quantity: row.quantity,
        position: row.position.clone(),
    }
}

fn decide_label(
    row: &RawPanelRow,
    ctx: &ClassifyContext,
    long: u32,
    short: u32,
    material: &str,
    thickness: u32,
) -> String {
    let g = &ctx.geometry;

    // Learned override. The stored text is kept verbatim so a label
    // outside the built-in taxonomy still survives.
    let key: RuleKey = (long, short, material.to_string());
    if let Some(label) = ctx.learned.get(&key) {
        return label.clone();
    }

    let class = cabinet_class(&row.module_label);
    let width = module_width_mm(&row.module_label);

    // Thin-material shortcut. Recessed only when a label-provided
    // width makes the recessed formula match on both axes.
    if thickness <= g.back_panel_max_thickness_mm {
        let recessed_expected = g
            .height_of(class)
            .saturating_sub(g.back_recessed_offset_mm);
        if width.is_some()
            && formula_match(g, width, long, short, g.back_recessed_offset_mm, recessed_expected)
        {
            return PartType::BackPanelRecessed.label().to_string();
        }
        return PartType::BackPanel.label().to_string();
    }

    // Standard side panels, classes in fixed priority order
    for c in crate::domain::CabinetClass::ORDERED {
        if g.within_tolerance(long, g.height_of(c)) && g.within_tolerance(short, g.depth_of(c)) {
            return PartType::Side.label().to_string();
        }
    }

    // Module-derived candidates, fixed priority order. Each pairs a
    // width-derived dimension (module - offsetA) with a fixed one
    // (class depth or height - offsetB).
    let depth = g.depth_of(class);
    let height = g.height_of(class);
    let candidates: [(PartType, u32, u32); 6] = [
        (
            PartType::TopBottom,
            g.side_offset_mm,
            depth.saturating_sub(g.top_bottom_depth_offset_mm),
        ),
        (
            PartType::FixedShelf,
            g.side_offset_mm,
            depth.saturating_sub(g.fixed_shelf_depth_offset_mm),
        ),
        (
            PartType::ShelfBase,
            g.shelf_width_offset_mm,
            g.base_depth_mm.saturating_sub(g.shelf_depth_base_offset_mm),
        ),
        (
            PartType::ShelfWall,
            g.shelf_width_offset_mm,
            g.wall_depth_mm.saturating_sub(g.shelf_depth_wall_offset_mm),
        ),
        (
            PartType::BackPanel,
            g.back_offset_mm,
            height.saturating_sub(g.back_offset_mm),
        ),
        (
            PartType::BackPanelRecessed,
            g.back_recessed_offset_mm,
            height.saturating_sub(g.back_recessed_offset_mm),
        ),
    ];
    for (part, width_offset, fixed_expected) in candidates {
        if formula_match(g, width, long, short, width_offset, fixed_expected) {
            return part.label().to_string();
        }
    }

    // Rails sit in a narrow dimension band
    let in_band = |v: u32| v >= g.rail_min_mm && v <= g.rail_max_mm;
    if in_band(short) || in_band(long) {
        return PartType::Rail.label().to_string();
    }

    PartType::Other.label().to_string()
}

/// One formula candidate against the measured (long, short) pair.
///
/// With a label-provided module width both formula dimensions are known;
/// they are compared to the measured pair axis-odd (the width-derived
/// dimension may be the shorter one, as with a 600 mm top/bottom).
/// Without a width the module dimension is recovered by inversion, so
/// only the fixed dimension constrains the match, on either axis.
fn formula_match(
    g: &GeometryParams,
    width: Option<u32>,
    long: u32,
    short: u32,
    width_offset: u32,
    fixed_expected: u32,
) -> bool {
    match width {
        Some(w) => {
            if w < width_offset {
                return false;
            }
            let width_dim = w - width_offset;
            let expected_long = width_dim.max(fixed_expected);
            let expected_short = width_dim.min(fixed_expected);
            g.within_tolerance(long, expected_long) && g.within_tolerance(short, expected_short)
        }
        None => g.within_tolerance(long, fixed_expected) || g.within_tolerance(short, fixed_expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ClassifyContext {
        let mut materials = HashMap::new();
        materials.insert("LAM BEYAZ 18MM".to_string(), 18);
        materials.insert("MDF 8MM".to_string(), 8);
        materials.insert("HDF 3MM".to_string(), 3);
        ClassifyContext::new(GeometryParams::default(), materials, HashMap::new())
    }

    fn row(module: &str, len1: u32, len2: u32, material: &str) -> RawPanelRow {
        RawPanelRow {
            position: "1".to_string(),
            module_label: module.to_string(),
            quantity: 1,
            length1_mm: len1,
            length2_mm: len2,
            channel_text: String::new(),
            material: material.to_string(),
            row_number: 1,
        }
    }

    #[test]
    fn test_standard_side_panel() {
        let panel = classify(&row("ALT DOLAP 60 cm", 720, 580, "LAM BEYAZ 18MM"), &ctx());
        assert_eq!(panel.part_label, "YAN");
        assert_eq!(panel.thickness_mm, 18);
    }

    #[test]
    fn test_top_bottom_from_module_width() {
        // 600 mm module: 600-36=564 wide, 580-1=579 deep
        let panel = classify(&row("ALT DOLAP 60 cm", 564, 579, "LAM BEYAZ 18MM"), &ctx());
        assert_eq!(panel.part_label, "ALT-ÜST");
    }

    #[test]
    fn test_thin_material_is_back_panel() {
        let panel = classify(&row("ALT DOLAP 60 cm", 702, 582, "HDF 3MM"), &ctx());
        assert_eq!(panel.part_label, "ARKALIK");
        assert_eq!(panel.thickness_mm, 3);
    }

    #[test]
    fn test_thin_recessed_when_formula_matches() {
        // 720-37=683 high, 600-37=563 wide
        let panel = classify(&row("ALT DOLAP 60 cm", 683, 563, "HDF 3MM"), &ctx());
        assert_eq!(panel.part_label, "ARKALIK (İÇERDE)");
    }

    #[test]
    fn test_thin_ambiguous_prefers_plain() {
        // no width token in the label, refinement unavailable
        let panel = classify(&row("KÖŞE MODÜL", 683, 563, "HDF 3MM"), &ctx());
        assert_eq!(panel.part_label, "ARKALIK");
    }

    #[test]
    fn test_tolerance_boundary() {
        let c = ctx();
        // exactly 5 off on both axes still matches
        let hit = classify(&row("", 725, 585, "LAM BEYAZ 18MM"), &c);
        assert_eq!(hit.part_label, "YAN");
        // 6 off does not
        let miss = classify(&row("", 726, 585, "LAM BEYAZ 18MM"), &c);
        assert_ne!(miss.part_label, "YAN");
    }

    #[test]
    fn test_learned_override_and_removal() {
        let mut c = ctx();
        // geometry alone says YAN
        assert_eq!(
            classify(&row("", 720, 580, "LAM BEYAZ 18MM"), &c).part_label,
            "YAN"
        );

        c.learned.insert(
            (720, 580, "LAM BEYAZ 18MM".to_string()),
            "ÇEKMECE YANI".to_string(),
        );
        let overridden = classify(&row("", 720, 580, "LAM BEYAZ 18MM"), &c);
        assert_eq!(overridden.part_label, "ÇEKMECE YANI");
        // thickness stays registry-resolved under the override
        assert_eq!(overridden.thickness_mm, 18);

        c.learned.clear();
        assert_eq!(
            classify(&row("", 720, 580, "LAM BEYAZ 18MM"), &c).part_label,
            "YAN"
        );
    }

    #[test]
    fn test_learned_override_beats_thin_shortcut() {
        let mut c = ctx();
        c.learned
            .insert((702, 582, "HDF 3MM".to_string()), "DİĞER".to_string());
        let panel = classify(&row("", 702, 582, "HDF 3MM"), &c);
        assert_eq!(panel.part_label, "DİĞER");
        assert_eq!(panel.thickness_mm, 3);
    }

    #[test]
    fn test_unknown_material_gets_body_default() {
        let panel = classify(&row("", 400, 300, "TANIMSIZ"), &ctx());
        assert_eq!(panel.thickness_mm, 18);
    }

    #[test]
    fn test_rail_band() {
        let panel = classify(&row("ALT DOLAP", 564, 100, "LAM BEYAZ 18MM"), &ctx());
        assert_eq!(panel.part_label, "KAYIT/KUŞAK");
    }

    #[test]
    fn test_fallback_other() {
        let panel = classify(&row("ALT DOLAP", 400, 300, "LAM BEYAZ 18MM"), &ctx());
        assert_eq!(panel.part_label, "DİĞER");
    }

    #[test]
    fn test_priority_determinism() {
        // 580-1=579 and 580-23=557 differ; pick dims satisfying the
        // top/bottom formula which also sits first in priority order
        let c = ctx();
        for _ in 0..10 {
            let panel = classify(&row("ALT DOLAP 60 cm", 564, 579, "LAM BEYAZ 18MM"), &c);
            assert_eq!(panel.part_label, "ALT-ÜST");
        }
    }

    #[test]
    fn test_channel_flag_carried() {
        let mut r = row("ALT DOLAP 60 cm", 720, 580, "LAM BEYAZ 18MM");
        r.channel_text = "SOL_13+9".to_string();
        let panel = classify(&r, &ctx());
        assert!(panel.channel);
        assert_eq!(panel.part_label, "YAN"); // flag never affects the type
    }

    #[test]
    fn test_unordered_lengths_normalized() {
        // measurements arrive in either order
        let panel = classify(&row("", 580, 720, "LAM BEYAZ 18MM"), &ctx());
        assert_eq!(panel.long_mm, 720);
        assert_eq!(panel.short_mm, 580);
        assert_eq!(panel.part_label, "YAN");
    }
}
