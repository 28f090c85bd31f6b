// ==========================================
// CORE kesim listesi - module label parsing
// ==========================================
// Module labels look like "ALT DOLAP 60 cm" or "ÜST DOLAP 80cm".
// Two facts are recovered: the cabinet class and, when a "<n> cm"
// token is present, the module width in millimetres.
// ==========================================

use crate::domain::CabinetClass;
use regex::Regex;
use std::sync::OnceLock;

fn width_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)(\d+)\s*cm").expect("geçerli regex"))
}

/// Cabinet class implied by the module label. Wall cabinets say
/// "üst", tall units say "boy", everything else is a base cabinet.
pub fn cabinet_class(label: &str) -> CabinetClass {
    let lowered = label.to_lowercase();
    if lowered.contains("üst") || lowered.contains("ust") {
        CabinetClass::Wall
    } else if lowered.contains("boy") {
        CabinetClass::Tall
    } else {
        CabinetClass::Base
    }
}

/// Module width in mm from the "<n> cm" token, when present.
pub fn module_width_mm(label: &str) -> Option<u32> {
    let caps = width_pattern().captures(label)?;
    let cm: u32 = caps.get(1)?.as_str().parse().ok()?;
    Some(cm * 10)
}
