// ==========================================
// CORE kesim listesi - domain type definitions
// ==========================================
// Part taxonomy + cabinet classes; export labels are the
// Turkish shop-floor terms and must stay byte-stable (they
// are the learned-rule vocabulary and the grouping key).
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CabinetClass - cabinet standard classes
// ==========================================
// Fixed priority order for side-panel matching: Base, Wall, Tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CabinetClass {
    Base, // alt dolap
    Wall, // üst dolap
    Tall, // boy dolap
}

impl CabinetClass {
    /// All classes in the fixed matching priority order.
    pub const ORDERED: [CabinetClass; 3] =
        [CabinetClass::Base, CabinetClass::Wall, CabinetClass::Tall];
}

impl fmt::Display for CabinetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CabinetClass::Base => write!(f, "ALT"),
            CabinetClass::Wall => write!(f, "ÜST"),
            CabinetClass::Tall => write!(f, "BOY"),
        }
    }
}

// ==========================================
// PartType - structural part taxonomy
// ==========================================
// Label strings are what the cascade, the learned-rule store and the
// export tables agree on. DrawerSide is never produced by the heuristic
// cascade; it exists so learned rules can name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartType {
    Side,              // YAN
    TopBottom,         // ALT-ÜST
    FixedShelf,        // SABİT
    ShelfBase,         // RAF
    ShelfWall,         // RAF (ÜST)
    BackPanel,         // ARKALIK
    BackPanelRecessed, // ARKALIK (İÇERDE)
    Rail,              // KAYIT/KUŞAK
    DrawerSide,        // ÇEKMECE YANI
    Other,             // DİĞER
}

impl PartType {
    /// Export label (without channel suffix).
    pub fn label(&self) -> &'static str {
        match self {
            PartType::Side => "YAN",
            PartType::TopBottom => "ALT-ÜST",
            PartType::FixedShelf => "SABİT",
            PartType::ShelfBase => "RAF",
            PartType::ShelfWall => "RAF (ÜST)",
            PartType::BackPanel => "ARKALIK",
            PartType::BackPanelRecessed => "ARKALIK (İÇERDE)",
            PartType::Rail => "KAYIT/KUŞAK",
            PartType::DrawerSide => "ÇEKMECE YANI",
            PartType::Other => "DİĞER",
        }
    }

    /// Parse a stored label back into a part type.
    ///
    /// Learned rules persist labels as text; an unknown label maps to None
    /// and the caller decides (the classifier keeps the raw text in that
    /// case rather than discarding a human correction).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "YAN" => Some(PartType::Side),
            "ALT-ÜST" => Some(PartType::TopBottom),
            "SABİT" => Some(PartType::FixedShelf),
            "RAF" => Some(PartType::ShelfBase),
            "RAF (ÜST)" => Some(PartType::ShelfWall),
            "ARKALIK" => Some(PartType::BackPanel),
            "ARKALIK (İÇERDE)" => Some(PartType::BackPanelRecessed),
            "KAYIT/KUŞAK" => Some(PartType::Rail),
            "ÇEKMECE YANI" => Some(PartType::DrawerSide),
            "DİĞER" => Some(PartType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Channel marker appended to the type label at export time.
pub const CHANNEL_SUFFIX: &str = " (K)";

/// Render a part-type label with the optional channel suffix.
pub fn labeled(label: &str, channel: bool) -> String {
    if channel {
        format!("{}{}", label, CHANNEL_SUFFIX)
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip() {
        for pt in [
            PartType::Side,
            PartType::TopBottom,
            PartType::FixedShelf,
            PartType::ShelfBase,
            PartType::ShelfWall,
            PartType::BackPanel,
            PartType::BackPanelRecessed,
            PartType::Rail,
            PartType::DrawerSide,
            PartType::Other,
        ] {
            assert_eq!(PartType::from_label(pt.label()), Some(pt));
        }
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(PartType::from_label("BİLİNMEYEN"), None);
    }

    #[test]
    fn test_channel_suffix() {
        assert_eq!(labeled("YAN", true), "YAN (K)");
        assert_eq!(labeled("YAN", false), "YAN");
    }

    #[test]
    fn test_class_priority_order() {
        assert_eq!(
            CabinetClass::ORDERED,
            [CabinetClass::Base, CabinetClass::Wall, CabinetClass::Tall]
        );
    }
}
