// ==========================================
// CORE kesim listesi - channel flag detection
// ==========================================
// A panel is "kanallı" (grooved) when the channel cell carries either
// an affirmative literal or an ERP side encoding like "SOL_13+9".
// The flag never influences classification, only the export label.
// ==========================================

use regex::Regex;
use std::sync::OnceLock;

const AFFIRMATIVE: [&str; 5] = ["true", "yes", "evet", "1", "var"];

fn side_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // SOL_13+9, SAĞ_5+5, sag_10+8 ... anywhere in the cell
        Regex::new(r"(?i)(SOL|SAĞ|SAG)_\d+\+\d+").expect("geçerli regex")
    })
}

/// Interprets the raw channel cell. Anything outside the literal set
/// and the side pattern is false, including blanks.
pub fn is_channel(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    if AFFIRMATIVE.contains(&lowered.as_str()) {
        return true;
    }
    side_pattern().is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_literals() {
        assert!(is_channel("evet"));
        assert!(is_channel("VAR"));
        assert!(is_channel(" 1 "));
        assert!(is_channel("True"));
    }

    #[test]
    fn test_side_encodings() {
        assert!(is_channel("SOL_13+9"));
        assert!(is_channel("sol_13+9"));
        assert!(is_channel("SAĞ_5+5"));
        assert!(is_channel("SAG_10+8"));
    }

    #[test]
    fn test_side_encoding_embedded_in_cell() {
        assert!(is_channel("KANAL: SOL_13+9"));
        assert!(is_channel("SAĞ_5+5 (üst kenar)"));
    }

    #[test]
    fn test_negatives() {
        assert!(!is_channel(""));
        assert!(!is_channel("none"));
        assert!(!is_channel("hayır"));
        assert!(!is_channel("SOL_13"));
        assert!(!is_channel("ORTA_13+9"));
    }
}
