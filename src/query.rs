//! Query composition.

/// Merge typed text with OCR text: joined with one space, then trimmed.
/// An empty result means there is nothing to search.
pub fn compose(typed: &str, ocr: &str) -> String {
    format!("{} {}", typed, ocr).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose() {
        assert_eq!(compose("a", "b"), "a b");
        assert_eq!(compose("", ""), "");
        assert_eq!(compose("  a  ", ""), "a");
        assert_eq!(compose("", "VAILLANT 178978"), "VAILLANT 178978");
        assert_eq!(compose("   ", "\n"), "");
    }

    #[test]
    fn test_compose_keeps_typed_text_first() {
        assert_eq!(
            compose("diverter valve", "ecoTEC 835"),
            "diverter valve ecoTEC 835"
        );
    }
}
