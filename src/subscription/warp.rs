//! WARP configuration entries

/// Separators allowed between entries of a WARP blob
const SEPARATORS: &[char] = &['\t', '"', '\'', '|', '\r', '\n'];

/// Split a raw WARP blob into ordered, trimmed, non-empty entries
pub fn normalize(raw: &str) -> Vec<String> {
    raw.split(SEPARATORS)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mixed_separators() {
        let raw = "\"wg://one\"\t'wg://two'|wg://three\r\n\r\n  wg://four  |";
        assert_eq!(
            normalize(raw),
            vec!["wg://one", "wg://two", "wg://three", "wg://four"]
        );
    }

    #[test]
    fn test_normalize_empty_blob() {
        assert!(normalize("").is_empty());
        assert!(normalize("|||\n\t\"\"").is_empty());
    }
}
