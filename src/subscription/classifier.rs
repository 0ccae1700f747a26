//! Content classification for fetched subscription bodies

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

/// Substrings that mark a structured client configuration
const FULL_CONFIG_MARKERS: &[&str] = &["proxies:", "outbounds:"];

/// Standard alphabet, padding optional (providers frequently drop it)
const NODE_LIST_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// What a fetched body turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A complete client configuration; forwarded by URL, never decomposed
    FullConfig,
    /// Newline-delimited node URIs (already decoded if the body was base64)
    NodeList(String),
}

/// Classify a fetched body
///
/// This never fails: a body that is not valid base64 is taken as a
/// plaintext node list.
pub fn classify(body: &str) -> Classification {
    if FULL_CONFIG_MARKERS.iter().any(|marker| body.contains(marker)) {
        return Classification::FullConfig;
    }

    let nodes = decode_base64_text(body).unwrap_or_else(|| body.to_string());
    Classification::NodeList(nodes)
}

/// Decode whitespace-stripped base64 into UTF-8 text
///
/// Returns `None` when the input has characters outside the standard
/// alphabet, malformed padding, or decodes to non-UTF-8 bytes.
pub fn decode_base64_text(input: &str) -> Option<String> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = NODE_LIST_BASE64.decode(compact.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn test_yaml_config_is_full_config() {
        assert_eq!(
            classify("proxies:\n  - name: a\n    type: ss\n"),
            Classification::FullConfig
        );
    }

    #[test]
    fn test_outbounds_marker_is_full_config() {
        assert_eq!(
            classify("log:\n  level: info\noutbounds:\n  - type: direct\n"),
            Classification::FullConfig
        );
    }

    #[test]
    fn test_markers_are_literal_substrings() {
        // The quote between key and colon keeps JSON from matching
        let json = r#"{"outbounds": [{"type": "direct"}]}"#;
        assert_eq!(classify(json), Classification::NodeList(json.to_string()));

        // A node name containing a marker is enough
        assert_eq!(
            classify("vmess://a#proxies:hk\n"),
            Classification::FullConfig
        );
    }

    #[test]
    fn test_base64_node_list_is_decoded() {
        let body = STANDARD.encode("vmess://abc\nvmess://def");
        match classify(&body) {
            Classification::NodeList(nodes) => {
                assert_eq!(nodes.lines().collect::<Vec<_>>(), vec!["vmess://abc", "vmess://def"]);
            }
            other => panic!("expected node list, got {:?}", other),
        }
    }

    #[test]
    fn test_wrapped_and_unpadded_base64_is_decoded() {
        let encoded = STANDARD.encode("trojan://pw@host:443#one");
        let unpadded = encoded.trim_end_matches('=');
        let (head, tail) = unpadded.split_at(10);
        let wrapped = format!("{}\r\n{}\n", head, tail);

        assert_eq!(
            classify(&wrapped),
            Classification::NodeList("trojan://pw@host:443#one".to_string())
        );
    }

    #[test]
    fn test_plaintext_node_list_is_kept() {
        let body = "vless://id@a.example:443#a\nss://abc@b.example:1#b\n";
        assert_eq!(
            classify(body),
            Classification::NodeList(body.to_string())
        );
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        let body = STANDARD.encode([0xffu8, 0xfe, 0xfd]);
        assert_eq!(decode_base64_text(&body), None);
    }

    #[test]
    fn test_decode_rejects_foreign_alphabet() {
        assert_eq!(decode_base64_text("abc-def_"), None);
        assert_eq!(decode_base64_text("vmess://abc"), None);
    }
}
