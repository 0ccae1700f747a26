//! Display names for node URIs
//!
//! Used when links are created from bare URLs (see [`Link::from_url`]).
//!
//! [`Link::from_url`]: crate::models::Link::from_url

use percent_encoding::percent_decode_str;
use url::Url;

use super::classifier::decode_base64_text;

/// Name used for empty input
const UNNAMED: &str = "Unnamed";

/// Characters kept from the raw URI when nothing better can be derived
const FALLBACK_PREFIX_CHARS: usize = 40;

/// Derive a human-readable label from a node URI
///
/// Tries, in order: the `#fragment`, the host inside a base64 `ss://` body,
/// the host after `@` for trojan/vless/vmess, and the host of a generic URL.
/// Anything unparseable falls back to a truncated prefix of the URI, and so
/// does a fragment that is not valid percent-encoded UTF-8.
pub fn extract_node_name(uri: &str) -> String {
    if uri.is_empty() {
        return UNNAMED.to_string();
    }

    try_extract(uri).unwrap_or_else(|| truncated(uri))
}

fn try_extract(uri: &str) -> Option<String> {
    if let Some((_, fragment)) = uri.rsplit_once('#') {
        let name = percent_decode_str(fragment.trim()).decode_utf8().ok()?;
        if !name.is_empty() {
            return Some(name.into_owned());
        }
    }

    if let Some(body) = uri.strip_prefix("ss://") {
        let encoded = body.split('#').next().unwrap_or_default().trim();
        let decoded = decode_base64_text(encoded)?;
        let mut parts = decoded.split('@');
        parts.next();
        if let Some(server) = parts.next() {
            return Some(server.split(':').next().unwrap_or_default().to_string());
        }
    }

    if ["trojan://", "vless://", "vmess://"]
        .iter()
        .any(|scheme| uri.starts_with(scheme))
    {
        let (_, host_part) = uri.split_once('@')?;
        let host = host_part
            .split(['@', '#', ':'])
            .next()
            .unwrap_or_default();
        return Some(host.to_string());
    }

    let url = Url::parse(uri).ok()?;
    url.host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}

fn truncated(uri: &str) -> String {
    let prefix: String = uri.chars().take(FALLBACK_PREFIX_CHARS).collect();
    format!("{}...", prefix)
}
