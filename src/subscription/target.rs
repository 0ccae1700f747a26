//! Output format resolution from client signals

use std::collections::HashSet;

/// Output encoding requested from the conversion service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Target {
    Clash,
    Surge,
    QuanX,
    Loon,
    SingBox,
    #[default]
    Base64,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Clash => "clash",
            Target::Surge => "surge",
            Target::QuanX => "quanx",
            Target::Loon => "loon",
            Target::SingBox => "singbox",
            Target::Base64 => "base64",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client sniffing table, scanned in order; the first hit wins
const CLIENT_TABLE: &[(&str, &[&str], Target)] = &[
    ("clash", &["clash"], Target::Clash),
    ("surge", &["surge"], Target::Surge),
    ("quantumult", &["quanx"], Target::QuanX),
    ("loon", &["loon"], Target::Loon),
    ("singbox", &["singbox"], Target::SingBox),
    ("sing-box", &["singbox", "sb"], Target::SingBox),
];

/// Flags that force raw base64 output regardless of the client
const BASE64_FLAGS: &[&str] = &["base64", "b64"];

/// Presence-only query parameters of an inbound request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFlags {
    keys: HashSet<String>,
}

impl QueryFlags {
    /// Parse a raw query string; keys are form-url-decoded, values ignored
    pub fn parse(query: Option<&str>) -> Self {
        let keys = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(key, _)| key.into_owned())
                    .collect()
            })
            .unwrap_or_default();
        Self { keys }
    }

    pub fn has(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

/// Resolve the output target from the User-Agent and query flags
///
/// An explicit `base64`/`b64` flag always wins over client sniffing.
pub fn resolve(user_agent: &str, flags: &QueryFlags) -> Target {
    let user_agent = user_agent.to_lowercase();

    let sniffed = CLIENT_TABLE
        .iter()
        .find(|(keyword, query_keys, _)| {
            user_agent.contains(keyword) || query_keys.iter().any(|key| flags.has(key))
        })
        .map(|(_, _, target)| *target)
        .unwrap_or_default();

    if BASE64_FLAGS.iter().any(|key| flags.has(key)) {
        return Target::Base64;
    }

    sniffed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(query: &str) -> QueryFlags {
        QueryFlags::parse(Some(query))
    }

    #[test]
    fn test_user_agent_sniffing() {
        let none = QueryFlags::default();
        assert_eq!(resolve("ClashMetaForAndroid/2.10", &none), Target::Clash);
        assert_eq!(resolve("Surge iOS/2920", &none), Target::Surge);
        assert_eq!(resolve("Quantumult%20X/1.4", &none), Target::QuanX);
        assert_eq!(resolve("Loon/3.1", &none), Target::Loon);
        assert_eq!(resolve("SFA/1.8 (sing-box 1.8.0)", &none), Target::SingBox);
        assert_eq!(resolve("v2rayN/6.0", &none), Target::Base64);
        assert_eq!(resolve("", &none), Target::Base64);
    }

    #[test]
    fn test_query_flags_select_target() {
        assert_eq!(resolve("", &flags("clash")), Target::Clash);
        assert_eq!(resolve("", &flags("quanx")), Target::QuanX);
        assert_eq!(resolve("", &flags("sb")), Target::SingBox);
        assert_eq!(resolve("", &flags("token=abc&loon")), Target::Loon);
    }

    #[test]
    fn test_table_order_decides_between_signals() {
        // clash is scanned before surge
        assert_eq!(resolve("surge", &flags("clash")), Target::Clash);
        assert_eq!(resolve("clash-verge", &flags("surge")), Target::Clash);
    }

    #[test]
    fn test_base64_flag_overrides_sniffing() {
        assert_eq!(resolve("clash-verge/1.0", &flags("b64")), Target::Base64);
        assert_eq!(resolve("", &flags("surge&base64")), Target::Base64);
        assert_eq!(resolve("", &flags("base64=1")), Target::Base64);
    }

    #[test]
    fn test_query_flag_keys_are_decoded() {
        let parsed = flags("sing%62ox&x=1");
        assert!(parsed.has("singbox"));
        assert!(parsed.has("x"));
        assert!(!parsed.has("1"));
    }

    #[test]
    fn test_target_as_str() {
        assert_eq!(Target::QuanX.as_str(), "quanx");
        assert_eq!(Target::SingBox.to_string(), "singbox");
        assert_eq!(Target::default(), Target::Base64);
    }
}
