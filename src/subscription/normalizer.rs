//! Merging manual and fetched nodes into a single ordered set

use std::collections::HashSet;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Deduplicated node lines in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet {
    nodes: Vec<String>,
}

impl NodeSet {
    /// Build the set from manual node URIs followed by fetched node blobs
    ///
    /// Each input may hold several newline-separated nodes. Blank lines are
    /// dropped and only the first occurrence of a line is kept.
    pub fn from_sources<'a, M, P>(manual: M, processed: P) -> Self
    where
        M: IntoIterator<Item = &'a str>,
        P: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();

        for blob in manual.into_iter().chain(processed) {
            for line in blob.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                if seen.insert(line) {
                    nodes.push(line.to_string());
                }
            }
        }

        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Newline-joined node list
    pub fn to_text(&self) -> String {
        self.nodes.join("\n")
    }

    /// Standard padded base64 of the UTF-8 node list, for inline transport
    pub fn encode(&self) -> String {
        BASE64.encode(self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_duplicate_of_fetched_node_kept_once() {
        let manual = ["vmess://same"];
        let fetched = ["vless://other\nvmess://same\ntrojan://third"];

        let set = NodeSet::from_sources(manual, fetched);

        assert_eq!(
            set.nodes(),
            &["vmess://same", "vless://other", "trojan://third"]
        );
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let set = NodeSet::from_sources(["", "  "], ["\n\nss://a\r\n \t\nss://b\n"]);
        assert_eq!(set.nodes(), &["ss://a", "ss://b"]);
        assert!(!set.to_text().contains("\n\n"));
    }

    #[test]
    fn test_first_occurrence_order_is_preserved() {
        let set = NodeSet::from_sources([], ["c\na\nb", "a\nd\nc"]);
        assert_eq!(set.nodes(), &["c", "a", "b", "d"]);
    }

    #[test]
    fn test_uniqueness_is_exact_string_match() {
        let set = NodeSet::from_sources(["vmess://A", "vmess://a"], []);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_set() {
        let set = NodeSet::from_sources([], []);
        assert!(set.is_empty());
        assert_eq!(set.to_text(), "");
    }

    #[test]
    fn test_encoding_round_trips_exactly() {
        let set = NodeSet::from_sources(
            ["trojan://pw@h:443#%E4%B8%AD%E6%96%87"],
            ["vmess://abc\nss://节点"],
        );

        let decoded = BASE64.decode(set.encode()).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), set.to_text());
    }
}
