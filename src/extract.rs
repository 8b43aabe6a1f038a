//! Provider extraction from working-file XML bytes.
//!
//! Working files are SDLXLIFF markup whose translated segments carry
//! `origin="..." origin-system="..."` attribute pairs. The scan is a byte
//! regex rather than a real XML parse: deliverables are large, frequently
//! half-written when first observed, and only these two attributes matter.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::bytes::Regex;

/// Occurrence counts per origin-system name.
pub type SystemCountMap = BTreeMap<String, u64>;

/// Origin category (e.g. a TM or MT label) to its system counts.
pub type OriginMap = BTreeMap<String, SystemCountMap>;

/// Working-file identifier (archive member name or base filename) to its
/// extracted origins. Rebuilt fresh for every event.
pub type ProviderReport = BTreeMap<String, OriginMap>;

fn attribute_pair() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"origin="([^"]+)" origin-system="([^"]+)""#)
            .expect("attribute pair pattern is valid")
    })
}

/// Extract provider attribution from working-file bytes.
///
/// Every occurrence of a system name anywhere in the file increments one
/// running counter for that name, and the value stored for an
/// (origin, system) pair is the counter at the moment of that match. The
/// final map therefore reflects "this vendor was used N times up to here"
/// per origin category.
///
/// Malformed markup and non-UTF-8 attribute values yield no entries for the
/// affected matches; extraction never errors.
pub fn extract_providers(bytes: &[u8]) -> OriginMap {
    let mut origins = OriginMap::new();
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for caps in attribute_pair().captures_iter(bytes) {
        let (origin, system) = match (
            std::str::from_utf8(&caps[1]),
            std::str::from_utf8(&caps[2]),
        ) {
            (Ok(o), Ok(s)) => (o.to_string(), s.to_string()),
            // Skip matches whose attribute values do not decode.
            _ => continue,
        };

        let count = counts.entry(system.clone()).or_insert(0);
        *count += 1;
        origins.entry(origin).or_default().insert(system, *count);
    }

    origins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(extract_providers(b"").is_empty());
        assert!(extract_providers(b"<xliff><seg>no attributes</seg></xliff>").is_empty());
    }

    #[test]
    fn single_pair() {
        let xml = br#"<sdl:seg origin="mt" origin-system="Acme MT"/>"#;
        let map = extract_providers(xml);
        assert_eq!(map["mt"]["Acme MT"], 1);
    }

    #[test]
    fn counts_accumulate_across_occurrences() {
        let xml = br#"
            <sdl:seg origin="mt" origin-system="Acme MT"/>
            <sdl:seg origin="mt" origin-system="Acme MT"/>
        "#;
        let map = extract_providers(xml);
        assert_eq!(map.len(), 1);
        assert_eq!(map["mt"]["Acme MT"], 2);
    }

    #[test]
    fn counter_is_global_per_system_across_origins() {
        let xml = br#"
            <sdl:seg origin="tm" origin-system="Acme MT"/>
            <sdl:seg origin="mt" origin-system="Acme MT"/>
            <sdl:seg origin="mt" origin-system="Acme MT"/>
        "#;
        let map = extract_providers(xml);
        // The count stored per pair is the running total at that match.
        assert_eq!(map["tm"]["Acme MT"], 1);
        assert_eq!(map["mt"]["Acme MT"], 3);
    }

    #[test]
    fn distinct_systems_count_independently() {
        let xml = br#"
            <sdl:seg origin="mt" origin-system="Acme MT"/>
            <sdl:seg origin="mt" origin-system="Microsoft Translator"/>
            <sdl:seg origin="mt" origin-system="Acme MT"/>
        "#;
        let map = extract_providers(xml);
        assert_eq!(map["mt"]["Acme MT"], 2);
        assert_eq!(map["mt"]["Microsoft Translator"], 1);
    }

    #[test]
    fn extraction_is_deterministic() {
        let xml = br#"
            <sdl:seg origin="auto-propagated" origin-system="TM"/>
            <sdl:seg origin="mt" origin-system="DeepL"/>
        "#;
        assert_eq!(extract_providers(xml), extract_providers(xml));
    }

    #[test]
    fn non_utf8_values_are_skipped() {
        let mut xml = Vec::new();
        xml.extend_from_slice(br#"origin=""#);
        xml.extend_from_slice(&[0xff, 0xfe]);
        xml.extend_from_slice(br#"" origin-system="Acme MT""#);
        xml.extend_from_slice(br#" origin="mt" origin-system="DeepL""#);
        let map = extract_providers(&xml);
        assert_eq!(map.len(), 1);
        assert_eq!(map["mt"]["DeepL"], 1);
    }
}
