//! Blacklist evaluation over provider reports.

use std::collections::BTreeMap;

use crate::extract::ProviderReport;

/// Matched blacklist entries per flagged working file, in blacklist order.
/// Repeats may appear when an entry matches in more than one origin.
pub type WarningRecord = BTreeMap<String, Vec<String>>;

/// Evaluate an extracted report against the blacklist.
///
/// An entry matches a file when it is a substring of any system name in any
/// origin category of that file. Files with no matches are omitted; an empty
/// blacklist yields an empty record.
pub fn check_against_blacklist(report: &ProviderReport, blacklist: &[String]) -> WarningRecord {
    let mut record = WarningRecord::new();

    for (file, origins) in report {
        let mut matches = Vec::new();

        for entry in blacklist {
            for systems in origins.values() {
                if systems.keys().any(|system| system.contains(entry.as_str())) {
                    matches.push(entry.clone());
                }
            }
        }

        if !matches.is_empty() {
            record.insert(file.clone(), matches);
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_providers;

    fn report_with(file: &str, xml: &[u8]) -> ProviderReport {
        let mut report = ProviderReport::new();
        report.insert(file.to_string(), extract_providers(xml));
        report
    }

    #[test]
    fn empty_blacklist_never_matches() {
        let report = report_with(
            "a.sdlxliff",
            br#"<seg origin="mt" origin-system="Microsoft Translator"/>"#,
        );
        assert!(check_against_blacklist(&report, &[]).is_empty());
    }

    #[test]
    fn substring_containment_matches() {
        let report = report_with(
            "a.sdlxliff",
            br#"<seg origin="mt" origin-system="Microsoft Translator"/>"#,
        );

        let matched = check_against_blacklist(&report, &["Microsoft".to_string()]);
        assert_eq!(matched["a.sdlxliff"], vec!["Microsoft"]);

        let unmatched = check_against_blacklist(&report, &["DeepL".to_string()]);
        assert!(unmatched.is_empty());
    }

    #[test]
    fn clean_files_are_omitted() {
        let mut report = report_with(
            "clean.sdlxliff",
            br#"<seg origin="tm" origin-system="TM Server"/>"#,
        );
        report.extend(report_with(
            "flagged.sdlxliff",
            br#"<seg origin="mt" origin-system="DeepL MT"/>"#,
        ));

        let record = check_against_blacklist(&report, &["DeepL".to_string()]);
        assert_eq!(record.len(), 1);
        assert!(record.contains_key("flagged.sdlxliff"));
    }

    #[test]
    fn repeats_across_origins_are_kept() {
        let report = report_with(
            "a.sdlxliff",
            br#"<seg origin="mt" origin-system="DeepL"/><seg origin="interactive" origin-system="DeepL"/>"#,
        );
        let record = check_against_blacklist(&report, &["DeepL".to_string()]);
        // One push per matching origin, no dedup required.
        assert_eq!(record["a.sdlxliff"], vec!["DeepL", "DeepL"]);
    }

    #[test]
    fn empty_report_yields_empty_record() {
        let record = check_against_blacklist(&ProviderReport::new(), &["DeepL".to_string()]);
        assert!(record.is_empty());
    }
}
