//! Plain text report, as printed by the CLI

use crate::report::analysis::{DuplicateGroup, Severity, SiteReport};
use std::fmt::Write;

/// Formats the analysis as a plain text report
pub fn format_report(report: &SiteReport) -> String {
    let mut out = String::new();

    out.push_str("SEO + Dead Link Report:\n");
    for page in &report.pages {
        let _ = writeln!(
            out,
            "- {} [{}] Title: {:?} | Meta: {:?}",
            page.url, page.status_code, page.title, page.description
        );
        let _ = writeln!(
            out,
            "  [Links] Internal: {} | External: {}",
            page.internal_links, page.external_links
        );
        for finding in &page.findings {
            let tag = match finding.severity() {
                Severity::Error => "[ERROR]",
                Severity::Warning => "[SEO]  ",
            };
            let _ = writeln!(out, "  {} {}", tag, finding);
        }
    }

    out.push_str("\nDuplicate SEO Content Check:\n");
    if report.duplicate_titles.is_empty() && report.duplicate_descriptions.is_empty() {
        out.push_str("  No duplicate titles or meta descriptions\n");
    }
    write_duplicates(&mut out, "title", &report.duplicate_titles);
    write_duplicates(&mut out, "meta description", &report.duplicate_descriptions);

    out
}

fn write_duplicates(out: &mut String, label: &str, groups: &[DuplicateGroup]) {
    for group in groups {
        let _ = writeln!(out, "  [SEO]   Duplicate {}: {:?} used on:", label, group.value);
        for url in &group.urls {
            let _ = writeln!(out, "           - {}", url);
        }
    }
}
