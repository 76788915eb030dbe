//! Markdown report generation
//!
//! This module generates a human-readable markdown version of the analysis,
//! including statistics, per-page findings and duplicate content.

use crate::report::analysis::{DuplicateGroup, SiteReport};
use crate::report::stats::CrawlStatistics;
use crate::report::ReportResult;
use chrono::Utc;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report to a file
///
/// # Arguments
///
/// * `report` - The analysis of the crawl
/// * `stats` - Statistics over the same pages
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(ReportError)` - Failed to write the report
pub fn write_markdown_report(
    report: &SiteReport,
    stats: &CrawlStatistics,
    output_path: &Path,
) -> ReportResult<()> {
    let markdown = format_markdown_report(report, stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats the analysis as markdown
pub fn format_markdown_report(report: &SiteReport, stats: &CrawlStatistics) -> String {
    let mut md = String::new();

    md.push_str("# Sumi-Lens SEO Report\n\n");
    md.push_str(&format!("- **Generated**: {}\n", Utc::now().to_rfc3339()));
    if let Some(first) = report.pages.first() {
        md.push_str(&format!("- **First page**: {}\n", first.url));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Pages**: {}\n", stats.total_pages));
    md.push_str(&format!("- **Unique Hosts**: {}\n", stats.unique_hosts));
    md.push_str(&format!(
        "- **Links**: {} internal, {} external\n",
        stats.internal_links, stats.external_links
    ));
    md.push_str(&format!(
        "- **Images Missing Alt**: {} of {}\n",
        stats.images_missing_alt, stats.total_images
    ));
    md.push_str(&format!("- **Total Findings**: {}\n", report.total_findings()));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n", stats.success_rate()));
    md.push_str(&format!("- **Error Rate**: {:.2}%\n\n", stats.error_rate()));

    // Status breakdown
    md.push_str("## Status Breakdown\n\n");
    md.push_str("| Status | Count |\n");
    md.push_str("|--------|-------|\n");
    for (status, count) in &stats.pages_by_status {
        let label = if *status == 0 {
            "Unreachable".to_string()
        } else {
            status.to_string()
        };
        md.push_str(&format!("| {} | {} |\n", label, count));
    }
    md.push('\n');

    // Per-page findings
    md.push_str("## Pages\n\n");
    for page in &report.pages {
        md.push_str(&format!("### {}\n\n", page.url));
        md.push_str(&format!(
            "Status {} | {} internal / {} external links\n\n",
            page.status_code, page.internal_links, page.external_links
        ));
        if page.findings.is_empty() {
            md.push_str("No issues found.\n\n");
            continue;
        }
        for finding in &page.findings {
            md.push_str(&format!("- {}\n", escape_markdown(&finding.to_string())));
        }
        md.push('\n');
    }

    // Duplicate content
    if !report.duplicate_titles.is_empty() || !report.duplicate_descriptions.is_empty() {
        md.push_str("## Duplicate Content\n\n");
        push_duplicates(&mut md, "Title", &report.duplicate_titles);
        push_duplicates(&mut md, "Meta Description", &report.duplicate_descriptions);
    }

    md
}

fn push_duplicates(md: &mut String, label: &str, groups: &[DuplicateGroup]) {
    for group in groups {
        md.push_str(&format!(
            "**Duplicate {}**: \"{}\"\n\n",
            label,
            escape_markdown(&group.value)
        ));
        for url in &group.urls {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }
}

/// Escapes characters markdown would render as HTML
fn escape_markdown(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}
