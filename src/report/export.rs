//! CSV and JSON export of page records

use crate::crawler::PageRecord;
use crate::report::ReportResult;
use std::io::Write;

/// Column headers of the CSV export
pub const CSV_HEADERS: [&str; 20] = [
    "URL",
    "Referrer",
    "StatusCode",
    "Title",
    "Meta Description",
    "H1 Count",
    "Canonical",
    "Header Levels",
    "Internal Links",
    "External Links",
    "Has Main",
    "Has Nav",
    "Has Footer",
    "Has Header",
    "Inline Style Tags",
    "Inline Script Tags",
    "Structured Data Count",
    "Image Count",
    "Anchor Count",
    "SEO Fix Suggestions",
];

/// Short fixes for the most common gaps on a page
pub fn fix_suggestions(page: &PageRecord) -> Vec<String> {
    let mut suggestions = Vec::new();
    let h1_count = page.h1_count();

    let checks = [
        (page.title.is_empty(), "Add a <title> tag."),
        (page.description.is_empty(), "Add a meta description."),
        (page.canonical.is_empty(), "Add a canonical tag."),
        (h1_count == 0, "Include at least one <h1> tag."),
        (h1_count > 1, "Reduce to one <h1> tag."),
        (!page.has_main, "Add a <main> tag for accessibility."),
        (!page.has_nav, "Add a <nav> tag for navigation."),
        (!page.has_footer, "Add a <footer> tag."),
        (!page.has_header, "Add a <header> tag."),
        (page.structured_data_count == 0, "Add structured data (ld+json)."),
    ];
    suggestions.extend(
        checks
            .iter()
            .filter(|(applies, _)| *applies)
            .map(|(_, text)| text.to_string()),
    );

    let missing_alt = page.missing_alt_count();
    if missing_alt > 0 {
        suggestions.push(format!("{} images are missing alt text.", missing_alt));
    }

    suggestions
}

fn csv_row(page: &PageRecord) -> Vec<String> {
    let header_levels = page
        .header_levels
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",");

    let suggestions = fix_suggestions(page);
    let suggestions = if suggestions.is_empty() {
        "None".to_string()
    } else {
        suggestions.join(" | ")
    };

    vec![
        page.url.to_string(),
        page.referrer
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_default(),
        page.status_code.to_string(),
        page.title.clone(),
        page.description.clone(),
        page.h1_count().to_string(),
        page.canonical.clone(),
        header_levels,
        page.internal_links.to_string(),
        page.external_links.to_string(),
        page.has_main.to_string(),
        page.has_nav.to_string(),
        page.has_footer.to_string(),
        page.has_header.to_string(),
        page.inline_style_tags.to_string(),
        page.inline_script_tags.to_string(),
        page.structured_data_count.to_string(),
        page.images.len().to_string(),
        page.anchor_texts.len().to_string(),
        suggestions,
    ]
}

/// Writes one CSV row per page, preceded by `CSV_HEADERS`
pub fn export_csv<W: Write>(writer: W, pages: &[PageRecord]) -> ReportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;
    for page in pages {
        csv_writer.write_record(csv_row(page))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// CSV export into a string
pub fn export_csv_string(pages: &[PageRecord]) -> ReportResult<String> {
    let mut buffer = Vec::new();
    export_csv(&mut buffer, pages)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes the page records as a pretty-printed JSON array
pub fn write_json<W: Write>(writer: W, pages: &[PageRecord]) -> ReportResult<()> {
    serde_json::to_writer_pretty(writer, pages)?;
    Ok(())
}
