//! Self-contained HTML rendering of an annotated document.
//!
//! Grounded extractions are highlighted in place, coloured by class. Spans
//! that overlap an earlier highlight are left unhighlighted but still appear
//! in the item list below the text.

use std::collections::HashMap;
use std::path::Path;

use storage::ReportRepository;
use storage::models::{AnnotatedDocument, CharInterval, Extraction};

use crate::error::ExtractorError;

type Result<T> = std::result::Result<T, ExtractorError>;

const PALETTE: [&str; 10] = [
    "#D2E3FC", "#C8E6C9", "#FEF0C3", "#F9DEDC", "#FFDDBE", "#EADDFF", "#C4E9E4", "#FCE4EC",
    "#E8EAED", "#DDE8E8",
];

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 16px; color: #202124; }
.lx-summary { font-size: 13px; color: #5f6368; margin-bottom: 8px; }
.lx-legend { margin-bottom: 12px; }
.lx-legend-item { display: inline-block; padding: 2px 8px; margin: 0 6px 6px 0; border-radius: 4px; font-size: 13px; }
.lx-text { white-space: pre-wrap; line-height: 1.6; border: 1px solid #dadce0; border-radius: 6px; padding: 12px; max-height: 420px; overflow-y: auto; }
.lx-highlight { border-radius: 3px; padding: 1px 0; cursor: pointer; }
.lx-highlight.lx-active { outline: 2px solid #1a73e8; }
.lx-items { margin-top: 16px; }
.lx-item { border: 1px solid #dadce0; border-radius: 6px; padding: 8px 12px; margin-bottom: 8px; font-size: 14px; }
.lx-item.lx-active { border-color: #1a73e8; background: #f1f6fe; }
.lx-class { padding: 1px 6px; border-radius: 4px; font-weight: 600; margin-right: 6px; }
.lx-ungrounded { color: #b3261e; font-size: 12px; margin-left: 6px; }
.lx-attrs { margin: 6px 0 0 0; padding-left: 18px; color: #3c4043; }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('.lx-highlight').forEach(function (el) {
  el.addEventListener('click', function () {
    var idx = el.getAttribute('data-idx');
    document.querySelectorAll('.lx-active').forEach(function (a) { a.classList.remove('lx-active'); });
    el.classList.add('lx-active');
    var item = document.getElementById('lx-item-' + idx);
    if (item) { item.classList.add('lx-active'); item.scrollIntoView({ behavior: 'smooth', block: 'nearest' }); }
  });
});
"#;

/// Reads the first document of a JSON-lines report and renders it.
pub async fn visualize_file(path: &Path) -> Result<String> {
    let documents = ReportRepository::load(path).await?;
    let document = documents.into_iter().next().ok_or_else(|| {
        ExtractorError::VisualizeError(format!(
            "No annotated documents found in {}",
            path.display()
        ))
    })?;

    Ok(visualize(&document))
}

pub fn visualize(document: &AnnotatedDocument) -> String {
    let colors = class_colors(&document.extractions);
    let color_of = |class: &str| colors.get(class).copied().unwrap_or(PALETTE[0]);

    let mut html = String::with_capacity(document.text.len() * 2 + 4096);
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body>\n");

    html.push_str(&format!(
        "<div class=\"lx-summary\">{} extractions, {} grounded in source text</div>\n",
        document.len(),
        document.grounded_count()
    ));

    html.push_str("<div class=\"lx-legend\">");
    for class in ordered_classes(&document.extractions) {
        html.push_str(&format!(
            "<span class=\"lx-legend-item\" style=\"background-color:{}\">{}</span>",
            color_of(class),
            escape_html(class)
        ));
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"lx-text\">");
    let mut cursor = 0;
    for (index, interval) in highlight_spans(document) {
        let extraction = &document.extractions[index];
        html.push_str(&escape_html(&document.text[cursor..interval.start_pos]));
        html.push_str(&format!(
            "<span class=\"lx-highlight\" data-idx=\"{}\" style=\"background-color:{}\" title=\"{}\">",
            index,
            color_of(&extraction.extraction_class),
            escape_html(&extraction.extraction_class)
        ));
        html.push_str(&escape_html(
            &document.text[interval.start_pos..interval.end_pos],
        ));
        html.push_str("</span>");
        cursor = interval.end_pos;
    }
    html.push_str(&escape_html(&document.text[cursor..]));
    html.push_str("</div>\n");

    html.push_str("<div class=\"lx-items\">\n");
    for (index, extraction) in document.extractions.iter().enumerate() {
        html.push_str(&render_item(
            index,
            extraction,
            color_of(&extraction.extraction_class),
        ));
    }
    html.push_str("</div>\n<script>");
    html.push_str(SCRIPT);
    html.push_str("</script></body></html>\n");
    html
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_item(index: usize, extraction: &Extraction, color: &str) -> String {
    let mut item = format!(
        "<div class=\"lx-item\" id=\"lx-item-{}\"><span class=\"lx-class\" style=\"background-color:{}\">{}</span>{}",
        index,
        color,
        escape_html(&extraction.extraction_class),
        escape_html(&extraction.extraction_text)
    );
    if !extraction.is_grounded() {
        item.push_str("<span class=\"lx-ungrounded\">not found in source</span>");
    }
    if !extraction.attributes.is_empty() {
        item.push_str("<ul class=\"lx-attrs\">");
        for (key, value) in &extraction.attributes {
            item.push_str(&format!(
                "<li><b>{}</b>: {}</li>",
                escape_html(key),
                escape_html(value)
            ));
        }
        item.push_str("</ul>");
    }
    item.push_str("</div>\n");
    item
}

fn ordered_classes(extractions: &[Extraction]) -> Vec<&str> {
    let mut classes: Vec<&str> = Vec::new();
    for extraction in extractions {
        if !classes.contains(&extraction.extraction_class.as_str()) {
            classes.push(&extraction.extraction_class);
        }
    }
    classes
}

fn class_colors(extractions: &[Extraction]) -> HashMap<&str, &'static str> {
    ordered_classes(extractions)
        .into_iter()
        .enumerate()
        .map(|(i, class)| (class, PALETTE[i % PALETTE.len()]))
        .collect()
}

/// Valid, non-overlapping spans in text order, paired with the index of
/// their extraction.
fn highlight_spans(document: &AnnotatedDocument) -> Vec<(usize, CharInterval)> {
    let mut spans: Vec<(usize, CharInterval)> = document
        .extractions
        .iter()
        .enumerate()
        .filter_map(|(index, e)| {
            let interval = e.char_interval?;
            interval.slice(&document.text)?;
            Some((index, interval))
        })
        .collect();

    spans.sort_by_key(|(index, interval)| (interval.start_pos, std::cmp::Reverse(interval.len()), *index));

    let mut kept: Vec<(usize, CharInterval)> = Vec::with_capacity(spans.len());
    for (index, interval) in spans {
        if kept.last().is_some_and(|(_, last)| last.overlaps(&interval)) {
            tracing::debug!("Skipping overlapping highlight for extraction {}", index);
            continue;
        }
        kept.push((index, interval));
    }
    kept
}
