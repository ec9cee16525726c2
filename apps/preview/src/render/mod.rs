//! Print-document and preview HTML.
//!
//! The print document is what the external headless-browser engine turns
//! into the authoritative PDF. It is assembled from the same block fragments
//! the paginator measures, so preview and print agree on content. The engine
//! re-flows it independently; page breaks in the preview are only estimates.

use chrono::NaiveDate;
use quick_xml::escape::escape;
use serde::Serialize;

use crate::content::{cover_letter_blocks, resume_blocks};
use crate::errors::{AppError, AppResult};
use crate::layout::block::{ContentBlock, Page, A4_HEIGHT_PX, A4_WIDTH_PX};
use crate::models::document::{CoverLetterData, DocumentInput, DocumentKind, FormData};

/// `year month` for a dated end of a range, `Present` when the year is blank.
pub fn format_date_range(year: &str, month: Option<&str>) -> String {
    let year = year.trim();
    if year.is_empty() {
        return "Present".to_string();
    }
    match month.map(str::trim).filter(|m| !m.is_empty()) {
        Some(month) => format!("{year} {month}"),
        None => year.to_string(),
    }
}

/// Standalone HTML document with `css` injected as-is.
pub fn html_document(title: &str, css: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n<style>\n{css}\nbody {{ margin: 0; padding: 0; }}\n</style>\n</head>\n\
         <body>\n{body}\n</body>\n</html>\n",
        escape(title)
    )
}

fn content_body(blocks: &[ContentBlock], extra_class: Option<&str>) -> String {
    let inner: String = blocks.iter().map(|b| b.html.as_str()).collect();
    let inner = match extra_class {
        Some(class) => format!("<div class=\"{class}\">{inner}</div>"),
        None => inner,
    };
    format!("<div class=\"resume-preview-container\"><div class=\"resume-content\">{inner}</div></div>")
}

pub fn resume_document_html(form: &FormData, css: &str) -> String {
    html_document(
        &format!("{} - Resume", form.name.trim()),
        css,
        &content_body(&resume_blocks(form), None),
    )
}

pub fn cover_letter_document_html(
    form: &FormData,
    letter: &CoverLetterData,
    css: &str,
    date: NaiveDate,
) -> String {
    html_document(
        &format!("{} - Cover Letter", form.name.trim()),
        css,
        &content_body(
            &cover_letter_blocks(form, letter, date),
            Some("cover-letter-content"),
        ),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Print jobs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Downloaded as a file.
    Attachment,
    /// Shown in the browser's PDF viewer.
    Inline,
}

/// Browser viewport the engine loads the document into, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMargins {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl PageMargins {
    fn uniform(value: &str) -> Self {
        Self {
            top: value.to_string(),
            right: value.to_string(),
            bottom: value.to_string(),
            left: value.to_string(),
        }
    }
}

/// Page setup handed to the headless-browser engine. The stylesheet's
/// `@page` rule carries the real margins, so the engine's own are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOptions {
    pub viewport: Viewport,
    pub format: String,
    pub print_background: bool,
    #[serde(rename = "preferCSSPageSize")]
    pub prefer_css_page_size: bool,
    pub margin: PageMargins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_header_footer: Option<bool>,
}

impl PrintOptions {
    /// A4 at 96 dpi, backgrounds on, CSS page size preferred, no engine margins.
    pub fn a4() -> Self {
        Self {
            viewport: Viewport {
                width: A4_WIDTH_PX as u32,
                height: A4_HEIGHT_PX as u32,
                device_scale_factor: 1,
            },
            format: "A4".to_string(),
            print_background: true,
            prefer_css_page_size: true,
            margin: PageMargins::uniform("0mm"),
            tagged: None,
            display_header_footer: None,
        }
    }

    /// Preview PDFs skip the accessibility tree and header/footer templates.
    pub fn a4_preview() -> Self {
        Self {
            tagged: Some(false),
            display_header_footer: Some(false),
            ..Self::a4()
        }
    }
}

/// Everything the print engine and the response need for one PDF.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    pub html: String,
    pub file_name: String,
    pub disposition: Disposition,
    pub options: PrintOptions,
    /// `Cache-Control` for the response; previews change on every edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,
}

impl PrintJob {
    /// Download job named after the applicant. Requires a name.
    pub fn download(
        kind: DocumentKind,
        input: &DocumentInput,
        css: &str,
        date: NaiveDate,
    ) -> AppResult<Self> {
        if !input.form_data.has_name() {
            return Err(AppError::Validation(
                "A name is required to generate a PDF".to_string(),
            ));
        }
        Ok(Self {
            html: print_html(kind, input, css, date),
            file_name: format!("{} - {}.pdf", input.form_data.name.trim(), kind.label()),
            disposition: Disposition::Attachment,
            options: PrintOptions::a4(),
            cache_control: None,
        })
    }

    /// Preview job shown inline under a fixed file name.
    pub fn preview(kind: DocumentKind, input: &DocumentInput, css: &str, date: NaiveDate) -> Self {
        let file_name = match kind {
            DocumentKind::Resume => "resume-preview.pdf",
            DocumentKind::CoverLetter => "cover-letter-preview.pdf",
        };
        Self {
            html: print_html(kind, input, css, date),
            file_name: file_name.to_string(),
            disposition: Disposition::Inline,
            options: PrintOptions::a4_preview(),
            cache_control: Some("no-cache".to_string()),
        }
    }

    /// Value of the `Content-Disposition` header for this job.
    pub fn content_disposition(&self) -> String {
        let kind = match self.disposition {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        };
        format!("{kind}; filename=\"{}\"", self.file_name.replace('"', "'"))
    }
}

fn print_html(kind: DocumentKind, input: &DocumentInput, css: &str, date: NaiveDate) -> String {
    match kind {
        DocumentKind::Resume => resume_document_html(&input.form_data, css),
        DocumentKind::CoverLetter => {
            let letter = input.cover_letter_data.clone().unwrap_or_default();
            cover_letter_document_html(&input.form_data, &letter, css, date)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Preview pages
// ────────────────────────────────────────────────────────────────────────────

/// Each estimated page as a `div.pdf-page` with its number label.
pub fn preview_pages_html(pages: &[Page]) -> String {
    let pages: String = pages
        .iter()
        .map(|page| {
            let blocks: String = page
                .content
                .iter()
                .map(|b| format!("<div>{}</div>", b.html))
                .collect();
            format!(
                "<div class=\"pdf-page\"><div class=\"page-number\">Page {}</div><div class=\"pdf-page-content\">{blocks}</div></div>",
                page.number
            )
        })
        .collect();
    format!("<div class=\"pdf-preview-container\">{pages}</div>")
}

/// Preview pages for `kind` wrapped in a standalone document.
pub fn preview_document_html(
    kind: DocumentKind,
    input: &DocumentInput,
    pages: &[Page],
    css: &str,
) -> String {
    let title = format!("{} - {} Preview", input.form_data.name.trim(), kind.label());
    html_document(&title, css, &preview_pages_html(pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::document_blocks;
    use crate::layout::html::visible_text;
    use crate::models::sample::sample_document;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_format_date_range() {
        assert_eq!(format_date_range("", Some("May")), "Present");
        assert_eq!(format_date_range("2020", None), "2020");
        assert_eq!(format_date_range("2020", Some(" ")), "2020");
        assert_eq!(format_date_range("2020", Some("May")), "2020 May");
    }

    #[test]
    fn test_resume_document_injects_css_and_reset() {
        let doc = sample_document();
        let html = resume_document_html(&doc.form_data, "h1 { color: navy; }");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Sarah Johnson - Resume</title>"));
        assert!(html.contains("h1 { color: navy; }\nbody { margin: 0; padding: 0; }"));
        assert!(html.contains("<div class=\"resume-content\"><h1>Sarah Johnson</h1>"));
    }

    #[test]
    fn test_print_document_text_matches_blocks() {
        let doc = sample_document();
        let blocks = document_blocks(DocumentKind::Resume, &doc, date());
        let expected: String = blocks.iter().map(|b| b.html.as_str()).collect();
        let html = resume_document_html(&doc.form_data, "");
        assert!(html.contains(&expected));
    }

    #[test]
    fn test_cover_letter_document_wraps_letter_content() {
        let doc = sample_document();
        let letter = doc.cover_letter_data.clone().unwrap();
        let html = cover_letter_document_html(&doc.form_data, &letter, "", date());
        assert!(html.contains("<div class=\"cover-letter-content\"><h1>Sarah Johnson</h1>"));
        assert!(html.contains("<p>October 18, 2026</p>"));
    }

    #[test]
    fn test_download_job_names_and_disposition() {
        let doc = sample_document();
        let job = PrintJob::download(DocumentKind::CoverLetter, &doc, "", date()).unwrap();
        assert_eq!(job.file_name, "Sarah Johnson - Cover Letter.pdf");
        assert_eq!(job.disposition, Disposition::Attachment);
        assert_eq!(
            job.content_disposition(),
            "attachment; filename=\"Sarah Johnson - Cover Letter.pdf\""
        );
    }

    #[test]
    fn test_download_requires_name() {
        let mut doc = sample_document();
        doc.form_data.name = "  ".to_string();
        let err = PrintJob::download(DocumentKind::Resume, &doc, "", date()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_preview_job_is_inline_with_fixed_name() {
        let mut doc = sample_document();
        doc.form_data.name.clear();
        let job = PrintJob::preview(DocumentKind::Resume, &doc, "", date());
        assert_eq!(job.file_name, "resume-preview.pdf");
        assert_eq!(job.content_disposition(), "inline; filename=\"resume-preview.pdf\"");
        let job = PrintJob::preview(DocumentKind::CoverLetter, &doc, "", date());
        assert_eq!(job.file_name, "cover-letter-preview.pdf");
    }

    #[test]
    fn test_download_job_prints_a4_without_engine_margins() {
        let doc = sample_document();
        let job = PrintJob::download(DocumentKind::Resume, &doc, "", date()).unwrap();
        assert_eq!(job.options, PrintOptions::a4());
        assert_eq!(job.options.viewport.width, 794);
        assert_eq!(job.options.viewport.height, 1123);
        assert_eq!(job.cache_control, None);

        let json = serde_json::to_value(&job.options).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "viewport": { "width": 794, "height": 1123, "deviceScaleFactor": 1 },
                "format": "A4",
                "printBackground": true,
                "preferCSSPageSize": true,
                "margin": { "top": "0mm", "right": "0mm", "bottom": "0mm", "left": "0mm" }
            })
        );
    }

    #[test]
    fn test_preview_job_is_untagged_and_uncached() {
        let doc = sample_document();
        let job = PrintJob::preview(DocumentKind::CoverLetter, &doc, "", date());
        assert_eq!(job.options.tagged, Some(false));
        assert_eq!(job.options.display_header_footer, Some(false));
        assert_eq!(job.options.format, "A4");
        assert!(job.options.print_background);
        assert_eq!(job.cache_control.as_deref(), Some("no-cache"));

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["options"]["tagged"], false);
        assert_eq!(json["options"]["displayHeaderFooter"], false);
        assert_eq!(json["cacheControl"], "no-cache");
    }

    #[test]
    fn test_preview_pages_html_labels_each_page() {
        let pages = vec![
            Page {
                number: 1,
                content: vec![ContentBlock::keep_together("<h1>A</h1>")],
                used_height: 10.0,
            },
            Page {
                number: 2,
                content: vec![ContentBlock::splittable("<p>B.</p>")],
                used_height: 10.0,
            },
        ];
        let html = preview_pages_html(&pages);
        assert_eq!(html.matches("class=\"pdf-page\"").count(), 2);
        assert!(html.contains("<div class=\"page-number\">Page 2</div><div class=\"pdf-page-content\"><div><p>B.</p></div></div>"));
        assert_eq!(visible_text(&html), "Page 1 A Page 2 B.");
    }
}
