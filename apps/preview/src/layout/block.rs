//! Content blocks, pages, and the fixed A4 page geometry used by the preview.
//!
//! All lengths are CSS pixels at 96 DPI, the unit the print engine lays out in.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// A4 width at 96 DPI.
pub const A4_WIDTH_PX: f32 = 794.0;
/// A4 height at 96 DPI.
pub const A4_HEIGHT_PX: f32 = 1123.0;
/// 1.4cm print margin at 96 DPI, applied on every side.
pub const PRINT_MARGIN_PX: f32 = 53.0;
/// Usable vertical space per page: 1123 - 2 × 53 = 1017px.
pub const PAGE_HEIGHT_PX: f32 = A4_HEIGHT_PX - 2.0 * PRINT_MARGIN_PX;
/// Reserved trailing space for the page-number label plus a safety buffer.
pub const MARGIN_BOTTOM_PX: f32 = 40.0;
/// Content width inside the print margins: 794 - 2 × 53 = 688px.
pub const CONTENT_WIDTH_PX: f32 = A4_WIDTH_PX - 2.0 * PRINT_MARGIN_PX;

/// Vertical page budget the paginator fills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_height_px: f32,
    pub margin_bottom_px: f32,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        page_height_px: PAGE_HEIGHT_PX,
        margin_bottom_px: MARGIN_BOTTOM_PX,
    };

    /// Height blocks may occupy on one page (`PAGE_HEIGHT - MARGIN_BOTTOM`).
    pub fn usable_height(&self) -> f32 {
        self.page_height_px - self.margin_bottom_px
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks and pages
// ────────────────────────────────────────────────────────────────────────────

/// One unit of pre-rendered HTML, the atomic input to pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub html: String,
    /// Never split across a page boundary; moved whole to the next page instead.
    pub avoid_break: bool,
}

impl ContentBlock {
    /// A block that must stay in one piece (headings, tables, lists, item groups).
    pub fn keep_together(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            avoid_break: true,
        }
    }

    /// A block the paginator may split at sentence boundaries.
    pub fn splittable(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            avoid_break: false,
        }
    }
}

/// An ordered group of blocks estimated to fit on one printed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based, contiguous.
    pub number: u32,
    pub content: Vec<ContentBlock>,
    /// Sum of the measured heights of `content`. Zero on the degraded fallback page.
    pub used_height: f32,
}

impl Page {
    pub fn empty(number: u32) -> Self {
        Self {
            number,
            content: Vec::new(),
            used_height: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_usable_height() {
        assert_eq!(PAGE_HEIGHT_PX, 1017.0);
        assert_eq!(PageGeometry::A4.usable_height(), 977.0);
        assert_eq!(CONTENT_WIDTH_PX, 688.0);
    }

    #[test]
    fn test_content_block_serde_uses_camel_case() {
        let block = ContentBlock::keep_together("<h1>Sarah</h1>");
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"avoidBreak\":true"), "got {json}");

        let parsed: ContentBlock =
            serde_json::from_str(r#"{"html":"<p>x</p>","avoidBreak":false}"#).unwrap();
        assert_eq!(parsed, ContentBlock::splittable("<p>x</p>"));
    }

    #[test]
    fn test_empty_page_has_no_content() {
        let page = Page::empty(1);
        assert_eq!(page.number, 1);
        assert!(page.content.is_empty());
        assert_eq!(page.used_height, 0.0);
    }
}
